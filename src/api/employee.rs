use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::error::AdminError;
use crate::model::employee::normalize_loans;
use crate::model::{Employee, LoanInput};
use crate::state::AppState;

/// Employee form payload; loan rows are normalized before saving.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveEmployee {
    #[serde(default)]
    pub loans: Vec<LoanInput>,
    #[serde(flatten)]
    pub employee: Employee,
}

impl SaveEmployee {
    pub fn into_employee(self) -> Result<Employee, AdminError> {
        let mut employee = self.employee;
        if employee.name.trim().is_empty() {
            return Err(AdminError::Precondition("Employee name is required".to_string()));
        }
        employee.id = employee.id.trim().to_string();
        employee.loans = normalize_loans(self.loans);
        Ok(employee)
    }
}

#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Cached employees", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(state: web::Data<AppState>) -> Result<HttpResponse, AdminError> {
    Ok(HttpResponse::Ok().json(&state.cache().employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id", description = "Employee ID")),
    responses(
        (status = 200, body = Employee),
        (status = 404, description = "Employee not in cache")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let cache = state.cache();
    let employee = cache
        .employee(&id)
        .ok_or_else(|| AdminError::NotFound(format!("employee {id}")))?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Create or update an employee (empty id creates).
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = SaveEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Rejected by validation", body = Object, example = json!({
            "error": "Tax id already registered"
        })),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "Employee"
)]
pub async fn save_employee(
    state: web::Data<AppState>,
    payload: web::Json<SaveEmployee>,
) -> Result<HttpResponse, AdminError> {
    let employee = payload.into_inner().into_employee()?;
    let creating = employee.id.is_empty();

    let saved = state.store.save_employee(&employee).await?;
    info!(employee_id = %saved.id, creating, loans = saved.loans.len(), "Employee saved");
    state.refresh_after_mutation().await;

    if creating {
        Ok(HttpResponse::Created().json(saved))
    } else {
        Ok(HttpResponse::Ok().json(saved))
    }
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id", description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Employee deleted"
        })),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    state.store.delete_employee(&id).await?;
    info!(employee_id = %id, "Employee deleted");
    state.refresh_after_mutation().await;

    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_payload_normalizes_loans() {
        let payload: SaveEmployee = serde_json::from_value(json!({
            "id": "",
            "name": "Carla",
            "contractType": "Mensalista",
            "baseSalary": 1800,
            "loans": [
                {"principal": 600, "installmentCount": 0, "startMonth": "2024-02", "description": ""},
                {"principal": 0, "installmentCount": 2, "startMonth": "2024-02"},
                {"id": 1712345678.5, "principal": 100, "installmentCount": 2, "startMonth": ""}
            ]
        }))
        .unwrap();

        let employee = payload.into_employee().unwrap();
        assert_eq!(employee.base_salary, 1800.0);
        assert_eq!(employee.loans.len(), 1);
        assert_eq!(employee.loans[0].installment_count, 1);
        assert_eq!(employee.loans[0].description, "No description");
    }

    #[test]
    fn blank_name_is_rejected_locally() {
        let payload: SaveEmployee = serde_json::from_value(json!({ "name": "  " })).unwrap();
        assert!(matches!(payload.into_employee(), Err(AdminError::Precondition(_))));
    }
}
