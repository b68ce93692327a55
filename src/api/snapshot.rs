use actix_web::{HttpResponse, web};

use crate::error::AdminError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/dados",
    responses(
        (status = 200, description = "Cached employees and payroll entries", body = Object, example = json!({
            "employees": [],
            "payrollEntries": []
        }))
    ),
    tag = "Snapshot"
)]
pub async fn get_snapshot(state: web::Data<AppState>) -> Result<HttpResponse, AdminError> {
    Ok(HttpResponse::Ok().json(state.snapshot()))
}

#[utoipa::path(
    post,
    path = "/api/dados/refresh",
    responses(
        (status = 200, description = "Cache reloaded from the record store", body = Object),
        (status = 502, description = "Record store unavailable; previous cache kept")
    ),
    tag = "Snapshot"
)]
pub async fn refresh_snapshot(state: web::Data<AppState>) -> Result<HttpResponse, AdminError> {
    state.refresh().await?;
    Ok(HttpResponse::Ok().json(state.snapshot()))
}
