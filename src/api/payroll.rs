use std::str::FromStr;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::api::{non_blank, parse_month};
use crate::error::AdminError;
use crate::model::{EntryStatus, PayrollEntry, PayrollFigures};
use crate::payroll::net::recompute;
use crate::payroll::{DraftRequest, check_draft};
use crate::reports::{EntryFilter, Receipt, filter_entries, receipt_for};
use crate::state::{AppState, ClientCache};

#[derive(Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EntryQuery {
    #[schema(example = "2024-06")]
    pub month: Option<String>,

    #[schema(example = "7")]
    pub employee_id: Option<String>,

    #[schema(example = "aberto")]
    pub status: Option<String>,
}

impl EntryQuery {
    fn to_filter(&self) -> Result<EntryFilter, AdminError> {
        let status = match non_blank(self.status.as_deref()) {
            Some(raw) => Some(
                EntryStatus::from_str(&raw)
                    .map_err(|_| AdminError::Precondition(format!("Unknown status '{raw}'")))?,
            ),
            None => None,
        };
        Ok(EntryFilter {
            month: parse_month(self.month.as_deref())?,
            employee_id: non_blank(self.employee_id.as_deref()),
            status,
        })
    }
}

/// A listed entry with the name and tax id of its employee, when known.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListedEntry {
    #[serde(flatten)]
    pub entry: PayrollEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_tax_id: Option<String>,
}

pub fn listed_entries(cache: &ClientCache, filter: &EntryFilter) -> Vec<ListedEntry> {
    filter_entries(cache, filter)
        .into_iter()
        .map(|entry| {
            let employee = cache.employee(&entry.employee_id);
            ListedEntry {
                entry: entry.clone(),
                employee_name: employee.map(|e| e.name.clone()),
                employee_tax_id: employee.map(|e| e.tax_id.clone()),
            }
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/payroll-entries",
    params(EntryQuery),
    responses(
        (status = 200, body = [ListedEntry]),
        (status = 400, description = "Invalid filter")
    ),
    tag = "Payroll"
)]
pub async fn list_entries(
    state: web::Data<AppState>,
    query: web::Query<EntryQuery>,
) -> Result<HttpResponse, AdminError> {
    let filter = query.to_filter()?;
    let cache = state.cache();
    Ok(HttpResponse::Ok().json(listed_entries(&cache, &filter)))
}

#[utoipa::path(
    get,
    path = "/api/payroll-entries/{id}",
    params(("id", description = "Payroll entry ID")),
    responses(
        (status = 200, body = PayrollEntry),
        (status = 404, description = "Entry not in cache", body = Object, example = json!({
            "error": "Not found: payroll entry 12"
        }))
    ),
    tag = "Payroll"
)]
pub async fn get_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let cache = state.cache();
    let entry = cache
        .entry(&id)
        .ok_or_else(|| AdminError::NotFound(format!("payroll entry {id}")))?;
    Ok(HttpResponse::Ok().json(entry))
}

/// Duplicate check for the employee/month selection of a new entry.
#[utoipa::path(
    post,
    path = "/api/payroll-entries/draft",
    request_body = DraftRequest,
    responses(
        (status = 200, description = "skipped, blocked, edit_existing or a prefilled new entry", body = Object, example = json!({
            "outcome": "blocked",
            "existingId": "12",
            "message": "A finalized entry already exists for Maria Souza in Jun/2024. Reopen it before editing."
        })),
        (status = 404, description = "Employee not in cache")
    ),
    tag = "Payroll"
)]
pub async fn draft_entry(
    state: web::Data<AppState>,
    payload: web::Json<DraftRequest>,
) -> Result<HttpResponse, AdminError> {
    let outcome = check_draft(&state.cache(), &payload)?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    post,
    path = "/api/payroll-entries/recalculate",
    request_body = PayrollFigures,
    responses((status = 200, body = PayrollFigures)),
    tag = "Payroll"
)]
pub async fn recalculate(payload: web::Json<PayrollFigures>) -> HttpResponse {
    let mut figures = payload.into_inner();
    recompute(&mut figures);
    HttpResponse::Ok().json(figures)
}

/// Applies the save rules against the cache: status is carried over from the
/// entry being edited, finalized entries are refused, and no second entry for
/// the same employee and month is written, whether created or moved there by an edit.
pub fn prepare_entry(cache: &ClientCache, mut entry: PayrollEntry) -> Result<PayrollEntry, AdminError> {
    entry.id = entry.id.trim().to_string();
    entry.employee_id = entry.employee_id.trim().to_string();
    if entry.employee_id.is_empty() {
        return Err(AdminError::Precondition("Select an employee".to_string()));
    }
    let name = cache
        .employee(&entry.employee_id)
        .map(|e| e.name.clone())
        .ok_or_else(|| AdminError::NotFound(format!("employee {}", entry.employee_id)))?;

    if !entry.id.is_empty() {
        entry.status = match cache.entry(&entry.id) {
            Some(current) if current.is_finalized() => {
                return Err(AdminError::Locked(format!(
                    "Entry {} is finalized. Reopen it before editing.",
                    entry.id
                )));
            }
            Some(current) => current.status,
            None => EntryStatus::Aberto,
        };
    } else {
        entry.status = EntryStatus::Aberto;
    }

    if let Some(existing) = cache.conflicting_entry(&entry.employee_id, entry.month, &entry.id) {
        return Err(if existing.is_finalized() {
            AdminError::Locked(format!(
                "A finalized entry already exists for {name} in {}. Reopen it before editing.",
                entry.month.label()
            ))
        } else {
            AdminError::Precondition(format!(
                "An open entry already exists for {name} in {}; edit entry {} instead.",
                entry.month.label(),
                existing.id
            ))
        });
    }

    recompute(&mut entry.figures);
    entry.zero_for_vacation();
    Ok(entry)
}

#[utoipa::path(
    post,
    path = "/api/payroll-entries",
    request_body = PayrollEntry,
    responses(
        (status = 201, description = "Entry created", body = PayrollEntry),
        (status = 200, description = "Entry updated", body = PayrollEntry),
        (status = 400, description = "Incomplete entry or duplicate"),
        (status = 409, description = "Entry is finalized"),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "Payroll"
)]
pub async fn save_entry(
    state: web::Data<AppState>,
    payload: web::Json<PayrollEntry>,
) -> Result<HttpResponse, AdminError> {
    let entry = prepare_entry(&state.cache(), payload.into_inner())?;
    let creating = entry.id.is_empty();

    let saved = state.store.save_payroll_entry(&entry).await?;
    info!(
        entry_id = %saved.id,
        employee_id = %saved.employee_id,
        month = %saved.month,
        creating,
        "Payroll entry saved"
    );
    state.refresh_after_mutation().await;

    if creating {
        Ok(HttpResponse::Created().json(saved))
    } else {
        Ok(HttpResponse::Ok().json(saved))
    }
}

#[utoipa::path(
    put,
    path = "/api/payroll-entries/{id}/finalize",
    params(("id", description = "Payroll entry ID")),
    responses(
        (status = 200, description = "Entry finalized"),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "Payroll"
)]
pub async fn finalize_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    state.store.finalize_entry(&id).await?;
    info!(entry_id = %id, "Payroll entry finalized");
    state.refresh_after_mutation().await;

    Ok(HttpResponse::Ok().json(json!({ "message": "Entry finalized" })))
}

#[utoipa::path(
    put,
    path = "/api/payroll-entries/{id}/reopen",
    params(("id", description = "Payroll entry ID")),
    responses(
        (status = 200, description = "Entry reopened"),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "Payroll"
)]
pub async fn reopen_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    state.store.reopen_entry(&id).await?;
    info!(entry_id = %id, "Payroll entry reopened");
    state.refresh_after_mutation().await;

    Ok(HttpResponse::Ok().json(json!({ "message": "Entry reopened" })))
}

#[utoipa::path(
    delete,
    path = "/api/payroll-entries/{id}",
    params(("id", description = "Payroll entry ID")),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 409, description = "Entry is finalized"),
        (status = 502, description = "Record store unavailable")
    ),
    tag = "Payroll"
)]
pub async fn delete_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let finalized = state.cache().entry(&id).is_some_and(PayrollEntry::is_finalized);
    if finalized {
        return Err(AdminError::Locked(format!(
            "Entry {id} is finalized. Reopen it before deleting."
        )));
    }

    state.store.delete_entry(&id).await?;
    info!(entry_id = %id, "Payroll entry deleted");
    state.refresh_after_mutation().await;

    Ok(HttpResponse::Ok().json(json!({ "message": "Entry deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/payroll-entries/{id}/receipt",
    params(("id", description = "Payroll entry ID")),
    responses(
        (status = 200, body = Receipt),
        (status = 404, description = "Entry or employee not in cache")
    ),
    tag = "Payroll"
)]
pub async fn entry_receipt(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AdminError> {
    let receipt = receipt_for(&state.cache(), &path.into_inner())?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Employee, Vacation, YearMonth};

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn stored(id: &str, month: &str, status: EntryStatus) -> PayrollEntry {
        let mut e = PayrollEntry::new("1", ym(month));
        e.id = id.into();
        e.status = status;
        e
    }

    fn cache() -> ClientCache {
        ClientCache::new(
            vec![Employee {
                id: "1".into(),
                name: "Rui".into(),
                ..Default::default()
            }],
            vec![
                stored("10", "2024-05", EntryStatus::Finalizado),
                stored("11", "2024-06", EntryStatus::Aberto),
            ],
        )
    }

    #[test]
    fn new_entry_gets_totals_and_open_status() {
        let mut entry = PayrollEntry::new("1", ym("2024-07"));
        entry.status = EntryStatus::Finalizado;
        entry.figures.base_salary = 1000.0;
        entry.figures.bonus = 200.0;
        entry.figures.transport_deduction = 50.0;

        let prepared = prepare_entry(&cache(), entry).unwrap();
        assert_eq!(prepared.status, EntryStatus::Aberto);
        assert_eq!(prepared.figures.total_received, 1200.0);
        assert_eq!(prepared.figures.net_total, 1150.0);
    }

    #[test]
    fn duplicates_are_refused_on_create() {
        let finalized = prepare_entry(&cache(), PayrollEntry::new("1", ym("2024-05")));
        assert!(matches!(finalized, Err(AdminError::Locked(_))));

        let open = prepare_entry(&cache(), PayrollEntry::new("1", ym("2024-06")));
        assert!(matches!(open, Err(AdminError::Precondition(msg)) if msg.contains("11")));
    }

    #[test]
    fn editing_keeps_status_and_refuses_finalized() {
        let mut edit = stored("11", "2024-06", EntryStatus::Finalizado);
        edit.figures.base_salary = 10.0;
        let prepared = prepare_entry(&cache(), edit).unwrap();
        assert_eq!(prepared.status, EntryStatus::Aberto);

        let locked = prepare_entry(&cache(), stored("10", "2024-05", EntryStatus::Aberto));
        assert!(matches!(locked, Err(AdminError::Locked(_))));
    }

    #[test]
    fn edit_cannot_move_onto_another_entrys_month() {
        let moved = prepare_entry(&cache(), stored("11", "2024-05", EntryStatus::Aberto));
        assert!(matches!(moved, Err(AdminError::Locked(_))));

        let mut cache = cache();
        cache.payroll_entries.push(stored("12", "2024-07", EntryStatus::Aberto));
        let moved = prepare_entry(&cache, stored("12", "2024-06", EntryStatus::Aberto));
        assert!(matches!(moved, Err(AdminError::Precondition(msg)) if msg.contains("11")));

        let same_slot = prepare_entry(&cache, stored("12", "2024-07", EntryStatus::Aberto));
        assert!(same_slot.is_ok());
    }

    #[test]
    fn listed_entries_carry_employee_identity() {
        let mut cache = cache();
        cache.employees[0].tax_id = "111.222.333-44".into();
        cache.payroll_entries.push(PayrollEntry::new("gone", ym("2024-06")));

        let listed = listed_entries(&cache, &EntryFilter::default());
        let value = serde_json::to_value(&listed).unwrap();
        assert_eq!(value[0]["id"], "10");
        assert_eq!(value[0]["employeeName"], "Rui");
        assert_eq!(value[0]["employeeTaxId"], "111.222.333-44");
        assert!(value[2].get("employeeName").is_none());
    }

    #[test]
    fn vacation_entry_is_zeroed() {
        let mut entry = PayrollEntry::new("1", ym("2024-08"));
        entry.vacation = Vacation::Ferias;
        entry.figures.base_salary = 3000.0;
        entry.figures.cash_payment = 3000.0;

        let prepared = prepare_entry(&cache(), entry).unwrap();
        assert_eq!(prepared.figures, PayrollFigures::default());
        assert_eq!(prepared.month, ym("2024-08"));
    }

    #[test]
    fn unknown_or_missing_employee_is_refused() {
        assert!(matches!(
            prepare_entry(&cache(), PayrollEntry::new(" ", ym("2024-08"))),
            Err(AdminError::Precondition(_))
        ));
        assert!(matches!(
            prepare_entry(&cache(), PayrollEntry::new("2", ym("2024-08"))),
            Err(AdminError::NotFound(_))
        ));
    }

    #[test]
    fn query_rejects_unknown_status_and_bad_month() {
        let bad_status = EntryQuery {
            month: None,
            employee_id: None,
            status: Some("closed".into()),
        };
        assert!(bad_status.to_filter().is_err());

        let bad_month = EntryQuery {
            month: Some("2024-13".into()),
            employee_id: None,
            status: None,
        };
        assert!(bad_month.to_filter().is_err());

        let ok = EntryQuery {
            month: Some("2024-06".into()),
            employee_id: Some(" 1 ".into()),
            status: Some("finalizado".into()),
        };
        let filter = ok.to_filter().unwrap();
        assert_eq!(filter.employee_id.as_deref(), Some("1"));
        assert_eq!(filter.status, Some(EntryStatus::Finalizado));
    }
}
