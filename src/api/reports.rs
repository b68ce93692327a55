use std::str::FromStr;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::{non_blank, parse_month};
use crate::error::AdminError;
use crate::reports::{DashboardFilter, DashboardSummary, ViewKind, export_month, summarize};
use crate::state::AppState;

#[derive(Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    #[schema(example = "2024-06")]
    pub month: Option<String>,

    #[schema(example = "7")]
    pub employee_id: Option<String>,

    /// `employees` or `entries`
    #[schema(example = "entries")]
    pub view: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    #[schema(example = "2024-06")]
    pub month: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, body = DashboardSummary),
        (status = 400, description = "Invalid filter")
    ),
    tag = "Reports"
)]
pub async fn dashboard(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AdminError> {
    let view = match non_blank(query.view.as_deref()) {
        Some(raw) => ViewKind::from_str(&raw)
            .map_err(|_| AdminError::Precondition(format!("Unknown view '{raw}'")))?,
        None => ViewKind::default(),
    };
    let filter = DashboardFilter {
        month: parse_month(query.month.as_deref())?,
        employee_id: non_blank(query.employee_id.as_deref()),
        view,
    };

    let summary = summarize(&state.cache(), &filter);
    Ok(HttpResponse::Ok().json(summary))
}

/// Semicolon-separated payment sheet of one month.
#[utoipa::path(
    get,
    path = "/api/reports/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV file (UTF-8 with BOM)", body = String, content_type = "text/csv"),
        (status = 400, description = "No month selected or no entries in that month", body = Object, example = json!({
            "error": "No payroll entries for Jun/2024"
        }))
    ),
    tag = "Reports"
)]
pub async fn export_csv(
    state: web::Data<AppState>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, AdminError> {
    let month = parse_month(query.month.as_deref())?;
    let export = export_month(&state.cache(), month)?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.file_name)],
        })
        .body(export.content))
}
