use chrono::{Local, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AdminError;
use crate::state::ClientCache;

/// Cash payment receipt for one payroll entry.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub entry_id: String,
    pub employee_name: String,
    pub tax_id: String,
    pub amount: f64,
    #[schema(example = "Jun/2024")]
    pub month: String,
    #[schema(example = "05/07/2024")]
    pub issued_on: String,
}

pub fn receipt_for(cache: &ClientCache, entry_id: &str) -> Result<Receipt, AdminError> {
    receipt_on(cache, entry_id, Local::now().date_naive())
}

fn receipt_on(cache: &ClientCache, entry_id: &str, today: NaiveDate) -> Result<Receipt, AdminError> {
    let entry = cache
        .entry(entry_id)
        .ok_or_else(|| AdminError::NotFound(format!("payroll entry {entry_id}")))?;
    let employee = cache
        .employee(&entry.employee_id)
        .ok_or_else(|| AdminError::NotFound(format!("employee {}", entry.employee_id)))?;

    Ok(Receipt {
        entry_id: entry.id.clone(),
        employee_name: employee.name.clone(),
        tax_id: employee.tax_id.clone(),
        amount: entry.figures.cash_payment,
        month: entry.month.label(),
        issued_on: today.format("%d/%m/%Y").to_string(),
    })
}
