use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::error::AdminError;
use crate::model::{AdvanceKind, ContractType, Employee, PayrollEntry, YearMonth, month};
use crate::payroll::installments::{InstallmentDue, installments_due};
use crate::payroll::net::{recompute, round_cents};
use crate::state::ClientCache;

/// Employee/month selection of the entry form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftRequest {
    #[serde(deserialize_with = "crate::model::deserialize_optional_id")]
    pub employee_id: Option<String>,
    #[serde(deserialize_with = "month::deserialize_optional")]
    #[schema(value_type = Option<String>, example = "2024-06")]
    pub month: Option<YearMonth>,
    /// Set while an existing entry is being edited; suppresses the check.
    #[serde(deserialize_with = "crate::model::deserialize_optional_id")]
    pub edit_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DraftOutcome {
    /// Selection incomplete or an edit session is active.
    Skipped,
    /// A finalized entry exists; the employee/month selection must be cleared.
    Blocked {
        #[serde(rename = "existingId")]
        existing_id: String,
        message: String,
    },
    /// An open entry exists; continue by editing it.
    EditExisting { entry: PayrollEntry },
    New {
        entry: PayrollEntry,
        #[serde(rename = "loanDetails")]
        loan_details: Vec<String>,
    },
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn check_draft(cache: &ClientCache, req: &DraftRequest) -> Result<DraftOutcome, AdminError> {
    let (Some(employee_id), Some(month)) = (non_empty(&req.employee_id), req.month) else {
        return Ok(DraftOutcome::Skipped);
    };
    if non_empty(&req.edit_id).is_some() {
        return Ok(DraftOutcome::Skipped);
    }

    if let Some(existing) = cache.entry_for(employee_id, month) {
        if existing.is_finalized() {
            let name = cache
                .employee(employee_id)
                .map(|e| e.name.as_str())
                .unwrap_or("Unknown");
            debug!(employee_id, %month, entry_id = %existing.id, "Draft blocked by finalized entry");
            return Ok(DraftOutcome::Blocked {
                existing_id: existing.id.clone(),
                message: format!(
                    "A finalized entry already exists for {name} in {}. Reopen it before editing.",
                    month.label()
                ),
            });
        }
        debug!(employee_id, %month, entry_id = %existing.id, "Draft redirected to open entry");
        return Ok(DraftOutcome::EditExisting {
            entry: existing.clone(),
        });
    }

    let employee = cache
        .employee(employee_id)
        .ok_or_else(|| AdminError::NotFound(format!("employee {employee_id}")))?;
    let (entry, due) = prefill_entry(employee, month);

    Ok(DraftOutcome::New {
        entry,
        loan_details: due.details,
    })
}

/// Seeds a new entry from the employee's compensation terms.
pub fn prefill_entry(employee: &Employee, month: YearMonth) -> (PayrollEntry, InstallmentDue) {
    let mut entry = PayrollEntry::new(employee.id.clone(), month);
    let figures = &mut entry.figures;

    figures.base_salary = employee.base_salary;
    figures.bonus = employee.bonus;

    if employee.has_advance && employee.advance_amount > 0.0 {
        match (employee.contract_type, employee.advance_kind) {
            (ContractType::Clt, AdvanceKind::Accounting) => {
                figures.accounting_advance = employee.advance_amount
            }
            _ => figures.cash_advance = employee.advance_amount,
        }
    }

    figures.cash_payment = employee.base_salary + employee.bonus;

    let due = installments_due(&employee.loans, month);
    figures.loan_deduction = round_cents(due.total);
    recompute(figures);

    (entry, due)
}
