use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::model::{Loan, YearMonth};

/// Loan installments falling due in one payroll month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentDue {
    pub total: f64,
    /// `description: index/count - amount`, in loan order.
    pub details: Vec<String>,
}

impl InstallmentDue {
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

pub fn installment_amount(loan: &Loan) -> f64 {
    loan.principal / loan.installment_count as f64
}

/// 1-based index of the installment due in `month`, if any.
pub fn installment_index(loan: &Loan, month: YearMonth) -> Option<u32> {
    let offset = month.months_since(loan.start_month);
    if offset < 0 || offset >= loan.installment_count as i64 {
        return None;
    }
    Some(offset as u32 + 1)
}

pub fn installments_due(loans: &[Loan], month: YearMonth) -> InstallmentDue {
    let mut due = InstallmentDue::default();

    for loan in loans {
        if loan.installment_count == 0 {
            warn!(loan_id = %loan.id, "Skipping loan with zero installments");
            continue;
        }
        let Some(index) = installment_index(loan, month) else {
            continue;
        };

        let amount = installment_amount(loan);
        due.total += amount;
        due.details.push(format!(
            "{}: {}/{} - {:.2}",
            loan.description, index, loan.installment_count, amount
        ));
    }

    due
}
