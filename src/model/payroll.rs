use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::month::YearMonth;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Aberto,
    Finalizado,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Vacation {
    #[default]
    #[serde(rename = "normal", alias = "Normal", alias = "")]
    Normal,
    #[serde(rename = "Férias")]
    Ferias,
}

/// Money fields of a payroll entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PayrollFigures {
    pub base_salary: f64,
    pub bonus: f64,
    pub total_received: f64,
    pub cash_advance: f64,
    pub accounting_advance: f64,
    pub overtime: f64,
    pub transport_deduction: f64,
    pub loan_deduction: f64,
    pub other_deduction: f64,
    pub net_total: f64,
    pub accounting_payment: f64,
    pub cash_payment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "12",
    "employeeId": "7",
    "month": "2024-06",
    "vacation": "normal",
    "baseSalary": 2500.0,
    "bonus": 300.0,
    "totalReceived": 2800.0,
    "cashAdvance": 800.0,
    "accountingAdvance": 0.0,
    "overtime": 0.0,
    "transportDeduction": 120.0,
    "loanDeduction": 100.0,
    "otherDeduction": 0.0,
    "netTotal": 2580.0,
    "accountingPayment": 0.0,
    "cashPayment": 2800.0,
    "status": "aberto"
}))]
pub struct PayrollEntry {
    #[serde(default, deserialize_with = "super::deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "super::deserialize_id")]
    pub employee_id: String,
    #[schema(value_type = String, example = "2024-06")]
    pub month: YearMonth,
    #[serde(default)]
    pub vacation: Vacation,
    #[serde(flatten)]
    pub figures: PayrollFigures,
    #[serde(default)]
    pub status: EntryStatus,
}

impl PayrollEntry {
    pub fn new(employee_id: impl Into<String>, month: YearMonth) -> Self {
        Self {
            id: String::new(),
            employee_id: employee_id.into(),
            month,
            vacation: Vacation::Normal,
            figures: PayrollFigures::default(),
            status: EntryStatus::Aberto,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status == EntryStatus::Finalizado
    }

    /// Vacation months carry identity, month and status only.
    pub fn zero_for_vacation(&mut self) {
        if self.vacation == Vacation::Ferias {
            self.figures = PayrollFigures::default();
        }
    }
}
