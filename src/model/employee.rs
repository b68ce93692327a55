use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use super::month::YearMonth;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum ContractType {
    #[default]
    #[serde(rename = "CLT")]
    #[strum(serialize = "CLT")]
    Clt,
    Mensalista,
    Diarista,
}

/// Whether a salary advance is paid out in cash or through accounting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdvanceKind {
    #[default]
    Cash,
    Accounting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "6f1c1b0e-6f9b-4a43-9d7e-1f0b2f0c7a11",
    "principal": 1200.0,
    "installmentCount": 12,
    "startMonth": "2024-01",
    "description": "Car repair"
}))]
pub struct Loan {
    #[serde(default, deserialize_with = "super::deserialize_id")]
    pub id: String,
    pub principal: f64,
    /// Zero in stored data means the loan is never charged.
    #[serde(default)]
    pub installment_count: u32,
    #[schema(value_type = String, example = "2024-01")]
    pub start_month: YearMonth,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[schema(example = json!({
    "id": "7",
    "name": "Maria Souza",
    "taxId": "123.456.789-00",
    "address": "Rua das Flores, 10",
    "role": "Cashier",
    "contractType": "CLT",
    "baseSalary": 2500.0,
    "bonus": 300.0,
    "hasAdvance": true,
    "advanceAmount": 800.0,
    "advanceKind": "cash",
    "loans": []
}))]
pub struct Employee {
    /// Empty until the record store assigns one.
    #[serde(deserialize_with = "super::deserialize_id")]
    pub id: String,
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub role: String,
    pub contract_type: ContractType,
    pub hire_date: String,
    pub base_salary: f64,
    pub bonus: f64,
    pub total_override: f64,
    pub meal_voucher: bool,
    pub transport_voucher: bool,
    pub life_insurance: bool,
    pub dental_plan: bool,
    pub dependents: u32,
    pub has_advance: bool,
    pub advance_amount: f64,
    pub advance_kind: AdvanceKind,
    pub loans: Vec<Loan>,
    pub notes: String,
}

/// A loan row as submitted with an employee form, before normalization.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanInput {
    #[serde(deserialize_with = "super::deserialize_optional_id")]
    pub id: Option<String>,
    pub principal: f64,
    pub installment_count: Option<u32>,
    #[serde(deserialize_with = "super::month::deserialize_optional")]
    #[schema(value_type = Option<String>, example = "2024-01")]
    pub start_month: Option<YearMonth>,
    pub description: Option<String>,
}

impl LoanInput {
    /// Rows without a positive principal or a start month are dropped.
    pub fn normalize(self) -> Option<Loan> {
        let start_month = self.start_month?;
        if self.principal.is_nan() || self.principal <= 0.0 {
            return None;
        }

        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "No description".to_string());

        Some(Loan {
            id,
            principal: self.principal,
            installment_count: self.installment_count.filter(|n| *n > 0).unwrap_or(1),
            start_month,
            description,
        })
    }
}

pub fn normalize_loans(rows: Vec<LoanInput>) -> Vec<Loan> {
    rows.into_iter().filter_map(LoanInput::normalize).collect()
}
