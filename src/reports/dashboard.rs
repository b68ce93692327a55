use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::{EntryStatus, PayrollEntry, YearMonth};
use crate::state::ClientCache;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Employees,
    Entries,
}

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub month: Option<YearMonth>,
    pub employee_id: Option<String>,
    pub status: Option<EntryStatus>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &PayrollEntry) -> bool {
        self.month.is_none_or(|m| entry.month == m)
            && self
                .employee_id
                .as_deref()
                .is_none_or(|id| entry.employee_id == id)
            && self.status.is_none_or(|s| entry.status == s)
    }
}

pub fn filter_entries<'a>(cache: &'a ClientCache, filter: &EntryFilter) -> Vec<&'a PayrollEntry> {
    cache
        .payroll_entries
        .iter()
        .filter(|e| filter.matches(e))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub month: Option<YearMonth>,
    pub employee_id: Option<String>,
    pub view: ViewKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(value_type = Option<String>, example = "2024-06")]
    pub month: Option<YearMonth>,
    pub view: ViewKind,
    pub employee_count: usize,
    pub entry_count: usize,
    pub open_count: usize,
    pub finalized_count: usize,
    /// Cash plus accounting advances.
    pub total_advances: f64,
    /// Cash payments minus all advances.
    pub cash_net: f64,
    pub grand_total: f64,
    /// Rows in the selected view.
    pub result_count: usize,
}

pub fn summarize(cache: &ClientCache, filter: &DashboardFilter) -> DashboardSummary {
    let entries = filter_entries(
        cache,
        &EntryFilter {
            month: filter.month,
            employee_id: filter.employee_id.clone(),
            status: None,
        },
    );

    let total_advances: f64 = entries
        .iter()
        .map(|e| e.figures.cash_advance + e.figures.accounting_advance)
        .sum();
    let total_cash_payment: f64 = entries.iter().map(|e| e.figures.cash_payment).sum();
    let finalized_count = entries.iter().filter(|e| e.is_finalized()).count();

    DashboardSummary {
        month: filter.month,
        view: filter.view,
        employee_count: cache.employees.len(),
        entry_count: entries.len(),
        open_count: entries.len() - finalized_count,
        finalized_count,
        total_advances,
        cash_net: total_cash_payment - total_advances,
        grand_total: total_advances + total_cash_payment,
        result_count: match filter.view {
            ViewKind::Employees => cache.employees.len(),
            ViewKind::Entries => entries.len(),
        },
    }
}
