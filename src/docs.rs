use crate::api::employee::SaveEmployee;
use crate::api::payroll::{EntryQuery, ListedEntry};
use crate::api::reports::{DashboardQuery, ExportQuery};
use crate::model::{
    AdvanceKind, ContractType, Employee, EntryStatus, Loan, LoanInput, PayrollEntry,
    PayrollFigures, Vacation,
};
use crate::payroll::DraftRequest;
use crate::reports::{DashboardSummary, Receipt, ViewKind};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Admin API",
        version = "0.1.0",
        description = r#"
## Payroll administration gateway

Back office for employee records and monthly payroll entries. Data lives in an
external **record store**; this service keeps a cached copy, runs the payroll
calculations and forwards changes.

### Key Features
- **Employees**: create, update, delete; loan rows are normalized on save
- **Payroll entries**: duplicate check with prefilled drafts, recalculation,
  finalize / reopen, receipts
- **Reports**: dashboard totals and the monthly CSV payment sheet

### Response Format
- JSON, camelCase field names
- Errors as `{"error": "..."}`; record store validation messages are passed through unchanged
"#,
    ),
    paths(
        crate::api::snapshot::get_snapshot,
        crate::api::snapshot::refresh_snapshot,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::save_employee,
        crate::api::employee::delete_employee,

        crate::api::payroll::list_entries,
        crate::api::payroll::get_entry,
        crate::api::payroll::draft_entry,
        crate::api::payroll::recalculate,
        crate::api::payroll::save_entry,
        crate::api::payroll::finalize_entry,
        crate::api::payroll::reopen_entry,
        crate::api::payroll::delete_entry,
        crate::api::payroll::entry_receipt,

        crate::api::reports::dashboard,
        crate::api::reports::export_csv
    ),
    components(
        schemas(
            Employee,
            Loan,
            LoanInput,
            ContractType,
            AdvanceKind,
            PayrollEntry,
            PayrollFigures,
            EntryStatus,
            Vacation,
            DraftRequest,
            DashboardSummary,
            ViewKind,
            Receipt,
            SaveEmployee,
            ListedEntry,
            EntryQuery,
            DashboardQuery,
            ExportQuery
        )
    ),
    tags(
        (name = "Snapshot", description = "Cached record store contents"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payroll", description = "Payroll entry APIs"),
        (name = "Reports", description = "Dashboard and exports"),
    )
)]
pub struct ApiDoc;
