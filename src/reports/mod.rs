pub mod dashboard;
pub mod export;
pub mod receipt;

pub use dashboard::{DashboardFilter, DashboardSummary, EntryFilter, ViewKind, filter_entries, summarize};
pub use export::{CsvExport, export_month};
pub use receipt::{Receipt, receipt_for};
