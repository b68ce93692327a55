use std::fmt::Write as _;

use tracing::info;

use crate::error::AdminError;
use crate::model::YearMonth;
use crate::state::ClientCache;

const BOM: &str = "\u{feff}";
const HEADER: &str = "Name;Accounting Advance;Cash Advance;Accounting Payment;Cash Payment";

#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub rows: usize,
    /// UTF-8 text starting with a byte-order mark.
    pub content: String,
}

fn decimal_comma(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

/// Quotes a field holding the delimiter, a quote or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([';', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Payments of one month for the accounting office. Fails before producing
/// anything when no month is chosen or the month has no entries.
pub fn export_month(cache: &ClientCache, month: Option<YearMonth>) -> Result<CsvExport, AdminError> {
    let month =
        month.ok_or_else(|| AdminError::Precondition("Select a month to export".to_string()))?;

    let entries: Vec<_> = cache
        .payroll_entries
        .iter()
        .filter(|e| e.month == month)
        .collect();
    if entries.is_empty() {
        return Err(AdminError::Precondition(format!(
            "No payroll entries for {}",
            month.label()
        )));
    }

    let mut content = String::from(BOM);
    content.push_str(HEADER);
    content.push('\n');
    for entry in &entries {
        let f = &entry.figures;
        // writing into a String cannot fail
        let _ = writeln!(
            content,
            "{};{};{};{};{}",
            csv_field(cache.employee_name(&entry.employee_id)),
            decimal_comma(f.accounting_advance),
            decimal_comma(f.cash_advance),
            decimal_comma(f.accounting_payment),
            decimal_comma(f.cash_payment),
        );
    }

    info!(%month, rows = entries.len(), "Built payroll CSV export");
    Ok(CsvExport {
        file_name: format!("payroll_{}.csv", month.label().replace('/', "-")),
        rows: entries.len(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Employee, PayrollEntry};

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn cache() -> ClientCache {
        let mut first = PayrollEntry::new("1", ym("2024-06"));
        first.figures.accounting_advance = 1234.5;
        first.figures.cash_advance = 300.0;
        first.figures.accounting_payment = 0.0;
        first.figures.cash_payment = 2000.456;

        let orphan = PayrollEntry::new("404", ym("2024-06"));
        let other_month = PayrollEntry::new("1", ym("2024-07"));

        ClientCache::new(
            vec![Employee {
                id: "1".into(),
                name: "João Silva".into(),
                ..Default::default()
            }],
            vec![first, orphan, other_month],
        )
    }

    #[test]
    fn writes_bom_header_and_comma_decimals() {
        let export = export_month(&cache(), Some(ym("2024-06"))).unwrap();

        assert_eq!(export.rows, 2);
        assert_eq!(export.file_name, "payroll_Jun-2024.csv");
        assert!(export.content.starts_with('\u{feff}'));

        let lines: Vec<&str> = export.content.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(
            lines,
            vec![
                HEADER,
                "João Silva;1234,50;300,00;0,00;2000,46",
                "Unknown;0,00;0,00;0,00;0,00",
            ]
        );
    }

    #[test]
    fn names_with_delimiters_are_quoted() {
        let mut cache = cache();
        cache.employees[0].name = "Silva; \"Jr\"".into();
        let export = export_month(&cache, Some(ym("2024-07"))).unwrap();

        let row = export.content.lines().nth(1).unwrap();
        assert_eq!(row, "\"Silva; \"\"Jr\"\"\";0,00;0,00;0,00;0,00");
        assert_eq!(csv_field("Ana Paula"), "Ana Paula");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn missing_month_is_a_precondition_failure() {
        let err = export_month(&cache(), None).unwrap_err();
        assert!(matches!(err, AdminError::Precondition(_)));
    }

    #[test]
    fn empty_month_aborts_without_output() {
        let err = export_month(&cache(), Some(ym("2023-01"))).unwrap_err();
        assert!(matches!(err, AdminError::Precondition(msg) if msg.contains("Jan/2023")));
    }
}
