pub mod employee;
pub mod payroll;
pub mod reports;
pub mod snapshot;

use crate::error::AdminError;
use crate::model::YearMonth;

/// Query-string month; blank means "no month".
pub(crate) fn parse_month(raw: Option<&str>) -> Result<Option<YearMonth>, AdminError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: crate::model::month::InvalidYearMonth| AdminError::Precondition(e.to_string())),
    }
}

pub(crate) fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
