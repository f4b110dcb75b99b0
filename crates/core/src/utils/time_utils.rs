use chrono::NaiveDate;

use crate::errors::{Error, Result, ValidationError};

/// Returns the inclusive first and last day of a calendar month.
///
/// This is the single source of truth for the reconciliation window:
/// settlements dated between the two bounds (inclusive) belong to the month.
pub fn month_date_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "invalid month {}-{:02}",
            year, month
        )))
    })?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_first.and_then(|d| d.pred_opt()).ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "invalid month {}-{:02}",
            year, month
        )))
    })?;
    Ok((first, last))
}
