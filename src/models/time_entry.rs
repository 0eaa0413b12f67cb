use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One normalized row of a time log.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub date: NaiveDate,
    /// Value of the `Project` (or `Task`) column.
    pub label: String,
    pub duration_hours: Decimal,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// Value of the resolved grouping column for this row.
    pub group: String,
}
