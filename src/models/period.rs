use crate::error::AnalyzerError;
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Bucket size for the time-tracking trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendPeriod {
    #[default]
    Daily,
    Weekly,
}

impl TrendPeriod {
    pub fn code(self) -> &'static str {
        match self {
            TrendPeriod::Daily => "D",
            TrendPeriod::Weekly => "W",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendPeriod::Daily => "Daily",
            TrendPeriod::Weekly => "Weekly",
        }
    }

    /// First day of the bucket holding `date`. Weeks start on Monday.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            TrendPeriod::Daily => date,
            TrendPeriod::Weekly => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
        }
    }

    pub fn step(self) -> Duration {
        match self {
            TrendPeriod::Daily => Duration::days(1),
            TrendPeriod::Weekly => Duration::weeks(1),
        }
    }
}

impl FromStr for TrendPeriod {
    type Err = AnalyzerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "D" => Ok(TrendPeriod::Daily),
            "W" => Ok(TrendPeriod::Weekly),
            other => Err(AnalyzerError::InvalidOption {
                option: "--trend_period".to_string(),
                value: other.to_string(),
                expected: "D or W".to_string(),
            }),
        }
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// First day of the calendar month holding `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
