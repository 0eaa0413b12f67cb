use super::finance_summary::{FinanceSummary, MonthlyTotals};
use super::time_summary::TimeSummary;
use crate::models::period::TrendPeriod;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::{self, Write};

const RULE: &str = "-------------------------";

/// Runs `write` against a fresh buffer. Writing into a `String` never fails.
fn render<F>(write: F) -> String
where
    F: FnOnce(&mut String) -> fmt::Result,
{
    let mut out = String::new();
    write(&mut out).expect("formatting into a String cannot fail");
    out
}

pub fn format_finance_summary(summary: &FinanceSummary) -> String {
    render(|out| {
        writeln!(out, "--- Summary Statistics ---")?;
        writeln!(out, "Transactions: {}", summary.transaction_count)?;
        writeln!(out, "Total Income: {:.2}", summary.total_income)?;
        writeln!(out, "Total Expenses: {:.2}", summary.total_expenses)?;
        writeln!(out, "Net Savings: {:.2}", summary.net_savings)?;
        writeln!(out, "{}", RULE)
    })
}

pub fn format_spending_by_category(spending: &[(String, Decimal)], inferred: bool) -> String {
    render(|out| {
        writeln!(out, "--- Spending By Category ---")?;
        if inferred {
            writeln!(out, "(Categories were inferred from descriptions)")?;
        }
        if spending.is_empty() {
            writeln!(out, "No expense data available for category analysis.")?;
        }
        write_totals(out, spending)?;
        writeln!(out, "{}", RULE)
    })
}

pub fn format_category_totals(totals: &[(String, Decimal)]) -> String {
    render(|out| {
        writeln!(out, "--- Category Totals ---")?;
        write_totals(out, totals)?;
        writeln!(out, "{}", RULE)
    })
}

pub fn format_monthly_trends(months: &[MonthlyTotals]) -> String {
    render(|out| {
        writeln!(out, "--- Monthly Trends ---")?;
        writeln!(
            out,
            "{:<10}  {:>12}  {:>12}  {:>12}",
            "Month", "Income", "Expenses", "Net"
        )?;
        for month in months {
            writeln!(
                out,
                "{:<10}  {:>12.2}  {:>12.2}  {:>12.2}",
                month.month.format("%Y-%m").to_string(),
                month.income,
                month.expenses,
                month.net
            )?;
        }
        writeln!(out, "{}", RULE)
    })
}

pub fn format_time_summary(summary: &TimeSummary) -> String {
    render(|out| {
        writeln!(out, "--- Summary Statistics ---")?;
        writeln!(out, "Entries: {}", summary.entry_count)?;
        writeln!(out, "Total Time Tracked: {:.2} hours", summary.total_hours)?;
        if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
            writeln!(
                out,
                "Date Range: {} to {} ({} days)",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d"),
                summary.span_days
            )?;
        }
        writeln!(out, "Number of Days with Entries: {}", summary.active_days)?;
        writeln!(
            out,
            "Average Time Tracked per Day: {:.2} hours/day",
            summary.mean_hours_per_day
        )?;
        writeln!(out, "{}", RULE)
    })
}

pub fn format_time_allocation(group_column: &str, totals: &[(String, Decimal)]) -> String {
    render(|out| {
        writeln!(out, "--- Time Allocation by {} ---", group_column)?;
        if totals.is_empty() {
            writeln!(out, "No time data found for any groups in column '{}'.", group_column)?;
        }
        write_totals(out, totals)?;
        writeln!(out, "{}", RULE)
    })
}

pub fn format_time_trend(period: TrendPeriod, trend: &[(NaiveDate, Decimal)]) -> String {
    let heading = match period {
        TrendPeriod::Daily => "Date",
        TrendPeriod::Weekly => "Week of",
    };
    render(|out| {
        writeln!(out, "--- {} Time Tracking Trends ---", period.label())?;
        writeln!(out, "{:<12}  {:>10}", heading, "Hours")?;
        for (bucket, hours) in trend {
            writeln!(
                out,
                "{:<12}  {:>10.2}",
                bucket.format("%Y-%m-%d").to_string(),
                hours
            )?;
        }
        writeln!(out, "{}", RULE)
    })
}

fn write_totals(out: &mut String, totals: &[(String, Decimal)]) -> fmt::Result {
    let width = totals
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .max(15);
    for (name, total) in totals {
        writeln!(out, "{:width$}  {:>12.2}", name, total, width = width)?;
    }
    Ok(())
}
