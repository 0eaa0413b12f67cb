pub mod error;
pub mod log;
pub mod models;
pub mod operations;

use crate::error::Result;
use crate::models::period::TrendPeriod;
use crate::models::rule::CategoryRules;
use crate::operations::chart::{self, BarChart, StagedCharts};
use crate::operations::{finance_summary, import, import_time, report, time_summary};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct FinanceOptions {
    pub csv_path: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TimeOptions {
    pub csv_path: PathBuf,
    pub group_by: Option<String>,
    pub trend_period: TrendPeriod,
    pub output_dir: PathBuf,
}

/// Loads, summarizes and charts a transaction export. Returns the charts written.
pub fn run_finance(options: &FinanceOptions, rules: &CategoryRules) -> Result<Vec<PathBuf>> {
    info!(path = %options.csv_path.display(), "Analyzing finance data");
    let dataset = import::load_transactions(&options.csv_path, rules)?;
    if !dataset.rejected.is_empty() {
        println!("Skipped {} invalid row(s).", dataset.rejected.len());
    }
    if dataset.has_type_column {
        println!(
            "Note: 'Type' column detected. Income and expenses are taken from the sign of 'Amount'."
        );
    }

    let transactions = &dataset.transactions;
    let summary = finance_summary::summarize_transactions(transactions);
    let spending = finance_summary::spending_by_category(transactions);
    let categories = finance_summary::category_totals(transactions);
    let months = finance_summary::monthly_totals(transactions);

    println!("{}", report::format_finance_summary(&summary));
    println!(
        "{}",
        report::format_spending_by_category(&spending, dataset.categories_inferred)
    );
    println!("{}", report::format_category_totals(&categories));
    println!("{}", report::format_monthly_trends(&months));

    let mut charts = StagedCharts::new();
    let mut kinds = Vec::new();
    if spending.is_empty() {
        println!("No data to plot for spending by category.");
    } else {
        let staging = charts.stage(chart::output_path(&options.output_dir, chart::SPENDING_CHART));
        chart::render_bar_chart(
            &BarChart::spending(&spending, dataset.categories_inferred),
            &staging,
        )?;
        kinds.push("Bar chart");
    }

    if months.is_empty() {
        println!("No data to plot for monthly trends.");
    } else {
        let staging = charts.stage(chart::output_path(&options.output_dir, chart::MONTHLY_CHART));
        chart::render_monthly_trends(&months, &staging)?;
        kinds.push("Line chart");
    }

    publish(charts, &kinds)
}

/// Loads, summarizes and charts a time log. Returns the charts written.
pub fn run_time_tracking(options: &TimeOptions) -> Result<Vec<PathBuf>> {
    info!(
        path = %options.csv_path.display(),
        period = %options.trend_period,
        "Analyzing time tracking data"
    );
    let dataset = import_time::load_time_entries(&options.csv_path, options.group_by.as_deref())?;
    info!(
        label_column = %dataset.label_column,
        group_column = %dataset.group_column,
        "Entries labelled and grouped"
    );
    if !dataset.rejected.is_empty() {
        println!("Skipped {} invalid row(s).", dataset.rejected.len());
    }

    let entries = &dataset.entries;
    let summary = time_summary::summarize_time(entries);
    let allocation = time_summary::time_by_group(entries);
    let trend = time_summary::time_trend(entries, options.trend_period);

    println!("{}", report::format_time_summary(&summary));
    println!(
        "{}",
        report::format_time_allocation(&dataset.group_column, &allocation)
    );
    println!(
        "{}",
        report::format_time_trend(options.trend_period, &trend)
    );

    let names = chart::chart_file_names(&dataset.group_column, options.trend_period);
    let mut charts = StagedCharts::new();
    let mut kinds = Vec::new();
    if !allocation.is_empty() {
        let staging = charts.stage(chart::output_path(&options.output_dir, &names.allocation));
        chart::render_bar_chart(
            &BarChart::time_allocation(&dataset.group_column, &allocation),
            &staging,
        )?;
        kinds.push("Bar chart");
    }

    if !trend.is_empty() {
        let staging = charts.stage(chart::output_path(&options.output_dir, &names.trend));
        chart::render_time_trend(options.trend_period, &trend, &staging)?;
        kinds.push("Line chart");
    }

    publish(charts, &kinds)
}

/// Moves the rendered charts into place and reports each one.
fn publish(charts: StagedCharts, kinds: &[&str]) -> Result<Vec<PathBuf>> {
    let written = charts.commit()?;
    for (kind, path) in kinds.iter().zip(&written) {
        saved(kind, path);
    }
    Ok(written)
}

fn saved(kind: &str, path: &Path) {
    println!("{} '{}' saved successfully.", kind, path.display());
}
