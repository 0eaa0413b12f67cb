use anyhow::Result;
use clap::Parser;
use personal_analyzers::log::init_logging;
use personal_analyzers::models::period::TrendPeriod;
use personal_analyzers::{TimeOptions, run_time_tracking};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(version, about = "Time Tracking Analyzer")]
struct Cli {
    /// Path to the CSV file containing time tracking data
    csv_file: PathBuf,

    /// Column to group by for allocation analysis (e.g. Project, Task, Category).
    /// Defaults to Project, or Task when there is no Project column.
    #[arg(long = "group_by")]
    group_by: Option<String>,

    /// Period for the time trend: D for daily, W for weekly
    #[arg(long = "trend_period", default_value = "D", value_parser = TrendPeriod::from_str)]
    trend_period: TrendPeriod,

    /// Directory the charts are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = TimeOptions {
        csv_path: cli.csv_file,
        group_by: cli.group_by,
        trend_period: cli.trend_period,
        output_dir: cli.output_dir,
    };

    if let Err(e) = run_time_tracking(&options) {
        tracing::error!(error = %e, "Time tracking analysis failed");
        println!("Failed to load or validate time data. Exiting.");
        return Err(e.into());
    }
    Ok(())
}
