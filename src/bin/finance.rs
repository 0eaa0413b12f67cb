use anyhow::Result;
use clap::Parser;
use personal_analyzers::log::init_logging;
use personal_analyzers::models::rule::CategoryRules;
use personal_analyzers::{FinanceOptions, run_finance};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Personal Finance Analyzer")]
struct Cli {
    /// Path to the CSV file containing financial data
    csv_file: PathBuf,

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

    let options = FinanceOptions {
        csv_path: cli.csv_file,
        output_dir: cli.output_dir,
    };

    if let Err(e) = run_finance(&options, &CategoryRules::default()) {
        tracing::error!(error = %e, "Finance analysis failed");
        println!("Failed to load or validate financial data. Exiting.");
        return Err(e.into());
    }
    Ok(())
}
