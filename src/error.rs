use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors; any of these aborts the run before charts are written.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("File not found at {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error reading CSV file at {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error(
        "Missing one of the required project/task columns: {}. At least one must be present.",
        .candidates.join(", ")
    )]
    MissingLabelColumn { candidates: Vec<String> },

    #[error("CSV file at {} is empty: {reason}", .path.display())]
    EmptyDataset { path: PathBuf, reason: String },

    #[error("Invalid value '{value}' for {option}: expected {expected}")]
    InvalidOption {
        option: String,
        value: String,
        expected: String,
    },

    #[error("Failed to render chart {}: {message}", .path.display())]
    Chart { path: PathBuf, message: String },
}

/// A single rejected input row. Rows are skipped, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("line {line}: invalid date '{value}'")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error("line {line}: negative duration '{value}'")]
    NegativeDuration { line: u64, value: String },

    #[error("line {line}: value '{value}' in column '{column}' would overflow the totals")]
    OutOfRange {
        line: u64,
        column: String,
        value: String,
    },

    #[error("line {line}: malformed record: {reason}")]
    Malformed { line: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
