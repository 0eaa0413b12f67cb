pub mod aggregate;
pub mod chart;
pub mod csv_source;
pub mod finance_summary;
pub mod import;
pub mod import_time;
pub mod report;
pub mod time_summary;
