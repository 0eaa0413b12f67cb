use super::csv_source::{CsvTable, parse_date, parse_decimal};
use crate::error::{AnalyzerError, Result, RowError};
use crate::models::time_entry::TimeEntry;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info, warn};

const REQUIRED_COLUMNS: [&str; 2] = ["Date", "Duration"];
const LABEL_COLUMNS: [&str; 2] = ["Project", "Task"];
const CATEGORY_COLUMN: &str = "Category";
const NOTES_COLUMN: &str = "Notes";
pub const UNSPECIFIED_GROUP: &str = "Unspecified";

#[derive(Debug)]
pub struct TimeDataset {
    pub entries: Vec<TimeEntry>,
    /// `Project`, or `Task` when there is no project column.
    pub label_column: String,
    /// Column the allocation breakdown is grouped by.
    pub group_column: String,
    pub rejected: Vec<RowError>,
}

pub fn load_time_entries(path: &Path, group_by: Option<&str>) -> Result<TimeDataset> {
    let table = CsvTable::read(path)?;
    let columns = table.require_columns(&REQUIRED_COLUMNS)?;
    let (date_idx, duration_idx) = (columns[0], columns[1]);

    let (label_column, label_idx) = LABEL_COLUMNS
        .iter()
        .find_map(|name| table.column(name).map(|idx| (name.to_string(), idx)))
        .ok_or_else(|| AnalyzerError::MissingLabelColumn {
            candidates: LABEL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        })?;

    let (group_column, group_idx) = match group_by {
        Some(requested) => match table.column(requested) {
            Some(idx) => (requested.to_string(), idx),
            None => {
                warn!(
                    "Specified group_by column '{}' not found. Defaulting to '{}'.",
                    requested, label_column
                );
                (label_column.clone(), label_idx)
            }
        },
        None => (label_column.clone(), label_idx),
    };

    let category_idx = table.column(CATEGORY_COLUMN);
    let notes_idx = table.column(NOTES_COLUMN);
    info!("Assuming 'Duration' column is in hours.");

    let mut entries = Vec::new();
    let mut rejected = Vec::new();
    let mut total_hours = Decimal::ZERO;
    for row in table.rows() {
        let raw_date = row.get(date_idx);
        let Some(date) = parse_date(raw_date) else {
            reject(
                &mut rejected,
                RowError::InvalidDate {
                    line: row.line,
                    value: raw_date.to_string(),
                },
            );
            continue;
        };

        let raw_duration = row.get(duration_idx);
        let duration_hours = match parse_decimal(raw_duration) {
            Some(hours) if hours < Decimal::ZERO => {
                reject(
                    &mut rejected,
                    RowError::NegativeDuration {
                        line: row.line,
                        value: raw_duration.to_string(),
                    },
                );
                continue;
            }
            Some(hours) => hours,
            None => {
                reject(
                    &mut rejected,
                    RowError::InvalidNumber {
                        line: row.line,
                        column: REQUIRED_COLUMNS[1].to_string(),
                        value: raw_duration.to_string(),
                    },
                );
                continue;
            }
        };

        let Some(next_total) = total_hours.checked_add(duration_hours) else {
            reject(
                &mut rejected,
                RowError::OutOfRange {
                    line: row.line,
                    column: REQUIRED_COLUMNS[1].to_string(),
                    value: raw_duration.to_string(),
                },
            );
            continue;
        };
        total_hours = next_total;

        entries.push(TimeEntry {
            date,
            label: row.get(label_idx).to_string(),
            duration_hours,
            category: row.get_opt(category_idx).map(str::to_string),
            notes: row.get_opt(notes_idx).map(str::to_string),
            group: row
                .get_opt(Some(group_idx))
                .unwrap_or(UNSPECIFIED_GROUP)
                .to_string(),
        });
    }

    if entries.is_empty() {
        return Err(AnalyzerError::EmptyDataset {
            path: path.to_path_buf(),
            reason: format!(
                "no valid data remaining after conversion errors ({} rejected)",
                rejected.len()
            ),
        });
    }

    rejected.extend(table.into_rejected());
    debug!(
        loaded = entries.len(),
        rejected = rejected.len(),
        label_column = %label_column,
        group_column = %group_column,
        "Loaded time entries"
    );

    Ok(TimeDataset {
        entries,
        label_column,
        group_column,
        rejected,
    })
}

fn reject(rejected: &mut Vec<RowError>, error: RowError) {
    warn!("Skipping row: {}", error);
    rejected.push(error);
}
