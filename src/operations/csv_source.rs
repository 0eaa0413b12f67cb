use crate::error::{AnalyzerError, Result, RowError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug)]
pub struct CsvRow {
    pub line: u64,
    record: StringRecord,
}

impl CsvRow {
    /// Trimmed cell value; cells missing from a short row read as "".
    pub fn get(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or("")
    }

    pub fn get_opt(&self, index: Option<usize>) -> Option<&str> {
        index.map(|i| self.get(i)).filter(|value| !value.is_empty())
    }
}

/// A CSV file read fully into memory, with its header row.
#[derive(Debug)]
pub struct CsvTable {
    headers: StringRecord,
    rows: Vec<CsvRow>,
    rejected: Vec<RowError>,
}

impl CsvTable {
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AnalyzerError::FileNotFound(path.to_path_buf()),
            _ => AnalyzerError::Unreadable {
                path: path.to_path_buf(),
                source: e.into(),
            },
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| AnalyzerError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            })?
            .clone();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(AnalyzerError::EmptyDataset {
                path: path.to_path_buf(),
                reason: "no header row".to_string(),
            });
        }

        let mut rows = Vec::new();
        let mut rejected = Vec::new();
        for (index, result) in reader.records().enumerate() {
            // header is line 1
            let fallback_line = index as u64 + 2;
            match result {
                Ok(record) => {
                    let line = record.position().map_or(fallback_line, |p| p.line());
                    rows.push(CsvRow { line, record });
                }
                Err(e) if e.is_io_error() => {
                    return Err(AnalyzerError::Unreadable {
                        path: path.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    let line = e.position().map_or(fallback_line, |p| p.line());
                    let row_error = RowError::Malformed {
                        line,
                        reason: e.to_string(),
                    };
                    warn!("Skipping row: {}", row_error);
                    rejected.push(row_error);
                }
            }
        }

        if rows.is_empty() && rejected.is_empty() {
            return Err(AnalyzerError::EmptyDataset {
                path: path.to_path_buf(),
                reason: "no data rows".to_string(),
            });
        }

        debug!(path = %path.display(), rows = rows.len(), "Read CSV table");
        Ok(Self {
            headers,
            rows,
            rejected,
        })
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Indices of `names`, or a single error naming every missing column.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AnalyzerError::MissingColumns { columns: missing });
        }
        Ok(names.iter().filter_map(|name| self.column(name)).collect())
    }

    pub fn rows(&self) -> &[CsvRow] {
        &self.rows
    }

    pub fn into_rejected(self) -> Vec<RowError> {
        self.rejected
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_csv(contents: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().expect("Failed to create temp file");
        write!(tmp, "{}", contents).expect("Failed to write test CSV");
        tmp
    }

    #[test]
    fn test_read_table_trims_cells_and_tracks_lines() {
        let tmp = write_temp_csv("Date , Amount\n 2024-01-05 , -50 \n2024-01-06,10\n");
        let table = CsvTable::read(tmp.path()).unwrap();

        assert_eq!(table.column("Date"), Some(0));
        assert_eq!(table.column("Amount"), Some(1));
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].get(0), "2024-01-05");
        assert_eq!(table.rows()[0].get(1), "-50");
        assert_eq!(table.rows()[0].line, 2);
        assert_eq!(table.rows()[1].line, 3);
    }

    #[test]
    fn test_read_table_tolerates_short_rows() {
        let tmp = write_temp_csv("Date,Description,Amount\n2024-01-05,Coffee\n");
        let table = CsvTable::read(tmp.path()).unwrap();

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].get(2), "");
        assert_eq!(table.rows()[0].get_opt(Some(2)), None);
        assert_eq!(table.rows()[0].get_opt(None), None);
        assert_eq!(table.rows()[0].get_opt(Some(1)), Some("Coffee"));
    }

    #[test_log::test]
    fn test_read_table_skips_row_that_is_not_utf8() {
        let mut tmp = NamedTempFile::new().expect("Failed to create temp file");
        tmp.write_all(b"Date,Description,Amount\n2024-01-05,caf\xff,-3\n2024-01-06,Tea,-2\n")
            .expect("Failed to write test CSV");

        let table = CsvTable::read(tmp.path()).unwrap();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].line, 3);
        assert_eq!(table.rows()[0].get(1), "Tea");

        let rejected = table.into_rejected();
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0], RowError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = CsvTable::read(Path::new("definitely/not/here.csv"));
        assert!(matches!(result, Err(AnalyzerError::FileNotFound(_))));
    }

    #[test]
    fn test_read_empty_file() {
        let tmp = write_temp_csv("");
        let result = CsvTable::read(tmp.path());
        assert!(matches!(result, Err(AnalyzerError::EmptyDataset { .. })));
    }

    #[test]
    fn test_read_header_only_file() {
        let tmp = write_temp_csv("Date,Description,Amount\n");
        let result = CsvTable::read(tmp.path());
        assert!(matches!(result, Err(AnalyzerError::EmptyDataset { .. })));
    }

    #[test]
    fn test_require_columns_reports_every_missing_column() {
        let tmp = write_temp_csv("Date,Notes\n2024-01-05,x\n");
        let table = CsvTable::read(tmp.path()).unwrap();

        match table.require_columns(&["Date", "Description", "Amount"]) {
            Err(AnalyzerError::MissingColumns { columns }) => {
                assert_eq!(columns, vec!["Description", "Amount"]);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(table.require_columns(&["Notes", "Date"]).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        for value in [
            "2024-01-05",
            "2024/01/05",
            "01/05/2024",
            "05.01.2024",
            "2024-01-05 13:45:00",
            "2024-01-05 13:45",
            "2024-01-05T13:45:00",
            "2024-01-05T13:45:00+02:00",
        ] {
            assert_eq!(parse_date(value), Some(expected), "format {}", value);
        }
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("-50.25"), Some(Decimal::new(-5025, 2)));
        assert_eq!(parse_decimal(" 2000 "), Some(Decimal::new(2000, 0)));
        assert_eq!(parse_decimal("1.5e2"), Some(Decimal::new(150, 0)));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
    }
}
