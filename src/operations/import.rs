use super::csv_source::{CsvTable, parse_date, parse_decimal};
use crate::error::{AnalyzerError, Result, RowError};
use crate::models::rule::CategoryRules;
use crate::models::transaction::Transaction;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info, warn};

/// Share of blank categories above which the whole column is re-inferred.
pub const INFERENCE_THRESHOLD: f64 = 0.7;

const REQUIRED_COLUMNS: [&str; 3] = ["Date", "Description", "Amount"];
const CATEGORY_COLUMN: &str = "Category";
const TYPE_COLUMN: &str = "Type";

#[derive(Debug)]
pub struct FinanceDataset {
    pub transactions: Vec<Transaction>,
    /// Every category came from the keyword table, not from the file.
    pub categories_inferred: bool,
    pub has_type_column: bool,
    pub rejected: Vec<RowError>,
}

pub fn load_transactions(path: &Path, rules: &CategoryRules) -> Result<FinanceDataset> {
    let table = CsvTable::read(path)?;
    let columns = table.require_columns(&REQUIRED_COLUMNS)?;
    let (date_idx, description_idx, amount_idx) = (columns[0], columns[1], columns[2]);
    let category_idx = table.column(CATEGORY_COLUMN);

    let has_type_column = table.has_column(TYPE_COLUMN);
    if has_type_column {
        debug!("'{}' column present; amounts keep their sign", TYPE_COLUMN);
    }

    let mut parsed = Vec::new();
    let mut rejected = Vec::new();
    // every income, expense, category and monthly total is bounded by this
    let mut magnitude = Decimal::ZERO;
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

        let raw_amount = row.get(amount_idx);
        let Some(amount) = parse_decimal(raw_amount) else {
            reject(
                &mut rejected,
                RowError::InvalidNumber {
                    line: row.line,
                    column: REQUIRED_COLUMNS[2].to_string(),
                    value: raw_amount.to_string(),
                },
            );
            continue;
        };

        let Some(next_magnitude) = magnitude.checked_add(amount.abs()) else {
            reject(
                &mut rejected,
                RowError::OutOfRange {
                    line: row.line,
                    column: REQUIRED_COLUMNS[2].to_string(),
                    value: raw_amount.to_string(),
                },
            );
            continue;
        };
        magnitude = next_magnitude;

        let category = row.get_opt(category_idx).map(str::to_string);
        parsed.push((
            Transaction::new(date, row.get(description_idx).to_string(), amount, String::new()),
            category,
        ));
    }

    if parsed.is_empty() {
        return Err(AnalyzerError::EmptyDataset {
            path: path.to_path_buf(),
            reason: format!("no valid rows ({} rejected)", rejected.len()),
        });
    }

    let blank = parsed.iter().filter(|(_, category)| category.is_none()).count();
    let categories_inferred =
        category_idx.is_none() || blank as f64 > INFERENCE_THRESHOLD * parsed.len() as f64;
    if categories_inferred {
        info!(
            "'{}' column is missing or largely empty. Inferring categories from 'Description'.",
            CATEGORY_COLUMN
        );
    }

    let transactions: Vec<Transaction> = parsed
        .into_iter()
        .map(|(mut transaction, category)| {
            transaction.category = match category {
                Some(category) if !categories_inferred => category,
                _ => rules.infer(&transaction.description, transaction.amount),
            };
            transaction
        })
        .collect();

    rejected.extend(table.into_rejected());
    debug!(
        loaded = transactions.len(),
        rejected = rejected.len(),
        categories_inferred,
        "Loaded transactions"
    );

    Ok(FinanceDataset {
        transactions,
        categories_inferred,
        has_type_column,
        rejected,
    })
}

fn reject(rejected: &mut Vec<RowError>, error: RowError) {
    warn!("Skipping row: {}", error);
    rejected.push(error);
}
