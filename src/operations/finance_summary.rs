use super::aggregate::{grand_total, totals_by};
use crate::models::period::month_start;
use crate::models::rule::INCOME_CATEGORY;
use crate::models::transaction::{Transaction, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct FinanceSummary {
    pub total_income: Decimal,
    /// Magnitude of all negative amounts.
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    /// First day of the month.
    pub month: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn summarize_transactions(transactions: &[Transaction]) -> FinanceSummary {
    let total_income = grand_total(
        transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| &t.amount),
    );
    let expenses: Vec<Decimal> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount.abs())
        .collect();
    let total_expenses = grand_total(&expenses);

    FinanceSummary {
        total_income,
        total_expenses,
        net_savings: total_income.saturating_sub(total_expenses),
        transaction_count: transactions.len(),
    }
}

/// Signed total per category across income and spending.
pub fn category_totals(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    totals_by(transactions, |t| t.category.as_str(), |t| t.amount)
}

/// Spending per category as positive amounts, without the income category.
pub fn spending_by_category(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let expenses: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense() && !t.category.eq_ignore_ascii_case(INCOME_CATEGORY))
        .collect();
    totals_by(&expenses, |t| t.category.as_str(), |t| t.amount.abs())
}

/// Months that have at least one transaction, oldest first.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for transaction in transactions {
        let entry = months
            .entry(month_start(transaction.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match transaction.transaction_type() {
            TransactionType::Income => entry.0 = entry.0.saturating_add(transaction.amount),
            TransactionType::Expense => {
                entry.1 = entry.1.saturating_add(transaction.amount.abs())
            }
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyTotals {
            month,
            income,
            expenses,
            net: income.saturating_sub(expenses),
        })
        .collect()
}
