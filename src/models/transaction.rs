use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

/// One normalized row of a bank statement export.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: String, amount: Decimal, category: String) -> Self {
        Self {
            date,
            description,
            amount,
            category,
        }
    }

    /// Positive amounts are income; everything else is treated as spending.
    pub fn transaction_type(&self) -> TransactionType {
        if self.amount > Decimal::ZERO {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}
