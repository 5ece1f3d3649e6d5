//! Income, expense and balance totals for a single calendar month.

use serde::Serialize;
use time::Month;

use crate::{
    aggregation::{amount::AmountSum, record::Record},
    transaction::TransactionKind,
};

/// Totals for the selected month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthSummary {
    /// Sum of income amounts dated in the month.
    pub income: f64,
    /// Sum of expense amounts dated in the month.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Sums the income and expense of records dated in `month` of any year.
///
/// Records without a date never match.
pub fn compute_month_summary(records: &[Record], month: Month) -> MonthSummary {
    let mut income = AmountSum::default();
    let mut expense = AmountSum::default();

    for record in records.iter().filter(|record| record.month() == Some(month)) {
        match record.kind {
            TransactionKind::Income => income += record.amount,
            TransactionKind::Expense => expense += record.amount,
        }
    }

    MonthSummary {
        income: income.to_f64(),
        expense: expense.to_f64(),
        balance: (income - expense).to_f64(),
    }
}
