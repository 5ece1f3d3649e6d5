//! Buckets income and expense totals into the twelve calendar months.

use serde::Serialize;

use crate::{
    aggregation::{
        amount::AmountSum,
        calendar::{MONTH_LABELS, month_index},
        record::Record,
    },
    transaction::TransactionKind,
};

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthFlow {
    /// Short month name, e.g. "Jan".
    pub month_label: &'static str,
    /// Sum of income amounts dated in this month.
    pub income: f64,
    /// Sum of expense amounts dated in this month.
    pub expense: f64,
}

/// The month-flow series: one entry per calendar month, January first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFlow {
    /// Always twelve entries, in calendar order.
    pub months: [MonthFlow; 12],
    /// Number of records left out because they had no usable date.
    pub skipped: usize,
}

impl MonthlyFlow {
    /// Total income across all twelve months.
    pub fn total_income(&self) -> f64 {
        self.months
            .iter()
            .map(|month| month.income)
            .sum::<AmountSum>()
            .to_f64()
    }

    /// Total expense across all twelve months.
    pub fn total_expense(&self) -> f64 {
        self.months
            .iter()
            .map(|month| month.expense)
            .sum::<AmountSum>()
            .to_f64()
    }
}

/// Sums record amounts into twelve month buckets by the month of their date.
///
/// The year is ignored, so records from different years that share a month
/// share a bucket. Records without a date are skipped and counted in
/// [MonthlyFlow::skipped]. Totals are not rounded.
pub fn compute_monthly_flow(records: &[Record]) -> MonthlyFlow {
    let mut income = [AmountSum::default(); 12];
    let mut expense = [AmountSum::default(); 12];
    let mut skipped = 0;

    for record in records {
        let Some(month) = record.month() else {
            skipped += 1;
            continue;
        };

        let index = month_index(month);

        match record.kind {
            TransactionKind::Income => income[index] += record.amount,
            TransactionKind::Expense => expense[index] += record.amount,
        }
    }

    let flow = MonthlyFlow {
        months: std::array::from_fn(|index| MonthFlow {
            month_label: MONTH_LABELS[index],
            income: income[index].to_f64(),
            expense: expense[index].to_f64(),
        }),
        skipped,
    };

    if flow.skipped > 0 {
        tracing::debug!(
            "left {} undated records out of the monthly flow",
            flow.skipped
        );
    }

    flow
}
