//! Groups record amounts by a label field: expenses by category and income by source.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    aggregation::{amount::AmountSum, record::Record},
    transaction::TransactionKind,
};

/// The label used for income records that have no source.
pub const OTHER_SOURCE_LABEL: &str = "Outros";

/// The total for one label of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    /// The category or source name.
    pub label: String,
    /// The summed amount, rounded to two decimal places.
    pub total: f64,
}

/// Sums expense amounts per category.
///
/// Categories are compared verbatim, so "Food" and "food" are separate
/// entries and an empty category is its own entry. Entries appear in the
/// order their category was first seen.
pub fn compute_category_breakdown(records: &[Record]) -> Vec<BreakdownEntry> {
    group_totals(
        records
            .iter()
            .filter(|record| record.kind == TransactionKind::Expense)
            .map(|record| (record.category.as_str(), record.amount)),
    )
}

/// Sums income amounts per source.
///
/// Income without a source is grouped under [OTHER_SOURCE_LABEL]. Entries
/// appear in the order their source was first seen.
pub fn compute_source_breakdown(records: &[Record]) -> Vec<BreakdownEntry> {
    group_totals(
        records
            .iter()
            .filter(|record| record.kind == TransactionKind::Income)
            .map(|record| (source_label(&record.source), record.amount)),
    )
}

fn source_label(source: &str) -> &str {
    if source.is_empty() {
        OTHER_SOURCE_LABEL
    } else {
        source
    }
}

fn group_totals<'a>(amounts: impl Iterator<Item = (&'a str, f64)>) -> Vec<BreakdownEntry> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, AmountSum)> = Vec::new();

    for (label, amount) in amounts {
        let position = *positions.entry(label).or_insert_with(|| {
            totals.push((label, AmountSum::default()));
            totals.len() - 1
        });
        totals[position].1 += amount;
    }

    totals
        .into_iter()
        .map(|(label, total)| BreakdownEntry {
            label: label.to_owned(),
            total: total.to_cents(),
        })
        .collect()
}

/// Round `value` to two decimal places, halves away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    AmountSum::from(value).to_cents()
}
