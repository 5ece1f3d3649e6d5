//! The transaction aggregation engine.
//!
//! Turns an unordered slice of [Record]s into the views shown on the
//! dashboard:
//! - [compute_monthly_flow]: income and expense per calendar month
//! - [compute_category_breakdown]: expense totals per category
//! - [compute_source_breakdown]: income totals per source
//! - [compute_month_summary]: income, expense and balance for one month
//!
//! Every function here is pure. Inputs are borrowed and nothing is cached
//! between calls, so the views are recomputed from scratch on each request.

mod amount;
mod breakdown;
mod calendar;
mod month_flow;
mod record;
mod summary;

pub use amount::AmountSum;
pub use breakdown::{
    BreakdownEntry, OTHER_SOURCE_LABEL, compute_category_breakdown, compute_source_breakdown,
    round_to_cents,
};
pub use calendar::{MONTH_LABELS, month_from_index, month_index, month_label};
pub use month_flow::{MonthFlow, MonthlyFlow, compute_monthly_flow};
pub use record::{NormalizedRecords, Record, RecordAnomaly, ShapeError, parse_date, parse_records};
pub use summary::{MonthSummary, compute_month_summary};

use serde::Serialize;
use time::Month;

/// All four dashboard views computed over the same records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViews {
    /// The month the summary was computed for, as a zero-based index.
    pub selected_month: usize,
    /// Income and expense for each calendar month.
    pub monthly_flow: MonthlyFlow,
    /// Expense totals per category.
    pub category_breakdown: Vec<BreakdownEntry>,
    /// Income totals per source.
    pub source_breakdown: Vec<BreakdownEntry>,
    /// Totals for `selected_month`.
    pub summary: MonthSummary,
}

/// Compute every dashboard view over `records`, summarising `month`.
pub fn compute_dashboard_views(records: &[Record], month: Month) -> DashboardViews {
    DashboardViews {
        selected_month: month_index(month),
        monthly_flow: compute_monthly_flow(records),
        category_breakdown: compute_category_breakdown(records),
        source_breakdown: compute_source_breakdown(records),
        summary: compute_month_summary(records, month),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::{Month, macros::date};

    use crate::transaction::TransactionKind;

    use super::{
        BreakdownEntry, DashboardViews, MonthSummary, OTHER_SOURCE_LABEL, Record,
        compute_category_breakdown, compute_dashboard_views, parse_records,
    };

    fn sample_records() -> Vec<Record> {
        let record = |kind, amount, date, category: &str, source: &str| Record {
            kind,
            amount,
            date,
            category: category.to_owned(),
            source: source.to_owned(),
        };

        vec![
            record(TransactionKind::Income, 0.1, Some(date!(2026 - 01 - 05)), "", "Salary"),
            record(TransactionKind::Income, 0.2, Some(date!(2026 - 01 - 20)), "", ""),
            record(TransactionKind::Income, 0.3, Some(date!(2025 - 02 - 01)), "", "Salary"),
            record(TransactionKind::Expense, 3.533, Some(date!(2026 - 01 - 10)), "Food", ""),
            record(TransactionKind::Expense, 4.219, Some(date!(2026 - 03 - 14)), "Food", ""),
            record(TransactionKind::Expense, 0.153, Some(date!(2026 - 12 - 31)), "Food", ""),
            record(TransactionKind::Expense, 7.5, None, "Rent", ""),
        ]
    }

    /// Every ordering of `items`, generated with Heap's algorithm.
    fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
        fn generate<T: Clone>(k: usize, items: &mut Vec<T>, out: &mut Vec<Vec<T>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }

            for i in 0..k - 1 {
                generate(k - 1, items, out);
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
            }
            generate(k - 1, items, out);
        }

        let mut items = items.to_vec();
        let mut out = Vec::new();
        generate(items.len(), &mut items, &mut out);
        out
    }

    fn sorted(mut entries: Vec<BreakdownEntry>) -> Vec<(String, f64)> {
        entries.sort_by(|a, b| a.label.cmp(&b.label));
        entries
            .into_iter()
            .map(|entry| (entry.label, entry.total))
            .collect()
    }

    #[track_caller]
    fn assert_same_totals(got: &DashboardViews, want: &DashboardViews) {
        assert_eq!(got.monthly_flow, want.monthly_flow);
        assert_eq!(got.summary, want.summary);
        assert_eq!(
            sorted(got.category_breakdown.clone()),
            sorted(want.category_breakdown.clone())
        );
        assert_eq!(
            sorted(got.source_breakdown.clone()),
            sorted(want.source_breakdown.clone())
        );
    }

    #[test]
    fn views_do_not_depend_on_record_order() {
        let records = sample_records();
        let want = compute_dashboard_views(&records, Month::January);

        let orderings = permutations(&records);
        assert_eq!(orderings.len(), 5040);

        for ordering in orderings {
            assert_same_totals(&compute_dashboard_views(&ordering, Month::January), &want);
        }
    }

    #[test]
    fn decimal_amounts_sum_to_their_exact_totals() {
        let views = compute_dashboard_views(&sample_records(), Month::January);

        assert_eq!(views.monthly_flow.months[0].income, 0.3);
        assert_eq!(views.monthly_flow.months[0].expense, 3.533);
        assert_eq!(
            views.summary,
            MonthSummary {
                income: 0.3,
                expense: 3.533,
                balance: -3.233,
            }
        );
        assert_eq!(
            sorted(views.category_breakdown),
            vec![("Food".to_owned(), 7.91), ("Rent".to_owned(), 7.5)]
        );
        assert_eq!(
            sorted(views.source_breakdown),
            vec![
                (OTHER_SOURCE_LABEL.to_owned(), 0.2),
                ("Salary".to_owned(), 0.4)
            ]
        );
    }

    #[test]
    fn breakdown_rounding_does_not_depend_on_record_order() {
        let food = |amount| Record {
            kind: TransactionKind::Expense,
            amount,
            date: None,
            category: "Food".to_owned(),
            source: String::new(),
        };
        let records = vec![food(3.533), food(4.219), food(0.153)];

        for ordering in permutations(&records) {
            let breakdown = compute_category_breakdown(&ordering);
            assert_eq!(breakdown.len(), 1);
            assert_eq!(breakdown[0].total, 7.91, "ordering {ordering:?}");
        }
    }

    #[test]
    fn monthly_flow_partitions_every_dated_amount() {
        let views = compute_dashboard_views(&sample_records(), Month::January);

        assert_eq!(views.monthly_flow.months.len(), 12);
        assert_eq!(views.monthly_flow.total_income(), 0.6);
        assert_eq!(views.monthly_flow.total_expense(), 7.905);
        assert_eq!(views.monthly_flow.skipped, 1);
        assert_eq!(views.monthly_flow.months[1].income, 0.3);
        assert_eq!(views.monthly_flow.months[2].expense, 4.219);
        assert_eq!(views.monthly_flow.months[11].expense, 0.153);
    }

    #[test]
    fn summary_and_flow_for_a_single_month() {
        let input = json!([
            {"kind": "income", "amount": 100, "date": "2026-01-15"},
            {"kind": "expense", "amount": 40, "category": "Food", "date": "2026-01-20"},
        ]);
        let normalized = parse_records(&input).unwrap();

        let views = compute_dashboard_views(&normalized.records, Month::January);

        assert_eq!(
            views.summary,
            MonthSummary {
                income: 100.0,
                expense: 40.0,
                balance: 60.0
            }
        );
        assert_eq!(views.monthly_flow.months[0].income, 100.0);
        assert_eq!(views.monthly_flow.months[0].expense, 40.0);
        for month in &views.monthly_flow.months[1..] {
            assert_eq!(month.income, 0.0);
            assert_eq!(month.expense, 0.0);
        }
    }

    #[test]
    fn category_totals_are_rounded_once() {
        let input = json!([
            {"kind": "expense", "amount": 10.005, "category": "Food"},
            {"kind": "expense", "amount": 10.005, "category": "Food"},
        ]);
        let normalized = parse_records(&input).unwrap();

        let views = compute_dashboard_views(&normalized.records, Month::January);

        assert_eq!(
            views.category_breakdown,
            vec![BreakdownEntry {
                label: "Food".to_owned(),
                total: 20.01
            }]
        );
    }

    #[test]
    fn empty_input_yields_zeroed_views() {
        let normalized = parse_records(&json!([])).unwrap();

        let views = compute_dashboard_views(&normalized.records, Month::March);

        assert_eq!(views.selected_month, 2);
        assert_eq!(views.monthly_flow.months.len(), 12);
        assert_eq!(views.monthly_flow.total_income(), 0.0);
        assert_eq!(views.monthly_flow.total_expense(), 0.0);
        assert!(views.category_breakdown.is_empty());
        assert!(views.source_breakdown.is_empty());
        assert_eq!(views.summary, MonthSummary::default());
    }

    #[test]
    fn malformed_amounts_contribute_zero() {
        let input = json!([
            {"kind": "expense", "category": "Food", "date": "2026-04-01"},
            {"kind": "expense", "amount": "abc", "category": "Food", "date": "2026-04-02"},
            {"kind": "expense", "amount": null, "category": "Food", "date": "2026-04-03"},
            {"kind": "expense", "amount": 5, "category": "Food", "date": "2026-04-04"},
        ]);
        let normalized = parse_records(&input).unwrap();

        let views = compute_dashboard_views(&normalized.records, Month::April);

        assert_eq!(views.summary.expense, 5.0);
        assert_eq!(views.monthly_flow.months[3].expense, 5.0);
        assert_eq!(
            views.category_breakdown,
            vec![BreakdownEntry {
                label: "Food".to_owned(),
                total: 5.0
            }]
        );
    }

    #[test]
    fn income_without_source_is_grouped_as_other() {
        let input = json!([
            {"kind": "income", "amount": 10, "source": ""},
            {"kind": "income", "amount": 15},
            {"kind": "income", "amount": 20, "source": "Freelance"},
        ]);
        let normalized = parse_records(&input).unwrap();

        let views = compute_dashboard_views(&normalized.records, Month::January);

        assert_eq!(
            views.source_breakdown,
            vec![
                BreakdownEntry {
                    label: OTHER_SOURCE_LABEL.to_owned(),
                    total: 25.0
                },
                BreakdownEntry {
                    label: "Freelance".to_owned(),
                    total: 20.0
                },
            ]
        );
    }

    #[test]
    fn serializes_views_as_camel_case_json() {
        let views = compute_dashboard_views(&[], Month::January);

        let value = serde_json::to_value(&views).unwrap();

        assert!(value.get("monthlyFlow").is_some());
        assert!(value.get("categoryBreakdown").is_some());
        assert!(value.get("sourceBreakdown").is_some());
        assert_eq!(value["monthlyFlow"]["months"][0]["monthLabel"], "Jan");
        assert_eq!(value["summary"]["balance"], 0.0);
    }
}
