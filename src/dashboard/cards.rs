//! Card components for the selected month's summary.

use maud::{Markup, html};

use crate::{aggregation::MonthSummary, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-2";
const GREEN_TEXT_STYLE: &str = "text-green-600 dark:text-green-400";
const RED_TEXT_STYLE: &str = "text-red-600 dark:text-red-400";

/// Green for zero or more, red for less than zero.
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        GREEN_TEXT_STYLE
    } else {
        RED_TEXT_STYLE
    }
}

fn summary_card(id: &str, title: &str, amount: f64, color_class: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class={ "text-2xl font-bold " (color_class) } { (format_currency(amount)) }
        }
    }
}

/// Renders the income, expense and balance cards for `month_name`.
pub(super) fn summary_cards_view(summary: &MonthSummary, month_name: &str) -> Markup {
    html! {
        section class="w-full mx-auto mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Summary" }
                span class="text-sm text-gray-600 dark:text-gray-400" { (month_name) }
            }

            div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
            {
                (summary_card("summary-income", "Income", summary.income, GREEN_TEXT_STYLE))
                (summary_card("summary-expense", "Expenses", summary.expense, RED_TEXT_STYLE))
                (summary_card(
                    "summary-balance",
                    "Balance",
                    summary.balance,
                    amount_color_class(summary.balance),
                ))
            }
        }
    }
}
