//! Table views for the category and source breakdowns.

use maud::{Markup, html};

use crate::{
    aggregation::BreakdownEntry,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// Renders a two column table of `entries` in the order given.
///
/// Shows a "No data" note when `entries` is empty.
pub(super) fn breakdown_table(
    id: &str,
    title: &str,
    label_header: &str,
    entries: &[BreakdownEntry],
) -> Markup {
    html! {
        div id=(id)
        {
            h3 class="text-xl font-semibold mb-4" { (title) }

            @if entries.is_empty() {
                p class="text-gray-500 dark:text-gray-400" data-no-data="true" { "No data" }
            } @else {
                div class="overflow-x-auto rounded-lg shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { (label_header) }
                                th scope="col" class="px-6 py-3 text-right" { "Total" }
                            }
                        }
                        tbody
                        {
                            @for entry in entries {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    th scope="row" class=(TABLE_CELL_STYLE) { (entry.label) }
                                    td class="px-6 py-4 text-right" { (format_currency(entry.total)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
