//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations from the aggregated views:
//! - **Monthly Flow Chart**: income and expense lines for each calendar month
//! - **Expenses by Category**: donut chart of the category breakdown
//! - **Income by Source**: donut chart of the source breakdown
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, LineStyle,
        Tooltip, Trigger,
    },
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{BreakdownEntry, MonthlyFlow},
    html::HeadElement,
};

const INCOME_COLOR: &str = "#16a34a";
const EXPENSE_COLOR: &str = "#dc2626";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// Shown above the "No data" note when there is nothing to plot.
    pub title: &'static str,
    /// The ECharts configuration as a JSON string, `None` if there is no data.
    pub options: Option<String>,
}

impl DashboardChart {
    pub(super) fn new(id: &'static str, title: &'static str, chart: Option<Chart>) -> Self {
        Self {
            id,
            title,
            options: chart.map(|chart| chart.to_string()),
        }
    }
}

/// Renders the HTML containers for dashboard charts.
///
/// Charts without data get a short note instead of an empty canvas.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    @if chart.options.is_some() {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    } @else {
                        div
                            id=(chart.id)
                            data-no-data="true"
                            class="min-h-[380px] rounded border border-gray-200
                                dark:border-gray-700 flex flex-col items-center justify-center"
                        {
                            h3 class="text-lg font-semibold" { (chart.title) }
                            p class="text-gray-500 dark:text-gray-400" { "No data" }
                        }
                    }
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing. Charts without data are skipped.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .filter_map(|chart| chart.options.as_ref().map(|options| (chart.id, options)))
        .map(|(id, options)| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{id}");
                    const chart = echarts.init(chartDom);
                    const option = {options};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Income and expense lines over the twelve calendar months.
pub(super) fn monthly_flow_chart(flow: &MonthlyFlow) -> Chart {
    let labels: Vec<&str> = flow.months.iter().map(|month| month.month_label).collect();
    let income: Vec<f64> = flow.months.iter().map(|month| month.income).collect();
    let expense: Vec<f64> = flow.months.iter().map(|month| month.expense).collect();

    Chart::new()
        .title(Title::new().text("Monthly Flow").subtext("Income and expenses per month"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .line_style(LineStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            Line::new()
                .name("Expense")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .line_style(LineStyle::new().color(EXPENSE_COLOR))
                .data(expense),
        )
}

/// A donut chart of `entries`, or `None` when there is nothing to plot.
pub(super) fn breakdown_chart(title: &str, entries: &[BreakdownEntry]) -> Option<Chart> {
    if entries.is_empty() {
        return None;
    }

    let data: Vec<(f64, String)> = entries
        .iter()
        .map(|entry| (entry.total, entry.label.clone()))
        .collect();

    Some(
        Chart::new()
            .title(Title::new().text(title))
            .tooltip(
                Tooltip::new()
                    .trigger(Trigger::Item)
                    .value_formatter(currency_formatter()),
            )
            .legend(Legend::new().bottom("1%"))
            .series(
                Pie::new()
                    .name(title)
                    .radius(vec!["40%", "70%"])
                    .data(data),
            ),
    )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
