//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page
//! - The JSON endpoints for the dashboard views and ad-hoc aggregation
//! - HTML view functions for rendering the dashboard UI

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Month;

use crate::{
    AppState, Error,
    aggregation::{
        DashboardViews, MONTH_LABELS, Record, RecordAnomaly, compute_dashboard_views,
        month_from_index, month_index, parse_records,
    },
    dashboard::{
        cards::summary_cards_view,
        charts::{DashboardChart, breakdown_chart, charts_script, charts_view, monthly_flow_chart},
        tables::breakdown_table,
    },
    endpoints,
    html::{HeadElement, LINK_STYLE, base, link},
    navigation::NavBar,
    timezone::local_today,
    transaction::{TransactionFilter, list_transactions},
};

const SELECTED_LINK_STYLE: &str = "font-semibold text-gray-900 underline dark:text-white";

/// The state needed for the dashboard page and endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard.
///
/// `month` is a zero-based month index and defaults to the current local
/// month. `year` narrows the records to a single year, all years are folded
/// together when it is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl DashboardQuery {
    fn to_url(self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
            Ok(_) => endpoints::DASHBOARD_VIEW.to_owned(),
            Err(error) => {
                tracing::error!("could not encode dashboard query {self:?}: {error}");
                endpoints::DASHBOARD_VIEW.to_owned()
            }
        }
    }
}

/// The query parameters for ad-hoc aggregation.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AggregateQuery {
    pub month: Option<u8>,
}

/// The dashboard views over the posted records and what was wrong with them.
#[derive(Debug, Serialize)]
struct AggregateResponse {
    #[serde(flatten)]
    views: DashboardViews,
    anomalies: Vec<RecordAnomaly>,
}

/// Resolve the zero-based month index, defaulting to the current local month.
fn resolve_month(index: Option<u8>, local_timezone: &str) -> Result<Month, Error> {
    match index {
        Some(index) => month_from_index(index).ok_or(Error::InvalidMonthIndex(index)),
        None => Ok(local_today(local_timezone)?.month()),
    }
}

/// A snapshot of the stored transactions as engine records.
///
/// Returns the records dated in `year` (all records if `None`) and every
/// year that has records, most recent first.
fn load_records(
    year: Option<i32>,
    connection: &Connection,
) -> Result<(Vec<Record>, Vec<i32>), Error> {
    let records: Vec<Record> = list_transactions(&TransactionFilter::default(), connection)
        .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?
        .iter()
        .map(Record::from)
        .collect();

    let mut years: Vec<i32> = records.iter().filter_map(Record::year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    let records = match year {
        Some(year) => records
            .into_iter()
            .filter(|record| record.year() == Some(year))
            .collect(),
        None => records,
    };

    Ok((records, years))
}

fn compute_stored_views(
    state: &DashboardState,
    query: DashboardQuery,
) -> Result<(DashboardViews, Month, Vec<i32>, usize), Error> {
    let month = resolve_month(query.month, &state.local_timezone)?;

    let (records, years) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        load_records(query.year, &connection)?
    };

    Ok((compute_dashboard_views(&records, month), month, years, records.len()))
}

/// Display a page with the monthly flow, breakdowns and the selected month's summary.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let (views, month, years, record_count) = compute_stored_views(&state, query)?;

    if record_count == 0 && query.year.is_none() {
        return Ok(dashboard_no_data_view().into_response());
    }

    Ok(dashboard_view(&views, month, query.year, &years).into_response())
}

/// The dashboard views over the stored transactions as JSON.
pub async fn get_dashboard_json(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    compute_stored_views(&state, query)
        .map(|(views, ..)| Json(views).into_response())
        .unwrap_or_else(Error::into_json_response)
}

/// Aggregate the records in the request body without storing them.
///
/// Malformed fields are defaulted and reported in `anomalies`. A body that is
/// not an array of objects is rejected with 400 Bad Request.
pub async fn aggregate_endpoint(
    State(state): State<DashboardState>,
    Query(query): Query<AggregateQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let result = resolve_month(query.month, &state.local_timezone).and_then(|month| {
        let Json(body) = body?;
        let normalized = parse_records(&body)?;

        Ok(AggregateResponse {
            views: compute_dashboard_views(&normalized.records, month),
            anomalies: normalized.anomalies,
        })
    });

    match result {
        Ok(response) => Json(response).into_response(),
        Err(error) => {
            tracing::debug!("rejected aggregation request: {error}");
            error.into_json_response()
        }
    }
}

fn dashboard_url(month: usize, year: Option<i32>) -> String {
    DashboardQuery {
        month: u8::try_from(month).ok(),
        year,
    }
    .to_url()
}

fn month_selector(selected: Month, year: Option<i32>, years: &[i32]) -> Markup {
    let selected_index = month_index(selected);

    html! {
        nav id="month-selector" class="w-full mb-6 flex flex-col gap-2 text-sm"
        {
            div class="flex flex-wrap gap-3"
            {
                @for (index, label) in MONTH_LABELS.iter().enumerate() {
                    @if index == selected_index {
                        a
                            href=(dashboard_url(index, year))
                            class=(SELECTED_LINK_STYLE)
                            aria-current="page"
                        {
                            (label)
                        }
                    } @else {
                        a href=(dashboard_url(index, year)) class=(LINK_STYLE) { (label) }
                    }
                }
            }

            @if !years.is_empty() {
                div class="flex flex-wrap gap-3"
                {
                    a
                        href=(dashboard_url(selected_index, None))
                        class=(if year.is_none() { SELECTED_LINK_STYLE } else { LINK_STYLE })
                    {
                        "All years"
                    }

                    @for option in years {
                        a
                            href=(dashboard_url(selected_index, Some(*option)))
                            class=(if year == Some(*option) { SELECTED_LINK_STYLE } else { LINK_STYLE })
                        {
                            (option)
                        }
                    }
                }
            }
        }
    }
}

/// Renders the dashboard page with summary cards, charts and breakdown tables.
fn dashboard_view(
    views: &DashboardViews,
    month: Month,
    year: Option<i32>,
    years: &[i32],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let month_name = match year {
        Some(year) => format!("{month} {year}"),
        None => month.to_string(),
    };

    let charts = [
        DashboardChart::new(
            "monthly-flow-chart",
            "Monthly Flow",
            Some(monthly_flow_chart(&views.monthly_flow)),
        ),
        DashboardChart::new(
            "category-chart",
            "Expenses by Category",
            breakdown_chart("Expenses by Category", &views.category_breakdown),
        ),
        DashboardChart::new(
            "source-chart",
            "Income by Source",
            breakdown_chart("Income by Source", &views.source_breakdown),
        ),
    ];

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (month_selector(month, year, years))

            (summary_cards_view(&views.summary, &month_name))

            (charts_view(&charts))

            @if views.monthly_flow.skipped > 0 {
                p class="w-full mb-4 text-sm text-gray-500 dark:text-gray-400"
                {
                    (views.monthly_flow.skipped) " undated transaction(s) are not shown in the monthly views."
                }
            }

            section class="w-full mx-auto mb-8 grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                (breakdown_table(
                    "category-breakdown",
                    "Expenses by Category",
                    "Category",
                    &views.category_breakdown,
                ))
                (breakdown_table(
                    "source-breakdown",
                    "Income by Source",
                    "Source",
                    &views.source_breakdown,
                ))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders a prompt to record a transaction when there is nothing to show.
fn dashboard_no_data_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "record a transaction");

    let content = html!(
        (nav_bar)

        div
            class="flex flex-col items-center px-6 py-8 mx-auto lg:py-0
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mt-8" { "Nothing here yet" }

            p id="no-data-prompt" class="mt-4"
            {
                "Your dashboard will fill up once you " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Error,
        dashboard::handlers::DashboardState,
        db::initialize,
        test_utils::{assert_valid_html, must_get_text, parse_html_document, parse_json_body},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{
        AggregateQuery, DashboardQuery, aggregate_endpoint, get_dashboard_json, get_dashboard_page,
    };

    fn get_test_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn seed(state: &DashboardState) {
        let conn = state.db_connection.lock().unwrap();
        for transaction in [
            Transaction::build(TransactionKind::Income, 900.0, date!(2024 - 03 - 01), "Pay")
                .source("Salary"),
            Transaction::build(TransactionKind::Expense, 200.0, date!(2024 - 03 - 10), "Shop")
                .category("Food"),
            Transaction::build(TransactionKind::Expense, 50.0, date!(2025 - 03 - 02), "Bus")
                .category("Transport"),
            Transaction::build(TransactionKind::Income, 80.0, date!(2025 - 04 - 20), "Sale"),
        ] {
            create_transaction(transaction, &conn).unwrap();
        }
    }

    fn query(month: Option<u8>, year: Option<i32>) -> Query<DashboardQuery> {
        Query(DashboardQuery { month, year })
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let state = get_test_state();
        seed(&state);

        let response = get_dashboard_page(State(state), query(Some(2), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        for id in [
            "monthly-flow-chart",
            "category-chart",
            "source-chart",
            "summary-income",
            "summary-expense",
            "summary-balance",
            "category-breakdown",
            "source-breakdown",
            "month-selector",
        ] {
            assert_element_exists(&html, id);
        }
        assert_eq!(card_text(&html, "summary-income"), "R$900.00");
        assert_eq!(card_text(&html, "summary-expense"), "R$250.00");
        assert_eq!(card_text(&html, "summary-balance"), "R$650.00");
    }

    #[tokio::test]
    async fn year_filter_narrows_records() {
        let state = get_test_state();
        seed(&state);

        let response = get_dashboard_page(State(state), query(Some(2), Some(2025)))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(card_text(&html, "summary-income"), "R$0.00");
        assert_eq!(card_text(&html, "summary-expense"), "R$50.00");
        assert_eq!(card_text(&html, "summary-balance"), "-R$50.00");
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state), query(None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_element_exists(&html, "no-data-prompt");
    }

    #[tokio::test]
    async fn rejects_month_index_out_of_range() {
        let state = get_test_state();

        let result = get_dashboard_page(State(state), query(Some(12), None)).await;

        assert_eq!(result.err(), Some(Error::InvalidMonthIndex(12)));
    }

    #[tokio::test]
    async fn dashboard_json_has_all_views() {
        let state = get_test_state();
        seed(&state);

        let response = get_dashboard_json(State(state), query(Some(3), None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["selectedMonth"], 3);
        assert_eq!(body["monthlyFlow"]["months"].as_array().unwrap().len(), 12);
        assert_eq!(body["monthlyFlow"]["months"][2]["income"], 900.0);
        assert_eq!(body["monthlyFlow"]["months"][2]["expense"], 250.0);
        assert_eq!(body["summary"]["income"], 80.0);
        assert_eq!(
            body["sourceBreakdown"],
            json!([{"label": "Outros", "total": 80.0}, {"label": "Salary", "total": 900.0}])
        );
    }

    #[tokio::test]
    async fn aggregate_returns_views_and_anomalies() {
        let state = get_test_state();
        let body = json!([
            {"kind": "expense", "amount": 10.005, "category": "Food", "date": "2025-01-05"},
            {"kind": "expense", "amount": 10.005, "category": "Food", "date": "2025-01-06"},
            {"kind": "income", "amount": "abc", "date": "2025-01-07"},
        ]);

        let response = aggregate_endpoint(
            State(state),
            Query(AggregateQuery { month: Some(0) }),
            Ok(Json(body)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(
            body["categoryBreakdown"],
            json!([{"label": "Food", "total": 20.01}])
        );
        assert_eq!(body["summary"]["income"], 0.0);
        assert_eq!(body["anomalies"][0]["anomaly"], "amount_defaulted");
        assert_eq!(body["anomalies"][0]["index"], 2);
    }

    #[tokio::test]
    async fn aggregate_rejects_non_array_body() {
        let state = get_test_state();

        let response = aggregate_endpoint(
            State(state),
            Query(AggregateQuery { month: Some(0) }),
            Ok(Json(json!({"kind": "income"}))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("expected an array"));
    }

    #[test]
    fn query_url_skips_missing_year() {
        assert_eq!(
            DashboardQuery {
                month: Some(4),
                year: None
            }
            .to_url(),
            "/dashboard?month=4"
        );
        assert_eq!(
            DashboardQuery {
                month: Some(0),
                year: Some(2025)
            }
            .to_url(),
            "/dashboard?month=0&year=2025"
        );
    }

    #[track_caller]
    fn assert_element_exists(html: &Html, id: &str) {
        let selector = Selector::parse(&format!("#{id}")).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "element with id '{id}' not found"
        );
    }

    fn card_text(html: &Html, id: &str) -> String {
        must_get_text(html, &format!("#{id} p"))
    }
}
