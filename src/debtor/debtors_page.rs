//! The read-only page listing debtors.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        EXPENSE_BADGE_STYLE, INCOME_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
};

use super::{Debtor, DebtorFilter, DebtorStatus, list_debtors};

const PENDING_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-yellow-800 bg-yellow-100 rounded-full \
    dark:bg-yellow-900 dark:text-yellow-300";

/// The state needed for the debtors page.
#[derive(Debug, Clone)]
pub struct DebtorsViewState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DebtorsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the table of debtors.
pub async fn get_debtors_page(State(state): State<DebtorsViewState>) -> Result<Response, Error> {
    let debtors = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_debtors(&DebtorFilter::default(), &connection)
            .inspect_err(|error| tracing::error!("could not list debtors: {error}"))?
    };

    Ok(debtors_view(&debtors).into_response())
}

fn status_badge(status: DebtorStatus) -> Markup {
    let style = match status {
        DebtorStatus::Paid => INCOME_BADGE_STYLE,
        DebtorStatus::Pending => PENDING_BADGE_STYLE,
        DebtorStatus::Overdue => EXPENSE_BADGE_STYLE,
    };

    html!(span class=(style) { (status.label()) })
}

fn debtor_row_view(debtor: &Debtor) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE) data-debtor-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (debtor.name) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(email) = &debtor.email {
                    div { (email) }
                }
                @if let Some(phone) = &debtor.phone {
                    div { (phone) }
                }
            }
            td class="px-6 py-4 text-right" { (format_currency(debtor.amount)) }
            td class=(TABLE_CELL_STYLE) { (status_badge(debtor.status)) }
            td class=(TABLE_CELL_STYLE)
            {
                @match debtor.due_date {
                    Some(due_date) => time datetime=(due_date) { (due_date) },
                    None => span class="text-gray-400 dark:text-gray-500" { "-" },
                }
            }
        }
    }
}

fn debtors_view(debtors: &[Debtor]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DEBTORS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="relative w-full max-w-5xl overflow-x-auto"
            {
                h1 class="text-xl font-bold" { "Debtors" }

                table class="w-full my-2 text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Contact" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Due" }
                        }
                    }

                    tbody
                    {
                        @for debtor in debtors {
                            (debtor_row_view(debtor))
                        }

                        @if debtors.is_empty() {
                            tr
                            {
                                td
                                    colspan="5"
                                    data-empty-state="true"
                                    class="px-6 py-4 text-center"
                                {
                                    "Nobody owes you money."
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Debtors", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        db::initialize,
        debtor::{DebtorStatus, NewDebtor, create_debtor},
        test_utils::{assert_status_ok, assert_valid_html, must_get_text, parse_html_document},
    };

    use super::{DebtorsViewState, get_debtors_page};

    fn get_test_state() -> DebtorsViewState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DebtorsViewState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn shows_empty_state() {
        let response = get_debtors_page(State(get_test_state())).await.unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let selector = Selector::parse("td[data-empty-state]").unwrap();
        assert_eq!(document.select(&selector).count(), 1);
        assert_eq!(
            must_get_text(&document, "td[data-empty-state]"),
            "Nobody owes you money."
        );
    }

    #[tokio::test]
    async fn renders_debtor_rows() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_debtor(
                NewDebtor::new("Ana", 150.0)
                    .status(DebtorStatus::Overdue)
                    .due_date(date!(2025 - 05 - 01)),
                &connection,
            )
            .unwrap();
        }

        let response = get_debtors_page(State(state)).await.unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let selector = Selector::parse("tr[data-debtor-row]").unwrap();
        let rows: Vec<String> = document
            .select(&selector)
            .map(|row| row.text().collect())
            .collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("Ana"));
        assert!(rows[0].contains("R$150.00"));
        assert!(rows[0].contains("Overdue"));
        assert!(rows[0].contains("2025-05-01"));
    }
}
