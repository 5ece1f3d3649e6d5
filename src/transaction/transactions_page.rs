//! Defines the route handler for the page that displays transactions as a table.
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
        BUTTON_DELETE_STYLE, EXPENSE_BADGE_STYLE, INCOME_BADGE_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionFilter, TransactionKind, list_transactions},
};

/// How many characters of the ID to show in the table.
const ID_PREFIX_LENGTH: usize = 8;

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render a table of every stored transaction, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_transactions(&TransactionFilter::default(), &connection)
            .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?
    };

    Ok(transactions_view(&transactions).into_response())
}

fn kind_badge(kind: TransactionKind) -> Markup {
    let style = match kind {
        TransactionKind::Income => INCOME_BADGE_STYLE,
        TransactionKind::Expense => EXPENSE_BADGE_STYLE,
    };

    html!(span class=(style) data-kind=(kind.as_str()) { (kind.label()) })
}

fn id_prefix(transaction: &Transaction) -> String {
    let mut id = transaction.id.to_string();
    id.truncate(ID_PREFIX_LENGTH);
    id
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
        transaction.description
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (id_prefix(transaction)) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class="px-6 py-4 text-right" { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if transaction.category.is_empty() {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                } @else {
                    (transaction.category)
                }
            }
            td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
            td class=(TABLE_CELL_STYLE) { time datetime=(transaction.date) { (transaction.date) } }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm=(confirm_message)
                    hx-target="closest tr"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn transactions_view(transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="relative w-full max-w-5xl overflow-x-auto"
            {
                div class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                table class="w-full my-2 text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row_view(transaction))
                        }

                        @if transactions.is_empty() {
                            tr
                            {
                                td
                                    colspan="7"
                                    data-empty-state="true"
                                    class="px-6 py-4 text-center"
                                {
                                    "No transactions yet. "
                                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                                    {
                                        "Record your first transaction"
                                    }
                                    "."
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &[], &content)
}
