//! Defines the endpoint for creating a new transaction from the HTML form.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a transaction.
///
/// Every field is optional here so that a missing field produces an alert
/// listing what is missing instead of a generic parse error.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub kind: TransactionKind,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub date: Option<Date>,
    pub description: Option<String>,
}

impl TransactionForm {
    /// Check the required fields and build the transaction to store.
    ///
    /// # Errors
    /// Returns [Error::MissingRequiredFields] naming every required field that
    /// is absent or blank. An amount that is not positive counts as missing.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let amount = self.amount.filter(|amount| *amount > 0.0);
        let category = non_blank(self.category);
        let description = non_blank(self.description);

        let mut missing = Vec::new();
        if amount.is_none() {
            missing.push("amount");
        }
        if category.is_none() {
            missing.push("category");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if description.is_none() {
            missing.push("description");
        }

        match (amount, category, self.date, description) {
            (Some(amount), Some(category), Some(date), Some(description)) => Ok(NewTransaction {
                kind: self.kind,
                amount,
                date,
                description,
                category,
                source: non_blank(self.source).unwrap_or_default(),
            }),
            _ => Err(Error::MissingRequiredFields(missing.join(", "))),
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match form.validate() {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::debug!("rejected transaction form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
