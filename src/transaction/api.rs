//! JSON endpoints over the transaction gateway.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        NewTransaction, TransactionFilter, TransactionPatch, check_amount, create_transaction,
        delete_transaction, get_transaction, list_transactions, update_transaction,
    },
};

/// The state needed by the transaction API.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl TransactionApiState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// List the transactions matching the `kind`, `category` and `source` query parameters.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionApiState>,
    Query(filter): Query<TransactionFilter>,
) -> Response {
    state
        .connection()
        .and_then(|connection| list_transactions(&filter, &connection))
        .map(|transactions| Json(transactions).into_response())
        .unwrap_or_else(Error::into_json_response)
}

/// Store a new transaction and respond with it, including its new ID.
///
/// The amount must be a positive number.
pub async fn create_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    body.map_err(Error::from)
        .and_then(|Json(new_transaction)| {
            check_amount(new_transaction.amount)?;
            create_transaction(new_transaction, &*state.connection()?)
        })
        .map(|transaction| (StatusCode::CREATED, Json(transaction)).into_response())
        .unwrap_or_else(Error::into_json_response)
}

pub async fn get_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    state
        .connection()
        .and_then(|connection| get_transaction(transaction_id, &connection))
        .map(|transaction| Json(transaction).into_response())
        .unwrap_or_else(Error::into_json_response)
}

/// Apply a partial update, only the fields present in the body change.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
    body: Result<Json<TransactionPatch>, JsonRejection>,
) -> Response {
    body.map_err(Error::from)
        .and_then(|Json(patch)| {
            patch.amount.map(check_amount).transpose()?;
            update_transaction(transaction_id, &patch, &*state.connection()?)
        })
        .map(|()| StatusCode::NO_CONTENT.into_response())
        .unwrap_or_else(Error::into_json_response)
}

pub async fn delete_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    state
        .connection()
        .and_then(|connection| delete_transaction(transaction_id, &connection))
        .map(|()| StatusCode::NO_CONTENT.into_response())
        .unwrap_or_else(Error::into_json_response)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        test_utils::parse_json_body,
        transaction::{
            Transaction, TransactionFilter, TransactionKind, TransactionPatch, count_transactions,
            create_transaction, get_transaction,
        },
    };

    use super::{
        TransactionApiState, create_transaction_api_endpoint, delete_transaction_api_endpoint,
        get_transaction_endpoint, list_transactions_endpoint, update_transaction_endpoint,
    };

    fn get_test_state() -> TransactionApiState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        TransactionApiState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn seed(state: &TransactionApiState) {
        let connection = state.db_connection.lock().unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 30.0, date!(2025 - 01 - 10), "Bus")
                .category("Transport"),
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Income, 900.0, date!(2025 - 01 - 05), "Pay")
                .source("Salary"),
            &connection,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn lists_filtered_transactions() {
        let state = get_test_state();
        seed(&state);
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Income),
            ..Default::default()
        };

        let response = list_transactions_endpoint(State(state), Query(filter)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        let transactions = body.as_array().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["kind"], "income");
        assert_eq!(transactions[0]["source"], "Salary");
        assert_eq!(transactions[0]["date"], "2025-01-05");
    }

    #[tokio::test]
    async fn create_responds_with_created_transaction() {
        let state = get_test_state();
        let new_transaction =
            Transaction::build(TransactionKind::Expense, 4.5, date!(2025 - 02 - 01), "Coffee")
                .category("Food");

        let response =
            create_transaction_api_endpoint(State(state.clone()), Ok(Json(new_transaction))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = parse_json_body(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["amount"], 4.5);
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn create_rejects_negative_amount() {
        let state = get_test_state();
        let new_transaction =
            Transaction::build(TransactionKind::Expense, -4.5, date!(2025 - 02 - 01), "Coffee");

        let response =
            create_transaction_api_endpoint(State(state.clone()), Ok(Json(new_transaction))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(
            body["error"],
            "-4.5 is not a valid amount, expected a positive number"
        );
        assert_eq!(count_transactions(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn patch_rejects_zero_amount() {
        let state = get_test_state();
        seed(&state);
        let patch = TransactionPatch {
            amount: Some(0.0),
            ..Default::default()
        };

        let response =
            update_transaction_endpoint(State(state.clone()), Path(1), Ok(Json(patch))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let transaction = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transaction.amount, 30.0);
    }

    #[tokio::test]
    async fn get_missing_transaction_is_not_found() {
        let state = get_test_state();

        let response = get_transaction_endpoint(State(state), Path(7)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn patch_changes_only_given_fields() {
        let state = get_test_state();
        seed(&state);
        let patch = TransactionPatch {
            amount: Some(35.0),
            ..Default::default()
        };

        let response =
            update_transaction_endpoint(State(state.clone()), Path(1), Ok(Json(patch))).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let transaction = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transaction.amount, 35.0);
        assert_eq!(transaction.category, "Transport");
    }

    #[tokio::test]
    async fn patch_missing_transaction_is_not_found() {
        let state = get_test_state();

        let response = update_transaction_endpoint(
            State(state),
            Path(3),
            Ok(Json(TransactionPatch::default())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_responds_with_no_content() {
        let state = get_test_state();
        seed(&state);

        let response = delete_transaction_api_endpoint(State(state.clone()), Path(1)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = delete_transaction_api_endpoint(State(state), Path(1)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
