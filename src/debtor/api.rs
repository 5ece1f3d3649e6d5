//! JSON endpoints over the debtor gateway.

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
    database_id::DebtorId,
    debtor::{
        DebtorFilter, DebtorPatch, NewDebtor, create_debtor, delete_debtor, get_debtor,
        list_debtors, update_debtor,
    },
    transaction::check_amount,
};

/// The state needed by the debtor API.
#[derive(Debug, Clone)]
pub struct DebtorApiState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DebtorApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl DebtorApiState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// List debtors, optionally only those with the `status` query parameter.
pub async fn list_debtors_endpoint(
    State(state): State<DebtorApiState>,
    Query(filter): Query<DebtorFilter>,
) -> Response {
    state
        .connection()
        .and_then(|connection| list_debtors(&filter, &connection))
        .map(|debtors| Json(debtors).into_response())
        .unwrap_or_else(Error::into_json_response)
}

pub async fn create_debtor_endpoint(
    State(state): State<DebtorApiState>,
    body: Result<Json<NewDebtor>, JsonRejection>,
) -> Response {
    body.map_err(Error::from)
        .and_then(|Json(new_debtor)| {
            check_amount(new_debtor.amount)?;
            create_debtor(new_debtor, &*state.connection()?)
        })
        .map(|debtor| (StatusCode::CREATED, Json(debtor)).into_response())
        .unwrap_or_else(Error::into_json_response)
}

pub async fn get_debtor_endpoint(
    State(state): State<DebtorApiState>,
    Path(debtor_id): Path<DebtorId>,
) -> Response {
    state
        .connection()
        .and_then(|connection| get_debtor(debtor_id, &connection))
        .map(|debtor| Json(debtor).into_response())
        .unwrap_or_else(Error::into_json_response)
}

pub async fn update_debtor_endpoint(
    State(state): State<DebtorApiState>,
    Path(debtor_id): Path<DebtorId>,
    body: Result<Json<DebtorPatch>, JsonRejection>,
) -> Response {
    body.map_err(Error::from)
        .and_then(|Json(patch)| {
            patch.amount.map(check_amount).transpose()?;
            update_debtor(debtor_id, &patch, &*state.connection()?)
        })
        .map(|()| StatusCode::NO_CONTENT.into_response())
        .unwrap_or_else(Error::into_json_response)
}

pub async fn delete_debtor_endpoint(
    State(state): State<DebtorApiState>,
    Path(debtor_id): Path<DebtorId>,
) -> Response {
    state
        .connection()
        .and_then(|connection| delete_debtor(debtor_id, &connection))
        .map(|()| StatusCode::NO_CONTENT.into_response())
        .unwrap_or_else(Error::into_json_response)
}
