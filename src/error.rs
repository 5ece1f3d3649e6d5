//! Defines the app level error type and conversions to rendered HTML pages, alerts and JSON.
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::{
    aggregation::ShapeError, alert::Alert, html::error_view,
    internal_server_error::InternalServerError, not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a debtor that does not exist
    #[error("tried to delete a debtor that is not in the database")]
    DeleteMissingDebtor,

    /// Tried to update a debtor that does not exist
    #[error("tried to update a debtor that is not in the database")]
    UpdateMissingDebtor,

    /// A month index outside of 0 (January) to 11 (December).
    #[error("{0} is not a valid month index, expected a number from 0 to 11")]
    InvalidMonthIndex(u8),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The records sent for aggregation were not a list of objects.
    #[error("malformed records: {0}")]
    MalformedRecords(#[from] ShapeError),

    /// An amount that is not a positive, finite number.
    #[error("{0} is not a valid amount, expected a positive number")]
    InvalidAmount(f64),

    /// A JSON request body could not be read or did not have the expected shape.
    #[error("invalid JSON body: {0}")]
    InvalidJsonBody(String),

    /// A form was submitted without one of its required fields.
    #[error("missing required fields: {0}")]
    MissingRequiredFields(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJsonBody(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            error @ Error::InvalidMonthIndex(_) => (
                error.status_code(),
                Html(
                    error_view(
                        "Bad Request",
                        "400",
                        &error.to_string(),
                        "Pick a month from January to December on the dashboard.",
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingDebtor
            | Error::DeleteMissingDebtor => StatusCode::NOT_FOUND,
            Error::InvalidMonthIndex(_)
            | Error::InvalidAmount(_)
            | Error::InvalidJsonBody(_)
            | Error::MalformedRecords(_)
            | Error::MissingRequiredFields(_) => StatusCode::BAD_REQUEST,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let alert = match self {
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            Error::MissingRequiredFields(fields) => Alert::Error {
                message: "Please fill in all required fields".to_owned(),
                details: format!("Missing: {fields}."),
            },
            Error::InvalidMonthIndex(index) => Alert::Error {
                message: "Invalid month".to_owned(),
                details: format!("{index} is not a month, pick a month from January to December."),
            },
            Error::InvalidAmount(amount) => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!("{amount} is not a valid amount, enter a number above zero."),
            },
            Error::UpdateMissingTransaction => Alert::Error {
                message: "Could not update transaction".to_owned(),
                details: "The transaction could not be found.".to_owned(),
            },
            Error::DeleteMissingTransaction => Alert::Error {
                message: "Could not delete transaction".to_owned(),
                details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            },
            Error::UpdateMissingDebtor => Alert::Error {
                message: "Could not update debtor".to_owned(),
                details: "The debtor could not be found.".to_owned(),
            },
            Error::DeleteMissingDebtor => Alert::Error {
                message: "Could not delete debtor".to_owned(),
                details: "The debtor could not be found. \
                    Try refreshing the page to see if the debtor has already been deleted."
                    .to_owned(),
            },
            _ => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        };

        (status_code, alert.into_html()).into_response()
    }

    /// Convert the error into an HTTP response with a JSON body of the form
    /// `{"error": "<message>"}`.
    ///
    /// Server-side failures are logged and replaced with a generic message.
    pub fn into_json_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            "an unexpected error occurred, check the server logs for more details".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
