//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the monthly flow, breakdowns and month summary.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying transactions, and the form target for creating one.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The route for deleting a transaction from the transactions page.
pub const DELETE_TRANSACTION: &str = "/transactions/{transaction_id}";
/// The page for listing debtors.
pub const DEBTORS_VIEW: &str = "/debtors";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the dashboard views as JSON.
pub const DASHBOARD_API: &str = "/api/dashboard";
/// The route for aggregating records sent in the request body.
pub const AGGREGATE_API: &str = "/api/aggregate";
/// The route to list and create debtors.
pub const DEBTORS_API: &str = "/api/debtors";
/// The route to access a single debtor.
pub const DEBTOR: &str = "/api/debtors/{debtor_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/debtors/{debtor_id}', '{debtor_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
