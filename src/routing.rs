//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{aggregate_endpoint, get_dashboard_json, get_dashboard_page},
    debtor::{
        create_debtor_endpoint, delete_debtor_endpoint, get_debtor_endpoint, get_debtors_page,
        list_debtors_endpoint, update_debtor_endpoint,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_api_endpoint, create_transaction_endpoint,
        delete_transaction_api_endpoint, delete_transaction_endpoint,
        get_create_transaction_page, get_transaction_endpoint, get_transactions_page,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::TRANSACTIONS_VIEW,
            get(get_transactions_page).post(create_transaction_endpoint),
        )
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::DEBTORS_VIEW, get(get_debtors_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_api_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .patch(update_transaction_endpoint)
                .delete(delete_transaction_api_endpoint),
        )
        .route(endpoints::DASHBOARD_API, get(get_dashboard_json))
        .route(endpoints::AGGREGATE_API, post(aggregate_endpoint))
        .route(
            endpoints::DEBTORS_API,
            get(list_debtors_endpoint).post(create_debtor_endpoint),
        )
        .route(
            endpoints::DEBTOR,
            get(get_debtor_endpoint)
                .patch(update_debtor_endpoint)
                .delete(delete_debtor_endpoint),
        );

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
