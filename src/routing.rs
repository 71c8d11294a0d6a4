//! Application router configuration.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
};

use crate::{
    AppState, Error,
    auth::auth_guard,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        rename_category_endpoint,
    },
    endpoints,
    export::{export_transactions_endpoint, get_export_file_endpoint},
    logging::logging_middleware,
    report::{
        get_dashboard_endpoint, get_monthly_breakdown_endpoint, get_monthly_summary_endpoint,
        get_months_endpoint, get_recent_transactions_endpoint, get_transactions_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route, including the export downloads, requires the identity cookie.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::SUMMARY, get(get_monthly_summary_endpoint))
        .route(endpoints::MONTHS, get(get_months_endpoint))
        .route(
            endpoints::MONTHLY_BREAKDOWN,
            get(get_monthly_breakdown_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::RECENT_TRANSACTIONS,
            get(get_recent_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(rename_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::EXPORT, get(export_transactions_endpoint))
        .route(endpoints::EXPORT_FILE, get(get_export_file_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
