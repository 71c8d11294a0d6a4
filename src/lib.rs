//! Tallybook is a personal finance tracker.
//!
//! Users record income and expense transactions under their own categories,
//! and the reporting engine in this library turns those records into monthly
//! totals, category breakdowns, filtered transaction lists and CSV exports.
//!
//! The library also provides a JSON API that exposes the reports and the
//! category/transaction management operations over HTTP.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod clock;
mod database_id;
mod db;
mod endpoints;
mod export;
mod extract;
mod logging;
mod password;
mod report;
mod routing;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use auth::COOKIE_USER_ID;
pub use category::{
    Category, CategoryName, create_category, delete_category, get_categories, get_category,
    rename_category,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use database_id::{CategoryId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use export::{
    EXPORT_HEADER, ExportArtifact, ExportConfig, ExportNamer, ExportRow, ExportRows,
    export_transactions, is_export_file_name, timestamped_file_name, write_export_csv,
};
pub use logging::logging_middleware;
pub use password::PasswordHash;
pub use report::{
    CategorySpend, DashboardSummary, MonthlySummary, MonthlyTotals, RECENT_TRANSACTIONS_LIMIT,
    Totals, TransactionFilter, TransactionFilterParams, TransactionWithCategory, YearMonth,
    category_spend_breakdown, dashboard_summary, distinct_months, filtered_transactions,
    monthly_breakdown, monthly_summary, monthly_totals, overall_totals, recent_transactions,
};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    Transaction, TransactionBuilder, TransactionKind, create_transaction, delete_transaction,
    get_transaction, update_transaction,
};
pub use user::{NewUser, User, UserID, create_user, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid identity cookie.
    #[error("missing or invalid identity cookie")]
    Unauthorized,

    /// A filter value could not be parsed.
    ///
    /// The first field names the filter (e.g. "start_date"), the second holds
    /// the rejected value.
    #[error("invalid value {1:?} for filter \"{0}\"")]
    InvalidFilter(&'static str, String),

    /// The start of a date range filter falls after its end.
    #[error("the start date {0} is after the end date {1}")]
    InvalidDateRange(Date, Date),

    /// A month key was not in the `YYYY-MM` format.
    #[error("invalid month \"{0}\", expected the format YYYY-MM")]
    InvalidMonth(String),

    /// A request body or path parameter could not be parsed.
    ///
    /// The string describes what was wrong with the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A transaction kind other than "income" or "expense".
    #[error("invalid transaction kind \"{0}\", expected \"income\" or \"expense\"")]
    InvalidKind(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A transaction amount was zero, negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// The category ID used for a transaction does not refer to one of the
    /// user's categories.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// A user with the given email address already exists.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
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

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The export artifact could not be written.
    #[error("could not write the export file: {0}")]
    ExportFailed(String),

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::InvalidRequest(_)
            | Error::InvalidFilter(..)
            | Error::InvalidDateRange(..)
            | Error::InvalidMonth(_)
            | Error::InvalidKind(_)
            | Error::EmptyCategoryName
            | Error::InvalidAmount(_)
            | Error::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory => StatusCode::NOT_FOUND,
            Error::DatabaseLockError => StatusCode::SERVICE_UNAVAILABLE,
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "An unexpected error occurred, check the server logs for more details."
                    })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
