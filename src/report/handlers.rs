//! HTTP handlers for the reporting endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Clock, Error, UserID,
    app_state::lock_connection,
    extract::ApiQuery,
    report::{
        DashboardSummary, MonthlySummary, MonthlyTotals, RECENT_TRANSACTIONS_LIMIT,
        TransactionFilter, TransactionFilterParams, TransactionWithCategory, YearMonth,
        dashboard_summary, distinct_months, filtered_transactions, monthly_breakdown,
        monthly_summary, recent_transactions,
    },
};

/// The state needed for the reporting endpoints.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Resolves the current month when a request does not name one.
    pub clock: Arc<dyn Clock>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

/// The `?month=YYYY-MM` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    month: Option<String>,
}

impl MonthQuery {
    fn parse(self) -> Result<Option<YearMonth>, Error> {
        self.month
            .filter(|month| !month.is_empty())
            .map(|month| month.parse())
            .transpose()
    }
}

/// The `?limit=N` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    limit: Option<String>,
}

impl RecentQuery {
    fn parse(self) -> Result<u32, Error> {
        match self.limit.filter(|limit| !limit.is_empty()) {
            None => Ok(RECENT_TRANSACTIONS_LIMIT),
            Some(limit) => limit
                .parse()
                .map_err(|_| Error::InvalidFilter("limit", limit)),
        }
    }
}

/// Get the dashboard for the requested month, or the current month.
pub async fn get_dashboard_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<DashboardSummary>, Error> {
    let month = query.parse()?;
    let connection = lock_connection(&state.db_connection)?;

    dashboard_summary(user_id, month, state.clock.as_ref(), &connection)
        .inspect_err(|error| tracing::error!("could not build dashboard for {user_id}: {error}"))
        .map(Json)
}

/// Get the totals and category spending for the requested month, or the current month.
pub async fn get_monthly_summary_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> Result<Json<MonthlySummary>, Error> {
    let month = query.parse()?;
    let connection = lock_connection(&state.db_connection)?;

    monthly_summary(user_id, month, state.clock.as_ref(), &connection)
        .inspect_err(|error| tracing::error!("could not build summary for {user_id}: {error}"))
        .map(Json)
}

/// List the months that have transactions, most recent first.
pub async fn get_months_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<YearMonth>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    distinct_months(user_id, &connection).map(Json)
}

/// List the totals of every month that has transactions, most recent first.
pub async fn get_monthly_breakdown_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<MonthlyTotals>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    monthly_breakdown(user_id, &connection).map(Json)
}

/// List the most recent transactions.
pub async fn get_recent_transactions_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> Result<Json<Vec<TransactionWithCategory>>, Error> {
    let limit = query.parse()?;
    let connection = lock_connection(&state.db_connection)?;

    recent_transactions(user_id, limit, &connection).map(Json)
}

/// List the transactions that match the query string filters.
pub async fn get_transactions_endpoint(
    State(state): State<ReportState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(params): ApiQuery<TransactionFilterParams>,
) -> Result<Json<Vec<TransactionWithCategory>>, Error> {
    let filter = TransactionFilter::try_from(params)
        .inspect_err(|error| tracing::debug!("rejected transaction filter: {error}"))?;
    let connection = lock_connection(&state.db_connection)?;

    filtered_transactions(user_id, &filter, &connection).map(Json)
}
