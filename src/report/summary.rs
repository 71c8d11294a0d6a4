//! The composite views served by the dashboard and summary endpoints.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Clock, Error, UserID,
    report::{
        CategorySpend, MonthlyTotals, RECENT_TRANSACTIONS_LIMIT, Totals, TransactionWithCategory,
        YearMonth, category_spend_breakdown, distinct_months, monthly_breakdown, monthly_totals,
        month::resolve_month, overall_totals, recent_transactions,
    },
};

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// The month that `monthly` covers.
    pub month: YearMonth,
    /// Totals for `month`.
    pub monthly: Totals,
    /// Totals across all time.
    pub overall: Totals,
    /// The months that have transactions, most recent first.
    pub months: Vec<YearMonth>,
    /// Totals for each month in `months`.
    pub monthly_breakdown: Vec<MonthlyTotals>,
    /// The most recent transactions.
    pub recent_transactions: Vec<TransactionWithCategory>,
}

/// The totals and spending by category for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// The month the summary covers.
    pub month: YearMonth,
    /// Income, expense and net for the month.
    pub totals: Totals,
    /// The month's expenses by category, largest first.
    pub spending_by_category: Vec<CategorySpend>,
}

/// Build the dashboard for `month`, or for the current month if `month` is `None`.
///
/// All parts are read within one database transaction so they agree with each other.
///
/// # Errors
/// Returns an error if the current month cannot be resolved or a query fails.
pub fn dashboard_summary(
    user_id: UserID,
    month: Option<YearMonth>,
    clock: &dyn Clock,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    let month = resolve_month(month, clock)?;
    let snapshot = connection.unchecked_transaction()?;

    Ok(DashboardSummary {
        month,
        monthly: monthly_totals(user_id, month, &snapshot)?,
        overall: overall_totals(user_id, &snapshot)?,
        months: distinct_months(user_id, &snapshot)?,
        monthly_breakdown: monthly_breakdown(user_id, &snapshot)?,
        recent_transactions: recent_transactions(user_id, RECENT_TRANSACTIONS_LIMIT, &snapshot)?,
    })
}

/// Build the summary for `month`, or for the current month if `month` is `None`.
///
/// # Errors
/// Returns an error if the current month cannot be resolved or a query fails.
pub fn monthly_summary(
    user_id: UserID,
    month: Option<YearMonth>,
    clock: &dyn Clock,
    connection: &Connection,
) -> Result<MonthlySummary, Error> {
    let month = resolve_month(month, clock)?;
    let snapshot = connection.unchecked_transaction()?;

    Ok(MonthlySummary {
        month,
        totals: monthly_totals(user_id, month, &snapshot)?,
        spending_by_category: category_spend_breakdown(user_id, month, &snapshot)?,
    })
}
