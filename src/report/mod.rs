//! The monthly aggregation and reporting engine.
//!
//! Everything here reads the transaction table for a single user and derives
//! totals, listings and breakdowns from it. Nothing in this module writes to
//! the database.

mod filter;
mod handlers;
mod listing;
mod month;
mod spending;
mod summary;
mod totals;

pub use filter::{TransactionFilter, TransactionFilterParams};
pub use handlers::{
    get_dashboard_endpoint, get_monthly_breakdown_endpoint, get_monthly_summary_endpoint,
    get_months_endpoint, get_recent_transactions_endpoint, get_transactions_endpoint,
};
pub use listing::{
    RECENT_TRANSACTIONS_LIMIT, TransactionWithCategory, filtered_transactions, recent_transactions,
};
pub use month::YearMonth;
pub use spending::{CategorySpend, category_spend_breakdown};
pub use summary::{DashboardSummary, MonthlySummary, dashboard_summary, monthly_summary};
pub use totals::{
    MonthlyTotals, Totals, distinct_months, monthly_breakdown, monthly_totals, overall_totals,
};
