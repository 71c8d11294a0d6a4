//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

/// The dashboard: this month's totals, all-time totals, months, breakdown and recent transactions.
pub const DASHBOARD: &str = "/api/dashboard";
/// The monthly summary: totals plus spending by category.
pub const SUMMARY: &str = "/api/summary";
/// The months that have at least one transaction.
pub const MONTHS: &str = "/api/months";
/// Income and expense totals for every month with transactions.
pub const MONTHLY_BREAKDOWN: &str = "/api/months/breakdown";
/// The route to list (with filters) and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The most recent transactions.
pub const RECENT_TRANSACTIONS: &str = "/api/transactions/recent";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to rename or delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route that writes a CSV export of the user's transactions.
pub const EXPORT: &str = "/api/export";
/// The URL path of a user's export files, e.g. '/static/1'.
pub const EXPORT_FILES: &str = "/static/{user_id}";
/// The route for downloading one of the user's export files.
pub const EXPORT_FILE: &str = "/static/{user_id}/{file_name}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/categories/{category_id}', '{category_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
