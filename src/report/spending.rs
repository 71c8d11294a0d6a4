//! Expenses for a month grouped by category.

use rusqlite::Connection;
use serde::Serialize;

use crate::{CategoryName, Error, UserID, report::YearMonth};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    /// The category name.
    pub category: CategoryName,
    /// The sum of the category's expenses, always greater than zero.
    pub total: f64,
}

/// The user's expenses in `month` grouped by category name, largest total first.
///
/// Categories with equal totals keep the order in which they first appear
/// among the month's expenses. Categories with nothing spent are left out.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn category_spend_breakdown(
    user_id: UserID,
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<CategorySpend>, Error> {
    let expenses = connection
        .prepare(
            "SELECT c.name, t.amount FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE t.user_id = ?1 AND t.kind = 'expense' AND strftime('%Y-%m', t.date) = ?2
             ORDER BY t.id ASC",
        )?
        .query_map((user_id.as_i64(), month), |row| {
            Ok((
                CategoryName::new_unchecked(&row.get::<usize, String>(0)?),
                row.get::<usize, f64>(1)?,
            ))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    Ok(group_spending_by_category(expenses))
}

/// Sum `expenses` by category, then sort by total, descending.
///
/// The sort is stable, so ties stay in first-seen order.
fn group_spending_by_category(
    expenses: impl IntoIterator<Item = (CategoryName, f64)>,
) -> Vec<CategorySpend> {
    let mut spending: Vec<CategorySpend> = Vec::new();

    for (category, amount) in expenses {
        match spending.iter_mut().find(|spend| spend.category == category) {
            Some(spend) => spend.total += amount,
            None => spending.push(CategorySpend {
                category,
                total: amount,
            }),
        }
    }

    spending.retain(|spend| spend.total > 0.0);
    spending.sort_by(|a, b| b.total.total_cmp(&a.total));

    spending
}
