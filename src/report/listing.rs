//! Transaction listings joined with their category names.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use serde::Serialize;

use crate::{
    CategoryName, Error, UserID,
    report::TransactionFilter,
    transaction::{Transaction, map_transaction_row},
};

/// The default number of transactions shown in the recent transactions list.
pub const RECENT_TRANSACTIONS_LIMIT: u32 = 10;

/// A transaction together with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithCategory {
    /// The transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The name of the transaction's category.
    pub category_name: CategoryName,
}

const SELECT_WITH_CATEGORY: &str = "SELECT t.id, t.user_id, t.amount, t.kind, t.category_id, \
    t.date, t.description, c.name \
    FROM \"transaction\" t \
    INNER JOIN category c ON c.id = t.category_id";

fn map_row_with_category(row: &Row) -> Result<TransactionWithCategory, rusqlite::Error> {
    let transaction = map_transaction_row(row)?;
    let category_name = CategoryName::new_unchecked(&row.get::<usize, String>(7)?);

    Ok(TransactionWithCategory {
        transaction,
        category_name,
    })
}

/// The user's `limit` most recent transactions, newest first.
///
/// Transactions on the same date are ordered by descending ID so the most
/// recently entered one comes first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn recent_transactions(
    user_id: UserID,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_WITH_CATEGORY}
             WHERE t.user_id = ?1
             ORDER BY t.date DESC, t.id DESC
             LIMIT ?2"
        ))?
        .query_map((user_id.as_i64(), limit), map_row_with_category)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// The user's transactions that match every field set in `filter`, newest first.
///
/// The date range is inclusive at both ends. An empty filter lists all of the
/// user's transactions.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn filtered_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    let mut query = format!("{SELECT_WITH_CATEGORY} WHERE t.user_id = ?");
    let mut params = vec![Value::Integer(user_id.as_i64())];

    if let Some(kind) = filter.kind {
        query.push_str(" AND t.kind = ?");
        params.push(Value::Text(kind.to_string()));
    }

    if let Some(category_id) = filter.category_id {
        query.push_str(" AND t.category_id = ?");
        params.push(Value::Integer(category_id));
    }

    if let Some(start_date) = filter.start_date {
        query.push_str(" AND t.date >= ?");
        params.push(Value::Text(start_date.to_string()));
    }

    if let Some(end_date) = filter.end_date {
        query.push_str(" AND t.date <= ?");
        params.push(Value::Text(end_date.to_string()));
    }

    query.push_str(" ORDER BY t.date DESC, t.id DESC");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_row_with_category)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
