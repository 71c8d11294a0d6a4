//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserID,
    category::get_category,
    database_id::{CategoryId, TransactionId},
    transaction::TransactionKind,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// When the transaction happened.
    pub date: Date,
    /// An optional note about what the transaction was for.
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        kind: TransactionKind,
        category_id: CategoryId,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            kind,
            category_id,
            date,
            description: None,
        }
    }
}

/// A builder for creating or replacing [Transaction] instances.
///
/// This is also the request body for the create and update endpoints.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::{Transaction, TransactionKind};
///
/// let builder = Transaction::build(45.99, TransactionKind::Expense, food.id, date!(2025-01-15))
///     .description(Some("Coffee beans".to_owned()));
/// let transaction = create_transaction(builder, user.id, &connection)?;
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// Must be a finite number greater than zero, the direction of the money
    /// is given by `kind`.
    pub amount: f64,

    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// The category of the transaction, which must belong to the same user.
    pub category_id: CategoryId,

    /// The calendar date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction.
    ///
    /// Blank descriptions are stored as `None`.
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Check the amount and that the category belongs to `user_id`, and
    /// normalise the description.
    fn validate(mut self, user_id: UserID, connection: &Connection) -> Result<Self, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        match get_category(self.category_id, user_id, connection) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::InvalidCategory(self.category_id)),
            Err(error) => return Err(error),
        }

        self.description = self
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty());

        Ok(self)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction for `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is not a finite number greater than zero,
/// - [Error::InvalidCategory] if the category does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate(user_id, connection)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, kind, category_id, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, amount, kind, category_id, date, description",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.amount,
                builder.kind,
                builder.category_id,
                builder.date,
                builder.description,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, amount, kind, category_id, date, description FROM \"transaction\"
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Replace the fields of one of the user's transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::InvalidCategory] if the new values are invalid,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate(user_id, connection)?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET amount = ?1, kind = ?2, category_id = ?3, date = ?4, description = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            builder.amount,
            builder.kind,
            builder.category_id,
            builder.date,
            &builder.description,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(Transaction {
        id,
        user_id,
        amount: builder.amount,
        kind: builder.kind,
        category_id: builder.category_id,
        date: builder.date,
        description: builder.description,
    })
}

/// Delete one of the user's transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                category_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
                );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// Expects the columns `id, user_id, amount, kind, category_id, date, description` in that order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        kind: row.get(3)?,
        category_id: row.get(4)?,
        date: row.get(5)?,
        description: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
