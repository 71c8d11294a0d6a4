//! Database schema setup.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Enable foreign keys and create the tables for the domain models.
///
/// Foreign key enforcement is a per-connection setting in SQLite, so this must
/// be called on every connection before use, otherwise deleting a category will
/// not cascade to its transactions.
///
/// # Errors
/// Returns an [Error::SqlError] if the pragma or any of the table definitions fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Changing this pragma inside a transaction is a no-op.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
