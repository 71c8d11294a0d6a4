//! The flat records written to a transaction export.

use rusqlite::{Connection, Row, Statement};
use serde::Serialize;
use time::Date;

use crate::{CategoryName, Error, TransactionId, TransactionKind, UserID};

/// One line of a transaction export.
///
/// The fields are in the same order as the export header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// The transaction ID.
    pub id: TransactionId,
    /// The transaction amount.
    pub amount: f64,
    /// Income or expense.
    pub kind: TransactionKind,
    /// The name of the transaction's category at export time.
    pub category: CategoryName,
    /// When the transaction happened.
    pub date: Date,
    /// The transaction description, empty if there is none.
    pub description: Option<String>,
}

fn map_export_row(row: &Row) -> Result<ExportRow, rusqlite::Error> {
    Ok(ExportRow {
        id: row.get(0)?,
        amount: row.get(1)?,
        kind: row.get(2)?,
        category: CategoryName::new_unchecked(&row.get::<usize, String>(3)?),
        date: row.get(4)?,
        description: row.get(5)?,
    })
}

/// A prepared query over a user's transactions for exporting, newest first.
///
/// Rows are read one at a time as the export is written, they are never
/// collected into memory.
pub struct ExportRows<'conn> {
    statement: Statement<'conn>,
    user_id: UserID,
}

impl<'conn> ExportRows<'conn> {
    /// Prepare the export query for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query cannot be prepared.
    pub fn prepare(user_id: UserID, connection: &'conn Connection) -> Result<Self, Error> {
        let statement = connection.prepare(
            "SELECT t.id, t.amount, t.kind, c.name, t.date, t.description
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE t.user_id = ?1
             ORDER BY t.date DESC, t.id DESC",
        )?;

        Ok(Self { statement, user_id })
    }

    /// Run the query, yielding rows as they are read from the database.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query fails to start. Errors reading
    /// an individual row are yielded by the iterator.
    pub fn iter(&mut self) -> Result<impl Iterator<Item = Result<ExportRow, Error>> + '_, Error> {
        let rows = self
            .statement
            .query_map([self.user_id.as_i64()], map_export_row)?;

        Ok(rows.map(|row_result| row_result.map_err(Error::SqlError)))
    }
}
