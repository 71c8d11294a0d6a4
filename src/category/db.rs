//! Database operations for categories.
//!
//! Every query is scoped to the owning user. A category that belongs to
//! someone else is treated exactly like one that does not exist.

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    category::{Category, CategoryName},
    database_id::CategoryId,
};

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
/// Returns an [Error::SqlError] if `user_id` does not refer to a user or there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name) VALUES (?1, ?2);",
        (user_id.as_i64(), name.as_ref()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, user_id, name })
}

/// Retrieve one of the user's categories by ID.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, user_id, name FROM category WHERE id = :id AND user_id = :user_id;")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of the user's categories ordered alphabetically by name.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name FROM category
            WHERE user_id = :user_id
            ORDER BY name ASC, id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename one of the user's categories.
///
/// # Errors
/// Returns [Error::UpdateMissingCategory] if the category does not exist or belongs to another user.
pub fn rename_category(
    category_id: CategoryId,
    new_name: CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
        (new_name.as_ref(), category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(Category {
        id: category_id,
        user_id,
        name: new_name,
    })
}

/// Delete one of the user's categories along with all of its transactions.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if the category does not exist or belongs to another user.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    tracing::debug!("deleted category {category_id} for user {user_id}");

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let raw_name: String = row.get(2)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, user_id, name })
}

#[cfg(test)]
mod category_query_tests {
    use crate::{
        CategoryName, Error, TransactionKind,
        test_utils::{
            create_test_category, create_test_transaction, create_test_user, get_test_connection,
        },
        transaction::get_transaction,
    };
    use time::macros::date;

    use super::{create_category, delete_category, get_categories, get_category, rename_category};

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("a@example.com", &connection);
        let name = CategoryName::new("Groceries").unwrap();

        let category = create_category(name.clone(), user.id, &connection).unwrap();

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(category.user_id, user.id);
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let connection = get_test_connection();
        let user = create_test_user("a@example.com", &connection);

        create_test_category("Food", user.id, &connection);
        let result = create_category(CategoryName::new_unchecked("Food"), user.id, &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn get_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("a@example.com", &connection);
        let category = create_test_category("Food", user.id, &connection);

        let got = get_category(category.id, user.id, &connection);

        assert_eq!(got, Ok(category));
    }

    #[test]
    fn get_category_of_other_user_returns_not_found() {
        let connection = get_test_connection();
        let owner = create_test_user("a@example.com", &connection);
        let other = create_test_user("b@example.com", &connection);
        let category = create_test_category("Food", owner.id, &connection);

        let got = get_category(category.id, other.id, &connection);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn get_categories_returns_only_own_categories_sorted_by_name() {
        let connection = get_test_connection();
        let user = create_test_user("a@example.com", &connection);
        let other = create_test_user("b@example.com", &connection);
        let rent = create_test_category("Rent", user.id, &connection);
        let food = create_test_category("Food", user.id, &connection);
        create_test_category("Hobbies", other.id, &connection);

        let got = get_categories(user.id, &connection).unwrap();

        assert_eq!(got, vec![food, rent]);
    }

    #[test]
    fn rename_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("a@example.com", &connection);
        let category = create_test_category("Food", user.id, &connection);
        let new_name = CategoryName::new_unchecked("Groceries");

        rename_category(category.id, new_name.clone(), user.id, &connection).unwrap();

        let got = get_category(category.id, user.id, &connection).unwrap();
        assert_eq!(got.name, new_name);
    }

    #[test]
    fn rename_category_of_other_user_fails() {
        let connection = get_test_connection();
        let owner = create_test_user("a@example.com", &connection);
        let other = create_test_user("b@example.com", &connection);
        let category = create_test_category("Food", owner.id, &connection);

        let result = rename_category(
            category.id,
            CategoryName::new_unchecked("Mine now"),
            other.id,
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_category_cascades_to_transactions() {
        let connection = get_test_connection();
        let user = create_test_user("a@example.com", &connection);
        let category = create_test_category("Food", user.id, &connection);
        let transaction = create_test_transaction(
            12.5,
            TransactionKind::Expense,
            &category,
            date!(2024 - 03 - 05),
            &connection,
        );

        delete_category(category.id, user.id, &connection).unwrap();

        assert_eq!(
            get_transaction(transaction.id, user.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_category_fails() {
        let connection = get_test_connection();
        let user = create_test_user("a@example.com", &connection);

        let result = delete_category(999, user.id, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }
}
