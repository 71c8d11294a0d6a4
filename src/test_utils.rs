#![allow(missing_docs)]

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};
use rusqlite::Connection;
use time::Date;

use crate::{
    COOKIE_USER_ID, Category, CategoryName, PasswordHash, Transaction, TransactionKind, User,
    UserID, create_category, create_transaction, create_user, db::initialize, user::NewUser,
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    connection
}

pub(crate) fn create_test_user(email: &str, connection: &Connection) -> User {
    create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: email.to_owned(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        },
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn create_test_category(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Category {
    create_category(CategoryName::new_unchecked(name), user_id, connection)
        .expect("Could not create test category")
}

pub(crate) fn create_test_transaction(
    amount: f64,
    kind: TransactionKind,
    category: &Category,
    date: Date,
    connection: &Connection,
) -> Transaction {
    create_transaction(
        Transaction::build(amount, kind, category.id, date),
        category.user_id,
        connection,
    )
    .expect("Could not create test transaction")
}

/// Encrypt an identity cookie for `user_id` the same way the log-in service does.
pub(crate) fn auth_cookie(key: &Key, user_id: UserID) -> Cookie<'static> {
    let jar = PrivateCookieJar::new(key.clone())
        .add(Cookie::new(COOKIE_USER_ID, user_id.as_i64().to_string()));
    let response = jar.into_response();
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("Set-Cookie header missing")
        .to_str()
        .expect("Could not convert to str")
        .to_owned();

    Cookie::parse(header).expect("Could not parse cookie")
}
