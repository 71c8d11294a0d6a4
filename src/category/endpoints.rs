//! JSON route handlers for managing categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    app_state::lock_connection,
    extract::{ApiJson, ApiPath},
    category::{
        Category, CategoryForm, CategoryName, create_category, delete_category, get_categories,
        rename_category,
    },
    database_id::CategoryId,
};

/// The state needed to manage categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's categories.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_categories(user_id, &connection)
        .inspect_err(|error| {
            tracing::error!("could not get categories for user {user_id}: {error}")
        })
        .map(Json)
}

/// Create a category, responding with `201 Created` and the new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(name, user_id, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Rename one of the user's categories.
pub async fn rename_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<Json<Category>, Error> {
    let name = CategoryName::new(&form.name)?;
    let connection = lock_connection(&state.db_connection)?;

    rename_category(category_id, name, user_id, &connection).map(Json)
}

/// Delete one of the user's categories and, through the cascade, its transactions.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_category(category_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
