//! The route handlers that write CSV exports and serve them back to their owner.

use std::{
    io,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Clock, DatabaseId, Error, UserID,
    app_state::lock_connection,
    export::{
        ExportArtifact, ExportConfig,
        artifact::{export_failed, is_export_file_name},
        export_transactions,
    },
    extract::ApiPath,
};

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The time used to name export files.
    pub clock: Arc<dyn Clock>,
    /// Where export files are written and how they are named.
    pub export_config: ExportConfig,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
            export_config: state.export_config.clone(),
        }
    }
}

/// Export the user's transactions and respond with the URL of the file.
pub async fn export_transactions_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<ExportArtifact>, Error> {
    let now = state.clock.now()?;
    let connection = lock_connection(&state.db_connection)?;

    export_transactions(user_id, now, &state.export_config, &connection).map(Json)
}

/// Download one of the user's export files.
///
/// Files of other users are reported as not found, the same as files that do
/// not exist.
pub async fn get_export_file_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    ApiPath((owner_id, file_name)): ApiPath<(DatabaseId, String)>,
) -> Result<Response, Error> {
    if UserID::new(owner_id) != user_id || !is_export_file_name(&file_name) {
        tracing::warn!("user {user_id} requested export file {owner_id}/{file_name:?}");
        return Err(Error::NotFound);
    }

    let path = state.export_config.user_directory(user_id).join(&file_name);
    let contents = tokio::fs::read(&path).await.map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => Error::NotFound,
        _ => {
            tracing::error!("could not read export file {}: {error}", path.display());
            export_failed(error)
        }
    })?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        contents,
    )
        .into_response())
}
