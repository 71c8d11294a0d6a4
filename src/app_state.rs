//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};

use crate::{Clock, Error, db::initialize, export::ExportConfig};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key used to decrypt and verify the identity cookie.
    pub cookie_key: Key,

    /// The source of "now", used to resolve the current month.
    pub clock: Arc<dyn Clock>,

    /// Where export files are written and how they are named.
    pub export_config: ExportConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        clock: Arc<dyn Clock>,
        export_config: ExportConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            clock,
            export_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("clock", &self.clock)
            .field("export_config", &self.export_config)
            .finish_non_exhaustive()
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

/// Acquire the database connection for the duration of one request.
///
/// The lock is released when the returned guard goes out of scope, on both the
/// success and error paths of the caller.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::Error;

    use super::lock_connection;

    #[test]
    fn poisoned_lock_reports_lock_error() {
        let db_connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let poisoner = db_connection.clone();

        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            lock_connection(&db_connection),
            Err(Error::DatabaseLockError)
        ));
    }

    #[test]
    fn lock_is_released_after_scope_exit() {
        let db_connection = Mutex::new(Connection::open_in_memory().unwrap());

        {
            let _connection = lock_connection(&db_connection).unwrap();
        }

        assert!(db_connection.try_lock().is_ok());
    }
}
