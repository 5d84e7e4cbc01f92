/// Connection Management Module
///
/// This module owns the single active database handle and the path it was
/// opened from. There is no global state: the front-end holds a
/// `ConnectionManager` and passes it (or the `&Connection` it lends out) to
/// every other operation.

use crate::config::SqliteConfig;
use crate::core::{DbViewError, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// An open database handle together with the file it came from
#[derive(Debug)]
struct ActiveDatabase {
    path: PathBuf,
    connection: Connection,
}

/// Connection manager holding at most one open database
#[derive(Debug, Default)]
pub struct ConnectionManager {
    /// Settings applied to every handle this manager opens
    settings: SqliteConfig,
    /// The open database, if any. Path and handle live and die together.
    active: Option<ActiveDatabase>,
}

impl ConnectionManager {
    /// Creates a manager with nothing open
    pub fn new(settings: SqliteConfig) -> Self {
        ConnectionManager {
            settings,
            active: None,
        }
    }

    /// Opens the SQLite database at `path`, replacing any open one.
    ///
    /// The previous handle is closed first. A failure to close it is logged
    /// and otherwise ignored so it can never block opening the replacement.
    /// The new handle must pass a liveness check (a read of the catalog)
    /// before it is installed; on any failure no handle is left open.
    ///
    /// # Returns
    ///
    /// The path of the newly opened database.
    ///
    /// # Errors
    ///
    /// `DbViewError::NoFileSelected` for an empty path,
    /// `DbViewError::ConnectionFailure` if the file cannot be opened or is
    /// not a database.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DbViewError::NoFileSelected);
        }

        if let Some(previous) = self.active.take() {
            debug!("Closing {:?} before opening {:?}", previous.path, path);
            if let Err((_, e)) = previous.connection.close() {
                warn!("Ignoring error while closing {:?}: {}", previous.path, e);
            }
        }

        let connection = self.connect(path).map_err(|source| DbViewError::ConnectionFailure {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Opened database {:?}", path);
        self.active = Some(ActiveDatabase {
            path: path.to_path_buf(),
            connection,
        });
        Ok(path.to_path_buf())
    }

    fn connect(&self, path: &Path) -> rusqlite::Result<Connection> {
        let connection = Connection::open(path)?;

        if let Some(ms) = self.settings.busy_timeout_ms {
            connection.busy_timeout(Duration::from_millis(ms))?;
        }
        if let Some(enabled) = self.settings.foreign_keys {
            connection.pragma_update(None, "foreign_keys", enabled)?;
        }

        // Opening is lazy about the file contents; reading the catalog is
        // what fails for a file that is not a database.
        connection.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })?;

        Ok(connection)
    }

    /// Closes the open database, if any.
    ///
    /// Path and handle are cleared even when SQLite reports an error while
    /// closing.
    pub fn close(&mut self) -> Result<()> {
        let Some(active) = self.active.take() else {
            return Ok(());
        };

        info!("Closing database {:?}", active.path);
        active
            .connection
            .close()
            .map_err(|(_, e)| DbViewError::engine("close database")(e))
    }

    /// Path of the open database, `None` when nothing is open
    pub fn current_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    /// Checks if there's an active database connection
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Borrows the open handle.
    ///
    /// # Errors
    ///
    /// `DbViewError::NoConnection` when nothing is open.
    pub fn connection(&self) -> Result<&Connection> {
        self.active
            .as_ref()
            .map(|a| &a.connection)
            .ok_or(DbViewError::NoConnection)
    }
}
