/// DBView Error Module
///
/// This module defines the error taxonomy shared by every database
/// operation. Each variant wraps the underlying cause so the message that
/// reaches the front-end always says what failed and why.
use std::path::PathBuf;
use thiserror::Error;

/// Error type for all dbview operations.
///
/// The variants fall into a few families:
/// - Connection state (`NoConnection`, `NoFileSelected`, `ConnectionFailure`)
/// - Policy rejections made before execution (`Rejected`, `UnknownTable`, `UnknownColumn`)
/// - Failures reported by SQLite (`Engine`) or while reading results (`Marshal`)
/// - Ambient concerns (configuration, I/O, JSON, lock poisoning)
#[derive(Error, Debug)]
pub enum DbViewError {
    /// An operation was attempted while no database is open
    #[error("no database open")]
    NoConnection,

    /// Open was called with an empty path
    #[error("no file selected")]
    NoFileSelected,

    /// Opening the file or the liveness check failed
    #[error("failed to connect to database {}: {source}", .path.display())]
    ConnectionFailure {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The read-query path was handed a statement it does not run
    #[error("statement rejected: {0}")]
    Rejected(String),

    /// A table name that is not in the catalog
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A column name that is not part of the table
    #[error("unknown column {column} in table {table}")]
    UnknownColumn { table: String, column: String },

    /// SQLite rejected a statement or failed while executing it
    #[error("failed to {context}: {source}")]
    Engine {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Reading column names or cell values failed after execution succeeded
    #[error("failed to {context}: {source}")]
    Marshal {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Configuration loading and validation errors
    #[error("configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors on the request channel
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The connection lock was poisoned by a panicking holder
    #[error("failed to acquire database lock")]
    Lock,
}

impl DbViewError {
    pub(crate) fn engine(context: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| DbViewError::Engine { context, source }
    }

    pub(crate) fn marshal(context: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| DbViewError::Marshal { context, source }
    }

    /// Stable, machine-readable tag for this error, used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            DbViewError::NoConnection => "no_connection",
            DbViewError::NoFileSelected => "no_file_selected",
            DbViewError::ConnectionFailure { .. } => "connection_failure",
            DbViewError::Rejected(_) => "rejected",
            DbViewError::UnknownTable(_) => "unknown_table",
            DbViewError::UnknownColumn { .. } => "unknown_column",
            DbViewError::Engine { .. } => "engine",
            DbViewError::Marshal { .. } => "marshal",
            DbViewError::Config(_) => "config",
            DbViewError::Io(_) => "io",
            DbViewError::Json(_) => "json",
            DbViewError::Lock => "lock",
        }
    }
}

/// Type alias for Result to use DbViewError as the error type.
pub type Result<T> = std::result::Result<T, DbViewError>;
