/// # Test Utilities Module
///
/// Fixtures for unit and scenario tests. Every fixture is a real database
/// file in its own temporary directory, so tests never share state and the
/// code under test goes through the same open path the front-end uses.

use crate::core::db::ConnectionManager;
use rusqlite::Connection;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// The table used by the end-to-end scenarios
pub const USERS_SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT
    );
";

/// A richer schema with defaults, a composite key and a system table
pub const SAMPLE_SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT
    );
    CREATE TABLE posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        score REAL DEFAULT 0.5,
        body BLOB
    );
    CREATE TABLE tags (
        post_id INTEGER NOT NULL,
        label TEXT NOT NULL,
        PRIMARY KEY (post_id, label)
    );
    CREATE TABLE \"order items\" (sku TEXT, qty INTEGER);
";

/// A database file in a temporary directory that is removed on drop
pub struct TempDatabase {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDatabase {
    /// Creates a database file initialised with `schema`
    pub fn with_schema(schema: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("fixture.db");
        let conn = Connection::open(&path).expect("Failed to create fixture database");
        conn.execute_batch(schema).expect("Failed to apply fixture schema");
        TempDatabase { _dir: dir, path }
    }

    /// A valid database with no tables
    pub fn empty() -> Self {
        Self::with_schema("")
    }

    /// A database with only the `users` table
    pub fn with_users() -> Self {
        Self::with_schema(USERS_SCHEMA)
    }

    /// A database with the full sample schema
    pub fn with_sample_schema() -> Self {
        Self::with_schema(SAMPLE_SCHEMA)
    }

    /// A `users` database switched to write-ahead logging.
    ///
    /// SQLite removes the `-wal` file when the last connection to the
    /// database closes, which makes a leaked handle visible on disk.
    pub fn with_users_wal() -> Self {
        let db = Self::with_users();
        let conn = Connection::open(&db.path).expect("Failed to open fixture database");
        let mode: String = conn
            .query_row("PRAGMA journal_mode=WAL", [], |r| r.get(0))
            .expect("Failed to switch fixture to WAL");
        assert_eq!(mode, "wal");
        db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the write-ahead log next to the database file
    pub fn wal_path(&self) -> PathBuf {
        let mut wal = self.path.clone().into_os_string();
        wal.push("-wal");
        PathBuf::from(wal)
    }

    /// Whether a fresh connection can take an exclusive lock on the file
    pub fn can_lock_exclusively(&self) -> bool {
        let conn = Connection::open(&self.path).expect("Failed to open fixture database");
        conn.execute_batch("BEGIN EXCLUSIVE; COMMIT;").is_ok()
    }

    /// Runs SQL directly against the file, bypassing the code under test
    pub fn seed(&self, sql: &str) {
        let conn = Connection::open(&self.path).expect("Failed to open fixture database");
        conn.execute_batch(sql).expect("Failed to seed fixture database");
    }

    /// Opens this database in a fresh manager
    pub fn open(&self) -> ConnectionManager {
        let mut manager = ConnectionManager::default();
        manager.open(&self.path).expect("Failed to open fixture database");
        manager
    }
}

/// A non-empty file that is not a SQLite database
pub fn garbage_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    let junk = "this is definitely not a sqlite database file\n".repeat(64);
    file.write_all(junk.as_bytes()).expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Helper macro matching an error variant with a readable failure message
#[macro_export]
macro_rules! assert_dbview_error {
    ($result:expr, $pattern:pat, $context:expr) => {
        match $result {
            Err($pattern) => {}
            Ok(_) => panic!("Expected {} but got Ok in {}", stringify!($pattern), $context),
            Err(other) => panic!(
                "Expected {} but got {:?} in {}",
                stringify!($pattern),
                other,
                $context
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_tables() {
        let db = TempDatabase::with_sample_schema();
        let conn = Connection::open(db.path()).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_garbage_file_is_not_empty() {
        let file = garbage_file();
        assert!(std::fs::metadata(file.path()).unwrap().len() > 100);
    }
}
