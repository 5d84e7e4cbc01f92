/// File Filters Module
///
/// Filters offered to whatever picks the database file. Choosing the file
/// is the front-end's job; this module only describes which extensions it
/// should offer.

use serde::Serialize;
use std::path::Path;

/// One entry of a file-open dialog's filter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFilter {
    #[serde(rename = "DisplayName")]
    pub display_name: &'static str,
    #[serde(rename = "Pattern")]
    pub pattern: &'static str,
}

/// Filters in the order they should be offered
pub const FILE_FILTERS: &[FileFilter] = &[
    FileFilter {
        display_name: "SQLite Database",
        pattern: "*.db",
    },
    FileFilter {
        display_name: "SQLite Database",
        pattern: "*.sqlite",
    },
    FileFilter {
        display_name: "SQLite Database",
        pattern: "*.sqlite3",
    },
    FileFilter {
        display_name: "All Files",
        pattern: "*.*",
    },
];

/// Extensions recognised as SQLite databases, without the dot
pub const DATABASE_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];

/// Whether `path` carries one of the database extensions (any case)
pub fn has_database_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DATABASE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
