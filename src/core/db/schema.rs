/// Schema Introspection Module
///
/// Lists the user tables of the open database and describes their columns.
/// Nothing is cached: every call reads the catalog again.

use crate::core::db::identifier::ensure_table;
use crate::core::{DbViewError, Result};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

/// Represents a database column with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    #[serde(rename = "Name")]
    pub name: String,
    /// Declared type as written in the table definition, possibly empty
    #[serde(rename = "Type")]
    pub type_name: String,
    /// Whether the column was declared NOT NULL
    #[serde(rename = "NotNull")]
    pub notnull: bool,
    /// Default value expression; `None` when the column has no default
    #[serde(rename = "DefaultValue")]
    pub dflt_value: Option<String>,
    /// Whether this column is part of the primary key
    #[serde(rename = "PrimaryKey")]
    pub pk: bool,
}

impl Column {
    /// Creates a Column from a `pragma_table_info` result row
    fn from_pragma_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Column {
            name: row.get(1)?,
            type_name: row.get(2)?,
            notnull: row.get(3)?,
            dflt_value: row.get(4)?,
            // 0 for non-key columns, otherwise the 1-based position in the key
            pk: row.get::<_, i64>(5)? > 0,
        })
    }
}

/// Returns the names of all user tables, sorted ascending.
///
/// SQLite's internal `sqlite_*` tables are excluded. An empty database
/// yields an empty list.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type='table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .map_err(DbViewError::engine("query tables"))?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(DbViewError::engine("query tables"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(DbViewError::marshal("scan table name"))?;

    Ok(names)
}

/// Returns the columns of `table_name` in declaration order.
///
/// The name is checked against the catalog first, so an unknown table is
/// reported as `DbViewError::UnknownTable` rather than an empty list.
pub fn get_schema(conn: &Connection, table_name: &str) -> Result<Vec<Column>> {
    let table = ensure_table(conn, table_name)?;
    read_columns(conn, &table)
}

/// Reads column metadata without checking the table name.
///
/// The name is bound as a parameter, never interpolated.
pub(crate) fn read_columns(conn: &Connection, table: &str) -> Result<Vec<Column>> {
    let mut stmt = conn
        .prepare("SELECT cid, name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)")
        .map_err(DbViewError::engine("query table schema"))?;

    let columns = stmt
        .query_map([table], |row| Column::from_pragma_row(row))
        .map_err(DbViewError::engine("query table schema"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(DbViewError::marshal("scan column info"))?;

    Ok(columns)
}
