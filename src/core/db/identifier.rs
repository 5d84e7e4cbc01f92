/// Identifier Module
///
/// Table and column names cannot be bound as parameters, so they are
/// interpolated into statement text. Before that happens each name is
/// checked against the catalog of the open database and then quoted.

use crate::core::db::schema::{list_tables, read_columns};
use crate::core::{DbViewError, Result};
use rusqlite::Connection;

/// Quotes `name` as an SQL identifier, doubling embedded double quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Resolves `name` to a user table of the open database.
///
/// SQLite identifiers are ASCII case-insensitive, so the match is too; the
/// catalog spelling is returned.
pub fn ensure_table(conn: &Connection, name: &str) -> Result<String> {
    list_tables(conn)?
        .into_iter()
        .find(|table| table.eq_ignore_ascii_case(name))
        .ok_or_else(|| DbViewError::UnknownTable(name.to_string()))
}

/// Resolves `columns` against the columns of `table`, which must already
/// be a catalog name. Returns the catalog spellings in the same order.
pub fn ensure_columns(conn: &Connection, table: &str, columns: &[&str]) -> Result<Vec<String>> {
    let known = read_columns(conn, table)?;
    columns
        .iter()
        .map(|wanted| {
            known
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(wanted))
                .map(|c| c.name.clone())
                .ok_or_else(|| DbViewError::UnknownColumn {
                    table: table.to_string(),
                    column: wanted.to_string(),
                })
        })
        .collect()
}
