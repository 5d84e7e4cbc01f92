/// Mutation Module
///
/// Builds and runs the three structured write operations the front-end may
/// perform. Values are always bound as text parameters and SQLite applies
/// column affinity to them; identifiers are resolved against the catalog
/// and quoted.
///
/// UPDATE and DELETE affect every row matching the equality predicate.

use crate::core::db::identifier::{ensure_columns, ensure_table, quote_identifier};
use crate::core::{DbViewError, Result};
use rusqlite::{params, params_from_iter, Connection};
use tracing::info;

/// Inserts one row with `values` bound positionally.
///
/// Values must be given in the table's column order. A count mismatch is
/// left to SQLite to report.
///
/// # Returns
///
/// The number of rows inserted.
pub fn insert_row(conn: &Connection, table_name: &str, values: &[String]) -> Result<usize> {
    let table = ensure_table(conn, table_name)?;
    let placeholders = vec!["?"; values.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} VALUES ({})",
        quote_identifier(&table),
        placeholders
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(DbViewError::engine("prepare insert statement"))?;
    let inserted = stmt
        .execute(params_from_iter(values.iter()))
        .map_err(DbViewError::engine("insert row"))?;

    info!("Inserted {} row(s) into {}", inserted, table);
    Ok(inserted)
}

/// Sets `column` to `value` on every row where `where_column` equals
/// `where_value`.
///
/// # Returns
///
/// The number of rows updated.
pub fn update_row(
    conn: &Connection,
    table_name: &str,
    column: &str,
    value: &str,
    where_column: &str,
    where_value: &str,
) -> Result<usize> {
    let table = ensure_table(conn, table_name)?;
    let resolved = ensure_columns(conn, &table, &[column, where_column])?;
    let sql = format!(
        "UPDATE {} SET {} = ? WHERE {} = ?",
        quote_identifier(&table),
        quote_identifier(&resolved[0]),
        quote_identifier(&resolved[1])
    );

    let updated = conn
        .execute(&sql, params![value, where_value])
        .map_err(DbViewError::engine("update row"))?;

    info!(
        "Updated {} row(s) in {} where {} matched",
        updated, table, resolved[1]
    );
    Ok(updated)
}

/// Deletes every row where `where_column` equals `where_value`.
///
/// # Returns
///
/// The number of rows deleted.
pub fn delete_row(
    conn: &Connection,
    table_name: &str,
    where_column: &str,
    where_value: &str,
) -> Result<usize> {
    let table = ensure_table(conn, table_name)?;
    let resolved = ensure_columns(conn, &table, &[where_column])?;
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?",
        quote_identifier(&table),
        quote_identifier(&resolved[0])
    );

    let deleted = conn
        .execute(&sql, [where_value])
        .map_err(DbViewError::engine("delete row"))?;

    info!("Deleted {} row(s) from {}", deleted, table);
    Ok(deleted)
}
