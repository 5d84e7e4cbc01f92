/// Query Execution Module
///
/// Runs read-only queries and materializes their results as a
/// `TabularResult` of display strings. Two entry points exist: a raw SQL
/// console (`execute_query`) and a full-table scan (`get_table_data`).

use crate::core::db::identifier::{ensure_table, quote_identifier};
use crate::core::db::value::CellValue;
use crate::core::{DbViewError, Result};
use rusqlite::{Batch, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Column names plus fully materialized rows of rendered cells.
///
/// Every row has exactly `columns.len()` cells. Column names are kept as
/// the engine reports them, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularResult {
    /// Column names from the query result
    #[serde(rename = "Columns")]
    pub columns: Vec<String>,
    /// Rows of data as string values
    #[serde(rename = "Rows")]
    pub rows: Vec<Vec<String>>,
}

impl TabularResult {
    /// Creates a new TabularResult from column names and row data
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        TabularResult { columns, rows }
    }

    /// Number of rows returned
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Represents different SQL statement types for introspection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    /// BEGIN/COMMIT/ROLLBACK transaction commands
    Transaction,
    Other,
}

impl StatementType {
    /// Classifies a statement by its leading keyword.
    ///
    /// This is a prefix test on the trimmed, upper-cased text, not a parse:
    /// `SELECTfoo` classifies as `Select` and is left to the engine to
    /// reject.
    pub fn from_sql(sql: &str) -> Self {
        let sql_upper = sql.trim().to_uppercase();

        if sql_upper.starts_with("SELECT") {
            StatementType::Select
        } else if sql_upper.starts_with("INSERT") {
            StatementType::Insert
        } else if sql_upper.starts_with("UPDATE") {
            StatementType::Update
        } else if sql_upper.starts_with("DELETE") {
            StatementType::Delete
        } else if sql_upper.starts_with("CREATE") {
            StatementType::Create
        } else if sql_upper.starts_with("DROP") {
            StatementType::Drop
        } else if sql_upper.starts_with("ALTER") {
            StatementType::Alter
        } else if sql_upper.starts_with("BEGIN")
            || sql_upper.starts_with("COMMIT")
            || sql_upper.starts_with("ROLLBACK")
            || sql_upper.starts_with("END")
        {
            StatementType::Transaction
        } else {
            StatementType::Other
        }
    }
}

/// Executes a caller-supplied read query.
///
/// Only text that starts with `SELECT` (after trimming, any case) is
/// accepted; everything else is rejected before the engine sees it. The
/// text is otherwise run as-is, with no parameters.
///
/// # Errors
///
/// - `DbViewError::Rejected` for non-SELECT text, or a statement the engine
///   reports as writing to the database
/// - `DbViewError::Engine` if SQLite cannot prepare or step the statement
/// - `DbViewError::Marshal` if a column name or cell cannot be read
///
/// A failure on any row discards the rows read so far.
pub fn execute_query(conn: &Connection, sql: &str) -> Result<TabularResult> {
    let kind = StatementType::from_sql(sql);
    if kind != StatementType::Select {
        warn!("Rejected {:?} statement on the read path", kind);
        return Err(DbViewError::Rejected(format!(
            "only SELECT queries are supported, got {:?}",
            kind
        )));
    }

    run_tabular(conn, sql, "execute query")
}

/// Returns every row of `table_name`, as `SELECT * FROM <table>` would.
pub fn get_table_data(conn: &Connection, table_name: &str) -> Result<TabularResult> {
    let table = ensure_table(conn, table_name)?;
    let sql = format!("SELECT * FROM {}", quote_identifier(&table));
    run_tabular(conn, &sql, "query table data")
}

fn run_tabular(conn: &Connection, sql: &str, context: &'static str) -> Result<TabularResult> {
    let mut batch = Batch::new(conn, sql);
    let mut stmt = batch
        .next()
        .map_err(DbViewError::engine(context))?
        .ok_or_else(|| DbViewError::engine(context)(rusqlite::Error::InvalidQuery))?;

    // Trailing semicolons, whitespace and comments prepare to nothing and are skipped
    if batch.next().map_err(DbViewError::engine(context))?.is_some() {
        warn!("Rejected text holding more than one statement");
        return Err(DbViewError::engine(context)(rusqlite::Error::MultipleStatement));
    }

    if !stmt.readonly() {
        warn!("Rejected statement that writes to the database");
        return Err(DbViewError::Rejected(
            "statement is not read-only".to_string(),
        ));
    }

    let column_count = stmt.column_count();
    let columns = (0..column_count)
        .map(|i| stmt.column_name(i).map(String::from))
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(DbViewError::marshal("get columns"))?;

    let mut rows = stmt.query([]).map_err(DbViewError::engine(context))?;
    let mut result = TabularResult::new(columns, Vec::new());

    while let Some(row) = rows.next().map_err(DbViewError::engine(context))? {
        let cells = (0..column_count)
            .map(|i| row.get_ref(i).map(|v| CellValue::from(v).render()))
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DbViewError::marshal("scan row"))?;
        result.rows.push(cells);
    }

    debug!(
        "Query returned {} rows x {} columns",
        result.row_count(),
        result.columns.len()
    );
    Ok(result)
}
