/// RPC Module
///
/// Request/response surface exposed to the front-end. Each operation is one
/// `Request` variant. `DatabaseService` owns the connection manager behind a
/// mutex and holds the lock for the whole of each operation, so a close or
/// re-open can never interleave with a query that is using the handle.

use crate::config::SqliteConfig;
use crate::core::db::{self, Column, ConnectionManager, TabularResult};
use crate::core::{DbViewError, Result};
use crate::filters::{FileFilter, FILE_FILTERS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::sync::Mutex;
use tracing::{debug, info};

/// One front-end request, tagged by operation name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Request {
    OpenDatabase {
        path: String,
    },
    GetTables,
    GetTableSchema {
        table: String,
    },
    ExecuteQuery {
        query: String,
    },
    GetTableData {
        table: String,
    },
    InsertRow {
        table: String,
        values: Vec<String>,
    },
    UpdateRow {
        table: String,
        column: String,
        value: String,
        where_column: String,
        where_value: String,
    },
    DeleteRow {
        table: String,
        where_column: String,
        where_value: String,
    },
    CloseDatabase,
    GetDatabasePath,
    GetFileFilters,
}

/// Error payload of a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

/// `{"ok": payload}` on success, `{"error": {...}}` on failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Ok(Value),
    Error(ErrorBody),
}

impl From<DbViewError> for Response {
    fn from(err: DbViewError) -> Self {
        Response::Error(ErrorBody {
            kind: err.kind().to_string(),
            message: err.to_string(),
        })
    }
}

impl<T: Serialize> From<Result<T>> for Response {
    fn from(result: Result<T>) -> Self {
        match result.and_then(|value| serde_json::to_value(value).map_err(DbViewError::from)) {
            Ok(value) => Response::Ok(value),
            Err(err) => err.into(),
        }
    }
}

/// Serializes every operation on one database connection
#[derive(Debug, Default)]
pub struct DatabaseService {
    manager: Mutex<ConnectionManager>,
}

impl DatabaseService {
    pub fn new(settings: SqliteConfig) -> Self {
        DatabaseService {
            manager: Mutex::new(ConnectionManager::new(settings)),
        }
    }

    fn with_manager<T>(&self, f: impl FnOnce(&mut ConnectionManager) -> Result<T>) -> Result<T> {
        let mut guard = self.manager.lock().map_err(|_| DbViewError::Lock)?;
        f(&mut *guard)
    }

    pub fn open_database(&self, path: &str) -> Result<String> {
        self.with_manager(|m| m.open(path))
            .map(|p| p.to_string_lossy().into_owned())
    }

    pub fn get_tables(&self) -> Result<Vec<String>> {
        self.with_manager(|m| db::list_tables(m.connection()?))
    }

    pub fn get_table_schema(&self, table: &str) -> Result<Vec<Column>> {
        self.with_manager(|m| db::get_schema(m.connection()?, table))
    }

    pub fn execute_query(&self, query: &str) -> Result<TabularResult> {
        self.with_manager(|m| db::execute_query(m.connection()?, query))
    }

    pub fn get_table_data(&self, table: &str) -> Result<TabularResult> {
        self.with_manager(|m| db::get_table_data(m.connection()?, table))
    }

    pub fn insert_row(&self, table: &str, values: &[String]) -> Result<()> {
        self.with_manager(|m| db::insert_row(m.connection()?, table, values))
            .map(|_| ())
    }

    pub fn update_row(
        &self,
        table: &str,
        column: &str,
        value: &str,
        where_column: &str,
        where_value: &str,
    ) -> Result<()> {
        self.with_manager(|m| {
            db::update_row(m.connection()?, table, column, value, where_column, where_value)
        })
        .map(|_| ())
    }

    pub fn delete_row(&self, table: &str, where_column: &str, where_value: &str) -> Result<()> {
        self.with_manager(|m| db::delete_row(m.connection()?, table, where_column, where_value))
            .map(|_| ())
    }

    pub fn close_database(&self) -> Result<()> {
        self.with_manager(|m| m.close())
    }

    /// Path of the open database, empty when nothing is open
    pub fn get_database_path(&self) -> String {
        self.with_manager(|m| {
            Ok(m.current_path()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default())
        })
        .unwrap_or_default()
    }

    pub fn get_file_filters(&self) -> &'static [FileFilter] {
        FILE_FILTERS
    }

    /// Dispatches one request
    pub fn handle(&self, request: Request) -> Response {
        debug!("Handling {:?}", request);
        match request {
            Request::OpenDatabase { path } => self.open_database(&path).into(),
            Request::GetTables => self.get_tables().into(),
            Request::GetTableSchema { table } => self.get_table_schema(&table).into(),
            Request::ExecuteQuery { query } => self.execute_query(&query).into(),
            Request::GetTableData { table } => self.get_table_data(&table).into(),
            Request::InsertRow { table, values } => self.insert_row(&table, &values).into(),
            Request::UpdateRow {
                table,
                column,
                value,
                where_column,
                where_value,
            } => self
                .update_row(&table, &column, &value, &where_column, &where_value)
                .into(),
            Request::DeleteRow {
                table,
                where_column,
                where_value,
            } => self.delete_row(&table, &where_column, &where_value).into(),
            Request::CloseDatabase => self.close_database().into(),
            Request::GetDatabasePath => Ok::<_, DbViewError>(self.get_database_path()).into(),
            Request::GetFileFilters => Ok::<_, DbViewError>(self.get_file_filters()).into(),
        }
    }

    /// Parses one JSON request line and dispatches it
    pub fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => DbViewError::from(e).into(),
        }
    }
}

/// Answers one JSON request per input line with one JSON response line.
///
/// Blank lines are skipped. Returns when the input is exhausted; only I/O
/// failures on the channel itself end the loop early.
pub fn serve<R: BufRead, W: Write>(service: &DatabaseService, input: R, mut output: W) -> Result<()> {
    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = service.handle_line(&line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }
    info!("Input closed after {} request(s)", handled);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TempDatabase;
    use serde_json::json;

    fn ok(response: Response) -> Value {
        match response {
            Response::Ok(value) => value,
            Response::Error(e) => panic!("Expected ok, got {:?}", e),
        }
    }

    fn error_kind(response: Response) -> String {
        match response {
            Response::Error(e) => e.kind,
            Response::Ok(v) => panic!("Expected error, got {}", v),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request: Request = serde_json::from_value(json!({
            "op": "UpdateRow",
            "table": "users",
            "column": "name",
            "value": "Bob",
            "where_column": "id",
            "where_value": "1"
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::UpdateRow {
                table: "users".into(),
                column: "name".into(),
                value: "Bob".into(),
                where_column: "id".into(),
                where_value: "1".into(),
            }
        );

        let unit: Request = serde_json::from_str(r#"{"op":"GetTables"}"#).unwrap();
        assert_eq!(unit, Request::GetTables);
    }

    #[test]
    fn test_response_wire_format() {
        let response: Response = Err::<(), _>(DbViewError::NoConnection).into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": {"kind": "no_connection", "message": "no database open"}})
        );

        let response: Response = Ok(()).into();
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"ok": null}));
    }

    #[test]
    fn test_operations_without_database() {
        let service = DatabaseService::default();
        assert_eq!(ok(service.handle(Request::GetDatabasePath)), json!(""));
        assert_eq!(ok(service.handle(Request::CloseDatabase)), Value::Null);

        let requests = vec![
            Request::GetTables,
            Request::GetTableSchema { table: "users".into() },
            Request::ExecuteQuery { query: "SELECT 1".into() },
            Request::GetTableData { table: "users".into() },
            Request::InsertRow {
                table: "users".into(),
                values: vec!["1".into()],
            },
            Request::DeleteRow {
                table: "users".into(),
                where_column: "id".into(),
                where_value: "1".into(),
            },
        ];
        for request in requests {
            assert_eq!(error_kind(service.handle(request)), "no_connection");
        }
    }

    #[test]
    fn test_open_query_close_roundtrip() {
        let db = TempDatabase::with_users();
        let service = DatabaseService::default();
        let path = db.path().to_string_lossy().into_owned();

        assert_eq!(ok(service.handle(Request::OpenDatabase { path: path.clone() })), json!(path));
        assert_eq!(ok(service.handle(Request::GetDatabasePath)), json!(path));
        assert_eq!(ok(service.handle(Request::GetTables)), json!(["users"]));

        let schema = ok(service.handle(Request::GetTableSchema { table: "users".into() }));
        assert_eq!(
            schema[0],
            json!({"Name": "id", "Type": "INTEGER", "NotNull": false, "DefaultValue": null, "PrimaryKey": true})
        );

        ok(service.handle(Request::InsertRow {
            table: "users".into(),
            values: vec!["1".into(), "Alice".into(), "a@x.com".into()],
        }));
        assert_eq!(
            ok(service.handle(Request::GetTableData { table: "users".into() })),
            json!({"Columns": ["id", "name", "email"], "Rows": [["1", "Alice", "a@x.com"]]})
        );

        assert_eq!(
            error_kind(service.handle(Request::ExecuteQuery { query: "DROP TABLE users".into() })),
            "rejected"
        );

        ok(service.handle(Request::CloseDatabase));
        assert_eq!(ok(service.handle(Request::GetDatabasePath)), json!(""));
        assert_eq!(error_kind(service.handle(Request::GetTables)), "no_connection");
    }

    #[test]
    fn test_malformed_lines() {
        let service = DatabaseService::default();
        assert_eq!(error_kind(service.handle_line("not json")), "json");
        assert_eq!(error_kind(service.handle_line(r#"{"op":"Explode"}"#)), "json");
        assert_eq!(error_kind(service.handle_line(r#"{"op":"GetTableData"}"#)), "json");
        assert_eq!(ok(service.handle_line(r#"{"op":"GetDatabasePath"}"#)), json!(""));
    }

    #[test]
    fn test_file_filters() {
        let service = DatabaseService::default();
        let filters = ok(service.handle(Request::GetFileFilters));
        assert_eq!(filters[0], json!({"DisplayName": "SQLite Database", "Pattern": "*.db"}));
    }

    #[test]
    fn test_serve_lines() {
        let db = TempDatabase::with_users();
        let service = DatabaseService::default();
        let input = format!(
            "{}\n\n{}\n{}\n",
            json!({"op": "OpenDatabase", "path": db.path()}),
            r#"{"op":"ExecuteQuery","query":"SELECT 1 AS one"}"#,
            "garbage"
        );

        let mut output = Vec::new();
        serve(&service, input.as_bytes(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].get("ok").is_some());
        assert_eq!(lines[1], json!({"ok": {"Columns": ["one"], "Rows": [["1"]]}}));
        assert_eq!(lines[2]["error"]["kind"], json!("json"));
    }
}
