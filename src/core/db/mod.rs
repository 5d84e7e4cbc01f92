/// Database Module
///
/// This module provides the database functionality for DBView, organized
/// into focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): Owns the single open handle and its path
/// - **Schema Introspection** (`schema.rs`): Lists tables and column metadata
/// - **Query Execution** (`query.rs`): Runs read-only queries into a `TabularResult`
/// - **Value Marshaling** (`value.rs`): Tagged cell values and their display form
/// - **Identifiers** (`identifier.rs`): Catalog allow-list checks and quoting
/// - **Mutations** (`mutation.rs`): Parameterized INSERT/UPDATE/DELETE
///
/// ## Error Handling
///
/// All database operations use the standardized `DbViewError` type. Every
/// operation other than open/close takes a `&Connection` obtained from
/// `ConnectionManager::connection()`, which fails with
/// `DbViewError::NoConnection` when nothing is open.
pub mod connection;
pub mod identifier;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod value;

pub use connection::*;
pub use identifier::*;
pub use mutation::*;
pub use query::*;
pub use schema::*;
pub use value::*;
