/// Core Module for DBView
///
/// This module contains the database access layer that the front-end calls
/// into: connection lifecycle, schema introspection, read queries and row
/// mutations, together with the error type they share.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{DbViewError, Result};
