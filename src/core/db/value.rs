/// Value Marshaling Module
///
/// Cells are read from SQLite into a tagged `CellValue` and only turned
/// into text at the boundary, so the read rule and the display rule can be
/// tested on their own.

use rusqlite::types::ValueRef;
use std::fmt;

/// Display form of SQL NULL.
///
/// A text cell containing the four characters `NULL` renders identically;
/// callers that care must tell them apart from the schema.
pub const NULL_MARKER: &str = "NULL";

/// A single cell value as SQLite stores it
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Renders the value for display
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Integer(i) => CellValue::Integer(i),
            ValueRef::Real(f) => CellValue::Real(f),
            ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => CellValue::Blob(b.to_vec()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str(NULL_MARKER),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Real(r) => write_real(f, *r),
            CellValue::Text(t) => f.write_str(t),
            CellValue::Blob(b) => {
                f.write_str("[")?;
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", byte)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Shortest round-trip digits, switching to exponent form when the decimal
/// exponent is below -4 or at least 6 (`1e+06`, `2.5e-07`).
fn write_real(f: &mut fmt::Formatter<'_>, r: f64) -> fmt::Result {
    if r.is_infinite() {
        return f.write_str(if r > 0.0 { "+Inf" } else { "-Inf" });
    }
    if r.is_nan() || r == 0.0 {
        return write!(f, "{}", r);
    }

    let scientific = format!("{:e}", r);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return write!(f, "{}", r),
    };
    if (-4..6).contains(&exponent) {
        write!(f, "{}", r)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}
