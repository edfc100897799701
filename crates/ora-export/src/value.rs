//! Typed SQL values as fetched from the source database.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// A single column value from a fetched row.
///
/// The variants cover the value families the literal renderer distinguishes:
/// NULL, quoted text, timestamps rendered through the dialect's conversion
/// function, and the unquoted printable types.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,

    /// Character data.
    Text(String),

    /// Timestamp without timezone (Oracle DATE carries time of day).
    DateTime(NaiveDateTime),

    /// Integral number.
    Integer(i64),

    /// Exact numeric with scale.
    Decimal(Decimal),

    /// Floating point number.
    Float(f64),

    /// Boolean (reported by some ODBC drivers for BIT-like columns).
    Bool(bool),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        SqlValue::Text(s.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}
