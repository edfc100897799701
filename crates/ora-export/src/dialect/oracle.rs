//! Oracle 11g SQL dialect.

use super::Dialect;
use crate::value::SqlValue;

/// chrono format for timestamp literals: year down to seconds, two-digit padded.
const DATETIME_CHRONO_FORMAT: &str = "%Y%m%d%H%M%S";

/// Matching Oracle parse pattern passed to to_date().
const DATETIME_ORACLE_PATTERN: &str = "yyyymmddhh24miss";

/// Oracle 11g dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct Oracle11g;

impl Oracle11g {
    /// Create a new Oracle 11g dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for Oracle11g {
    fn name(&self) -> &str {
        "oracle11g"
    }

    fn render_literal(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Null => "null".to_string(),
            // SQL standard escaping: embedded single quotes doubled
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::DateTime(t) => format!(
                "to_date('{}', '{}')",
                t.format(DATETIME_CHRONO_FORMAT),
                DATETIME_ORACLE_PATTERN
            ),
            SqlValue::Integer(v) => v.to_string(),
            SqlValue::Decimal(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Bool(v) => v.to_string(),
        }
    }

    fn single_row_from(&self) -> &str {
        "FROM dual"
    }
}
