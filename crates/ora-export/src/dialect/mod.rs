//! SQL dialect (Strategy pattern).
//!
//! A dialect owns the textual value grammar of one database: how a typed
//! value becomes a literal, and which dummy table provides a single-row
//! SELECT source. The DML builder is written against this trait so further
//! dialects can be added without touching it.

mod oracle;

pub use oracle::Oracle11g;

use crate::value::SqlValue;

/// Database-specific SQL text concerns.
pub trait Dialect: Send + Sync {
    /// Dialect name for logs.
    fn name(&self) -> &str;

    /// Render a typed value as a SQL literal.
    ///
    /// Deterministic and side-effect free: the same value always renders
    /// to the same text.
    fn render_literal(&self, value: &SqlValue) -> String;

    /// FROM clause naming the dialect's single-row dummy table, used by
    /// the idempotent INSERT ... SELECT shape.
    fn single_row_from(&self) -> &str;
}
