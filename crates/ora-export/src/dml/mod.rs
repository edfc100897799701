//! Sync DML generation - the core of the exporter.
//!
//! [`build_sync_dml`] turns a column classification and a row snapshot into
//! an ordered script of literal SQL text: idempotent INSERTs for rows
//! missing from the target, UPDATEs refreshing existing rows, and a single
//! DELETE removing rows absent from the source. The apply order (insert,
//! update, delete) is safe to run top to bottom.
//!
//! Only nullable non-key columns appear in the UPDATE pass; non-nullable
//! columns are treated as immutable once a row exists. This asymmetry is
//! deliberate but pending product sign-off, so changing it requires a
//! conscious decision, not a drive-by fix.

use crate::dialect::Dialect;
use crate::error::{ExportError, Result};
use crate::source::{ColumnClassification, Row};
use crate::value::SqlValue;

const SET_SEPARATOR: &str = ", ";
const WHERE_SEPARATOR: &str = " AND ";

/// Build the synchronization script for one table.
///
/// The output is an ordered sequence of statement and comment lines. Every
/// statement carries its trailing `;`. Column order follows the
/// classification throughout, so all statements of a run agree on it.
///
/// # Errors
///
/// [`ExportError::SchemaMismatch`] if a row lacks a column the
/// classification names - we fail fast rather than silently emitting NULL
/// for a column the catalog claims exists.
pub fn build_sync_dml(
    table: &str,
    classification: &ColumnClassification,
    rows: &[Row],
    dialect: &dyn Dialect,
) -> Result<Vec<String>> {
    let mut script = Vec::with_capacity(2 * rows.len() + 4);

    script.push(format!("-- Inserts new records of {table}"));
    for row in rows {
        script.push(insert_statement(table, classification, row, dialect)?);
    }

    script.push(format!("-- Updates records of {table}"));
    // A table without nullable columns has nothing to update; emitting the
    // statement anyway would produce an empty SET clause.
    if !classification.nullable.is_empty() {
        for row in rows {
            script.push(update_statement(table, classification, row, dialect)?);
        }
    }

    script.push(format!("-- Deletes other records of {table}"));
    // An empty source would yield `NOT IN ()`, which Oracle rejects. Emit
    // no DELETE instead of wiping the target on an empty snapshot.
    if !rows.is_empty() {
        script.push(delete_statement(table, classification, rows, dialect)?);
    }

    Ok(script)
}

/// `INSERT INTO t(pk,non_null) SELECT values FROM dual WHERE NOT EXISTS (...)`.
///
/// The existence guard matches the row's own primary key, so re-running the
/// script never duplicates a row that is already present.
fn insert_statement(
    table: &str,
    classification: &ColumnClassification,
    row: &Row,
    dialect: &dyn Dialect,
) -> Result<String> {
    let columns = column_list(classification.insert_columns());
    let values = value_list(table, row, classification.insert_columns(), dialect)?;
    let guard = equality_list(
        table,
        row,
        &classification.primary_key,
        dialect,
        WHERE_SEPARATOR,
    )?;

    Ok(format!(
        "INSERT INTO {table}({columns}) SELECT {values} {from} \
         WHERE NOT EXISTS (SELECT NULL FROM {table} WHERE {guard});",
        from = dialect.single_row_from()
    ))
}

/// `UPDATE t SET nullable = value, ... WHERE pk = value AND ...`.
fn update_statement(
    table: &str,
    classification: &ColumnClassification,
    row: &Row,
    dialect: &dyn Dialect,
) -> Result<String> {
    let assignments = equality_list(table, row, &classification.nullable, dialect, SET_SEPARATOR)?;
    let guard = equality_list(
        table,
        row,
        &classification.primary_key,
        dialect,
        WHERE_SEPARATOR,
    )?;

    Ok(format!("UPDATE {table} SET {assignments} WHERE {guard};"))
}

/// `DELETE FROM t WHERE (pk cols) NOT IN ((tuple),(tuple),...)`.
///
/// One parenthesized key tuple per source row, in row-set order.
fn delete_statement(
    table: &str,
    classification: &ColumnClassification,
    rows: &[Row],
    dialect: &dyn Dialect,
) -> Result<String> {
    let keys = column_list(classification.primary_key.iter().map(String::as_str));

    let tuples = rows
        .iter()
        .map(|row| {
            let values = value_list(
                table,
                row,
                classification.primary_key.iter().map(String::as_str),
                dialect,
            )?;
            Ok(format!("({values})"))
        })
        .collect::<Result<Vec<_>>>()?
        .join(",");

    Ok(format!("DELETE FROM {table} WHERE ({keys}) NOT IN ({tuples});"))
}

/// Comma-joined column names.
fn column_list<'a>(columns: impl Iterator<Item = &'a str>) -> String {
    columns.collect::<Vec<_>>().join(",")
}

/// Comma-joined rendered values for the named columns, in column order.
fn value_list<'a>(
    table: &str,
    row: &Row,
    columns: impl Iterator<Item = &'a str>,
    dialect: &dyn Dialect,
) -> Result<String> {
    let rendered = columns
        .map(|column| Ok(dialect.render_literal(required_value(table, row, column)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join(","))
}

/// `col = value` pairs joined with the given separator. Used both for SET
/// clauses (`, `) and primary-key predicates (` AND `).
fn equality_list(
    table: &str,
    row: &Row,
    columns: &[String],
    dialect: &dyn Dialect,
    separator: &str,
) -> Result<String> {
    let rendered = columns
        .iter()
        .map(|column| {
            Ok(format!(
                "{column} = {}",
                dialect.render_literal(required_value(table, row, column)?)
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join(separator))
}

fn required_value<'a>(table: &str, row: &'a Row, column: &str) -> Result<&'a SqlValue> {
    row.get(column).ok_or_else(|| ExportError::SchemaMismatch {
        table: table.to_string(),
        column: column.to_string(),
    })
}
