//! Column classification and row snapshot types.

use crate::value::SqlValue;
use std::collections::HashMap;

/// Partition of a table's columns into the three sets the sync script
/// distinguishes.
///
/// The three sets are pairwise disjoint and together cover every column of
/// the table. Order within each set is significant: it fixes the
/// left-to-right ordering of columns and values in every generated
/// statement for a run. Primary-key columns are ordered by constraint
/// position, the other two sets by catalog column id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnClassification {
    /// Columns of the table's primary-key constraint.
    pub primary_key: Vec<String>,

    /// Remaining columns the catalog reports as NOT NULL.
    pub non_nullable: Vec<String>,

    /// Remaining nullable columns.
    pub nullable: Vec<String>,
}

impl ColumnClassification {
    /// Total number of classified columns.
    pub fn column_count(&self) -> usize {
        self.primary_key.len() + self.non_nullable.len() + self.nullable.len()
    }

    /// Columns appearing in generated INSERT statements, in statement
    /// order: primary key first, then the non-nullable columns.
    pub fn insert_columns(&self) -> impl Iterator<Item = &str> {
        self.primary_key
            .iter()
            .chain(self.non_nullable.iter())
            .map(String::as_str)
    }
}

/// One fetched record: an immutable snapshot mapping column name (case as
/// returned by the database) to its typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, SqlValue>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: SqlValue) {
        self.values.insert(column.into(), value);
    }

    /// Look up a column value by name.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SqlValue)> for Row {
    fn from_iter<T: IntoIterator<Item = (S, SqlValue)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// The full current contents of the source table at fetch time, in fetch
/// order.
pub type RowSet = Vec<Row>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_columns_order_pk_first() {
        let classification = ColumnClassification {
            primary_key: vec!["ID".into(), "REV".into()],
            non_nullable: vec!["NAME".into()],
            nullable: vec!["EMAIL".into()],
        };
        let cols: Vec<&str> = classification.insert_columns().collect();
        assert_eq!(cols, vec!["ID", "REV", "NAME"]);
        assert_eq!(classification.column_count(), 4);
    }

    #[test]
    fn test_row_lookup() {
        let row: Row = [("ID", SqlValue::Integer(1)), ("EMAIL", SqlValue::Null)]
            .into_iter()
            .collect();
        assert_eq!(row.get("ID"), Some(&SqlValue::Integer(1)));
        assert_eq!(row.get("EMAIL"), Some(&SqlValue::Null));
        assert_eq!(row.get("MISSING"), None);
        assert_eq!(row.len(), 2);
    }
}
