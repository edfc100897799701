//! Error types for the export library.

use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cannot reach the database - fatal for the whole run
    #[error("Connection error: {0}")]
    Connection(String),

    /// Table or primary key not resolvable - fatal for that table only
    #[error("Metadata lookup failed for table {table}: {message}")]
    Metadata { table: String, message: String },

    /// Row fetch failed - fatal for that table only
    #[error("Row fetch failed for table {table}: {message}")]
    Query { table: String, message: String },

    /// A fetched row lacks a column the classification says should exist.
    /// Indicates a race between the catalog read and the row fetch.
    #[error("Schema mismatch for table {table}: row is missing column {column}")]
    SchemaMismatch { table: String, column: String },

    /// Output write failed - fatal for that table's output only
    #[error("Sink error for table {table}: {message}")]
    Sink { table: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create a Metadata error for a table
    pub fn metadata(table: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Metadata {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a Query error for a table
    pub fn query(table: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Query {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a Sink error for a table
    pub fn sink(table: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Sink {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Whether the error aborts the whole run rather than a single table.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExportError::Connection(_) | ExportError::Config(_) | ExportError::Yaml(_)
        )
    }

    /// Process exit code for the CLI: 1 for configuration problems,
    /// 2 when the database cannot be reached, 3 for anything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Config(_) | ExportError::Yaml(_) | ExportError::Io(_) => 1,
            ExportError::Connection(_) => 2,
            _ => 3,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
