//! # ora-export
//!
//! Library for exporting SQL artifacts from a live Oracle database:
//!
//! - **DDL scripts** recreating a table's structure, via the database's
//!   own `DBMS_METADATA` API
//! - **Sync DML scripts** - the INSERT/UPDATE/DELETE sequence that brings a
//!   target table's contents in line with the source table's current
//!   snapshot, keyed on the primary key
//!
//! One file is written per table per mode; per-table failures are logged
//! and do not stop the remaining tables.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ora_export::{Config, Exporter, ExportMode};
//!
//! #[tokio::main]
//! async fn main() -> ora_export::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let exporter = Exporter::new(&config).await?;
//!     let result = exporter
//!         .run(&[ExportMode::SyncDml], "APP", &["EMP".to_string()])
//!         .await?;
//!     println!("Exported {}/{} tables", result.tables_success, result.tables_total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dialect;
pub mod dml;
pub mod error;
pub mod orchestrator;
pub mod sink;
pub mod source;
pub mod value;

// Re-exports for convenient access
pub use config::{Config, DatabaseConfig, ExportConfig};
pub use dialect::{Dialect, Oracle11g};
pub use dml::build_sync_dml;
pub use error::{ExportError, Result};
pub use orchestrator::{ExportMode, ExportResult, Exporter};
pub use sink::{FileSink, Sink};
pub use source::{ColumnClassification, OracleOdbcPool, Row, RowSet, SourcePool};
pub use value::SqlValue;
