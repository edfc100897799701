//! Export orchestrator - main workflow coordinator.
//!
//! Tables are processed strictly sequentially: one table is fetched,
//! classified, built and written before the next begins. Per-table failures
//! are logged and accounted for without aborting the rest of the list; only
//! the initial connection failure stops the whole run.

use crate::config::Config;
use crate::dialect::{Dialect, Oracle11g};
use crate::dml::build_sync_dml;
use crate::error::Result;
use crate::sink::{FileSink, Sink};
use crate::source::{OracleOdbcPool, SourcePool};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// What to generate for each table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
    /// CREATE TABLE statement from the database metadata API.
    Ddl,
    /// INSERT/UPDATE/DELETE synchronization script.
    SyncDml,
}

impl ExportMode {
    /// File-name prefix for this mode's output.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ExportMode::Ddl => "DDL",
            ExportMode::SyncDml => "SYNC_DML",
        }
    }

    /// Human-readable mode name for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            ExportMode::Ddl => "DDL",
            ExportMode::SyncDml => "Sync DML",
        }
    }
}

/// Result of an export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Total tables processed.
    pub tables_total: usize,

    /// Tables fully exported.
    pub tables_success: usize,

    /// Tables that failed.
    pub tables_failed: usize,

    /// Names of the failed tables.
    pub failed_tables: Vec<String>,

    /// Output files produced, in processing order.
    pub files_written: Vec<PathBuf>,
}

impl ExportResult {
    /// Serialize the summary as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether every table was exported.
    pub fn all_succeeded(&self) -> bool {
        self.tables_failed == 0
    }
}

/// Export orchestrator.
pub struct Exporter {
    source: Box<dyn SourcePool>,
    dialect: Box<dyn Dialect>,
    sink: Box<dyn Sink>,
}

impl Exporter {
    /// Connect to the database described by the config and build the
    /// default Oracle exporter with a file sink.
    ///
    /// # Errors
    ///
    /// [`crate::ExportError::Connection`] when the database is unreachable;
    /// nothing is exported in that case.
    pub async fn new(config: &Config) -> Result<Self> {
        let source = OracleOdbcPool::new(&config.database).await?;
        Ok(Self::with_parts(
            Box::new(source),
            Box::new(Oracle11g::new()),
            Box::new(FileSink::new(&config.export.output_dir)),
        ))
    }

    /// Assemble an exporter from explicit collaborators.
    pub fn with_parts(
        source: Box<dyn SourcePool>,
        dialect: Box<dyn Dialect>,
        sink: Box<dyn Sink>,
    ) -> Self {
        Self {
            source,
            dialect,
            sink,
        }
    }

    /// Run the requested modes over the table list.
    pub async fn run(
        &self,
        modes: &[ExportMode],
        schema: &str,
        tables: &[String],
    ) -> Result<ExportResult> {
        let started = Instant::now();

        let mut tables_success = 0;
        let mut failed_tables = Vec::new();
        let mut files_written = Vec::new();

        for table in tables {
            match self.export_table(modes, schema, table).await {
                Ok(mut paths) => {
                    tables_success += 1;
                    files_written.append(&mut paths);
                }
                // Losing the connection is fatal for the whole run, not
                // just this table.
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("{}: export failed - {}", table, e);
                    failed_tables.push(table.clone());
                }
            }
        }

        let result = ExportResult {
            duration_seconds: started.elapsed().as_secs_f64(),
            tables_total: tables.len(),
            tables_success,
            tables_failed: failed_tables.len(),
            failed_tables,
            files_written,
        };

        info!(
            "Export finished: {}/{} tables in {:.2}s",
            result.tables_success, result.tables_total, result.duration_seconds
        );

        Ok(result)
    }

    /// Process one table completely: every requested mode, each written
    /// only after its full script was generated.
    async fn export_table(
        &self,
        modes: &[ExportMode],
        schema: &str,
        table: &str,
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(modes.len());

        for mode in modes {
            info!("Generating {} for {}", mode.describe(), table);

            let statements = match mode {
                ExportMode::Ddl => vec![self.source.ddl_for(schema, table).await?],
                ExportMode::SyncDml => {
                    let classification = self.source.classify(schema, table).await?;
                    let rows = self.source.fetch_all(schema, table).await?;
                    build_sync_dml(table, &classification, &rows, self.dialect.as_ref())?
                }
            };

            paths.push(self.sink.write(*mode, table, &statements)?);
        }

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::source::{ColumnClassification, Row, RowSet};
    use crate::value::SqlValue;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// In-memory source: one table "T" with a single row, everything else
    /// fails with a metadata error.
    struct StubSource;

    #[async_trait]
    impl SourcePool for StubSource {
        async fn classify(&self, _schema: &str, table: &str) -> Result<ColumnClassification> {
            if table != "T" {
                return Err(ExportError::metadata(table, "table not found in catalog"));
            }
            Ok(ColumnClassification {
                primary_key: vec!["ID".into()],
                non_nullable: vec!["NAME".into()],
                nullable: vec!["EMAIL".into()],
            })
        }

        async fn fetch_all(&self, _schema: &str, table: &str) -> Result<RowSet> {
            if table != "T" {
                return Err(ExportError::query(table, "no such table"));
            }
            let row: Row = [
                ("ID", SqlValue::Integer(1)),
                ("NAME", SqlValue::text("Ann")),
                ("EMAIL", SqlValue::Null),
            ]
            .into_iter()
            .collect();
            Ok(vec![row])
        }

        async fn ddl_for(&self, _schema: &str, table: &str) -> Result<String> {
            if table != "T" {
                return Err(ExportError::metadata(table, "table not found in catalog"));
            }
            Ok("CREATE TABLE T (ID NUMBER NOT NULL)".to_string())
        }
    }

    /// Sink recording what it was asked to write.
    #[derive(Default, Clone)]
    struct RecordingSink {
        writes: Arc<Mutex<Vec<(ExportMode, String, Vec<String>)>>>,
    }

    impl Sink for RecordingSink {
        fn write(
            &self,
            mode: ExportMode,
            table: &str,
            statements: &[String],
        ) -> Result<PathBuf> {
            self.writes
                .lock()
                .unwrap()
                .push((mode, table.to_string(), statements.to_vec()));
            Ok(PathBuf::from(format!("{}_{}.sql", mode.file_prefix(), table)))
        }
    }

    fn exporter(sink: Box<dyn Sink>) -> Exporter {
        Exporter::with_parts(Box::new(StubSource), Box::new(Oracle11g::new()), sink)
    }

    #[tokio::test]
    async fn test_run_continues_after_per_table_failure() {
        let result = exporter(Box::<RecordingSink>::default())
            .run(
                &[ExportMode::SyncDml],
                "APP",
                &["MISSING".to_string(), "T".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(result.tables_total, 2);
        assert_eq!(result.tables_success, 1);
        assert_eq!(result.tables_failed, 1);
        assert_eq!(result.failed_tables, vec!["MISSING".to_string()]);
        assert!(!result.all_succeeded());
    }

    #[tokio::test]
    async fn test_failed_table_writes_no_output() {
        let sink = RecordingSink::default();
        let writes = sink.writes.clone();

        exporter(Box::new(sink))
            .run(&[ExportMode::SyncDml], "APP", &["MISSING".to_string()])
            .await
            .unwrap();

        assert!(writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_both_modes_per_table_in_order() {
        let result = exporter(Box::<RecordingSink>::default())
            .run(
                &[ExportMode::Ddl, ExportMode::SyncDml],
                "APP",
                &["T".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(
            result.files_written,
            vec![PathBuf::from("DDL_T.sql"), PathBuf::from("SYNC_DML_T.sql")]
        );
    }

    #[tokio::test]
    async fn test_result_serializes_to_json() {
        let result = exporter(Box::<RecordingSink>::default())
            .run(&[ExportMode::Ddl], "APP", &["T".to_string()])
            .await
            .unwrap();

        let json = result.to_json().unwrap();
        assert!(json.contains("\"tables_success\": 1"));
    }

    #[test]
    fn test_mode_file_prefixes() {
        assert_eq!(ExportMode::Ddl.file_prefix(), "DDL");
        assert_eq!(ExportMode::SyncDml.file_prefix(), "SYNC_DML");
    }
}
