//! Output sinks for generated SQL scripts.

use crate::error::{ExportError, Result};
use crate::orchestrator::ExportMode;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for a table's generated statement sequence.
///
/// A sink is invoked once per (table, mode) with the complete script, so a
/// table that failed mid-generation never produces a partial file.
pub trait Sink: Send + Sync {
    /// Write the script and return where it landed.
    fn write(&self, mode: ExportMode, table: &str, statements: &[String]) -> Result<PathBuf>;
}

/// Writes one `<MODE>_<table>.sql` file per table per mode into a directory.
pub struct FileSink {
    output_dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into the given directory (created on demand).
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The directory this sink writes into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Sink for FileSink {
    fn write(&self, mode: ExportMode, table: &str, statements: &[String]) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}_{}.sql", mode.file_prefix(), table));

        let mut contents = statements.join("\n");
        contents.push('\n');

        std::fs::create_dir_all(&self.output_dir)
            .and_then(|_| std::fs::write(&path, contents))
            .map_err(|e| ExportError::sink(table, format!("{}: {}", path.display(), e)))?;

        info!("Wrote {} statements to {}", statements.len(), path.display());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_writes_one_statement_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        let statements = vec![
            "-- Inserts new records of T".to_string(),
            "INSERT INTO T(ID) SELECT 1 FROM dual;".to_string(),
        ];
        let path = sink
            .write(ExportMode::SyncDml, "T", &statements)
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "SYNC_DML_T.sql");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "-- Inserts new records of T\nINSERT INTO T(ID) SELECT 1 FROM dual;\n"
        );
    }

    #[test]
    fn test_file_sink_ddl_naming() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        let path = sink
            .write(ExportMode::Ddl, "EMP", &["CREATE TABLE EMP (...)".to_string()])
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "DDL_EMP.sql");
    }

    #[test]
    fn test_file_sink_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("sql");
        let sink = FileSink::new(&nested);

        let path = sink.write(ExportMode::Ddl, "T", &["x".to_string()]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_sink_unwritable_path_is_sink_error() {
        // A file used as a directory makes create_dir_all fail.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let sink = FileSink::new(blocker.join("out"));
        let err = sink
            .write(ExportMode::Ddl, "T", &["x".to_string()])
            .unwrap_err();

        assert!(matches!(err, ExportError::Sink { .. }));
    }
}
