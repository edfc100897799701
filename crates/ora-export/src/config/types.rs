//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source database connection parameters.
    pub database: DatabaseConfig,

    /// Export behavior configuration.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Oracle connection parameters, resolved through the ODBC driver manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// ODBC driver name as registered with the driver manager.
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Database host.
    pub host: String,

    /// Listener port (default: 1521).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Oracle service name.
    pub service: String,

    /// Username.
    pub user: String,

    /// Password.
    pub password: String,
}

/// Export behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for generated .sql files (default: current directory).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_driver() -> String {
    "Oracle ODBC Driver".to_string()
}

fn default_port() -> u16 {
    1521
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
