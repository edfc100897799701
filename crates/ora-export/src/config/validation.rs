//! Configuration validation.

use super::Config;
use crate::error::{ExportError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.database.host.is_empty() {
        return Err(ExportError::Config("database.host is required".into()));
    }
    if config.database.service.is_empty() {
        return Err(ExportError::Config("database.service is required".into()));
    }
    if config.database.user.is_empty() {
        return Err(ExportError::Config("database.user is required".into()));
    }
    if config.database.driver.is_empty() {
        return Err(ExportError::Config("database.driver is required".into()));
    }
    if config.database.port == 0 {
        return Err(ExportError::Config(
            "database.port must be a valid port number".into(),
        ));
    }
    if config.export.output_dir.as_os_str().is_empty() {
        return Err(ExportError::Config(
            "export.output_dir must not be empty".into(),
        ));
    }

    Ok(())
}
