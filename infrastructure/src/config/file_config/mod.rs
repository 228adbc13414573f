//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod audit;
mod logging;
mod output;
mod scheduler;
mod store;

pub use audit::FileAuditConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use scheduler::FileSchedulerConfig;
pub use store::FileStoreConfig;

use agora_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Stage reconciliation settings
    pub scheduler: FileSchedulerConfig,
    /// Decision store settings
    pub store: FileStoreConfig,
    /// Audit log settings
    pub audit: FileAuditConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log file settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Every issue found here is recoverable: the affected value falls back
    /// to its default when converted.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.scheduler.interval_minutes == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroInterval,
                format!(
                    "scheduler.interval_minutes: 0 is not a valid cadence, falling back to {}",
                    FileSchedulerConfig::default().interval_minutes
                ),
            ));
        }

        let paths = [
            ("store.path", self.store.path.as_deref()),
            ("audit.path", self.audit.path.as_deref()),
            ("logging.directory", self.logging.directory.as_deref()),
        ];
        for (field, path) in paths {
            if path.is_some_and(|p| p == Path::new("")) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyPath,
                    format!("{}: empty path, setting ignored", field),
                ));
            }
        }

        issues
    }
}

/// Treat an empty configured path as unset
pub(crate) fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
