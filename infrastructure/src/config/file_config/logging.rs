//! Diagnostic log configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rolling log files; stderr only when unset
    pub directory: Option<PathBuf>,
}

impl FileLoggingConfig {
    pub fn directory(&self) -> Option<&Path> {
        super::non_empty(self.directory.as_deref())
    }
}
