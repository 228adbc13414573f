//! Audit configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw audit configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// JSONL file receiving audit events; auditing is off when unset
    pub path: Option<PathBuf>,
}

impl FileAuditConfig {
    pub fn path(&self) -> Option<&Path> {
        super::non_empty(self.path.as_deref())
    }
}
