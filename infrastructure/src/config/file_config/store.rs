//! Decision store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Raw store configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// JSON snapshot file holding the decisions
    pub path: Option<PathBuf>,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("decisions.json")),
        }
    }
}

impl FileStoreConfig {
    pub fn path(&self) -> Option<&Path> {
        super::non_empty(self.path.as_deref())
    }
}
