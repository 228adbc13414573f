//! Output format value object

use serde::{Deserialize, Serialize};

/// How resolution results and schedules are rendered
///
/// This is a domain concept shared by the config file and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable console output (default)
    #[default]
    Text,
    /// JSON output
    Json,
}
