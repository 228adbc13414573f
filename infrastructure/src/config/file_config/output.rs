//! `[output]` section: how commands render resolutions, schedules and
//! reconciliation reports.

use agora_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Preferred rendering when `--format` is not given
    pub format: Option<OutputFormat>,
    /// Colored console output; JSON is never colored
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// The command-line choice wins over the file, which wins over text
    pub fn format_for(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.or(self.format).unwrap_or_default()
    }

    pub fn color_enabled(&self, no_color_flag: bool) -> bool {
        self.color && !no_color_flag
    }
}
