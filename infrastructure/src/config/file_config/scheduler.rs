//! Scheduler configuration from TOML (`[scheduler]` section)

use agora_application::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw scheduler configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchedulerConfig {
    /// Minutes between two reconciliation passes
    pub interval_minutes: u64,
    /// Close decisions whose schedule reached TERMINEE
    pub close_on_termination: bool,
}

impl Default for FileSchedulerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 15,
            close_on_termination: true,
        }
    }
}

impl FileSchedulerConfig {
    /// Convert to the application-layer config; a zero interval keeps the default.
    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        let mut config = SchedulerConfig::default().with_close_on_termination(self.close_on_termination);
        if self.interval_minutes > 0 {
            config = config.with_interval(Duration::from_secs(self.interval_minutes * 60));
        }
        config
    }
}
