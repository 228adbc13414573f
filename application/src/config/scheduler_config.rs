//! Scheduler parameters for periodic reconciliation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often open consent decisions are reconciled, and what happens when
/// one reaches the end of its window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Delay between two reconciliation passes.
    pub interval: Duration,
    /// Close a decision through the resolver once its schedule reaches TERMINEE.
    pub close_on_termination: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15 * 60),
            close_on_termination: true,
        }
    }
}

impl SchedulerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_close_on_termination(mut self, close: bool) -> Self {
        self.close_on_termination = close;
        self
    }
}
