//! Application-level configuration.
//!
//! - [`SchedulerConfig`]: cadence and behavior of periodic stage reconciliation

pub mod scheduler_config;

pub use scheduler_config::SchedulerConfig;
