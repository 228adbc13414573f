//! Infrastructure layer for agora
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod clock;
pub mod config;
pub mod logging;
pub mod notify;
pub mod store;

// Re-export commonly used types
pub use clock::SystemClock;
pub use config::{
    ConfigLoader, FileAuditConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileSchedulerConfig, FileStoreConfig,
};
pub use logging::JsonlAuditLogger;
pub use notify::TracingNotifier;
pub use store::InMemoryDecisionStore;
