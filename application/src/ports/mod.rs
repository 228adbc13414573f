//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_log;
pub mod clock;
pub mod decision_repository;
pub mod stage_notifier;
