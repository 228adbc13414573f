//! Use cases
//!
//! Application-level operations that orchestrate domain logic around the
//! storage, notification and audit ports.

pub mod close_decision;
pub mod final_decision;
pub mod reconcile_stages;
pub mod scheduler;
pub(crate) mod shared;
pub mod stage_action;

#[cfg(test)]
pub(crate) mod testing;
