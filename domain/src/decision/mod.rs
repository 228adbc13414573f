//! Decisions and how they are governed
//!
//! - [`method::DecisionMethod`] selects the resolution algorithm
//! - [`result::DecisionResult`] is the outcome computed at closure
//! - [`entities::Decision`] carries status, result and consent stage,
//!   updated only through a typed [`entities::DecisionUpdate`]
//! - [`proposal::Proposal`] is a candidate option under multi-proposal methods

pub mod entities;
pub mod method;
pub mod proposal;
pub mod result;

pub use entities::{Decision, DecisionStatus, DecisionUpdate};
pub use method::DecisionMethod;
pub use proposal::Proposal;
pub use result::DecisionResult;
