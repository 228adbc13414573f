//! Decision resolution
//!
//! [`resolve`] turns a finalized snapshot of a decision's votes into its
//! [`DecisionResult`](crate::DecisionResult). It is pure: no clock, no I/O,
//! and the same input always yields the same outcome.
//!
//! | Method | Rule |
//! |--------|------|
//! | CONSENSUS | every ballot STRONG_SUPPORT |
//! | CONSENT | any BLOCK/OBJECTION → BLOCKED, else any STRONG_OPPOSE → REJECTED |
//! | MAJORITY | support > opposition |
//! | SUPERMAJORITY | support ≥ 2/3 of cast ballots |
//! | WEIGHTED_VOTE | Σ weight × signed stance > 0 |
//! | ADVISORY | always APPROVED |
//! | NUANCED_VOTE | majority-judgment ranking of proposals |
//! | ADVICE_SOLICITATION | manual, never computed |

pub mod context;
pub mod rules;

pub use context::{Resolution, ResolutionContext};
pub use rules::{resolve, resolve_named};
