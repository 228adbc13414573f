//! Domain layer for agora
//!
//! This crate contains the decision-resolution and staged-consent logic.
//! It performs no I/O and never reads the clock: every time-dependent
//! operation takes `now` as a parameter.
//!
//! # Core Concepts
//!
//! ## Resolver
//!
//! [`resolve`] computes a [`DecisionResult`] from a finalized snapshot of
//! ballots (or objections, or nuanced mentions) under the decision's
//! [`DecisionMethod`].
//!
//! ## Stage Scheduler
//!
//! [`current_stage`] places a CONSENT decision in one of its timed stages;
//! [`ConsentState`] layers the creator's keep/withdraw actions and
//! never-backwards reconciliation on top.

pub mod advice;
pub mod ballot;
pub mod config;
pub mod consent;
pub mod core;
pub mod decision;
pub mod nuanced;
pub mod resolver;

// Re-export commonly used types
pub use advice::{AdviceSolicitation, Opinion};
pub use ballot::{
    Ballot, BallotTally, BallotValue, Leaning,
    tally::{ProposalTally, tally_proposals},
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consent::{
    ConsentStage, ConsentState, ConsentWindow, Objection, ObjectionValue, StageSchedule,
    StageTransition, StageWindow, StepMode, TransitionCause, current_stage, stage_windows,
};
pub use core::{
    error::{ConfigurationError, DomainError, PreconditionViolation},
    ids::{DecisionId, ParticipantId, ProposalId},
};
pub use decision::{
    Decision, DecisionMethod, DecisionResult, DecisionStatus, DecisionUpdate, Proposal,
};
pub use nuanced::{
    Mention, MentionDistribution, MentionScale, NuancedMention, ProposalRanking, rank_proposals,
};
pub use resolver::{Resolution, ResolutionContext, resolve, resolve_named};
