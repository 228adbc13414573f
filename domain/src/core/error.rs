//! Domain error types
//!
//! Two families of failure exist in the core:
//!
//! - [`ConfigurationError`]: the stored decision data itself is broken
//!   (unknown method, malformed window). Fatal to the call, never defaulted.
//! - [`PreconditionViolation`]: the request is well-formed but not allowed
//!   right now (wrong stage, wrong actor, inconsistent input).

use crate::consent::stage::ConsentStage;
use crate::core::ids::ParticipantId;
use crate::decision::method::DecisionMethod;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Stored decision data that cannot be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown decision method: {0}")]
    UnknownMethod(String),

    #[error("Unknown consent step mode: {0}")]
    UnknownStepMode(String),

    #[error("Malformed consent window: end {end} is not after start {start}")]
    MalformedWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Stage {stage} does not exist in {mode} step mode")]
    StageOutsideMode { stage: ConsentStage, mode: String },

    #[error("Decision method {0} has no consent schedule")]
    MissingSchedule(DecisionMethod),
}

/// An operation attempted in a state that does not allow it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionViolation {
    #[error("Action requires stage {expected}, decision is in {actual}")]
    WrongStage {
        expected: ConsentStage,
        actual: ConsentStage,
    },

    #[error("Participant {0} is not the creator of this decision")]
    NotCreator(ParticipantId),

    #[error("Input inconsistent with {method}: {reason}")]
    InconsistentInput {
        method: DecisionMethod,
        reason: String,
    },

    #[error("{0} decisions are resolved manually by their originator")]
    ManualResolution(DecisionMethod),

    #[error("Decision is already closed")]
    AlreadyClosed,

    #[error("Decision is not open")]
    NotOpen,

    #[error("{missing} expected opinion(s) not yet collected")]
    OpinionsMissing { missing: usize },

    #[error("Result {0} cannot be chosen as a final decision")]
    InvalidFinalResult(String),
}

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Precondition violated: {0}")]
    Precondition(#[from] PreconditionViolation),
}

impl DomainError {
    /// Check if this error is a data-integrity fault
    pub fn is_configuration(&self) -> bool {
        matches!(self, DomainError::Configuration(_))
    }

    /// Check if this error should be reported to the user as a denial
    pub fn is_precondition(&self) -> bool {
        matches!(self, DomainError::Precondition(_))
    }
}
