//! Decision aggregate and its typed partial update

use super::method::DecisionMethod;
use super::proposal::Proposal;
use super::result::DecisionResult;
use crate::consent::process::ConsentState;
use crate::consent::stage::ConsentStage;
use crate::core::error::PreconditionViolation;
use crate::core::ids::{DecisionId, ParticipantId};
use crate::nuanced::mention::MentionScale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    #[default]
    Draft,
    Open,
    /// Voting frozen while the result is being computed
    Tallying,
    Closed,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Draft => "DRAFT",
            DecisionStatus::Open => "OPEN",
            DecisionStatus::Tallying => "TALLYING",
            DecisionStatus::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group decision as seen by the core.
///
/// Votes are not held here; the host passes them to the resolver alongside
/// the decision. Proposals are owned and referenced elsewhere by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub title: String,
    pub method: DecisionMethod,
    pub creator: ParticipantId,
    #[serde(default)]
    pub status: DecisionStatus,
    #[serde(default)]
    pub result: Option<DecisionResult>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    /// Present only for CONSENT decisions
    #[serde(default)]
    pub consent: Option<ConsentState>,
    /// Present only for NUANCED_VOTE decisions
    #[serde(default)]
    pub mention_scale: Option<MentionScale>,
}

impl Decision {
    /// Create a draft decision
    pub fn new(
        id: impl Into<DecisionId>,
        title: impl Into<String>,
        method: DecisionMethod,
        creator: impl Into<ParticipantId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            method,
            creator: creator.into(),
            status: DecisionStatus::Draft,
            result: None,
            decided_at: None,
            proposals: Vec::new(),
            consent: None,
            mention_scale: None,
        }
    }

    pub fn with_status(mut self, status: DecisionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_proposals(mut self, proposals: Vec<Proposal>) -> Self {
        self.proposals = proposals;
        self
    }

    pub fn with_consent(mut self, consent: ConsentState) -> Self {
        self.consent = Some(consent);
        self
    }

    pub fn with_mention_scale(mut self, scale: MentionScale) -> Self {
        self.mention_scale = Some(scale);
        self
    }

    /// Whether ballots may currently be cast
    pub fn is_votable(&self) -> bool {
        self.status == DecisionStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == DecisionStatus::Closed
    }

    /// Stage currently stored for a CONSENT decision
    pub fn current_stage(&self) -> Option<ConsentStage> {
        self.consent.as_ref().map(|c| c.current_stage)
    }

    /// Update freezing the ballots before resolution.
    ///
    /// A decision left in TALLYING by an interrupted close may be frozen again.
    pub fn begin_tally(&self) -> Result<DecisionUpdate, PreconditionViolation> {
        match self.status {
            DecisionStatus::Open | DecisionStatus::Tallying => {
                Ok(DecisionUpdate::new().status(DecisionStatus::Tallying))
            }
            DecisionStatus::Closed => Err(PreconditionViolation::AlreadyClosed),
            DecisionStatus::Draft => Err(PreconditionViolation::NotOpen),
        }
    }

    /// Update recording the final result.
    pub fn close_with(
        &self,
        result: DecisionResult,
        now: DateTime<Utc>,
    ) -> Result<DecisionUpdate, PreconditionViolation> {
        if self.is_closed() {
            return Err(PreconditionViolation::AlreadyClosed);
        }
        let mut update = DecisionUpdate::new()
            .status(DecisionStatus::Closed)
            .result(result)
            .decided_at(now);
        if self.consent.is_some() {
            update = update.consent_current_stage(ConsentStage::Terminee);
        }
        Ok(update)
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: &DecisionUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(result) = update.result {
            self.result = Some(result);
        }
        if let Some(decided_at) = update.decided_at {
            self.decided_at = Some(decided_at);
        }
        if let Some(consent) = self.consent.as_mut() {
            if let Some(stage) = update.consent_current_stage {
                consent.current_stage = stage;
            }
            if let Some(manual) = update.consent_manually_advanced {
                consent.manually_advanced = manual;
            }
        }
    }
}

/// Typed partial update of a decision.
///
/// Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionUpdate {
    pub status: Option<DecisionStatus>,
    pub result: Option<DecisionResult>,
    pub decided_at: Option<DateTime<Utc>>,
    pub consent_current_stage: Option<ConsentStage>,
    pub consent_manually_advanced: Option<bool>,
}

impl DecisionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: DecisionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn result(mut self, result: DecisionResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn decided_at(mut self, at: DateTime<Utc>) -> Self {
        self.decided_at = Some(at);
        self
    }

    pub fn consent_current_stage(mut self, stage: ConsentStage) -> Self {
        self.consent_current_stage = Some(stage);
        self
    }

    pub fn consent_manually_advanced(mut self, manual: bool) -> Self {
        self.consent_manually_advanced = Some(manual);
        self
    }

    /// Combine two updates, fields of `other` winning
    pub fn merge(mut self, other: DecisionUpdate) -> Self {
        self.status = other.status.or(self.status);
        self.result = other.result.or(self.result);
        self.decided_at = other.decided_at.or(self.decided_at);
        self.consent_current_stage = other.consent_current_stage.or(self.consent_current_stage);
        self.consent_manually_advanced = other
            .consent_manually_advanced
            .or(self.consent_manually_advanced);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &DecisionUpdate::default()
    }
}
