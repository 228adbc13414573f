//! Decision storage port
//!
//! The repository hands out finalized snapshots and applies partial
//! updates under a [`WriteGuard`]. Guarded writes are how the use cases stay
//! correct when a manual stage action and a reconciliation pass race on the
//! same decision: the loser's write is refused instead of overwriting.

use agora_domain::{
    AdviceSolicitation, Ballot, ConsentStage, Decision, DecisionId, DecisionStatus,
    DecisionUpdate, NuancedMention, Objection, ParticipantId, ResolutionContext,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the storage adapter
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Decision not found: {0}")]
    NotFound(DecisionId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// A decision together with every vote cast on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub decision: Decision,
    #[serde(default)]
    pub ballots: Vec<Ballot>,
    #[serde(default)]
    pub objections: Vec<Objection>,
    #[serde(default)]
    pub mentions: Vec<NuancedMention>,
    #[serde(default)]
    pub advice: Option<AdviceSolicitation>,
    /// Everyone to notify on stage changes
    #[serde(default)]
    pub participants: Vec<ParticipantId>,
}

impl DecisionSnapshot {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            ballots: Vec::new(),
            objections: Vec::new(),
            mentions: Vec::new(),
            advice: None,
            participants: Vec::new(),
        }
    }

    pub fn with_ballots(mut self, ballots: Vec<Ballot>) -> Self {
        self.ballots = ballots;
        self
    }

    pub fn with_objections(mut self, objections: Vec<Objection>) -> Self {
        self.objections = objections;
        self
    }

    pub fn with_mentions(mut self, mentions: Vec<NuancedMention>) -> Self {
        self.mentions = mentions;
        self
    }

    pub fn with_advice(mut self, advice: AdviceSolicitation) -> Self {
        self.advice = Some(advice);
        self
    }

    pub fn with_participants(mut self, participants: Vec<ParticipantId>) -> Self {
        self.participants = participants;
        self
    }

    /// Non-ballot votes in the shape the resolver expects
    pub fn resolution_context(&self) -> ResolutionContext {
        ResolutionContext::new()
            .with_objections(self.objections.clone())
            .with_proposals(self.decision.proposals.clone())
            .with_mentions(
                self.decision.mention_scale.unwrap_or_default(),
                self.mentions.clone(),
            )
    }
}

/// Condition a stored decision must meet for an update to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteGuard {
    /// Write unconditionally
    Always,
    /// Status must be one of these
    StatusIn(Vec<DecisionStatus>),
    /// Decision must be OPEN and still at this stored stage
    OpenAtStage(ConsentStage),
}

impl WriteGuard {
    pub fn holds(&self, decision: &Decision) -> bool {
        match self {
            WriteGuard::Always => true,
            WriteGuard::StatusIn(statuses) => statuses.contains(&decision.status),
            WriteGuard::OpenAtStage(stage) => {
                decision.status == DecisionStatus::Open
                    && decision.current_stage() == Some(*stage)
            }
        }
    }
}

/// Port for loading and updating decisions
#[async_trait]
pub trait DecisionRepository: Send + Sync {
    /// Load a decision with all its votes
    async fn load(&self, id: &DecisionId) -> Result<DecisionSnapshot, RepositoryError>;

    /// Decisions that run a consent schedule and are not closed yet.
    ///
    /// Besides OPEN decisions this includes those left in TALLYING by a
    /// close that did not finish.
    async fn list_active_staged(&self) -> Result<Vec<Decision>, RepositoryError>;

    /// Apply `update` if `guard` holds on the stored decision.
    ///
    /// Returns `Ok(false)` when the guard failed and nothing was written.
    async fn update(
        &self,
        id: &DecisionId,
        update: &DecisionUpdate,
        guard: &WriteGuard,
    ) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{ConsentState, ConsentWindow, DecisionMethod, Mention, StepMode};
    use chrono::{TimeZone, Utc};

    fn consent_decision(status: DecisionStatus, stage: ConsentStage) -> Decision {
        let window = ConsentWindow::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let mut consent = ConsentState::new(window, StepMode::Distinct);
        consent.current_stage = stage;
        Decision::new("d1", "t", DecisionMethod::Consent, "ana")
            .with_status(status)
            .with_consent(consent)
    }

    #[test]
    fn test_open_at_stage_guard() {
        let guard = WriteGuard::OpenAtStage(ConsentStage::Amendements);
        assert!(guard.holds(&consent_decision(DecisionStatus::Open, ConsentStage::Amendements)));
        assert!(!guard.holds(&consent_decision(DecisionStatus::Open, ConsentStage::Objections)));
        assert!(!guard.holds(&consent_decision(
            DecisionStatus::Closed,
            ConsentStage::Amendements
        )));
    }

    #[test]
    fn test_status_guard() {
        let guard = WriteGuard::StatusIn(vec![DecisionStatus::Open, DecisionStatus::Tallying]);
        assert!(guard.holds(&consent_decision(DecisionStatus::Tallying, ConsentStage::Avis)));
        assert!(!guard.holds(&consent_decision(DecisionStatus::Closed, ConsentStage::Avis)));
        assert!(
            WriteGuard::Always.holds(&consent_decision(DecisionStatus::Draft, ConsentStage::Avis))
        );
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let json = r#"{
            "decision": {
                "id": "d1",
                "title": "Budget",
                "method": "MAJORITY",
                "creator": "ana",
                "status": "OPEN"
            },
            "ballots": [{"voter": "ben", "value": "SUPPORT"}]
        }"#;
        let snapshot: DecisionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.decision.status, DecisionStatus::Open);
        assert_eq!(snapshot.ballots.len(), 1);
        assert!(snapshot.objections.is_empty());
        assert!(snapshot.advice.is_none());
    }

    #[test]
    fn test_resolution_context_uses_decision_scale() {
        let decision = Decision::new("d1", "t", DecisionMethod::NuancedVote, "ana")
            .with_mention_scale(agora_domain::MentionScale::Three);
        let snapshot = DecisionSnapshot::new(decision)
            .with_mentions(vec![NuancedMention::new("p1", "ben", Mention::Good)]);
        let context = snapshot.resolution_context();
        assert_eq!(context.mention_scale, agora_domain::MentionScale::Three);
        assert_eq!(context.mentions.len(), 1);
    }
}
