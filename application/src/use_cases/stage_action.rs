//! Keep / Withdraw Proposal use case
//!
//! The creator's two one-way exits from AMENDEMENTS. Both are written with
//! a guard on the stored stage, so a reconciliation pass that moved the
//! decision first makes the action fail with a conflict instead of being
//! silently overwritten.

use super::shared::announce_transition;
use crate::ports::audit_log::{AuditEvent, AuditEventType, AuditLogger};
use crate::ports::clock::Clock;
use crate::ports::decision_repository::{DecisionRepository, RepositoryError, WriteGuard};
use crate::ports::stage_notifier::StageNotifier;
use agora_domain::{
    ConfigurationError, DecisionId, DecisionResult, DomainError, ParticipantId,
    PreconditionViolation, StageTransition,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during a manual stage action
#[derive(Error, Debug)]
pub enum StageActionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Decision {0} changed concurrently, action not applied")]
    Conflict(DecisionId),
}

impl From<PreconditionViolation> for StageActionError {
    fn from(violation: PreconditionViolation) -> Self {
        StageActionError::Domain(violation.into())
    }
}

impl From<ConfigurationError> for StageActionError {
    fn from(error: ConfigurationError) -> Self {
        StageActionError::Domain(error.into())
    }
}

/// Which early exit the creator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    /// Proposal unchanged, skip to OBJECTIONS
    Keep,
    /// Proposal withdrawn, decision ends as WITHDRAWN
    Withdraw,
}

impl StageAction {
    fn audit_event(&self) -> AuditEventType {
        match self {
            StageAction::Keep => AuditEventType::ProposalKept,
            StageAction::Withdraw => AuditEventType::ProposalWithdrawn,
        }
    }
}

/// Use case for the creator's keep/withdraw actions
pub struct StageActionUseCase<R: DecisionRepository + 'static> {
    repository: Arc<R>,
    notifier: Arc<dyn StageNotifier>,
    audit: Arc<dyn AuditLogger>,
    clock: Arc<dyn Clock>,
}

impl<R: DecisionRepository + 'static> StageActionUseCase<R> {
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<dyn StageNotifier>,
        audit: Arc<dyn AuditLogger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            audit,
            clock,
        }
    }

    pub async fn keep_proposal(
        &self,
        id: &DecisionId,
        actor: &ParticipantId,
    ) -> Result<StageTransition, StageActionError> {
        self.execute(id, actor, StageAction::Keep).await
    }

    pub async fn withdraw_proposal(
        &self,
        id: &DecisionId,
        actor: &ParticipantId,
    ) -> Result<StageTransition, StageActionError> {
        self.execute(id, actor, StageAction::Withdraw).await
    }

    pub async fn execute(
        &self,
        id: &DecisionId,
        actor: &ParticipantId,
        action: StageAction,
    ) -> Result<StageTransition, StageActionError> {
        let snapshot = self.repository.load(id).await?;
        let decision = &snapshot.decision;
        if !decision.is_votable() {
            return Err(PreconditionViolation::NotOpen.into());
        }
        let consent = decision
            .consent
            .as_ref()
            .ok_or(ConfigurationError::MissingSchedule(decision.method))?;

        let now = self.clock.now();
        let transition = match action {
            StageAction::Keep => consent.keep_proposal(&decision.creator, actor, now)?,
            StageAction::Withdraw => consent.withdraw_proposal(&decision.creator, actor, now)?,
        };

        // Keyed on the stored stage, which may lag the effective AMENDEMENTS
        let guard = WriteGuard::OpenAtStage(consent.current_stage);
        if !self
            .repository
            .update(id, &transition.to_update(now), &guard)
            .await?
        {
            return Err(StageActionError::Conflict(id.clone()));
        }
        info!(
            "Decision {}: {:?} by {}, now {}",
            id, action, actor, transition.to
        );

        announce_transition(
            self.notifier.as_ref(),
            self.audit.as_ref(),
            &snapshot,
            &transition,
            action.audit_event(),
            Some(actor),
        )
        .await;

        if action == StageAction::Withdraw {
            self.audit.log(AuditEvent::new(
                AuditEventType::Closed,
                id.clone(),
                json!({
                    "method": decision.method,
                    "result": DecisionResult::Withdrawn,
                    "decided_at": now,
                }),
            ));
        }

        Ok(transition)
    }
}
