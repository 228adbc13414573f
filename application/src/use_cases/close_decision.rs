//! Close Decision use case
//!
//! Freezes voting, resolves the decision from its finalized ballots and
//! records the result:
//!
//! ```text
//! OPEN ──(guarded)──▶ TALLYING ──load snapshot──▶ resolve ──(guarded)──▶ CLOSED
//! ```
//!
//! The status moves to TALLYING before the ballots are read, so a vote cast
//! concurrently either lands before the freeze or is refused by the host.
//! Votes that cannot be resolved at all are reported before the freeze, so
//! such a decision stays OPEN instead of being left in TALLYING.

use crate::ports::audit_log::{AuditEvent, AuditEventType, AuditLogger};
use crate::ports::clock::Clock;
use crate::ports::decision_repository::{DecisionRepository, RepositoryError, WriteGuard};
use agora_domain::{
    DecisionId, DecisionStatus, DomainError, PreconditionViolation, Resolution, resolve,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur while closing a decision
#[derive(Error, Debug)]
pub enum CloseDecisionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Decision {0} changed concurrently, close aborted")]
    Conflict(DecisionId),
}

impl From<PreconditionViolation> for CloseDecisionError {
    fn from(violation: PreconditionViolation) -> Self {
        CloseDecisionError::Domain(violation.into())
    }
}

/// Use case for resolving and closing one decision
pub struct CloseDecisionUseCase<R: DecisionRepository + 'static> {
    repository: Arc<R>,
    audit: Arc<dyn AuditLogger>,
    clock: Arc<dyn Clock>,
}

impl<R: DecisionRepository + 'static> Clone for CloseDecisionUseCase<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            audit: Arc::clone(&self.audit),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: DecisionRepository + 'static> CloseDecisionUseCase<R> {
    pub fn new(repository: Arc<R>, audit: Arc<dyn AuditLogger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            audit,
            clock,
        }
    }

    /// Close the decision and return how it was resolved
    pub async fn execute(&self, id: &DecisionId) -> Result<Resolution, CloseDecisionError> {
        let snapshot = self.repository.load(id).await?;
        let decision = &snapshot.decision;

        if !decision.method.is_computed() {
            return Err(PreconditionViolation::ManualResolution(decision.method).into());
        }

        // Phase 1: freeze voting
        let freeze = decision.begin_tally()?;
        resolve(
            decision.method,
            &snapshot.ballots,
            &snapshot.resolution_context(),
        )
        .inspect_err(|e| error!("Decision {} cannot be resolved: {}", id, e))?;
        let guard = WriteGuard::StatusIn(vec![DecisionStatus::Open, DecisionStatus::Tallying]);
        if !self.repository.update(id, &freeze, &guard).await? {
            return Err(CloseDecisionError::Conflict(id.clone()));
        }
        debug!("Decision {} frozen for tallying", id);

        // Phase 2: resolve the finalized snapshot
        let snapshot = self.repository.load(id).await?;
        let decision = &snapshot.decision;
        let resolution = resolve(
            decision.method,
            &snapshot.ballots,
            &snapshot.resolution_context(),
        )
        .inspect_err(|e| error!("Decision {} cannot be resolved: {}", id, e))?;

        // Phase 3: record the result
        let now = self.clock.now();
        let close = decision.close_with(resolution.result, now)?;
        let guard = WriteGuard::StatusIn(vec![DecisionStatus::Tallying]);
        if !self.repository.update(id, &close, &guard).await? {
            return Err(CloseDecisionError::Conflict(id.clone()));
        }

        info!(
            "Decision {} closed as {} ({})",
            id, resolution.result, decision.method
        );
        self.audit.log(AuditEvent::new(
            AuditEventType::Closed,
            id.clone(),
            json!({
                "method": decision.method,
                "result": resolution.result,
                "decided_at": now,
                "ballots": snapshot.ballots.len(),
                "objections": snapshot.objections.len(),
                "mentions": snapshot.mentions.len(),
            }),
        ));

        Ok(resolution)
    }
}
