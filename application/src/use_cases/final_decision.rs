//! Final Decision use case (ADVICE_SOLICITATION)
//!
//! Advice solicitations are never computed: once every expected advisor has
//! given an opinion the originator records the outcome by hand.

use crate::ports::audit_log::{AuditEvent, AuditEventType, AuditLogger};
use crate::ports::clock::Clock;
use crate::ports::decision_repository::{DecisionRepository, RepositoryError, WriteGuard};
use agora_domain::{
    DecisionId, DecisionMethod, DecisionResult, DecisionStatus, DomainError,
    ParticipantId, PreconditionViolation,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum FinalDecisionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Decision {0} changed concurrently, final decision not recorded")]
    Conflict(DecisionId),
}

impl From<PreconditionViolation> for FinalDecisionError {
    fn from(violation: PreconditionViolation) -> Self {
        FinalDecisionError::Domain(violation.into())
    }
}

pub struct FinalDecisionUseCase<R: DecisionRepository + 'static> {
    repository: Arc<R>,
    audit: Arc<dyn AuditLogger>,
    clock: Arc<dyn Clock>,
}

impl<R: DecisionRepository + 'static> FinalDecisionUseCase<R> {
    pub fn new(repository: Arc<R>, audit: Arc<dyn AuditLogger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            audit,
            clock,
        }
    }

    pub async fn execute(
        &self,
        id: &DecisionId,
        actor: &ParticipantId,
        result: DecisionResult,
    ) -> Result<(), FinalDecisionError> {
        let snapshot = self.repository.load(id).await?;
        let decision = &snapshot.decision;

        if decision.method != DecisionMethod::AdviceSolicitation {
            return Err(PreconditionViolation::InconsistentInput {
                method: decision.method,
                reason: "final decisions apply to advice solicitations only".to_string(),
            }
            .into());
        }
        if decision.status != DecisionStatus::Open {
            return Err(if decision.is_closed() {
                PreconditionViolation::AlreadyClosed
            } else {
                PreconditionViolation::NotOpen
            }
            .into());
        }

        let advice = snapshot.advice.clone().unwrap_or_default();
        let now = self.clock.now();
        let update = advice.final_decision(decision, actor, result, now)?;

        let guard = WriteGuard::StatusIn(vec![DecisionStatus::Open]);
        if !self.repository.update(id, &update, &guard).await? {
            return Err(FinalDecisionError::Conflict(id.clone()));
        }

        info!("Decision {} decided by {}: {}", id, actor, result);
        self.audit.log(AuditEvent::new(
            AuditEventType::FinalDecisionMade,
            id.clone(),
            json!({
                "actor": actor,
                "result": result,
                "decided_at": now,
                "opinions": advice.opinions.len(),
            }),
        ));
        Ok(())
    }
}
