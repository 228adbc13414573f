//! Reconcile Stages use case
//!
//! One reconciliation pass over every unclosed consent decision. The stage is
//! recomputed from the clock, written only when it changed, and the write is
//! conditional on the stage read at the start of the pass. A manual keep or
//! withdraw that lands in between therefore wins and the pass skips the
//! decision.
//!
//! A decision already stored at TERMINEE but not closed (an earlier close
//! failed or was interrupted) is closed again on every pass until it
//! succeeds.

use super::close_decision::{CloseDecisionError, CloseDecisionUseCase};
use super::shared::announce_transition;
use crate::config::SchedulerConfig;
use crate::ports::audit_log::{AuditEventType, AuditLogger};
use crate::ports::clock::Clock;
use crate::ports::decision_repository::{DecisionRepository, RepositoryError, WriteGuard};
use crate::ports::stage_notifier::StageNotifier;
use agora_domain::{
    ConfigurationError, ConsentStage, Decision, DecisionId, DecisionResult, DecisionStatus,
    StageTransition,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a whole reconciliation pass
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Failure confined to one decision; the pass continues with the next one
#[derive(Error, Debug)]
enum DecisionFailure {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Close(#[from] CloseDecisionError),
}

/// A stage change written during a pass
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledStage {
    pub decision_id: DecisionId,
    pub transition: StageTransition,
}

/// A decision the pass could not handle
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileFailure {
    pub decision_id: DecisionId,
    pub reason: String,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Decisions looked at
    pub examined: usize,
    /// Decisions whose stored stage was already current
    pub unchanged: usize,
    pub transitions: Vec<ReconciledStage>,
    /// Decisions changed by someone else between read and write
    pub conflicts: Vec<DecisionId>,
    /// Decisions closed after reaching TERMINEE, including retried closes
    pub closed: Vec<(DecisionId, DecisionResult)>,
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    pub fn is_quiet(&self) -> bool {
        self.transitions.is_empty()
            && self.conflicts.is_empty()
            && self.closed.is_empty()
            && self.failures.is_empty()
    }
}

enum Outcome {
    Unchanged,
    Conflict,
    Moved(StageTransition, Option<DecisionResult>),
    Closed(DecisionResult),
}

/// Use case for reconciling the stored consent stages with the clock
pub struct ReconcileStagesUseCase<R: DecisionRepository + 'static> {
    repository: Arc<R>,
    notifier: Arc<dyn StageNotifier>,
    audit: Arc<dyn AuditLogger>,
    clock: Arc<dyn Clock>,
    closer: CloseDecisionUseCase<R>,
    config: SchedulerConfig,
}

impl<R: DecisionRepository + 'static> ReconcileStagesUseCase<R> {
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<dyn StageNotifier>,
        audit: Arc<dyn AuditLogger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let closer =
            CloseDecisionUseCase::new(Arc::clone(&repository), Arc::clone(&audit), Arc::clone(&clock));
        Self {
            repository,
            notifier,
            audit,
            clock,
            closer,
            config: SchedulerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run one pass over all unclosed consent decisions
    pub async fn execute(&self) -> Result<ReconcileReport, ReconcileError> {
        let decisions = self.repository.list_active_staged().await?;
        let mut report = ReconcileReport {
            examined: decisions.len(),
            ..Default::default()
        };

        for decision in &decisions {
            match self.reconcile_one(decision).await {
                Ok(Outcome::Unchanged) => report.unchanged += 1,
                Ok(Outcome::Conflict) => {
                    debug!("Decision {} changed concurrently, skipped", decision.id);
                    report.conflicts.push(decision.id.clone());
                }
                Ok(Outcome::Closed(result)) => {
                    info!("Decision {} closed on retry as {}", decision.id, result);
                    report.closed.push((decision.id.clone(), result));
                }
                Ok(Outcome::Moved(transition, closed)) => {
                    if let Some(result) = closed {
                        report.closed.push((decision.id.clone(), result));
                    }
                    report.transitions.push(ReconciledStage {
                        decision_id: decision.id.clone(),
                        transition,
                    });
                }
                Err(e) => {
                    warn!("Failed to reconcile decision {}: {}", decision.id, e);
                    report.failures.push(ReconcileFailure {
                        decision_id: decision.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Reconciled {} decision(s): {} moved, {} unchanged, {} conflict(s), {} failure(s)",
            report.examined,
            report.transitions.len(),
            report.unchanged,
            report.conflicts.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn reconcile_one(&self, decision: &Decision) -> Result<Outcome, DecisionFailure> {
        let consent = decision
            .consent
            .as_ref()
            .ok_or(ConfigurationError::MissingSchedule(decision.method))?;

        if consent.current_stage == ConsentStage::Terminee {
            if !self.config.close_on_termination {
                return Ok(Outcome::Unchanged);
            }
            let resolution = self.closer.execute(&decision.id).await?;
            return Ok(Outcome::Closed(resolution.result));
        }
        if decision.status != DecisionStatus::Open {
            // Manual close in progress
            return Ok(Outcome::Unchanged);
        }

        let now = self.clock.now();
        let Some(transition) = consent.reconcile(now)? else {
            return Ok(Outcome::Unchanged);
        };

        let guard = WriteGuard::OpenAtStage(transition.from);
        let written = self
            .repository
            .update(&decision.id, &transition.to_update(now), &guard)
            .await?;
        if !written {
            return Ok(Outcome::Conflict);
        }
        info!(
            "Decision {} moved {} -> {}",
            decision.id, transition.from, transition.to
        );

        let snapshot = self.repository.load(&decision.id).await?;
        announce_transition(
            self.notifier.as_ref(),
            self.audit.as_ref(),
            &snapshot,
            &transition,
            AuditEventType::StageChanged,
            None,
        )
        .await;

        let closed = if transition.is_terminal() && self.config.close_on_termination {
            let resolution = self.closer.execute(&decision.id).await?;
            Some(resolution.result)
        } else {
            None
        };

        Ok(Outcome::Moved(transition, closed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::FixedClock;
    use crate::ports::decision_repository::DecisionSnapshot;
    use crate::use_cases::testing::{
        MockRepository, RecordingAudit, RecordingNotifier, at, consent_decision,
    };
    use agora_domain::{
        Ballot, BallotValue, DecisionMethod, DecisionUpdate, Objection, ObjectionValue,
        ParticipantId, StepMode,
    };
    use chrono::{DateTime, Utc};

    struct Harness {
        repo: Arc<MockRepository>,
        notifier: Arc<RecordingNotifier>,
        audit: Arc<RecordingAudit>,
    }

    impl Harness {
        fn new(snapshots: Vec<DecisionSnapshot>) -> Self {
            Self {
                repo: Arc::new(MockRepository::with(snapshots)),
                notifier: Arc::new(RecordingNotifier::default()),
                audit: Arc::new(RecordingAudit::default()),
            }
        }

        fn use_case(&self, now: DateTime<Utc>) -> ReconcileStagesUseCase<MockRepository> {
            ReconcileStagesUseCase::new(
                self.repo.clone(),
                self.notifier.clone(),
                self.audit.clone(),
                Arc::new(FixedClock(now)),
            )
        }
    }

    fn distinct(id: &str) -> DecisionSnapshot {
        DecisionSnapshot::new(consent_decision(id, StepMode::Distinct))
            .with_participants(vec![ParticipantId::new("ana"), ParticipantId::new("ben")])
    }

    #[tokio::test]
    async fn test_moves_stage_and_notifies_with_deadline() {
        let h = Harness::new(vec![distinct("c1")]);

        let report = h.use_case(at(2, 0)).execute().await.unwrap();

        assert_eq!(report.examined, 1);
        assert_eq!(report.transitions.len(), 1);
        let moved = &report.transitions[0].transition;
        assert_eq!(moved.from, ConsentStage::Clarifications);
        assert_eq!(moved.to, ConsentStage::Avis);
        assert_eq!(moved.deadline, Some(at(3, 0)));
        assert_eq!(h.repo.decision("c1").current_stage(), Some(ConsentStage::Avis));

        let sent = h.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients.len(), 2);
        assert_eq!(h.audit.types(), vec![AuditEventType::StageChanged]);
    }

    #[tokio::test]
    async fn test_second_pass_is_a_no_op() {
        let h = Harness::new(vec![distinct("c1")]);
        let use_case = h.use_case(at(3, 6));

        use_case.execute().await.unwrap();
        let report = use_case.execute().await.unwrap();

        assert_eq!(report.unchanged, 1);
        assert!(report.is_quiet());
        assert_eq!(h.notifier.sent.lock().unwrap().len(), 1);
        assert_eq!(h.audit.types().len(), 1);
    }

    #[tokio::test]
    async fn test_stage_ahead_of_clock_is_not_regressed() {
        let mut snapshot = distinct("c1");
        if let Some(consent) = snapshot.decision.consent.as_mut() {
            consent.current_stage = ConsentStage::Objections;
            consent.manually_advanced = true;
        }
        let h = Harness::new(vec![snapshot]);

        let report = h.use_case(at(3, 6)).execute().await.unwrap();

        assert_eq!(report.unchanged, 1);
        assert_eq!(
            h.repo.decision("c1").current_stage(),
            Some(ConsentStage::Objections)
        );
    }

    #[tokio::test]
    async fn test_withdrawn_decisions_are_not_touched() {
        let mut snapshot = distinct("c1");
        snapshot.decision.apply(
            &DecisionUpdate::new()
                .status(DecisionStatus::Closed)
                .result(DecisionResult::Withdrawn)
                .consent_current_stage(ConsentStage::Terminee),
        );
        let h = Harness::new(vec![snapshot]);

        let report = h.use_case(at(9, 0)).execute().await.unwrap();

        assert_eq!(report.examined, 0);
        assert_eq!(
            h.repo.decision("c1").result,
            Some(DecisionResult::Withdrawn)
        );
    }

    #[tokio::test]
    async fn test_lost_race_is_counted_as_conflict() {
        let h = Harness::new(vec![distinct("c1")]);
        let use_case = h.use_case(at(2, 0));
        let listed = h.repo.list_active_staged().await.unwrap();
        // Stage moved by someone else after the list was read
        h.repo
            .snapshots
            .lock()
            .unwrap()
            .get_mut(&DecisionId::new("c1"))
            .unwrap()
            .decision
            .apply(&DecisionUpdate::new().consent_current_stage(ConsentStage::Avis));

        let outcome = use_case.reconcile_one(&listed[0]).await.unwrap();

        assert!(matches!(outcome, Outcome::Conflict));
        assert_eq!(*h.repo.refused_writes.lock().unwrap(), 1);
        assert!(h.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_termination_closes_from_objections() {
        let snapshot = distinct("c1").with_objections(vec![
            Objection::new("ben", ObjectionValue::NoObjection),
            Objection::new("cho", ObjectionValue::NoPosition),
        ]);
        let h = Harness::new(vec![snapshot]);

        let report = h.use_case(at(5, 0)).execute().await.unwrap();

        assert_eq!(
            report.closed,
            vec![(DecisionId::new("c1"), DecisionResult::Approved)]
        );
        let decision = h.repo.decision("c1");
        assert_eq!(decision.status, DecisionStatus::Closed);
        assert_eq!(decision.current_stage(), Some(ConsentStage::Terminee));
        assert_eq!(
            h.audit.types(),
            vec![AuditEventType::StageChanged, AuditEventType::Closed]
        );
    }

    #[tokio::test]
    async fn test_termination_without_auto_close() {
        let h = Harness::new(vec![distinct("c1")]);
        let use_case = h
            .use_case(at(5, 0))
            .with_config(SchedulerConfig::default().with_close_on_termination(false));

        let report = use_case.execute().await.unwrap();

        assert!(report.closed.is_empty());
        let decision = h.repo.decision("c1");
        assert_eq!(decision.status, DecisionStatus::Open);
        assert_eq!(decision.current_stage(), Some(ConsentStage::Terminee));
    }

    #[tokio::test]
    async fn test_failed_close_is_retried_on_later_passes() {
        // Ballots and objections together cannot be resolved
        let snapshot = distinct("c1")
            .with_ballots(vec![Ballot::new("ana", BallotValue::Support)])
            .with_objections(vec![Objection::new("ben", ObjectionValue::Objection)]);
        let h = Harness::new(vec![snapshot]);
        let use_case = h.use_case(at(5, 0));

        let first = use_case.execute().await.unwrap();
        assert_eq!(first.transitions.len(), 1);
        assert_eq!(first.failures.len(), 1);
        let decision = h.repo.decision("c1");
        assert_eq!(decision.status, DecisionStatus::Open);
        assert_eq!(decision.current_stage(), Some(ConsentStage::Terminee));

        // Still reported while the votes stay inconsistent
        let second = use_case.execute().await.unwrap();
        assert_eq!(second.examined, 1);
        assert_eq!(second.failures.len(), 1);

        h.repo
            .snapshots
            .lock()
            .unwrap()
            .get_mut(&DecisionId::new("c1"))
            .unwrap()
            .ballots
            .clear();
        let third = use_case.execute().await.unwrap();
        assert_eq!(
            third.closed,
            vec![(DecisionId::new("c1"), DecisionResult::Blocked)]
        );
        assert!(third.transitions.is_empty());
        assert_eq!(h.repo.decision("c1").status, DecisionStatus::Closed);
        assert_eq!(
            h.audit.types(),
            vec![AuditEventType::StageChanged, AuditEventType::Closed]
        );
    }

    #[tokio::test]
    async fn test_decision_left_in_tallying_is_closed() {
        let mut snapshot = distinct("c1")
            .with_objections(vec![Objection::new("ben", ObjectionValue::NoObjection)]);
        snapshot.decision.apply(
            &DecisionUpdate::new()
                .status(DecisionStatus::Tallying)
                .consent_current_stage(ConsentStage::Terminee),
        );
        let h = Harness::new(vec![snapshot]);

        let report = h.use_case(at(6, 0)).execute().await.unwrap();

        assert_eq!(report.examined, 1);
        assert_eq!(
            report.closed,
            vec![(DecisionId::new("c1"), DecisionResult::Approved)]
        );
        assert_eq!(h.repo.decision("c1").status, DecisionStatus::Closed);
    }

    #[tokio::test]
    async fn test_tallying_before_termination_is_left_alone() {
        let mut snapshot = distinct("c1");
        snapshot
            .decision
            .apply(&DecisionUpdate::new().status(DecisionStatus::Tallying));
        let h = Harness::new(vec![snapshot]);

        let report = h.use_case(at(2, 0)).execute().await.unwrap();

        assert_eq!(report.unchanged, 1);
        assert!(report.is_quiet());
        assert_eq!(*h.repo.refused_writes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_one_broken_decision_does_not_stop_the_pass() {
        let mut broken = distinct("a-broken");
        broken.decision.consent = None;
        let h = Harness::new(vec![broken, distinct("b-fine")]);

        let report = h.use_case(at(2, 0)).execute().await.unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].decision_id, DecisionId::new("a-broken"));
        assert_eq!(report.transitions.len(), 1);
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_stage() {
        let h = Harness {
            notifier: Arc::new(RecordingNotifier {
                fail: true,
                ..Default::default()
            }),
            ..Harness::new(vec![distinct("c1")])
        };

        let report = h.use_case(at(2, 0)).execute().await.unwrap();

        assert_eq!(report.transitions.len(), 1);
        assert_eq!(h.repo.decision("c1").current_stage(), Some(ConsentStage::Avis));
        assert_eq!(h.audit.types(), vec![AuditEventType::StageChanged]);
    }

    #[tokio::test]
    async fn test_non_consent_methods_are_ignored() {
        let other = DecisionSnapshot::new(
            agora_domain::Decision::new("m1", "Budget", DecisionMethod::Majority, "ana")
                .with_status(DecisionStatus::Open),
        );
        let h = Harness::new(vec![other]);

        let report = h.use_case(at(2, 0)).execute().await.unwrap();
        assert_eq!(report.examined, 0);
    }
}
