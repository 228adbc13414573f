//! Consent process state machine
//!
//! Combines the time-derived stage with the stored stage and the creator's
//! manual actions. Every operation here is pure: it returns the transition
//! to persist and leaves writing it to the caller.

use super::schedule::ConsentWindow;
use super::stage::{ConsentStage, StepMode};
use crate::core::error::{ConfigurationError, DomainError, PreconditionViolation};
use crate::core::ids::ParticipantId;
use crate::decision::entities::{DecisionStatus, DecisionUpdate};
use crate::decision::result::DecisionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored consent state of one decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentState {
    pub window: ConsentWindow,
    pub step_mode: StepMode,
    pub current_stage: ConsentStage,
    /// Set when the creator moved the stage by hand
    #[serde(default)]
    pub manually_advanced: bool,
}

/// Why a stage changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// Elapsed time moved the decision into a later bucket
    Schedule,
    /// Creator kept the proposal unchanged and skipped to OBJECTIONS
    ProposalKept,
    /// Creator withdrew the proposal
    ProposalWithdrawn,
}

/// A stage change to persist and announce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: ConsentStage,
    pub to: ConsentStage,
    pub cause: TransitionCause,
    /// End of the new stage; None once finished
    pub deadline: Option<DateTime<Utc>>,
}

impl StageTransition {
    /// The decision update that records this transition
    pub fn to_update(&self, now: DateTime<Utc>) -> DecisionUpdate {
        let update = DecisionUpdate::new().consent_current_stage(self.to);
        match self.cause {
            TransitionCause::Schedule => update,
            TransitionCause::ProposalKept => update.consent_manually_advanced(true),
            TransitionCause::ProposalWithdrawn => update
                .consent_manually_advanced(true)
                .status(DecisionStatus::Closed)
                .result(DecisionResult::Withdrawn)
                .decided_at(now),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.to.is_terminal()
    }
}

impl ConsentState {
    /// Fresh state positioned on the mode's first stage
    pub fn new(window: ConsentWindow, step_mode: StepMode) -> Self {
        Self {
            window,
            step_mode,
            current_stage: step_mode.first_stage(),
            manually_advanced: false,
        }
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.step_mode.contains(self.current_stage) {
            return Err(ConfigurationError::StageOutsideMode {
                stage: self.current_stage,
                mode: self.step_mode.to_string(),
            });
        }
        Ok(())
    }

    /// Stage dictated by the clock alone
    pub fn scheduled_stage(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ConsentStage, ConfigurationError> {
        self.window.stage_at(self.step_mode, now)
    }

    /// Stage the decision is in at `now`: the later of stored and scheduled.
    ///
    /// A stored stage ahead of the clock (kept or withdrawn proposal) wins,
    /// so the result never moves backwards.
    pub fn effective_stage(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ConsentStage, ConfigurationError> {
        self.validate()?;
        Ok(self.current_stage.max(self.scheduled_stage(now)?))
    }

    /// Scheduled end of a stage
    pub fn deadline_of(
        &self,
        stage: ConsentStage,
    ) -> Result<Option<DateTime<Utc>>, ConfigurationError> {
        Ok(self
            .window
            .windows(self.step_mode)?
            .get(&stage)
            .map(|w| w.end))
    }

    /// Transition due at `now`, if any.
    ///
    /// Recomputing with unchanged inputs yields `None`.
    pub fn reconcile(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<StageTransition>, ConfigurationError> {
        let next = self.effective_stage(now)?;
        if next == self.current_stage {
            return Ok(None);
        }
        Ok(Some(StageTransition {
            from: self.current_stage,
            to: next,
            cause: TransitionCause::Schedule,
            deadline: self.deadline_of(next)?,
        }))
    }

    fn check_amendment_action(
        &self,
        creator: &ParticipantId,
        actor: &ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<ConsentStage, DomainError> {
        if actor != creator {
            return Err(PreconditionViolation::NotCreator(actor.clone()).into());
        }
        let stage = self.effective_stage(now)?;
        if stage != ConsentStage::Amendements {
            return Err(PreconditionViolation::WrongStage {
                expected: ConsentStage::Amendements,
                actual: stage,
            }
            .into());
        }
        Ok(stage)
    }

    /// Creator keeps the proposal unchanged: skip straight to OBJECTIONS.
    pub fn keep_proposal(
        &self,
        creator: &ParticipantId,
        actor: &ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<StageTransition, DomainError> {
        let from = self.check_amendment_action(creator, actor, now)?;
        Ok(StageTransition {
            from,
            to: ConsentStage::Objections,
            cause: TransitionCause::ProposalKept,
            deadline: self.deadline_of(ConsentStage::Objections)?,
        })
    }

    /// Creator withdraws the proposal: the decision ends as WITHDRAWN.
    pub fn withdraw_proposal(
        &self,
        creator: &ParticipantId,
        actor: &ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<StageTransition, DomainError> {
        let from = self.check_amendment_action(creator, actor, now)?;
        Ok(StageTransition {
            from,
            to: ConsentStage::Terminee,
            cause: TransitionCause::ProposalWithdrawn,
            deadline: None,
        })
    }

    /// Record a transition in this state
    pub fn apply(&mut self, transition: &StageTransition) {
        self.current_stage = self.current_stage.max(transition.to);
        if transition.cause != TransitionCause::Schedule {
            self.manually_advanced = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    fn state(mode: StepMode) -> ConsentState {
        ConsentState::new(ConsentWindow::new(at(1, 0), at(5, 0)).unwrap(), mode)
    }

    fn alice() -> ParticipantId {
        ParticipantId::new("alice")
    }

    #[test]
    fn test_reconcile_moves_forward_once() {
        let mut s = state(StepMode::Distinct);
        let transition = s.reconcile(at(2, 6)).unwrap().unwrap();
        assert_eq!(transition.from, ConsentStage::Clarifications);
        assert_eq!(transition.to, ConsentStage::Avis);
        assert_eq!(transition.cause, TransitionCause::Schedule);
        assert_eq!(transition.deadline, Some(at(3, 0)));

        s.apply(&transition);
        assert_eq!(s.reconcile(at(2, 6)).unwrap(), None);
        assert_eq!(s.reconcile(at(2, 7)).unwrap(), None);
    }

    #[test]
    fn test_reconcile_can_skip_stages() {
        let s = state(StepMode::Distinct);
        let transition = s.reconcile(at(4, 1)).unwrap().unwrap();
        assert_eq!(transition.to, ConsentStage::Objections);
    }

    #[test]
    fn test_reconcile_never_regresses() {
        let mut s = state(StepMode::Merged);
        s.current_stage = ConsentStage::Objections;
        // Clock says AMENDEMENTS, stored stage is ahead
        assert_eq!(s.reconcile(at(3, 0)).unwrap(), None);
        assert_eq!(s.effective_stage(at(3, 0)).unwrap(), ConsentStage::Objections);
    }

    #[test]
    fn test_reconcile_keeps_forced_terminee() {
        let mut s = state(StepMode::Distinct);
        let withdraw = {
            s.current_stage = ConsentStage::Amendements;
            s.withdraw_proposal(&alice(), &alice(), at(3, 1)).unwrap()
        };
        s.apply(&withdraw);
        assert_eq!(s.current_stage, ConsentStage::Terminee);
        assert!(s.manually_advanced);
        assert_eq!(s.reconcile(at(3, 2)).unwrap(), None);
        assert_eq!(s.reconcile(at(1, 2)).unwrap(), None);
    }

    #[test]
    fn test_reconcile_reaches_terminee_at_end() {
        let mut s = state(StepMode::Merged);
        s.current_stage = ConsentStage::Objections;
        let transition = s.reconcile(at(5, 0)).unwrap().unwrap();
        assert!(transition.is_terminal());
        assert_eq!(transition.deadline, None);
    }

    #[test]
    fn test_keep_proposal_skips_to_objections() {
        let s = state(StepMode::Distinct);
        let transition = s.keep_proposal(&alice(), &alice(), at(3, 4)).unwrap();
        assert_eq!(transition.from, ConsentStage::Amendements);
        assert_eq!(transition.to, ConsentStage::Objections);
        assert_eq!(transition.cause, TransitionCause::ProposalKept);
        assert_eq!(transition.deadline, Some(at(5, 0)));

        let update = transition.to_update(at(3, 4));
        assert_eq!(update.consent_current_stage, Some(ConsentStage::Objections));
        assert_eq!(update.status, None);
    }

    #[test]
    fn test_kept_proposal_is_not_pulled_back() {
        let mut s = state(StepMode::Distinct);
        let transition = s.keep_proposal(&alice(), &alice(), at(3, 4)).unwrap();
        s.apply(&transition);
        // Still inside the AMENDEMENTS bucket by the clock
        assert_eq!(s.reconcile(at(3, 10)).unwrap(), None);
        assert_eq!(s.current_stage, ConsentStage::Objections);
    }

    #[test]
    fn test_withdraw_closes_as_withdrawn() {
        let s = state(StepMode::Merged);
        let transition = s.withdraw_proposal(&alice(), &alice(), at(3, 0)).unwrap();
        let update = transition.to_update(at(3, 0));

        assert_eq!(update.status, Some(DecisionStatus::Closed));
        assert_eq!(update.result, Some(DecisionResult::Withdrawn));
        assert_eq!(update.consent_current_stage, Some(ConsentStage::Terminee));
        assert_eq!(update.decided_at, Some(at(3, 0)));
    }

    #[test]
    fn test_manual_actions_require_creator() {
        let s = state(StepMode::Distinct);
        let bob = ParticipantId::new("bob");
        let err = s.keep_proposal(&alice(), &bob, at(3, 4)).unwrap_err();
        assert_eq!(
            err,
            DomainError::Precondition(PreconditionViolation::NotCreator(bob.clone()))
        );
        assert!(s.withdraw_proposal(&alice(), &bob, at(3, 4)).is_err());
    }

    #[test]
    fn test_manual_actions_require_amendements() {
        let s = state(StepMode::Distinct);
        let err = s.keep_proposal(&alice(), &alice(), at(2, 4)).unwrap_err();
        assert_eq!(
            err,
            DomainError::Precondition(PreconditionViolation::WrongStage {
                expected: ConsentStage::Amendements,
                actual: ConsentStage::Avis,
            })
        );
        assert!(s.withdraw_proposal(&alice(), &alice(), at(4, 4)).is_err());
    }

    #[test]
    fn test_stage_outside_mode_is_configuration_error() {
        let mut s = state(StepMode::Merged);
        s.current_stage = ConsentStage::Avis;
        assert!(matches!(
            s.reconcile(at(2, 0)),
            Err(ConfigurationError::StageOutsideMode { .. })
        ));
    }
}
