//! Advice solicitation
//!
//! The originator asks a set of advisors for their opinion, then writes the
//! final decision by hand. The write is refused until every expected advisor
//! has answered.

use crate::core::error::PreconditionViolation;
use crate::core::ids::ParticipantId;
use crate::decision::entities::{Decision, DecisionUpdate};
use crate::decision::result::DecisionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One advisor's recorded opinion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    pub advisor: ParticipantId,
    pub content: String,
}

impl Opinion {
    pub fn new(advisor: impl Into<ParticipantId>, content: impl Into<String>) -> Self {
        Self {
            advisor: advisor.into(),
            content: content.into(),
        }
    }
}

/// Advisors asked and opinions received so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceSolicitation {
    pub expected_advisors: BTreeSet<ParticipantId>,
    #[serde(default)]
    pub opinions: Vec<Opinion>,
}

impl AdviceSolicitation {
    pub fn new(expected: impl IntoIterator<Item = impl Into<ParticipantId>>) -> Self {
        Self {
            expected_advisors: expected.into_iter().map(Into::into).collect(),
            opinions: Vec::new(),
        }
    }

    pub fn with_opinion(mut self, opinion: Opinion) -> Self {
        self.opinions.push(opinion);
        self
    }

    /// Expected advisors who have not given an opinion yet
    pub fn missing_advisors(&self) -> Vec<&ParticipantId> {
        self.expected_advisors
            .iter()
            .filter(|advisor| !self.opinions.iter().any(|o| &o.advisor == *advisor))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_advisors().is_empty()
    }

    /// Update recording the originator's final decision.
    ///
    /// Only APPROVED or REJECTED can be chosen; BLOCKED belongs to consent
    /// and WITHDRAWN to the absence of a decision.
    pub fn final_decision(
        &self,
        decision: &Decision,
        actor: &ParticipantId,
        result: DecisionResult,
        now: DateTime<Utc>,
    ) -> Result<DecisionUpdate, PreconditionViolation> {
        if actor != &decision.creator {
            return Err(PreconditionViolation::NotCreator(actor.clone()));
        }
        if !matches!(result, DecisionResult::Approved | DecisionResult::Rejected) {
            return Err(PreconditionViolation::InvalidFinalResult(result.to_string()));
        }
        let missing = self.missing_advisors().len();
        if missing > 0 {
            return Err(PreconditionViolation::OpinionsMissing { missing });
        }
        decision.close_with(result, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::entities::DecisionStatus;
    use crate::decision::method::DecisionMethod;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn decision() -> Decision {
        Decision::new("d1", "Hire a designer", DecisionMethod::AdviceSolicitation, "olga")
            .with_status(DecisionStatus::Open)
    }

    #[test]
    fn test_missing_advisors() {
        let advice = AdviceSolicitation::new(["ana", "ben", "cho"])
            .with_opinion(Opinion::new("ben", "Go ahead"));
        let missing: Vec<&str> = advice.missing_advisors().iter().map(|p| p.as_str()).collect();
        assert_eq!(missing, vec!["ana", "cho"]);
        assert!(!advice.is_complete());
    }

    #[test]
    fn test_final_decision_requires_every_opinion() {
        let advice = AdviceSolicitation::new(["ana", "ben"]).with_opinion(Opinion::new("ana", "Yes"));
        let err = advice
            .final_decision(&decision(), &"olga".into(), DecisionResult::Approved, now())
            .unwrap_err();
        assert_eq!(err, PreconditionViolation::OpinionsMissing { missing: 1 });
    }

    #[test]
    fn test_final_decision_by_originator() {
        let advice = AdviceSolicitation::new(["ana"]).with_opinion(Opinion::new("ana", "Careful"));
        let update = advice
            .final_decision(&decision(), &"olga".into(), DecisionResult::Rejected, now())
            .unwrap();
        assert_eq!(update.status, Some(DecisionStatus::Closed));
        assert_eq!(update.result, Some(DecisionResult::Rejected));
        assert_eq!(update.decided_at, Some(now()));
    }

    #[test]
    fn test_final_decision_rejects_other_actor() {
        let advice = AdviceSolicitation::new(Vec::<String>::new());
        let err = advice
            .final_decision(&decision(), &"ana".into(), DecisionResult::Approved, now())
            .unwrap_err();
        assert_eq!(err, PreconditionViolation::NotCreator("ana".into()));
    }

    #[test]
    fn test_final_decision_rejects_blocked() {
        let advice = AdviceSolicitation::new(Vec::<String>::new());
        assert!(matches!(
            advice.final_decision(&decision(), &"olga".into(), DecisionResult::Blocked, now()),
            Err(PreconditionViolation::InvalidFinalResult(_))
        ));
    }
}
