//! Ballot entity

use super::value::BallotValue;
use crate::core::ids::{ParticipantId, ProposalId};
use serde::{Deserialize, Deserializer, Serialize};

fn default_weight() -> f64 {
    1.0
}

fn non_negative_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let weight = f64::deserialize(deserializer)?;
    if is_valid_weight(weight) {
        Ok(weight)
    } else {
        Err(serde::de::Error::custom(format!(
            "ballot weight must be a finite non-negative number, got {weight}"
        )))
    }
}

fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}

/// One cast opinion
///
/// # Example
///
/// ```
/// use agora_domain::{Ballot, BallotValue};
///
/// let ballot = Ballot::new("alice", BallotValue::Support).with_weight(2.5);
/// assert_eq!(ballot.weighted_score(), 5.0);
///
/// // Weights are never negative
/// let clamped = Ballot::new("bob", BallotValue::Support).with_weight(-1.0);
/// assert_eq!(clamped.weight, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: ParticipantId,
    pub value: BallotValue,
    /// Non-negative multiplier
    #[serde(default = "default_weight", deserialize_with = "non_negative_weight")]
    pub weight: f64,
    /// Target proposal, for methods that vote per proposal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<ProposalId>,
}

impl Ballot {
    pub fn new(voter: impl Into<ParticipantId>, value: BallotValue) -> Self {
        Self {
            voter: voter.into(),
            value,
            weight: default_weight(),
            proposal: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self
    }

    pub fn on_proposal(mut self, proposal: impl Into<ProposalId>) -> Self {
        self.proposal = Some(proposal.into());
        self
    }

    /// Whether the weight is finite and non-negative
    pub fn has_valid_weight(&self) -> bool {
        is_valid_weight(self.weight)
    }

    /// Signed stance weight multiplied by the ballot weight
    pub fn weighted_score(&self) -> f64 {
        self.value.signed_weight() * self.weight
    }
}
