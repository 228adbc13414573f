//! Governance methods

use crate::core::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// The governance method a decision was created with.
///
/// Determines which resolution rule applies and what kind of input
/// (ballots, objections, mentions, advice) the decision collects.
///
/// # Example
///
/// ```
/// use agora_domain::DecisionMethod;
///
/// let method: DecisionMethod = "weighted_vote".parse().unwrap();
/// assert_eq!(method, DecisionMethod::WeightedVote);
/// assert!("lottery".parse::<DecisionMethod>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionMethod {
    /// Everyone must strongly support
    Consensus,
    /// Passes unless someone objects or blocks
    Consent,
    /// More support than opposition
    Majority,
    /// At least two thirds support
    Supermajority,
    /// Signed sum of weighted stances must be positive
    WeightedVote,
    /// Informational only
    Advisory,
    /// Majority-judgment style mentions per proposal
    NuancedVote,
    /// Originator decides after collecting every expected opinion
    AdviceSolicitation,
}

impl DecisionMethod {
    /// All methods, in declaration order
    pub const ALL: [DecisionMethod; 8] = [
        DecisionMethod::Consensus,
        DecisionMethod::Consent,
        DecisionMethod::Majority,
        DecisionMethod::Supermajority,
        DecisionMethod::WeightedVote,
        DecisionMethod::Advisory,
        DecisionMethod::NuancedVote,
        DecisionMethod::AdviceSolicitation,
    ];

    /// Canonical upper-case name, as stored by the host
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionMethod::Consensus => "CONSENSUS",
            DecisionMethod::Consent => "CONSENT",
            DecisionMethod::Majority => "MAJORITY",
            DecisionMethod::Supermajority => "SUPERMAJORITY",
            DecisionMethod::WeightedVote => "WEIGHTED_VOTE",
            DecisionMethod::Advisory => "ADVISORY",
            DecisionMethod::NuancedVote => "NUANCED_VOTE",
            DecisionMethod::AdviceSolicitation => "ADVICE_SOLICITATION",
        }
    }

    /// Whether the decision runs through the staged consent workflow
    pub fn is_staged(&self) -> bool {
        matches!(self, DecisionMethod::Consent)
    }

    /// Whether objections may stand in for ballots
    pub fn accepts_objections(&self) -> bool {
        matches!(self, DecisionMethod::Consent)
    }

    /// Whether votes are cast per proposal
    pub fn uses_proposals(&self) -> bool {
        matches!(self, DecisionMethod::Majority | DecisionMethod::NuancedVote)
    }

    /// Whether the outcome is computed from votes rather than written by hand
    pub fn is_computed(&self) -> bool {
        !matches!(self, DecisionMethod::AdviceSolicitation)
    }
}

impl std::fmt::Display for DecisionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        DecisionMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| ConfigurationError::UnknownMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_canonical_names() {
        for method in DecisionMethod::ALL {
            assert_eq!(method.as_str().parse::<DecisionMethod>(), Ok(method));
        }
    }

    #[test]
    fn test_parse_is_case_and_dash_insensitive() {
        assert_eq!(
            "advice-solicitation".parse::<DecisionMethod>(),
            Ok(DecisionMethod::AdviceSolicitation)
        );
        assert_eq!(
            " nuanced_vote ".parse::<DecisionMethod>(),
            Ok(DecisionMethod::NuancedVote)
        );
    }

    #[test]
    fn test_unknown_method_is_configuration_error() {
        assert_eq!(
            "SORTITION".parse::<DecisionMethod>(),
            Err(ConfigurationError::UnknownMethod("SORTITION".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&DecisionMethod::WeightedVote).unwrap();
        assert_eq!(json, "\"WEIGHTED_VOTE\"");
        let parsed: DecisionMethod = serde_json::from_str("\"SUPERMAJORITY\"").unwrap();
        assert_eq!(parsed, DecisionMethod::Supermajority);
    }

    #[test]
    fn test_method_capabilities() {
        assert!(DecisionMethod::Consent.is_staged());
        assert!(!DecisionMethod::Majority.is_staged());
        assert!(DecisionMethod::NuancedVote.uses_proposals());
        assert!(!DecisionMethod::AdviceSolicitation.is_computed());
    }
}
