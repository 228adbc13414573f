//! Mentions and their scales

use crate::core::ids::{ParticipantId, ProposalId};
use serde::{Deserialize, Serialize};

/// Ordinal rating, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mention {
    Excellent,
    VeryGood,
    Good,
    Passable,
    Insufficient,
    VeryInsufficient,
    ToReject,
}

impl Mention {
    /// 0 for the best mention, growing towards TO_REJECT
    pub fn rank(&self) -> u8 {
        match self {
            Mention::Excellent => 0,
            Mention::VeryGood => 1,
            Mention::Good => 2,
            Mention::Passable => 3,
            Mention::Insufficient => 4,
            Mention::VeryInsufficient => 5,
            Mention::ToReject => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mention::Excellent => "EXCELLENT",
            Mention::VeryGood => "VERY_GOOD",
            Mention::Good => "GOOD",
            Mention::Passable => "PASSABLE",
            Mention::Insufficient => "INSUFFICIENT",
            Mention::VeryInsufficient => "VERY_INSUFFICIENT",
            Mention::ToReject => "TO_REJECT",
        }
    }
}

impl std::fmt::Display for Mention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Available mention scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MentionScale {
    Three,
    #[default]
    Five,
    Seven,
}

const THREE_LEVELS: [Mention; 3] = [Mention::Good, Mention::Passable, Mention::Insufficient];

const FIVE_LEVELS: [Mention; 5] = [
    Mention::Excellent,
    Mention::Good,
    Mention::Passable,
    Mention::Insufficient,
    Mention::ToReject,
];

const SEVEN_LEVELS: [Mention; 7] = [
    Mention::Excellent,
    Mention::VeryGood,
    Mention::Good,
    Mention::Passable,
    Mention::Insufficient,
    Mention::VeryInsufficient,
    Mention::ToReject,
];

impl MentionScale {
    /// Mentions of this scale, best first
    pub fn mentions(&self) -> &'static [Mention] {
        match self {
            MentionScale::Three => &THREE_LEVELS,
            MentionScale::Five => &FIVE_LEVELS,
            MentionScale::Seven => &SEVEN_LEVELS,
        }
    }

    pub fn levels(&self) -> usize {
        self.mentions().len()
    }

    pub fn contains(&self, mention: Mention) -> bool {
        self.mentions().contains(&mention)
    }
}

impl std::str::FromStr for MentionScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "3" | "three" => Ok(MentionScale::Three),
            "5" | "five" => Ok(MentionScale::Five),
            "7" | "seven" => Ok(MentionScale::Seven),
            _ => Err(format!("Unknown mention scale: {}. Valid: 3, 5, 7", s)),
        }
    }
}

/// One voter's mention for one proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NuancedMention {
    pub proposal: ProposalId,
    pub voter: ParticipantId,
    pub mention: Mention,
}

impl NuancedMention {
    pub fn new(
        proposal: impl Into<ProposalId>,
        voter: impl Into<ParticipantId>,
        mention: Mention,
    ) -> Self {
        Self {
            proposal: proposal.into(),
            voter: voter.into(),
            mention,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_are_ordered_best_first() {
        for scale in [MentionScale::Three, MentionScale::Five, MentionScale::Seven] {
            let ranks: Vec<u8> = scale.mentions().iter().map(|m| m.rank()).collect();
            assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_scale_membership() {
        assert_eq!(MentionScale::Three.levels(), 3);
        assert!(!MentionScale::Three.contains(Mention::Excellent));
        assert!(!MentionScale::Five.contains(Mention::VeryGood));
        assert!(MentionScale::Seven.contains(Mention::VeryInsufficient));
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!("7".parse::<MentionScale>(), Ok(MentionScale::Seven));
        assert_eq!("three".parse::<MentionScale>(), Ok(MentionScale::Three));
        assert!("4".parse::<MentionScale>().is_err());
    }
}
