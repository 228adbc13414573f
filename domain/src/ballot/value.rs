//! Stance taxonomy

use serde::{Deserialize, Serialize};

/// One voter's stance, from strongest support to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BallotValue {
    StrongSupport,
    Support,
    WeakSupport,
    Abstain,
    WeakOppose,
    Oppose,
    StrongOppose,
    Block,
}

/// Which side of a yes/no count a stance falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leaning {
    Support,
    Oppose,
    Neutral,
    /// Stronger than opposition; counted with it where only two sides exist
    Block,
}

impl BallotValue {
    pub const ALL: [BallotValue; 8] = [
        BallotValue::StrongSupport,
        BallotValue::Support,
        BallotValue::WeakSupport,
        BallotValue::Abstain,
        BallotValue::WeakOppose,
        BallotValue::Oppose,
        BallotValue::StrongOppose,
        BallotValue::Block,
    ];

    /// Signed weight used by WEIGHTED_VOTE
    ///
    /// ```
    /// use agora_domain::BallotValue;
    ///
    /// assert_eq!(BallotValue::StrongSupport.signed_weight(), 3.0);
    /// assert_eq!(BallotValue::Block.signed_weight(), -10.0);
    /// ```
    pub fn signed_weight(&self) -> f64 {
        match self {
            BallotValue::StrongSupport => 3.0,
            BallotValue::Support => 2.0,
            BallotValue::WeakSupport => 1.0,
            BallotValue::Abstain => 0.0,
            BallotValue::WeakOppose => -1.0,
            BallotValue::Oppose => -2.0,
            BallotValue::StrongOppose => -3.0,
            // A block outweighs any plausible countervailing support
            BallotValue::Block => -10.0,
        }
    }

    pub fn leaning(&self) -> Leaning {
        match self {
            BallotValue::StrongSupport | BallotValue::Support | BallotValue::WeakSupport => {
                Leaning::Support
            }
            BallotValue::Abstain => Leaning::Neutral,
            BallotValue::WeakOppose | BallotValue::Oppose | BallotValue::StrongOppose => {
                Leaning::Oppose
            }
            BallotValue::Block => Leaning::Block,
        }
    }

    pub fn is_support(&self) -> bool {
        self.leaning() == Leaning::Support
    }

    /// Opposition in a two-sided count, blocks included
    pub fn is_opposition(&self) -> bool {
        matches!(self.leaning(), Leaning::Oppose | Leaning::Block)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BallotValue::StrongSupport => "STRONG_SUPPORT",
            BallotValue::Support => "SUPPORT",
            BallotValue::WeakSupport => "WEAK_SUPPORT",
            BallotValue::Abstain => "ABSTAIN",
            BallotValue::WeakOppose => "WEAK_OPPOSE",
            BallotValue::Oppose => "OPPOSE",
            BallotValue::StrongOppose => "STRONG_OPPOSE",
            BallotValue::Block => "BLOCK",
        }
    }

    /// Single-character glyph for vote summaries
    pub fn glyph(&self) -> char {
        match self.leaning() {
            Leaning::Support => '●',
            Leaning::Oppose => '○',
            Leaning::Neutral => '·',
            Leaning::Block => '✕',
        }
    }
}

impl std::fmt::Display for BallotValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BallotValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        BallotValue::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| format!("Unknown ballot value: {}", s))
    }
}
