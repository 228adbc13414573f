//! Consent stages and step modes

use crate::core::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Phase of a CONSENT decision.
///
/// Declaration order is the progression order of both step modes, so the
/// derived `Ord` can be used to check that a decision never moves back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStage {
    Clarifications,
    /// Clarifications and advice combined (MERGED mode)
    Clarifavis,
    Avis,
    Amendements,
    Objections,
    Terminee,
}

impl ConsentStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentStage::Clarifications => "CLARIFICATIONS",
            ConsentStage::Clarifavis => "CLARIFAVIS",
            ConsentStage::Avis => "AVIS",
            ConsentStage::Amendements => "AMENDEMENTS",
            ConsentStage::Objections => "OBJECTIONS",
            ConsentStage::Terminee => "TERMINEE",
        }
    }

    /// Human-readable label for notifications
    pub fn label(&self) -> &'static str {
        match self {
            ConsentStage::Clarifications => "Clarifying questions",
            ConsentStage::Clarifavis => "Clarifying questions and advice",
            ConsentStage::Avis => "Advice",
            ConsentStage::Amendements => "Amendments",
            ConsentStage::Objections => "Objections",
            ConsentStage::Terminee => "Finished",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConsentStage::Terminee)
    }
}

impl std::fmt::Display for ConsentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the opening phases are laid out in the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepMode {
    /// Clarifications and advice are separate stages (4 buckets)
    #[default]
    Distinct,
    /// Clarifications and advice share one stage (3 buckets)
    Merged,
}

const DISTINCT_STAGES: [ConsentStage; 4] = [
    ConsentStage::Clarifications,
    ConsentStage::Avis,
    ConsentStage::Amendements,
    ConsentStage::Objections,
];

const MERGED_STAGES: [ConsentStage; 3] = [
    ConsentStage::Clarifavis,
    ConsentStage::Amendements,
    ConsentStage::Objections,
];

impl StepMode {
    /// Timed stages in order, TERMINEE excluded
    pub fn stages(&self) -> &'static [ConsentStage] {
        match self {
            StepMode::Distinct => &DISTINCT_STAGES,
            StepMode::Merged => &MERGED_STAGES,
        }
    }

    pub fn first_stage(&self) -> ConsentStage {
        self.stages()[0]
    }

    /// Whether a stage occurs in this mode (TERMINEE always does)
    pub fn contains(&self, stage: ConsentStage) -> bool {
        stage.is_terminal() || self.stages().contains(&stage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepMode::Distinct => "DISTINCT",
            StepMode::Merged => "MERGED",
        }
    }
}

impl std::fmt::Display for StepMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distinct" => Ok(StepMode::Distinct),
            "merged" => Ok(StepMode::Merged),
            _ => Err(ConfigurationError::UnknownStepMode(s.to_string())),
        }
    }
}
