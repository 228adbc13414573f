//! Decision outcome

use serde::{Deserialize, Serialize};

/// Final outcome of a closed decision.
///
/// Computed once at closure and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionResult {
    Approved,
    Rejected,
    Blocked,
    /// Closed without a quorum, or withdrawn by its creator
    Withdrawn,
}

impl DecisionResult {
    pub fn is_approved(&self) -> bool {
        matches!(self, DecisionResult::Approved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionResult::Approved => "APPROVED",
            DecisionResult::Rejected => "REJECTED",
            DecisionResult::Blocked => "BLOCKED",
            DecisionResult::Withdrawn => "WITHDRAWN",
        }
    }
}

impl std::fmt::Display for DecisionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
