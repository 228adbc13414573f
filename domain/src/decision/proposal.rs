//! Candidate options

use crate::core::ids::ProposalId;
use serde::{Deserialize, Serialize};

/// A candidate option under MAJORITY or NUANCED_VOTE.
///
/// Owned by its decision; ballots and mentions reference it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    /// Display order, also the last-resort tie-break when ranking
    pub position: u32,
}

impl Proposal {
    pub fn new(id: impl Into<ProposalId>, title: impl Into<String>, position: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position,
        }
    }
}
