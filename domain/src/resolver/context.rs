//! Resolver input and output

use crate::ballot::tally::BallotTally;
use crate::consent::objection::Objection;
use crate::decision::method::DecisionMethod;
use crate::decision::proposal::Proposal;
use crate::decision::result::DecisionResult;
use crate::nuanced::mention::{MentionScale, NuancedMention};
use crate::nuanced::tally::ProposalRanking;
use serde::{Deserialize, Serialize};

/// Votes that are not plain ballots.
///
/// CONSENT decisions may pass objections instead of ballots; NUANCED_VOTE
/// decisions pass proposals and mentions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionContext {
    pub objections: Vec<Objection>,
    pub proposals: Vec<Proposal>,
    pub mentions: Vec<NuancedMention>,
    pub mention_scale: MentionScale,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objections(mut self, objections: Vec<Objection>) -> Self {
        self.objections = objections;
        self
    }

    pub fn with_proposals(mut self, proposals: Vec<Proposal>) -> Self {
        self.proposals = proposals;
        self
    }

    pub fn with_mentions(mut self, scale: MentionScale, mentions: Vec<NuancedMention>) -> Self {
        self.mention_scale = scale;
        self.mentions = mentions;
        self
    }
}

/// Outcome of a resolution call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub method: DecisionMethod,
    pub result: DecisionResult,
    /// Ballot counts, for ballot-based methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tally: Option<BallotTally>,
    /// Proposal ranking, for NUANCED_VOTE
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranking: Vec<ProposalRanking>,
}

impl Resolution {
    pub(crate) fn new(method: DecisionMethod, result: DecisionResult) -> Self {
        Self {
            method,
            result,
            tally: None,
            ranking: Vec::new(),
        }
    }

    pub(crate) fn with_tally(mut self, tally: BallotTally) -> Self {
        self.tally = Some(tally);
        self
    }

    pub(crate) fn with_ranking(mut self, ranking: Vec<ProposalRanking>) -> Self {
        self.ranking = ranking;
        self
    }

    /// Best-ranked proposal, for NUANCED_VOTE
    pub fn winner(&self) -> Option<&ProposalRanking> {
        self.ranking.first().filter(|r| r.majority_mention.is_some())
    }
}
