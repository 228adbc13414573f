//! Ballot aggregation
//!
//! [`BallotTally`] is the counted form of a ballot set that every
//! ballot-based resolution rule reads from.

use super::entities::Ballot;
use super::value::{BallotValue, Leaning};
use crate::core::ids::ProposalId;
use crate::decision::proposal::Proposal;
use serde::{Deserialize, Serialize};

/// Counts and sums over a set of ballots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallotTally {
    /// Support-leaning ballots
    pub support: usize,
    /// Oppose-leaning ballots, blocks excluded
    pub oppose: usize,
    /// Abstentions
    pub neutral: usize,
    pub block: usize,
    pub strong_support: usize,
    pub strong_oppose: usize,
    pub total: usize,
    /// Sum of signed stance weight times ballot weight
    pub weighted_sum: f64,
    /// Visual summary, one glyph per ballot (e.g. "[●●○]")
    pub summary: String,
}

impl BallotTally {
    pub fn from_ballots(ballots: &[Ballot]) -> Self {
        let mut tally = BallotTally {
            summary: String::from("["),
            ..Default::default()
        };

        for ballot in ballots {
            tally.total += 1;
            tally.weighted_sum += ballot.weighted_score();
            tally.summary.push(ballot.value.glyph());

            match ballot.value.leaning() {
                Leaning::Support => tally.support += 1,
                Leaning::Oppose => tally.oppose += 1,
                Leaning::Neutral => tally.neutral += 1,
                Leaning::Block => tally.block += 1,
            }
            match ballot.value {
                BallotValue::StrongSupport => tally.strong_support += 1,
                BallotValue::StrongOppose => tally.strong_oppose += 1,
                _ => {}
            }
        }

        tally.summary.push(']');
        tally
    }

    /// Opposition in a two-sided count (blocks included)
    pub fn opposition(&self) -> usize {
        self.oppose + self.block
    }

    /// Every ballot is STRONG_SUPPORT (false for an empty set)
    pub fn is_unanimous_strong_support(&self) -> bool {
        self.total > 0 && self.strong_support == self.total
    }

    /// Support-leaning share of all cast ballots (0.0 to 1.0)
    pub fn support_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.support as f64 / self.total as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Ballots counted for a single proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalTally {
    pub proposal: ProposalId,
    pub position: u32,
    pub tally: BallotTally,
}

impl ProposalTally {
    /// Support minus opposition
    pub fn margin(&self) -> i64 {
        self.tally.support as i64 - self.tally.opposition() as i64
    }
}

/// Tally ballots per proposal, best margin first.
///
/// Equal margins keep the proposals' display order. Ballots that name no
/// proposal, or an unknown one, are ignored.
pub fn tally_proposals(proposals: &[Proposal], ballots: &[Ballot]) -> Vec<ProposalTally> {
    let mut tallies: Vec<ProposalTally> = proposals
        .iter()
        .map(|proposal| {
            let own: Vec<Ballot> = ballots
                .iter()
                .filter(|b| b.proposal.as_ref() == Some(&proposal.id))
                .cloned()
                .collect();
            ProposalTally {
                proposal: proposal.id.clone(),
                position: proposal.position,
                tally: BallotTally::from_ballots(&own),
            }
        })
        .collect();

    tallies.sort_by(|a, b| {
        b.margin()
            .cmp(&a.margin())
            .then_with(|| a.position.cmp(&b.position))
    });
    tallies
}
