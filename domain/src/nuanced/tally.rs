//! Mention distributions and majority-judgment ranking

use super::mention::{Mention, MentionScale, NuancedMention};
use crate::core::error::PreconditionViolation;
use crate::core::ids::ProposalId;
use crate::decision::method::DecisionMethod;
use crate::decision::proposal::Proposal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How many times each mention of the scale was given to one proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionDistribution {
    pub proposal: ProposalId,
    pub position: u32,
    /// Every mention of the scale, best first, with its count
    pub counts: Vec<(Mention, usize)>,
    pub total: usize,
}

impl MentionDistribution {
    fn empty(proposal: &Proposal, scale: MentionScale) -> Self {
        Self {
            proposal: proposal.id.clone(),
            position: proposal.position,
            counts: scale.mentions().iter().map(|&m| (m, 0)).collect(),
            total: 0,
        }
    }

    fn add(&mut self, mention: Mention) {
        if let Some(entry) = self.counts.iter_mut().find(|(m, _)| *m == mention) {
            entry.1 += 1;
            self.total += 1;
        }
    }

    pub fn count(&self, mention: Mention) -> usize {
        self.counts
            .iter()
            .find(|(m, _)| *m == mention)
            .map_or(0, |(_, c)| *c)
    }

    /// All given mentions, best first
    fn sorted(&self) -> Vec<Mention> {
        self.counts
            .iter()
            .flat_map(|&(m, c)| std::iter::repeat_n(m, c))
            .collect()
    }

    /// Majority mention: the best mention that a strict majority of voters
    /// gave at least. With an even count this is the lower middle mention.
    pub fn majority_mention(&self) -> Option<Mention> {
        let sorted = self.sorted();
        sorted.get(sorted.len() / 2).copied()
    }

    /// Votes strictly better and strictly worse than the majority mention
    pub fn gauge(&self) -> (usize, usize) {
        let Some(median) = self.majority_mention() else {
            return (0, 0);
        };
        self.counts
            .iter()
            .fold((0, 0), |(above, below), &(m, c)| match m.rank().cmp(&median.rank()) {
                Ordering::Less => (above + c, below),
                Ordering::Greater => (above, below + c),
                Ordering::Equal => (above, below),
            })
    }

    /// Share of votes per mention, best first (0.0 to 1.0)
    pub fn shares(&self) -> Vec<(Mention, f64)> {
        self.counts
            .iter()
            .map(|&(m, c)| {
                let share = if self.total == 0 {
                    0.0
                } else {
                    c as f64 / self.total as f64
                };
                (m, share)
            })
            .collect()
    }
}

/// Place of one proposal in the final ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRanking {
    /// 1-based; proposals that cannot be told apart share a rank
    pub rank: usize,
    pub proposal: ProposalId,
    pub majority_mention: Option<Mention>,
    pub distribution: MentionDistribution,
}

/// Compare two distributions, better first.
///
/// The better majority mention wins. On equal mentions the majority gauge
/// decides: a proposal pulled up (more votes above the median than below)
/// beats one pulled down; among those pulled up the larger share above
/// wins, among those pulled down the smaller share below wins. Shares are
/// compared as exact fractions of each proposal's own vote count.
/// Proposals without any mention sort after every rated proposal.
fn compare(a: &MentionDistribution, b: &MentionDistribution) -> Ordering {
    let (Some(median_a), Some(median_b)) = (a.majority_mention(), b.majority_mention()) else {
        return match (a.total, b.total) {
            (0, 0) => Ordering::Equal,
            (0, _) => Ordering::Greater,
            _ => Ordering::Less,
        };
    };
    median_a
        .rank()
        .cmp(&median_b.rank())
        .then_with(|| compare_gauges(a, b))
}

fn compare_gauges(a: &MentionDistribution, b: &MentionDistribution) -> Ordering {
    let (above_a, below_a) = a.gauge();
    let (above_b, below_b) = b.gauge();
    // Cross-multiplied so shares of different vote counts compare exactly
    let share = |x: usize, total_x: usize, y: usize, total_y: usize| {
        (x * total_y).cmp(&(y * total_x))
    };

    let lean_a = above_a.cmp(&below_a);
    let lean_b = above_b.cmp(&below_b);
    match (lean_a, lean_b) {
        (Ordering::Greater, Ordering::Greater) => share(above_b, b.total, above_a, a.total),
        (Ordering::Less, Ordering::Less) => share(below_a, a.total, below_b, b.total),
        // Greater (pulled up) first, then balanced, then Less (pulled down)
        _ => lean_b.cmp(&lean_a),
    }
}

/// Tally mentions per proposal and rank them by majority judgment.
///
/// Mentions outside `scale`, or naming a proposal the decision does not
/// have, mean the input does not belong to this decision.
///
/// # Example
///
/// ```
/// use agora_domain::{Mention, MentionScale, NuancedMention, Proposal, rank_proposals};
///
/// let proposals = vec![Proposal::new("a", "Plan A", 1), Proposal::new("b", "Plan B", 2)];
/// let mentions = vec![
///     NuancedMention::new("a", "v1", Mention::Passable),
///     NuancedMention::new("b", "v1", Mention::Good),
/// ];
/// let ranking = rank_proposals(&proposals, &mentions, MentionScale::Five).unwrap();
/// assert_eq!(ranking[0].proposal.as_str(), "b");
/// ```
pub fn rank_proposals(
    proposals: &[Proposal],
    mentions: &[NuancedMention],
    scale: MentionScale,
) -> Result<Vec<ProposalRanking>, PreconditionViolation> {
    let mut distributions: Vec<MentionDistribution> = proposals
        .iter()
        .map(|p| MentionDistribution::empty(p, scale))
        .collect();

    for mention in mentions {
        if !scale.contains(mention.mention) {
            return Err(PreconditionViolation::InconsistentInput {
                method: DecisionMethod::NuancedVote,
                reason: format!(
                    "mention {} is not on the {}-level scale",
                    mention.mention,
                    scale.levels()
                ),
            });
        }
        let distribution = distributions
            .iter_mut()
            .find(|d| d.proposal == mention.proposal)
            .ok_or_else(|| PreconditionViolation::InconsistentInput {
                method: DecisionMethod::NuancedVote,
                reason: format!("mention for unknown proposal {}", mention.proposal),
            })?;
        distribution.add(mention.mention);
    }

    distributions.sort_by(|a, b| compare(a, b).then_with(|| a.position.cmp(&b.position)));

    let mut ranking: Vec<ProposalRanking> = Vec::with_capacity(distributions.len());
    for (index, distribution) in distributions.into_iter().enumerate() {
        let rank = match ranking.last() {
            Some(previous) if compare(&previous.distribution, &distribution) == Ordering::Equal => {
                previous.rank
            }
            _ => index + 1,
        };
        ranking.push(ProposalRanking {
            rank,
            proposal: distribution.proposal.clone(),
            majority_mention: distribution.majority_mention(),
            distribution,
        });
    }
    Ok(ranking)
}
