//! Nuanced (majority-judgment) voting
//!
//! Voters rate each proposal with a mention on a 3, 5 or 7 level scale.
//! Proposals are ranked by their majority mention, ties broken by
//! repeatedly removing one median vote from each side and comparing again.

pub mod mention;
pub mod tally;

pub use mention::{Mention, MentionScale, NuancedMention};
pub use tally::{MentionDistribution, ProposalRanking, rank_proposals};
