//! Ballots cast on a decision
//!
//! The stance taxonomy and its two enum-keyed tables (signed weight and
//! support/oppose leaning) live in [`value`]; both are exhaustive `match`es,
//! so a new stance cannot be added without deciding how it counts.

pub mod entities;
pub mod tally;
pub mod value;

pub use entities::Ballot;
pub use tally::BallotTally;
pub use value::{BallotValue, Leaning};
