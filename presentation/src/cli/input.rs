//! Vote file format for `agora resolve`
//!
//! ```json
//! {
//!   "ballots": [{ "voter": "ana", "value": "SUPPORT" }],
//!   "objections": [],
//!   "proposals": [{ "id": "p1", "title": "Plan A", "position": 1 }],
//!   "mentions": [{ "proposal": "p1", "voter": "ben", "mention": "GOOD" }],
//!   "mention_scale": "FIVE"
//! }
//! ```
//!
//! Every field is optional.

use agora_domain::{Ballot, ResolutionContext};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VoteFile {
    #[serde(default)]
    pub ballots: Vec<Ballot>,
    #[serde(flatten)]
    pub context: ResolutionContext,
}

impl VoteFile {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
