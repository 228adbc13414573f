//! Objections on the final proposal

use crate::core::ids::ParticipantId;
use serde::{Deserialize, Serialize};

/// Stance on the final proposal during the OBJECTIONS stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectionValue {
    NoObjection,
    NoPosition,
    Objection,
}

impl ObjectionValue {
    pub fn is_blocking(&self) -> bool {
        match self {
            ObjectionValue::Objection => true,
            ObjectionValue::NoObjection | ObjectionValue::NoPosition => false,
        }
    }
}

/// One participant's objection record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objection {
    pub participant: ParticipantId,
    pub value: ObjectionValue,
}

impl Objection {
    pub fn new(participant: impl Into<ParticipantId>, value: ObjectionValue) -> Self {
        Self {
            participant: participant.into(),
            value,
        }
    }
}
