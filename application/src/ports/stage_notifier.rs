//! Participant notification port
//!
//! Called after a stage change has been persisted. Delivery is best effort:
//! a failed notification is logged by the caller and never rolls back the
//! stage.

use agora_domain::{DecisionId, ParticipantId, StageTransition};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// What participants are told when a stage changes
#[derive(Debug, Clone)]
pub struct StageNotification {
    pub decision_id: DecisionId,
    pub title: String,
    pub recipients: Vec<ParticipantId>,
    pub transition: StageTransition,
}

#[async_trait]
pub trait StageNotifier: Send + Sync {
    async fn notify_stage_change(
        &self,
        notification: &StageNotification,
    ) -> Result<(), NotifyError>;
}

/// Notifier that drops every notification
pub struct NoNotifier;

#[async_trait]
impl StageNotifier for NoNotifier {
    async fn notify_stage_change(
        &self,
        _notification: &StageNotification,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
