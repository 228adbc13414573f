//! Notifier that reports stage changes through `tracing`.
//!
//! Stands in for a mail or chat gateway: each recipient gets one `info`
//! event carrying the new stage and its deadline.

use agora_application::ports::stage_notifier::{NotifyError, StageNotification, StageNotifier};
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

/// One line per recipient, as it would appear in a message body
pub fn render_message(notification: &StageNotification) -> String {
    let transition = &notification.transition;
    let deadline = transition
        .deadline
        .map(|d| format!(" until {}", d.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    format!(
        "\"{}\" moved to {}{}",
        notification.title,
        transition.to.label(),
        deadline
    )
}

#[async_trait]
impl StageNotifier for TracingNotifier {
    async fn notify_stage_change(
        &self,
        notification: &StageNotification,
    ) -> Result<(), NotifyError> {
        let message = render_message(notification);
        for recipient in &notification.recipients {
            info!(
                decision = %notification.decision_id,
                recipient = %recipient,
                "{}",
                message
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_domain::{ConsentStage, DecisionId, ParticipantId, StageTransition, TransitionCause};
    use chrono::{TimeZone, Utc};

    fn notification(deadline: Option<chrono::DateTime<Utc>>) -> StageNotification {
        StageNotification {
            decision_id: DecisionId::new("c1"),
            title: "Office move".to_string(),
            recipients: vec![ParticipantId::new("ben")],
            transition: StageTransition {
                from: ConsentStage::Amendements,
                to: ConsentStage::Objections,
                cause: TransitionCause::ProposalKept,
                deadline,
            },
        }
    }

    #[test]
    fn test_message_includes_deadline() {
        let deadline = Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap();
        let message = render_message(&notification(Some(deadline)));
        assert!(message.contains("Office move"));
        assert!(message.ends_with("until 2025-01-05 00:00 UTC"));
    }

    #[tokio::test]
    async fn test_never_fails() {
        let notifier = TracingNotifier::new();
        assert!(notifier.notify_stage_change(&notification(None)).await.is_ok());
    }
}
