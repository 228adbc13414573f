//! Shared utilities for use cases.
//!
//! Announcing a persisted stage change is the same for the reconciler and
//! for manual keep/withdraw actions: notify participants, then audit.

use crate::ports::audit_log::{AuditEvent, AuditEventType, AuditLogger};
use crate::ports::decision_repository::DecisionSnapshot;
use crate::ports::stage_notifier::{StageNotification, StageNotifier};
use agora_domain::{ParticipantId, StageTransition};
use serde_json::json;
use tracing::warn;

/// Notify participants of a stage change that is already stored, then audit it.
///
/// Notification failures are logged and swallowed.
pub(crate) async fn announce_transition(
    notifier: &dyn StageNotifier,
    audit: &dyn AuditLogger,
    snapshot: &DecisionSnapshot,
    transition: &StageTransition,
    event_type: AuditEventType,
    actor: Option<&ParticipantId>,
) {
    let decision = &snapshot.decision;
    let notification = StageNotification {
        decision_id: decision.id.clone(),
        title: decision.title.clone(),
        recipients: snapshot.participants.clone(),
        transition: transition.clone(),
    };

    if let Err(e) = notifier.notify_stage_change(&notification).await {
        warn!(
            "Stage change of decision {} stored but not announced: {}",
            decision.id, e
        );
    }

    audit.log(AuditEvent::new(
        event_type,
        decision.id.clone(),
        json!({
            "from": transition.from,
            "to": transition.to,
            "cause": transition.cause,
            "deadline": transition.deadline,
            "actor": actor,
        }),
    ));
}
