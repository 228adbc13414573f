//! Port for the decision audit log.
//!
//! Defines the [`AuditLogger`] trait for recording decision lifecycle events
//! (closure, final decisions, stage changes) to a durable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the events
//! the host must keep a record of.

use agora_domain::DecisionId;
use serde_json::Value;

/// Kinds of audited events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventType {
    Closed,
    FinalDecisionMade,
    StageChanged,
    ProposalKept,
    ProposalWithdrawn,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::Closed => "CLOSED",
            AuditEventType::FinalDecisionMade => "FINAL_DECISION_MADE",
            AuditEventType::StageChanged => "STAGE_CHANGED",
            AuditEventType::ProposalKept => "PROPOSAL_KEPT",
            AuditEventType::ProposalWithdrawn => "PROPOSAL_WITHDRAWN",
        }
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured audit event.
///
/// The payload carries event-specific fields (result, stages, actor, ...).
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: AuditEventType,
    pub decision_id: DecisionId,
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: AuditEventType, decision_id: DecisionId, payload: Value) -> Self {
        Self {
            event_type,
            decision_id,
            payload,
        }
    }
}

/// Port for recording audit events.
///
/// The `log` method is synchronous and non-fallible so that a logging
/// failure never undoes a decision that was already written.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl AuditLogger for NoAuditLog {
    fn log(&self, _event: AuditEvent) {}
}
