//! Application layer for agora
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SchedulerConfig;
pub use ports::{
    audit_log::{AuditEvent, AuditEventType, AuditLogger, NoAuditLog},
    clock::{Clock, FixedClock},
    decision_repository::{DecisionRepository, DecisionSnapshot, RepositoryError, WriteGuard},
    stage_notifier::{NoNotifier, NotifyError, StageNotification, StageNotifier},
};
pub use use_cases::close_decision::{CloseDecisionError, CloseDecisionUseCase};
pub use use_cases::final_decision::{FinalDecisionError, FinalDecisionUseCase};
pub use use_cases::reconcile_stages::{
    ReconcileError, ReconcileFailure, ReconcileReport, ReconcileStagesUseCase, ReconciledStage,
};
pub use use_cases::scheduler::StageScheduler;
pub use use_cases::stage_action::{StageAction, StageActionError, StageActionUseCase};
