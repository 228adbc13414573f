//! Output formatter trait

use super::console::ConsoleFormatter;
use super::json::JsonFormatter;
use agora_application::ReconcileReport;
use agora_domain::{
    Decision, DecisionId, DecisionResult, OutputFormat, Resolution, StageSchedule,
    StageTransition,
};
use chrono::{DateTime, Utc};

/// Renders every command result in one output style
pub trait OutputFormatter {
    /// Result of `resolve` or `close`
    fn resolution(&self, resolution: &Resolution) -> String;

    /// Stage of a consent window at `now`, with all sub-windows
    fn schedule(&self, schedule: &StageSchedule, now: DateTime<Utc>) -> String;

    /// Listing of stored decisions
    fn decisions(&self, decisions: &[Decision], now: DateTime<Utc>) -> String;

    /// Summary of one reconciliation pass
    fn reconcile_report(&self, report: &ReconcileReport) -> String;

    /// A manual stage change
    fn transition(&self, id: &DecisionId, transition: &StageTransition) -> String;

    /// A recorded final decision
    fn final_decision(&self, id: &DecisionId, result: DecisionResult) -> String;
}

/// Formatter for the configured output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
