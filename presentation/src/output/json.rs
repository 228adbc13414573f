//! JSON output, one pretty-printed document per command

use super::formatter::OutputFormatter;
use agora_application::ReconcileReport;
use agora_domain::{
    Decision, DecisionId, DecisionResult, Resolution, StageSchedule, StageTransition,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

pub struct JsonFormatter;

impl JsonFormatter {
    fn render(value: &impl Serialize) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn resolution(&self, resolution: &Resolution) -> String {
        Self::render(resolution)
    }

    fn schedule(&self, schedule: &StageSchedule, now: DateTime<Utc>) -> String {
        Self::render(&json!({
            "now": now,
            "stage": schedule.stage,
            "deadline": schedule.deadline(),
            "stage_windows": schedule.stage_windows.values().collect::<Vec<_>>(),
        }))
    }

    fn decisions(&self, decisions: &[Decision], now: DateTime<Utc>) -> String {
        let rows: Vec<_> = decisions
            .iter()
            .map(|d| {
                json!({
                    "id": d.id,
                    "title": d.title,
                    "method": d.method,
                    "status": d.status,
                    "result": d.result,
                    "stage": d.current_stage(),
                    "effective_stage": d
                        .consent
                        .as_ref()
                        .and_then(|c| c.effective_stage(now).ok()),
                })
            })
            .collect();
        Self::render(&rows)
    }

    fn reconcile_report(&self, report: &ReconcileReport) -> String {
        Self::render(report)
    }

    fn transition(&self, id: &DecisionId, transition: &StageTransition) -> String {
        Self::render(&json!({
            "decision_id": id,
            "transition": transition,
        }))
    }

    fn final_decision(&self, id: &DecisionId, result: DecisionResult) -> String {
        Self::render(&json!({
            "decision_id": id,
            "result": result,
        }))
    }
}
