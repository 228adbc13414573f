//! Console output formatter

use super::formatter::OutputFormatter;
use agora_application::ReconcileReport;
use agora_domain::{
    BallotTally, ConsentStage, Decision, DecisionId, DecisionResult, DecisionStatus,
    ProposalRanking, Resolution, StageSchedule, StageTransition,
};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

/// Turn colored output off for the rest of the process
pub fn set_color(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn result(result: DecisionResult) -> ColoredString {
        match result {
            DecisionResult::Approved => result.as_str().green().bold(),
            DecisionResult::Rejected => result.as_str().red().bold(),
            DecisionResult::Blocked => result.as_str().red().bold().underline(),
            DecisionResult::Withdrawn => result.as_str().dimmed(),
        }
    }

    fn stage(stage: ConsentStage) -> ColoredString {
        if stage.is_terminal() {
            stage.as_str().dimmed()
        } else {
            stage.as_str().yellow()
        }
    }

    fn time(at: DateTime<Utc>) -> String {
        at.format("%Y-%m-%d %H:%M").to_string()
    }

    fn tally(tally: &BallotTally) -> String {
        format!(
            "{} {} ballot(s) {}\n  support {} · oppose {} · neutral {} · block {}\n  strong support {} · strong oppose {} · weighted sum {:+.1}\n",
            "Ballots:".cyan().bold(),
            tally.total,
            tally.summary,
            tally.support,
            tally.oppose,
            tally.neutral,
            tally.block,
            tally.strong_support,
            tally.strong_oppose,
            tally.weighted_sum
        )
    }

    fn ranking(ranking: &[ProposalRanking]) -> String {
        let mut output = Self::section_header("Ranking (majority judgment)");
        for entry in ranking {
            let mention = entry
                .majority_mention
                .map_or_else(|| "no mention".dimmed(), |m| m.as_str().bold());
            let counts = entry
                .distribution
                .counts
                .iter()
                .map(|(m, c)| format!("{} {}", m, c))
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!(
                "{:>3}. {:<16} {}\n     {}\n",
                entry.rank,
                entry.proposal.as_str(),
                mention,
                counts.dimmed()
            ));
        }
        output
    }

    fn status(decision: &Decision) -> String {
        match (decision.status, decision.result) {
            (DecisionStatus::Closed, Some(result)) => Self::result(result).to_string(),
            (status, _) => status.as_str().to_string(),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn resolution(&self, resolution: &Resolution) -> String {
        let mut output = Self::header("Resolution");
        output.push_str(&format!(
            "\n{} {}\n{} {}\n\n",
            "Method:".cyan().bold(),
            resolution.method,
            "Result:".cyan().bold(),
            Self::result(resolution.result)
        ));
        if let Some(tally) = &resolution.tally {
            output.push_str(&Self::tally(tally));
        }
        if !resolution.ranking.is_empty() {
            output.push_str(&Self::ranking(&resolution.ranking));
        }
        output
    }

    fn schedule(&self, schedule: &StageSchedule, now: DateTime<Utc>) -> String {
        let mut output = format!(
            "{} {} at {}\n",
            "Stage:".cyan().bold(),
            Self::stage(schedule.stage),
            Self::time(now)
        );
        if let Some(deadline) = schedule.deadline() {
            output.push_str(&format!("{} {}\n", "Until:".cyan().bold(), Self::time(deadline)));
        }

        output.push_str(&Self::section_header("Stage windows"));
        for window in schedule.stage_windows.values() {
            let marker = if window.stage == schedule.stage { "▶" } else { " " };
            output.push_str(&format!(
                "{} {:<15} {} → {}\n",
                marker,
                window.stage.as_str(),
                Self::time(window.start),
                Self::time(window.end)
            ));
        }
        output
    }

    fn decisions(&self, decisions: &[Decision], now: DateTime<Utc>) -> String {
        if decisions.is_empty() {
            return format!("{}\n", "No decisions stored.".dimmed());
        }

        let mut output = String::new();
        for decision in decisions {
            let stage = match &decision.consent {
                Some(consent) => {
                    let stored = consent.current_stage;
                    match consent.effective_stage(now) {
                        Ok(effective) if effective != stored => {
                            format!("{} (due: {})", Self::stage(stored), Self::stage(effective))
                        }
                        Ok(_) => Self::stage(stored).to_string(),
                        Err(e) => format!("{}", e.to_string().red()),
                    }
                }
                None => String::new(),
            };
            output.push_str(&format!(
                "{:<20} {:<20} {:<10} {}  {}\n",
                decision.id.as_str().bold(),
                decision.method.as_str(),
                Self::status(decision),
                stage,
                decision.title.dimmed()
            ));
        }
        output
    }

    fn reconcile_report(&self, report: &ReconcileReport) -> String {
        let mut output = format!(
            "{} {} examined, {} moved, {} unchanged\n",
            "Reconciled:".cyan().bold(),
            report.examined,
            report.transitions.len(),
            report.unchanged
        );
        for moved in &report.transitions {
            output.push_str(&format!(
                "  {} {} → {}\n",
                moved.decision_id.as_str().bold(),
                Self::stage(moved.transition.from),
                Self::stage(moved.transition.to)
            ));
        }
        for (id, result) in &report.closed {
            output.push_str(&format!(
                "  {} closed as {}\n",
                id.as_str().bold(),
                Self::result(*result)
            ));
        }
        for id in &report.conflicts {
            output.push_str(&format!(
                "  {} {}\n",
                id.as_str().bold(),
                "changed concurrently, skipped".yellow()
            ));
        }
        for failure in &report.failures {
            output.push_str(&format!(
                "  {} {}\n",
                failure.decision_id.as_str().bold(),
                failure.reason.red()
            ));
        }
        output
    }

    fn transition(&self, id: &DecisionId, transition: &StageTransition) -> String {
        let mut output = format!(
            "{} {} → {}\n",
            id.as_str().bold(),
            Self::stage(transition.from),
            Self::stage(transition.to)
        );
        match transition.deadline {
            Some(deadline) => {
                output.push_str(&format!("{} {}\n", "Until:".cyan().bold(), Self::time(deadline)))
            }
            None if transition.is_terminal() => output.push_str(&format!(
                "{} {}\n",
                "Result:".cyan().bold(),
                Self::result(DecisionResult::Withdrawn)
            )),
            None => {}
        }
        output
    }

    fn final_decision(&self, id: &DecisionId, result: DecisionResult) -> String {
        format!("{} decided: {}\n", id.as_str().bold(), Self::result(result))
    }
}
