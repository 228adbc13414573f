//! CLI command definitions

use agora_domain::{DecisionResult, OutputFormat, StepMode};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable output
    Text,
    /// JSON output
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Consent step mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StepModeArg {
    /// CLARIFICATIONS, AVIS, AMENDEMENTS, OBJECTIONS
    Distinct,
    /// CLARIFAVIS, AMENDEMENTS, OBJECTIONS
    Merged,
}

impl From<StepModeArg> for StepMode {
    fn from(arg: StepModeArg) -> Self {
        match arg {
            StepModeArg::Distinct => StepMode::Distinct,
            StepModeArg::Merged => StepMode::Merged,
        }
    }
}

/// Outcome an advice solicitation can be given by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FinalResultArg {
    Approved,
    Rejected,
}

impl From<FinalResultArg> for DecisionResult {
    fn from(arg: FinalResultArg) -> Self {
        match arg {
            FinalResultArg::Approved => DecisionResult::Approved,
            FinalResultArg::Rejected => DecisionResult::Rejected,
        }
    }
}

/// CLI arguments for agora
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about = "Decision resolution and staged consent engine")]
#[command(long_about = r#"
agora resolves collaborative decisions and drives the staged consent workflow.

Decisions are read from a JSON store file. A CONSENT decision moves through
timed stages (CLARIFICATIONS, AVIS, AMENDEMENTS, OBJECTIONS) until its window
ends; `agora reconcile --watch` keeps the stored stages in step with the clock.

Configuration files are loaded from (in priority order):
1. AGORA_* environment variables (AGORA_SCHEDULER__INTERVAL_MINUTES=5)
2. --config <path>     Explicit config file
3. ./agora.toml        Project-level config
4. ~/.config/agora/config.toml   Global config

Example:
  agora resolve MAJORITY votes.json
  agora stage --start 2025-01-01T00:00:00Z --end 2025-01-05T00:00:00Z --mode merged
  agora keep office-move --as ana
  agora reconcile --watch
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Decision store file (overrides [store] path)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Evaluate as if the current time were this RFC 3339 instant
    #[arg(long, global = true, value_name = "TIME")]
    pub now: Option<DateTime<Utc>>,

    /// Output format (overrides [output] format)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<FormatArg>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List stored decisions
    List,

    /// Resolve a vote file without touching the store
    Resolve {
        /// Decision method, e.g. MAJORITY or weighted-vote
        method: String,
        /// JSON file with ballots, objections, proposals and mentions
        votes: PathBuf,
    },

    /// Show the stage of a consent window and its sub-windows
    Stage {
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long, value_enum, default_value = "distinct")]
        mode: StepModeArg,
    },

    /// Freeze, resolve and close a stored decision
    Close {
        /// Decision id
        id: String,
    },

    /// Bring stored consent stages up to date with the clock
    Reconcile {
        /// Keep running, once per configured interval, until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Keep the proposal unchanged and skip to OBJECTIONS
    Keep {
        /// Decision id
        id: String,
        /// Participant performing the action
        #[arg(long = "as", value_name = "PARTICIPANT")]
        actor: String,
    },

    /// Withdraw the proposal, closing the decision as WITHDRAWN
    Withdraw {
        /// Decision id
        id: String,
        /// Participant performing the action
        #[arg(long = "as", value_name = "PARTICIPANT")]
        actor: String,
    },

    /// Record the final decision of an advice solicitation
    Finalize {
        /// Decision id
        id: String,
        /// Participant performing the action
        #[arg(long = "as", value_name = "PARTICIPANT")]
        actor: String,
        #[arg(long, value_enum)]
        result: FinalResultArg,
    },
}
