//! Presentation layer for agora
//!
//! This crate contains CLI definitions, vote file parsing and output
//! formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, FinalResultArg, FormatArg, StepModeArg};
pub use cli::input::VoteFile;
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, formatter_for};
pub use output::json::JsonFormatter;
