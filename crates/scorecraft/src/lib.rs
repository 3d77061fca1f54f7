//! Library interface for the `scorecraft` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//! - `server` - MCP tools over the same core functions (feature `mcp`)

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                 Log filter (e.g., debug, scorecraft=trace)
    SCORECRAFT_LOG_PATH      Explicit JSONL log file path
    SCORECRAFT_LOG_DIR       JSONL log directory
    SCORECRAFT_KEYWORDS      Default keywords (comma-separated)
    SCORECRAFT_MIN_SCORE     Default minimum score (0-100)
";
/// Command-line interface definition for scorecraft.
#[derive(Parser)]
#[command(name = "scorecraft")]
#[command(about = "Deterministic content quality scoring for marketing copy", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Score content 0-100 with a four-part breakdown
    Score(commands::score::ScoreArgs),

    /// List improvement suggestions grouped by priority
    Feedback(commands::feedback::FeedbackArgs),

    /// Analyze keyword density
    Keywords(commands::keywords::KeywordsArgs),

    /// Full report: score, breakdown, feedback and keyword analysis
    Report(commands::report::ReportArgs),

    /// Compare content with an assistant's optimized rewrite
    Compare(commands::compare::CompareArgs),

    /// Show package information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        command().debug_assert();
    }

    #[test]
    fn parses_score_with_keywords() {
        let cli = Cli::try_parse_from([
            "scorecraft",
            "--json",
            "score",
            "draft.md",
            "--keywords",
            "seo, rust",
            "--min-score",
            "70",
        ])
        .unwrap();
        assert!(cli.json);
        let Some(Commands::Score(args)) = cli.command else {
            panic!("expected score subcommand");
        };
        assert_eq!(args.input.file.as_str(), "draft.md");
        assert_eq!(args.min_score, Some(70));
    }

    #[test]
    fn min_score_above_100_is_rejected() {
        let result = Cli::try_parse_from(["scorecraft", "score", "a.md", "--min-score", "101"]);
        assert!(result.is_err());
    }
}
