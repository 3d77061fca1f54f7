//! Feedback command: improvement suggestions grouped by priority.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use scorecraft_core::{Config, FeedbackCategory, FeedbackItem, feedback};

use super::InputArgs;

/// Arguments for the `feedback` subcommand.
#[derive(Args, Debug)]
pub struct FeedbackArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct FeedbackOutput<'a> {
    file: &'a str,
    feedback: Vec<FeedbackItem>,
}

/// Print feedback for a file.
#[instrument(name = "cmd_feedback", skip_all, fields(file = %args.input.file))]
pub fn cmd_feedback(
    args: FeedbackArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    let keywords = args.input.resolve_keywords(&config.keywords);

    let items = feedback::scoring_feedback(&content, &keywords);
    debug!(count = items.len(), "feedback generated");

    if global_json {
        let output = FeedbackOutput {
            file: args.input.file.as_str(),
            feedback: items,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", args.input.file.bold());
    if items.is_empty() {
        println!("  {}", "No feedback. Add content and keywords to get suggestions.".dimmed());
        return Ok(());
    }
    print_grouped(&items);

    Ok(())
}

/// Print items under a heading per non-empty category.
pub(crate) fn print_grouped(items: &[FeedbackItem]) {
    for category in FeedbackCategory::ALL {
        let group = feedback::in_category(items, category);
        if group.is_empty() {
            continue;
        }
        let heading = match category {
            FeedbackCategory::Critical => "Critical".red().bold().to_string(),
            FeedbackCategory::Important => "Important".yellow().bold().to_string(),
            FeedbackCategory::Suggestion => "Suggestions".cyan().bold().to_string(),
        };
        println!("  {heading}");
        for item in group {
            println!("    - {}", item.message);
        }
    }
}
