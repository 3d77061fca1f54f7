//! Compare command: deterministic score of content and its optimized rewrite.
//!
//! The rewrite comes from the external content assistant as a saved JSON
//! response (`{"optimizedContent": ..., "score": ..., "feedback": [...]}`).

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use scorecraft_core::collaborator;
use scorecraft_core::Config;

use super::{InputArgs, colored_score, read_input_file};

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Saved optimization response from the content assistant (JSON).
    #[arg(short, long, value_name = "FILE")]
    pub response: Utf8PathBuf,
}

/// Score the original and the optimized content side by side.
#[instrument(name = "cmd_compare", skip_all, fields(file = %args.input.file, response = %args.response))]
pub fn cmd_compare(
    args: CompareArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let original = args.input.read(max_input_bytes)?;
    let keywords = args.input.resolve_keywords(&config.keywords);
    let raw = read_input_file(&args.response, max_input_bytes)?;

    let response = collaborator::parse_optimization(&raw)
        .with_context(|| format!("invalid optimization response in {}", args.response))?;
    let comparison = collaborator::compare_optimization(&original, &keywords, &response);
    debug!(delta = comparison.delta, "comparison complete");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    let delta = match comparison.delta {
        d if d > 0 => format!("+{d}").green().to_string(),
        d if d < 0 => d.to_string().red().to_string(),
        d => d.to_string(),
    };
    println!(
        "{}: {} -> {} ({delta})",
        args.input.file.bold(),
        colored_score(comparison.original_score),
        colored_score(comparison.optimized_score),
    );
    match comparison.assistant_score {
        Some(score) => println!("{}: {score}", "Assistant score".dimmed()),
        None => println!("{}: {}", "Assistant score".dimmed(), "(not given)".dimmed()),
    }
    if !comparison.assistant_feedback.is_empty() {
        println!();
        println!("{}", "Assistant feedback".bold().underline());
        for line in &comparison.assistant_feedback {
            println!("  - {line}");
        }
    }
    if !comparison.optimized_feedback.is_empty() {
        println!();
        println!("{}", "Feedback on the rewrite".bold().underline());
        super::feedback::print_grouped(&comparison.optimized_feedback);
    }

    Ok(())
}
