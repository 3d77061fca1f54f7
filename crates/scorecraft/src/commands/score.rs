//! Score command: overall score, band and breakdown.

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use scorecraft_core::{Config, ScoreBand, ScoreBreakdown, score};

use super::{InputArgs, colored_score};

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fail when the score is below this value.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: Option<u8>,
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    file: &'a str,
    score: u8,
    band: ScoreBand,
    breakdown: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_score: Option<u8>,
    below_min: bool,
}

/// Score a file against its target keywords.
#[instrument(name = "cmd_score", skip_all, fields(file = %args.input.file))]
pub fn cmd_score(
    args: ScoreArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(min_score = ?args.min_score, "executing score command");

    let content = args.input.read(max_input_bytes)?;
    let keywords = args.input.resolve_keywords(&config.keywords);
    let min_score = args.min_score.or(config.min_score);

    let overall = score::score_content(&content, &keywords);
    let breakdown = score::score_breakdown(&content, &keywords, overall);
    let below_min = min_score.is_some_and(|min| overall < min);

    if global_json {
        let output = ScoreOutput {
            file: args.input.file.as_str(),
            score: overall,
            band: ScoreBand::from_score(overall),
            breakdown,
            min_score,
            below_min,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}/100 ({})",
        args.input.file.bold(),
        colored_score(overall),
        ScoreBand::from_score(overall)
    );
    print_breakdown(&breakdown);

    if let Some(min) = min_score {
        if below_min {
            bail!(
                "{} scores {overall} (min: {min}). Run `scorecraft feedback {}` for suggestions.",
                args.input.file,
                args.input.file,
            );
        }
        println!("{} {} meets the minimum of {min}", "PASS:".green(), args.input.file);
    }

    Ok(())
}

/// Print the four breakdown rows, aligned.
pub(crate) fn print_breakdown(breakdown: &ScoreBreakdown) {
    for part in breakdown.parts() {
        let label = format!("{:<40}", part.description);
        println!("  {} {:>2}/{}", label.dimmed(), part.score, part.max);
    }
}
