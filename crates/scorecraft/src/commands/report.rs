//! Report command: score, breakdown, feedback and keyword analysis together.

use anyhow::bail;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use scorecraft_core::{Config, evaluate};

use super::feedback::print_grouped;
use super::keywords::print_table;
use super::score::print_breakdown;
use super::{InputArgs, colored_score};

/// Arguments for the `report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fail when the score is below this value.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: Option<u8>,
}

/// Print the full content report for a file.
#[instrument(name = "cmd_report", skip_all, fields(file = %args.input.file))]
pub fn cmd_report(
    args: ReportArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    let keywords = args.input.resolve_keywords(&config.keywords);
    let min_score = args.min_score.or(config.min_score);

    let report = evaluate(&content, &keywords, min_score);
    debug!(score = report.score, words = report.metrics.word_count, "report built");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}/100 ({})",
        args.input.file.bold(),
        colored_score(report.score),
        report.band
    );
    let m = &report.metrics;
    println!(
        "  {}",
        format!(
            "{} words, {} paragraphs, H1/H2/H3 {}/{}/{}, {} links",
            m.word_count, m.paragraphs.total, m.headings.h1, m.headings.h2, m.headings.h3, m.link_count
        )
        .dimmed()
    );

    println!();
    println!("{}", "Breakdown".bold().underline());
    print_breakdown(&report.breakdown);

    println!();
    println!("{}", "Feedback".bold().underline());
    print_grouped(&report.feedback);

    println!();
    println!("{}", "Keywords".bold().underline());
    print_table(&report.keywords);

    if let Some(min) = report.min_score
        && report.below_min
    {
        bail!("{} scores {} (min: {min})", args.input.file, report.score);
    }

    Ok(())
}
