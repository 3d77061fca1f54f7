//! Keywords command: per-keyword density table.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use scorecraft_core::{Config, KeywordAnalysis, KeywordStatus, keywords};

use super::InputArgs;

/// Arguments for the `keywords` subcommand.
#[derive(Args, Debug)]
pub struct KeywordsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct KeywordsOutput<'a> {
    file: &'a str,
    keywords: Vec<KeywordAnalysis>,
}

/// Print keyword density analysis for a file.
#[instrument(name = "cmd_keywords", skip_all, fields(file = %args.input.file))]
pub fn cmd_keywords(
    args: KeywordsArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let content = args.input.read(max_input_bytes)?;
    let targets = args.input.resolve_keywords(&config.keywords);

    let rows = keywords::analyze_keywords(&content, &targets);
    debug!(rows = rows.len(), "keywords analyzed");

    if global_json {
        let output = KeywordsOutput {
            file: args.input.file.as_str(),
            keywords: rows,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", args.input.file.bold());
    print_table(&rows);
    Ok(())
}

/// Print one line per keyword: status, count, density, suggestion.
pub(crate) fn print_table(rows: &[KeywordAnalysis]) {
    if rows.is_empty() {
        println!("  {}", "No keywords to analyze.".dimmed());
        return;
    }
    for row in rows {
        // Pad before coloring so escape codes don't skew the columns.
        let label = format!("{:<8}", row.status.as_str());
        let status = match row.status {
            KeywordStatus::Good => label.green().to_string(),
            KeywordStatus::Low => label.yellow().to_string(),
            KeywordStatus::High | KeywordStatus::Missing => label.red().to_string(),
        };
        println!(
            "  {:<24} {} {:>4}x {:>5.2}%  {}",
            row.keyword,
            status,
            row.count,
            row.density * 100.0,
            row.suggestion.dimmed()
        );
    }
}
