//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use scorecraft_core::{KeywordList, ScoreBand};

pub mod compare;
pub mod feedback;
pub mod info;
pub mod keywords;
pub mod report;
pub mod score;
#[cfg(feature = "mcp")]
pub mod serve;

/// The file and keywords every scoring command takes.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// File to score.
    pub file: Utf8PathBuf,

    /// Target keywords, comma-separated (defaults to config `keywords`).
    #[arg(short, long, value_name = "LIST")]
    pub keywords: Option<String>,
}

impl InputArgs {
    /// Keywords from the flag, or from config when the flag is absent.
    pub fn resolve_keywords(&self, configured: &KeywordList) -> KeywordList {
        let keywords = self
            .keywords
            .as_deref()
            .map_or_else(|| configured.clone(), KeywordList::parse);
        if keywords.is_empty() {
            tracing::warn!(file = %self.file, "no keywords given; the score will be 0");
        }
        keywords
    }

    /// Read the file, enforcing the size limit.
    pub fn read(&self, max_bytes: Option<usize>) -> anyhow::Result<String> {
        read_input_file(&self.file, max_bytes)
    }
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Render a score in its band color.
pub(crate) fn colored_score(score: u8) -> String {
    let text = score.to_string();
    match ScoreBand::from_score(score) {
        ScoreBand::Excellent | ScoreBand::Good => text.green().to_string(),
        ScoreBand::Fair => text.yellow().to_string(),
        ScoreBand::Poor => text.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn input(keywords: Option<&str>) -> InputArgs {
        InputArgs {
            file: Utf8PathBuf::from("draft.md"),
            keywords: keywords.map(str::to_string),
        }
    }

    #[test]
    fn flag_keywords_win_over_config() {
        let configured = KeywordList::parse("config");
        let keywords = input(Some("seo, rust")).resolve_keywords(&configured);
        assert_eq!(keywords.as_slice(), ["seo", "rust"]);
    }

    #[test]
    fn config_keywords_are_the_fallback() {
        let configured = KeywordList::parse("config");
        assert_eq!(input(None).resolve_keywords(&configured), configured);
    }

    #[test]
    fn oversized_input_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("big.md")).unwrap();
        fs::write(&path, "x".repeat(64)).unwrap();

        let err = read_input_file(&path, Some(16)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
        assert_eq!(read_input_file(&path, None).unwrap().len(), 64);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input_file(Utf8Path::new("/nonexistent/draft.md"), None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/draft.md"));
    }
}
