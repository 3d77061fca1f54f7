//! Metric extraction over raw content text.
//!
//! Every extractor is a pure function over its input. Empty text yields
//! zero-valued metrics, never an error, so downstream ratios must guard
//! against a zero word count themselves (see [`density`]).
//!
//! Heading and link detection is pattern counting, not document parsing:
//! a `## ` marker also contains `# `, so it counts toward both H2 and H1.

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, MatchKind};
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::keywords::KeywordList;

/// Paragraphs are separated by two or more consecutive newlines.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("valid regex"));

/// Anchor tag openings or any literal `http`.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a\s|http").expect("valid regex"));

static H1_MARKERS: LazyLock<AhoCorasick> =
    LazyLock::new(|| marker_matcher(&["<h1>", "<H1>", "# "]));

static H2_MARKERS: LazyLock<AhoCorasick> =
    LazyLock::new(|| marker_matcher(&["<h2>", "<H2>", "## "]));

static H3_MARKERS: LazyLock<AhoCorasick> =
    LazyLock::new(|| marker_matcher(&["<h3>", "<H3>", "### "]));

/// A paragraph must have more than this many words to read well.
pub const REASONABLE_PARAGRAPH_MIN_WORDS: usize = 20;

/// A paragraph must have fewer than this many words to read well.
/// Anything above it is reported as too long.
pub const REASONABLE_PARAGRAPH_MAX_WORDS: usize = 150;

fn marker_matcher(patterns: &[&str]) -> AhoCorasick {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .build(patterns)
        .expect("valid marker patterns")
}

/// Heading marker counts by level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadingCounts {
    /// Matches of `<h1>`, `<H1>` or `# `.
    pub h1: usize,
    /// Matches of `<h2>`, `<H2>` or `## `.
    pub h2: usize,
    /// Matches of `<h3>`, `<H3>` or `### `.
    pub h3: usize,
}

/// Paragraph length distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParagraphStats {
    /// Number of paragraph segments, including empty ones.
    pub total: usize,
    /// Paragraphs with strictly between 20 and 150 words.
    pub reasonable: usize,
    /// Paragraphs with more than 150 words.
    pub long: usize,
}

impl ParagraphStats {
    /// Summarize per-paragraph word counts.
    pub fn from_word_counts(counts: &[usize]) -> Self {
        Self {
            total: counts.len(),
            reasonable: counts
                .iter()
                .filter(|&&words| is_reasonable_paragraph(words))
                .count(),
            long: counts
                .iter()
                .filter(|&&words| words > REASONABLE_PARAGRAPH_MAX_WORDS)
                .count(),
        }
    }

    /// Share of paragraphs with a reasonable length, or 0 when there are none.
    pub fn reasonable_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.reasonable as f64 / self.total as f64
        }
    }
}

/// Occurrences of one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeywordCount {
    /// The keyword as given (trimmed).
    pub keyword: String,
    /// Whole-word, case-insensitive occurrences.
    pub count: usize,
}

/// Everything the scorer, feedback generator and keyword analyzer read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Metrics {
    /// Whitespace-delimited tokens.
    pub word_count: usize,
    /// Heading marker counts.
    pub headings: HeadingCounts,
    /// Paragraph length distribution.
    pub paragraphs: ParagraphStats,
    /// Anchor tags plus `http` references.
    pub link_count: usize,
    /// One entry per keyword, in keyword-list order.
    pub keywords: Vec<KeywordCount>,
}

impl Metrics {
    /// Extract all metrics from `text` for the given keywords.
    #[tracing::instrument(skip_all, fields(text_len = text.len(), keyword_count = keywords.len()))]
    pub fn extract(text: &str, keywords: &KeywordList) -> Self {
        let paragraph_words = paragraphs(text);
        let metrics = Self {
            word_count: word_count(text),
            headings: heading_counts(text),
            paragraphs: ParagraphStats::from_word_counts(&paragraph_words),
            link_count: link_count(text),
            keywords: keywords
                .iter()
                .map(|keyword| KeywordCount {
                    keyword: keyword.to_string(),
                    count: keyword_occurrences(text, keyword),
                })
                .collect(),
        };
        tracing::debug!(
            words = metrics.word_count,
            h1 = metrics.headings.h1,
            h2 = metrics.headings.h2,
            h3 = metrics.headings.h3,
            paragraphs = metrics.paragraphs.total,
            links = metrics.link_count,
            "metrics extracted"
        );
        metrics
    }

    /// Keyword density for an occurrence count against this text's word count.
    pub fn density(&self, count: usize) -> f64 {
        density(count, self.word_count)
    }
}

/// Count whitespace-delimited words.
///
/// Leading and trailing whitespace never adds a word, so a file's final
/// newline does not change the count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count whole-word, case-insensitive occurrences of `keyword` in `text`.
///
/// The keyword is matched literally, so phrases like `C++` are safe. A
/// blank keyword, or one whose pattern exceeds the regex size limit, counts
/// zero occurrences.
pub fn keyword_occurrences(text: &str, keyword: &str) -> usize {
    let keyword = keyword.trim();
    if keyword.is_empty() || text.is_empty() {
        return 0;
    }

    let pattern = format!(r"\b{}\b", regex::escape(keyword));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.find_iter(text).count(),
        Err(err) => {
            tracing::warn!(keyword, error = %err, "keyword pattern rejected, counting zero");
            0
        }
    }
}

/// Occurrences per word, or 0 when there are no words.
pub fn density(count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        0.0
    } else {
        count as f64 / word_count as f64
    }
}

/// Count heading markers for each level independently.
pub fn heading_counts(text: &str) -> HeadingCounts {
    HeadingCounts {
        h1: H1_MARKERS.find_iter(text).count(),
        h2: H2_MARKERS.find_iter(text).count(),
        h3: H3_MARKERS.find_iter(text).count(),
    }
}

/// Split text on blank-line boundaries and return each segment's word count.
///
/// Empty segments (for example after a trailing blank line) are kept and
/// count zero words. Empty text has no paragraphs.
pub fn paragraphs(text: &str) -> Vec<usize> {
    if text.is_empty() {
        return Vec::new();
    }
    PARAGRAPH_BREAK.split(text).map(word_count).collect()
}

/// Whether a paragraph of `words` words has a comfortable reading length.
pub const fn is_reasonable_paragraph(words: usize) -> bool {
    words > REASONABLE_PARAGRAPH_MIN_WORDS && words < REASONABLE_PARAGRAPH_MAX_WORDS
}

/// Count anchor tag openings and `http` references.
pub fn link_count(text: &str) -> usize {
    LINK_PATTERN.find_iter(text).count()
}
