//! Target keyword lists and per-keyword density analysis.
//!
//! [`KeywordList`] normalizes user input: entries are trimmed, blank
//! entries are dropped, order and duplicates are kept. Every scoring
//! operation takes a `KeywordList`, so blank keywords never reach them.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::Metrics;

/// Below this density a present keyword is reported as `low`.
pub const LOW_DENSITY: f64 = 0.005;

/// Above this density a keyword is reported as `high`.
pub const HIGH_DENSITY: f64 = 0.03;

/// Ordered, trimmed, non-blank target keywords.
///
/// Deserializes from an array of strings or a single comma-separated string,
/// so config files and `SCORECRAFT_KEYWORDS=seo,marketing` both work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(from = "KeywordInput", into = "Vec<String>")]
pub struct KeywordList(Vec<String>);

#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
enum KeywordInput {
    Joined(String),
    List(Vec<String>),
}

impl From<KeywordInput> for KeywordList {
    fn from(input: KeywordInput) -> Self {
        match input {
            KeywordInput::Joined(joined) => Self::parse(&joined),
            KeywordInput::List(list) => list.into(),
        }
    }
}

impl KeywordList {
    /// Parse a comma-separated keyword string such as `"seo, content marketing"`.
    pub fn parse(input: &str) -> Self {
        input.split(',').collect()
    }

    /// Number of non-blank keywords.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no usable keyword remains.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the keywords in input order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The keywords as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|k| k.as_ref().trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }
}

impl From<Vec<String>> for KeywordList {
    fn from(keywords: Vec<String>) -> Self {
        keywords.into_iter().collect()
    }
}

impl From<KeywordList> for Vec<String> {
    fn from(list: KeywordList) -> Self {
        list.0
    }
}

impl fmt::Display for KeywordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// How well a keyword's density sits in the recommended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeywordStatus {
    /// The keyword does not occur at all.
    Missing,
    /// Present, but under 0.5% density.
    Low,
    /// Between 0.5% and 3% density.
    Good,
    /// Over 3% density.
    High,
}

impl KeywordStatus {
    /// Classify an occurrence count and density.
    pub fn classify(count: usize, density: f64) -> Self {
        if count == 0 {
            Self::Missing
        } else if density < LOW_DENSITY {
            Self::Low
        } else if density > HIGH_DENSITY {
            Self::High
        } else {
            Self::Good
        }
    }

    /// Returns the status as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Low => "low",
            Self::Good => "good",
            Self::High => "high",
        }
    }

    /// Recommendation text for `keyword` at this status.
    pub fn suggestion(&self, keyword: &str) -> String {
        match self {
            Self::Missing => format!("Add \"{keyword}\" to your content at least 1-2 times."),
            Self::Low => {
                format!("Increase usage of \"{keyword}\" slightly for better optimization.")
            }
            Self::High => format!("Reduce frequency of \"{keyword}\" to avoid keyword stuffing."),
            Self::Good => format!("Excellent usage of \"{keyword}\"."),
        }
    }
}

impl fmt::Display for KeywordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Density breakdown for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeywordAnalysis {
    /// The keyword, trimmed.
    pub keyword: String,
    /// Whole-word, case-insensitive occurrences.
    pub count: usize,
    /// Occurrences divided by word count (0 when there are no words).
    pub density: f64,
    /// Density classification.
    pub status: KeywordStatus,
    /// What to do about it.
    pub suggestion: String,
}

/// Analyze every keyword against `text`, one row per keyword in input order.
///
/// Duplicated keywords produce duplicated rows. Empty text yields no rows.
#[tracing::instrument(skip_all, fields(text_len = text.len(), keyword_count = keywords.len()))]
pub fn analyze_keywords(text: &str, keywords: &KeywordList) -> Vec<KeywordAnalysis> {
    if text.is_empty() || keywords.is_empty() {
        return Vec::new();
    }
    analyze_metrics(&Metrics::extract(text, keywords))
}

/// Keyword analysis over already-extracted metrics.
pub fn analyze_metrics(metrics: &Metrics) -> Vec<KeywordAnalysis> {
    metrics
        .keywords
        .iter()
        .map(|kc| {
            let density = metrics.density(kc.count);
            let status = KeywordStatus::classify(kc.count, density);
            KeywordAnalysis {
                keyword: kc.keyword.clone(),
                count: kc.count,
                density,
                status,
                suggestion: status.suggestion(&kc.keyword),
            }
        })
        .collect()
}
