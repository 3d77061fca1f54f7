//! Combined scoring report.
//!
//! [`evaluate`] extracts metrics once and feeds the scorer, breakdown,
//! feedback generator and keyword analyzer from them. This is what an
//! editing surface recomputes whenever the content or keywords change.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::feedback::{self, FeedbackCategory, FeedbackItem};
use crate::keywords::{self, KeywordAnalysis, KeywordList};
use crate::metrics::Metrics;
use crate::score::{self, ScoreBand, ScoreBreakdown};

/// Everything the scorer knows about one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentReport {
    /// Overall score, 0–100.
    pub score: u8,
    /// Display band for the score.
    pub band: ScoreBand,
    /// Four-part breakdown rescaled to the overall score.
    pub breakdown: ScoreBreakdown,
    /// Categorized improvement suggestions.
    pub feedback: Vec<FeedbackItem>,
    /// Per-keyword density rows, in keyword order.
    pub keywords: Vec<KeywordAnalysis>,
    /// Raw metrics the report was computed from.
    pub metrics: Metrics,
    /// Minimum acceptable score, if a gate was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u8>,
    /// Whether the score is below `min_score`.
    pub below_min: bool,
}

impl ContentReport {
    /// Feedback items in one category.
    pub fn feedback_in(&self, category: FeedbackCategory) -> Vec<&FeedbackItem> {
        feedback::in_category(&self.feedback, category)
    }
}

/// Score, break down, critique and analyze `text` against `keywords`.
///
/// Degenerate input (empty text or no keywords) yields a zero score and
/// empty feedback and keyword rows; it is never an error.
#[tracing::instrument(skip(text, keywords), fields(text_len = text.len(), keyword_count = keywords.len()))]
pub fn evaluate(text: &str, keywords: &KeywordList, min_score: Option<u8>) -> ContentReport {
    let metrics = if text.is_empty() || keywords.is_empty() {
        Metrics::default()
    } else {
        Metrics::extract(text, keywords)
    };

    let score = score::score_metrics(&metrics);
    let breakdown = score::breakdown_metrics(&metrics, score);
    let feedback = feedback::feedback_for_metrics(&metrics);
    let keyword_rows = if text.is_empty() {
        Vec::new()
    } else {
        keywords::analyze_metrics(&metrics)
    };
    let below_min = min_score.is_some_and(|min| score < min);

    tracing::info!(score, below_min, "content evaluated");

    ContentReport {
        score,
        band: ScoreBand::from_score(score),
        breakdown,
        feedback,
        keywords: keyword_rows,
        metrics,
        min_score,
        below_min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordStatus;

    fn article() -> String {
        let body = vec!["lorem ipsum dolor sit amet seo"; 8].join(" ");
        let mut parts = vec!["# Content Marketing Basics".to_string()];
        for _ in 0..4 {
            parts.push(body.clone());
        }
        parts.join("\n\n")
    }

    #[test]
    fn report_matches_individual_operations() {
        let text = article();
        let keywords = KeywordList::parse("seo, rust");
        let report = evaluate(&text, &keywords, None);

        let score = score::score_content(&text, &keywords);
        assert_eq!(report.score, score);
        assert_eq!(report.band, ScoreBand::from_score(score));
        assert_eq!(report.breakdown, score::score_breakdown(&text, &keywords, score));
        assert_eq!(report.feedback, feedback::scoring_feedback(&text, &keywords));
        assert_eq!(report.keywords, keywords::analyze_keywords(&text, &keywords));
        assert!(!report.below_min);
    }

    #[test]
    fn min_score_gate() {
        let keywords = KeywordList::parse("seo");
        let report = evaluate(&article(), &keywords, Some(100));
        assert!(report.below_min);
        let report = evaluate(&article(), &keywords, Some(0));
        assert!(!report.below_min);
    }

    #[test]
    fn degenerate_report_is_empty() {
        let report = evaluate("", &KeywordList::parse("seo"), None);
        assert_eq!(report.score, 0);
        assert_eq!(report.band, ScoreBand::Poor);
        assert!(report.feedback.is_empty());
        assert!(report.keywords.is_empty());
        assert_eq!(report.breakdown.total(), 0);

        let report = evaluate("plenty of words here", &KeywordList::default(), None);
        assert_eq!(report.score, 0);
        assert!(report.feedback.is_empty());
        assert!(report.keywords.is_empty());
    }

    #[test]
    fn missing_keyword_shows_everywhere() {
        let report = evaluate(&article(), &KeywordList::parse("rust"), None);
        assert_eq!(report.keywords[0].status, KeywordStatus::Missing);
        assert!(
            report
                .feedback_in(FeedbackCategory::Critical)
                .iter()
                .any(|i| i.message.contains("\"rust\" not found"))
        );
    }

    #[test]
    fn report_serializes_to_json() {
        let report = evaluate(&article(), &KeywordList::parse("seo"), Some(50));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["score"].is_u64());
        assert_eq!(json["band"], report.band.as_str());
        assert_eq!(json["breakdown"]["word_count"]["max"], 25);
        assert_eq!(json["min_score"], 50);
        assert!(json["feedback"][0]["category"].is_string());
    }
}
