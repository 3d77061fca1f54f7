//! Human-readable improvement suggestions.
//!
//! Messages are generated from the same metrics the scorer reads, then
//! sorted into display categories by [`FeedbackCategory::classify`], which
//! inspects the message text. Keeping classification text-based means a
//! message's category is the same whether it was produced here or stored
//! and re-read later.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::keywords::KeywordList;
use crate::metrics::Metrics;

/// Below this word count content is flagged as too short.
pub const SHORT_CONTENT_WORDS: usize = 300;

/// Below this word count content is nudged to grow.
pub const GROW_CONTENT_WORDS: usize = 800;

/// Above this word count content is flagged as too long.
pub const LONG_CONTENT_WORDS: usize = 2000;

/// Above this density a keyword is flagged as overused.
pub const OVERUSE_DENSITY: f64 = 0.03;

const CRITICAL_MARKERS: &[&str] = &["too short", "not found", "Missing main heading"];
const IMPORTANT_MARKERS: &[&str] = &["appears too frequently", "Too many main headings", "too long"];

/// Display grouping for a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCategory {
    /// Must fix: missing content, missing title, absent keywords.
    Critical,
    /// Should fix: overuse and excess length.
    Important,
    /// Nice to have.
    Suggestion,
}

impl FeedbackCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Critical, Self::Important, Self::Suggestion];

    /// Categorize a message by the phrases it contains.
    ///
    /// Critical phrases are checked before important ones.
    pub fn classify(message: &str) -> Self {
        if CRITICAL_MARKERS.iter().any(|m| message.contains(m)) {
            Self::Critical
        } else if IMPORTANT_MARKERS.iter().any(|m| message.contains(m)) {
            Self::Important
        } else {
            Self::Suggestion
        }
    }

    /// Returns the category as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Suggestion => "suggestion",
        }
    }
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feedback message with its display category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackItem {
    /// Display category derived from the message.
    pub category: FeedbackCategory,
    /// The suggestion text.
    pub message: String,
}

impl FeedbackItem {
    /// Wrap a message, classifying it.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            category: FeedbackCategory::classify(&message),
            message,
        }
    }
}

/// Generate feedback for `text` against `keywords`.
///
/// Returns nothing for degenerate input (no words or no keywords).
#[tracing::instrument(skip_all, fields(text_len = text.len(), keyword_count = keywords.len()))]
pub fn scoring_feedback(text: &str, keywords: &KeywordList) -> Vec<FeedbackItem> {
    if text.is_empty() || keywords.is_empty() {
        return Vec::new();
    }
    feedback_for_metrics(&Metrics::extract(text, keywords))
}

/// Generate feedback over already-extracted metrics.
pub fn feedback_for_metrics(metrics: &Metrics) -> Vec<FeedbackItem> {
    if metrics.word_count == 0 || metrics.keywords.is_empty() {
        return Vec::new();
    }

    let mut messages: Vec<String> = Vec::new();

    let words = metrics.word_count;
    messages.push(
        if words < SHORT_CONTENT_WORDS {
            "Content is too short. Aim for at least 300 words."
        } else if words < GROW_CONTENT_WORDS {
            "Consider adding more content. Optimal length is 800-1500 words."
        } else if words > LONG_CONTENT_WORDS {
            "Content may be too long. Consider breaking it into multiple pieces."
        } else {
            "Word count is good."
        }
        .to_string(),
    );

    let headings = metrics.headings;
    if headings.h1 == 0 {
        messages.push("Missing main heading (H1). Add a clear title to your content.".into());
    } else if headings.h1 > 1 {
        messages.push("Too many main headings. Use only one H1 per page.".into());
    }
    if headings.h2 < 2 {
        messages.push("Add more subheadings (H2) to structure your content better.".into());
    }

    for kc in &metrics.keywords {
        let density = metrics.density(kc.count);
        if kc.count == 0 {
            messages.push(format!("Keyword \"{}\" not found in the content.", kc.keyword));
        } else if density > OVERUSE_DENSITY {
            messages.push(format!(
                "Keyword \"{}\" appears too frequently ({}%). Aim for 1-2%.",
                kc.keyword,
                percent(density)
            ));
        }
    }

    let long = metrics.paragraphs.long;
    if long > 0 {
        messages.push(format!(
            "{long} paragraph(s) are too long. Break them into smaller chunks for better readability."
        ));
    }

    tracing::debug!(count = messages.len(), "feedback generated");
    messages.into_iter().map(FeedbackItem::new).collect()
}

/// Messages belonging to `category`, in generation order.
pub fn in_category(items: &[FeedbackItem], category: FeedbackCategory) -> Vec<&FeedbackItem> {
    items.iter().filter(|i| i.category == category).collect()
}

/// Density as a percentage with one decimal, ties rounded up.
fn percent(density: f64) -> String {
    format!("{:.1}", (density * 1000.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOO_SHORT: &str = "Content is too short. Aim for at least 300 words.";

    fn words(n: usize) -> String {
        vec!["lorem"; n].join(" ")
    }

    fn messages(text: &str, keywords: &str) -> Vec<String> {
        scoring_feedback(text, &KeywordList::parse(keywords))
            .into_iter()
            .map(|i| i.message)
            .collect()
    }

    #[test]
    fn too_short_iff_under_300_words() {
        assert!(messages(&words(299), "lorem").contains(&TOO_SHORT.to_string()));
        assert!(!messages(&words(300), "lorem").contains(&TOO_SHORT.to_string()));
    }

    #[test]
    fn length_branches() {
        assert!(messages(&words(500), "x").contains(
            &"Consider adding more content. Optimal length is 800-1500 words.".to_string()
        ));
        assert!(messages(&words(800), "x").contains(&"Word count is good.".to_string()));
        // 1500–2000 words still reads as good.
        assert!(messages(&words(1800), "x").contains(&"Word count is good.".to_string()));
        assert!(messages(&words(2001), "x").contains(
            &"Content may be too long. Consider breaking it into multiple pieces.".to_string()
        ));
    }

    #[test]
    fn plain_text_lacks_headings() {
        let msgs = messages(&words(320), "seo");
        assert!(msgs.contains(
            &"Missing main heading (H1). Add a clear title to your content.".to_string()
        ));
        assert!(msgs.contains(
            &"Add more subheadings (H2) to structure your content better.".to_string()
        ));
        assert!(msgs.contains(&"Keyword \"seo\" not found in the content.".to_string()));
    }

    #[test]
    fn multiple_h1_is_flagged() {
        let text = format!("<h1>A</h1> <h1>B</h1> <h2>C</h2> <h2>D</h2> {}", words(900));
        let msgs = messages(&text, "lorem");
        assert!(msgs.contains(&"Too many main headings. Use only one H1 per page.".to_string()));
        assert!(!msgs.iter().any(|m| m.contains("subheadings")));
    }

    #[test]
    fn overused_keyword_reports_density() {
        let text = format!("{} {}", vec!["seo"; 5].join(" "), words(95));
        let msgs = messages(&text, "seo");
        assert!(msgs.contains(
            &"Keyword \"seo\" appears too frequently (5.0%). Aim for 1-2%.".to_string()
        ));
    }

    #[test]
    fn file_newline_does_not_lift_short_content() {
        let text = format!("seo {}\n", words(298));
        let msgs = messages(&text, "seo");
        assert!(msgs.contains(&TOO_SHORT.to_string()));
    }

    #[test]
    fn overused_density_rounds_half_up() {
        // 25 / 400 = 6.25% exactly
        let text = format!("{} {}", vec!["seo"; 25].join(" "), words(375));
        let msgs = messages(&text, "seo");
        assert_eq!(
            msgs.iter().filter(|m| m.contains("seo")).collect::<Vec<_>>(),
            vec!["Keyword \"seo\" appears too frequently (6.3%). Aim for 1-2%."]
        );
    }

    #[test]
    fn percent_keeps_one_decimal() {
        assert_eq!(percent(0.0625), "6.3");
        assert_eq!(percent(0.05), "5.0");
        assert_eq!(percent(0.0349), "3.5");
    }

    #[test]
    fn keyword_at_three_percent_is_not_overused() {
        let text = format!("{} {}", vec!["seo"; 3].join(" "), words(97));
        let msgs = messages(&text, "seo");
        assert!(!msgs.iter().any(|m| m.contains("seo")));
    }

    #[test]
    fn long_paragraphs_are_counted() {
        let text = format!("{}\n\n{}\n\nshort one", words(151), words(200));
        let msgs = messages(&text, "lorem");
        assert!(msgs.contains(
            &"2 paragraph(s) are too long. Break them into smaller chunks for better readability."
                .to_string()
        ));
    }

    #[test]
    fn degenerate_inputs_produce_no_feedback() {
        assert!(scoring_feedback("", &KeywordList::parse("seo")).is_empty());
        assert!(scoring_feedback(&words(10), &KeywordList::default()).is_empty());
    }

    #[test]
    fn classification_table() {
        use FeedbackCategory::*;
        let cases = [
            (TOO_SHORT, Critical),
            ("Keyword \"x\" not found in the content.", Critical),
            ("Missing main heading (H1). Add a clear title to your content.", Critical),
            ("Keyword \"x\" appears too frequently (4.0%). Aim for 1-2%.", Important),
            ("Too many main headings. Use only one H1 per page.", Important),
            ("Content may be too long. Consider breaking it into multiple pieces.", Important),
            ("3 paragraph(s) are too long. Break them into smaller chunks for better readability.", Important),
            ("Consider adding more content. Optimal length is 800-1500 words.", Suggestion),
            ("Add more subheadings (H2) to structure your content better.", Suggestion),
            ("Word count is good.", Suggestion),
        ];
        for (message, expected) in cases {
            assert_eq!(FeedbackCategory::classify(message), expected, "{message}");
        }
    }

    #[test]
    fn critical_phrases_win_over_important_ones() {
        // A keyword that itself reads "too short" still lands in critical.
        let item = FeedbackItem::new("Keyword \"too short\" appears too frequently (9.0%). Aim for 1-2%.");
        assert_eq!(item.category, FeedbackCategory::Critical);
    }

    #[test]
    fn generated_items_carry_categories() {
        let items = scoring_feedback(&words(100), &KeywordList::parse("seo"));
        let critical = in_category(&items, FeedbackCategory::Critical);
        assert_eq!(critical.len(), 3);
        let suggestions = in_category(&items, FeedbackCategory::Suggestion);
        assert_eq!(suggestions.len(), 1);
    }
}
