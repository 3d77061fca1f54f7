//! Weighted 0–100 content quality score.
//!
//! Four components are summed, then clamped and rounded:
//!
//! | Component   | Parts                                                   |
//! |-------------|---------------------------------------------------------|
//! | Length      | minimum length (300 words) + ideal range (800–1500)     |
//! | Keywords    | per-keyword share rewarding density up to 2%            |
//! | Headings    | exactly one H1, two or more H2, two or more H3          |
//! | Readability | share of 20–150 word paragraphs + 1–5 links             |
//!
//! The [`ScoreBreakdown`] recomputes the same components with its own weight
//! table ([`BREAKDOWN_WEIGHTS`]) and rescales them so the displayed parts
//! add up to the overall score. It does not decompose the overall score's
//! arithmetic; tune the two tables separately.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::keywords::KeywordList;
use crate::metrics::{HeadingCounts, Metrics};

/// Full minimum-length credit from this many words.
pub const MIN_LENGTH_WORDS: usize = 300;

/// Lower bound of the ideal length range.
pub const IDEAL_MIN_WORDS: usize = 800;

/// Upper bound of the ideal length range.
pub const IDEAL_MAX_WORDS: usize = 1500;

/// Keyword density that earns a keyword its full share.
pub const TARGET_DENSITY: f64 = 0.02;

/// Weight table for one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Credit for reaching [`MIN_LENGTH_WORDS`], linear below it.
    pub min_length: f64,
    /// Credit inside the ideal range, linear below it.
    pub ideal_length: f64,
    /// Fixed credit above the ideal range.
    pub over_length: f64,
    /// Total keyword credit, split evenly across keywords.
    pub keywords: f64,
    /// Credit for exactly one H1.
    pub h1: f64,
    /// Credit per H2, up to two.
    pub h2_each: f64,
    /// Credit per H3, up to two.
    pub h3_each: f64,
    /// Credit when every paragraph has a reasonable length.
    pub paragraphs: f64,
    /// Credit for one to five links.
    pub links: f64,
}

/// Weights behind the overall score.
pub const SCORE_WEIGHTS: Weights = Weights {
    min_length: 20.0,
    ideal_length: 15.0,
    over_length: 10.0,
    keywords: 25.0,
    h1: 10.0,
    h2_each: 5.0,
    h3_each: 2.5,
    paragraphs: 20.0,
    links: 5.0,
};

/// Weights behind the displayed breakdown, before rescaling.
pub const BREAKDOWN_WEIGHTS: Weights = Weights {
    min_length: 15.0,
    ideal_length: 10.0,
    over_length: 7.0,
    keywords: 25.0,
    h1: 10.0,
    h2_each: 5.0,
    h3_each: 2.5,
    paragraphs: 20.0,
    links: 5.0,
};

/// Nominal maximum of each breakdown part.
pub const SUB_SCORE_MAX: u32 = 25;

/// Raw, unclamped component sums.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Components {
    /// Length component.
    pub length: f64,
    /// Keyword component.
    pub keywords: f64,
    /// Heading component.
    pub headings: f64,
    /// Readability component.
    pub readability: f64,
}

impl Components {
    /// Compute all four components from extracted metrics.
    pub fn compute(metrics: &Metrics, weights: &Weights) -> Self {
        Self {
            length: length_component(metrics.word_count, weights),
            keywords: keyword_component(metrics, weights),
            headings: heading_component(metrics.headings, weights),
            readability: readability_component(metrics, weights),
        }
    }

    /// Sum of the four components.
    pub fn total(&self) -> f64 {
        self.length + self.keywords + self.headings + self.readability
    }
}

fn length_component(words: usize, w: &Weights) -> f64 {
    let words_f = words as f64;

    let minimum = if words >= MIN_LENGTH_WORDS {
        w.min_length
    } else {
        words_f / MIN_LENGTH_WORDS as f64 * w.min_length
    };

    let ideal = if (IDEAL_MIN_WORDS..=IDEAL_MAX_WORDS).contains(&words) {
        w.ideal_length
    } else if words > IDEAL_MAX_WORDS {
        w.over_length
    } else {
        words_f / IDEAL_MIN_WORDS as f64 * w.ideal_length
    };

    minimum + ideal
}

/// Each keyword earns up to `keywords / n`. Below the target density the
/// share scales up linearly; above it the share falls off as target/density.
fn keyword_component(metrics: &Metrics, w: &Weights) -> f64 {
    if metrics.keywords.is_empty() {
        return 0.0;
    }
    let share = w.keywords / metrics.keywords.len() as f64;

    metrics
        .keywords
        .iter()
        .filter(|kc| kc.count > 0)
        .map(|kc| {
            let density = metrics.density(kc.count);
            if density <= TARGET_DENSITY {
                share * (density / TARGET_DENSITY)
            } else {
                share * (TARGET_DENSITY / density)
            }
        })
        .sum()
}

fn heading_component(headings: HeadingCounts, w: &Weights) -> f64 {
    let h1 = if headings.h1 == 1 { w.h1 } else { 0.0 };
    let h2 = headings.h2.min(2) as f64 * w.h2_each;
    let h3 = headings.h3.min(2) as f64 * w.h3_each;
    h1 + h2 + h3
}

fn readability_component(metrics: &Metrics, w: &Weights) -> f64 {
    let paragraphs = w.paragraphs * metrics.paragraphs.reasonable_ratio();

    let links = match metrics.link_count {
        0 => 0.0,
        1..=5 => w.links,
        n => w.links * (5.0 / n as f64),
    };

    paragraphs + links
}

/// Whether there is anything to score.
fn is_scorable(metrics: &Metrics) -> bool {
    metrics.word_count > 0 && !metrics.keywords.is_empty()
}

/// Score `text` against `keywords`, 0–100.
///
/// Returns 0 when the text has no words or no keyword remains after
/// dropping blanks.
#[tracing::instrument(skip_all, fields(text_len = text.len(), keyword_count = keywords.len()))]
pub fn score_content(text: &str, keywords: &KeywordList) -> u8 {
    if text.is_empty() || keywords.is_empty() {
        return 0;
    }
    score_metrics(&Metrics::extract(text, keywords))
}

/// Score already-extracted metrics.
pub fn score_metrics(metrics: &Metrics) -> u8 {
    if !is_scorable(metrics) {
        return 0;
    }
    let components = Components::compute(metrics, &SCORE_WEIGHTS);
    let score = components.total().clamp(0.0, 100.0).round() as u8;
    tracing::debug!(
        length = components.length,
        keywords = components.keywords,
        headings = components.headings,
        readability = components.readability,
        score,
        "content scored"
    );
    score
}

/// One displayed part of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubScore {
    /// Rescaled, rounded score.
    pub score: u32,
    /// Nominal maximum (always 25).
    pub max: u32,
    /// What this part measures.
    pub description: String,
}

impl SubScore {
    fn new(score: u32, description: &str) -> Self {
        Self {
            score,
            max: SUB_SCORE_MAX,
            description: description.to_string(),
        }
    }
}

/// Four-part display breakdown whose parts sum to (about) the overall score.
///
/// Parts are rounded independently, so their sum may drift from the
/// overall score by one or two points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreBreakdown {
    /// Content length and depth.
    pub word_count: SubScore,
    /// Keyword usage and density.
    pub keyword_usage: SubScore,
    /// Headings structure and hierarchy.
    pub heading_structure: SubScore,
    /// Readability and paragraph structure.
    pub readability: SubScore,
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self::rescale(Components::default(), 0)
    }
}

impl ScoreBreakdown {
    /// Scale raw components so they add up to `overall`.
    ///
    /// With a zero raw total the factor is `overall` itself.
    pub fn rescale(raw: Components, overall: u8) -> Self {
        let overall = f64::from(overall);
        let raw_total = raw.total();
        let factor = if raw_total == 0.0 {
            overall
        } else {
            overall / raw_total
        };
        let part = |value: f64| (value * factor).round().max(0.0) as u32;

        Self {
            word_count: SubScore::new(part(raw.length), "Content length and depth"),
            keyword_usage: SubScore::new(part(raw.keywords), "Keyword usage and density"),
            heading_structure: SubScore::new(
                part(raw.headings),
                "Headings structure and hierarchy",
            ),
            readability: SubScore::new(part(raw.readability), "Readability and paragraph structure"),
        }
    }

    /// The four parts in display order.
    pub fn parts(&self) -> [&SubScore; 4] {
        [
            &self.word_count,
            &self.keyword_usage,
            &self.heading_structure,
            &self.readability,
        ]
    }

    /// Sum of the four displayed parts.
    pub fn total(&self) -> u32 {
        self.parts().iter().map(|p| p.score).sum()
    }
}

/// Breakdown of `text` against `keywords`, rescaled to `overall`.
///
/// `overall` should come from [`score_content`] on the same inputs.
#[tracing::instrument(skip(text, keywords), fields(text_len = text.len(), keyword_count = keywords.len()))]
pub fn score_breakdown(text: &str, keywords: &KeywordList, overall: u8) -> ScoreBreakdown {
    if text.is_empty() || keywords.is_empty() {
        return ScoreBreakdown::default();
    }
    breakdown_metrics(&Metrics::extract(text, keywords), overall)
}

/// Breakdown over already-extracted metrics.
pub fn breakdown_metrics(metrics: &Metrics, overall: u8) -> ScoreBreakdown {
    if !is_scorable(metrics) {
        return ScoreBreakdown::default();
    }
    ScoreBreakdown::rescale(Components::compute(metrics, &BREAKDOWN_WEIGHTS), overall)
}

/// Display band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// Below 50.
    Poor,
    /// 50–69.
    Fair,
    /// 70–89.
    Good,
    /// 90 and above.
    Excellent,
}

impl ScoreBand {
    /// Band for a 0–100 score.
    pub const fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Returns the band as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["lorem"; n].join(" ")
    }

    fn kw(list: &str) -> KeywordList {
        KeywordList::parse(list)
    }

    /// 900 words in 18 paragraphs of 50, one `seo` per paragraph (2%),
    /// one H1, two H2, three H3 and two links.
    fn well_structured() -> String {
        let mut paragraphs = Vec::new();
        for i in 0..18 {
            let mut tokens: Vec<String> = Vec::with_capacity(50);
            match i {
                0 => tokens.push("<h1>Title</h1>".into()),
                1 | 2 => tokens.push("<h2>Sub</h2>".into()),
                3..=5 => tokens.push("<h3>Deep</h3>".into()),
                6 | 7 => tokens.push("https://example.com".into()),
                _ => {}
            }
            tokens.push("seo".into());
            while tokens.len() < 50 {
                tokens.push("lorem".into());
            }
            paragraphs.push(tokens.join(" "));
        }
        paragraphs.join("\n\n")
    }

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(score_content("", &kw("seo")), 0);
        assert_eq!(score_content("  \n ", &kw("seo")), 0);
    }

    #[test]
    fn empty_keywords_score_zero() {
        assert_eq!(score_content(&words(900), &KeywordList::default()), 0);
        assert_eq!(score_content(&words(900), &kw(" , ")), 0);
    }

    #[test]
    fn short_plain_text_scores_low() {
        // 20 (minimum length) + 320/800 * 15 (ideal range) = 26.
        let score = score_content(&words(320), &kw("seo"));
        assert_eq!(score, 26);
        assert_eq!(ScoreBand::from_score(score), ScoreBand::Poor);
    }

    #[test]
    fn well_structured_content_maxes_out() {
        let text = well_structured();
        let metrics = Metrics::extract(&text, &kw("seo"));
        assert_eq!(metrics.word_count, 900);
        assert_eq!(metrics.headings, HeadingCounts { h1: 1, h2: 2, h3: 3 });
        assert_eq!(metrics.link_count, 2);

        let c = Components::compute(&metrics, &SCORE_WEIGHTS);
        assert!((c.length - 35.0).abs() < 1e-9);
        assert!((c.keywords - 25.0).abs() < 1e-9);
        assert!((c.headings - 25.0).abs() < 1e-9);
        assert!((c.readability - 25.0).abs() < 1e-9);

        assert_eq!(score_content(&text, &kw("seo")), 100);
    }

    #[test]
    fn over_length_gets_fixed_ideal_credit() {
        let c = length_component(1501, &SCORE_WEIGHTS);
        assert!((c - 30.0).abs() < 1e-9);
        let c = length_component(1500, &SCORE_WEIGHTS);
        assert!((c - 35.0).abs() < 1e-9);
    }

    #[test]
    fn length_component_never_decreases_up_to_ideal() {
        let mut previous = 0.0;
        for n in (0..=800).step_by(25) {
            let current = length_component(n, &SCORE_WEIGHTS);
            assert!(current >= previous, "length credit dropped at {n} words");
            previous = current;
        }
    }

    #[test]
    fn keyword_share_is_split_across_duplicates() {
        // One "seo" in 100 words: density 1%, half the target.
        let text = format!("seo {}", words(99));
        let single = Metrics::extract(&text, &kw("seo"));
        let doubled = Metrics::extract(&text, &kw("seo, seo"));
        let mixed = Metrics::extract(&text, &kw("seo, absent"));

        assert!((keyword_component(&single, &SCORE_WEIGHTS) - 12.5).abs() < 1e-9);
        // Each duplicate earns (25 / 2) * 0.5.
        assert!((keyword_component(&doubled, &SCORE_WEIGHTS) - 12.5).abs() < 1e-9);
        assert!((keyword_component(&mixed, &SCORE_WEIGHTS) - 6.25).abs() < 1e-9);
    }

    #[test]
    fn keyword_stuffing_is_penalized() {
        let at = |hits: usize| {
            let text = format!("{} {}", vec!["seo"; hits].join(" "), words(100 - hits));
            keyword_component(&Metrics::extract(&text, &kw("seo")), &SCORE_WEIGHTS)
        };
        assert!((at(2) - 25.0).abs() < 1e-9);
        assert!(at(3) < at(2));
        assert!(at(5) < at(3));
        assert!(at(10) < at(5));
    }

    #[test]
    fn h1_credit_requires_exactly_one() {
        let none = HeadingCounts::default();
        let one = HeadingCounts { h1: 1, ..none };
        let two = HeadingCounts { h1: 2, ..none };
        assert_eq!(heading_component(none, &SCORE_WEIGHTS), 0.0);
        assert_eq!(heading_component(one, &SCORE_WEIGHTS), 10.0);
        assert_eq!(heading_component(two, &SCORE_WEIGHTS), 0.0);
    }

    #[test]
    fn subheadings_earn_partial_credit() {
        let h = HeadingCounts { h1: 0, h2: 1, h3: 1 };
        assert_eq!(heading_component(h, &SCORE_WEIGHTS), 7.5);
        let h = HeadingCounts { h1: 0, h2: 7, h3: 9 };
        assert_eq!(heading_component(h, &SCORE_WEIGHTS), 15.0);
    }

    #[test]
    fn link_spam_has_diminishing_credit() {
        let with_links = |n: usize| Metrics {
            link_count: n,
            ..Metrics::default()
        };
        assert_eq!(readability_component(&with_links(0), &SCORE_WEIGHTS), 0.0);
        assert_eq!(readability_component(&with_links(5), &SCORE_WEIGHTS), 5.0);
        assert_eq!(readability_component(&with_links(10), &SCORE_WEIGHTS), 2.5);
    }

    #[test]
    fn score_stays_in_range() {
        let samples = [
            String::new(),
            "seo".to_string(),
            "# ".repeat(500),
            "http ".repeat(2000),
            format!("{}\n\n{}", "seo ".repeat(300), "<a x ".repeat(50)),
            well_structured(),
        ];
        for text in &samples {
            assert!(score_content(text, &kw("seo, rust")) <= 100);
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let text = well_structured();
        let keywords = kw("seo, lorem");
        assert_eq!(
            score_content(&text, &keywords),
            score_content(&text, &keywords)
        );
    }

    #[test]
    fn breakdown_parts_track_overall_score() {
        let text = well_structured();
        let keywords = kw("seo");
        let overall = score_content(&text, &keywords);
        let breakdown = score_breakdown(&text, &keywords, overall);

        assert_eq!(breakdown.word_count.score, 25);
        assert_eq!(breakdown.keyword_usage.score, 25);
        assert_eq!(breakdown.heading_structure.score, 25);
        assert_eq!(breakdown.readability.score, 25);
        assert_eq!(breakdown.total(), u32::from(overall));
    }

    #[test]
    fn breakdown_sum_drifts_at_most_two_points() {
        let text = format!("# Title\n\n{}\n\nseo http://x", words(340));
        let keywords = kw("seo, rust");
        let overall = score_content(&text, &keywords);
        let breakdown = score_breakdown(&text, &keywords, overall);
        let drift = (i64::from(breakdown.total()) - i64::from(overall)).abs();
        assert!(drift <= 2, "drift {drift} too large");
    }

    #[test]
    fn breakdown_uses_its_own_length_weights() {
        let metrics = Metrics::extract(&words(1600), &kw("seo"));
        let raw = Components::compute(&metrics, &BREAKDOWN_WEIGHTS);
        assert!((raw.length - 22.0).abs() < 1e-9);
        let raw = Components::compute(&metrics, &SCORE_WEIGHTS);
        assert!((raw.length - 30.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_with_zero_raw_total_scales_by_overall() {
        let breakdown = ScoreBreakdown::rescale(Components::default(), 40);
        assert_eq!(breakdown.total(), 0);
        assert_eq!(breakdown.word_count.max, SUB_SCORE_MAX);
    }

    #[test]
    fn degenerate_breakdown_is_zeroed() {
        let breakdown = score_breakdown("", &kw("seo"), 0);
        assert_eq!(breakdown, ScoreBreakdown::default());
        assert_eq!(breakdown.readability.description, "Readability and paragraph structure");
    }

    #[test]
    fn bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(89), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0).to_string(), "poor");
    }
}
