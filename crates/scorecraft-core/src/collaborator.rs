//! Contracts with the external content assistant.
//!
//! Idea generation, article drafting, optimization, brand voice and social
//! posts are produced by a third-party language model. This module does not
//! call it. It defines what each operation takes, validates what comes back,
//! and lines an optimization result up against the deterministic score.
//!
//! Responses arrive as loosely shaped JSON. Parsing is strict: a required
//! field that is absent or of the wrong type is a
//! [`CollaboratorError::MalformedResponse`] naming the field, never a
//! silently empty default. Fields the assistant may legitimately omit are
//! `Option`s.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::feedback::{self, FeedbackItem};
use crate::keywords::KeywordList;
use crate::score;

/// Ideas requested when no count is given.
pub const DEFAULT_IDEA_COUNT: u32 = 5;

/// Article tone when none is given.
pub const DEFAULT_TONE: &str = "professional";

/// Article length target when none is given.
pub const DEFAULT_ARTICLE_WORDS: u32 = 800;

/// Content type passed to optimization when none is given.
pub const DEFAULT_CONTENT_TYPE: &str = "article";

/// Social post type when none is given.
pub const DEFAULT_POST_TYPE: &str = "promotion";

/// The assistant operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Content idea generation.
    Ideas,
    /// Full article drafting.
    Article,
    /// Rewriting content for search performance.
    Optimization,
    /// Brand voice derivation.
    BrandVoice,
    /// Social post drafting.
    SocialPost,
}

impl Operation {
    /// Returns the operation as a snake_case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ideas => "ideas",
            Self::Article => "article",
            Self::Optimization => "optimization",
            Self::BrandVoice => "brand_voice",
            Self::SocialPost => "social_post",
        }
    }

    fn malformed(self, reason: impl Into<String>) -> CollaboratorError {
        CollaboratorError::MalformedResponse {
            operation: self.as_str(),
            reason: reason.into(),
        }
    }

    fn invalid(self, reason: impl Into<String>) -> CollaboratorError {
        CollaboratorError::InvalidRequest {
            operation: self.as_str(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn require_text(op: Operation, field: &str, value: &str) -> CollaboratorResult<()> {
    if value.trim().is_empty() {
        Err(op.invalid(format!("{field} must not be blank")))
    } else {
        Ok(())
    }
}

// -- Requests ---------------------------------------------------------------

fn default_idea_count() -> u32 {
    DEFAULT_IDEA_COUNT
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_article_words() -> u32 {
    DEFAULT_ARTICLE_WORDS
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_post_type() -> String {
    DEFAULT_POST_TYPE.to_string()
}

/// Ask for content ideas in a niche.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeasRequest {
    /// Topic area, e.g. "sustainable fashion".
    pub niche: String,
    /// How many ideas to return.
    #[serde(default = "default_idea_count")]
    pub count: u32,
}

impl IdeasRequest {
    /// Request [`DEFAULT_IDEA_COUNT`] ideas for `niche`.
    pub fn new(niche: impl Into<String>) -> Self {
        Self {
            niche: niche.into(),
            count: DEFAULT_IDEA_COUNT,
        }
    }

    /// Check required inputs.
    pub fn validate(&self) -> CollaboratorResult<()> {
        require_text(Operation::Ideas, "niche", &self.niche)?;
        if self.count == 0 {
            return Err(Operation::Ideas.invalid("count must be at least 1"));
        }
        Ok(())
    }
}

/// Ask for a full article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    /// Article title.
    pub title: String,
    /// Keywords to optimize for.
    #[serde(default)]
    pub keywords: KeywordList,
    /// Writing tone.
    #[serde(default = "default_tone")]
    pub tone: String,
    /// Approximate length in words.
    #[serde(default = "default_article_words")]
    pub word_count: u32,
}

impl ArticleRequest {
    /// Request a professional 800-word article.
    pub fn new(title: impl Into<String>, keywords: KeywordList) -> Self {
        Self {
            title: title.into(),
            keywords,
            tone: default_tone(),
            word_count: DEFAULT_ARTICLE_WORDS,
        }
    }

    /// Check required inputs.
    pub fn validate(&self) -> CollaboratorResult<()> {
        require_text(Operation::Article, "title", &self.title)?;
        if self.word_count == 0 {
            return Err(Operation::Article.invalid("word count must be at least 1"));
        }
        Ok(())
    }
}

/// Ask for an optimized rewrite of existing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    /// The content to optimize.
    pub content: String,
    /// Keywords to optimize for.
    pub keywords: KeywordList,
    /// Kind of content, e.g. "article" or "blog".
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl OptimizationRequest {
    /// Request optimization of an article.
    pub fn new(content: impl Into<String>, keywords: KeywordList) -> Self {
        Self {
            content: content.into(),
            keywords,
            content_type: default_content_type(),
        }
    }

    /// Check required inputs.
    pub fn validate(&self) -> CollaboratorResult<()> {
        require_text(Operation::Optimization, "content", &self.content)?;
        if self.keywords.is_empty() {
            return Err(Operation::Optimization.invalid("at least one keyword is required"));
        }
        Ok(())
    }
}

/// Ask for a brand voice derived from examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandVoiceRequest {
    /// How the brand describes itself.
    pub description: String,
    /// Existing content samples.
    #[serde(default)]
    pub examples: Vec<String>,
    /// Who the brand talks to.
    pub target_audience: String,
}

impl BrandVoiceRequest {
    /// Check required inputs.
    pub fn validate(&self) -> CollaboratorResult<()> {
        require_text(Operation::BrandVoice, "description", &self.description)?;
        require_text(Operation::BrandVoice, "target audience", &self.target_audience)
    }
}

/// Social network a post is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Platform {
    /// Facebook.
    Facebook,
    /// LinkedIn.
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    /// Twitter / X.
    Twitter,
    /// Instagram.
    Instagram,
}

impl Platform {
    /// Display name of the platform.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::LinkedIn => "LinkedIn",
            Self::Twitter => "Twitter",
            Self::Instagram => "Instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ask for a social post based on existing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialPostRequest {
    /// The content the post promotes or summarizes.
    pub content_source: String,
    /// Target network.
    pub platform: Platform,
    /// Writing tone.
    #[serde(default = "default_tone")]
    pub tone: String,
    /// Kind of post, e.g. "promotion" or "announcement".
    #[serde(default = "default_post_type")]
    pub post_type: String,
}

impl SocialPostRequest {
    /// Check required inputs.
    pub fn validate(&self) -> CollaboratorResult<()> {
        require_text(Operation::SocialPost, "content source", &self.content_source)
    }
}

// -- Responses --------------------------------------------------------------

/// One generated content idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContentIdea {
    /// Working title.
    pub title: String,
    /// One or two sentence pitch.
    pub description: String,
    /// Suggested target keywords.
    pub keywords: KeywordList,
}

/// A drafted article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedArticle {
    /// Article body.
    pub content: String,
    /// Search snippet, around 160 characters.
    pub meta_description: String,
}

/// An optimized rewrite with the assistant's own assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizationResponse {
    /// The rewritten content.
    pub optimized_content: String,
    /// The assistant's 0–100 rating, if it gave one.
    pub score: Option<u8>,
    /// The assistant's suggestions, if it gave any.
    pub feedback: Option<Vec<String>>,
}

/// A derived brand voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BrandVoice {
    /// Tone name, e.g. "friendly expert".
    pub tone: String,
    /// Defining traits of the voice.
    pub voice_characteristics: Vec<String>,
    /// Phrases written in the voice.
    pub sample_phrases: Vec<String>,
}

/// A drafted social post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SocialPost {
    /// Post text, ready to publish.
    pub text: String,
}

/// Field accessors over a response object that report which field is wrong.
struct Fields<'a> {
    op: Operation,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn of(op: Operation, value: &'a Value) -> CollaboratorResult<Self> {
        value
            .as_object()
            .map(|map| Self { op, map })
            .ok_or_else(|| op.malformed("expected a JSON object"))
    }

    /// Present and not null.
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    fn string(&self, name: &str) -> CollaboratorResult<String> {
        match self.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.op.malformed(format!("field `{name}` must be a string"))),
            None => Err(self.op.malformed(format!("missing field `{name}`"))),
        }
    }

    fn strings(&self, name: &str) -> CollaboratorResult<Vec<String>> {
        self.optional_strings(name)?
            .ok_or_else(|| self.op.malformed(format!("missing field `{name}`")))
    }

    fn optional_strings(&self, name: &str) -> CollaboratorResult<Option<Vec<String>>> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let not_strings = || {
            self.op
                .malformed(format!("field `{name}` must be an array of strings"))
        };
        value
            .as_array()
            .ok_or_else(not_strings)?
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(not_strings))
            .collect::<CollaboratorResult<Vec<_>>>()
            .map(Some)
    }

    fn optional_score(&self, name: &str) -> CollaboratorResult<Option<u8>> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let number = value
            .as_f64()
            .ok_or_else(|| self.op.malformed(format!("field `{name}` must be a number")))?;
        if !(0.0..=100.0).contains(&number) {
            return Err(self
                .op
                .malformed(format!("field `{name}` is {number}, expected 0-100")));
        }
        Ok(Some(number.round() as u8))
    }
}

fn parse_json(raw: &str) -> CollaboratorResult<Value> {
    Ok(serde_json::from_str(raw)?)
}

/// Parse an ideas response: `{"ideas": [...]}` or a bare array of ideas.
#[tracing::instrument(skip_all, fields(raw_len = raw.len()))]
pub fn parse_ideas(raw: &str) -> CollaboratorResult<Vec<ContentIdea>> {
    let op = Operation::Ideas;
    let value = parse_json(raw)?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("ideas") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(op.malformed("field `ideas` must be an array")),
            None => return Err(op.malformed("missing field `ideas`")),
        },
        _ => return Err(op.malformed("expected a JSON object or array")),
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let fields = Fields::of(op, item)
                .map_err(|_| op.malformed(format!("idea {} is not an object", idx + 1)))?;
            Ok(ContentIdea {
                title: fields.string("title")?,
                description: fields.string("description")?,
                keywords: fields.strings("keywords")?.into(),
            })
        })
        .collect()
}

/// Parse an article response: `{"content": ..., "metaDescription": ...}`.
#[tracing::instrument(skip_all, fields(raw_len = raw.len()))]
pub fn parse_article(raw: &str) -> CollaboratorResult<GeneratedArticle> {
    let value = parse_json(raw)?;
    let fields = Fields::of(Operation::Article, &value)?;
    Ok(GeneratedArticle {
        content: fields.string("content")?,
        meta_description: fields.string("metaDescription")?,
    })
}

/// Parse an optimization response:
/// `{"optimizedContent": ..., "score": 0-100, "feedback": [...]}`.
///
/// `score` and `feedback` may be absent; `optimizedContent` may not.
#[tracing::instrument(skip_all, fields(raw_len = raw.len()))]
pub fn parse_optimization(raw: &str) -> CollaboratorResult<OptimizationResponse> {
    let value = parse_json(raw)?;
    let fields = Fields::of(Operation::Optimization, &value)?;
    let response = OptimizationResponse {
        optimized_content: fields.string("optimizedContent")?,
        score: fields.optional_score("score")?,
        feedback: fields.optional_strings("feedback")?,
    };
    if response.score.is_none() {
        tracing::debug!("optimization response carries no score");
    }
    Ok(response)
}

/// Parse a brand voice response:
/// `{"tone": ..., "voiceCharacteristics": [...], "samplePhrases": [...]}`.
#[tracing::instrument(skip_all, fields(raw_len = raw.len()))]
pub fn parse_brand_voice(raw: &str) -> CollaboratorResult<BrandVoice> {
    let value = parse_json(raw)?;
    let fields = Fields::of(Operation::BrandVoice, &value)?;
    Ok(BrandVoice {
        tone: fields.string("tone")?,
        voice_characteristics: fields.strings("voiceCharacteristics")?,
        sample_phrases: fields.strings("samplePhrases")?,
    })
}

/// Accept a social post reply, which is plain text rather than JSON.
pub fn parse_social_post(raw: &str) -> CollaboratorResult<SocialPost> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Operation::SocialPost.malformed("empty post text"));
    }
    Ok(SocialPost {
        text: text.to_string(),
    })
}

// -- Comparison -------------------------------------------------------------

/// Deterministic and assistant ratings for an optimization, side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizationComparison {
    /// Deterministic score of the original content.
    pub original_score: u8,
    /// Deterministic score of the optimized content.
    pub optimized_score: u8,
    /// `optimized_score - original_score`.
    pub delta: i16,
    /// The assistant's own rating of its rewrite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_score: Option<u8>,
    /// The assistant's own suggestions.
    pub assistant_feedback: Vec<String>,
    /// Deterministic feedback on the optimized content.
    pub optimized_feedback: Vec<FeedbackItem>,
}

/// Score the original and the optimized content with the same keywords.
#[tracing::instrument(skip_all, fields(keyword_count = keywords.len()))]
pub fn compare_optimization(
    original: &str,
    keywords: &KeywordList,
    response: &OptimizationResponse,
) -> OptimizationComparison {
    let original_score = score::score_content(original, keywords);
    let optimized_score = score::score_content(&response.optimized_content, keywords);
    let delta = i16::from(optimized_score) - i16::from(original_score);

    tracing::info!(
        original_score,
        optimized_score,
        assistant_score = ?response.score,
        "optimization compared"
    );

    OptimizationComparison {
        original_score,
        optimized_score,
        delta,
        assistant_score: response.score,
        assistant_feedback: response.feedback.clone().unwrap_or_default(),
        optimized_feedback: feedback::scoring_feedback(&response.optimized_content, keywords),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed_reason(err: CollaboratorError) -> String {
        match err {
            CollaboratorError::MalformedResponse { reason, .. } => reason,
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn requests_fill_defaults_when_deserialized() {
        let req: IdeasRequest = serde_json::from_str(r#"{"niche": "coffee"}"#).unwrap();
        assert_eq!(req.count, DEFAULT_IDEA_COUNT);

        let req: ArticleRequest =
            serde_json::from_str(r#"{"title": "Brewing", "keywords": ["coffee", " "]}"#).unwrap();
        assert_eq!(req.tone, "professional");
        assert_eq!(req.word_count, 800);
        assert_eq!(req.keywords.as_slice(), ["coffee"]);

        let req: OptimizationRequest =
            serde_json::from_str(r#"{"content": "x", "keywords": ["a"]}"#).unwrap();
        assert_eq!(req.content_type, "article");

        let req: SocialPostRequest = serde_json::from_str(
            r#"{"contentSource": "post", "platform": "LinkedIn", "tone": "casual"}"#,
        )
        .unwrap();
        assert_eq!(req.platform, Platform::LinkedIn);
        assert_eq!(req.post_type, "promotion");
    }

    #[test]
    fn request_validation() {
        assert!(IdeasRequest::new("coffee").validate().is_ok());
        assert!(IdeasRequest::new("  ").validate().is_err());
        assert!(
            IdeasRequest {
                count: 0,
                ..IdeasRequest::new("coffee")
            }
            .validate()
            .is_err()
        );
        assert!(ArticleRequest::new("", KeywordList::default()).validate().is_err());

        let err = OptimizationRequest::new("body", KeywordList::parse(" , "))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::InvalidRequest {
                operation: "optimization",
                ..
            }
        ));

        let voice = BrandVoiceRequest {
            description: "bold".into(),
            examples: vec![],
            target_audience: " ".into(),
        };
        assert!(voice.validate().is_err());
    }

    #[test]
    fn parses_ideas_object_and_array() {
        let raw = r#"{"ideas": [{"title": "T", "description": "D", "keywords": ["a", "b"]}]}"#;
        let ideas = parse_ideas(raw).unwrap();
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].keywords.as_slice(), ["a", "b"]);

        let raw = r#"[{"title": "T", "description": "D", "keywords": []}]"#;
        assert_eq!(parse_ideas(raw).unwrap().len(), 1);
    }

    #[test]
    fn ideas_without_array_are_malformed() {
        let reason = malformed_reason(parse_ideas(r#"{"result": []}"#).unwrap_err());
        assert_eq!(reason, "missing field `ideas`");

        let raw = r#"{"ideas": [{"title": "T", "keywords": []}]}"#;
        let reason = malformed_reason(parse_ideas(raw).unwrap_err());
        assert_eq!(reason, "missing field `description`");
    }

    #[test]
    fn parses_article() {
        let raw = r#"{"content": "Body", "metaDescription": "Meta"}"#;
        let article = parse_article(raw).unwrap();
        assert_eq!(article.content, "Body");
        assert_eq!(article.meta_description, "Meta");

        let reason = malformed_reason(parse_article(r#"{"content": "Body"}"#).unwrap_err());
        assert_eq!(reason, "missing field `metaDescription`");
    }

    #[test]
    fn optimization_optional_fields_stay_absent() {
        let raw = r#"{"optimizedContent": "Better", "score": null}"#;
        let response = parse_optimization(raw).unwrap();
        assert_eq!(response.optimized_content, "Better");
        assert_eq!(response.score, None);
        assert_eq!(response.feedback, None);
    }

    #[test]
    fn optimization_rejects_bad_shapes() {
        let reason = malformed_reason(parse_optimization(r#"{"score": 80}"#).unwrap_err());
        assert_eq!(reason, "missing field `optimizedContent`");

        let raw = r#"{"optimizedContent": "x", "score": 140}"#;
        let reason = malformed_reason(parse_optimization(raw).unwrap_err());
        assert!(reason.contains("expected 0-100"));

        let raw = r#"{"optimizedContent": "x", "score": "high"}"#;
        let reason = malformed_reason(parse_optimization(raw).unwrap_err());
        assert_eq!(reason, "field `score` must be a number");

        let raw = r#"{"optimizedContent": "x", "feedback": ["ok", 3]}"#;
        let reason = malformed_reason(parse_optimization(raw).unwrap_err());
        assert_eq!(reason, "field `feedback` must be an array of strings");

        let reason = malformed_reason(parse_optimization("[1, 2]").unwrap_err());
        assert_eq!(reason, "expected a JSON object");
    }

    #[test]
    fn non_json_is_invalid_json() {
        assert!(matches!(
            parse_optimization("Sure! Here is your content"),
            Err(CollaboratorError::InvalidJson(_))
        ));
    }

    #[test]
    fn parses_brand_voice() {
        let raw = r#"{"tone": "warm", "voiceCharacteristics": ["direct"], "samplePhrases": ["Hi"]}"#;
        let voice = parse_brand_voice(raw).unwrap();
        assert_eq!(voice.tone, "warm");
        assert_eq!(voice.sample_phrases, ["Hi"]);

        let reason = malformed_reason(parse_brand_voice(r#"{"tone": "warm"}"#).unwrap_err());
        assert_eq!(reason, "missing field `voiceCharacteristics`");
    }

    #[test]
    fn social_post_must_have_text() {
        assert_eq!(parse_social_post("  Big news!  ").unwrap().text, "Big news!");
        assert!(parse_social_post(" \n").is_err());
    }

    #[test]
    fn comparison_scores_both_versions() {
        let keywords = KeywordList::parse("seo");
        let original = "short seo note";
        let optimized = format!(
            "# Guide\n\n{}",
            vec!["practical seo advice for small teams"; 60].join(" ")
        );
        let response = OptimizationResponse {
            optimized_content: optimized,
            score: Some(88),
            feedback: Some(vec!["Added a title".into()]),
        };

        let cmp = compare_optimization(original, &keywords, &response);
        assert_eq!(cmp.original_score, score::score_content(original, &keywords));
        assert!(cmp.optimized_score > cmp.original_score);
        assert_eq!(
            cmp.delta,
            i16::from(cmp.optimized_score) - i16::from(cmp.original_score)
        );
        assert_eq!(cmp.assistant_score, Some(88));
        assert_eq!(cmp.assistant_feedback, ["Added a title"]);
        assert!(!cmp.optimized_feedback.is_empty());
    }
}
