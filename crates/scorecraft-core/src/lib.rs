//! Core library for scorecraft.
//!
//! Deterministic content quality scoring for marketing copy. Given a draft
//! and its target keywords, the crate computes a 0–100 score, a four-part
//! breakdown, categorized feedback and per-keyword density analysis. The same
//! input always produces the same output.
//!
//! # Modules
//!
//! - [`metrics`] - Word, heading, paragraph, link and keyword counting
//! - [`score`] - Weighted overall score, breakdown and score bands
//! - [`feedback`] - Improvement suggestions and their categories
//! - [`keywords`] - Keyword lists and density analysis
//! - [`report`] - Everything above in one pass
//! - [`collaborator`] - Contracts with the external content assistant
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use scorecraft_core::{KeywordList, evaluate};
//!
//! let keywords = KeywordList::parse("seo, content marketing");
//! let report = evaluate("# Title\n\nA short draft about seo.", &keywords, Some(70));
//!
//! assert!(report.score <= 100);
//! assert!(report.below_min);
//! ```
#![deny(unsafe_code)]

pub mod collaborator;
pub mod config;
pub mod error;
pub mod feedback;
pub mod keywords;
pub mod metrics;
pub mod report;
pub mod score;

pub use collaborator::{OptimizationComparison, OptimizationResponse, compare_optimization};
pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use error::{CollaboratorError, CollaboratorResult, ConfigError, ConfigResult};
pub use feedback::{FeedbackCategory, FeedbackItem, scoring_feedback};
pub use keywords::{KeywordAnalysis, KeywordList, KeywordStatus, analyze_keywords};
pub use metrics::Metrics;
pub use report::{ContentReport, evaluate};
pub use score::{ScoreBand, ScoreBreakdown, SubScore, score_breakdown, score_content};
