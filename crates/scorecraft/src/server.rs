//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the scorer to AI assistants over stdio. Each tool is a thin
//! wrapper over the same core functions the CLI commands call: it checks the
//! input size, fills in default keywords, delegates, and returns pretty JSON.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use scorecraft_core::{
    KeywordList, ScoreBand, collaborator, evaluate, feedback, keywords as keyword_analysis, score,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Content and keywords, shared by the scoring tools.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ContentParams {
    /// The content to score (plain text, markdown or HTML).
    pub text: String,
    /// Target keywords. Omit to use the server's configured keywords.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

/// Parameters for the `content_report` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ContentReportParams {
    /// The content to score (plain text, markdown or HTML).
    pub text: String,
    /// Target keywords. Omit to use the server's configured keywords.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// Minimum acceptable score (0-100).
    pub min_score: Option<u8>,
}

/// Parameters for the `compare_optimization` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CompareOptimizationParams {
    /// The original content.
    pub text: String,
    /// Target keywords. Omit to use the server's configured keywords.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// The assistant's raw optimization response:
    /// `{"optimizedContent": "...", "score": 0-100, "feedback": ["..."]}`.
    pub response: String,
}

#[derive(Serialize)]
struct ScoreResult {
    score: u8,
    band: ScoreBand,
    breakdown: score::ScoreBreakdown,
}

/// MCP server exposing the scorer to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    max_input_bytes: Option<usize>,
    default_keywords: KeywordList,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl ProjectServer {
    /// Create a new MCP server with the default input limit and no keywords.
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            max_input_bytes: Some(scorecraft_core::DEFAULT_MAX_INPUT_BYTES),
            default_keywords: KeywordList::default(),
        }
    }

    /// Set the input size limit; `None` disables it.
    pub fn with_input_limit(mut self, max_input_bytes: Option<usize>) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Keywords used when a tool call omits them.
    pub fn with_default_keywords(mut self, keywords: KeywordList) -> Self {
        self.default_keywords = keywords;
        self
    }

    fn check_size(&self, texts: &[&str]) -> Result<(), McpError> {
        let size: usize = texts.iter().map(|t| t.len()).sum();
        if let Some(max) = self.max_input_bytes
            && size > max
        {
            return Err(McpError::invalid_params(
                format!("input too large: {size} bytes (limit: {max} bytes)"),
                None,
            ));
        }
        Ok(())
    }

    fn resolve_keywords(&self, keywords: Option<Vec<String>>) -> KeywordList {
        keywords.map_or_else(|| self.default_keywords.clone(), KeywordList::from)
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Overall score with its breakdown.
    #[tool(
        description = "Score content 0-100 for search quality against target keywords. Returns the score, its band (poor/fair/good/excellent) and a four-part breakdown."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn score_content(
        &self,
        Parameters(params): Parameters<ContentParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&[&params.text])?;
        let keywords = self.resolve_keywords(params.keywords);
        tracing::debug!(tool = "score_content", keyword_count = keywords.len(), "executing MCP tool");

        let overall = score::score_content(&params.text, &keywords);
        let result = ScoreResult {
            score: overall,
            band: ScoreBand::from_score(overall),
            breakdown: score::score_breakdown(&params.text, &keywords, overall),
        };

        tracing::info!(tool = "score_content", score = overall, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(&result)?)]))
    }

    /// Categorized improvement suggestions.
    #[tool(
        description = "List improvement suggestions for content, each tagged critical, important or suggestion."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn scoring_feedback(
        &self,
        Parameters(params): Parameters<ContentParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&[&params.text])?;
        let keywords = self.resolve_keywords(params.keywords);
        tracing::debug!(tool = "scoring_feedback", keyword_count = keywords.len(), "executing MCP tool");

        let items = feedback::scoring_feedback(&params.text, &keywords);

        tracing::info!(tool = "scoring_feedback", count = items.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(&items)?)]))
    }

    /// Per-keyword density analysis.
    #[tool(
        description = "Analyze each target keyword: whole-word count, density, status (missing/low/good/high) and a suggestion."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_keywords(
        &self,
        Parameters(params): Parameters<ContentParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&[&params.text])?;
        let keywords = self.resolve_keywords(params.keywords);
        tracing::debug!(tool = "analyze_keywords", keyword_count = keywords.len(), "executing MCP tool");

        let rows = keyword_analysis::analyze_keywords(&params.text, &keywords);

        tracing::info!(tool = "analyze_keywords", rows = rows.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(&rows)?)]))
    }

    /// Everything in one call.
    #[tool(
        description = "Full content report: score, band, breakdown, categorized feedback, keyword analysis and raw metrics. Optionally checks a minimum score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn content_report(
        &self,
        Parameters(params): Parameters<ContentReportParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&[&params.text])?;
        if let Some(min) = params.min_score
            && min > 100
        {
            return Err(McpError::invalid_params(
                format!("min_score must be 0-100, got {min}"),
                None,
            ));
        }
        let keywords = self.resolve_keywords(params.keywords);
        tracing::debug!(tool = "content_report", keyword_count = keywords.len(), "executing MCP tool");

        let report = evaluate(&params.text, &keywords, params.min_score);

        tracing::info!(
            tool = "content_report",
            score = report.score,
            below_min = report.below_min,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&report)?)]))
    }

    /// Deterministic scores of content and its optimized rewrite.
    #[tool(
        description = "Compare original content with an AI-optimized rewrite: deterministic scores of both, the signed difference, and the assistant's own score and feedback."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn compare_optimization(
        &self,
        Parameters(params): Parameters<CompareOptimizationParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_size(&[&params.text, &params.response])?;
        let keywords = self.resolve_keywords(params.keywords);
        tracing::debug!(tool = "compare_optimization", keyword_count = keywords.len(), "executing MCP tool");

        let response = collaborator::parse_optimization(&params.response)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let comparison = collaborator::compare_optimization(&params.text, &keywords, &response);

        tracing::info!(
            tool = "compare_optimization",
            delta = comparison.delta,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(&comparison)?)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Score marketing content against target keywords, \
                 list improvement feedback, analyze keyword density, and compare \
                 content with an optimized rewrite.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
