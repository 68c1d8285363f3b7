//! Optional narrative enhancement through an OpenAI-compatible chat API.
//!
//! The provider's reply is only trusted after it passes an explicit schema
//! check. Every failure (no configuration, timeout, transport error, non-2xx
//! status, unparsable or mismatched reply) becomes a [`FallbackReason`] and
//! the caller keeps the deterministic narrative.

use crate::config::EnhancementConfig;
use crate::error::{AnalysisError, Result};
use crate::insights::{RepoStats, MAX_INSIGHTS, MAX_SUGGESTIONS};
use crate::types::{
    Dimension, Insight, InsightCategory, Narrative, RepositorySnapshot, ScoreBreakdown, Severity,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Characters of README text included in the prompt
const README_EXCERPT_CHARS: usize = 1500;

const SYSTEM_PROMPT: &str = "You are a senior software engineer reviewing a public code repository. \
Reply with a single JSON object of the form \
{\"summary\": string, \"suggestions\": [string], \"insights\": [{\"category\": string, \"severity\": string, \"title\": string, \"description\": string, \"suggestion\": string}]}. \
Give at most 5 suggestions and at most 8 insights. \
category must be one of: testing, ci-cd, licensing, documentation, security, architecture, languages, dependencies, deployment, community, composition, overall. \
severity must be one of: critical, warning, info, success. \
Reference the concrete numbers you are given.";

/// Result of an enhancement attempt
#[derive(Debug, Clone, PartialEq)]
pub enum EnhancementOutcome {
    /// The provider returned a narrative that passed validation
    Enhanced(Narrative),
    /// The deterministic narrative must be used
    Fallback(FallbackReason),
}

/// Why the enhancement path was not used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NotConfigured,
    Timeout,
    Network(String),
    HttpStatus(u16),
    MalformedResponse(String),
    SchemaMismatch(String),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "not configured"),
            Self::Timeout => write!(f, "timed out"),
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::HttpStatus(status) => write!(f, "HTTP {}", status),
            Self::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
            Self::SchemaMismatch(msg) => write!(f, "schema mismatch: {}", msg),
        }
    }
}

/// Client for the optional enhancement provider
pub struct Enhancer {
    config: EnhancementConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderNarrative {
    summary: String,
    suggestions: Vec<String>,
    insights: Vec<ProviderInsight>,
}

#[derive(Debug, Deserialize)]
struct ProviderInsight {
    category: InsightCategory,
    severity: Severity,
    title: String,
    description: String,
    #[serde(default)]
    suggestion: Option<String>,
}

impl Enhancer {
    /// Build an enhancer for the given configuration
    pub fn new(config: &EnhancementConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| AnalysisError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// An enhancer that always falls back
    pub fn disabled() -> Result<Self> {
        Self::new(&EnhancementConfig::disabled())
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Ask the provider for a narrative, bounded by the configured timeout
    pub async fn enhance(
        &self,
        snapshot: &RepositorySnapshot,
        scores: &ScoreBreakdown,
    ) -> EnhancementOutcome {
        if !self.is_configured() {
            return EnhancementOutcome::Fallback(FallbackReason::NotConfigured);
        }

        match tokio::time::timeout(self.config.timeout(), self.request(snapshot, scores)).await {
            Ok(Ok(narrative)) => EnhancementOutcome::Enhanced(narrative),
            Ok(Err(reason)) => EnhancementOutcome::Fallback(reason),
            Err(_) => EnhancementOutcome::Fallback(FallbackReason::Timeout),
        }
    }

    async fn request(
        &self,
        snapshot: &RepositorySnapshot,
        scores: &ScoreBreakdown,
    ) -> std::result::Result<Narrative, FallbackReason> {
        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "temperature": 0.2,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(snapshot, scores).to_string() },
            ],
        });

        debug!("Requesting enhanced narrative from {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FallbackReason::Timeout
                } else {
                    FallbackReason::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FallbackReason::HttpStatus(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FallbackReason::Network(e.to_string()))?;
        parse_reply(&text)
    }
}

/// Facts handed to the provider: the same data the deterministic path uses
fn build_prompt(snapshot: &RepositorySnapshot, scores: &ScoreBreakdown) -> Value {
    let repo = &snapshot.repository;
    let stats = RepoStats::collect(snapshot);
    let readme_excerpt: Option<String> = snapshot
        .readme
        .as_deref()
        .map(|readme| readme.chars().take(README_EXCERPT_CHARS).collect());
    let dimension_scores: serde_json::Map<String, Value> = Dimension::ALL
        .iter()
        .map(|dimension| (dimension.to_string(), json!(scores.get(*dimension))))
        .collect();

    json!({
        "repository": repo.full_name,
        "description": repo.description,
        "primary_language": repo.language,
        "languages": repo.languages,
        "stars": repo.stars,
        "forks": repo.forks,
        "open_issues": repo.open_issues,
        "topics": repo.topics,
        "license": repo.license,
        "file_count": stats.file_count,
        "directory_count": stats.directory_count,
        "test_file_count": stats.test_file_count,
        "top_extensions": stats.extensions.iter().take(5).collect::<Vec<_>>(),
        "contributors": snapshot.contributors.len(),
        "presence": snapshot.flags,
        "scores": dimension_scores,
        "overall_score": scores.overall,
        "readme_excerpt": readme_excerpt,
    })
}

/// Parse and validate a chat-completions reply body
fn parse_reply(body: &str) -> std::result::Result<Narrative, FallbackReason> {
    let chat: ChatResponse = serde_json::from_str(body)
        .map_err(|e| FallbackReason::MalformedResponse(e.to_string()))?;
    let content = chat
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| FallbackReason::MalformedResponse("reply has no message content".to_string()))?;

    let value: Value = serde_json::from_str(strip_code_fence(&content))
        .map_err(|e| FallbackReason::MalformedResponse(e.to_string()))?;
    let narrative: ProviderNarrative = serde_json::from_value(value)
        .map_err(|e| FallbackReason::SchemaMismatch(e.to_string()))?;

    validate(narrative)
}

fn validate(narrative: ProviderNarrative) -> std::result::Result<Narrative, FallbackReason> {
    let mismatch = |msg: &str| Err(FallbackReason::SchemaMismatch(msg.to_string()));

    if narrative.summary.trim().is_empty() {
        return mismatch("summary is empty");
    }
    if narrative.suggestions.is_empty() {
        return mismatch("no suggestions");
    }
    if narrative.suggestions.iter().any(|s| s.trim().is_empty()) {
        return mismatch("empty suggestion");
    }
    for insight in &narrative.insights {
        if insight.title.trim().is_empty() || insight.description.trim().is_empty() {
            return mismatch("insight without title or description");
        }
    }

    let insights = narrative
        .insights
        .into_iter()
        .take(MAX_INSIGHTS)
        .map(|insight| Insight {
            category: insight.category,
            severity: insight.severity,
            title: insight.title,
            description: insight.description,
            suggestion: insight.suggestion.filter(|s| !s.trim().is_empty()),
        })
        .collect();

    Ok(Narrative {
        summary: narrative.summary,
        suggestions: narrative.suggestions.into_iter().take(MAX_SUGGESTIONS).collect(),
        insights,
    })
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
