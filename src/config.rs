//! Configuration for repository fetching and the optional enhancement call

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for the analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Network configuration for the GitHub API
    pub network: NetworkConfig,
    /// Optional generative enhancement of the insight narrative
    pub enhancement: EnhancementConfig,
}

/// Network configuration for GitHub API calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL of the GitHub REST API
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of retries for failed requests
    pub max_retries: u32,
    /// Initial delay between retries (milliseconds), doubled on each retry
    pub request_delay_ms: u64,
    /// GitHub API token (optional, for higher rate limits)
    pub github_token: Option<String>,
    /// Number of issues and pull requests sampled per repository
    pub issue_sample_size: u32,
}

/// Configuration for the optional external enhancement provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    /// Whether the enhancement call should be attempted at all
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,
    /// Model identifier sent with each request
    pub model: String,
    /// API key (optional; the call is skipped without one)
    pub api_key: Option<String>,
    /// Hard upper bound for the whole enhancement call, in seconds
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            request_delay_ms: 100,
            github_token: std::env::var("GITHUB_TOKEN").ok(),
            issue_sample_size: 100,
        }
    }
}

impl NetworkConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get request delay as Duration
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        Self {
            enabled: api_key.is_some(),
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key,
            timeout_secs: 15,
        }
    }
}

impl EnhancementConfig {
    /// A configuration that never attempts the external call
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            api_key: None,
            ..Self::default()
        }
    }

    /// Whether enough is configured to attempt the call
    pub fn is_configured(&self) -> bool {
        self.enabled
            && !self.endpoint.trim().is_empty()
            && self
                .api_key
                .as_deref()
                .map(|key| !key.trim().is_empty())
                .unwrap_or(false)
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AnalyzerConfig {
    /// Create a new builder for AnalyzerConfig
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Parse a configuration from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Builder for AnalyzerConfig
#[derive(Default)]
pub struct AnalyzerConfigBuilder {
    network: Option<NetworkConfig>,
    enhancement: Option<EnhancementConfig>,
}

impl AnalyzerConfigBuilder {
    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    pub fn enhancement(mut self, enhancement: EnhancementConfig) -> Self {
        self.enhancement = Some(enhancement);
        self
    }

    pub fn build(self) -> AnalyzerConfig {
        AnalyzerConfig {
            network: self.network.unwrap_or_default(),
            enhancement: self.enhancement.unwrap_or_default(),
        }
    }
}
