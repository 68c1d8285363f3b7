//! # repo_scorecard
//!
//! Deterministic quality scoring for source-code repositories, providing:
//! - **Dimension scores**: Seven 0-100 scores (code quality, architecture, documentation,
//!   security, best practices, community health, production readiness) and a weighted overall
//! - **Insights**: Rule-based findings with severities and actionable suggestions
//! - **Tech stack detection**: Languages, frameworks and tooling inferred from files and README
//! - **Missing files**: A prioritized checklist of conventional repository files
//!
//! The engine is a pure function of a [`RepositorySnapshot`]. An optional enhancement
//! provider may rewrite the narrative, but never the scores.
//!
//! ## Quick Start
//!
//! ```no_run
//! use repo_scorecard::{analyze, fetch_snapshot, NetworkConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let snapshot = fetch_snapshot("rust-lang/cargo", &NetworkConfig::default()).await?;
//! let result = analyze(&snapshot)?;
//!
//! println!("{}: {}/100 ({})", result.full_name, result.scores.overall, result.repo_health);
//! for missing in result.missing_files {
//!     println!("missing {} ({})", missing.name, missing.importance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - Auditable scoring: every point adjustment carries a reason
//! - Snapshots serialize to JSON, so analyses can be replayed offline
//! - GitHub fetcher with retry and rate-limit handling
//! - Bounded, schema-checked narrative enhancement with explicit fallback
//! - CLI tool with multiple output formats (JSON, Markdown)

mod analyzer;
mod config;
mod enhance;
mod error;
mod insights;
mod metadata;
mod missing_files;
mod scoring;
mod snapshot;
mod tables;
mod tech_stack;
mod types;

// Re-export public API
pub use analyzer::{analyze, analyze_with_enhancement};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, EnhancementConfig, NetworkConfig};
pub use enhance::{EnhancementOutcome, Enhancer, FallbackReason};
pub use error::{AnalysisError, Result};
pub use insights::{synthesize, RepoStats, MAX_INSIGHTS, MAX_SUGGESTIONS};
pub use metadata::{fetch_snapshot, parse_repo_slug};
pub use missing_files::detect_missing_files;
pub use scoring::{breakdown, overall_score, score, score_all};
pub use tech_stack::detect_tech_stack;
pub use types::*;
