//! Core data types: the repository snapshot and the analysis result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of contributors sampled into a snapshot
pub const CONTRIBUTOR_SAMPLE_SIZE: usize = 10;

/// Complete, pre-fetched view of a repository handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Repository metadata
    pub repository: RepositoryMetadata,
    /// Top contributors, by descending contribution count
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    /// Issues and pull requests
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Recursive listing of the default branch
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// Raw README text
    #[serde(default)]
    pub readme: Option<String>,
    /// Presence flags derived from the tree by whoever built the snapshot
    #[serde(default)]
    pub flags: PresenceFlags,
    /// Instant the snapshot was taken; recency is measured against it
    pub captured_at: DateTime<Utc>,
}

/// Repository-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub open_issues: u64,
    #[serde(default)]
    pub watchers: u64,
    /// Primary language
    #[serde(default)]
    pub language: Option<String>,
    /// Language name to byte count
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
    /// Repository size in kilobytes
    #[serde(default)]
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    /// SPDX license identifier
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// A contributor and their contribution count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u64,
}

/// Issue or pull request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// An issue or pull request; `is_pull_request` disambiguates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub is_pull_request: bool,
}

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A single path in the repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    #[serde(default)]
    pub size: Option<u64>,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size: None,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Boolean presence flags for well-known files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceFlags {
    pub has_license: bool,
    pub has_contributing: bool,
    pub has_changelog: bool,
    pub has_ci: bool,
    pub has_tests: bool,
    pub has_env_template: bool,
    pub has_dockerfile: bool,
    pub has_gitignore: bool,
}

/// The seven scored dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CodeQuality,
    Architecture,
    Documentation,
    Security,
    BestPractices,
    CommunityHealth,
    ProductionReadiness,
}

impl Dimension {
    /// All dimensions in reporting order
    pub const ALL: [Dimension; 7] = [
        Dimension::CodeQuality,
        Dimension::Architecture,
        Dimension::Documentation,
        Dimension::Security,
        Dimension::BestPractices,
        Dimension::CommunityHealth,
        Dimension::ProductionReadiness,
    ];

    /// Weight of this dimension in the overall score, in hundredths
    pub fn weight_percent(self) -> u32 {
        match self {
            Self::CodeQuality => 20,
            Self::Architecture => 15,
            Self::Documentation => 15,
            Self::Security => 15,
            Self::BestPractices => 10,
            Self::CommunityHealth => 10,
            Self::ProductionReadiness => 15,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodeQuality => write!(f, "Code Quality"),
            Self::Architecture => write!(f, "Architecture"),
            Self::Documentation => write!(f, "Documentation"),
            Self::Security => write!(f, "Security"),
            Self::BestPractices => write!(f, "Best Practices"),
            Self::CommunityHealth => write!(f, "Community Health"),
            Self::ProductionReadiness => write!(f, "Production Readiness"),
        }
    }
}

/// One point award or deduction and the condition that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub reason: String,
    pub points: i32,
}

/// Auditable score for a single dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub base: i32,
    pub adjustments: Vec<Adjustment>,
    /// Base plus adjustments, clamped to 0-100
    pub value: u8,
}

impl DimensionScore {
    /// Points awarded for the given reason, if that condition fired
    pub fn points_for(&self, reason: &str) -> Option<i32> {
        self.adjustments
            .iter()
            .find(|adj| adj.reason == reason)
            .map(|adj| adj.points)
    }
}

/// Scores for all seven dimensions plus the weighted overall score (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub code_quality: u8,
    pub architecture: u8,
    pub documentation: u8,
    pub security: u8,
    pub best_practices: u8,
    pub community_health: u8,
    pub production_readiness: u8,
    pub overall: u8,
}

impl ScoreBreakdown {
    /// Score for a single dimension
    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::CodeQuality => self.code_quality,
            Dimension::Architecture => self.architecture,
            Dimension::Documentation => self.documentation,
            Dimension::Security => self.security,
            Dimension::BestPractices => self.best_practices,
            Dimension::CommunityHealth => self.community_health,
            Dimension::ProductionReadiness => self.production_readiness,
        }
    }
}

/// Insight severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Success,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "Critical"),
            Self::Warning => write!(f, "Warning"),
            Self::Info => write!(f, "Info"),
            Self::Success => write!(f, "Success"),
        }
    }
}

/// Area an insight is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightCategory {
    Testing,
    CiCd,
    Licensing,
    Documentation,
    Security,
    Architecture,
    Languages,
    Dependencies,
    Deployment,
    Community,
    Composition,
    Overall,
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Testing => write!(f, "Testing"),
            Self::CiCd => write!(f, "CI/CD"),
            Self::Licensing => write!(f, "Licensing"),
            Self::Documentation => write!(f, "Documentation"),
            Self::Security => write!(f, "Security"),
            Self::Architecture => write!(f, "Architecture"),
            Self::Languages => write!(f, "Languages"),
            Self::Dependencies => write!(f, "Dependencies"),
            Self::Deployment => write!(f, "Deployment"),
            Self::Community => write!(f, "Community"),
            Self::Composition => write!(f, "Composition"),
            Self::Overall => write!(f, "Overall"),
        }
    }
}

/// A categorized, severity-tagged observation about the repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Technology categories for detected stack entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechCategory {
    Language,
    Framework,
    Tool,
    Database,
    Cloud,
    Testing,
    CiCd,
}

impl std::fmt::Display for TechCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Language => write!(f, "language"),
            Self::Framework => write!(f, "framework"),
            Self::Tool => write!(f, "tool"),
            Self::Database => write!(f, "database"),
            Self::Cloud => write!(f, "cloud"),
            Self::Testing => write!(f, "testing"),
            Self::CiCd => write!(f, "ci-cd"),
        }
    }
}

/// A detected technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStackEntry {
    pub name: String,
    pub category: TechCategory,
    /// Detection confidence (0.0-1.0)
    pub confidence: f32,
}

/// How much a missing file matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Importance {
    Critical,
    Recommended,
    NiceToHave,
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Recommended => write!(f, "recommended"),
            Self::NiceToHave => write!(f, "nice-to-have"),
        }
    }
}

/// A recommended file the repository lacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFile {
    pub name: String,
    pub importance: Importance,
    pub description: String,
}

/// Project size bucket derived from the file count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::VeryHigh => write!(f, "very-high"),
        }
    }
}

/// Health tier derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepoHealth {
    Excellent,
    Good,
    Fair,
    NeedsWork,
    Critical,
}

impl std::fmt::Display for RepoHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::NeedsWork => write!(f, "needs-work"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Team size estimate derived from the contributor sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSize {
    #[serde(rename = "Large team (10+)")]
    Large,
    #[serde(rename = "Medium team (5-10)")]
    Medium,
    #[serde(rename = "Small team (2-4)")]
    Small,
    #[serde(rename = "Solo developer")]
    Solo,
}

impl std::fmt::Display for TeamSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Large => write!(f, "Large team (10+)"),
            Self::Medium => write!(f, "Medium team (5-10)"),
            Self::Small => write!(f, "Small team (2-4)"),
            Self::Solo => write!(f, "Solo developer"),
        }
    }
}

/// Summary, suggestions and insights produced for a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub summary: String,
    pub suggestions: Vec<String>,
    pub insights: Vec<Insight>,
}

/// Complete analysis result for one repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub full_name: String,
    pub scores: ScoreBreakdown,
    pub insights: Vec<Insight>,
    pub tech_stack: Vec<TechStackEntry>,
    pub missing_files: Vec<MissingFile>,
    pub summary: String,
    pub suggestions: Vec<String>,
    /// Same value as the documentation score
    pub readme_score: u8,
    pub complexity_level: ComplexityLevel,
    pub estimated_team_size: TeamSize,
    pub repo_health: RepoHealth,
    /// Timestamp when the analysis was performed
    pub analyzed_at: DateTime<Utc>,
    /// Whether the narrative came from the external enhancement provider
    pub ai_powered: bool,
}
