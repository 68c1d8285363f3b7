//! Dimension scorers.
//!
//! Every scorer starts from a fixed base and records one [`Adjustment`] per
//! condition that fired, so each point in a score traces back to a named
//! reason. The final value is clamped to 0-100.

use crate::tables::{
    ERROR_HANDLING_PATTERNS, LINT_CONFIG_PATTERNS, LOCK_FILES, LOGGING_PATTERNS, MANIFEST_FILES,
    RECOGNIZED_DIRECTORIES, SECURITY_POLICY_FILES, TYPED_SUFFIXES,
};
use crate::types::{Adjustment, Dimension, DimensionScore, RepositorySnapshot, ScoreBreakdown};
use tracing::debug;

/// Root-level file count above which the root is considered cluttered
const LOOSE_ROOT_FILE_LIMIT: usize = 15;

/// Accumulates adjustments on top of a base score
struct Ledger {
    dimension: Dimension,
    base: i32,
    adjustments: Vec<Adjustment>,
}

impl Ledger {
    fn new(dimension: Dimension, base: i32) -> Self {
        Self {
            dimension,
            base,
            adjustments: Vec::new(),
        }
    }

    fn apply(&mut self, condition: bool, points: i32, reason: impl Into<String>) {
        if condition {
            self.adjustments.push(Adjustment {
                reason: reason.into(),
                points,
            });
        }
    }

    fn finish(self) -> DimensionScore {
        let raw = self.base + self.adjustments.iter().map(|adj| adj.points).sum::<i32>();
        DimensionScore {
            dimension: self.dimension,
            base: self.base,
            adjustments: self.adjustments,
            value: raw.clamp(0, 100) as u8,
        }
    }
}

/// Score a single dimension (0-100)
pub fn score(dimension: Dimension, snapshot: &RepositorySnapshot) -> u8 {
    breakdown(dimension, snapshot).value
}

/// Score a single dimension with its full adjustment ledger
pub fn breakdown(dimension: Dimension, snapshot: &RepositorySnapshot) -> DimensionScore {
    match dimension {
        Dimension::CodeQuality => code_quality(snapshot),
        Dimension::Architecture => architecture(snapshot),
        Dimension::Documentation => documentation(snapshot),
        Dimension::Security => security(snapshot),
        Dimension::BestPractices => best_practices(snapshot),
        Dimension::CommunityHealth => community_health(snapshot),
        Dimension::ProductionReadiness => production_readiness(snapshot),
    }
}

/// Score all seven dimensions and derive the weighted overall score
pub fn score_all(snapshot: &RepositorySnapshot) -> ScoreBreakdown {
    let [code_quality, architecture, documentation, security, best_practices, community_health, production_readiness] =
        Dimension::ALL.map(|dimension| {
            let value = score(dimension, snapshot);
            debug!("{} score: {}", dimension, value);
            value
        });

    let mut scores = ScoreBreakdown {
        code_quality,
        architecture,
        documentation,
        security,
        best_practices,
        community_health,
        production_readiness,
        overall: 0,
    };
    scores.overall = overall_score(&scores);
    scores
}

/// Weighted overall score, rounded half up.
///
/// Weights are kept in hundredths so the rounding is exact.
pub fn overall_score(scores: &ScoreBreakdown) -> u8 {
    let weighted: u32 = Dimension::ALL
        .iter()
        .map(|&dimension| scores.get(dimension) as u32 * dimension.weight_percent())
        .sum();
    ((weighted + 50) / 100).min(100) as u8
}

fn code_quality(snapshot: &RepositorySnapshot) -> DimensionScore {
    let mut ledger = Ledger::new(Dimension::CodeQuality, 50);

    ledger.apply(
        snapshot.has_top_level_directory("src") || snapshot.has_top_level_directory("lib"),
        10,
        "source directory",
    );
    ledger.apply(snapshot.flags.has_tests, 15, "tests present");
    ledger.apply(
        snapshot.files().any(|entry| {
            let name = entry.file_name().to_lowercase();
            LINT_CONFIG_PATTERNS.iter().any(|pattern| name.contains(pattern))
        }),
        10,
        "lint configuration",
    );
    ledger.apply(
        snapshot.files().any(|entry| {
            let path = entry.path.to_lowercase();
            TYPED_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
        }),
        10,
        "static typing",
    );
    ledger.apply(
        snapshot.root_file_count() > LOOSE_ROOT_FILE_LIMIT,
        -10,
        "cluttered repository root",
    );

    ledger.finish()
}

fn architecture(snapshot: &RepositorySnapshot) -> DimensionScore {
    let mut ledger = Ledger::new(Dimension::Architecture, 40);
    let top_level = snapshot.top_level_directories();

    for dir in RECOGNIZED_DIRECTORIES {
        ledger.apply(top_level.contains(*dir), 5, format!("{}/ directory", dir));
    }
    ledger.apply(
        top_level.contains("src") || (top_level.contains("frontend") && top_level.contains("backend")),
        15,
        "separation of concerns",
    );
    ledger.apply(snapshot.flags.has_gitignore, 5, ".gitignore present");

    ledger.finish()
}

fn documentation(snapshot: &RepositorySnapshot) -> DimensionScore {
    let mut ledger = Ledger::new(Dimension::Documentation, 0);
    let readme_len = snapshot.readme_len();

    if readme_len > 2000 {
        ledger.apply(true, 30, "README over 2000 characters");
    } else if readme_len > 500 {
        ledger.apply(true, 20, "README over 500 characters");
    } else if readme_len > 100 {
        ledger.apply(true, 10, "README over 100 characters");
    }

    if let Some(readme) = snapshot.readme_lower() {
        let mentions = |needles: &[&str]| needles.iter().any(|needle| readme.contains(needle));
        ledger.apply(
            mentions(&["installation", "getting started"]),
            10,
            "installation section",
        );
        ledger.apply(mentions(&["usage", "example"]), 10, "usage section");
        ledger.apply(mentions(&["api", "documentation"]), 5, "API documentation mention");
        ledger.apply(mentions(&["contributing"]), 5, "contributing mention");
        ledger.apply(mentions(&["license"]), 5, "license mention");
        ledger.apply(mentions(&["badge", "shield"]), 5, "badges");
    }

    ledger.apply(snapshot.flags.has_contributing, 10, "contributing guide");
    ledger.apply(snapshot.flags.has_changelog, 10, "changelog");
    ledger.apply(snapshot.has_top_level_directory("docs"), 10, "docs/ directory");

    ledger.finish()
}

fn security(snapshot: &RepositorySnapshot) -> DimensionScore {
    let mut ledger = Ledger::new(Dimension::Security, 50);

    ledger.apply(snapshot.flags.has_gitignore, 10, ".gitignore present");
    ledger.apply(
        snapshot.tracks_env_file() && !snapshot.flags.has_env_template,
        -20,
        "tracked .env file without template",
    );
    ledger.apply(snapshot.flags.has_env_template, 15, "environment template");
    ledger.apply(
        snapshot.has_file_named(SECURITY_POLICY_FILES),
        10,
        "security policy",
    );
    ledger.apply(snapshot.has_file_named(LOCK_FILES), 10, "dependency lock file");
    ledger.apply(snapshot.flags.has_gitignore, 5, "version-control hygiene");

    ledger.finish()
}

fn best_practices(snapshot: &RepositorySnapshot) -> DimensionScore {
    let mut ledger = Ledger::new(Dimension::BestPractices, 30);
    let flags = &snapshot.flags;

    ledger.apply(snapshot.has_license(), 15, "license");
    ledger.apply(flags.has_gitignore, 10, ".gitignore present");
    ledger.apply(flags.has_tests, 15, "tests present");
    ledger.apply(flags.has_ci, 15, "CI configuration");
    ledger.apply(flags.has_env_template, 5, "environment template");
    ledger.apply(flags.has_dockerfile, 5, "Dockerfile");
    ledger.apply(flags.has_contributing, 5, "contributing guide");

    ledger.finish()
}

fn community_health(snapshot: &RepositorySnapshot) -> DimensionScore {
    let mut ledger = Ledger::new(Dimension::CommunityHealth, 30);
    let repo = &snapshot.repository;

    let contributors = snapshot.contributors.len();
    if contributors >= 5 {
        ledger.apply(true, 20, "5+ contributors");
    } else if contributors >= 2 {
        ledger.apply(true, 10, "2+ contributors");
    }

    if repo.stars >= 100 {
        ledger.apply(true, 15, "100+ stars");
    } else if repo.stars >= 10 {
        ledger.apply(true, 10, "10+ stars");
    } else if repo.stars >= 1 {
        ledger.apply(true, 5, "starred");
    }

    let (open, closed) = snapshot.issue_counts();
    ledger.apply(closed > open, 10, "more issues closed than open");

    match snapshot.days_since_push() {
        Some(days) if days < 7 => ledger.apply(true, 15, "pushed within a week"),
        Some(days) if days < 30 => ledger.apply(true, 10, "pushed within a month"),
        Some(days) if days < 90 => ledger.apply(true, 5, "pushed within a quarter"),
        _ => {}
    }

    ledger.apply(!repo.topics.is_empty(), 5, "topics");

    ledger.finish()
}

fn production_readiness(snapshot: &RepositorySnapshot) -> DimensionScore {
    let mut ledger = Ledger::new(Dimension::ProductionReadiness, 20);
    let flags = &snapshot.flags;

    ledger.apply(flags.has_ci, 20, "CI configuration");
    ledger.apply(flags.has_tests, 15, "tests present");
    ledger.apply(flags.has_dockerfile, 10, "Dockerfile");
    ledger.apply(flags.has_env_template, 10, "environment template");
    ledger.apply(flags.has_gitignore, 5, ".gitignore present");
    ledger.apply(snapshot.has_license(), 5, "license");
    ledger.apply(
        snapshot.has_file_named(MANIFEST_FILES),
        5,
        "package manifest",
    );
    ledger.apply(
        snapshot.any_path_contains(ERROR_HANDLING_PATTERNS),
        5,
        "error handling conventions",
    );
    ledger.apply(
        snapshot.any_path_contains(LOGGING_PATTERNS),
        5,
        "logging or monitoring",
    );

    ledger.finish()
}
