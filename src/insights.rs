//! Deterministic insight synthesis.
//!
//! Produces the summary, suggestions and insights for a repository using only
//! the snapshot and its scores. Every rule below is evaluated independently and
//! in a fixed order; the output is capped after all rules have run.

use crate::tables::{
    test_framework_for, LOCK_FILES, MANIFEST_LOCKS, SECURITY_POLICY_FILES,
};
use crate::snapshot::is_test_path;
use crate::types::{
    Dimension, Insight, InsightCategory, Narrative, RepoHealth, RepositorySnapshot,
    ScoreBreakdown, Severity,
};
use std::collections::BTreeMap;

/// Maximum number of insights returned
pub const MAX_INSIGHTS: usize = 8;
/// Number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

/// Dimensions at or above this score are reported as strengths
const STRENGTH_THRESHOLD: u8 = 70;
/// Dimensions below this score are reported as weaknesses
const WEAKNESS_THRESHOLD: u8 = 50;

/// Secondary statistics derived once per synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStats {
    pub file_count: usize,
    pub directory_count: usize,
    pub language_count: usize,
    pub test_file_count: usize,
    /// Extension histogram, most common first (ties by extension)
    pub extensions: Vec<(String, usize)>,
}

impl RepoStats {
    pub fn collect(snapshot: &RepositorySnapshot) -> Self {
        let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
        let mut test_file_count = 0;

        for entry in snapshot.files() {
            let path = entry.path.to_lowercase();
            let name = entry.file_name();
            if is_test_path(&path, &name.to_lowercase()) {
                test_file_count += 1;
            }
            if let Some((stem, ext)) = name.rsplit_once('.') {
                if !stem.is_empty() && !ext.is_empty() {
                    *histogram.entry(ext.to_lowercase()).or_default() += 1;
                }
            }
        }

        let mut extensions: Vec<(String, usize)> = histogram.into_iter().collect();
        extensions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            file_count: snapshot.file_count(),
            directory_count: snapshot.directory_count(),
            language_count: snapshot.repository.languages.len(),
            test_file_count,
            extensions,
        }
    }
}

/// Generate the fallback narrative for a repository
pub fn synthesize(snapshot: &RepositorySnapshot, scores: &ScoreBreakdown) -> Narrative {
    let stats = RepoStats::collect(snapshot);
    let mut out = Synthesis::default();

    testing(snapshot, &stats, &mut out);
    continuous_integration(snapshot, &mut out);
    licensing(snapshot, &mut out);
    documentation(snapshot, scores, &mut out);
    security(snapshot, scores, &mut out);
    structure(&stats, &mut out);
    languages(snapshot, &stats, &mut out);
    dependency_hygiene(snapshot, &mut out);
    containerization(snapshot, &stats, &mut out);
    contributors(snapshot, &mut out);
    composition(&stats, &mut out);
    overall(snapshot, scores, &mut out);

    if out.suggestions.len() < MAX_SUGGESTIONS {
        for suggestion in generic_suggestions(snapshot) {
            if out.suggestions.len() == MAX_SUGGESTIONS {
                break;
            }
            out.suggest(suggestion);
        }
    }

    out.insights.truncate(MAX_INSIGHTS);
    out.suggestions.truncate(MAX_SUGGESTIONS);

    Narrative {
        summary: summarize(snapshot, &stats, scores),
        suggestions: out.suggestions,
        insights: out.insights,
    }
}

#[derive(Default)]
struct Synthesis {
    insights: Vec<Insight>,
    suggestions: Vec<String>,
}

impl Synthesis {
    fn insight(
        &mut self,
        category: InsightCategory,
        severity: Severity,
        title: &str,
        description: String,
        suggestion: Option<String>,
    ) {
        self.insights.push(Insight {
            category,
            severity,
            title: title.to_string(),
            description,
            suggestion,
        });
    }

    fn suggest(&mut self, suggestion: String) {
        if !self.suggestions.contains(&suggestion) {
            self.suggestions.push(suggestion);
        }
    }
}

fn testing(snapshot: &RepositorySnapshot, stats: &RepoStats, out: &mut Synthesis) {
    if !snapshot.flags.has_tests {
        let framework = test_framework_for(snapshot.repository.language.as_deref());
        let suggestion = format!("Add automated tests using {} and run them on every change", framework);
        out.insight(
            InsightCategory::Testing,
            Severity::Critical,
            "No automated tests found",
            format!(
                "None of the {} files in {} look like tests. For a {} codebase, {} is a natural starting point; without tests every change risks silent regressions.",
                stats.file_count,
                snapshot.repository.full_name,
                language_label(snapshot),
                framework
            ),
            Some(suggestion.clone()),
        );
        out.suggest(suggestion);
    } else if stats.test_file_count * 10 < stats.file_count {
        out.insight(
            InsightCategory::Testing,
            Severity::Warning,
            "Limited test coverage",
            format!(
                "Only {} of {} files ({}%) look like tests. Core modules are likely exercised only indirectly, if at all.",
                stats.test_file_count,
                stats.file_count,
                percent(stats.test_file_count as u64, stats.file_count as u64)
            ),
            Some("Expand tests around the most frequently changed modules".to_string()),
        );
    } else {
        out.insight(
            InsightCategory::Testing,
            Severity::Success,
            "Test suite present",
            format!(
                "Found {} test files, {}% of all files in the repository.",
                stats.test_file_count,
                percent(stats.test_file_count as u64, stats.file_count as u64)
            ),
            None,
        );
    }
}

fn continuous_integration(snapshot: &RepositorySnapshot, out: &mut Synthesis) {
    if snapshot.flags.has_ci {
        out.insight(
            InsightCategory::CiCd,
            Severity::Success,
            "Continuous integration configured",
            "A CI pipeline verifies changes automatically before they land.".to_string(),
            None,
        );
    } else {
        let suggestion =
            "Set up a CI workflow (for example GitHub Actions) that builds and tests every pull request"
                .to_string();
        out.insight(
            InsightCategory::CiCd,
            Severity::Warning,
            "No continuous integration",
            "No CI configuration (GitHub Actions, GitLab CI, CircleCI, Travis CI or Jenkins) was found, so changes are merged without automated verification.".to_string(),
            Some(suggestion.clone()),
        );
        out.suggest(suggestion);
    }
}

fn licensing(snapshot: &RepositorySnapshot, out: &mut Synthesis) {
    if snapshot.has_license() {
        return;
    }
    let repo = &snapshot.repository;
    let description = if repo.stars > 0 || repo.forks > 0 {
        format!(
            "With {} stars and {} forks, people are already relying on {}, yet without a license they have no legal right to use, modify or share it.",
            repo.stars, repo.forks, repo.full_name
        )
    } else {
        format!(
            "{} has {} stars and {} forks so far. Without a license the code is all rights reserved by default, so nobody can legally use, modify or share it once it gains users.",
            repo.full_name, repo.stars, repo.forks
        )
    };
    out.insight(
        InsightCategory::Licensing,
        Severity::Critical,
        "No license",
        description,
        Some("Add a LICENSE file such as MIT or Apache-2.0".to_string()),
    );
}

fn documentation(snapshot: &RepositorySnapshot, scores: &ScoreBreakdown, out: &mut Synthesis) {
    let score = scores.documentation;

    if score < 50 {
        let readme = snapshot.readme_lower();
        let mentions = |needles: &[&str]| {
            readme
                .as_deref()
                .map(|text| needles.iter().any(|needle| text.contains(needle)))
                .unwrap_or(false)
        };

        let mut missing = Vec::new();
        if readme.is_none() {
            missing.push("a README");
        } else {
            if snapshot.readme_len() <= 500 {
                missing.push("a more detailed README");
            }
            if !mentions(&["installation", "getting started"]) {
                missing.push("installation instructions");
            }
            if !mentions(&["usage", "example"]) {
                missing.push("usage examples");
            }
        }
        if !snapshot.flags.has_contributing {
            missing.push("a CONTRIBUTING guide");
        }
        if !snapshot.flags.has_changelog {
            missing.push("a CHANGELOG");
        }
        if !snapshot.has_top_level_directory("docs") {
            missing.push("a docs/ directory");
        }

        let suggestion = format!(
            "Improve the documentation by adding {}",
            join_list(&missing[..missing.len().min(3)])
        );
        out.insight(
            InsightCategory::Documentation,
            Severity::Warning,
            "Documentation needs work",
            format!(
                "Documentation scores {}/100. Missing: {}.",
                score,
                join_list(&missing)
            ),
            Some(suggestion.clone()),
        );
        out.suggest(suggestion);
    } else if score >= 70 {
        out.insight(
            InsightCategory::Documentation,
            Severity::Success,
            "Well documented",
            format!(
                "Documentation scores {}/100, backed by a {}-character README.",
                score,
                snapshot.readme_len()
            ),
            None,
        );
    }
}

fn security(snapshot: &RepositorySnapshot, scores: &ScoreBreakdown, out: &mut Synthesis) {
    let score = scores.security;
    if score >= 60 {
        return;
    }

    let flags = &snapshot.flags;
    let mut gaps = Vec::new();
    let mut remedies = Vec::new();
    if !flags.has_gitignore {
        gaps.push("no .gitignore");
        remedies.push("add a .gitignore");
    }
    if snapshot.tracks_env_file() && !flags.has_env_template {
        gaps.push("a committed .env file may expose secrets");
        remedies.push("remove the committed .env file and rotate its secrets");
    }
    if !flags.has_env_template {
        gaps.push("no .env.example template");
        remedies.push("add an .env.example template");
    }
    if !snapshot.has_file_named(SECURITY_POLICY_FILES) {
        gaps.push("no SECURITY.md policy");
        remedies.push("publish a SECURITY.md policy");
    }
    if !snapshot.has_file_named(LOCK_FILES) {
        gaps.push("no dependency lock file");
        remedies.push("commit a dependency lock file");
    }

    let severity = if score < 40 {
        Severity::Critical
    } else {
        Severity::Warning
    };
    let suggestion = format!("Harden repository security: {}", join_list(&remedies));
    out.insight(
        InsightCategory::Security,
        severity,
        "Security hygiene gaps",
        format!("Security scores {}/100: {}.", score, join_list(&gaps)),
        Some(suggestion.clone()),
    );
    out.suggest(suggestion);
}

fn structure(stats: &RepoStats, out: &mut Synthesis) {
    if stats.file_count > 100 && stats.directory_count < 5 {
        out.insight(
            InsightCategory::Architecture,
            Severity::Warning,
            "Flat project structure",
            format!(
                "{} files are spread across only {} directories, which makes related code hard to find.",
                stats.file_count, stats.directory_count
            ),
            Some("Group files into directories by feature or layer".to_string()),
        );
    }
}

fn languages(snapshot: &RepositorySnapshot, stats: &RepoStats, out: &mut Synthesis) {
    if stats.language_count <= 5 {
        return;
    }
    let mut by_size: Vec<(&String, &u64)> = snapshot.repository.languages.iter().collect();
    by_size.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let top: Vec<&str> = by_size.iter().take(5).map(|(name, _)| name.as_str()).collect();

    out.insight(
        InsightCategory::Languages,
        Severity::Info,
        "Polyglot codebase",
        format!(
            "{} languages are in use, led by {}. Each extra language adds tooling and onboarding cost.",
            stats.language_count,
            join_list(&top)
        ),
        None,
    );
}

fn dependency_hygiene(snapshot: &RepositorySnapshot, out: &mut Synthesis) {
    let unlocked: Vec<&str> = MANIFEST_LOCKS
        .iter()
        .filter(|(manifest, locks)| snapshot.has_root_file(manifest) && !snapshot.has_file_named(locks))
        .filter_map(|(manifest, _)| {
            snapshot
                .files()
                .find(|entry| !entry.path.contains('/') && entry.path.to_lowercase() == *manifest)
                .map(|entry| entry.path.as_str())
        })
        .collect();

    if unlocked.is_empty() {
        return;
    }
    out.insight(
        InsightCategory::Dependencies,
        Severity::Warning,
        "Missing dependency lock file",
        format!(
            "{} declares dependencies but no matching lock file is committed, so installs are not reproducible.",
            join_list(&unlocked)
        ),
        Some("Commit the lock file generated by your package manager".to_string()),
    );
}

fn containerization(snapshot: &RepositorySnapshot, stats: &RepoStats, out: &mut Synthesis) {
    if !snapshot.flags.has_dockerfile && stats.file_count > 20 {
        out.insight(
            InsightCategory::Deployment,
            Severity::Info,
            "No container definition",
            format!(
                "A Dockerfile would give this {}-file project a reproducible build and runtime environment.",
                stats.file_count
            ),
            Some("Add a Dockerfile for consistent builds and deployments".to_string()),
        );
    }
}

fn contributors(snapshot: &RepositorySnapshot, out: &mut Synthesis) {
    let contributors = &snapshot.contributors;
    if contributors.len() == 1 {
        out.insight(
            InsightCategory::Community,
            Severity::Info,
            "Single contributor",
            format!(
                "Every sampled contribution comes from {}. A bus factor of one puts the project at risk if they step away.",
                contributors[0].login
            ),
            Some("Invite co-maintainers and document tribal knowledge".to_string()),
        );
    } else if contributors.len() >= 5 {
        let total = contributors
            .iter()
            .fold(0u64, |sum, c| sum.saturating_add(c.contributions));
        out.insight(
            InsightCategory::Community,
            Severity::Success,
            "Active contributor community",
            format!(
                "{} contributors are active; the top contributor accounts for {}% of sampled contributions.",
                contributors.len(),
                percent(contributors[0].contributions, total)
            ),
            None,
        );
    }
}

fn composition(stats: &RepoStats, out: &mut Synthesis) {
    let Some((ext, count)) = stats.extensions.first() else {
        return;
    };
    if count * 100 > stats.file_count * 80 {
        out.insight(
            InsightCategory::Composition,
            Severity::Info,
            "Homogeneous codebase",
            format!(
                "{}% of files are .{} files ({} of {}).",
                percent(*count as u64, stats.file_count as u64),
                ext,
                count,
                stats.file_count
            ),
            None,
        );
    }
}

fn overall(snapshot: &RepositorySnapshot, scores: &ScoreBreakdown, out: &mut Synthesis) {
    if scores.overall >= 80 {
        out.insight(
            InsightCategory::Overall,
            Severity::Success,
            "Strong overall quality",
            format!(
                "An overall score of {}/100 puts {} among well-maintained repositories.",
                scores.overall, snapshot.repository.full_name
            ),
            None,
        );
    } else if scores.overall >= 60 {
        let weakest = Dimension::ALL
            .iter()
            .min_by_key(|dimension| scores.get(**dimension))
            .copied()
            .unwrap_or(Dimension::Documentation);
        out.insight(
            InsightCategory::Overall,
            Severity::Info,
            "Solid foundation",
            format!(
                "An overall score of {}/100 shows a solid foundation. {} ({}/100) is the area with the most room to grow.",
                scores.overall,
                weakest,
                scores.get(weakest)
            ),
            None,
        );
    }
}

/// Context-aware generic suggestions used to fill up to five
fn generic_suggestions(snapshot: &RepositorySnapshot) -> Vec<String> {
    let flags = &snapshot.flags;
    let mut suggestions = Vec::new();

    suggestions.push(if snapshot.has_license() {
        "Keep the license and copyright notice current as the project evolves"
    } else {
        "Add a LICENSE file so others know how they may use the project"
    });
    suggestions.push(if flags.has_contributing {
        "Label approachable issues as \"good first issue\" to welcome new contributors"
    } else {
        "Add a CONTRIBUTING.md describing setup, coding style and the pull request process"
    });
    suggestions.push(if flags.has_changelog {
        "Tag releases with semantic version numbers that match the changelog"
    } else {
        "Start a CHANGELOG.md and update it with every release"
    });
    suggestions.push(if flags.has_dockerfile {
        "Use multi-stage Docker builds to keep images small"
    } else {
        "Add a Dockerfile so the project builds and runs the same everywhere"
    });
    suggestions.push(if snapshot.repository.topics.is_empty() {
        "Add repository topics to make the project easier to discover"
    } else {
        "Add build and coverage status badges to the README"
    });
    suggestions.push("Enable automated dependency updates with Dependabot or Renovate");
    suggestions.push("Add issue and pull request templates to standardize contributions");

    suggestions.into_iter().map(String::from).collect()
}

fn summarize(snapshot: &RepositorySnapshot, stats: &RepoStats, scores: &ScoreBreakdown) -> String {
    let language = language_label(snapshot);
    let contributor_count = snapshot.contributors.len();
    let health = RepoHealth::from_score(scores.overall)
        .to_string()
        .replace('-', " ");

    let strengths: Vec<String> = Dimension::ALL
        .iter()
        .filter(|d| scores.get(**d) >= STRENGTH_THRESHOLD)
        .map(|d| d.to_string())
        .collect();
    let weaknesses: Vec<String> = Dimension::ALL
        .iter()
        .filter(|d| scores.get(**d) < WEAKNESS_THRESHOLD)
        .map(|d| d.to_string())
        .collect();

    let strengths = if strengths.is_empty() {
        "No dimension stands out as a strength yet.".to_string()
    } else {
        format!("Strengths: {}.", join_list(&strengths))
    };
    let weaknesses = if weaknesses.is_empty() {
        "No dimension falls below 50.".to_string()
    } else {
        format!("Needs attention: {}.", join_list(&weaknesses))
    };

    format!(
        "{} is {} {} repository with {} file{} and {} contributor{}. It scores {}/100 overall, which rates as {}. {} {}",
        snapshot.repository.full_name,
        article(&language),
        language,
        stats.file_count,
        if stats.file_count == 1 { "" } else { "s" },
        contributor_count,
        if contributor_count == 1 { "" } else { "s" },
        scores.overall,
        health,
        strengths,
        weaknesses
    )
}

fn language_label(snapshot: &RepositorySnapshot) -> String {
    snapshot
        .repository
        .language
        .clone()
        .unwrap_or_else(|| "mixed-language".to_string())
}

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Whole-number percentage, computed in u128 so large counts cannot overflow
fn percent(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        0
    } else {
        (part as u128 * 100 / whole as u128).min(u64::MAX as u128) as u64
    }
}

fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
            last.as_ref()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_all;
    use crate::types::{Contributor, PresenceFlags, RepositoryMetadata, TreeEntry};
    use chrono::{TimeZone, Utc};

    fn snapshot(tree: Vec<TreeEntry>) -> RepositorySnapshot {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        RepositorySnapshot {
            repository: RepositoryMetadata {
                name: "demo".to_string(),
                full_name: "acme/demo".to_string(),
                description: None,
                stars: 12,
                forks: 3,
                open_issues: 0,
                watchers: 0,
                language: Some("Python".to_string()),
                languages: Default::default(),
                size: 0,
                created_at: now,
                updated_at: now,
                pushed_at: None,
                license: None,
                topics: vec![],
            },
            contributors: vec![],
            issues: vec![],
            tree,
            readme: None,
            flags: PresenceFlags::default(),
            captured_at: now,
        }
    }

    fn titles(narrative: &Narrative) -> Vec<&str> {
        narrative.insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_stats_histogram_ordering() {
        let snap = snapshot(vec![
            TreeEntry::file("a.py"),
            TreeEntry::file("b.py"),
            TreeEntry::file("c.md"),
            TreeEntry::file("d.js"),
            TreeEntry::file(".gitignore"),
            TreeEntry::file("tests/test_a.py"),
        ]);
        let stats = RepoStats::collect(&snap);
        assert_eq!(stats.file_count, 6);
        assert_eq!(stats.test_file_count, 1);
        assert_eq!(
            stats.extensions,
            vec![
                ("py".to_string(), 3),
                ("js".to_string(), 1),
                ("md".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_missing_tests_names_framework() {
        let snap = snapshot(vec![TreeEntry::file("app.py")]);
        let narrative = synthesize(&snap, &score_all(&snap));
        let testing = &narrative.insights[0];
        assert_eq!(testing.category, InsightCategory::Testing);
        assert_eq!(testing.severity, Severity::Critical);
        assert!(testing.description.contains("pytest"));
        assert!(narrative.suggestions[0].contains("pytest"));
    }

    #[test]
    fn test_low_coverage_warning() {
        let mut tree: Vec<TreeEntry> = (0..20).map(|i| TreeEntry::file(format!("src/m{}.py", i))).collect();
        tree.push(TreeEntry::file("tests/test_one.py"));
        let mut snap = snapshot(tree);
        snap.flags.has_tests = true;
        let narrative = synthesize(&snap, &score_all(&snap));
        assert_eq!(narrative.insights[0].title, "Limited test coverage");
        assert_eq!(narrative.insights[0].severity, Severity::Warning);
    }

    #[test]
    fn test_license_insight_mentions_stars_and_forks() {
        let snap = snapshot(vec![]);
        let narrative = synthesize(&snap, &score_all(&snap));
        let license = narrative
            .insights
            .iter()
            .find(|i| i.category == InsightCategory::Licensing)
            .unwrap();
        assert_eq!(license.severity, Severity::Critical);
        assert!(license.description.contains("12 stars and 3 forks"));
    }

    #[test]
    fn test_license_insight_cites_zero_counts() {
        let mut snap = snapshot(vec![]);
        snap.repository.stars = 0;
        snap.repository.forks = 0;
        let narrative = synthesize(&snap, &score_all(&snap));
        let license = narrative
            .insights
            .iter()
            .find(|i| i.category == InsightCategory::Licensing)
            .unwrap();
        assert!(license.description.contains("0 stars and 0 forks"));
    }

    #[test]
    fn test_test_files_need_a_test_component() {
        let snap = snapshot(vec![
            TreeEntry::file("src/latest.rs"),
            TreeEntry::file("contest/main.go"),
            TreeEntry::file("pkg/attestation.go"),
            TreeEntry::file("pkg/store_test.go"),
            TreeEntry::file("web/app.spec.ts"),
            TreeEntry::file("spec/models/user.rb"),
        ]);
        let stats = RepoStats::collect(&snap);
        assert_eq!(stats.test_file_count, 3);
    }

    #[test]
    fn test_huge_contribution_counts_do_not_overflow() {
        let mut snap = snapshot(vec![]);
        snap.contributors = (0..6)
            .map(|i| Contributor {
                login: format!("dev{}", i),
                contributions: u64::MAX / 4,
            })
            .collect();
        let narrative = synthesize(&snap, &score_all(&snap));
        let community = narrative
            .insights
            .iter()
            .find(|i| i.title == "Active contributor community")
            .unwrap();
        assert!(community.description.contains("accounts for 24%"));
        assert_eq!(percent(u64::MAX, u64::MAX), 100);
    }

    #[test]
    fn test_documentation_gaps_are_listed() {
        let mut snap = snapshot(vec![]);
        snap.readme = Some("# Demo\nSee the usage example below.".to_string());
        let scores = score_all(&snap);
        assert!(scores.documentation < 50);
        let narrative = synthesize(&snap, &scores);
        let docs = narrative
            .insights
            .iter()
            .find(|i| i.category == InsightCategory::Documentation)
            .unwrap();
        assert!(docs.description.contains("installation instructions"));
        assert!(!docs.description.contains("usage examples"));
        assert!(docs.description.contains("a CHANGELOG"));
    }

    #[test]
    fn test_dependency_hygiene_names_manifest() {
        let mut snap = snapshot(vec![TreeEntry::file("package.json"), TreeEntry::file("index.js")]);
        snap.flags.has_tests = true;
        let narrative = synthesize(&snap, &score_all(&snap));
        let deps = narrative
            .insights
            .iter()
            .find(|i| i.category == InsightCategory::Dependencies)
            .unwrap();
        assert!(deps.description.starts_with("package.json declares"));

        snap.tree.push(TreeEntry::file("yarn.lock"));
        let narrative = synthesize(&snap, &score_all(&snap));
        assert!(!narrative
            .insights
            .iter()
            .any(|i| i.category == InsightCategory::Dependencies));
    }

    #[test]
    fn test_composition_insight() {
        let mut tree: Vec<TreeEntry> = (0..9).map(|i| TreeEntry::file(format!("src/m{}.go", i))).collect();
        tree.push(TreeEntry::file("README.md"));
        let mut snap = snapshot(tree);
        snap.flags.has_tests = true;
        snap.flags.has_ci = true;
        snap.repository.license = Some("MIT".to_string());
        let narrative = synthesize(&snap, &score_all(&snap));
        let composition = narrative
            .insights
            .iter()
            .find(|i| i.category == InsightCategory::Composition)
            .unwrap();
        assert!(composition.description.starts_with("90% of files are .go files"));
    }

    #[test]
    fn test_suggestions_backfilled_without_duplicates() {
        let snap = snapshot(vec![]);
        let narrative = synthesize(&snap, &score_all(&snap));
        assert_eq!(narrative.suggestions.len(), MAX_SUGGESTIONS);
        let mut deduped = narrative.suggestions.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_single_contributor_insight() {
        let mut snap = snapshot(vec![]);
        snap.contributors = vec![Contributor { login: "solo".to_string(), contributions: 42 }];
        let narrative = synthesize(&snap, &score_all(&snap));
        assert!(titles(&narrative).contains(&"Single contributor"));
    }

    #[test]
    fn test_summary_mentions_key_facts() {
        let snap = snapshot(vec![TreeEntry::file("main.py")]);
        let scores = score_all(&snap);
        let narrative = synthesize(&snap, &scores);
        assert!(narrative.summary.starts_with("acme/demo is a Python repository with 1 file and 0 contributors."));
        assert!(narrative.summary.contains(&format!("{}/100", scores.overall)));
        assert!(narrative.summary.contains("Needs attention: Architecture, Documentation"));
    }

    #[test]
    fn test_summary_pluralizes_files() {
        let snap = snapshot(vec![TreeEntry::file("main.py"), TreeEntry::file("util.py")]);
        let narrative = synthesize(&snap, &score_all(&snap));
        assert!(narrative.summary.contains("with 2 files and 0 contributors."));
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list::<&str>(&[]), "");
        assert_eq!(join_list(&["a"]), "a");
        assert_eq!(join_list(&["a", "b", "c"]), "a, b and c");
    }

    #[test]
    fn test_article() {
        assert_eq!(article("Elixir"), "an");
        assert_eq!(article("Rust"), "a");
    }
}
