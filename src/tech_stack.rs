//! Technology stack detection from languages, file paths and README text

use crate::tables::{FILE_SIGNATURES, README_KEYWORDS};
use crate::types::{RepositorySnapshot, TechCategory, TechStackEntry};
use std::collections::HashSet;

const LANGUAGE_CONFIDENCE: f32 = 0.9;
const FILE_PATTERN_CONFIDENCE: f32 = 0.8;
const README_CONFIDENCE: f32 = 0.6;

/// Detect the technologies a repository uses.
///
/// Entries are ordered languages first (by byte count, largest first), then
/// file signatures and README keywords in table order. Names are unique; the
/// first detection of a name wins.
pub fn detect_tech_stack(snapshot: &RepositorySnapshot) -> Vec<TechStackEntry> {
    let mut stack = TechStack::default();

    let mut languages: Vec<(&String, &u64)> = snapshot.repository.languages.iter().collect();
    languages.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (language, _) in languages {
        stack.push(language, TechCategory::Language, LANGUAGE_CONFIDENCE);
    }

    let paths: Vec<String> = snapshot
        .tree
        .iter()
        .map(|entry| entry.path.to_lowercase())
        .collect();
    for (pattern, name, category) in FILE_SIGNATURES {
        if paths.iter().any(|path| path.contains(pattern)) {
            stack.push(name, *category, FILE_PATTERN_CONFIDENCE);
        }
    }

    if let Some(readme) = snapshot.readme_lower() {
        for (keyword, name, category) in README_KEYWORDS {
            if readme.contains(keyword) {
                stack.push(name, *category, README_CONFIDENCE);
            }
        }
    }

    stack.entries
}

#[derive(Default)]
struct TechStack {
    seen: HashSet<String>,
    entries: Vec<TechStackEntry>,
}

impl TechStack {
    fn push(&mut self, name: &str, category: TechCategory, confidence: f32) {
        if self.seen.insert(name.to_string()) {
            self.entries.push(TechStackEntry {
                name: name.to_string(),
                category,
                confidence,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PresenceFlags, RepositoryMetadata, TreeEntry};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn snapshot(languages: &[(&str, u64)], paths: &[&str], readme: Option<&str>) -> RepositorySnapshot {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        RepositorySnapshot {
            repository: RepositoryMetadata {
                name: "web".to_string(),
                full_name: "acme/web".to_string(),
                description: None,
                stars: 0,
                forks: 0,
                open_issues: 0,
                watchers: 0,
                language: None,
                languages: languages
                    .iter()
                    .map(|(name, bytes)| (name.to_string(), *bytes))
                    .collect::<BTreeMap<_, _>>(),
                size: 0,
                created_at: now,
                updated_at: now,
                pushed_at: None,
                license: None,
                topics: vec![],
            },
            contributors: vec![],
            issues: vec![],
            tree: paths.iter().map(|p| TreeEntry::file(*p)).collect(),
            readme: readme.map(String::from),
            flags: PresenceFlags::default(),
            captured_at: now,
        }
    }

    #[test]
    fn test_languages_ordered_by_bytes() {
        let snap = snapshot(&[("CSS", 100), ("TypeScript", 9000), ("JavaScript", 500)], &[], None);
        let names: Vec<_> = detect_tech_stack(&snap).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["TypeScript", "JavaScript", "CSS"]);
    }

    #[test]
    fn test_file_signatures_and_confidence() {
        let snap = snapshot(&[], &["next.config.js", "Dockerfile", ".github/workflows/ci.yml"], None);
        let stack = detect_tech_stack(&snap);
        let next = stack.iter().find(|e| e.name == "Next.js").unwrap();
        assert_eq!(next.category, TechCategory::Framework);
        assert_eq!(next.confidence, 0.8);
        assert!(stack.iter().any(|e| e.name == "Docker" && e.category == TechCategory::Tool));
        assert!(stack.iter().any(|e| e.name == "GitHub Actions" && e.category == TechCategory::CiCd));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let snap = snapshot(
            &[("TypeScript", 10)],
            &["tsconfig.json", "Dockerfile"],
            Some("Built with Docker and PostgreSQL"),
        );
        let stack = detect_tech_stack(&snap);

        let typescript: Vec<_> = stack.iter().filter(|e| e.name == "TypeScript").collect();
        assert_eq!(typescript.len(), 1);
        assert_eq!(typescript[0].confidence, 0.9);

        let docker = stack.iter().find(|e| e.name == "Docker").unwrap();
        assert_eq!(docker.confidence, 0.8);

        let postgres = stack.iter().find(|e| e.name == "PostgreSQL").unwrap();
        assert_eq!(postgres.confidence, 0.6);
        assert_eq!(postgres.category, TechCategory::Database);
    }

    #[test]
    fn test_empty_snapshot_has_no_stack() {
        assert!(detect_tech_stack(&snapshot(&[], &[], None)).is_empty());
    }
}
