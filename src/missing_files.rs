//! Missing-file checklist

use crate::types::{Importance, MissingFile, RepositorySnapshot};

/// Report recommended files the repository lacks, most important first
pub fn detect_missing_files(snapshot: &RepositorySnapshot) -> Vec<MissingFile> {
    let flags = &snapshot.flags;
    let checks = [
        (
            snapshot.has_license(),
            "LICENSE",
            Importance::Critical,
            "Without a license nobody can legally use, modify or distribute the code",
        ),
        (
            snapshot.has_readme(),
            "README.md",
            Importance::Critical,
            "Explains what the project does and how to get started",
        ),
        (
            flags.has_gitignore,
            ".gitignore",
            Importance::Critical,
            "Keeps build output, dependencies and secrets out of version control",
        ),
        (
            flags.has_tests,
            "tests/",
            Importance::Critical,
            "Automated tests catch regressions before they reach users",
        ),
        (
            flags.has_ci,
            ".github/workflows/",
            Importance::Recommended,
            "A CI workflow runs builds and tests on every push and pull request",
        ),
        (
            flags.has_env_template,
            ".env.example",
            Importance::Recommended,
            "Documents required environment variables without exposing real values",
        ),
        (
            flags.has_contributing,
            "CONTRIBUTING.md",
            Importance::Recommended,
            "Tells contributors how to set up the project and submit changes",
        ),
        (
            flags.has_changelog,
            "CHANGELOG.md",
            Importance::NiceToHave,
            "Records notable changes between releases",
        ),
        (
            flags.has_dockerfile,
            "Dockerfile",
            Importance::NiceToHave,
            "Provides a reproducible build and runtime environment",
        ),
    ];

    checks
        .into_iter()
        .filter(|(present, ..)| !present)
        .map(|(_, name, importance, description)| MissingFile {
            name: name.to_string(),
            importance,
            description: description.to_string(),
        })
        .collect()
}
