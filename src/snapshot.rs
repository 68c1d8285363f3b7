//! Snapshot validation, presence-flag derivation and path queries

use crate::error::{AnalysisError, Result};
use crate::tables::ENV_TEMPLATE_SUFFIXES;
use crate::types::{
    EntryKind, IssueState, PresenceFlags, RepositorySnapshot, TreeEntry, CONTRIBUTOR_SAMPLE_SIZE,
};
use std::collections::BTreeSet;

impl RepositorySnapshot {
    /// Check the documented shape, failing on the first offending field
    pub fn validate(&self) -> Result<()> {
        let repo = &self.repository;

        if repo.name.trim().is_empty() {
            return Err(AnalysisError::validation("repository.name", "must not be empty"));
        }
        if repo.full_name.trim().is_empty() {
            return Err(AnalysisError::validation(
                "repository.full_name",
                "must not be empty",
            ));
        }
        match repo.full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
            _ => {
                return Err(AnalysisError::validation(
                    "repository.full_name",
                    format!("expected `owner/name`, got `{}`", repo.full_name),
                ))
            }
        }
        if repo.languages.keys().any(|lang| lang.trim().is_empty()) {
            return Err(AnalysisError::validation(
                "repository.languages",
                "language names must not be empty",
            ));
        }

        if self.contributors.len() > CONTRIBUTOR_SAMPLE_SIZE {
            return Err(AnalysisError::validation(
                "contributors",
                format!(
                    "at most {} contributors may be sampled, got {}",
                    CONTRIBUTOR_SAMPLE_SIZE,
                    self.contributors.len()
                ),
            ));
        }
        if let Some(index) = self.contributors.iter().position(|c| c.login.trim().is_empty()) {
            return Err(AnalysisError::validation(
                format!("contributors[{}].login", index),
                "must not be empty",
            ));
        }
        if self
            .contributors
            .windows(2)
            .any(|pair| pair[0].contributions < pair[1].contributions)
        {
            return Err(AnalysisError::validation(
                "contributors",
                "must be ordered by descending contribution count",
            ));
        }

        if let Some(index) = self.tree.iter().position(|entry| entry.path.trim().is_empty()) {
            return Err(AnalysisError::validation(
                format!("tree[{}].path", index),
                "must not be empty",
            ));
        }

        for (index, issue) in self.issues.iter().enumerate() {
            if let Some(closed_at) = issue.closed_at {
                if closed_at < issue.created_at {
                    return Err(AnalysisError::validation(
                        format!("issues[{}].closed_at", index),
                        "precedes created_at",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Whether a license is known from either the tree or the metadata
    pub fn has_license(&self) -> bool {
        self.flags.has_license || self.repository.license.is_some()
    }

    pub fn has_readme(&self) -> bool {
        self.readme.is_some()
    }

    /// README length in characters (0 without a README)
    pub fn readme_len(&self) -> usize {
        self.readme.as_deref().map(|r| r.chars().count()).unwrap_or(0)
    }

    /// Lowercased README text, if present
    pub fn readme_lower(&self) -> Option<String> {
        self.readme.as_deref().map(str::to_lowercase)
    }

    pub fn files(&self) -> impl Iterator<Item = &TreeEntry> {
        self.tree.iter().filter(|entry| entry.is_file())
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// Distinct directories: explicit entries plus parents implied by file paths
    pub fn directory_count(&self) -> usize {
        let mut dirs = BTreeSet::new();
        for entry in &self.tree {
            if entry.kind == EntryKind::Directory {
                dirs.insert(entry.path.trim_end_matches('/'));
            }
            let mut path = entry.path.as_str();
            while let Some((parent, _)) = path.rsplit_once('/') {
                if !parent.is_empty() {
                    dirs.insert(parent);
                }
                path = parent;
            }
        }
        dirs.len()
    }

    /// Lowercased names of top-level directories
    pub fn top_level_directories(&self) -> BTreeSet<String> {
        let mut dirs = BTreeSet::new();
        for entry in &self.tree {
            match entry.path.split_once('/') {
                Some((first, _)) if !first.is_empty() => {
                    dirs.insert(first.to_lowercase());
                }
                None if entry.kind == EntryKind::Directory => {
                    dirs.insert(entry.path.to_lowercase());
                }
                _ => {}
            }
        }
        dirs
    }

    /// Whether a top-level directory with this (lowercase) name exists
    pub fn has_top_level_directory(&self, name: &str) -> bool {
        self.top_level_directories().contains(name)
    }

    /// Files sitting directly at the repository root
    pub fn root_file_count(&self) -> usize {
        self.files().filter(|entry| !entry.path.contains('/')).count()
    }

    /// Whether any lowercased path contains one of the patterns
    pub fn any_path_contains(&self, patterns: &[&str]) -> bool {
        self.tree.iter().any(|entry| {
            let path = entry.path.to_lowercase();
            patterns.iter().any(|pattern| path.contains(pattern))
        })
    }

    /// Whether any file name (lowercased) equals one of the names
    pub fn has_file_named(&self, names: &[&str]) -> bool {
        self.files()
            .any(|entry| names.contains(&entry.file_name().to_lowercase().as_str()))
    }

    /// Whether a root-level file (lowercased) equals the name
    pub fn has_root_file(&self, name: &str) -> bool {
        self.files()
            .any(|entry| !entry.path.contains('/') && entry.path.to_lowercase() == name)
    }

    /// Whether a real `.env` file (not a template) is tracked
    pub fn tracks_env_file(&self) -> bool {
        self.files().any(|entry| {
            let name = entry.file_name().to_lowercase();
            (name == ".env" || name.starts_with(".env."))
                && !ENV_TEMPLATE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        })
    }

    /// Days between the last push and the snapshot instant
    pub fn days_since_push(&self) -> Option<i64> {
        self.repository
            .pushed_at
            .map(|pushed| self.captured_at.signed_duration_since(pushed).num_days())
    }

    /// (open, closed) counts of issues, excluding pull requests
    pub fn issue_counts(&self) -> (usize, usize) {
        self.issues
            .iter()
            .filter(|issue| !issue.is_pull_request)
            .fold((0, 0), |(open, closed), issue| match issue.state {
                IssueState::Open => (open + 1, closed),
                IssueState::Closed => (open, closed + 1),
            })
    }
}

impl PresenceFlags {
    /// Derive presence flags from a recursive file listing.
    ///
    /// Used by snapshot builders such as the GitHub fetcher; the engine reads
    /// the stored flags and never calls this itself.
    pub fn from_tree(tree: &[TreeEntry]) -> Self {
        let mut flags = PresenceFlags::default();

        for entry in tree {
            let path = entry.path.to_lowercase();
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            let at_root = !path.contains('/');

            if entry.kind == EntryKind::Directory {
                if is_test_directory(&name) {
                    flags.has_tests = true;
                }
                continue;
            }

            if at_root
                && (name.starts_with("license")
                    || name.starts_with("licence")
                    || name.starts_with("copying"))
            {
                flags.has_license = true;
            }
            if name.starts_with("contributing") {
                flags.has_contributing = true;
            }
            if name.starts_with("changelog") || name == "changes.md" || name == "history.md" {
                flags.has_changelog = true;
            }
            if is_ci_config(&path, &name) {
                flags.has_ci = true;
            }
            if is_test_path(&path, &name) {
                flags.has_tests = true;
            }
            if (name.starts_with(".env") || name.starts_with("env."))
                && ENV_TEMPLATE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
            {
                flags.has_env_template = true;
            }
            if name == "dockerfile" || name.starts_with("dockerfile.") || name.ends_with(".dockerfile") {
                flags.has_dockerfile = true;
            }
            if path == ".gitignore" {
                flags.has_gitignore = true;
            }
        }

        flags
    }
}

fn is_test_directory(name: &str) -> bool {
    matches!(name, "test" | "tests" | "__tests__" | "spec" | "specs")
}

fn is_ci_config(path: &str, name: &str) -> bool {
    (path.starts_with(".github/workflows/") && (name.ends_with(".yml") || name.ends_with(".yaml")))
        || path.starts_with(".circleci/")
        || matches!(
            name,
            ".gitlab-ci.yml" | ".travis.yml" | "jenkinsfile" | "azure-pipelines.yml" | "bitbucket-pipelines.yml"
        )
}

/// Whether a lowercase path sits in a test directory or uses a test file naming convention
pub(crate) fn is_test_path(path: &str, name: &str) -> bool {
    path.split('/')
        .rev()
        .skip(1)
        .any(is_test_directory)
        || (name.starts_with("test_") && name.ends_with(".py"))
        || name.ends_with("_test.go")
        || name.ends_with("_test.py")
        || name.contains(".test.")
        || name.contains(".spec.")
        || name.ends_with("test.java")
        || name.ends_with("_spec.rb")
}
