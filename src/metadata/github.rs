//! Build repository snapshots from the GitHub REST API

use crate::config::NetworkConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{
    Contributor, Issue, IssueState, PresenceFlags, RepositoryMetadata, RepositorySnapshot,
    TreeEntry, CONTRIBUTOR_SAMPLE_SIZE,
};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    full_name: String,
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    #[serde(default)]
    subscribers_count: Option<u64>,
    watchers_count: u64,
    language: Option<String>,
    size: u64,
    created_at: String,
    updated_at: String,
    pushed_at: Option<String>,
    license: Option<GitHubLicense>,
    #[serde(default)]
    topics: Vec<String>,
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct GitHubLicense {
    spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubContributor {
    login: Option<String>,
    contributions: u64,
}

#[derive(Debug, Deserialize)]
struct GitHubIssue {
    title: String,
    state: String,
    created_at: String,
    closed_at: Option<String>,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GitHubLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubTree {
    tree: Vec<GitHubTreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubTreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

/// Fetch everything the engine needs for one repository.
///
/// Repository metadata and the file tree are required; contributors, issues,
/// languages and the README degrade to empty when they cannot be fetched.
pub async fn fetch_snapshot(repo: &str, config: &NetworkConfig) -> Result<RepositorySnapshot> {
    let (owner, name) = parse_repo_slug(repo)?;
    info!("Fetching GitHub snapshot for {}/{}", owner, name);

    let client = build_client(config)?;
    let repo_url = format!(
        "{}/repos/{}/{}",
        config.api_base.trim_end_matches('/'),
        urlencoding::encode(&owner),
        urlencoding::encode(&name)
    );
    let slug = format!("{}/{}", owner, name);

    let repo_data: GitHubRepo = get_json(&client, &repo_url, &slug, config).await?;

    let languages: BTreeMap<String, u64> =
        optional(get_json(&client, &format!("{}/languages", repo_url), &slug, config).await, "languages");

    let contributors: Vec<GitHubContributor> = optional(
        get_json(
            &client,
            &format!("{}/contributors?per_page={}", repo_url, CONTRIBUTOR_SAMPLE_SIZE),
            &slug,
            config,
        )
        .await,
        "contributors",
    );

    let issues: Vec<GitHubIssue> = optional(
        get_json(
            &client,
            &format!("{}/issues?state=all&per_page={}", repo_url, config.issue_sample_size),
            &slug,
            config,
        )
        .await,
        "issues",
    );

    let tree = fetch_tree(&client, &repo_url, &repo_data.default_branch, &slug, config).await?;

    let readme = match fetch_readme(&client, &repo_url, config).await {
        Ok(readme) => readme,
        Err(e) => {
            warn!("Could not fetch README for {}: {}", slug, e);
            None
        }
    };

    let flags = PresenceFlags::from_tree(&tree);
    let snapshot = RepositorySnapshot {
        repository: convert_repo(repo_data, languages)?,
        contributors: convert_contributors(contributors),
        issues: issues
            .into_iter()
            .filter_map(|issue| convert_issue(issue).ok())
            .collect(),
        tree,
        readme,
        flags,
        captured_at: Utc::now(),
    };

    debug!(
        "Snapshot for {}: {} tree entries, {} contributors, {} issues",
        slug,
        snapshot.tree.len(),
        snapshot.contributors.len(),
        snapshot.issues.len()
    );

    Ok(snapshot)
}

/// Parse `owner/repo` or a GitHub URL into (owner, repo)
pub fn parse_repo_slug(input: &str) -> Result<(String, String)> {
    // Handle various formats:
    // - owner/repo
    // - https://github.com/owner/repo
    // - https://github.com/owner/repo.git
    // - git@github.com:owner/repo.git

    let input = input.trim().trim_end_matches('/');
    let input = input.trim_end_matches(".git");

    let rest = if let Some((_, rest)) = input.split_once("github.com:") {
        rest
    } else if let Some((_, rest)) = input.split_once("github.com/") {
        rest
    } else if !input.contains("://") {
        input
    } else {
        return Err(AnalysisError::parse(format!("Invalid GitHub repository: {}", input)));
    };

    let parts: Vec<&str> = rest.split('/').filter(|part| !part.is_empty()).collect();
    match parts.as_slice() {
        [owner, repo, ..] => Ok((owner.to_string(), repo.to_string())),
        _ => Err(AnalysisError::parse(format!("Invalid GitHub repository: {}", input))),
    }
}

/// Build HTTP client with GitHub authentication if available
fn build_client(config: &NetworkConfig) -> Result<Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static(JSON_MEDIA_TYPE),
    );

    if let Some(token) = &config.github_token {
        let value = format!("Bearer {}", token)
            .parse()
            .map_err(|_| AnalysisError::config("GitHub token contains invalid header characters"))?;
        headers.insert(reqwest::header::AUTHORIZATION, value);
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout())
        .default_headers(headers)
        .build()
        .map_err(|e| AnalysisError::network(format!("Failed to build HTTP client: {}", e)))
}

/// Send a GET request, retrying transport failures with exponential backoff
async fn send_with_retry(
    client: &Client,
    url: &str,
    accept: &str,
    config: &NetworkConfig,
) -> Result<Response> {
    let mut attempts = 0;
    let mut delay = config.request_delay();

    loop {
        match client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
        {
            Ok(response) => return Ok(response),
            Err(e) => {
                if attempts >= config.max_retries {
                    return Err(AnalysisError::network(format!("GitHub request failed: {}", e)));
                }
                warn!("GitHub request failed, retrying: {}", e);
                tokio::time::sleep(delay).await;
                attempts += 1;
                delay *= 2;
            }
        }
    }
}

/// Map error statuses to typed errors
fn check_status(response: Response, slug: &str) -> Result<Response> {
    let status = response.status();

    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0"));
    if rate_limited {
        let retry_after = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .map(|reset| Duration::from_secs(reset.saturating_sub(Utc::now().timestamp()).max(0) as u64));

        return Err(AnalysisError::RateLimitExceeded {
            service: "GitHub".to_string(),
            retry_after,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AnalysisError::RepositoryNotFound(slug.to_string()));
    }

    if !status.is_success() {
        return Err(AnalysisError::api("GitHub", format!("HTTP {}", status)));
    }

    Ok(response)
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    slug: &str,
    config: &NetworkConfig,
) -> Result<T> {
    debug!("GET {}", url);
    let response = send_with_retry(client, url, JSON_MEDIA_TYPE, config).await?;
    let response = check_status(response, slug)?;
    Ok(response.json().await?)
}

/// Use an optional sub-resource, logging and defaulting on failure
fn optional<T: Default>(result: Result<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not fetch {}: {}", what, e);
            T::default()
        }
    }
}

async fn fetch_tree(
    client: &Client,
    repo_url: &str,
    branch: &str,
    slug: &str,
    config: &NetworkConfig,
) -> Result<Vec<TreeEntry>> {
    let url = format!(
        "{}/git/trees/{}?recursive=1",
        repo_url,
        urlencoding::encode(branch)
    );
    let response = send_with_retry(client, &url, JSON_MEDIA_TYPE, config).await?;

    // 409 Conflict: the repository has no commits yet
    if response.status() == StatusCode::CONFLICT {
        warn!("Repository {} is empty", slug);
        return Ok(Vec::new());
    }

    let tree: GitHubTree = check_status(response, slug)?.json().await?;
    if tree.truncated {
        warn!("File tree for {} was truncated by GitHub", slug);
    }

    Ok(convert_tree(tree.tree))
}

async fn fetch_readme(
    client: &Client,
    repo_url: &str,
    config: &NetworkConfig,
) -> Result<Option<String>> {
    let url = format!("{}/readme", repo_url);
    let response = send_with_retry(client, &url, RAW_MEDIA_TYPE, config).await?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !response.status().is_success() {
        return Err(AnalysisError::api(
            "GitHub",
            format!("README request returned HTTP {}", response.status()),
        ));
    }

    Ok(Some(response.text().await?))
}

fn convert_repo(repo: GitHubRepo, languages: BTreeMap<String, u64>) -> Result<RepositoryMetadata> {
    Ok(RepositoryMetadata {
        created_at: parse_github_datetime(&repo.created_at)?,
        updated_at: parse_github_datetime(&repo.updated_at)?,
        pushed_at: repo.pushed_at.as_deref().map(parse_github_datetime).transpose()?,
        name: repo.name,
        full_name: repo.full_name,
        description: repo.description,
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        open_issues: repo.open_issues_count,
        watchers: repo.subscribers_count.unwrap_or(repo.watchers_count),
        language: repo.language,
        languages,
        size: repo.size,
        license: repo.license.and_then(|license| license.spdx_id),
        topics: repo.topics,
    })
}

/// Drop anonymous entries, order by contributions and keep the sample size
fn convert_contributors(contributors: Vec<GitHubContributor>) -> Vec<Contributor> {
    let mut contributors: Vec<Contributor> = contributors
        .into_iter()
        .filter_map(|c| {
            c.login.filter(|login| !login.is_empty()).map(|login| Contributor {
                login,
                contributions: c.contributions,
            })
        })
        .collect();
    contributors.sort_by(|a, b| b.contributions.cmp(&a.contributions));
    contributors.truncate(CONTRIBUTOR_SAMPLE_SIZE);
    contributors
}

fn convert_issue(issue: GitHubIssue) -> Result<Issue> {
    Ok(Issue {
        state: if issue.state == "closed" {
            IssueState::Closed
        } else {
            IssueState::Open
        },
        created_at: parse_github_datetime(&issue.created_at)?,
        closed_at: issue.closed_at.as_deref().map(parse_github_datetime).transpose()?,
        labels: issue.labels.into_iter().map(|label| label.name).collect(),
        is_pull_request: issue.pull_request.is_some(),
        title: issue.title,
    })
}

/// Keep blobs and trees; submodule commits are skipped
fn convert_tree(entries: Vec<GitHubTreeEntry>) -> Vec<TreeEntry> {
    entries
        .into_iter()
        .filter_map(|entry| match entry.kind.as_str() {
            "blob" => Some(TreeEntry {
                path: entry.path,
                kind: crate::types::EntryKind::File,
                size: entry.size,
            }),
            "tree" => Some(TreeEntry::directory(entry.path)),
            _ => None,
        })
        .collect()
}

/// Parse GitHub datetime format
fn parse_github_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AnalysisError::parse(format!("Invalid GitHub datetime: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(api_base: String) -> NetworkConfig {
        NetworkConfig {
            api_base,
            timeout_secs: 5,
            max_retries: 0,
            request_delay_ms: 1,
            github_token: None,
            issue_sample_size: 100,
        }
    }

    #[test]
    fn test_parse_repo_slug() {
        let test_cases = vec![
            ("rust-lang/cargo", ("rust-lang", "cargo")),
            ("https://github.com/serde-rs/serde", ("serde-rs", "serde")),
            ("https://github.com/serde-rs/serde.git", ("serde-rs", "serde")),
            ("https://github.com/serde-rs/serde/tree/master", ("serde-rs", "serde")),
            ("git@github.com:serde-rs/serde.git", ("serde-rs", "serde")),
        ];

        for (input, expected) in test_cases {
            let result = parse_repo_slug(input).unwrap();
            assert_eq!(result, (expected.0.to_string(), expected.1.to_string()));
        }
    }

    #[test]
    fn test_parse_repo_slug_rejects_garbage() {
        assert!(parse_repo_slug("just-a-name").is_err());
        assert!(parse_repo_slug("https://gitlab.com/owner/repo").is_err());
    }

    #[test]
    fn test_convert_contributors_sorts_and_caps() {
        let raw = (0..15)
            .map(|i| GitHubContributor {
                login: if i == 3 { None } else { Some(format!("dev{}", i)) },
                contributions: i,
            })
            .collect();
        let contributors = convert_contributors(raw);
        assert_eq!(contributors.len(), CONTRIBUTOR_SAMPLE_SIZE);
        assert_eq!(contributors[0].login, "dev14");
        assert!(contributors.windows(2).all(|w| w[0].contributions >= w[1].contributions));
    }

    #[test]
    fn test_convert_tree_skips_submodules() {
        let tree = convert_tree(vec![
            GitHubTreeEntry { path: "src".into(), kind: "tree".into(), size: None },
            GitHubTreeEntry { path: "src/main.rs".into(), kind: "blob".into(), size: Some(120) },
            GitHubTreeEntry { path: "vendor/lib".into(), kind: "commit".into(), size: None },
        ]);
        assert_eq!(tree.len(), 2);
        assert!(!tree[0].is_file());
        assert_eq!(tree[1].size, Some(120));
    }

    #[tokio::test]
    async fn test_fetch_snapshot_from_mock_api() {
        let mut server = mockito::Server::new_async().await;

        let _repo = server
            .mock("GET", "/repos/acme/demo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "demo", "full_name": "acme/demo", "description": "Demo",
                    "stargazers_count": 150, "forks_count": 7, "open_issues_count": 2,
                    "subscribers_count": 9, "watchers_count": 150, "language": "Rust",
                    "size": 321, "created_at": "2022-01-01T00:00:00Z",
                    "updated_at": "2024-05-30T00:00:00Z", "pushed_at": "2024-05-30T00:00:00Z",
                    "license": {"spdx_id": "MIT"}, "topics": ["cli"], "default_branch": "main"
                }"#,
            )
            .create_async()
            .await;
        let _languages = server
            .mock("GET", "/repos/acme/demo/languages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Rust": 12000, "Shell": 300}"#)
            .create_async()
            .await;
        let _contributors = server
            .mock("GET", "/repos/acme/demo/contributors")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"login": "alice", "contributions": 90}, {"login": "bob", "contributions": 10}]"#)
            .create_async()
            .await;
        let _issues = server
            .mock("GET", "/repos/acme/demo/issues")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let _tree = server
            .mock("GET", "/repos/acme/demo/git/trees/main")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"tree": [
                    {"path": "LICENSE", "type": "blob", "size": 1000},
                    {"path": ".gitignore", "type": "blob", "size": 20},
                    {"path": "src", "type": "tree"},
                    {"path": "src/main.rs", "type": "blob", "size": 400},
                    {"path": "tests/cli.rs", "type": "blob", "size": 200}
                ], "truncated": false}"#,
            )
            .create_async()
            .await;
        let _readme = server
            .mock("GET", "/repos/acme/demo/readme")
            .with_status(404)
            .create_async()
            .await;

        let snapshot = fetch_snapshot("acme/demo", &test_config(server.url()))
            .await
            .unwrap();

        assert_eq!(snapshot.repository.full_name, "acme/demo");
        assert_eq!(snapshot.repository.stars, 150);
        assert_eq!(snapshot.repository.watchers, 9);
        assert_eq!(snapshot.repository.license.as_deref(), Some("MIT"));
        assert_eq!(snapshot.repository.languages.get("Rust"), Some(&12000));
        assert_eq!(snapshot.contributors.len(), 2);
        assert!(snapshot.issues.is_empty());
        assert_eq!(snapshot.tree.len(), 5);
        assert!(snapshot.readme.is_none());
        assert!(snapshot.flags.has_license);
        assert!(snapshot.flags.has_gitignore);
        assert!(snapshot.flags.has_tests);
        assert!(!snapshot.flags.has_ci);
        assert!(snapshot.validate().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_snapshot_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _repo = server
            .mock("GET", "/repos/acme/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = fetch_snapshot("acme/missing", &test_config(server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::RepositoryNotFound(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _repo = server
            .mock("GET", "/repos/acme/demo")
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .with_header("x-ratelimit-reset", "0")
            .create_async()
            .await;

        let err = fetch_snapshot("acme/demo", &test_config(server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::RateLimitExceeded { .. }));
    }
}
