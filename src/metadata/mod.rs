//! Snapshot fetchers for hosted Git repositories

pub mod github;

pub use github::{fetch_snapshot, parse_repo_slug};
