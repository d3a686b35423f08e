//! Domain entities for seaworthy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeaworthyError};

/// A repository identifier parsed from a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Parse a repository reference from a URL containing
    /// `github.com/<owner>/<repo>`.
    ///
    /// Trailing slashes and a `.git` suffix are stripped. Lines that
    /// do not yield a non-empty owner and name are rejected.
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let rest = trimmed
            .split_once("github.com/")
            .map(|(_, rest)| rest)
            .ok_or_else(|| SeaworthyError::InvalidRepoUrl(url.to_string()))?;

        let mut segments = rest.split('/');
        let owner = segments.next().unwrap_or_default();
        let name = segments
            .next()
            .unwrap_or_default()
            .trim_end_matches(".git");

        if owner.is_empty() || name.is_empty() {
            return Err(SeaworthyError::InvalidRepoUrl(url.to_string()));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// A repository contributor with an aggregate commit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Contributor login.
    pub login: String,
    /// Total commits attributed to the contributor.
    pub commit_count: u64,
}

/// A single issue or pull request event used for responsiveness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// When the issue or pull request was opened.
    pub created_at: DateTime<Utc>,
    /// When it was closed, if it has been.
    pub closed_at: Option<DateTime<Utc>>,
    /// Whether the record is a pull request rather than an issue.
    pub is_pull: bool,
}
