//! GitHub-backed implementation of the core DataSource capability.

use crate::CliResult;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use seaworthy_core::{Contributor, DataSource, IssueRecord, Result, SeaworthyError, SourceFuture};
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";
const PAGE_SIZE: u32 = 100;

/// DataSource backed by the GitHub REST API.
pub struct GithubDataSource {
    client: Client,
    token: Option<String>,
    api_base: String,
}

impl GithubDataSource {
    /// Build a new GitHub data source, optionally authenticated.
    pub fn new(token: Option<String>) -> CliResult<Self> {
        let client = Client::builder().user_agent("seaworthy-cli").build()?;
        Ok(Self {
            client,
            token,
            api_base: API_BASE.to_string(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}{path}", self.api_base))
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn fetch_contributors(&self, owner: &str, name: &str) -> Result<Vec<Contributor>> {
        let response = self
            .get(&format!(
                "/repos/{owner}/{name}/contributors?per_page={PAGE_SIZE}&anon=1"
            ))
            .send()
            .await
            .map_err(source_error)?
            .error_for_status()
            .map_err(source_error)?;
        let payload = response
            .json::<Vec<ContributorResponse>>()
            .await
            .map_err(source_error)?;
        Ok(to_contributors(payload))
    }

    async fn fetch_issue_activity(&self, owner: &str, name: &str) -> Result<Vec<IssueRecord>> {
        let response = self
            .get(&format!(
                "/repos/{owner}/{name}/issues?state=all&per_page={PAGE_SIZE}"
            ))
            .send()
            .await
            .map_err(source_error)?
            .error_for_status()
            .map_err(source_error)?;
        let payload = response
            .json::<Vec<IssueResponse>>()
            .await
            .map_err(source_error)?;
        Ok(to_issue_records(payload))
    }

    async fn fetch_license_text(&self, owner: &str, name: &str) -> Result<Option<String>> {
        self.fetch_content(&format!("/repos/{owner}/{name}/license"))
            .await
    }

    async fn fetch_readme(&self, owner: &str, name: &str) -> Result<Option<String>> {
        self.fetch_content(&format!("/repos/{owner}/{name}/readme"))
            .await
    }

    /// Fetch a base64-encoded content payload, mapping 404 to `None`.
    async fn fetch_content(&self, path: &str) -> Result<Option<String>> {
        let response = self.get(path).send().await.map_err(source_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(source_error)?;
        let payload = response
            .json::<ContentResponse>()
            .await
            .map_err(source_error)?;
        Ok(decode_content(&payload))
    }

    async fn fetch_file_listing(&self, owner: &str, name: &str) -> Result<Vec<String>> {
        let repo = self
            .get(&format!("/repos/{owner}/{name}"))
            .send()
            .await
            .map_err(source_error)?
            .error_for_status()
            .map_err(source_error)?
            .json::<RepoResponse>()
            .await
            .map_err(source_error)?;

        let tree = self
            .get(&format!(
                "/repos/{owner}/{name}/git/trees/{}?recursive=1",
                repo.default_branch
            ))
            .send()
            .await
            .map_err(source_error)?
            .error_for_status()
            .map_err(source_error)?
            .json::<TreeResponse>()
            .await
            .map_err(source_error)?;

        Ok(tree_paths(tree))
    }
}

impl DataSource for GithubDataSource {
    fn contributors<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> SourceFuture<'a, Vec<Contributor>> {
        Box::pin(self.fetch_contributors(owner, name))
    }

    fn issue_activity<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> SourceFuture<'a, Vec<IssueRecord>> {
        Box::pin(self.fetch_issue_activity(owner, name))
    }

    fn license_text<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> SourceFuture<'a, Option<String>> {
        Box::pin(self.fetch_license_text(owner, name))
    }

    fn readme<'a>(&'a self, owner: &'a str, name: &'a str) -> SourceFuture<'a, Option<String>> {
        Box::pin(self.fetch_readme(owner, name))
    }

    fn file_listing<'a>(&'a self, owner: &'a str, name: &'a str) -> SourceFuture<'a, Vec<String>> {
        Box::pin(self.fetch_file_listing(owner, name))
    }
}

fn source_error(error: reqwest::Error) -> SeaworthyError {
    SeaworthyError::DataSource(error.to_string())
}

/// Contributor entry from the contributors endpoint.
#[derive(Debug, Deserialize)]
struct ContributorResponse {
    login: Option<String>,
    contributions: u64,
}

/// Issue or pull request entry from the issues endpoint.
#[derive(Debug, Deserialize)]
struct IssueResponse {
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    pull_request: Option<serde_json::Value>,
}

/// Base64-encoded content payload from the readme/license endpoints.
#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: Option<String>,
}

/// Repository metadata, used for the default branch name.
#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
}

/// Recursive git tree listing.
#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

fn to_contributors(payload: Vec<ContributorResponse>) -> Vec<Contributor> {
    payload
        .into_iter()
        .map(|entry| Contributor {
            login: entry.login.unwrap_or_else(|| "anonymous".to_string()),
            commit_count: entry.contributions,
        })
        .collect()
}

fn to_issue_records(payload: Vec<IssueResponse>) -> Vec<IssueRecord> {
    payload
        .into_iter()
        .map(|entry| IssueRecord {
            created_at: entry.created_at,
            closed_at: entry.closed_at,
            is_pull: entry.pull_request.is_some(),
        })
        .collect()
}

/// Decode a base64 content payload; GitHub wraps the body at 60
/// columns, so whitespace is stripped before decoding.
fn decode_content(payload: &ContentResponse) -> Option<String> {
    let encoded: String = payload
        .content
        .as_deref()?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if encoded.is_empty() {
        return None;
    }
    let bytes = STANDARD.decode(encoded).ok()?;
    Some(String::from_utf8_lossy(&bytes).to_string())
}

fn tree_paths(tree: TreeResponse) -> Vec<String> {
    tree.tree
        .into_iter()
        .filter(|entry| entry.kind == "blob")
        .map(|entry| entry.path)
        .collect()
}
