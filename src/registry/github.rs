//! GitHub REST API adapter
//!
//! Repository statistics from https://api.github.com/repos/{owner}/{repo}.
//! Unauthenticated requests are heavily rate limited; a token from the
//! config file or `GITHUB_TOKEN` is sent as a bearer token when present.

use crate::domain::{RepositoryRef, RepositoryStats};
use crate::error::RegistryError;
use crate::registry::{HttpClient, RepositoryHost};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GitHub API base URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub adapter
pub struct GitHubAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    full_name: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    subscribers_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    /// Size in kilobytes
    #[serde(default)]
    size: u64,
    #[serde(default)]
    default_branch: String,
    license: Option<LicenseInfo>,
    #[serde(default)]
    archived: bool,
    created_at: Option<DateTime<Utc>>,
    pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LicenseInfo {
    spdx_id: Option<String>,
    name: Option<String>,
}

impl From<RepoResponse> for RepositoryStats {
    fn from(repo: RepoResponse) -> Self {
        let license = repo.license.and_then(|l| {
            l.spdx_id
                .filter(|id| id != "NOASSERTION")
                .or(l.name)
        });
        RepositoryStats {
            full_name: repo.full_name,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            watchers: repo.subscribers_count,
            open_issues: repo.open_issues_count,
            size_bytes: repo.size * 1024,
            default_branch: repo.default_branch,
            license,
            archived: repo.archived,
            created_at: repo.created_at,
            pushed_at: repo.pushed_at,
        }
    }
}

impl GitHubAdapter {
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, GITHUB_API_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, repo: &RepositoryRef) -> String {
        format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name)
    }
}

#[async_trait]
impl RepositoryHost for GitHubAdapter {
    fn host_name(&self) -> &'static str {
        "GitHub"
    }

    async fn fetch_stats(&self, repo: &RepositoryRef) -> Result<RepositoryStats, RegistryError> {
        let url = self.build_url(repo);
        let response: RepoResponse = self
            .client
            .get_json(&url, &repo.to_string(), self.host_name())
            .await?;
        Ok(response.into())
    }
}
