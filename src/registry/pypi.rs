//! PyPI JSON API adapter
//!
//! Fetches release history and project information from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::{ProjectInfo, Release, ReleaseHistory, RepositoryRef};
use crate::error::RegistryError;
use crate::registry::{HttpClient, PackageIndex};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// PyPI base URL
pub const PYPI_URL: &str = "https://pypi.org";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: PackageInfo,
    /// Release information keyed by version, in key order
    #[serde(default)]
    releases: BTreeMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    name: String,
    version: String,
    summary: Option<String>,
    home_page: Option<String>,
    package_url: Option<String>,
    project_urls: Option<BTreeMap<String, String>>,
}

/// Release file information
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    /// Upload time for the release file
    upload_time_iso_8601: Option<String>,
    #[serde(default)]
    yanked: bool,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter against pypi.org
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_URL)
    }

    /// Create an adapter against another index (a mirror or a test server)
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package)
    }

    async fn fetch_response(&self, package: &str) -> Result<PyPIResponse, RegistryError> {
        let url = self.build_url(package);
        self.client
            .get_json(&url, package, self.registry_name())
            .await
    }
}

/// Earliest upload time across a release's files
fn earliest_upload(files: &[ReleaseFile]) -> Option<DateTime<Utc>> {
    files
        .iter()
        .filter_map(|f| f.upload_time_iso_8601.as_deref())
        .filter_map(|t| t.parse::<DateTime<Utc>>().ok())
        .min()
}

fn to_releases(releases: BTreeMap<String, Vec<ReleaseFile>>) -> ReleaseHistory {
    let releases = releases
        .into_iter()
        .map(|(version, files)| {
            let release = Release::new(&version, earliest_upload(&files));
            // a release is yanked when every file it shipped is yanked
            if !files.is_empty() && files.iter().all(|f| f.yanked) {
                release.yanked()
            } else {
                release
            }
        })
        .collect();
    ReleaseHistory::new(releases)
}

fn to_project(info: PackageInfo) -> ProjectInfo {
    let project_urls = info.project_urls.unwrap_or_default();
    let repository = RepositoryRef::from_project_urls(
        project_urls
            .iter()
            .map(|(label, url)| (label.as_str(), url.as_str()))
            .chain(info.home_page.as_deref().map(|url| ("Homepage", url))),
    );
    let package_url = info
        .package_url
        .unwrap_or_else(|| format!("https://pypi.org/project/{}/", info.name));

    ProjectInfo {
        name: info.name,
        latest_version: info.version,
        summary: info.summary.filter(|s| !s.is_empty()),
        package_url,
        project_urls,
        repository,
    }
}

#[async_trait]
impl PackageIndex for PyPIAdapter {
    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_releases(&self, package: &str) -> Result<ReleaseHistory, RegistryError> {
        let response = self.fetch_response(package).await?;
        let history = to_releases(response.releases);
        debug!("{} has {} releases on PyPI", package, history.total());
        Ok(history)
    }

    async fn fetch_project(&self, package: &str) -> Result<ProjectInfo, RegistryError> {
        let response = self.fetch_response(package).await?;
        Ok(to_project(response.info))
    }
}
