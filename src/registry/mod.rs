//! Remote data sources
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - PyPI JSON API adapter (release history, project information)
//! - GitHub REST adapter (repository statistics)
//! - pypistats.org adapter (download counts)
//!
//! Each source sits behind an async trait so the inspection layer can be
//! exercised against test doubles.

mod client;
mod github;
mod pypi;
mod pypistats;

pub use client::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, MAX_RETRIES};
pub use github::{GitHubAdapter, GITHUB_API_URL};
pub use pypi::{PyPIAdapter, PYPI_URL};
pub use pypistats::{fetch_summary, PyPIStatsAdapter, PYPISTATS_URL};

use crate::domain::{
    DownloadKind, DownloadStats, ProjectInfo, ReleaseHistory, RepositoryRef, RepositoryStats,
};
use crate::error::RegistryError;
use async_trait::async_trait;

/// A package index publishing release history
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch every release of a package
    async fn fetch_releases(&self, package: &str) -> Result<ReleaseHistory, RegistryError>;

    /// Fetch project-level information
    async fn fetch_project(&self, package: &str) -> Result<ProjectInfo, RegistryError>;
}

/// A source code host publishing repository statistics
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    fn host_name(&self) -> &'static str;

    async fn fetch_stats(&self, repo: &RepositoryRef) -> Result<RepositoryStats, RegistryError>;
}

/// A source of package download counts
#[async_trait]
pub trait DownloadStatsSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_downloads(
        &self,
        package: &str,
        kind: DownloadKind,
    ) -> Result<DownloadStats, RegistryError>;
}
