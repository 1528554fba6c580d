//! Data sources behind field resolution
//!
//! [`FieldSource`] is the capability interface the resolver reads from.
//! Local lookups have filesystem defaults driven by [`FieldSource::distribution`];
//! implementors supply the remote lookups. [`PackageContext`] is the
//! production implementation, backed by the registry adapters and caching
//! each remote answer for the lifetime of one query.

use crate::domain::{
    Distribution, DownloadKind, DownloadStats, DownloadSummary, PackageMetadata, ProjectInfo,
    ReleaseHistory, RepositoryStats,
};
use crate::error::{InspectError, RegistryError, SiteError};
use crate::registry::{fetch_summary, DownloadStatsSource, PackageIndex, RepositoryHost};
use crate::site;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Everything a field can be resolved from
#[async_trait]
pub trait FieldSource: Send + Sync {
    /// The package name as requested
    fn package(&self) -> &str;

    /// The local installation, if there is one
    fn distribution(&self) -> Option<&Distribution>;

    async fn releases(&self) -> Result<ReleaseHistory, InspectError>;

    async fn project(&self) -> Result<ProjectInfo, InspectError>;

    async fn repository_stats(&self) -> Result<RepositoryStats, InspectError>;

    async fn downloads(&self, kind: DownloadKind) -> Result<DownloadStats, InspectError>;

    async fn download_summary(&self) -> Result<DownloadSummary, InspectError>;

    /// The installation, or an error naming the field that needed it
    fn require_distribution(&self, field: &str) -> Result<&Distribution, InspectError> {
        self.distribution()
            .ok_or_else(|| InspectError::requires_install(self.package(), field))
    }

    /// File names inside the metadata directory, sorted
    fn dist_files(&self) -> Result<Vec<String>, InspectError> {
        let dist = self.require_distribution("dist_files")?;
        if !dist.dist_info.is_dir() {
            // single-file egg-info
            return Ok(dist
                .dist_info
                .file_name()
                .map(|n| vec![n.to_string_lossy().into_owned()])
                .unwrap_or_default());
        }
        let entries =
            fs::read_dir(&dist.dist_info).map_err(|e| SiteError::io(&dist.dist_info, e))?;
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Read a file from the metadata directory by exact name
    fn read_dist_file(&self, name: &str) -> Result<String, InspectError> {
        let dist = self.require_distribution(name)?;
        let path = if dist.dist_info.is_dir() {
            dist.dist_info.join(name)
        } else {
            dist.dist_info.clone()
        };
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SiteError::file_not_found(self.package(), name).into(),
            _ => SiteError::io(path, e).into(),
        })
    }

    /// Parsed METADATA (wheel installs) or PKG-INFO (egg installs)
    fn metadata(&self) -> Result<PackageMetadata, InspectError> {
        let text = self
            .read_dist_file("METADATA")
            .or_else(|_| self.read_dist_file("PKG-INFO"))?;
        Ok(PackageMetadata::parse(&text))
    }

    fn installed_at(&self) -> Result<DateTime<Utc>, InspectError> {
        let dist = self.require_distribution("date_installed")?;
        Ok(site::installed_at(&dist.dist_info)?)
    }

    fn source_file(&self) -> Result<PathBuf, InspectError> {
        let dist = self.require_distribution("source_file")?;
        site::source::locate_source(dist)
            .ok_or_else(|| InspectError::unavailable(self.package(), "source_file"))
    }

    fn source_code(&self) -> Result<String, InspectError> {
        let path = self.source_file()?;
        fs::read_to_string(&path).map_err(|e| SiteError::io(path, e).into())
    }
}

/// The remote services a context talks to
#[derive(Clone)]
pub struct Remotes {
    pub index: Arc<dyn PackageIndex>,
    pub repositories: Arc<dyn RepositoryHost>,
    pub downloads: Arc<dyn DownloadStatsSource>,
}

/// Field source for one package, optionally installed
pub struct PackageContext {
    package: String,
    distribution: Option<Distribution>,
    remotes: Remotes,
    releases: OnceCell<ReleaseHistory>,
    project: OnceCell<ProjectInfo>,
}

impl PackageContext {
    pub fn new(package: impl Into<String>, distribution: Option<Distribution>, remotes: Remotes) -> Self {
        Self {
            package: package.into(),
            distribution,
            remotes,
            releases: OnceCell::new(),
            project: OnceCell::new(),
        }
    }

    /// Name to query remote sources with: the installed spelling when known
    fn remote_name(&self) -> &str {
        self.distribution
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or(&self.package)
    }
}

#[async_trait]
impl FieldSource for PackageContext {
    fn package(&self) -> &str {
        &self.package
    }

    fn distribution(&self) -> Option<&Distribution> {
        self.distribution.as_ref()
    }

    async fn releases(&self) -> Result<ReleaseHistory, InspectError> {
        let history = self
            .releases
            .get_or_try_init(|| self.remotes.index.fetch_releases(self.remote_name()))
            .await?;
        Ok(history.clone())
    }

    async fn project(&self) -> Result<ProjectInfo, InspectError> {
        let project = self
            .project
            .get_or_try_init(|| self.remotes.index.fetch_project(self.remote_name()))
            .await?;
        Ok(project.clone())
    }

    async fn repository_stats(&self) -> Result<RepositoryStats, InspectError> {
        let project = self.project().await?;
        let repo = project.repository.ok_or_else(|| RegistryError::NoRepository {
            package: self.package.clone(),
        })?;
        Ok(self.remotes.repositories.fetch_stats(&repo).await?)
    }

    async fn downloads(&self, kind: DownloadKind) -> Result<DownloadStats, InspectError> {
        Ok(self
            .remotes
            .downloads
            .fetch_downloads(self.remote_name(), kind)
            .await?)
    }

    async fn download_summary(&self) -> Result<DownloadSummary, InspectError> {
        Ok(fetch_summary(self.remotes.downloads.as_ref(), self.remote_name()).await?)
    }
}
