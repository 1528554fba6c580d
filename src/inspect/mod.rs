//! Package inspection
//!
//! This module provides:
//! - Field names and typed values ([`Field`], [`FieldValue`], [`Operator`])
//! - The [`FieldSource`] capability trait and its production implementation
//! - Field resolution ([`resolve_field`])
//! - The [`Inspector`], which ties interpreter discovery, registry access
//!   and the version engine together for each user-facing query

mod context;
mod field;
mod resolver;
mod value;

pub use context::{FieldSource, PackageContext, Remotes};
pub use field::Field;
pub use resolver::{match_file, resolve_field};
pub use value::{format_bytes, FieldValue, Operator};

use crate::config::Settings;
use crate::domain::{Distribution, InventoryDiff, PythonInstall};
use crate::error::{InspectError, RegistryError, SiteError};
use crate::registry::{GitHubAdapter, PyPIAdapter, PyPIStatsAdapter};
use crate::site::SiteScanner;
use crate::version::{
    compare_labeled, ComparisonResult, ParsedVersion, UpdateFilter, UpdateSet, VersionSet,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// One field read from two interpreters, optionally checked with an operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub package: String,
    pub field: String,
    pub source: String,
    pub target: String,
    pub source_value: FieldValue,
    pub target_value: FieldValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    /// `source_value <operator> target_value`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holds: Option<bool>,
}

/// Answers queries about installed and published packages
pub struct Inspector {
    scanner: SiteScanner,
    remotes: Remotes,
}

impl Inspector {
    pub fn new(scanner: SiteScanner, remotes: Remotes) -> Self {
        Self { scanner, remotes }
    }

    /// Build the scanner and registry adapters from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, RegistryError> {
        let registry = &settings.registry;
        let remotes = Remotes {
            index: Arc::new(PyPIAdapter::with_base_url(
                registry.http_client()?,
                &registry.pypi_url,
            )),
            repositories: Arc::new(GitHubAdapter::with_base_url(
                registry.github_client()?,
                &registry.github_api_url,
            )),
            downloads: Arc::new(PyPIStatsAdapter::with_base_url(
                registry.http_client()?,
                &registry.pypistats_url,
            )),
        };
        Ok(Self::new(
            SiteScanner::new(settings.python_roots.clone()),
            remotes,
        ))
    }

    pub fn scanner(&self) -> &SiteScanner {
        &self.scanner
    }

    /// Installed interpreters, ascending; an error when there are none
    pub fn pythons(&self) -> Result<Vec<PythonInstall>, InspectError> {
        let pythons = self.scanner.installed_pythons();
        if pythons.is_empty() {
            return Err(self.no_pythons());
        }
        Ok(pythons)
    }

    /// The requested interpreter, or the newest one
    pub fn python(&self, version: Option<&str>) -> Result<PythonInstall, InspectError> {
        match version {
            Some(version) => Ok(self.scanner.find_python(version)?),
            None => self.scanner.newest_python().ok_or_else(|| self.no_pythons()),
        }
    }

    fn no_pythons(&self) -> InspectError {
        let roots: Vec<String> = self
            .scanner
            .roots()
            .iter()
            .map(|r| r.display().to_string())
            .collect();
        InspectError::NoPythons {
            roots: roots.join(", "),
        }
    }

    /// Installed distributions of one interpreter
    pub fn packages(
        &self,
        python: Option<&str>,
    ) -> Result<(PythonInstall, Vec<Distribution>), InspectError> {
        let python = self.python(python)?;
        let dists = self.scanner.distributions(&python)?;
        Ok((python, dists))
    }

    fn locate(&self, package: &str, python: Option<&str>) -> Result<Distribution, InspectError> {
        let python = self.python(python)?;
        Ok(self.scanner.find_distribution(&python, package)?)
    }

    /// Field source for `package`, installed or not
    pub fn context(&self, package: &str, distribution: Option<Distribution>) -> PackageContext {
        PackageContext::new(package, distribution, self.remotes.clone())
    }

    /// Resolve one field of a package installed in `python` (default: newest)
    ///
    /// Fields that do not need a local install are still answered from the
    /// remote sources when the package is missing.
    pub async fn inspect(
        &self,
        package: &str,
        field: &Field,
        python: Option<&str>,
    ) -> Result<FieldValue, InspectError> {
        let distribution = match self.locate(package, python) {
            Ok(dist) => Some(dist),
            Err(e) if !field.needs_install() && can_go_remote(&e, python) => {
                debug!("{} not installed locally, answering {} remotely", package, field);
                None
            }
            Err(e) => return Err(e),
        };
        resolve_field(field, &self.context(package, distribution)).await
    }

    /// Resolve a field without looking at local installs
    pub async fn pypi(&self, package: &str, field: &Field) -> Result<FieldValue, InspectError> {
        resolve_field(field, &self.context(package, None)).await
    }

    /// Versions newer than `current`, or than the version installed in the
    /// newest interpreter when `current` is not given
    pub async fn updates(
        &self,
        package: &str,
        current: Option<&str>,
        filter: &UpdateFilter,
    ) -> Result<UpdateSet, InspectError> {
        let (name, installed) = match current {
            Some(raw) => (package.to_string(), ParsedVersion::parse(raw)),
            None => {
                let dist = self.locate(package, None)?;
                (dist.name, dist.version)
            }
        };
        if installed.is_sentinel() {
            return Err(InspectError::unavailable(package, "installed_version"));
        }
        let history = self.remotes.index.fetch_releases(&name).await?;
        debug!("{} has {} releases", name, history.total());
        Ok(filter.apply(&installed, history.releases()))
    }

    /// Versions of `package` installed in two interpreters
    pub fn compare_package(
        &self,
        package: &str,
        source: &str,
        target: &str,
    ) -> Result<ComparisonResult, InspectError> {
        let (source, target) = self.distinct_pythons(source, target)?;
        let installed = |python: &PythonInstall| -> Result<VersionSet, InspectError> {
            let dists = self.scanner.distributions(python)?;
            Ok(dists
                .into_iter()
                .filter(|d| d.is_named(package))
                .map(|d| d.version)
                .collect())
        };
        let left = installed(&source)?;
        let right = installed(&target)?;
        if left.is_empty() && right.is_empty() {
            return Err(SiteError::package_not_found(
                package,
                format!("{} or {}", source, target),
            )
            .into());
        }
        let (source, target) = (source.to_string(), target.to_string());
        Ok(compare_labeled(
            (source.as_str(), &left),
            (target.as_str(), &right),
        ))
    }

    /// Read one field from two interpreters and optionally compare the values
    pub async fn compare_field(
        &self,
        package: &str,
        field: &Field,
        source: &str,
        target: &str,
        operator: Option<Operator>,
    ) -> Result<FieldComparison, InspectError> {
        let (source, target) = self.distinct_pythons(source, target)?;
        let source_label = source.to_string();
        let target_label = target.to_string();

        let source_value = self.inspect(package, field, Some(&source_label)).await?;
        let target_value = self.inspect(package, field, Some(&target_label)).await?;
        let holds = operator.map(|op| op.apply(&source_value, &target_value));

        Ok(FieldComparison {
            package: package.to_string(),
            field: field.to_string(),
            source: source_label,
            target: target_label,
            source_value,
            target_value,
            operator,
            holds,
        })
    }

    /// Package inventory differences between two interpreters
    pub fn diff(&self, source: &str, target: &str) -> Result<InventoryDiff, InspectError> {
        let (source, target) = self.distinct_pythons(source, target)?;
        let left = self.scanner.distributions(&source)?;
        let right = self.scanner.distributions(&target)?;
        let (source, target) = (source.to_string(), target.to_string());
        Ok(InventoryDiff::between(
            (source.as_str(), &left),
            (target.as_str(), &right),
        ))
    }

    fn distinct_pythons(
        &self,
        source: &str,
        target: &str,
    ) -> Result<(PythonInstall, PythonInstall), InspectError> {
        let source = self.scanner.find_python(source)?;
        let target = self.scanner.find_python(target)?;
        if source.version == target.version {
            return Err(InspectError::SamePython {
                version: source.to_string(),
            });
        }
        Ok((source, target))
    }
}

/// A missing local install may be answered remotely unless the caller
/// named an interpreter that does not exist
fn can_go_remote(err: &InspectError, python: Option<&str>) -> bool {
    err.is_not_installed() || (python.is_none() && matches!(err, InspectError::NoPythons { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DownloadKind, DownloadStats, ProjectInfo, Release, ReleaseHistory, RepositoryRef,
        RepositoryStats,
    };
    use crate::registry::{DownloadStatsSource, PackageIndex, RepositoryHost};
    use crate::version::parse;
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct FakeIndex;

    #[async_trait]
    impl PackageIndex for FakeIndex {
        fn registry_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_releases(&self, package: &str) -> Result<ReleaseHistory, RegistryError> {
            if package.eq_ignore_ascii_case("missing") {
                return Err(RegistryError::package_not_found(package, "fake"));
            }
            Ok(ReleaseHistory::new(
                ["1.0", "1.1", "2.0rc1", "2.0"]
                    .iter()
                    .map(|v| Release::new(v, None))
                    .collect(),
            ))
        }

        async fn fetch_project(&self, package: &str) -> Result<ProjectInfo, RegistryError> {
            Ok(ProjectInfo {
                name: package.to_string(),
                latest_version: "2.0".to_string(),
                package_url: format!("https://example.test/{}", package),
                ..ProjectInfo::default()
            })
        }
    }

    struct FakeHost;

    #[async_trait]
    impl RepositoryHost for FakeHost {
        fn host_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_stats(&self, repo: &RepositoryRef) -> Result<RepositoryStats, RegistryError> {
            Ok(RepositoryStats {
                full_name: repo.to_string(),
                ..RepositoryStats::default()
            })
        }
    }

    struct FakeDownloads;

    #[async_trait]
    impl DownloadStatsSource for FakeDownloads {
        fn source_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_downloads(
            &self,
            _package: &str,
            _kind: DownloadKind,
        ) -> Result<DownloadStats, RegistryError> {
            Ok(DownloadStats::Categories(vec![]))
        }
    }

    fn remotes() -> Remotes {
        Remotes {
            index: Arc::new(FakeIndex),
            repositories: Arc::new(FakeHost),
            downloads: Arc::new(FakeDownloads),
        }
    }

    fn install(root: &Path, python: &str, name: &str, version: &str) {
        let dist_info = root
            .join(python)
            .join(format!("lib/python{}/site-packages", python))
            .join(format!("{}-{}.dist-info", name, version));
        fs::create_dir_all(&dist_info).unwrap();
        fs::write(
            dist_info.join("METADATA"),
            format!("Metadata-Version: 2.1\nName: {}\nVersion: {}\n", name, version),
        )
        .unwrap();
    }

    fn inspector(root: &TempDir) -> Inspector {
        Inspector::new(SiteScanner::new(vec![root.path().to_path_buf()]), remotes())
    }

    fn fixture() -> TempDir {
        let root = TempDir::new().unwrap();
        install(root.path(), "3.11", "requests", "2.28.0");
        install(root.path(), "3.11", "six", "1.16.0");
        install(root.path(), "3.12", "requests", "2.31.0");
        install(root.path(), "3.12", "idna", "3.7");
        root
    }

    #[test]
    fn test_pythons_and_packages() {
        let root = fixture();
        let inspector = inspector(&root);

        let pythons = inspector.pythons().unwrap();
        assert_eq!(pythons.len(), 2);

        let (python, dists) = inspector.packages(None).unwrap();
        assert_eq!(python.to_string(), "3.12");
        let names: Vec<&str> = dists.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["idna", "requests"]);
    }

    #[test]
    fn test_no_pythons() {
        let root = TempDir::new().unwrap();
        let err = inspector(&root).pythons().unwrap_err();
        assert!(matches!(err, InspectError::NoPythons { .. }));
    }

    #[tokio::test]
    async fn test_inspect_installed() {
        let root = fixture();
        let value = inspector(&root)
            .inspect("Requests", &Field::InstalledVersion, Some("3.11"))
            .await
            .unwrap();
        assert_eq!(value, FieldValue::Version(parse("2.28.0")));
    }

    #[tokio::test]
    async fn test_inspect_falls_back_to_remote() {
        let root = fixture();
        let inspector = inspector(&root);

        let value = inspector
            .inspect("flask", &Field::TotalVersions, None)
            .await
            .unwrap();
        assert_eq!(value, FieldValue::Count(4));

        let err = inspector
            .inspect("flask", &Field::InstalledVersion, None)
            .await
            .unwrap_err();
        assert!(matches!(err, InspectError::Site(SiteError::PackageNotFound { .. })));
    }

    #[tokio::test]
    async fn test_unknown_python_is_not_remote() {
        let root = fixture();
        let err = inspector(&root)
            .inspect("flask", &Field::TotalVersions, Some("2.7"))
            .await
            .unwrap_err();
        assert!(matches!(err, InspectError::Site(SiteError::PythonNotFound { .. })));
    }

    #[tokio::test]
    async fn test_updates() {
        let root = fixture();
        let inspector = inspector(&root);

        let updates = inspector
            .updates("requests", Some("1.0"), &UpdateFilter::new())
            .await
            .unwrap();
        assert_eq!(updates.versions(), &[parse("1.1"), parse("2.0")]);

        let updates = inspector
            .updates("requests", Some("1.1"), &UpdateFilter::new().with_prereleases(true))
            .await
            .unwrap();
        assert_eq!(updates.versions(), &[parse("2.0rc1"), parse("2.0")]);

        // installed 2.31.0 is already past everything published
        let updates = inspector
            .updates("requests", None, &UpdateFilter::new())
            .await
            .unwrap();
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_updates_unknown_package() {
        let root = fixture();
        let err = inspector(&root)
            .updates("missing", Some("1.0"), &UpdateFilter::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InspectError::Registry(_)));
    }

    #[test]
    fn test_compare_package() {
        let root = fixture();
        let result = inspector(&root)
            .compare_package("requests", "3.11", "3.12")
            .unwrap();
        assert_eq!(result.source.label, "3.11");
        assert_eq!(result.newer_in_target, vec![parse("2.31.0")]);
        assert_eq!(result.only_in_source, vec![parse("2.28.0")]);
    }

    #[test]
    fn test_compare_package_one_side() {
        let root = fixture();
        let result = inspector(&root).compare_package("six", "3.11", "3.12").unwrap();
        assert_eq!(result.only_in_source, vec![parse("1.16.0")]);
        assert!(result.target.versions.is_empty());

        let err = inspector(&root)
            .compare_package("flask", "3.11", "3.12")
            .unwrap_err();
        assert!(err.is_not_installed());
    }

    #[test]
    fn test_same_python_rejected() {
        let root = fixture();
        let err = inspector(&root).diff("3.12", "python3.12").unwrap_err();
        assert!(matches!(err, InspectError::SamePython { .. }));
    }

    #[tokio::test]
    async fn test_compare_field() {
        let root = fixture();
        let result = inspector(&root)
            .compare_field("requests", &Field::InstalledVersion, "3.11", "3.12", Some(Operator::Lt))
            .await
            .unwrap();
        assert_eq!(result.source_value, FieldValue::Version(parse("2.28.0")));
        assert_eq!(result.holds, Some(true));

        let result = inspector(&root)
            .compare_field("requests", &Field::InstalledVersion, "3.11", "3.12", None)
            .await
            .unwrap();
        assert_eq!(result.holds, None);
    }

    #[test]
    fn test_diff() {
        let root = fixture();
        let diff = inspector(&root).diff("3.11", "3.12").unwrap();
        assert_eq!(diff.only_in_source.len(), 1);
        assert_eq!(diff.only_in_source[0].name, "six");
        assert_eq!(diff.only_in_target[0].name, "idna");
        assert_eq!(diff.changed.len(), 1);
    }
}
