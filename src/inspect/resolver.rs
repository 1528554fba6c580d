//! Field resolution
//!
//! Maps each [`Field`] onto a metadata lookup, a file read or a query on
//! the version engine, reading everything through a [`FieldSource`].

use super::context::FieldSource;
use super::field::Field;
use super::value::FieldValue;
use crate::domain::{MetadataKey, ReleaseHistory};
use crate::error::{InspectError, SiteError};
use crate::site::{record, source};
use crate::version::{ParsedVersion, UpdateFilter};

/// Resolve one field of the package behind `source`
pub async fn resolve_field(
    field: &Field,
    source: &dyn FieldSource,
) -> Result<FieldValue, InspectError> {
    let package = source.package();
    let unavailable = || InspectError::unavailable(package, field.to_string());

    let value = match field {
        Field::SitePath => {
            FieldValue::Path(source.require_distribution("site_path")?.site_packages.clone())
        }
        Field::InstalledVersion => {
            FieldValue::Version(source.require_distribution("installed_version")?.version.clone())
        }
        Field::IsLatest => {
            let installed = source.require_distribution("is_latest")?.version.clone();
            let history = source.releases().await?;
            let latest = newest_stable(&history).ok_or_else(unavailable)?;
            FieldValue::Bool(installed >= latest)
        }
        Field::AvailableUpdates => {
            let installed = source.require_distribution("available_updates")?.version.clone();
            let history = source.releases().await?;
            let updates = UpdateFilter::new().apply(&installed, history.releases());
            FieldValue::Versions(updates.versions().to_vec())
        }
        Field::VersionHistory => FieldValue::Releases(source.releases().await?.releases().to_vec()),
        Field::InitialVersion => {
            let history = source.releases().await?;
            let initial = history.initial().ok_or_else(unavailable)?;
            FieldValue::Version(initial.version.clone())
        }
        Field::LatestVersion => {
            let history = source.releases().await?;
            FieldValue::Version(newest_stable(&history).ok_or_else(unavailable)?)
        }
        Field::TotalVersions => FieldValue::Count(source.releases().await?.total() as u64),
        Field::PackageUrl => FieldValue::Text(source.project().await?.package_url),
        Field::Metadata => FieldValue::Metadata(Box::new(source.metadata()?)),
        Field::Meta(MetadataKey::License) => {
            let meta = source.metadata()?;
            FieldValue::Text(meta.license_name().ok_or_else(unavailable)?)
        }
        Field::Meta(key) => {
            let meta = source.metadata()?;
            FieldValue::Text(meta.get(*key).ok_or_else(unavailable)?)
        }
        Field::DateInstalled => FieldValue::Date(source.installed_at()?),
        Field::TotalSize => {
            let text = source.read_dist_file("RECORD").map_err(|e| match e {
                InspectError::Site(SiteError::FileNotFound { .. }) => unavailable(),
                other => other,
            })?;
            FieldValue::Bytes(record::installed_size(&text))
        }
        Field::RepositoryStats => FieldValue::Repository(Box::new(source.repository_stats().await?)),
        Field::Downloads(None) => {
            FieldValue::DownloadSummary(Box::new(source.download_summary().await?))
        }
        Field::Downloads(Some(kind)) => FieldValue::Downloads(source.downloads(*kind).await?),
        Field::Doc => {
            let code = source.source_code()?;
            FieldValue::Text(source::module_docstring(&code).ok_or_else(unavailable)?)
        }
        Field::SourceFile => FieldValue::Path(source.source_file()?),
        Field::SourceCode => FieldValue::Text(source.source_code()?),
        Field::DistFiles => FieldValue::Files(source.dist_files()?),
        Field::File(name) => {
            let files = source.dist_files()?;
            let found = match_file(&files, name)
                .ok_or_else(|| SiteError::file_not_found(package, name.as_str()))?;
            FieldValue::Text(source.read_dist_file(found)?)
        }
    };
    Ok(value)
}

/// Highest release that is not a pre-release or yanked, else the highest release
fn newest_stable(history: &ReleaseHistory) -> Option<ParsedVersion> {
    history
        .latest_stable()
        .or_else(|| history.latest())
        .map(|r| r.version.clone())
}

/// Case-insensitive match: exact name, then name without extension, then substring
pub fn match_file<'a>(files: &'a [String], wanted: &str) -> Option<&'a str> {
    let wanted = wanted.trim().to_ascii_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let lowered: Vec<String> = files.iter().map(|f| f.to_ascii_lowercase()).collect();

    let exact = lowered.iter().position(|f| *f == wanted);
    let stem = || {
        lowered
            .iter()
            .position(|f| f.rsplit_once('.').map_or(false, |(stem, _)| stem == wanted))
    };
    let partial = || lowered.iter().position(|f| f.contains(&wanted));

    exact
        .or_else(stem)
        .or_else(partial)
        .map(|i| files[i].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CategoryDownloads, Distribution, DownloadKind, DownloadStats, DownloadSummary,
        ProjectInfo, RecentDownloads, Release, RepositoryStats,
    };
    use crate::error::RegistryError;
    use crate::version::parse;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    /// In-memory remote answers over an optional on-disk installation
    struct FakeSource {
        package: String,
        distribution: Option<Distribution>,
        releases: Vec<Release>,
    }

    #[async_trait]
    impl FieldSource for FakeSource {
        fn package(&self) -> &str {
            &self.package
        }

        fn distribution(&self) -> Option<&Distribution> {
            self.distribution.as_ref()
        }

        async fn releases(&self) -> Result<ReleaseHistory, InspectError> {
            Ok(ReleaseHistory::new(self.releases.clone()))
        }

        async fn project(&self) -> Result<ProjectInfo, InspectError> {
            Ok(ProjectInfo {
                name: self.package.clone(),
                latest_version: "2.0".to_string(),
                package_url: format!("https://pypi.org/project/{}/", self.package),
                ..ProjectInfo::default()
            })
        }

        async fn repository_stats(&self) -> Result<RepositoryStats, InspectError> {
            Err(RegistryError::NoRepository {
                package: self.package.clone(),
            }
            .into())
        }

        async fn downloads(&self, kind: DownloadKind) -> Result<DownloadStats, InspectError> {
            Ok(match kind {
                DownloadKind::Recent => DownloadStats::Recent(RecentDownloads {
                    last_day: 1,
                    last_week: 7,
                    last_month: 30,
                }),
                _ => DownloadStats::Categories(vec![CategoryDownloads::new("Linux", 5)]),
            })
        }

        async fn download_summary(&self) -> Result<DownloadSummary, InspectError> {
            Ok(DownloadSummary {
                recent: RecentDownloads::default(),
                overall: vec![],
                python_major: vec![],
                python_minor: vec![],
                system: vec![],
            })
        }
    }

    fn releases() -> Vec<Release> {
        ["0.9", "1.0", "1.5", "2.0", "2.1b1"]
            .iter()
            .map(|v| Release::new(v, None))
            .collect()
    }

    /// `demo 1.0` installed in a temporary site-packages
    fn installed(site: &TempDir) -> FakeSource {
        let dist_info = site.path().join("demo-1.0.dist-info");
        fs::create_dir_all(&dist_info).unwrap();
        fs::write(
            dist_info.join("METADATA"),
            "Metadata-Version: 2.1\nName: demo\nVersion: 1.0\nSummary: A demo\nLicense: MIT\n",
        )
        .unwrap();
        fs::write(dist_info.join("RECORD"), "demo/__init__.py,sha256=x,120\ndemo-1.0.dist-info/RECORD,,\n").unwrap();
        fs::write(dist_info.join("entry_points.txt"), "[console_scripts]\ndemo = demo:main\n").unwrap();
        fs::create_dir_all(site.path().join("demo")).unwrap();
        fs::write(site.path().join("demo/__init__.py"), "\"\"\"Demo package.\"\"\"\n").unwrap();

        FakeSource {
            package: "demo".to_string(),
            distribution: Some(Distribution::new("demo", "1.0", dist_info, site.path())),
            releases: releases(),
        }
    }

    fn remote_only() -> FakeSource {
        FakeSource {
            package: "demo".to_string(),
            distribution: None,
            releases: releases(),
        }
    }

    async fn resolve(field: &str, source: &FakeSource) -> Result<FieldValue, InspectError> {
        resolve_field(&Field::parse(field), source).await
    }

    #[tokio::test]
    async fn test_local_fields() {
        let site = TempDir::new().unwrap();
        let source = installed(&site);

        assert_eq!(
            resolve("site_path", &source).await.unwrap(),
            FieldValue::Path(site.path().to_path_buf())
        );
        assert_eq!(
            resolve("version", &source).await.unwrap(),
            FieldValue::Version(parse("1.0"))
        );
        assert_eq!(resolve("total_size", &source).await.unwrap(), FieldValue::Bytes(120));
        assert_eq!(
            resolve("summary", &source).await.unwrap(),
            FieldValue::Text("A demo".to_string())
        );
        assert_eq!(
            resolve("short_license", &source).await.unwrap(),
            FieldValue::Text("MIT".to_string())
        );
        assert_eq!(
            resolve("doc", &source).await.unwrap(),
            FieldValue::Text("Demo package.".to_string())
        );
        assert!(matches!(
            resolve("date_installed", &source).await.unwrap(),
            FieldValue::Date(_)
        ));
    }

    #[tokio::test]
    async fn test_version_fields() {
        let site = TempDir::new().unwrap();
        let source = installed(&site);

        assert_eq!(
            resolve("available_updates", &source).await.unwrap(),
            FieldValue::Versions(vec![parse("1.5"), parse("2.0")])
        );
        assert_eq!(resolve("is_latest", &source).await.unwrap(), FieldValue::Bool(false));
        assert_eq!(
            resolve("latest_version", &source).await.unwrap(),
            FieldValue::Version(parse("2.0"))
        );
        assert_eq!(
            resolve("initial_version", &source).await.unwrap(),
            FieldValue::Version(parse("0.9"))
        );
        assert_eq!(resolve("total_versions", &source).await.unwrap(), FieldValue::Count(5));
    }

    #[tokio::test]
    async fn test_file_lookup() {
        let site = TempDir::new().unwrap();
        let source = installed(&site);

        let files = resolve("dist_files", &source).await.unwrap();
        assert_eq!(
            files,
            FieldValue::Files(vec![
                "METADATA".to_string(),
                "RECORD".to_string(),
                "entry_points.txt".to_string()
            ])
        );

        let entry_points = resolve("entry_points", &source).await.unwrap();
        assert!(entry_points.to_string().contains("console_scripts"));

        let record = resolve("file:record", &source).await.unwrap();
        assert!(record.to_string().contains("sha256"));

        let err = resolve("INSTALLER", &source).await.unwrap_err();
        assert!(matches!(err, InspectError::Site(SiteError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_remote_only_source() {
        let source = remote_only();

        assert_eq!(resolve("total_versions", &source).await.unwrap(), FieldValue::Count(5));
        assert_eq!(
            resolve("package_url", &source).await.unwrap(),
            FieldValue::Text("https://pypi.org/project/demo/".to_string())
        );
        assert!(matches!(
            resolve("stats-recent", &source).await.unwrap(),
            FieldValue::Downloads(DownloadStats::Recent(_))
        ));

        let err = resolve("site_path", &source).await.unwrap_err();
        assert!(err.is_not_installed());
        let err = resolve("available_updates", &source).await.unwrap_err();
        assert!(err.is_not_installed());
    }

    #[tokio::test]
    async fn test_missing_repository() {
        let err = resolve("github_stats", &remote_only()).await.unwrap_err();
        assert!(err.to_string().contains("no GitHub repository"));
    }

    #[test]
    fn test_match_file() {
        let files: Vec<String> = ["INSTALLER", "METADATA", "RECORD", "top_level.txt", "WHEEL"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(match_file(&files, "record"), Some("RECORD"));
        assert_eq!(match_file(&files, "top_level"), Some("top_level.txt"));
        assert_eq!(match_file(&files, "whe"), Some("WHEEL"));
        assert_eq!(match_file(&files, "license"), None);
        assert_eq!(match_file(&files, ""), None);
    }
}
