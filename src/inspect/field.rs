//! Inspectable fields
//!
//! A closed set of known fields plus [`Field::File`], which reads a file
//! from the distribution's metadata directory by name. Parsing never fails:
//! names that are not recognised become file lookups.

use crate::domain::{DownloadKind, MetadataKey};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One thing that can be asked about a package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    /// site-packages directory holding the distribution
    SitePath,
    InstalledVersion,
    /// Whether the installed version is the newest stable release
    IsLatest,
    AvailableUpdates,
    VersionHistory,
    InitialVersion,
    LatestVersion,
    TotalVersions,
    PackageUrl,
    /// Parsed METADATA headers
    Metadata,
    /// A single METADATA header
    Meta(MetadataKey),
    DateInstalled,
    /// Sum of RECORD sizes
    TotalSize,
    RepositoryStats,
    /// One download statistic, or all of them
    Downloads(Option<DownloadKind>),
    /// Docstring of the top-level module
    Doc,
    SourceFile,
    SourceCode,
    /// Names of the files in the metadata directory
    DistFiles,
    /// Contents of a metadata directory file
    File(String),
}

/// Canonical names, in the order `fields` lists them
const NAMES: &[&str] = &[
    "site_path",
    "installed_version",
    "is_latest",
    "available_updates",
    "version_history",
    "initial_version",
    "latest_version",
    "total_versions",
    "package_url",
    "metadata",
    "license",
    "summary",
    "author",
    "author_email",
    "home_page",
    "requires_python",
    "requires_dist",
    "classifiers",
    "project_urls",
    "date_installed",
    "total_size",
    "repository_stats",
    "downloads",
    "downloads_recent",
    "downloads_overall",
    "downloads_python_major",
    "downloads_python_minor",
    "downloads_system",
    "doc",
    "source_file",
    "source_code",
    "dist_files",
    "file:<name>",
];

fn canonical(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

impl Field {
    /// Parse a field name (case-insensitive; `-`, `_` and spaces are equivalent)
    pub fn parse(name: &str) -> Field {
        let trimmed = name.trim();
        if let Some(prefix) = trimmed.get(..5) {
            if prefix.eq_ignore_ascii_case("file:") {
                return Field::File(trimmed[5..].trim().to_string());
            }
        }

        let key = canonical(trimmed);
        if let Some(meta) = key.strip_prefix("meta:") {
            if let Ok(meta) = meta.parse::<MetadataKey>() {
                return Field::Meta(meta);
            }
        }

        match key.as_str() {
            "site_path" | "site" | "path" => Field::SitePath,
            "installed_version" | "version" | "current_version" => Field::InstalledVersion,
            "is_latest" | "is_latest_version" => Field::IsLatest,
            "available_updates" | "updates" | "get_updates" => Field::AvailableUpdates,
            "version_history" | "history" | "releases" => Field::VersionHistory,
            "initial_version" | "first_version" => Field::InitialVersion,
            "latest_version" | "latest" | "latest_release" => Field::LatestVersion,
            "total_versions" | "version_count" => Field::TotalVersions,
            "package_url" | "pypi_url" | "url" => Field::PackageUrl,
            "metadata" | "meta" | "short_meta" => Field::Metadata,
            "license" | "short_license" => Field::Meta(MetadataKey::License),
            "date_installed" | "installed_at" | "installed" => Field::DateInstalled,
            "total_size" | "size" | "installed_size" => Field::TotalSize,
            "repository_stats" | "github_stats" | "github" | "repo_stats" => {
                Field::RepositoryStats
            }
            "downloads" | "all_pypi_stats" | "pypi_stats" | "stats" => Field::Downloads(None),
            "downloads_recent" | "stats_recent" => Field::Downloads(Some(DownloadKind::Recent)),
            "downloads_overall" | "stats_overall" => {
                Field::Downloads(Some(DownloadKind::Overall))
            }
            "downloads_python_major" | "stats_major" | "stats_python_major" => {
                Field::Downloads(Some(DownloadKind::PythonMajor))
            }
            "downloads_python_minor" | "stats_minor" | "stats_python_minor" => {
                Field::Downloads(Some(DownloadKind::PythonMinor))
            }
            "downloads_system" | "stats_system" => Field::Downloads(Some(DownloadKind::System)),
            "doc" | "docs" | "docstring" => Field::Doc,
            "source_file" => Field::SourceFile,
            "source_code" | "source" => Field::SourceCode,
            "dist_files" | "files" => Field::DistFiles,
            other => match other.parse::<MetadataKey>() {
                // "version" is taken above, so this only sees the other headers
                Ok(meta) => Field::Meta(meta),
                Err(_) => Field::File(trimmed.to_string()),
            },
        }
    }

    /// Known field names for listing
    pub fn names() -> &'static [&'static str] {
        NAMES
    }

    /// Fields answered by PyPI, GitHub or pypistats rather than the local install
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Field::IsLatest
                | Field::AvailableUpdates
                | Field::VersionHistory
                | Field::InitialVersion
                | Field::LatestVersion
                | Field::TotalVersions
                | Field::PackageUrl
                | Field::RepositoryStats
                | Field::Downloads(_)
        )
    }

    /// Fields that cannot be answered without a local installation
    pub fn needs_install(&self) -> bool {
        !self.is_remote() || matches!(self, Field::IsLatest | Field::AvailableUpdates)
    }
}

impl FromStr for Field {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Field::parse(s))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::SitePath => f.write_str("site_path"),
            Field::InstalledVersion => f.write_str("installed_version"),
            Field::IsLatest => f.write_str("is_latest"),
            Field::AvailableUpdates => f.write_str("available_updates"),
            Field::VersionHistory => f.write_str("version_history"),
            Field::InitialVersion => f.write_str("initial_version"),
            Field::LatestVersion => f.write_str("latest_version"),
            Field::TotalVersions => f.write_str("total_versions"),
            Field::PackageUrl => f.write_str("package_url"),
            Field::Metadata => f.write_str("metadata"),
            Field::Meta(key) => write!(f, "meta:{}", key),
            Field::DateInstalled => f.write_str("date_installed"),
            Field::TotalSize => f.write_str("total_size"),
            Field::RepositoryStats => f.write_str("repository_stats"),
            Field::Downloads(None) => f.write_str("downloads"),
            Field::Downloads(Some(kind)) => write!(f, "downloads_{}", kind),
            Field::Doc => f.write_str("doc"),
            Field::SourceFile => f.write_str("source_file"),
            Field::SourceCode => f.write_str("source_code"),
            Field::DistFiles => f.write_str("dist_files"),
            Field::File(name) => write!(f, "file:{}", name),
        }
    }
}
