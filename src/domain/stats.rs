//! Repository and download statistics
//!
//! Typed records for the numbers gathered from GitHub and pypistats.org.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Repository statistics from the GitHub API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryStats {
    pub full_name: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    /// Repository size in bytes
    pub size_bytes: u64,
    pub default_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    pub archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Which pypistats.org endpoint to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadKind {
    /// Downloads in the last day, week and month
    Recent,
    /// Totals with and without mirrors
    Overall,
    /// Totals per Python major version
    PythonMajor,
    /// Totals per Python minor version
    PythonMinor,
    /// Totals per operating system
    System,
}

impl DownloadKind {
    pub const ALL: [DownloadKind; 5] = [
        DownloadKind::Recent,
        DownloadKind::Overall,
        DownloadKind::PythonMajor,
        DownloadKind::PythonMinor,
        DownloadKind::System,
    ];

    /// The endpoint path segment
    pub fn endpoint(&self) -> &'static str {
        match self {
            DownloadKind::Recent => "recent",
            DownloadKind::Overall => "overall",
            DownloadKind::PythonMajor => "python_major",
            DownloadKind::PythonMinor => "python_minor",
            DownloadKind::System => "system",
        }
    }
}

impl fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for DownloadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "recent" => Ok(DownloadKind::Recent),
            "overall" => Ok(DownloadKind::Overall),
            "python_major" | "major" => Ok(DownloadKind::PythonMajor),
            "python_minor" | "minor" => Ok(DownloadKind::PythonMinor),
            "system" => Ok(DownloadKind::System),
            _ => Err(format!("unknown download statistic '{}'", s)),
        }
    }
}

/// Download counts over recent periods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecentDownloads {
    pub last_day: u64,
    pub last_week: u64,
    pub last_month: u64,
}

/// Total downloads for one category (a Python version, an OS, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDownloads {
    pub category: String,
    pub downloads: u64,
}

impl CategoryDownloads {
    pub fn new(category: impl Into<String>, downloads: u64) -> Self {
        Self {
            category: category.into(),
            downloads,
        }
    }
}

/// The result of one download statistics query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DownloadStats {
    Recent(RecentDownloads),
    /// Per-category totals, highest first
    Categories(Vec<CategoryDownloads>),
}

impl DownloadStats {
    /// Sum across categories, or the monthly count for recent stats
    pub fn total(&self) -> u64 {
        match self {
            DownloadStats::Recent(recent) => recent.last_month,
            DownloadStats::Categories(rows) => rows.iter().map(|r| r.downloads).sum(),
        }
    }
}

/// Every download statistic for a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadSummary {
    pub recent: RecentDownloads,
    pub overall: Vec<CategoryDownloads>,
    pub python_major: Vec<CategoryDownloads>,
    pub python_minor: Vec<CategoryDownloads>,
    pub system: Vec<CategoryDownloads>,
}
