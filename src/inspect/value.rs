//! Typed field values and comparison operators

use crate::domain::{DownloadStats, DownloadSummary, PackageMetadata, Release, RepositoryStats};
use crate::error::ConfigError;
use crate::version::ParsedVersion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The answer to a [`Field`](super::Field) query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Path(PathBuf),
    Version(ParsedVersion),
    Versions(Vec<ParsedVersion>),
    Releases(Vec<Release>),
    Bool(bool),
    Count(u64),
    Bytes(u64),
    Date(DateTime<Utc>),
    Metadata(Box<PackageMetadata>),
    Repository(Box<RepositoryStats>),
    Downloads(DownloadStats),
    DownloadSummary(Box<DownloadSummary>),
    Files(Vec<String>),
}

/// Human readable byte count (`1.5 MB`)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

impl FieldValue {
    /// Number of items for list values, characters for everything else
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Versions(v) => v.len(),
            FieldValue::Releases(r) => r.len(),
            FieldValue::Files(f) => f.len(),
            FieldValue::Downloads(DownloadStats::Categories(rows)) => rows.len(),
            other => other.to_string().chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Count(n) | FieldValue::Bytes(n) => Some(*n as f64),
            FieldValue::Bool(b) => Some(u8::from(*b) as f64),
            FieldValue::Text(t) => t.trim().parse().ok(),
            _ => None,
        }
    }

    /// Order two values: versions by version order, numbers numerically,
    /// dates chronologically, text lexically, anything else by length
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Version(a), Version(b)) => a.cmp(b),
            (Version(a), Text(b)) => a.cmp(&ParsedVersion::parse(b)),
            (Text(a), Version(b)) => ParsedVersion::parse(a).cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => match (self, other) {
                    (Text(a), Text(b)) => a.cmp(b),
                    (Path(a), Path(b)) => a.cmp(b),
                    _ => self.len().cmp(&other.len()),
                },
            },
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Path(path) => write!(f, "{}", path.display()),
            FieldValue::Version(version) => write!(f, "{}", version),
            FieldValue::Versions(versions) => {
                let list: Vec<&str> = versions.iter().map(|v| v.raw()).collect();
                f.write_str(&list.join(", "))
            }
            FieldValue::Releases(releases) => {
                let lines: Vec<String> = releases
                    .iter()
                    .map(|r| {
                        let date = r
                            .released_at
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "-".to_string());
                        let yanked = if r.yanked { " (yanked)" } else { "" };
                        format!("{:<16} {}{}", r.version, date, yanked)
                    })
                    .collect();
                f.write_str(&lines.join("\n"))
            }
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Count(n) => write!(f, "{}", n),
            FieldValue::Bytes(n) => f.write_str(&format_bytes(*n)),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S UTC")),
            FieldValue::Metadata(meta) => {
                let mut lines = vec![
                    format!("Name: {}", meta.name),
                    format!("Version: {}", meta.version),
                ];
                let optional = [
                    ("Summary", &meta.summary),
                    ("Home-page", &meta.home_page),
                    ("Author", &meta.author),
                    ("Author-email", &meta.author_email),
                    ("Maintainer", &meta.maintainer),
                    ("Requires-Python", &meta.requires_python),
                ];
                for (label, value) in optional {
                    if let Some(value) = value {
                        lines.push(format!("{}: {}", label, value));
                    }
                }
                if let Some(license) = meta.license_name() {
                    lines.push(format!("License: {}", license));
                }
                for dep in &meta.requires_dist {
                    lines.push(format!("Requires-Dist: {}", dep));
                }
                f.write_str(&lines.join("\n"))
            }
            FieldValue::Repository(stats) => {
                let mut lines = vec![
                    format!("Repository: {}", stats.full_name),
                    format!("Stars: {}", stats.stars),
                    format!("Forks: {}", stats.forks),
                    format!("Watchers: {}", stats.watchers),
                    format!("Open issues: {}", stats.open_issues),
                    format!("Size: {}", format_bytes(stats.size_bytes)),
                    format!("Default branch: {}", stats.default_branch),
                ];
                if let Some(license) = &stats.license {
                    lines.push(format!("License: {}", license));
                }
                if stats.archived {
                    lines.push("Archived: yes".to_string());
                }
                if let Some(pushed) = stats.pushed_at {
                    lines.push(format!("Last push: {}", pushed.format("%Y-%m-%d")));
                }
                f.write_str(&lines.join("\n"))
            }
            FieldValue::Downloads(stats) => write_downloads(f, stats),
            FieldValue::DownloadSummary(summary) => {
                writeln!(f, "[recent]")?;
                write_downloads(f, &DownloadStats::Recent(summary.recent))?;
                let sections = [
                    ("overall", &summary.overall),
                    ("python_major", &summary.python_major),
                    ("python_minor", &summary.python_minor),
                    ("system", &summary.system),
                ];
                for (name, rows) in sections {
                    write!(f, "\n[{}]\n", name)?;
                    write_downloads(f, &DownloadStats::Categories(rows.clone()))?;
                }
                Ok(())
            }
            FieldValue::Files(files) => f.write_str(&files.join("\n")),
        }
    }
}

fn write_downloads(f: &mut fmt::Formatter<'_>, stats: &DownloadStats) -> fmt::Result {
    match stats {
        DownloadStats::Recent(recent) => write!(
            f,
            "last_day: {}\nlast_week: {}\nlast_month: {}",
            recent.last_day, recent.last_week, recent.last_month
        ),
        DownloadStats::Categories(rows) => {
            let lines: Vec<String> = rows
                .iter()
                .map(|r| format!("{:<16} {}", r.category, r.downloads))
                .collect();
            f.write_str(&lines.join("\n"))
        }
    }
}

/// Comparison operator for field values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Gt => ">",
        }
    }

    /// Evaluate `left <op> right`
    pub fn apply(&self, left: &FieldValue, right: &FieldValue) -> bool {
        let ordering = left.compare(right);
        match self {
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Gt => ordering == Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "<" | "lt" => Ok(Operator::Lt),
            "<=" | "le" => Ok(Operator::Le),
            "==" | "=" | "eq" => Ok(Operator::Eq),
            "!=" | "ne" => Ok(Operator::Ne),
            ">=" | "ge" => Ok(Operator::Ge),
            ">" | "gt" => Ok(Operator::Gt),
            _ => Err(ConfigError::InvalidOperator {
                value: s.to_string(),
            }),
        }
    }
}
