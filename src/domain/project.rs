//! Project information published on the package index

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static GITHUB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://|git\+https://|git://)?(?:www\.)?github\.com[/:]([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:[/#?].*)?$")
        .unwrap()
});

/// A GitHub repository coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a GitHub URL (`https://github.com/psf/requests`, `git@github.com:psf/requests.git`, ...)
    pub fn from_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let url = url.strip_prefix("git@").unwrap_or(url);
        let caps = GITHUB_URL_RE.captures(url)?;
        Some(Self::new(&caps[1], &caps[2]))
    }

    /// The first GitHub URL among project links, preferring source-like labels
    pub fn from_project_urls<'a>(urls: impl IntoIterator<Item = (&'a str, &'a str)>) -> Option<Self> {
        let mut fallback = None;
        for (label, url) in urls {
            let Some(repo) = Self::from_url(url) else {
                continue;
            };
            let label = label.to_ascii_lowercase();
            if ["source", "repository", "code", "github"]
                .iter()
                .any(|k| label.contains(k))
            {
                return Some(repo);
            }
            fallback.get_or_insert(repo);
        }
        fallback
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Project-level information from the index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    /// Name as the index spells it
    pub name: String,
    /// Version the index reports as current
    pub latest_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Project page on the index
    pub package_url: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub project_urls: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryRef>,
}
