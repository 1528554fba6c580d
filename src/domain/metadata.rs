//! Core metadata of an installed distribution
//!
//! Parses the RFC 822 style header block of a `METADATA` or `PKG-INFO`
//! file. Continuation lines (leading whitespace) are folded into the
//! previous header; the description body after the first blank line is
//! ignored.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single metadata header that can be looked up by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataKey {
    MetadataVersion,
    Name,
    Version,
    Summary,
    HomePage,
    Author,
    AuthorEmail,
    Maintainer,
    License,
    RequiresPython,
    Classifiers,
    Platforms,
    RequiresDist,
    ProjectUrls,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 14] = [
        MetadataKey::MetadataVersion,
        MetadataKey::Name,
        MetadataKey::Version,
        MetadataKey::Summary,
        MetadataKey::HomePage,
        MetadataKey::Author,
        MetadataKey::AuthorEmail,
        MetadataKey::Maintainer,
        MetadataKey::License,
        MetadataKey::RequiresPython,
        MetadataKey::Classifiers,
        MetadataKey::Platforms,
        MetadataKey::RequiresDist,
        MetadataKey::ProjectUrls,
    ];

    /// The header name as it appears in the file
    pub fn header(&self) -> &'static str {
        match self {
            MetadataKey::MetadataVersion => "Metadata-Version",
            MetadataKey::Name => "Name",
            MetadataKey::Version => "Version",
            MetadataKey::Summary => "Summary",
            MetadataKey::HomePage => "Home-page",
            MetadataKey::Author => "Author",
            MetadataKey::AuthorEmail => "Author-email",
            MetadataKey::Maintainer => "Maintainer",
            MetadataKey::License => "License",
            MetadataKey::RequiresPython => "Requires-Python",
            MetadataKey::Classifiers => "Classifier",
            MetadataKey::Platforms => "Platform",
            MetadataKey::RequiresDist => "Requires-Dist",
            MetadataKey::ProjectUrls => "Project-URL",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for MetadataKey {
    type Err = String;

    /// Accepts header names in any case, with `-`, `_` or spaces, singular or plural
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let found = match key.as_str() {
            "metadataversion" => MetadataKey::MetadataVersion,
            "name" => MetadataKey::Name,
            "version" => MetadataKey::Version,
            "summary" => MetadataKey::Summary,
            "homepage" => MetadataKey::HomePage,
            "author" => MetadataKey::Author,
            "authoremail" => MetadataKey::AuthorEmail,
            "maintainer" => MetadataKey::Maintainer,
            "license" | "licenseexpression" => MetadataKey::License,
            "requirespython" => MetadataKey::RequiresPython,
            "classifier" | "classifiers" => MetadataKey::Classifiers,
            "platform" | "platforms" => MetadataKey::Platforms,
            "requiresdist" | "requires" | "dependencies" => MetadataKey::RequiresDist,
            "projecturl" | "projecturls" => MetadataKey::ProjectUrls,
            _ => return Err(format!("unknown metadata key '{}'", s)),
        };
        Ok(found)
    }
}

/// Typed view of a distribution's core metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_version: Option<String>,
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_python: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classifiers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_dist: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub project_urls: BTreeMap<String, String>,
}

/// Header value unless empty or the `UNKNOWN` placeholder
fn known(value: &str) -> Option<String> {
    Some(value.to_string()).filter(|v| !v.is_empty() && v != "UNKNOWN")
}

/// Split the header block into (name, value) pairs, folding continuations
fn headers(text: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = out.last_mut() {
                value.push('\n');
                value.push_str(line.trim());
            }
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            out.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    out
}

impl PackageMetadata {
    /// Parse a METADATA/PKG-INFO file
    pub fn parse(text: &str) -> Self {
        let mut meta = PackageMetadata::default();
        let mut license_expression = None;

        for (name, value) in headers(text) {
            let single = known(&value);
            match name.to_ascii_lowercase().as_str() {
                "metadata-version" => meta.metadata_version = single,
                "name" => meta.name = value,
                "version" => meta.version = value,
                "summary" => meta.summary = single,
                "home-page" => meta.home_page = single,
                "author" => meta.author = single,
                "author-email" => meta.author_email = single,
                "maintainer" => meta.maintainer = single,
                "license" => meta.license = single,
                "license-expression" => license_expression = single,
                "requires-python" => meta.requires_python = single,
                "classifier" => meta.classifiers.push(value),
                "platform" if value != "UNKNOWN" => meta.platforms.push(value),
                "requires-dist" => meta.requires_dist.push(value),
                "project-url" => {
                    if let Some((label, url)) = value.split_once(',') {
                        meta.project_urls
                            .insert(label.trim().to_string(), url.trim().to_string());
                    }
                }
                _ => {}
            }
        }

        if meta.license.is_none() {
            meta.license = license_expression;
        }
        meta
    }

    /// Render one header value as text; list headers are joined by newlines
    pub fn get(&self, key: MetadataKey) -> Option<String> {
        let joined = |items: &[String]| Some(items.join("\n")).filter(|s| !s.is_empty());
        match key {
            MetadataKey::MetadataVersion => self.metadata_version.clone(),
            MetadataKey::Name => Some(self.name.clone()).filter(|s| !s.is_empty()),
            MetadataKey::Version => Some(self.version.clone()).filter(|s| !s.is_empty()),
            MetadataKey::Summary => self.summary.clone(),
            MetadataKey::HomePage => self.home_page.clone(),
            MetadataKey::Author => self.author.clone(),
            MetadataKey::AuthorEmail => self.author_email.clone(),
            MetadataKey::Maintainer => self.maintainer.clone(),
            MetadataKey::License => self.license.clone(),
            MetadataKey::RequiresPython => self.requires_python.clone(),
            MetadataKey::Classifiers => joined(&self.classifiers),
            MetadataKey::Platforms => joined(&self.platforms),
            MetadataKey::RequiresDist => joined(&self.requires_dist),
            MetadataKey::ProjectUrls => {
                let lines: Vec<String> = self
                    .project_urls
                    .iter()
                    .map(|(label, url)| format!("{}, {}", label, url))
                    .collect();
                joined(&lines)
            }
        }
    }

    /// License text, falling back to a `License ::` classifier
    pub fn license_name(&self) -> Option<String> {
        if let Some(license) = &self.license {
            // long licenses embed the whole text; keep the first line
            return license.lines().next().map(|l| l.trim().to_string());
        }
        self.classifiers
            .iter()
            .filter_map(|c| c.strip_prefix("License ::"))
            .filter_map(|c| c.rsplit("::").next())
            .map(|c| c.trim().to_string())
            .next()
    }
}
