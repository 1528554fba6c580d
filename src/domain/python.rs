//! Installed Python interpreters and their distributions

use crate::version::ParsedVersion;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One interpreter version found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PythonInstall {
    /// Interpreter version as `major.minor`
    pub version: ParsedVersion,
    /// Every site-packages directory belonging to this version
    pub site_packages: Vec<PathBuf>,
}

impl PythonInstall {
    pub fn new(version: &str, site_packages: Vec<PathBuf>) -> Self {
        Self {
            version: ParsedVersion::parse(version),
            site_packages,
        }
    }

    /// True when `query` names this interpreter (`3.11`, `python3.11`, `3.11.4`)
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        let query = query
            .strip_prefix("python")
            .or_else(|| query.strip_prefix("Python"))
            .unwrap_or(query);
        let wanted = ParsedVersion::parse(query);
        if wanted == self.version {
            return true;
        }
        // a patch-level query matches its major.minor interpreter
        let release = wanted.release();
        release.len() > 2 && ParsedVersion::parse(&format!("{}.{}", release[0], release[1])) == self.version
    }
}

impl fmt::Display for PythonInstall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Package name normalisation (PEP 503): lowercase, runs of `-_.` become `-`
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('-');
        }
        pending_sep = false;
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// An installed distribution (one `*.dist-info` or `*.egg-info` directory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    /// Project name as spelled in the directory name
    pub name: String,
    pub version: ParsedVersion,
    /// The metadata directory
    pub dist_info: PathBuf,
    /// The site-packages directory containing it
    pub site_packages: PathBuf,
}

impl Distribution {
    pub fn new(
        name: impl Into<String>,
        version: &str,
        dist_info: impl Into<PathBuf>,
        site_packages: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: ParsedVersion::parse(version),
            dist_info: dist_info.into(),
            site_packages: site_packages.into(),
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// True when `name` refers to this distribution after normalisation
    pub fn is_named(&self, name: &str) -> bool {
        self.normalized_name() == normalize_name(name)
    }

    pub fn dist_info(&self) -> &Path {
        &self.dist_info
    }

    /// True for legacy `*.egg-info` metadata
    pub fn is_egg_info(&self) -> bool {
        self.dist_info
            .extension()
            .is_some_and(|ext| ext == "egg-info")
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Django"), "django");
        assert_eq!(normalize_name("typing_extensions"), "typing-extensions");
        assert_eq!(normalize_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_name("Foo__Bar-.baz"), "foo-bar-baz");
        assert_eq!(normalize_name("  requests "), "requests");
    }

    #[test]
    fn test_python_matches() {
        let python = PythonInstall::new("3.11", vec![]);
        assert!(python.matches("3.11"));
        assert!(python.matches("python3.11"));
        assert!(python.matches("3.11.4"));
        assert!(!python.matches("3.1"));
        assert!(!python.matches("3.12"));
        assert_eq!(python.to_string(), "3.11");
    }

    #[test]
    fn test_distribution_named() {
        let dist = Distribution::new(
            "typing_extensions",
            "4.12.2",
            "/site/typing_extensions-4.12.2.dist-info",
            "/site",
        );
        assert!(dist.is_named("Typing-Extensions"));
        assert!(!dist.is_named("typing"));
        assert!(!dist.is_egg_info());
        assert_eq!(dist.to_string(), "typing_extensions==4.12.2");
    }

    #[test]
    fn test_egg_info() {
        let dist = Distribution::new("legacy", "0.1", "/site/legacy-0.1.egg-info", "/site");
        assert!(dist.is_egg_info());
    }
}
