//! Interpreter and distribution discovery
//!
//! Each configured root is a directory whose children are interpreter
//! installs named `3.12` (framework layout) or `python3.12` (lib layout).
//! Site directories are searched a few levels below each install.

use crate::domain::{Distribution, PackageMetadata, PythonInstall};
use crate::error::SiteError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

static PYTHON_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:python)?(\d+\.\d+)$").unwrap());

/// Site directories are at most this deep below an install
/// (`Versions/3.12/lib/python3.12/site-packages`)
const MAX_SITE_DEPTH: usize = 4;

const SITE_DIR_NAMES: [&str; 2] = ["site-packages", "dist-packages"];

/// Finds interpreters under a set of roots
#[derive(Debug, Clone)]
pub struct SiteScanner {
    roots: Vec<PathBuf>,
}

impl SiteScanner {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every interpreter with at least one site directory, ascending by version
    pub fn installed_pythons(&self) -> Vec<PythonInstall> {
        let mut by_version: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for root in &self.roots {
            let entries = match fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("skipping python root {}: {}", root.display(), e);
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                let name = entry.file_name();
                let Some(caps) = name.to_str().and_then(|n| PYTHON_DIR_RE.captures(n)) else {
                    continue;
                };

                let mut sites = Vec::new();
                collect_site_dirs(&path, 0, &mut sites);
                if sites.is_empty() {
                    debug!("no site directory under {}", path.display());
                    continue;
                }
                debug!("found python {} at {}", &caps[1], path.display());
                by_version.entry(caps[1].to_string()).or_default().extend(sites);
            }
        }

        let mut pythons: Vec<PythonInstall> = by_version
            .into_iter()
            .map(|(version, mut sites)| {
                sites.sort();
                sites.dedup();
                PythonInstall::new(&version, sites)
            })
            .collect();
        pythons.sort_by(|a, b| a.version.cmp(&b.version));
        pythons
    }

    /// The interpreter matching `version` (`3.12`, `python3.12`, `3.12.1`)
    pub fn find_python(&self, version: &str) -> Result<PythonInstall, SiteError> {
        let pythons = self.installed_pythons();
        pythons
            .iter()
            .find(|p| p.matches(version))
            .cloned()
            .ok_or_else(|| {
                let available: Vec<String> = pythons.iter().map(|p| p.to_string()).collect();
                SiteError::python_not_found(version, &available)
            })
    }

    /// The highest interpreter version found
    pub fn newest_python(&self) -> Option<PythonInstall> {
        self.installed_pythons().pop()
    }

    /// Installed distributions of one interpreter, sorted by normalized name
    pub fn distributions(&self, python: &PythonInstall) -> Result<Vec<Distribution>, SiteError> {
        let mut dists = Vec::new();
        for site in &python.site_packages {
            let entries = fs::read_dir(site).map_err(|e| SiteError::io(site, e))?;
            for entry in entries.flatten() {
                if let Some(dist) = read_distribution(site, &entry.path()) {
                    dists.push(dist);
                }
            }
        }
        dists.sort_by(|a, b| {
            a.normalized_name()
                .cmp(&b.normalized_name())
                .then_with(|| a.version.cmp(&b.version))
        });
        Ok(dists)
    }

    /// One installed package; the highest version wins when several site directories hold it
    pub fn find_distribution(
        &self,
        python: &PythonInstall,
        package: &str,
    ) -> Result<Distribution, SiteError> {
        self.distributions(python)?
            .into_iter()
            .filter(|d| d.is_named(package))
            .max_by(|a, b| a.version.cmp(&b.version))
            .ok_or_else(|| SiteError::package_not_found(package, python.to_string()))
    }
}

fn collect_site_dirs(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let is_site = entry
            .file_name()
            .to_str()
            .is_some_and(|n| SITE_DIR_NAMES.contains(&n));
        if is_site {
            out.push(path);
        } else if depth + 1 < MAX_SITE_DEPTH {
            collect_site_dirs(&path, depth + 1, out);
        }
    }
}

/// Build a distribution from a `name-version.dist-info` or `.egg-info` entry
fn read_distribution(site: &Path, path: &Path) -> Option<Distribution> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name
        .strip_suffix(".dist-info")
        .or_else(|| file_name.strip_suffix(".egg-info"))?;

    let (name, version) = match stem.split_once('-') {
        Some((name, rest)) => (name, rest.split('-').next().unwrap_or(rest).to_string()),
        None => (stem, header_version(path)?),
    };

    if name.is_empty() || version.is_empty() {
        warn!("unrecognised distribution entry {}", path.display());
        return None;
    }
    Some(Distribution::new(name, &version, path, site))
}

/// `Version:` from METADATA (dist-info) or PKG-INFO (egg-info directory or file)
fn header_version(path: &Path) -> Option<String> {
    let text = ["METADATA", "PKG-INFO"]
        .iter()
        .find_map(|f| fs::read_to_string(path.join(f)).ok())
        .or_else(|| fs::read_to_string(path).ok())?;
    Some(PackageMetadata::parse(&text).version).filter(|v| !v.is_empty())
}
