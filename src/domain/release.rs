//! Release history from a package index
//!
//! This module provides the Release record (one published version with its
//! upload date) and the ReleaseHistory of a package ordered by version.

use crate::version::{ParsedVersion, VersionSet};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One published version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    /// The parsed version; displays as the index spelled it
    pub version: ParsedVersion,
    /// Earliest upload time of the release files, when known
    pub released_at: Option<DateTime<Utc>>,
    /// Whether the index marks this release as yanked
    pub yanked: bool,
}

impl Release {
    /// Create a new Release
    pub fn new(version: &str, released_at: Option<DateTime<Utc>>) -> Self {
        Self {
            version: ParsedVersion::parse(version),
            released_at,
            yanked: false,
        }
    }

    /// Mark as yanked (builder pattern)
    pub fn yanked(mut self) -> Self {
        self.yanked = true;
        self
    }
}

/// All releases of a package, ascending by version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReleaseHistory {
    releases: Vec<Release>,
}

impl ReleaseHistory {
    /// Sort releases by version
    ///
    /// Releases with equal versions merge into the first seen spelling, with
    /// the earliest date and yanked only when every copy is yanked.
    pub fn new(mut releases: Vec<Release>) -> Self {
        releases.retain(|r| !r.version.is_sentinel());
        releases.sort_by(|a, b| a.version.cmp(&b.version));
        releases.dedup_by(|later, earlier| {
            if later.version != earlier.version {
                return false;
            }
            earlier.released_at = match (earlier.released_at, later.released_at) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            earlier.yanked &= later.yanked;
            true
        });
        Self { releases }
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// The first release ever published
    pub fn initial(&self) -> Option<&Release> {
        self.releases.first()
    }

    /// The highest version, including pre-releases
    pub fn latest(&self) -> Option<&Release> {
        self.releases.last()
    }

    /// The highest version that is neither a pre-release nor yanked
    pub fn latest_stable(&self) -> Option<&Release> {
        self.releases
            .iter()
            .rev()
            .find(|r| !r.yanked && !r.version.is_prerelease())
    }

    pub fn total(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn find(&self, version: &ParsedVersion) -> Option<&Release> {
        self.releases
            .binary_search_by(|r| r.version.cmp(version))
            .ok()
            .map(|i| &self.releases[i])
    }

    /// Versions of every release as a [`VersionSet`]
    pub fn version_set(&self) -> VersionSet {
        self.releases.iter().map(|r| r.version.clone()).collect()
    }
}
