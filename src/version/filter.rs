//! Update filter configuration
//!
//! [`UpdateFilter`] narrows a release history down to the versions worth
//! offering as updates before [`resolve`](super::resolve) runs:
//! - pre-releases are skipped unless requested or the installed version is one
//! - yanked releases are skipped unless requested
//! - an optional minimum age keeps out releases newer than a cooldown

use super::parser::ParsedVersion;
use super::set::VersionSet;
use super::updates::{resolve, UpdateOrder, UpdateSet};
use crate::domain::Release;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Filter configuration for update resolution
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Offer dev/alpha/beta/rc releases
    pub include_prereleases: bool,
    /// Offer releases the index marks as yanked
    pub include_yanked: bool,
    /// Minimum age for versions to be considered
    pub min_age: Option<Duration>,
    /// Presentation order of the result
    pub order: UpdateOrder,
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to offer pre-releases
    pub fn with_prereleases(mut self, include: bool) -> Self {
        self.include_prereleases = include;
        self
    }

    /// Set whether to offer yanked releases
    pub fn with_yanked(mut self, include: bool) -> Self {
        self.include_yanked = include;
        self
    }

    /// Set minimum age for versions
    pub fn with_min_age(mut self, age: Duration) -> Self {
        self.min_age = Some(age);
        self
    }

    /// Set presentation order
    pub fn with_order(mut self, order: UpdateOrder) -> Self {
        self.order = order;
        self
    }

    /// Releases that pass the filter, as a version set
    pub fn candidates(&self, releases: &[Release], now: DateTime<Utc>) -> VersionSet {
        self.select(releases, now, self.include_prereleases)
    }

    /// Filter `releases` and resolve updates above `installed`
    pub fn apply(&self, installed: &ParsedVersion, releases: &[Release]) -> UpdateSet {
        self.apply_at(installed, releases, Utc::now())
    }

    /// [`apply`](Self::apply) against a fixed clock
    pub fn apply_at(
        &self,
        installed: &ParsedVersion,
        releases: &[Release],
        now: DateTime<Utc>,
    ) -> UpdateSet {
        let prereleases = self.include_prereleases || installed.is_prerelease();
        let candidates = self.select(releases, now, prereleases);
        resolve(installed, &candidates).into_order(self.order)
    }

    fn select(&self, releases: &[Release], now: DateTime<Utc>, prereleases: bool) -> VersionSet {
        let cutoff = self
            .min_age
            .and_then(|age| chrono::Duration::from_std(age).ok())
            .map(|age| now - age);

        releases
            .iter()
            .filter(|r| self.include_yanked || !r.yanked)
            .filter(|r| prereleases || !r.version.is_prerelease())
            .filter(|r| match (cutoff, r.released_at) {
                (Some(cutoff), Some(released)) => released <= cutoff,
                // unknown upload time cannot satisfy a cooldown
                (Some(_), None) => false,
                (None, _) => true,
            })
            .map(|r| r.version.clone())
            .collect()
    }
}
