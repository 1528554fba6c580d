//! Ordered, deduplicated version collections
//!
//! A [`VersionSet`] is built once from raw strings and never mutated.
//! Duplicates are detected by parsed value, so `1.0` and `1.0.0` collapse
//! into a single member that keeps whichever raw string was seen first.

use super::parser::ParsedVersion;
use serde::Serialize;

/// Sorted ascending, no two members equal by value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionSet {
    versions: Vec<ParsedVersion>,
}

/// Where an installed version sits relative to a [`VersionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The installed version is a member at this index
    Member { index: usize },
    /// Not a member; it would rank at this index if inserted
    OutOfBand { insert_at: usize },
    /// Nothing meaningful to rank against
    NotFound,
}

impl Placement {
    /// Number of members strictly newer than the installed version
    pub fn behind(&self, set: &VersionSet) -> Option<usize> {
        match *self {
            Placement::Member { index } => Some(set.count() - index - 1),
            Placement::OutOfBand { insert_at } => Some(set.count() - insert_at),
            Placement::NotFound => None,
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Placement::Member { .. })
    }
}

impl VersionSet {
    /// Build from raw version strings in any order
    ///
    /// Blank entries are skipped: they carry no version and would only
    /// occupy the bottom slot as a sentinel.
    pub fn build<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_parsed(raw.into_iter().map(|s| ParsedVersion::parse(s.as_ref())))
    }

    /// Build from already parsed values
    pub fn from_parsed<I>(parsed: I) -> Self
    where
        I: IntoIterator<Item = ParsedVersion>,
    {
        let mut versions: Vec<ParsedVersion> =
            parsed.into_iter().filter(|v| !v.is_sentinel()).collect();
        // Stable sort keeps first-seen raw strings ahead of later equal values
        versions.sort();
        versions.dedup_by(|later, earlier| later == earlier);
        Self { versions }
    }

    /// Lowest member
    pub fn initial(&self) -> Option<&ParsedVersion> {
        self.versions.first()
    }

    /// Highest member
    pub fn latest(&self) -> Option<&ParsedVersion> {
        self.versions.last()
    }

    pub fn count(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParsedVersion> {
        self.versions.iter()
    }

    pub fn as_slice(&self) -> &[ParsedVersion] {
        &self.versions
    }

    pub fn contains(&self, version: &ParsedVersion) -> bool {
        self.versions.binary_search(version).is_ok()
    }

    /// Member equal by value to `version`, with its display string
    pub fn get(&self, version: &ParsedVersion) -> Option<&ParsedVersion> {
        self.versions
            .binary_search(version)
            .ok()
            .map(|i| &self.versions[i])
    }

    /// Locate a raw installed version string
    pub fn at(&self, installed_raw: &str) -> Placement {
        self.place(&ParsedVersion::parse(installed_raw))
    }

    /// Locate a parsed installed version
    ///
    /// Sentinel input and lexical input that is not an exact member have
    /// no reasonable rank and report [`Placement::NotFound`].
    pub fn place(&self, installed: &ParsedVersion) -> Placement {
        if self.is_empty() || installed.is_sentinel() {
            return Placement::NotFound;
        }
        match self.versions.binary_search(installed) {
            Ok(index) => Placement::Member { index },
            Err(_) if installed.is_lexical() => Placement::NotFound,
            Err(insert_at) => Placement::OutOfBand { insert_at },
        }
    }

    /// Members strictly greater than `version`
    pub fn newer_than(&self, version: &ParsedVersion) -> &[ParsedVersion] {
        let start = self.versions.partition_point(|v| v <= version);
        &self.versions[start..]
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a ParsedVersion;
    type IntoIter = std::slice::Iter<'a, ParsedVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}

impl IntoIterator for VersionSet {
    type Item = ParsedVersion;
    type IntoIter = std::vec::IntoIter<ParsedVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.into_iter()
    }
}

impl FromIterator<ParsedVersion> for VersionSet {
    fn from_iter<I: IntoIterator<Item = ParsedVersion>>(iter: I) -> Self {
        Self::from_parsed(iter)
    }
}
