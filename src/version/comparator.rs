//! Comparison of two version sets
//!
//! Identity is by parsed value. A version present on one side only is
//! classified against the other side's span:
//! - above the other side's latest: newer on this side
//! - below the other side's initial, or the other side is empty: only on this side
//! - anywhere inside the other side's span: a gap, kept apart from the four
//!   reported collections

use super::parser::ParsedVersion;
use super::set::VersionSet;
use serde::Serialize;

/// One labeled side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Side {
    pub label: String,
    pub versions: VersionSet,
}

/// Eagerly computed delta between two version sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub source: Side,
    pub target: Side,
    pub only_in_source: Vec<ParsedVersion>,
    pub only_in_target: Vec<ParsedVersion>,
    pub newer_in_source: Vec<ParsedVersion>,
    pub newer_in_target: Vec<ParsedVersion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    gaps_in_source: Vec<ParsedVersion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    gaps_in_target: Vec<ParsedVersion>,
}

#[derive(Default)]
struct Classified {
    only: Vec<ParsedVersion>,
    newer: Vec<ParsedVersion>,
    gaps: Vec<ParsedVersion>,
}

/// Split the members of `this` missing from `other`
fn classify(this: &VersionSet, other: &VersionSet) -> Classified {
    let mut out = Classified::default();
    for version in this.iter().filter(|v| !other.contains(v)) {
        match (other.initial(), other.latest()) {
            (Some(_), Some(latest)) if version > latest => out.newer.push(version.clone()),
            (Some(initial), Some(_)) if version < initial => out.only.push(version.clone()),
            (Some(_), Some(_)) => out.gaps.push(version.clone()),
            _ => out.only.push(version.clone()),
        }
    }
    out
}

/// Compare with the default labels `source` and `target`
pub fn compare(source: &VersionSet, target: &VersionSet) -> ComparisonResult {
    compare_labeled(("source", source), ("target", target))
}

/// Compare two labeled sets; labels only appear in the result
pub fn compare_labeled(
    source: (&str, &VersionSet),
    target: (&str, &VersionSet),
) -> ComparisonResult {
    let (source_label, source_set) = source;
    let (target_label, target_set) = target;

    let from_source = classify(source_set, target_set);
    let from_target = classify(target_set, source_set);

    ComparisonResult {
        source: Side {
            label: source_label.to_string(),
            versions: source_set.clone(),
        },
        target: Side {
            label: target_label.to_string(),
            versions: target_set.clone(),
        },
        only_in_source: from_source.only,
        only_in_target: from_target.only,
        newer_in_source: from_source.newer,
        newer_in_target: from_target.newer,
        gaps_in_source: from_source.gaps,
        gaps_in_target: from_target.gaps,
    }
}

impl ComparisonResult {
    /// Source-only versions inside the target's span
    pub fn gaps_in_source(&self) -> &[ParsedVersion] {
        &self.gaps_in_source
    }

    /// Target-only versions inside the source's span
    pub fn gaps_in_target(&self) -> &[ParsedVersion] {
        &self.gaps_in_target
    }

    /// True when neither side has a version the other lacks, gaps included
    pub fn is_identical(&self) -> bool {
        self.only_in_source.is_empty()
            && self.only_in_target.is_empty()
            && self.newer_in_source.is_empty()
            && self.newer_in_target.is_empty()
            && self.gaps_in_source.is_empty()
            && self.gaps_in_target.is_empty()
    }

    /// Which side holds the higher latest version, if any
    pub fn ahead(&self) -> Option<&Side> {
        match (self.source.versions.latest(), self.target.versions.latest()) {
            (Some(s), Some(t)) if s > t => Some(&self.source),
            (Some(s), Some(t)) if t > s => Some(&self.target),
            (Some(_), None) => Some(&self.source),
            (None, Some(_)) => Some(&self.target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::parse;

    fn set(raw: &[&str]) -> VersionSet {
        VersionSet::build(raw)
    }

    #[test]
    fn test_newer_in_target() {
        let result = compare_labeled(("A", &set(&["1.0", "2.0"])), ("B", &set(&["1.0", "3.0"])));
        assert!(result.only_in_source.is_empty());
        assert!(result.only_in_target.is_empty());
        assert_eq!(result.newer_in_target, vec![parse("3.0")]);
        assert!(result.newer_in_source.is_empty());
        assert_eq!(result.gaps_in_source(), &[parse("2.0")]);
        assert_eq!(result.source.label, "A");
        assert_eq!(result.target.label, "B");
    }

    #[test]
    fn test_gap_only_difference_is_not_identical() {
        let result = compare_labeled(
            ("3.11", &set(&["1.0", "1.5", "2.0"])),
            ("3.12", &set(&["1.0", "2.0"])),
        );
        assert!(result.only_in_source.is_empty());
        assert!(result.newer_in_source.is_empty());
        assert_eq!(result.gaps_in_source(), &[parse("1.5")]);
        assert!(!result.is_identical());

        let same = set(&["1.0", "1.5", "2.0"]);
        assert!(compare(&same, &same).is_identical());
    }

    #[test]
    fn test_identical_copy() {
        let versions = set(&["0.1", "0.2", "1.0rc1", "1.0"]);
        let result = compare(&versions, &versions.clone());
        assert!(result.is_identical());
        assert!(result.gaps_in_source().is_empty());
        assert!(result.gaps_in_target().is_empty());
    }

    #[test]
    fn test_formatting_differences_are_not_deltas() {
        let result = compare(&set(&["1.0", "v2.0"]), &set(&["1.0.0", "2"]));
        assert!(result.is_identical());
    }

    #[test]
    fn test_only_below_span() {
        let result = compare(&set(&["0.5", "1.0", "2.0"]), &set(&["1.0", "2.0"]));
        assert_eq!(result.only_in_source, vec![parse("0.5")]);
        assert!(result.newer_in_source.is_empty());
        assert!(!result.is_identical());
    }

    #[test]
    fn test_newer_in_source() {
        let result = compare(&set(&["1.0", "2.0", "2.1"]), &set(&["1.0", "2.0"]));
        assert_eq!(result.newer_in_source, vec![parse("2.1")]);
        assert_eq!(result.ahead().map(|s| s.label.as_str()), Some("source"));
    }

    #[test]
    fn test_empty_other_side() {
        let result = compare(&set(&["1.0", "2.0"]), &VersionSet::default());
        assert_eq!(result.only_in_source, vec![parse("1.0"), parse("2.0")]);
        assert!(result.newer_in_source.is_empty());
        assert!(result.only_in_target.is_empty());
    }

    #[test]
    fn test_both_empty() {
        let result = compare(&VersionSet::default(), &VersionSet::default());
        assert!(result.is_identical());
        assert!(result.ahead().is_none());
    }

    #[test]
    fn test_single_version_sides() {
        // typical cross-interpreter case: one installed version per side
        let result = compare_labeled(("3.11", &set(&["2.31.0"])), ("3.12", &set(&["2.32.3"])));
        assert_eq!(result.newer_in_target, vec![parse("2.32.3")]);
        assert_eq!(result.only_in_source, vec![parse("2.31.0")]);
        assert_eq!(result.ahead().map(|s| s.label.as_str()), Some("3.12"));
    }
}
