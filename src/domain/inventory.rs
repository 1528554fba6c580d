//! Package inventory differences between two interpreters

use super::python::{normalize_name, Distribution};
use crate::version::{compare_labeled, ComparisonResult, ParsedVersion, VersionSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// A package name with the version installed on one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageVersion {
    pub name: String,
    pub version: ParsedVersion,
}

/// A package installed on both sides with different versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDelta {
    pub name: String,
    pub comparison: ComparisonResult,
}

/// What differs between the packages of two interpreters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryDiff {
    pub source: String,
    pub target: String,
    pub only_in_source: Vec<PackageVersion>,
    pub only_in_target: Vec<PackageVersion>,
    pub changed: Vec<PackageDelta>,
    /// Packages installed at the same version on both sides
    pub unchanged: usize,
}

/// Installed versions per normalized name; a name may be installed in
/// several site directories of one interpreter
fn by_name(dists: &[Distribution]) -> BTreeMap<String, (String, Vec<ParsedVersion>)> {
    let mut map: BTreeMap<String, (String, Vec<ParsedVersion>)> = BTreeMap::new();
    for dist in dists {
        map.entry(dist.normalized_name())
            .or_insert_with(|| (dist.name.clone(), Vec::new()))
            .1
            .push(dist.version.clone());
    }
    map
}

impl InventoryDiff {
    /// Compare two interpreters' distributions, matching names after normalisation
    pub fn between(source: (&str, &[Distribution]), target: (&str, &[Distribution])) -> Self {
        let (source_label, source_dists) = source;
        let (target_label, target_dists) = target;
        let left = by_name(source_dists);
        let right = by_name(target_dists);

        let mut diff = InventoryDiff {
            source: source_label.to_string(),
            target: target_label.to_string(),
            only_in_source: Vec::new(),
            only_in_target: Vec::new(),
            changed: Vec::new(),
            unchanged: 0,
        };

        for (key, (name, versions)) in &left {
            match right.get(key) {
                None => diff.only_in_source.extend(versions.iter().map(|v| PackageVersion {
                    name: name.clone(),
                    version: v.clone(),
                })),
                Some((_, other)) => {
                    let ours = VersionSet::from_parsed(versions.iter().cloned());
                    let theirs = VersionSet::from_parsed(other.iter().cloned());
                    let comparison =
                        compare_labeled((source_label, &ours), (target_label, &theirs));
                    if ours == theirs {
                        diff.unchanged += 1;
                    } else {
                        diff.changed.push(PackageDelta {
                            name: name.clone(),
                            comparison,
                        });
                    }
                }
            }
        }

        for (key, (name, versions)) in &right {
            if !left.contains_key(key) {
                diff.only_in_target
                    .extend(versions.iter().map(|v| PackageVersion {
                        name: name.clone(),
                        version: v.clone(),
                    }));
            }
        }

        diff
    }

    /// True when both interpreters have the same packages at the same versions
    pub fn is_empty(&self) -> bool {
        self.only_in_source.is_empty() && self.only_in_target.is_empty() && self.changed.is_empty()
    }
}
