//! Available update resolution

use super::parser::ParsedVersion;
use super::set::VersionSet;
use serde::Serialize;

/// Presentation order of an [`UpdateSet`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrder {
    /// Oldest pending update first
    #[default]
    Ascending,
    /// Newest first
    Descending,
}

/// Versions strictly newer than an installed version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSet {
    installed: ParsedVersion,
    versions: Vec<ParsedVersion>,
    order: UpdateOrder,
}

/// Every candidate strictly greater than `installed`, ascending
///
/// `installed` need not be a member of `candidates`.
pub fn resolve(installed: &ParsedVersion, candidates: &VersionSet) -> UpdateSet {
    UpdateSet {
        installed: installed.clone(),
        versions: candidates.newer_than(installed).to_vec(),
        order: UpdateOrder::Ascending,
    }
}

impl UpdateSet {
    pub fn installed(&self) -> &ParsedVersion {
        &self.installed
    }

    /// Updates in the current presentation order
    pub fn versions(&self) -> &[ParsedVersion] {
        &self.versions
    }

    pub fn order(&self) -> UpdateOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// The closest update above the installed version
    pub fn next(&self) -> Option<&ParsedVersion> {
        match self.order {
            UpdateOrder::Ascending => self.versions.first(),
            UpdateOrder::Descending => self.versions.last(),
        }
    }

    /// The highest available update
    pub fn newest(&self) -> Option<&ParsedVersion> {
        match self.order {
            UpdateOrder::Ascending => self.versions.last(),
            UpdateOrder::Descending => self.versions.first(),
        }
    }

    /// Re-order for presentation
    pub fn into_order(mut self, order: UpdateOrder) -> Self {
        if order != self.order {
            self.versions.reverse();
            self.order = order;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::parse;

    fn candidates() -> VersionSet {
        VersionSet::build(["0.9", "1.0", "1.5", "2.0"])
    }

    #[test]
    fn test_resolve_ascending() {
        let updates = resolve(&parse("1.0"), &candidates());
        assert_eq!(updates.versions(), &[parse("1.5"), parse("2.0")]);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates.next(), Some(&parse("1.5")));
        assert_eq!(updates.newest(), Some(&parse("2.0")));
        assert_eq!(updates.order(), UpdateOrder::Ascending);
    }

    #[test]
    fn test_resolve_up_to_date() {
        let updates = resolve(&parse("2.0"), &candidates());
        assert!(updates.is_empty());
        assert!(updates.next().is_none());
    }

    #[test]
    fn test_resolve_ahead_of_index() {
        assert!(resolve(&parse("3.0"), &candidates()).is_empty());
    }

    #[test]
    fn test_resolve_non_member() {
        let updates = resolve(&parse("1.2.post4"), &candidates());
        assert_eq!(updates.versions(), &[parse("1.5"), parse("2.0")]);
    }

    #[test]
    fn test_resolve_sentinel_gets_everything() {
        let updates = resolve(&parse(""), &candidates());
        assert_eq!(updates.len(), 4);
    }

    #[test]
    fn test_into_descending() {
        let updates = resolve(&parse("0.9"), &candidates()).into_order(UpdateOrder::Descending);
        assert_eq!(updates.versions(), &[parse("2.0"), parse("1.5"), parse("1.0")]);
        assert_eq!(updates.next(), Some(&parse("1.0")));
        assert_eq!(updates.newest(), Some(&parse("2.0")));

        let back = updates.into_order(UpdateOrder::Ascending);
        assert_eq!(back.versions().first(), Some(&parse("1.0")));
    }

    #[test]
    fn test_installed_kept() {
        let updates = resolve(&parse("v1.0"), &candidates());
        assert_eq!(updates.installed().raw(), "v1.0");
    }
}
