//! The duplicate mapping produced by the indexer.
//!
//! # Overview
//!
//! A [`DuplicateMapping`] holds one entry per distinct input path. Each entry
//! maps a path to the paths *after it* in canonical order whose content is
//! identical. The first member of a content group (its representative)
//! therefore lists every other member, the second lists all but the first,
//! and the last member lists nothing.
//!
//! # Example
//!
//! ```
//! use dupecount::duplicates::DuplicateMapping;
//! use std::path::PathBuf;
//!
//! let mut mapping = DuplicateMapping::new();
//! mapping.insert(PathBuf::from("a"), vec![PathBuf::from("c")]);
//! mapping.insert(PathBuf::from("b"), vec![]);
//! mapping.insert(PathBuf::from("c"), vec![]);
//!
//! assert_eq!(mapping.len(), 3);
//! assert_eq!(mapping.groups().len(), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Representative path to its content-identical successors.
///
/// Iteration order is the canonical path order, which is also the order
/// the indexer inserts keys in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateMapping {
    entries: BTreeMap<PathBuf, Vec<PathBuf>>,
}

/// A complete set of content-identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Earliest member in canonical order
    pub representative: PathBuf,
    /// Every other member, in canonical order
    pub duplicates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of duplicate copies (members minus the representative).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// All members including the representative.
    #[must_use]
    pub fn paths(&self) -> Vec<&Path> {
        std::iter::once(self.representative.as_path())
            .chain(self.duplicates.iter().map(PathBuf::as_path))
            .collect()
    }
}

impl DuplicateMapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the duplicate list for `key`, replacing any previous entry.
    ///
    /// `key` is removed from `duplicates` if present; a file is never its
    /// own duplicate.
    pub fn insert(&mut self, key: PathBuf, mut duplicates: Vec<PathBuf>) {
        duplicates.retain(|p| *p != key);
        self.entries.insert(key, duplicates);
    }

    /// Number of keys (distinct input files).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Duplicate list for `path`, if it is a key.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&[PathBuf]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Whether `path` is a key.
    #[must_use]
    pub fn contains_key(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterate entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_path(), v.as_slice()))
    }

    /// Iterate keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    /// Sum of all duplicate-list lengths.
    #[must_use]
    pub fn total_links(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether any key has at least one duplicate.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.entries.values().any(|v| !v.is_empty())
    }

    /// Distinct content groups with two or more members.
    ///
    /// A key that already appeared in an earlier key's list belongs to that
    /// earlier group and does not start a group of its own.
    #[must_use]
    pub fn groups(&self) -> Vec<DuplicateGroup> {
        let mut claimed: HashSet<&Path> = HashSet::new();
        let mut groups = Vec::new();

        for (key, dupes) in &self.entries {
            if dupes.is_empty() || claimed.contains(key.as_path()) {
                continue;
            }
            claimed.extend(dupes.iter().map(PathBuf::as_path));
            groups.push(DuplicateGroup {
                representative: key.clone(),
                duplicates: dupes.clone(),
            });
        }

        groups
    }

    /// Whether `other` has the same keys and the same duplicate *sets*.
    ///
    /// List order is not significant.
    #[must_use]
    pub fn same_groups_as(&self, other: &DuplicateMapping) -> bool {
        self.differing_keys(other).is_empty()
    }

    /// Keys, from either mapping, whose duplicate sets differ or that only
    /// one mapping has. Sorted.
    #[must_use]
    pub fn differing_keys(&self, other: &DuplicateMapping) -> Vec<PathBuf> {
        fn as_set(list: &[PathBuf]) -> BTreeSet<&PathBuf> {
            list.iter().collect()
        }

        let keys: BTreeSet<&PathBuf> = self.entries.keys().chain(other.entries.keys()).collect();
        keys.into_iter()
            .filter(|key| match (self.entries.get(*key), other.entries.get(*key)) {
                (Some(ours), Some(theirs)) => as_set(ours) != as_set(theirs),
                _ => true,
            })
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a DuplicateMapping {
    type Item = (&'a PathBuf, &'a Vec<PathBuf>);
    type IntoIter = std::collections::btree_map::Iter<'a, PathBuf, Vec<PathBuf>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
