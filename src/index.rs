//! The staging index: an ordered `path → entry` map with a stat cache,
//! used as the "new" side of tree↔index comparisons and the "old" side of
//! index↔workdir comparisons.
//!
//! Out of scope per spec.md §1 ("the index store... interfaces, not
//! components to reimplement") — this module defines the shape the
//! enumerators need and a concrete `BTreeMap`-backed container, since
//! path order *is* the enumeration order the spec requires.

use std::collections::BTreeMap;

use crate::mode::FileMode;
use crate::oid::Oid;
use crate::path::PathKey;

/// The six-field stat cache used to short-circuit rehashing (glossary:
/// "Stat cache"). Compared as a tuple, not six independent scalars.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct StatCache {
    pub ctime: (i64, i64),
    pub mtime: (i64, i64),
    pub dev: u64,
    pub ino: u64,
    pub uid: u32,
    pub gid: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IndexEntry {
    pub path: PathKey,
    pub mode: FileMode,
    pub oid: Oid,
    pub file_size: u64,
    pub stat: StatCache,
}

impl IndexEntry {
    pub fn new(path: impl Into<PathKey>, mode: FileMode, oid: Oid, file_size: u64) -> Self {
        Self { path: path.into(), mode, oid, file_size, stat: StatCache::default() }
    }

    pub fn with_stat(mut self, stat: StatCache) -> Self {
        self.stat = stat;
        self
    }
}

/// Ordered `path → entry` map. Iteration order is path order, which is
/// exactly the order the tree-pair and workdir enumerators expect to
/// co-advance against.
#[derive(Clone, Default, Debug)]
pub struct Index {
    entries: BTreeMap<PathKey, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.path.clone(), entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::new(path, FileMode::Reg, Oid::UNKNOWN, 0)
    }

    #[test]
    fn iteration_is_path_ordered() {
        let mut index = Index::new();
        index.insert(entry("b"));
        index.insert(entry("a"));
        index.insert(entry("c"));
        let paths: Vec<_> = index.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
    }
}
