//! Trees: ordered mappings from name to `(mode, oid)`, themselves
//! content-addressed. Resolution from an [`Oid`] to a [`Tree`] is an
//! external collaborator (spec.md §6's "tree walker") — this crate only
//! consumes it through [`TreeSource`].

use crate::error::Result;
use crate::mode::FileMode;
use crate::oid::Oid;
use crate::path::PathKey;

/// One child of a tree: a bare name (not a full path), its mode, and the
/// oid it points at.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TreeEntry {
    pub name: PathKey,
    pub mode: FileMode,
    pub oid: Oid,
}

impl TreeEntry {
    pub fn new(name: impl Into<PathKey>, mode: FileMode, oid: Oid) -> Self {
        Self { name: name.into(), mode, oid }
    }

    /// The key trees sort children by: the name, suffixed with `/` for
    /// directories, so that e.g. `foo.txt` sorts before `foo/` before `foo0`.
    pub fn sort_key(&self) -> PathKey {
        if self.mode.is_tree() { self.name.with_trailing_slash() } else { self.name.clone() }
    }
}

#[derive(Clone, Default, Debug)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a tree oid to its (already sorted) children. The only
/// operation this crate needs from the host's tree-storage layer.
pub trait TreeSource {
    fn resolve(&self, oid: Oid) -> Result<Tree>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_sort_with_directory_suffix() {
        let tree = Tree::new(vec![
            TreeEntry::new("foo0", FileMode::Reg, Oid::UNKNOWN),
            TreeEntry::new("foo", FileMode::Dir, Oid::UNKNOWN),
            TreeEntry::new("foo.txt", FileMode::Reg, Oid::UNKNOWN),
        ]);
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["foo.txt", "foo", "foo0"]);
    }
}
