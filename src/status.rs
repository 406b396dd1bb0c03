//! A convenience layer combining the two practical diffs a caller usually
//! wants together: what's staged (tree↔index) and what's dirty in the
//! working tree (index↔workdir). Grounded in the teacher's `status.rs`,
//! which combines the same pair of `WorkspaceDiff`s behind one `Display`
//! impl — kept here without the teacher's ANSI coloring, since patch and
//! compact text are meant to stay tool-compatible (spec.md §6).

use std::fmt;
use std::path::Path;

use crate::delta::{DeltaList, DiffOptions};
use crate::diff_index::diff_index_to_tree;
use crate::diff_workdir::diff_workdir_to_index;
use crate::error::Result;
use crate::ignore_engine::IgnoreEngine;
use crate::index::Index;
use crate::patch::{print_compact, BufferSink};
use crate::tree::{Tree, TreeSource};

pub struct DiffStatus {
    pub staged: DeltaList,
    pub unstaged: DeltaList,
}

pub fn status(
    source: &dyn TreeSource,
    head_tree: &Tree,
    index: &Index,
    workdir_root: &Path,
    ignore: &dyn IgnoreEngine,
    options: &DiffOptions,
) -> Result<DiffStatus> {
    let staged = diff_index_to_tree(source, options, head_tree, index)?;
    let unstaged = diff_workdir_to_index(workdir_root, options, index, ignore)?;
    Ok(DiffStatus { staged, unstaged })
}

impl DiffStatus {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty()
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut staged_buf = BufferSink::default();
        print_compact(&self.staged, &mut staged_buf).map_err(|_| fmt::Error)?;
        let mut unstaged_buf = BufferSink::default();
        print_compact(&self.unstaged, &mut unstaged_buf).map_err(|_| fmt::Error)?;

        writeln!(f, "Staged:")?;
        f.write_str(&String::from_utf8_lossy(&staged_buf.0))?;
        writeln!(f, "Unstaged:")?;
        f.write_str(&String::from_utf8_lossy(&unstaged_buf.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore_engine::NeverIgnore;

    struct EmptySource;
    impl TreeSource for EmptySource {
        fn resolve(&self, _oid: crate::oid::Oid) -> Result<Tree> {
            Ok(Tree::default())
        }
    }

    #[test]
    fn clean_workdir_against_empty_everything_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let index = Index::new();
        let st = status(
            &EmptySource,
            &Tree::default(),
            &index,
            dir.path(),
            &NeverIgnore,
            &DiffOptions::default(),
        )
        .unwrap();
        assert!(st.is_clean());
    }
}
