//! C3: the tree↔index enumerator (spec.md §4.3).

use crate::delta::{DeltaList, DeltaRecord, DiffOptions, Status};
use crate::error::Result;
use crate::index::Index;
use crate::mode::FileMode;
use crate::oid::Oid;
use crate::path::PathKey;
use crate::tree::{Tree, TreeSource};

pub fn diff_index_to_tree(
    source: &dyn TreeSource,
    options: &DiffOptions,
    old_tree: &Tree,
    index: &Index,
) -> Result<DeltaList> {
    let mut list = DeltaList::allocate(options);

    let mut leaves = Vec::new();
    walk_tree_blobs(source, &PathKey::new(""), old_tree, &mut leaves)?;

    let entries: Vec<_> = index.iter().collect();
    let mut cursor = 0;

    for (path, mode, oid) in &leaves {
        while cursor < entries.len() && &entries[cursor].path < path {
            let e = entries[cursor];
            list.append(DeltaRecord::new(
                Status::Added,
                e.path.clone(),
                FileMode::Unknown,
                e.mode,
                Oid::UNKNOWN,
                e.oid,
            ));
            cursor += 1;
        }

        match entries.get(cursor) {
            Some(e) if e.path == *path => {
                cursor += 1;
                if e.oid != *oid || e.mode != *mode {
                    list.append(DeltaRecord::new(
                        Status::Modified,
                        path.clone(),
                        *mode,
                        e.mode,
                        *oid,
                        e.oid,
                    ));
                }
            }
            _ => {
                list.append(DeltaRecord::new(
                    Status::Deleted,
                    path.clone(),
                    *mode,
                    FileMode::Unknown,
                    *oid,
                    Oid::UNKNOWN,
                ));
            }
        }
    }

    while cursor < entries.len() {
        let e = entries[cursor];
        list.append(DeltaRecord::new(
            Status::Added,
            e.path.clone(),
            FileMode::Unknown,
            e.mode,
            Oid::UNKNOWN,
            e.oid,
        ));
        cursor += 1;
    }

    Ok(list)
}

/// Flattens a tree into its blob leaves in ascending full-path order,
/// skipping gitlinks (submodules, reserved per spec.md's Non-goals).
fn walk_tree_blobs(
    source: &dyn TreeSource,
    prefix: &PathKey,
    tree: &Tree,
    out: &mut Vec<(PathKey, FileMode, Oid)>,
) -> Result<()> {
    for entry in tree.entries() {
        if entry.mode == FileMode::Gitlink {
            continue;
        }
        if entry.mode.is_tree() {
            let sub = source.resolve(entry.oid)?;
            let base = prefix.join(entry.name.as_str()).with_trailing_slash();
            walk_tree_blobs(source, &base, &sub, out)?;
        } else {
            out.push((prefix.join(entry.name.as_str()), entry.mode, entry.oid));
        }
    }
    Ok(())
}
