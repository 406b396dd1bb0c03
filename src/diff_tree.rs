//! C2: the tree-pair enumerator (spec.md §4.2).
//!
//! The merge itself mirrors the teacher's `GenericDiffer` co-advance
//! pattern: walk both sides' sorted entries in lock-step, comparing by
//! [`TreeEntry::sort_key`]. Because directories sort with a trailing `/`
//! (tree.rs), a blob and a directory that share a bare name never compare
//! equal — they naturally fall into the "one side missing" branches,
//! which is exactly the pre-split add+delete behavior spec.md attributes
//! to the tree-diff collaborator. No special type-flip case is needed.

use std::cmp::Ordering;

use log::trace;

use crate::delta::{DeltaList, DeltaRecord, DiffOptions, Status};
use crate::mode::FileMode;
use crate::oid::Oid;
use crate::path::PathKey;
use crate::tree::{Tree, TreeEntry, TreeSource};
use crate::error::Result;

pub fn diff_tree_to_tree(
    source: &dyn TreeSource,
    options: &DiffOptions,
    old: &Tree,
    new: &Tree,
) -> Result<DeltaList> {
    let mut list = DeltaList::allocate(options);
    diff_trees_into(source, &mut list, old.entries(), new.entries(), &PathKey::new(""))?;
    Ok(list)
}

fn diff_trees_into(
    source: &dyn TreeSource,
    list: &mut DeltaList,
    old_entries: &[TreeEntry],
    new_entries: &[TreeEntry],
    prefix: &PathKey,
) -> Result<()> {
    let mut oi = 0;
    let mut ni = 0;
    loop {
        match (old_entries.get(oi), new_entries.get(ni)) {
            (None, None) => break,
            (Some(o), None) => {
                emit_one_side(source, list, prefix, o, false)?;
                oi += 1;
            }
            (None, Some(n)) => {
                emit_one_side(source, list, prefix, n, true)?;
                ni += 1;
            }
            (Some(o), Some(n)) => match o.sort_key().cmp(&n.sort_key()) {
                Ordering::Less => {
                    emit_one_side(source, list, prefix, o, false)?;
                    oi += 1;
                }
                Ordering::Greater => {
                    emit_one_side(source, list, prefix, n, true)?;
                    ni += 1;
                }
                Ordering::Equal => {
                    diff_matched_entry(source, list, prefix, o, n)?;
                    oi += 1;
                    ni += 1;
                }
            },
        }
    }
    Ok(())
}

/// `o` and `n` share a sort key, so they are the same bare name and the
/// same broad type (both directories, or both blobs/gitlinks).
fn diff_matched_entry(
    source: &dyn TreeSource,
    list: &mut DeltaList,
    prefix: &PathKey,
    o: &TreeEntry,
    n: &TreeEntry,
) -> Result<()> {
    if o.mode == FileMode::Gitlink || n.mode == FileMode::Gitlink {
        return Ok(()); // submodules: reserved, never recursed into
    }

    if o.mode.is_tree() {
        if o.oid == n.oid {
            return Ok(()); // identical subtree, nothing changed beneath it
        }
        let child_prefix = prefix.join(o.name.as_str()).with_trailing_slash();
        trace!("diff_matched_entry: recursing into {child_prefix}");
        let old_sub = source.resolve(o.oid)?;
        let new_sub = source.resolve(n.oid)?;
        return diff_trees_into(source, list, old_sub.entries(), new_sub.entries(), &child_prefix);
    }

    if o.oid != n.oid || o.mode != n.mode {
        let path = prefix.join(o.name.as_str());
        list.append(DeltaRecord::new(Status::Modified, path, o.mode, n.mode, o.oid, n.oid));
    }
    Ok(())
}

/// `entry` has no counterpart at this position on the other side. If it's
/// a blob, emit a single add/delete record. If it's a directory, resolve
/// it and walk its leaves post-order, emitting one record per blob — the
/// directory itself is never recorded (spec.md §4.2).
fn emit_one_side(
    source: &dyn TreeSource,
    list: &mut DeltaList,
    prefix: &PathKey,
    entry: &TreeEntry,
    added: bool,
) -> Result<()> {
    if entry.mode == FileMode::Gitlink {
        return Ok(());
    }
    if entry.mode.is_tree() {
        let sub = source.resolve(entry.oid)?;
        let base = prefix.join(entry.name.as_str()).with_trailing_slash();
        return emit_tree_leaves(source, list, &base, &sub, added);
    }

    let path = prefix.join(entry.name.as_str());
    let record = if added {
        DeltaRecord::new(Status::Added, path, FileMode::Unknown, entry.mode, Oid::UNKNOWN, entry.oid)
    } else {
        DeltaRecord::new(Status::Deleted, path, entry.mode, FileMode::Unknown, entry.oid, Oid::UNKNOWN)
    };
    list.append(record);
    Ok(())
}

fn emit_tree_leaves(
    source: &dyn TreeSource,
    list: &mut DeltaList,
    base: &PathKey,
    tree: &Tree,
    added: bool,
) -> Result<()> {
    for child in tree.entries() {
        if child.mode == FileMode::Gitlink {
            continue;
        }
        if child.mode.is_tree() {
            let sub = source.resolve(child.oid)?;
            let child_base = base.join(child.name.as_str()).with_trailing_slash();
            emit_tree_leaves(source, list, &child_base, &sub, added)?;
        } else {
            let path = base.join(child.name.as_str());
            let record = if added {
                DeltaRecord::new(
                    Status::Added,
                    path,
                    FileMode::Unknown,
                    child.mode,
                    Oid::UNKNOWN,
                    child.oid,
                )
            } else {
                DeltaRecord::new(
                    Status::Deleted,
                    path,
                    child.mode,
                    FileMode::Unknown,
                    child.oid,
                    Oid::UNKNOWN,
                )
            };
            list.append(record);
        }
    }
    Ok(())
}
