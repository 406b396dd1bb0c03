//! C5: the index↔workdir enumerator (spec.md §4.5), built on the C4
//! scanner. The stat-fast-path mirrors the teacher's
//! `BitIndex::has_changes_inner` decision tree: trust the cache when every
//! field matches, force a re-hash when only some of it matches, and avoid
//! touching the filesystem when possible.

use std::path::Path;

use log::{debug, trace};

use crate::delta::{DeltaList, DeltaRecord, DiffOptions, Status};
use crate::error::Result;
use crate::ignore_engine::IgnoreEngine;
use crate::index::{Index, IndexEntry};
use crate::mode::FileMode;
use crate::oid::Oid;
use crate::path::PathKey;
use crate::workdir::{is_nested_repo, scan_dir, WorkdirEntry};

pub fn diff_workdir_to_index(
    root: &Path,
    options: &DiffOptions,
    index: &Index,
    ignore: &dyn IgnoreEngine,
) -> Result<DeltaList> {
    let mut list = DeltaList::allocate(options);
    let entries: Vec<&IndexEntry> = index.iter().collect();
    let mut cursor = 0usize;

    diff_dir_into(root, &PathKey::new(""), &entries, &mut cursor, &mut list, ignore)?;

    while cursor < entries.len() {
        emit_deleted(&mut list, entries[cursor]);
        cursor += 1;
    }
    Ok(list)
}

fn diff_dir_into(
    root: &Path,
    rel_dir: &PathKey,
    entries: &[&IndexEntry],
    cursor: &mut usize,
    list: &mut DeltaList,
    ignore: &dyn IgnoreEngine,
) -> Result<()> {
    let workdir_entries = scan_dir(root, rel_dir)?;

    for w in &workdir_entries {
        while *cursor < entries.len() && entries[*cursor].path < w.path {
            emit_deleted(list, entries[*cursor]);
            *cursor += 1;
        }

        match entries.get(*cursor) {
            Some(e) if e.path == w.path => {
                *cursor += 1;
                match_entry(root, w, e, list)?;
            }
            _ if !w.mode.is_tree() => {
                emit_untracked_or_ignored(list, ignore, w, false);
            }
            _ => {
                if is_nested_repo(root, &w.path) {
                    continue;
                }
                let has_tracked_descendant =
                    entries.get(*cursor).map_or(false, |e| e.path.starts_with(&w.path));
                if has_tracked_descendant {
                    diff_dir_into(root, &w.path, entries, cursor, list, ignore)?;
                } else {
                    // coarse-grained: one record for the whole directory (§9)
                    emit_untracked_or_ignored(list, ignore, w, true);
                }
            }
        }
    }
    Ok(())
}

fn emit_deleted(list: &mut DeltaList, e: &IndexEntry) {
    list.append(DeltaRecord::new(
        Status::Deleted,
        e.path.clone(),
        e.mode,
        FileMode::Unknown,
        e.oid,
        Oid::UNKNOWN,
    ));
}

fn emit_untracked_or_ignored(
    list: &mut DeltaList,
    ignore: &dyn IgnoreEngine,
    w: &WorkdirEntry,
    is_dir: bool,
) {
    let status =
        if ignore.is_ignored(w.path.as_str(), is_dir) { Status::Ignored } else { Status::Untracked };
    list.append(DeltaRecord::new(
        status,
        w.path.clone(),
        FileMode::Unknown,
        w.mode,
        Oid::UNKNOWN,
        Oid::UNKNOWN,
    ));
}

/// The match procedure from spec.md §4.5: stat fast-path, then confirm by
/// content hash only when the cache can't settle it.
fn match_entry(root: &Path, w: &WorkdirEntry, e: &IndexEntry, list: &mut DeltaList) -> Result<()> {
    let w_is_link = w.mode == FileMode::Link;
    let e_is_link = e.mode == FileMode::Link;
    if w_is_link != e_is_link {
        emit_deleted(list, e);
        let new_hash = hash_workdir_entry(root, w)?;
        list.append(DeltaRecord::new(
            Status::Added,
            w.path.clone(),
            FileMode::Unknown,
            w.mode,
            Oid::UNKNOWN,
            new_hash,
        ));
        return Ok(());
    }

    let mut new_hash = Oid::UNKNOWN;
    let modified = if w.mode != e.mode || w.file_size != e.file_size {
        trace!("match_entry({}): mode/size mismatch, modified without hashing", w.path);
        true
    } else if w.stat != e.stat {
        debug!("match_entry({}): stat cache stale, rehashing", w.path);
        new_hash = hash_workdir_entry(root, w)?;
        new_hash != e.oid
    } else {
        trace!("match_entry({}): stat cache hit, trusted", w.path);
        false
    };

    if modified {
        list.append(DeltaRecord::new(
            Status::Modified,
            e.path.clone(),
            e.mode,
            w.mode,
            e.oid,
            new_hash,
        ));
    }
    Ok(())
}

fn hash_workdir_entry(root: &Path, w: &WorkdirEntry) -> Result<Oid> {
    let abs = root.join(w.path.as_str());
    let bytes = if w.mode == FileMode::Link {
        std::fs::read_link(&abs)?.to_string_lossy().into_owned().into_bytes()
    } else {
        std::fs::read(&abs)?
    };
    Ok(Oid::hash_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore_engine::NeverIgnore;
    use crate::index::StatCache;
    use std::fs;

    fn stat_of(root: &std::path::Path, rel: &str) -> StatCache {
        use std::os::unix::fs::MetadataExt;
        let meta = fs::symlink_metadata(root.join(rel)).unwrap();
        StatCache {
            ctime: (meta.ctime(), meta.ctime_nsec()),
            mtime: (meta.mtime(), meta.mtime_nsec()),
            dev: meta.dev(),
            ino: meta.ino(),
            uid: meta.uid(),
            gid: meta.gid(),
        }
    }

    #[test]
    fn untracked_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo"), b"hi").unwrap();
        let index = Index::new();
        let list = diff_workdir_to_index(
            dir.path(),
            &DiffOptions::default(),
            &index,
            &NeverIgnore,
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.records()[0].status, Status::Untracked);
    }

    #[test]
    fn deleted_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = Index::new();
        index.insert(IndexEntry::new("foo", FileMode::Reg, Oid::hash_bytes(b"hi"), 2));
        let list = diff_workdir_to_index(
            dir.path(),
            &DiffOptions::default(),
            &index,
            &NeverIgnore,
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.records()[0].status, Status::Deleted);
    }

    #[test]
    fn matching_stat_cache_emits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo"), b"hi").unwrap();
        let stat = stat_of(dir.path(), "foo");
        let mut index = Index::new();
        index.insert(
            IndexEntry::new("foo", FileMode::Reg, Oid::hash_bytes(b"hi"), 2).with_stat(stat),
        );
        let list = diff_workdir_to_index(
            dir.path(),
            &DiffOptions::default(),
            &index,
            &NeverIgnore,
        )
        .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn stale_stat_cache_triggers_rehash_and_detects_no_change() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo"), b"hi").unwrap();
        let mut index = Index::new();
        // stat cache deliberately left at defaults (stale), but content and
        // size match, so rehashing should confirm nothing changed.
        index.insert(IndexEntry::new("foo", FileMode::Reg, Oid::hash_bytes(b"hi"), 2));
        let list = diff_workdir_to_index(
            dir.path(),
            &DiffOptions::default(),
            &index,
            &NeverIgnore,
        )
        .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn untracked_directory_with_no_tracked_children_is_coarse() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("a"), b"1").unwrap();
        fs::write(dir.path().join("sub").join("b"), b"2").unwrap();
        let index = Index::new();
        let list = diff_workdir_to_index(
            dir.path(),
            &DiffOptions::default(),
            &index,
            &NeverIgnore,
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.records()[0].status, Status::Untracked);
        assert_eq!(list.records()[0].path.as_str(), "sub/");
    }

    #[test]
    fn directory_with_tracked_child_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("a"), b"1").unwrap();
        let mut index = Index::new();
        index.insert(IndexEntry::new("sub/a", FileMode::Reg, Oid::hash_bytes(b"1"), 1));
        let list = diff_workdir_to_index(
            dir.path(),
            &DiffOptions::default(),
            &index,
            &NeverIgnore,
        )
        .unwrap();
        assert!(list.is_empty());
    }
}
