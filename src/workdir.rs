//! C4: the workdir scanner. Lists and sorts one directory's direct
//! children, `lstat`s them, canonicalizes their mode, and suffixes
//! directory names with `/` so sort order lines up with trees and the
//! index (spec.md §4.4).

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::error::Result;
use crate::index::StatCache;
use crate::mode::FileMode;
use crate::path::PathKey;

/// Name of the directory that marks a nested repository. A directory
/// containing this entry is a submodule boundary and is never recursed
/// into (spec.md's explicit Non-goal on submodule recursion).
pub const NESTED_REPO_SENTINEL: &str = ".vcsroot";

#[derive(Clone, Debug)]
pub struct WorkdirEntry {
    /// Path relative to the scan root, directory-suffixed with `/`.
    pub path: PathKey,
    pub mode: FileMode,
    pub file_size: u64,
    pub stat: StatCache,
}

fn stat_cache_of(meta: &fs::Metadata) -> StatCache {
    StatCache {
        ctime: (meta.ctime(), meta.ctime_nsec()),
        mtime: (meta.mtime(), meta.mtime_nsec()),
        dev: meta.dev(),
        ino: meta.ino(),
        uid: meta.uid(),
        gid: meta.gid(),
    }
}

/// Lists the direct children of `root/rel_dir`, sorted by byte-wise path
/// compare with directory entries `/`-suffixed. Unrecognized file types
/// (sockets, devices, fifos) are dropped, as spec.md §4.4 requires.
pub fn scan_dir(root: &Path, rel_dir: &PathKey) -> Result<Vec<WorkdirEntry>> {
    let abs_dir = if rel_dir.is_empty() { root.to_path_buf() } else { root.join(rel_dir.as_str()) };

    let mut entries = Vec::new();
    for dirent in fs::read_dir(&abs_dir)? {
        let dirent = dirent?;
        let name = dirent.file_name();
        let name = name.to_string_lossy();
        let meta = dirent.metadata()?;
        let raw_mode = meta.mode();
        let mode = if meta.is_symlink() {
            FileMode::Link
        } else {
            FileMode::canonicalize(raw_mode)
        };
        if mode == FileMode::Unknown {
            continue;
        }

        let path = rel_dir.join(&name);
        let path = if mode.is_tree() { path.with_trailing_slash() } else { path };

        entries.push(WorkdirEntry {
            path,
            mode,
            file_size: if mode.is_tree() { 0 } else { meta.len() },
            stat: stat_cache_of(&meta),
        });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

/// `true` if `dir` (scanned relative to `root`) contains the nested-repo
/// sentinel and should be skipped wholesale rather than recursed into.
pub fn is_nested_repo(root: &Path, rel_dir: &PathKey) -> bool {
    let abs = root.join(rel_dir.as_str()).join(NESTED_REPO_SENTINEL);
    abs.exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_sorts_and_suffixes_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.txt"), b"hi").unwrap();
        fs::create_dir(dir.path().join("foo")).unwrap();
        fs::write(dir.path().join("foo0"), b"hi").unwrap();

        let entries = scan_dir(dir.path(), &PathKey::new("")).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["foo.txt", "foo/", "foo0"]);
    }

    #[test]
    fn nested_repo_sentinel_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::create_dir(dir.path().join("sub").join(NESTED_REPO_SENTINEL)).unwrap();
        assert!(is_nested_repo(dir.path(), &PathKey::new("sub/")));
        assert!(!is_nested_repo(dir.path(), &PathKey::new("")));
    }
}
