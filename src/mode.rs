//! File mode representation and POSIX canonicalization.

use std::fmt::{self, Display, Formatter};

/// Canonical file mode as understood by trees, the index, and the workdir
/// scanner. Only four kinds are representable; permission bits beyond the
/// owner-execute bit are discarded during canonicalization (§3).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u32)]
pub enum FileMode {
    /// `lstat` returned something we don't track (socket, device, fifo).
    Unknown = 0,
    Reg = 0o100644,
    Exec = 0o100755,
    Link = 0o120000,
    Dir = 0o040000,
    /// Nested repository ("gitlink"). Never recursed into (Non-goal).
    Gitlink = 0o160000,
}

impl FileMode {
    pub fn is_tree(self) -> bool {
        self == FileMode::Dir
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Canonicalize a raw POSIX `st_mode` value, as `canonical_mode` in
    /// libgit2's `diff.c` does: regular files collapse to rw-r--r-- or
    /// rwxr-xr-x based solely on the owner-execute bit, other recognized
    /// types keep their type bits and drop permissions entirely, and
    /// anything else becomes `Unknown`.
    pub fn canonicalize(raw: u32) -> Self {
        const S_IFMT: u32 = 0o170000;
        const S_IFREG: u32 = 0o100000;
        const S_IFLNK: u32 = 0o120000;
        const S_IFDIR: u32 = 0o040000;
        const S_IFGITLINK: u32 = 0o160000;
        const OWNER_EXEC: u32 = 0o100;

        match raw & S_IFMT {
            S_IFREG =>
                if raw & OWNER_EXEC != 0 {
                    FileMode::Exec
                } else {
                    FileMode::Reg
                },
            S_IFLNK => FileMode::Link,
            S_IFDIR => FileMode::Dir,
            S_IFGITLINK => FileMode::Gitlink,
            _ => FileMode::Unknown,
        }
    }

    /// The character appended to a path for sort alignment and shown in
    /// compact-status output (§4.7): `/` for directories, `*` for
    /// executables, space otherwise.
    pub fn suffix_char(self) -> char {
        match self {
            FileMode::Dir => '/',
            FileMode::Exec => '*',
            _ => ' ',
        }
    }
}

impl Display for FileMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_collapses_permission_bits() {
        assert_eq!(FileMode::canonicalize(0o100664), FileMode::Reg);
        assert_eq!(FileMode::canonicalize(0o100775), FileMode::Exec);
        assert_eq!(FileMode::canonicalize(0o100600), FileMode::Reg);
    }

    #[test]
    fn canonicalize_recognizes_links_dirs_gitlinks() {
        assert_eq!(FileMode::canonicalize(0o120777), FileMode::Link);
        assert_eq!(FileMode::canonicalize(0o040755), FileMode::Dir);
        assert_eq!(FileMode::canonicalize(0o160000), FileMode::Gitlink);
    }

    #[test]
    fn canonicalize_unknown_for_special_files() {
        // S_IFSOCK
        assert_eq!(FileMode::canonicalize(0o140000), FileMode::Unknown);
    }

    #[test]
    fn suffix_chars_match_spec() {
        assert_eq!(FileMode::Dir.suffix_char(), '/');
        assert_eq!(FileMode::Exec.suffix_char(), '*');
        assert_eq!(FileMode::Reg.suffix_char(), ' ');
    }
}
