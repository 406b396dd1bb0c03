//! C1: the delta record and delta list, and the options that configure
//! every enumerator and the driver.

use crate::mode::FileMode;
use crate::oid::Oid;
use crate::path::PathKey;
use crate::pathspec::Pathspec;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Added,
    Deleted,
    Modified,
    /// Reserved — similarity field exists but no detector produces this.
    Renamed,
    /// Reserved — similarity field exists but no detector produces this.
    Copied,
    Ignored,
    Untracked,
}

impl Status {
    fn code(self) -> char {
        match self {
            Status::Added => 'A',
            Status::Deleted => 'D',
            Status::Modified => 'M',
            Status::Renamed => 'R',
            Status::Copied => 'C',
            Status::Ignored => 'I',
            Status::Untracked => '?',
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Either the shared default prefix (never freed — a `'static` str in
/// this implementation) or a uniquely owned copy. Spec.md §9 asks for
/// exactly this tagged variant in place of the source's pointer-identity
/// check.
#[derive(Clone, Debug)]
pub enum Prefix {
    Default(&'static str),
    Owned(String),
}

impl Prefix {
    pub fn as_str(&self) -> &str {
        match self {
            Prefix::Default(s) => s,
            Prefix::Owned(s) => s,
        }
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Prefix::Default("a/")
    }
}

/// One path's result record, owned by the [`DeltaList`] that produced it.
#[derive(Clone, Debug)]
pub struct DeltaRecord {
    pub status: Status,
    /// Old path; the primary identity of the record.
    pub path: PathKey,
    /// New path. Equal to `path` unless a rename is recorded (never,
    /// today — rename detection is a Non-goal).
    pub new_path: PathKey,
    pub old_mode: FileMode,
    pub new_mode: FileMode,
    pub old_hash: Oid,
    pub new_hash: Oid,
    /// Set lazily by the diff driver (C6), not at enumeration time.
    pub binary: Option<bool>,
    /// 0-100, reserved for a future rename/copy detector.
    pub similarity: u8,
    pub old_bytes: Option<Vec<u8>>,
    pub new_bytes: Option<Vec<u8>>,
}

impl DeltaRecord {
    pub fn new(
        status: Status,
        path: PathKey,
        old_mode: FileMode,
        new_mode: FileMode,
        old_hash: Oid,
        new_hash: Oid,
    ) -> Self {
        let record = Self {
            status,
            new_path: path.clone(),
            path,
            old_mode,
            new_mode,
            old_hash,
            new_hash,
            binary: None,
            similarity: 0,
            old_bytes: None,
            new_bytes: None,
        };
        debug_assert!(record.check_invariants());
        record
    }

    fn check_invariants(&self) -> bool {
        match self.status {
            Status::Added => self.old_mode == FileMode::Unknown && self.old_hash.is_zero(),
            Status::Deleted => self.new_mode == FileMode::Unknown && self.new_hash.is_zero(),
            Status::Modified =>
                self.old_mode != FileMode::Unknown
                    && self.new_mode != FileMode::Unknown
                    && (self.old_hash != self.new_hash || self.old_mode != self.new_mode),
            _ => true,
        }
    }

    /// Swap old/new polarity in place: `added`↔`deleted`, modes and
    /// hashes swapped. Applying this twice is the identity (invariant 2
    /// in spec.md §8).
    fn invert(mut self) -> Self {
        self.status = match self.status {
            Status::Added => Status::Deleted,
            Status::Deleted => Status::Added,
            other => other,
        };
        std::mem::swap(&mut self.old_mode, &mut self.new_mode);
        std::mem::swap(&mut self.old_hash, &mut self.new_hash);
        std::mem::swap(&mut self.old_bytes, &mut self.new_bytes);
        self
    }
}

/// Configuration shared by every enumerator and the driver (spec.md §3).
#[derive(Clone, Debug)]
pub struct DiffOptions {
    pub context_lines: u32,
    pub interhunk_lines: u32,
    pub reverse: bool,
    pub force_text: bool,
    pub ignore_whitespace: bool,
    pub ignore_whitespace_change: bool,
    pub ignore_whitespace_eol: bool,
    pub src_prefix: Option<String>,
    pub dst_prefix: Option<String>,
    pub pathspec: Pathspec,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            interhunk_lines: 3,
            reverse: false,
            force_text: false,
            ignore_whitespace: false,
            ignore_whitespace_change: false,
            ignore_whitespace_eol: false,
            src_prefix: None,
            dst_prefix: None,
            pathspec: Pathspec::default(),
        }
    }
}

/// Owns every record appended to it, plus its own copy of the source and
/// destination path prefixes. Allocated once per enumerator call,
/// populated to completion, handed to the driver.
#[derive(Debug)]
pub struct DeltaList {
    records: Vec<DeltaRecord>,
    src_prefix: Prefix,
    dst_prefix: Prefix,
    reverse: bool,
}

impl DeltaList {
    /// Allocates an empty list, swapping the prefixes once up front if
    /// `options.reverse` is set.
    pub fn allocate(options: &DiffOptions) -> Self {
        let mut src_prefix =
            options.src_prefix.clone().map_or(Prefix::Default("a/"), Prefix::Owned);
        let mut dst_prefix =
            options.dst_prefix.clone().map_or(Prefix::Default("b/"), Prefix::Owned);
        if options.reverse {
            std::mem::swap(&mut src_prefix, &mut dst_prefix);
        }
        Self { records: Vec::new(), src_prefix, dst_prefix, reverse: options.reverse }
    }

    /// Takes ownership of `record`, inverting its polarity first if this
    /// list was allocated with `reverse` set.
    pub fn append(&mut self, record: DeltaRecord) {
        let record = if self.reverse { record.invert() } else { record };
        self.records.push(record);
    }

    pub fn src_prefix(&self) -> &str {
        self.src_prefix.as_str()
    }

    pub fn dst_prefix(&self) -> &str {
        self.dst_prefix.as_str()
    }

    pub fn records(&self) -> &[DeltaRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [DeltaRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<DeltaRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(b: u8) -> Oid {
        Oid::hash_bytes(&[b])
    }

    #[test]
    fn added_record_satisfies_invariants() {
        let r = DeltaRecord::new(
            Status::Added,
            PathKey::new("foo"),
            FileMode::Unknown,
            FileMode::Reg,
            Oid::UNKNOWN,
            oid(1),
        );
        assert!(r.check_invariants());
    }

    #[test]
    fn reverse_twice_is_identity() {
        let r = DeltaRecord::new(
            Status::Modified,
            PathKey::new("foo"),
            FileMode::Reg,
            FileMode::Reg,
            oid(1),
            oid(2),
        );
        let twice = r.clone().invert().invert();
        assert_eq!(twice.status, r.status);
        assert_eq!(twice.old_hash, r.old_hash);
        assert_eq!(twice.new_hash, r.new_hash);
    }

    #[test]
    fn reverse_option_swaps_prefixes_and_status() {
        let mut opts = DiffOptions::default();
        opts.reverse = true;
        let mut list = DeltaList::allocate(&opts);
        assert_eq!(list.src_prefix(), "b/");
        assert_eq!(list.dst_prefix(), "a/");

        list.append(DeltaRecord::new(
            Status::Added,
            PathKey::new("foo"),
            FileMode::Unknown,
            FileMode::Reg,
            Oid::UNKNOWN,
            oid(1),
        ));
        assert_eq!(list.records()[0].status, Status::Deleted);
    }

    #[test]
    fn default_prefixes_are_static() {
        let list = DeltaList::allocate(&DiffOptions::default());
        assert_eq!(list.src_prefix(), "a/");
        assert_eq!(list.dst_prefix(), "b/");
    }
}
