//! C7: the patch formatter (spec.md §4.7) — two convenience entry points,
//! `print_compact` and `print_patch`, built over C6's callback layer.

use crate::delta::{DeltaList, DeltaRecord, DiffOptions, Status};
use crate::driver::{self, DiffCallbacks, HunkRange, LineEvent, Origin};
use crate::error::Result;
use crate::linediff::LineDiffBackend;
use crate::mode::FileMode;
use crate::odb::ObjectDatabase;
use crate::attr::AttributeEngine;
use std::path::Path;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineKind {
    FileHeader,
    HunkHeader,
    Binary,
    Context,
    Addition,
    Deletion,
    AddEofNl,
    DelEofNl,
}

pub trait PatchSink {
    fn emit(&mut self, kind: LineKind, bytes: &[u8]) -> Result<()>;
}

/// Collects emitted bytes in order, ignoring `kind` — convenient for
/// tests and for callers that just want the raw patch text.
#[derive(Default)]
pub struct BufferSink(pub Vec<u8>);

impl PatchSink for BufferSink {
    fn emit(&mut self, _kind: LineKind, bytes: &[u8]) -> Result<()> {
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

/// `FileMode::suffix_char` returns a space for plain files; compact output
/// omits the suffix entirely in that case rather than printing it.
fn compact_suffix(mode: FileMode) -> Option<char> {
    match mode.suffix_char() {
        ' ' => None,
        c => Some(c),
    }
}

/// Per-record: status code, tab, path, optional type-suffix characters,
/// optional mode annotation, newline.
pub fn print_compact(list: &DeltaList, sink: &mut dyn PatchSink) -> Result<()> {
    for record in list.records() {
        let mut line = format!("{}\t{}", record.status, record.path);
        if let Some(c) = compact_suffix(record.old_mode) {
            line.push(c);
        }
        if let Some(c) = compact_suffix(record.new_mode) {
            line.push(c);
        }
        if record.old_mode != record.new_mode
            && record.old_mode != FileMode::Unknown
            && record.new_mode != FileMode::Unknown
        {
            line.push_str(&format!(" {:o}..{:o}", record.old_mode.as_u32(), record.new_mode.as_u32()));
        }
        line.push('\n');
        sink.emit(LineKind::FileHeader, line.as_bytes())?;
    }
    Ok(())
}

struct PatchPrinter<'s> {
    sink: &'s mut dyn PatchSink,
    src_prefix: String,
    dst_prefix: String,
}

impl<'s> DiffCallbacks for PatchPrinter<'s> {
    fn file(&mut self, record: &DeltaRecord, _progress: f32) -> Result<()> {
        let header = format!(
            "diff --git {}{} {}{}\n",
            self.src_prefix, record.path, self.dst_prefix, record.new_path
        );
        self.sink.emit(LineKind::FileHeader, header.as_bytes())?;

        let modes_known = record.old_mode != FileMode::Unknown && record.new_mode != FileMode::Unknown;
        if modes_known && record.old_mode != record.new_mode {
            self.sink.emit(
                LineKind::FileHeader,
                format!("old mode {:o}\n", record.old_mode.as_u32()).as_bytes(),
            )?;
            self.sink.emit(
                LineKind::FileHeader,
                format!("new mode {:o}\n", record.new_mode.as_u32()).as_bytes(),
            )?;
            self.sink.emit(
                LineKind::FileHeader,
                format!("index {}..{}\n", record.old_hash.short(), record.new_hash.short())
                    .as_bytes(),
            )?;
        } else {
            let suffix =
                if modes_known { format!(" {:o}", record.new_mode.as_u32()) } else { String::new() };
            self.sink.emit(
                LineKind::FileHeader,
                format!("index {}..{}{}\n", record.old_hash.short(), record.new_hash.short(), suffix)
                    .as_bytes(),
            )?;
        }

        let old_label = if record.old_hash.is_zero() {
            "/dev/null".to_owned()
        } else {
            format!("{}{}", self.src_prefix, record.path)
        };
        let new_label = if record.new_hash.is_zero() {
            "/dev/null".to_owned()
        } else {
            format!("{}{}", self.dst_prefix, record.new_path)
        };
        self.sink.emit(LineKind::FileHeader, format!("--- {old_label}\n").as_bytes())?;
        self.sink.emit(LineKind::FileHeader, format!("+++ {new_label}\n").as_bytes())?;

        if record.binary == Some(true) {
            self.sink.emit(
                LineKind::Binary,
                format!("Binary files {old_label} and {new_label} differ\n").as_bytes(),
            )?;
        }
        Ok(())
    }

    fn hunk(&mut self, _record: &DeltaRecord, _range: &HunkRange, header: &[u8]) -> Result<()> {
        self.sink.emit(LineKind::HunkHeader, header)
    }

    fn line(&mut self, _record: &DeltaRecord, event: &LineEvent) -> Result<()> {
        let LineEvent::Line { origin, payload } = event;
        match origin {
            Origin::Addition => {
                let mut buf = vec![b'+'];
                buf.extend_from_slice(payload);
                self.sink.emit(LineKind::Addition, &buf)
            }
            Origin::Deletion => {
                let mut buf = vec![b'-'];
                buf.extend_from_slice(payload);
                self.sink.emit(LineKind::Deletion, &buf)
            }
            Origin::Context => {
                let mut buf = vec![b' '];
                buf.extend_from_slice(payload);
                self.sink.emit(LineKind::Context, &buf)
            }
            Origin::AddEofNewline => self.sink.emit(LineKind::AddEofNl, payload),
            Origin::DelEofNewline => self.sink.emit(LineKind::DelEofNl, payload),
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn print_patch(
    list: &mut DeltaList,
    odb: &dyn ObjectDatabase,
    attrs: &dyn AttributeEngine,
    backend: &dyn LineDiffBackend,
    options: &DiffOptions,
    workdir_root: Option<&Path>,
    sink: &mut dyn PatchSink,
) -> Result<()> {
    let src_prefix = list.src_prefix().to_owned();
    let dst_prefix = list.dst_prefix().to_owned();
    let mut printer = PatchPrinter { sink, src_prefix, dst_prefix };
    driver::for_each(list, odb, attrs, backend, options, workdir_root, &mut printer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linediff::SimilarLineDiff;
    use crate::odb::InMemoryOdb;
    use crate::oid::Oid;
    use crate::path::PathKey;
    use crate::attr::UnsetAttributes;

    #[test]
    fn compact_add_matches_scenario_one() {
        let mut list = DeltaList::allocate(&DiffOptions::default());
        list.append(DeltaRecord::new(
            Status::Added,
            PathKey::new("foo"),
            FileMode::Unknown,
            FileMode::Reg,
            Oid::UNKNOWN,
            Oid::hash_bytes(b"hi"),
        ));
        let mut sink = BufferSink::default();
        print_compact(&list, &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink.0).unwrap(), "A\tfoo\n");
    }

    #[test]
    fn patch_delete_ends_with_dev_null_and_minus_lines() {
        let mut odb = InMemoryOdb::new();
        let old_oid = odb.insert(b"hi\n".to_vec());
        let mut list = DeltaList::allocate(&DiffOptions::default());
        list.append(DeltaRecord::new(
            Status::Deleted,
            PathKey::new("foo"),
            FileMode::Reg,
            FileMode::Unknown,
            old_oid,
            Oid::UNKNOWN,
        ));
        let mut sink = BufferSink::default();
        print_patch(
            &mut list,
            &odb,
            &UnsetAttributes,
            &SimilarLineDiff,
            &DiffOptions::default(),
            None,
            &mut sink,
        )
        .unwrap();
        let text = String::from_utf8(sink.0).unwrap();
        assert!(text.starts_with("diff --git a/foo b/foo\n"));
        assert!(text.contains("+++ /dev/null\n"));
        assert!(text.contains("-hi\n"));
    }
}
