//! C6: the diff driver (spec.md §4.6). Resolves blob pairs, classifies
//! binary/text, invokes the line-LCS backend, and demultiplexes its raw
//! 1/2/3-buffer emissions into the clean [`LineEvent`] enum spec.md §9
//! recommends exposing — the buffer-counting stays internal to this
//! module, exactly as the design note asks.

use std::path::Path;

use crate::attr::{is_binary_heuristic, Attr, AttributeEngine};
use crate::delta::{DeltaList, DeltaRecord, DiffOptions, Status};
use crate::error::Result;
use crate::linediff::{LineDiffBackend, LineDiffParams, RawEmission};
use crate::mode::FileMode;
use crate::odb::ObjectDatabase;
use crate::oid::Oid;
use crate::path::PathKey;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Origin {
    Addition,
    Deletion,
    Context,
    AddEofNewline,
    DelEofNewline,
}

impl Origin {
    fn from_byte(b: u8) -> Self {
        match b {
            b'+' => Origin::Addition,
            b'-' => Origin::Deletion,
            _ => Origin::Context,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HunkRange {
    pub old_start: i64,
    pub old_count: u32,
    pub new_start: i64,
    pub new_count: u32,
}

pub enum LineEvent {
    Line { origin: Origin, payload: Vec<u8> },
}

/// Callback layer. Each method defaults to a no-op; an `Err` return from
/// any of them is caller-driven cancellation and aborts `for_each`
/// immediately (spec.md §5's cancellation model).
pub trait DiffCallbacks {
    fn file(&mut self, _record: &DeltaRecord, _progress: f32) -> Result<()> {
        Ok(())
    }
    fn hunk(&mut self, _record: &DeltaRecord, _range: &HunkRange, _header: &[u8]) -> Result<()> {
        Ok(())
    }
    fn line(&mut self, _record: &DeltaRecord, _event: &LineEvent) -> Result<()> {
        Ok(())
    }
}

impl From<&DiffOptions> for LineDiffParams {
    fn from(opts: &DiffOptions) -> Self {
        Self {
            ignore_whitespace: opts.ignore_whitespace,
            ignore_whitespace_change: opts.ignore_whitespace_change,
            ignore_whitespace_eol: opts.ignore_whitespace_eol,
            context_lines: opts.context_lines,
            interhunk_lines: opts.interhunk_lines,
        }
    }
}

/// Iterates `list` in order, invoking `callbacks` per record and per
/// hunk/line. `workdir_root`, when given, lets a `modified` record whose
/// `new_hash` is still zero (the stat-fast-path deferred hashing) be
/// re-read and re-hashed from disk rather than treated as empty.
pub fn for_each(
    list: &mut DeltaList,
    odb: &dyn ObjectDatabase,
    attrs: &dyn AttributeEngine,
    backend: &dyn LineDiffBackend,
    options: &DiffOptions,
    workdir_root: Option<&Path>,
    callbacks: &mut dyn DiffCallbacks,
) -> Result<()> {
    let total = list.len();
    let records = list.records_mut();

    for (i, record) in records.iter_mut().enumerate() {
        let progress = if total == 0 { 1.0 } else { (i + 1) as f32 / total as f32 };

        let (old_bytes, new_bytes) = load_bytes(record, odb, workdir_root)?;
        record.old_bytes = Some(old_bytes);
        record.new_bytes = Some(new_bytes);

        record.binary = Some(classify_binary(record, options, attrs)?);

        callbacks.file(record, progress)?;

        let both_empty = record
            .old_bytes
            .as_ref()
            .map_or(true, Vec::is_empty)
            && record.new_bytes.as_ref().map_or(true, Vec::is_empty);

        if record.binary != Some(true) && !both_empty {
            let params = LineDiffParams::from(options);
            let old_bytes = record.old_bytes.as_deref().unwrap_or(&[]);
            let new_bytes = record.new_bytes.as_deref().unwrap_or(&[]);
            let raw = backend.diff(old_bytes, new_bytes, &params)?;
            drive_events(record, &raw, callbacks)?;
        }

        record.old_bytes = None;
        record.new_bytes = None;
    }
    Ok(())
}

fn load_bytes(
    record: &DeltaRecord,
    odb: &dyn ObjectDatabase,
    workdir_root: Option<&Path>,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let old_bytes =
        if record.old_hash.is_zero() { Vec::new() } else { odb.read_blob(record.old_hash)? };

    let new_bytes = if !record.new_hash.is_zero() {
        odb.read_blob(record.new_hash)?
    } else if record.status == Status::Modified {
        match workdir_root {
            Some(root) => read_from_workdir(root, &record.new_path, record.new_mode)?,
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    Ok((old_bytes, new_bytes))
}

fn read_from_workdir(root: &Path, path: &PathKey, mode: FileMode) -> Result<Vec<u8>> {
    let abs = root.join(path.as_str());
    if mode == FileMode::Link {
        Ok(std::fs::read_link(abs)?.to_string_lossy().into_owned().into_bytes())
    } else {
        Ok(std::fs::read(abs)?)
    }
}

fn classify_binary(
    record: &DeltaRecord,
    options: &DiffOptions,
    attrs: &dyn AttributeEngine,
) -> Result<bool> {
    if options.force_text {
        return Ok(false);
    }
    match attrs.diff_attr(record.path.as_str()) {
        Attr::Text => Ok(false),
        Attr::Binary => Ok(true),
        Attr::Unset => {
            let new_is_binary = record.new_bytes.as_deref().map(is_binary_heuristic).unwrap_or(false);
            let old_is_binary = record.old_bytes.as_deref().map(is_binary_heuristic).unwrap_or(false);
            Ok(new_is_binary || old_is_binary)
        }
    }
}

fn drive_events(
    record: &DeltaRecord,
    raw: &[RawEmission],
    callbacks: &mut dyn DiffCallbacks,
) -> Result<()> {
    let mut skipping = false;
    for emission in raw {
        match emission {
            RawEmission::Hunk(header) => match parse_hunk_header(header) {
                Some(range) => {
                    skipping = false;
                    callbacks.hunk(record, &range, header)?;
                }
                None => skipping = true,
            },
            RawEmission::Line(origin_byte, payload) => {
                if skipping {
                    continue;
                }
                let origin = Origin::from_byte(*origin_byte);
                callbacks.line(record, &LineEvent::Line { origin, payload: payload.clone() })?;
            }
            RawEmission::LineWithEof(origin_byte, payload, marker) => {
                if skipping {
                    continue;
                }
                let origin = Origin::from_byte(*origin_byte);
                callbacks.line(record, &LineEvent::Line { origin, payload: payload.clone() })?;
                let eof_origin =
                    if origin == Origin::Addition { Origin::AddEofNewline } else { Origin::DelEofNewline };
                callbacks
                    .line(record, &LineEvent::Line { origin: eof_origin, payload: marker.clone() })?;
            }
        }
    }
    Ok(())
}

/// Parses `@@ -start[,count] +start[,count] @@` with a forgiving integer
/// reader that skips non-digit characters. A negative parsed start
/// aborts the whole hunk (spec.md §4.6, §9's supplemented detail).
pub fn parse_hunk_header(header: &[u8]) -> Option<HunkRange> {
    let text = String::from_utf8_lossy(header);
    let old_marker = text.find('-')?;
    let new_marker = text[old_marker + 1..].find('+')? + old_marker + 1;

    let old_segment = &text[old_marker + 1..new_marker];
    let (old_start, old_count) = parse_range(old_segment);

    let rest = &text[new_marker + 1..];
    let end = rest.find("@@").unwrap_or(rest.len());
    let (new_start, new_count) = parse_range(&rest[..end]);

    if old_start < 0 || new_start < 0 {
        return None;
    }

    Some(HunkRange { old_start, old_count, new_start, new_count })
}

fn parse_range(segment: &str) -> (i64, u32) {
    let mut chars = segment.chars().peekable();
    let start = read_int(&mut chars);
    let mut count = 0u32;
    if chars.peek() == Some(&',') {
        chars.next();
        count = read_int(&mut chars).max(0) as u32;
    }
    (start, count)
}

fn read_int(chars: &mut std::iter::Peekable<impl Iterator<Item = char>>) -> i64 {
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '-' {
            break;
        }
        chars.next();
    }
    let neg = if chars.peek() == Some(&'-') {
        chars.next();
        true
    } else {
        false
    };
    let mut n: i64 = 0;
    let mut any = false;
    while let Some(&c) = chars.peek() {
        if let Some(d) = c.to_digit(10) {
            n = n * 10 + d as i64;
            any = true;
            chars.next();
        } else {
            break;
        }
    }
    if !any {
        return 0;
    }
    if neg {
        -n
    } else {
        n
    }
}

/// `diff_blobs` (spec.md §6): a throwaway record with mode `0100644` on
/// both present sides, for diffing two buffers without any tree, index,
/// or workdir behind them.
pub fn diff_blobs(
    old_bytes: &[u8],
    new_bytes: &[u8],
    options: &DiffOptions,
    backend: &dyn LineDiffBackend,
    callbacks: &mut dyn DiffCallbacks,
) -> Result<()> {
    let old_mode = if old_bytes.is_empty() { FileMode::Unknown } else { FileMode::Reg };
    let new_mode = if new_bytes.is_empty() { FileMode::Unknown } else { FileMode::Reg };
    let old_hash = if old_bytes.is_empty() { Oid::UNKNOWN } else { Oid::hash_bytes(old_bytes) };
    let new_hash = if new_bytes.is_empty() { Oid::UNKNOWN } else { Oid::hash_bytes(new_bytes) };
    let status = match (old_bytes.is_empty(), new_bytes.is_empty()) {
        (true, false) => Status::Added,
        (false, true) => Status::Deleted,
        _ => Status::Modified,
    };

    let mut record =
        DeltaRecord::new(status, PathKey::new(""), old_mode, new_mode, old_hash, new_hash);

    let binary = !options.force_text
        && (is_binary_heuristic(old_bytes) || is_binary_heuristic(new_bytes));
    record.binary = Some(binary);
    callbacks.file(&record, 1.0)?;
    if binary {
        return Ok(());
    }

    let params = LineDiffParams::from(options);
    let raw = backend.diff(old_bytes, new_bytes, &params)?;
    drive_events(&record, &raw, callbacks)
}
