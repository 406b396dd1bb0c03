//! The line-LCS backend collaborator (spec.md §6). Out of scope to
//! reimplement — this module defines [`LineDiffBackend`] at the exact
//! 1/2/3-buffer granularity the original interface describes; C6 (driver)
//! owns turning that into the clean [`crate::driver::LineEvent`] enum
//! spec.md §9 recommends. The default adapter is built on the `similar`
//! crate rather than the teacher's `diffy`, because `similar` diffs at
//! the slice level over pre-split lines, which lets whitespace-ignore
//! options normalize comparison without losing the original line text.

use similar::{ChangeTag, TextDiff};

use crate::error::Result;

#[derive(Clone, Debug)]
pub struct LineDiffParams {
    pub ignore_whitespace: bool,
    pub ignore_whitespace_change: bool,
    pub ignore_whitespace_eol: bool,
    pub context_lines: u32,
    pub interhunk_lines: u32,
}

/// One emission from the backend, at the same granularity the original
/// callback-based interface uses: a bare hunk-header buffer, a
/// two-buffer `(origin, payload)` line, or a three-buffer line plus a
/// trailing "no newline at end of file" marker.
pub enum RawEmission {
    Hunk(Vec<u8>),
    Line(u8, Vec<u8>),
    LineWithEof(u8, Vec<u8>, Vec<u8>),
}

pub trait LineDiffBackend {
    fn diff(&self, old: &[u8], new: &[u8], params: &LineDiffParams) -> Result<Vec<RawEmission>>;
}

pub struct SimilarLineDiff;

const NO_NEWLINE_MARKER: &[u8] = b"\\ No newline at end of file\n";

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            lines.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn normalize(line: &str, params: &LineDiffParams) -> String {
    if params.ignore_whitespace {
        line.chars().filter(|c| !c.is_whitespace()).collect()
    } else if params.ignore_whitespace_change {
        line.split_whitespace().collect::<Vec<_>>().join(" ")
    } else if params.ignore_whitespace_eol {
        line.trim_end_matches(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n').to_owned()
    } else {
        line.to_owned()
    }
}

fn ends_without_newline(text: &str) -> bool {
    !text.is_empty() && !text.ends_with('\n')
}

impl LineDiffBackend for SimilarLineDiff {
    fn diff(&self, old: &[u8], new: &[u8], params: &LineDiffParams) -> Result<Vec<RawEmission>> {
        let old_text = String::from_utf8_lossy(old);
        let new_text = String::from_utf8_lossy(new);
        let old_lines = split_lines(&old_text);
        let new_lines = split_lines(&new_text);

        let old_norm: Vec<String> = old_lines.iter().map(|l| normalize(l, params)).collect();
        let new_norm: Vec<String> = new_lines.iter().map(|l| normalize(l, params)).collect();
        let old_refs: Vec<&str> = old_norm.iter().map(String::as_str).collect();
        let new_refs: Vec<&str> = new_norm.iter().map(String::as_str).collect();

        let diff = TextDiff::from_slices(&old_refs, &new_refs);
        let radius = params.context_lines.max(params.interhunk_lines) as usize;
        let groups = diff.grouped_ops(radius);

        let mut out = Vec::new();
        let last_old_idx = old_lines.len().saturating_sub(1);
        let last_new_idx = new_lines.len().saturating_sub(1);

        for group in &groups {
            let old_start = group.first().map(|op| op.old_range().start).unwrap_or(0);
            let old_end = group.last().map(|op| op.old_range().end).unwrap_or(0);
            let new_start = group.first().map(|op| op.new_range().start).unwrap_or(0);
            let new_end = group.last().map(|op| op.new_range().end).unwrap_or(0);

            out.push(RawEmission::Hunk(format_hunk_header(old_start, old_end, new_start, new_end)));

            for op in group {
                for change in diff.iter_changes(op) {
                    let (origin, idx, line) = match change.tag() {
                        ChangeTag::Delete => {
                            let i = change.old_index().unwrap();
                            (b'-', i, old_lines[i])
                        }
                        ChangeTag::Insert => {
                            let i = change.new_index().unwrap();
                            (b'+', i, new_lines[i])
                        }
                        ChangeTag::Equal => {
                            let i = change.new_index().unwrap();
                            (b' ', i, new_lines[i])
                        }
                    };

                    let missing_eof = match change.tag() {
                        ChangeTag::Delete | ChangeTag::Equal =>
                            idx == last_old_idx && ends_without_newline(&old_text),
                        ChangeTag::Insert => idx == last_new_idx && ends_without_newline(&new_text),
                    };

                    if missing_eof {
                        out.push(RawEmission::LineWithEof(
                            origin,
                            line.as_bytes().to_vec(),
                            NO_NEWLINE_MARKER.to_vec(),
                        ));
                    } else {
                        out.push(RawEmission::Line(origin, line.as_bytes().to_vec()));
                    }
                }
            }
        }

        Ok(out)
    }
}

fn format_hunk_header(old_start: usize, old_end: usize, new_start: usize, new_end: usize) -> Vec<u8> {
    let old_count = old_end - old_start;
    let new_count = new_end - new_start;
    // unified-diff headers are 1-based; an empty range reports its start
    // as the line before it (libgit2/GNU diff convention).
    let old_line = if old_count == 0 { old_start } else { old_start + 1 };
    let new_line = if new_count == 0 { new_start } else { new_start + 1 };
    format!("@@ -{old_line},{old_count} +{new_line},{new_count} @@\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LineDiffParams {
        LineDiffParams {
            ignore_whitespace: false,
            ignore_whitespace_change: false,
            ignore_whitespace_eol: false,
            context_lines: 3,
            interhunk_lines: 3,
        }
    }

    #[test]
    fn identical_text_produces_no_hunks() {
        let out = SimilarLineDiff.diff(b"a\nb\n", b"a\nb\n", &params()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn single_line_change_produces_one_hunk() {
        let out = SimilarLineDiff.diff(b"a\nb\nc\n", b"a\nx\nc\n", &params()).unwrap();
        let hunks = out.iter().filter(|e| matches!(e, RawEmission::Hunk(_))).count();
        assert_eq!(hunks, 1);
    }

    #[test]
    fn missing_trailing_newline_marks_eof() {
        let out = SimilarLineDiff.diff(b"a\nb\n", b"a\nb", &params()).unwrap();
        assert!(out.iter().any(|e| matches!(e, RawEmission::LineWithEof(..))));
    }

    #[test]
    fn ignore_whitespace_hides_pure_whitespace_changes() {
        let mut p = params();
        p.ignore_whitespace = true;
        let out = SimilarLineDiff.diff(b"a b\n", b"ab\n", &p).unwrap();
        assert!(out.is_empty());
    }
}
