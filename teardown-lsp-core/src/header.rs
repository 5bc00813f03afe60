//! Header-line classification: the first stage of document scanning.
//!
//! The header block is the leading run of `#version` / `#include` lines.
//! Classifying lines independently of call-site scanning keeps the
//! insertion-point rule testable on its own.

use crate::config::SourceLanguage;
use lsp_types::Position;

pub const VERSION_MARKER: &str = "#version";
pub const INCLUDE_MARKER: &str = "#include";
pub const DIRECTIVE_MARKER: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Version,
    Include,
    /// Any other `#` directive
    Directive,
    Comment,
    Blank,
    Code,
}

impl LineKind {
    /// Version and include lines extend the header block
    pub fn is_header(self) -> bool {
        matches!(self, LineKind::Version | LineKind::Include)
    }
}

pub fn classify_line(line: &str, language: &SourceLanguage) -> LineKind {
    let line = line.trim();

    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with(VERSION_MARKER) {
        LineKind::Version
    } else if line.starts_with(INCLUDE_MARKER) {
        LineKind::Include
    } else if line.starts_with(&language.comment_prefix) {
        LineKind::Comment
    } else if line.starts_with(DIRECTIVE_MARKER) {
        LineKind::Directive
    } else {
        LineKind::Code
    }
}

/// Line just after the last header line seen before the first code line,
/// or 0 when the document has no header lines.
pub fn header_end_line(text: &str, language: &SourceLanguage) -> u32 {
    let mut insert_line = 0;

    for (index, line) in text.split('\n').enumerate() {
        match classify_line(line, language) {
            kind if kind.is_header() => insert_line = index as u32 + 1,
            LineKind::Code => break,
            _ => {}
        }
    }

    insert_line
}

/// Where a new `#include` line should be inserted
pub fn include_insert_position(text: &str, language: &SourceLanguage) -> Position {
    Position::new(header_end_line(text, language), 0)
}
