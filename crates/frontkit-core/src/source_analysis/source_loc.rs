// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and AST node carries a [`SourceLoc`]: a start and end
//! position expressed as 0-based line and column numbers, plus the id of the
//! file it came from. Columns count characters, and the end column is
//! exclusive.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// A 0-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct LineCol {
    /// 0-based line number.
    pub line: u32,
    /// 0-based column, counted in characters.
    pub col: u32,
}

impl LineCol {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Identifies the file a location belongs to.
///
/// Ids are handed out by whoever drives the parse; a single-file parse can
/// use the default id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct FileId(pub u32);

/// A span of source code between two line/column positions.
///
/// # Examples
///
/// ```
/// use frontkit_core::source_analysis::{FileId, LineCol, SourceLoc};
///
/// let import = SourceLoc::new(LineCol::new(0, 0), LineCol::new(0, 6), FileId::default());
/// let name = SourceLoc::new(LineCol::new(0, 7), LineCol::new(0, 10), FileId::default());
/// let joined = import.join(name);
/// assert_eq!(joined.to_string(), "0:0[0:10]");
/// assert!(joined.contains(import) && joined.contains(name));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct SourceLoc {
    file: FileId,
    start: LineCol,
    end: LineCol,
}

impl SourceLoc {
    /// The empty location: every coordinate zero.
    pub const EMPTY: Self = Self {
        file: FileId(0),
        start: LineCol::new(0, 0),
        end: LineCol::new(0, 0),
    };

    /// Creates a location from its start and (exclusive) end positions.
    #[must_use]
    pub fn new(start: LineCol, end: LineCol, file: FileId) -> Self {
        debug_assert!(start <= end, "location end {end} precedes start {start}");
        Self { file, start, end }
    }

    /// Creates a location from raw coordinates in the default file.
    #[must_use]
    pub fn from_coords(line: u32, col: u32, last_line: u32, last_col: u32) -> Self {
        Self::new(
            LineCol::new(line, col),
            LineCol::new(last_line, last_col),
            FileId::default(),
        )
    }

    /// Creates a zero-width location at `at`.
    #[must_use]
    pub const fn point(at: LineCol, file: FileId) -> Self {
        Self {
            file,
            start: at,
            end: at,
        }
    }

    /// Returns the start position.
    #[must_use]
    pub const fn start(self) -> LineCol {
        self.start
    }

    /// Returns the end position (exclusive).
    #[must_use]
    pub const fn end(self) -> LineCol {
        self.end
    }

    /// Returns the file this location belongs to.
    #[must_use]
    pub const fn file(self) -> FileId {
        self.file
    }

    /// Returns `true` for the all-zero sentinel.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.file.0 == 0
            && self.start.line == 0
            && self.start.col == 0
            && self.end.line == 0
            && self.end.col == 0
    }

    /// Returns `true` if the location covers no characters.
    ///
    /// Synthesized tokens (INDENT, DEDENT, implicit braces) have zero width.
    #[must_use]
    pub const fn is_zero_width(self) -> bool {
        self.start.line == self.end.line && self.start.col == self.end.col
    }

    /// Returns a zero-width location at this location's start.
    #[must_use]
    pub const fn at_start(self) -> Self {
        Self::point(self.start, self.file)
    }

    /// Returns true if `other` is fully contained within `self`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.file == other.file && self.start <= other.start && other.end <= self.end
    }

    /// Creates a location running from the start of `self` to the end of `other`.
    ///
    /// Both locations must belong to the same file.
    #[must_use]
    pub fn join(self, other: Self) -> Self {
        debug_assert_eq!(
            self.file, other.file,
            "joining locations from different files"
        );
        Self {
            file: self.file,
            start: self.start,
            end: other.end,
        }
    }

    /// Converts to a byte range within `source`.
    ///
    /// Positions past the end of a line or of the input are clamped.
    #[must_use]
    pub fn byte_range(self, source: &str) -> Range<usize> {
        let start = byte_offset(source, self.start);
        let end = byte_offset(source, self.end).max(start);
        start..end
    }

    /// Converts to a miette span within `source`.
    #[must_use]
    pub fn to_source_span(self, source: &str) -> miette::SourceSpan {
        let range = self.byte_range(source);
        (range.start, range.len()).into()
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.start, self.end)
    }
}

/// Finds the byte offset of a line/column position.
fn byte_offset(source: &str, at: LineCol) -> usize {
    let mut line_start = 0;
    for _ in 0..at.line {
        match source[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return source.len(),
        }
    }
    let rest = &source[line_start..];
    let line_len = rest.find('\n').map_or(rest.len(), |newline| newline + 1);
    rest[..line_len]
        .char_indices()
        .nth(at.col as usize)
        .map_or(line_start + line_len, |(offset, _)| line_start + offset)
}
