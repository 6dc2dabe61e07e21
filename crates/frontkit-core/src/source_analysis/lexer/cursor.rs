// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Character cursor shared by the lexers.
//!
//! Tracks the byte offset, the 0-based line and character column, and the
//! visual column used for indentation (tabs advance to the next multiple of
//! [`TAB_WIDTH`], a form feed resets it).

use std::iter::Peekable;
use std::str::CharIndices;

use crate::source_analysis::{FileId, LineCol, SourceLoc};

/// Tab stops used when measuring indentation.
pub const TAB_WIDTH: u32 = 8;

/// A position-tracking view over source text.
#[derive(Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    position: usize,
    line: u32,
    col: u32,
    visual_col: u32,
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("line", &self.line)
            .field("col", &self.col)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Cursor<'src> {
    /// Creates a cursor at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            line: 0,
            col: 0,
            visual_col: 0,
        }
    }

    /// Peeks at the next character without consuming it.
    pub fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is same as `peek_char`).
    #[must_use]
    pub fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    pub fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.col = 0;
                self.visual_col = 0;
            }
            '\t' => {
                self.col += 1;
                self.visual_col = (self.visual_col / TAB_WIDTH + 1) * TAB_WIDTH;
            }
            '\x0c' => {
                self.col += 1;
                self.visual_col = 0;
            }
            _ => {
                self.col += 1;
                self.visual_col += 1;
            }
        }
        Some(c)
    }

    /// Consumes the next character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes characters while the predicate is true.
    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns `true` once every character has been consumed.
    pub fn is_at_end(&mut self) -> bool {
        self.peek_char().is_none()
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the current line and character column.
    #[must_use]
    pub const fn line_col(&self) -> LineCol {
        LineCol::new(self.line, self.col)
    }

    /// Returns the current column with tabs expanded.
    #[must_use]
    pub const fn visual_col(&self) -> u32 {
        self.visual_col
    }

    /// Returns the location from `start` to the current position.
    #[must_use]
    pub fn loc_from(&self, start: LineCol, file: FileId) -> SourceLoc {
        SourceLoc::new(start, self.line_col(), file)
    }

    /// Returns the source text from byte offset `start` to the current position.
    #[must_use]
    pub fn text_from(&self, start: usize) -> &'src str {
        self.source.get(start..self.position).unwrap_or("")
    }

    /// Skips spaces, tabs and form feeds and returns the visual column reached.
    pub fn skip_indentation(&mut self) -> u32 {
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\x0c'));
        self.visual_col
    }
}
