// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Per-file parsing state shared by a lexer and a parser.
//!
//! **DDD Context:** Source Analysis

use camino::{Utf8Path, Utf8PathBuf};

use super::{Diagnostic, DiagnosticKind, FileId, Lexeme, LexemeTable, LineCol, SourceLoc};
use crate::ast::{Name, Program};

/// Everything a lexer and parser accumulate while processing one file.
///
/// The context owns the diagnostics, the lexeme table and, once parsing
/// succeeds, the finished [`Program`]. One context serves exactly one file
/// and one parse; it is not shared between threads while in use.
#[derive(Debug, Default)]
pub struct ParsingContext {
    file_name: Option<Utf8PathBuf>,
    file_id: FileId,
    allow_comments: bool,
    diagnostics: Vec<Diagnostic>,
    lexemes: LexemeTable,
    program: Option<Program>,
}

impl ParsingContext {
    /// Creates a context with comments discarded and no file name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context for the named file.
    #[must_use]
    pub fn for_file(file_name: impl Into<Utf8PathBuf>) -> Self {
        let mut context = Self::new();
        context.set_file_name(file_name);
        context
    }

    /// Sets the name of the file being processed.
    pub fn set_file_name(&mut self, file_name: impl Into<Utf8PathBuf>) {
        self.file_name = Some(file_name.into());
    }

    /// Returns the name of the file being processed, if one was set.
    #[must_use]
    pub fn file_name(&self) -> Option<&Utf8Path> {
        self.file_name.as_deref()
    }

    /// Sets the id stamped on every location produced for this file.
    pub fn set_file_id(&mut self, file_id: FileId) {
        self.file_id = file_id;
    }

    /// Returns the id stamped on locations produced for this file.
    #[must_use]
    pub const fn file_id(&self) -> FileId {
        self.file_id
    }

    /// Asks lexers to emit comments as tokens instead of discarding them.
    pub fn set_allow_comments(&mut self, allow: bool) {
        self.allow_comments = allow;
    }

    /// Returns `true` if comments are emitted as tokens.
    #[must_use]
    pub const fn allow_comments(&self) -> bool {
        self.allow_comments
    }

    /// Appends a diagnostic. Reporting never influences lexing or parsing.
    pub fn track_report(&mut self, kind: DiagnosticKind, loc: SourceLoc) {
        self.diagnostics.push(Diagnostic::new(kind, loc));
    }

    /// Returns the diagnostics reported so far, in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Removes and returns the diagnostics reported so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Returns the lexeme table.
    #[must_use]
    pub const fn lexemes(&self) -> &LexemeTable {
        &self.lexemes
    }

    pub(crate) fn lexemes_mut(&mut self) -> &mut LexemeTable {
        &mut self.lexemes
    }

    /// Returns the lexeme of the token starting at `at`.
    #[must_use]
    pub fn fetch_lexeme(&self, at: LineCol) -> Option<&Lexeme> {
        self.lexemes.get(at)
    }

    /// Returns the identifier spelled at `loc`, if an identifier starts there.
    #[must_use]
    pub fn ident_at(&self, loc: SourceLoc) -> Option<&str> {
        match self.fetch_lexeme(loc.start())? {
            Lexeme::Ident(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the operator symbol spelled at `loc`, if one starts there.
    #[must_use]
    pub fn operator_at(&self, loc: SourceLoc) -> Option<&str> {
        match self.fetch_lexeme(loc.start())? {
            Lexeme::Operator(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the source spelling of a name, joining qualified names with `.`.
    ///
    /// Returns `None` for error names and for names with no recorded text.
    #[must_use]
    pub fn spell(&self, name: &Name) -> Option<String> {
        match name {
            Name::Simple { loc } => self.ident_at(*loc).map(str::to_string),
            Name::Punc { loc } | Name::Special { loc } => self
                .operator_at(*loc)
                .or_else(|| self.ident_at(*loc))
                .map(str::to_string),
            Name::Nested { names, .. } => {
                let parts = names
                    .iter()
                    .map(|part| self.spell(part))
                    .collect::<Option<Vec<_>>>()?;
                Some(parts.join("."))
            }
            Name::Error { .. } => None,
        }
    }

    /// Hands the finished tree to the context.
    pub fn store_ast(&mut self, program: Program) {
        self.program = Some(program);
    }

    /// Returns the finished tree, if one has been stored.
    #[must_use]
    pub const fn ast(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// Takes ownership of the finished tree.
    pub fn take_ast(&mut self) -> Option<Program> {
        self.program.take()
    }
}
