// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics reported while lexing and parsing.
//!
//! Lexers and parsers never stop on malformed input. Each problem becomes a
//! [`Diagnostic`] appended to the [`ParsingContext`](super::ParsingContext),
//! and the token stream or tree carries on with a best-effort node.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::SourceLoc;

/// The kind of problem a diagnostic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The parser met a token it could not use at this point.
    #[error("unexpected token")]
    UnexpectedToken,

    /// A string, character or block comment ran off the end of its line or
    /// of the input.
    #[error("unterminated literal")]
    UnterminatedLiteral,

    /// A dedent landed on a column that matches no enclosing block.
    #[error("inconsistent indentation")]
    InconsistentIndentation,

    /// A character that starts no token of the language.
    #[error("unexpected character")]
    UnexpectedCharacter,

    /// A numeric literal with a radix prefix but no digits.
    #[error("malformed number literal")]
    MalformedNumber,

    /// Expressions, patterns or types nested beyond the parser's limit.
    #[error("nesting is too deep")]
    NestingTooDeep,
}

impl DiagnosticKind {
    /// Returns a stable machine-readable code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnexpectedToken => "frontkit::unexpected_token",
            Self::UnterminatedLiteral => "frontkit::unterminated_literal",
            Self::InconsistentIndentation => "frontkit::inconsistent_indentation",
            Self::UnexpectedCharacter => "frontkit::unexpected_character",
            Self::MalformedNumber => "frontkit::malformed_number",
            Self::NestingTooDeep => "frontkit::nesting_too_deep",
        }
    }

    /// Returns `true` for kinds produced by lexers rather than parsers.
    #[must_use]
    pub const fn is_lexical(self) -> bool {
        matches!(
            self,
            Self::UnterminatedLiteral
                | Self::InconsistentIndentation
                | Self::UnexpectedCharacter
                | Self::MalformedNumber
        )
    }
}

/// A single reported problem: what went wrong, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Where it went wrong.
    pub loc: SourceLoc,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub const fn new(kind: DiagnosticKind, loc: SourceLoc) -> Self {
        Self { kind, loc }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location_and_message() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnterminatedLiteral,
            SourceLoc::from_coords(1, 4, 2, 0),
        );
        assert_eq!(diagnostic.to_string(), "1:4[2:0]: unterminated literal");
    }

    #[test]
    fn lexical_kinds() {
        assert!(DiagnosticKind::InconsistentIndentation.is_lexical());
        assert!(DiagnosticKind::MalformedNumber.is_lexical());
        assert!(!DiagnosticKind::UnexpectedToken.is_lexical());
        assert!(!DiagnosticKind::NestingTooDeep.is_lexical());
    }

    #[test]
    fn codes_are_distinct() {
        let kinds = [
            DiagnosticKind::UnexpectedToken,
            DiagnosticKind::UnterminatedLiteral,
            DiagnosticKind::InconsistentIndentation,
            DiagnosticKind::UnexpectedCharacter,
            DiagnosticKind::MalformedNumber,
            DiagnosticKind::NestingTooDeep,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }
}
