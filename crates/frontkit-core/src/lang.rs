// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The languages frontkit can lex, and how a file selects one.

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use serde::Serialize;
use thiserror::Error;

use crate::source_analysis::{HsLexer, ParsingContext, PyLexer, SourceLoc, Token, lex_all};

/// A supported source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Python, lexed with [`PyLexer`].
    Python,
    /// Haskell, lexed with [`HsLexer`] and parsed with
    /// [`HsParser`](crate::source_analysis::HsParser).
    Haskell,
}

/// A language name that matches no [`Lang`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language `{0}` (expected `python` or `haskell`)")]
pub struct UnknownLang(pub String);

impl Lang {
    /// Every supported language.
    pub const ALL: [Self; 2] = [Self::Python, Self::Haskell];

    /// Returns the lowercase name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Haskell => "haskell",
        }
    }

    /// Returns the file suffix of source files, without the dot.
    #[must_use]
    pub const fn source_file_suffix(self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Haskell => "hs",
        }
    }

    /// Selects the language of `path` from its suffix.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let extension = path.extension()?;
        Self::ALL
            .into_iter()
            .find(|lang| lang.source_file_suffix() == extension)
    }

    /// Returns `true` if a grammar builds a tree for this language.
    #[must_use]
    pub const fn has_grammar(self) -> bool {
        matches!(self, Self::Haskell)
    }

    /// Lexes `source` with this language's lexer.
    ///
    /// The returned tokens end with [`Token::Eop`]; diagnostics and lexemes
    /// go to `context`.
    pub fn lex(self, source: &str, context: &mut ParsingContext) -> Vec<(Token, SourceLoc)> {
        match self {
            Self::Python => lex_all(PyLexer::new(source), context),
            Self::Haskell => lex_all(HsLexer::new(source), context),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lang {
    type Err = UnknownLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.name() == lowered || lang.source_file_suffix() == lowered)
            .ok_or_else(|| UnknownLang(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_uses_the_suffix() {
        assert_eq!(Lang::from_path(Utf8Path::new("src/main.py")), Some(Lang::Python));
        assert_eq!(Lang::from_path(Utf8Path::new("Main.hs")), Some(Lang::Haskell));
        assert_eq!(Lang::from_path(Utf8Path::new("README")), None);
        assert_eq!(Lang::from_path(Utf8Path::new("notes.txt")), None);
    }

    #[test]
    fn names_and_suffixes_parse() {
        assert_eq!("python".parse::<Lang>(), Ok(Lang::Python));
        assert_eq!("Haskell".parse::<Lang>(), Ok(Lang::Haskell));
        assert_eq!("hs".parse::<Lang>(), Ok(Lang::Haskell));
        let error = "cobol".parse::<Lang>().unwrap_err();
        assert_eq!(
            error.to_string(),
            "unknown language `cobol` (expected `python` or `haskell`)"
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for lang in Lang::ALL {
            assert_eq!(lang.to_string().parse::<Lang>(), Ok(lang));
        }
    }

    #[test]
    fn only_haskell_has_a_grammar() {
        assert!(Lang::Haskell.has_grammar());
        assert!(!Lang::Python.has_grammar());
    }

    #[test]
    fn lex_dispatches_to_the_language_lexer() {
        let mut context = ParsingContext::new();
        let python = Lang::Python.lex("x\n", &mut context);
        assert_eq!(
            python.iter().map(|(token, _)| *token).collect::<Vec<_>>(),
            vec![Token::Ident, Token::Newline, Token::Eop]
        );
        let haskell = Lang::Haskell.lex("x\n", &mut context);
        assert_eq!(
            haskell.iter().map(|(token, _)| *token).collect::<Vec<_>>(),
            vec![Token::LBrace, Token::Ident, Token::RBrace, Token::Eop]
        );
    }
}
