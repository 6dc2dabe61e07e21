// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Interned token text.
//!
//! Tokens carry no text, so lexers record the spelling of identifiers,
//! operators, literals and retained comments here, keyed by the position
//! where the token starts. Equal spellings share one interned string.

use std::collections::{HashMap, HashSet};

use ecow::EcoString;
use serde::Serialize;

use super::{LineCol, Token};

/// The recorded text of a token, tagged with its category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Lexeme {
    /// An identifier.
    Ident(EcoString),
    /// An operator symbol such as `>>=` or `:+`.
    Operator(EcoString),
    /// An integer literal as written.
    IntLit(EcoString),
    /// A floating-point literal as written.
    FloatLit(EcoString),
    /// A string literal, prefix and quotes included.
    StrLit(EcoString),
    /// A character literal, quotes included.
    CharLit(EcoString),
    /// A comment, delimiters included.
    Comment(EcoString),
}

impl Lexeme {
    /// Returns the recorded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ident(s)
            | Self::Operator(s)
            | Self::IntLit(s)
            | Self::FloatLit(s)
            | Self::StrLit(s)
            | Self::CharLit(s)
            | Self::Comment(s) => s,
        }
    }
}

/// Lexemes of one file, keyed by token start position.
#[derive(Debug, Default)]
pub struct LexemeTable {
    interned: HashSet<EcoString>,
    by_position: HashMap<LineCol, Lexeme>,
}

impl LexemeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared copy of `text`, interning it on first use.
    pub fn intern(&mut self, text: &str) -> EcoString {
        if let Some(existing) = self.interned.get(text) {
            return existing.clone();
        }
        let interned = EcoString::from(text);
        self.interned.insert(interned.clone());
        interned
    }

    /// Records the text of a token that starts at `at`.
    ///
    /// Only tokens whose text is not implied by their kind are recorded;
    /// returns `false` for the others.
    pub fn record(&mut self, token: Token, at: LineCol, text: &str) -> bool {
        let make: fn(EcoString) -> Lexeme = match token {
            Token::Ident | Token::ProperIdent => Lexeme::Ident,
            tk if tk.is_var_sym() || tk.is_con_sym() => Lexeme::Operator,
            Token::IntLit => Lexeme::IntLit,
            Token::FloatLit => Lexeme::FloatLit,
            Token::StrLit => Lexeme::StrLit,
            Token::CharLit => Lexeme::CharLit,
            Token::Comment => Lexeme::Comment,
            _ => return false,
        };
        let text = self.intern(text);
        self.by_position.insert(at, make(text));
        true
    }

    /// Returns the lexeme of the token starting at `at`.
    #[must_use]
    pub fn get(&self, at: LineCol) -> Option<&Lexeme> {
        self.by_position.get(&at)
    }

    /// Number of recorded tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// Number of distinct interned spellings.
    #[must_use]
    pub fn interned_count(&self) -> usize {
        self.interned.len()
    }
}
