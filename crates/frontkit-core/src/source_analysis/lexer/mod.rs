// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis.
//!
//! Each supported language has one lexer implementing [`TokenSource`]. A
//! lexer hands out one [`Token`] per call together with its location, writes
//! the text of identifiers and literals into the context's lexeme table, and
//! reports malformed input as diagnostics instead of failing.
//!
//! # Design Principles
//!
//! - **Error recovery**: Never panic on malformed input; emit [`Token::Invalid`]
//!   or a best-effort literal plus a diagnostic
//! - **Forward progress**: Every call consumes input or drains synthesized
//!   tokens, so repeated calls always reach [`Token::Eop`]
//! - **Precise locations**: Every token carries its exact line/column span
//!
//! # Example
//!
//! ```
//! use frontkit_core::source_analysis::{lex_all, ParsingContext, PyLexer, Token};
//!
//! let mut context = ParsingContext::new();
//! let tokens = lex_all(PyLexer::new("x = 1"), &mut context);
//! let kinds: Vec<_> = tokens.iter().map(|(token, _)| *token).collect();
//! assert_eq!(kinds, vec![Token::Ident, Token::Eq, Token::IntLit, Token::Eop]);
//! ```

mod cursor;
mod haskell;
mod python;

pub use cursor::{Cursor, TAB_WIDTH};
pub use haskell::HsLexer;
pub use python::PyLexer;

use super::{ParsingContext, SourceLoc, Token};

/// A lexer for one language.
///
/// Callers invoke [`lex`](TokenSource::lex) repeatedly; once the input is
/// exhausted it keeps returning [`Token::Eop`].
pub trait TokenSource {
    /// Produces the next token.
    fn lex(&mut self, context: &mut ParsingContext) -> Token;

    /// Returns the location of the token most recently produced.
    fn token_loc(&self) -> SourceLoc;
}

/// Lexes until end of input, returning every token with its location.
///
/// The final element is always [`Token::Eop`].
pub fn lex_all(
    mut lexer: impl TokenSource,
    context: &mut ParsingContext,
) -> Vec<(Token, SourceLoc)> {
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex(context);
        tokens.push((token, lexer.token_loc()));
        if token.is_eop() {
            return tokens;
        }
    }
}
