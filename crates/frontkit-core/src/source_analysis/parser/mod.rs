// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Language-independent recursive descent machinery.
//!
//! [`Parser`] wraps any [`TokenSource`] and offers the primitives every
//! grammar is written with: a one-token lookahead with a short peek buffer,
//! matching with built-in error reporting, and synchronizing recovery.
//! Grammars add their productions as `impl` blocks on `Parser` in
//! submodules and expose an entry point through [`GrammarEntryPoint`].
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - every production returns a node, an
//!   `Error` variant when the input is malformed
//! - **Multiple errors** - report all errors, don't stop at first
//! - **Forward progress** - a failed match consumes the offending token
//!   unless it is end of input
//! - **Reporting is decoupled** - diagnostics go to the
//!   [`ParsingContext`] and never alter parser state
//!
//! # Usage
//!
//! ```
//! use frontkit_core::source_analysis::{GrammarEntryPoint, HsLexer, HsParser, ParsingContext};
//!
//! let mut context = ParsingContext::new();
//! assert!(HsParser.parse(HsLexer::new("main = return ()"), &mut context));
//! assert!(context.diagnostics().is_empty());
//! assert_eq!(context.ast().map(|program| program.decls.len()), Some(1));
//! ```

use std::collections::VecDeque;

use tracing::trace;

use super::{DiagnosticKind, ParsingContext, SourceLoc, Token, TokenSource};

mod haskell;

pub use haskell::{HsParser, parse_haskell};

/// How many tokens past the lookahead a grammar may peek at.
pub const MAX_LOOKAHEAD: usize = 3;

/// Each nesting level uses several stack frames through a grammar's call
/// chain, and instrumented builds (fuzzing) have larger frames.
const MAX_NESTING_DEPTH: usize = 64;

/// The entry point of a grammar.
pub trait GrammarEntryPoint {
    /// Parses the whole token stream of `lexer`.
    ///
    /// Returns `false` if the input holds no tokens at all. Otherwise a
    /// program is stored in the context (see
    /// [`ParsingContext::take_ast`]) and `true` is returned, even when
    /// diagnostics were reported.
    fn parse<L: TokenSource>(&mut self, lexer: L, context: &mut ParsingContext) -> bool;
}

/// The parser state: a token source, its lookahead and the parsing context.
pub struct Parser<'ctx, L> {
    lexer: L,
    context: &'ctx mut ParsingContext,
    /// The current lookahead token.
    ahead: Token,
    ahead_loc: SourceLoc,
    /// Tokens pulled from the lexer past the lookahead by peeking.
    buffered: VecDeque<(Token, SourceLoc)>,
    /// Location of the last consumed token with a non-zero width.
    prev_loc: SourceLoc,
    /// Current nesting depth (guards against stack overflow).
    nesting_depth: usize,
    /// Number of tokens consumed so far.
    consumed: usize,
    /// Value of `consumed` when the lookahead was last reported.
    reported_at: Option<usize>,
}

impl<L> std::fmt::Debug for Parser<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("ahead", &self.ahead)
            .field("ahead_loc", &self.ahead_loc)
            .field("prev_loc", &self.prev_loc)
            .finish_non_exhaustive()
    }
}

impl<'ctx, L: TokenSource> Parser<'ctx, L> {
    /// Creates a parser and primes its lookahead with the first token.
    pub fn new(lexer: L, context: &'ctx mut ParsingContext) -> Self {
        let mut parser = Self {
            lexer,
            context,
            ahead: Token::Eop,
            ahead_loc: SourceLoc::EMPTY,
            buffered: VecDeque::new(),
            prev_loc: SourceLoc::EMPTY,
            nesting_depth: 0,
            consumed: 0,
            reported_at: None,
        };
        (parser.ahead, parser.ahead_loc) = parser.pull();
        parser
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Pulls the next significant token from the lexer. Comments are
    /// invisible to grammars.
    fn pull(&mut self) -> (Token, SourceLoc) {
        loop {
            let token = self.lexer.lex(self.context);
            if token != Token::Comment {
                return (token, self.lexer.token_loc());
            }
        }
    }

    /// Returns the lookahead token.
    #[must_use]
    pub const fn ahead(&self) -> Token {
        self.ahead
    }

    /// Returns the location of the lookahead token.
    #[must_use]
    pub const fn ahead_loc(&self) -> SourceLoc {
        self.ahead_loc
    }

    /// Returns the location of the last consumed token.
    ///
    /// Synthesized zero-width tokens do not count, so spans built from it
    /// end at real source text.
    #[must_use]
    pub const fn prev_loc(&self) -> SourceLoc {
        self.prev_loc
    }

    /// Returns `true` if the lookahead is `token`.
    #[must_use]
    pub fn at(&self, token: Token) -> bool {
        self.ahead == token
    }

    /// Returns `true` at end of input.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.ahead.is_eop()
    }

    /// Moves the lookahead to the next token.
    pub fn consume_token(&mut self) {
        if !self.ahead_loc.is_zero_width() {
            self.prev_loc = self.ahead_loc;
        }
        self.consumed += 1;
        (self.ahead, self.ahead_loc) = match self.buffered.pop_front() {
            Some(next) => next,
            None => self.pull(),
        };
    }

    fn fill_buffer(&mut self, k: usize) {
        debug_assert!(
            (1..=MAX_LOOKAHEAD).contains(&k),
            "peek distance {k} outside 1..={MAX_LOOKAHEAD}"
        );
        while self.buffered.len() < k {
            let next = self.pull();
            self.buffered.push_back(next);
        }
    }

    /// Returns the token `k` positions past the lookahead (`k` >= 1)
    /// without consuming anything.
    pub fn peek_token(&mut self, k: usize) -> Token {
        self.fill_buffer(k);
        self.buffered
            .get(k.saturating_sub(1))
            .map_or(Token::Eop, |(token, _)| *token)
    }

    /// Returns the location of the token `k` positions past the lookahead.
    pub fn peek_loc(&mut self, k: usize) -> SourceLoc {
        self.fill_buffer(k);
        self.buffered
            .get(k.saturating_sub(1))
            .map_or(self.ahead_loc, |(_, loc)| *loc)
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Consumes the lookahead if it is `token`; otherwise reports it and
    /// moves past it (see [`fail`](Self::fail)).
    pub fn expect(&mut self, token: Token) -> bool {
        debug_assert!(!token.is_eop(), "end of input cannot be matched");
        if self.ahead == token {
            self.consume_token();
            true
        } else {
            self.fail();
            false
        }
    }

    /// Consumes the lookahead if it is `token`. Never reports.
    pub fn maybe_consume(&mut self, token: Token) -> bool {
        debug_assert!(!token.is_eop(), "end of input cannot be consumed");
        if self.ahead == token {
            self.consume_token();
            true
        } else {
            false
        }
    }

    /// Like [`expect`](Self::expect), but on a mismatch also skips ahead to
    /// the next `token` and consumes it.
    pub fn expect_or_skip_to(&mut self, token: Token, rule: &str) -> bool {
        if self.expect(token) {
            return true;
        }
        trace!(rule, expected = %token, "skipping to expected token");
        self.skip_to(token);
        self.maybe_consume(token);
        false
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports the lookahead as unexpected without consuming it.
    ///
    /// A token is reported at most once, so nested productions failing at
    /// the same token yield one diagnostic. Layout tokens sharing a location
    /// are distinct tokens and each is reported. End of input is not
    /// reported when the previous diagnostic already sits at its location,
    /// as happens after recovery consumed the closing layout brace there.
    pub fn report_unexpected(&mut self) {
        let same_token = self.reported_at == Some(self.consumed);
        let cascade_at_end = self.is_at_end()
            && self.context.diagnostics().last().is_some_and(|last| {
                last.kind == DiagnosticKind::UnexpectedToken && last.loc == self.ahead_loc
            });
        if same_token || cascade_at_end {
            return;
        }
        self.reported_at = Some(self.consumed);
        trace!(token = %self.ahead, loc = %self.ahead_loc, "unexpected token");
        self.context
            .track_report(DiagnosticKind::UnexpectedToken, self.ahead_loc);
    }

    /// Reports the lookahead as unexpected and moves past it, unless it is
    /// end of input.
    pub fn fail(&mut self) {
        self.report_unexpected();
        if !self.is_at_end() {
            self.consume_token();
        }
    }

    /// Consumes tokens until the lookahead is `token` or end of input.
    pub fn skip_to(&mut self, token: Token) {
        while !(self.ahead == token || self.is_at_end()) {
            self.consume_token();
        }
    }

    /// Consumes tokens until the lookahead is one of `tokens` or end of
    /// input. Braced blocks met on the way are skipped whole, so a
    /// synchronizing token inside a nested block does not stop the skip.
    pub fn skip_to_any(&mut self, tokens: &[Token]) {
        let mut depth = 0_usize;
        while !self.is_at_end() {
            if depth == 0 && tokens.contains(&self.ahead) {
                return;
            }
            match self.ahead {
                Token::LBrace => depth += 1,
                Token::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.consume_token();
        }
    }

    /// Increments the nesting depth and returns `Err` with the offending
    /// location if it exceeds the limit. Call [`leave_nesting`](Self::leave_nesting)
    /// on every exit path when this returns `Ok(())`.
    ///
    /// On overflow a diagnostic is reported and the lookahead consumed, so
    /// the caller can return an error node straight away.
    pub fn enter_nesting(&mut self) -> Result<(), SourceLoc> {
        self.nesting_depth += 1;
        if self.nesting_depth > MAX_NESTING_DEPTH {
            self.nesting_depth -= 1;
            let loc = self.ahead_loc;
            self.context
                .track_report(DiagnosticKind::NestingTooDeep, loc);
            if !self.is_at_end() {
                self.consume_token();
            }
            return Err(loc);
        }
        Ok(())
    }

    /// Decrements the nesting depth (pair with [`enter_nesting`](Self::enter_nesting)).
    pub fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    // ========================================================================
    // Locations & Context
    // ========================================================================

    /// Returns the span from the start of `start` to the end of the last
    /// consumed token, or `start` itself if nothing was consumed since.
    #[must_use]
    pub fn span_from(&self, start: SourceLoc) -> SourceLoc {
        if self.prev_loc.file() == start.file() && self.prev_loc.end() >= start.end() {
            start.join(self.prev_loc)
        } else {
            start
        }
    }

    /// Returns `true` if the lookahead is the identifier `text`.
    ///
    /// Used for contextual keywords such as `qualified` that the lexer
    /// leaves as identifiers.
    #[must_use]
    pub fn ahead_is_contextual(&self, text: &str) -> bool {
        self.ahead == Token::Ident && self.context.ident_at(self.ahead_loc) == Some(text)
    }

    /// Returns the parsing context.
    #[must_use]
    pub fn context(&self) -> &ParsingContext {
        self.context
    }

    /// Returns the parsing context for updates.
    pub fn context_mut(&mut self) -> &mut ParsingContext {
        self.context
    }
}
