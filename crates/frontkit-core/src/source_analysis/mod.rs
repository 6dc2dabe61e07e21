// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing infrastructure shared by every supported language.
//!
//! **DDD Context:** Source Analysis
//!
//! This module contains the lexers, the parser engine and the state they
//! share.
//!
//! # Locations and Diagnostics
//!
//! Every token and tree node carries a [`SourceLoc`]: a line/column range
//! with a file identity. Problems are recorded as [`Diagnostic`]s, a
//! [`DiagnosticKind`] plus a location, and never abort lexing or parsing.
//!
//! # Lexical Analysis
//!
//! A lexer implements [`TokenSource`]. [`PyLexer`] tracks indentation and
//! emits `Newline`, `Indent` and `Dedent` tokens; [`HsLexer`] applies the
//! offside rule and emits braces and semicolons in place of layout.
//!
//! ```
//! use frontkit_core::source_analysis::{lex_all, ParsingContext, PyLexer, Token};
//!
//! let mut context = ParsingContext::new();
//! let tokens = lex_all(PyLexer::new("if x:\n    y\n"), &mut context);
//! assert!(tokens.iter().any(|(token, _)| *token == Token::Indent));
//! ```
//!
//! # Parsing
//!
//! [`Parser`] is the grammar-independent engine: lookahead, matching and
//! recovery. [`HsParser`] builds a Haskell [`Program`](crate::ast::Program)
//! on top of it.
//!
//! # Shared State
//!
//! [`ParsingContext`] owns what lexers and parsers produce besides tokens:
//! the [`LexemeTable`] of identifier and literal text, the diagnostics and
//! the finished tree.

mod context;
mod diagnostic;
mod lexeme;
mod lexer;
mod parser;
mod source_loc;
mod token;


pub use context::ParsingContext;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use lexeme::{Lexeme, LexemeTable};
pub use lexer::{Cursor, HsLexer, PyLexer, TAB_WIDTH, TokenSource, lex_all};
pub use parser::{GrammarEntryPoint, HsParser, MAX_LOOKAHEAD, Parser, parse_haskell};
pub use source_loc::{FileId, LineCol, SourceLoc};
pub use token::Token;
