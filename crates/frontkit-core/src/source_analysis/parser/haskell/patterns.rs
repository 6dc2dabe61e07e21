// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Pattern parsing for the Haskell grammar.
//!
//! Patterns share the [`Expr`] representation:
//!
//! ```text
//! pat  → lpat ( qconop pat )?
//! lpat → - (integer | float) | gcon apat+ | apat
//! apat → var ( @ apat )? | gcon | literal | _ | ~ apat
//!      | ( pat ) | ( pat , … ) | [ pat , … ]
//! ```

use crate::ast::{Expr, Name};
use crate::source_analysis::{SourceLoc, Token, TokenSource};

use super::super::Parser;

impl<L: TokenSource> Parser<'_, L> {
    /// Parses a pattern; constructor operators associate to the right.
    pub(super) fn parse_pattern(&mut self) -> Expr {
        if let Err(loc) = self.enter_nesting() {
            return Expr::Error { loc };
        }
        let start = self.ahead_loc();
        let left = self.parse_lpat();
        let pattern = match self.maybe_parse_con_operator() {
            Some(operator) => {
                let right = self.parse_pattern();
                Expr::Infix {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    loc: self.span_from(start),
                }
            }
            None => left,
        };
        self.leave_nesting();
        pattern
    }

    /// Parses a pattern without a top-level constructor operator.
    pub(super) fn parse_lpat(&mut self) -> Expr {
        let start = self.ahead_loc();
        match self.ahead() {
            Token::Minus => {
                self.consume_token();
                let operand = match self.ahead() {
                    Token::IntLit | Token::FloatLit => self.parse_literal(),
                    _ => Expr::Error {
                        loc: self.reject(),
                    },
                };
                Expr::Negation {
                    operand: Box::new(operand),
                    loc: self.span_from(start),
                }
            }
            Token::ProperIdent => {
                let constructor = Expr::Identifier(self.parse_qualified());
                self.parse_constructor_args(start, constructor)
            }
            Token::LParen if self.paren_constructor_follows() => {
                let constructor = self.parse_apat();
                self.parse_constructor_args(start, constructor)
            }
            _ => self.parse_apat(),
        }
    }

    /// Returns `true` at `(:+)` or `(,,)`: a constructor that may take
    /// arguments.
    fn paren_constructor_follows(&mut self) -> bool {
        let next = self.peek_token(1);
        next == Token::Comma || (next.is_con_sym() && self.peek_token(2) == Token::RParen)
    }

    /// Collects the arguments of a constructor pattern.
    fn parse_constructor_args(&mut self, start: SourceLoc, constructor: Expr) -> Expr {
        let mut arguments = Vec::new();
        while self.starts_apat() && !self.qualified_symbol_follows(Token::is_con_sym) {
            arguments.push(self.parse_apat());
        }
        if arguments.is_empty() {
            return constructor;
        }
        Expr::Application {
            function: Box::new(constructor),
            arguments,
            loc: self.span_from(start),
        }
    }

    /// Returns `true` if the lookahead can start an atomic pattern.
    pub(super) fn starts_apat(&self) -> bool {
        matches!(
            self.ahead(),
            Token::Ident
                | Token::ProperIdent
                | Token::Underscore
                | Token::Tilde
                | Token::LParen
                | Token::LBracket
                | Token::IntLit
                | Token::FloatLit
                | Token::StrLit
                | Token::CharLit
        )
    }

    /// Parses an atomic pattern.
    pub(super) fn parse_apat(&mut self) -> Expr {
        let start = self.ahead_loc();
        match self.ahead() {
            Token::Ident => {
                let name = self.parse_var_id();
                if !self.maybe_consume(Token::At) {
                    return Expr::Identifier(name);
                }
                let pattern = self.nested(Self::parse_apat);
                Expr::AsPattern {
                    name,
                    pattern: Box::new(pattern),
                    loc: self.span_from(start),
                }
            }
            Token::ProperIdent => Expr::Identifier(self.parse_qualified()),
            Token::Underscore => {
                self.consume_token();
                Expr::Wildcard { loc: start }
            }
            Token::Tilde => {
                self.consume_token();
                let pattern = self.nested(Self::parse_apat);
                Expr::Lazy {
                    pattern: Box::new(pattern),
                    loc: self.span_from(start),
                }
            }
            Token::IntLit | Token::FloatLit | Token::StrLit | Token::CharLit => {
                self.parse_literal()
            }
            Token::LParen => self.parse_paren_pattern(),
            Token::LBracket => self.parse_list_pattern(),
            _ => Expr::Error {
                loc: self.reject(),
            },
        }
    }

    /// Parses a parenthesized pattern, classified by the token after `(`:
    /// unit, tuple constructor, constructor operator, grouping or tuple.
    fn parse_paren_pattern(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();

        if self.maybe_consume(Token::RParen) {
            return Expr::Unit {
                loc: self.span_from(start),
            };
        }
        if self.at(Token::Comma) {
            return self.parse_tuple_constructor(start);
        }
        if self.ahead().is_con_sym() && self.peek_token(1) == Token::RParen {
            let name = self.parse_con_sym();
            self.consume_token();
            return Expr::Identifier(name);
        }

        let first = self.parse_pattern();
        if !self.at(Token::Comma) {
            self.expect_or_skip_to(Token::RParen, "parenthesized pattern");
            return Expr::Parenthesized {
                inner: Box::new(first),
                loc: self.span_from(start),
            };
        }
        let mut elements = vec![first];
        while self.maybe_consume(Token::Comma) {
            elements.push(self.parse_pattern());
        }
        self.expect_or_skip_to(Token::RParen, "tuple pattern");
        Expr::Tuple {
            elements,
            loc: self.span_from(start),
        }
    }

    /// Parses the commas and `)` of `(,)`, `(,,)`, … after the `(`.
    pub(super) fn parse_tuple_constructor(&mut self, start: SourceLoc) -> Expr {
        while self.maybe_consume(Token::Comma) {}
        self.expect_or_skip_to(Token::RParen, "tuple constructor");
        Expr::Identifier(Name::Special {
            loc: self.span_from(start),
        })
    }

    /// Parses `[]` or `[p1, p2, …]`.
    fn parse_list_pattern(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();
        let mut elements = Vec::new();
        if !self.at(Token::RBracket) {
            elements.push(self.parse_pattern());
            while self.maybe_consume(Token::Comma) {
                elements.push(self.parse_pattern());
            }
        }
        self.expect_or_skip_to(Token::RBracket, "list pattern");
        Expr::List {
            elements,
            loc: self.span_from(start),
        }
    }
}
