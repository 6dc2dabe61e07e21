// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for the Haskell grammar.
//!
//! This module handles:
//!
//! - Infix chains (`a + b * c`), kept left-nested; fixities are not resolved
//! - Prefix negation and function application
//! - `\x -> e`, `if`, `let … in`, `case … of` and `do`
//! - Parenthesized forms: unit, tuples, sections, operator names
//! - Lists, arithmetic sequences and list comprehensions
//! - Type annotations (`e :: T`)
//!
//! Patterns written in expression position (the left of `<-`) parse through
//! the same methods, so `_`, `x@p` and `~p` are accepted here too.

use crate::ast::{Alternative, Expr, LiteralKind, Name, Statement};
use crate::source_analysis::{SourceLoc, Token, TokenSource};

use super::super::Parser;
use super::names::QualifiedTerm;

impl<L: TokenSource> Parser<'_, L> {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses any expression.
    ///
    /// Grows the stack on the heap when little remains, so the nesting
    /// limit is reachable even with large frames.
    pub(super) fn parse_expr(&mut self) -> Expr {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if let Err(loc) = self.enter_nesting() {
                return Expr::Error { loc };
            }
            let start = self.ahead_loc();
            let (expr, _) = self.parse_operator_chain(false);
            let expr = self.maybe_parse_annotation(start, expr);
            self.leave_nesting();
            expr
        })
    }

    /// Wraps `expr` in an annotation if `::` follows.
    fn maybe_parse_annotation(&mut self, start: SourceLoc, expr: Expr) -> Expr {
        if !self.maybe_consume(Token::ColonColon) {
            return expr;
        }
        let ty = self.parse_type();
        Expr::Annotated {
            expr: Box::new(expr),
            ty,
            loc: self.span_from(start),
        }
    }

    /// Parses `e1 op e2 op … en` into a left-nested tree.
    ///
    /// With `allow_section`, an operator directly followed by `)` ends the
    /// chain and is returned alongside the operand before it.
    fn parse_operator_chain(&mut self, allow_section: bool) -> (Expr, Option<Name>) {
        let start = self.ahead_loc();
        let first = self.parse_prefix_expr();
        self.continue_operator_chain(start, first, allow_section)
    }

    /// Continues a chain after its first operand, which comes with the
    /// qualified operator that ended it, if any.
    fn continue_operator_chain(
        &mut self,
        start: SourceLoc,
        (mut left, mut pending): (Expr, Option<Name>),
        allow_section: bool,
    ) -> (Expr, Option<Name>) {
        while let Some(operator) = pending.take().or_else(|| self.maybe_parse_operator()) {
            if allow_section && self.at(Token::RParen) {
                return (left, Some(operator));
            }
            let (right, next) = self.parse_prefix_expr();
            pending = next;
            let loc = start.join(right.loc());
            left = Expr::Infix {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                loc,
            };
        }
        (left, None)
    }

    fn parse_prefix_expr(&mut self) -> (Expr, Option<Name>) {
        if !self.at(Token::Minus) {
            return self.parse_lexp();
        }
        let start = self.ahead_loc();
        self.consume_token();
        let (operand, operator) = self.parse_lexp();
        let loc = start.join(operand.loc());
        let negation = Expr::Negation {
            operand: Box::new(operand),
            loc,
        };
        (negation, operator)
    }

    /// Parses the keyword-introduced forms, or an application.
    fn parse_lexp(&mut self) -> (Expr, Option<Name>) {
        let expr = match self.ahead() {
            Token::Backslash => self.parse_lambda(),
            Token::Let => self.parse_let_expr(),
            Token::If => self.parse_if(),
            Token::Case => self.parse_case(),
            Token::Do => self.parse_do(),
            _ => return self.parse_application(),
        };
        (expr, None)
    }

    fn parse_lambda(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();
        let mut params = Vec::new();
        while self.starts_apat() {
            params.push(self.parse_apat());
        }
        if params.is_empty() {
            self.report_unexpected();
        }
        self.expect(Token::Arrow);
        let body = self.parse_expr();
        Expr::Lambda {
            params,
            body: Box::new(body),
            loc: self.span_from(start),
        }
    }

    fn parse_let_expr(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();
        let decls = self.parse_block("let bindings", Self::parse_decl);
        self.expect(Token::In);
        let body = self.parse_expr();
        Expr::Let {
            decls,
            body: Box::new(body),
            loc: self.span_from(start),
        }
    }

    /// `if e then e else e`; a `;` may precede `then` and `else` inside `do`.
    fn parse_if(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();
        let condition = self.parse_expr();
        self.maybe_consume(Token::Semicolon);
        self.expect(Token::Then);
        let then_branch = self.parse_expr();
        self.maybe_consume(Token::Semicolon);
        self.expect(Token::Else);
        let else_branch = self.parse_expr();
        Expr::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            loc: self.span_from(start),
        }
    }

    fn parse_case(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();
        let scrutinee = self.parse_expr();
        self.expect(Token::Of);
        let alternatives = self.parse_block("case alternatives", Self::parse_alternative);
        Expr::Case {
            scrutinee: Box::new(scrutinee),
            alternatives,
            loc: self.span_from(start),
        }
    }

    /// `pat -> e` or `pat | guard -> e …`, with an optional `where`.
    fn parse_alternative(&mut self) -> Alternative {
        let start = self.ahead_loc();
        let pattern = self.parse_pattern();
        let rhs = self.parse_rhs(Token::Arrow);
        Alternative {
            pattern,
            rhs,
            loc: self.span_from(start),
        }
    }

    fn parse_do(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();
        let statements = self.parse_block("do block", Self::parse_statement);
        Expr::Do {
            statements,
            loc: self.span_from(start),
        }
    }

    /// Parses a `do` statement or a comprehension qualifier.
    ///
    /// The left of `<-` is parsed as an expression first; expressions and
    /// patterns share one representation.
    fn parse_statement(&mut self) -> Statement {
        let start = self.ahead_loc();
        if self.at(Token::Let) {
            self.consume_token();
            let decls = self.parse_block("let statement", Self::parse_decl);
            if !self.maybe_consume(Token::In) {
                return Statement::Let {
                    decls,
                    loc: self.span_from(start),
                };
            }
            let body = self.parse_expr();
            return Statement::Expression(Expr::Let {
                decls,
                body: Box::new(body),
                loc: self.span_from(start),
            });
        }

        let expr = self.parse_expr();
        if !self.maybe_consume(Token::LArrow) {
            return Statement::Expression(expr);
        }
        let source = self.parse_expr();
        Statement::Bind {
            pattern: expr,
            expr: source,
            loc: self.span_from(start),
        }
    }

    // ========================================================================
    // Application and Atoms
    // ========================================================================

    /// Parses an application. A qualified operator among the arguments
    /// ends it and is returned too: `m Map.! k` stops at `Map.!`.
    fn parse_application(&mut self) -> (Expr, Option<Name>) {
        let start = self.ahead_loc();
        let function = self.parse_aexp();
        self.parse_arguments(start, function)
    }

    fn parse_arguments(&mut self, start: SourceLoc, function: Expr) -> (Expr, Option<Name>) {
        let mut arguments = Vec::new();
        let mut operator = None;
        while self.starts_aexp() {
            if !self.at(Token::ProperIdent) {
                arguments.push(self.parse_aexp());
                continue;
            }
            match self.parse_qualified_term() {
                QualifiedTerm::Operand(name) => arguments.push(Expr::Identifier(name)),
                QualifiedTerm::Operator(name) => {
                    operator = Some(name);
                    break;
                }
            }
        }
        let Some(last) = arguments.last() else {
            return (function, operator);
        };
        let loc = start.join(last.loc());
        let application = Expr::Application {
            function: Box::new(function),
            arguments,
            loc,
        };
        (application, operator)
    }

    fn starts_aexp(&self) -> bool {
        matches!(
            self.ahead(),
            Token::Ident
                | Token::ProperIdent
                | Token::Underscore
                | Token::LParen
                | Token::LBracket
                | Token::IntLit
                | Token::FloatLit
                | Token::StrLit
                | Token::CharLit
        )
    }

    /// Parses a literal token.
    pub(super) fn parse_literal(&mut self) -> Expr {
        let loc = self.ahead_loc();
        let kind = match self.ahead() {
            Token::IntLit => LiteralKind::Integer,
            Token::FloatLit => LiteralKind::Float,
            Token::CharLit => LiteralKind::Character,
            Token::StrLit => LiteralKind::String,
            _ => {
                return Expr::Error {
                    loc: self.reject(),
                };
            }
        };
        self.consume_token();
        Expr::Literal { kind, loc }
    }

    fn parse_aexp(&mut self) -> Expr {
        let start = self.ahead_loc();
        match self.ahead() {
            Token::Ident => {
                let name = self.parse_var_id();
                if !self.maybe_consume(Token::At) {
                    return Expr::Identifier(name);
                }
                let pattern = self.nested(Self::parse_aexp);
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
                let pattern = self.nested(Self::parse_aexp);
                Expr::Lazy {
                    pattern: Box::new(pattern),
                    loc: self.span_from(start),
                }
            }
            Token::IntLit | Token::FloatLit | Token::StrLit | Token::CharLit => {
                self.parse_literal()
            }
            Token::LParen => self.nested(Self::parse_paren_expr),
            Token::LBracket => self.nested(Self::parse_bracket_expr),
            _ => Expr::Error {
                loc: self.reject(),
            },
        }
    }

    /// Parses the forms starting with `(`.
    fn parse_paren_expr(&mut self) -> Expr {
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

        // `(-)` names the operator; `(- x)` is a negation.
        let operator_first = self.ahead().is_con_sym()
            || self.at(Token::Backtick)
            || (self.ahead().is_var_sym()
                && (!self.at(Token::Minus) || self.peek_token(1) == Token::RParen));
        if operator_first {
            let operator = self.maybe_parse_operator();
            let Some(operator) = operator else {
                return Expr::Error {
                    loc: self.reject(),
                };
            };
            return self.finish_operator_first(start, operator);
        }

        let first_start = self.ahead_loc();
        let first = if self.at(Token::ProperIdent) {
            match self.parse_qualified_term() {
                QualifiedTerm::Operator(operator) => {
                    return self.finish_operator_first(start, operator);
                }
                QualifiedTerm::Operand(name) => {
                    self.parse_arguments(first_start, Expr::Identifier(name))
                }
            }
        } else {
            self.parse_prefix_expr()
        };
        let (first, dangling) = self.continue_operator_chain(first_start, first, true);
        if let Some(operator) = dangling {
            self.consume_token();
            return Expr::LeftSection {
                operand: Box::new(first),
                operator,
                loc: self.span_from(start),
            };
        }
        let first = self.maybe_parse_annotation(first_start, first);

        if !self.at(Token::Comma) {
            self.expect_or_skip_to(Token::RParen, "parenthesized expression");
            return Expr::Parenthesized {
                inner: Box::new(first),
                loc: self.span_from(start),
            };
        }
        let mut elements = vec![first];
        while self.maybe_consume(Token::Comma) {
            elements.push(self.parse_expr());
        }
        self.expect_or_skip_to(Token::RParen, "tuple");
        Expr::Tuple {
            elements,
            loc: self.span_from(start),
        }
    }

    /// Parses what follows `( op`: `)` for an operator name, or the operand
    /// of a right section.
    fn finish_operator_first(&mut self, start: SourceLoc, operator: Name) -> Expr {
        if self.maybe_consume(Token::RParen) {
            return Expr::Identifier(operator);
        }
        let (operand, _) = self.parse_operator_chain(false);
        self.expect_or_skip_to(Token::RParen, "right section");
        Expr::RightSection {
            operator,
            operand: Box::new(operand),
            loc: self.span_from(start),
        }
    }

    /// Parses lists, arithmetic sequences and comprehensions.
    fn parse_bracket_expr(&mut self) -> Expr {
        let start = self.ahead_loc();
        self.consume_token();

        if self.maybe_consume(Token::RBracket) {
            return Expr::List {
                elements: Vec::new(),
                loc: self.span_from(start),
            };
        }

        let first = self.parse_expr();
        match self.ahead() {
            Token::DotDot => {
                self.consume_token();
                self.parse_sequence_end(start, first, None)
            }
            Token::Pipe => {
                self.consume_token();
                let mut qualifiers = vec![self.parse_statement()];
                while self.maybe_consume(Token::Comma) {
                    qualifiers.push(self.parse_statement());
                }
                self.expect_or_skip_to(Token::RBracket, "list comprehension");
                Expr::Comprehension {
                    element: Box::new(first),
                    qualifiers,
                    loc: self.span_from(start),
                }
            }
            _ => {
                let mut elements = vec![first];
                while self.maybe_consume(Token::Comma) {
                    elements.push(self.parse_expr());
                    if elements.len() == 2 && self.maybe_consume(Token::DotDot) {
                        let then = elements.pop();
                        let from = elements.pop();
                        if let (Some(from), Some(then)) = (from, then) {
                            return self.parse_sequence_end(start, from, Some(then));
                        }
                    }
                }
                self.expect_or_skip_to(Token::RBracket, "list");
                Expr::List {
                    elements,
                    loc: self.span_from(start),
                }
            }
        }
    }

    /// Parses the optional upper bound and `]` of a sequence after its `..`.
    fn parse_sequence_end(
        &mut self,
        start: SourceLoc,
        from: Expr,
        then: Option<Expr>,
    ) -> Expr {
        let to = if self.at(Token::RBracket) {
            None
        } else {
            Some(Box::new(self.parse_expr()))
        };
        self.expect_or_skip_to(Token::RBracket, "arithmetic sequence");
        Expr::Sequence {
            from: Box::new(from),
            then: then.map(Box::new),
            to,
            loc: self.span_from(start),
        }
    }
}
