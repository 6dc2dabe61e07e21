// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type parsing for signatures and annotations.
//!
//! ```text
//! type  → btype ( -> btype )* ( => type )?
//! btype → atype+
//! atype → tycon | tyvar | () | (->) | (,…) | ( type ) | ( type , … )
//!       | [] | [ type ]
//! ```
//!
//! Function arrows associate to the right. A context is parsed as an
//! ordinary type and becomes the context of a [`Type::Qualified`] when `=>`
//! follows it.

use crate::ast::{Name, Type};
use crate::source_analysis::{Token, TokenSource};

use super::super::Parser;

impl<L: TokenSource> Parser<'_, L> {
    /// Parses a type, with an optional context.
    pub(super) fn parse_type(&mut self) -> Type {
        if let Err(loc) = self.enter_nesting() {
            return Type::Error { loc };
        }
        let start = self.ahead_loc();
        let ty = self.parse_function_type();
        let ty = if self.maybe_consume(Token::DArrow) {
            let body = self.parse_function_type();
            Type::Qualified {
                context: Box::new(ty),
                body: Box::new(body),
                loc: self.span_from(start),
            }
        } else {
            ty
        };
        self.leave_nesting();
        ty
    }

    fn parse_function_type(&mut self) -> Type {
        let mut parts = vec![self.parse_btype()];
        while self.maybe_consume(Token::Arrow) {
            parts.push(self.parse_btype());
        }
        let Some(mut ty) = parts.pop() else {
            return Type::Error {
                loc: self.ahead_loc(),
            };
        };
        while let Some(parameter) = parts.pop() {
            let loc = parameter.loc().join(ty.loc());
            ty = Type::Function {
                parameter: Box::new(parameter),
                result: Box::new(ty),
                loc,
            };
        }
        ty
    }

    fn parse_btype(&mut self) -> Type {
        let start = self.ahead_loc();
        let head = self.parse_atype();
        let mut arguments = Vec::new();
        while self.starts_atype() {
            arguments.push(self.parse_atype());
        }
        if arguments.is_empty() {
            return head;
        }
        Type::Application {
            head: Box::new(head),
            arguments,
            loc: self.span_from(start),
        }
    }

    fn starts_atype(&self) -> bool {
        matches!(
            self.ahead(),
            Token::ProperIdent | Token::Ident | Token::LParen | Token::LBracket
        )
    }

    fn parse_atype(&mut self) -> Type {
        let start = self.ahead_loc();
        match self.ahead() {
            Token::ProperIdent => Type::Constructor(self.parse_qualified()),
            Token::Ident => Type::Variable(self.parse_var_id()),
            Token::LParen => self.parse_paren_type(),
            Token::LBracket => {
                self.consume_token();
                if self.maybe_consume(Token::RBracket) {
                    return Type::Constructor(Name::Special {
                        loc: self.span_from(start),
                    });
                }
                let element = self.parse_type();
                self.expect_or_skip_to(Token::RBracket, "list type");
                Type::List {
                    element: Box::new(element),
                    loc: self.span_from(start),
                }
            }
            _ => Type::Error {
                loc: self.reject(),
            },
        }
    }

    fn parse_paren_type(&mut self) -> Type {
        let start = self.ahead_loc();
        self.consume_token();

        if self.maybe_consume(Token::RParen) {
            return Type::Unit {
                loc: self.span_from(start),
            };
        }
        if self.at(Token::Arrow) || self.at(Token::Comma) {
            while self.maybe_consume(Token::Comma) {}
            self.maybe_consume(Token::Arrow);
            self.expect_or_skip_to(Token::RParen, "type constructor");
            return Type::Constructor(Name::Special {
                loc: self.span_from(start),
            });
        }

        let first = self.parse_type();
        if !self.at(Token::Comma) {
            self.expect_or_skip_to(Token::RParen, "parenthesized type");
            return first;
        }
        let mut elements = vec![first];
        while self.maybe_consume(Token::Comma) {
            elements.push(self.parse_type());
        }
        self.expect_or_skip_to(Token::RParen, "tuple type");
        Type::Tuple {
            elements,
            loc: self.span_from(start),
        }
    }
}
