// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Name parsing for the Haskell grammar.
//!
//! Names never fail to produce a node: when the expected token is missing
//! the offending token is reported and a [`Name::Error`] takes its place.
//!
//! Qualified names are built from separate tokens (`Data` `.` `Map`). A dot
//! continues a qualified name only when it touches both neighbours, so
//! `f . g` and `Just . f` stay compositions. Operators may be qualified
//! too: `Map.!` names `!` from `Map`.

use crate::ast::Name;
use crate::source_analysis::{Token, TokenSource};

use super::super::Parser;

impl<L: TokenSource> Parser<'_, L> {
    // ========================================================================
    // Identifiers and Symbols
    // ========================================================================

    /// Parses a single `token` as a simple name.
    pub(super) fn parse_name(&mut self, token: Token) -> Name {
        let loc = self.ahead_loc();
        if self.expect(token) {
            Name::Simple { loc }
        } else {
            Name::Error { loc }
        }
    }

    /// `varid`
    pub(super) fn parse_var_id(&mut self) -> Name {
        self.parse_name(Token::Ident)
    }

    /// `conid`
    pub(super) fn parse_con_id(&mut self) -> Name {
        self.parse_name(Token::ProperIdent)
    }

    /// `varsym`, `-` and `.` included.
    pub(super) fn parse_var_sym(&mut self) -> Name {
        let loc = self.ahead_loc();
        if self.ahead().is_var_sym() {
            self.consume_token();
            Name::Punc { loc }
        } else {
            self.fail();
            Name::Error { loc }
        }
    }

    /// `consym`, `:` included.
    pub(super) fn parse_con_sym(&mut self) -> Name {
        let loc = self.ahead_loc();
        if self.ahead().is_con_sym() {
            self.consume_token();
            Name::Special { loc }
        } else {
            self.fail();
            Name::Error { loc }
        }
    }

    /// Either kind of operator symbol.
    pub(super) fn parse_sym(&mut self) -> Name {
        if self.ahead().is_con_sym() {
            self.parse_con_sym()
        } else {
            self.parse_var_sym()
        }
    }

    /// Parses `( sym )`, the name being the possibly qualified symbol.
    pub(super) fn parse_paren_sym(&mut self, sym: impl FnOnce(&mut Self) -> Name) -> Name {
        self.consume_token();
        let name = self.parse_qname(sym);
        self.expect_or_skip_to(Token::RParen, "parenthesized operator");
        name
    }

    /// Dispatches on `(`: the parenthesized operator form, or the identifier
    /// form otherwise.
    pub(super) fn parse_sym_or_id(
        &mut self,
        sym: impl FnOnce(&mut Self) -> Name,
        id: impl FnOnce(&mut Self) -> Name,
    ) -> Name {
        if self.at(Token::LParen) {
            self.parse_paren_sym(sym)
        } else {
            id(self)
        }
    }

    /// `var → varid | ( varsym )`
    pub(super) fn parse_var(&mut self) -> Name {
        self.parse_sym_or_id(Self::parse_var_sym, Self::parse_var_id)
    }

    /// A variable or constructor, in identifier or parenthesized form.
    pub(super) fn parse_var_or_con(&mut self) -> Name {
        match self.ahead() {
            Token::LParen => self.parse_paren_sym(Self::parse_sym),
            Token::ProperIdent => self.parse_con_id(),
            _ => self.parse_var_id(),
        }
    }

    // ========================================================================
    // Qualified Names
    // ========================================================================

    /// `modid → conid ( . conid )*`
    pub(super) fn parse_modid(&mut self) -> Name {
        let mut segments = vec![self.parse_con_id()];
        while self.at(Token::Dot) && self.peek_token(1) == Token::ProperIdent {
            self.consume_token();
            segments.push(self.parse_con_id());
        }
        Name::from_segments(segments)
    }

    /// Returns `true` if the lookahead is a module qualifier: a proper
    /// identifier directly followed by `.` and an identifier or symbol.
    fn qualifier_follows(&mut self) -> bool {
        if !self.at(Token::ProperIdent) || self.peek_token(1) != Token::Dot {
            return false;
        }
        let last = self.peek_token(2);
        if !(matches!(last, Token::Ident | Token::ProperIdent) || is_symbol(last)) {
            return false;
        }
        let dot = self.peek_loc(1);
        self.ahead_loc().end() == dot.start() && dot.end() == self.peek_loc(2).start()
    }

    /// Parses the qualifiers of a name, then its final part with `last`.
    pub(super) fn parse_qname(&mut self, last: impl FnOnce(&mut Self) -> Name) -> Name {
        let mut segments = Vec::new();
        while self.qualifier_follows() {
            segments.push(Name::Simple {
                loc: self.ahead_loc(),
            });
            self.consume_token();
            self.consume_token();
        }
        segments.push(last(self));
        Name::from_segments(segments)
    }

    /// A possibly qualified variable or constructor identifier.
    pub(super) fn parse_qualified(&mut self) -> Name {
        self.parse_qname(|parser| {
            if parser.at(Token::Ident) {
                parser.parse_var_id()
            } else {
                parser.parse_con_id()
            }
        })
    }

    /// Parses a possibly qualified name in operand position, which turns
    /// out to be an operator when a symbol ends it: `Map.lookup`, `Map.!`.
    pub(super) fn parse_qualified_term(&mut self) -> QualifiedTerm {
        let mut operator = false;
        let name = self.parse_qname(|parser| {
            if is_symbol(parser.ahead()) {
                operator = true;
                parser.parse_sym()
            } else if parser.at(Token::Ident) {
                parser.parse_var_id()
            } else {
                parser.parse_con_id()
            }
        });
        if operator {
            QualifiedTerm::Operator(name)
        } else {
            QualifiedTerm::Operand(name)
        }
    }

    /// Returns `true` at `M.sym` where `sym` satisfies `is_sym`.
    pub(super) fn qualified_symbol_follows(&mut self, is_sym: fn(Token) -> bool) -> bool {
        self.qualifier_follows() && is_sym(self.peek_token(2))
    }

    // ========================================================================
    // Operators in Infix Position
    // ========================================================================

    /// Parses a backtick-quoted identifier: `` `div` ``, `` `Map.member` ``.
    fn parse_backtick_op(&mut self) -> Name {
        self.consume_token();
        let name = self.parse_qualified();
        self.expect_or_skip_to(Token::Backtick, "backtick operator");
        name
    }

    /// Parses an infix operator of either kind, if one is next.
    pub(super) fn maybe_parse_operator(&mut self) -> Option<Name> {
        let ahead = self.ahead();
        if is_symbol(ahead) {
            Some(self.parse_sym())
        } else if self.qualified_symbol_follows(is_symbol) {
            Some(self.parse_qname(Self::parse_sym))
        } else if ahead == Token::Backtick {
            Some(self.parse_backtick_op())
        } else {
            None
        }
    }

    /// Parses a variable operator (symbol or `` `varid` ``), if one is next.
    pub(super) fn maybe_parse_var_operator(&mut self) -> Option<Name> {
        if self.ahead().is_var_sym() {
            Some(self.parse_var_sym())
        } else if self.at(Token::Backtick) && self.peek_token(1) == Token::Ident {
            Some(self.parse_backtick_op())
        } else {
            None
        }
    }

    /// Parses a constructor operator (`:`, consym or `` `Con` ``), if one is
    /// next.
    pub(super) fn maybe_parse_con_operator(&mut self) -> Option<Name> {
        if self.ahead().is_con_sym() {
            Some(self.parse_con_sym())
        } else if self.qualified_symbol_follows(Token::is_con_sym) {
            Some(self.parse_qname(Self::parse_con_sym))
        } else if self.at(Token::Backtick) && self.peek_token(1) == Token::ProperIdent {
            Some(self.parse_backtick_op())
        } else {
            None
        }
    }
}

/// A qualified name as met in operand position.
#[derive(Debug)]
pub(super) enum QualifiedTerm {
    Operand(Name),
    Operator(Name),
}

fn is_symbol(token: Token) -> bool {
    token.is_var_sym() || token.is_con_sym()
}

#[cfg(test)]
mod tests {
    use super::super::parse_source;
    use crate::ast::{Decl, Expr, Name, RhsBody};
    use crate::source_analysis::{ParsingContext, SourceLoc};

    fn rhs_expr(source: &str) -> (Expr, ParsingContext) {
        let (program, context) = parse_source(source);
        assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());
        let Some(Decl::Function(function)) = program.decls.into_iter().next() else {
            panic!("expected a function binding");
        };
        let RhsBody::Plain(expr) = function.rhs.body else {
            panic!("expected a plain right-hand side");
        };
        (expr, context)
    }

    #[test]
    fn qualified_variable() {
        let (expr, context) = rhs_expr("x = Data.Map.insert");
        let Expr::Identifier(name) = expr else {
            panic!("expected an identifier, got {expr:?}");
        };
        assert!(matches!(&name, Name::Nested { names, .. } if names.len() == 3));
        assert_eq!(name.loc(), SourceLoc::from_coords(0, 4, 0, 19));
        assert_eq!(context.spell(&name).as_deref(), Some("Data.Map.insert"));
    }

    #[test]
    fn spaced_dot_is_composition() {
        let (expr, context) = rhs_expr("x = Just . f");
        let Expr::Infix { operator, .. } = expr else {
            panic!("expected an infix application, got {expr:?}");
        };
        assert!(matches!(operator, Name::Punc { .. }));
        assert_eq!(context.spell(&operator).as_deref(), Some("."));
    }

    #[test]
    fn backtick_operator() {
        let (expr, context) = rhs_expr("x = a `div` b");
        let Expr::Infix { operator, .. } = expr else {
            panic!("expected an infix application, got {expr:?}");
        };
        assert_eq!(context.spell(&operator).as_deref(), Some("div"));
    }

    #[test]
    fn parenthesized_operator_names() {
        let (expr, context) = rhs_expr("x = (+)");
        let Expr::Identifier(name @ Name::Punc { .. }) = &expr else {
            panic!("expected an operator name, got {expr:?}");
        };
        assert_eq!(context.spell(name).as_deref(), Some("+"));

        let (expr, _) = rhs_expr("x = (:+)");
        assert!(matches!(expr, Expr::Identifier(Name::Special { .. })));
    }

    #[test]
    fn qualified_operator_in_infix_position() {
        let (expr, context) = rhs_expr("x = m Map.! k");
        let Expr::Infix {
            left,
            operator,
            right,
            ..
        } = expr
        else {
            panic!("expected an infix application, got {expr:?}");
        };
        assert!(matches!(&operator, Name::Nested { names, .. } if names.len() == 2));
        assert_eq!(context.spell(&operator).as_deref(), Some("Map.!"));
        assert!(matches!(*left, Expr::Identifier(Name::Simple { .. })));
        assert!(matches!(*right, Expr::Identifier(Name::Simple { .. })));
    }

    #[test]
    fn qualified_operator_ends_an_application() {
        let (expr, context) = rhs_expr("x = f a Data.Map.! g b");
        let Expr::Infix {
            left,
            operator,
            right,
            ..
        } = expr
        else {
            panic!("expected an infix application, got {expr:?}");
        };
        assert_eq!(context.spell(&operator).as_deref(), Some("Data.Map.!"));
        let Expr::Application { arguments, loc, .. } = *left else {
            panic!("expected an application on the left");
        };
        assert_eq!(arguments.len(), 1);
        assert_eq!(loc, SourceLoc::from_coords(0, 4, 0, 7));
        assert!(matches!(*right, Expr::Application { .. }));
    }

    #[test]
    fn chained_qualified_operators_nest_to_the_left() {
        let (expr, _) = rhs_expr("x = a M.! b M.! c");
        let Expr::Infix { left, loc, .. } = expr else {
            panic!("expected an infix application, got {expr:?}");
        };
        assert_eq!(loc, SourceLoc::from_coords(0, 4, 0, 17));
        let Expr::Infix { loc, .. } = *left else {
            panic!("expected a nested infix application");
        };
        assert_eq!(loc, SourceLoc::from_coords(0, 4, 0, 11));
    }

    #[test]
    fn parenthesized_qualified_operators() {
        let (expr, context) = rhs_expr("x = (Map.!)");
        let Expr::Identifier(name) = &expr else {
            panic!("expected an operator name, got {expr:?}");
        };
        assert_eq!(context.spell(name).as_deref(), Some("Map.!"));

        let (expr, context) = rhs_expr("x = (M.:+)");
        let Expr::Identifier(Name::Nested { names, .. }) = &expr else {
            panic!("expected a qualified name, got {expr:?}");
        };
        assert!(matches!(names.last(), Some(Name::Special { .. })));
        assert_eq!(context.spell(&names[1]).as_deref(), Some(":+"));

        let (expr, context) = rhs_expr("x = (Data.Map.! k)");
        let Expr::RightSection { operator, .. } = &expr else {
            panic!("expected a right section, got {expr:?}");
        };
        assert_eq!(context.spell(operator).as_deref(), Some("Data.Map.!"));
    }

    #[test]
    fn qualified_constructor_operator_in_pattern() {
        let (program, context) = parse_source("f (x M.:+ y) = x\n");
        assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());
        assert!(matches!(
            program.decls.first(),
            Some(Decl::Function(_))
        ));
    }

    #[test]
    fn missing_name_yields_error_name() {
        let (program, context) = parse_source("module where");
        let module = program.module().expect("header is parsed");
        assert!(module.name.is_error());
        assert!(!context.diagnostics().is_empty());
    }
}
