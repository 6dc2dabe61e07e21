// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing for the Haskell grammar.
//!
//! This module handles:
//!
//! - The module header and export list
//! - Import declarations, with `qualified`, `as` and `hiding`
//! - Fixity declarations and type signatures
//! - Function clauses (prefix and infix), pattern bindings and their
//!   right-hand sides with guards and `where` blocks
//! - Declaration forms outside the grammar, skipped as `Unsupported`

use crate::ast::{
    Associativity, Decl, Expr, FixityDecl, FunctionDecl, GuardedExpr, ImportDecl, Members,
    ModuleDecl, Name, PatternBindingDecl, Rhs, RhsBody, Selection, SelectionList, TypeSigDecl,
};
use crate::source_analysis::{DiagnosticKind, Lexeme, SourceLoc, Token, TokenSource};

use super::super::Parser;
use super::{AS, HIDING, QUALIFIED};

/// Fixity declarations accept precedences 0 to 9.
const MAX_PRECEDENCE: u8 = 9;

impl<L: TokenSource> Parser<'_, L> {
    // ========================================================================
    // Module Header
    // ========================================================================

    /// `module modid [exports] where`
    pub(super) fn parse_module_header(&mut self) -> Decl {
        let start = self.ahead_loc();
        self.consume_token();
        let name = self.parse_modid();
        let exports = if self.at(Token::LParen) {
            Some(self.parse_selection_list(true))
        } else {
            None
        };
        self.expect(Token::Where);
        Decl::Module(ModuleDecl {
            name,
            exports,
            loc: self.span_from(start),
        })
    }

    /// Parses a parenthesized export (`allow_module`) or import list.
    fn parse_selection_list(&mut self, allow_module: bool) -> SelectionList {
        let start = self.ahead_loc();
        self.consume_token();
        let mut selections = Vec::new();
        while !self.at(Token::RParen) && !self.is_at_end() {
            selections.push(self.parse_selection(allow_module));
            if !self.maybe_consume(Token::Comma) {
                break;
            }
        }
        self.expect_or_skip_to(Token::RParen, "selection list");
        SelectionList {
            selections,
            loc: self.span_from(start),
        }
    }

    fn parse_selection(&mut self, allow_module: bool) -> Selection {
        let start = self.ahead_loc();
        match self.ahead() {
            Token::Module => {
                self.consume_token();
                if !allow_module {
                    self.context_mut()
                        .track_report(DiagnosticKind::UnexpectedToken, start);
                }
                let name = self.parse_modid();
                Selection::Module {
                    name,
                    loc: self.span_from(start),
                }
            }
            Token::LParen => {
                let name = self.parse_paren_sym(Self::parse_sym);
                Selection::Item {
                    name,
                    members: Members::Absent,
                    loc: self.span_from(start),
                }
            }
            Token::Ident | Token::ProperIdent => {
                let name = self.parse_qualified();
                let members = if self.at(Token::LParen) {
                    self.parse_members()
                } else {
                    Members::Absent
                };
                Selection::Item {
                    name,
                    members,
                    loc: self.span_from(start),
                }
            }
            _ => {
                self.fail();
                Selection::Item {
                    name: Name::Error { loc: start },
                    members: Members::Absent,
                    loc: start,
                }
            }
        }
    }

    /// `( .. )` or `( member, … )` after a type or class name.
    fn parse_members(&mut self) -> Members {
        let start = self.ahead_loc();
        self.consume_token();
        if self.at(Token::DotDot) {
            let loc = self.ahead_loc();
            self.consume_token();
            self.expect_or_skip_to(Token::RParen, "member list");
            return Members::All { loc };
        }
        let mut names = Vec::new();
        while !self.at(Token::RParen) && !self.is_at_end() {
            names.push(self.parse_var_or_con());
            if !self.maybe_consume(Token::Comma) {
                break;
            }
        }
        self.expect_or_skip_to(Token::RParen, "member list");
        Members::Listed {
            names,
            loc: self.span_from(start),
        }
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// `import [qualified] modid [as modid] [[hiding] ( selections )]`
    pub(super) fn parse_import(&mut self) -> Decl {
        let start = self.ahead_loc();
        self.consume_token();
        let qualified = self.maybe_consume_contextual(QUALIFIED);
        let module = self.parse_modid();
        let alias = if self.maybe_consume_contextual(AS) {
            Some(self.parse_modid())
        } else {
            None
        };
        let hiding = self.maybe_consume_contextual(HIDING);
        let selections = if self.at(Token::LParen) {
            Some(self.parse_selection_list(false))
        } else {
            if hiding {
                self.report_unexpected();
            }
            None
        };
        Decl::Import(ImportDecl {
            qualified,
            module,
            alias,
            hiding,
            selections,
            loc: self.span_from(start),
        })
    }

    fn maybe_consume_contextual(&mut self, keyword: &str) -> bool {
        if self.ahead_is_contextual(keyword) {
            self.consume_token();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Top-Level Declarations
    // ========================================================================

    pub(super) fn parse_top_decl(&mut self) -> Decl {
        match self.ahead() {
            Token::Type
            | Token::Data
            | Token::Newtype
            | Token::Class
            | Token::Instance
            | Token::Default
            | Token::Foreign
            | Token::Deriving => self.parse_unsupported_decl(),
            Token::Import => {
                // Imports must precede every other declaration.
                self.report_unexpected();
                self.parse_import()
            }
            _ => self.parse_decl(),
        }
    }

    /// Records a declaration outside the grammar and skips to its end.
    fn parse_unsupported_decl(&mut self) -> Decl {
        let start = self.ahead_loc();
        let keyword = self.ahead();
        self.consume_token();
        self.skip_to_any(&[Token::Semicolon, Token::RBrace]);
        Decl::Unsupported {
            keyword,
            loc: self.span_from(start),
        }
    }

    // ========================================================================
    // Nested Declarations
    // ========================================================================

    /// Parses a declaration allowed in any declaration block.
    pub(super) fn parse_decl(&mut self) -> Decl {
        match self.ahead() {
            Token::Semicolon => Decl::Empty {
                loc: self.ahead_loc(),
            },
            Token::Infix | Token::Infixl | Token::Infixr => self.parse_fixity_decl(),
            _ => self.parse_binding_or_type_sig(),
        }
    }

    /// `infixl 6 +, -`
    fn parse_fixity_decl(&mut self) -> Decl {
        let start = self.ahead_loc();
        let associativity = match self.ahead() {
            Token::Infixl => Associativity::Left,
            Token::Infixr => Associativity::Right,
            _ => Associativity::None,
        };
        self.consume_token();

        let precedence = if self.at(Token::IntLit) {
            let loc = self.ahead_loc();
            let precedence = match self.context().fetch_lexeme(loc.start()) {
                Some(Lexeme::IntLit(text)) => text.parse::<u8>().ok(),
                _ => None,
            }
            .filter(|precedence| *precedence <= MAX_PRECEDENCE);
            if precedence.is_none() {
                self.report_unexpected();
            }
            self.consume_token();
            precedence
        } else {
            None
        };

        let mut operators = vec![self.parse_fixity_operator()];
        while self.maybe_consume(Token::Comma) {
            operators.push(self.parse_fixity_operator());
        }
        Decl::Fixity(FixityDecl {
            associativity,
            precedence,
            operators,
            loc: self.span_from(start),
        })
    }

    fn parse_fixity_operator(&mut self) -> Name {
        match self.maybe_parse_operator() {
            Some(name) => name,
            None => Name::Error {
                loc: self.reject(),
            },
        }
    }

    /// Decides between a type signature, a function clause and a pattern
    /// binding.
    ///
    /// A declaration starting with a variable, or an operator in
    /// parentheses, is a signature when `,` or `::` follows the name. Any
    /// other head is parsed as a pattern.
    fn parse_binding_or_type_sig(&mut self) -> Decl {
        let start = self.ahead_loc();
        let head = match self.ahead() {
            Token::Ident => Some(self.parse_var_id()),
            Token::LParen
                if self.peek_token(1).is_var_sym() && self.peek_token(2) == Token::RParen =>
            {
                Some(self.parse_paren_sym(Self::parse_var_sym))
            }
            _ => None,
        };

        let Some(name) = head else {
            let pattern = self.parse_pattern();
            return self.parse_pattern_binding_or_infix(start, pattern);
        };

        if self.at(Token::Comma) || self.at(Token::ColonColon) {
            return self.parse_type_sig(start, name);
        }

        if self.at(Token::At) || self.ahead().is_con_sym() || self.at_backtick_con() {
            let pattern = self.continue_pattern(start, name);
            return self.parse_pattern_binding_or_infix(start, pattern);
        }

        if let Some(operator) = self.maybe_parse_var_operator() {
            let left = Expr::Identifier(name);
            return self.parse_infix_function(start, left, operator);
        }

        let mut params = Vec::new();
        while self.starts_apat() {
            params.push(self.parse_apat());
        }
        let rhs = self.parse_rhs(Token::Eq);
        Decl::Function(FunctionDecl {
            name,
            params,
            infix: false,
            rhs,
            loc: self.span_from(start),
        })
    }

    fn at_backtick_con(&mut self) -> bool {
        self.at(Token::Backtick) && self.peek_token(1) == Token::ProperIdent
    }

    /// Completes a pattern whose leading variable was already consumed:
    /// `xs@(x:_)` or `x : xs`.
    fn continue_pattern(&mut self, start: SourceLoc, name: Name) -> Expr {
        let left = if self.maybe_consume(Token::At) {
            let pattern = self.nested(Self::parse_apat);
            Expr::AsPattern {
                name,
                pattern: Box::new(pattern),
                loc: self.span_from(start),
            }
        } else {
            Expr::Identifier(name)
        };
        match self.maybe_parse_con_operator() {
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
        }
    }

    /// After a pattern: an infix definition if a variable operator follows,
    /// a pattern binding otherwise.
    fn parse_pattern_binding_or_infix(&mut self, start: SourceLoc, pattern: Expr) -> Decl {
        if let Some(operator) = self.maybe_parse_var_operator() {
            return self.parse_infix_function(start, pattern, operator);
        }
        let rhs = self.parse_rhs(Token::Eq);
        Decl::PatternBinding(PatternBindingDecl {
            pattern,
            rhs,
            loc: self.span_from(start),
        })
    }

    /// ``x `op` y = …`` or `x <+> y = …`, the operator already consumed.
    fn parse_infix_function(&mut self, start: SourceLoc, left: Expr, operator: Name) -> Decl {
        let right = self.parse_pattern();
        let rhs = self.parse_rhs(Token::Eq);
        Decl::Function(FunctionDecl {
            name: operator,
            params: vec![left, right],
            infix: true,
            rhs,
            loc: self.span_from(start),
        })
    }

    /// `f, g, (+) :: type`, the first name already consumed.
    fn parse_type_sig(&mut self, start: SourceLoc, first: Name) -> Decl {
        let mut names = vec![first];
        while self.maybe_consume(Token::Comma) {
            names.push(self.parse_var());
        }
        self.expect(Token::ColonColon);
        let ty = self.parse_type();
        Decl::TypeSig(TypeSigDecl {
            names,
            ty,
            loc: self.span_from(start),
        })
    }

    // ========================================================================
    // Right-Hand Sides
    // ========================================================================

    /// Parses `separator e` or guarded alternatives `| g separator e`, then
    /// an optional `where` block.
    ///
    /// A missing separator is reported without consuming anything, so the
    /// enclosing block can resynchronize at its next item.
    pub(super) fn parse_rhs(&mut self, separator: Token) -> Rhs {
        let start = self.ahead_loc();
        let body = if self.at(Token::Pipe) {
            let mut guards = Vec::new();
            while self.at(Token::Pipe) {
                let guard_start = self.ahead_loc();
                self.consume_token();
                let guard = self.parse_expr();
                self.expect(separator);
                let body = self.parse_expr();
                guards.push(GuardedExpr {
                    guard,
                    body,
                    loc: self.span_from(guard_start),
                });
            }
            RhsBody::Guarded(guards)
        } else if self.maybe_consume(separator) {
            RhsBody::Plain(self.parse_expr())
        } else {
            self.report_unexpected();
            return Rhs {
                body: RhsBody::Plain(Expr::Error { loc: start }),
                where_decls: Vec::new(),
                loc: start,
            };
        };

        let where_decls = if self.maybe_consume(Token::Where) {
            self.parse_block("where block", Self::parse_decl)
        } else {
            Vec::new()
        };
        Rhs {
            body,
            where_decls,
            loc: self.span_from(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_source;
    use crate::ast::{Associativity, Decl, Expr, Members, Name, RhsBody, Selection, Type};
    use crate::source_analysis::{DiagnosticKind, SourceLoc, Token};

    fn decls(source: &str) -> Vec<Decl> {
        let (program, context) = parse_source(source);
        assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());
        program.decls
    }

    #[test]
    fn module_header_with_exports() {
        let (program, context) =
            parse_source("module Data.Stack (Stack(..), push, (<+>), module M) where\n");
        assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());
        let module = program.module().expect("header is parsed");
        assert_eq!(context.spell(&module.name).as_deref(), Some("Data.Stack"));
        assert_eq!(module.loc, SourceLoc::from_coords(0, 0, 0, 58));
        let exports = module.exports.as_ref().expect("export list");
        assert_eq!(exports.selections.len(), 4);
        assert!(matches!(
            exports.selections[0],
            Selection::Item { members: Members::All { .. }, .. }
        ));
        assert!(matches!(
            exports.selections[2],
            Selection::Item { name: Name::Punc { .. }, .. }
        ));
        assert!(matches!(exports.selections[3], Selection::Module { .. }));
    }

    #[test]
    fn imports_with_qualifiers_aliases_and_lists() {
        let source = "import qualified Data.Map as M\nimport Data.List hiding (sort, Tree(Leaf, Node))\nimport Prelude ()\n";
        let (program, context) = parse_source(source);
        assert!(context.diagnostics().is_empty(), "{:?}", context.diagnostics());
        let imports: Vec<_> = program.imports().collect();
        assert_eq!(imports.len(), 3);

        assert!(imports[0].qualified);
        assert_eq!(context.spell(&imports[0].module).as_deref(), Some("Data.Map"));
        let alias = imports[0].alias.as_ref().expect("alias");
        assert_eq!(context.spell(alias).as_deref(), Some("M"));

        assert!(!imports[1].qualified);
        assert!(imports[1].hiding);
        let selections = imports[1].selections.as_ref().expect("hidden names");
        assert!(matches!(
            &selections.selections[1],
            Selection::Item { members: Members::Listed { names, .. }, .. } if names.len() == 2
        ));

        let empty = imports[2].selections.as_ref().expect("empty import list");
        assert!(empty.selections.is_empty());
    }

    #[test]
    fn contextual_keywords_are_ordinary_names_elsewhere() {
        let decls = decls("qualified as hiding = as");
        let Decl::Function(function) = &decls[0] else {
            panic!("expected a function clause, got {:?}", decls[0]);
        };
        assert_eq!(function.params.len(), 2);
    }

    #[test]
    fn module_selection_in_import_list_is_reported() {
        let (program, context) = parse_source("import A (module B)\n");
        let kinds: Vec<_> = context.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::UnexpectedToken]);
        assert_eq!(
            context.diagnostics()[0].loc,
            SourceLoc::from_coords(0, 10, 0, 16)
        );
        assert_eq!(program.imports().count(), 1);
    }

    #[test]
    fn type_signatures_share_one_type() {
        let decls = decls("f, g, (<+>) :: Int -> Int\n");
        let Decl::TypeSig(sig) = &decls[0] else {
            panic!("expected a type signature, got {:?}", decls[0]);
        };
        assert_eq!(sig.names.len(), 3);
        assert!(matches!(sig.names[2], Name::Punc { .. }));
        assert!(matches!(sig.ty, Type::Function { .. }));
    }

    #[test]
    fn fixity_declarations() {
        let decls = decls("infixl 6 <+>, `plus`\ninfixr :+\n");
        let Decl::Fixity(first) = &decls[0] else {
            panic!("expected a fixity declaration, got {:?}", decls[0]);
        };
        assert_eq!(first.associativity, Associativity::Left);
        assert_eq!(first.precedence, Some(6));
        assert_eq!(first.operators.len(), 2);
        let Decl::Fixity(second) = &decls[1] else {
            panic!("expected a fixity declaration, got {:?}", decls[1]);
        };
        assert_eq!(second.associativity, Associativity::Right);
        assert_eq!(second.precedence, None);
    }

    #[test]
    fn out_of_range_precedence_is_reported() {
        let (program, context) = parse_source("infix 12 ==\n");
        assert_eq!(context.diagnostics().len(), 1);
        assert!(matches!(
            &program.decls[0],
            Decl::Fixity(fixity) if fixity.precedence.is_none() && fixity.operators.len() == 1
        ));
    }

    #[test]
    fn function_clauses() {
        let decls = decls("main = return ()\nlength' (_:xs) = 1 + length' xs\n");
        assert_eq!(decls.len(), 2);
        let Decl::Function(main) = &decls[0] else {
            panic!("expected a function clause, got {:?}", decls[0]);
        };
        assert!(main.params.is_empty());
        assert!(!main.infix);
        let Decl::Function(length) = &decls[1] else {
            panic!("expected a function clause, got {:?}", decls[1]);
        };
        assert_eq!(length.params.len(), 1);
        assert_eq!(length.loc, SourceLoc::from_coords(1, 0, 1, 31));
    }

    #[test]
    fn infix_definitions() {
        let decls = decls("x <+> y = y\na `op` b = a\n(x:xs) ++ ys = x\n");
        for decl in &decls {
            let Decl::Function(function) = decl else {
                panic!("expected a function clause, got {decl:?}");
            };
            assert!(function.infix);
            assert_eq!(function.params.len(), 2);
        }
    }

    #[test]
    fn operator_definition_in_prefix_form() {
        let decls = decls("(<+>) a b = a\n");
        let Decl::Function(function) = &decls[0] else {
            panic!("expected a function clause, got {:?}", decls[0]);
        };
        assert!(matches!(function.name, Name::Punc { .. }));
        assert_eq!(function.params.len(), 2);
    }

    #[test]
    fn as_pattern_binding() {
        let decls = decls("all@(x:_) = list\n");
        assert!(matches!(
            &decls[0],
            Decl::PatternBinding(binding) if matches!(binding.pattern, Expr::AsPattern { .. })
        ));
    }

    #[test]
    fn guards_and_where_blocks() {
        let source = "\
sign n
  | n < 0 = negative
  | otherwise = positive
  where
    negative = -1
    positive = 1
";
        let decls = decls(source);
        assert_eq!(decls.len(), 1);
        let Decl::Function(function) = &decls[0] else {
            panic!("expected a function clause, got {:?}", decls[0]);
        };
        let RhsBody::Guarded(guards) = &function.rhs.body else {
            panic!("expected guards");
        };
        assert_eq!(guards.len(), 2);
        assert_eq!(guards[0].loc, SourceLoc::from_coords(1, 2, 1, 20));
        assert_eq!(function.rhs.where_decls.len(), 2);
        assert_eq!(function.loc, SourceLoc::from_coords(0, 0, 5, 16));
    }

    #[test]
    fn unsupported_declarations_are_skipped() {
        let source = "\
data Tree a = Leaf | Node (Tree a) a (Tree a)
class Container f where
  empty :: f a
  insert :: a -> f a -> f a
size = 0
";
        let decls = decls(source);
        assert_eq!(decls.len(), 3);
        assert!(matches!(decls[0], Decl::Unsupported { keyword: Token::Data, .. }));
        assert!(matches!(
            decls[1],
            Decl::Unsupported { keyword: Token::Class, loc } if loc == SourceLoc::from_coords(1, 0, 3, 27)
        ));
        assert!(matches!(decls[2], Decl::Function(_)));
    }

    #[test]
    fn missing_equals_resynchronizes_at_next_declaration() {
        let (program, context) = parse_source("f x y\ng = 1\n");
        assert_eq!(context.diagnostics().len(), 1);
        assert_eq!(program.decls.len(), 2);
        assert!(matches!(
            &program.decls[1],
            Decl::Function(function) if !function.rhs.loc.is_empty()
        ));
    }

    #[test]
    fn stray_tokens_are_reported_once_per_declaration() {
        let (program, context) = parse_source("a = 1 )\nb = 2\n");
        assert_eq!(context.diagnostics().len(), 1);
        assert_eq!(
            context.diagnostics()[0].loc,
            SourceLoc::from_coords(0, 6, 0, 7)
        );
        assert_eq!(program.decls.len(), 2);
    }

    #[test]
    fn empty_declarations() {
        let decls = decls("{ ; x = 1 ;; y = 2 ; }");
        assert!(matches!(decls[0], Decl::Empty { .. }));
        assert_eq!(decls.len(), 3);
    }
}
