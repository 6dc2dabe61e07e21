// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! A recursive descent grammar for a representative subset of Haskell.
//!
//! **DDD Context:** Source Analysis
//!
//! The grammar reads the explicitly delimited stream produced by
//! [`HsLexer`](crate::source_analysis::HsLexer): layout has already been
//! turned into `{`, `;` and `}`, so every block is parsed the same way
//! whether it was written with braces or indentation.
//!
//! Productions are split across submodules by the syntax they cover:
//!
//! - `declarations` - module header, imports, bindings, signatures, fixity
//! - `expressions` - operator chains, application, special forms
//! - `patterns` - patterns, sharing the expression tree
//! - `types` - types in signatures and annotations
//! - `names` - variables, constructors, operators and qualified names
//!
//! Data, class and instance declarations are recognised and skipped as
//! [`Decl::Unsupported`]. Operator chains are kept left-nested; fixity
//! resolution belongs to a later pass.

mod declarations;
mod expressions;
mod names;
mod patterns;
mod types;


use tracing::debug;

use super::{GrammarEntryPoint, Parser};
use crate::ast::{Decl, Expr, Program};
use crate::source_analysis::{HsLexer, ParsingContext, SourceLoc, Token, TokenSource};

/// Contextual keyword of import declarations.
const QUALIFIED: &str = "qualified";
/// Contextual keyword introducing an import alias.
const AS: &str = "as";
/// Contextual keyword introducing a hidden-names list.
const HIDING: &str = "hiding";

/// The Haskell grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct HsParser;

impl GrammarEntryPoint for HsParser {
    fn parse<L: TokenSource>(&mut self, lexer: L, context: &mut ParsingContext) -> bool {
        let mut parser = Parser::new(lexer, context);
        if parser.is_at_end() {
            return false;
        }
        let program = parser.parse_program();
        debug!(
            decls = program.decls.len(),
            diagnostics = parser.context().diagnostics().len(),
            "parsed Haskell program"
        );
        parser.context_mut().store_ast(program);
        true
    }
}

/// Lexes and parses Haskell `source`, returning its program.
///
/// Returns `None` if the source holds no tokens. Diagnostics are reported
/// to `context` either way.
///
/// # Example
///
/// ```
/// use frontkit_core::parse_haskell;
/// use frontkit_core::source_analysis::ParsingContext;
///
/// let mut context = ParsingContext::new();
/// assert!(parse_haskell("-- nothing here\n", &mut context).is_none());
///
/// let program = parse_haskell("x = (1, 2\n", &mut context).expect("tokens were found");
/// assert_eq!(program.decls.len(), 1);
/// assert_eq!(context.diagnostics().len(), 1);
/// ```
pub fn parse_haskell(source: &str, context: &mut ParsingContext) -> Option<Program> {
    if HsParser.parse(HsLexer::new(source), context) {
        context.take_ast()
    } else {
        None
    }
}

impl<L: TokenSource> Parser<'_, L> {
    // ========================================================================
    // Program Structure
    // ========================================================================

    /// `program → [module modid [exports] where] body`
    fn parse_program(&mut self) -> Program {
        let start = self.ahead_loc();
        let mut decls = Vec::new();
        if self.at(Token::Module) {
            decls.push(self.parse_module_header());
        }
        if self.at(Token::LBrace) {
            self.parse_body(&mut decls);
        }
        if !self.is_at_end() {
            self.report_unexpected();
            self.skip_to(Token::Eop);
        }
        Program {
            decls,
            loc: self.span_from(start),
        }
    }

    /// `body → { impdecls ; topdecls }`, imports first.
    fn parse_body(&mut self, decls: &mut Vec<Decl>) {
        self.consume_token();
        let mut more = true;
        while more && self.at(Token::Import) {
            decls.push(self.parse_import());
            more = self.end_of_block_item();
        }
        while more && !self.at(Token::RBrace) && !self.is_at_end() {
            decls.push(self.parse_top_decl());
            more = self.end_of_block_item();
        }
        self.expect_or_skip_to(Token::RBrace, "module body");
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parses `{ item ; … }` with `item`, the braces explicit or from layout.
    pub(super) fn parse_block<T>(
        &mut self,
        rule: &str,
        mut item: impl FnMut(&mut Self) -> T,
    ) -> Vec<T> {
        if self.enter_nesting().is_err() {
            return Vec::new();
        }
        let mut items = Vec::new();
        if self.expect(Token::LBrace) {
            while !self.at(Token::RBrace) && !self.is_at_end() {
                items.push(item(self));
                if !self.end_of_block_item() {
                    break;
                }
            }
            self.expect_or_skip_to(Token::RBrace, rule);
        }
        self.leave_nesting();
        items
    }

    /// Consumes the separators after a block item.
    ///
    /// Returns `false` at the end of the block. Tokens left over by the item
    /// are reported once and skipped up to the next separator, so one
    /// malformed item never swallows its neighbours.
    fn end_of_block_item(&mut self) -> bool {
        if !matches!(self.ahead(), Token::Semicolon | Token::RBrace | Token::Eop) {
            self.report_unexpected();
            self.skip_to_any(&[Token::Semicolon, Token::RBrace]);
        }
        let mut separated = false;
        while self.maybe_consume(Token::Semicolon) {
            separated = true;
        }
        separated && !self.at(Token::RBrace) && !self.is_at_end()
    }

    // ========================================================================
    // Recovery Helpers
    // ========================================================================

    /// Runs `parse` one nesting level deeper.
    pub(super) fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Expr) -> Expr {
        if let Err(loc) = self.enter_nesting() {
            return Expr::Error { loc };
        }
        let expr = parse(self);
        self.leave_nesting();
        expr
    }

    /// Reports the lookahead where an operand was required and returns its
    /// location for an error node.
    ///
    /// Tokens that close or continue an enclosing construct stay in place,
    /// so that construct still finds them; anything else is consumed.
    pub(super) fn reject(&mut self) -> SourceLoc {
        let loc = self.ahead_loc();
        if matches!(
            self.ahead(),
            Token::Semicolon
                | Token::RBrace
                | Token::RParen
                | Token::RBracket
                | Token::Comma
                | Token::Then
                | Token::Else
                | Token::Of
                | Token::In
                | Token::Where
                | Token::Eop
        ) {
            self.report_unexpected();
        } else {
            self.fail();
        }
        loc
    }
}

#[cfg(test)]
fn parse_source(source: &str) -> (Program, ParsingContext) {
    let mut context = ParsingContext::new();
    let program = parse_haskell(source, &mut context).expect("source is not empty");
    (program, context)
}
