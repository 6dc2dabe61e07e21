// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Layout-sensitive lexer for Haskell.
//!
//! Haskell blocks may be delimited by indentation instead of braces. This
//! lexer applies the offside rule while scanning and hands the parser an
//! explicitly delimited stream: wherever the layout implies a block, a
//! separator or the end of a block, it synthesizes `{`, `;` or `}`.
//! Synthesized tokens have zero-width locations at the token that
//! triggered them.
//!
//! # Layout rules
//!
//! - If the first token is neither `module` nor `{`, an implicit block opens
//!   at its column.
//! - After `where`, `let`, `do` and `of`, a block opens at the column of the
//!   next token unless that token is `{`. If the column does not exceed the
//!   enclosing implicit block's, the block is empty (`{` `}`).
//! - The first token of a line closes every implicit block indented deeper
//!   than it, and separates items (`;`) of a block aligned with it.
//! - `in` closes an implicit `let` block. A closing bracket or `,` closes the
//!   implicit blocks opened inside the current bracket.
//! - End of input closes every implicit block.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::{Cursor, TokenSource};
use crate::source_analysis::{DiagnosticKind, LineCol, ParsingContext, SourceLoc, Token};

/// A token as scanned, before layout processing.
#[derive(Debug, Clone, Copy)]
struct RawToken {
    token: Token,
    loc: SourceLoc,
    /// Indentation column of the token start, tabs expanded.
    column: u32,
    /// No other token precedes it on its line.
    first_on_line: bool,
}

/// An open block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// A block delimited by indentation.
    Implicit {
        column: u32,
        /// The keyword that opened the block, `where` for the module body.
        opener: Token,
        /// Bracket nesting depth when the block opened.
        depth: u32,
    },
    /// A block opened by a `{` in the source.
    Explicit,
}

/// A lexer for Haskell source code.
///
/// # Example
///
/// ```
/// use frontkit_core::source_analysis::{lex_all, HsLexer, ParsingContext, Token};
///
/// let mut context = ParsingContext::new();
/// let tokens = lex_all(HsLexer::new("x = 1\ny = 2\n"), &mut context);
/// let kinds: Vec<_> = tokens.iter().map(|(token, _)| *token).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         Token::LBrace, Token::Ident, Token::Eq, Token::IntLit, Token::Semicolon,
///         Token::Ident, Token::Eq, Token::IntLit, Token::RBrace, Token::Eop,
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct HsLexer<'src> {
    cursor: Cursor<'src>,
    /// Line of the last significant token scanned.
    last_line: Option<u32>,
    pending: VecDeque<(Token, SourceLoc)>,
    layouts: Vec<Layout>,
    /// Set after `where`, `let`, `do` or `of`: the next token opens a block.
    block_opener: Option<Token>,
    started: bool,
    bracket_depth: u32,
    /// End of the last significant token when it was a proper identifier.
    conid_end: Option<LineCol>,
    loc: SourceLoc,
}

impl<'src> HsLexer<'src> {
    /// Creates a lexer over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            last_line: None,
            pending: VecDeque::new(),
            layouts: Vec::new(),
            block_opener: None,
            started: false,
            bracket_depth: 0,
            conid_end: None,
            loc: SourceLoc::EMPTY,
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn emit_virtual(&mut self, token: Token, at: SourceLoc) {
        trace!(%token, loc = %at, "layout token");
        self.pending.push_back((token, at));
    }

    fn innermost_implicit_column(&self) -> Option<u32> {
        match self.layouts.last() {
            Some(Layout::Implicit { column, .. }) => Some(*column),
            _ => None,
        }
    }

    fn open_implicit(&mut self, raw: RawToken, opener: Token) {
        self.layouts.push(Layout::Implicit {
            column: raw.column,
            opener,
            depth: self.bracket_depth,
        });
        self.emit_virtual(Token::LBrace, raw.loc.at_start());
    }

    /// Pops implicit blocks while `close` accepts them, emitting `}` for each.
    fn close_implicit_while(
        &mut self,
        at: SourceLoc,
        close: impl Fn(u32, Token, u32) -> bool,
    ) {
        while let Some(&Layout::Implicit {
            column,
            opener,
            depth,
        }) = self.layouts.last()
        {
            if !close(column, opener, depth) {
                break;
            }
            self.layouts.pop();
            self.emit_virtual(Token::RBrace, at);
        }
    }

    /// Applies the layout rules to one scanned token, queueing the
    /// synthesized tokens followed by the token itself.
    fn process(&mut self, raw: RawToken) {
        let at = raw.loc.at_start();

        if !self.started {
            self.started = true;
            if !matches!(raw.token, Token::Module | Token::LBrace | Token::Eop) {
                self.open_implicit(raw, Token::Where);
                self.queue(raw, at);
                return;
            }
        }

        if let Some(opener) = self.block_opener.take() {
            if raw.token == Token::LBrace {
                self.queue(raw, at);
                return;
            }
            let opens = raw.token != Token::Eop
                && self
                    .innermost_implicit_column()
                    .is_none_or(|enclosing| raw.column > enclosing);
            if opens {
                self.open_implicit(raw, opener);
                self.queue(raw, at);
                return;
            }
            self.emit_virtual(Token::LBrace, at);
            self.emit_virtual(Token::RBrace, at);
        }

        if raw.first_on_line && raw.token != Token::Eop {
            self.close_implicit_while(at, |column, _, _| raw.column < column);
            if self.innermost_implicit_column() == Some(raw.column) {
                self.emit_virtual(Token::Semicolon, at);
            }
        }

        self.queue(raw, at);
    }

    /// Queues a token after the closings it implies and records the
    /// blocks and brackets it opens.
    fn queue(&mut self, raw: RawToken, at: SourceLoc) {
        match raw.token {
            Token::In => {
                if let Some(Layout::Implicit {
                    opener: Token::Let, ..
                }) = self.layouts.last()
                {
                    self.layouts.pop();
                    self.emit_virtual(Token::RBrace, at);
                }
            }
            Token::RParen | Token::RBracket | Token::Comma if self.bracket_depth > 0 => {
                let current = self.bracket_depth;
                self.close_implicit_while(at, |_, _, depth| depth >= current);
            }
            Token::RBrace if self.layouts.contains(&Layout::Explicit) => {
                self.close_implicit_while(at, |_, _, _| true);
                self.layouts.pop();
            }
            Token::Eop => {
                self.close_implicit_while(at, |_, _, _| true);
            }
            _ => {}
        }

        match raw.token {
            Token::LParen | Token::LBracket => self.bracket_depth += 1,
            Token::RParen | Token::RBracket => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            Token::LBrace => self.layouts.push(Layout::Explicit),
            Token::Where | Token::Let | Token::Do | Token::Of => {
                self.block_opener = Some(raw.token);
            }
            _ => {}
        }

        self.pending.push_back((raw.token, raw.loc));
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    /// Scans the next token, or a comment when comments are retained.
    fn scan(&mut self, context: &mut ParsingContext) -> RawToken {
        loop {
            self.cursor.advance_while(char::is_whitespace);
            let start = self.cursor.line_col();
            let start_pos = self.cursor.position();
            let column = self.cursor.visual_col();

            let Some(c) = self.cursor.peek_char() else {
                let loc = SourceLoc::point(start, context.file_id());
                return self.raw(Token::Eop, loc, column);
            };

            let token = match c {
                '{' if self.cursor.peek_char_n(1) == Some('-') => {
                    self.scan_block_comment(start, context);
                    Token::Comment
                }
                '-' if self.is_line_comment() => {
                    self.cursor.advance_while(|c| c != '\n');
                    Token::Comment
                }
                '(' | ')' | ',' | ';' | '[' | ']' | '`' | '{' | '}' => {
                    self.cursor.advance();
                    special_token(c)
                }
                '"' => self.scan_string(start, context),
                '\'' => self.scan_char(start, context),
                c if c.is_ascii_digit() => self.scan_number(start, context),
                c if c.is_lowercase() || c == '_' => {
                    self.cursor.advance_while(is_ident_char);
                    let text = self.cursor.text_from(start_pos);
                    if text == "_" {
                        Token::Underscore
                    } else {
                        haskell_keyword(text).unwrap_or(Token::Ident)
                    }
                }
                c if c.is_uppercase() => {
                    self.cursor.advance_while(is_ident_char);
                    Token::ProperIdent
                }
                '.' if self.is_qualifying_dot(start) => {
                    self.cursor.advance();
                    Token::Dot
                }
                c if is_symbol_char(c) => {
                    self.cursor.advance_while(is_symbol_char);
                    reserved_op(self.cursor.text_from(start_pos))
                }
                _ => {
                    self.cursor.advance();
                    let loc = self.cursor.loc_from(start, context.file_id());
                    debug!(%loc, character = %c, "unexpected character");
                    context.track_report(DiagnosticKind::UnexpectedCharacter, loc);
                    Token::Invalid
                }
            };

            let text = self.cursor.text_from(start_pos);
            if token == Token::Comment {
                if !context.allow_comments() {
                    continue;
                }
                context.lexemes_mut().record(token, start, text);
                return RawToken {
                    token,
                    loc: self.cursor.loc_from(start, context.file_id()),
                    column,
                    first_on_line: false,
                };
            }
            context.lexemes_mut().record(token, start, text);
            self.conid_end = (token == Token::ProperIdent).then(|| self.cursor.line_col());
            let loc = self.cursor.loc_from(start, context.file_id());
            return self.raw(token, loc, column);
        }
    }

    /// Wraps a significant token, noting whether it starts its line.
    fn raw(&mut self, token: Token, loc: SourceLoc, column: u32) -> RawToken {
        let line = loc.start().line;
        let first_on_line = self.last_line != Some(line);
        self.last_line = Some(line);
        RawToken {
            token,
            loc,
            column,
            first_on_line,
        }
    }

    /// Returns `true` at a dot that qualifies an operator symbol: `M.!` is
    /// the operator `!` qualified by `M`. The dot must touch the proper
    /// identifier before it. `[A..]` and `[A..B]` stay enumerations.
    fn is_qualifying_dot(&self, start: LineCol) -> bool {
        if self.conid_end != Some(start) {
            return false;
        }
        match self.cursor.peek_char_n(1) {
            Some('.') => self.cursor.peek_char_n(2).is_some_and(is_symbol_char),
            next => next.is_some_and(is_symbol_char),
        }
    }

    /// A run of two or more dashes not followed by another symbol starts a
    /// line comment; `-->` is an operator.
    fn is_line_comment(&self) -> bool {
        let mut n = 0;
        while self.cursor.peek_char_n(n) == Some('-') {
            n += 1;
        }
        n >= 2 && !self.cursor.peek_char_n(n).is_some_and(is_symbol_char)
    }

    /// Scans a possibly nested `{- ... -}` comment.
    fn scan_block_comment(&mut self, start: LineCol, context: &mut ParsingContext) {
        self.cursor.advance();
        self.cursor.advance();
        let mut depth = 1;
        while depth > 0 {
            match self.cursor.advance() {
                Some('{') if self.cursor.eat('-') => depth += 1,
                Some('-') if self.cursor.eat('}') => depth -= 1,
                Some(_) => {}
                None => {
                    let loc = self.cursor.loc_from(start, context.file_id());
                    debug!(%loc, "block comment runs to end of input");
                    context.track_report(DiagnosticKind::UnterminatedLiteral, loc);
                    return;
                }
            }
        }
    }

    /// Scans a string literal. An unterminated string stops before the end
    /// of its line.
    fn scan_string(&mut self, start: LineCol, context: &mut ParsingContext) -> Token {
        self.cursor.advance();
        loop {
            match self.cursor.peek_char() {
                Some('"') => {
                    self.cursor.advance();
                    return Token::StrLit;
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\n') | None => {
                    let loc = self.cursor.loc_from(start, context.file_id());
                    debug!(%loc, "unterminated string literal");
                    context.track_report(DiagnosticKind::UnterminatedLiteral, loc);
                    return Token::StrLit;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Scans a character literal such as `'a'`, `'\n'` or `'\x41'`.
    fn scan_char(&mut self, start: LineCol, context: &mut ParsingContext) -> Token {
        self.cursor.advance();
        match self.cursor.advance() {
            Some('\\') => {
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric());
            }
            Some('\n') | None => {
                let loc = self.cursor.loc_from(start, context.file_id());
                context.track_report(DiagnosticKind::UnterminatedLiteral, loc);
                return Token::CharLit;
            }
            Some(_) => {}
        }
        if !self.cursor.eat('\'') {
            let loc = self.cursor.loc_from(start, context.file_id());
            debug!(%loc, "unterminated character literal");
            context.track_report(DiagnosticKind::UnterminatedLiteral, loc);
        }
        Token::CharLit
    }

    /// Scans an integer (decimal, `0x`, `0o`, `0b`) or floating-point literal.
    fn scan_number(&mut self, start: LineCol, context: &mut ParsingContext) -> Token {
        let radix = match (self.cursor.peek_char(), self.cursor.peek_char_n(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            self.cursor.advance();
            self.cursor.advance();
            let digits_start = self.cursor.position();
            self.cursor.advance_while(|c| c.is_digit(radix));
            if self.cursor.position() == digits_start {
                let loc = self.cursor.loc_from(start, context.file_id());
                context.track_report(DiagnosticKind::MalformedNumber, loc);
            }
            return Token::IntLit;
        }

        let mut token = Token::IntLit;
        self.cursor.advance_while(|c| c.is_ascii_digit());
        if self.cursor.peek_char() == Some('.')
            && self.cursor.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
            token = Token::FloatLit;
        }
        let exponent = match (self.cursor.peek_char(), self.cursor.peek_char_n(1)) {
            (Some('e' | 'E'), Some(d)) if d.is_ascii_digit() => true,
            (Some('e' | 'E'), Some('+' | '-')) => {
                self.cursor.peek_char_n(2).is_some_and(|d| d.is_ascii_digit())
            }
            _ => false,
        };
        if exponent {
            self.cursor.advance();
            if matches!(self.cursor.peek_char(), Some('+' | '-')) {
                self.cursor.advance();
            }
            self.cursor.advance_while(|c| c.is_ascii_digit());
            token = Token::FloatLit;
        }
        token
    }
}

impl TokenSource for HsLexer<'_> {
    fn lex(&mut self, context: &mut ParsingContext) -> Token {
        while self.pending.is_empty() {
            let raw = self.scan(context);
            if raw.token == Token::Comment {
                self.loc = raw.loc;
                return Token::Comment;
            }
            self.process(raw);
        }
        match self.pending.pop_front() {
            Some((token, loc)) => {
                self.loc = loc;
                token
            }
            None => Token::Eop,
        }
    }

    fn token_loc(&self) -> SourceLoc {
        self.loc
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

fn is_symbol_char(c: char) -> bool {
    matches!(
        c,
        '!' | '#' | '$' | '%' | '&' | '*' | '+' | '.' | '/' | '<' | '=' | '>' | '?' | '@' | '\\'
            | '^' | '|' | '-' | '~' | ':'
    )
}

fn special_token(c: char) -> Token {
    match c {
        '(' => Token::LParen,
        ')' => Token::RParen,
        ',' => Token::Comma,
        ';' => Token::Semicolon,
        '[' => Token::LBracket,
        ']' => Token::RBracket,
        '`' => Token::Backtick,
        '{' => Token::LBrace,
        _ => Token::RBrace,
    }
}

/// Classifies a run of symbol characters.
fn reserved_op(text: &str) -> Token {
    match text {
        ".." => Token::DotDot,
        ":" => Token::Colon,
        "::" => Token::ColonColon,
        "=" => Token::Eq,
        "\\" => Token::Backslash,
        "|" => Token::Pipe,
        "<-" => Token::LArrow,
        "->" => Token::Arrow,
        "@" => Token::At,
        "~" => Token::Tilde,
        "=>" => Token::DArrow,
        "-" => Token::Minus,
        "." => Token::Dot,
        _ if text.starts_with(':') => Token::ConSym,
        _ => Token::VarSym,
    }
}

/// Maps reserved words to their keyword tokens.
///
/// `qualified`, `as` and `hiding` are only special in import declarations
/// and stay identifiers.
fn haskell_keyword(text: &str) -> Option<Token> {
    let token = match text {
        "case" => Token::Case,
        "class" => Token::Class,
        "data" => Token::Data,
        "default" => Token::Default,
        "deriving" => Token::Deriving,
        "do" => Token::Do,
        "else" => Token::Else,
        "foreign" => Token::Foreign,
        "if" => Token::If,
        "import" => Token::Import,
        "in" => Token::In,
        "infix" => Token::Infix,
        "infixl" => Token::Infixl,
        "infixr" => Token::Infixr,
        "instance" => Token::Instance,
        "let" => Token::Let,
        "module" => Token::Module,
        "newtype" => Token::Newtype,
        "of" => Token::Of,
        "then" => Token::Then,
        "type" => Token::Type,
        "where" => Token::Where,
        _ => return None,
    };
    Some(token)
}
