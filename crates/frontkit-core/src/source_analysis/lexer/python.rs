// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Layout-sensitive lexer for Python.
//!
//! Besides ordinary tokens, the lexer synthesizes the structural tokens a
//! Python grammar relies on: [`Token::Newline`] at the end of each logical
//! line, and [`Token::Indent`] / [`Token::Dedent`] when the indentation of a
//! logical line differs from the enclosing block.
//!
//! # Layout rules
//!
//! - Blank lines and comment-only lines never affect indentation and never
//!   produce a newline token.
//! - Inside `()`, `[]` or `{}` physical newlines are ignored.
//! - A backslash right before a newline joins two physical lines.
//! - Indentation is measured with tab stops every 8 columns; a form feed
//!   resets the measure.
//! - At end of input every open block is closed with one dedent per level.
//!   No newline token is synthesized when the input does not end in one.

use tracing::debug;

use super::{Cursor, TokenSource};
use crate::source_analysis::{DiagnosticKind, LineCol, ParsingContext, SourceLoc, Token};

/// A lexer for Python source code.
///
/// # Example
///
/// ```
/// use frontkit_core::source_analysis::{lex_all, ParsingContext, PyLexer, Token};
///
/// let mut context = ParsingContext::new();
/// let tokens = lex_all(PyLexer::new("if a:\n    pass\n"), &mut context);
/// let kinds: Vec<_> = tokens.iter().map(|(token, _)| *token).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         Token::If, Token::Ident, Token::Colon, Token::Newline,
///         Token::Indent, Token::Pass, Token::Newline, Token::Dedent, Token::Eop,
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct PyLexer<'src> {
    cursor: Cursor<'src>,
    /// Open indentation widths; the bottom entry is always 0.
    indents: Vec<u32>,
    /// A width a dedent reached without matching a block. Until the next
    /// push or pop it stands for the level on top of `indents`.
    misaligned_width: Option<u32>,
    bracket_depth: u32,
    /// Set after a newline that ends a logical line.
    at_line_start: bool,
    /// Whether the current logical line produced any token yet.
    line_has_tokens: bool,
    pending_dedents: u32,
    loc: SourceLoc,
}

impl<'src> PyLexer<'src> {
    /// Creates a lexer over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            indents: vec![0],
            misaligned_width: None,
            bracket_depth: 0,
            at_line_start: true,
            line_has_tokens: false,
            pending_dedents: 0,
            loc: SourceLoc::EMPTY,
        }
    }

    fn point_here(&self, context: &ParsingContext) -> SourceLoc {
        SourceLoc::point(self.cursor.line_col(), context.file_id())
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Compares the indentation of a new logical line with the open blocks.
    fn indentation_change(&mut self, width: u32, context: &mut ParsingContext) -> Option<Token> {
        let top = self.indents.last().copied().unwrap_or(0);
        let width = if self.misaligned_width == Some(width) {
            top
        } else {
            width
        };
        if width > top {
            self.misaligned_width = None;
            self.indents.push(width);
            self.loc = self.point_here(context);
            return Some(Token::Indent);
        }
        if width == top {
            return None;
        }

        let mut popped = 0;
        while self.indents.len() > 1 && self.indents.last().is_some_and(|&w| w > width) {
            self.indents.pop();
            popped += 1;
        }
        self.loc = self.point_here(context);
        self.misaligned_width = None;
        if self.indents.last().copied() != Some(width) {
            debug!(loc = %self.loc, width, "dedent matches no enclosing block");
            context.track_report(DiagnosticKind::InconsistentIndentation, self.loc);
            self.misaligned_width = Some(width);
        }
        self.pending_dedents = popped - 1;
        Some(Token::Dedent)
    }

    /// Consumes a newline (`\n` or `\r\n`) if one is next.
    fn eat_newline(&mut self) -> bool {
        if self.cursor.peek_char() == Some('\r') && self.cursor.peek_char_n(1) == Some('\n') {
            self.cursor.advance();
        }
        self.cursor.eat('\n')
    }

    fn is_newline_next(&self, skip: usize) -> bool {
        match self.cursor.peek_char_n(skip) {
            Some('\n') => true,
            Some('\r') => self.cursor.peek_char_n(skip + 1) == Some('\n'),
            _ => false,
        }
    }

    /// Lexes a `#` comment up to, not including, the end of the line.
    fn lex_comment(&mut self, context: &mut ParsingContext) {
        let start = self.cursor.line_col();
        let start_pos = self.cursor.position();
        self.cursor.advance_while(|c| c != '\n' && c != '\r');
        self.loc = self.cursor.loc_from(start, context.file_id());
        if context.allow_comments() {
            let text = self.cursor.text_from(start_pos);
            context.lexemes_mut().record(Token::Comment, start, text);
        }
    }

    // ========================================================================
    // Significant tokens
    // ========================================================================

    fn lex_token(&mut self, c: char, context: &mut ParsingContext) -> Token {
        let start = self.cursor.line_col();
        let start_pos = self.cursor.position();

        let token = if c.is_ascii_digit()
            || (c == '.' && self.cursor.peek_char_n(1).is_some_and(|n| n.is_ascii_digit()))
        {
            self.lex_number(start, context)
        } else if c == '\'' || c == '"' || self.string_prefix_len().is_some() {
            let end = self.lex_string(start, context);
            self.loc = SourceLoc::new(start, end, context.file_id());
            let text = self.cursor.text_from(start_pos);
            let text = text.trim_end_matches(['\n', '\r']);
            context.lexemes_mut().record(Token::StrLit, start, text);
            return Token::StrLit;
        } else if c.is_alphabetic() || c == '_' {
            self.cursor
                .advance_while(|c| c.is_alphanumeric() || c == '_');
            python_keyword(self.cursor.text_from(start_pos)).unwrap_or(Token::Ident)
        } else {
            self.lex_operator(c, start, context)
        };

        self.loc = self.cursor.loc_from(start, context.file_id());
        context
            .lexemes_mut()
            .record(token, start, self.cursor.text_from(start_pos));
        token
    }

    /// Returns the length of a string prefix (`r`, `b`, `rb`, ...) if the
    /// identifier-like text ahead is one.
    fn string_prefix_len(&self) -> Option<usize> {
        let is_quote = |c: Option<char>| matches!(c, Some('\'' | '"'));
        let first = self.cursor.peek_char_n(0)?.to_ascii_lowercase();
        if matches!(first, 'r' | 'u' | 'b' | 'f') && is_quote(self.cursor.peek_char_n(1)) {
            return Some(1);
        }
        let second = self.cursor.peek_char_n(1)?.to_ascii_lowercase();
        let two_letter = matches!(
            (first, second),
            ('u' | 'b' | 'f', 'r') | ('r', 'b' | 'f')
        );
        (two_letter && is_quote(self.cursor.peek_char_n(2))).then_some(2)
    }

    /// Lexes a string literal, prefix included, and returns where it ends.
    ///
    /// An unterminated single-line string ends at the first unescaped
    /// newline, which it consumes; an unterminated triple-quoted string runs
    /// to the end of input.
    fn lex_string(&mut self, start: LineCol, context: &mut ParsingContext) -> LineCol {
        for _ in 0..self.string_prefix_len().unwrap_or(0) {
            self.cursor.advance();
        }
        let Some(quote) = self.cursor.advance() else {
            return self.cursor.line_col();
        };
        let triple =
            self.cursor.peek_char_n(0) == Some(quote) && self.cursor.peek_char_n(1) == Some(quote);
        if triple {
            self.cursor.advance();
            self.cursor.advance();
        }

        loop {
            match self.cursor.peek_char() {
                None => {
                    let loc = self.cursor.loc_from(start, context.file_id());
                    debug!(%loc, "string runs to end of input");
                    context.track_report(DiagnosticKind::UnterminatedLiteral, loc);
                    return loc.end();
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\n' | '\r') if !triple && self.is_newline_next(0) => {
                    let loc = self.cursor.loc_from(start, context.file_id());
                    debug!(%loc, "string ends at end of line");
                    context.track_report(DiagnosticKind::UnterminatedLiteral, loc);
                    self.eat_newline();
                    if self.bracket_depth == 0 {
                        self.at_line_start = true;
                        self.line_has_tokens = false;
                    }
                    return loc.end();
                }
                Some(c) if c == quote => {
                    if !triple {
                        self.cursor.advance();
                        return self.cursor.line_col();
                    }
                    if self.cursor.peek_char_n(1) == Some(quote)
                        && self.cursor.peek_char_n(2) == Some(quote)
                    {
                        self.cursor.advance();
                        self.cursor.advance();
                        self.cursor.advance();
                        return self.cursor.line_col();
                    }
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Lexes a numeric literal.
    ///
    /// Radix literals (`0x`, `0o`, `0b`) and plain integers may carry an
    /// `l`/`L` suffix and are [`Token::IntLit`]. A fraction, an exponent or
    /// an imaginary `j`/`J` suffix makes a [`Token::FloatLit`].
    fn lex_number(&mut self, start: LineCol, context: &mut ParsingContext) -> Token {
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
            self.cursor
                .advance_while(|c| c.is_digit(radix) || c == '_');
            if self.cursor.position() == digits_start {
                let loc = self.cursor.loc_from(start, context.file_id());
                debug!(%loc, "radix prefix without digits");
                context.track_report(DiagnosticKind::MalformedNumber, loc);
            }
            self.eat_long_suffix();
            return Token::IntLit;
        }

        let mut is_float = false;
        self.cursor
            .advance_while(|c| c.is_ascii_digit() || c == '_');
        if self.cursor.eat('.') {
            is_float = true;
            self.cursor
                .advance_while(|c| c.is_ascii_digit() || c == '_');
        }

        let exponent = match (self.cursor.peek_char(), self.cursor.peek_char_n(1)) {
            (Some('e' | 'E'), Some(d)) if d.is_ascii_digit() => true,
            (Some('e' | 'E'), Some('+' | '-')) => {
                self.cursor.peek_char_n(2).is_some_and(|d| d.is_ascii_digit())
            }
            _ => false,
        };
        if exponent {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.peek_char(), Some('+' | '-')) {
                self.cursor.advance();
            }
            self.cursor
                .advance_while(|c| c.is_ascii_digit() || c == '_');
        }

        if matches!(self.cursor.peek_char(), Some('j' | 'J')) {
            self.cursor.advance();
            return Token::FloatLit;
        }
        if is_float {
            return Token::FloatLit;
        }
        self.eat_long_suffix();
        Token::IntLit
    }

    fn eat_long_suffix(&mut self) {
        if matches!(self.cursor.peek_char(), Some('l' | 'L')) {
            self.cursor.advance();
        }
    }

    /// Lexes punctuation and operators, longest match first.
    fn lex_operator(&mut self, c: char, start: LineCol, context: &mut ParsingContext) -> Token {
        self.cursor.advance();
        match c {
            '(' | '[' | '{' => {
                self.bracket_depth += 1;
                match c {
                    '(' => Token::LParen,
                    '[' => Token::LBracket,
                    _ => Token::LBrace,
                }
            }
            ')' | ']' | '}' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                match c {
                    ')' => Token::RParen,
                    ']' => Token::RBracket,
                    _ => Token::RBrace,
                }
            }
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '`' => Token::Backtick,
            '~' => Token::Tilde,
            ':' => self.with_eq(Token::Colon, Token::ColonEq),
            '=' => self.with_eq(Token::Eq, Token::EqEq),
            '+' => self.with_eq(Token::Plus, Token::PlusEq),
            '%' => self.with_eq(Token::Percent, Token::PercentEq),
            '&' => self.with_eq(Token::Amper, Token::AmperEq),
            '|' => self.with_eq(Token::Pipe, Token::PipeEq),
            '^' => self.with_eq(Token::Caret, Token::CaretEq),
            '@' => self.with_eq(Token::At, Token::AtEq),
            '-' => {
                if self.cursor.eat('>') {
                    Token::Arrow
                } else {
                    self.with_eq(Token::Minus, Token::MinusEq)
                }
            }
            '*' => {
                if self.cursor.eat('*') {
                    self.with_eq(Token::StarStar, Token::StarStarEq)
                } else {
                    self.with_eq(Token::Star, Token::StarEq)
                }
            }
            '/' => {
                if self.cursor.eat('/') {
                    self.with_eq(Token::SlashSlash, Token::SlashSlashEq)
                } else {
                    self.with_eq(Token::Slash, Token::SlashEq)
                }
            }
            '<' => {
                if self.cursor.eat('<') {
                    self.with_eq(Token::LsLs, Token::LsLsEq)
                } else if self.cursor.eat('>') {
                    Token::ExclamEq
                } else {
                    self.with_eq(Token::Ls, Token::LsEq)
                }
            }
            '>' => {
                if self.cursor.eat('>') {
                    self.with_eq(Token::GrGr, Token::GrGrEq)
                } else {
                    self.with_eq(Token::Gr, Token::GrEq)
                }
            }
            '.' => {
                if self.cursor.peek_char_n(0) == Some('.') && self.cursor.peek_char_n(1) == Some('.')
                {
                    self.cursor.advance();
                    self.cursor.advance();
                    Token::Ellipsis
                } else {
                    Token::Dot
                }
            }
            '!' if self.cursor.eat('=') => Token::ExclamEq,
            _ => {
                let loc = self.cursor.loc_from(start, context.file_id());
                debug!(%loc, character = %c, "unexpected character");
                context.track_report(DiagnosticKind::UnexpectedCharacter, loc);
                Token::Invalid
            }
        }
    }

    /// Returns `with` if `=` follows (consuming it), else `plain`.
    fn with_eq(&mut self, plain: Token, with: Token) -> Token {
        if self.cursor.eat('=') { with } else { plain }
    }
}

impl TokenSource for PyLexer<'_> {
    fn lex(&mut self, context: &mut ParsingContext) -> Token {
        loop {
            if self.pending_dedents > 0 {
                self.pending_dedents -= 1;
                self.loc = self.point_here(context);
                return Token::Dedent;
            }

            if self.at_line_start && self.bracket_depth == 0 {
                let width = self.cursor.skip_indentation();
                match self.cursor.peek_char() {
                    None => self.at_line_start = false,
                    Some('\n' | '\r') if self.is_newline_next(0) => {
                        self.eat_newline();
                        continue;
                    }
                    Some('#') => {
                        self.lex_comment(context);
                        self.eat_newline();
                        if context.allow_comments() {
                            return Token::Comment;
                        }
                        continue;
                    }
                    Some(_) => {
                        self.at_line_start = false;
                        if let Some(token) = self.indentation_change(width, context) {
                            return token;
                        }
                    }
                }
            }

            self.cursor
                .advance_while(|c| matches!(c, ' ' | '\t' | '\x0c') || c == '\r');
            let Some(c) = self.cursor.peek_char() else {
                self.loc = self.point_here(context);
                if self.indents.len() > 1 {
                    self.indents.pop();
                    return Token::Dedent;
                }
                return Token::Eop;
            };

            match c {
                '#' => {
                    self.lex_comment(context);
                    if context.allow_comments() {
                        return Token::Comment;
                    }
                }
                '\n' => {
                    let start = self.cursor.line_col();
                    self.cursor.advance();
                    if self.bracket_depth > 0 {
                        continue;
                    }
                    self.at_line_start = true;
                    if self.line_has_tokens {
                        self.line_has_tokens = false;
                        let end = LineCol::new(start.line, start.col + 1);
                        self.loc = SourceLoc::new(start, end, context.file_id());
                        return Token::Newline;
                    }
                }
                '\\' if self.is_newline_next(1) => {
                    self.cursor.advance();
                    self.eat_newline();
                }
                _ => {
                    self.line_has_tokens = true;
                    return self.lex_token(c, context);
                }
            }
        }
    }

    fn token_loc(&self) -> SourceLoc {
        self.loc
    }
}

/// Maps reserved words to their keyword tokens.
///
/// `async` and `await` are contextual and stay identifiers.
fn python_keyword(text: &str) -> Option<Token> {
    let token = match text {
        "and" => Token::And,
        "as" => Token::As,
        "assert" => Token::Assert,
        "break" => Token::Break,
        "class" => Token::Class,
        "continue" => Token::Continue,
        "def" => Token::Def,
        "del" => Token::Del,
        "elif" => Token::Elif,
        "else" => Token::Else,
        "except" => Token::Except,
        "exec" => Token::Exec,
        "finally" => Token::Finally,
        "for" => Token::For,
        "from" => Token::From,
        "global" => Token::Global,
        "if" => Token::If,
        "import" => Token::Import,
        "in" => Token::In,
        "is" => Token::Is,
        "lambda" => Token::Lambda,
        "nonlocal" => Token::Nonlocal,
        "not" => Token::Not,
        "or" => Token::Or,
        "pass" => Token::Pass,
        "print" => Token::Print,
        "raise" => Token::Raise,
        "return" => Token::Return,
        "try" => Token::Try,
        "while" => Token::While,
        "with" => Token::With,
        "yield" => Token::Yield,
        "True" => Token::TrueValue,
        "False" => Token::FalseValue,
        "None" => Token::NoneValue,
        _ => return None,
    };
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{lex_all, Lexeme};

    fn lex_tokens(source: &str) -> Vec<Token> {
        let mut context = ParsingContext::new();
        lex_all(PyLexer::new(source), &mut context)
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    fn lex_with_comments(source: &str) -> Vec<Token> {
        let mut context = ParsingContext::new();
        context.set_allow_comments(true);
        lex_all(PyLexer::new(source), &mut context)
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    /// Locations of every token except the synthesized ones and `Eop`.
    fn lex_locs(source: &str) -> Vec<SourceLoc> {
        let mut context = ParsingContext::new();
        lex_all(PyLexer::new(source), &mut context)
            .into_iter()
            .filter(|(token, _)| !token.is_layout() && !token.is_eop())
            .map(|(_, loc)| loc)
            .collect()
    }

    fn diagnostics(source: &str) -> Vec<DiagnosticKind> {
        let mut context = ParsingContext::new();
        lex_all(PyLexer::new(source), &mut context);
        context.diagnostics().iter().map(|d| d.kind).collect()
    }

    fn loc(line: u32, col: u32, last_line: u32, last_col: u32) -> SourceLoc {
        SourceLoc::from_coords(line, col, last_line, last_col)
    }

    // ========================================================================
    // Layout
    // ========================================================================

    #[test]
    fn lex_empty() {
        assert_eq!(lex_tokens(""), vec![Token::Eop]);
        assert_eq!(lex_tokens("\n\n   \n"), vec![Token::Eop]);
        assert_eq!(lex_tokens("# only a comment\n"), vec![Token::Eop]);
    }

    #[test]
    fn lex_if_block() {
        let source = "\nthe_world_is_flat = 1\nif the_world_is_flat:\n    print \"Be careful not to fall off!\"\n";
        assert_eq!(
            lex_tokens(source),
            vec![
                Token::Ident,
                Token::Eq,
                Token::IntLit,
                Token::Newline,
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Print,
                Token::StrLit,
                Token::Newline,
                Token::Dedent,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_nested_blocks_close_at_end_of_input() {
        let source = "\ndef check():\n    if let_it:\n        pass\n";
        assert_eq!(
            lex_tokens(source),
            vec![
                Token::Def,
                Token::Ident,
                Token::LParen,
                Token::RParen,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Pass,
                Token::Newline,
                Token::Dedent,
                Token::Dedent,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_no_newline_without_trailing_newline() {
        assert_eq!(
            lex_tokens("x = 0"),
            vec![Token::Ident, Token::Eq, Token::IntLit, Token::Eop]
        );
    }

    #[test]
    fn lex_multiple_dedents_in_one_step() {
        let source = "\ndef f():\n    if a:\n        if b:\n            x\ndef g():\n    pass\n";
        let tokens = lex_tokens(source);
        assert_eq!(
            &tokens[17..25],
            &[
                Token::Ident,
                Token::Newline,
                Token::Dedent,
                Token::Dedent,
                Token::Dedent,
                Token::Def,
                Token::Ident,
                Token::LParen,
            ]
        );
        assert_eq!(
            &tokens[tokens.len() - 5..],
            &[
                Token::Indent,
                Token::Pass,
                Token::Newline,
                Token::Dedent,
                Token::Eop
            ]
        );
    }

    #[test]
    fn lex_partial_dedent() {
        let source = "\ndef f():\n    if a:\n        if b:\n            x\n    if a:\n        x\n";
        assert_eq!(
            lex_tokens(source),
            vec![
                Token::Def,
                Token::Ident,
                Token::LParen,
                Token::RParen,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Ident,
                Token::Newline,
                Token::Dedent,
                Token::Dedent,
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Ident,
                Token::Newline,
                Token::Dedent,
                Token::Dedent,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_newlines_inside_brackets_are_ignored() {
        let source = "\nif a:\n    print [1, 2,\n3, 4]\n";
        assert_eq!(
            lex_tokens(source),
            vec![
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Print,
                Token::LBracket,
                Token::IntLit,
                Token::Comma,
                Token::IntLit,
                Token::Comma,
                Token::IntLit,
                Token::Comma,
                Token::IntLit,
                Token::RBracket,
                Token::Newline,
                Token::Dedent,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_backslash_continuation() {
        let source = "\nfrom a import \\\n     b, \\\n     c, \\\n     d\n";
        assert_eq!(
            lex_tokens(source),
            vec![
                Token::From,
                Token::Ident,
                Token::Import,
                Token::Ident,
                Token::Comma,
                Token::Ident,
                Token::Comma,
                Token::Ident,
                Token::Newline,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_comment_lines_do_not_affect_indentation() {
        let source = "\nif a:\n    # Comment\n    print a\n";
        assert_eq!(
            lex_tokens(source),
            vec![
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Print,
                Token::Ident,
                Token::Newline,
                Token::Dedent,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_try_except_finally() {
        let source = "\ntry:\n    print 1\nexcept A, a:\n    print 2\nexcept B, b:\n    print 3\n    print 4\n    if (c):\n         print 5\nfinally:\n    print 6\n";
        let tokens = lex_tokens(source);
        let dedents = tokens.iter().filter(|t| **t == Token::Dedent).count();
        let indents = tokens.iter().filter(|t| **t == Token::Indent).count();
        assert_eq!(indents, 5);
        assert_eq!(dedents, 5);
        let finally = tokens.iter().position(|t| *t == Token::Finally);
        assert_eq!(
            finally.map(|i| &tokens[i - 4..i]),
            Some(
                &[
                    Token::IntLit,
                    Token::Newline,
                    Token::Dedent,
                    Token::Dedent
                ][..]
            )
        );
    }

    #[test]
    fn lex_async_and_await_are_identifiers() {
        let source = "\nasync def foo():\n    def foo(await):\n        await = 1\n    if 1:\n        await\n    async += 1\n";
        let tokens = lex_tokens(source);
        assert_eq!(&tokens[..3], &[Token::Ident, Token::Def, Token::Ident]);
        assert!(tokens.contains(&Token::PlusEq));
        assert!(!tokens.contains(&Token::Invalid));
    }

    #[test]
    fn lex_inconsistent_dedent_is_reported() {
        let source = "if a:\n        x\n    y\n";
        let tokens = lex_tokens(source);
        assert!(tokens.contains(&Token::Dedent));
        assert_eq!(
            diagnostics(source),
            vec![DiagnosticKind::InconsistentIndentation]
        );
    }

    #[test]
    fn lex_lines_after_inconsistent_dedent_stay_in_one_block() {
        let source = "if a:\n        x\n    y\n    z\n    w\n";
        assert_eq!(
            lex_tokens(source),
            vec![
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Indent,
                Token::Ident,
                Token::Newline,
                Token::Dedent,
                Token::Ident,
                Token::Newline,
                Token::Ident,
                Token::Newline,
                Token::Ident,
                Token::Newline,
                Token::Eop,
            ]
        );
        assert_eq!(
            diagnostics(source),
            vec![DiagnosticKind::InconsistentIndentation]
        );
    }

    #[test]
    fn lex_misaligned_width_is_forgotten_after_a_new_block() {
        let source = "if a:\n        x\n    if b:\n        y\n    z\n";
        let tokens = lex_tokens(source);
        assert_eq!(tokens.iter().filter(|t| **t == Token::Indent).count(), 2);
        assert_eq!(tokens.iter().filter(|t| **t == Token::Dedent).count(), 2);
        assert_eq!(
            diagnostics(source),
            vec![
                DiagnosticKind::InconsistentIndentation,
                DiagnosticKind::InconsistentIndentation
            ]
        );
    }

    #[test]
    fn lex_tabs_measure_to_tab_stops() {
        let source = "if a:\n\tx\n        y\n";
        assert!(diagnostics(source).is_empty());
        let tokens = lex_tokens(source);
        assert_eq!(tokens.iter().filter(|t| **t == Token::Indent).count(), 1);
    }

    // ========================================================================
    // Numbers and operators
    // ========================================================================

    #[test]
    fn lex_radix_integers() {
        assert_eq!(
            lex_tokens("0xff <= 255"),
            vec![Token::IntLit, Token::LsEq, Token::IntLit, Token::Eop]
        );
        assert_eq!(
            lex_tokens("0o123 <= 0O123"),
            vec![Token::IntLit, Token::LsEq, Token::IntLit, Token::Eop]
        );
        assert_eq!(
            lex_tokens("1234567 > ~0x15"),
            vec![
                Token::IntLit,
                Token::Gr,
                Token::Tilde,
                Token::IntLit,
                Token::Eop
            ]
        );
        assert_eq!(
            lex_tokens("x = 0xffffffffL"),
            vec![Token::Ident, Token::Eq, Token::IntLit, Token::Eop]
        );
        assert_eq!(
            lex_tokens("x = 1L"),
            vec![Token::Ident, Token::Eq, Token::IntLit, Token::Eop]
        );
    }

    #[test]
    fn lex_floats() {
        for source in ["x = 3.14159", "x = 314159.", "x = .314159", "x = 3e14159", "x = 2j"] {
            assert_eq!(
                lex_tokens(source),
                vec![Token::Ident, Token::Eq, Token::FloatLit, Token::Eop],
                "{source}"
            );
        }
        assert_eq!(
            lex_tokens("x+y = 3e-1230"),
            vec![
                Token::Ident,
                Token::Plus,
                Token::Ident,
                Token::Eq,
                Token::FloatLit,
                Token::Eop
            ]
        );
    }

    #[test]
    fn lex_radix_without_digits_is_malformed() {
        assert_eq!(lex_tokens("0x"), vec![Token::IntLit, Token::Eop]);
        assert_eq!(diagnostics("0x"), vec![DiagnosticKind::MalformedNumber]);
    }

    #[test]
    fn lex_operators() {
        assert_eq!(
            lex_tokens("(-124561-1) & 200000000"),
            vec![
                Token::LParen,
                Token::Minus,
                Token::IntLit,
                Token::Minus,
                Token::IntLit,
                Token::RParen,
                Token::Amper,
                Token::IntLit,
                Token::Eop,
            ]
        );
        assert_eq!(
            lex_tokens("~1 ^ 1 & 1 |1 ^ -1"),
            vec![
                Token::Tilde,
                Token::IntLit,
                Token::Caret,
                Token::IntLit,
                Token::Amper,
                Token::IntLit,
                Token::Pipe,
                Token::IntLit,
                Token::Caret,
                Token::Minus,
                Token::IntLit,
                Token::Eop,
            ]
        );
        assert_eq!(
            lex_tokens("a **= b //= c >>= d <<= e -> f := g ... <> !="),
            vec![
                Token::Ident,
                Token::StarStarEq,
                Token::Ident,
                Token::SlashSlashEq,
                Token::Ident,
                Token::GrGrEq,
                Token::Ident,
                Token::LsLsEq,
                Token::Ident,
                Token::Arrow,
                Token::Ident,
                Token::ColonEq,
                Token::Ident,
                Token::Ellipsis,
                Token::ExclamEq,
                Token::ExclamEq,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_star_parameters() {
        assert_eq!(
            lex_tokens("def d01v_(a=1, *k, **w): pass"),
            vec![
                Token::Def,
                Token::Ident,
                Token::LParen,
                Token::Ident,
                Token::Eq,
                Token::IntLit,
                Token::Comma,
                Token::Star,
                Token::Ident,
                Token::Comma,
                Token::StarStar,
                Token::Ident,
                Token::RParen,
                Token::Colon,
                Token::Pass,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_decorator() {
        let source = "\n@staticmethod\ndef foo(x,y): pass\n";
        assert_eq!(&lex_tokens(source)[..3], &[Token::At, Token::Ident, Token::Newline]);
    }

    #[test]
    fn lex_unknown_character() {
        assert_eq!(
            lex_tokens("a ? b"),
            vec![Token::Ident, Token::Invalid, Token::Ident, Token::Eop]
        );
        assert_eq!(
            diagnostics("a $ b"),
            vec![DiagnosticKind::UnexpectedCharacter]
        );
    }

    // ========================================================================
    // Strings
    // ========================================================================

    #[test]
    fn lex_string_prefixes() {
        for source in [
            "x = r'abc' + r'ABC' + R'ABC' + R'ABC'",
            "y = r\"abc\" + r\"ABC\" + R\"ABC\" + R\"ABC\"",
        ] {
            assert_eq!(
                lex_tokens(source),
                vec![
                    Token::Ident,
                    Token::Eq,
                    Token::StrLit,
                    Token::Plus,
                    Token::StrLit,
                    Token::Plus,
                    Token::StrLit,
                    Token::Plus,
                    Token::StrLit,
                    Token::Eop,
                ]
            );
        }
        assert_eq!(
            lex_tokens("br'abc' + bR'abc' + Br'abc' + BR'abc'"),
            vec![
                Token::StrLit,
                Token::Plus,
                Token::StrLit,
                Token::Plus,
                Token::StrLit,
                Token::Plus,
                Token::StrLit,
                Token::Eop,
            ]
        );
        assert_eq!(
            lex_tokens("u'abc' + U\"abc\" + f'{x}' + rb'' + Fr\"\""),
            vec![
                Token::StrLit,
                Token::Plus,
                Token::StrLit,
                Token::Plus,
                Token::StrLit,
                Token::Plus,
                Token::StrLit,
                Token::Plus,
                Token::StrLit,
                Token::Eop,
            ]
        );
    }

    #[test]
    fn lex_prefix_letters_without_quote_are_identifiers() {
        assert_eq!(
            lex_tokens("rb + u"),
            vec![Token::Ident, Token::Plus, Token::Ident, Token::Eop]
        );
    }

    #[test]
    fn lex_triple_quoted_strings() {
        for source in [
            "\n\"\"\" triple-quoted string \"\"\"\n",
            "\n\"\"\" triple-quoted \"a\" string \"\"\"\n",
            "\n\"\"\" triple-quoted \"\" string \"\"\"\n",
            "\n\"\"\" triple-quoted \"\" \" string \"\"\"\n",
            "\n\"\"\" triple-quoted \" \"\" string \"\"\"\n",
            "\n\"\"\" triple-quoted\"string \"\"\"\n",
            "\n\"\"\" triple-quoted \"aa\" string \"\"\"\n",
            "\n\" regular \\\"a\\\" string \"\n",
        ] {
            assert_eq!(
                lex_tokens(source),
                vec![Token::StrLit, Token::Newline, Token::Eop],
                "{source:?}"
            );
        }
    }

    #[test]
    fn lex_quote_after_triple_quoted_string() {
        assert_eq!(
            lex_tokens("\n\"\"\" triple-quoted \"aa\" string \"\"\"\"\n"),
            vec![Token::StrLit, Token::StrLit, Token::Eop]
        );
        assert_eq!(
            diagnostics("\n\"\"\" triple-quoted \"aa\" string \"\"\"\"\n"),
            vec![DiagnosticKind::UnterminatedLiteral]
        );
        assert_eq!(
            lex_tokens("\n\"\"\" triple-quoted \"aa\" string \"\"\"\"a\"\n"),
            vec![Token::StrLit, Token::StrLit, Token::Newline, Token::Eop]
        );
        assert_eq!(
            lex_tokens("\n\"\"\" triple-quoted \"aa\" string \"\"\"'other'\n"),
            vec![Token::StrLit, Token::StrLit, Token::Newline, Token::Eop]
        );
    }

    #[test]
    fn lex_unterminated_triple_quoted_string_runs_to_end() {
        assert_eq!(
            lex_tokens("x = '''abc\n\ndef"),
            vec![Token::Ident, Token::Eq, Token::StrLit, Token::Eop]
        );
        assert_eq!(
            diagnostics("x = '''abc\n\ndef"),
            vec![DiagnosticKind::UnterminatedLiteral]
        );
    }

    #[test]
    fn lex_unterminated_string_resumes_on_next_line() {
        assert_eq!(
            lex_tokens("x = 'abc\ny = 1\n"),
            vec![
                Token::Ident,
                Token::Eq,
                Token::StrLit,
                Token::Ident,
                Token::Eq,
                Token::IntLit,
                Token::Newline,
                Token::Eop,
            ]
        );
    }

    // ========================================================================
    // Comments
    // ========================================================================

    #[test]
    fn lex_retained_comments() {
        assert_eq!(
            lex_with_comments("\n# a comment\nif a:\n    # another comment\n    print a\n"),
            vec![
                Token::Comment,
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Comment,
                Token::Indent,
                Token::Print,
                Token::Ident,
                Token::Newline,
                Token::Dedent,
                Token::Eop,
            ]
        );
        assert_eq!(
            lex_with_comments("\nif a:\n    # comment\n    # again\n    print a\n"),
            vec![
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Newline,
                Token::Comment,
                Token::Comment,
                Token::Indent,
                Token::Print,
                Token::Ident,
                Token::Newline,
                Token::Dedent,
                Token::Eop,
            ]
        );
        assert_eq!(
            lex_with_comments("\nif a: # comment\n"),
            vec![
                Token::If,
                Token::Ident,
                Token::Colon,
                Token::Comment,
                Token::Newline,
                Token::Eop
            ]
        );
    }

    #[test]
    fn retained_comment_text_is_recorded() {
        let mut context = ParsingContext::new();
        context.set_allow_comments(true);
        lex_all(PyLexer::new("x # note\n"), &mut context);
        assert_eq!(
            context.fetch_lexeme(LineCol::new(0, 2)),
            Some(&Lexeme::Comment("# note".into()))
        );
    }

    // ========================================================================
    // Locations and lexemes
    // ========================================================================

    #[test]
    fn lex_locations() {
        let source = "\nimport abc\nimport xyz.mnop\n\n\nimport fancy   .     stuff\n\ndef foobar( ):\n    cool_name = \"foo bar\"\n    id        = 1\n    if alright:\n        print 1234\n\nif __name__ == '__main__'\n    run(  arg1   ,arg2   )\n";
        assert_eq!(
            lex_locs(source),
            vec![
                loc(1, 0, 1, 6),
                loc(1, 7, 1, 10),
                loc(2, 0, 2, 6),
                loc(2, 7, 2, 10),
                loc(2, 10, 2, 11),
                loc(2, 11, 2, 15),
                loc(5, 0, 5, 6),
                loc(5, 7, 5, 12),
                loc(5, 15, 5, 16),
                loc(5, 21, 5, 26),
                loc(7, 0, 7, 3),
                loc(7, 4, 7, 10),
                loc(7, 10, 7, 11),
                loc(7, 12, 7, 13),
                loc(7, 13, 7, 14),
                loc(8, 4, 8, 13),
                loc(8, 14, 8, 15),
                loc(8, 16, 8, 25),
                loc(9, 4, 9, 6),
                loc(9, 14, 9, 15),
                loc(9, 16, 9, 17),
                loc(10, 4, 10, 6),
                loc(10, 7, 10, 14),
                loc(10, 14, 10, 15),
                loc(11, 8, 11, 13),
                loc(11, 14, 11, 18),
                loc(13, 0, 13, 2),
                loc(13, 3, 13, 11),
                loc(13, 12, 13, 14),
                loc(13, 15, 13, 25),
                loc(14, 4, 14, 7),
                loc(14, 7, 14, 8),
                loc(14, 10, 14, 14),
                loc(14, 17, 14, 18),
                loc(14, 18, 14, 22),
                loc(14, 25, 14, 26),
            ]
        );
    }

    #[test]
    fn lex_locations_skip_comments_and_continuations() {
        let source = "\nimport abc\n\n# a comment\n# and another\n\n\ndef foobar( ):\n    if alright:\n        print 1234\n    print 1234\n";
        let locs = lex_locs(source);
        assert_eq!(&locs[..3], &[loc(1, 0, 1, 6), loc(1, 7, 1, 10), loc(7, 0, 7, 3)]);
        assert_eq!(locs.last(), Some(&loc(10, 10, 10, 14)));

        let source = "\nprint 1\n\nfrom a import \\\n     b, \\\n     c, \\\n     d\n\nprint 2\n";
        assert_eq!(
            lex_locs(source),
            vec![
                loc(1, 0, 1, 5),
                loc(1, 6, 1, 7),
                loc(3, 0, 3, 4),
                loc(3, 5, 3, 6),
                loc(3, 7, 3, 13),
                loc(4, 5, 4, 6),
                loc(4, 6, 4, 7),
                loc(5, 5, 5, 6),
                loc(5, 6, 5, 7),
                loc(6, 5, 6, 6),
                loc(8, 0, 8, 5),
                loc(8, 6, 8, 7),
            ]
        );
    }

    #[test]
    fn lex_multi_line_string_locations() {
        let source = "\n\"\"\" a string that goes accross\na few\nlines and eventually ends \"\"\"\n\nif abc:\n    if xyz:\n        print 1234\n";
        let locs = lex_locs(source);
        assert_eq!(locs[0], loc(1, 0, 3, 29));
        assert_eq!(locs[1], loc(5, 0, 5, 2));

        let source = "\n__abc__ = \"\"\" triple-quoted \"a\" string \"\"\"\n";
        assert_eq!(
            lex_locs(source),
            vec![loc(1, 0, 1, 7), loc(1, 8, 1, 9), loc(1, 10, 1, 42)]
        );

        let source = "\n__abc__ = \"\"\" triple-quoted \"a\" string\n\nbla bla bla\nbla bla bla\n\"\"\"\n";
        assert_eq!(
            lex_locs(source),
            vec![loc(1, 0, 1, 7), loc(1, 8, 1, 9), loc(1, 10, 5, 3)]
        );
    }

    #[test]
    fn lexemes_are_recorded_by_position() {
        let mut context = ParsingContext::new();
        lex_all(PyLexer::new("import xyz.mnop\nx = 0xff + 'a'\n"), &mut context);
        let lexeme = |line, col| context.fetch_lexeme(LineCol::new(line, col)).cloned();
        assert_eq!(lexeme(0, 7), Some(Lexeme::Ident("xyz".into())));
        assert_eq!(lexeme(0, 11), Some(Lexeme::Ident("mnop".into())));
        assert_eq!(lexeme(1, 4), Some(Lexeme::IntLit("0xff".into())));
        assert_eq!(lexeme(1, 11), Some(Lexeme::StrLit("'a'".into())));
        assert_eq!(lexeme(0, 0), None);
    }

    #[test]
    fn lex_is_repeatable_after_end() {
        let mut context = ParsingContext::new();
        let mut lexer = PyLexer::new("x");
        assert_eq!(lexer.lex(&mut context), Token::Ident);
        assert_eq!(lexer.lex(&mut context), Token::Eop);
        assert_eq!(lexer.lex(&mut context), Token::Eop);
    }
}
