// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token kinds shared by every lexer.
//!
//! A [`Token`] is a bare kind: it carries no text and no location. Lexers
//! report the location of the token they just produced separately, and the
//! text of identifiers and literals lives in the
//! [`LexemeTable`](super::LexemeTable), keyed by the token's start position.
//!
//! The enumeration is closed and covers every supported language, so a
//! single parser engine can drive any lexer.

use std::fmt;

use serde::Serialize;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Token {
    // === Special ===
    /// End of program. Lexers keep returning it once input is exhausted.
    Eop,
    /// A character sequence no rule of the language accepts.
    Invalid,
    /// A comment, only produced when the context retains comments.
    Comment,

    // === Layout ===
    /// End of a logical line.
    Newline,
    /// Indentation increased.
    Indent,
    /// Indentation decreased by one level.
    Dedent,

    // === Names ===
    /// An identifier: `foo`, `_private`, `x'`
    Ident,
    /// An identifier starting with an uppercase letter: `Just`, `Data`
    ProperIdent,
    /// An operator symbol: `+`, `>>=`, `<$>`
    VarSym,
    /// A constructor operator symbol: `:+`, `:|`
    ConSym,

    // === Literals ===
    /// An integer literal: `42`, `0xff`, `1L`
    IntLit,
    /// A floating-point literal: `3.14`, `.5`, `1e10`, `2j`
    FloatLit,
    /// A string literal, quotes and prefixes included: `"hi"`, `r'\d'`
    StrLit,
    /// A character literal: `'a'`
    CharLit,

    // === Delimiters ===
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    // === Punctuation ===
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `:=`
    ColonEq,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `..`
    DotDot,
    /// `...`
    Ellipsis,
    /// `@`
    At,
    /// `` ` ``
    Backtick,
    /// `\`
    Backslash,
    /// `_` on its own
    Underscore,
    /// `->`
    Arrow,
    /// `<-`
    LArrow,
    /// `=>`
    DArrow,
    /// `=`
    Eq,

    // === Operators ===
    /// `==`
    EqEq,
    /// `!=` (also `<>`)
    ExclamEq,
    /// `<`
    Ls,
    /// `<=`
    LsEq,
    /// `>`
    Gr,
    /// `>=`
    GrEq,
    /// `+`
    Plus,
    /// `+=`
    PlusEq,
    /// `-`
    Minus,
    /// `-=`
    MinusEq,
    /// `*`
    Star,
    /// `*=`
    StarEq,
    /// `**`
    StarStar,
    /// `**=`
    StarStarEq,
    /// `/`
    Slash,
    /// `/=`
    SlashEq,
    /// `//`
    SlashSlash,
    /// `//=`
    SlashSlashEq,
    /// `%`
    Percent,
    /// `%=`
    PercentEq,
    /// `&`
    Amper,
    /// `&=`
    AmperEq,
    /// `|`
    Pipe,
    /// `|=`
    PipeEq,
    /// `^`
    Caret,
    /// `^=`
    CaretEq,
    /// `~`
    Tilde,
    /// `<<`
    LsLs,
    /// `<<=`
    LsLsEq,
    /// `>>`
    GrGr,
    /// `>>=`
    GrGrEq,
    /// `@=`
    AtEq,

    // === Python keywords ===
    And,
    As,
    Assert,
    Break,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    Exec,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    Nonlocal,
    Not,
    Or,
    Pass,
    Print,
    Raise,
    Return,
    Try,
    While,
    With,
    Yield,
    /// `True`
    TrueValue,
    /// `False`
    FalseValue,
    /// `None`
    NoneValue,

    // === Haskell keywords ===
    Case,
    Data,
    Default,
    Deriving,
    Do,
    Foreign,
    Infix,
    Infixl,
    Infixr,
    Instance,
    Let,
    Module,
    Newtype,
    Of,
    Then,
    Type,
    Where,
}

impl Token {
    /// Returns the display name of this token kind.
    ///
    /// Fixed-text tokens render as their text; the others as a short
    /// description.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eop => "end of input",
            Self::Invalid => "invalid token",
            Self::Comment => "comment",
            Self::Newline => "newline",
            Self::Indent => "indent",
            Self::Dedent => "dedent",
            Self::Ident => "identifier",
            Self::ProperIdent => "proper identifier",
            Self::VarSym => "operator",
            Self::ConSym => "constructor operator",
            Self::IntLit => "integer literal",
            Self::FloatLit => "floating-point literal",
            Self::StrLit => "string literal",
            Self::CharLit => "character literal",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::ColonColon => "::",
            Self::ColonEq => ":=",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::DotDot => "..",
            Self::Ellipsis => "...",
            Self::At => "@",
            Self::Backtick => "`",
            Self::Backslash => "\\",
            Self::Underscore => "_",
            Self::Arrow => "->",
            Self::LArrow => "<-",
            Self::DArrow => "=>",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::ExclamEq => "!=",
            Self::Ls => "<",
            Self::LsEq => "<=",
            Self::Gr => ">",
            Self::GrEq => ">=",
            Self::Plus => "+",
            Self::PlusEq => "+=",
            Self::Minus => "-",
            Self::MinusEq => "-=",
            Self::Star => "*",
            Self::StarEq => "*=",
            Self::StarStar => "**",
            Self::StarStarEq => "**=",
            Self::Slash => "/",
            Self::SlashEq => "/=",
            Self::SlashSlash => "//",
            Self::SlashSlashEq => "//=",
            Self::Percent => "%",
            Self::PercentEq => "%=",
            Self::Amper => "&",
            Self::AmperEq => "&=",
            Self::Pipe => "|",
            Self::PipeEq => "|=",
            Self::Caret => "^",
            Self::CaretEq => "^=",
            Self::Tilde => "~",
            Self::LsLs => "<<",
            Self::LsLsEq => "<<=",
            Self::GrGr => ">>",
            Self::GrGrEq => ">>=",
            Self::AtEq => "@=",
            Self::And => "and",
            Self::As => "as",
            Self::Assert => "assert",
            Self::Break => "break",
            Self::Class => "class",
            Self::Continue => "continue",
            Self::Def => "def",
            Self::Del => "del",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::Except => "except",
            Self::Exec => "exec",
            Self::Finally => "finally",
            Self::For => "for",
            Self::From => "from",
            Self::Global => "global",
            Self::If => "if",
            Self::Import => "import",
            Self::In => "in",
            Self::Is => "is",
            Self::Lambda => "lambda",
            Self::Nonlocal => "nonlocal",
            Self::Not => "not",
            Self::Or => "or",
            Self::Pass => "pass",
            Self::Print => "print",
            Self::Raise => "raise",
            Self::Return => "return",
            Self::Try => "try",
            Self::While => "while",
            Self::With => "with",
            Self::Yield => "yield",
            Self::TrueValue => "True",
            Self::FalseValue => "False",
            Self::NoneValue => "None",
            Self::Case => "case",
            Self::Data => "data",
            Self::Default => "default",
            Self::Deriving => "deriving",
            Self::Do => "do",
            Self::Foreign => "foreign",
            Self::Infix => "infix",
            Self::Infixl => "infixl",
            Self::Infixr => "infixr",
            Self::Instance => "instance",
            Self::Let => "let",
            Self::Module => "module",
            Self::Newtype => "newtype",
            Self::Of => "of",
            Self::Then => "then",
            Self::Type => "type",
            Self::Where => "where",
        }
    }

    /// Returns `true` if this is the end-of-program marker.
    #[must_use]
    pub const fn is_eop(self) -> bool {
        matches!(self, Self::Eop)
    }

    /// Returns `true` for literal values.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntLit | Self::FloatLit | Self::StrLit | Self::CharLit
        )
    }

    /// Returns `true` for tokens synthesized from indentation.
    #[must_use]
    pub const fn is_layout(self) -> bool {
        matches!(self, Self::Newline | Self::Indent | Self::Dedent)
    }

    /// Returns `true` for tokens usable as a variable operator.
    ///
    /// `-` and `.` get their own kinds because they also play other roles
    /// (negation, name qualification), but both are operators too.
    #[must_use]
    pub const fn is_var_sym(self) -> bool {
        matches!(self, Self::VarSym | Self::Minus | Self::Dot)
    }

    /// Returns `true` for tokens usable as a constructor operator.
    #[must_use]
    pub const fn is_con_sym(self) -> bool {
        matches!(self, Self::ConSym | Self::Colon)
    }

    /// Returns `true` for opening brackets.
    #[must_use]
    pub const fn is_open_bracket(self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }

    /// Returns `true` for closing brackets.
    #[must_use]
    pub const fn is_close_bracket(self) -> bool {
        matches!(self, Self::RParen | Self::RBracket | Self::RBrace)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
