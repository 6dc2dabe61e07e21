// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract syntax tree produced by the grammars.
//!
//! **DDD Context:** Source Analysis
//!
//! Nodes come in three capability families: declarations ([`Decl`]),
//! expressions ([`Expr`], which doubles as the pattern representation) and
//! names ([`Name`]). Each family is a closed enum with an `Error` variant, so
//! a parse method can always return a node: on malformed input it returns
//! the `Error` variant carrying the location of the offending token.
//!
//! Names and literals carry no text. Their spelling lives in the
//! [`LexemeTable`](crate::source_analysis::LexemeTable) and is looked up
//! through [`ParsingContext::spell`](crate::source_analysis::ParsingContext::spell)
//! or the node's location.
//!
//! # Example
//!
//! ```
//! use frontkit_core::ast::Decl;
//! use frontkit_core::parse_haskell;
//! use frontkit_core::source_analysis::ParsingContext;
//!
//! let mut context = ParsingContext::new();
//! let program = parse_haskell("module Main where\nmain = print 42\n", &mut context)
//!     .expect("non-empty input produces a program");
//! assert!(context.diagnostics().is_empty());
//! assert!(matches!(program.decls[0], Decl::Module(_)));
//! assert!(matches!(program.decls[1], Decl::Function(_)));
//! ```

use serde::Serialize;

use crate::source_analysis::{SourceLoc, Token};

// ============================================================================
// Program
// ============================================================================

/// The root of a parsed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    /// Top-level declarations in source order, module header and imports
    /// included.
    pub decls: Vec<Decl>,
    /// Span of the whole program.
    pub loc: SourceLoc,
}

impl Program {
    /// Returns the module header, if the file has one.
    #[must_use]
    pub fn module(&self) -> Option<&ModuleDecl> {
        self.decls.iter().find_map(|decl| match decl {
            Decl::Module(module) => Some(module),
            _ => None,
        })
    }

    /// Returns the import declarations in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Import(import) => Some(import),
            _ => None,
        })
    }
}

// ============================================================================
// Names
// ============================================================================

/// A reference to a variable, constructor, module or operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Name {
    /// A plain identifier: `map`, `Just`.
    Simple {
        /// Location of the identifier.
        loc: SourceLoc,
    },
    /// A qualified name: `Data.Map.insert`.
    Nested {
        /// The qualifier segments followed by the final name.
        names: Vec<Name>,
        /// Span of the whole name.
        loc: SourceLoc,
    },
    /// A variable operator: `+`, `>>=`.
    Punc {
        /// Location of the operator symbol.
        loc: SourceLoc,
    },
    /// A constructor operator or special constructor syntax: `:`, `:+`, `(,)`.
    Special {
        /// Location of the symbol.
        loc: SourceLoc,
    },
    /// A name that could not be parsed.
    Error {
        /// Location of the offending token.
        loc: SourceLoc,
    },
}

impl Name {
    /// Builds a name from its qualifier segments and final name.
    ///
    /// A single segment is returned as is.
    #[must_use]
    pub fn from_segments(mut segments: Vec<Self>) -> Self {
        if segments.len() == 1 {
            if let Some(name) = segments.pop() {
                return name;
            }
        }
        let loc = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => first.loc().join(last.loc()),
            _ => SourceLoc::EMPTY,
        };
        Self::Nested {
            names: segments,
            loc,
        }
    }

    /// Returns the source location of this name.
    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::Simple { loc }
            | Self::Nested { loc, .. }
            | Self::Punc { loc }
            | Self::Special { loc }
            | Self::Error { loc } => *loc,
        }
    }

    /// Returns `true` for error names.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Decl {
    /// `module M (exports) where`
    Module(ModuleDecl),
    /// `import qualified M as N hiding (x)`
    Import(ImportDecl),
    /// `f, g :: Int -> Int`
    TypeSig(TypeSigDecl),
    /// `infixl 6 +, -`
    Fixity(FixityDecl),
    /// A function clause or variable binding: `f x | x > 0 = x`
    Function(FunctionDecl),
    /// A pattern binding: `(a, b) = pair`
    PatternBinding(PatternBindingDecl),
    /// A declaration form the grammar recognises but does not model
    /// (`data`, `class`, `instance`, ...). Its tokens are skipped.
    Unsupported {
        /// The keyword that introduced the declaration.
        keyword: Token,
        /// Span of the skipped declaration.
        loc: SourceLoc,
    },
    /// An empty declaration (a stray `;`).
    Empty {
        /// Location of the separator.
        loc: SourceLoc,
    },
    /// A declaration that could not be parsed.
    Error {
        /// Location of the offending token.
        loc: SourceLoc,
    },
}

impl Decl {
    /// Returns the source location of this declaration.
    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::Module(decl) => decl.loc,
            Self::Import(decl) => decl.loc,
            Self::TypeSig(decl) => decl.loc,
            Self::Fixity(decl) => decl.loc,
            Self::Function(decl) => decl.loc,
            Self::PatternBinding(decl) => decl.loc,
            Self::Unsupported { loc, .. } | Self::Empty { loc } | Self::Error { loc } => *loc,
        }
    }
}

/// The module header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDecl {
    /// The module name.
    pub name: Name,
    /// The export list, if present.
    pub exports: Option<SelectionList>,
    /// Span of the header, `where` included.
    pub loc: SourceLoc,
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportDecl {
    /// `true` for `import qualified`.
    pub qualified: bool,
    /// The imported module.
    pub module: Name,
    /// The `as` alias.
    pub alias: Option<Name>,
    /// `true` when the selection list names what to hide.
    pub hiding: bool,
    /// The parenthesised import list.
    pub selections: Option<SelectionList>,
    /// Span of the whole declaration.
    pub loc: SourceLoc,
}

/// A parenthesised export or import list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionList {
    /// The listed entities.
    pub selections: Vec<Selection>,
    /// Span from `(` to `)`.
    pub loc: SourceLoc,
}

/// One entry of an export or import list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Selection {
    /// `module M`, only meaningful in export lists.
    Module {
        /// The re-exported module.
        name: Name,
        /// Span of the entry.
        loc: SourceLoc,
    },
    /// A variable, operator, type or class, with optional members.
    Item {
        /// The selected entity.
        name: Name,
        /// Constructors, fields or methods selected with it.
        members: Members,
        /// Span of the entry.
        loc: SourceLoc,
    },
}

impl Selection {
    /// Returns the selected name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        match self {
            Self::Module { name, .. } | Self::Item { name, .. } => name,
        }
    }
}

/// The member list following a type or class in a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Members {
    /// No member list.
    Absent,
    /// `T(..)`
    All {
        /// Location of `..`.
        loc: SourceLoc,
    },
    /// `T(A, b)`
    Listed {
        /// The listed members.
        names: Vec<Name>,
        /// Span of the parenthesised list.
        loc: SourceLoc,
    },
}

/// A type signature shared by one or more names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSigDecl {
    /// The declared names.
    pub names: Vec<Name>,
    /// The declared type.
    pub ty: Type,
    /// Span of the signature.
    pub loc: SourceLoc,
}

/// Operator associativity in a fixity declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Associativity {
    /// `infixl`
    Left,
    /// `infixr`
    Right,
    /// `infix`
    None,
}

/// A fixity declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixityDecl {
    /// Declared associativity.
    pub associativity: Associativity,
    /// Declared precedence, when given and in range.
    pub precedence: Option<u8>,
    /// The operators the declaration applies to.
    pub operators: Vec<Name>,
    /// Span of the declaration.
    pub loc: SourceLoc,
}

/// One clause of a function, or a variable binding when it has no parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDecl {
    /// The bound name, an operator for infix definitions.
    pub name: Name,
    /// Parameter patterns.
    pub params: Vec<Expr>,
    /// `true` for infix definitions like ``x `op` y = ...``.
    pub infix: bool,
    /// Right-hand side.
    pub rhs: Rhs,
    /// Span of the clause.
    pub loc: SourceLoc,
}

/// A binding whose left-hand side is a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternBindingDecl {
    /// The bound pattern.
    pub pattern: Expr,
    /// Right-hand side.
    pub rhs: Rhs,
    /// Span of the binding.
    pub loc: SourceLoc,
}

/// The right-hand side of a binding or case alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rhs {
    /// Plain or guarded body.
    pub body: RhsBody,
    /// Declarations of the `where` clause.
    pub where_decls: Vec<Decl>,
    /// Span of the right-hand side.
    pub loc: SourceLoc,
}

/// The body of a right-hand side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RhsBody {
    /// `= e`
    Plain(Expr),
    /// `| g1 = e1 | g2 = e2`
    Guarded(Vec<GuardedExpr>),
}

/// One guarded alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardedExpr {
    /// The guard.
    pub guard: Expr,
    /// The body selected when the guard holds.
    pub body: Expr,
    /// Span from `|` to the end of the body.
    pub loc: SourceLoc,
}

// ============================================================================
// Expressions and patterns
// ============================================================================

/// The kind of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiteralKind {
    /// An integer literal.
    Integer,
    /// A floating-point literal.
    Float,
    /// A character literal.
    Character,
    /// A string literal.
    String,
}

/// An expression, or a pattern: both share one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    /// A literal; its text lives in the lexeme table.
    Literal {
        /// What kind of literal.
        kind: LiteralKind,
        /// Location of the literal.
        loc: SourceLoc,
    },
    /// A variable or constructor reference.
    Identifier(Name),
    /// `_`
    Wildcard {
        /// Location of `_`.
        loc: SourceLoc,
    },
    /// Function or constructor application: `f x y`, `Just x`.
    Application {
        /// The applied function.
        function: Box<Expr>,
        /// The arguments.
        arguments: Vec<Expr>,
        /// Span of the application.
        loc: SourceLoc,
    },
    /// An infix operator application: `a + b`, `x : xs`.
    Infix {
        /// Left operand.
        left: Box<Expr>,
        /// The operator.
        operator: Name,
        /// Right operand.
        right: Box<Expr>,
        /// Span of the application.
        loc: SourceLoc,
    },
    /// Prefix negation, also used for negative literal patterns.
    Negation {
        /// The negated operand.
        operand: Box<Expr>,
        /// Span from `-` to the end of the operand.
        loc: SourceLoc,
    },
    /// `(a, b)`
    Tuple {
        /// The components.
        elements: Vec<Expr>,
        /// Span of the tuple.
        loc: SourceLoc,
    },
    /// `[a, b]`, `[]`
    List {
        /// The elements.
        elements: Vec<Expr>,
        /// Span of the list.
        loc: SourceLoc,
    },
    /// `()`
    Unit {
        /// Span of `()`.
        loc: SourceLoc,
    },
    /// `(e)`
    Parenthesized {
        /// The wrapped expression.
        inner: Box<Expr>,
        /// Span including the parentheses.
        loc: SourceLoc,
    },
    /// `(x +)`
    LeftSection {
        /// The supplied left operand.
        operand: Box<Expr>,
        /// The operator.
        operator: Name,
        /// Span including the parentheses.
        loc: SourceLoc,
    },
    /// `(+ 1)`
    RightSection {
        /// The operator.
        operator: Name,
        /// The supplied right operand.
        operand: Box<Expr>,
        /// Span including the parentheses.
        loc: SourceLoc,
    },
    /// `name@pattern`
    AsPattern {
        /// The bound name.
        name: Name,
        /// The pattern it names.
        pattern: Box<Expr>,
        /// Span of the pattern.
        loc: SourceLoc,
    },
    /// `~pattern`
    Lazy {
        /// The irrefutable pattern.
        pattern: Box<Expr>,
        /// Span including `~`.
        loc: SourceLoc,
    },
    /// `\x y -> body`
    Lambda {
        /// Parameter patterns.
        params: Vec<Expr>,
        /// The body.
        body: Box<Expr>,
        /// Span of the lambda.
        loc: SourceLoc,
    },
    /// `if c then a else b`
    If {
        /// The condition.
        condition: Box<Expr>,
        /// Value when the condition holds.
        then_branch: Box<Expr>,
        /// Value otherwise.
        else_branch: Box<Expr>,
        /// Span of the expression.
        loc: SourceLoc,
    },
    /// `let decls in body`
    Let {
        /// The local declarations.
        decls: Vec<Decl>,
        /// The body.
        body: Box<Expr>,
        /// Span of the expression.
        loc: SourceLoc,
    },
    /// `case e of alternatives`
    Case {
        /// The inspected expression.
        scrutinee: Box<Expr>,
        /// The alternatives.
        alternatives: Vec<Alternative>,
        /// Span of the expression.
        loc: SourceLoc,
    },
    /// `do statements`
    Do {
        /// The statements.
        statements: Vec<Statement>,
        /// Span of the block.
        loc: SourceLoc,
    },
    /// `[from ..]`, `[from, then .. to]`
    Sequence {
        /// First element.
        from: Box<Expr>,
        /// Second element, fixing the step.
        then: Option<Box<Expr>>,
        /// Upper bound.
        to: Option<Box<Expr>>,
        /// Span including the brackets.
        loc: SourceLoc,
    },
    /// `[e | qualifiers]`
    Comprehension {
        /// The produced element.
        element: Box<Expr>,
        /// Generators, guards and local bindings.
        qualifiers: Vec<Statement>,
        /// Span including the brackets.
        loc: SourceLoc,
    },
    /// `e :: T`
    Annotated {
        /// The annotated expression.
        expr: Box<Expr>,
        /// The annotation.
        ty: Type,
        /// Span of the expression.
        loc: SourceLoc,
    },
    /// An expression or pattern that could not be parsed.
    Error {
        /// Location of the offending token.
        loc: SourceLoc,
    },
}

impl Expr {
    /// Returns the source location of this expression.
    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::Identifier(name) => name.loc(),
            Self::Literal { loc, .. }
            | Self::Wildcard { loc }
            | Self::Application { loc, .. }
            | Self::Infix { loc, .. }
            | Self::Negation { loc, .. }
            | Self::Tuple { loc, .. }
            | Self::List { loc, .. }
            | Self::Unit { loc }
            | Self::Parenthesized { loc, .. }
            | Self::LeftSection { loc, .. }
            | Self::RightSection { loc, .. }
            | Self::AsPattern { loc, .. }
            | Self::Lazy { loc, .. }
            | Self::Lambda { loc, .. }
            | Self::If { loc, .. }
            | Self::Let { loc, .. }
            | Self::Case { loc, .. }
            | Self::Do { loc, .. }
            | Self::Sequence { loc, .. }
            | Self::Comprehension { loc, .. }
            | Self::Annotated { loc, .. }
            | Self::Error { loc } => *loc,
        }
    }

    /// Returns `true` for error nodes.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// One alternative of a `case` expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternative {
    /// The matched pattern.
    pub pattern: Expr,
    /// `-> e` or guarded bodies, with an optional `where`.
    pub rhs: Rhs,
    /// Span of the alternative.
    pub loc: SourceLoc,
}

/// A statement of a `do` block or a list comprehension qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Statement {
    /// `pattern <- expr`
    Bind {
        /// The bound pattern.
        pattern: Expr,
        /// The bound computation.
        expr: Expr,
        /// Span of the statement.
        loc: SourceLoc,
    },
    /// `let decls`
    Let {
        /// The local declarations.
        decls: Vec<Decl>,
        /// Span of the statement.
        loc: SourceLoc,
    },
    /// A bare expression (or guard, in a comprehension).
    Expression(Expr),
}

impl Statement {
    /// Returns the source location of this statement.
    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::Bind { loc, .. } | Self::Let { loc, .. } => *loc,
            Self::Expression(expr) => expr.loc(),
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// A type expression, as used in signatures and annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Type {
    /// A type constructor: `Int`, `Map.Map`, `[]`, `(->)`.
    Constructor(Name),
    /// A type variable: `a`.
    Variable(Name),
    /// `Maybe a`
    Application {
        /// The applied constructor or variable.
        head: Box<Type>,
        /// The arguments.
        arguments: Vec<Type>,
        /// Span of the application.
        loc: SourceLoc,
    },
    /// `a -> b`
    Function {
        /// Argument type.
        parameter: Box<Type>,
        /// Result type.
        result: Box<Type>,
        /// Span of the type.
        loc: SourceLoc,
    },
    /// `[a]`
    List {
        /// Element type.
        element: Box<Type>,
        /// Span including the brackets.
        loc: SourceLoc,
    },
    /// `(a, b)`
    Tuple {
        /// Component types.
        elements: Vec<Type>,
        /// Span including the parentheses.
        loc: SourceLoc,
    },
    /// `()`
    Unit {
        /// Span of `()`.
        loc: SourceLoc,
    },
    /// `Eq a => a -> Bool`
    Qualified {
        /// The class constraint(s).
        context: Box<Type>,
        /// The constrained type.
        body: Box<Type>,
        /// Span of the type.
        loc: SourceLoc,
    },
    /// A type that could not be parsed.
    Error {
        /// Location of the offending token.
        loc: SourceLoc,
    },
}

impl Type {
    /// Returns the source location of this type.
    #[must_use]
    pub fn loc(&self) -> SourceLoc {
        match self {
            Self::Constructor(name) | Self::Variable(name) => name.loc(),
            Self::Application { loc, .. }
            | Self::Function { loc, .. }
            | Self::List { loc, .. }
            | Self::Tuple { loc, .. }
            | Self::Unit { loc }
            | Self::Qualified { loc, .. }
            | Self::Error { loc } => *loc,
        }
    }
}
