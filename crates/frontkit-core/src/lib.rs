// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Frontkit front-end core.
//!
//! This crate contains the language front-end machinery:
//! - Source locations and diagnostics
//! - Layout-sensitive lexing for Python and Haskell
//! - A grammar-independent recursive descent engine with error recovery
//! - A Haskell grammar building the [`ast`] tree
//!
//! Lexers and parsers never fail: malformed input becomes diagnostics in the
//! [`ParsingContext`](source_analysis::ParsingContext) plus a best-effort
//! token stream or tree.
//!
//! ```
//! use camino::Utf8Path;
//! use frontkit_core::lang::Lang;
//! use frontkit_core::source_analysis::ParsingContext;
//!
//! let mut context = ParsingContext::for_file("demo.hs");
//! let lang = Lang::from_path(Utf8Path::new("demo.hs")).expect("known suffix");
//! let program = frontkit_core::parse_haskell("main = pure ()\n", &mut context);
//! assert!(lang.has_grammar());
//! assert_eq!(program.map(|p| p.decls.len()), Some(1));
//! ```

pub mod ast;
pub mod lang;
pub mod source_analysis;

pub use source_analysis::parse_haskell;
