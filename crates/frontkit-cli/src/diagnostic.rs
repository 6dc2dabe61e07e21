// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error diagnostics rendered with miette.
//!
//! Converts frontkit-core diagnostics into miette-formatted errors with:
//! - Source code context around the offending location
//! - A label pointing at the location
//! - The diagnostic's stable code

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use frontkit_core::source_analysis::{Diagnostic as CoreDiagnostic, DiagnosticKind};
use miette::{Diagnostic, SourceSpan};

/// A front-end diagnostic with rich formatting.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(frontkit::diagnostic))]
pub struct CompileDiagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Human-readable error message
    pub message: String,
    /// Source code for context
    #[source_code]
    pub src: miette::NamedSource<String>,
    /// Location of the error
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the error span (interpolated by miette derive macro)
    pub label: String,
}

impl CompileDiagnostic {
    /// Create a new diagnostic from a frontkit-core diagnostic.
    pub fn from_core_diagnostic(
        diagnostic: &CoreDiagnostic,
        source_path: &str,
        source: &str,
    ) -> Self {
        let label = if diagnostic.kind.is_lexical() {
            "while reading this"
        } else {
            "not expected here"
        };

        Self {
            kind: diagnostic.kind,
            message: format!("{} [{}]", diagnostic.kind, diagnostic.kind.code()),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: diagnostic.loc.to_source_span(source),
            label: label.to_string(),
        }
    }
}
