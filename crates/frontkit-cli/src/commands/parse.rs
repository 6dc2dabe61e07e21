// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parse a source file and print its declarations.
//!
//! **DDD Context:** CLI

use camino::Utf8Path;
use frontkit_core::ast::{Decl, Name, Program};
use frontkit_core::lang::Lang;
use frontkit_core::parse_haskell;
use frontkit_core::source_analysis::ParsingContext;
use miette::Result;
use tracing::debug;

use super::{OutputFormat, context_for, read_source, report_diagnostics, resolve_lang};

/// Parses the file at `path` and prints its top-level declarations.
///
/// Text output has one line per declaration; JSON output is the whole tree
/// on a single line. Fails when the lexer or parser reported diagnostics.
pub fn run(path: &Utf8Path, lang: Option<Lang>, format: OutputFormat) -> Result<()> {
    let source = read_source(path)?;
    let lang = resolve_lang(path, lang)?;
    if !lang.has_grammar() {
        miette::bail!("No grammar for {lang} sources: use `frontkit lex` instead");
    }

    let mut context = context_for(path, false);
    let program = parse_haskell(&source, &mut context);
    debug!(
        %path,
        decls = program.as_ref().map_or(0, |p| p.decls.len()),
        "parsed"
    );

    match format {
        OutputFormat::Text => {
            if let Some(program) = &program {
                for line in outline(program, &context) {
                    println!("{line}");
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "file": path.as_str(),
                "program": program,
            });
            println!("{json}");
        }
    }

    report_diagnostics(path, &source, context.diagnostics(), format)
}

/// One `loc\tkind[\tname]` line per top-level declaration.
fn outline(program: &Program, context: &ParsingContext) -> Vec<String> {
    program
        .decls
        .iter()
        .map(|decl| {
            let (kind, names) = describe(decl);
            let spelled = names
                .iter()
                .filter_map(|name| context.spell(name))
                .collect::<Vec<_>>()
                .join(", ");
            if spelled.is_empty() {
                format!("{}\t{kind}", decl.loc())
            } else {
                format!("{}\t{kind}\t{spelled}", decl.loc())
            }
        })
        .collect()
}

fn describe(decl: &Decl) -> (&'static str, Vec<&Name>) {
    match decl {
        Decl::Module(module) => ("module", vec![&module.name]),
        Decl::Import(import) => ("import", vec![&import.module]),
        Decl::TypeSig(sig) => ("signature", sig.names.iter().collect()),
        Decl::Fixity(fixity) => ("fixity", fixity.operators.iter().collect()),
        Decl::Function(function) => ("function", vec![&function.name]),
        Decl::PatternBinding(_) => ("pattern binding", Vec::new()),
        Decl::Unsupported { keyword, .. } => (keyword.name(), Vec::new()),
        Decl::Empty { .. } => ("empty", Vec::new()),
        Decl::Error { .. } => ("error", Vec::new()),
    }
}
