// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Print the token stream of a source file.
//!
//! **DDD Context:** CLI

use camino::Utf8Path;
use frontkit_core::lang::Lang;
use frontkit_core::source_analysis::{ParsingContext, SourceLoc, Token};
use miette::Result;
use tracing::debug;

use super::{OutputFormat, context_for, read_source, report_diagnostics, resolve_lang};

/// Lexes the file at `path` and prints one token per line.
///
/// Fails when the lexer reported diagnostics; the tokens are printed first.
pub fn run(
    path: &Utf8Path,
    lang: Option<Lang>,
    keep_comments: bool,
    format: OutputFormat,
) -> Result<()> {
    let source = read_source(path)?;
    let lang = resolve_lang(path, lang)?;
    let mut context = context_for(path, keep_comments);

    let tokens = lang.lex(&source, &mut context);
    debug!(%path, count = tokens.len(), "lexed");

    for &(token, loc) in &tokens {
        println!("{}", render_token(token, loc, &context, format));
    }

    report_diagnostics(path, &source, context.diagnostics(), format)
}

/// The recorded spelling of the token at `loc`.
///
/// Virtual layout tokens share their start with the token that triggered
/// them, so zero-width tokens have no text.
fn token_text(loc: SourceLoc, context: &ParsingContext) -> Option<&str> {
    if loc.is_zero_width() {
        return None;
    }
    context.fetch_lexeme(loc.start()).map(|lexeme| lexeme.as_str())
}

fn render_token(
    token: Token,
    loc: SourceLoc,
    context: &ParsingContext,
    format: OutputFormat,
) -> String {
    let text = token_text(loc, context);
    match format {
        OutputFormat::Text => match text {
            Some(text) => format!("{loc}\t{token}\t{text}"),
            None => format!("{loc}\t{token}"),
        },
        OutputFormat::Json => serde_json::json!({
            "token": token,
            "start": loc.start(),
            "end": loc.end(),
            "text": text,
        })
        .to_string(),
    }
}
