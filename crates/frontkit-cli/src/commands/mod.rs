// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Subcommands of the `frontkit` binary, and what they share: reading a
//! source file, choosing its language and reporting diagnostics.

pub mod lex;
pub mod parse;

use camino::Utf8Path;
use frontkit_core::lang::Lang;
use frontkit_core::source_analysis::{Diagnostic, ParsingContext};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::diagnostic::CompileDiagnostic;

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output via miette (default).
    #[default]
    Text,
    /// Machine-readable JSON (one object per line).
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{other}': expected 'text' or 'json'"
            )),
        }
    }
}

/// Reads the source file at `path`.
fn read_source(path: &Utf8Path) -> Result<String> {
    if !path.is_file() {
        miette::bail!("File '{path}' does not exist");
    }
    let source = std::fs::read_to_string(path)
        .into_diagnostic()
        .map_err(|e| miette::miette!("Failed to read '{path}': {e}"))?;
    info!(%path, bytes = source.len(), "read source file");
    Ok(source)
}

/// Picks the explicit language, or the one the file suffix names.
fn resolve_lang(path: &Utf8Path, explicit: Option<Lang>) -> Result<Lang> {
    match explicit.or_else(|| Lang::from_path(path)) {
        Some(lang) => {
            debug!(%path, %lang, "selected language");
            Ok(lang)
        }
        None => miette::bail!(
            "Cannot tell the language of '{path}': use a .py or .hs suffix, or pass --lang"
        ),
    }
}

/// Creates the context a file is lexed and parsed with.
fn context_for(path: &Utf8Path, keep_comments: bool) -> ParsingContext {
    let mut context = ParsingContext::for_file(path);
    context.set_allow_comments(keep_comments);
    context
}

/// Prints every diagnostic and fails if there were any.
fn report_diagnostics(
    path: &Utf8Path,
    source: &str,
    diagnostics: &[Diagnostic],
    format: OutputFormat,
) -> Result<()> {
    for diagnostic in diagnostics {
        match format {
            OutputFormat::Text => {
                let compile_diag =
                    CompileDiagnostic::from_core_diagnostic(diagnostic, path.as_str(), source);
                eprintln!("{:?}", miette::Report::new(compile_diag));
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "file": path.as_str(),
                    "diagnostic": diagnostic.kind,
                    "code": diagnostic.kind.code(),
                    "message": diagnostic.kind.to_string(),
                    "start": diagnostic.loc.start(),
                    "end": diagnostic.loc.end(),
                });
                println!("{json}");
            }
        }
    }

    if !diagnostics.is_empty() {
        let count = diagnostics.len();
        let plural = if count == 1 { "" } else { "s" };
        miette::bail!("{count} diagnostic{plural} reported for '{path}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn output_format_parses() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(
            "xml".parse::<OutputFormat>(),
            Err("unknown format 'xml': expected 'text' or 'json'".to_string())
        );
    }

    #[test]
    fn language_comes_from_flag_or_suffix() {
        let path = Utf8Path::new("lib/Main.hs");
        assert_eq!(resolve_lang(path, None).unwrap(), Lang::Haskell);
        assert_eq!(
            resolve_lang(path, Some(Lang::Python)).unwrap(),
            Lang::Python
        );
        assert!(resolve_lang(Utf8Path::new("notes.txt"), None).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("absent.py")).unwrap();
        let error = read_source(&path).unwrap_err();
        assert!(error.to_string().contains("does not exist"));
    }

    #[test]
    fn diagnostics_fail_the_command() {
        let path = Utf8Path::new("x.py");
        assert!(report_diagnostics(path, "", &[], OutputFormat::Json).is_ok());

        let mut context = context_for(path, false);
        let _ = Lang::Python.lex("s = 'open\n", &mut context);
        let error =
            report_diagnostics(path, "s = 'open\n", context.diagnostics(), OutputFormat::Json)
                .unwrap_err();
        assert_eq!(error.to_string(), "1 diagnostic reported for 'x.py'");
    }
}
