// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Frontkit command-line interface.
//!
//! This is the main entry point for the `frontkit` command: it lexes or
//! parses a single source file and reports what the front end saw.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use frontkit_core::lang::Lang;
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod diagnostic;

use commands::OutputFormat;

/// Frontkit: layout-aware lexers and a recovering parser
#[derive(Debug, Parser)]
#[command(name = "frontkit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the token stream of a source file
    Lex {
        /// Source file to lex
        path: Utf8PathBuf,

        /// Source language (default: from the file suffix)
        #[arg(long)]
        lang: Option<Lang>,

        /// Keep comments in the token stream
        #[arg(long, env = "FRONTKIT_KEEP_COMMENTS")]
        keep_comments: bool,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse a source file and print its declarations
    Parse {
        /// Source file to parse
        path: Utf8PathBuf,

        /// Source language (default: from the file suffix)
        #[arg(long)]
        lang: Option<Lang>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Lex {
            path,
            lang,
            keep_comments,
            format,
        } => commands::lex::run(&path, lang, keep_comments, format),
        Command::Parse { path, lang, format } => commands::parse::run(&path, lang, format),
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    // Targets are crate module paths, so the core library needs its own entry.
    match v {
        0 => "frontkit=warn,frontkit_core=warn",
        1 => "frontkit=debug,frontkit_core=debug",
        _ => "frontkit=trace,frontkit_core=trace",
    }
}
