// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for Haskell parser crash safety.
//!
//! Arbitrary input must never panic the Haskell lexer or parser, however
//! deeply it nests or however badly its layout is broken.

#![no_main]

use frontkit_core::parse_haskell;
use frontkit_core::source_analysis::ParsingContext;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The lexers take `&str`; invalid UTF-8 is rejected before lexing.
    if let Ok(source) = std::str::from_utf8(data) {
        let mut context = ParsingContext::new();
        let _program = parse_haskell(source, &mut context);
    }
});
