// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the Python layout lexer.
//!
//! Arbitrary input must lex to a stream ending in exactly one end-of-input
//! token, with every `indent` matched by a `dedent`.

#![no_main]

use frontkit_core::lang::Lang;
use frontkit_core::source_analysis::{ParsingContext, Token};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let mut context = ParsingContext::new();
        context.set_allow_comments(true);
        let tokens = Lang::Python.lex(source, &mut context);

        assert_eq!(tokens.last().map(|(token, _)| *token), Some(Token::Eop));
        assert_eq!(tokens.iter().filter(|(token, _)| token.is_eop()).count(), 1);

        let mut depth = 0_i64;
        for (token, _) in &tokens {
            match token {
                Token::Indent => depth += 1,
                Token::Dedent => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }
});
