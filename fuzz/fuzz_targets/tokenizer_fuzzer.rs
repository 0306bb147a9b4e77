//! Fuzz target for the command-line tokenizer
//!
//! # Invariants
//!
//! - Never panics on any UTF-8 input
//! - An `Ok` line has no empty tokens
//! - A blank result has no arguments
//! - Re-joining whitespace-free, quote-free tokens with spaces parses back
//!   to the same tokens

#![no_main]

use libfuzzer_sys::fuzz_target;
use shello_core::tokenizer;

fuzz_target!(|line: &str| {
    let Ok(parsed) = tokenizer::parse(line) else {
        return;
    };

    if parsed.is_empty() {
        assert!(parsed.args.is_empty(), "blank line produced arguments");
        return;
    }

    assert!(parsed.args.iter().all(|arg| !arg.is_empty()), "empty token");

    let mut tokens = vec![parsed.command.clone()];
    tokens.extend(parsed.args.iter().cloned());

    let plain = tokens
        .iter()
        .all(|t| !t.chars().any(|c| c.is_whitespace() || c == '"' || c == '\''));
    if plain {
        let reparsed = tokenizer::parse(&tokens.join(" ")).unwrap();
        assert_eq!(reparsed, parsed);
    }
});
