// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line tokenization and pre-compile directives

use crate::token::{Instruction, OpKind, Token};

/// Classify a single word.
pub fn token_from_word(word: &str) -> Token {
    if word.starts_with("//") {
        Token::Comment(word.to_string())
    } else if let Some(op) = OpKind::from_word(word) {
        Token::Op(op)
    } else if let Some(name) = word.strip_prefix('$') {
        Token::Call(name.to_string())
    } else {
        Token::Reference(word.to_string())
    }
}

/// Split a line into words. A word opening with `"` or `'` starts a quoted
/// run that continues until a word ends with the matching quote; the run is
/// rejoined with single spaces and kept as one word, quotes included.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut quoted: Option<(char, Vec<String>)> = None;

    for word in line.split(' ') {
        if let Some((quote, parts)) = quoted.as_mut() {
            if word.is_empty() {
                continue;
            }
            parts.push(word.to_string());
            if word.ends_with(*quote) {
                let (_, parts) = quoted.take().unwrap_or((' ', Vec::new()));
                words.push(parts.join(" "));
            }
            continue;
        }
        if word.is_empty() {
            continue;
        }
        let opens = word.starts_with('"') || word.starts_with('\'');
        if opens {
            let quote = match word.chars().next() {
                Some(c) => c,
                None => continue,
            };
            let closed = word.len() > 1 && word.ends_with(quote);
            if closed {
                words.push(word.to_string());
            } else {
                quoted = Some((quote, vec![word.to_string()]));
            }
            continue;
        }
        words.push(word.to_string());
    }

    // Unterminated quote: keep what accumulated as a single word.
    if let Some((_, parts)) = quoted {
        words.push(parts.join(" "));
    }
    words
}

/// Compile one line into an instruction. Blank lines compile to the empty
/// instruction, a no-op at run time.
pub fn tokenize_line(line: &str) -> Instruction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Instruction::default();
    }
    let tokens = split_words(trimmed)
        .iter()
        .map(|word| token_from_word(word))
        .collect();
    Instruction::new(tokens)
}

/// Compile a pipeline body line by line.
pub fn compile_lines(lines: &[String]) -> Vec<Instruction> {
    lines.iter().map(|line| tokenize_line(line)).collect()
}

/// Compiler selected by a `// compiler=NAME` comment on the first line.
pub fn compiler_directive(lines: &[String]) -> Option<&str> {
    let first = lines.first()?.trim();
    let name = first.strip_prefix("// compiler=")?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Expand the `$super` pre-compile directive: a bare `$super` line is
/// replaced in place by the previous version's lines, except lines that
/// begin with `->`.
pub fn expand_super(lines: &[String], prev: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        if line.trim() == "$super" {
            for prev_line in prev {
                if !prev_line.trim_start().starts_with("->") {
                    out.push(prev_line.clone());
                }
            }
        } else {
            out.push(line.clone());
        }
    }
    out
}

#[cfg(test)]
#[path = "tokenizer_tests.rs"]
mod tests;
