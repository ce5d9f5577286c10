// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token and instruction types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in operation keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Set,
    Delete,
    Get,
    Inc,
    Dec,
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
    Label,
    Goto,
    Je,
    Jne,
}

impl OpKind {
    /// Classify a word as an operation keyword.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "set" => Some(Self::Set),
            "delete" => Some(Self::Delete),
            "get" => Some(Self::Get),
            "inc" => Some(Self::Inc),
            "dec" => Some(Self::Dec),
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            "label" => Some(Self::Label),
            "goto" => Some(Self::Goto),
            "je" => Some(Self::Je),
            "jne" => Some(Self::Jne),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Delete => "delete",
            Self::Get => "get",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Label => "label",
            Self::Goto => "goto",
            Self::Je => "je",
            Self::Jne => "jne",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One word of a compiled line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// A built-in operation keyword.
    Op(OpKind),
    /// A pipeline invocation; the `$` prefix is stripped.
    Call(String),
    /// A dotted path or literal form, resolved at use time.
    Reference(String),
    /// A `//` comment; never executed.
    Comment(String),
}

impl Token {
    /// Source word the token was built from.
    pub fn word(&self) -> String {
        match self {
            Self::Op(op) => op.as_str().to_string(),
            Self::Call(name) => format!("${name}"),
            Self::Reference(text) | Self::Comment(text) => text.clone(),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}

/// One compiled line: an ordered token sequence whose first token selects
/// the handler. Empty instructions are runtime no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub tokens: Vec<Token>,
}

impl Instruction {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// Source text of the token at `index`, for positional operands.
    pub fn operand(&self, index: usize) -> Option<String> {
        self.tokens.get(index).map(Token::word)
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
