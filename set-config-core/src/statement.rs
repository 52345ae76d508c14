use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// A single statement line split into positional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// 1-based line number in the source document.
    pub line: usize,
    /// The line with trailing whitespace removed.
    pub raw: String,
    /// Fields produced by splitting `raw` on single spaces.
    pub tokens: Vec<String>,
}

impl Statement {
    /// Build a statement from one line of text.
    ///
    /// Only trailing whitespace (including the newline) is stripped. Splitting is
    /// done on single spaces, so doubled spaces yield empty fields the same way
    /// the device renders them.
    pub fn new(line: usize, text: &str) -> Self {
        let raw = text.trim_end().to_string();
        let tokens = raw.split(' ').map(str::to_string).collect();
        Self { line, raw, tokens }
    }

    /// Number of positional fields.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the statement carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Return the field at `idx` if present.
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(String::as_str)
    }

    /// True when the leading fields equal `prefix` word for word.
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.tokens.len()
            && prefix
                .iter()
                .zip(&self.tokens)
                .all(|(want, have)| *want == have)
    }

    /// Fields from `idx` to the end of the line. Empty when `idx` is past the end.
    pub fn rest(&self, idx: usize) -> &[String] {
        self.tokens.get(idx..).unwrap_or(&[])
    }

    /// Fields from `idx` onward re-joined with single spaces.
    pub fn rest_joined(&self, idx: usize) -> String {
        self.rest(idx).join(" ")
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
