use std::fs;
use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

use crate::statement::Statement;

/// Errors that can occur while reading a configuration dump into [`Statement`]s.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input bytes were not valid UTF-8.
    #[error("invalid UTF-8 in configuration dump: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to read the input.
    #[error("failed to read configuration dump: {0}")]
    Io(#[from] std::io::Error),
}

/// Split a configuration dump into statements.
///
/// Blank lines and `#` comment lines are skipped; every other line becomes a
/// statement whether or not a consumer recognizes it.
pub fn parse(text: &str) -> Vec<Statement> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| statement_for(idx + 1, line))
        .collect()
}

/// Read statements from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Statement>, ParseError> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        if let Some(stmt) = statement_for(idx + 1, &line?) {
            out.push(stmt);
        }
    }
    Ok(out)
}

/// Read and split a configuration dump from disk.
pub fn parse_file(path: &Path) -> Result<Vec<Statement>, ParseError> {
    let bytes = fs::read(path)?;
    let text = std::str::from_utf8(&bytes)?;
    Ok(parse(text))
}

fn statement_for(line: usize, text: &str) -> Option<Statement> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(Statement::new(line, text))
}
