use std::fmt;

use anyhow::{Result, anyhow};
use serde::Serialize;

/// A location in the source buffer. `offset` is a byte offset, `line` and
/// `column` are 1-based with columns counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open `[start, end)` region of the source covered by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Helper to convert a byte offset to line/column position
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    Position::new(line, column, offset.min(text.len()))
}

/// Convert a 1-based line/column pair into a byte offset.
///
/// Columns past the end of the line clamp to the line end (just before the
/// newline). Lines past the end of the buffer are an error.
pub fn position_to_offset(text: &str, line: u32, column: u32) -> Result<usize> {
    if line == 0 || column == 0 {
        return Err(anyhow!("line and column are 1-based, got {}:{}", line, column));
    }

    let mut line_start = 0usize;
    let mut current = 1u32;
    while current < line {
        match text[line_start..].find('\n') {
            Some(nl) => {
                line_start += nl + 1;
                current += 1;
            }
            None => {
                return Err(anyhow!(
                    "line {} is past the end of the buffer ({} lines)",
                    line,
                    current
                ));
            }
        }
    }

    let line_text = match text[line_start..].find('\n') {
        Some(nl) => &text[line_start..line_start + nl],
        None => &text[line_start..],
    };
    let offset = line_text
        .char_indices()
        .nth(column as usize - 1)
        .map(|(i, _)| line_start + i)
        .unwrap_or(line_start + line_text.len());
    Ok(offset)
}
