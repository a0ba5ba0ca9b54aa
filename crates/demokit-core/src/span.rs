//! Source location tracking for factory calls and diagnostics.

use serde::{Deserialize, Serialize};

/// A position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from the start of the file
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// A span of source text, typically covering one factory call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position
    pub start: Position,
    /// End position
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a span from byte offsets into the given source text.
    pub fn from_offsets(source: &str, start_offset: usize, end_offset: usize) -> Self {
        let start = Self::offset_to_position(source, start_offset);
        let end = Self::offset_to_position(source, end_offset);
        Self { start, end }
    }

    /// Convert a byte offset to a line/column position.
    fn offset_to_position(source: &str, offset: usize) -> Position {
        let mut line = 1;
        let mut column = 1;
        let mut current_offset = 0;

        for ch in source.chars() {
            if current_offset >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
            current_offset += ch.len_utf8();
        }

        Position::new(line, column, offset)
    }
}
