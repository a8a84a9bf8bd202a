//! This module abstracts out the source code from which the compiler derives
//! its input data.  A [`Source`] is the sequence of characters of one
//! compilation unit, each tagged with the [`Position`] it was read from.

use std::fmt::{Display, Write};

mod source;

pub use source::Source;

/// A line and column within a single source file.  Both are 1-based so that
/// they can be printed directly in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the position of the character immediately following `c`.
    pub fn advance(&self, c: char) -> Position {
        if c == '\n' {
            Position::new(self.line + 1, 1)
        } else {
            Position::new(self.line, self.column + 1)
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.line, self.column))
    }
}

/// Represents a single char from a source code file along with the position
/// of that character within the file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceChar {
    position: Position,
    c: char,
}

impl SourceChar {
    pub fn new(position: Position, c: char) -> SourceChar {
        SourceChar { position, c }
    }

    pub fn char(&self) -> char {
        self.c
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_alphabetic(&self) -> bool {
        self.c.is_alphabetic()
    }

    pub fn is_alphanumeric(&self) -> bool {
        self.c.is_alphanumeric()
    }

    pub fn is_numeric(&self) -> bool {
        self.c.is_numeric()
    }

    pub fn is_whitespace(&self) -> bool {
        self.c.is_whitespace()
    }
}

impl PartialEq<char> for SourceChar {
    fn eq(&self, other: &char) -> bool {
        self.c == *other
    }
}

impl Display for SourceChar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.char())
    }
}
