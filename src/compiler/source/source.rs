//! Represents the contents of a unit of Source code (which could be a single
//! file, or a String, etc)

use std::ops::Index;

use super::{Position, SourceChar};

/// A compilation unit
#[derive(Clone, Debug)]
pub struct Source {
    /// The actual text of the source code along with the position of
    /// every character.
    text: Vec<SourceChar>,

    /// The position just past the final character.
    end: Position,
}

impl Source {
    pub fn new(text: &str) -> Source {
        let mut position = Position::default();
        let mut chars = Vec::with_capacity(text.len());
        for c in text.chars() {
            chars.push(SourceChar::new(position, c));
            position = position.advance(c);
        }

        Source {
            text: chars,
            end: position,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The position immediately after the last character of the source.
    pub fn end(&self) -> Position {
        self.end
    }

    pub fn iter(&self) -> std::slice::Iter<SourceChar> {
        self.text.iter()
    }
}

impl Index<usize> for Source {
    type Output = SourceChar;

    fn index(&self, index: usize) -> &Self::Output {
        &self.text[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_track_lines_and_columns() {
        let src = Source::new("ab\ncd");
        assert_eq!(src.len(), 5);
        assert_eq!(src[0].position(), Position::new(1, 1));
        assert_eq!(src[1].position(), Position::new(1, 2));
        assert_eq!(src[2].position(), Position::new(1, 3));
        assert_eq!(src[3].position(), Position::new(2, 1));
        assert_eq!(src[4].position(), Position::new(2, 2));
        assert_eq!(src.end(), Position::new(2, 3));
    }

    #[test]
    fn empty_source() {
        let src = Source::new("");
        assert!(src.is_empty());
        assert_eq!(src.end(), Position::new(1, 1));
    }
}
