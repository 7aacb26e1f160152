//! Coordinate structure used to reference specific locations within parser input
#![allow(clippy::len_without_is_empty)]

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A [Coords] represents a single character location within the parser input
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Coords {
    /// The absolute (zero-based) character offset
    pub absolute: usize,
    /// The line, starting at 1
    pub line: usize,
    /// The column within the line, starting at 1
    pub column: usize,
}

impl Coords {
    /// The coordinates of the character following one located at these coordinates
    pub fn advance(&self, c: char) -> Coords {
        if c == '\n' {
            Coords {
                absolute: self.absolute + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Coords {
                absolute: self.absolute + 1,
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[abs: {}, line: {}, column: {}]",
            self.absolute, self.line, self.column
        )
    }
}

impl Default for Coords {
    /// The default set of coordinates are positioned at the first character of the first line
    fn default() -> Self {
        Coords {
            absolute: 0,
            line: 1,
            column: 1,
        }
    }
}

impl PartialOrd<Self> for Coords {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coords {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute.cmp(&other.absolute)
    }
}

/// A [Span] represents a linear interval within the parser input, between two different [Coords]
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Span {
    /// Start [Coords] for the span
    pub start: Coords,
    /// End [Coords] for the span (inclusive)
    pub end: Coords,
}

impl Span {
    /// Get the length of the span in characters, minimum is 1
    pub fn len(&self) -> usize {
        self.start.absolute.abs_diff(self.end.absolute) + 1
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "start: {}, end: {}, length: {}",
            self.start,
            self.end,
            self.len()
        )
    }
}
