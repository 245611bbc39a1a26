use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A contiguous half-open line range `[anchor, anchor + size)` on one side of
/// a comparison.
///
/// A chunk with `size == 0` is an insertion or deletion point: it names the
/// line *before which* the other side's lines would go.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    /// First line of the range (0-based).
    pub anchor: usize,
    /// Number of lines in the range.
    pub size: usize,
}

impl Chunk {
    /// Create a chunk covering `size` lines starting at `anchor`.
    pub const fn new(anchor: usize, size: usize) -> Self {
        Self { anchor, size }
    }

    /// One past the last line of the range.
    pub const fn end(&self) -> usize {
        self.anchor + self.size
    }

    /// Returns `true` for a pure insertion/deletion point.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The covered lines as a `Range`, suitable for slicing.
    pub const fn range(&self) -> Range<usize> {
        self.anchor..self.end()
    }

    /// Returns `true` if `line` falls inside the range.
    ///
    /// An empty chunk contains no lines.
    pub const fn contains(&self, line: usize) -> bool {
        line >= self.anchor && line < self.end()
    }

    /// The chunk moved by `offset` lines, or `None` if it would move below
    /// line zero.
    pub fn shifted(&self, offset: isize) -> Option<Self> {
        self.anchor
            .checked_add_signed(offset)
            .map(|anchor| Self::new(anchor, self.size))
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({}+{})", self.anchor, self.size)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.anchor, self.end())
    }
}
