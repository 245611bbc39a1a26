use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two sequences being compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The left-hand, "before" sequence.
    Original,
    /// The right-hand, "after" sequence.
    Revised,
}

impl Side {
    /// The opposite side.
    pub const fn other(self) -> Self {
        match self {
            Self::Original => Self::Revised,
            Self::Revised => Self::Original,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Revised => write!(f, "revised"),
        }
    }
}

/// Notification that one side's line sequence was edited.
///
/// `start_line` is the first line touched by the edit and `line_count_delta`
/// is the change in that side's line count (positive for insertions,
/// negative for removals, zero for an in-place modification).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineEdit {
    pub side: Side,
    pub start_line: usize,
    pub line_count_delta: isize,
}

impl LineEdit {
    /// Create an edit notification.
    pub const fn new(side: Side, start_line: usize, line_count_delta: isize) -> Self {
        Self {
            side,
            start_line,
            line_count_delta,
        }
    }

    /// Number of pre-edit lines, starting at `start_line`, that the edit
    /// removed or rewrote. Always at least one so that in-place
    /// modifications cover the modified line.
    pub fn old_span(&self) -> usize {
        if self.line_count_delta < 0 {
            self.line_count_delta.unsigned_abs() + 1
        } else {
            1
        }
    }
}
