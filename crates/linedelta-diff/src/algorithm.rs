//! Line-range differencing.
//!
//! Runs one of `similar`'s minimal edit-script algorithms over two
//! [`SequenceAdapter`]s and folds the emitted operations into maximal
//! [`RangeDifference`]s: every run of deletions and insertions with no equal
//! element in between becomes one range.
//!
//! # Invariants
//!
//! - Ranges are sorted ascending by `left_start` and never overlap.
//! - Consecutive ranges are separated by at least one equal element on
//!   both sides.
//! - The gaps between ranges plus the ranges themselves reconstruct both
//!   inputs.
//!
//! Hook callbacks that would break one of these are reported as
//! [`DiffError::Algorithm`] instead of producing a corrupt result.

use std::time::Instant;

use similar::algorithms::{lcs, myers, DiffHook};

use linedelta_types::{Chunk, Delta, RevisionId};

use crate::adapter::SequenceAdapter;
use crate::config::DiffAlgorithm;
use crate::error::{DiffError, DiffResult};

/// One differing region, expressed as positions in the compared sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RangeDifference {
    pub left_start: usize,
    pub left_length: usize,
    pub right_start: usize,
    pub right_length: usize,
}

impl RangeDifference {
    pub const fn new(
        left_start: usize,
        left_length: usize,
        right_start: usize,
        right_length: usize,
    ) -> Self {
        Self {
            left_start,
            left_length,
            right_start,
            right_length,
        }
    }

    pub const fn left_end(&self) -> usize {
        self.left_start + self.left_length
    }

    pub const fn right_end(&self) -> usize {
        self.right_start + self.right_length
    }

    /// Wrap this range as a delta owned by `revision`.
    pub fn into_delta(self, revision: RevisionId) -> Delta {
        Delta::new(
            revision,
            Chunk::new(self.left_start, self.left_length),
            Chunk::new(self.right_start, self.right_length),
        )
    }
}

/// Compute the differing ranges between `left` and `right`.
///
/// Empty or identical inputs produce no ranges. When `deadline` passes, the
/// algorithm stops refining and the result may be larger than minimal.
///
/// `similar`'s LCS table has no usable deadline fallback, so an LCS run with
/// a deadline is carried out by Myers instead.
pub fn diff_ranges<T: PartialEq + ?Sized>(
    left: &SequenceAdapter<'_, T>,
    right: &SequenceAdapter<'_, T>,
    algorithm: DiffAlgorithm,
    deadline: Option<Instant>,
) -> DiffResult<Vec<RangeDifference>> {
    let mut collector = RangeCollector::default();
    match algorithm {
        DiffAlgorithm::Lcs if deadline.is_none() => lcs::diff(
            &mut collector,
            left,
            0..left.len(),
            right,
            0..right.len(),
        )?,
        DiffAlgorithm::Myers | DiffAlgorithm::Lcs => myers::diff_deadline(
            &mut collector,
            left,
            0..left.len(),
            right,
            0..right.len(),
            deadline,
        )?,
    }
    collector.into_ranges(left.len(), right.len())
}

/// Folds hook callbacks into ranges.
#[derive(Debug, Default)]
struct RangeCollector {
    ranges: Vec<RangeDifference>,
    pending: Option<RangeDifference>,
}

impl RangeCollector {
    fn flush(&mut self) -> DiffResult<()> {
        let Some(range) = self.pending.take() else {
            return Ok(());
        };
        if let Some(last) = self.ranges.last() {
            if range.left_start <= last.left_end() || range.right_start <= last.right_end() {
                return Err(DiffError::Algorithm(format!(
                    "range {range:?} is not separated from preceding range {last:?}"
                )));
            }
        }
        self.ranges.push(range);
        Ok(())
    }

    fn into_ranges(mut self, left_len: usize, right_len: usize) -> DiffResult<Vec<RangeDifference>> {
        self.flush()?;
        if let Some(last) = self.ranges.last() {
            if last.left_end() > left_len || last.right_end() > right_len {
                return Err(DiffError::Algorithm(format!(
                    "range {last:?} exceeds sequence lengths {left_len}/{right_len}"
                )));
            }
        }
        Ok(self.ranges)
    }
}

impl DiffHook for RangeCollector {
    type Error = DiffError;

    fn equal(&mut self, old_index: usize, new_index: usize, len: usize) -> DiffResult<()> {
        if len == 0 {
            return Ok(());
        }
        if let Some(p) = &self.pending {
            if p.left_end() != old_index || p.right_end() != new_index {
                return Err(DiffError::Algorithm(format!(
                    "equal run at {old_index}/{new_index} does not follow pending range {p:?}"
                )));
            }
        }
        self.flush()
    }

    fn delete(&mut self, old_index: usize, old_len: usize, new_index: usize) -> DiffResult<()> {
        let p = self
            .pending
            .get_or_insert(RangeDifference::new(old_index, 0, new_index, 0));
        if p.left_end() != old_index {
            return Err(DiffError::Algorithm(format!(
                "deletion at {old_index} is not contiguous with pending range {p:?}"
            )));
        }
        p.left_length += old_len;
        Ok(())
    }

    fn insert(&mut self, old_index: usize, new_index: usize, new_len: usize) -> DiffResult<()> {
        let p = self
            .pending
            .get_or_insert(RangeDifference::new(old_index, 0, new_index, 0));
        if p.right_end() != new_index {
            return Err(DiffError::Algorithm(format!(
                "insertion at {new_index} is not contiguous with pending range {p:?}"
            )));
        }
        p.right_length += new_len;
        Ok(())
    }

    fn finish(&mut self) -> DiffResult<()> {
        self.flush()
    }
}
