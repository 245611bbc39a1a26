//! Incremental update: re-diff only the window around an edit and splice
//! the result into an existing [`Revision`].
//!
//! Outside the deltas every line on one side pairs with exactly one line on
//! the other, so a window whose boundaries fall between deltas on the edited
//! side maps to an equally aligned window on the other side. The window is
//! grown from the edit by a margin and then over every delta it touches.
//! Deltas before the window are kept as they are, deltas after it move by
//! the edit's line-count change, and the window itself is diffed afresh.
//!
//! Blank-line elision breaks the one-to-one pairing, so the update refuses
//! to run when it is active.

use std::ops::Range;

use tracing::{debug, warn};

use linedelta_types::{Delta, LineEdit, Side};

use crate::engine::compute_deltas;
use crate::error::{DiffError, DiffResult};
use crate::revision::Revision;

/// The part of a revision an edit invalidates.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Window {
    /// Indices of the deltas the window swallowed.
    deltas: Range<usize>,
    /// Lines on the edited side, in pre-edit numbering.
    edited: Range<usize>,
    /// Lines on the other side.
    other: Range<usize>,
}

impl Window {
    fn locate(
        deltas: &[Delta],
        edit: &LineEdit,
        old_len: usize,
        other_len: usize,
        margin: usize,
    ) -> Option<Self> {
        let side = edit.side;
        let other = side.other();

        let mut start = edit.start_line.saturating_sub(margin);
        let mut end = edit
            .start_line
            .saturating_add(edit.old_span())
            .saturating_add(margin)
            .min(old_len);

        let (first, last) = loop {
            let first = deltas.partition_point(|d| d.chunk(side).end() < start);
            let last = deltas.partition_point(|d| d.chunk(side).anchor <= end);
            let (mut grown_start, mut grown_end) = (start, end);
            if first < last {
                grown_start = grown_start.min(deltas[first].chunk(side).anchor);
                grown_end = grown_end.max(deltas[last - 1].chunk(side).end());
            }
            if (grown_start, grown_end) == (start, end) {
                break (first, last);
            }
            start = grown_start;
            end = grown_end;
        };

        // Past the last delta before a boundary, both sides advance in step.
        let other_start = match first.checked_sub(1).map(|i| &deltas[i]) {
            Some(d) => (start - d.chunk(side).end()) + d.chunk(other).end(),
            None => start,
        };
        let other_end = match last.checked_sub(1).map(|i| &deltas[i]) {
            Some(d) => end.checked_sub(d.chunk(side).end())? + d.chunk(other).end(),
            None => end,
        };

        if other_start > other_end || other_end > other_len {
            return None;
        }

        Some(Self {
            deltas: first..last,
            edited: start..end,
            other: other_start..other_end,
        })
    }
}

impl Revision {
    /// Replace the lines of `edit.side` with `lines` and update the deltas
    /// by re-diffing only the region around the edit.
    ///
    /// The edit must describe how `lines` differs from the stored side:
    /// `line_count_delta` lines were inserted (or removed) at `start_line`,
    /// or the single line at `start_line` was rewritten in place.
    ///
    /// Returns `Ok(false)` when the incremental path does not apply; the new
    /// lines are stored regardless and the caller should follow up with
    /// [`Revision::refresh`]. On any error, including an edit notification
    /// inconsistent with `lines`, the revision is left unchanged.
    pub fn update(&mut self, edit: LineEdit, lines: Vec<String>) -> DiffResult<bool> {
        validate_edit(&edit, self.lines(edit.side).len(), lines.len())?;
        let deltas = self.incremental_deltas(&edit, &lines)?;
        *self.lines_mut(edit.side) = lines;
        match deltas {
            Some(deltas) => {
                *self.deltas_mut() = deltas;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The full delta list after `edit`, computed by re-diffing only the
    /// edit's window against `lines`, the new content of `edit.side`.
    ///
    /// Does not touch `self`. Returns `None` when the incremental path does
    /// not apply.
    pub(crate) fn incremental_deltas(
        &self,
        edit: &LineEdit,
        lines: &[String],
    ) -> DiffResult<Option<Vec<Delta>>> {
        let side = edit.side;
        if !self.options().incremental {
            debug!(revision = %self.id().short_id(), "incremental update disabled");
            return Ok(None);
        }
        if self.options().ignore.ignore_blank_lines {
            debug!(
                revision = %self.id().short_id(),
                "blank-line elision active; incremental update not applicable"
            );
            return Ok(None);
        }

        let old_len = self.lines(side).len();
        let other_lines = self.lines(side.other());
        let margin = self.options().incremental_margin;
        let Some(window) =
            Window::locate(self.deltas(), edit, old_len, other_lines.len(), margin)
        else {
            warn!(
                revision = %self.id().short_id(),
                ?edit,
                "edit window does not align with existing deltas"
            );
            return Ok(None);
        };

        let Some(new_end) = window
            .edited
            .end
            .checked_add_signed(edit.line_count_delta)
            .filter(|&e| e >= window.edited.start && e <= lines.len())
        else {
            warn!(revision = %self.id().short_id(), ?edit, ?window, "edit falls outside its window");
            return Ok(None);
        };

        let edited_now = window.edited.start..new_end;
        let (original_range, revised_range, original, revised) = match side {
            Side::Original => (
                edited_now.clone(),
                window.other.clone(),
                &lines[edited_now],
                &other_lines[window.other.clone()],
            ),
            Side::Revised => (
                window.other.clone(),
                edited_now.clone(),
                &other_lines[window.other.clone()],
                &lines[edited_now],
            ),
        };

        let mut fresh = compute_deltas(original, revised, self.options(), self.id())?;
        for delta in &mut fresh {
            delta.original.anchor += original_range.start;
            delta.revised.anchor += revised_range.start;
        }
        let added = fresh.len();

        let kept = &self.deltas()[..window.deltas.start];
        let mut deltas = Vec::with_capacity(kept.len() + added + self.len() - window.deltas.end);
        deltas.extend_from_slice(kept);
        deltas.extend(fresh);
        for delta in &self.deltas()[window.deltas.end..] {
            let mut delta = delta.clone();
            let chunk = delta.chunk_mut(side);
            *chunk = chunk.shifted(edit.line_count_delta).ok_or_else(|| {
                DiffError::Algorithm(format!(
                    "shifting {chunk:?} by {} underflows",
                    edit.line_count_delta
                ))
            })?;
            deltas.push(delta);
        }
        check_separated(&deltas)?;

        debug!(
            revision = %self.id().short_id(),
            side = %side,
            original = ?original_range,
            revised = ?revised_range,
            removed = window.deltas.len(),
            added,
            "incremental update applied"
        );
        Ok(Some(deltas))
    }
}

/// Consecutive deltas must leave at least one line between them on both
/// sides.
fn check_separated(deltas: &[Delta]) -> DiffResult<()> {
    for pair in deltas.windows(2) {
        if pair[0].original.end() >= pair[1].original.anchor
            || pair[0].revised.end() >= pair[1].revised.anchor
        {
            return Err(DiffError::Algorithm(format!(
                "deltas {} and {} overlap after splice",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_edit(edit: &LineEdit, old_len: usize, new_len: usize) -> DiffResult<()> {
    if edit.start_line > old_len {
        return Err(DiffError::InvalidInput(format!(
            "edit starts at line {} past the end of the {} sequence ({old_len} lines)",
            edit.start_line, edit.side
        )));
    }
    if edit.line_count_delta < 0
        && edit.start_line + edit.line_count_delta.unsigned_abs() > old_len
    {
        return Err(DiffError::InvalidInput(format!(
            "edit removes {} lines at line {} from {old_len} lines",
            edit.line_count_delta.unsigned_abs(),
            edit.start_line
        )));
    }
    if old_len.checked_add_signed(edit.line_count_delta) != Some(new_len) {
        return Err(DiffError::InvalidInput(format!(
            "edit changes {} line count by {} but {old_len} lines became {new_len}",
            edit.side, edit.line_count_delta
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use linedelta_types::{Chunk, IgnoreConfig};

    use crate::config::{DiffAlgorithm, DiffOptions};
    use crate::engine::DiffEngine;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line{i}")).collect()
    }

    fn engine() -> DiffEngine {
        DiffEngine::new(DiffOptions::incremental())
    }

    fn chunks(deltas: &[Delta]) -> Vec<(Chunk, Chunk)> {
        deltas.iter().map(|d| (d.original, d.revised)).collect()
    }

    fn assert_matches_full_diff(rev: &Revision) {
        let full = DiffEngine::new(rev.options().clone())
            .diff(rev.original(), rev.revised())
            .unwrap();
        assert_eq!(chunks(rev.deltas()), chunks(full.deltas()));
    }

    #[test]
    fn disabled_by_default() {
        let original = numbered(10);
        let mut revised = original.clone();
        let mut rev = DiffEngine::default().diff(&original, &revised).unwrap();

        revised.insert(3, "new".into());
        let used = rev
            .update(LineEdit::new(Side::Revised, 3, 1), revised.clone())
            .unwrap();
        assert!(!used);
        assert_eq!(rev.revised(), revised.as_slice());
        assert!(rev.is_empty());

        rev.refresh().unwrap();
        assert_eq!(rev.len(), 1);
    }

    #[test]
    fn insertion_between_existing_deltas() {
        let original = numbered(40);
        let mut revised = original.clone();
        revised[5] = "changed5".into();
        revised[30] = "changed30".into();
        let mut rev = engine().diff(&original, &revised).unwrap();
        assert_eq!(rev.len(), 2);

        revised.insert(20, "inserted".into());
        assert!(rev.update(LineEdit::new(Side::Revised, 20, 1), revised).unwrap());

        assert_eq!(
            chunks(rev.deltas()),
            vec![
                (Chunk::new(5, 1), Chunk::new(5, 1)),
                (Chunk::new(20, 0), Chunk::new(20, 1)),
                (Chunk::new(30, 1), Chunk::new(31, 1)),
            ]
        );
        assert_matches_full_diff(&rev);
    }

    #[test]
    fn reverting_a_change_removes_its_delta() {
        let original = numbered(20);
        let mut revised = original.clone();
        revised[10] = "changed".into();
        let mut rev = engine().diff(&original, &revised).unwrap();
        assert_eq!(rev.len(), 1);

        revised[10] = original[10].clone();
        assert!(rev.update(LineEdit::new(Side::Revised, 10, 0), revised).unwrap());
        assert!(rev.is_empty());
    }

    #[test]
    fn deletion_on_original_shifts_later_deltas() {
        let mut original = numbered(30);
        let mut revised = original.clone();
        revised[25] = "changed".into();
        let mut rev = engine().diff(&original, &revised).unwrap();

        original.drain(3..5);
        assert!(rev.update(LineEdit::new(Side::Original, 3, -2), original).unwrap());

        assert_eq!(
            chunks(rev.deltas()),
            vec![
                (Chunk::new(3, 0), Chunk::new(3, 2)),
                (Chunk::new(23, 1), Chunk::new(25, 1)),
            ]
        );
        assert_matches_full_diff(&rev);
    }

    #[test]
    fn edit_next_to_delta_widens_window() {
        let original = numbered(30);
        let mut revised = original.clone();
        revised.splice(12..14, ["x".to_string(), "y".to_string(), "z".to_string()]);
        let options = DiffOptions {
            incremental_margin: 0,
            ..DiffOptions::incremental()
        };
        let mut rev = DiffEngine::new(options).diff(&original, &revised).unwrap();
        assert_eq!(chunks(rev.deltas()), vec![(Chunk::new(12, 2), Chunk::new(12, 3))]);

        // Line 15 directly follows the changed block on the revised side.
        revised[15] = "w".into();
        assert!(rev.update(LineEdit::new(Side::Revised, 15, 0), revised.clone()).unwrap());

        assert_eq!(chunks(rev.deltas()), vec![(Chunk::new(12, 3), Chunk::new(12, 4))]);
        assert_eq!(rev.patch().unwrap(), revised);
        assert_matches_full_diff(&rev);
    }

    #[test]
    fn append_at_end() {
        let original = numbered(8);
        let mut revised = original.clone();
        let mut rev = engine().diff(&original, &revised).unwrap();

        revised.push("tail".into());
        assert!(rev.update(LineEdit::new(Side::Revised, 8, 1), revised).unwrap());
        assert_eq!(chunks(rev.deltas()), vec![(Chunk::new(8, 0), Chunk::new(8, 1))]);
    }

    #[test]
    fn blank_line_elision_falls_back() {
        let options = DiffOptions {
            ignore: IgnoreConfig {
                ignore_blank_lines: true,
                ..Default::default()
            },
            ..DiffOptions::incremental()
        };
        let original = numbered(5);
        let mut revised = original.clone();
        let mut rev = DiffEngine::new(options).diff(&original, &revised).unwrap();

        revised.insert(2, String::new());
        assert!(!rev.update(LineEdit::new(Side::Revised, 2, 1), revised).unwrap());
    }

    #[test]
    fn whitespace_rules_still_incremental() {
        let options = DiffOptions {
            ignore: IgnoreConfig::whitespace(),
            ..DiffOptions::incremental()
        };
        let original = numbered(20);
        let mut revised = original.clone();
        let mut rev = DiffEngine::new(options).diff(&original, &revised).unwrap();

        revised[7] = format!("  {}  ", revised[7]);
        assert!(rev.update(LineEdit::new(Side::Revised, 7, 0), revised.clone()).unwrap());
        assert!(rev.is_empty());

        revised[9] = "different".into();
        assert!(rev.update(LineEdit::new(Side::Revised, 9, 0), revised).unwrap());
        assert_eq!(chunks(rev.deltas()), vec![(Chunk::new(9, 1), Chunk::new(9, 1))]);
    }

    #[test]
    fn inconsistent_edit_is_rejected() {
        let original = numbered(5);
        let mut rev = engine().diff(&original, &original).unwrap();

        let err = rev
            .update(LineEdit::new(Side::Original, 2, 1), numbered(5))
            .unwrap_err();
        assert!(matches!(err, DiffError::InvalidInput(_)));

        let err = rev
            .update(LineEdit::new(Side::Original, 9, 0), numbered(5))
            .unwrap_err();
        assert!(matches!(err, DiffError::InvalidInput(_)));

        let err = rev
            .update(LineEdit::new(Side::Original, 4, -2), numbered(3))
            .unwrap_err();
        assert!(matches!(err, DiffError::InvalidInput(_)));

        assert_eq!(rev.original(), original.as_slice());
    }

    #[test]
    fn failed_update_leaves_revision_unchanged() {
        let original = numbered(30);
        let mut revised = original.clone();
        revised[25] = "changed".into();
        let mut rev = engine().diff(&original, &revised).unwrap();
        // Duplicate the only delta so the spliced list cannot be well formed.
        let duplicate = rev.deltas()[0].clone();
        rev.deltas_mut().push(duplicate);
        let before = rev.clone();

        revised[3] = "x".into();
        let edit = LineEdit::new(Side::Revised, 3, 0);
        let err = rev.update(edit, revised.clone()).unwrap_err();
        assert!(matches!(err, DiffError::Algorithm(_)));
        assert_eq!(rev.revised(), before.revised());
        assert_eq!(chunks(rev.deltas()), chunks(before.deltas()));

        let err = rev.apply_edit(edit, revised).unwrap_err();
        assert!(matches!(err, DiffError::Algorithm(_)));
        assert_eq!(rev.revised(), before.revised());
        assert_eq!(chunks(rev.deltas()), chunks(before.deltas()));
    }

    #[test]
    fn expired_timeout_still_updates() {
        for algorithm in [DiffAlgorithm::Myers, DiffAlgorithm::Lcs] {
            let options = DiffOptions {
                algorithm,
                timeout: Some(Duration::ZERO),
                ..DiffOptions::incremental()
            };
            let original = numbered(10);
            let mut revised = original.clone();
            let mut rev = DiffEngine::new(options).diff(&original, &revised).unwrap();

            revised[4] = "X".into();
            assert!(rev.update(LineEdit::new(Side::Revised, 4, 0), revised.clone()).unwrap());
            assert!(!rev.is_empty());
            assert_eq!(rev.revised()[4], "X");
            assert_eq!(rev.patch().unwrap(), revised);
            assert_eq!(rev.restore().unwrap(), original);
        }
    }

    #[test]
    fn apply_edit_reports_path_taken() {
        let original = numbered(12);
        let mut revised = original.clone();
        let mut rev = engine().diff(&original, &revised).unwrap();

        revised.remove(6);
        assert!(rev.apply_edit(LineEdit::new(Side::Revised, 6, -1), revised).unwrap());
        assert_eq!(chunks(rev.deltas()), vec![(Chunk::new(6, 1), Chunk::new(6, 0))]);
    }

    #[test]
    fn window_aligns_other_side_past_deltas() {
        let original = numbered(30);
        let mut revised = original.clone();
        revised.drain(2..5);
        let rev = engine().diff(&original, &revised).unwrap();
        assert_eq!(chunks(rev.deltas()), vec![(Chunk::new(2, 3), Chunk::new(2, 0))]);

        let edit = LineEdit::new(Side::Original, 20, 0);
        let window = Window::locate(rev.deltas(), &edit, 30, 27, 5).unwrap();
        assert_eq!(window.deltas, 1..1);
        assert_eq!(window.edited, 15..26);
        assert_eq!(window.other, 12..23);
    }
}
