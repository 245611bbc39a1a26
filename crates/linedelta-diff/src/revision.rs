//! The result of one diff: both sequences plus the sorted delta list.
//!
//! # Invariants
//!
//! - `deltas` is sorted ascending by `original.anchor`.
//! - On each side, consecutive chunks are separated by at least one line,
//!   so chunks never overlap or touch.
//! - Chunk positions are true line numbers of the stored sequences,
//!   whether or not filtering ran.
//!
//! Only [`Revision::update`], [`Revision::apply_edit`] and
//! [`Revision::refresh`] mutate the delta list. Each takes `&mut self` and
//! computes the new list in full before storing it, so readers never observe
//! a half-spliced list and a failed call leaves the revision as it was.

use tracing::debug;

use linedelta_types::{Delta, LineEdit, RevisionId, Side};

use crate::config::DiffOptions;
use crate::engine::compute_deltas;
use crate::error::{DiffError, DiffResult};
use crate::incremental::validate_edit;

/// An ordered set of deltas between two line sequences.
#[derive(Clone, Debug)]
pub struct Revision {
    id: RevisionId,
    original: Vec<String>,
    revised: Vec<String>,
    deltas: Vec<Delta>,
    options: DiffOptions,
}

/// Summary counts over a revision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevisionStats {
    pub adds: usize,
    pub deletes: usize,
    pub changes: usize,
    /// Lines covered by original-side chunks.
    pub original_lines: usize,
    /// Lines covered by revised-side chunks.
    pub revised_lines: usize,
}

impl Revision {
    pub(crate) fn compute(
        original: Vec<String>,
        revised: Vec<String>,
        options: DiffOptions,
    ) -> DiffResult<Self> {
        let id = RevisionId::new();
        let deltas = compute_deltas(&original, &revised, &options, id)?;
        Ok(Self {
            id,
            original,
            revised,
            deltas,
            options,
        })
    }

    pub fn id(&self) -> RevisionId {
        self.id
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// The original-side lines.
    pub fn original(&self) -> &[String] {
        &self.original
    }

    /// The revised-side lines.
    pub fn revised(&self) -> &[String] {
        &self.revised
    }

    /// The lines of one side.
    pub fn lines(&self, side: Side) -> &[String] {
        match side {
            Side::Original => &self.original,
            Side::Revised => &self.revised,
        }
    }

    pub(crate) fn lines_mut(&mut self, side: Side) -> &mut Vec<String> {
        match side {
            Side::Original => &mut self.original,
            Side::Revised => &mut self.revised,
        }
    }

    /// All deltas in ascending line order.
    pub fn deltas(&self) -> &[Delta] {
        &self.deltas
    }

    pub(crate) fn deltas_mut(&mut self) -> &mut Vec<Delta> {
        &mut self.deltas
    }

    /// Number of deltas.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Returns `true` if the sequences compare equal.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Delta> {
        self.deltas.get(index)
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// The first delta starting after original line `line`.
    pub fn next_delta(&self, line: usize) -> Option<(usize, &Delta)> {
        let index = self.deltas.partition_point(|d| d.original.anchor <= line);
        self.deltas.get(index).map(|d| (index, d))
    }

    /// The last delta starting before original line `line`.
    pub fn previous_delta(&self, line: usize) -> Option<(usize, &Delta)> {
        let index = self.deltas.partition_point(|d| d.original.anchor < line);
        index.checked_sub(1).map(|i| (i, &self.deltas[i]))
    }

    /// The delta whose chunk on `side` covers `line`.
    ///
    /// An empty chunk covers the line it is anchored at, so an insertion
    /// point can be found from either side.
    pub fn delta_at(&self, side: Side, line: usize) -> Option<(usize, &Delta)> {
        let index = self.deltas.partition_point(|d| d.chunk(side).end() < line);
        self.deltas[index..]
            .iter()
            .enumerate()
            .take_while(|(_, d)| d.chunk(side).anchor <= line)
            .find(|(_, d)| {
                let chunk = d.chunk(side);
                chunk.contains(line) || (chunk.is_empty() && chunk.anchor == line)
            })
            .map(|(offset, d)| (index + offset, d))
    }

    /// Map a line on `from` to the corresponding line on the other side.
    ///
    /// Lines outside every delta shift by the size difference accumulated
    /// from the deltas before them. Lines inside a delta map to the anchor of
    /// that delta's other chunk.
    pub fn map_line(&self, from: Side, line: usize) -> usize {
        let to = from.other();
        let index = self.deltas.partition_point(|d| d.chunk(from).end() <= line);

        if let Some(d) = self.deltas.get(index) {
            if d.chunk(from).contains(line) {
                return d.chunk(to).anchor;
            }
        }

        match index.checked_sub(1).map(|i| &self.deltas[i]) {
            Some(prev) => line - prev.chunk(from).end() + prev.chunk(to).end(),
            None => line,
        }
    }

    /// Summary counts.
    pub fn stats(&self) -> RevisionStats {
        self.deltas
            .iter()
            .fold(RevisionStats::default(), |mut stats, d| {
                if d.is_add() {
                    stats.adds += 1;
                } else if d.is_delete() {
                    stats.deletes += 1;
                } else {
                    stats.changes += 1;
                }
                stats.original_lines += d.original.size;
                stats.revised_lines += d.revised.size;
                stats
            })
    }

    // ---------------------------------------------------------------
    // Merge-apply
    // ---------------------------------------------------------------

    /// Transform `lines`, a copy of side `from`, into the other side by
    /// replacing every chunk with the stored lines of the other side.
    ///
    /// Lines outside the deltas are taken from `lines`, so under ignore rules
    /// the result keeps the caller's spelling of lines that only compared
    /// equal.
    pub fn apply_to<S: AsRef<str>>(&self, from: Side, lines: &[S]) -> DiffResult<Vec<String>> {
        let expected = self.lines(from).len();
        if lines.len() != expected {
            return Err(DiffError::InvalidInput(format!(
                "{from} sequence has {} lines, revision expects {expected}",
                lines.len()
            )));
        }

        let to = from.other();
        let target = self.lines(to);
        let mut out = Vec::with_capacity(target.len());
        let mut cursor = 0;
        for d in &self.deltas {
            let source = d.chunk(from);
            let replacement = d.chunk(to);
            let kept = lines.get(cursor..source.anchor).ok_or_else(|| corrupt(d))?;
            out.extend(kept.iter().map(|l| l.as_ref().to_owned()));
            out.extend_from_slice(target.get(replacement.range()).ok_or_else(|| corrupt(d))?);
            cursor = source.end();
        }
        let tail = lines.get(cursor..).ok_or_else(|| {
            DiffError::Algorithm(format!("last delta ends at {cursor}, past the {from} sequence"))
        })?;
        out.extend(tail.iter().map(|l| l.as_ref().to_owned()));
        Ok(out)
    }

    /// Rebuild the revised side from the stored original side.
    pub fn patch(&self) -> DiffResult<Vec<String>> {
        self.apply_to(Side::Original, &self.original)
    }

    /// Rebuild the original side from the stored revised side.
    pub fn restore(&self) -> DiffResult<Vec<String>> {
        self.apply_to(Side::Revised, &self.revised)
    }

    /// Copy the chunk of delta `index` on side `from` over the matching chunk
    /// on the other side.
    ///
    /// Returns the new lines of the other side and the edit notification
    /// describing the change, ready for [`Revision::apply_edit`].
    pub fn take_change(&self, index: usize, from: Side) -> DiffResult<(Vec<String>, LineEdit)> {
        let d = self.deltas.get(index).ok_or_else(|| {
            DiffError::InvalidInput(format!(
                "delta index {index} out of range for {} deltas",
                self.deltas.len()
            ))
        })?;

        let to = from.other();
        let source = d.chunk(from);
        let target = d.chunk(to);
        let replacement = self.lines(from).get(source.range()).ok_or_else(|| corrupt(d))?;
        let mut lines = self.lines(to).to_vec();
        if target.end() > lines.len() {
            return Err(corrupt(d));
        }
        lines.splice(target.range(), replacement.iter().cloned());

        let edit = LineEdit::new(
            to,
            target.anchor,
            source.size as isize - target.size as isize,
        );
        Ok((lines, edit))
    }

    // ---------------------------------------------------------------
    // Re-diffing
    // ---------------------------------------------------------------

    /// Recompute every delta from the stored sequences.
    pub fn refresh(&mut self) -> DiffResult<()> {
        self.deltas = compute_deltas(&self.original, &self.revised, &self.options, self.id)?;
        debug!(revision = %self.id.short_id(), deltas = self.deltas.len(), "revision refreshed");
        Ok(())
    }

    /// Replace one side after an edit and bring the deltas up to date.
    ///
    /// Tries the incremental path of [`Revision::update`] first and falls
    /// back to a full re-diff when it does not apply. Returns `true` when the
    /// incremental path was used. On error the revision is left unchanged.
    pub fn apply_edit(&mut self, edit: LineEdit, lines: Vec<String>) -> DiffResult<bool> {
        validate_edit(&edit, self.lines(edit.side).len(), lines.len())?;
        let (deltas, incremental) = match self.incremental_deltas(&edit, &lines)? {
            Some(deltas) => (deltas, true),
            None => {
                let (original, revised) = match edit.side {
                    Side::Original => (lines.as_slice(), self.revised()),
                    Side::Revised => (self.original(), lines.as_slice()),
                };
                let deltas = compute_deltas(original, revised, &self.options, self.id)?;
                debug!(revision = %self.id.short_id(), deltas = deltas.len(), "revision refreshed");
                (deltas, false)
            }
        };
        *self.lines_mut(edit.side) = lines;
        self.deltas = deltas;
        Ok(incremental)
    }
}

fn corrupt(delta: &Delta) -> DiffError {
    DiffError::Algorithm(format!("delta {delta} lies outside the stored sequences"))
}
