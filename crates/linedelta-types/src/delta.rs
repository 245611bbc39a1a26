use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::revision_id::RevisionId;
use crate::side::Side;

/// Classification of a delta, derived from its chunk sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeltaKind {
    /// Lines present only on the revised side.
    Add,
    /// Lines present only on the original side.
    Delete,
    /// Lines replaced by other lines.
    Change,
}

impl fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Delete => write!(f, "delete"),
            Self::Change => write!(f, "change"),
        }
    }
}

/// One differing region between the original and revised sequences.
///
/// The kind is never stored; it is recomputed from the chunk sizes so that
/// remapping or shifting a chunk can never leave it stale.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    /// The affected range of the original sequence.
    pub original: Chunk,
    /// The affected range of the revised sequence.
    pub revised: Chunk,
    revision: RevisionId,
}

impl Delta {
    /// Create a delta owned by `revision`.
    pub fn new(revision: RevisionId, original: Chunk, revised: Chunk) -> Self {
        Self {
            original,
            revised,
            revision,
        }
    }

    /// The revision this delta belongs to.
    pub fn revision(&self) -> RevisionId {
        self.revision
    }

    /// Derived classification.
    pub fn kind(&self) -> DeltaKind {
        match (self.original.is_empty(), self.revised.is_empty()) {
            (false, true) => DeltaKind::Delete,
            (true, false) => DeltaKind::Add,
            _ => DeltaKind::Change,
        }
    }

    pub fn is_add(&self) -> bool {
        self.kind() == DeltaKind::Add
    }

    pub fn is_delete(&self) -> bool {
        self.kind() == DeltaKind::Delete
    }

    pub fn is_change(&self) -> bool {
        self.kind() == DeltaKind::Change
    }

    /// The chunk on the given side.
    pub fn chunk(&self, side: Side) -> Chunk {
        match side {
            Side::Original => self.original,
            Side::Revised => self.revised,
        }
    }

    /// Mutable access to the chunk on the given side.
    pub fn chunk_mut(&mut self, side: Side) -> &mut Chunk {
        match side {
            Side::Original => &mut self.original,
            Side::Revised => &mut self.revised,
        }
    }

    /// Signed change in line count this delta causes going from original to
    /// revised.
    pub fn size_difference(&self) -> isize {
        self.revised.size as isize - self.original.size as isize
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.kind(), self.original, self.revised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(original: Chunk, revised: Chunk) -> Delta {
        Delta::new(RevisionId::new(), original, revised)
    }

    #[test]
    fn kind_is_derived_from_sizes() {
        assert_eq!(delta(Chunk::new(1, 2), Chunk::new(1, 0)).kind(), DeltaKind::Delete);
        assert_eq!(delta(Chunk::new(1, 0), Chunk::new(1, 2)).kind(), DeltaKind::Add);
        assert_eq!(delta(Chunk::new(1, 1), Chunk::new(1, 3)).kind(), DeltaKind::Change);
    }

    #[test]
    fn kind_follows_chunk_mutation() {
        let mut d = delta(Chunk::new(0, 1), Chunk::new(0, 1));
        assert!(d.is_change());
        d.revised.size = 0;
        assert!(d.is_delete());
    }

    #[test]
    fn empty_on_both_sides_counts_as_change() {
        assert!(delta(Chunk::new(0, 0), Chunk::new(0, 0)).is_change());
    }

    #[test]
    fn chunk_by_side() {
        let mut d = delta(Chunk::new(2, 1), Chunk::new(3, 4));
        assert_eq!(d.chunk(Side::Original), Chunk::new(2, 1));
        assert_eq!(d.chunk(Side::Revised), Chunk::new(3, 4));
        d.chunk_mut(Side::Revised).anchor = 9;
        assert_eq!(d.revised.anchor, 9);
        assert_eq!(d.size_difference(), 3);
    }

    #[test]
    fn deltas_from_different_revisions_differ() {
        let a = delta(Chunk::new(0, 1), Chunk::new(0, 1));
        let b = delta(Chunk::new(0, 1), Chunk::new(0, 1));
        assert_ne!(a, b);

        let c = Delta::new(a.revision(), a.original, a.revised);
        assert_eq!(a, c);
    }

    #[test]
    fn display_names_kind_and_ranges() {
        let d = delta(Chunk::new(1, 1), Chunk::new(1, 1));
        assert_eq!(d.to_string(), "change [1, 2) -> [1, 2)");
    }
}
