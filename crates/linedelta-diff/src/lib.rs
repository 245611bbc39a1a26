//! Line-oriented differencing engine for linedelta.
//!
//! Compares two sequences of text lines under configurable equivalence rules
//! and produces a [`Revision`]: an ordered list of deltas whose chunks are
//! always expressed in true line numbers of the inputs. Revisions can be
//! navigated, applied in either direction, and updated incrementally after
//! small edits without re-diffing the whole input.
//!
//! # Key Types
//!
//! - [`DiffEngine`] / [`DiffOptions`] -- Entry point and its configuration
//! - [`Revision`] / [`RevisionStats`] -- Sorted deltas plus the compared lines
//! - [`FilteredSequence`] -- Lines normalized under an [`IgnoreConfig`]
//! - [`SequenceAdapter`] / [`RangeDifference`] -- Comparator input and raw output
//!
//! # Example
//!
//! ```
//! use linedelta_diff::{diff_lines, IgnoreConfig};
//!
//! let rev = diff_lines(&["a", "b", "c"], &["a", "x", "c"], &IgnoreConfig::none()).unwrap();
//! assert_eq!(rev.len(), 1);
//! assert!(rev.deltas()[0].is_change());
//! assert_eq!(rev.patch().unwrap(), vec!["a", "x", "c"]);
//! ```

pub mod adapter;
pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
mod incremental;
pub mod remap;
pub mod revision;

pub use adapter::{Element, SequenceAdapter};
pub use algorithm::{diff_ranges, RangeDifference};
pub use config::{DiffAlgorithm, DiffOptions, DEFAULT_INCREMENTAL_MARGIN};
pub use engine::{diff_lines, DiffEngine};
pub use error::{DiffError, DiffResult};
pub use filter::{normalize, normalize_into, FilteredSequence, FilteredToken};
pub use remap::remap_chunk;
pub use revision::{Revision, RevisionStats};

pub use linedelta_types::{Chunk, Delta, DeltaKind, IgnoreConfig, LineEdit, RevisionId, Side};
