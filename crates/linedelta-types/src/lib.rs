//! Foundation types for linedelta.
//!
//! This crate provides the data model shared by the differencing engine and
//! its consumers. Every other linedelta crate depends on `linedelta-types`.
//!
//! # Key Types
//!
//! - [`Chunk`] -- Half-open line range `[anchor, anchor + size)` on one side
//! - [`Delta`] / [`DeltaKind`] -- One differing region, classified Add/Delete/Change
//! - [`RevisionId`] -- UUID v7 identifier of the revision that owns a delta
//! - [`Side`] / [`LineEdit`] -- Which sequence an edit touched and by how much
//! - [`IgnoreConfig`] -- Equivalence rules applied before comparing lines

pub mod chunk;
pub mod delta;
pub mod error;
pub mod ignore;
pub mod revision_id;
pub mod side;

pub use chunk::Chunk;
pub use delta::{Delta, DeltaKind};
pub use error::TypeError;
pub use ignore::IgnoreConfig;
pub use revision_id::RevisionId;
pub use side::{LineEdit, Side};
