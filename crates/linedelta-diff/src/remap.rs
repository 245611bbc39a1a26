//! Translates chunk positions computed over a [`FilteredSequence`] back into
//! line numbers of the unfiltered sequence.

use linedelta_types::Chunk;

use crate::error::{DiffError, DiffResult};
use crate::filter::FilteredSequence;

/// Remap one chunk from token indices to true line numbers.
///
/// The anchor becomes the line of the token it points at, or `true_len` when
/// it points past the last token. A non-empty chunk is stretched to end at
/// the line of its last token, so elided lines inside the range are covered
/// too.
pub fn remap_chunk(chunk: Chunk, tokens: &FilteredSequence, true_len: usize) -> DiffResult<Chunk> {
    let anchor = tokens.line(chunk.anchor).unwrap_or(true_len);

    let mut size = chunk.size;
    if size > 0 {
        if let Some(last) = tokens.line(chunk.anchor + size - 1) {
            size = last
                .checked_sub(anchor)
                .map(|span| span + 1)
                .ok_or_else(|| {
                    DiffError::Algorithm(format!(
                        "token lines out of order while remapping {chunk:?}"
                    ))
                })?;
        }
    }

    let remapped = Chunk::new(anchor, size);
    if remapped.end() > true_len {
        return Err(DiffError::Algorithm(format!(
            "remapped chunk {remapped:?} exceeds sequence length {true_len}"
        )));
    }
    Ok(remapped)
}
