//! The diff pipeline: filter, compare, remap.

use tracing::debug;

use linedelta_types::{Delta, IgnoreConfig, RevisionId};

use crate::adapter::SequenceAdapter;
use crate::algorithm::diff_ranges;
use crate::config::DiffOptions;
use crate::error::DiffResult;
use crate::filter::FilteredSequence;
use crate::remap::remap_chunk;
use crate::revision::Revision;

/// Entry point for computing revisions.
///
/// An engine is immutable configuration; one engine can serve any number of
/// concurrent diff calls because every call allocates its own scratch state.
#[derive(Clone, Debug, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// An engine with default options and the given ignore rules.
    pub fn with_ignore(ignore: IgnoreConfig) -> Self {
        Self::new(DiffOptions::with_ignore(ignore))
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare two line sequences and return the resulting revision.
    ///
    /// The revision keeps owned copies of both sequences so it can later be
    /// updated incrementally or refreshed.
    pub fn diff<S: AsRef<str>>(&self, original: &[S], revised: &[S]) -> DiffResult<Revision> {
        let original: Vec<String> = original.iter().map(|l| l.as_ref().to_owned()).collect();
        let revised: Vec<String> = revised.iter().map(|l| l.as_ref().to_owned()).collect();
        Revision::compute(original, revised, self.options.clone())
    }
}

/// Compare two line sequences under `ignore` with otherwise default options.
pub fn diff_lines<S: AsRef<str>>(
    original: &[S],
    revised: &[S],
    ignore: &IgnoreConfig,
) -> DiffResult<Revision> {
    DiffEngine::with_ignore(*ignore).diff(original, revised)
}

/// Run the full pipeline over two sequences, producing deltas owned by
/// `revision` whose chunks are true line numbers of the given slices.
pub(crate) fn compute_deltas<S: AsRef<str>>(
    original: &[S],
    revised: &[S],
    options: &DiffOptions,
    revision: RevisionId,
) -> DiffResult<Vec<Delta>> {
    let deadline = options.deadline();

    if !options.ignore.any_ignore_active() {
        let left = SequenceAdapter::from_lines(original);
        let right = SequenceAdapter::from_lines(revised);
        let ranges = diff_ranges(&left, &right, options.algorithm, deadline)?;
        debug!(
            original = original.len(),
            revised = revised.len(),
            deltas = ranges.len(),
            algorithm = ?options.algorithm,
            "diff complete"
        );
        return Ok(ranges.into_iter().map(|r| r.into_delta(revision)).collect());
    }

    let left_tokens = FilteredSequence::build(original, &options.ignore);
    let right_tokens = FilteredSequence::build(revised, &options.ignore);
    let left = SequenceAdapter::from_filtered(&left_tokens);
    let right = SequenceAdapter::from_filtered(&right_tokens);
    let ranges = diff_ranges(&left, &right, options.algorithm, deadline)?;

    let deltas = ranges
        .into_iter()
        .map(|r| -> DiffResult<Delta> {
            let mut delta = r.into_delta(revision);
            delta.original = remap_chunk(delta.original, &left_tokens, original.len())?;
            delta.revised = remap_chunk(delta.revised, &right_tokens, revised.len())?;
            Ok(delta)
        })
        .collect::<DiffResult<Vec<Delta>>>()?;

    debug!(
        original = original.len(),
        revised = revised.len(),
        original_tokens = left_tokens.len(),
        revised_tokens = right_tokens.len(),
        deltas = deltas.len(),
        algorithm = ?options.algorithm,
        "filtered diff complete"
    );
    Ok(deltas)
}
