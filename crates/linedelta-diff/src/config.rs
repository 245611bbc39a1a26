use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use linedelta_types::{IgnoreConfig, TypeError};

use crate::error::DiffResult;

/// Default number of lines the incremental update adds around an edit.
pub const DEFAULT_INCREMENTAL_MARGIN: usize = 5;

/// Which minimal edit-script algorithm computes the line ranges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    /// Myers' O(ND) algorithm.
    #[default]
    Myers,
    /// Classic longest-common-subsequence table.
    Lcs,
}

/// Configuration for a [`DiffEngine`](crate::DiffEngine) and the revisions it
/// produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Equivalence rules applied before lines are compared.
    pub ignore: IgnoreConfig,
    /// Edit-script algorithm.
    pub algorithm: DiffAlgorithm,
    /// Allow [`Revision::update`](crate::Revision::update) to re-diff only
    /// the window around an edit. When `false` every update reports that a
    /// full re-diff is required.
    pub incremental: bool,
    /// Lines added on each side of an edit before the incremental window is
    /// widened over neighbouring deltas.
    pub incremental_margin: usize,
    /// Cooperative time limit for one diff run. When it expires the result
    /// is still a correct edit script, but may no longer be minimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore: IgnoreConfig::none(),
            algorithm: DiffAlgorithm::Myers,
            incremental: false,
            incremental_margin: DEFAULT_INCREMENTAL_MARGIN,
            timeout: None,
        }
    }
}

impl DiffOptions {
    /// Default options with the given ignore rules.
    pub fn with_ignore(ignore: IgnoreConfig) -> Self {
        Self {
            ignore,
            ..Default::default()
        }
    }

    /// Default options with incremental updates enabled.
    pub fn incremental() -> Self {
        Self {
            incremental: true,
            ..Default::default()
        }
    }

    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        toml::from_str(s).map_err(|e| TypeError::InvalidConfig(e.to_string()).into())
    }

    /// The absolute deadline for a diff run starting now.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.timeout.and_then(|t| Instant::now().checked_add(t))
    }
}
