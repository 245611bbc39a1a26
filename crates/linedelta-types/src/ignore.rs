use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Equivalence rules that decide whether two lines compare equal.
///
/// All flags default to `false`, which compares lines byte for byte. Missing
/// keys in a TOML document fall back to the default, so a file containing only
/// `ignore_case = true` is valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Drop whitespace before the first non-whitespace character.
    pub ignore_leading_whitespace: bool,
    /// Drop whitespace runs between non-whitespace characters.
    pub ignore_interior_whitespace: bool,
    /// Drop whitespace after the last non-whitespace character.
    pub ignore_trailing_whitespace: bool,
    /// Drop `\n` and `\r` at the end of the line.
    pub ignore_line_endings: bool,
    /// Remove lines without any non-whitespace content from the comparison.
    pub ignore_blank_lines: bool,
    /// Compare lines case-insensitively.
    pub ignore_case: bool,
}

impl IgnoreConfig {
    /// Exact comparison: nothing is ignored.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ignore every kind of whitespace difference, including line endings.
    pub fn whitespace() -> Self {
        Self {
            ignore_leading_whitespace: true,
            ignore_interior_whitespace: true,
            ignore_trailing_whitespace: true,
            ignore_line_endings: true,
            ..Default::default()
        }
    }

    /// Returns `true` if any rule is active, meaning lines must be filtered
    /// before they are compared.
    pub fn any_ignore_active(&self) -> bool {
        self.any_whitespace_ignore_active() || self.ignore_blank_lines || self.ignore_case
    }

    /// Returns `true` if any whitespace or line-ending rule is active.
    pub fn any_whitespace_ignore_active(&self) -> bool {
        self.ignore_leading_whitespace
            || self.ignore_interior_whitespace
            || self.ignore_trailing_whitespace
            || self.ignore_line_endings
    }

    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, TypeError> {
        toml::from_str(s).map_err(|e| TypeError::InvalidConfig(e.to_string()))
    }

    /// Render the configuration as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, TypeError> {
        toml::to_string(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
