//! Three-valued validation outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a validation step.
///
/// `Invalid` means the input was proven bad. `Indeterminate` means no proof
/// either way could be established. Callers must treat both as untrusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// The input satisfied every check.
    Valid,
    /// The input failed a check.
    Invalid,
    /// The input could not be judged.
    Indeterminate,
}

impl ValidationResult {
    /// Returns true for [`ValidationResult::Valid`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Indeterminate => "INDETERMINATE",
        };
        f.write_str(s)
    }
}
