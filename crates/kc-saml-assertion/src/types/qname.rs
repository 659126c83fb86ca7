//! Qualified XML names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An XML qualified name (namespace URI plus local part).
///
/// Validators are registered and looked up by element name or schema type,
/// both of which are qualified names. The prefix is not part of identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    /// Namespace URI.
    pub namespace: String,
    /// Local name.
    pub local_part: String,
}

impl QName {
    /// Creates a qualified name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, local_part: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_part)
    }
}
