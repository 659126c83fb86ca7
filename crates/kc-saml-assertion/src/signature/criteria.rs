//! Criteria passed to a signature trust engine.

use serde::{Deserialize, Serialize};

use crate::types::QName;

/// Intended use of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageType {
    /// Signing and signature verification.
    Signing,
    /// Encryption and decryption.
    Encryption,
    /// Usage not stated.
    Unspecified,
}

/// A single criterion describing the credential a trust engine should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Entity ID of the credential owner.
    EntityId(String),
    /// Intended credential usage.
    Usage(UsageType),
    /// Metadata role of the peer (for example `md:IDPSSODescriptor`).
    PeerEntityRole(QName),
    /// Protocol support enumeration URI.
    Protocol(String),
}

impl Criterion {
    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Set of criteria, holding at most one criterion of each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaSet {
    criteria: Vec<Criterion>,
}

impl CriteriaSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion, replacing any existing one of the same kind.
    #[must_use]
    pub fn with(mut self, criterion: Criterion) -> Self {
        self.add(criterion);
        self
    }

    /// Adds a criterion, replacing any existing one of the same kind.
    pub fn add(&mut self, criterion: Criterion) {
        self.criteria.retain(|c| !c.same_kind(&criterion));
        self.criteria.push(criterion);
    }

    /// Adds a criterion unless one of the same kind is already present.
    ///
    /// Returns true if the criterion was added.
    pub fn add_if_absent(&mut self, criterion: Criterion) -> bool {
        if self.criteria.iter().any(|c| c.same_kind(&criterion)) {
            return false;
        }
        self.criteria.push(criterion);
        true
    }

    /// Copies every criterion of `other` into this set.
    pub fn extend_from(&mut self, other: &Self) {
        for criterion in &other.criteria {
            self.add(criterion.clone());
        }
    }

    /// The entity ID criterion, if present.
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        self.criteria.iter().find_map(|c| match c {
            Criterion::EntityId(id) => Some(id.as_str()),
            _ => None,
        })
    }

    /// The usage criterion, if present.
    #[must_use]
    pub fn usage(&self) -> Option<UsageType> {
        self.criteria.iter().find_map(|c| match c {
            Criterion::Usage(usage) => Some(*usage),
            _ => None,
        })
    }

    /// Iterates over the criteria.
    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    /// Number of criteria.
    #[must_use]
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}
