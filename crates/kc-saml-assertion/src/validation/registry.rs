//! Validator registries.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use super::{ConditionValidator, StatementValidator, SubjectConfirmationValidator};
use crate::types::QName;

/// A validator that services exactly one key.
pub trait ServicedKey {
    /// Registry key type.
    type Key: Eq + Hash + Clone + fmt::Display;

    /// Key this validator is registered under.
    fn serviced_key(&self) -> Self::Key;
}

impl ServicedKey for dyn ConditionValidator {
    type Key = QName;

    fn serviced_key(&self) -> QName {
        self.serviced_condition()
    }
}

impl ServicedKey for dyn StatementValidator {
    type Key = QName;

    fn serviced_key(&self) -> QName {
        self.serviced_statement()
    }
}

impl ServicedKey for dyn SubjectConfirmationValidator {
    type Key = String;

    fn serviced_key(&self) -> String {
        self.serviced_method().to_string()
    }
}

/// Immutable mapping from serviced key to validator.
///
/// Built once; when two validators service the same key the later one wins.
pub struct ValidatorRegistry<V: ?Sized + ServicedKey> {
    validators: HashMap<V::Key, Arc<V>>,
}

/// Condition validators keyed by element name or schema type.
pub type ConditionValidators = ValidatorRegistry<dyn ConditionValidator>;

/// Statement validators keyed by element name or schema type.
pub type StatementValidators = ValidatorRegistry<dyn StatementValidator>;

/// Subject confirmation validators keyed by method URI.
pub type SubjectConfirmationValidators = ValidatorRegistry<dyn SubjectConfirmationValidator>;

impl<V: ?Sized + ServicedKey> ValidatorRegistry<V> {
    /// Builds a registry from validators.
    pub fn new(validators: impl IntoIterator<Item = Arc<V>>) -> Self {
        let mut map = HashMap::new();
        for validator in validators {
            let key = validator.serviced_key();
            if map.insert(key.clone(), validator).is_some() {
                tracing::warn!(key = %key, "Replacing previously registered validator");
            }
        }
        Self { validators: map }
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Gets the validator registered under `key`.
    #[must_use]
    pub fn get(&self, key: &V::Key) -> Option<&Arc<V>> {
        self.validators.get(key)
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl<V: ?Sized + ServicedKey<Key = QName>> ValidatorRegistry<V> {
    /// Looks up by element name, then by schema type.
    #[must_use]
    pub fn lookup(&self, element_name: &QName, schema_type: Option<&QName>) -> Option<&Arc<V>> {
        self.validators
            .get(element_name)
            .or_else(|| schema_type.and_then(|t| self.validators.get(t)))
    }
}

impl<V: ?Sized + ServicedKey> Default for ValidatorRegistry<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: ?Sized + ServicedKey> fmt::Debug for ValidatorRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.validators.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("ValidatorRegistry")
            .field("keys", &keys)
            .finish()
    }
}
