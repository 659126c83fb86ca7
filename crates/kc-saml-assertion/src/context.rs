//! Per-call validation state.
//!
//! A [`ValidationContext`] is built by the caller for a single validation and
//! passed by `&mut` through the whole pipeline. Validators read static
//! parameters, write dynamic ones and record why they did not return
//! `Valid`. Validators themselves hold no per-call state, so one validator
//! instance can serve many concurrent validations.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use crate::signature::{CriteriaSet, SignaturePrevalidator, SignatureTrustEngine};
use crate::types::{Certificate, KeyInfo, PublicKey, QName, SubjectConfirmation};

/// A typed parameter value.
///
/// Lookups never fail: a value of an unexpected variant reads as absent
/// through the typed accessors of [`ValidationContext`].
#[derive(Clone)]
pub enum ParameterValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer. Read as milliseconds where a duration is expected.
    Integer(i64),
    /// Duration.
    Duration(chrono::Duration),
    /// String.
    String(String),
    /// Set of strings (issuers, audiences, recipients, request IDs).
    StringSet(HashSet<String>),
    /// Set of network addresses.
    AddressSet(HashSet<IpAddr>),
    /// Set of qualified names.
    QNameSet(HashSet<QName>),
    /// Public key.
    PublicKey(PublicKey),
    /// X.509 certificate.
    Certificate(Certificate),
    /// Key info element.
    KeyInfo(KeyInfo),
    /// Subject confirmation element.
    SubjectConfirmation(SubjectConfirmation),
    /// Signature validation criteria.
    CriteriaSet(CriteriaSet),
    /// Signature trust engine.
    TrustEngine(Arc<dyn SignatureTrustEngine>),
    /// Signature pre-validator.
    Prevalidator(Arc<dyn SignaturePrevalidator>),
}

impl ParameterValue {
    /// Name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Duration(_) => "duration",
            Self::String(_) => "string",
            Self::StringSet(_) => "string set",
            Self::AddressSet(_) => "address set",
            Self::QNameSet(_) => "qualified name set",
            Self::PublicKey(_) => "public key",
            Self::Certificate(_) => "certificate",
            Self::KeyInfo(_) => "key info",
            Self::SubjectConfirmation(_) => "subject confirmation",
            Self::CriteriaSet(_) => "criteria set",
            Self::TrustEngine(_) => "trust engine",
            Self::Prevalidator(_) => "prevalidator",
        }
    }

    /// Builds a string set from any iterator of strings.
    pub fn string_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::StringSet(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            Self::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::StringSet(v) => f.debug_tuple("StringSet").field(v).finish(),
            Self::AddressSet(v) => f.debug_tuple("AddressSet").field(v).finish(),
            Self::QNameSet(v) => f.debug_tuple("QNameSet").field(v).finish(),
            Self::PublicKey(v) => f.debug_tuple("PublicKey").field(v).finish(),
            Self::Certificate(v) => f.debug_tuple("Certificate").field(v).finish(),
            Self::KeyInfo(v) => f.debug_tuple("KeyInfo").field(v).finish(),
            Self::SubjectConfirmation(v) => f.debug_tuple("SubjectConfirmation").field(v).finish(),
            Self::CriteriaSet(v) => f.debug_tuple("CriteriaSet").field(v).finish(),
            Self::TrustEngine(_) => f.write_str("TrustEngine(..)"),
            Self::Prevalidator(_) => f.write_str("Prevalidator(..)"),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<chrono::Duration> for ParameterValue {
    fn from(v: chrono::Duration) -> Self {
        Self::Duration(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<HashSet<String>> for ParameterValue {
    fn from(v: HashSet<String>) -> Self {
        Self::StringSet(v)
    }
}

impl From<HashSet<IpAddr>> for ParameterValue {
    fn from(v: HashSet<IpAddr>) -> Self {
        Self::AddressSet(v)
    }
}

impl From<HashSet<QName>> for ParameterValue {
    fn from(v: HashSet<QName>) -> Self {
        Self::QNameSet(v)
    }
}

impl From<PublicKey> for ParameterValue {
    fn from(v: PublicKey) -> Self {
        Self::PublicKey(v)
    }
}

impl From<Certificate> for ParameterValue {
    fn from(v: Certificate) -> Self {
        Self::Certificate(v)
    }
}

impl From<KeyInfo> for ParameterValue {
    fn from(v: KeyInfo) -> Self {
        Self::KeyInfo(v)
    }
}

impl From<SubjectConfirmation> for ParameterValue {
    fn from(v: SubjectConfirmation) -> Self {
        Self::SubjectConfirmation(v)
    }
}

impl From<CriteriaSet> for ParameterValue {
    fn from(v: CriteriaSet) -> Self {
        Self::CriteriaSet(v)
    }
}

impl From<Arc<dyn SignatureTrustEngine>> for ParameterValue {
    fn from(v: Arc<dyn SignatureTrustEngine>) -> Self {
        Self::TrustEngine(v)
    }
}

impl From<Arc<dyn SignaturePrevalidator>> for ParameterValue {
    fn from(v: Arc<dyn SignaturePrevalidator>) -> Self {
        Self::Prevalidator(v)
    }
}

/// Parameters and outcome of a single validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    static_parameters: HashMap<String, ParameterValue>,
    dynamic_parameters: HashMap<String, ParameterValue>,
    failure_message: Option<String>,
}

impl ValidationContext {
    /// Creates a context with the given static parameters.
    #[must_use]
    pub fn new(static_parameters: HashMap<String, ParameterValue>) -> Self {
        Self {
            static_parameters,
            ..Self::default()
        }
    }

    /// Adds a static parameter.
    #[must_use]
    pub fn with_static(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.static_parameters.insert(key.into(), value.into());
        self
    }

    /// All static parameters.
    #[must_use]
    pub fn static_parameters(&self) -> &HashMap<String, ParameterValue> {
        &self.static_parameters
    }

    /// All dynamic parameters.
    #[must_use]
    pub fn dynamic_parameters(&self) -> &HashMap<String, ParameterValue> {
        &self.dynamic_parameters
    }

    /// Gets a static parameter.
    #[must_use]
    pub fn get_static(&self, key: &str) -> Option<&ParameterValue> {
        self.static_parameters.get(key)
    }

    /// Gets a dynamic parameter.
    #[must_use]
    pub fn get_dynamic(&self, key: &str) -> Option<&ParameterValue> {
        self.dynamic_parameters.get(key)
    }

    /// Sets a dynamic parameter.
    pub fn set_dynamic(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.dynamic_parameters.insert(key.into(), value.into());
    }

    /// Message describing the last non-valid outcome.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }

    /// Records why validation did not succeed.
    pub fn set_failure_message(&mut self, message: impl Into<String>) {
        self.failure_message = Some(message.into());
    }

    /// Returns true if a static parameter with this key exists.
    #[must_use]
    pub fn has_static(&self, key: &str) -> bool {
        self.static_parameters.contains_key(key)
    }

    /// Static boolean parameter.
    #[must_use]
    pub fn static_bool(&self, key: &str) -> Option<bool> {
        match self.get_static(key)? {
            ParameterValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Static boolean parameter, with a default for absent or mistyped values.
    #[must_use]
    pub fn static_bool_or(&self, key: &str, default: bool) -> bool {
        self.static_bool(key).unwrap_or(default)
    }

    /// Static string set parameter.
    #[must_use]
    pub fn static_string_set(&self, key: &str) -> Option<&HashSet<String>> {
        match self.get_static(key)? {
            ParameterValue::StringSet(v) => Some(v),
            _ => None,
        }
    }

    /// Static address set parameter.
    #[must_use]
    pub fn static_address_set(&self, key: &str) -> Option<&HashSet<IpAddr>> {
        match self.get_static(key)? {
            ParameterValue::AddressSet(v) => Some(v),
            _ => None,
        }
    }

    /// Static qualified name set parameter.
    #[must_use]
    pub fn static_qname_set(&self, key: &str) -> Option<&HashSet<QName>> {
        match self.get_static(key)? {
            ParameterValue::QNameSet(v) => Some(v),
            _ => None,
        }
    }

    /// Static public key parameter.
    #[must_use]
    pub fn static_public_key(&self, key: &str) -> Option<&PublicKey> {
        match self.get_static(key)? {
            ParameterValue::PublicKey(v) => Some(v),
            _ => None,
        }
    }

    /// Static certificate parameter.
    #[must_use]
    pub fn static_certificate(&self, key: &str) -> Option<&Certificate> {
        match self.get_static(key)? {
            ParameterValue::Certificate(v) => Some(v),
            _ => None,
        }
    }

    /// Static criteria set parameter.
    #[must_use]
    pub fn static_criteria_set(&self, key: &str) -> Option<&CriteriaSet> {
        match self.get_static(key)? {
            ParameterValue::CriteriaSet(v) => Some(v),
            _ => None,
        }
    }

    /// Static trust engine parameter.
    #[must_use]
    pub fn static_trust_engine(&self, key: &str) -> Option<Arc<dyn SignatureTrustEngine>> {
        match self.get_static(key)? {
            ParameterValue::TrustEngine(v) => Some(Arc::clone(v)),
            _ => None,
        }
    }

    /// Static pre-validator parameter.
    #[must_use]
    pub fn static_prevalidator(&self, key: &str) -> Option<Arc<dyn SignaturePrevalidator>> {
        match self.get_static(key)? {
            ParameterValue::Prevalidator(v) => Some(Arc::clone(v)),
            _ => None,
        }
    }

    /// The subject confirmation recorded as confirmed, if any.
    #[must_use]
    pub fn confirmed_subject_confirmation(&self) -> Option<&SubjectConfirmation> {
        match self.get_dynamic(crate::params::CONFIRMED_SUBJECT_CONFIRMATION)? {
            ParameterValue::SubjectConfirmation(v) => Some(v),
            _ => None,
        }
    }

    /// The key info recorded as confirmed by holder-of-key, if any.
    #[must_use]
    pub fn confirmed_key_info(&self) -> Option<&KeyInfo> {
        match self.get_dynamic(crate::params::SC_HOK_CONFIRMED_KEYINFO)? {
            ParameterValue::KeyInfo(v) => Some(v),
            _ => None,
        }
    }
}
