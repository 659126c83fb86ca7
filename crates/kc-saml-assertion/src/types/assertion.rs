//! SAML Assertion types.
//!
//! Assertions contain statements about a subject made by an issuer. The model
//! is what the XML layer hands to the validators: every field the validators
//! read is present, already decoded, and optional where the schema allows it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    confirmation_methods, names, Conditions, KeyInfo, NameId, QName, Statement, SAML_VERSION_20,
};
use crate::signature::Signature;

/// SAML Assertion.
///
/// A package of information that supplies one or more statements made
/// by a SAML authority (the issuer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    /// Unique identifier for this assertion.
    pub id: String,

    /// Version of the SAML protocol.
    #[serde(default = "default_version")]
    pub version: String,

    /// Timestamp when this assertion was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_instant: Option<DateTime<Utc>>,

    /// The entity ID of the issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Enveloped signature, if the assertion is signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,

    /// The subject of this assertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,

    /// Conditions that must be evaluated for the assertion to be valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    /// Statements, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<Statement>,
}

fn default_version() -> String {
    SAML_VERSION_20.to_string()
}

impl Assertion {
    /// Creates a new assertion issued now.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            id: format!("_id{}", uuid::Uuid::new_v4()),
            version: default_version(),
            issue_instant: Some(Utc::now()),
            issuer: Some(issuer.into()),
            signature: None,
            subject: None,
            conditions: None,
            statements: Vec::new(),
        }
    }

    /// Creates a new assertion with a custom ID.
    #[must_use]
    pub fn with_id(id: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::new(issuer)
        }
    }

    /// Sets the issue instant.
    #[must_use]
    pub fn with_issue_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.issue_instant = Some(instant);
        self
    }

    /// Sets the signature.
    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Sets the conditions.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Adds a statement.
    #[must_use]
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Returns true if the assertion carries a signature.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Issuer with surrounding whitespace removed, if non-empty.
    #[must_use]
    pub fn trimmed_issuer(&self) -> Option<&str> {
        self.issuer
            .as_deref()
            .map(str::trim)
            .filter(|issuer| !issuer.is_empty())
    }
}

/// Subject of an assertion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subject {
    /// The name identifier for the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id: Option<NameId>,

    /// Subject confirmations, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_confirmations: Vec<SubjectConfirmation>,
}

impl Subject {
    /// Creates a new subject with a name ID.
    #[must_use]
    pub fn new(name_id: NameId) -> Self {
        Self {
            name_id: Some(name_id),
            subject_confirmations: Vec::new(),
        }
    }

    /// Adds a subject confirmation.
    #[must_use]
    pub fn with_confirmation(mut self, confirmation: SubjectConfirmation) -> Self {
        self.subject_confirmations.push(confirmation);
        self
    }
}

/// Subject confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectConfirmation {
    /// The confirmation method URI.
    pub method: String,

    /// Identifier of the confirming entity, if it differs from the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id: Option<NameId>,

    /// Additional confirmation data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_confirmation_data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    /// Creates a confirmation with the given method.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            name_id: None,
            subject_confirmation_data: None,
        }
    }

    /// Creates a bearer confirmation.
    #[must_use]
    pub fn bearer() -> Self {
        Self::new(confirmation_methods::BEARER)
    }

    /// Creates a holder-of-key confirmation.
    #[must_use]
    pub fn holder_of_key() -> Self {
        Self::new(confirmation_methods::HOLDER_OF_KEY)
    }

    /// Creates a sender-vouches confirmation.
    #[must_use]
    pub fn sender_vouches() -> Self {
        Self::new(confirmation_methods::SENDER_VOUCHES)
    }

    /// Sets the confirmation data.
    #[must_use]
    pub fn with_data(mut self, data: SubjectConfirmationData) -> Self {
        self.subject_confirmation_data = Some(data);
        self
    }
}

/// Subject confirmation data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectConfirmationData {
    /// Time before which the subject cannot be confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,

    /// Time at or after which the subject can no longer be confirmed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// The location to which the assertion can be presented.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    /// The request ID that this assertion responds to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,

    /// Network address of the presenter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// `xsi:type` of the element, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<QName>,

    /// `ds:KeyInfo` children of key-info confirmation data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_infos: Vec<KeyInfo>,
}

impl SubjectConfirmationData {
    /// Creates empty confirmation data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates confirmation data typed as `KeyInfoConfirmationDataType`.
    #[must_use]
    pub fn key_info(key_infos: Vec<KeyInfo>) -> Self {
        Self {
            schema_type: Some(names::key_info_confirmation_data_type()),
            key_infos,
            ..Self::default()
        }
    }

    /// Creates confirmation data for a request.
    #[must_use]
    pub fn for_request(request_id: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            in_response_to: Some(request_id.into()),
            recipient: Some(recipient.into()),
            not_on_or_after: Some(Utc::now() + chrono::Duration::minutes(5)),
            ..Self::default()
        }
    }

    /// Sets the presenter address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
