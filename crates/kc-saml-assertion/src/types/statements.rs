//! Assertion statements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{names, AuthnContextClass, OpaqueElement, QName};

/// A statement carried by an assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// `saml:AuthnStatement`.
    Authn(AuthnStatement),
    /// `saml:AttributeStatement`.
    Attribute(AttributeStatement),
    /// Any other statement, known only by name.
    Other(OpaqueElement),
}

impl Statement {
    /// Qualified name of the element.
    #[must_use]
    pub fn element_name(&self) -> QName {
        match self {
            Self::Authn(_) => names::authn_statement(),
            Self::Attribute(_) => names::attribute_statement(),
            Self::Other(other) => other.element_name.clone(),
        }
    }

    /// Qualified name of the `xsi:type`, if any.
    #[must_use]
    pub fn schema_type(&self) -> Option<QName> {
        match self {
            Self::Other(other) => other.schema_type.clone(),
            _ => None,
        }
    }
}

/// Authentication statement.
///
/// Describes the act of authentication performed by the subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthnStatement {
    /// The time of authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_instant: Option<DateTime<Utc>>,

    /// The session index (for session management).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_index: Option<String>,

    /// Time at which the session ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_not_on_or_after: Option<DateTime<Utc>>,

    /// The authentication context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_context: Option<AuthnContext>,

    /// The subject locality information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_locality: Option<SubjectLocality>,
}

impl AuthnStatement {
    /// Creates a statement for an authentication that happened now.
    #[must_use]
    pub fn new(context_class: AuthnContextClass) -> Self {
        Self {
            authn_instant: Some(Utc::now()),
            session_index: Some(format!("_session{}", uuid::Uuid::new_v4())),
            session_not_on_or_after: None,
            authn_context: Some(AuthnContext::class_ref(context_class)),
            subject_locality: None,
        }
    }

    /// Sets the authentication instant.
    #[must_use]
    pub fn with_authn_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.authn_instant = Some(instant);
        self
    }

    /// Sets the subject locality address.
    #[must_use]
    pub fn with_locality(mut self, address: impl Into<String>) -> Self {
        self.subject_locality = Some(SubjectLocality {
            address: Some(address.into()),
            dns_name: None,
        });
        self
    }
}

/// Authentication context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthnContext {
    /// Authentication context class reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_context_class_ref: Option<String>,

    /// Authentication context declaration reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authn_context_decl_ref: Option<String>,

    /// Authenticating authorities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authenticating_authorities: Vec<String>,
}

impl AuthnContext {
    /// Creates an authentication context with a class reference.
    #[must_use]
    pub fn class_ref(class: AuthnContextClass) -> Self {
        Self {
            authn_context_class_ref: Some(class.uri().to_string()),
            authn_context_decl_ref: None,
            authenticating_authorities: Vec::new(),
        }
    }
}

/// Subject locality information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectLocality {
    /// IP address of the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// DNS name of the system from which the subject authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
}

/// Attribute statement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeStatement {
    /// List of attributes.
    pub attributes: Vec<Attribute>,
}

/// SAML Attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    /// The attribute name (typically a URI).
    pub name: String,

    /// The format of the attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_format: Option<String>,

    /// The attribute values.
    pub values: Vec<String>,
}

impl Attribute {
    /// Creates a new attribute with a single value.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_format: None,
            values: vec![value.into()],
        }
    }
}
