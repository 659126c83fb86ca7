//! Assertion conditions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{names, NameId, QName};
use crate::validation::support;

/// `saml:Conditions` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conditions {
    /// Time before which the assertion is not valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<DateTime<Utc>>,

    /// Time at or after which the assertion is not valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// Condition children, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Conditions {
    /// Creates an empty conditions block without time bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates conditions valid from now for the given number of minutes.
    ///
    /// Windows beyond the representable range end at the range limit.
    #[must_use]
    pub fn with_validity(validity_minutes: i64) -> Self {
        let now = Utc::now();
        let validity = chrono::Duration::try_minutes(validity_minutes)
            .unwrap_or(if validity_minutes < 0 { chrono::Duration::MIN } else { chrono::Duration::MAX });
        Self {
            not_before: Some(now),
            not_on_or_after: Some(support::saturating_add(now, validity)),
            conditions: Vec::new(),
        }
    }

    /// Sets the NotBefore bound.
    #[must_use]
    pub fn with_not_before(mut self, instant: DateTime<Utc>) -> Self {
        self.not_before = Some(instant);
        self
    }

    /// Sets the NotOnOrAfter bound.
    #[must_use]
    pub fn with_not_on_or_after(mut self, instant: DateTime<Utc>) -> Self {
        self.not_on_or_after = Some(instant);
        self
    }

    /// Adds an audience restriction with a single audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::AudienceRestriction(AudienceRestriction {
                audiences: vec![audience.into()],
            }));
        self
    }

    /// Adds a one-time use condition.
    #[must_use]
    pub fn with_one_time_use(mut self) -> Self {
        self.conditions.push(Condition::OneTimeUse);
        self
    }

    /// Adds an arbitrary condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// A single condition child.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// `saml:AudienceRestriction`.
    AudienceRestriction(AudienceRestriction),
    /// `saml:OneTimeUse`.
    OneTimeUse,
    /// `saml:ProxyRestriction`.
    ProxyRestriction(ProxyRestriction),
    /// `saml:Condition` with `xsi:type="del:DelegationRestrictionType"`.
    DelegationRestriction(DelegationRestriction),
    /// Any other condition, known only by name.
    Other(OpaqueElement),
}

impl Condition {
    /// Qualified name of the element.
    #[must_use]
    pub fn element_name(&self) -> QName {
        match self {
            Self::AudienceRestriction(_) => names::audience_restriction(),
            Self::OneTimeUse => names::one_time_use(),
            Self::ProxyRestriction(_) => names::proxy_restriction(),
            Self::DelegationRestriction(_) => names::condition(),
            Self::Other(other) => other.element_name.clone(),
        }
    }

    /// Qualified name of the `xsi:type`, if any.
    #[must_use]
    pub fn schema_type(&self) -> Option<QName> {
        match self {
            Self::DelegationRestriction(_) => Some(names::delegation_restriction_type()),
            Self::Other(other) => other.schema_type.clone(),
            _ => None,
        }
    }

    /// Returns true if either the element name or the schema type is `name`.
    #[must_use]
    pub fn is_named(&self, name: &QName) -> bool {
        &self.element_name() == name || self.schema_type().as_ref() == Some(name)
    }
}

/// Audience restriction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudienceRestriction {
    /// Audience URIs.
    pub audiences: Vec<String>,
}

impl AudienceRestriction {
    /// Creates a restriction over the given audiences.
    #[must_use]
    pub fn new<I, S>(audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            audiences: audiences.into_iter().map(Into::into).collect(),
        }
    }
}

/// Proxy restriction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyRestriction {
    /// Maximum number of proxies allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// List of allowed proxy audiences.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
}

/// Delegation restriction condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelegationRestriction {
    /// Delegates, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delegates: Vec<Delegate>,
}

/// A delegate in a delegation chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delegate {
    /// Identifier of the delegate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_id: Option<NameId>,

    /// When the delegation took place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegation_instant: Option<DateTime<Utc>>,

    /// Confirmation method the delegate used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_method: Option<String>,
}

/// An element known only by its names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpaqueElement {
    /// Element name.
    pub element_name: QName,

    /// `xsi:type`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<QName>,
}

impl OpaqueElement {
    /// Creates an element with no schema type.
    #[must_use]
    pub fn new(element_name: QName) -> Self {
        Self {
            element_name,
            schema_type: None,
        }
    }

    /// Sets the schema type.
    #[must_use]
    pub fn with_schema_type(mut self, schema_type: QName) -> Self {
        self.schema_type = Some(schema_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_window_saturates() {
        let open = Conditions::with_validity(i64::MAX);
        assert_eq!(open.not_on_or_after, Some(DateTime::<Utc>::MAX_UTC));

        let closed = Conditions::with_validity(i64::MIN);
        assert_eq!(closed.not_on_or_after, Some(DateTime::<Utc>::MIN_UTC));

        let five = Conditions::with_validity(5);
        assert_eq!(
            five.not_on_or_after.zip(five.not_before).map(|(end, start)| end - start),
            Some(chrono::Duration::minutes(5))
        );
    }

    #[test]
    fn delegation_restriction_is_typed_condition() {
        let condition = Condition::DelegationRestriction(DelegationRestriction::default());
        assert_eq!(condition.element_name(), names::condition());
        assert_eq!(
            condition.schema_type(),
            Some(names::delegation_restriction_type())
        );
        assert!(condition.is_named(&names::delegation_restriction_type()));
        assert!(!condition.is_named(&names::one_time_use()));
    }

    #[test]
    fn builder_collects_children() {
        let conditions = Conditions::with_validity(5)
            .with_audience("https://sp.example.com")
            .with_one_time_use();
        assert_eq!(conditions.conditions.len(), 2);
        assert!(conditions.conditions[1].is_named(&names::one_time_use()));
    }
}
