//! Validation settings.
//!
//! [`ValidationSettings`] holds the relying-party policy that rarely changes
//! between requests and can be loaded from JSON. A [`ValidationContextBuilder`]
//! combines it with per-request inputs into a [`ValidationContext`].

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::context::{ParameterValue, ValidationContext};
use crate::error::SamlResult;
use crate::params;
use crate::signature::{CriteriaSet, SignaturePrevalidator, SignatureTrustEngine};
use crate::types::{Certificate, PublicKey, QName};
use crate::validation::support::{
    DEFAULT_CLOCK_SKEW_MINUTES, DEFAULT_LIFETIME_MINUTES, MAX_DURATION_DAYS,
};

/// Relying-party validation policy.
///
/// Durations are expressed in seconds. Empty lists are treated as "not
/// configured" and leave the matching parameter unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Allowed clock skew.
    pub clock_skew_secs: u64,
    /// Assertion lifetime after its issue instant.
    pub lifetime_secs: u64,
    /// Whether unsigned assertions are rejected.
    pub signature_required: bool,
    /// Acceptable issuers.
    pub valid_issuers: Vec<String>,
    /// Acceptable audiences.
    pub valid_audiences: Vec<String>,
    /// Conditions that must be present.
    pub required_conditions: Vec<QName>,
    /// One-time use replay window. Unset uses the validator default.
    pub one_time_use_expiry_secs: Option<u64>,
    /// Subject confirmation policy.
    pub subject_confirmation: SubjectConfirmationSettings,
    /// Authentication statement policy.
    pub authn_statement: AuthnStatementSettings,
}

/// Subject confirmation data policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfirmationSettings {
    /// Whether NotBefore must be present.
    pub not_before_required: bool,
    /// Whether NotOnOrAfter must be present.
    pub not_on_or_after_required: bool,
    /// Whether Recipient must be present.
    pub recipient_required: bool,
    /// Acceptable recipient endpoints.
    pub valid_recipients: Vec<String>,
    /// Whether Address must be present.
    pub address_required: bool,
    /// Whether a present Address is checked.
    pub check_address: bool,
    /// Acceptable presenter addresses.
    pub valid_addresses: Vec<IpAddr>,
    /// Whether InResponseTo must be present.
    pub in_response_to_required: bool,
    /// Whether InResponseTo is skipped entirely.
    pub in_response_to_ignored: bool,
}

/// Authentication statement policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthnStatementSettings {
    /// Whether the SubjectLocality address is checked.
    pub check_address: bool,
    /// Acceptable SubjectLocality addresses.
    pub valid_addresses: Vec<IpAddr>,
    /// Maximum time since authentication.
    pub max_age_secs: Option<u64>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            clock_skew_secs: minutes_as_secs(DEFAULT_CLOCK_SKEW_MINUTES),
            lifetime_secs: minutes_as_secs(DEFAULT_LIFETIME_MINUTES),
            signature_required: true,
            valid_issuers: Vec::new(),
            valid_audiences: Vec::new(),
            required_conditions: Vec::new(),
            one_time_use_expiry_secs: None,
            subject_confirmation: SubjectConfirmationSettings::default(),
            authn_statement: AuthnStatementSettings::default(),
        }
    }
}

impl Default for SubjectConfirmationSettings {
    fn default() -> Self {
        Self {
            not_before_required: false,
            not_on_or_after_required: false,
            recipient_required: false,
            valid_recipients: Vec::new(),
            address_required: false,
            check_address: true,
            valid_addresses: Vec::new(),
            in_response_to_required: false,
            in_response_to_ignored: false,
        }
    }
}

impl Default for AuthnStatementSettings {
    fn default() -> Self {
        Self {
            check_address: true,
            valid_addresses: Vec::new(),
            max_age_secs: None,
        }
    }
}

const fn minutes_as_secs(minutes: i64) -> u64 {
    minutes.unsigned_abs() * 60
}

/// Converts seconds, clamped to [`MAX_DURATION_DAYS`].
fn seconds(secs: u64) -> Duration {
    let max_secs = MAX_DURATION_DAYS * 86_400;
    Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX).min(max_secs))
}

impl ValidationSettings {
    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SamlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Starts a context for one validation.
    #[must_use]
    pub fn context(&self) -> ValidationContextBuilder<'_> {
        ValidationContextBuilder::new(self)
    }
}

/// Builds a [`ValidationContext`] from settings and per-request inputs.
///
/// ```
/// use kc_saml_assertion::config::ValidationSettings;
///
/// let settings = ValidationSettings {
///     valid_audiences: vec!["https://sp.example.com".to_string()],
///     ..ValidationSettings::default()
/// };
/// let context = settings.context().in_response_to("_req1").build();
/// assert!(context.static_string_set(kc_saml_assertion::params::COND_VALID_AUDIENCES).is_some());
/// ```
#[derive(Debug)]
pub struct ValidationContextBuilder<'a> {
    settings: &'a ValidationSettings,
    in_response_to: Vec<String>,
    context: ValidationContext,
}

impl<'a> ValidationContextBuilder<'a> {
    /// Creates a builder over `settings`.
    #[must_use]
    pub fn new(settings: &'a ValidationSettings) -> Self {
        Self {
            settings,
            in_response_to: Vec::new(),
            context: ValidationContext::default(),
        }
    }

    /// Adds an outstanding request ID the response may answer.
    #[must_use]
    pub fn in_response_to(mut self, request_id: impl Into<String>) -> Self {
        self.in_response_to.push(request_id.into());
        self
    }

    /// Sets the key presented by the attesting entity.
    #[must_use]
    pub fn presenter_key(self, key: PublicKey) -> Self {
        self.parameter(params::SC_HOK_PRESENTER_KEY, key)
    }

    /// Sets the certificate presented by the attesting entity.
    #[must_use]
    pub fn presenter_certificate(self, certificate: Certificate) -> Self {
        self.parameter(params::SC_HOK_PRESENTER_CERT, certificate)
    }

    /// Sets additional signature validation criteria.
    #[must_use]
    pub fn criteria(self, criteria: CriteriaSet) -> Self {
        self.parameter(params::SIGNATURE_VALIDATION_CRITERIA_SET, criteria)
    }

    /// Overrides the validator's signature trust engine for this call.
    #[must_use]
    pub fn trust_engine(self, engine: Arc<dyn SignatureTrustEngine>) -> Self {
        self.parameter(params::SIGNATURE_VALIDATION_TRUST_ENGINE, engine)
    }

    /// Overrides the validator's signature pre-validator for this call.
    #[must_use]
    pub fn prevalidator(self, prevalidator: Arc<dyn SignaturePrevalidator>) -> Self {
        self.parameter(params::SIGNATURE_VALIDATION_PREVALIDATOR, prevalidator)
    }

    /// Sets an arbitrary static parameter. Applied after the settings, so it
    /// takes precedence.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.context = self.context.with_static(key, value);
        self
    }

    /// Produces the context.
    #[must_use]
    pub fn build(self) -> ValidationContext {
        let settings = self.settings;
        let sc = &settings.subject_confirmation;
        let authn = &settings.authn_statement;

        let mut context = ValidationContext::default()
            .with_static(params::CLOCK_SKEW, seconds(settings.clock_skew_secs))
            .with_static(params::LIFETIME, seconds(settings.lifetime_secs))
            .with_static(params::SIGNATURE_REQUIRED, settings.signature_required)
            .with_static(params::SC_NOT_BEFORE_REQUIRED, sc.not_before_required)
            .with_static(params::SC_NOT_ON_OR_AFTER_REQUIRED, sc.not_on_or_after_required)
            .with_static(params::SC_RECIPIENT_REQUIRED, sc.recipient_required)
            .with_static(params::SC_ADDRESS_REQUIRED, sc.address_required)
            .with_static(params::SC_CHECK_ADDRESS, sc.check_address)
            .with_static(params::SC_IN_RESPONSE_TO_REQUIRED, sc.in_response_to_required)
            .with_static(params::SC_IN_RESPONSE_TO_IGNORED, sc.in_response_to_ignored)
            .with_static(params::STMT_AUTHN_CHECK_ADDRESS, authn.check_address);

        let sets: [(&str, &[String]); 3] = [
            (params::VALID_ISSUERS, settings.valid_issuers.as_slice()),
            (params::COND_VALID_AUDIENCES, settings.valid_audiences.as_slice()),
            (params::SC_VALID_RECIPIENTS, sc.valid_recipients.as_slice()),
        ];
        for (key, values) in sets {
            if !values.is_empty() {
                context = context.with_static(key, ParameterValue::string_set(values.iter().cloned()));
            }
        }

        let addresses: [(&str, &[IpAddr]); 2] = [
            (params::SC_VALID_ADDRESSES, sc.valid_addresses.as_slice()),
            (params::STMT_AUTHN_VALID_ADDRESSES, authn.valid_addresses.as_slice()),
        ];
        for (key, values) in addresses {
            if !values.is_empty() {
                let set: HashSet<IpAddr> = values.iter().copied().collect();
                context = context.with_static(key, set);
            }
        }

        if !settings.required_conditions.is_empty() {
            let set: HashSet<QName> = settings.required_conditions.iter().cloned().collect();
            context = context.with_static(params::COND_REQUIRED_CONDITIONS, set);
        }

        if let Some(secs) = settings.one_time_use_expiry_secs {
            context = context.with_static(params::COND_ONE_TIME_USE_EXPIRES, seconds(secs));
        }
        if let Some(secs) = authn.max_age_secs {
            context = context.with_static(params::STMT_AUTHN_MAX_TIME, seconds(secs));
        }

        if !self.in_response_to.is_empty() {
            context = context.with_static(
                params::SC_VALID_IN_RESPONSE_TO,
                ParameterValue::string_set(self.in_response_to),
            );
        }

        for (key, value) in self.context.static_parameters() {
            context = context.with_static(key.clone(), value.clone());
        }

        tracing::trace!(parameters = context.static_parameters().len(), "Built validation context");
        context
    }
}
