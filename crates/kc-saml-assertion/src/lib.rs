//! SAML 2.0 Assertion Validation for Keycloak Rust.
//!
//! This crate decides whether a parsed SAML 2.0 assertion can be trusted by a
//! relying party. It covers:
//!
//! - **Basic data** - version, issue instant freshness, issuer allow-list
//! - **Signature delegation** - profile pre-validation and a pluggable trust engine
//! - **Conditions** - time bounds, audience restriction, one-time use, delegation
//! - **Subject confirmation** - bearer, holder-of-key, sender-vouches
//! - **Statements** - authentication instant, locality and context
//!
//! Every validation yields a [`ValidationResult`]: `Valid`, `Invalid` (the
//! assertion is untrustworthy) or `Indeterminate` (no decision could be made,
//! usually because of missing configuration or a collaborator failure).
//!
//! # Architecture
//!
//! - [`types`] - Strongly typed assertion model
//! - [`context`] - Per-call parameters, outputs and failure message
//! - [`params`] - Well-known context parameter names
//! - [`signature`] - Signature model, criteria and trust collaborators
//! - [`validation`] - The orchestrator and the concrete validators
//! - [`config`] - Serde-loadable settings and the context builder
//! - [`error`] - Error types for validator failures
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kc_cache::{MemoryReplayStorage, StorageReplayCache};
//! use kc_saml_assertion::{config::ValidationSettings, Saml2AssertionValidator};
//!
//! let cache = Arc::new(StorageReplayCache::new(MemoryReplayStorage::new()));
//! let validator = Saml2AssertionValidator::with_defaults(cache).with_trust_engine(engine);
//!
//! let mut context = settings.context().in_response_to(&request_id).build();
//! let result = validator.validate(&assertion, &mut context).await;
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Profiles](https://docs.oasis-open.org/security/saml/v2.0/saml-profiles-2.0-os.pdf)
//! - [SAML V2.0 Condition for Delegation Restriction](https://docs.oasis-open.org/security/saml/Post2.0/sstc-saml-delegation.html)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod params;
pub mod result;
pub mod signature;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::{ValidationContextBuilder, ValidationSettings};
pub use context::{ParameterValue, ValidationContext};
pub use error::{SamlError, SamlResult, SecurityError, SignatureError};
pub use result::ValidationResult;
pub use types::*;
pub use validation::{
    AssertionValidator, ConditionValidator, Saml2AssertionValidator, StatementValidator,
    SubjectConfirmationValidator,
};
