//! Common test utilities and fixtures.

use std::sync::Arc;

use chrono::{Duration, Utc};
use kc_cache::{MemoryReplayStorage, StorageReplayCache};
use kc_saml_assertion::config::{SubjectConfirmationSettings, ValidationSettings};
use kc_saml_assertion::{
    Assertion, AuthnContextClass, AuthnStatement, Conditions, NameId, Saml2AssertionValidator,
    Statement, Subject, SubjectConfirmation, SubjectConfirmationData,
};

pub const IDP: &str = "https://idp.example.com";
pub const SP: &str = "https://sp.example.com";
pub const ACS: &str = "https://sp.example.com/saml/acs";
pub const REQUEST_ID: &str = "_req-7f3a";

/// Self-signed P-256 certificate for `presenter-a.example.com`.
pub const CERT_A: &str = "MIIBmzCCAUGgAwIBAgIUY11dmgrE7+ZC4AjfGYCizV9Ev08wCgYIKoZIzj0EAwIwIjEgMB4GA1UEAwwXcHJlc2VudGVyLWEuZXhhbXBsZS5jb20wIBcNMjYxMDE1MDg0NTQyWhgPMjEyNjA5MjEwODQ1NDJaMCIxIDAeBgNVBAMMF3ByZXNlbnRlci1hLmV4YW1wbGUuY29tMFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEU+OraTxgKg18UzQ1FzPPEJTPi8qTAXgO209mI77dvw4wK+a0hd2r05jUlZULTyCZ+wGeSI8Be2fGFRWhVtqYqqNTMFEwHQYDVR0OBBYEFGPRt18ITykPAUWxwrvzL1tfQKodMB8GA1UdIwQYMBaAFGPRt18ITykPAUWxwrvzL1tfQKodMA8GA1UdEwEB/wQFMAMBAf8wCgYIKoZIzj0EAwIDSAAwRQIhAMLFbMeL7ybEsv9nZxFhQL+phnojJU62pnnwb39Ve5cCAiAwrwTm/wG2pzuLzuGiXTV6bwTKTAIe8yOHt55lViCQLQ==";

/// `SubjectPublicKeyInfo` of [`CERT_A`].
pub const SPKI_A: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEU+OraTxgKg18UzQ1FzPPEJTPi8qTAXgO209mI77dvw4wK+a0hd2r05jUlZULTyCZ+wGeSI8Be2fGFRWhVtqYqg==";

/// `SubjectPublicKeyInfo` of an unrelated key.
pub const SPKI_B: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEzpeaVhxra35HDMkdOnge5SSRZWcwXkwLFKx0vqrRP2QrYYauunA/e1+whSlQTyjHkGOcmQvDHjhFZXmbw9skMA==";

/// Installs a test subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kc_saml_assertion=debug,kc_cache=debug")
        .with_test_writer()
        .try_init();
}

/// Validator with every built-in validator and a fresh replay cache.
pub fn validator() -> Saml2AssertionValidator {
    init_tracing();
    Saml2AssertionValidator::with_defaults(Arc::new(StorageReplayCache::new(
        MemoryReplayStorage::new(),
    )))
}

/// Relying-party policy for unsigned test assertions.
pub fn settings() -> ValidationSettings {
    ValidationSettings {
        signature_required: false,
        valid_issuers: vec![IDP.to_string()],
        valid_audiences: vec![SP.to_string()],
        subject_confirmation: SubjectConfirmationSettings {
            valid_recipients: vec![ACS.to_string()],
            ..SubjectConfirmationSettings::default()
        },
        ..ValidationSettings::default()
    }
}

/// Assertion answering [`REQUEST_ID`] with a bearer confirmation.
pub fn web_sso_assertion() -> Assertion {
    Assertion::new(IDP)
        .with_subject(
            Subject::new(NameId::email("alice@example.com")).with_confirmation(
                SubjectConfirmation::bearer()
                    .with_data(SubjectConfirmationData::for_request(REQUEST_ID, ACS)),
            ),
        )
        .with_conditions(Conditions::with_validity(5).with_audience(SP))
        .with_statement(Statement::Authn(
            AuthnStatement::new(AuthnContextClass::PasswordProtectedTransport)
                .with_authn_instant(Utc::now() - Duration::minutes(1)),
        ))
}
