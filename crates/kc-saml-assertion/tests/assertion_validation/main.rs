//! End-to-end assertion validation tests.
//!
//! These tests drive [`Saml2AssertionValidator`] through full assertions the
//! way a service provider would after parsing a SAML response.
//!
//! [`Saml2AssertionValidator`]: kc_saml_assertion::Saml2AssertionValidator

mod common;
mod holder_of_key;
mod replay;
mod signed;
mod web_sso;
