//! Statement validators.

mod authn;

pub use authn::{AllowedAuthnContextClasses, AuthnContextValidator, AuthnStatementValidator};
