//! SAML assertion validation error types.
//!
//! Validators report trust decisions through [`ValidationResult`](crate::ValidationResult);
//! the errors here describe conditions under which no decision could be made.
//! The pipeline converts them to `Indeterminate` at each call boundary.

use kc_cache::CacheError;
use thiserror::Error;

/// Result type for SAML validation operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// Errors raised while evaluating an assertion.
#[derive(Debug, Error)]
pub enum SamlError {
    /// A validator was handed a target it does not service.
    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),

    /// A static parameter could not be interpreted.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter key.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Key or certificate material could not be decoded.
    #[error("key material error: {0}")]
    KeyMaterial(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Replay cache failure.
    #[error("replay cache error: {0}")]
    Cache(#[from] CacheError),

    /// The assertion could not be processed at all.
    #[error("assertion processing error: {0}")]
    Processing(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}

impl From<serde_json::Error> for SamlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Processing(err.to_string())
    }
}

/// Trust engine evaluation failure.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// Credentials for the signer could not be resolved.
    #[error("credential resolution failed: {0}")]
    CredentialResolution(String),

    /// The criteria did not carry what the engine needs.
    #[error("insufficient criteria: {0}")]
    InsufficientCriteria(String),

    /// Signature verification could not be carried out.
    #[error("signature evaluation failed: {0}")]
    Evaluation(String),
}

/// Structural signature validation failure.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The signature does not conform to the SAML signature profile.
    #[error("signature profile violation: {0}")]
    Profile(String),

    /// The signature uses a disallowed algorithm.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = SamlError::InvalidParameter {
            name: "saml2.ClockSkew".to_string(),
            reason: "not a duration".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid parameter 'saml2.ClockSkew': not a duration"
        );

        let err: SamlError = CacheError::Connection("refused".to_string()).into();
        assert!(err.to_string().contains("refused"));

        let err = SignatureError::Profile("missing reference".to_string());
        assert!(err.to_string().contains("missing reference"));
    }

    #[test]
    fn base64_conversion() {
        use base64::Engine;
        let err: SamlError = base64::engine::general_purpose::STANDARD
            .decode("not base64!")
            .unwrap_err()
            .into();
        assert!(matches!(err, SamlError::Base64Decode(_)));
    }
}
