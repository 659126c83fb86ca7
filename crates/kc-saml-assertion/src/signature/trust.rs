//! Collaborators the orchestrator delegates signature decisions to.

use async_trait::async_trait;

use super::{CriteriaSet, Signature};
use crate::error::{SecurityError, SignatureError};
use crate::types::Certificate;

/// Decides whether a signature was produced by a trusted credential.
///
/// Credential resolution may involve I/O (metadata, key stores), so the
/// evaluation is async.
#[async_trait]
pub trait SignatureTrustEngine: Send + Sync {
    /// Evaluates `signature` against the credentials selected by `criteria`.
    ///
    /// Returns `Ok(false)` when the signature is not trusted and an error when
    /// no decision could be reached.
    async fn validate(
        &self,
        signature: &Signature,
        criteria: &CriteriaSet,
    ) -> Result<bool, SecurityError>;
}

/// Structural checks run before a signature reaches the trust engine.
pub trait SignaturePrevalidator: Send + Sync {
    /// Validates the structure of `signature`.
    fn validate(&self, signature: &Signature) -> Result<(), SignatureError>;
}

/// Cryptographic verification of a signature with a given certificate.
pub trait SignatureVerifier: Send + Sync {
    /// Returns true if `signature` verifies under the certificate's key.
    fn verify(&self, signature: &Signature, certificate: &Certificate)
        -> Result<bool, SecurityError>;
}
