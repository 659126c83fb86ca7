//! Trust engine over explicitly configured certificates.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;

use super::{CriteriaSet, Signature, SignatureTrustEngine, SignatureVerifier, UsageType};
use crate::error::{SamlError, SamlResult, SecurityError};
use crate::types::Certificate;

/// Trust engine holding a fixed set of trusted certificates per entity.
///
/// The entity is taken from the [`Criterion::EntityId`](super::Criterion)
/// criterion. Verification math is delegated to a [`SignatureVerifier`].
pub struct ExplicitKeyTrustEngine {
    trusted: HashMap<String, Vec<Certificate>>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl ExplicitKeyTrustEngine {
    /// Creates an engine with no trusted certificates.
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self {
            trusted: HashMap::new(),
            verifier,
        }
    }

    /// Trusts a certificate for the given entity.
    #[must_use]
    pub fn with_certificate(mut self, entity_id: impl Into<String>, cert: Certificate) -> Self {
        self.trusted.entry(entity_id.into()).or_default().push(cert);
        self
    }

    /// Trusts PEM-encoded certificates for the given entity.
    pub fn with_pem_certificates(
        mut self,
        entity_id: impl Into<String>,
        certificates_pem: &[&str],
    ) -> SamlResult<Self> {
        let entity_id = entity_id.into();
        for pem in certificates_pem {
            let der = pem_to_der(pem, "CERTIFICATE")
                .ok_or_else(|| SamlError::KeyMaterial("invalid certificate PEM".to_string()))?;
            self = self.with_certificate(entity_id.clone(), Certificate::from_der(der));
        }
        Ok(self)
    }

    /// Orders trusted certificates so any the signature embeds come first.
    fn candidates<'a>(signature: &Signature, trusted: &'a [Certificate]) -> Vec<&'a Certificate> {
        let embedded: Vec<Certificate> = signature
            .key_info
            .iter()
            .flat_map(|ki| ki.x509_data.iter())
            .flat_map(|data| data.certificates.iter())
            .filter_map(|encoded| Certificate::from_base64(encoded).ok())
            .collect();

        let (mut first, rest): (Vec<_>, Vec<_>) =
            trusted.iter().partition(|cert| embedded.contains(*cert));
        first.extend(rest);
        first
    }
}

impl std::fmt::Debug for ExplicitKeyTrustEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplicitKeyTrustEngine")
            .field("entities", &self.trusted.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SignatureTrustEngine for ExplicitKeyTrustEngine {
    async fn validate(
        &self,
        signature: &Signature,
        criteria: &CriteriaSet,
    ) -> Result<bool, SecurityError> {
        let entity_id = criteria.entity_id().ok_or_else(|| {
            SecurityError::InsufficientCriteria("entity ID criterion is required".to_string())
        })?;

        if matches!(criteria.usage(), Some(UsageType::Encryption)) {
            tracing::debug!(entity_id, "Encryption credentials cannot verify signatures");
            return Ok(false);
        }

        let Some(trusted) = self.trusted.get(entity_id) else {
            tracing::debug!(entity_id, "No trusted certificates for entity");
            return Ok(false);
        };

        // Try each trusted certificate
        let mut last_error = None;
        for cert in Self::candidates(signature, trusted) {
            match self.verifier.verify(signature, cert) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!(entity_id, error = %e, "Signature verification error");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(false),
        }
    }
}

/// Extracts DER data from a PEM string.
fn pem_to_der(pem: &str, label: &str) -> Option<Vec<u8>> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    let start = pem.find(&begin)? + begin.len();
    let end_pos = pem.find(&end)?;
    if end_pos < start {
        return None;
    }

    let body: String = pem[start..end_pos]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD.decode(body).ok()
}
