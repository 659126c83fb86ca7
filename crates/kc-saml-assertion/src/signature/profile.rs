//! SAML signature profile checks.
//!
//! An assertion signature must be an enveloped signature with a single
//! reference to the assertion itself, only the enveloped-signature and
//! exclusive canonicalization transforms, and no `ds:Object` content.

use super::{Signature, SignaturePrevalidator};
use crate::error::SignatureError;
use crate::types::{canonicalization_algorithms, transform_algorithms};

/// Validates signatures against the SAML 2.0 XML signature profile.
#[derive(Debug, Clone, Default)]
pub struct SamlSignatureProfileValidator {
    allow_sha1: bool,
}

impl SamlSignatureProfileValidator {
    /// Creates a validator rejecting SHA-1 signatures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows SHA-1 based signatures (not recommended).
    #[must_use]
    pub const fn allow_sha1(mut self, allow: bool) -> Self {
        self.allow_sha1 = allow;
        self
    }

    fn validate_algorithm(&self, signature: &Signature) -> Result<(), SignatureError> {
        let algorithm = signature.algorithm().ok_or_else(|| {
            SignatureError::UnsupportedAlgorithm(signature.signature_algorithm.clone())
        })?;
        if algorithm.is_deprecated() && !self.allow_sha1 {
            return Err(SignatureError::UnsupportedAlgorithm(
                "SHA-1 signatures are not allowed".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_reference_uri(uri: &str, parent_id: Option<&str>) -> Result<(), SignatureError> {
        if uri.is_empty() {
            return Ok(());
        }
        let Some(referenced) = uri.strip_prefix('#') else {
            return Err(SignatureError::Profile(format!(
                "reference URI '{uri}' is not a same-document reference"
            )));
        };
        match parent_id {
            Some(id) if !id.is_empty() && id == referenced => Ok(()),
            Some(id) if !id.is_empty() => Err(SignatureError::Profile(format!(
                "reference URI '{uri}' does not point to the signed element '{id}'"
            ))),
            _ => Err(SignatureError::Profile(
                "signed element has no ID to reference".to_string(),
            )),
        }
    }

    fn validate_transforms(transforms: &[String]) -> Result<(), SignatureError> {
        if transforms.len() > 2 {
            return Err(SignatureError::Profile(format!(
                "reference has {} transforms, at most 2 are allowed",
                transforms.len()
            )));
        }

        let mut saw_enveloped = false;
        for transform in transforms {
            match transform.as_str() {
                transform_algorithms::ENVELOPED_SIGNATURE => saw_enveloped = true,
                canonicalization_algorithms::EXCLUSIVE_C14N
                | canonicalization_algorithms::EXCLUSIVE_C14N_WITH_COMMENTS => {}
                other => {
                    return Err(SignatureError::Profile(format!(
                        "transform '{other}' is not allowed"
                    )))
                }
            }
        }

        if !saw_enveloped {
            return Err(SignatureError::Profile(
                "enveloped signature transform is missing".to_string(),
            ));
        }
        Ok(())
    }
}

impl SignaturePrevalidator for SamlSignatureProfileValidator {
    fn validate(&self, signature: &Signature) -> Result<(), SignatureError> {
        self.validate_algorithm(signature)?;

        if signature.signature_value.trim().is_empty() {
            return Err(SignatureError::Profile("signature value is empty".to_string()));
        }

        let [reference] = signature.references.as_slice() else {
            return Err(SignatureError::Profile(format!(
                "signature must contain exactly one reference, found {}",
                signature.references.len()
            )));
        };

        Self::validate_reference_uri(&reference.uri, signature.parent_id.as_deref())?;
        Self::validate_transforms(&reference.transforms)?;

        if signature.object_count > 0 {
            return Err(SignatureError::Profile(
                "signature contains ds:Object content".to_string(),
            ));
        }

        Ok(())
    }
}
