//! XML Signature support for assertion validation.
//!
//! The validators never verify signature math themselves. This module holds
//! the parsed `<ds:Signature>` model, the criteria handed to a trust engine,
//! and the collaborator traits the orchestrator delegates to:
//!
//! - [`SignaturePrevalidator`] checks the structure of a signature, typically
//!   against the SAML signature profile ([`SamlSignatureProfileValidator`]).
//! - [`SignatureTrustEngine`] decides whether the signature was produced by a
//!   trusted credential ([`ExplicitKeyTrustEngine`] is a simple implementation
//!   over a fixed set of trusted certificates).
//!
//! # Signing Algorithms
//!
//! - RSA-SHA256, RSA-SHA384, RSA-SHA512
//! - ECDSA-SHA256, ECDSA-SHA384, ECDSA-SHA512
//!
//! Legacy SHA-1 is recognized but rejected unless explicitly allowed.

mod criteria;
mod explicit_key;
mod profile;
mod trust;

pub use criteria::*;
pub use explicit_key::*;
pub use profile::*;
pub use trust::*;

use serde::{Deserialize, Serialize};

use crate::types::{
    canonicalization_algorithms, digest_algorithms, signature_algorithms, transform_algorithms,
    KeyInfo,
};

/// Signature algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    /// RSA with SHA-256 (recommended).
    #[default]
    RsaSha256,
    /// RSA with SHA-384.
    RsaSha384,
    /// RSA with SHA-512.
    RsaSha512,
    /// ECDSA with SHA-256.
    EcdsaSha256,
    /// ECDSA with SHA-384.
    EcdsaSha384,
    /// ECDSA with SHA-512.
    EcdsaSha512,
    /// Legacy RSA with SHA-1 (not recommended).
    RsaSha1,
}

impl SignatureAlgorithm {
    /// Returns the URI for this signature algorithm.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::RsaSha256 => signature_algorithms::RSA_SHA256,
            Self::RsaSha384 => signature_algorithms::RSA_SHA384,
            Self::RsaSha512 => signature_algorithms::RSA_SHA512,
            Self::EcdsaSha256 => signature_algorithms::ECDSA_SHA256,
            Self::EcdsaSha384 => signature_algorithms::ECDSA_SHA384,
            Self::EcdsaSha512 => signature_algorithms::ECDSA_SHA512,
            Self::RsaSha1 => signature_algorithms::RSA_SHA1,
        }
    }

    /// Parses a signature algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            signature_algorithms::RSA_SHA256 => Some(Self::RsaSha256),
            signature_algorithms::RSA_SHA384 => Some(Self::RsaSha384),
            signature_algorithms::RSA_SHA512 => Some(Self::RsaSha512),
            signature_algorithms::ECDSA_SHA256 => Some(Self::EcdsaSha256),
            signature_algorithms::ECDSA_SHA384 => Some(Self::EcdsaSha384),
            signature_algorithms::ECDSA_SHA512 => Some(Self::EcdsaSha512),
            signature_algorithms::RSA_SHA1 => Some(Self::RsaSha1),
            _ => None,
        }
    }

    /// Returns true if this algorithm uses a deprecated hash (SHA-1).
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        matches!(self, Self::RsaSha1)
    }
}

/// A `ds:Reference` inside `ds:SignedInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureReference {
    /// The reference URI (`#` followed by the signed element's ID, or empty).
    pub uri: String,

    /// Transform algorithm URIs, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<String>,

    /// Digest algorithm URI.
    pub digest_algorithm: String,

    /// The digest value (base64 encoded).
    pub digest_value: String,
}

/// Parsed `<ds:Signature>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// ID of the element that envelops this signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Signature algorithm URI.
    pub signature_algorithm: String,

    /// Canonicalization algorithm URI.
    pub canonicalization_algorithm: String,

    /// References in `ds:SignedInfo`.
    pub references: Vec<SignatureReference>,

    /// The signature value (base64 encoded).
    pub signature_value: String,

    /// Signing key information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_info: Option<KeyInfo>,

    /// Number of `ds:Object` children.
    #[serde(default)]
    pub object_count: usize,
}

impl Signature {
    /// Creates a profile-conformant enveloped signature over the element
    /// with the given ID.
    #[must_use]
    pub fn enveloped(
        parent_id: impl Into<String>,
        algorithm: SignatureAlgorithm,
        signature_value: impl Into<String>,
    ) -> Self {
        let parent_id = parent_id.into();
        Self {
            references: vec![SignatureReference {
                uri: format!("#{parent_id}"),
                transforms: vec![
                    transform_algorithms::ENVELOPED_SIGNATURE.to_string(),
                    canonicalization_algorithms::EXCLUSIVE_C14N.to_string(),
                ],
                digest_algorithm: digest_algorithms::SHA256.to_string(),
                digest_value: String::new(),
            }],
            parent_id: Some(parent_id),
            signature_algorithm: algorithm.uri().to_string(),
            canonicalization_algorithm: canonicalization_algorithms::EXCLUSIVE_C14N.to_string(),
            signature_value: signature_value.into(),
            key_info: None,
            object_count: 0,
        }
    }

    /// Sets the key info.
    #[must_use]
    pub fn with_key_info(mut self, key_info: KeyInfo) -> Self {
        self.key_info = Some(key_info);
        self
    }

    /// Parsed signature algorithm, if recognized.
    #[must_use]
    pub fn algorithm(&self) -> Option<SignatureAlgorithm> {
        SignatureAlgorithm::from_uri(&self.signature_algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_algorithm_uri_roundtrip() {
        for alg in [
            SignatureAlgorithm::RsaSha256,
            SignatureAlgorithm::RsaSha512,
            SignatureAlgorithm::EcdsaSha256,
            SignatureAlgorithm::RsaSha1,
        ] {
            assert_eq!(SignatureAlgorithm::from_uri(alg.uri()), Some(alg));
        }
        assert!(SignatureAlgorithm::RsaSha1.is_deprecated());
        assert!(!SignatureAlgorithm::EcdsaSha384.is_deprecated());
    }

    #[test]
    fn enveloped_signature_references_parent() {
        let signature = Signature::enveloped("_a1", SignatureAlgorithm::RsaSha256, "c2ln");
        assert_eq!(signature.references.len(), 1);
        assert_eq!(signature.references[0].uri, "#_a1");
        assert_eq!(signature.algorithm(), Some(SignatureAlgorithm::RsaSha256));
    }
}
