//! Key material carried by assertions and presented by callers.
//!
//! Public keys are held as DER-encoded `SubjectPublicKeyInfo` and certificates
//! as DER-encoded X.509. Two keys (or two certificates) are equal when their
//! encodings are byte-identical.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};

/// A public key as DER-encoded `SubjectPublicKeyInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    /// DER bytes of the key.
    #[serde(with = "der_base64")]
    pub der: Vec<u8>,
}

impl PublicKey {
    /// Wraps DER-encoded key bytes.
    #[must_use]
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    /// Decodes a base64 `SubjectPublicKeyInfo`, ignoring embedded whitespace.
    pub fn from_base64(encoded: &str) -> SamlResult<Self> {
        Ok(Self::from_der(decode_base64(encoded)?))
    }
}

/// An X.509 certificate in DER form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certificate {
    /// DER bytes of the certificate.
    #[serde(with = "der_base64")]
    pub der: Vec<u8>,
}

impl Certificate {
    /// Wraps DER-encoded certificate bytes.
    #[must_use]
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    /// Decodes a base64 certificate as found in `ds:X509Certificate`.
    pub fn from_base64(encoded: &str) -> SamlResult<Self> {
        Ok(Self::from_der(decode_base64(encoded)?))
    }

    /// Extracts the certificate's public key.
    pub fn public_key(&self) -> SamlResult<PublicKey> {
        use x509_parser::prelude::{FromDer, X509Certificate};

        let (_, cert) = X509Certificate::from_der(&self.der)
            .map_err(|e| SamlError::KeyMaterial(format!("failed to parse certificate: {e}")))?;

        Ok(PublicKey::from_der(cert.public_key().raw))
    }
}

/// `ds:X509Data` content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct X509Data {
    /// Base64-encoded `ds:X509Certificate` values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<String>,
}

/// `ds:KeyInfo` element.
///
/// Key values are modelled after the XML layer resolved them to public keys.
/// DER-encoded key values and certificates stay in their base64 wire form and
/// are decoded on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// Optional `Id` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Resolved `ds:KeyValue` children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_values: Vec<PublicKey>,

    /// Base64 `dsig11:DEREncodedKeyValue` children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub der_encoded_key_values: Vec<String>,

    /// `ds:X509Data` children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x509_data: Vec<X509Data>,
}

impl KeyInfo {
    /// Creates an empty key info.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key value.
    #[must_use]
    pub fn with_key_value(mut self, key: PublicKey) -> Self {
        self.key_values.push(key);
        self
    }

    /// Adds a base64 DER-encoded key value.
    #[must_use]
    pub fn with_der_encoded_key_value(mut self, encoded: impl Into<String>) -> Self {
        self.der_encoded_key_values.push(encoded.into());
        self
    }

    /// Adds an `X509Data` holding a single base64 certificate.
    #[must_use]
    pub fn with_certificate(mut self, encoded: impl Into<String>) -> Self {
        self.x509_data.push(X509Data {
            certificates: vec![encoded.into()],
        });
        self
    }
}

fn decode_base64(encoded: &str) -> SamlResult<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

mod der_base64 {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CERT_A, CERT_B, SPKI_A};

    #[test]
    fn certificate_public_key_matches_spki() {
        let cert = Certificate::from_base64(CERT_A).unwrap();
        let key = PublicKey::from_base64(SPKI_A).unwrap();
        assert_eq!(cert.public_key().unwrap(), key);

        let other = Certificate::from_base64(CERT_B).unwrap();
        assert_ne!(other.public_key().unwrap(), key);
    }

    #[test]
    fn base64_with_line_breaks_is_accepted() {
        let wrapped: String = SPKI_A
            .as_bytes()
            .chunks(20)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(
            PublicKey::from_base64(&wrapped).unwrap(),
            PublicKey::from_base64(SPKI_A).unwrap()
        );
    }

    #[test]
    fn garbage_certificate_is_rejected() {
        let cert = Certificate::from_der(vec![0x30, 0x01, 0x00]);
        assert!(matches!(cert.public_key(), Err(SamlError::KeyMaterial(_))));
        assert!(PublicKey::from_base64("%%%").is_err());
    }

    #[test]
    fn serializes_as_base64() {
        let key = PublicKey::from_base64(SPKI_A).unwrap();
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["der"], SPKI_A);
    }
}
