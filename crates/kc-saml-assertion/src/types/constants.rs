//! SAML 2.0 constants and URIs.
//!
//! Namespace URIs, qualified names of the elements and schema types the
//! validators service, name ID formats, authentication context classes, and
//! XML signature algorithm identifiers.

use super::QName;

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 delegation restriction condition namespace URI.
pub const DELEGATION_NS: &str = "urn:oasis:names:tc:SAML:2.0:conditions:delegation";

/// SAML version accepted by the validators.
pub const SAML_VERSION_20: &str = "2.0";

// ============================================================================
// Element names and schema types
// ============================================================================

/// Qualified names of SAML elements and schema types.
pub mod names {
    use super::{QName, DELEGATION_NS, SAML_NS};

    /// `saml:AudienceRestriction` element.
    #[must_use]
    pub fn audience_restriction() -> QName {
        QName::new(SAML_NS, "AudienceRestriction")
    }

    /// `saml:AudienceRestrictionType` schema type.
    #[must_use]
    pub fn audience_restriction_type() -> QName {
        QName::new(SAML_NS, "AudienceRestrictionType")
    }

    /// `saml:OneTimeUse` element.
    #[must_use]
    pub fn one_time_use() -> QName {
        QName::new(SAML_NS, "OneTimeUse")
    }

    /// `saml:ProxyRestriction` element.
    #[must_use]
    pub fn proxy_restriction() -> QName {
        QName::new(SAML_NS, "ProxyRestriction")
    }

    /// Generic `saml:Condition` element, specialized through `xsi:type`.
    #[must_use]
    pub fn condition() -> QName {
        QName::new(SAML_NS, "Condition")
    }

    /// `del:DelegationRestrictionType` schema type.
    #[must_use]
    pub fn delegation_restriction_type() -> QName {
        QName::new(DELEGATION_NS, "DelegationRestrictionType")
    }

    /// `saml:AuthnStatement` element.
    #[must_use]
    pub fn authn_statement() -> QName {
        QName::new(SAML_NS, "AuthnStatement")
    }

    /// `saml:AttributeStatement` element.
    #[must_use]
    pub fn attribute_statement() -> QName {
        QName::new(SAML_NS, "AttributeStatement")
    }

    /// `saml:KeyInfoConfirmationDataType` schema type.
    #[must_use]
    pub fn key_info_confirmation_data_type() -> QName {
        QName::new(SAML_NS, "KeyInfoConfirmationDataType")
    }
}

// ============================================================================
// Subject confirmation methods
// ============================================================================

/// Subject confirmation method URIs.
pub mod confirmation_methods {
    /// Bearer confirmation method.
    pub const BEARER: &str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

    /// Holder-of-key confirmation method.
    pub const HOLDER_OF_KEY: &str = "urn:oasis:names:tc:SAML:2.0:cm:holder-of-key";

    /// Sender-vouches confirmation method.
    pub const SENDER_VOUCHES: &str = "urn:oasis:names:tc:SAML:2.0:cm:sender-vouches";
}

// ============================================================================
// Name ID Formats
// ============================================================================

/// SAML Name ID formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameIdFormat {
    /// Unspecified name ID format.
    #[default]
    Unspecified,
    /// Email address format.
    Email,
    /// Entity identifier format.
    Entity,
    /// Persistent identifier format.
    Persistent,
    /// Transient identifier format.
    Transient,
}

impl NameIdFormat {
    /// Returns the URI for this name ID format.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified",
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Entity => "urn:oasis:names:tc:SAML:2.0:nameid-format:entity",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }
}

// ============================================================================
// Authentication Context Classes
// ============================================================================

/// SAML authentication context class references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthnContextClass {
    /// Unspecified authentication context.
    #[default]
    Unspecified,
    /// Password-based authentication.
    Password,
    /// Password protected transport (TLS + password).
    PasswordProtectedTransport,
    /// X.509 certificate authentication.
    X509,
    /// Kerberos authentication.
    Kerberos,
}

impl AuthnContextClass {
    /// Returns the URI for this authentication context class.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:2.0:ac:classes:unspecified",
            Self::Password => "urn:oasis:names:tc:SAML:2.0:ac:classes:Password",
            Self::PasswordProtectedTransport => {
                "urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport"
            }
            Self::X509 => "urn:oasis:names:tc:SAML:2.0:ac:classes:X509",
            Self::Kerberos => "urn:oasis:names:tc:SAML:2.0:ac:classes:Kerberos",
        }
    }

    /// Parses an authentication context class from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            "urn:oasis:names:tc:SAML:2.0:ac:classes:unspecified" => Some(Self::Unspecified),
            "urn:oasis:names:tc:SAML:2.0:ac:classes:Password" => Some(Self::Password),
            "urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport" => {
                Some(Self::PasswordProtectedTransport)
            }
            "urn:oasis:names:tc:SAML:2.0:ac:classes:X509" => Some(Self::X509),
            "urn:oasis:names:tc:SAML:2.0:ac:classes:Kerberos" => Some(Self::Kerberos),
            _ => None,
        }
    }
}

// ============================================================================
// Signature Algorithms
// ============================================================================

/// XML signature algorithms.
pub mod signature_algorithms {
    /// RSA-SHA256 signature algorithm.
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

    /// RSA-SHA384 signature algorithm.
    pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";

    /// RSA-SHA512 signature algorithm.
    pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";

    /// ECDSA-SHA256 signature algorithm.
    pub const ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";

    /// ECDSA-SHA384 signature algorithm.
    pub const ECDSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha384";

    /// ECDSA-SHA512 signature algorithm.
    pub const ECDSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha512";

    /// Legacy RSA-SHA1 signature algorithm (not recommended).
    pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
}

/// Digest algorithms.
pub mod digest_algorithms {
    /// SHA-256 digest algorithm.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

    /// SHA-512 digest algorithm.
    pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

    /// Legacy SHA-1 digest algorithm (not recommended).
    pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
}

/// Canonicalization algorithms.
pub mod canonicalization_algorithms {
    /// Exclusive C14N without comments.
    pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

    /// Exclusive C14N with comments.
    pub const EXCLUSIVE_C14N_WITH_COMMENTS: &str =
        "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";

    /// C14N without comments.
    pub const C14N: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";

    /// C14N with comments.
    pub const C14N_WITH_COMMENTS: &str =
        "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments";
}

/// Reference transform algorithms.
pub mod transform_algorithms {
    /// Enveloped signature transform.
    pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authn_context_class_roundtrip() {
        for class in [
            AuthnContextClass::Password,
            AuthnContextClass::PasswordProtectedTransport,
            AuthnContextClass::X509,
        ] {
            assert_eq!(AuthnContextClass::from_uri(class.uri()), Some(class));
        }
        assert_eq!(AuthnContextClass::from_uri("urn:unknown"), None);
    }

    #[test]
    fn element_and_type_names_differ() {
        assert_ne!(names::condition(), names::delegation_restriction_type());
        assert_eq!(names::audience_restriction().namespace, SAML_NS);
        assert_eq!(names::delegation_restriction_type().namespace, DELEGATION_NS);
    }
}
