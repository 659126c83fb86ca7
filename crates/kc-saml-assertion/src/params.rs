//! Validation context parameter names.
//!
//! Static parameters are supplied by the caller before validation; dynamic
//! parameters are written by validators as outputs. Every key is namespaced
//! under `saml2`, with sub-prefixes for subject confirmation, conditions and
//! statements.

/// Prefix of all parameter names.
pub const STANDARD_PREFIX: &str = "saml2";

/// Prefix of subject confirmation parameters.
pub const SC_PREFIX: &str = "saml2.SubjectConfirmation";

/// Prefix of condition parameters.
pub const COND_PREFIX: &str = "saml2.Conditions";

/// Prefix of statement parameters.
pub const STMT_PREFIX: &str = "saml2.Statement";

// ============================================================================
// Assertion
// ============================================================================

/// Allowed clock skew (duration). Defaults to five minutes.
pub const CLOCK_SKEW: &str = "saml2.ClockSkew";

/// Assertion lifetime after its issue instant (duration). Defaults to five minutes.
pub const LIFETIME: &str = "saml2.Lifetime";

/// Dynamic: the subject confirmation that was confirmed.
pub const CONFIRMED_SUBJECT_CONFIRMATION: &str = "saml2.ConfirmedSubjectConfirmation";

/// Acceptable issuers (string set).
pub const VALID_ISSUERS: &str = "saml2.ValidIssuers";

/// Whether an unsigned assertion is rejected (bool). Defaults to true.
pub const SIGNATURE_REQUIRED: &str = "saml2.SignatureRequired";

/// Additional signature validation criteria (criteria set).
pub const SIGNATURE_VALIDATION_CRITERIA_SET: &str = "saml2.SignatureValidationCriteriaSet";

/// Per-call signature trust engine override.
pub const SIGNATURE_VALIDATION_TRUST_ENGINE: &str = "saml2.SignatureValidationTrustEngine";

/// Per-call signature pre-validator override.
pub const SIGNATURE_VALIDATION_PREVALIDATOR: &str = "saml2.SignatureValidationPrevalidator";

// ============================================================================
// Subject confirmation
// ============================================================================

/// Whether confirmation data must carry NotBefore (bool).
pub const SC_NOT_BEFORE_REQUIRED: &str = "saml2.SubjectConfirmation.NotBeforeRequired";

/// Whether confirmation data must carry NotOnOrAfter (bool).
pub const SC_NOT_ON_OR_AFTER_REQUIRED: &str = "saml2.SubjectConfirmation.NotOnOrAfterRequired";

/// Whether confirmation data must carry Recipient (bool).
pub const SC_RECIPIENT_REQUIRED: &str = "saml2.SubjectConfirmation.RecipientRequired";

/// Acceptable recipients (string set).
pub const SC_VALID_RECIPIENTS: &str = "saml2.SubjectConfirmation.ValidRecipients";

/// Whether confirmation data must carry Address (bool).
pub const SC_ADDRESS_REQUIRED: &str = "saml2.SubjectConfirmation.AddressRequired";

/// Whether the Address is checked at all (bool). Defaults to true.
pub const SC_CHECK_ADDRESS: &str = "saml2.SubjectConfirmation.CheckAddress";

/// Acceptable presenter addresses (address set).
pub const SC_VALID_ADDRESSES: &str = "saml2.SubjectConfirmation.ValidAddresses";

/// Whether confirmation data must carry InResponseTo (bool).
pub const SC_IN_RESPONSE_TO_REQUIRED: &str = "saml2.SubjectConfirmation.InResponseToRequired";

/// Acceptable InResponseTo values (string set).
pub const SC_VALID_IN_RESPONSE_TO: &str = "saml2.SubjectConfirmation.ValidInResponseTo";

/// Whether the InResponseTo check is skipped (bool).
pub const SC_IN_RESPONSE_TO_IGNORED: &str = "saml2.SubjectConfirmation.InResponseToIgnored";

/// Presenter public key for holder-of-key confirmation.
pub const SC_HOK_PRESENTER_KEY: &str = "saml2.SubjectConfirmation.HoK.PresenterKey";

/// Presenter certificate for holder-of-key confirmation.
pub const SC_HOK_PRESENTER_CERT: &str = "saml2.SubjectConfirmation.HoK.PresenterCertificate";

/// Dynamic: the key info that matched the presenter's key.
pub const SC_HOK_CONFIRMED_KEYINFO: &str = "saml2.SubjectConfirmation.HoK.ConfirmedKeyInfo";

// ============================================================================
// Conditions
// ============================================================================

/// Condition types that must be present (qualified name set).
pub const COND_REQUIRED_CONDITIONS: &str = "saml2.Conditions.RequiredConditions";

/// Acceptable audiences (string set).
pub const COND_VALID_AUDIENCES: &str = "saml2.Conditions.ValidAudiences";

/// One-time use replay window (duration).
pub const COND_ONE_TIME_USE_EXPIRES: &str = "saml2.Conditions.OneTimeUseExpires";

// ============================================================================
// Statements
// ============================================================================

/// Whether the authn statement's SubjectLocality address is checked (bool).
pub const STMT_AUTHN_CHECK_ADDRESS: &str = "saml2.Statement.Authn.SubjectLocality.CheckAddress";

/// Acceptable SubjectLocality addresses (address set).
pub const STMT_AUTHN_VALID_ADDRESSES: &str =
    "saml2.Statement.Authn.SubjectLocality.ValidAddresses";

/// Maximum time since authentication (duration).
pub const STMT_AUTHN_MAX_TIME: &str = "saml2.Statement.Authn.MaxTimeSinceAuthn";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_share_their_prefix() {
        for key in [CLOCK_SKEW, VALID_ISSUERS, SIGNATURE_VALIDATION_PREVALIDATOR] {
            assert!(key.starts_with(STANDARD_PREFIX));
        }
        for key in [SC_VALID_ADDRESSES, SC_HOK_CONFIRMED_KEYINFO, SC_IN_RESPONSE_TO_IGNORED] {
            assert!(key.starts_with(SC_PREFIX));
        }
        assert!(COND_ONE_TIME_USE_EXPIRES.starts_with(COND_PREFIX));
        assert!(STMT_AUTHN_MAX_TIME.starts_with(STMT_PREFIX));
    }
}
