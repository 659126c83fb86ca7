//! Holder-of-key subject confirmation.
//!
//! The presenter proves possession of a key named in the confirmation data.
//! The caller supplies the presenter's public key
//! ([`params::SC_HOK_PRESENTER_KEY`]), certificate
//! ([`params::SC_HOK_PRESENTER_CERT`]) or both, typically taken from the
//! client TLS session. When both are given, the certificate must carry the
//! given key. On success the matching `KeyInfo` is published as
//! [`params::SC_HOK_CONFIRMED_KEYINFO`].

use async_trait::async_trait;

use super::{unsupported_method, ConfirmationDataValidator};
use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::params;
use crate::result::ValidationResult;
use crate::types::{
    confirmation_methods, names, Assertion, Certificate, KeyInfo, PublicKey, SubjectConfirmation,
    SubjectConfirmationData,
};
use crate::validation::SubjectConfirmationValidator;

/// Confirms holder-of-key subjects.
#[derive(Debug, Clone, Copy, Default)]
pub struct HolderOfKeySubjectConfirmationValidator {
    data: ConfirmationDataValidator,
}

/// Presenter credentials read from the context.
struct Presenter {
    key: Option<PublicKey>,
    certificate: Option<Certificate>,
}

impl HolderOfKeySubjectConfirmationValidator {
    /// Creates the validator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: ConfirmationDataValidator::new(),
        }
    }

    /// Uses the given confirmation data checks.
    #[must_use]
    pub const fn with_data_validator(data: ConfirmationDataValidator) -> Self {
        Self { data }
    }

    fn is_valid_data_type(data: &SubjectConfirmationData) -> bool {
        match &data.schema_type {
            None => true,
            Some(schema_type) => *schema_type == names::key_info_confirmation_data_type(),
        }
    }

    /// Reads the presenter key and certificate, deriving the key if needed.
    fn presenter(context: &ValidationContext) -> Result<Presenter, String> {
        let key = match context.get_static(params::SC_HOK_PRESENTER_KEY) {
            None => None,
            Some(_) => Some(
                context
                    .static_public_key(params::SC_HOK_PRESENTER_KEY)
                    .cloned()
                    .ok_or_else(|| {
                        format!(
                            "The value of the static validation parameter '{}' was not a public key",
                            params::SC_HOK_PRESENTER_KEY
                        )
                    })?,
            ),
        };

        let certificate = match context.get_static(params::SC_HOK_PRESENTER_CERT) {
            None => None,
            Some(_) => Some(
                context
                    .static_certificate(params::SC_HOK_PRESENTER_CERT)
                    .cloned()
                    .ok_or_else(|| {
                        format!(
                            "The value of the static validation parameter '{}' was not a certificate",
                            params::SC_HOK_PRESENTER_CERT
                        )
                    })?,
            ),
        };

        let key = match (&certificate, key) {
            (Some(cert), Some(key)) => {
                let cert_key = cert.public_key().map_err(|e| e.to_string())?;
                if cert_key != key {
                    return Err(
                        "Presenter's certificate contains a different public key than the one explicitly given"
                            .to_string(),
                    );
                }
                Some(key)
            }
            (Some(cert), None) => Some(cert.public_key().map_err(|e| e.to_string())?),
            (None, key) => key,
        };

        Ok(Presenter { key, certificate })
    }

    fn matches_key_value(key: Option<&PublicKey>, key_info: &KeyInfo) -> bool {
        let Some(key) = key else {
            tracing::debug!("Presenter public key was not supplied, skipping KeyValue match");
            return false;
        };

        if key_info.key_values.iter().any(|candidate| candidate == key) {
            tracing::debug!("Matched KeyValue public key");
            return true;
        }

        for encoded in &key_info.der_encoded_key_values {
            match PublicKey::from_base64(encoded) {
                Ok(candidate) if candidate == *key => {
                    tracing::debug!("Matched DEREncodedKeyValue public key");
                    return true;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "KeyInfo contained DEREncodedKeyValue that can not be parsed");
                }
            }
        }

        tracing::debug!("Failed to match a KeyValue or DEREncodedKeyValue against the presenter key");
        false
    }

    fn matches_certificate(certificate: Option<&Certificate>, key_info: &KeyInfo) -> bool {
        let Some(certificate) = certificate else {
            tracing::debug!("Presenter certificate was not supplied, skipping certificate match");
            return false;
        };

        for encoded in key_info.x509_data.iter().flat_map(|data| data.certificates.iter()) {
            match Certificate::from_base64(encoded) {
                Ok(candidate) if candidate == *certificate => {
                    tracing::debug!("Matched X509Certificate");
                    return true;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "KeyInfo contained certificate that can not be parsed");
                }
            }
        }

        tracing::debug!("Failed to match an X509Certificate against the presenter certificate");
        false
    }
}

#[async_trait]
impl SubjectConfirmationValidator for HolderOfKeySubjectConfirmationValidator {
    fn serviced_method(&self) -> &str {
        confirmation_methods::HOLDER_OF_KEY
    }

    async fn validate(
        &self,
        confirmation: &SubjectConfirmation,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult> {
        let result = self.data.validate(confirmation, assertion, context);
        if result != ValidationResult::Valid {
            return Ok(result);
        }

        if confirmation.method != confirmation_methods::HOLDER_OF_KEY {
            unsupported_method(context, confirmation, assertion, self.serviced_method());
            return Ok(ValidationResult::Indeterminate);
        }

        let Some(data) = confirmation.subject_confirmation_data.as_ref() else {
            context.set_failure_message(format!(
                "Holder-of-key subject confirmation in assertion '{}' has no SubjectConfirmationData",
                assertion.id
            ));
            return Ok(ValidationResult::Indeterminate);
        };

        tracing::debug!(assertion_id = %assertion.id, "Attempting holder-of-key subject confirmation");
        if !Self::is_valid_data_type(data) {
            context.set_failure_message(format!(
                "Subject confirmation data is not of type '{}'",
                names::key_info_confirmation_data_type()
            ));
            return Ok(ValidationResult::Invalid);
        }

        if data.key_infos.is_empty() {
            context.set_failure_message(format!(
                "No key information for holder of key subject confirmation in assertion '{}'",
                assertion.id
            ));
            return Ok(ValidationResult::Invalid);
        }
        tracing::debug!(count = data.key_infos.len(), "Found KeyInfo children of SubjectConfirmationData");

        let presenter = match Self::presenter(context) {
            Ok(presenter) => presenter,
            Err(reason) => {
                context.set_failure_message(format!(
                    "Unable to obtain presenter key/cert params from validation context: {reason}"
                ));
                return Ok(ValidationResult::Indeterminate);
            }
        };

        if presenter.key.is_none() && presenter.certificate.is_none() {
            context.set_failure_message(
                "Neither the presenter's certificate nor its public key were provided",
            );
            return Ok(ValidationResult::Indeterminate);
        }

        for key_info in &data.key_infos {
            if Self::matches_key_value(presenter.key.as_ref(), key_info)
                || Self::matches_certificate(presenter.certificate.as_ref(), key_info)
            {
                tracing::debug!(assertion_id = %assertion.id, "Holder-of-key confirmed");
                context.set_dynamic(params::SC_HOK_CONFIRMED_KEYINFO, key_info.clone());
                return Ok(ValidationResult::Valid);
            }
        }

        context.set_failure_message(format!(
            "None of the keys in the holder-of-key subject confirmation of assertion '{}' matched the presenter",
            assertion.id
        ));
        Ok(ValidationResult::Invalid)
    }
}
