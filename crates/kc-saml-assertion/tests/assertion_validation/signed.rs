//! Signed assertions evaluated by an explicit-key trust engine.

use std::sync::Arc;

use kc_saml_assertion::signature::{
    ExplicitKeyTrustEngine, SamlSignatureProfileValidator, Signature, SignatureAlgorithm,
    SignatureVerifier,
};
use kc_saml_assertion::{Assertion, Certificate, Conditions, SecurityError, ValidationResult};

use crate::common::{settings, validator, CERT_A, IDP, SP};

/// Stand-in for signature math: the value must be the signer's subject key.
struct SubjectKeyVerifier;

impl SignatureVerifier for SubjectKeyVerifier {
    fn verify(&self, signature: &Signature, certificate: &Certificate) -> Result<bool, SecurityError> {
        let key = certificate
            .public_key()
            .map_err(|e| SecurityError::CredentialResolution(e.to_string()))?;
        Ok(signature.signature_value == base64_of(&key.der))
    }
}

fn base64_of(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn trust_engine() -> anyhow::Result<Arc<ExplicitKeyTrustEngine>> {
    Ok(Arc::new(
        ExplicitKeyTrustEngine::new(Arc::new(SubjectKeyVerifier))
            .with_certificate(IDP, Certificate::from_base64(CERT_A)?),
    ))
}

fn signed_assertion(signature_value: String) -> Assertion {
    let assertion =
        Assertion::new(IDP).with_conditions(Conditions::with_validity(5).with_audience(SP));
    let signature =
        Signature::enveloped(assertion.id.clone(), SignatureAlgorithm::EcdsaSha256, signature_value);
    assertion.with_signature(signature)
}

fn valid_signature_value() -> anyhow::Result<String> {
    let key = Certificate::from_base64(CERT_A)?.public_key()?;
    Ok(base64_of(&key.der))
}

#[tokio::test]
async fn test_trusted_signature_is_valid() -> anyhow::Result<()> {
    let validator = validator().with_trust_engine(trust_engine()?);
    let assertion = signed_assertion(valid_signature_value()?);

    let mut signed_settings = settings();
    signed_settings.signature_required = true;
    let mut context = signed_settings.context().build();

    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Valid);
    Ok(())
}

#[tokio::test]
async fn test_forged_signature_is_invalid() -> anyhow::Result<()> {
    let validator = validator().with_trust_engine(trust_engine()?);
    let assertion = signed_assertion("Zm9yZ2Vk".to_string());

    let mut context = settings().context().build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    assert_eq!(
        context.failure_message(),
        Some(format!("Signature of Assertion '{}' from Issuer '{IDP}' was not valid", assertion.id))
            .as_deref()
    );
    Ok(())
}

#[tokio::test]
async fn test_profile_violation_fails_before_trust_evaluation() -> anyhow::Result<()> {
    let validator = validator().with_trust_engine(trust_engine()?);
    let mut assertion = signed_assertion(valid_signature_value()?);
    if let Some(signature) = assertion.signature.as_mut() {
        signature.references[0].uri = "#_someone-else".to_string();
    }

    let mut context = settings().context().build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    assert!(context
        .failure_message()
        .is_some_and(|m| m.starts_with("Assertion Signature failed pre-validation")));
    Ok(())
}

#[tokio::test]
async fn test_per_call_collaborators_override_defaults() -> anyhow::Result<()> {
    // No trust engine on the validator itself
    let validator = validator();
    let mut assertion = signed_assertion(valid_signature_value()?);
    if let Some(signature) = assertion.signature.as_mut() {
        signature.signature_algorithm = SignatureAlgorithm::RsaSha1.uri().to_string();
    }

    let mut context = settings().context().build();
    assert_eq!(
        validator.validate(&assertion, &mut context).await,
        ValidationResult::Indeterminate
    );

    // SHA-1 is rejected by the default profile validator
    let mut context = settings().context().trust_engine(trust_engine()?).build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);

    let mut context = settings()
        .context()
        .trust_engine(trust_engine()?)
        .prevalidator(Arc::new(SamlSignatureProfileValidator::new().allow_sha1(true)))
        .build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Valid);
    Ok(())
}
