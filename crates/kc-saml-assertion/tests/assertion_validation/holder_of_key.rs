//! Holder-of-key confirmation against presenter credentials.

use kc_saml_assertion::{
    Assertion, Certificate, Conditions, KeyInfo, NameId, PublicKey, Subject, SubjectConfirmation,
    SubjectConfirmationData, ValidationResult,
};

use crate::common::{settings, validator, CERT_A, IDP, SP, SPKI_A, SPKI_B};

fn hok_assertion(key_info: KeyInfo) -> Assertion {
    Assertion::new(IDP)
        .with_subject(
            Subject::new(NameId::persistent("4f1c9a")).with_confirmation(
                SubjectConfirmation::holder_of_key()
                    .with_data(SubjectConfirmationData::key_info(vec![key_info])),
            ),
        )
        .with_conditions(Conditions::with_validity(5).with_audience(SP))
}

#[tokio::test]
async fn test_presenter_key_matches_embedded_key() -> anyhow::Result<()> {
    let validator = validator();
    let key_info = KeyInfo::new().with_der_encoded_key_value(SPKI_A);
    let assertion = hok_assertion(key_info.clone());

    let mut context = settings()
        .context()
        .presenter_key(PublicKey::from_base64(SPKI_A)?)
        .build();

    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Valid);
    assert_eq!(context.confirmed_key_info(), Some(&key_info));
    Ok(())
}

#[tokio::test]
async fn test_presenter_certificate_matches_embedded_certificate() -> anyhow::Result<()> {
    let validator = validator();
    let key_info = KeyInfo::new().with_certificate(CERT_A);
    let assertion = hok_assertion(key_info.clone());

    let mut context = settings()
        .context()
        .presenter_certificate(Certificate::from_base64(CERT_A)?)
        .build();

    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Valid);
    assert_eq!(context.confirmed_key_info(), Some(&key_info));
    Ok(())
}

#[tokio::test]
async fn test_different_key_is_not_confirmed() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = hok_assertion(KeyInfo::new().with_der_encoded_key_value(SPKI_A));

    let mut context = settings()
        .context()
        .presenter_key(PublicKey::from_base64(SPKI_B)?)
        .build();

    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    assert!(context.confirmed_key_info().is_none());
    assert!(context.confirmed_subject_confirmation().is_none());
    Ok(())
}

#[tokio::test]
async fn test_missing_presenter_credentials() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = hok_assertion(KeyInfo::new().with_der_encoded_key_value(SPKI_A));

    let mut context = settings().context().build();

    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    assert!(context.confirmed_key_info().is_none());
    Ok(())
}
