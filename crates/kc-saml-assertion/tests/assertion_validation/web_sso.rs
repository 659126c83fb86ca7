//! Unsigned web browser SSO assertions validated against settings.

use chrono::{DateTime, Duration, Utc};
use kc_saml_assertion::config::ValidationSettings;
use kc_saml_assertion::{
    params, Assertion, AuthnContextClass, AuthnStatement, Conditions, ParameterValue, Statement,
    SubjectConfirmation, ValidationContext, ValidationResult,
};

use crate::common::{settings, validator, web_sso_assertion, ACS, IDP, REQUEST_ID, SP};

#[tokio::test]
async fn test_minimal_unsigned_assertion_is_valid() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = Assertion::new("idp1")
        .with_conditions(Conditions::new().with_audience("https://sp.example.com"));

    let mut context = ValidationContext::default()
        .with_static(params::SIGNATURE_REQUIRED, false)
        .with_static(
            params::COND_VALID_AUDIENCES,
            ParameterValue::string_set(["https://sp.example.com"]),
        );

    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Valid);
    assert!(context.failure_message().is_none());
    Ok(())
}

#[tokio::test]
async fn test_required_signature_stops_before_conditions() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = Assertion::new("idp1")
        .with_conditions(Conditions::new().with_audience("https://unknown.example.com"));

    let mut context = ValidationContext::default().with_static(
        params::COND_VALID_AUDIENCES,
        ParameterValue::string_set(["https://sp.example.com"]),
    );

    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    assert_eq!(
        context.failure_message(),
        Some("Assertion was required to be signed, but was not")
    );
    Ok(())
}

#[tokio::test]
async fn test_sp_initiated_login() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = web_sso_assertion();
    let mut context = settings().context().in_response_to(REQUEST_ID).build();

    let result = validator.validate(&assertion, &mut context).await;

    assert_eq!(result, ValidationResult::Valid, "{:?}", context.failure_message());
    let confirmed = context
        .confirmed_subject_confirmation()
        .ok_or_else(|| anyhow::anyhow!("no confirmed subject confirmation"))?;
    assert_eq!(confirmed.method, SubjectConfirmation::bearer().method);
    assert_eq!(
        confirmed
            .subject_confirmation_data
            .as_ref()
            .and_then(|d| d.recipient.as_deref()),
        Some(ACS)
    );
    Ok(())
}

#[tokio::test]
async fn test_unsolicited_response_is_rejected() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = web_sso_assertion();

    let mut context = settings().context().in_response_to("_some-other-request").build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    assert_eq!(
        context.failure_message(),
        Some(format!(
            "No subject confirmation methods were met for assertion with ID '{}'",
            assertion.id
        ))
        .as_deref()
    );

    // Without any outstanding request the confirmation cannot be evaluated
    let mut context = settings().context().build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    assert!(context.confirmed_subject_confirmation().is_none());
    Ok(())
}

#[tokio::test]
async fn test_untrusted_issuer_and_audience() -> anyhow::Result<()> {
    let validator = validator();

    let foreign = Assertion::new("https://evil.example.com")
        .with_conditions(Conditions::with_validity(5).with_audience(SP));
    let mut context = settings().context().build();
    assert_eq!(validator.validate(&foreign, &mut context).await, ValidationResult::Invalid);

    let misdirected =
        Assertion::new(IDP).with_conditions(Conditions::with_validity(5).with_audience(ACS));
    let mut context = settings().context().build();
    assert_eq!(validator.validate(&misdirected, &mut context).await, ValidationResult::Invalid);
    assert!(context
        .failure_message()
        .is_some_and(|m| m.contains("AudienceRestriction")));

    // No audiences configured at all
    let unconfigured = ValidationSettings {
        valid_audiences: Vec::new(),
        ..settings()
    };
    let mut context = unconfigured.context().in_response_to(REQUEST_ID).build();
    assert_eq!(
        validator.validate(&web_sso_assertion(), &mut context).await,
        ValidationResult::Indeterminate
    );
    Ok(())
}

#[tokio::test]
async fn test_issue_instant_window() -> anyhow::Result<()> {
    let validator = validator();
    let now = Utc::now();

    // skew 5 minutes + lifetime 5 minutes
    let cases = [
        (now - Duration::minutes(9), ValidationResult::Valid),
        (now + Duration::minutes(4), ValidationResult::Valid),
        (now - Duration::minutes(11), ValidationResult::Invalid),
        (now + Duration::minutes(6), ValidationResult::Invalid),
        (DateTime::<Utc>::MAX_UTC, ValidationResult::Invalid),
        (DateTime::<Utc>::MIN_UTC, ValidationResult::Invalid),
    ];

    for (issue_instant, expected) in cases {
        let assertion = Assertion::new(IDP)
            .with_issue_instant(issue_instant)
            .with_conditions(Conditions::new().with_audience(SP));
        let mut context = settings().context().build();
        assert_eq!(
            validator.validate(&assertion, &mut context).await,
            expected,
            "issue instant {issue_instant}"
        );
    }

    let tolerant = ValidationSettings {
        clock_skew_secs: 60,
        lifetime_secs: 3600,
        ..settings()
    };
    let assertion = Assertion::new(IDP)
        .with_issue_instant(now - Duration::minutes(30))
        .with_conditions(Conditions::new().with_audience(SP));
    let mut context = tolerant.context().build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Valid);
    Ok(())
}

#[tokio::test]
async fn test_authentication_age() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = Assertion::new(IDP)
        .with_conditions(Conditions::with_validity(5).with_audience(SP))
        .with_statement(Statement::Authn(
            AuthnStatement::new(AuthnContextClass::Password)
                .with_authn_instant(Utc::now() - Duration::hours(1)),
        ));

    let mut context = settings().context().build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Valid);

    let mut strict = settings();
    strict.authn_statement.max_age_secs = Some(30 * 60);
    let mut context = strict.context().build();
    assert_eq!(validator.validate(&assertion, &mut context).await, ValidationResult::Invalid);
    Ok(())
}

#[tokio::test]
async fn test_validation_is_idempotent_across_fresh_contexts() -> anyhow::Result<()> {
    let validator = validator();
    let good = web_sso_assertion();
    let bad = Assertion::new(IDP).with_conditions(Conditions::with_validity(5).with_audience(ACS));

    for (assertion, expected) in [(&good, ValidationResult::Valid), (&bad, ValidationResult::Invalid)] {
        let mut first = settings().context().in_response_to(REQUEST_ID).build();
        let mut second = settings().context().in_response_to(REQUEST_ID).build();

        let a = validator.validate(assertion, &mut first).await;
        let b = validator.validate(assertion, &mut second).await;

        assert_eq!(a, expected, "{:?}", first.failure_message());
        assert_eq!(a, b);
        assert_eq!(first.failure_message(), second.failure_message());
        assert_eq!(
            first.confirmed_subject_confirmation(),
            second.confirmed_subject_confirmation()
        );
    }

    let mut context = settings().context().in_response_to(REQUEST_ID).build();
    assert_eq!(validator.validate(&bad, &mut context).await, ValidationResult::Invalid);
    assert!(context
        .failure_message()
        .is_some_and(|m| m.contains("None of the audiences within")));
    Ok(())
}
