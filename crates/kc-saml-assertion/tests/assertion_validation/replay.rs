//! One-time use assertions and replay detection.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use kc_saml_assertion::{params, Assertion, Conditions, ValidationResult};

use crate::common::{settings, validator, IDP, SP};

fn one_time_assertion() -> Assertion {
    Assertion::new(IDP).with_conditions(
        Conditions::with_validity(5)
            .with_audience(SP)
            .with_one_time_use(),
    )
}

#[tokio::test]
async fn test_second_presentation_is_a_replay() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = one_time_assertion();

    let mut first = settings().context().build();
    assert_eq!(validator.validate(&assertion, &mut first).await, ValidationResult::Valid);

    let mut second = settings().context().build();
    assert_eq!(validator.validate(&assertion, &mut second).await, ValidationResult::Invalid);
    assert!(second
        .failure_message()
        .is_some_and(|m| m.contains("has been used before")));
    Ok(())
}

#[tokio::test]
async fn test_replay_window_expires() -> anyhow::Result<()> {
    let validator = validator();
    let assertion = one_time_assertion();

    let build = || {
        settings()
            .context()
            .parameter(params::COND_ONE_TIME_USE_EXPIRES, Duration::milliseconds(100))
            .build()
    };

    assert_eq!(validator.validate(&assertion, &mut build()).await, ValidationResult::Valid);
    assert_eq!(validator.validate(&assertion, &mut build()).await, ValidationResult::Invalid);

    tokio::time::sleep(StdDuration::from_millis(250)).await;
    assert_eq!(validator.validate(&assertion, &mut build()).await, ValidationResult::Valid);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_presentations_accept_exactly_one() -> anyhow::Result<()> {
    let validator = Arc::new(validator());
    let assertion = Arc::new(one_time_assertion());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let validator = Arc::clone(&validator);
        let assertion = Arc::clone(&assertion);
        handles.push(tokio::spawn(async move {
            let mut context = settings().context().build();
            validator.validate(&assertion, &mut context).await
        }));
    }

    let mut valid = 0;
    for handle in handles {
        if handle.await? == ValidationResult::Valid {
            valid += 1;
        }
    }
    assert_eq!(valid, 1);
    Ok(())
}
