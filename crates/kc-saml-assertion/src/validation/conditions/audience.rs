//! `AudienceRestriction` condition validator.

use async_trait::async_trait;

use super::unsupported_condition;
use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::params;
use crate::result::ValidationResult;
use crate::types::{names, Assertion, Condition, QName};
use crate::validation::ConditionValidator;

/// Checks that an audience restriction names one of the valid audiences.
///
/// Reads [`params::COND_VALID_AUDIENCES`] (string set, required). Each
/// restriction is evaluated on its own: it passes when any of its audiences
/// is valid. With several restrictions in one assertion, each one must pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudienceRestrictionConditionValidator;

impl AudienceRestrictionConditionValidator {
    /// Creates the validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConditionValidator for AudienceRestrictionConditionValidator {
    fn serviced_condition(&self) -> QName {
        names::audience_restriction()
    }

    async fn validate(
        &self,
        condition: &Condition,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult> {
        let Condition::AudienceRestriction(restriction) = condition else {
            unsupported_condition(context, condition, assertion, &self.serviced_condition());
            return Ok(ValidationResult::Indeterminate);
        };

        let Some(valid_audiences) = context.static_string_set(params::COND_VALID_AUDIENCES) else {
            tracing::warn!(
                assertion_id = %assertion.id,
                "Valid audiences were not supplied, unable to evaluate audience restriction"
            );
            context.set_failure_message(format!(
                "Unable to determine list of valid audiences for assertion '{}'",
                assertion.id
            ));
            return Ok(ValidationResult::Indeterminate);
        };

        let audiences: Vec<&str> = restriction
            .audiences
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect();

        if audiences.is_empty() {
            tracing::debug!(assertion_id = %assertion.id, "Audience restriction contains no audiences");
            context.set_failure_message(format!(
                "Audience restriction condition in assertion '{}' contained no audiences",
                assertion.id
            ));
            return Ok(ValidationResult::Invalid);
        }

        if let Some(matched) = audiences.iter().find(|a| valid_audiences.contains(**a)) {
            tracing::debug!(assertion_id = %assertion.id, audience = %matched, "Matched valid audience");
            return Ok(ValidationResult::Valid);
        }

        tracing::debug!(
            assertion_id = %assertion.id,
            audiences = ?audiences,
            "None of the audiences in the restriction are valid"
        );
        context.set_failure_message(format!(
            "None of the audiences within assertion '{}' matched the list of valid audiences",
            assertion.id
        ));
        Ok(ValidationResult::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParameterValue;
    use crate::types::AudienceRestriction;

    const SP: &str = "https://sp.example.com";

    fn restriction(audiences: &[&str]) -> Condition {
        Condition::AudienceRestriction(AudienceRestriction::new(audiences.iter().copied()))
    }

    fn context() -> ValidationContext {
        ValidationContext::default().with_static(
            params::COND_VALID_AUDIENCES,
            ParameterValue::string_set([SP, "urn:sp:alias"]),
        )
    }

    async fn run(condition: &Condition, ctx: &mut ValidationContext) -> ValidationResult {
        AudienceRestrictionConditionValidator::new()
            .validate(condition, &Assertion::new("idp"), ctx)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn any_listed_audience_is_enough() {
        let mut ctx = context();
        assert_eq!(run(&restriction(&[SP]), &mut ctx).await, ValidationResult::Valid);
        assert_eq!(
            run(&restriction(&["https://other.example.com", " urn:sp:alias "]), &mut ctx).await,
            ValidationResult::Valid
        );
    }

    #[tokio::test]
    async fn unknown_or_empty_audiences_are_invalid() {
        let mut ctx = context();
        assert_eq!(
            run(&restriction(&["https://other.example.com"]), &mut ctx).await,
            ValidationResult::Invalid
        );
        assert!(ctx.failure_message().unwrap().contains("None of the audiences"));

        assert_eq!(run(&restriction(&[]), &mut ctx).await, ValidationResult::Invalid);
        assert_eq!(run(&restriction(&["  "]), &mut ctx).await, ValidationResult::Invalid);
    }

    #[tokio::test]
    async fn missing_or_mistyped_valid_audiences_are_indeterminate() {
        let mut missing = ValidationContext::default();
        assert_eq!(run(&restriction(&[SP]), &mut missing).await, ValidationResult::Indeterminate);

        let mut mistyped = ValidationContext::default().with_static(params::COND_VALID_AUDIENCES, SP);
        assert_eq!(run(&restriction(&[SP]), &mut mistyped).await, ValidationResult::Indeterminate);
        assert!(mistyped.failure_message().is_some());
    }

    #[tokio::test]
    async fn other_conditions_are_indeterminate() {
        let mut ctx = context();
        assert_eq!(run(&Condition::OneTimeUse, &mut ctx).await, ValidationResult::Indeterminate);
        assert!(ctx.failure_message().unwrap().contains("OneTimeUse"));
    }
}
