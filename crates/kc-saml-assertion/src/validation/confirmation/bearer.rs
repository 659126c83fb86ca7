//! Bearer subject confirmation.

use async_trait::async_trait;

use super::{unsupported_method, ConfirmationDataValidator};
use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::result::ValidationResult;
use crate::types::{confirmation_methods, Assertion, SubjectConfirmation};
use crate::validation::SubjectConfirmationValidator;

/// Confirms bearer subjects.
///
/// Bearer confirmation carries no proof beyond the confirmation data, so
/// only the common data checks apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerSubjectConfirmationValidator {
    data: ConfirmationDataValidator,
}

impl BearerSubjectConfirmationValidator {
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
}

#[async_trait]
impl SubjectConfirmationValidator for BearerSubjectConfirmationValidator {
    fn serviced_method(&self) -> &str {
        confirmation_methods::BEARER
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

        if confirmation.method != confirmation_methods::BEARER {
            unsupported_method(context, confirmation, assertion, self.serviced_method());
            return Ok(ValidationResult::Indeterminate);
        }
        Ok(ValidationResult::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParameterValue;
    use crate::params;
    use crate::types::SubjectConfirmationData;

    #[tokio::test]
    async fn bearer_confirmation() {
        let validator = BearerSubjectConfirmationValidator::new();
        let assertion = Assertion::new("idp");
        let mut ctx = ValidationContext::default().with_static(
            params::SC_VALID_RECIPIENTS,
            ParameterValue::string_set(["https://sp.example.com/acs"]),
        );
        ctx = ctx.with_static(params::SC_IN_RESPONSE_TO_IGNORED, true);

        let confirmation = SubjectConfirmation::bearer()
            .with_data(SubjectConfirmationData::for_request("_r", "https://sp.example.com/acs"));
        assert_eq!(
            validator.validate(&confirmation, &assertion, &mut ctx).await.unwrap(),
            ValidationResult::Valid
        );

        let wrong_method = SubjectConfirmation::sender_vouches();
        assert_eq!(
            validator.validate(&wrong_method, &assertion, &mut ctx).await.unwrap(),
            ValidationResult::Indeterminate
        );

        let wrong_recipient = SubjectConfirmation::bearer()
            .with_data(SubjectConfirmationData::for_request("_r", "https://evil.example.com/acs"));
        assert_eq!(
            validator.validate(&wrong_recipient, &assertion, &mut ctx).await.unwrap(),
            ValidationResult::Invalid
        );
    }
}
