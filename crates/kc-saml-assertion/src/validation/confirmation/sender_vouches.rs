//! Sender-vouches subject confirmation.

use async_trait::async_trait;

use super::{unsupported_method, ConfirmationDataValidator};
use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::result::ValidationResult;
use crate::types::{confirmation_methods, Assertion, SubjectConfirmation};
use crate::validation::SubjectConfirmationValidator;

/// Confirms sender-vouches subjects.
///
/// The attesting entity is authenticated by the transport, outside the
/// assertion; only the common data checks apply here.
#[derive(Debug, Clone, Copy, Default)]
pub struct SenderVouchesSubjectConfirmationValidator {
    data: ConfirmationDataValidator,
}

impl SenderVouchesSubjectConfirmationValidator {
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
impl SubjectConfirmationValidator for SenderVouchesSubjectConfirmationValidator {
    fn serviced_method(&self) -> &str {
        confirmation_methods::SENDER_VOUCHES
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

        if confirmation.method != confirmation_methods::SENDER_VOUCHES {
            unsupported_method(context, confirmation, assertion, self.serviced_method());
            return Ok(ValidationResult::Indeterminate);
        }
        Ok(ValidationResult::Valid)
    }
}
