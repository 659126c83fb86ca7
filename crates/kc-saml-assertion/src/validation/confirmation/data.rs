//! Checks shared by every subject confirmation method.

use chrono::Utc;

use crate::context::{ParameterValue, ValidationContext};
use crate::params;
use crate::result::ValidationResult;
use crate::types::{Assertion, SubjectConfirmation, SubjectConfirmationData};
use crate::validation::support;

type DataCheck = fn(
    &ConfirmationDataValidator,
    &SubjectConfirmationData,
    &Assertion,
    &mut ValidationContext,
) -> ValidationResult;

/// Validates `SubjectConfirmationData` independent of the method.
///
/// Checks run in order and stop at the first non-valid result:
/// NotBefore, NotOnOrAfter, Recipient, Address, InResponseTo. Every field is
/// optional unless its `*_REQUIRED` flag is set, in which case absence is
/// invalid. Present values are matched against the corresponding valid set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmationDataValidator {
    ignore_in_response_to: bool,
}

impl ConfirmationDataValidator {
    /// Creates a validator that checks InResponseTo.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ignore_in_response_to: false,
        }
    }

    /// Skips the InResponseTo check for every validation.
    #[must_use]
    pub const fn ignoring_in_response_to(mut self) -> Self {
        self.ignore_in_response_to = true;
        self
    }

    fn in_response_to_ignored(&self, context: &ValidationContext) -> bool {
        self.ignore_in_response_to || context.static_bool_or(params::SC_IN_RESPONSE_TO_IGNORED, false)
    }

    /// Runs all checks against the confirmation's data.
    pub fn validate(
        &self,
        confirmation: &SubjectConfirmation,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(data) = confirmation.subject_confirmation_data.as_ref() else {
            return self.validate_missing_data(assertion, context);
        };

        let checks: [DataCheck; 5] = [
            Self::validate_not_before,
            Self::validate_not_on_or_after,
            Self::validate_recipient,
            Self::validate_address,
            Self::validate_in_response_to,
        ];

        for check in checks {
            let result = check(self, data, assertion, context);
            if result != ValidationResult::Valid {
                return result;
            }
        }
        ValidationResult::Valid
    }

    fn validate_missing_data(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let mut required = vec![
            (params::SC_NOT_BEFORE_REQUIRED, "NotBefore"),
            (params::SC_NOT_ON_OR_AFTER_REQUIRED, "NotOnOrAfter"),
            (params::SC_RECIPIENT_REQUIRED, "Recipient"),
            (params::SC_ADDRESS_REQUIRED, "Address"),
        ];
        if !self.in_response_to_ignored(context) {
            required.push((params::SC_IN_RESPONSE_TO_REQUIRED, "InResponseTo"));
        }

        if let Some((_, field)) = required
            .into_iter()
            .find(|(key, _)| context.static_bool_or(key, false))
        {
            tracing::debug!(assertion_id = %assertion.id, field, "Subject confirmation data is absent");
            context.set_failure_message(format!(
                "Subject confirmation in assertion '{}' has no SubjectConfirmationData but {field} is required",
                assertion.id
            ));
            return ValidationResult::Invalid;
        }
        ValidationResult::Valid
    }

    /// Records the absence of a required field, if it is required.
    fn missing(
        context: &mut ValidationContext,
        required_key: &str,
        field: &str,
        assertion: &Assertion,
    ) -> ValidationResult {
        if context.static_bool_or(required_key, false) {
            tracing::debug!(assertion_id = %assertion.id, field, "Required confirmation field is absent");
            context.set_failure_message(format!(
                "SubjectConfirmationData/@{field} was missing and was required for assertion '{}'",
                assertion.id
            ));
            return ValidationResult::Invalid;
        }
        ValidationResult::Valid
    }

    fn validate_not_before(
        &self,
        data: &SubjectConfirmationData,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(not_before) = data.not_before else {
            return Self::missing(context, params::SC_NOT_BEFORE_REQUIRED, "NotBefore", assertion);
        };

        let skewed_now = support::saturating_add(Utc::now(), support::clock_skew(context));
        tracing::debug!(%not_before, %skewed_now, "Evaluating SubjectConfirmationData NotBefore");
        if not_before > skewed_now {
            context.set_failure_message(format!(
                "Subject confirmation, in assertion '{}', with NotBefore condition of '{not_before}' is not yet valid",
                assertion.id
            ));
            return ValidationResult::Invalid;
        }
        ValidationResult::Valid
    }

    fn validate_not_on_or_after(
        &self,
        data: &SubjectConfirmationData,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(not_on_or_after) = data.not_on_or_after else {
            return Self::missing(context, params::SC_NOT_ON_OR_AFTER_REQUIRED, "NotOnOrAfter", assertion);
        };

        let skewed_now = support::saturating_sub(Utc::now(), support::clock_skew(context));
        tracing::debug!(%not_on_or_after, %skewed_now, "Evaluating SubjectConfirmationData NotOnOrAfter");
        if not_on_or_after < skewed_now {
            context.set_failure_message(format!(
                "Subject confirmation, in assertion '{}', with NotOnOrAfter condition of '{not_on_or_after}' is no longer valid",
                assertion.id
            ));
            return ValidationResult::Invalid;
        }
        ValidationResult::Valid
    }

    fn validate_recipient(
        &self,
        data: &SubjectConfirmationData,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(recipient) = data.recipient.as_deref().map(str::trim).filter(|r| !r.is_empty()) else {
            return Self::missing(context, params::SC_RECIPIENT_REQUIRED, "Recipient", assertion);
        };

        tracing::debug!(recipient, "Evaluating SubjectConfirmationData Recipient");
        let valid = match context.static_string_set(params::SC_VALID_RECIPIENTS) {
            Some(set) if !set.is_empty() => set,
            _ => {
                tracing::warn!(
                    key = params::SC_VALID_RECIPIENTS,
                    "Valid recipients not available, unable to evaluate Recipient"
                );
                context.set_failure_message(
                    "Unable to determine list of valid subject confirmation recipient endpoints",
                );
                return ValidationResult::Indeterminate;
            }
        };

        if valid.contains(recipient) {
            tracing::debug!(recipient, "Matched valid recipient");
            return ValidationResult::Valid;
        }

        tracing::debug!(recipient, "Recipient did not match any valid recipient");
        context.set_failure_message(format!(
            "Subject confirmation recipient for assertion '{}' did not match any valid recipients",
            assertion.id
        ));
        ValidationResult::Invalid
    }

    fn validate_address(
        &self,
        data: &SubjectConfirmationData,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let address = data.address.as_deref().map(str::trim).filter(|a| !a.is_empty());
        if address.is_none() {
            return Self::missing(context, params::SC_ADDRESS_REQUIRED, "Address", assertion);
        }

        if !context.static_bool_or(params::SC_CHECK_ADDRESS, true) {
            tracing::debug!("SubjectConfirmationData Address check is disabled");
            return ValidationResult::Valid;
        }

        support::check_address(
            context,
            address,
            params::SC_VALID_ADDRESSES,
            assertion,
            "SubjectConfirmationData/@Address",
        )
    }

    fn validate_in_response_to(
        &self,
        data: &SubjectConfirmationData,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        if self.in_response_to_ignored(context) {
            tracing::debug!("SubjectConfirmationData InResponseTo check is disabled");
            return ValidationResult::Valid;
        }

        let Some(in_response_to) = data.in_response_to.as_deref().map(str::trim).filter(|v| !v.is_empty())
        else {
            return Self::missing(context, params::SC_IN_RESPONSE_TO_REQUIRED, "InResponseTo", assertion);
        };

        let matched = match context.get_static(params::SC_VALID_IN_RESPONSE_TO) {
            Some(ParameterValue::String(expected)) if !expected.trim().is_empty() => {
                expected.trim() == in_response_to
            }
            Some(ParameterValue::StringSet(expected)) if !expected.is_empty() => {
                expected.contains(in_response_to)
            }
            _ => {
                tracing::warn!(
                    key = params::SC_VALID_IN_RESPONSE_TO,
                    "Valid InResponseTo not available, unable to evaluate InResponseTo"
                );
                context.set_failure_message(
                    "Unable to determine valid subject confirmation InResponseTo",
                );
                return ValidationResult::Indeterminate;
            }
        };

        if matched {
            return ValidationResult::Valid;
        }

        tracing::debug!(in_response_to, "InResponseTo did not match any outstanding request");
        context.set_failure_message(format!(
            "Subject confirmation InResponseTo '{in_response_to}' for assertion '{}' did not match a valid request",
            assertion.id
        ));
        ValidationResult::Invalid
    }
}
