//! `DelegationRestriction` condition validator.

use async_trait::async_trait;

use super::unsupported_condition;
use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::result::ValidationResult;
use crate::types::{names, Assertion, Condition, QName};
use crate::validation::ConditionValidator;

/// Accepts delegation restriction conditions.
///
/// Delegation chains are informational here; deployments that enforce
/// them register their own validator under the same schema type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelegationRestrictionConditionValidator;

impl DelegationRestrictionConditionValidator {
    /// Creates the validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConditionValidator for DelegationRestrictionConditionValidator {
    fn serviced_condition(&self) -> QName {
        names::delegation_restriction_type()
    }

    async fn validate(
        &self,
        condition: &Condition,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult> {
        if let Condition::DelegationRestriction(restriction) = condition {
            tracing::debug!(
                assertion_id = %assertion.id,
                delegates = restriction.delegates.len(),
                "Accepting delegation restriction"
            );
            return Ok(ValidationResult::Valid);
        }

        unsupported_condition(context, condition, assertion, &self.serviced_condition());
        Ok(ValidationResult::Indeterminate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Delegate, DelegationRestriction, NameId};

    #[tokio::test]
    async fn accepts_only_delegation_restrictions() {
        let validator = DelegationRestrictionConditionValidator::new();
        let assertion = Assertion::new("idp");
        let mut ctx = ValidationContext::default();

        let delegation = Condition::DelegationRestriction(DelegationRestriction {
            delegates: vec![Delegate {
                name_id: Some(NameId::persistent("proxy.example.com")),
                delegation_instant: None,
                confirmation_method: None,
            }],
        });
        assert_eq!(
            validator.validate(&delegation, &assertion, &mut ctx).await.unwrap(),
            ValidationResult::Valid
        );
        assert!(ctx.failure_message().is_none());

        assert_eq!(
            validator
                .validate(&Condition::OneTimeUse, &assertion, &mut ctx)
                .await
                .unwrap(),
            ValidationResult::Indeterminate
        );
    }
}
