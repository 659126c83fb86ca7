//! Condition validators.

mod audience;
mod delegation;
mod one_time_use;

pub use audience::AudienceRestrictionConditionValidator;
pub use delegation::DelegationRestrictionConditionValidator;
pub use one_time_use::{OneTimeUseConditionValidator, ONE_TIME_USE_CACHE_CONTEXT};

use crate::context::ValidationContext;
use crate::types::{Assertion, Condition, QName};

/// Records that `condition` is not the kind a validator services.
pub(crate) fn unsupported_condition(
    context: &mut ValidationContext,
    condition: &Condition,
    assertion: &Assertion,
    serviced: &QName,
) {
    let schema_type = condition
        .schema_type()
        .map_or_else(|| "none".to_string(), |t| t.to_string());
    context.set_failure_message(format!(
        "Condition '{}' of type '{schema_type}' in assertion '{}' was not an '{serviced}' condition",
        condition.element_name(),
        assertion.id
    ));
}
