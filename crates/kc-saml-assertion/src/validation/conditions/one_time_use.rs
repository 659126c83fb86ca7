//! `OneTimeUse` condition validator.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use kc_cache::ReplayCache;

use super::unsupported_condition;
use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::params;
use crate::result::ValidationResult;
use crate::types::{names, Assertion, Condition, QName};
use crate::validation::{support, ConditionValidator};

/// Replay cache context under which one-time use assertions are recorded.
pub const ONE_TIME_USE_CACHE_CONTEXT: &str = "saml2.Conditions.OneTimeUse";

/// Rejects an assertion carrying `OneTimeUse` that was already seen.
///
/// The expiration window is taken from [`params::COND_ONE_TIME_USE_EXPIRES`]
/// when it holds a positive duration, then from the validator default, then
/// from the replay cache default.
pub struct OneTimeUseConditionValidator {
    replay_cache: Arc<dyn ReplayCache>,
    default_expiration: Option<Duration>,
}

impl OneTimeUseConditionValidator {
    /// Creates a validator using the replay cache's default window.
    pub fn new(replay_cache: Arc<dyn ReplayCache>) -> Self {
        Self {
            replay_cache,
            default_expiration: None,
        }
    }

    /// Sets the validator-wide expiration window.
    ///
    /// Negative windows are ignored.
    #[must_use]
    pub fn with_default_expiration(mut self, expiration: Duration) -> Self {
        if expiration < Duration::zero() {
            tracing::warn!(
                seconds = expiration.num_seconds(),
                "Ignoring negative one-time use expiration"
            );
            self.default_expiration = None;
        } else {
            self.default_expiration = Some(expiration);
        }
        self
    }

    /// Expiration window for this validation.
    fn expiration(&self, context: &ValidationContext) -> Duration {
        let supplied = support::optional_duration(context, params::COND_ONE_TIME_USE_EXPIRES);

        match supplied {
            Some(d) if d > Duration::zero() => d,
            Some(d) => {
                if d < Duration::zero() {
                    tracing::warn!(
                        seconds = d.num_seconds(),
                        "Supplied one-time use expiration is negative, using configured value"
                    );
                }
                self.configured_expiration()
            }
            None => self.configured_expiration(),
        }
    }

    fn configured_expiration(&self) -> Duration {
        support::bounded(
            self.default_expiration
                .filter(|d| !d.is_zero())
                .unwrap_or_else(|| self.replay_cache.default_expiration()),
        )
    }

    /// Value tracked in the replay cache.
    fn cache_value(assertion: &Assertion) -> String {
        let issuer = assertion.trimmed_issuer().unwrap_or("NoIssuer");
        let id = match assertion.id.trim() {
            "" => "NoID",
            id => id,
        };
        format!("{issuer}--{id}")
    }
}

impl std::fmt::Debug for OneTimeUseConditionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneTimeUseConditionValidator")
            .field("default_expiration", &self.default_expiration)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ConditionValidator for OneTimeUseConditionValidator {
    fn serviced_condition(&self) -> QName {
        names::one_time_use()
    }

    async fn validate(
        &self,
        condition: &Condition,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult> {
        if !matches!(condition, Condition::OneTimeUse) {
            unsupported_condition(context, condition, assertion, &self.serviced_condition());
            return Ok(ValidationResult::Indeterminate);
        }

        let expiration = self.expiration(context);
        let expires_at = support::saturating_add(Utc::now(), expiration);
        let value = Self::cache_value(assertion);
        tracing::debug!(value = %value, expires_at = %expires_at, "Checking one-time use assertion");

        match self
            .replay_cache
            .check_and_record(ONE_TIME_USE_CACHE_CONTEXT, &value, expires_at)
            .await
        {
            Ok(false) => Ok(ValidationResult::Valid),
            Ok(true) => {
                tracing::warn!(assertion_id = %assertion.id, "One-time use assertion was replayed");
                context.set_failure_message(format!(
                    "Assertion '{}' has a one time use condition and has been used before",
                    assertion.id
                ));
                Ok(ValidationResult::Invalid)
            }
            Err(e) => {
                tracing::error!(assertion_id = %assertion.id, error = %e, "Replay cache check failed");
                context.set_failure_message(format!(
                    "Unable to check one time use condition of assertion '{}': {e}",
                    assertion.id
                ));
                Ok(ValidationResult::Indeterminate)
            }
        }
    }
}
