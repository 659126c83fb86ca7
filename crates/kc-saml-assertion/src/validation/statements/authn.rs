//! `AuthnStatement` validator.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::params;
use crate::result::ValidationResult;
use crate::types::{names, Assertion, AuthnContextClass, AuthnStatement, QName, Statement};
use crate::validation::{support, StatementValidator};

/// Hook for judging the `AuthnContext` of an authentication statement.
#[async_trait]
pub trait AuthnContextValidator: Send + Sync {
    /// Validates the statement's authentication context.
    async fn validate(
        &self,
        statement: &AuthnStatement,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult>;
}

/// Requires the authentication context class to be one of a fixed set.
#[derive(Debug, Clone, Default)]
pub struct AllowedAuthnContextClasses {
    allowed: HashSet<String>,
}

impl AllowedAuthnContextClasses {
    /// Allows the given classes.
    pub fn new(classes: impl IntoIterator<Item = AuthnContextClass>) -> Self {
        Self {
            allowed: classes.into_iter().map(|c| c.uri().to_string()).collect(),
        }
    }

    /// Also allows a class given by URI.
    #[must_use]
    pub fn with_class_ref(mut self, uri: impl Into<String>) -> Self {
        self.allowed.insert(uri.into());
        self
    }
}

#[async_trait]
impl AuthnContextValidator for AllowedAuthnContextClasses {
    async fn validate(
        &self,
        statement: &AuthnStatement,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult> {
        let class_ref = statement
            .authn_context
            .as_ref()
            .and_then(|c| c.authn_context_class_ref.as_deref())
            .map(str::trim);

        match class_ref {
            Some(class_ref) if self.allowed.contains(class_ref) => Ok(ValidationResult::Valid),
            other => {
                context.set_failure_message(format!(
                    "AuthnContextClassRef '{}' in assertion '{}' is not allowed",
                    other.unwrap_or("none"),
                    assertion.id
                ));
                Ok(ValidationResult::Invalid)
            }
        }
    }
}

/// Validates authentication statements.
///
/// Checks, in order:
///
/// - `AuthnInstant` is present, and no older than
///   [`params::STMT_AUTHN_MAX_TIME`] (plus clock skew) when that is set
/// - `SubjectLocality/@Address` is one of
///   [`params::STMT_AUTHN_VALID_ADDRESSES`], unless
///   [`params::STMT_AUTHN_CHECK_ADDRESS`] is false
/// - the configured [`AuthnContextValidator`], if any
#[derive(Clone, Default)]
pub struct AuthnStatementValidator {
    authn_context: Option<Arc<dyn AuthnContextValidator>>,
}

impl AuthnStatementValidator {
    /// Creates a validator that accepts any authentication context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the authentication context hook.
    #[must_use]
    pub fn with_authn_context_validator(mut self, validator: Arc<dyn AuthnContextValidator>) -> Self {
        self.authn_context = Some(validator);
        self
    }

    fn validate_authn_instant(
        statement: &AuthnStatement,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(authn_instant) = statement.authn_instant else {
            tracing::warn!(assertion_id = %assertion.id, "AuthnStatement has no AuthnInstant");
            context.set_failure_message(format!(
                "AuthnStatement in assertion '{}' has no AuthnInstant",
                assertion.id
            ));
            return ValidationResult::Invalid;
        };

        let Some(max_age) = support::optional_duration(context, params::STMT_AUTHN_MAX_TIME) else {
            tracing::debug!("Max time since authentication not supplied, skipping AuthnInstant age check");
            return ValidationResult::Valid;
        };

        let Some(latest_valid) = authn_instant.checked_add_signed(max_age + support::clock_skew(context))
        else {
            tracing::warn!(assertion_id = %assertion.id, %authn_instant, "AuthnInstant is out of range");
            context.set_failure_message(format!(
                "AuthnStatement/@AuthnInstant '{authn_instant}' in assertion '{}' is out of range",
                assertion.id
            ));
            return ValidationResult::Invalid;
        };
        if Utc::now() > latest_valid {
            tracing::warn!(
                assertion_id = %assertion.id,
                %authn_instant,
                %latest_valid,
                "AuthnInstant is older than the maximum time since authentication"
            );
            context.set_failure_message(format!(
                "AuthnStatement/@AuthnInstant '{authn_instant}' in assertion '{}' is older than allowed",
                assertion.id
            ));
            return ValidationResult::Invalid;
        }
        ValidationResult::Valid
    }

    fn validate_subject_locality(
        statement: &AuthnStatement,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        if !context.static_bool_or(params::STMT_AUTHN_CHECK_ADDRESS, true) {
            tracing::debug!("SubjectLocality Address check is disabled");
            return ValidationResult::Valid;
        }

        let address = statement
            .subject_locality
            .as_ref()
            .and_then(|l| l.address.as_deref());
        support::check_address(
            context,
            address,
            params::STMT_AUTHN_VALID_ADDRESSES,
            assertion,
            "SubjectLocality/@Address",
        )
    }
}

impl std::fmt::Debug for AuthnStatementValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthnStatementValidator")
            .field("authn_context", &self.authn_context.is_some())
            .finish()
    }
}

#[async_trait]
impl StatementValidator for AuthnStatementValidator {
    fn serviced_statement(&self) -> QName {
        names::authn_statement()
    }

    async fn validate(
        &self,
        statement: &Statement,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult> {
        let Statement::Authn(authn) = statement else {
            tracing::warn!(
                assertion_id = %assertion.id,
                statement = %statement.element_name(),
                "Statement is not an AuthnStatement, unable to process"
            );
            context.set_failure_message(format!(
                "Statement '{}' in assertion '{}' was not an '{}' statement",
                statement.element_name(),
                assertion.id,
                self.serviced_statement()
            ));
            return Ok(ValidationResult::Indeterminate);
        };

        let result = Self::validate_authn_instant(authn, assertion, context);
        if result != ValidationResult::Valid {
            return Ok(result);
        }

        let result = Self::validate_subject_locality(authn, assertion, context);
        if result != ValidationResult::Valid {
            return Ok(result);
        }

        let Some(hook) = &self.authn_context else {
            return Ok(ValidationResult::Valid);
        };
        match hook.validate(authn, assertion, context).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!(assertion_id = %assertion.id, error = %e, "AuthnContext evaluation failed");
                context.set_failure_message(format!(
                    "Unable to evaluate AuthnContext of assertion '{}': {e}",
                    assertion.id
                ));
                Ok(ValidationResult::Indeterminate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};

    use super::*;
    use crate::context::ParameterValue;
    use crate::error::SamlError;
    use crate::types::{AttributeStatement, SubjectLocality};

    struct Broken;

    #[async_trait]
    impl AuthnContextValidator for Broken {
        async fn validate(
            &self,
            _statement: &AuthnStatement,
            _assertion: &Assertion,
            _context: &mut ValidationContext,
        ) -> SamlResult<ValidationResult> {
            Err(SamlError::Internal("context store unavailable".to_string()))
        }
    }

    fn authenticated_ago(minutes: i64) -> Statement {
        Statement::Authn(
            AuthnStatement::new(AuthnContextClass::PasswordProtectedTransport)
                .with_authn_instant(Utc::now() - Duration::minutes(minutes)),
        )
    }

    async fn run(
        validator: &AuthnStatementValidator,
        statement: &Statement,
        ctx: &mut ValidationContext,
    ) -> ValidationResult {
        validator
            .validate(statement, &Assertion::new("idp"), ctx)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn authn_instant_age() {
        let validator = AuthnStatementValidator::new();
        let statement = authenticated_ago(60);

        assert_eq!(
            run(&validator, &statement, &mut ValidationContext::default()).await,
            ValidationResult::Valid
        );

        let mut ctx = ValidationContext::default()
            .with_static(params::STMT_AUTHN_MAX_TIME, Duration::minutes(30));
        assert_eq!(run(&validator, &statement, &mut ctx).await, ValidationResult::Invalid);

        // Clock skew extends the window
        let mut ctx = ValidationContext::default()
            .with_static(params::STMT_AUTHN_MAX_TIME, Duration::minutes(57))
            .with_static(params::CLOCK_SKEW, Duration::minutes(5));
        assert_eq!(run(&validator, &statement, &mut ctx).await, ValidationResult::Valid);
    }

    #[tokio::test]
    async fn extreme_authn_instants_do_not_panic() {
        let validator = AuthnStatementValidator::new();
        let at = |instant| {
            Statement::Authn(AuthnStatement::new(AuthnContextClass::Password).with_authn_instant(instant))
        };

        let mut ctx = ValidationContext::default()
            .with_static(params::STMT_AUTHN_MAX_TIME, Duration::minutes(30));
        assert_eq!(
            run(&validator, &at(DateTime::<Utc>::MAX_UTC), &mut ctx).await,
            ValidationResult::Invalid
        );
        assert!(ctx.failure_message().unwrap().contains("out of range"));

        let mut ctx = ValidationContext::default()
            .with_static(params::STMT_AUTHN_MAX_TIME, Duration::MAX)
            .with_static(params::CLOCK_SKEW, i64::MAX);
        assert_eq!(
            run(&validator, &at(DateTime::<Utc>::MIN_UTC), &mut ctx).await,
            ValidationResult::Invalid
        );

        // A max age that is not representable is treated as not supplied
        let mut ctx = ValidationContext::default().with_static(params::STMT_AUTHN_MAX_TIME, i64::MIN);
        assert_eq!(
            run(&validator, &at(DateTime::<Utc>::MAX_UTC), &mut ctx).await,
            ValidationResult::Valid
        );
    }

    #[tokio::test]
    async fn missing_authn_instant_is_invalid() {
        let mut statement = AuthnStatement::new(AuthnContextClass::Password);
        statement.authn_instant = None;
        assert_eq!(
            run(
                &AuthnStatementValidator::new(),
                &Statement::Authn(statement),
                &mut ValidationContext::default()
            )
            .await,
            ValidationResult::Invalid
        );
    }

    #[tokio::test]
    async fn subject_locality_address() {
        let validator = AuthnStatementValidator::new();
        let statement = Statement::Authn(
            AuthnStatement::new(AuthnContextClass::Password).with_locality("192.168.0.10"),
        );
        let valid = ParameterValue::AddressSet(["192.168.0.10".parse().unwrap()].into_iter().collect());

        let mut ctx = ValidationContext::default().with_static(params::STMT_AUTHN_VALID_ADDRESSES, valid);
        assert_eq!(run(&validator, &statement, &mut ctx).await, ValidationResult::Valid);

        let other = ParameterValue::AddressSet(["10.0.0.1".parse().unwrap()].into_iter().collect());
        let mut ctx = ValidationContext::default().with_static(params::STMT_AUTHN_VALID_ADDRESSES, other);
        assert_eq!(run(&validator, &statement, &mut ctx).await, ValidationResult::Invalid);

        let mut ctx = ValidationContext::default();
        assert_eq!(run(&validator, &statement, &mut ctx).await, ValidationResult::Indeterminate);

        let mut ctx = ValidationContext::default().with_static(params::STMT_AUTHN_CHECK_ADDRESS, false);
        assert_eq!(run(&validator, &statement, &mut ctx).await, ValidationResult::Valid);

        let mut no_address = AuthnStatement::new(AuthnContextClass::Password);
        no_address.subject_locality = Some(SubjectLocality {
            address: None,
            dns_name: Some("client.example.com".to_string()),
        });
        assert_eq!(
            run(&validator, &Statement::Authn(no_address), &mut ValidationContext::default()).await,
            ValidationResult::Valid
        );
    }

    #[tokio::test]
    async fn authn_context_hook() {
        let statement = authenticated_ago(1);
        let mut ctx = ValidationContext::default();

        let allow_mfa = AuthnStatementValidator::new().with_authn_context_validator(Arc::new(
            AllowedAuthnContextClasses::new([AuthnContextClass::Kerberos]),
        ));
        assert_eq!(run(&allow_mfa, &statement, &mut ctx).await, ValidationResult::Invalid);

        let allow_ppt = AuthnStatementValidator::new().with_authn_context_validator(Arc::new(
            AllowedAuthnContextClasses::default()
                .with_class_ref(AuthnContextClass::PasswordProtectedTransport.uri()),
        ));
        assert_eq!(run(&allow_ppt, &statement, &mut ctx).await, ValidationResult::Valid);

        let broken = AuthnStatementValidator::new().with_authn_context_validator(Arc::new(Broken));
        assert_eq!(run(&broken, &statement, &mut ctx).await, ValidationResult::Indeterminate);
        assert!(ctx.failure_message().unwrap().contains("context store unavailable"));
    }

    #[tokio::test]
    async fn other_statements_are_indeterminate() {
        let statement = Statement::Attribute(AttributeStatement::default());
        assert_eq!(
            run(&AuthnStatementValidator::new(), &statement, &mut ValidationContext::default()).await,
            ValidationResult::Indeterminate
        );
    }
}
