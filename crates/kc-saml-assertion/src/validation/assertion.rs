//! SAML 2.0 assertion validation pipeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kc_cache::ReplayCache;

use super::conditions::{
    AudienceRestrictionConditionValidator, DelegationRestrictionConditionValidator,
    OneTimeUseConditionValidator,
};
use super::confirmation::{
    BearerSubjectConfirmationValidator, HolderOfKeySubjectConfirmationValidator,
    SenderVouchesSubjectConfirmationValidator,
};
use super::statements::AuthnStatementValidator;
use super::{
    support, AssertionValidator, ConditionValidator, ConditionValidators, StatementValidator,
    StatementValidators, SubjectConfirmationValidator, SubjectConfirmationValidators,
};
use crate::context::ValidationContext;
use crate::params;
use crate::result::ValidationResult;
use crate::signature::{
    CriteriaSet, Criterion, SamlSignatureProfileValidator, Signature, SignaturePrevalidator,
    SignatureTrustEngine, UsageType,
};
use crate::types::{Assertion, Condition, QName, SAML_VERSION_20};

/// Validates SAML 2.0 assertions.
///
/// Stages run in order and the first one that is not `Valid` decides the
/// outcome:
///
/// 1. basic data (version, issue instant, issuer)
/// 2. signature
/// 3. required conditions, condition time bounds, then each condition
/// 4. subject confirmation
/// 5. statements
/// 6. the extension validator, if configured
///
/// The validator is immutable and can be shared across tasks behind an
/// `Arc`; all per-call state lives in the [`ValidationContext`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use kc_cache::{MemoryReplayStorage, StorageReplayCache};
/// use kc_saml_assertion::{params, ParameterValue, Saml2AssertionValidator, ValidationContext};
///
/// # async fn run(assertion: kc_saml_assertion::types::Assertion) {
/// let cache = Arc::new(StorageReplayCache::new(MemoryReplayStorage::new()));
/// let validator = Saml2AssertionValidator::with_defaults(cache);
///
/// let mut context = ValidationContext::default()
///     .with_static(params::SIGNATURE_REQUIRED, false)
///     .with_static(
///         params::COND_VALID_AUDIENCES,
///         ParameterValue::string_set(["https://sp.example.com"]),
///     );
///
/// let result = validator.validate(&assertion, &mut context).await;
/// println!("{result}: {:?}", context.failure_message());
/// # }
/// ```
pub struct Saml2AssertionValidator {
    conditions: ConditionValidators,
    confirmations: SubjectConfirmationValidators,
    statements: StatementValidators,
    extension: Option<Arc<dyn AssertionValidator>>,
    trust_engine: Option<Arc<dyn SignatureTrustEngine>>,
    prevalidator: Option<Arc<dyn SignaturePrevalidator>>,
}

impl Saml2AssertionValidator {
    /// Creates a validator from registries, with no signature collaborators.
    pub fn new(
        conditions: ConditionValidators,
        confirmations: SubjectConfirmationValidators,
        statements: StatementValidators,
    ) -> Self {
        Self {
            conditions,
            confirmations,
            statements,
            extension: None,
            trust_engine: None,
            prevalidator: None,
        }
    }

    /// Creates a validator with every built-in validator registered.
    ///
    /// One-time use conditions are tracked in `replay_cache`. Signatures are
    /// pre-validated against the SAML signature profile; a trust engine must
    /// still be supplied, here or per call, to accept signed assertions.
    pub fn with_defaults(replay_cache: Arc<dyn ReplayCache>) -> Self {
        let conditions: Vec<Arc<dyn ConditionValidator>> = vec![
            Arc::new(AudienceRestrictionConditionValidator::new()),
            Arc::new(OneTimeUseConditionValidator::new(replay_cache)),
            Arc::new(DelegationRestrictionConditionValidator::new()),
        ];
        let confirmations: Vec<Arc<dyn SubjectConfirmationValidator>> = vec![
            Arc::new(BearerSubjectConfirmationValidator::new()),
            Arc::new(SenderVouchesSubjectConfirmationValidator::new()),
            Arc::new(HolderOfKeySubjectConfirmationValidator::new()),
        ];
        let statements: Vec<Arc<dyn StatementValidator>> =
            vec![Arc::new(AuthnStatementValidator::new())];

        Self::new(
            ConditionValidators::new(conditions),
            SubjectConfirmationValidators::new(confirmations),
            StatementValidators::new(statements),
        )
        .with_prevalidator(Arc::new(SamlSignatureProfileValidator::new()))
    }

    /// Sets the default signature trust engine.
    #[must_use]
    pub fn with_trust_engine(mut self, engine: Arc<dyn SignatureTrustEngine>) -> Self {
        self.trust_engine = Some(engine);
        self
    }

    /// Sets the default signature pre-validator.
    #[must_use]
    pub fn with_prevalidator(mut self, prevalidator: Arc<dyn SignaturePrevalidator>) -> Self {
        self.prevalidator = Some(prevalidator);
        self
    }

    /// Sets the extension validator run after all built-in stages.
    #[must_use]
    pub fn with_extension(mut self, extension: Arc<dyn AssertionValidator>) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Registered condition validators.
    #[must_use]
    pub fn condition_validators(&self) -> &ConditionValidators {
        &self.conditions
    }

    /// Registered subject confirmation validators.
    #[must_use]
    pub fn subject_confirmation_validators(&self) -> &SubjectConfirmationValidators {
        &self.confirmations
    }

    /// Registered statement validators.
    #[must_use]
    pub fn statement_validators(&self) -> &StatementValidators {
        &self.statements
    }

    /// Validates `assertion`.
    ///
    /// Any result other than `Valid` leaves a description in the context's
    /// failure message.
    pub async fn validate(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        Self::trace_assertion(assertion, context);

        let result = self.validate_basic_data(assertion, context);
        if result != ValidationResult::Valid {
            return Self::finish(assertion, result);
        }

        let result = self.validate_signature(assertion, context).await;
        if result != ValidationResult::Valid {
            return Self::finish(assertion, result);
        }

        let result = self.validate_conditions(assertion, context).await;
        if result != ValidationResult::Valid {
            return Self::finish(assertion, result);
        }

        let result = self.validate_subject_confirmation(assertion, context).await;
        if result != ValidationResult::Valid {
            return Self::finish(assertion, result);
        }

        let result = self.validate_statements(assertion, context).await;
        if result != ValidationResult::Valid {
            return Self::finish(assertion, result);
        }

        let result = match &self.extension {
            Some(extension) => match extension.validate(assertion, context).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(assertion_id = %assertion.id, error = %e, "Extension validator failed");
                    context.set_failure_message(format!(
                        "Assertion '{}' could not be evaluated by the extension validator: {e}",
                        assertion.id
                    ));
                    ValidationResult::Indeterminate
                }
            },
            None => ValidationResult::Valid,
        };
        Self::finish(assertion, result)
    }

    fn finish(assertion: &Assertion, result: ValidationResult) -> ValidationResult {
        tracing::debug!(assertion_id = %assertion.id, %result, "Assertion validation finished");
        result
    }

    fn trace_assertion(assertion: &Assertion, context: &ValidationContext) {
        if !tracing::enabled!(tracing::Level::TRACE) {
            return;
        }
        match serde_json::to_string_pretty(assertion) {
            Ok(json) => tracing::trace!(assertion_id = %assertion.id, "SAML 2 Assertion being validated:\n{json}"),
            Err(e) => tracing::error!(error = %e, "Unable to serialize SAML 2 Assertion for logging"),
        }
        tracing::trace!(
            static_parameters = ?context.static_parameters(),
            dynamic_parameters = ?context.dynamic_parameters(),
            "SAML 2 Assertion validation context"
        );
    }

    // ========================================================================
    // Basic data
    // ========================================================================

    fn validate_basic_data(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        if assertion.version != SAML_VERSION_20 {
            context.set_failure_message(format!(
                "Assertion '{}' is not a SAML 2.0 version Assertion",
                assertion.id
            ));
            return ValidationResult::Invalid;
        }

        let result = Self::validate_issue_instant(assertion, context);
        if result != ValidationResult::Valid {
            return result;
        }

        Self::validate_issuer(assertion, context)
    }

    fn validate_issue_instant(assertion: &Assertion, context: &mut ValidationContext) -> ValidationResult {
        Self::validate_issue_instant_at(assertion, context, Utc::now())
    }

    /// Accepts IssueInstant within `[now - skew - lifetime, now + skew]`.
    fn validate_issue_instant_at(
        assertion: &Assertion,
        context: &mut ValidationContext,
        now: DateTime<Utc>,
    ) -> ValidationResult {
        let Some(issue_instant) = assertion.issue_instant else {
            context.set_failure_message(format!(
                "Assertion '{}' did not contain the required IssueInstant",
                assertion.id
            ));
            return ValidationResult::Invalid;
        };

        let clock_skew = support::clock_skew(context);
        let lifetime = support::lifetime(context);

        let latest_valid = support::saturating_add(now, clock_skew);
        if issue_instant > latest_valid {
            tracing::warn!(%issue_instant, %latest_valid, "Assertion was not yet valid");
            context.set_failure_message("Assertion IssueInstant was invalid, issued in future");
            return ValidationResult::Invalid;
        }

        let expiration = support::saturating_add(issue_instant, clock_skew + lifetime);
        if expiration < now {
            tracing::warn!(%issue_instant, %expiration, %now, "Assertion IssueInstant was expired");
            context.set_failure_message("Assertion IssueInstant was invalid, expired");
            return ValidationResult::Invalid;
        }
        ValidationResult::Valid
    }

    fn validate_issuer(assertion: &Assertion, context: &mut ValidationContext) -> ValidationResult {
        let Some(issuer) = assertion.trimmed_issuer() else {
            tracing::warn!(assertion_id = %assertion.id, "Assertion Issuer was missing and was required");
            context.set_failure_message("Assertion Issuer was missing and was required");
            return ValidationResult::Invalid;
        };
        tracing::debug!(issuer, "Evaluating Assertion Issuer");

        if context.has_static(params::VALID_ISSUERS)
            && context.static_string_set(params::VALID_ISSUERS).is_none()
        {
            tracing::warn!(key = params::VALID_ISSUERS, "Valid issuers parameter is not a string set");
            context.set_failure_message("Unable to determine list of valid issuers");
            return ValidationResult::Indeterminate;
        }

        // Without a list of valid issuers any issuer is accepted.
        let Some(valid_issuers) = context
            .static_string_set(params::VALID_ISSUERS)
            .filter(|set| !set.is_empty())
        else {
            tracing::warn!("Set of valid issuers was not available, unable to evaluate Issuer");
            return ValidationResult::Valid;
        };

        if valid_issuers.contains(issuer) {
            tracing::debug!(issuer, "Matched valid issuer");
            return ValidationResult::Valid;
        }

        tracing::debug!(issuer, "Issuer did not match any valid issuer");
        context.set_failure_message(format!(
            "Issuer of Assertion '{}' did not match any valid issuers",
            assertion.id
        ));
        ValidationResult::Invalid
    }

    // ========================================================================
    // Signature
    // ========================================================================

    async fn validate_signature(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(signature) = assertion.signature.as_ref() else {
            if context.static_bool_or(params::SIGNATURE_REQUIRED, true) {
                context.set_failure_message("Assertion was required to be signed, but was not");
                return ValidationResult::Invalid;
            }
            tracing::debug!("Assertion was not required to be signed, and was not signed");
            return ValidationResult::Valid;
        };

        self.perform_signature_validation(assertion, signature, context)
            .await
    }

    async fn perform_signature_validation(
        &self,
        assertion: &Assertion,
        signature: &Signature,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(engine) = context
            .static_trust_engine(params::SIGNATURE_VALIDATION_TRUST_ENGINE)
            .or_else(|| self.trust_engine.clone())
        else {
            tracing::warn!("Signature validation was necessary, but no signature trust engine was available");
            context.set_failure_message("Assertion signature could not be evaluated due to internal error");
            return ValidationResult::Indeterminate;
        };

        let Some(prevalidator) = context
            .static_prevalidator(params::SIGNATURE_VALIDATION_PREVALIDATOR)
            .or_else(|| self.prevalidator.clone())
        else {
            tracing::warn!("Signature validation was necessary, but no signature pre-validator was available");
            context.set_failure_message("Assertion signature could not be evaluated due to internal error");
            return ValidationResult::Indeterminate;
        };

        let issuer = assertion.issuer.as_deref().unwrap_or_default();
        tracing::debug!(assertion_id = %assertion.id, issuer, "Attempting signature validation");

        if let Err(e) = prevalidator.validate(signature) {
            let message = format!("Assertion Signature failed pre-validation: {e}");
            tracing::warn!(assertion_id = %assertion.id, "{message}");
            context.set_failure_message(message);
            return ValidationResult::Invalid;
        }

        let criteria = Self::signature_criteria(assertion, context);
        match engine.validate(signature, &criteria).await {
            Ok(true) => {
                tracing::debug!(assertion_id = %assertion.id, issuer, "Assertion signature is valid");
                ValidationResult::Valid
            }
            Ok(false) => {
                let message = format!(
                    "Signature of Assertion '{}' from Issuer '{issuer}' was not valid",
                    assertion.id
                );
                tracing::warn!("{message}");
                context.set_failure_message(message);
                ValidationResult::Invalid
            }
            Err(e) => {
                let message = format!(
                    "A problem was encountered evaluating the signature over Assertion with ID '{}': {e}",
                    assertion.id
                );
                tracing::warn!("{message}");
                context.set_failure_message(message);
                ValidationResult::Indeterminate
            }
        }
    }

    /// Caller criteria plus the issuer entity ID and signing usage.
    fn signature_criteria(assertion: &Assertion, context: &ValidationContext) -> CriteriaSet {
        let mut criteria = context
            .static_criteria_set(params::SIGNATURE_VALIDATION_CRITERIA_SET)
            .cloned()
            .unwrap_or_default();

        if let Some(issuer) = assertion.trimmed_issuer() {
            criteria.add_if_absent(Criterion::EntityId(issuer.to_string()));
        }
        criteria.add_if_absent(Criterion::Usage(UsageType::Signing));
        criteria
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    async fn validate_conditions(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let result = Self::validate_required_conditions(assertion, context);
        if result != ValidationResult::Valid {
            return result;
        }

        let Some(conditions) = assertion.conditions.as_ref() else {
            tracing::debug!("Assertion contained no Conditions element");
            return ValidationResult::Valid;
        };

        let result = Self::validate_conditions_time_bounds(assertion, context, Utc::now());
        if result != ValidationResult::Valid {
            return result;
        }

        for condition in &conditions.conditions {
            let result = self.validate_condition(condition, assertion, context).await;
            if result != ValidationResult::Valid {
                return result;
            }
        }
        ValidationResult::Valid
    }

    async fn validate_condition(
        &self,
        condition: &Condition,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let element_name = condition.element_name();
        let schema_type = condition.schema_type();
        let type_label = describe_type(schema_type.as_ref());

        let Some(validator) = self.conditions.lookup(&element_name, schema_type.as_ref()) else {
            let message = format!(
                "Unknown Condition '{element_name}' of type '{type_label}' in assertion '{}'",
                assertion.id
            );
            tracing::debug!("{message}");
            context.set_failure_message(message);
            return ValidationResult::Indeterminate;
        };

        let result = match validator.validate(condition, assertion, context).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(condition = %element_name, error = %e, "Condition validator failed");
                context.set_failure_message(e.to_string());
                ValidationResult::Indeterminate
            }
        };

        if result != ValidationResult::Valid {
            let mut message = format!(
                "Condition '{element_name}' of type '{type_label}' in assertion '{}' was not valid.",
                assertion.id
            );
            if let Some(inner) = context.failure_message() {
                message = format!("{message}: {inner}");
            }
            tracing::debug!("{message}");
            context.set_failure_message(message);
        }
        result
    }

    fn validate_required_conditions(
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let required: Vec<QName> = match context.static_qname_set(params::COND_REQUIRED_CONDITIONS) {
            Some(set) if !set.is_empty() => {
                let mut names: Vec<QName> = set.iter().cloned().collect();
                names.sort();
                names
            }
            _ => {
                tracing::debug!("No Conditions were indicated as required");
                return ValidationResult::Valid;
            }
        };

        let present = assertion
            .conditions
            .as_ref()
            .map(|c| c.conditions.as_slice())
            .unwrap_or_default();
        if present.is_empty() {
            let message =
                "At least 1 Condition was indicated as required, but Assertion contained no Conditions";
            tracing::warn!("{message}");
            context.set_failure_message(message);
            return ValidationResult::Invalid;
        }

        for name in &required {
            if !present.iter().any(|c| c.is_named(name)) {
                let message = format!(
                    "Condition '{name}' was required, but was not found in assertion '{}'",
                    assertion.id
                );
                tracing::warn!("{message}");
                context.set_failure_message(message);
                return ValidationResult::Invalid;
            }
        }
        ValidationResult::Valid
    }

    /// NotBefore must not pass `now + skew`; NotOnOrAfter must reach `now - skew`.
    fn validate_conditions_time_bounds(
        assertion: &Assertion,
        context: &mut ValidationContext,
        now: DateTime<Utc>,
    ) -> ValidationResult {
        let Some(conditions) = assertion.conditions.as_ref() else {
            return ValidationResult::Valid;
        };

        let clock_skew = support::clock_skew(context);

        if let Some(not_before) = conditions.not_before {
            let skewed_now = support::saturating_add(now, clock_skew);
            tracing::debug!(%not_before, %skewed_now, "Evaluating Conditions NotBefore");
            if not_before > skewed_now {
                context.set_failure_message(format!(
                    "Assertion '{}' with NotBefore condition of '{not_before}' is not yet valid",
                    assertion.id
                ));
                return ValidationResult::Invalid;
            }
        }

        if let Some(not_on_or_after) = conditions.not_on_or_after {
            let skewed_now = support::saturating_sub(now, clock_skew);
            tracing::debug!(%not_on_or_after, %skewed_now, "Evaluating Conditions NotOnOrAfter");
            if not_on_or_after < skewed_now {
                context.set_failure_message(format!(
                    "Assertion '{}' with NotOnOrAfter condition of '{not_on_or_after}' is no longer valid",
                    assertion.id
                ));
                return ValidationResult::Invalid;
            }
        }
        ValidationResult::Valid
    }

    // ========================================================================
    // Subject confirmation
    // ========================================================================

    async fn validate_subject_confirmation(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        let Some(subject) = assertion.subject.as_ref() else {
            tracing::debug!("Assertion contains no Subject, skipping subject confirmation");
            return ValidationResult::Valid;
        };

        if subject.subject_confirmations.is_empty() {
            tracing::debug!("Assertion contains no SubjectConfirmations, skipping subject confirmation");
            return ValidationResult::Valid;
        }

        for confirmation in &subject.subject_confirmations {
            let Some(validator) = self.confirmations.get(&confirmation.method) else {
                tracing::debug!(method = %confirmation.method, "No validator for subject confirmation method");
                continue;
            };

            match validator.validate(confirmation, assertion, context).await {
                Ok(ValidationResult::Valid) => {
                    tracing::debug!(method = %confirmation.method, "Subject confirmation met");
                    context.set_dynamic(params::CONFIRMED_SUBJECT_CONFIRMATION, confirmation.clone());
                    return ValidationResult::Valid;
                }
                Ok(result) => {
                    tracing::debug!(method = %confirmation.method, %result, "Subject confirmation not met");
                }
                Err(e) => {
                    tracing::warn!(
                        method = %confirmation.method,
                        error = %e,
                        "Error while executing subject confirmation validation"
                    );
                }
            }
        }

        let message = format!(
            "No subject confirmation methods were met for assertion with ID '{}'",
            assertion.id
        );
        tracing::debug!("{message}");
        context.set_failure_message(message);
        ValidationResult::Invalid
    }

    // ========================================================================
    // Statements
    // ========================================================================

    async fn validate_statements(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> ValidationResult {
        for statement in &assertion.statements {
            let element_name = statement.element_name();
            let schema_type = statement.schema_type();

            let Some(validator) = self.statements.lookup(&element_name, schema_type.as_ref()) else {
                tracing::debug!(statement = %element_name, "No validator for statement, ignoring");
                continue;
            };

            match validator.validate(statement, assertion, context).await {
                Ok(ValidationResult::Valid) => {}
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(statement = %element_name, error = %e, "Statement validator failed");
                    context.set_failure_message(format!(
                        "Statement '{element_name}' in assertion '{}' could not be evaluated: {e}",
                        assertion.id
                    ));
                    return ValidationResult::Indeterminate;
                }
            }
        }
        ValidationResult::Valid
    }
}

impl std::fmt::Debug for Saml2AssertionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Saml2AssertionValidator")
            .field("conditions", &self.conditions)
            .field("confirmations", &self.confirmations)
            .field("statements", &self.statements)
            .field("extension", &self.extension.is_some())
            .field("trust_engine", &self.trust_engine.is_some())
            .field("prevalidator", &self.prevalidator.is_some())
            .finish()
    }
}

fn describe_type(schema_type: Option<&QName>) -> String {
    schema_type.map_or_else(|| "none".to_string(), ToString::to_string)
}
