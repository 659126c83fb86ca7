//! Assertion validation.
//!
//! [`Saml2AssertionValidator`] drives the pipeline and dispatches to three
//! families of pluggable validators:
//!
//! - [`ConditionValidator`] for children of `Conditions`
//! - [`SubjectConfirmationValidator`] for each `SubjectConfirmation`
//! - [`StatementValidator`] for assertion statements
//!
//! Validators hold no per-call state. Everything specific to one validation
//! lives in the [`ValidationContext`] passed by `&mut`.

mod assertion;
pub mod conditions;
pub mod confirmation;
mod registry;
pub mod statements;
pub mod support;

pub use assertion::Saml2AssertionValidator;
pub use registry::{
    ConditionValidators, ServicedKey, StatementValidators, SubjectConfirmationValidators,
    ValidatorRegistry,
};

use async_trait::async_trait;

use crate::context::ValidationContext;
use crate::error::SamlResult;
use crate::result::ValidationResult;
use crate::types::{Assertion, Condition, QName, Statement, SubjectConfirmation};

/// Validates one kind of condition.
#[async_trait]
pub trait ConditionValidator: Send + Sync {
    /// Element name or schema type of the condition this validator handles.
    fn serviced_condition(&self) -> QName;

    /// Validates `condition`, which belongs to `assertion`.
    async fn validate(
        &self,
        condition: &Condition,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult>;
}

/// Validates one subject confirmation method.
#[async_trait]
pub trait SubjectConfirmationValidator: Send + Sync {
    /// Confirmation method URI this validator handles.
    fn serviced_method(&self) -> &str;

    /// Validates `confirmation`, which belongs to `assertion`.
    async fn validate(
        &self,
        confirmation: &SubjectConfirmation,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult>;
}

/// Validates one kind of statement.
#[async_trait]
pub trait StatementValidator: Send + Sync {
    /// Element name or schema type of the statement this validator handles.
    fn serviced_statement(&self) -> QName;

    /// Validates `statement`, which belongs to `assertion`.
    async fn validate(
        &self,
        statement: &Statement,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult>;
}

/// Final, deployment-specific check run after every built-in stage passed.
#[async_trait]
pub trait AssertionValidator: Send + Sync {
    /// Validates the whole assertion.
    async fn validate(
        &self,
        assertion: &Assertion,
        context: &mut ValidationContext,
    ) -> SamlResult<ValidationResult>;
}
