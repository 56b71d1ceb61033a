//! Pre-execution request validation

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::request::Request;

/// Separator used when joining violation messages into one failure
pub const VIOLATION_SEPARATOR: &str = "; ";

/// A single field-level problem found in a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationViolation {
    pub field: String,
    pub message: String,
}

impl ValidationViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Inspects a request and reports what is wrong with it.
///
/// Validators are pure: no I/O, no suspension.
pub trait Validator<R: Request>: Send + Sync {
    fn validate(&self, request: &R) -> Vec<ValidationViolation>;
}

impl<R, F> Validator<R> for F
where
    R: Request,
    F: Fn(&R) -> Vec<ValidationViolation> + Send + Sync,
{
    fn validate(&self, request: &R) -> Vec<ValidationViolation> {
        self(request)
    }
}

/// Every validator registered for one request type
pub struct ValidationStage<R: Request> {
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R: Request> ValidationStage<R> {
    pub fn new(validators: Vec<Arc<dyn Validator<R>>>) -> Self {
        Self { validators }
    }

    pub fn push(&mut self, validator: Arc<dyn Validator<R>>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run all validators and collect their violations.
    ///
    /// Not fail-fast: a violation from one validator does not stop the next.
    pub fn run(&self, request: &R) -> Vec<ValidationViolation> {
        self.validators
            .iter()
            .flat_map(|validator| validator.validate(request))
            .collect()
    }
}

/// Join violation messages into the text of a single failure
pub fn join_violations(violations: &[ValidationViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(VIOLATION_SEPARATOR)
}
