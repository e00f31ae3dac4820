//! Result algebra of the core validator contract.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::value::Value;

/// Severity of a failure. `Error` dominates `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Warning,
    Error,
}

impl ErrorLevel {
    /// The severity a failure has under `mode`; `None` when failures are ignored.
    pub fn for_mode(mode: ValidationMode) -> Option<Self> {
        match mode {
            ValidationMode::None => None,
            ValidationMode::Soft => Some(Self::Warning),
            ValidationMode::Hard => Some(Self::Error),
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Failure category. Informational only: severity never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The value does not have the schema's basic shape.
    TypeMismatch,
    /// Range, length, pattern, divisibility or allowed-value failures.
    Constraint,
    UnknownKey,
    /// A custom serializer or deserializer reported an error.
    CustomSerDes,
    /// The value matched a `not` schema's excluded shape.
    Exclusion,
    /// No `oneOf` alternative matched.
    NoMatch,
    /// JSON text could not be parsed or produced.
    Json,
}

pub type LazyMessage = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct ValidationFailure {
    pub kind: ErrorKind,
    pub level: ErrorLevel,
    pub path: LazyPath,
    message: LazyMessage,
    /// Best-effort representation of the value, so soft callers can keep building the
    /// rest of the tree.
    pub invalid_value: Value,
}

impl ValidationFailure {
    pub fn new(
        kind: ErrorKind,
        level: ErrorLevel,
        path: LazyPath,
        message: impl Fn() -> String + Send + Sync + 'static,
        invalid_value: Value,
    ) -> Self {
        Self {
            kind,
            level,
            path,
            message: Arc::new(message),
            invalid_value,
        }
    }

    pub fn message(&self) -> String {
        (self.message)()
    }

    /// `message @ path`, the form shown to users.
    pub fn formatted(&self) -> String {
        format!("{}{}", self.message(), self.path.at_path())
    }

    pub fn with_invalid_value(mut self, invalid_value: Value) -> Self {
        self.invalid_value = invalid_value;
        self
    }
}

impl fmt::Debug for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationFailure")
            .field("kind", &self.kind)
            .field("level", &self.level)
            .field("message", &self.formatted())
            .finish()
    }
}

/// Outcome of the core contract: the (possibly transformed) value, or a failure.
pub type Validation = Result<Value, ValidationFailure>;

/// Builds the failure for `mode`, or succeeds with `invalid_value` when `mode` ignores
/// failures.
pub(crate) fn fail(
    mode: ValidationMode,
    kind: ErrorKind,
    path: &LazyPath,
    message: impl Fn() -> String + Send + Sync + 'static,
    invalid_value: Value,
) -> Validation {
    match ErrorLevel::for_mode(mode) {
        None => Ok(invalid_value),
        Some(level) => Err(ValidationFailure::new(
            kind,
            level,
            path.clone(),
            message,
            invalid_value,
        )),
    }
}

/// `Expected <what>, found <type>` for type mismatches.
pub(crate) fn type_mismatch(
    mode: ValidationMode,
    expected: &'static str,
    value: &Value,
    path: &LazyPath,
) -> Validation {
    let found = value.type_name();
    fail(
        mode,
        ErrorKind::TypeMismatch,
        path,
        move || format!("Expected {expected}, found {found}"),
        value.clone(),
    )
}

/// Picks the more severe of two outcomes: a failure beats a success, an error beats a
/// warning, and `a` wins ties.
pub fn more_severe(a: Validation, b: Validation) -> Validation {
    match (&a, &b) {
        (Ok(_), Err(_)) => b,
        (Err(fa), Err(fb)) if fb.level > fa.level => b,
        _ => a,
    }
}

/// Keeps the single most severe failure seen during a traversal.
#[derive(Default)]
pub(crate) struct FailureTracker {
    worst: Option<ValidationFailure>,
}

impl FailureTracker {
    /// Records `failure`; returns `true` when it is error-level.
    pub fn record(&mut self, failure: ValidationFailure) -> bool {
        let is_error = failure.level == ErrorLevel::Error;
        match &self.worst {
            Some(worst) if worst.level >= failure.level => {}
            _ => self.worst = Some(failure),
        }
        is_error
    }

    pub fn has_error(&self) -> bool {
        matches!(&self.worst, Some(f) if f.level == ErrorLevel::Error)
    }

    pub fn finish(self, output: Value) -> Validation {
        match self.worst {
            Some(failure) => Err(failure.with_invalid_value(output)),
            None => Ok(output),
        }
    }
}
