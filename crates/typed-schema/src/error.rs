//! Programming errors and user-facing operation errors.

use thiserror::Error;

use crate::result::{ErrorKind, ErrorLevel, ValidationFailure};
use crate::schema::SchemaType;

/// Misuse of the API, as opposed to invalid data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A synchronous entry point reached a schema that can only run asynchronously.
    #[error("{schema_type} schema requires asynchronous execution; use the async variant of this operation")]
    AsyncRequired { schema_type: SchemaType },
}

/// A data-validation failure as reported by the public operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct OperationError {
    pub kind: ErrorKind,
    pub level: ErrorLevel,
    /// Message with the location appended, e.g. `Expected string, found number @ ["a"]`.
    pub message: String,
    /// Canonical path of the failure, e.g. `["a"]`; empty at the root.
    pub path: String,
}

impl OperationError {
    pub(crate) fn json(message: String) -> Self {
        Self {
            kind: ErrorKind::Json,
            level: ErrorLevel::Error,
            message,
            path: String::new(),
        }
    }
}

impl From<&ValidationFailure> for OperationError {
    fn from(failure: &ValidationFailure) -> Self {
        Self {
            kind: failure.kind,
            level: failure.level,
            message: failure.formatted(),
            path: failure.path.resolve().string.clone(),
        }
    }
}
