use crate::error::OperationError;
use crate::result::ErrorLevel;
use crate::value::Value;

/// Outcome of [`Schema::validate`](crate::schema::Schema::validate).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub error: Option<OperationError>,
}

impl ValidationReport {
    /// No error-level failure was found. Warnings may still be present.
    pub fn is_valid(&self) -> bool {
        !matches!(&self.error, Some(e) if e.level == ErrorLevel::Error)
    }

    pub fn error_level(&self) -> Option<ErrorLevel> {
        self.error.as_ref().map(|e| e.level)
    }
}

macro_rules! operation_result {
    ($(#[$doc:meta])* $name:ident, $field:ident: $ty:ty) => {
        $(#[$doc])*
        ///
        /// On an error-level failure the output is `None`; on a warning the best-effort
        /// output is returned alongside the error.
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            pub $field: Option<$ty>,
            pub error: Option<OperationError>,
        }

        impl $name {
            pub(crate) fn from_parts($field: Option<$ty>, error: Option<OperationError>) -> Self {
                Self { $field, error }
            }

            pub fn error_level(&self) -> Option<ErrorLevel> {
                self.error.as_ref().map(|e| e.level)
            }
        }
    };
}

operation_result!(
    /// Outcome of serializing an in-memory value.
    SerializationResult, serialized: Value
);
operation_result!(
    /// Outcome of deserializing (or parsing) a JSON-compatible value.
    DeserializationResult, deserialized: Value
);
operation_result!(
    /// Outcome of deep-cloning a value.
    CloningResult, cloned: Value
);
operation_result!(
    /// Outcome of serializing a value to JSON text.
    StringifyResult, stringified: String
);
