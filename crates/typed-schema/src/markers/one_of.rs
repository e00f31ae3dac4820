use super::trial;
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, ErrorKind, Validation, ValidationFailure};
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// Accepts the value if any alternative does; the first success wins.
///
/// Bookkeeping of alternatives that did not match (deferred operations, unknown-key
/// records) is rolled back. Without validation the alternative is picked by a hard-mode
/// trial, so conversions still come from the alternative that fits.
#[derive(Debug, Clone)]
pub struct OneOfSchema {
    pub base: BaseInfo,
    schemas: Vec<Schema>,
}

impl OneOfSchema {
    pub fn new(schemas: Vec<Schema>) -> Self {
        Self {
            base: BaseInfo::new(),
            schemas,
        }
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        let mut flags = SchemaFlags::combined(self.schemas.iter().map(Schema::flags));
        flags.is_container_type = self.schemas.iter().any(Schema::is_container_type);
        flags
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        if mode == ValidationMode::None {
            for schema in &self.schemas {
                if trial::accepts(schema, value, state, path) {
                    return schema.internal_validate(value, state, path);
                }
            }
            return Ok(value.clone());
        }
        let mut failures = Vec::with_capacity(self.schemas.len());
        for schema in &self.schemas {
            let checkpoint = state.checkpoint();
            match schema.internal_validate(value, state, path) {
                Ok(out) => return Ok(out),
                Err(failure) => {
                    state.rollback(checkpoint);
                    failures.push(failure);
                }
            }
        }
        no_match(failures, value, path, mode)
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        if mode == ValidationMode::None {
            for schema in &self.schemas {
                if trial::accepts_async(schema, value, state, path).await {
                    return schema.internal_validate_async(value, state, path).await;
                }
            }
            return Ok(value.clone());
        }
        let mut failures = Vec::with_capacity(self.schemas.len());
        for schema in &self.schemas {
            let checkpoint = state.checkpoint();
            match schema.internal_validate_async(value, state, path).await {
                Ok(out) => return Ok(out),
                Err(failure) => {
                    state.rollback(checkpoint);
                    failures.push(failure);
                }
            }
        }
        no_match(failures, value, path, mode)
    }
}

fn no_match(
    failures: Vec<ValidationFailure>,
    value: &Value,
    path: &LazyPath,
    mode: ValidationMode,
) -> Validation {
    fail(
        mode,
        ErrorKind::NoMatch,
        path,
        move || {
            let reasons: Vec<String> = failures.iter().map(ValidationFailure::formatted).collect();
            format!("Expected one of the alternatives to match: {}", reasons.join("; "))
        },
        value.clone(),
    )
}

schema_builders!(OneOfSchema, OneOf);
