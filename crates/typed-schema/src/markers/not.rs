use super::trial;
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, more_severe, ErrorKind, ErrorLevel, Validation};
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// Accepts what `schema` accepts, except values `excluded` also accepts.
#[derive(Debug, Clone)]
pub struct NotSchema {
    pub base: BaseInfo,
    schema: Schema,
    excluded: Schema,
}

impl NotSchema {
    pub fn new(schema: Schema, excluded: Schema) -> Self {
        Self {
            base: BaseInfo::new(),
            schema,
            excluded,
        }
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        let mut flags = SchemaFlags::combined([self.schema.flags(), self.excluded.flags()]);
        flags.uses_custom_serdes = self.schema.uses_custom_serdes();
        flags.is_container_type = self.schema.is_container_type();
        flags
    }

    /// Whether the exclusion still has to be decided for this outcome.
    fn needs_exclusion_check(outcome: &Validation, mode: ValidationMode) -> bool {
        mode != ValidationMode::None
            && !matches!(outcome, Err(failure) if failure.level == ErrorLevel::Error)
    }

    fn finish(
        &self,
        outcome: Validation,
        excluded: bool,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        if !excluded {
            return outcome;
        }
        let invalid_value = match &outcome {
            Ok(out) => out.clone(),
            Err(failure) => failure.invalid_value.clone(),
        };
        let excluded = self.excluded.schema_type();
        let exclusion = fail(
            mode,
            ErrorKind::Exclusion,
            path,
            move || format!("Expected a value not matching the excluded {excluded} schema"),
            invalid_value,
        );
        more_severe(outcome, exclusion)
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let outcome = self.schema.internal_validate(value, state, path);
        let excluded = Self::needs_exclusion_check(&outcome, mode)
            && trial::accepts(&self.excluded, value, state, path);
        self.finish(outcome, excluded, path, mode)
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let outcome = self.schema.internal_validate_async(value, state, path).await;
        let excluded = Self::needs_exclusion_check(&outcome, mode)
            && trial::accepts_async(&self.excluded, value, state, path).await;
        self.finish(outcome, excluded, path, mode)
    }
}

schema_builders!(NotSchema, Not);
