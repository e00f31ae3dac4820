use crate::path::LazyPath;
use crate::result::Validation;
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// A transparent wrapper that starts a fresh validation-mode scope: preferences of
/// schemas above it do not apply to anything below it.
#[derive(Debug, Clone)]
pub struct RootSchema {
    pub base: BaseInfo,
    schema: Schema,
}

impl RootSchema {
    pub fn new(schema: Schema) -> Self {
        Self {
            base: BaseInfo::new(),
            schema,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        *self.schema.flags()
    }

    pub(crate) fn validate(&self, value: &Value, state: &mut InternalState, path: &LazyPath) -> Validation {
        self.schema.internal_validate(value, state, path)
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
    ) -> Validation {
        self.schema.internal_validate_async(value, state, path).await
    }
}

schema_builders!(RootSchema, Root);
