use crate::path::LazyPath;
use crate::result::Validation;
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// Accepts `undefined` in addition to whatever the wrapped schema accepts.
#[derive(Debug, Clone)]
pub struct OptionalSchema {
    pub base: BaseInfo,
    schema: Schema,
}

impl OptionalSchema {
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
        if value.is_undefined() {
            return Ok(Value::Undefined);
        }
        self.schema.internal_validate(value, state, path)
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
    ) -> Validation {
        if value.is_undefined() {
            return Ok(Value::Undefined);
        }
        self.schema.internal_validate_async(value, state, path).await
    }
}

/// Accepts `null` in addition to whatever the wrapped schema accepts.
#[derive(Debug, Clone)]
pub struct AllowNullSchema {
    pub base: BaseInfo,
    schema: Schema,
}

impl AllowNullSchema {
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
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.schema.internal_validate(value, state, path)
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
    ) -> Validation {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.schema.internal_validate_async(value, state, path).await
    }
}

schema_builders!(OptionalSchema, Optional);
schema_builders!(AllowNullSchema, AllowNull);
