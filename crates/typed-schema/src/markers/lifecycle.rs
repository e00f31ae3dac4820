use super::notice::{deprecated_once, legacy_once};
use super::trial;
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::Validation;
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// A field on its way out: `undefined` is always accepted, any other value is checked
/// against `schema` and logged once per `unique_name`.
#[derive(Debug, Clone)]
pub struct DeprecatedSchema {
    pub base: BaseInfo,
    unique_name: String,
    schema: Schema,
}

impl DeprecatedSchema {
    pub fn new(unique_name: String, schema: Schema) -> Self {
        Self {
            base: BaseInfo::new(),
            unique_name,
            schema,
        }
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        *self.schema.flags()
    }

    pub(crate) fn validate(&self, value: &Value, state: &mut InternalState, path: &LazyPath) -> Validation {
        if value.is_undefined() {
            return Ok(Value::Undefined);
        }
        deprecated_once(&self.unique_name, path);
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
        deprecated_once(&self.unique_name, path);
        self.schema.internal_validate_async(value, state, path).await
    }
}

/// Accepts the new form, or the old one (logged once per `unique_name`).
#[derive(Debug, Clone)]
pub struct UpgradedSchema {
    pub base: BaseInfo,
    unique_name: String,
    old: Schema,
    new: Schema,
}

impl UpgradedSchema {
    pub fn new(unique_name: String, old: Schema, new: Schema) -> Self {
        Self {
            base: BaseInfo::new(),
            unique_name,
            old,
            new,
        }
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        let mut flags = SchemaFlags::combined([self.old.flags(), self.new.flags()]);
        flags.is_container_type = self.old.is_container_type() || self.new.is_container_type();
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
            let legacy = !trial::accepts(&self.new, value, state, path)
                && trial::accepts(&self.old, value, state, path);
            let form = if legacy { &self.old } else { &self.new };
            let out = form.internal_validate(value, state, path);
            if legacy {
                legacy_once(&self.unique_name, path);
            }
            return out;
        }
        let checkpoint = state.checkpoint();
        let first = self.new.internal_validate(value, state, path);
        if first.is_ok() {
            return first;
        }
        state.rollback(checkpoint);
        match self.old.internal_validate(value, state, path) {
            Ok(out) => {
                legacy_once(&self.unique_name, path);
                Ok(out)
            }
            Err(_) => {
                // Neither form matched: report against the new form.
                state.rollback(checkpoint);
                self.new.internal_validate(value, state, path)
            }
        }
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        if mode == ValidationMode::None {
            let legacy = !trial::accepts_async(&self.new, value, state, path).await
                && trial::accepts_async(&self.old, value, state, path).await;
            let form = if legacy { &self.old } else { &self.new };
            let out = form.internal_validate_async(value, state, path).await;
            if legacy {
                legacy_once(&self.unique_name, path);
            }
            return out;
        }
        let checkpoint = state.checkpoint();
        let first = self.new.internal_validate_async(value, state, path).await;
        if first.is_ok() {
            return first;
        }
        state.rollback(checkpoint);
        match self.old.internal_validate_async(value, state, path).await {
            Ok(out) => {
                legacy_once(&self.unique_name, path);
                Ok(out)
            }
            Err(_) => {
                state.rollback(checkpoint);
                self.new.internal_validate_async(value, state, path).await
            }
        }
    }
}

schema_builders!(DeprecatedSchema, Deprecated);
schema_builders!(UpgradedSchema, Upgraded);
