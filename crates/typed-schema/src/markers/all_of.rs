use crate::containers::{settle, should_stop_on_first_error};
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{FailureTracker, Validation};
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// Requires every schema to accept the value.
///
/// Object outputs are merged key-wise, recursing into keys where both outputs hold
/// objects; on any other collision the earlier schema wins. For non-object outputs the
/// first schema's result is kept.
#[derive(Debug, Clone)]
pub struct AllOfSchema {
    pub base: BaseInfo,
    schemas: Vec<Schema>,
}

impl AllOfSchema {
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
        flags: &SchemaFlags,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let stop_early = should_stop_on_first_error(flags, state, mode);
        let mut tracker = FailureTracker::default();
        let mut merged: Option<Value> = None;
        for schema in &self.schemas {
            let (out, is_error) = settle(schema.internal_validate(value, state, path), &mut tracker);
            merged = Some(merge(merged, out));
            if is_error && stop_early {
                break;
            }
        }
        tracker.finish(merged.unwrap_or_else(|| value.clone()))
    }

    pub(crate) async fn validate_async(
        &self,
        flags: &SchemaFlags,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let stop_early = should_stop_on_first_error(flags, state, mode);
        let mut tracker = FailureTracker::default();
        let mut merged: Option<Value> = None;
        for schema in &self.schemas {
            let outcome = schema.internal_validate_async(value, state, path).await;
            let (out, is_error) = settle(outcome, &mut tracker);
            merged = Some(merge(merged, out));
            if is_error && stop_early {
                break;
            }
        }
        tracker.finish(merged.unwrap_or_else(|| value.clone()))
    }
}

fn merge(merged: Option<Value>, next: Value) -> Value {
    match (merged, next) {
        (None, next) => next,
        (Some(Value::Object(mut acc)), Value::Object(next)) => {
            for (key, value) in next {
                match acc.get_mut(&key) {
                    Some(existing) if existing.as_object().is_some() && value.as_object().is_some() => {
                        let earlier = std::mem::take(existing);
                        *existing = merge(Some(earlier), value);
                    }
                    Some(_) => {}
                    None => {
                        acc.insert(key, value);
                    }
                }
            }
            Value::Object(acc)
        }
        (Some(acc), _) => acc,
    }
}

schema_builders!(AllOfSchema, AllOf);
