//! User-defined leaf types with their own serializer and deserializer.
//!
//! A custom schema describes an in-memory type that has no native JSON form (a big
//! integer, a decimal, a branded id). Callers provide:
//!
//! * a predicate recognising the in-memory form,
//! * a schema for the serialized form, checked before deserializing and after
//!   serializing,
//! * a serializer and a deserializer, either of which may be asynchronous.
//!
//! Converter errors become `CustomSerDes` failures whose severity follows the effective
//! validation mode.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, ErrorKind, ErrorLevel, FailureTracker, Validation, ValidationFailure};
use crate::schema::{BaseInfo, Schema, SchemaType};
use crate::state::{InternalState, Transformation};
use crate::value::Value;

type SyncConverter = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;
type AsyncConverter = dyn Fn(Value) -> BoxFuture<'static, Result<Value, String>> + Send + Sync;
type Predicate = dyn Fn(&Value) -> bool + Send + Sync;
type CloneHook = dyn Fn(&Value) -> Value + Send + Sync;
type CustomValidation = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// A serializer or deserializer.
#[derive(Clone)]
pub enum SerDesFn {
    Sync(Arc<SyncConverter>),
    /// Only usable from the `*_async` operations.
    Async(Arc<AsyncConverter>),
}

impl SerDesFn {
    pub fn sync(f: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Self::Sync(Arc::new(f))
    }

    pub fn asynchronous<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, String>> + Send + 'static,
    {
        Self::Async(Arc::new(move |value| f(value).boxed()))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for SerDesFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("SerDesFn::Sync"),
            Self::Async(_) => f.write_str("SerDesFn::Async"),
        }
    }
}

#[derive(Clone)]
pub struct CustomSchemaOptions {
    type_name: String,
    is_value_type: Arc<Predicate>,
    serialized_schema: Schema,
    serialize: SerDesFn,
    deserialize: SerDesFn,
    clone_value: Option<Arc<CloneHook>>,
    custom_validation: Option<Arc<CustomValidation>>,
}

impl CustomSchemaOptions {
    pub fn new(
        type_name: impl Into<String>,
        is_value_type: impl Fn(&Value) -> bool + Send + Sync + 'static,
        serialized_schema: impl Into<Schema>,
        serialize: SerDesFn,
        deserialize: SerDesFn,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            is_value_type: Arc::new(is_value_type),
            serialized_schema: serialized_schema.into(),
            serialize,
            deserialize,
            clone_value: None,
            custom_validation: None,
        }
    }

    /// Replaces the default deep copy used by clone operations.
    pub fn clone_with(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.clone_value = Some(Arc::new(f));
        self
    }

    /// Extra check run on the in-memory form.
    pub fn validate_with(
        mut self,
        f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.custom_validation = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for CustomSchemaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSchemaOptions")
            .field("type_name", &self.type_name)
            .field("serialized_schema", &self.serialized_schema)
            .field("serialize", &self.serialize)
            .field("deserialize", &self.deserialize)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct CustomSchema {
    pub base: BaseInfo,
    options: CustomSchemaOptions,
}

impl CustomSchema {
    pub fn new(options: CustomSchemaOptions) -> Self {
        Self {
            base: BaseInfo::new(),
            options,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.options.type_name
    }

    pub fn serialized_schema(&self) -> &Schema {
        &self.options.serialized_schema
    }

    pub(crate) fn uses_async_serdes(&self) -> bool {
        self.options.serialize.is_async() || self.options.deserialize.is_async()
    }

    fn converter(&self, transformation: Transformation) -> Option<&SerDesFn> {
        match transformation {
            Transformation::Serialize => Some(&self.options.serialize),
            Transformation::Deserialize => Some(&self.options.deserialize),
            Transformation::None | Transformation::Clone => None,
        }
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let transformation = state.transformation();
        let Some(converter) = self.converter(transformation) else {
            return self.validate_in_memory(value, state, path, mode);
        };
        let mut tracker = FailureTracker::default();
        if let Some(out) = self.before_conversion(value, state, path, mode, &mut tracker) {
            return out;
        }
        let converted = match converter {
            SerDesFn::Sync(f) => f(value),
            SerDesFn::Async(_) => {
                state.mark_async_required(SchemaType::Custom);
                let type_name = self.options.type_name.clone();
                return Err(ValidationFailure::new(
                    ErrorKind::CustomSerDes,
                    ErrorLevel::Error,
                    path.clone(),
                    move || format!("{type_name} requires asynchronous conversion"),
                    value.clone(),
                ));
            }
        };
        self.after_conversion(converted, value, state, path, mode, tracker)
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let transformation = state.transformation();
        let Some(converter) = self.converter(transformation) else {
            return self.validate_in_memory(value, state, path, mode);
        };
        let mut tracker = FailureTracker::default();
        if let Some(out) = self.before_conversion(value, state, path, mode, &mut tracker) {
            return out;
        }
        let converted = match converter {
            SerDesFn::Sync(f) => f(value),
            SerDesFn::Async(f) => f(value.clone()).await,
        };
        self.after_conversion(converted, value, state, path, mode, tracker)
    }

    fn validate_in_memory(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        if let Some(out) = self.reject_foreign(value, path, mode) {
            return out;
        }
        let mut tracker = FailureTracker::default();
        if self.check_custom(value, path, mode, &mut tracker) {
            return tracker.finish(value.clone());
        }
        let out = match (state.transformation(), &self.options.clone_value) {
            (Transformation::Clone, Some(hook)) => hook(value),
            (Transformation::Clone, None) => value.deep_clone(),
            _ => value.clone(),
        };
        tracker.finish(out)
    }

    /// Checks the input side. `Some` ends validation early.
    fn before_conversion(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
        tracker: &mut FailureTracker,
    ) -> Option<Validation> {
        match state.transformation() {
            Transformation::Serialize => {
                if let Some(out) = self.reject_foreign(value, path, mode) {
                    return Some(out);
                }
                if self.check_custom(value, path, mode, tracker) {
                    return Some(std::mem::take(tracker).finish(value.clone()));
                }
            }
            _ => {
                if self.check_serialized_shape(value, state, path, mode, tracker) {
                    return Some(std::mem::take(tracker).finish(value.clone()));
                }
            }
        }
        None
    }

    fn after_conversion(
        &self,
        converted: Result<Value, String>,
        original: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
        mut tracker: FailureTracker,
    ) -> Validation {
        let transformation = state.transformation();
        let out = match converted {
            Ok(out) => out,
            Err(message) => {
                tracing::debug!(
                    target: "typed_schema",
                    path = %path,
                    type_name = %self.options.type_name,
                    error = %message,
                    "custom conversion failed"
                );
                let verb = if transformation == Transformation::Serialize {
                    "serialize"
                } else {
                    "deserialize"
                };
                let type_name = self.options.type_name.clone();
                let outcome = fail(
                    mode,
                    ErrorKind::CustomSerDes,
                    path,
                    move || format!("Failed to {verb} {type_name}: {message}"),
                    original.clone(),
                );
                if let Err(failure) = outcome {
                    tracker.record(failure);
                }
                return tracker.finish(original.clone());
            }
        };

        match transformation {
            Transformation::Serialize => {
                self.check_serialized_shape(&out, state, path, mode, &mut tracker);
            }
            _ => {
                self.check_custom(&out, path, mode, &mut tracker);
            }
        }
        tracker.finish(out)
    }

    fn reject_foreign(&self, value: &Value, path: &LazyPath, mode: ValidationMode) -> Option<Validation> {
        if (self.options.is_value_type)(value) {
            return None;
        }
        let type_name = self.options.type_name.clone();
        let found = value.type_name();
        Some(fail(
            mode,
            ErrorKind::TypeMismatch,
            path,
            move || format!("Expected {type_name}, found {found}"),
            value.clone(),
        ))
    }

    /// Runs the caller's extra check. Returns `true` when an error was recorded.
    fn check_custom(
        &self,
        value: &Value,
        path: &LazyPath,
        mode: ValidationMode,
        tracker: &mut FailureTracker,
    ) -> bool {
        let Some(check) = &self.options.custom_validation else {
            return false;
        };
        match check(value) {
            Ok(()) => false,
            Err(message) => match fail(mode, ErrorKind::Constraint, path, move || message.clone(), value.clone()) {
                Err(failure) => tracker.record(failure),
                Ok(_) => false,
            },
        }
    }

    /// Checks `serialized` against the serialized-form schema in an isolated trial state.
    /// Returns `true` when an error was recorded.
    fn check_serialized_shape(
        &self,
        serialized: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
        tracker: &mut FailureTracker,
    ) -> bool {
        if mode == ValidationMode::None {
            return false;
        }
        let mut trial = state.isolated(Transformation::None, ValidationMode::Hard);
        let outcome = self
            .options
            .serialized_schema
            .internal_validate(serialized, &mut trial, path);
        state.absorb(trial);
        let Err(failure) = outcome else {
            return false;
        };
        let message = failure.message();
        match fail(
            mode,
            failure.kind,
            &failure.path,
            move || message.clone(),
            serialized.clone(),
        ) {
            Err(failure) => tracker.record(failure),
            Ok(_) => false,
        }
    }
}

schema_builders!(CustomSchema, Custom);
