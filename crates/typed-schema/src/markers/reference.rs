use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::path::LazyPath;
use crate::result::Validation;
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// Flags a reference reports before its target exists.
///
/// The target is resolved lazily, so the engine cannot derive these; the defaults assume
/// the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefOptions {
    pub estimated_validation_time_complexity: u64,
    pub uses_custom_serdes: bool,
    pub uses_async_serdes: bool,
    pub is_or_contains_object_potentially_needing_unknown_key_removal: bool,
    pub is_container_type: bool,
}

impl Default for RefOptions {
    fn default() -> Self {
        Self {
            estimated_validation_time_complexity: 1_000,
            uses_custom_serdes: true,
            uses_async_serdes: true,
            is_or_contains_object_potentially_needing_unknown_key_removal: true,
            is_container_type: false,
        }
    }
}

type SchemaGetter = dyn Fn() -> Schema + Send + Sync;

/// A schema obtained on first use, for recursive definitions.
#[derive(Clone)]
pub struct RefSchema {
    pub base: BaseInfo,
    options: RefOptions,
    get_schema: Arc<SchemaGetter>,
    resolved: Arc<OnceLock<Schema>>,
}

impl fmt::Debug for RefSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The target may contain this reference.
        f.debug_struct("RefSchema")
            .field("options", &self.options)
            .field("resolved", &self.resolved.get().map(Schema::schema_type))
            .finish()
    }
}

impl RefSchema {
    pub fn new(options: RefOptions, get_schema: impl Fn() -> Schema + Send + Sync + 'static) -> Self {
        Self {
            base: BaseInfo::new(),
            options,
            get_schema: Arc::new(get_schema),
            resolved: Arc::new(OnceLock::new()),
        }
    }

    /// The target schema, resolved once.
    pub fn schema(&self) -> &Schema {
        self.resolved.get_or_init(|| (self.get_schema)())
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        SchemaFlags {
            estimated_validation_time_complexity: self.options.estimated_validation_time_complexity.max(1),
            uses_custom_serdes: self.options.uses_custom_serdes,
            uses_async_serdes: self.options.uses_async_serdes,
            is_or_contains_object_potentially_needing_unknown_key_removal: self
                .options
                .is_or_contains_object_potentially_needing_unknown_key_removal,
            is_container_type: self.options.is_container_type,
        }
    }

    pub(crate) fn validate(&self, value: &Value, state: &mut InternalState, path: &LazyPath) -> Validation {
        self.schema().internal_validate(value, state, path)
    }

    pub(crate) async fn validate_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
    ) -> Validation {
        self.schema().internal_validate_async(value, state, path).await
    }
}

schema_builders!(RefSchema, Ref);
