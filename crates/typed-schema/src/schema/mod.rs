//! Schema handle, the closed set of schema kinds, and the core validator contract.
//!
//! Every kind implements the same contract: validate (and, depending on the
//! operation's [`Transformation`](crate::state::Transformation), convert) a value given
//! the internal state, a lazy path and the effective validation mode. Dispatch is a
//! plain `match` over [`SchemaKind`].

pub mod base;
pub mod builder;

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

pub use base::{BaseInfo, SchemaFlags};
pub use builder::SchemaBuilder;

use crate::containers::{ArraySchema, ObjectSchema, RecordSchema, TupleSchema};
use crate::markers::{
    AllOfSchema, AllowNullSchema, DeprecatedSchema, NotSchema, OneOfSchema, OptionalSchema,
    RefSchema, RootSchema, UpgradedSchema,
};
use crate::mode::{ModePreference, PreferredValidationMode, ValidationDepth, ValidationMode};
use crate::path::LazyPath;
use crate::result::Validation;
use crate::state::InternalState;
use crate::types::{AnySchema, BooleanSchema, CustomSchema, DateSchema, NumberSchema, StringSchema};
use crate::value::Value;

/// Closed tag set identifying a schema kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaType {
    AllOf,
    AllowNull,
    Any,
    Array,
    Boolean,
    Custom,
    Date,
    Deprecated,
    Not,
    Number,
    Object,
    OneOf,
    Optional,
    Record,
    Ref,
    Root,
    String,
    Tuple,
    Upgraded,
}

impl SchemaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllOf => "allOf",
            Self::AllowNull => "allowNull",
            Self::Any => "any",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Custom => "custom",
            Self::Date => "date",
            Self::Deprecated => "deprecated",
            Self::Not => "not",
            Self::Number => "number",
            Self::Object => "object",
            Self::OneOf => "oneOf",
            Self::Optional => "optional",
            Self::Record => "record",
            Self::Ref => "ref",
            Self::Root => "root",
            Self::String => "string",
            Self::Tuple => "tuple",
            Self::Upgraded => "upgraded",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sum type of all schema kinds.
#[derive(Debug, Clone)]
pub enum SchemaKind {
    Any(AnySchema),
    Boolean(BooleanSchema),
    Number(NumberSchema),
    String(StringSchema),
    Date(DateSchema),
    Custom(CustomSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Record(RecordSchema),
    AllOf(AllOfSchema),
    OneOf(OneOfSchema),
    Not(NotSchema),
    Optional(OptionalSchema),
    AllowNull(AllowNullSchema),
    Ref(RefSchema),
    Deprecated(DeprecatedSchema),
    Upgraded(UpgradedSchema),
    Root(RootSchema),
}

impl SchemaKind {
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Any(_) => SchemaType::Any,
            Self::Boolean(_) => SchemaType::Boolean,
            Self::Number(_) => SchemaType::Number,
            Self::String(_) => SchemaType::String,
            Self::Date(_) => SchemaType::Date,
            Self::Custom(_) => SchemaType::Custom,
            Self::Object(_) => SchemaType::Object,
            Self::Array(_) => SchemaType::Array,
            Self::Tuple(_) => SchemaType::Tuple,
            Self::Record(_) => SchemaType::Record,
            Self::AllOf(_) => SchemaType::AllOf,
            Self::OneOf(_) => SchemaType::OneOf,
            Self::Not(_) => SchemaType::Not,
            Self::Optional(_) => SchemaType::Optional,
            Self::AllowNull(_) => SchemaType::AllowNull,
            Self::Ref(_) => SchemaType::Ref,
            Self::Deprecated(_) => SchemaType::Deprecated,
            Self::Upgraded(_) => SchemaType::Upgraded,
            Self::Root(_) => SchemaType::Root,
        }
    }

    pub fn base(&self) -> &BaseInfo {
        match self {
            Self::Any(s) => &s.base,
            Self::Boolean(s) => &s.base,
            Self::Number(s) => &s.base,
            Self::String(s) => &s.base,
            Self::Date(s) => &s.base,
            Self::Custom(s) => &s.base,
            Self::Object(s) => &s.base,
            Self::Array(s) => &s.base,
            Self::Tuple(s) => &s.base,
            Self::Record(s) => &s.base,
            Self::AllOf(s) => &s.base,
            Self::OneOf(s) => &s.base,
            Self::Not(s) => &s.base,
            Self::Optional(s) => &s.base,
            Self::AllowNull(s) => &s.base,
            Self::Ref(s) => &s.base,
            Self::Deprecated(s) => &s.base,
            Self::Upgraded(s) => &s.base,
            Self::Root(s) => &s.base,
        }
    }

    fn base_mut(&mut self) -> &mut BaseInfo {
        match self {
            Self::Any(s) => &mut s.base,
            Self::Boolean(s) => &mut s.base,
            Self::Number(s) => &mut s.base,
            Self::String(s) => &mut s.base,
            Self::Date(s) => &mut s.base,
            Self::Custom(s) => &mut s.base,
            Self::Object(s) => &mut s.base,
            Self::Array(s) => &mut s.base,
            Self::Tuple(s) => &mut s.base,
            Self::Record(s) => &mut s.base,
            Self::AllOf(s) => &mut s.base,
            Self::OneOf(s) => &mut s.base,
            Self::Not(s) => &mut s.base,
            Self::Optional(s) => &mut s.base,
            Self::AllowNull(s) => &mut s.base,
            Self::Ref(s) => &mut s.base,
            Self::Deprecated(s) => &mut s.base,
            Self::Upgraded(s) => &mut s.base,
            Self::Root(s) => &mut s.base,
        }
    }

    fn flags(&self) -> SchemaFlags {
        match self {
            Self::Any(_)
            | Self::Boolean(_)
            | Self::Number(_)
            | Self::String(_)
            | Self::Date(_)
            | Self::Custom(_) => self.leaf_flags(),
            Self::Object(s) => s.flags(),
            Self::Array(s) => s.flags(),
            Self::Tuple(s) => s.flags(),
            Self::Record(s) => s.flags(),
            Self::AllOf(s) => s.flags(),
            Self::OneOf(s) => s.flags(),
            Self::Not(s) => s.flags(),
            Self::Optional(s) => s.flags(),
            Self::AllowNull(s) => s.flags(),
            Self::Ref(s) => s.flags(),
            Self::Deprecated(s) => s.flags(),
            Self::Upgraded(s) => s.flags(),
            Self::Root(s) => s.flags(),
        }
    }

    fn leaf_flags(&self) -> SchemaFlags {
        let uses_custom_serdes = match self {
            Self::Boolean(s) => s.uses_custom_serdes(),
            Self::Number(s) => s.uses_custom_serdes(),
            Self::Date(_) | Self::Custom(_) => true,
            _ => false,
        };
        let uses_async_serdes = match self {
            Self::Custom(s) => s.uses_async_serdes(),
            _ => false,
        };
        SchemaFlags {
            uses_custom_serdes,
            uses_async_serdes,
            ..SchemaFlags::leaf()
        }
    }

    fn validate(
        &self,
        flags: &SchemaFlags,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        match self {
            Self::Any(s) => s.validate(value, state, path, mode),
            Self::Boolean(s) => s.validate(value, state, path, mode),
            Self::Number(s) => s.validate(value, state, path, mode),
            Self::String(s) => s.validate(value, state, path, mode),
            Self::Date(s) => s.validate(value, state, path, mode),
            Self::Custom(s) => s.validate(value, state, path, mode),
            Self::Object(s) => s.validate(flags, value, state, path, mode),
            Self::Array(s) => s.validate(flags, value, state, path, mode),
            Self::Tuple(s) => s.validate(flags, value, state, path, mode),
            Self::Record(s) => s.validate(flags, value, state, path, mode),
            Self::AllOf(s) => s.validate(flags, value, state, path, mode),
            Self::OneOf(s) => s.validate(value, state, path, mode),
            Self::Not(s) => s.validate(value, state, path, mode),
            Self::Optional(s) => s.validate(value, state, path),
            Self::AllowNull(s) => s.validate(value, state, path),
            Self::Ref(s) => s.validate(value, state, path),
            Self::Deprecated(s) => s.validate(value, state, path),
            Self::Upgraded(s) => s.validate(value, state, path, mode),
            Self::Root(s) => s.validate(value, state, path),
        }
    }

    async fn validate_async(
        &self,
        flags: &SchemaFlags,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        match self {
            Self::Any(s) => s.validate(value, state, path, mode),
            Self::Boolean(s) => s.validate(value, state, path, mode),
            Self::Number(s) => s.validate(value, state, path, mode),
            Self::String(s) => s.validate(value, state, path, mode),
            Self::Date(s) => s.validate(value, state, path, mode),
            Self::Custom(s) => s.validate_async(value, state, path, mode).await,
            Self::Object(s) => s.validate_async(flags, value, state, path, mode).await,
            Self::Array(s) => s.validate_async(flags, value, state, path, mode).await,
            Self::Tuple(s) => s.validate_async(flags, value, state, path, mode).await,
            Self::Record(s) => s.validate_async(flags, value, state, path, mode).await,
            Self::AllOf(s) => s.validate_async(flags, value, state, path, mode).await,
            Self::OneOf(s) => s.validate_async(value, state, path, mode).await,
            Self::Not(s) => s.validate_async(value, state, path, mode).await,
            Self::Optional(s) => s.validate_async(value, state, path).await,
            Self::AllowNull(s) => s.validate_async(value, state, path).await,
            Self::Ref(s) => s.validate_async(value, state, path).await,
            Self::Deprecated(s) => s.validate_async(value, state, path).await,
            Self::Upgraded(s) => s.validate_async(value, state, path, mode).await,
            Self::Root(s) => s.validate_async(value, state, path).await,
        }
    }
}

#[derive(Debug, Clone)]
struct SchemaNode {
    kind: SchemaKind,
    flags: SchemaFlags,
}

/// A shareable, immutable schema.
///
/// Cloning the handle shares the schema; [`Schema::clone_schema`] produces an
/// independent copy without the validation-mode override.
#[derive(Clone)]
pub struct Schema {
    node: Arc<SchemaNode>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type", &self.schema_type())
            .field("flags", &self.node.flags)
            .finish()
    }
}

impl Schema {
    pub(crate) fn from_kind(kind: SchemaKind) -> Self {
        let flags = kind.flags();
        Self {
            node: Arc::new(SchemaNode { kind, flags }),
        }
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.node.kind
    }

    pub fn schema_type(&self) -> SchemaType {
        self.node.kind.schema_type()
    }

    pub fn flags(&self) -> &SchemaFlags {
        &self.node.flags
    }

    pub fn estimated_validation_time_complexity(&self) -> u64 {
        self.node.flags.estimated_validation_time_complexity
    }

    pub fn uses_custom_serdes(&self) -> bool {
        self.node.flags.uses_custom_serdes
    }

    pub fn is_or_contains_object_potentially_needing_unknown_key_removal(&self) -> bool {
        self.node
            .flags
            .is_or_contains_object_potentially_needing_unknown_key_removal
    }

    pub fn is_container_type(&self) -> bool {
        self.node.flags.is_container_type
    }

    pub fn description(&self) -> Option<&str> {
        self.node.kind.base().description.as_deref()
    }

    pub fn example(&self) -> Option<&Value> {
        self.node.kind.base().example.as_ref()
    }

    pub fn preferred_validation_mode(&self) -> Option<ModePreference> {
        self.node.kind.base().preferred_validation_mode
    }

    // ------------------------------------------------------------------
    // Builders

    fn map_base(self, f: impl FnOnce(&mut BaseInfo)) -> Self {
        let mut node = Arc::unwrap_or_clone(self.node);
        f(node.kind.base_mut());
        Self {
            node: Arc::new(node),
        }
    }

    pub fn describe(self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.map_base(|base| base.description = Some(description))
    }

    pub fn with_example(self, example: impl Into<Value>) -> Self {
        let example = example.into();
        self.map_base(|base| base.example = Some(example))
    }

    pub fn with_preferred_validation_mode(
        self,
        mode: impl Into<PreferredValidationMode>,
        depth: ValidationDepth,
    ) -> Self {
        let preference = ModePreference::new(mode, depth);
        self.map_base(|base| base.preferred_validation_mode = Some(preference))
    }

    /// An independent copy of this schema. The validation-mode override is not copied.
    pub fn clone_schema(&self) -> Self {
        let mut node = (*self.node).clone();
        node.kind.base_mut().preferred_validation_mode = None;
        Self {
            node: Arc::new(node),
        }
    }

    pub fn optional(self) -> Schema {
        OptionalSchema::new(self).into()
    }

    pub fn allow_null(self) -> Schema {
        AllowNullSchema::new(self).into()
    }

    pub fn not(self, excluded: impl Into<Schema>) -> Schema {
        NotSchema::new(self, excluded.into()).into()
    }

    // ------------------------------------------------------------------
    // Core contract

    fn push_preferences(&self, state: &mut InternalState) -> usize {
        let mut pushed = 0;
        if matches!(self.node.kind, SchemaKind::Root(_)) {
            state.push_preference(ModePreference::reset());
            pushed += 1;
        }
        if let Some(preference) = self.node.kind.base().preferred_validation_mode {
            state.push_preference(preference);
            pushed += 1;
        }
        pushed
    }

    /// Validates `value` synchronously, converting it per the operation's transformation.
    pub(crate) fn internal_validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
    ) -> Validation {
        let pushed = self.push_preferences(state);
        let mode = state.resolve_mode();
        let out = self
            .node
            .kind
            .validate(&self.node.flags, value, state, path, mode);
        state.pop_preferences(pushed);
        out
    }

    /// Same contract as [`Schema::internal_validate`], but may suspend: on entry when a
    /// yield is due, between traversal chunks, and inside async custom serdes.
    pub(crate) fn internal_validate_async<'a>(
        &'a self,
        value: &'a Value,
        state: &'a mut InternalState,
        path: &'a LazyPath,
    ) -> BoxFuture<'a, Validation> {
        async move {
            if state.should_relax() {
                state.relax().await;
            }
            let pushed = self.push_preferences(state);
            let mode = state.resolve_mode();
            let out = self
                .node
                .kind
                .validate_async(&self.node.flags, value, state, path, mode)
                .await;
            state.pop_preferences(pushed);
            out
        }
        .boxed()
    }

    /// Validates a child through the async contract when it is expensive or needs async
    /// serdes, and inline otherwise.
    pub(crate) async fn validate_child_async(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
    ) -> Validation {
        if self.needs_async(state) {
            self.internal_validate_async(value, state, path).await
        } else {
            self.internal_validate(value, state, path)
        }
    }

    pub(crate) fn needs_async(&self, state: &InternalState) -> bool {
        self.node.flags.uses_async_serdes
            || self.node.flags.estimated_validation_time_complexity > state.complexity_threshold()
    }
}
