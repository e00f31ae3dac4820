//! Factory for constructing schemas.

use regex::Regex;

use super::Schema;
use crate::containers::{ArraySchema, ObjectSchema, RecordSchema, TupleSchema};
use crate::markers::{
    AllOfSchema, DeprecatedSchema, OneOfSchema, RefOptions, RefSchema, RootSchema,
    UpgradedSchema,
};
use crate::types::{
    AnySchema, BooleanSchema, CustomSchema, CustomSchemaOptions, DateSchema, NumberSchema,
    StringSchema,
};

/// Factory for every schema kind.
///
/// Data types and containers come back as their concrete builder structs so they can be
/// configured further; anything accepting a child takes `impl Into<Schema>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaBuilder;

impl SchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    // ------------------------------------------------------------------
    // Data types

    pub fn any(&self) -> AnySchema {
        AnySchema::new()
    }

    pub fn boolean(&self) -> BooleanSchema {
        BooleanSchema::new()
    }

    pub fn number(&self) -> NumberSchema {
        NumberSchema::new()
    }

    pub fn string(&self) -> StringSchema {
        StringSchema::new()
    }

    /// A string restricted to `values`.
    pub fn string_of<I, S>(&self, values: I) -> StringSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StringSchema::new().allowed_values(values)
    }

    pub fn date(&self) -> DateSchema {
        DateSchema::new()
    }

    pub fn custom(&self, options: CustomSchemaOptions) -> CustomSchema {
        CustomSchema::new(options)
    }

    // ------------------------------------------------------------------
    // Containers

    pub fn object(&self) -> ObjectSchema {
        ObjectSchema::new()
    }

    pub fn array(&self, items: impl Into<Schema>) -> ArraySchema {
        ArraySchema::new(items.into())
    }

    pub fn tuple<I, S>(&self, items: I) -> TupleSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        TupleSchema::new(items.into_iter().map(Into::into).collect())
    }

    /// A record whose keys are accepted by `keys`.
    pub fn record(&self, keys: impl Into<Schema>, values: impl Into<Schema>) -> RecordSchema {
        RecordSchema::with_key_schema(keys.into(), values.into())
    }

    /// A record whose keys match `pattern`.
    pub fn record_matching(&self, pattern: Regex, values: impl Into<Schema>) -> RecordSchema {
        RecordSchema::with_key_pattern(pattern, values.into())
    }

    // ------------------------------------------------------------------
    // Markers

    pub fn all_of<I, S>(&self, schemas: I) -> AllOfSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        AllOfSchema::new(schemas.into_iter().map(Into::into).collect())
    }

    pub fn one_of<I, S>(&self, schemas: I) -> OneOfSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        OneOfSchema::new(schemas.into_iter().map(Into::into).collect())
    }

    pub fn not(&self, schema: impl Into<Schema>, excluded: impl Into<Schema>) -> Schema {
        schema.into().not(excluded)
    }

    pub fn optional(&self, schema: impl Into<Schema>) -> Schema {
        schema.into().optional()
    }

    pub fn allow_null(&self, schema: impl Into<Schema>) -> Schema {
        schema.into().allow_null()
    }

    /// A schema resolved on first use, for recursive definitions.
    pub fn reference<F>(&self, options: RefOptions, get_schema: F) -> RefSchema
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        RefSchema::new(options, get_schema)
    }

    pub fn deprecated(&self, unique_name: impl Into<String>, schema: impl Into<Schema>) -> DeprecatedSchema {
        DeprecatedSchema::new(unique_name.into(), schema.into())
    }

    pub fn upgraded(
        &self,
        unique_name: impl Into<String>,
        old: impl Into<Schema>,
        new: impl Into<Schema>,
    ) -> UpgradedSchema {
        UpgradedSchema::new(unique_name.into(), old.into(), new.into())
    }

    pub fn root(&self, schema: impl Into<Schema>) -> RootSchema {
        RootSchema::new(schema.into())
    }
}
