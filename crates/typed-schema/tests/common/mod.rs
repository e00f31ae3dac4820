//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use regex::Regex;
use typed_schema::{CustomSchemaOptions, CustomValue, SchemaBuilder, SerDesFn, Value};

/// Whole cents, serialized as a string of digits.
#[derive(Debug, Clone, PartialEq)]
pub struct Cents(pub i64);

pub fn cents(n: i64) -> Value {
    Value::Custom(CustomValue::new(Cents(n)))
}

fn is_cents(value: &Value) -> bool {
    value.as_custom().is_some_and(|c| c.is::<Cents>())
}

fn cents_to_string(value: &Value) -> Result<Value, String> {
    value
        .as_custom()
        .and_then(|c| c.downcast_ref::<Cents>())
        .map(|c| Value::String(c.0.to_string()))
        .ok_or_else(|| "not cents".to_string())
}

fn string_to_cents(value: &Value) -> Result<Value, String> {
    let text = value.as_str().ok_or_else(|| "not a string".to_string())?;
    text.parse::<i64>()
        .map(cents)
        .map_err(|_| format!("{text:?} is not a whole number of cents"))
}

fn digits() -> typed_schema::types::StringSchema {
    SchemaBuilder::new()
        .string()
        .pattern(Regex::new(r"^-?\d+$").unwrap())
}

pub fn cents_options() -> CustomSchemaOptions {
    CustomSchemaOptions::new(
        "Cents",
        is_cents,
        digits(),
        SerDesFn::sync(cents_to_string),
        SerDesFn::sync(string_to_cents),
    )
}

/// Like [`cents_options`], but the converters only run asynchronously.
pub fn async_cents_options() -> CustomSchemaOptions {
    CustomSchemaOptions::new(
        "Cents",
        is_cents,
        digits(),
        SerDesFn::asynchronous(|value: Value| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            cents_to_string(&value)
        }),
        SerDesFn::asynchronous(|value: Value| async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            string_to_cents(&value)
        }),
    )
}

/// A custom type whose deserializer accepts any string, so converter errors surface.
pub fn lenient_shape_cents_options() -> CustomSchemaOptions {
    CustomSchemaOptions::new(
        "Cents",
        is_cents,
        SchemaBuilder::new().string(),
        SerDesFn::sync(cents_to_string),
        SerDesFn::sync(string_to_cents),
    )
}
