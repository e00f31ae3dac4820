//! Serialize, deserialize, clone, stringify and parse.

mod common;

use chrono::{TimeZone, Utc};
use common::{cents, cents_options, lenient_shape_cents_options, Cents};
use proptest::prelude::*;
use serde_json::json;
use typed_schema::types::SerializationForm;
use typed_schema::{
    ErrorKind, ErrorLevel, Map, OperationOptions, Schema, SchemaBuilder, SchemaError,
    ValidationMode, Value,
};

fn s() -> SchemaBuilder {
    SchemaBuilder::new()
}

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn opts() -> OperationOptions {
    OperationOptions::default()
}

fn order() -> Schema {
    s().object()
        .field("id", s().number())
        .field("placed", s().date())
        .field("total", s().custom(cents_options()))
        .field("gift", s().boolean())
        .field("tags", s().array(s().string()))
        .field("note", s().string().optional())
        .into()
}

fn order_value(id: i32, millis: i64, total: i64, gift: bool, tags: Vec<String>) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), Value::from(id));
    map.insert(
        "placed".into(),
        Value::Date(Utc.timestamp_millis_opt(millis).unwrap()),
    );
    map.insert("total".into(), cents(total));
    map.insert("gift".into(), Value::from(gift));
    map.insert(
        "tags".into(),
        Value::Array(tags.into_iter().map(Value::from).collect()),
    );
    Value::Object(map)
}

proptest! {
    #[test]
    fn serialize_then_deserialize_round_trips(
        id in any::<i32>(),
        millis in 0i64..4_102_444_800_000,
        total in any::<i64>(),
        gift in any::<bool>(),
        tags in prop::collection::vec("[a-z]{0,8}", 0..5),
    ) {
        let schema = order();
        let value = order_value(id, millis, total, gift, tags);

        let serialized = schema.serialize(&value, &opts()).unwrap();
        prop_assert!(serialized.error.is_none());
        let serialized = serialized.serialized.unwrap();
        prop_assert!(serialized.to_json().is_ok());

        let back = schema.deserialize(&serialized, &opts()).unwrap();
        prop_assert!(back.error.is_none());
        prop_assert_eq!(back.deserialized.unwrap(), value.clone());

        let text = schema.stringify(&value, &opts()).unwrap().stringified.unwrap();
        let parsed = schema.parse(&text, &opts()).unwrap();
        prop_assert_eq!(parsed.deserialized.unwrap(), value);
    }
}

#[test]
fn dates_serialize_to_iso_strings() {
    let schema: Schema = s().date().into();
    let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let out = schema.serialize(&Value::Date(date), &opts()).unwrap();
    assert_eq!(out.serialized.unwrap(), Value::from("2024-01-02T03:04:05.000Z"));

    let error = schema
        .deserialize(&Value::from("yesterday"), &opts())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.message, "Expected ISO 8601 date string, found \"yesterday\"");
}

#[test]
fn date_range() {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let schema: Schema = s().date().min(start).into();
    let error = schema
        .deserialize(&Value::from("2019-12-31T23:59:59.000Z"), &opts())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.kind, ErrorKind::Constraint);
}

#[test]
fn string_serialization_forms() {
    let flag: Schema = s()
        .boolean()
        .allowed_serialization_forms(&[SerializationForm::String, SerializationForm::Native])
        .into();
    assert!(flag.uses_custom_serdes());
    assert_eq!(
        flag.serialize(&Value::from(true), &opts()).unwrap().serialized,
        Some(Value::from("true"))
    );
    assert_eq!(
        flag.deserialize(&Value::from("false"), &opts()).unwrap().deserialized,
        Some(Value::from(false))
    );
    assert_eq!(
        flag.deserialize(&Value::from(true), &opts()).unwrap().deserialized,
        Some(Value::from(true))
    );

    let amount: Schema = s()
        .number()
        .allowed_serialization_forms(&[SerializationForm::Native, SerializationForm::String])
        .into();
    assert_eq!(
        amount.deserialize(&Value::from("2.5"), &opts()).unwrap().deserialized,
        Some(Value::from(2.5))
    );
    assert_eq!(
        amount.serialize(&Value::from(2.5), &opts()).unwrap().serialized,
        Some(Value::from(2.5))
    );
}

#[test]
fn custom_serialized_shape_is_checked_before_deserializing() {
    let schema: Schema = s().custom(cents_options()).into();
    let error = schema
        .deserialize(&Value::from("12.5"), &opts())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.kind, ErrorKind::Constraint);

    let ok = schema.deserialize(&Value::from("-1250"), &opts()).unwrap();
    assert_eq!(ok.deserialized, Some(cents(-1250)));
}

#[test]
fn custom_converter_errors_follow_the_mode() {
    let schema: Schema = s()
        .object()
        .field("total", s().custom(lenient_shape_cents_options()))
        .into();
    let input = v(json!({"total": "ten"}));

    let hard = schema.deserialize(&input, &opts()).unwrap();
    let error = hard.error.unwrap();
    assert_eq!(error.kind, ErrorKind::CustomSerDes);
    assert_eq!(error.level, ErrorLevel::Error);
    assert_eq!(
        error.message,
        "Failed to deserialize Cents: \"ten\" is not a whole number of cents @ [\"total\"]"
    );
    assert!(hard.deserialized.is_none());

    let soft = schema
        .deserialize(&input, &opts().validation(ValidationMode::Soft))
        .unwrap();
    assert_eq!(soft.error.unwrap().level, ErrorLevel::Warning);
    assert_eq!(soft.deserialized, Some(input.clone()));

    let none = schema
        .deserialize(&input, &opts().validation(ValidationMode::None))
        .unwrap();
    assert!(none.error.is_none());
}

#[test]
fn custom_rejects_foreign_in_memory_values() {
    let schema: Schema = s().custom(cents_options()).into();
    let error = schema
        .serialize(&Value::from(5), &opts())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.message, "Expected Cents, found number");
}

#[test]
fn custom_validation_hook() {
    let schema: Schema = s()
        .custom(cents_options().validate_with(|value| {
            match value.as_custom().and_then(|c| c.downcast_ref::<Cents>()) {
                Some(Cents(n)) if *n < 0 => Err("Expected a non-negative amount".into()),
                _ => Ok(()),
            }
        }))
        .into();
    assert!(schema.validate(&cents(5), &opts()).unwrap().error.is_none());
    let error = schema.validate(&cents(-5), &opts()).unwrap().error.unwrap();
    assert_eq!(error.message, "Expected a non-negative amount");
    let error = schema
        .deserialize(&Value::from("-5"), &opts())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.kind, ErrorKind::Constraint);
}

#[test]
fn clone_is_deep_and_idempotent() {
    let schema = order();
    let value = order_value(1, 0, 999, false, vec!["a".into()]);

    let once = schema.clone_value(&value, &opts()).unwrap().cloned.unwrap();
    assert_eq!(once, value);
    let original_total = value.get("total").and_then(Value::as_custom).unwrap();
    let cloned_total = once.get("total").and_then(Value::as_custom).unwrap();
    assert!(!original_total.ptr_eq(cloned_total));

    let twice = schema.clone_value(&once, &opts()).unwrap().cloned.unwrap();
    assert_eq!(twice, once);
}

#[test]
fn clone_hook_replaces_the_default_copy() {
    let schema: Schema = s()
        .custom(cents_options().clone_with(|_| cents(0)))
        .into();
    let cloned = schema.clone_value(&cents(7), &opts()).unwrap().cloned;
    assert_eq!(cloned, Some(cents(0)));
}

#[test]
fn retained_unknown_keys_are_copied() {
    let schema: Schema = s().object().field("a", s().number()).into();
    let mut map = Map::new();
    map.insert("a".into(), Value::from(1));
    map.insert("extra".into(), cents(3));
    let input = Value::Object(map);

    let copied = schema.clone_value(&input, &opts()).unwrap().cloned.unwrap();
    let shared = schema
        .clone_value(&input, &opts().ok_to_mutate_input_value(true))
        .unwrap()
        .cloned
        .unwrap();
    let original = input.get("extra").and_then(Value::as_custom).unwrap();
    assert!(!original.ptr_eq(copied.get("extra").and_then(Value::as_custom).unwrap()));
    assert!(original.ptr_eq(shared.get("extra").and_then(Value::as_custom).unwrap()));
}

#[test]
fn stringify_reports_values_without_json_form() {
    let schema: Schema = s().any().optional();
    let result = schema.stringify(&Value::Undefined, &opts()).unwrap();
    assert!(result.stringified.is_none());
    assert_eq!(result.error.unwrap().kind, ErrorKind::Json);

    let result = schema.stringify(&cents(1), &opts()).unwrap();
    assert_eq!(result.error.unwrap().kind, ErrorKind::Json);
}

#[test]
fn parse_reports_malformed_json() {
    let schema = order();
    let result = schema.parse("{\"id\": 1,", &opts()).unwrap();
    assert!(result.deserialized.is_none());
    let error = result.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Json);
    assert_eq!(error.level, ErrorLevel::Error);
}

#[test]
fn sync_operations_refuse_async_converters() {
    let schema: Schema = s().custom(common::async_cents_options()).into();
    let err = schema.serialize(&cents(1), &opts()).unwrap_err();
    assert_eq!(
        err,
        SchemaError::AsyncRequired {
            schema_type: typed_schema::SchemaType::Custom
        }
    );
    // Plain validation never converts, so it stays available.
    assert!(schema.validate(&cents(1), &opts()).unwrap().error.is_none());
}

#[test]
fn one_of_without_validation_serializes_custom_values() {
    let schema: Schema = s()
        .one_of([Schema::from(s().string()), s().custom(cents_options()).into()])
        .into();
    let none = opts().validation(ValidationMode::None);

    let serialized = schema.serialize(&cents(5), &none).unwrap();
    assert!(serialized.error.is_none());
    assert_eq!(serialized.serialized, Some(Value::from("5")));

    let text = schema.stringify(&cents(5), &none).unwrap();
    assert!(text.error.is_none());
    assert_eq!(text.stringified.as_deref(), Some("\"5\""));

    let parsed = schema.parse("\"5\"", &none).unwrap();
    assert_eq!(parsed.deserialized, Some(Value::from("5")));
}

#[test]
fn upgraded_without_validation_converts_with_the_legacy_form() {
    let schema: Schema = s()
        .upgraded("event.at", s().date(), s().number())
        .into();
    let none = opts().validation(ValidationMode::None);
    let out = schema
        .deserialize(&Value::from("2024-01-02T03:04:05.000Z"), &none)
        .unwrap();
    assert!(out.error.is_none());
    assert!(out.deserialized.unwrap().as_date().is_some());
}

#[test]
fn numbers_must_be_finite() {
    let amount: Schema = s()
        .number()
        .allowed_serialization_forms(&[SerializationForm::String])
        .into();
    for text in ["inf", "-inf", "NaN"] {
        let error = amount
            .deserialize(&Value::from(text), &opts())
            .unwrap()
            .error
            .unwrap();
        assert_eq!(error.kind, ErrorKind::Constraint, "{text}");
    }
    let error = amount
        .validate(&Value::Number(f64::INFINITY), &opts())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.message, "Expected a finite number, found inf");
}
