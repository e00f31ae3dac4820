//! Container traversal and combinator behaviour through the public operations.

use chrono::TimeZone;
use regex::Regex;
use serde_json::json;
use typed_schema::{
    ErrorKind, ErrorLevel, OperationOptions, Schema, SchemaBuilder, ValidationMode, Value,
};

fn s() -> SchemaBuilder {
    SchemaBuilder::new()
}

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn hard() -> OperationOptions {
    OperationOptions::default()
}

fn soft() -> OperationOptions {
    OperationOptions::default().validation(ValidationMode::Soft)
}

fn person() -> Schema {
    s().object()
        .field("name", s().string())
        .field("age", s().number().min(0.0).optional())
        .into()
}

#[test]
fn object_accepts_declared_shape() {
    let report = person().validate(&v(json!({"name": "Ada"})), &hard()).unwrap();
    assert!(report.error.is_none());
    assert!(report.is_valid());
}

#[test]
fn object_reports_missing_required_field_at_its_path() {
    let report = person().validate(&v(json!({"age": 3})), &hard()).unwrap();
    let error = report.error.unwrap();
    assert_eq!(error.kind, ErrorKind::TypeMismatch);
    assert_eq!(error.level, ErrorLevel::Error);
    assert_eq!(error.path, "[\"name\"]");
    assert_eq!(error.message, "Expected string, found undefined @ [\"name\"]");
}

#[test]
fn object_rejects_non_objects() {
    let error = person()
        .validate(&v(json!(["Ada"])), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.message, "Expected object, found array");
    assert_eq!(error.path, "");
}

#[test]
fn soft_validation_reports_first_of_equally_severe_failures() {
    let schema: Schema = s()
        .object()
        .field("a", s().number())
        .field("b", s().string())
        .into();
    let error = schema
        .validate(&v(json!({"a": "x", "b": 1})), &soft())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.level, ErrorLevel::Warning);
    assert_eq!(error.path, "[\"a\"]");
}

#[test]
fn array_length_constraints() {
    let schema: Schema = s().array(s().number()).min_length(1).max_length(3).into();
    let too_short = schema.validate(&v(json!([])), &hard()).unwrap().error.unwrap();
    assert_eq!(too_short.kind, ErrorKind::Constraint);
    assert_eq!(too_short.message, "Expected array with at least 1 items, found 0");

    let too_long = schema
        .validate(&v(json!([1, 2, 3, 4])), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(too_long.message, "Expected array with at most 3 items, found 4");

    let bad_item = schema
        .validate(&v(json!([1, "x"])), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(bad_item.path, "[1]");
}

#[test]
fn array_entry_limit_applies_to_plain_validation_only() {
    let schema: Schema = s().array(s().number()).max_entries_to_validate(2).into();
    let value = v(json!([1, 2, "x"]));
    assert!(schema.validate(&value, &hard()).unwrap().error.is_none());

    let result = schema.deserialize(&value, &hard()).unwrap();
    assert!(result.deserialized.is_none());
    assert_eq!(result.error.unwrap().path, "[2]");
}

#[test]
fn soft_array_keeps_best_effort_output() {
    let schema: Schema = s().array(s().date()).into();
    let result = schema
        .deserialize(&v(json!(["2024-01-02T03:04:05.000Z", "nope"])), &soft())
        .unwrap();
    let error = result.error.unwrap();
    assert_eq!(error.level, ErrorLevel::Warning);
    assert_eq!(error.path, "[1]");
    let out = result.deserialized.unwrap();
    let items = out.as_array().unwrap();
    assert!(items[0].as_date().is_some());
    assert_eq!(items[1], Value::from("nope"));
}

#[test]
fn tuple_requires_exact_arity() {
    let schema: Schema = s().tuple([Schema::from(s().string()), s().number().into()]).into();
    assert!(schema.validate(&v(json!(["a", 1])), &hard()).unwrap().error.is_none());

    let error = schema.validate(&v(json!(["a"])), &hard()).unwrap().error.unwrap();
    assert_eq!(error.message, "Expected array with exactly 2 items, found 1");

    let error = schema
        .validate(&v(json!([1, 1])), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.path, "[0]");
}

#[test]
fn tuple_keeps_surplus_items_when_arity_is_only_a_warning() {
    let schema: Schema = s().tuple([Schema::from(s().string()), s().date().into()]).into();
    let input = v(json!(["a", "2024-01-02T03:04:05.000Z", "extra", 4]));

    let result = schema.deserialize(&input, &soft()).unwrap();
    let error = result.error.unwrap();
    assert_eq!(error.level, ErrorLevel::Warning);
    assert_eq!(error.message, "Expected array with exactly 2 items, found 4");
    let out = result.deserialized.unwrap();
    let items = out.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert!(items[1].as_date().is_some());
    assert_eq!(items[2], Value::from("extra"));
    assert_eq!(items[3], Value::from(4));

    let none = schema
        .deserialize(&input, &hard().validation(ValidationMode::None))
        .unwrap();
    assert!(none.error.is_none());
    assert_eq!(none.deserialized.unwrap().as_array().unwrap().len(), 4);
}

#[test]
fn record_validates_only_known_keys() {
    let lower = Regex::new(r"^[a-z]+$").unwrap();
    let schema: Schema = s().record(s().string().pattern(lower), s().number()).into();

    assert!(schema
        .validate(&v(json!({"a": 1, "b": 2})), &hard())
        .unwrap()
        .error
        .is_none());

    let error = schema
        .validate(&v(json!({"a": "x"})), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.path, "[\"a\"]");

    // A rejected key is not a validation error by itself.
    assert!(schema
        .validate(&v(json!({"A1": "x"})), &hard())
        .unwrap()
        .error
        .is_none());

    let error = schema
        .validate(&v(json!({"A1": "x"})), &hard().fail_on_unknown_keys(true))
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.kind, ErrorKind::UnknownKey);
}

#[test]
fn record_matching_pattern() {
    let schema: Schema = s()
        .record_matching(Regex::new(r"^id_\d+$").unwrap(), s().string())
        .into();
    let result = schema
        .deserialize(
            &v(json!({"id_1": "a", "other": 5})),
            &hard().remove_unknown_keys(true),
        )
        .unwrap();
    assert!(result.error.is_none());
    assert_eq!(result.deserialized.unwrap(), v(json!({"id_1": "a"})));
}

#[test]
fn record_with_many_keys_converts_known_and_retains_unknown() {
    let schema: Schema = s()
        .record(s().string().pattern(Regex::new(r"^k\d+$").unwrap()), s().date())
        .into();
    let mut map = typed_schema::Map::new();
    for i in 0..5_000 {
        map.insert(format!("k{i}"), Value::from("2024-01-02T03:04:05.000Z"));
        map.insert(format!("x{i}"), Value::from(i));
    }
    let input = Value::Object(map);

    let result = schema.deserialize(&input, &hard()).unwrap();
    assert!(result.error.is_none(), "{:?}", result.error);
    let out = result.deserialized.unwrap();
    let out = out.as_object().unwrap();
    assert_eq!(out.len(), 10_000);
    assert!(out.get("k4999").and_then(Value::as_date).is_some());
    assert_eq!(out.get("x4999"), Some(&Value::from(4999)));

    let stripped = schema
        .deserialize(&input, &hard().remove_unknown_keys(true))
        .unwrap()
        .deserialized
        .unwrap();
    assert_eq!(stripped.as_object().unwrap().len(), 5_000);
}

#[test]
fn one_of_takes_first_match_and_aggregates_failures() {
    let schema: Schema = s().one_of([Schema::from(s().string()), s().number().into()]).into();
    assert!(schema.validate(&v(json!(1)), &hard()).unwrap().error.is_none());

    let error = schema.validate(&v(json!(true)), &hard()).unwrap().error.unwrap();
    assert_eq!(error.kind, ErrorKind::NoMatch);
    assert_eq!(
        error.message,
        "Expected one of the alternatives to match: Expected string, found boolean; \
         Expected number, found boolean"
    );
}

#[test]
fn one_of_discards_bookkeeping_of_failed_branches() {
    let first: Schema = s()
        .object()
        .field("kind", s().string_of(["a"]))
        .field("a", s().number())
        .into();
    let second: Schema = s()
        .object()
        .field("kind", s().string_of(["b"]))
        .field("b", s().number())
        .into();
    let schema: Schema = s().one_of([first, second]).into();

    let report = schema
        .validate(&v(json!({"kind": "b", "b": 1})), &hard().fail_on_unknown_keys(true))
        .unwrap();
    assert!(report.error.is_none(), "{:?}", report.error);
}

#[test]
fn all_of_merges_object_outputs() {
    let left: Schema = s()
        .object()
        .field("when", s().date())
        .allow_unknown_keys(true)
        .into();
    let right: Schema = s()
        .object()
        .field("name", s().string())
        .allow_unknown_keys(true)
        .into();
    let schema: Schema = s().all_of([left, right]).into();

    let result = schema
        .deserialize(
            &v(json!({"when": "2024-05-06T07:08:09.010Z", "name": "x"})),
            &hard(),
        )
        .unwrap();
    assert!(result.error.is_none());
    let out = result.deserialized.unwrap();
    assert!(out.get("when").and_then(Value::as_date).is_some());
    assert_eq!(out.get("name"), Some(&Value::from("x")));

    let error = schema
        .validate(&v(json!({"when": 1, "name": "x"})), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.path, "[\"when\"]");
}

#[test]
fn all_of_merges_nested_object_outputs() {
    let left: Schema = s()
        .object()
        .field("a", s().object().field("x", s().number()))
        .into();
    let right: Schema = s()
        .object()
        .field("a", s().object().field("y", s().date()))
        .into();
    let schema: Schema = s().all_of([left, right]).into();

    let result = schema
        .deserialize(
            &v(json!({"a": {"x": 1, "y": "2024-01-02T03:04:05.000Z"}})),
            &hard(),
        )
        .unwrap();
    assert!(result.error.is_none(), "{:?}", result.error);
    let out = result.deserialized.unwrap();
    let inner = out.get("a").unwrap();
    assert_eq!(inner.get("x"), Some(&Value::from(1)));
    assert!(inner.get("y").and_then(Value::as_date).is_some());
}

#[test]
fn all_of_declarations_combine_for_unknown_keys() {
    let left: Schema = s().object().field("a", s().number()).into();
    let right: Schema = s().object().field("b", s().number()).into();
    let schema: Schema = s().all_of([left, right]).into();
    let options = hard().fail_on_unknown_keys(true);

    assert!(schema
        .validate(&v(json!({"a": 1, "b": 2})), &options)
        .unwrap()
        .error
        .is_none());
    let error = schema
        .validate(&v(json!({"a": 1, "b": 2, "c": 3})), &options)
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.kind, ErrorKind::UnknownKey);
}

#[test]
fn not_excludes_matching_values() {
    let schema = s().string().not(s().string_of(["forbidden"]));
    assert!(schema.validate(&v(json!("fine")), &hard()).unwrap().error.is_none());

    let error = schema
        .validate(&v(json!("forbidden")), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.kind, ErrorKind::Exclusion);
    assert_eq!(error.message, "Expected a value not matching the excluded string schema");

    let error = schema.validate(&v(json!(3)), &hard()).unwrap().error.unwrap();
    assert_eq!(error.kind, ErrorKind::TypeMismatch);
}

#[test]
fn one_of_without_validation_converts_with_the_fitting_alternative() {
    let schema: Schema = s().one_of([Schema::from(s().string()), s().date().into()]).into();
    let date = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let none = hard().validation(ValidationMode::None);

    let result = schema.serialize(&Value::Date(date), &none).unwrap();
    assert!(result.error.is_none());
    assert_eq!(result.serialized, Some(Value::from("2024-01-02T03:04:05.000Z")));

    let result = schema
        .deserialize(&Value::from("2024-01-02T03:04:05.000Z"), &none)
        .unwrap();
    assert_eq!(result.deserialized, Some(Value::from("2024-01-02T03:04:05.000Z")));

    // Nothing fits: the input passes through.
    let result = schema.serialize(&Value::from(true), &none).unwrap();
    assert!(result.error.is_none());
    assert_eq!(result.serialized, Some(Value::from(true)));
}

#[test]
fn optional_and_allow_null() {
    let schema: Schema = s()
        .object()
        .field("maybe", s().number().optional())
        .field("nullable", s().number().allow_null())
        .into();
    assert!(schema
        .validate(&v(json!({"nullable": null})), &hard())
        .unwrap()
        .error
        .is_none());
    let error = schema
        .validate(&v(json!({"maybe": null, "nullable": 1})), &hard())
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.message, "Expected number, found null @ [\"maybe\"]");
}
