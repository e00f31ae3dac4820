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

fn nested() -> Schema {
    s().object()
        .field("id", s().number())
        .field(
            "items",
            s().array(s().object().field("name", s().string())),
        )
        .field("meta", s().object().allow_unknown_keys(true))
        .into()
}

fn input() -> Value {
    v(json!({
        "id": 1,
        "extra": true,
        "items": [{"name": "a", "junk": 1}, {"name": "b"}],
        "meta": {"anything": [1, 2]}
    }))
}

#[test]
fn unknown_keys_are_kept_by_default() {
    let result = nested()
        .deserialize(&input(), &OperationOptions::default())
        .unwrap();
    assert!(result.error.is_none());
    assert_eq!(result.deserialized.unwrap(), input());
}

#[test]
fn fail_reports_first_path_in_visit_order() {
    let options = OperationOptions::default().fail_on_unknown_keys(true);
    let error = nested().validate(&input(), &options).unwrap().error.unwrap();
    assert_eq!(error.kind, ErrorKind::UnknownKey);
    assert_eq!(error.level, ErrorLevel::Error);
    assert_eq!(error.path, "");
    assert_eq!(error.message, "Encountered unknown keys: \"extra\"");

    let error = nested()
        .validate(
            &v(json!({"id": 1, "items": [{"name": "a"}, {"name": "b", "junk": 1}], "meta": {}})),
            &options,
        )
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.path, "[\"items\"][1]");
}

#[test]
fn fail_is_a_warning_under_soft_validation() {
    let options = OperationOptions::default()
        .validation(ValidationMode::Soft)
        .fail_on_unknown_keys(true);
    let result = nested().deserialize(&input(), &options).unwrap();
    assert_eq!(result.error.unwrap().level, ErrorLevel::Warning);
    assert_eq!(result.deserialized.unwrap(), input());
}

#[test]
fn remove_strips_undeclared_keys_at_every_level() {
    let options = OperationOptions::default().remove_unknown_keys(true);
    let result = nested().deserialize(&input(), &options).unwrap();
    assert!(result.error.is_none());
    assert_eq!(
        result.deserialized.unwrap(),
        v(json!({
            "id": 1,
            "items": [{"name": "a"}, {"name": "b"}],
            "meta": {"anything": [1, 2]}
        }))
    );
}

#[test]
fn fail_and_remove_together() {
    let options = OperationOptions::default()
        .validation(ValidationMode::Soft)
        .fail_on_unknown_keys(true)
        .remove_unknown_keys(true);
    let result = nested().deserialize(&input(), &options).unwrap();
    assert_eq!(result.error.unwrap().level, ErrorLevel::Warning);
    assert_eq!(result.deserialized.unwrap().get("extra"), None);
}

#[test]
fn any_exempts_its_object() {
    let schema: Schema = s().object().field("payload", s().any()).into();
    let options = OperationOptions::default().fail_on_unknown_keys(true);
    let report = schema
        .validate(&v(json!({"payload": {"free": {"form": 1}}})), &options)
        .unwrap();
    assert!(report.error.is_none());
}

#[test]
fn skipped_when_validation_is_off() {
    let options = OperationOptions::default()
        .validation(ValidationMode::None)
        .fail_on_unknown_keys(true)
        .remove_unknown_keys(true);
    let result = nested().deserialize(&input(), &options).unwrap();
    assert!(result.error.is_none());
    assert_eq!(result.deserialized.unwrap(), input());
}

#[test]
fn hard_errors_skip_post_processing() {
    let options = OperationOptions::default().fail_on_unknown_keys(true);
    let error = nested()
        .validate(&v(json!({"id": "x", "extra": 1, "items": [], "meta": {}})), &options)
        .unwrap()
        .error
        .unwrap();
    assert_eq!(error.kind, ErrorKind::TypeMismatch);
}
