//! Conversions between [`Value`] and `serde_json::Value`.

use chrono::SecondsFormat;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use thiserror::Error;

use super::value::Value;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("undefined has no JSON representation")]
    Undefined,
    #[error("custom value of type {0} has no JSON representation")]
    Custom(&'static str),
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Formats a date the way JSON encoders in the JavaScript ecosystem do
/// (`2024-01-02T03:04:05.006Z`).
pub fn format_date(date: &chrono::DateTime<chrono::Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn number_to_json(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return JsonValue::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

impl Value {
    /// Converts to JSON following `JSON.stringify` conventions: undefined object members
    /// are skipped, undefined array elements and non-finite numbers become `null`, and
    /// dates become ISO-8601 strings. Undefined at the root and custom payloads anywhere
    /// are errors.
    pub fn to_json(&self) -> Result<JsonValue, ValueError> {
        match self {
            Self::Undefined => Err(ValueError::Undefined),
            Self::Null => Ok(JsonValue::Null),
            Self::Bool(b) => Ok(JsonValue::Bool(*b)),
            Self::Number(n) => Ok(number_to_json(*n)),
            Self::String(s) => Ok(JsonValue::String(s.clone())),
            Self::Array(items) => items
                .iter()
                .map(|item| match item {
                    Self::Undefined => Ok(JsonValue::Null),
                    other => other.to_json(),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Self::Object(map) => {
                let mut out = JsonMap::new();
                for (key, value) in map {
                    if value.is_undefined() {
                        continue;
                    }
                    out.insert(key.clone(), value.to_json()?);
                }
                Ok(JsonValue::Object(out))
            }
            Self::Date(d) => Ok(JsonValue::String(format_date(d))),
            Self::Custom(c) => Err(ValueError::Custom(c.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn integers_stay_integers() {
        let v = Value::from(json!({"a": 1, "b": 1.5, "c": [true, null, "x"]}));
        assert_eq!(v.to_json().unwrap(), json!({"a": 1, "b": 1.5, "c": [true, null, "x"]}));
    }

    #[test]
    fn undefined_follows_stringify_rules() {
        let mut map = crate::value::Map::new();
        map.insert("gone".into(), Value::Undefined);
        map.insert("list".into(), Value::Array(vec![Value::Undefined]));
        assert_eq!(Value::Object(map).to_json().unwrap(), json!({"list": [null]}));
        assert_eq!(Value::Undefined.to_json(), Err(ValueError::Undefined));
    }

    #[test]
    fn dates_render_as_iso_strings() {
        let d = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            Value::Date(d).to_json().unwrap(),
            json!("2024-01-02T03:04:05.000Z")
        );
    }

    #[test]
    fn non_finite_numbers_become_null() {
        assert_eq!(Value::Number(f64::NAN).to_json().unwrap(), JsonValue::Null);
    }
}
