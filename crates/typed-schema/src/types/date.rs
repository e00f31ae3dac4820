use chrono::{DateTime, Utc};

use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, type_mismatch, ErrorKind, Validation};
use crate::schema::BaseInfo;
use crate::state::{InternalState, Transformation};
use crate::value::{convert::format_date, Value};

/// Dates, serialized as ISO-8601 strings.
#[derive(Debug, Clone, Default)]
pub struct DateSchema {
    pub base: BaseInfo,
    min: Option<DateTime<Utc>>,
    max: Option<DateTime<Utc>>,
}

impl DateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, date: DateTime<Utc>) -> Self {
        self.min = Some(date);
        self
    }

    pub fn max(mut self, date: DateTime<Utc>) -> Self {
        self.max = Some(date);
        self
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let transformation = state.transformation();
        let date = match (transformation, value) {
            (Transformation::Deserialize, Value::String(s)) => match parse_date(s) {
                Some(date) => date,
                None => {
                    let found = s.clone();
                    return fail(
                        mode,
                        ErrorKind::TypeMismatch,
                        path,
                        move || format!("Expected ISO 8601 date string, found {found:?}"),
                        value.clone(),
                    );
                }
            },
            (Transformation::Deserialize, _) => {
                return type_mismatch(mode, "ISO 8601 date string", value, path)
            }
            (_, Value::Date(date)) => *date,
            _ => return type_mismatch(mode, "date", value, path),
        };

        let converted = match transformation {
            Transformation::Serialize => Value::String(format_date(&date)),
            _ => Value::Date(date),
        };

        if let Some(min) = self.min {
            if date < min {
                return fail(
                    mode,
                    ErrorKind::Constraint,
                    path,
                    move || format!("Expected date on or after {}, found {}", format_date(&min), format_date(&date)),
                    converted,
                );
            }
        }
        if let Some(max) = self.max {
            if date > max {
                return fail(
                    mode,
                    ErrorKind::Constraint,
                    path,
                    move || format!("Expected date on or before {}, found {}", format_date(&max), format_date(&date)),
                    converted,
                );
            }
        }
        Ok(converted)
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

schema_builders!(DateSchema, Date);
