use regex::Regex;

use super::describe_choices;
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, type_mismatch, ErrorKind, Validation};
use crate::schema::BaseInfo;
use crate::state::InternalState;
use crate::value::Value;

/// Strings, optionally restricted by allowed values, a length range (in characters) and
/// a pattern.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub base: BaseInfo,
    allowed_values: Vec<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Requires a match of `pattern` somewhere in the string; anchor it for full matches.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    fn check(&self, s: &str) -> Result<(), String> {
        if !self.allowed_values.is_empty() && !self.allowed_values.iter().any(|v| v == s) {
            return Err(format!(
                "Expected {}, found {s:?}",
                describe_choices(&self.allowed_values)
            ));
        }
        let len = s.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                return Err(format!(
                    "Expected string with at least {min} characters, found {len}"
                ));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(format!(
                    "Expected string with at most {max} characters, found {len}"
                ));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(s) {
                return Err(format!("Expected string matching {}, found {s:?}", pattern.as_str()));
            }
        }
        Ok(())
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        _state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let Value::String(s) = value else {
            return type_mismatch(mode, "string", value, path);
        };
        if let Err(message) = self.check(s) {
            return fail(mode, ErrorKind::Constraint, path, move || message.clone(), value.clone());
        }
        Ok(value.clone())
    }
}

schema_builders!(StringSchema, String);
