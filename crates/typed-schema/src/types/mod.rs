//! Leaf data-type schemas.

mod any;
mod boolean;
mod custom;
mod date;
mod number;
mod string;

pub use any::AnySchema;
pub use boolean::BooleanSchema;
pub use custom::{CustomSchema, CustomSchemaOptions, SerDesFn};
pub use date::DateSchema;
pub use number::NumberSchema;
pub use string::StringSchema;

use serde::{Deserialize, Serialize};

/// How a boolean or number may appear in its serialized form.
///
/// The first allowed form is used when serializing; deserializing accepts any allowed
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationForm {
    /// The value as-is (`true`, `3.5`).
    Native,
    /// The value as a string (`"true"`, `"3.5"`).
    String,
}

pub(crate) fn normalize_forms(forms: &[SerializationForm]) -> Vec<SerializationForm> {
    let mut out: Vec<SerializationForm> = Vec::with_capacity(forms.len());
    for form in forms {
        if !out.contains(form) {
            out.push(*form);
        }
    }
    if out.is_empty() {
        out.push(SerializationForm::Native);
    }
    out
}

/// `"a"`, `"a" or "b"`, `"a", "b" or "c"`.
pub(crate) fn describe_choices<T: std::fmt::Debug>(choices: &[T]) -> String {
    let rendered: Vec<String> = choices.iter().map(|c| format!("{c:?}")).collect();
    match rendered.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}
