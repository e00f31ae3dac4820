//! Unknown-key handling after traversal.
//!
//! Every object visited records which keys its schema declares (or that it accepts any
//! key) and which keys it observed. Several schemas may visit the same object (`allOf`,
//! `not`), so records are consolidated per path before residual keys are computed.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::mode::ValidationMode;
use crate::path::{LazyPath, PathComponent};
use crate::result::{ErrorKind, ErrorLevel, ValidationFailure};
use crate::state::{KnownKeys, UnknownKeysRecord};
use crate::value::Value;

struct Visit {
    path: LazyPath,
    allow_all: bool,
    declared: HashSet<String>,
    observed: IndexSet<String>,
}

/// Keys observed at one path that no visiting schema declares.
pub(crate) struct Residual {
    pub path: LazyPath,
    pub keys: Vec<String>,
}

/// Consolidates records in first-visited order and computes the residual keys per path.
pub(crate) fn residual_keys(records: Vec<UnknownKeysRecord>) -> Vec<Residual> {
    let mut visits: IndexMap<String, Visit> = IndexMap::new();
    for record in records {
        let visit = visits
            .entry(record.path.resolve().string.clone())
            .or_insert_with(|| Visit {
                path: record.path.clone(),
                allow_all: false,
                declared: HashSet::new(),
                observed: IndexSet::new(),
            });
        match record.known {
            KnownKeys::All => visit.allow_all = true,
            KnownKeys::Declared(keys) => visit.declared.extend(keys),
        }
        visit.observed.extend(record.observed);
    }

    visits
        .into_values()
        .filter(|visit| !visit.allow_all)
        .filter_map(|visit| {
            let keys: Vec<String> = visit
                .observed
                .into_iter()
                .filter(|key| !visit.declared.contains(key))
                .collect();
            (!keys.is_empty()).then(|| Residual {
                path: visit.path,
                keys,
            })
        })
        .collect()
}

/// Applies the unknown-key policies to `output`.
///
/// Returns the failure for the first path holding unknown keys when
/// `fail_on_unknown_keys` is set. With `remove_unknown_keys` the residual keys are
/// deleted from `output` in place.
pub(crate) fn post_process(
    records: Vec<UnknownKeysRecord>,
    output: &mut Value,
    base: ValidationMode,
    fail_on_unknown_keys: bool,
    remove_unknown_keys: bool,
) -> Option<ValidationFailure> {
    if base == ValidationMode::None || !(fail_on_unknown_keys || remove_unknown_keys) {
        return None;
    }
    let level = if base == ValidationMode::Hard {
        ErrorLevel::Error
    } else {
        ErrorLevel::Warning
    };

    let mut failure = None;
    for residual in residual_keys(records) {
        if fail_on_unknown_keys && failure.is_none() {
            let keys = residual.keys.clone();
            failure = Some(ValidationFailure::new(
                ErrorKind::UnknownKey,
                level,
                residual.path.clone(),
                move || {
                    let quoted: Vec<String> = keys.iter().map(|k| format!("{k:?}")).collect();
                    format!("Encountered unknown keys: {}", quoted.join(", "))
                },
                Value::Undefined,
            ));
        }
        if remove_unknown_keys {
            remove_keys(output, &residual.path.resolve().parts, &residual.keys);
        }
    }
    failure
}

fn remove_keys(output: &mut Value, parts: &[PathComponent], keys: &[String]) {
    if let Some(Value::Object(map)) = output.get_path_mut(parts) {
        for key in keys {
            map.shift_remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(path: &LazyPath, known: KnownKeys, observed: &[&str]) -> UnknownKeysRecord {
        UnknownKeysRecord {
            path: path.clone(),
            known,
            observed: observed.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn declared(keys: &[&str]) -> KnownKeys {
        KnownKeys::Declared(keys.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn union_of_declared_keys_across_visits() {
        let root = LazyPath::root();
        let residual = residual_keys(vec![
            record(&root, declared(&["a"]), &["a", "b", "c"]),
            record(&root, declared(&["b"]), &["a", "b", "c"]),
        ]);
        assert_eq!(residual.len(), 1);
        assert_eq!(residual[0].keys, vec!["c".to_string()]);
    }

    #[test]
    fn allow_all_wins_over_declarations() {
        let root = LazyPath::root();
        let residual = residual_keys(vec![
            record(&root, declared(&["a"]), &["a", "b"]),
            record(&root, KnownKeys::All, &[]),
        ]);
        assert!(residual.is_empty());
    }

    #[test]
    fn fails_on_first_path_and_removes_everywhere() {
        let root = LazyPath::root();
        let inner = root.append("inner");
        let mut output = Value::from(json!({"a": 1, "x": 1, "inner": {"b": 2, "y": 2}}));
        let failure = post_process(
            vec![
                record(&root, declared(&["a", "inner"]), &["a", "x", "inner"]),
                record(&inner, declared(&["b"]), &["b", "y"]),
            ],
            &mut output,
            ValidationMode::Soft,
            true,
            true,
        )
        .unwrap();
        assert_eq!(failure.level, ErrorLevel::Warning);
        assert_eq!(failure.formatted(), "Encountered unknown keys: \"x\"");
        assert_eq!(output, Value::from(json!({"a": 1, "inner": {"b": 2}})));
    }

    #[test]
    fn skipped_when_validation_is_off() {
        let mut output = Value::from(json!({"x": 1}));
        let failure = post_process(
            vec![record(&LazyPath::root(), declared(&[]), &["x"])],
            &mut output,
            ValidationMode::None,
            true,
            true,
        );
        assert!(failure.is_none());
        assert_eq!(output, Value::from(json!({"x": 1})));
    }
}
