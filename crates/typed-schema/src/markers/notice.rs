use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

fn registry() -> &'static Mutex<HashSet<String>> {
    static NOTICED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    NOTICED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Records `unique_name`; returns `true` the first time it is seen in this process.
fn first_sighting(unique_name: &str) -> bool {
    let mut noticed = registry()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    noticed.insert(unique_name.to_owned())
}

pub(crate) fn deprecated_once(unique_name: &str, path: &crate::path::LazyPath) {
    if first_sighting(unique_name) {
        tracing::warn!(
            target: "typed_schema",
            name = unique_name,
            path = %path,
            "deprecated value encountered"
        );
    }
}

pub(crate) fn legacy_once(unique_name: &str, path: &crate::path::LazyPath) {
    if first_sighting(unique_name) {
        tracing::warn!(
            target: "typed_schema",
            name = unique_name,
            path = %path,
            "legacy value encountered; upgrade to the new form"
        );
    }
}

#[cfg(test)]
pub(crate) fn was_noticed(unique_name: &str) -> bool {
    registry()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .contains(unique_name)
}
