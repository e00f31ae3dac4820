//! Validation strictness and its resolution per schema node.

use serde::{Deserialize, Serialize};

/// How strictly an operation validates. Ordered by strictness: `None < Soft < Hard`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Skip validation, transform on a best-effort basis.
    None,
    /// Keep going past failures, reporting them as warnings.
    Soft,
    /// Stop at the first failure and report it as an error.
    #[default]
    Hard,
}

/// A per-schema override of the operation's validation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredValidationMode {
    None,
    Soft,
    Hard,
    /// The mode the operation started with.
    Initial,
    /// Whatever the nearest ancestor resolved to.
    Inherit,
}

impl From<ValidationMode> for PreferredValidationMode {
    fn from(mode: ValidationMode) -> Self {
        match mode {
            ValidationMode::None => Self::None,
            ValidationMode::Soft => Self::Soft,
            ValidationMode::Hard => Self::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationDepth {
    /// Applies to the schema itself, not past the next container boundary.
    Shallow,
    /// Applies to the whole subtree until overridden.
    #[default]
    Deep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModePreference {
    pub mode: PreferredValidationMode,
    pub depth: ValidationDepth,
}

impl ModePreference {
    pub fn new(mode: impl Into<PreferredValidationMode>, depth: ValidationDepth) -> Self {
        Self {
            mode: mode.into(),
            depth,
        }
    }

    /// Resets a subtree to the operation's starting mode.
    pub(crate) fn reset() -> Self {
        Self::new(PreferredValidationMode::Initial, ValidationDepth::Deep)
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    preference: ModePreference,
    containers_at_push: usize,
}

/// Stack of preferences collected from the schemas currently being traversed.
#[derive(Debug, Clone)]
pub(crate) struct ModeResolver {
    base: ValidationMode,
    frames: Vec<Frame>,
    containers: usize,
}

impl ModeResolver {
    pub fn new(base: ValidationMode) -> Self {
        Self {
            base,
            frames: Vec::new(),
            containers: 0,
        }
    }

    pub fn base(&self) -> ValidationMode {
        self.base
    }

    pub fn push(&mut self, preference: ModePreference) {
        self.frames.push(Frame {
            preference,
            containers_at_push: self.containers,
        });
    }

    pub fn pop(&mut self, count: usize) {
        let len = self.frames.len().saturating_sub(count);
        self.frames.truncate(len);
    }

    /// Called when traversal descends from a container into its children.
    pub fn enter_container(&mut self) {
        self.containers += 1;
    }

    pub fn exit_container(&mut self) {
        self.containers = self.containers.saturating_sub(1);
    }

    pub fn resolve(&self) -> ValidationMode {
        if self.base == ValidationMode::None {
            return ValidationMode::None;
        }
        for frame in self.frames.iter().rev() {
            let resolved = match frame.preference.mode {
                PreferredValidationMode::Inherit => continue,
                PreferredValidationMode::Initial => self.base,
                PreferredValidationMode::None => ValidationMode::None,
                PreferredValidationMode::Soft => ValidationMode::Soft,
                PreferredValidationMode::Hard => ValidationMode::Hard,
            };
            let crossed = self.containers.saturating_sub(frame.containers_at_push);
            if frame.preference.depth == ValidationDepth::Deep || crossed == 0 {
                return resolved.min(self.base);
            }
        }
        self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValidationDepth::*;

    fn pref(mode: PreferredValidationMode, depth: ValidationDepth) -> ModePreference {
        ModePreference::new(mode, depth)
    }

    #[test]
    fn falls_back_to_base() {
        let r = ModeResolver::new(ValidationMode::Hard);
        assert_eq!(r.resolve(), ValidationMode::Hard);
    }

    #[test]
    fn none_base_short_circuits() {
        let mut r = ModeResolver::new(ValidationMode::None);
        r.push(pref(PreferredValidationMode::Hard, Deep));
        assert_eq!(r.resolve(), ValidationMode::None);
    }

    #[test]
    fn preference_cannot_exceed_base() {
        let mut r = ModeResolver::new(ValidationMode::Soft);
        r.push(pref(PreferredValidationMode::Hard, Deep));
        assert_eq!(r.resolve(), ValidationMode::Soft);
    }

    #[test]
    fn inherit_is_skipped_and_initial_uses_base() {
        let mut r = ModeResolver::new(ValidationMode::Hard);
        r.push(pref(PreferredValidationMode::Soft, Deep));
        r.push(pref(PreferredValidationMode::Inherit, Deep));
        assert_eq!(r.resolve(), ValidationMode::Soft);
        r.push(pref(PreferredValidationMode::Initial, Deep));
        assert_eq!(r.resolve(), ValidationMode::Hard);
        r.pop(1);
        assert_eq!(r.resolve(), ValidationMode::Soft);
    }

    #[test]
    fn shallow_stops_at_container_boundary() {
        let mut r = ModeResolver::new(ValidationMode::Hard);
        r.push(pref(PreferredValidationMode::Soft, Shallow));
        assert_eq!(r.resolve(), ValidationMode::Soft);
        r.enter_container();
        assert_eq!(r.resolve(), ValidationMode::Hard);
        r.exit_container();
        assert_eq!(r.resolve(), ValidationMode::Soft);
    }

    #[test]
    fn deep_crosses_container_boundaries() {
        let mut r = ModeResolver::new(ValidationMode::Hard);
        r.push(pref(PreferredValidationMode::None, Deep));
        r.enter_container();
        r.enter_container();
        assert_eq!(r.resolve(), ValidationMode::None);
    }

    #[test]
    fn shallow_out_of_scope_falls_through_to_outer_frame() {
        let mut r = ModeResolver::new(ValidationMode::Hard);
        r.push(pref(PreferredValidationMode::None, Deep));
        r.push(pref(PreferredValidationMode::Soft, Shallow));
        r.enter_container();
        assert_eq!(r.resolve(), ValidationMode::None);
    }

    #[test]
    fn modes_deserialize_lowercase() {
        let m: ValidationMode = serde_json::from_str("\"soft\"").unwrap();
        assert_eq!(m, ValidationMode::Soft);
        let p: PreferredValidationMode = serde_json::from_str("\"inherit\"").unwrap();
        assert_eq!(p, PreferredValidationMode::Inherit);
    }
}
