//! Metadata shared by every schema kind, and the derived flags the engine consults
//! during traversal.

use crate::mode::ModePreference;
use crate::value::Value;

/// Descriptive metadata plus the optional validation-mode override.
#[derive(Debug, Clone, Default)]
pub struct BaseInfo {
    pub description: Option<String>,
    pub example: Option<Value>,
    pub preferred_validation_mode: Option<ModePreference>,
}

impl BaseInfo {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Traversal-relevant properties, computed bottom-up when a schema is built and read in
/// constant time afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaFlags {
    /// Positive cost estimate; for containers roughly proportional to the expected
    /// number of elements.
    pub estimated_validation_time_complexity: u64,
    /// This schema or a descendant converts values on serialize/deserialize.
    pub uses_custom_serdes: bool,
    /// This schema or a descendant has a serializer/deserializer that only runs async.
    pub uses_async_serdes: bool,
    pub is_or_contains_object_potentially_needing_unknown_key_removal: bool,
    /// May hold named or indexed children that participate in unknown-key logic.
    pub is_container_type: bool,
}

/// Expected element count for containers without an upper length bound.
pub const UNBOUNDED_COLLECTION_SIZE: u64 = 1_000;

impl SchemaFlags {
    pub const fn leaf() -> Self {
        Self {
            estimated_validation_time_complexity: 1,
            uses_custom_serdes: false,
            uses_async_serdes: false,
            is_or_contains_object_potentially_needing_unknown_key_removal: false,
            is_container_type: false,
        }
    }

    /// Flags of a combinator over `children`: costs add up, booleans propagate.
    pub fn combined<'a>(children: impl IntoIterator<Item = &'a SchemaFlags>) -> Self {
        let mut out = Self {
            estimated_validation_time_complexity: 0,
            ..Self::leaf()
        };
        for child in children {
            out.estimated_validation_time_complexity = out
                .estimated_validation_time_complexity
                .saturating_add(child.estimated_validation_time_complexity);
            out.uses_custom_serdes |= child.uses_custom_serdes;
            out.uses_async_serdes |= child.uses_async_serdes;
            out.is_or_contains_object_potentially_needing_unknown_key_removal |=
                child.is_or_contains_object_potentially_needing_unknown_key_removal;
        }
        out.estimated_validation_time_complexity = out.estimated_validation_time_complexity.max(1);
        out
    }

    pub fn container(mut self) -> Self {
        self.is_container_type = true;
        self
    }

    pub fn times(mut self, factor: u64) -> Self {
        self.estimated_validation_time_complexity = self
            .estimated_validation_time_complexity
            .saturating_mul(factor.max(1));
        self
    }
}
