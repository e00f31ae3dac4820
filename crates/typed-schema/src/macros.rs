/// Builder methods shared by every concrete schema struct, plus the conversion into the
/// shareable [`Schema`](crate::schema::Schema) handle.
macro_rules! schema_builders {
    ($ty:ident, $variant:ident) => {
        impl $ty {
            pub fn describe(mut self, description: impl Into<String>) -> Self {
                self.base.description = Some(description.into());
                self
            }

            pub fn example(mut self, example: impl Into<$crate::value::Value>) -> Self {
                self.base.example = Some(example.into());
                self
            }

            pub fn preferred_validation_mode(
                mut self,
                mode: impl Into<$crate::mode::PreferredValidationMode>,
                depth: $crate::mode::ValidationDepth,
            ) -> Self {
                self.base.preferred_validation_mode =
                    Some($crate::mode::ModePreference::new(mode, depth));
                self
            }

            pub fn optional(self) -> $crate::schema::Schema {
                $crate::schema::Schema::from(self).optional()
            }

            pub fn allow_null(self) -> $crate::schema::Schema {
                $crate::schema::Schema::from(self).allow_null()
            }

            pub fn not(self, excluded: impl Into<$crate::schema::Schema>) -> $crate::schema::Schema {
                $crate::schema::Schema::from(self).not(excluded)
            }
        }

        impl From<$ty> for $crate::schema::Schema {
            fn from(schema: $ty) -> Self {
                $crate::schema::Schema::from_kind($crate::schema::SchemaKind::$variant(schema))
            }
        }
    };
}
