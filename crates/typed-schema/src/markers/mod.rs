//! Schemas that wrap or combine other schemas.

mod all_of;
mod lifecycle;
mod not;
mod notice;
mod one_of;
mod optional;
mod reference;
mod root;
mod trial;

pub use all_of::AllOfSchema;
pub use lifecycle::{DeprecatedSchema, UpgradedSchema};
pub use not::NotSchema;
pub use one_of::OneOfSchema;
pub use optional::{AllowNullSchema, OptionalSchema};
pub use reference::{RefOptions, RefSchema};
pub use root::RootSchema;

#[cfg(test)]
pub(crate) use notice::was_noticed;
