pub mod convert;
pub mod custom;
#[allow(clippy::module_inception)]
pub mod value;

pub use convert::ValueError;
pub use custom::{CustomData, CustomValue};
pub use value::{Map, Value};
