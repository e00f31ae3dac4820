//! `typed-schema`: a runtime schema engine.
//!
//! Schemas describe the shape of dynamic [`Value`]s and are built with
//! [`SchemaBuilder`]. A schema can validate a value, serialize it to a JSON-compatible
//! form, deserialize it back, or deep-clone it, either synchronously or as a cooperative
//! async task that yields to the scheduler during long traversals.
//!
//! ```
//! use typed_schema::{OperationOptions, SchemaBuilder, Value};
//!
//! let s = SchemaBuilder::new();
//! let schema = typed_schema::Schema::from(
//!     s.object()
//!         .field("name", s.string())
//!         .field("age", s.number().min(0.0).optional()),
//! );
//! let value = Value::from(serde_json::json!({"name": "Ada"}));
//! let report = schema.validate(&value, &OperationOptions::default()).unwrap();
//! assert!(report.error.is_none());
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod containers;
pub mod error;
pub mod markers;
pub mod mode;
pub mod operations;
pub mod path;
pub mod result;
pub mod schema;
pub mod state;
pub mod types;
pub mod value;

pub use config::EngineConfig;
pub use error::{OperationError, SchemaError};
pub use mode::{PreferredValidationMode, ValidationDepth, ValidationMode};
pub use operations::{
    CloningResult, DeserializationResult, OperationOptions, SerializationResult, StringifyResult,
    ValidationReport,
};
pub use path::{LazyPath, PathComponent};
pub use result::{ErrorKind, ErrorLevel};
pub use schema::{Schema, SchemaBuilder, SchemaType};
pub use types::{CustomSchemaOptions, SerDesFn, SerializationForm};
pub use value::{CustomValue, Map, Value};
