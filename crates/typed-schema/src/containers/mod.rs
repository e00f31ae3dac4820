//! Container schemas and the traversal rules they share.
//!
//! Every container follows the same shape: type-check, take the fast path when nothing
//! below can fail or convert, record unknown-key information, then visit children while
//! keeping the most severe failure. The async variants group children into chunks and
//! yield between them when the work interval has elapsed.

mod array;
mod object;
mod record;
mod traversal;
mod tuple;

pub use array::ArraySchema;
pub use object::ObjectSchema;
pub use record::RecordSchema;
pub use tuple::TupleSchema;

pub(crate) use traversal::{settle, should_stop_on_first_error};
