//! Opaque payloads carried by `Value::Custom`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Behaviour required from a custom payload.
///
/// Implemented automatically for every `Clone + PartialEq + Debug` type that can be
/// shared across threads, so user code normally only calls [`CustomValue::new`].
pub trait CustomData: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_data(&self, other: &dyn CustomData) -> bool;
    fn duplicate(&self) -> Arc<dyn CustomData>;
    fn type_name(&self) -> &'static str;
}

impl<T> CustomData for T
where
    T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_data(&self, other: &dyn CustomData) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map(|other| self == other)
            .unwrap_or(false)
    }

    fn duplicate(&self) -> Arc<dyn CustomData> {
        Arc::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A shared, immutable custom payload.
///
/// `Clone` shares the payload; [`CustomValue::duplicate`] allocates an independent copy.
#[derive(Clone)]
pub struct CustomValue {
    data: Arc<dyn CustomData>,
}

impl CustomValue {
    pub fn new<T: CustomData>(data: T) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    pub fn duplicate(&self) -> Self {
        Self {
            data: self.data.duplicate(),
        }
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn type_name(&self) -> &'static str {
        self.data.type_name()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.data.eq_data(other.data.as_ref())
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Custom({:?})", self.data)
    }
}
