//! The section handler contract.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::document::Element;

/// Error returned by handler factories and [`SectionHandler::create`].
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Constructs a handler instance for one declaration.
pub type HandlerFactory = fn() -> Result<Box<dyn SectionHandler>, HandlerError>;

/// Turns one configuration section into an application settings object.
///
/// `section` is the first element in the document whose tag equals the
/// declared section name, or `None` when the document has no such element.
/// Whether a missing element is acceptable is up to the handler.
///
/// Handlers run while the registry is being activated and must not call back
/// into the registry that is activating them.
pub trait SectionHandler: Send + Sync {
	fn create(&self, section: Option<&Element>) -> Result<SectionValue, HandlerError>;
}

/// Opaque settings object produced by a handler.
///
/// Cloning is cheap; all clones share the same value.
#[derive(Clone)]
pub struct SectionValue {
	value: Arc<dyn Any + Send + Sync>,
	type_name: &'static str,
}

impl SectionValue {
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self { value: Arc::new(value), type_name: std::any::type_name::<T>() }
	}

	/// Wraps a value that is already shared.
	pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
		Self { value, type_name: std::any::type_name::<T>() }
	}

	pub fn is<T: Any>(&self) -> bool {
		self.value.is::<T>()
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.value.downcast_ref::<T>()
	}

	/// Returns a shared handle to the value if it is a `T`.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		Arc::clone(&self.value).downcast::<T>().ok()
	}

	/// Rust type name of the wrapped value, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Whether both values are the same allocation.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.value, &other.value)
	}
}

impl fmt::Debug for SectionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SectionValue").field(&self.type_name).finish()
	}
}
