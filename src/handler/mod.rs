//! Deprecation handlers and the receiver view passed to them.
//!
//! A handler is any callback taking the receiver of the deprecated call and
//! the method name. Returning an error stops the call before the original
//! method runs; returning `Ok(())` lets it proceed.
//!
//! ```ignore
//! dont::register_handler("method_logger", |receiver, method| {
//!     tracing::info!("{}#{} called", receiver.type_name(), method);
//!     Ok(())
//! });
//! ```

pub mod builtins;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Shared handler callback.
pub type Handler = Arc<dyn Fn(&Receiver<'_>, &str) -> Result<()> + Send + Sync>;

/// Type-erased view of the object a deprecated method was called on.
#[derive(Clone, Copy)]
pub struct Receiver<'a> {
    object: &'a dyn Any,
    type_name: &'static str,
}

impl<'a> Receiver<'a> {
    /// Borrow `object` as a receiver, naming it after its Rust type.
    pub fn new<T: Any>(object: &'a T) -> Self {
        Self {
            object,
            type_name: short_type_name(std::any::type_name::<T>()),
        }
    }

    /// Borrow `object` as a receiver with an explicit display name.
    pub fn named<T: Any>(object: &'a T, type_name: &'static str) -> Self {
        Self { object, type_name }
    }

    /// Display name of the receiver's type, e.g. `Car`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Downcast to the concrete receiver type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.object.downcast_ref::<T>()
    }

    /// Returns true if the receiver is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.object.is::<T>()
    }
}

impl fmt::Debug for Receiver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Last path segment of a fully qualified type name, generics stripped.
///
/// `my_app::models::Car` becomes `Car`, `alloc::vec::Vec<u8>` becomes `Vec`.
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
