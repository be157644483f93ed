//! Handler configuration and per-type deprecation tables.
//!
//! [`Dont`] is the value a type is configured with: a handler name that was
//! checked against a registry when the value was created. Applying it to a
//! type yields a [`Deprecations`] table listing which of the type's methods
//! are intercepted.
//!
//! ```ignore
//! let deprecations = Dont::new("method_logger")?
//!     .apply::<Item>()
//!     .dont_use("usable")?
//!     .dont_use("usable=")?;
//!
//! let usable = deprecations.call(&item, "usable", |item| item.read_attribute("usable"))?;
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::error::{MarkError, MissingHandlerError, Result};
use crate::handler::{short_type_name, Receiver};
use crate::registry::HandlerRegistry;

/// Types that can report which methods they respond to at runtime.
///
/// Used to reject marking methods that do not exist.
pub trait Respond {
    fn responds_to(method: &str) -> bool;
}

/// Deprecation configuration bound to a handler name.
#[derive(Clone)]
pub struct Dont {
    handler: String,
    registry: HandlerRegistry,
}

impl Dont {
    /// Configure with `handler` from the global registry.
    ///
    /// Fails immediately if nothing is registered under `handler`.
    pub fn new(handler: impl Into<String>) -> std::result::Result<Self, MissingHandlerError> {
        Self::with_registry(HandlerRegistry::global(), handler)
    }

    /// Configure with `handler` from an explicit registry.
    pub fn with_registry(
        registry: &HandlerRegistry,
        handler: impl Into<String>,
    ) -> std::result::Result<Self, MissingHandlerError> {
        let handler = handler.into();
        registry.resolve(&handler)?;
        trace!(handler = %handler, "Configured deprecation handler");
        Ok(Self {
            handler,
            registry: registry.clone(),
        })
    }

    /// Name of the configured handler.
    pub fn handler_name(&self) -> &str {
        &self.handler
    }

    /// Registry the handler is resolved from.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Run the handler for a call to `method` on `receiver`.
    ///
    /// The handler is looked up on every call, so re-registering a name takes
    /// effect for types that were configured earlier.
    pub fn notify(&self, receiver: &Receiver<'_>, method: &str) -> Result<()> {
        let handler = self.registry.resolve(&self.handler)?;
        trace!(
            handler = %self.handler,
            type_name = receiver.type_name(),
            method = %method,
            "Deprecated method called"
        );
        handler(receiver, method)
    }

    /// Start a deprecation table for `T`.
    pub fn apply<T: Any>(&self) -> Deprecations<T> {
        Deprecations::new(self.clone(), short_type_name(std::any::type_name::<T>()))
    }
}

impl fmt::Debug for Dont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dont")
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

/// Methods of `T` that are routed through a handler before running.
pub struct Deprecations<T> {
    dont: Dont,
    type_name: &'static str,
    marked: Vec<String>,
    _type: PhantomData<fn() -> T>,
}

impl<T> Deprecations<T> {
    fn new(dont: Dont, type_name: &'static str) -> Self {
        Self {
            dont,
            type_name,
            marked: Vec::new(),
            _type: PhantomData,
        }
    }

    /// Use `type_name` when reporting calls instead of the Rust type name.
    pub fn with_type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    /// Configuration the table was created from.
    pub fn dont(&self) -> &Dont {
        &self.dont
    }

    /// Display name of `T`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Marked method names, in marking order.
    pub fn marked(&self) -> &[String] {
        &self.marked
    }

    /// Returns true if calls to `method` are intercepted.
    pub fn is_marked(&self, method: &str) -> bool {
        self.marked.iter().any(|m| m == method)
    }

    /// Mark `method` as deprecated.
    pub fn mark(&mut self, method: &str) -> std::result::Result<(), MarkError>
    where
        T: Respond,
    {
        if !T::responds_to(method) {
            return Err(MarkError::UnknownMethod {
                type_name: self.type_name.to_string(),
                method: method.to_string(),
            });
        }
        if self.is_marked(method) {
            return Err(MarkError::AlreadyMarked {
                type_name: self.type_name.to_string(),
                method: method.to_string(),
            });
        }
        debug!(
            type_name = self.type_name,
            method = %method,
            handler = %self.dont.handler_name(),
            "Marked method as deprecated"
        );
        self.marked.push(method.to_string());
        Ok(())
    }

    /// Builder form of [`Deprecations::mark`].
    pub fn dont_use(mut self, method: &str) -> std::result::Result<Self, MarkError>
    where
        T: Respond,
    {
        self.mark(method)?;
        Ok(self)
    }
}

impl<T: Any> Deprecations<T> {
    /// Call `original` on `receiver`, running the handler first if `method` is marked.
    ///
    /// A handler error is returned as-is and `original` is not called.
    pub fn call<R>(&self, receiver: &T, method: &str, original: impl FnOnce(&T) -> R) -> Result<R> {
        if self.is_marked(method) {
            self.dont
                .notify(&Receiver::named(receiver, self.type_name), method)?;
        }
        Ok(original(receiver))
    }

    /// Mutable form of [`Deprecations::call`].
    pub fn call_mut<R>(
        &self,
        receiver: &mut T,
        method: &str,
        original: impl FnOnce(&mut T) -> R,
    ) -> Result<R> {
        if self.is_marked(method) {
            self.dont
                .notify(&Receiver::named(&*receiver, self.type_name), method)?;
        }
        Ok(original(receiver))
    }
}

impl<T> fmt::Debug for Deprecations<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deprecations")
            .field("type_name", &self.type_name)
            .field("handler", &self.dont.handler_name())
            .field("marked", &self.marked)
            .finish()
    }
}
