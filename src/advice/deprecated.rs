//! Deprecation advice for attribute accessors.
//!
//! A record with attribute `x` responds to three accessors: `x` (read),
//! `x?` (query) and `x=` (write). Each can be marked independently.

use std::any::Any;
use std::sync::Arc;

use crate::error::Result;
use crate::interception::{Deprecations, Respond};

/// Records whose accessors are derived from a set of attribute names.
pub trait Attributes: Any {
    type Value;

    /// Attribute names, e.g. table columns.
    fn attribute_names() -> &'static [&'static str];

    fn read_attribute(&self, name: &str) -> Self::Value;

    fn write_attribute(&mut self, name: &str, value: Self::Value);

    /// Value of the `x?` accessor.
    fn query_attribute(&self, name: &str) -> Self::Value {
        self.read_attribute(name)
    }
}

impl<T: Attributes> Respond for T {
    fn responds_to(method: &str) -> bool {
        let attribute = method
            .strip_suffix('?')
            .or_else(|| method.strip_suffix('='))
            .unwrap_or(method);
        T::attribute_names().contains(&attribute)
    }
}

/// Wrapper that routes attribute accessors through a deprecation table.
///
/// # Example
///
/// ```ignore
/// let item = Deprecated::new(item, deprecations.clone());
/// let usable = item.read("usable")?;
/// ```
pub struct Deprecated<R: Attributes> {
    inner: R,
    deprecations: Arc<Deprecations<R>>,
}

impl<R: Attributes> Deprecated<R> {
    /// Wrap `inner` with the type's deprecation table.
    pub fn new(inner: R, deprecations: Arc<Deprecations<R>>) -> Self {
        Self {
            inner,
            deprecations,
        }
    }

    /// Read accessor `name`.
    pub fn read(&self, name: &str) -> Result<R::Value> {
        self.deprecations
            .call(&self.inner, name, |record| record.read_attribute(name))
    }

    /// Query accessor `name?`.
    pub fn query(&self, name: &str) -> Result<R::Value> {
        let method = format!("{name}?");
        self.deprecations
            .call(&self.inner, &method, |record| record.query_attribute(name))
    }

    /// Write accessor `name=`.
    pub fn write(&mut self, name: &str, value: R::Value) -> Result<()> {
        let method = format!("{name}=");
        self.deprecations.call_mut(&mut self.inner, &method, |record| {
            record.write_attribute(name, value)
        })
    }

    /// Get a reference to the inner record.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Consume the wrapper and return the inner record.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Deprecation table shared by all wrapped records of this type.
    pub fn deprecations(&self) -> &Arc<Deprecations<R>> {
        &self.deprecations
    }
}

impl<R: Attributes + std::fmt::Debug> std::fmt::Debug for Deprecated<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deprecated")
            .field("inner", &self.inner)
            .field("marked", &self.deprecations.marked())
            .finish()
    }
}
