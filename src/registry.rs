//! Named handler registry.
//!
//! Registration normally happens once at startup; afterwards the registry is
//! only read. The handle is cheap to clone and every clone sees the same map.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{MissingHandlerError, Result};
use crate::handler::{builtins, Handler, Receiver};

static GLOBAL: OnceLock<HandlerRegistry> = OnceLock::new();

/// Mapping from handler name to callback.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Arc<RwLock<HashMap<String, Handler>>>,
}

impl HandlerRegistry {
    /// Create a registry holding only the built-in handlers.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register(builtins::EXCEPTION, builtins::exception);
        registry.register(builtins::WARN, builtins::warn);
        registry
    }

    /// Create a registry without the built-in handlers.
    pub fn empty() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static HandlerRegistry {
        GLOBAL.get_or_init(HandlerRegistry::new)
    }

    /// Store `handler` under `name`, replacing any previous entry.
    pub fn register<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Receiver<'_>, &str) -> Result<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self
            .write()
            .insert(name.clone(), Arc::new(handler))
            .is_some();
        debug!(handler = %name, replaced, "Registered deprecation handler");
    }

    /// Look up the handler stored under `name`.
    pub fn resolve(&self, name: &str) -> std::result::Result<Handler, MissingHandlerError> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| MissingHandlerError::new(name))
    }

    /// Returns true if a handler is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered handler names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    // Registry operations are idempotent, so a poisoned lock is safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Handler>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Handler>> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

/// Register `handler` under `name` in the global registry.
pub fn register_handler<F>(name: impl Into<String>, handler: F)
where
    F: Fn(&Receiver<'_>, &str) -> Result<()> + Send + Sync + 'static,
{
    HandlerRegistry::global().register(name, handler);
}

/// Look up `name` in the global registry.
pub fn resolve_handler(name: &str) -> std::result::Result<Handler, MissingHandlerError> {
    HandlerRegistry::global().resolve(name)
}
