//! Error types for deprecation handling.

/// Result type for intercepted calls and handlers.
pub type Result<T> = std::result::Result<T, DontError>;

/// A handler name was looked up but nothing is registered under it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Nothing registered with the key :{name}")]
pub struct MissingHandlerError {
    pub name: String,
}

impl MissingHandlerError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Raised by the built-in `exception` handler when a deprecated method is called.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Don't use `{type_name}#{method}`. It's deprecated.")]
pub struct DeprecationError {
    pub type_name: String,
    pub method: String,
}

impl DeprecationError {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }
}

/// Errors from marking methods on types whose methods are only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkError {
    /// The method was already marked as deprecated.
    #[error("`{type_name}#{method}` is already marked as deprecated")]
    AlreadyMarked { type_name: String, method: String },

    /// The type does not respond to the method.
    #[error("`{type_name}#{method}` is not defined")]
    UnknownMethod { type_name: String, method: String },
}

/// Errors surfaced to callers of intercepted methods.
#[derive(Debug, thiserror::Error)]
pub enum DontError {
    #[error(transparent)]
    MissingHandler(#[from] MissingHandlerError),

    #[error(transparent)]
    Deprecation(#[from] DeprecationError),

    #[error(transparent)]
    Mark(#[from] MarkError),

    /// Failure raised by a custom handler.
    #[error(transparent)]
    Handler(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl DontError {
    /// Wrap an arbitrary error raised from a custom handler.
    pub fn handler<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DontError::Handler(Box::new(err))
    }

    /// Returns true if a deprecated method was refused by the `exception` handler.
    pub fn is_deprecation(&self) -> bool {
        matches!(self, DontError::Deprecation(_))
    }

    /// Returns true if the configured handler is not registered.
    pub fn is_missing_handler(&self) -> bool {
        matches!(self, DontError::MissingHandler(_))
    }

    /// Returns the deprecation details if this is a deprecation error.
    pub fn as_deprecation(&self) -> Option<&DeprecationError> {
        match self {
            DontError::Deprecation(e) => Some(e),
            _ => None,
        }
    }
}
