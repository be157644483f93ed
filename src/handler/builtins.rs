//! Handlers available in every registry.

use tracing::warn;

use super::Receiver;
use crate::error::{DeprecationError, Result};

/// Name of the handler that refuses the call with a [`DeprecationError`].
pub const EXCEPTION: &str = "exception";
/// Name of the handler that logs a warning and lets the call proceed.
pub const WARN: &str = "warn";

/// Refuse the call. The original method never runs.
pub fn exception(receiver: &Receiver<'_>, method: &str) -> Result<()> {
    Err(DeprecationError::new(receiver.type_name(), method).into())
}

/// Log the deprecated call at warn level.
pub fn warn(receiver: &Receiver<'_>, method: &str) -> Result<()> {
    warn!(
        type_name = receiver.type_name(),
        method = %method,
        "Don't use `{}#{}`. It's deprecated.",
        receiver.type_name(),
        method
    );
    Ok(())
}
