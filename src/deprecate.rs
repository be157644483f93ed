//! Types annotated with `#[deprecations]`.
//!
//! The attribute implements [`Deprecate`] for the annotated type and submits a
//! [`Registration`] at link time. Since handlers are registered at runtime,
//! an unknown handler name can only be detected once the program runs; call
//! [`verify`] after registering custom handlers to fail on startup instead of
//! on the first deprecated call.

use std::any::Any;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{MissingHandlerError, Result};
use crate::handler::Receiver;
use crate::interception::Dont;

/// Implemented by `#[deprecations]` for the annotated type.
pub trait Deprecate: Any {
    /// Name used when reporting calls, e.g. `Car`.
    const NAME: &'static str;
    /// Handler declared on the impl block, `None` for the configured default.
    const HANDLER: Option<&'static str>;
    /// Methods routed through the handler.
    const DEPRECATED: &'static [&'static str];

    /// Effective handler name after applying [`Settings`].
    fn handler_name() -> String {
        Settings::global().handler_for(Self::NAME, Self::HANDLER)
    }

    /// Configuration for this type, resolved from the global registry.
    fn dont() -> std::result::Result<Dont, MissingHandlerError> {
        Dont::new(Self::handler_name())
    }

    /// Returns true if `method` is routed through the handler.
    fn is_deprecated(method: &str) -> bool {
        Self::DEPRECATED.contains(&method)
    }
}

/// Run the handler configured for `T` before a deprecated call.
///
/// Called by the methods `#[deprecations]` generates.
pub fn intercept<T: Deprecate>(receiver: &T, method: &str) -> Result<()> {
    T::dont()?.notify(&Receiver::named(receiver, T::NAME), method)
}

/// Link-time record of an annotated type.
#[derive(Debug)]
pub struct Registration {
    pub type_name: &'static str,
    pub handler: Option<&'static str>,
    pub methods: &'static [&'static str],
}

impl Registration {
    pub const fn new(
        type_name: &'static str,
        handler: Option<&'static str>,
        methods: &'static [&'static str],
    ) -> Self {
        Self {
            type_name,
            handler,
            methods,
        }
    }

    /// Effective handler name after applying `settings`.
    pub fn handler_name(&self, settings: &Settings) -> String {
        settings.handler_for(self.type_name, self.handler)
    }
}

inventory::collect!(Registration);

/// Every annotated type linked into the program.
pub fn registrations() -> impl Iterator<Item = &'static Registration> {
    inventory::iter::<Registration>.into_iter()
}

/// Check every annotated type's handler against the global registry.
pub fn verify() -> std::result::Result<(), MissingHandlerError> {
    let settings = Settings::global();
    let mut count = 0usize;
    for registration in registrations() {
        let handler = registration.handler_name(settings);
        debug!(
            type_name = registration.type_name,
            handler = %handler,
            methods = registration.methods.len(),
            "Verifying deprecation handler"
        );
        Dont::new(handler)?;
        count += 1;
    }
    info!(types = count, "Deprecation handlers verified");
    Ok(())
}
