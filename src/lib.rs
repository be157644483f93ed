//! Dont - deprecation interception
//!
//! Mark methods as deprecated and route every call through a named handler
//! before the original body runs. Handlers can refuse the call, log it, or
//! record it; the original return value is passed through unchanged.
//!
//! # Statically defined methods
//!
//! ```ignore
//! use dont::{deprecations, dont_use};
//!
//! struct Car;
//!
//! #[deprecations(handler = "exception")]
//! impl Car {
//!     fn drive_autopilot(&self) {}
//!
//!     #[dont_use]
//!     fn drive_manually(&self) {}
//! }
//!
//! let err = Car.drive_manually().unwrap_err();
//! assert_eq!(err.to_string(), "Don't use `Car#drive_manually`. It's deprecated.");
//! ```
//!
//! # Custom handlers
//!
//! ```ignore
//! dont::register_handler("log_deprecated_call", |_receiver, method| {
//!     tracing::warn!("Don't use '{}'.", method);
//!     Ok(())
//! });
//! dont::verify()?;
//! ```
//!
//! # Runtime-defined accessors
//!
//! See [`advice`] for records whose accessors only exist at runtime.

pub mod advice;
pub mod config;
pub mod deprecate;
pub mod error;
pub mod handler;
pub mod interception;
pub mod registry;
pub mod utils;

pub use advice::{Attributes, Deprecated};
pub use config::{ConfigError, Settings};
pub use deprecate::{intercept, registrations, verify, Deprecate, Registration};
pub use error::{DeprecationError, DontError, MarkError, MissingHandlerError, Result};
pub use handler::{Handler, Receiver};
pub use interception::{Deprecations, Dont, Respond};
pub use registry::{register_handler, resolve_handler, HandlerRegistry};

pub use dont_macros::{deprecations, dont_use};

#[doc(hidden)]
pub use inventory;
