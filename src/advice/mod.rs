//! Advice for methods that only exist at runtime.
//!
//! Records backed by a column map have no statically defined accessors to
//! annotate, so interception is applied by wrapping the record instead:
//!
//! ```ignore
//! // Per-type table, built once
//! let deprecations = Arc::new(
//!     Dont::new("method_logger")?
//!         .apply::<Item>()
//!         .dont_use("usable")?
//!         .dont_use("usable?")?
//!         .dont_use("usable=")?,
//! );
//!
//! // Wrap each record; accessors go through the handler
//! let mut item = Deprecated::new(item, deprecations.clone());
//! item.write("usable", true.into())?;
//! ```
//!
//! # Available Advice
//!
//! - [`Deprecated`] - Runs the handler before marked attribute accessors

mod deprecated;

pub use deprecated::{Attributes, Deprecated};
