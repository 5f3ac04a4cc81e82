//! # ddms
//!
//! A typed, immutable object model for DoD Discovery Metadata Specification
//! (DDMS) records across the supported schema versions (2.0 through 5.0).
//!
//! Components are validated during construction: if a constructor returns a
//! value, that value satisfies every business rule of the version it was
//! built under. Conditions that are legal but suspicious are collected as
//! non-fatal warnings on the component instead. Each component can be built
//! either from a parsed XML element or from raw field values, and the two
//! paths produce equal results for equal logical content.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ddms::components::{DdmsComponent, Language};
//! use ddms::versions::Context;
//!
//! let mut ctx = Context::new()?;
//! ctx.set_current_version("4.1")?;
//!
//! let language = Language::new(&ctx, "http://purl.org/dc/elements/1.1/language", "en")?;
//! assert!(language.validation_warnings().is_empty());
//! println!("{}", language.to_xml());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod properties;

pub mod names;
pub mod versions;

pub mod elements;
pub mod validation;
pub mod vocabulary;

pub mod components;

// Re-exports for convenience
pub use error::{Error, InvalidDdmsError, Result};
pub use validation::{Severity, ValidationMessage};
pub use versions::{Context, DdmsVersion};
pub use vocabulary::Vocabulary;

/// Version of the ddms library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
