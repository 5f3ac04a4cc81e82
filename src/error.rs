//! Error types for the ddms crate
//!
//! Two disjoint error families exist. Domain validation errors
//! ([`InvalidDdmsError`]) are raised when parsed or constructed data breaks a
//! DDMS business rule; they always carry a locator identifying where in the
//! component tree the problem was found, and callers are expected to recover
//! from them. Argument errors are raised for invalid API usage (blank required
//! arguments, unknown vocabulary keys, inverted bounds) and are not expected
//! to be caught.

use std::fmt;
use thiserror::Error;

/// Result type alias using the ddms Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ddms operations
#[derive(Error, Debug)]
pub enum Error {
    /// DDMS business rule violation in parsed or constructed data
    #[error("invalid DDMS content: {0}")]
    InvalidDdms(#[from] InvalidDdmsError),

    /// A version identifier or XML namespace outside the supported set
    #[error("DDMS version is not supported: {0}")]
    UnsupportedVersion(String),

    /// Invalid API usage (programmer error, not bad data)
    #[error("illegal argument: {0}")]
    Argument(String),

    /// Unreadable configuration or vocabulary source
    #[error("configuration error: {0}")]
    Config(String),

    /// XML reader-level failure
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A DDMS validation error with a breadcrumb locator
///
/// The locator is a qualified-name path from the document root down to the
/// element where the condition was detected, e.g.
/// `/ddms:resource/ddms:subjectCoverage/ddms:Subject`. Errors are created with
/// a locator at the throw site when the site knows its position; otherwise the
/// first enclosing component constructor fills it in via [`locate_in`].
///
/// [`locate_in`]: InvalidDdmsError::locate_in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDdmsError {
    /// Error message
    pub message: String,
    /// Qualified-name path to the offending element, if known
    pub locator: Option<String>,
}

impl InvalidDdmsError {
    /// Create a new validation error with no locator yet
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locator: None,
        }
    }

    /// Set the locator at the throw site
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    /// Fill in the locator if none was recorded deeper in the tree
    ///
    /// The earliest (innermost) locator wins, so a parent component never
    /// overwrites the position reported by a child.
    pub fn locate_in(mut self, qualified_name: &str) -> Self {
        if self.locator.is_none() {
            self.locator = Some(qualified_name.to_string());
        }
        self
    }
}

impl fmt::Display for InvalidDdmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref locator) = self.locator {
            write!(f, " (locator: {})", locator)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidDdmsError {}

impl Error {
    /// Fill in the locator on a domain error, leaving other errors untouched
    pub fn locate_in(self, qualified_name: &str) -> Self {
        match self {
            Error::InvalidDdms(e) => Error::InvalidDdms(e.locate_in(qualified_name)),
            other => other,
        }
    }

    /// Accessor for the locator, when this is a domain validation error
    pub fn locator(&self) -> Option<&str> {
        match self {
            Error::InvalidDdms(e) => e.locator.as_deref(),
            _ => None,
        }
    }
}
