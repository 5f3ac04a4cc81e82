//! Validation messages and reusable assertion primitives
//!
//! Components are validated during construction, so a component either
//! exists and is valid, or was never returned to the caller. The assertions
//! here either fail hard with a domain error or pass silently; suspicious
//! but structurally legal content is reported through [`ValidationMessage`]
//! warnings accumulated on the component instead.

use crate::elements::Element;
use crate::error::{Error, InvalidDdmsError, Result};
use crate::versions::DdmsVersion;
use std::fmt;

/// Severity of a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Terminates construction via an error
    Error,
    /// Accumulated non-fatally on the constructed component
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// A single validation finding with a breadcrumb locator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationMessage {
    /// Message severity
    pub severity: Severity,
    /// Human-readable description
    pub text: String,
    /// Qualified-name path to where the condition was found
    pub locator: String,
}

impl ValidationMessage {
    /// Factory for a warning message
    pub fn warning(text: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
            locator: locator.into(),
        }
    }

    /// Factory for an error message
    pub fn error(text: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
            locator: locator.into(),
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (locator: {})", self.severity, self.text, self.locator)
    }
}

/// Checks if a string value is empty or contains only whitespace
pub fn is_empty_string(value: &str) -> bool {
    value.trim().is_empty()
}

/// Asserts that a value required by a DDMS rule is present and non-blank
pub fn require_value(description: &str, value: &str) -> Result<()> {
    if is_empty_string(value) {
        return Err(InvalidDdmsError::new(format!("{} is required.", description)).into());
    }
    Ok(())
}

/// Asserts that a required method argument is present and non-blank
///
/// This is the programmer-error sibling of [`require_value`]: a failure here
/// means the API was called incorrectly, not that parsed data was bad.
pub fn require_arg(description: &str, value: &str) -> Result<()> {
    if is_empty_string(value) {
        return Err(Error::Argument(format!("{} is required.", description)));
    }
    Ok(())
}

/// Asserts that an element has the expected local name and namespace
pub fn require_qname(element: &Element, expected_name: &str, expected_namespace: &str) -> Result<()> {
    if element.local_name() != expected_name || element.namespace() != expected_namespace {
        return Err(InvalidDdmsError::new(format!(
            "Unexpected namespace URI and local name encountered: {{{}}}{}",
            element.namespace(),
            element.local_name()
        ))
        .into());
    }
    Ok(())
}

/// Checks that a count is between two values, inclusive
///
/// An inverted range is a programmer error.
pub fn is_bounded(count: usize, low: usize, high: usize) -> Result<bool> {
    if low > high {
        return Err(Error::Argument(format!(
            "Invalid number range: {} to {}",
            low, high
        )));
    }
    Ok(count >= low && count <= high)
}

/// Asserts that the number of matching children of a parent element is bounded
///
/// The error text distinguishes exact counts, upper bounds, and ranges.
pub fn require_bounded_child_count(
    parent: &Element,
    child_name: &str,
    namespace: &str,
    low: usize,
    high: usize,
) -> Result<()> {
    let count = parent.child_count(child_name, namespace);
    if is_bounded(count, low, high)? {
        return Ok(());
    }
    let plural = if high == 1 { "" } else { "s" };
    let text = if low == high {
        format!("Exactly {} {} element{} must exist.", high, child_name, plural)
    } else if low == 0 {
        format!("No more than {} {} element{} can exist.", high, child_name, plural)
    } else {
        format!(
            "The number of {} elements must be between {} and {}.",
            child_name, low, high
        )
    };
    Err(InvalidDdmsError::new(text).into())
}

/// Asserts that the active version is at least some threshold version
///
/// Encodes "this element or attribute did not exist before DDMS X".
pub fn require_version_at_least(
    version: DdmsVersion,
    min_version: &str,
    description: &str,
) -> Result<()> {
    if !version.is_at_least(min_version)? {
        return Err(InvalidDdmsError::new(format!(
            "The {} cannot be used until DDMS {} or later.",
            description, min_version
        ))
        .into());
    }
    Ok(())
}

/// Asserts that a child component was built under the same version as its parent
pub fn require_same_version(
    parent_version: DdmsVersion,
    child_version: DdmsVersion,
    child_qualified_name: &str,
) -> Result<()> {
    if parent_version != child_version {
        return Err(InvalidDdmsError::new(format!(
            "A child component, {}, is using a different version of DDMS from its parent.",
            child_qualified_name
        ))
        .into());
    }
    Ok(())
}

/// Asserts that a string is a well-formed URI
///
/// Absolute URIs must carry a valid scheme and parse fully; relative
/// references are legal qualifier values and are resolved against a fixed
/// base. Whitespace is rejected outright because base-joining would
/// otherwise percent-encode it away and accept garbage.
pub fn require_valid_uri(uri: &str) -> Result<()> {
    require_arg("uri", uri)?;
    let invalid = || Error::from(InvalidDdmsError::new(format!("Invalid URI ({})", uri)));
    if uri.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let head = uri
        .split(|c| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or("");
    if let Some((scheme, _)) = head.split_once(':') {
        if !is_valid_scheme(scheme) || url::Url::parse(uri).is_err() {
            return Err(invalid());
        }
    } else {
        let base = url::Url::parse("http://base.example/").expect("static base URI parses");
        if base.join(uri).is_err() {
            return Err(invalid());
        }
    }
    Ok(())
}

/// RFC 3986 scheme: ALPHA followed by ALPHA / DIGIT / "+" / "-" / "."
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Re-prefix child warnings with the parent's qualified name
///
/// `locator_suffix` covers schema wrapper elements with no typed counterpart
/// (e.g. `/ddms:Subject`); it is skipped for attribute-group warnings, which
/// belong to the topmost element itself.
pub fn prefix_warnings(
    parent_qualified_name: &str,
    locator_suffix: &str,
    warnings: &[ValidationMessage],
) -> Vec<ValidationMessage> {
    warnings
        .iter()
        .map(|w| {
            let locator = if w.locator.is_empty() {
                format!("{}{}", parent_qualified_name, locator_suffix)
            } else {
                format!("{}{}/{}", parent_qualified_name, locator_suffix, w.locator)
            };
            ValidationMessage::warning(w.text.clone(), locator)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NS: &str = "http://metadata.dod.mil/mdr/ns/DDMS/3.1/";

    fn parent_with_children(counts: &[(&str, usize)]) -> Element {
        let mut parent = Element::new("ddms", "parent", NS);
        for (name, count) in counts {
            for _ in 0..*count {
                parent.add_child(Element::new("ddms", *name, NS));
            }
        }
        parent
    }

    #[test]
    fn test_require_value() {
        assert!(require_value("qualifier attribute", "x").is_ok());
        let err = require_value("qualifier attribute", "  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid DDMS content: qualifier attribute is required."
        );
        assert!(matches!(err, Error::InvalidDdms(_)));
    }

    #[test]
    fn test_require_arg_is_programmer_error() {
        let err = require_arg("version", "").unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[test]
    fn test_bounded_count_exact() {
        let one = parent_with_children(&[("title", 1)]);
        let zero = parent_with_children(&[]);
        let two = parent_with_children(&[("title", 2)]);
        assert!(require_bounded_child_count(&one, "title", NS, 1, 1).is_ok());
        let err = require_bounded_child_count(&zero, "title", NS, 1, 1).unwrap_err();
        assert!(err.to_string().contains("Exactly 1 title element must exist."));
        assert!(require_bounded_child_count(&two, "title", NS, 1, 1).is_err());
    }

    #[test]
    fn test_bounded_count_upper_bound() {
        let three = parent_with_children(&[("extent", 3)]);
        let err = require_bounded_child_count(&three, "extent", NS, 0, 2).unwrap_err();
        assert!(err
            .to_string()
            .contains("No more than 2 extent elements can exist."));
    }

    #[test]
    fn test_bounded_count_range() {
        let none = parent_with_children(&[]);
        let err = require_bounded_child_count(&none, "keyword", NS, 1, 4).unwrap_err();
        assert!(err
            .to_string()
            .contains("The number of keyword elements must be between 1 and 4."));
    }

    #[test]
    fn test_bounded_count_inverted_range() {
        let parent = parent_with_children(&[]);
        let err = require_bounded_child_count(&parent, "keyword", NS, 3, 1).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[test]
    fn test_require_version_at_least() {
        let v20 = DdmsVersion::for_version("2.0").unwrap();
        let v31 = DdmsVersion::for_version("3.1").unwrap();
        assert!(require_version_at_least(v31, "3.0", "ddms:security element").is_ok());
        let err =
            require_version_at_least(v20, "3.1", "nonUSControls attribute").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid DDMS content: The nonUSControls attribute cannot be used until DDMS 3.1 or later."
        );
    }

    #[test]
    fn test_require_same_version() {
        let v20 = DdmsVersion::for_version("2.0").unwrap();
        let v31 = DdmsVersion::for_version("3.1").unwrap();
        assert!(require_same_version(v31, v31, "ddms:title").is_ok());
        let err = require_same_version(v31, v20, "ddms:title").unwrap_err();
        assert!(err.to_string().contains("different version of DDMS"));
    }

    #[test]
    fn test_require_valid_uri() {
        assert!(require_valid_uri("http://purl.org/dc/elements/1.1/language").is_ok());
        assert!(require_valid_uri("urn:buri:ddmsence:testIdentifier").is_ok());
        assert!(require_valid_uri("URI").is_ok());
        assert!(require_valid_uri("this is not a uri").is_err());
        assert!(require_valid_uri(":::").is_err());
    }

    #[test]
    fn test_prefix_warnings() {
        let warnings = vec![ValidationMessage::warning("empty element", "ddms:keyword")];
        let merged = prefix_warnings("ddms:subjectCoverage", "/ddms:Subject", &warnings);
        assert_eq!(
            merged[0].locator,
            "ddms:subjectCoverage/ddms:Subject/ddms:keyword"
        );
        assert_eq!(merged[0].text, "empty element");
    }

    #[test]
    fn test_validation_message_display() {
        let message = ValidationMessage::warning("empty element", "ddms:dates");
        assert_eq!(
            message.to_string(),
            "Warning: empty element (locator: ddms:dates)"
        );
    }
}
