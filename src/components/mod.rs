//! Typed DDMS components
//!
//! Every component is an immutable value wrapping the element tree it was
//! built from. Construction always runs full validation, so a component in
//! hand is guaranteed internally consistent for the version it was built
//! under; non-fatal findings are exposed through `validation_warnings()`.
//!
//! Each component type has a companion builder, a mutable field-by-field
//! mirror whose `commit` either returns `None` (nothing was set) or runs the
//! normal construction path.

use crate::elements::Element;
use crate::error::Result;
use crate::properties;
use crate::validation::ValidationMessage;
use crate::versions::{Context, DdmsVersion};

pub mod category;
pub mod dates;
pub mod identifier;
pub mod keyword;
pub mod language;
pub mod resource;
pub mod rights;
pub mod security;
pub mod security_attributes;
pub mod subject_coverage;
pub mod title;

pub use category::{Category, CategoryBuilder};
pub use dates::{Dates, DatesBuilder};
pub use identifier::{Identifier, IdentifierBuilder};
pub use keyword::{Keyword, KeywordBuilder};
pub use language::{Language, LanguageBuilder};
pub use resource::{Resource, ResourceBuilder};
pub use rights::{Rights, RightsBuilder};
pub use security::{Security, SecurityBuilder};
pub use security_attributes::{SecurityAttributes, SecurityAttributesBuilder};
pub use subject_coverage::{SubjectCoverage, SubjectCoverageBuilder};
pub use title::{Title, TitleBuilder};

/// Local name of qualifier attributes shared by the qualifier/value family
pub(crate) const QUALIFIER_NAME: &str = "qualifier";

/// Local name of value attributes shared by the qualifier/value family
pub(crate) const VALUE_NAME: &str = "value";

/// Rendering style for the flattened name/value output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// HTML meta tags
    Html,
    /// Plain `name: value` lines
    Text,
}

/// Common read surface of every DDMS component
pub trait DdmsComponent {
    /// The underlying element representation
    fn element(&self) -> &Element;

    /// The version this component was constructed under
    fn version(&self) -> DdmsVersion;

    /// Non-fatal findings for this component and its whole subtree
    fn validation_warnings(&self) -> &[ValidationMessage];

    /// The security attribute group, for components that carry one
    fn security_attributes(&self) -> Option<&SecurityAttributes> {
        None
    }

    /// Flattened output with a caller-supplied dotted prefix
    fn output(&self, format: OutputFormat, prefix: &str) -> String;

    /// Local element name
    fn name(&self) -> &str {
        self.element().local_name()
    }

    /// Namespace prefix
    fn prefix(&self) -> &str {
        self.element().prefix()
    }

    /// Namespace URI
    fn namespace(&self) -> &str {
        self.element().namespace()
    }

    /// The qualified name, e.g. `ddms:language`
    fn qualified_name(&self) -> String {
        self.element().qualified_name()
    }

    /// Canonical XML serialization
    fn to_xml(&self) -> String {
        self.element().to_xml()
    }

    /// HTML meta-tag rendering of the whole component
    fn to_html(&self) -> String {
        self.output(OutputFormat::Html, "")
    }

    /// Plain-text rendering of the whole component
    fn to_text(&self) -> String {
        self.output(OutputFormat::Text, "")
    }
}

/// A mutable, lazily populated mirror of one component type
pub trait ComponentBuilder {
    /// The component type this builder commits to
    type Component;

    /// True iff no field and no child builder holds a value
    fn is_empty(&self) -> bool;

    /// Construct and validate the component, or `None` when empty
    fn commit(&self, ctx: &Context) -> Result<Option<Self::Component>>;
}

/// The configured DDMS element-name prefix
pub(crate) fn ddms_prefix() -> &'static str {
    properties::property("ddms.prefix")
}

/// The configured ISM attribute-name prefix
pub(crate) fn ism_prefix() -> &'static str {
    properties::property("ism.prefix")
}

/// Build one meta tag (HTML) or one line (Text) of flattened output
///
/// Empty content renders nothing, so optional fields disappear from the
/// output rather than printing blank values.
pub(crate) fn build_output(format: OutputFormat, name: &str, content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    match format {
        OutputFormat::Html => format!(
            "<meta name=\"{}\" content=\"{}\" />\n",
            escape(name),
            escape(content)
        ),
        OutputFormat::Text => format!("{}: {}\n", name, content),
    }
}

/// Extend a dotted output prefix with this component's name
pub(crate) fn build_prefix(prefix: &str, name: &str) -> String {
    format!("{}{}.", prefix, name)
}

/// Space-join a list of tokens the way xs:list values are serialized
pub(crate) fn xs_list(values: &[String]) -> String {
    values.join(" ")
}

fn escape(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}

/// Synthesize an element for the qualifier/value component family
///
/// Empty attribute values are skipped, so the two construction paths
/// converge on the same representation.
pub(crate) fn qualifier_value_element(
    version: DdmsVersion,
    name: &str,
    qualifier: &str,
    value: &str,
) -> Element {
    let namespace = version.namespace();
    let mut element = Element::new(ddms_prefix(), name, namespace);
    element.set_attribute(ddms_prefix(), QUALIFIER_NAME, namespace, qualifier);
    element.set_attribute(ddms_prefix(), VALUE_NAME, namespace, value);
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_output_html_escapes() {
        let out = build_output(OutputFormat::Html, "title", "Fish & Chips");
        assert_eq!(
            out,
            "<meta name=\"title\" content=\"Fish &amp; Chips\" />\n"
        );
    }

    #[test]
    fn test_build_output_text() {
        assert_eq!(
            build_output(OutputFormat::Text, "language.value", "en"),
            "language.value: en\n"
        );
    }

    #[test]
    fn test_build_output_skips_empty_content() {
        assert_eq!(build_output(OutputFormat::Html, "title", "  "), "");
    }

    #[test]
    fn test_build_prefix() {
        assert_eq!(build_prefix("", "language"), "language.");
        assert_eq!(build_prefix("resource.", "title"), "resource.title.");
    }

    #[test]
    fn test_xs_list() {
        let values = vec!["USA".to_string(), "AUS".to_string()];
        assert_eq!(xs_list(&values), "USA AUS");
    }
}
