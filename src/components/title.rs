//! The ddms:title element
//!
//! Every resource names itself at least once. The title text is mandatory,
//! and so is a classified security attribute group.

use crate::components::{
    build_output, build_prefix, ddms_prefix, ComponentBuilder, DdmsComponent, OutputFormat,
    SecurityAttributes,
};
use crate::components::security_attributes::SecurityAttributesBuilder;
use crate::elements::Element;
use crate::error::Result;
use crate::validation::{prefix_warnings, require_qname, require_value, ValidationMessage};
use crate::versions::{Context, DdmsVersion};
use std::hash::{Hash, Hasher};

const NAME: &str = "title";

/// An immutable ddms:title component
#[derive(Debug, Clone)]
pub struct Title {
    element: Element,
    version: DdmsVersion,
    security_attributes: SecurityAttributes,
    warnings: Vec<ValidationMessage>,
}

impl Title {
    /// Build and validate from an already-parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Title> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let security_attributes = SecurityAttributes::from_element(ctx, &element)
            .map_err(|e| e.locate_in(&element.qualified_name()))?;
        Title::build(version, element, security_attributes)
    }

    /// Build and validate from raw data
    pub fn new(
        ctx: &Context,
        value: &str,
        security_attributes: SecurityAttributes,
    ) -> Result<Title> {
        let version = ctx.current_version();
        let mut element = Element::with_text(ddms_prefix(), NAME, version.namespace(), value);
        security_attributes.add_to(&mut element);
        Title::build(version, element, security_attributes)
    }

    fn build(
        version: DdmsVersion,
        element: Element,
        security_attributes: SecurityAttributes,
    ) -> Result<Title> {
        let mut title = Title {
            element,
            version,
            security_attributes,
            warnings: Vec::new(),
        };
        title
            .validate()
            .map_err(|e| e.locate_in(&title.qualified_name()))?;
        Ok(title)
    }

    fn validate(&mut self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())?;
        require_value("title value", &self.element.text)?;
        self.security_attributes.require_classification()?;

        self.warnings = prefix_warnings(
            &self.qualified_name(),
            "",
            self.security_attributes.warnings(),
        );
        Ok(())
    }

    /// Accessor for the title text
    pub fn value(&self) -> &str {
        &self.element.text
    }
}

impl DdmsComponent for Title {
    fn element(&self) -> &Element {
        &self.element
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn validation_warnings(&self) -> &[ValidationMessage] {
        &self.warnings
    }

    fn security_attributes(&self) -> Option<&SecurityAttributes> {
        Some(&self.security_attributes)
    }

    fn output(&self, format: OutputFormat, prefix: &str) -> String {
        let mut out = String::new();
        out.push_str(&build_output(
            format,
            &format!("{}{}", prefix, NAME),
            self.value(),
        ));
        out.push_str(
            &self
                .security_attributes
                .output(format, &build_prefix(prefix, NAME)),
        );
        out
    }
}

impl PartialEq for Title {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.element.text == other.element.text
            && self.security_attributes == other.security_attributes
    }
}

impl Eq for Title {}

impl Hash for Title {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.element.text.hash(state);
        self.security_attributes.hash(state);
    }
}

/// Mutable mirror of [`Title`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TitleBuilder {
    pub value: String,
    pub security_attributes: SecurityAttributesBuilder,
}

impl TitleBuilder {
    /// Seed a builder from an existing component
    pub fn from_title(title: &Title) -> TitleBuilder {
        TitleBuilder {
            value: title.value().to_string(),
            security_attributes: SecurityAttributesBuilder::from_attributes(
                &title.security_attributes,
            ),
        }
    }
}

impl ComponentBuilder for TitleBuilder {
    type Component = Title;

    fn is_empty(&self) -> bool {
        crate::validation::is_empty_string(&self.value) && self.security_attributes.is_empty()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Title>> {
        if self.is_empty() {
            return Ok(None);
        }
        let attributes = match self.security_attributes.commit(ctx)? {
            Some(attributes) => attributes,
            None => SecurityAttributes::empty(ctx)?,
        };
        Title::new(ctx, &self.value, attributes).map(Some)
    }
}
