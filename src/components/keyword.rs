//! The ddms:keyword element
//!
//! A single subject keyword inside a subject coverage block. Keywords only
//! grew security attributes in the 4.x schema generation, so the group is
//! rejected under earlier versions.

use crate::components::{
    build_output, ddms_prefix, ComponentBuilder, DdmsComponent, OutputFormat,
    SecurityAttributes, VALUE_NAME,
};
use crate::components::security_attributes::SecurityAttributesBuilder;
use crate::elements::Element;
use crate::error::{InvalidDdmsError, Result};
use crate::validation::{prefix_warnings, require_qname, require_value, ValidationMessage};
use crate::versions::{Context, DdmsVersion};
use std::hash::{Hash, Hasher};

const NAME: &str = "keyword";

/// An immutable ddms:keyword component
#[derive(Debug, Clone)]
pub struct Keyword {
    element: Element,
    version: DdmsVersion,
    value: String,
    security_attributes: SecurityAttributes,
    warnings: Vec<ValidationMessage>,
}

impl Keyword {
    /// Build and validate from an already-parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Keyword> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let security_attributes = SecurityAttributes::from_element(ctx, &element)
            .map_err(|e| e.locate_in(&element.qualified_name()))?;
        let value = element
            .attribute_value(VALUE_NAME, element.namespace())
            .to_string();
        Keyword::build(version, element, value, security_attributes)
    }

    /// Build and validate from raw data
    pub fn new(
        ctx: &Context,
        value: &str,
        security_attributes: SecurityAttributes,
    ) -> Result<Keyword> {
        let version = ctx.current_version();
        let namespace = version.namespace();
        let mut element = Element::new(ddms_prefix(), NAME, namespace);
        element.set_attribute(ddms_prefix(), VALUE_NAME, namespace, value);
        security_attributes.add_to(&mut element);
        Keyword::build(version, element, value.to_string(), security_attributes)
    }

    fn build(
        version: DdmsVersion,
        element: Element,
        value: String,
        security_attributes: SecurityAttributes,
    ) -> Result<Keyword> {
        let mut keyword = Keyword {
            element,
            version,
            value,
            security_attributes,
            warnings: Vec::new(),
        };
        keyword
            .validate()
            .map_err(|e| e.locate_in(&keyword.qualified_name()))?;
        Ok(keyword)
    }

    fn validate(&mut self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())?;
        require_value("value attribute", &self.value)?;
        if !self.version.is_at_least("4.0.1")? && !self.security_attributes.is_empty() {
            return Err(InvalidDdmsError::new(
                "Security attributes cannot be applied to this component until DDMS 4.0 or later.",
            )
            .into());
        }

        self.warnings = prefix_warnings(
            &self.qualified_name(),
            "",
            self.security_attributes.warnings(),
        );
        Ok(())
    }

    /// Accessor for the keyword value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl DdmsComponent for Keyword {
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
        let name = format!("{}{}", prefix, NAME);
        let mut out = build_output(format, &name, &self.value);
        out.push_str(
            &self
                .security_attributes
                .output(format, &format!("{}.", name)),
        );
        out
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.value == other.value
            && self.security_attributes == other.security_attributes
    }
}

impl Eq for Keyword {}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.value.hash(state);
        self.security_attributes.hash(state);
    }
}

/// Mutable mirror of [`Keyword`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct KeywordBuilder {
    pub value: String,
    pub security_attributes: SecurityAttributesBuilder,
}

impl KeywordBuilder {
    /// Seed a builder from an existing component
    pub fn from_keyword(keyword: &Keyword) -> KeywordBuilder {
        KeywordBuilder {
            value: keyword.value.clone(),
            security_attributes: SecurityAttributesBuilder::from_attributes(
                &keyword.security_attributes,
            ),
        }
    }
}

impl ComponentBuilder for KeywordBuilder {
    type Component = Keyword;

    fn is_empty(&self) -> bool {
        crate::validation::is_empty_string(&self.value) && self.security_attributes.is_empty()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Keyword>> {
        if self.is_empty() {
            return Ok(None);
        }
        let attributes = match self.security_attributes.commit(ctx)? {
            Some(attributes) => attributes,
            None => SecurityAttributes::empty(ctx)?,
        };
        Keyword::new(ctx, &self.value, attributes).map(Some)
    }
}
