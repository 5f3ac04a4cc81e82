//! The ddms:category element
//!
//! A taxonomy-backed subject: a human-readable label, plus an optional
//! qualifier URI naming the taxonomy and a code within it.

use crate::components::{
    build_output, build_prefix, ddms_prefix, ComponentBuilder, DdmsComponent, OutputFormat,
    SecurityAttributes, QUALIFIER_NAME,
};
use crate::components::security_attributes::SecurityAttributesBuilder;
use crate::elements::Element;
use crate::error::{InvalidDdmsError, Result};
use crate::validation::{
    is_empty_string, prefix_warnings, require_qname, require_valid_uri, require_value,
    ValidationMessage,
};
use crate::versions::{Context, DdmsVersion};
use std::hash::{Hash, Hasher};

const NAME: &str = "category";

const CODE_NAME: &str = "code";
const LABEL_NAME: &str = "label";

/// An immutable ddms:category component
#[derive(Debug, Clone)]
pub struct Category {
    element: Element,
    version: DdmsVersion,
    qualifier: String,
    code: String,
    label: String,
    security_attributes: SecurityAttributes,
    warnings: Vec<ValidationMessage>,
}

impl Category {
    /// Build and validate from an already-parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Category> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let security_attributes = SecurityAttributes::from_element(ctx, &element)
            .map_err(|e| e.locate_in(&element.qualified_name()))?;
        let namespace = element.namespace().to_string();
        let attr = |name: &str| element.attribute_value(name, &namespace).to_string();
        let (qualifier, code, label) = (attr(QUALIFIER_NAME), attr(CODE_NAME), attr(LABEL_NAME));
        Category::build(version, element, qualifier, code, label, security_attributes)
    }

    /// Build and validate from raw data
    pub fn new(
        ctx: &Context,
        qualifier: &str,
        code: &str,
        label: &str,
        security_attributes: SecurityAttributes,
    ) -> Result<Category> {
        let version = ctx.current_version();
        let namespace = version.namespace();
        let mut element = Element::new(ddms_prefix(), NAME, namespace);
        element.set_attribute(ddms_prefix(), QUALIFIER_NAME, namespace, qualifier);
        element.set_attribute(ddms_prefix(), CODE_NAME, namespace, code);
        element.set_attribute(ddms_prefix(), LABEL_NAME, namespace, label);
        security_attributes.add_to(&mut element);
        Category::build(
            version,
            element,
            qualifier.to_string(),
            code.to_string(),
            label.to_string(),
            security_attributes,
        )
    }

    fn build(
        version: DdmsVersion,
        element: Element,
        qualifier: String,
        code: String,
        label: String,
        security_attributes: SecurityAttributes,
    ) -> Result<Category> {
        let mut category = Category {
            element,
            version,
            qualifier,
            code,
            label,
            security_attributes,
            warnings: Vec::new(),
        };
        category
            .validate()
            .map_err(|e| e.locate_in(&category.qualified_name()))?;
        Ok(category)
    }

    fn validate(&mut self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())?;
        require_value("label attribute", &self.label)?;
        if !is_empty_string(&self.qualifier) {
            require_valid_uri(&self.qualifier)?;
        }
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

    /// Accessor for the qualifier attribute
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Accessor for the code attribute
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Accessor for the label attribute
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl DdmsComponent for Category {
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
        let local = build_prefix(prefix, NAME);
        let mut out = String::new();
        out.push_str(&build_output(
            format,
            &format!("{}{}", local, QUALIFIER_NAME),
            &self.qualifier,
        ));
        out.push_str(&build_output(
            format,
            &format!("{}{}", local, CODE_NAME),
            &self.code,
        ));
        out.push_str(&build_output(
            format,
            &format!("{}{}", local, LABEL_NAME),
            &self.label,
        ));
        out.push_str(&self.security_attributes.output(format, &local));
        out
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.qualifier == other.qualifier
            && self.code == other.code
            && self.label == other.label
            && self.security_attributes == other.security_attributes
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.qualifier.hash(state);
        self.code.hash(state);
        self.label.hash(state);
        self.security_attributes.hash(state);
    }
}

/// Mutable mirror of [`Category`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct CategoryBuilder {
    pub qualifier: String,
    pub code: String,
    pub label: String,
    pub security_attributes: SecurityAttributesBuilder,
}

impl CategoryBuilder {
    /// Seed a builder from an existing component
    pub fn from_category(category: &Category) -> CategoryBuilder {
        CategoryBuilder {
            qualifier: category.qualifier.clone(),
            code: category.code.clone(),
            label: category.label.clone(),
            security_attributes: SecurityAttributesBuilder::from_attributes(
                &category.security_attributes,
            ),
        }
    }
}

impl ComponentBuilder for CategoryBuilder {
    type Component = Category;

    fn is_empty(&self) -> bool {
        is_empty_string(&self.qualifier)
            && is_empty_string(&self.code)
            && is_empty_string(&self.label)
            && self.security_attributes.is_empty()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Category>> {
        if self.is_empty() {
            return Ok(None);
        }
        let attributes = match self.security_attributes.commit(ctx)? {
            Some(attributes) => attributes,
            None => SecurityAttributes::empty(ctx)?,
        };
        Category::new(ctx, &self.qualifier, &self.code, &self.label, attributes).map(Some)
    }
}
