//! The ddms:identifier element
//!
//! Unlike ddms:language, both halves of the qualifier/value pair are
//! mandatory here and the qualifier must be a well-formed URI.

use crate::components::{
    build_output, build_prefix, qualifier_value_element, ComponentBuilder, DdmsComponent,
    OutputFormat, QUALIFIER_NAME, VALUE_NAME,
};
use crate::elements::Element;
use crate::error::Result;
use crate::validation::{
    is_empty_string, require_qname, require_valid_uri, require_value, ValidationMessage,
};
use crate::versions::{Context, DdmsVersion};
use std::hash::{Hash, Hasher};

const NAME: &str = "identifier";

/// An immutable ddms:identifier component
#[derive(Debug, Clone)]
pub struct Identifier {
    element: Element,
    version: DdmsVersion,
    qualifier: String,
    value: String,
}

impl Identifier {
    /// Build and validate from an already-parsed element
    pub fn from_element(_ctx: &Context, element: Element) -> Result<Identifier> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        Identifier::build(version, element)
    }

    /// Build and validate from raw attribute values
    pub fn new(ctx: &Context, qualifier: &str, value: &str) -> Result<Identifier> {
        let version = ctx.current_version();
        let element = qualifier_value_element(version, NAME, qualifier, value);
        Identifier::build(version, element)
    }

    fn build(version: DdmsVersion, element: Element) -> Result<Identifier> {
        let namespace = element.namespace().to_string();
        let qualifier = element.attribute_value(QUALIFIER_NAME, &namespace).to_string();
        let value = element.attribute_value(VALUE_NAME, &namespace).to_string();
        let identifier = Identifier {
            element,
            version,
            qualifier,
            value,
        };
        identifier
            .validate()
            .map_err(|e| e.locate_in(&identifier.qualified_name()))?;
        Ok(identifier)
    }

    fn validate(&self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())?;
        require_value("qualifier attribute", &self.qualifier)?;
        require_value("value attribute", &self.value)?;
        require_valid_uri(&self.qualifier)?;
        Ok(())
    }

    /// Accessor for the qualifier attribute
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Accessor for the value attribute
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl DdmsComponent for Identifier {
    fn element(&self) -> &Element {
        &self.element
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn validation_warnings(&self) -> &[ValidationMessage] {
        &[]
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
            &format!("{}{}", local, VALUE_NAME),
            &self.value,
        ));
        out
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.qualifier == other.qualifier
            && self.value == other.value
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.qualifier.hash(state);
        self.value.hash(state);
    }
}

/// Mutable mirror of [`Identifier`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct IdentifierBuilder {
    pub qualifier: String,
    pub value: String,
}

impl IdentifierBuilder {
    /// Seed a builder from an existing component
    pub fn from_identifier(identifier: &Identifier) -> IdentifierBuilder {
        IdentifierBuilder {
            qualifier: identifier.qualifier.clone(),
            value: identifier.value.clone(),
        }
    }
}

impl ComponentBuilder for IdentifierBuilder {
    type Component = Identifier;

    fn is_empty(&self) -> bool {
        is_empty_string(&self.qualifier) && is_empty_string(&self.value)
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Identifier>> {
        if self.is_empty() {
            return Ok(None);
        }
        Identifier::new(ctx, &self.qualifier, &self.value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const QUALIFIER: &str = "URI";
    const VALUE: &str = "urn:buri:ddmsence:testIdentifier";

    fn ctx() -> Context {
        let mut ctx = Context::new().unwrap();
        ctx.set_current_version("3.1").unwrap();
        ctx
    }

    #[test]
    fn test_new_valid() {
        let identifier = Identifier::new(&ctx(), QUALIFIER, VALUE).unwrap();
        assert_eq!(identifier.qualifier(), QUALIFIER);
        assert_eq!(identifier.value(), VALUE);
        assert!(identifier.validation_warnings().is_empty());
    }

    #[test]
    fn test_missing_qualifier() {
        let err = Identifier::new(&ctx(), "", VALUE).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid DDMS content: qualifier attribute is required. (locator: ddms:identifier)"
        );
    }

    #[test]
    fn test_missing_value() {
        let err = Identifier::new(&ctx(), QUALIFIER, "").unwrap_err();
        assert!(err.to_string().contains("value attribute is required."));
    }

    #[test]
    fn test_qualifier_must_be_a_uri() {
        let err = Identifier::new(&ctx(), ":::", VALUE).unwrap_err();
        assert!(err.to_string().contains("Invalid URI"));
    }

    #[test]
    fn test_both_construction_paths_are_equal() {
        let ctx = ctx();
        let built = Identifier::new(&ctx, QUALIFIER, VALUE).unwrap();
        let parsed =
            Identifier::from_element(&ctx, Element::parse(&built.to_xml()).unwrap()).unwrap();
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_builder_round_trip_and_empty_commit() {
        let ctx = ctx();
        let identifier = Identifier::new(&ctx, QUALIFIER, VALUE).unwrap();
        let rebuilt = IdentifierBuilder::from_identifier(&identifier)
            .commit(&ctx)
            .unwrap()
            .unwrap();
        assert_eq!(rebuilt, identifier);

        assert!(IdentifierBuilder::default().commit(&ctx).unwrap().is_none());
    }

    #[test]
    fn test_output() {
        let identifier = Identifier::new(&ctx(), QUALIFIER, VALUE).unwrap();
        assert_eq!(
            identifier.to_text(),
            format!(
                "identifier.qualifier: {}\nidentifier.value: {}\n",
                QUALIFIER, VALUE
            )
        );
    }
}
