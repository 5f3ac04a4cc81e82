//! The ddms:language element
//!
//! A qualifier/value pair naming the primary language of the resource. The
//! qualifier is a URI-based vocabulary and is only required when a value is
//! set; a fully empty language element is legal but draws a warning rather
//! than an error, because the schema permits it and downstream consumers
//! rely on that permissiveness.

use crate::components::{
    build_output, build_prefix, qualifier_value_element, ComponentBuilder, DdmsComponent,
    OutputFormat, QUALIFIER_NAME, VALUE_NAME,
};
use crate::elements::Element;
use crate::error::Result;
use crate::validation::{
    is_empty_string, require_qname, require_value, ValidationMessage,
};
use crate::versions::{Context, DdmsVersion};
use std::hash::{Hash, Hasher};

const NAME: &str = "language";

/// An immutable ddms:language component
#[derive(Debug, Clone)]
pub struct Language {
    element: Element,
    version: DdmsVersion,
    qualifier: String,
    value: String,
    warnings: Vec<ValidationMessage>,
}

impl Language {
    /// Build and validate from an already-parsed element
    pub fn from_element(_ctx: &Context, element: Element) -> Result<Language> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        Language::build(version, element)
    }

    /// Build and validate from raw attribute values
    pub fn new(ctx: &Context, qualifier: &str, value: &str) -> Result<Language> {
        let version = ctx.current_version();
        let element = qualifier_value_element(version, NAME, qualifier, value);
        Language::build(version, element)
    }

    fn build(version: DdmsVersion, element: Element) -> Result<Language> {
        let namespace = element.namespace().to_string();
        let qualifier = element.attribute_value(QUALIFIER_NAME, &namespace).to_string();
        let value = element.attribute_value(VALUE_NAME, &namespace).to_string();
        let mut language = Language {
            element,
            version,
            qualifier,
            value,
            warnings: Vec::new(),
        };
        language
            .validate()
            .map_err(|e| e.locate_in(&language.qualified_name()))?;
        Ok(language)
    }

    fn validate(&mut self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())?;
        if !is_empty_string(&self.value) {
            require_value("qualifier attribute", &self.qualifier)?;
        }

        let locator = self.qualified_name();
        if !is_empty_string(&self.qualifier) && is_empty_string(&self.value) {
            self.warnings.push(ValidationMessage::warning(
                "A qualifier has been set without an accompanying value attribute.",
                locator.clone(),
            ));
        }
        if is_empty_string(&self.qualifier) && is_empty_string(&self.value) {
            self.warnings.push(ValidationMessage::warning(
                "Neither a qualifier nor a value was set on this language.",
                locator,
            ));
        }
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

impl DdmsComponent for Language {
    fn element(&self) -> &Element {
        &self.element
    }

    fn version(&self) -> DdmsVersion {
        self.version
    }

    fn validation_warnings(&self) -> &[ValidationMessage] {
        &self.warnings
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

// Equality is semantic: two languages with the same logical content are
// equal even when one was parsed and one was synthesized.
impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.qualifier == other.qualifier
            && self.value == other.value
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.qualifier.hash(state);
        self.value.hash(state);
    }
}

/// Mutable mirror of [`Language`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct LanguageBuilder {
    pub qualifier: String,
    pub value: String,
}

impl LanguageBuilder {
    /// Seed a builder from an existing component
    pub fn from_language(language: &Language) -> LanguageBuilder {
        LanguageBuilder {
            qualifier: language.qualifier.clone(),
            value: language.value.clone(),
        }
    }
}

impl ComponentBuilder for LanguageBuilder {
    type Component = Language;

    fn is_empty(&self) -> bool {
        is_empty_string(&self.qualifier) && is_empty_string(&self.value)
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Language>> {
        if self.is_empty() {
            return Ok(None);
        }
        Language::new(ctx, &self.qualifier, &self.value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DC_LANGUAGE: &str = "http://purl.org/dc/elements/1.1/language";

    fn ctx() -> Context {
        let mut ctx = Context::new().unwrap();
        ctx.set_current_version("3.1").unwrap();
        ctx
    }

    #[test]
    fn test_new_valid() {
        let language = Language::new(&ctx(), DC_LANGUAGE, "en").unwrap();
        assert_eq!(language.qualifier(), DC_LANGUAGE);
        assert_eq!(language.value(), "en");
        assert_eq!(language.qualified_name(), "ddms:language");
        assert!(language.validation_warnings().is_empty());
    }

    #[test]
    fn test_to_xml_has_both_attributes_in_order() {
        let language = Language::new(&ctx(), DC_LANGUAGE, "en").unwrap();
        assert_eq!(
            language.to_xml(),
            format!(
                "<ddms:language xmlns:ddms=\"{}\" ddms:qualifier=\"{}\" ddms:value=\"en\"/>",
                language.namespace(),
                DC_LANGUAGE
            )
        );
    }

    #[test]
    fn test_value_without_qualifier_is_an_error() {
        let err = Language::new(&ctx(), "", "en").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid DDMS content: qualifier attribute is required. (locator: ddms:language)"
        );
        assert_eq!(err.locator(), Some("ddms:language"));
    }

    #[test]
    fn test_qualifier_without_value_warns() {
        let language = Language::new(&ctx(), DC_LANGUAGE, "").unwrap();
        assert_eq!(language.validation_warnings().len(), 1);
        assert_eq!(
            language.validation_warnings()[0].text,
            "A qualifier has been set without an accompanying value attribute."
        );
        assert_eq!(language.validation_warnings()[0].locator, "ddms:language");
    }

    #[test]
    fn test_completely_empty_language_is_legal_but_warns() {
        let language = Language::new(&ctx(), "", "").unwrap();
        assert_eq!(language.validation_warnings().len(), 1);
        assert_eq!(
            language.validation_warnings()[0].text,
            "Neither a qualifier nor a value was set on this language."
        );
    }

    #[test]
    fn test_both_construction_paths_are_equal() {
        let ctx = ctx();
        let built = Language::new(&ctx, DC_LANGUAGE, "en").unwrap();
        let parsed =
            Language::from_element(&ctx, Element::parse(&built.to_xml()).unwrap()).unwrap();
        assert_eq!(parsed, built);

        use std::collections::hash_map::DefaultHasher;
        let hash = |l: &Language| {
            let mut hasher = DefaultHasher::new();
            l.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&parsed), hash(&built));
    }

    #[test]
    fn test_from_element_rejects_wrong_name() {
        let ctx = ctx();
        let element = Element::new("ddms", "tongue", ctx.current_version().namespace());
        assert!(Language::from_element(&ctx, element).is_err());
    }

    #[test]
    fn test_from_element_rejects_unknown_namespace() {
        let ctx = ctx();
        let element = Element::new("ddms", "language", "http://example.com/unknown");
        assert!(Language::from_element(&ctx, element).is_err());
    }

    #[test]
    fn test_output() {
        let language = Language::new(&ctx(), DC_LANGUAGE, "en").unwrap();
        assert_eq!(
            language.to_text(),
            format!("language.qualifier: {}\nlanguage.value: en\n", DC_LANGUAGE)
        );
        assert!(language
            .to_html()
            .contains("<meta name=\"language.value\" content=\"en\" />"));
    }

    #[test]
    fn test_builder_round_trip_and_empty_commit() {
        let ctx = ctx();
        let language = Language::new(&ctx, DC_LANGUAGE, "en").unwrap();
        let rebuilt = LanguageBuilder::from_language(&language)
            .commit(&ctx)
            .unwrap()
            .unwrap();
        assert_eq!(rebuilt, language);

        assert!(LanguageBuilder::default().commit(&ctx).unwrap().is_none());
    }

    #[test]
    fn test_versions_differ() {
        let mut ctx = ctx();
        let v31 = Language::new(&ctx, DC_LANGUAGE, "en").unwrap();
        ctx.set_current_version("4.1").unwrap();
        let v41 = Language::new(&ctx, DC_LANGUAGE, "en").unwrap();
        assert_ne!(v31, v41);
        assert_eq!(v41.version().version(), "4.1");
    }
}
