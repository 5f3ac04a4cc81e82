//! The ddms:subjectCoverage element
//!
//! Groups the keywords and categories describing what the resource is
//! about. Up through DDMS 3.1 the children live under an intermediate
//! ddms:Subject wrapper with no typed counterpart of its own; from 4.0.1
//! the wrapper is gone and the children sit directly under
//! ddms:subjectCoverage. Locators and flattened output account for the
//! wrapper so that messages point at the real XML location.

use crate::components::security_attributes::SecurityAttributesBuilder;
use crate::components::{
    ddms_prefix, Category, CategoryBuilder, ComponentBuilder, DdmsComponent, Keyword,
    KeywordBuilder, OutputFormat, SecurityAttributes,
};
use crate::elements::Element;
use crate::error::{InvalidDdmsError, Result};
use crate::validation::{
    prefix_warnings, require_qname, require_same_version, ValidationMessage,
};
use crate::versions::{Context, DdmsVersion};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

const NAME: &str = "subjectCoverage";
const SUBJECT_NAME: &str = "Subject";

/// An immutable ddms:subjectCoverage component
#[derive(Debug, Clone)]
pub struct SubjectCoverage {
    element: Element,
    version: DdmsVersion,
    keywords: Vec<Keyword>,
    categories: Vec<Category>,
    security_attributes: SecurityAttributes,
    warnings: Vec<ValidationMessage>,
}

impl SubjectCoverage {
    /// Build and validate from an already-parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<SubjectCoverage> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let security_attributes = SecurityAttributes::from_element(ctx, &element)
            .map_err(|e| e.locate_in(&element.qualified_name()))?;

        let subject = if version.is_at_least("4.0.1")? {
            Some(&element)
        } else {
            element.first_child(SUBJECT_NAME, element.namespace())
        };
        let subject = subject.ok_or_else(|| {
            InvalidDdmsError::new("Subject element is required.")
                .with_locator(element.qualified_name())
        })?;

        let mut keywords = Vec::new();
        let mut categories = Vec::new();
        for child in &subject.children {
            match child.local_name() {
                "keyword" => keywords.push(Keyword::from_element(ctx, child.clone())?),
                "category" => categories.push(Category::from_element(ctx, child.clone())?),
                _ => {}
            }
        }
        SubjectCoverage::build(version, element, keywords, categories, security_attributes)
    }

    /// Build and validate from typed children
    pub fn new(
        ctx: &Context,
        keywords: Vec<Keyword>,
        categories: Vec<Category>,
        security_attributes: SecurityAttributes,
    ) -> Result<SubjectCoverage> {
        let version = ctx.current_version();
        let namespace = version.namespace();
        let mut element = Element::new(ddms_prefix(), NAME, namespace);

        let mut subject = if version.is_at_least("4.0.1")? {
            None
        } else {
            Some(Element::new(ddms_prefix(), SUBJECT_NAME, namespace))
        };
        {
            let target = subject.as_mut().unwrap_or(&mut element);
            for keyword in &keywords {
                target.add_child(keyword.element().clone());
            }
            for category in &categories {
                target.add_child(category.element().clone());
            }
        }
        if let Some(subject) = subject {
            element.add_child(subject);
        }
        security_attributes.add_to(&mut element);
        SubjectCoverage::build(version, element, keywords, categories, security_attributes)
    }

    fn build(
        version: DdmsVersion,
        element: Element,
        keywords: Vec<Keyword>,
        categories: Vec<Category>,
        security_attributes: SecurityAttributes,
    ) -> Result<SubjectCoverage> {
        let mut coverage = SubjectCoverage {
            element,
            version,
            keywords,
            categories,
            security_attributes,
            warnings: Vec::new(),
        };
        coverage
            .validate()
            .map_err(|e| e.locate_in(&coverage.qualified_name()))?;
        Ok(coverage)
    }

    fn validate(&mut self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())?;
        if self.keywords.is_empty() && self.categories.is_empty() {
            return Err(
                InvalidDdmsError::new("At least 1 keyword or category must exist.").into(),
            );
        }
        if !self.version.is_at_least("3.0")? && !self.security_attributes.is_empty() {
            return Err(InvalidDdmsError::new(
                "Security attributes cannot be applied to this component until DDMS 3.0 or later.",
            )
            .into());
        }
        for keyword in &self.keywords {
            require_same_version(self.version, keyword.version(), &keyword.qualified_name())?;
        }
        for category in &self.categories {
            require_same_version(self.version, category.version(), &category.qualified_name())?;
        }

        self.collect_warnings();
        Ok(())
    }

    fn collect_warnings(&mut self) {
        let qname = self.qualified_name();
        let suffix = self.locator_suffix();

        let unique_keywords: HashSet<&Keyword> = self.keywords.iter().collect();
        if unique_keywords.len() != self.keywords.len() {
            self.warnings.push(ValidationMessage::warning(
                "1 or more keywords have the same value.",
                format!("{}{}", qname, suffix),
            ));
        }
        let unique_categories: HashSet<&Category> = self.categories.iter().collect();
        if unique_categories.len() != self.categories.len() {
            self.warnings.push(ValidationMessage::warning(
                "1 or more categories have the same value.",
                format!("{}{}", qname, suffix),
            ));
        }

        for keyword in &self.keywords {
            self.warnings
                .extend(prefix_warnings(&qname, &suffix, keyword.validation_warnings()));
        }
        for category in &self.categories {
            self.warnings
                .extend(prefix_warnings(&qname, &suffix, category.validation_warnings()));
        }
        // Attribute warnings belong to the element itself, not the wrapper
        self.warnings
            .extend(prefix_warnings(&qname, "", self.security_attributes.warnings()));
    }

    /// Path fragment for the untyped ddms:Subject wrapper, empty from 4.0.1
    fn locator_suffix(&self) -> String {
        let wrapped = !self
            .version
            .is_at_least("4.0.1")
            .expect("4.0.1 is a supported version");
        if wrapped {
            format!("/{}:{}", self.element.prefix(), SUBJECT_NAME)
        } else {
            String::new()
        }
    }

    /// Accessor for the keywords
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Accessor for the categories
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

impl DdmsComponent for SubjectCoverage {
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
        let base = format!("{}{}.", prefix, NAME);
        let mut local = base.clone();
        if !self.locator_suffix().is_empty() {
            local.push_str(SUBJECT_NAME);
            local.push('.');
        }
        let mut out = String::new();
        for keyword in &self.keywords {
            out.push_str(&keyword.output(format, &local));
        }
        for category in &self.categories {
            out.push_str(&category.output(format, &local));
        }
        // The attribute group sits on subjectCoverage itself, not the wrapper
        out.push_str(&self.security_attributes.output(format, &base));
        out
    }
}

impl PartialEq for SubjectCoverage {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.keywords == other.keywords
            && self.categories == other.categories
            && self.security_attributes == other.security_attributes
    }
}

impl Eq for SubjectCoverage {}

impl Hash for SubjectCoverage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.keywords.hash(state);
        self.categories.hash(state);
        self.security_attributes.hash(state);
    }
}

/// Mutable mirror of [`SubjectCoverage`]
///
/// Child lists grow only through [`push_keyword`](Self::push_keyword) /
/// [`push_category`](Self::push_category) or the `ensure_*` methods; reads
/// never grow the lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct SubjectCoverageBuilder {
    pub keywords: Vec<KeywordBuilder>,
    pub categories: Vec<CategoryBuilder>,
    pub security_attributes: SecurityAttributesBuilder,
}

impl SubjectCoverageBuilder {
    /// Seed a builder from an existing component
    pub fn from_subject_coverage(coverage: &SubjectCoverage) -> SubjectCoverageBuilder {
        SubjectCoverageBuilder {
            keywords: coverage
                .keywords
                .iter()
                .map(KeywordBuilder::from_keyword)
                .collect(),
            categories: coverage
                .categories
                .iter()
                .map(CategoryBuilder::from_category)
                .collect(),
            security_attributes: SecurityAttributesBuilder::from_attributes(
                &coverage.security_attributes,
            ),
        }
    }

    /// Append a fresh keyword builder and return it
    pub fn push_keyword(&mut self) -> &mut KeywordBuilder {
        self.keywords.push(KeywordBuilder::default());
        self.keywords.last_mut().expect("just pushed")
    }

    /// Append a fresh category builder and return it
    pub fn push_category(&mut self) -> &mut CategoryBuilder {
        self.categories.push(CategoryBuilder::default());
        self.categories.last_mut().expect("just pushed")
    }

    /// Grow the keyword list with empty builders up to `len`
    pub fn ensure_keywords(&mut self, len: usize) {
        while self.keywords.len() < len {
            self.keywords.push(KeywordBuilder::default());
        }
    }

    /// Grow the category list with empty builders up to `len`
    pub fn ensure_categories(&mut self, len: usize) {
        while self.categories.len() < len {
            self.categories.push(CategoryBuilder::default());
        }
    }
}

impl ComponentBuilder for SubjectCoverageBuilder {
    type Component = SubjectCoverage;

    fn is_empty(&self) -> bool {
        self.keywords.iter().all(|k| k.is_empty())
            && self.categories.iter().all(|c| c.is_empty())
            && self.security_attributes.is_empty()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<SubjectCoverage>> {
        if self.is_empty() {
            return Ok(None);
        }
        let mut keywords = Vec::new();
        for builder in &self.keywords {
            if let Some(keyword) = builder.commit(ctx)? {
                keywords.push(keyword);
            }
        }
        let mut categories = Vec::new();
        for builder in &self.categories {
            if let Some(category) = builder.commit(ctx)? {
                categories.push(category);
            }
        }
        let attributes = match self.security_attributes.commit(ctx)? {
            Some(attributes) => attributes,
            None => SecurityAttributes::empty(ctx)?,
        };
        SubjectCoverage::new(ctx, keywords, categories, attributes).map(Some)
    }
}
