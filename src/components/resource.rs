//! The DDMS resource root element
//!
//! The root of a metadata record. The local name changed from "Resource" to
//! "resource" in the 4.x generation, and the 3.0 release added mandatory
//! ISM bookkeeping attributes on the root (ism:resourceElement,
//! ism:createDate, ism:DESVersion) along with a mandatory classification.
//!
//! Validation covers the child cardinality table, the root attributes, and
//! a same-version check across every typed child; warnings from the whole
//! subtree are merged here with full locator paths.

use crate::components::security_attributes::SecurityAttributesBuilder;
use crate::components::{
    build_output, build_prefix, dates::DatesBuilder, ddms_prefix, identifier::IdentifierBuilder,
    ism_prefix, language::LanguageBuilder, rights::RightsBuilder, security::SecurityBuilder,
    subject_coverage::SubjectCoverageBuilder, title::TitleBuilder, ComponentBuilder,
    DdmsComponent, OutputFormat, SecurityAttributes,
};
use crate::components::{Dates, Identifier, Language, Rights, Security, SubjectCoverage, Title};
use crate::elements::Element;
use crate::error::{InvalidDdmsError, Result};
use crate::validation::{
    is_empty_string, prefix_warnings, require_bounded_child_count, require_qname,
    require_same_version, require_version_at_least, ValidationMessage,
};
use crate::versions::{Context, DdmsVersion};
use chrono::NaiveDate;
use std::hash::{Hash, Hasher};

const RESOURCE_ELEMENT_NAME: &str = "resourceElement";
const CREATE_DATE_NAME: &str = "createDate";
const DES_VERSION_NAME: &str = "DESVersion";

/// An immutable DDMS resource record
#[derive(Debug, Clone)]
pub struct Resource {
    element: Element,
    version: DdmsVersion,
    identifiers: Vec<Identifier>,
    titles: Vec<Title>,
    languages: Vec<Language>,
    dates: Option<Dates>,
    rights: Option<Rights>,
    subject_coverage: SubjectCoverage,
    security: Security,
    resource_element: Option<bool>,
    create_date: Option<NaiveDate>,
    des_version: Option<i32>,
    security_attributes: SecurityAttributes,
    warnings: Vec<ValidationMessage>,
}

/// The resource's local element name under a version
pub fn resource_name(version: DdmsVersion) -> Result<&'static str> {
    Ok(if version.is_at_least("4.0.1")? {
        "resource"
    } else {
        "Resource"
    })
}

impl Resource {
    /// Build and validate from an already-parsed element tree
    ///
    /// Typed children are constructed by dispatching on each child's local
    /// name; elements outside the modeled set are ignored, matching the
    /// schema's extensibility points.
    pub fn from_element(ctx: &Context, element: Element) -> Result<Resource> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let security_attributes = SecurityAttributes::from_element(ctx, &element)
            .map_err(|e| e.locate_in(&element.qualified_name()))?;

        let mut identifiers = Vec::new();
        let mut titles = Vec::new();
        let mut languages = Vec::new();
        let mut dates = None;
        let mut rights = None;
        let mut subject_coverage: Option<SubjectCoverage> = None;
        let mut security: Option<Security> = None;
        for child in &element.children {
            if child.namespace() != element.namespace() {
                continue;
            }
            match child.local_name() {
                "identifier" => identifiers.push(Identifier::from_element(ctx, child.clone())?),
                "title" => titles.push(Title::from_element(ctx, child.clone())?),
                "language" => languages.push(Language::from_element(ctx, child.clone())?),
                "dates" => {
                    if dates.is_none() {
                        dates = Some(Dates::from_element(ctx, child.clone())?);
                    }
                }
                "rights" => {
                    if rights.is_none() {
                        rights = Some(Rights::from_element(ctx, child.clone())?);
                    }
                }
                "subjectCoverage" => {
                    if subject_coverage.is_none() {
                        subject_coverage =
                            Some(SubjectCoverage::from_element(ctx, child.clone())?);
                    }
                }
                "security" => {
                    if security.is_none() {
                        security = Some(Security::from_element(ctx, child.clone())?);
                    }
                }
                _ => {}
            }
        }
        // Cardinality on the raw element is checked in validate; catching a
        // missing mandatory child here keeps the typed fields non-optional.
        let missing = |name: &str| {
            crate::error::Error::from(
                InvalidDdmsError::new(format!("Exactly 1 {} element must exist.", name))
                    .with_locator(element.qualified_name()),
            )
        };
        let subject_coverage = subject_coverage.ok_or_else(|| missing("subjectCoverage"))?;
        let security = security.ok_or_else(|| missing("security"))?;

        let ism = version.ism_namespace();
        let raw_resource_element = element.attribute_value(RESOURCE_ELEMENT_NAME, ism).to_string();
        let raw_create_date = element.attribute_value(CREATE_DATE_NAME, ism).to_string();
        let raw_des_version = element.attribute_value(DES_VERSION_NAME, ism).to_string();

        Resource::build(
            version,
            element,
            Parts {
                identifiers,
                titles,
                languages,
                dates,
                rights,
                subject_coverage,
                security,
                raw_resource_element,
                raw_create_date,
                raw_des_version,
                security_attributes,
            },
        )
    }

    /// Build and validate from typed children
    ///
    /// From DDMS 3.0 the root attributes are mandatory: `create_date` must
    /// be an xs:date lexical value and `des_version` must be set;
    /// ism:resourceElement is synthesized as "true". Under 2.0 all three
    /// must be absent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ctx: &Context,
        identifiers: Vec<Identifier>,
        titles: Vec<Title>,
        languages: Vec<Language>,
        dates: Option<Dates>,
        rights: Option<Rights>,
        subject_coverage: SubjectCoverage,
        security: Security,
        create_date: &str,
        des_version: Option<i32>,
        security_attributes: SecurityAttributes,
    ) -> Result<Resource> {
        let version = ctx.current_version();
        let namespace = version.namespace();
        let name = resource_name(version)?;
        let mut element = Element::new(ddms_prefix(), name, namespace);

        let ism = version.ism_namespace();
        let raw_resource_element = if version.is_at_least("3.0")? {
            element.set_attribute(ism_prefix(), RESOURCE_ELEMENT_NAME, ism, "true");
            "true".to_string()
        } else {
            String::new()
        };
        element.set_attribute(ism_prefix(), CREATE_DATE_NAME, ism, create_date);
        let raw_des_version = des_version.map(|v| v.to_string()).unwrap_or_default();
        element.set_attribute(ism_prefix(), DES_VERSION_NAME, ism, &raw_des_version);
        security_attributes.add_to(&mut element);

        for identifier in &identifiers {
            element.add_child(identifier.element().clone());
        }
        for title in &titles {
            element.add_child(title.element().clone());
        }
        for language in &languages {
            element.add_child(language.element().clone());
        }
        if let Some(dates) = &dates {
            element.add_child(dates.element().clone());
        }
        if let Some(rights) = &rights {
            element.add_child(rights.element().clone());
        }
        element.add_child(subject_coverage.element().clone());
        element.add_child(security.element().clone());

        Resource::build(
            version,
            element,
            Parts {
                identifiers,
                titles,
                languages,
                dates,
                rights,
                subject_coverage,
                security,
                raw_resource_element,
                raw_create_date: create_date.trim().to_string(),
                raw_des_version,
                security_attributes,
            },
        )
    }

    fn build(version: DdmsVersion, element: Element, parts: Parts) -> Result<Resource> {
        let mut resource = Resource {
            element,
            version,
            identifiers: parts.identifiers,
            titles: parts.titles,
            languages: parts.languages,
            dates: parts.dates,
            rights: parts.rights,
            subject_coverage: parts.subject_coverage,
            security: parts.security,
            resource_element: None,
            create_date: None,
            des_version: None,
            security_attributes: parts.security_attributes,
            warnings: Vec::new(),
        };
        resource
            .validate(
                &parts.raw_resource_element,
                &parts.raw_create_date,
                &parts.raw_des_version,
            )
            .map_err(|e| e.locate_in(&resource.qualified_name()))?;
        Ok(resource)
    }

    fn validate(
        &mut self,
        raw_resource_element: &str,
        raw_create_date: &str,
        raw_des_version: &str,
    ) -> Result<()> {
        require_qname(&self.element, resource_name(self.version)?, self.version.namespace())?;

        if self.version.is_at_least("3.0")? {
            self.validate_root_attributes(raw_resource_element, raw_create_date, raw_des_version)?;
        } else {
            if !is_empty_string(raw_resource_element) {
                require_version_at_least(self.version, "3.0", "resourceElement attribute")?;
            }
            if !is_empty_string(raw_create_date) {
                require_version_at_least(self.version, "3.0", "createDate attribute")?;
            }
            if !is_empty_string(raw_des_version) {
                require_version_at_least(self.version, "3.0", "DESVersion attribute")?;
            }
        }

        if self.identifiers.is_empty() {
            return Err(InvalidDdmsError::new("At least 1 identifier is required.").into());
        }
        if self.titles.is_empty() {
            return Err(InvalidDdmsError::new("At least 1 title is required.").into());
        }
        let namespace = self.version.namespace().to_string();
        require_bounded_child_count(&self.element, "dates", &namespace, 0, 1)?;
        require_bounded_child_count(&self.element, "rights", &namespace, 0, 1)?;
        require_bounded_child_count(&self.element, "subjectCoverage", &namespace, 1, 1)?;
        require_bounded_child_count(&self.element, "security", &namespace, 1, 1)?;

        for (child_version, qname) in self.child_versions() {
            require_same_version(self.version, child_version, &qname)?;
        }

        self.collect_warnings();
        Ok(())
    }

    fn validate_root_attributes(
        &mut self,
        raw_resource_element: &str,
        raw_create_date: &str,
        raw_des_version: &str,
    ) -> Result<()> {
        if is_empty_string(raw_resource_element) {
            return Err(InvalidDdmsError::new("resourceElement is required.").into());
        }
        if raw_resource_element.trim() != "true" {
            return Err(InvalidDdmsError::new(
                "The resourceElement attribute must have a fixed value of \"true\".",
            )
            .into());
        }
        self.resource_element = Some(true);

        if is_empty_string(raw_create_date) {
            return Err(InvalidDdmsError::new("createDate is required.").into());
        }
        self.create_date = Some(
            NaiveDate::parse_from_str(raw_create_date.trim(), "%Y-%m-%d").map_err(|_| {
                InvalidDdmsError::new("The createDate must be in the xs:date format (YYYY-MM-DD).")
            })?,
        );

        if is_empty_string(raw_des_version) {
            return Err(InvalidDdmsError::new("DESVersion is required.").into());
        }
        self.des_version = Some(raw_des_version.trim().parse::<i32>().map_err(|_| {
            InvalidDdmsError::new("The DESVersion attribute must be a valid Integer.")
        })?);

        self.security_attributes.require_classification()?;
        Ok(())
    }

    fn child_versions(&self) -> Vec<(DdmsVersion, String)> {
        let mut children: Vec<(DdmsVersion, String)> = Vec::new();
        for identifier in &self.identifiers {
            children.push((identifier.version(), identifier.qualified_name()));
        }
        for title in &self.titles {
            children.push((title.version(), title.qualified_name()));
        }
        for language in &self.languages {
            children.push((language.version(), language.qualified_name()));
        }
        if let Some(dates) = &self.dates {
            children.push((dates.version(), dates.qualified_name()));
        }
        if let Some(rights) = &self.rights {
            children.push((rights.version(), rights.qualified_name()));
        }
        children.push((
            self.subject_coverage.version(),
            self.subject_coverage.qualified_name(),
        ));
        children.push((self.security.version(), self.security.qualified_name()));
        children
    }

    fn collect_warnings(&mut self) {
        let qname = self.qualified_name();
        let mut merged = Vec::new();
        let mut merge = |warnings: &[ValidationMessage]| {
            merged.extend(prefix_warnings(&qname, "", warnings));
        };
        for identifier in &self.identifiers {
            merge(identifier.validation_warnings());
        }
        for title in &self.titles {
            merge(title.validation_warnings());
        }
        for language in &self.languages {
            merge(language.validation_warnings());
        }
        if let Some(dates) = &self.dates {
            merge(dates.validation_warnings());
        }
        if let Some(rights) = &self.rights {
            merge(rights.validation_warnings());
        }
        merge(self.subject_coverage.validation_warnings());
        merge(self.security.validation_warnings());
        merge(self.security_attributes.warnings());
        self.warnings = merged;
    }

    /// Accessor for the identifiers
    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }

    /// Accessor for the titles
    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    /// Accessor for the languages
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Accessor for the dates block
    pub fn dates(&self) -> Option<&Dates> {
        self.dates.as_ref()
    }

    /// Accessor for the rights block
    pub fn rights(&self) -> Option<&Rights> {
        self.rights.as_ref()
    }

    /// Accessor for the subject coverage block
    pub fn subject_coverage(&self) -> &SubjectCoverage {
        &self.subject_coverage
    }

    /// Accessor for the security block
    pub fn security(&self) -> &Security {
        &self.security
    }

    /// Accessor for ism:resourceElement; `None` on DDMS 2.0 records
    pub fn resource_element(&self) -> Option<bool> {
        self.resource_element
    }

    /// Accessor for ism:createDate; `None` on DDMS 2.0 records
    pub fn create_date(&self) -> Option<NaiveDate> {
        self.create_date
    }

    /// Accessor for ism:DESVersion; `None` on DDMS 2.0 records
    pub fn des_version(&self) -> Option<i32> {
        self.des_version
    }
}

/// Bundles the typed children plus raw root attributes between the two
/// construction paths and the shared validator
struct Parts {
    identifiers: Vec<Identifier>,
    titles: Vec<Title>,
    languages: Vec<Language>,
    dates: Option<Dates>,
    rights: Option<Rights>,
    subject_coverage: SubjectCoverage,
    security: Security,
    raw_resource_element: String,
    raw_create_date: String,
    raw_des_version: String,
    security_attributes: SecurityAttributes,
}

impl DdmsComponent for Resource {
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
        let local = build_prefix(prefix, self.element.local_name());
        let mut out = String::new();
        if let Some(resource_element) = self.resource_element {
            out.push_str(&build_output(
                format,
                &format!("{}{}", local, RESOURCE_ELEMENT_NAME),
                if resource_element { "true" } else { "false" },
            ));
        }
        if let Some(create_date) = self.create_date {
            out.push_str(&build_output(
                format,
                &format!("{}{}", local, CREATE_DATE_NAME),
                &create_date.format("%Y-%m-%d").to_string(),
            ));
        }
        if let Some(des_version) = self.des_version {
            out.push_str(&build_output(
                format,
                &format!("{}{}", local, DES_VERSION_NAME),
                &des_version.to_string(),
            ));
        }
        out.push_str(&self.security_attributes.output(format, &local));
        for identifier in &self.identifiers {
            out.push_str(&identifier.output(format, &local));
        }
        for title in &self.titles {
            out.push_str(&title.output(format, &local));
        }
        for language in &self.languages {
            out.push_str(&language.output(format, &local));
        }
        if let Some(dates) = &self.dates {
            out.push_str(&dates.output(format, &local));
        }
        if let Some(rights) = &self.rights {
            out.push_str(&rights.output(format, &local));
        }
        out.push_str(&self.subject_coverage.output(format, &local));
        out.push_str(&self.security.output(format, &local));
        out
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.identifiers == other.identifiers
            && self.titles == other.titles
            && self.languages == other.languages
            && self.dates == other.dates
            && self.rights == other.rights
            && self.subject_coverage == other.subject_coverage
            && self.security == other.security
            && self.resource_element == other.resource_element
            && self.create_date == other.create_date
            && self.des_version == other.des_version
            && self.security_attributes == other.security_attributes
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.identifiers.hash(state);
        self.titles.hash(state);
        self.languages.hash(state);
        self.dates.hash(state);
        self.rights.hash(state);
        self.subject_coverage.hash(state);
        self.security.hash(state);
        self.resource_element.hash(state);
        self.create_date.hash(state);
        self.des_version.hash(state);
        self.security_attributes.hash(state);
    }
}

/// Mutable mirror of [`Resource`]
///
/// Child lists grow only through the `push_*` / `ensure_*` methods; reads
/// never grow a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ResourceBuilder {
    pub identifiers: Vec<IdentifierBuilder>,
    pub titles: Vec<TitleBuilder>,
    pub languages: Vec<LanguageBuilder>,
    pub dates: DatesBuilder,
    pub rights: RightsBuilder,
    pub subject_coverage: SubjectCoverageBuilder,
    pub security: SecurityBuilder,
    pub create_date: String,
    pub des_version: Option<i32>,
    pub security_attributes: SecurityAttributesBuilder,
}

impl ResourceBuilder {
    /// Seed a builder from an existing record
    pub fn from_resource(resource: &Resource) -> ResourceBuilder {
        ResourceBuilder {
            identifiers: resource
                .identifiers
                .iter()
                .map(IdentifierBuilder::from_identifier)
                .collect(),
            titles: resource.titles.iter().map(TitleBuilder::from_title).collect(),
            languages: resource
                .languages
                .iter()
                .map(LanguageBuilder::from_language)
                .collect(),
            dates: resource
                .dates
                .as_ref()
                .map(DatesBuilder::from_dates)
                .unwrap_or_default(),
            rights: resource
                .rights
                .as_ref()
                .map(RightsBuilder::from_rights)
                .unwrap_or_default(),
            subject_coverage: SubjectCoverageBuilder::from_subject_coverage(
                &resource.subject_coverage,
            ),
            security: SecurityBuilder::from_security(&resource.security),
            create_date: resource
                .create_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            des_version: resource.des_version,
            security_attributes: SecurityAttributesBuilder::from_attributes(
                &resource.security_attributes,
            ),
        }
    }

    /// Append a fresh identifier builder and return it
    pub fn push_identifier(&mut self) -> &mut IdentifierBuilder {
        self.identifiers.push(IdentifierBuilder::default());
        self.identifiers.last_mut().expect("just pushed")
    }

    /// Append a fresh title builder and return it
    pub fn push_title(&mut self) -> &mut TitleBuilder {
        self.titles.push(TitleBuilder::default());
        self.titles.last_mut().expect("just pushed")
    }

    /// Append a fresh language builder and return it
    pub fn push_language(&mut self) -> &mut LanguageBuilder {
        self.languages.push(LanguageBuilder::default());
        self.languages.last_mut().expect("just pushed")
    }

    /// Grow the identifier list with empty builders up to `len`
    pub fn ensure_identifiers(&mut self, len: usize) {
        while self.identifiers.len() < len {
            self.identifiers.push(IdentifierBuilder::default());
        }
    }

    /// Grow the title list with empty builders up to `len`
    pub fn ensure_titles(&mut self, len: usize) {
        while self.titles.len() < len {
            self.titles.push(TitleBuilder::default());
        }
    }

    /// Grow the language list with empty builders up to `len`
    pub fn ensure_languages(&mut self, len: usize) {
        while self.languages.len() < len {
            self.languages.push(LanguageBuilder::default());
        }
    }
}

impl ComponentBuilder for ResourceBuilder {
    type Component = Resource;

    fn is_empty(&self) -> bool {
        self.identifiers.iter().all(|b| b.is_empty())
            && self.titles.iter().all(|b| b.is_empty())
            && self.languages.iter().all(|b| b.is_empty())
            && self.dates.is_empty()
            && self.rights.is_empty()
            && self.subject_coverage.is_empty()
            && self.security.is_empty()
            && is_empty_string(&self.create_date)
            && self.des_version.is_none()
            && self.security_attributes.is_empty()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Resource>> {
        if self.is_empty() {
            return Ok(None);
        }
        let mut identifiers = Vec::new();
        for builder in &self.identifiers {
            if let Some(identifier) = builder.commit(ctx)? {
                identifiers.push(identifier);
            }
        }
        let mut titles = Vec::new();
        for builder in &self.titles {
            if let Some(title) = builder.commit(ctx)? {
                titles.push(title);
            }
        }
        let mut languages = Vec::new();
        for builder in &self.languages {
            if let Some(language) = builder.commit(ctx)? {
                languages.push(language);
            }
        }
        let subject_coverage = self.subject_coverage.commit(ctx)?.ok_or_else(|| {
            crate::error::Error::from(InvalidDdmsError::new(
                "Exactly 1 subjectCoverage element must exist.",
            ))
        })?;
        let security = self.security.commit(ctx)?.ok_or_else(|| {
            crate::error::Error::from(InvalidDdmsError::new(
                "Exactly 1 security element must exist.",
            ))
        })?;
        let attributes = match self.security_attributes.commit(ctx)? {
            Some(attributes) => attributes,
            None => SecurityAttributes::empty(ctx)?,
        };
        Resource::new(
            ctx,
            identifiers,
            titles,
            languages,
            self.dates.commit(ctx)?,
            self.rights.commit(ctx)?,
            subject_coverage,
            security,
            &self.create_date,
            self.des_version,
            attributes,
        )
        .map(Some)
    }
}
