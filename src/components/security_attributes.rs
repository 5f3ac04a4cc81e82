//! The ISM security attribute group
//!
//! Every classified DDMS element carries some subset of these attributes in
//! the ISM namespace of its version. The group is validated as a unit:
//! controlled attributes are checked against the version's vocabulary, and
//! attributes introduced in later ISM releases are rejected under earlier
//! versions.

use crate::components::{build_output, ism_prefix, xs_list, ComponentBuilder, OutputFormat};
use crate::elements::Element;
use crate::error::{InvalidDdmsError, Result};
use crate::validation::{is_empty_string, require_value, ValidationMessage};
use crate::versions::{Context, DdmsVersion};
use crate::vocabulary::{self, Vocabulary};
use chrono::NaiveDate;

const CLASSIFICATION_NAME: &str = "classification";
const OWNER_PRODUCER_NAME: &str = "ownerProducer";
const SCI_CONTROLS_NAME: &str = "SCIcontrols";
const SAR_IDENTIFIER_NAME: &str = "SARIdentifier";
const DISSEMINATION_CONTROLS_NAME: &str = "disseminationControls";
const FGI_SOURCE_OPEN_NAME: &str = "FGIsourceOpen";
const FGI_SOURCE_PROTECTED_NAME: &str = "FGIsourceProtected";
const RELEASABLE_TO_NAME: &str = "releasableTo";
const NON_IC_MARKINGS_NAME: &str = "nonICmarkings";
const DECLASS_DATE_NAME: &str = "declassDate";
const DECLASS_EXCEPTION_NAME: &str = "declassException";
const TYPE_OF_EXEMPTED_SOURCE_NAME: &str = "typeOfExemptedSource";
const CLASSIFIED_BY_NAME: &str = "classifiedBy";
const DECLASS_EVENT_NAME: &str = "declassEvent";
const ATOMIC_ENERGY_MARKINGS_NAME: &str = "atomicEnergyMarkings";
const DISPLAY_ONLY_TO_NAME: &str = "displayOnlyTo";
const NON_US_CONTROLS_NAME: &str = "nonUSControls";
const COMPLIES_WITH_NAME: &str = "compliesWith";

/// An immutable, validated ISM security attribute group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityAttributes {
    version: DdmsVersion,
    classification: String,
    owner_producers: Vec<String>,
    sci_controls: Vec<String>,
    sar_identifiers: Vec<String>,
    dissemination_controls: Vec<String>,
    fgi_source_open: Vec<String>,
    fgi_source_protected: Vec<String>,
    releasable_to: Vec<String>,
    non_ic_markings: Vec<String>,
    declass_date: Option<NaiveDate>,
    declass_exception: String,
    type_of_exempted_source: String,
    classified_by: String,
    declass_event: String,
    atomic_energy_markings: Vec<String>,
    display_only_to: Vec<String>,
    non_us_controls: Vec<String>,
    complies_with: Vec<String>,
    warnings: Vec<ValidationMessage>,
}

impl SecurityAttributes {
    /// Read the attribute group off an already-parsed element
    ///
    /// The version is resolved from the element's DDMS namespace; the ISM
    /// attributes are then read from that version's ISM namespace.
    pub fn from_element(ctx: &Context, element: &Element) -> Result<SecurityAttributes> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let ism = version.ism_namespace();
        let list = |name: &str| xs_split(element.attribute_value(name, ism));
        let scalar = |name: &str| element.attribute_value(name, ism).to_string();

        let fields = SecurityAttributesBuilder {
            classification: scalar(CLASSIFICATION_NAME),
            owner_producers: list(OWNER_PRODUCER_NAME),
            sci_controls: list(SCI_CONTROLS_NAME),
            sar_identifiers: list(SAR_IDENTIFIER_NAME),
            dissemination_controls: list(DISSEMINATION_CONTROLS_NAME),
            fgi_source_open: list(FGI_SOURCE_OPEN_NAME),
            fgi_source_protected: list(FGI_SOURCE_PROTECTED_NAME),
            releasable_to: list(RELEASABLE_TO_NAME),
            non_ic_markings: list(NON_IC_MARKINGS_NAME),
            declass_date: scalar(DECLASS_DATE_NAME),
            declass_exception: scalar(DECLASS_EXCEPTION_NAME),
            type_of_exempted_source: scalar(TYPE_OF_EXEMPTED_SOURCE_NAME),
            classified_by: scalar(CLASSIFIED_BY_NAME),
            declass_event: scalar(DECLASS_EVENT_NAME),
            atomic_energy_markings: list(ATOMIC_ENERGY_MARKINGS_NAME),
            display_only_to: list(DISPLAY_ONLY_TO_NAME),
            non_us_controls: list(NON_US_CONTROLS_NAME),
            complies_with: list(COMPLIES_WITH_NAME),
        };
        SecurityAttributes::build(version, ctx.vocabulary(), &fields)
    }

    /// Create an attribute group from a classification and owner producers
    ///
    /// The common case; the builder covers the full attribute set.
    pub fn new(
        ctx: &Context,
        classification: &str,
        owner_producers: &[&str],
    ) -> Result<SecurityAttributes> {
        let fields = SecurityAttributesBuilder {
            classification: classification.to_string(),
            owner_producers: owner_producers.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        SecurityAttributes::build(ctx.current_version(), ctx.vocabulary(), &fields)
    }

    /// An attribute group with nothing set, for components built without one
    pub fn empty(ctx: &Context) -> Result<SecurityAttributes> {
        SecurityAttributes::build(
            ctx.current_version(),
            ctx.vocabulary(),
            &SecurityAttributesBuilder::default(),
        )
    }

    fn build(
        version: DdmsVersion,
        vocabulary: &Vocabulary,
        fields: &SecurityAttributesBuilder,
    ) -> Result<SecurityAttributes> {
        let declass_date = parse_declass_date(&fields.declass_date)?;
        let mut attributes = SecurityAttributes {
            version,
            classification: fields.classification.trim().to_string(),
            owner_producers: fields.owner_producers.clone(),
            sci_controls: fields.sci_controls.clone(),
            sar_identifiers: fields.sar_identifiers.clone(),
            dissemination_controls: fields.dissemination_controls.clone(),
            fgi_source_open: fields.fgi_source_open.clone(),
            fgi_source_protected: fields.fgi_source_protected.clone(),
            releasable_to: fields.releasable_to.clone(),
            non_ic_markings: fields.non_ic_markings.clone(),
            declass_date,
            declass_exception: fields.declass_exception.trim().to_string(),
            type_of_exempted_source: fields.type_of_exempted_source.trim().to_string(),
            classified_by: fields.classified_by.trim().to_string(),
            declass_event: fields.declass_event.trim().to_string(),
            atomic_energy_markings: fields.atomic_energy_markings.clone(),
            display_only_to: fields.display_only_to.clone(),
            non_us_controls: fields.non_us_controls.clone(),
            complies_with: fields.complies_with.clone(),
            warnings: Vec::new(),
        };
        attributes.validate(vocabulary)?;
        Ok(attributes)
    }

    fn validate(&mut self, vocabulary: &Vocabulary) -> Result<()> {
        if !self.classification.is_empty() {
            vocabulary.require_member(
                self.version,
                vocabulary::CVE_ALL_CLASSIFICATIONS,
                &self.classification,
            )?;
            if vocabulary::using_old_classification(&self.classification) {
                self.warnings.push(ValidationMessage::warning(
                    format!(
                        "The classification marking {} is an old NATO marking that was removed in DDMS 3.0.",
                        self.classification
                    ),
                    String::new(),
                ));
            }
        }
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_OWNER_PRODUCERS,
            &self.owner_producers,
        )?;
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_SCI_CONTROLS,
            &self.sci_controls,
        )?;
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_SAR_IDENTIFIER,
            &self.sar_identifiers,
        )?;
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_DISSEMINATION_CONTROLS,
            &self.dissemination_controls,
        )?;
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_FGI_SOURCE_OPEN,
            &self.fgi_source_open,
        )?;
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_FGI_SOURCE_PROTECTED,
            &self.fgi_source_protected,
        )?;
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_RELEASABLE_TO,
            &self.releasable_to,
        )?;
        require_members(
            vocabulary,
            self.version,
            vocabulary::CVE_NON_IC_MARKINGS,
            &self.non_ic_markings,
        )?;
        if !self.declass_exception.is_empty() {
            vocabulary.require_member(
                self.version,
                vocabulary::CVE_DECLASS_EXCEPTION,
                &self.declass_exception,
            )?;
        }
        if !self.type_of_exempted_source.is_empty() {
            if self.version.is_at_least("3.1")? {
                return Err(InvalidDdmsError::new(
                    "The typeOfExemptedSource attribute cannot be used in DDMS 3.1 or later.",
                )
                .into());
            }
            vocabulary.require_member(
                self.version,
                vocabulary::CVE_TYPE_EXEMPTED_SOURCE,
                &self.type_of_exempted_source,
            )?;
        }
        self.validate_31_attribute(
            vocabulary,
            ATOMIC_ENERGY_MARKINGS_NAME,
            vocabulary::CVE_ATOMIC_ENERGY_MARKINGS,
            &self.atomic_energy_markings,
        )?;
        self.validate_31_attribute(
            vocabulary,
            DISPLAY_ONLY_TO_NAME,
            vocabulary::CVE_DISPLAY_ONLY_TO,
            &self.display_only_to,
        )?;
        self.validate_31_attribute(
            vocabulary,
            NON_US_CONTROLS_NAME,
            vocabulary::CVE_NON_US_CONTROLS,
            &self.non_us_controls,
        )?;
        self.validate_31_attribute(
            vocabulary,
            COMPLIES_WITH_NAME,
            vocabulary::CVE_COMPLIES_WITH,
            &self.complies_with,
        )?;
        Ok(())
    }

    /// Attributes introduced in the ISM release paired with DDMS 3.1
    fn validate_31_attribute(
        &self,
        vocabulary: &Vocabulary,
        name: &str,
        key: &str,
        values: &[String],
    ) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        crate::validation::require_version_at_least(
            self.version,
            "3.1",
            &format!("{} attribute", name),
        )?;
        require_members(vocabulary, self.version, key, values)
    }

    /// Asserts that a classification and at least one owner producer are set
    ///
    /// Used by components whose schema makes the attribute group mandatory.
    pub fn require_classification(&self) -> Result<()> {
        require_value("classification", &self.classification)?;
        if self.owner_producers.is_empty() {
            return Err(InvalidDdmsError::new("At least 1 ownerProducer must be set.").into());
        }
        Ok(())
    }

    /// True when no attribute in the group holds a value
    pub fn is_empty(&self) -> bool {
        self.classification.is_empty()
            && self.owner_producers.is_empty()
            && self.sci_controls.is_empty()
            && self.sar_identifiers.is_empty()
            && self.dissemination_controls.is_empty()
            && self.fgi_source_open.is_empty()
            && self.fgi_source_protected.is_empty()
            && self.releasable_to.is_empty()
            && self.non_ic_markings.is_empty()
            && self.declass_date.is_none()
            && self.declass_exception.is_empty()
            && self.type_of_exempted_source.is_empty()
            && self.classified_by.is_empty()
            && self.declass_event.is_empty()
            && self.atomic_energy_markings.is_empty()
            && self.display_only_to.is_empty()
            && self.non_us_controls.is_empty()
            && self.complies_with.is_empty()
    }

    /// Push every set attribute onto an element, in the ISM namespace
    pub fn add_to(&self, element: &mut Element) {
        let prefix = ism_prefix();
        let ism = self.version.ism_namespace();
        let mut set = |name: &str, value: &str| {
            element.set_attribute(prefix, name, ism, value);
        };
        set(CLASSIFICATION_NAME, &self.classification);
        set(OWNER_PRODUCER_NAME, &xs_list(&self.owner_producers));
        set(SCI_CONTROLS_NAME, &xs_list(&self.sci_controls));
        set(SAR_IDENTIFIER_NAME, &xs_list(&self.sar_identifiers));
        set(
            DISSEMINATION_CONTROLS_NAME,
            &xs_list(&self.dissemination_controls),
        );
        set(FGI_SOURCE_OPEN_NAME, &xs_list(&self.fgi_source_open));
        set(
            FGI_SOURCE_PROTECTED_NAME,
            &xs_list(&self.fgi_source_protected),
        );
        set(RELEASABLE_TO_NAME, &xs_list(&self.releasable_to));
        set(NON_IC_MARKINGS_NAME, &xs_list(&self.non_ic_markings));
        if let Some(date) = self.declass_date {
            set(DECLASS_DATE_NAME, &date.format("%Y-%m-%d").to_string());
        }
        set(DECLASS_EXCEPTION_NAME, &self.declass_exception);
        set(TYPE_OF_EXEMPTED_SOURCE_NAME, &self.type_of_exempted_source);
        set(CLASSIFIED_BY_NAME, &self.classified_by);
        set(DECLASS_EVENT_NAME, &self.declass_event);
        set(
            ATOMIC_ENERGY_MARKINGS_NAME,
            &xs_list(&self.atomic_energy_markings),
        );
        set(DISPLAY_ONLY_TO_NAME, &xs_list(&self.display_only_to));
        set(NON_US_CONTROLS_NAME, &xs_list(&self.non_us_controls));
        set(COMPLIES_WITH_NAME, &xs_list(&self.complies_with));
    }

    /// Flattened name/value rendering of every set attribute
    pub fn output(&self, format: OutputFormat, prefix: &str) -> String {
        let mut out = String::new();
        let mut push = |name: &str, content: &str| {
            out.push_str(&build_output(
                format,
                &format!("{}{}", prefix, name),
                content,
            ));
        };
        push(CLASSIFICATION_NAME, &self.classification);
        push(OWNER_PRODUCER_NAME, &xs_list(&self.owner_producers));
        push(SCI_CONTROLS_NAME, &xs_list(&self.sci_controls));
        push(SAR_IDENTIFIER_NAME, &xs_list(&self.sar_identifiers));
        push(
            DISSEMINATION_CONTROLS_NAME,
            &xs_list(&self.dissemination_controls),
        );
        push(FGI_SOURCE_OPEN_NAME, &xs_list(&self.fgi_source_open));
        push(
            FGI_SOURCE_PROTECTED_NAME,
            &xs_list(&self.fgi_source_protected),
        );
        push(RELEASABLE_TO_NAME, &xs_list(&self.releasable_to));
        push(NON_IC_MARKINGS_NAME, &xs_list(&self.non_ic_markings));
        if let Some(date) = self.declass_date {
            push(DECLASS_DATE_NAME, &date.format("%Y-%m-%d").to_string());
        }
        push(DECLASS_EXCEPTION_NAME, &self.declass_exception);
        push(TYPE_OF_EXEMPTED_SOURCE_NAME, &self.type_of_exempted_source);
        push(CLASSIFIED_BY_NAME, &self.classified_by);
        push(DECLASS_EVENT_NAME, &self.declass_event);
        push(
            ATOMIC_ENERGY_MARKINGS_NAME,
            &xs_list(&self.atomic_energy_markings),
        );
        push(DISPLAY_ONLY_TO_NAME, &xs_list(&self.display_only_to));
        push(NON_US_CONTROLS_NAME, &xs_list(&self.non_us_controls));
        push(COMPLIES_WITH_NAME, &xs_list(&self.complies_with));
        out
    }

    /// Warnings raised while validating the group; locators are filled by the
    /// owning component
    pub fn warnings(&self) -> &[ValidationMessage] {
        &self.warnings
    }

    /// The version this group was validated under
    pub fn version(&self) -> DdmsVersion {
        self.version
    }

    /// Accessor for the classification marking
    pub fn classification(&self) -> &str {
        &self.classification
    }

    /// Accessor for the owner producer tokens
    pub fn owner_producers(&self) -> &[String] {
        &self.owner_producers
    }

    /// Accessor for the releasableTo tokens
    pub fn releasable_to(&self) -> &[String] {
        &self.releasable_to
    }

    /// Accessor for the declassification date
    pub fn declass_date(&self) -> Option<NaiveDate> {
        self.declass_date
    }
}

fn parse_declass_date(raw: &str) -> Result<Option<NaiveDate>> {
    if is_empty_string(raw) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            InvalidDdmsError::new("The declassDate must be in the xs:date format (YYYY-MM-DD).")
                .into()
        })
}

fn require_members(
    vocabulary: &Vocabulary,
    version: DdmsVersion,
    key: &str,
    values: &[String],
) -> Result<()> {
    for value in values {
        vocabulary.require_member(version, key, value)?;
    }
    Ok(())
}

fn xs_split(value: &str) -> Vec<String> {
    value.split_whitespace().map(|s| s.to_string()).collect()
}

/// Mutable mirror of [`SecurityAttributes`]
///
/// List fields are plain vectors; callers push tokens explicitly. The
/// `declass_date` field holds the raw lexical value and is parsed on commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct SecurityAttributesBuilder {
    pub classification: String,
    pub owner_producers: Vec<String>,
    pub sci_controls: Vec<String>,
    pub sar_identifiers: Vec<String>,
    pub dissemination_controls: Vec<String>,
    pub fgi_source_open: Vec<String>,
    pub fgi_source_protected: Vec<String>,
    pub releasable_to: Vec<String>,
    pub non_ic_markings: Vec<String>,
    pub declass_date: String,
    pub declass_exception: String,
    pub type_of_exempted_source: String,
    pub classified_by: String,
    pub declass_event: String,
    pub atomic_energy_markings: Vec<String>,
    pub display_only_to: Vec<String>,
    pub non_us_controls: Vec<String>,
    pub complies_with: Vec<String>,
}

impl SecurityAttributesBuilder {
    /// Seed a builder from an existing attribute group
    pub fn from_attributes(attributes: &SecurityAttributes) -> SecurityAttributesBuilder {
        SecurityAttributesBuilder {
            classification: attributes.classification.clone(),
            owner_producers: attributes.owner_producers.clone(),
            sci_controls: attributes.sci_controls.clone(),
            sar_identifiers: attributes.sar_identifiers.clone(),
            dissemination_controls: attributes.dissemination_controls.clone(),
            fgi_source_open: attributes.fgi_source_open.clone(),
            fgi_source_protected: attributes.fgi_source_protected.clone(),
            releasable_to: attributes.releasable_to.clone(),
            non_ic_markings: attributes.non_ic_markings.clone(),
            declass_date: attributes
                .declass_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            declass_exception: attributes.declass_exception.clone(),
            type_of_exempted_source: attributes.type_of_exempted_source.clone(),
            classified_by: attributes.classified_by.clone(),
            declass_event: attributes.declass_event.clone(),
            atomic_energy_markings: attributes.atomic_energy_markings.clone(),
            display_only_to: attributes.display_only_to.clone(),
            non_us_controls: attributes.non_us_controls.clone(),
            complies_with: attributes.complies_with.clone(),
        }
    }
}

impl ComponentBuilder for SecurityAttributesBuilder {
    type Component = SecurityAttributes;

    fn is_empty(&self) -> bool {
        is_empty_string(&self.classification)
            && self.owner_producers.is_empty()
            && self.sci_controls.is_empty()
            && self.sar_identifiers.is_empty()
            && self.dissemination_controls.is_empty()
            && self.fgi_source_open.is_empty()
            && self.fgi_source_protected.is_empty()
            && self.releasable_to.is_empty()
            && self.non_ic_markings.is_empty()
            && is_empty_string(&self.declass_date)
            && is_empty_string(&self.declass_exception)
            && is_empty_string(&self.type_of_exempted_source)
            && is_empty_string(&self.classified_by)
            && is_empty_string(&self.declass_event)
            && self.atomic_energy_markings.is_empty()
            && self.display_only_to.is_empty()
            && self.non_us_controls.is_empty()
            && self.complies_with.is_empty()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<SecurityAttributes>> {
        if self.is_empty() {
            return Ok(None);
        }
        SecurityAttributes::build(ctx.current_version(), ctx.vocabulary(), self).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn ctx(version: &str) -> Context {
        let mut ctx = Context::new().unwrap();
        ctx.set_current_version(version).unwrap();
        ctx
    }

    #[test]
    fn test_new_with_classification() {
        let attributes = SecurityAttributes::new(&ctx("3.1"), "U", &["USA"]).unwrap();
        assert_eq!(attributes.classification(), "U");
        assert_eq!(attributes.owner_producers(), ["USA".to_string()]);
        assert!(!attributes.is_empty());
        assert!(attributes.require_classification().is_ok());
    }

    #[test]
    fn test_empty_group_is_valid() {
        let attributes = SecurityAttributes::empty(&ctx("3.1")).unwrap();
        assert!(attributes.is_empty());
        let err = attributes.require_classification().unwrap_err();
        assert!(err.to_string().contains("classification is required."));
    }

    #[test]
    fn test_require_classification_needs_owner_producer() {
        let fields = SecurityAttributesBuilder {
            classification: "U".to_string(),
            ..Default::default()
        };
        let attributes = fields.commit(&ctx("3.1")).unwrap().unwrap();
        let err = attributes.require_classification().unwrap_err();
        assert!(err
            .to_string()
            .contains("At least 1 ownerProducer must be set."));
    }

    #[test]
    fn test_invalid_classification_token() {
        let err = SecurityAttributes::new(&ctx("3.1"), "SuperSecret", &["USA"]).unwrap_err();
        assert!(err.to_string().contains(
            "SuperSecret is not a valid enumeration token for this attribute, \
             as specified in CVEnumISMClassificationAll.xml."
        ));
    }

    #[test]
    fn test_old_nato_marking_rejected_after_30() {
        assert!(SecurityAttributes::new(&ctx("3.0"), "NS-S", &["USA"]).is_err());
        let attributes = SecurityAttributes::new(&ctx("2.0"), "NS-S", &["USA"]).unwrap();
        assert_eq!(attributes.warnings().len(), 1);
        assert!(attributes.warnings()[0].text.contains("old NATO marking"));
    }

    #[test]
    fn test_31_attributes_gated_by_version() {
        let fields = SecurityAttributesBuilder {
            classification: "U".to_string(),
            owner_producers: vec!["USA".to_string()],
            complies_with: vec!["ICD-710".to_string()],
            ..Default::default()
        };
        assert!(fields.commit(&ctx("3.1")).unwrap().is_some());
        let err = fields.commit(&ctx("3.0")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid DDMS content: The compliesWith attribute cannot be used until DDMS 3.1 or later."
        );
    }

    #[test]
    fn test_type_of_exempted_source_removed_in_31() {
        let fields = SecurityAttributesBuilder {
            type_of_exempted_source: "OADR".to_string(),
            ..Default::default()
        };
        assert!(fields.commit(&ctx("3.0")).unwrap().is_some());
        let err = fields.commit(&ctx("3.1")).unwrap_err();
        assert!(err
            .to_string()
            .contains("typeOfExemptedSource attribute cannot be used in DDMS 3.1 or later."));
    }

    #[test]
    fn test_declass_date_format() {
        let fields = SecurityAttributesBuilder {
            declass_date: "2030-01-01".to_string(),
            ..Default::default()
        };
        let attributes = fields.commit(&ctx("3.1")).unwrap().unwrap();
        assert_eq!(
            attributes.declass_date(),
            Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
        );

        let bad = SecurityAttributesBuilder {
            declass_date: "January 1st".to_string(),
            ..Default::default()
        };
        let err = bad.commit(&ctx("3.1")).unwrap_err();
        assert!(err
            .to_string()
            .contains("The declassDate must be in the xs:date format (YYYY-MM-DD)."));
    }

    #[test]
    fn test_sci_pattern_membership() {
        let fields = SecurityAttributesBuilder {
            sci_controls: vec!["SI-G-ABCD".to_string()],
            ..Default::default()
        };
        assert!(fields.commit(&ctx("3.1")).unwrap().is_some());
        let bad = SecurityAttributesBuilder {
            sci_controls: vec!["SI-G-abcd".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            bad.commit(&ctx("3.1")).unwrap_err(),
            Error::InvalidDdms(_)
        ));
    }

    #[test]
    fn test_from_element_reads_ism_namespace() {
        let ctx = ctx("3.1");
        let version = ctx.current_version();
        let mut element = Element::new("ddms", "security", version.namespace());
        element.set_attribute("ism", "classification", version.ism_namespace(), "TS");
        element.set_attribute(
            "ism",
            "ownerProducer",
            version.ism_namespace(),
            "USA AUS",
        );
        let attributes = SecurityAttributes::from_element(&ctx, &element).unwrap();
        assert_eq!(attributes.classification(), "TS");
        assert_eq!(
            attributes.owner_producers(),
            ["USA".to_string(), "AUS".to_string()]
        );
        assert_eq!(attributes.version(), version);
    }

    #[test]
    fn test_add_to_round_trips() {
        let ctx = ctx("4.1");
        let fields = SecurityAttributesBuilder {
            classification: "S".to_string(),
            owner_producers: vec!["USA".to_string()],
            releasable_to: vec!["USA".to_string(), "GBR".to_string()],
            declass_date: "2040-12-31".to_string(),
            ..Default::default()
        };
        let attributes = fields.commit(&ctx).unwrap().unwrap();

        let version = ctx.current_version();
        let mut element = Element::new("ddms", "security", version.namespace());
        attributes.add_to(&mut element);
        let round_tripped = SecurityAttributes::from_element(&ctx, &element).unwrap();
        assert_eq!(round_tripped, attributes);
    }

    #[test]
    fn test_builder_from_attributes_round_trips() {
        let ctx = ctx("3.1");
        let attributes = SecurityAttributes::new(&ctx, "C", &["USA"]).unwrap();
        let rebuilt = SecurityAttributesBuilder::from_attributes(&attributes)
            .commit(&ctx)
            .unwrap()
            .unwrap();
        assert_eq!(rebuilt, attributes);
    }

    #[test]
    fn test_empty_builder_commits_to_none() {
        assert!(SecurityAttributesBuilder::default()
            .commit(&ctx("3.1"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_output() {
        let ctx = ctx("3.1");
        let attributes = SecurityAttributes::new(&ctx, "U", &["USA"]).unwrap();
        assert_eq!(
            attributes.output(OutputFormat::Text, "security."),
            "security.classification: U\nsecurity.ownerProducer: USA\n"
        );
        assert_eq!(
            attributes.output(OutputFormat::Html, ""),
            "<meta name=\"classification\" content=\"U\" />\n\
             <meta name=\"ownerProducer\" content=\"USA\" />\n"
        );
    }
}
