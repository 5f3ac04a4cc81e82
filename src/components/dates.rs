//! The ddms:dates element
//!
//! Calendar information about the resource. Every attribute is optional,
//! but any attribute that is present must use one of the four XML Schema
//! calendar datatypes. Values are kept in their lexical form; the crate
//! validates them but never normalizes them.

use crate::components::{
    build_output, build_prefix, ddms_prefix, ComponentBuilder, DdmsComponent, OutputFormat,
};
use crate::elements::Element;
use crate::error::{InvalidDdmsError, Result};
use crate::validation::{is_empty_string, require_qname, ValidationMessage};
use crate::versions::{Context, DdmsVersion};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

const NAME: &str = "dates";

const CREATED_NAME: &str = "created";
const POSTED_NAME: &str = "posted";
const VALID_TIL_NAME: &str = "validTil";
const INFO_CUT_OFF_NAME: &str = "infoCutOff";

static G_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());
static G_YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").unwrap());

/// An immutable ddms:dates component
#[derive(Debug, Clone)]
pub struct Dates {
    element: Element,
    version: DdmsVersion,
    created: String,
    posted: String,
    valid_til: String,
    info_cut_off: String,
    warnings: Vec<ValidationMessage>,
}

impl Dates {
    /// Build and validate from an already-parsed element
    pub fn from_element(_ctx: &Context, element: Element) -> Result<Dates> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let namespace = element.namespace().to_string();
        let attr = |name: &str| element.attribute_value(name, &namespace).to_string();
        let dates = Dates {
            created: attr(CREATED_NAME),
            posted: attr(POSTED_NAME),
            valid_til: attr(VALID_TIL_NAME),
            info_cut_off: attr(INFO_CUT_OFF_NAME),
            element,
            version,
            warnings: Vec::new(),
        };
        Dates::validate(dates)
    }

    /// Build and validate from raw lexical values
    pub fn new(
        ctx: &Context,
        created: &str,
        posted: &str,
        valid_til: &str,
        info_cut_off: &str,
    ) -> Result<Dates> {
        let version = ctx.current_version();
        let namespace = version.namespace();
        let mut element = Element::new(ddms_prefix(), NAME, namespace);
        element.set_attribute(ddms_prefix(), CREATED_NAME, namespace, created);
        element.set_attribute(ddms_prefix(), POSTED_NAME, namespace, posted);
        element.set_attribute(ddms_prefix(), VALID_TIL_NAME, namespace, valid_til);
        element.set_attribute(ddms_prefix(), INFO_CUT_OFF_NAME, namespace, info_cut_off);
        let dates = Dates {
            element,
            version,
            created: created.trim().to_string(),
            posted: posted.trim().to_string(),
            valid_til: valid_til.trim().to_string(),
            info_cut_off: info_cut_off.trim().to_string(),
            warnings: Vec::new(),
        };
        Dates::validate(dates)
    }

    fn validate(mut dates: Dates) -> Result<Dates> {
        let locate = |e: crate::error::Error, qname: &str| e.locate_in(qname);
        let qname = dates.qualified_name();

        require_qname(&dates.element, NAME, dates.version.namespace())
            .map_err(|e| locate(e, &qname))?;
        require_date_format(&dates.created).map_err(|e| locate(e, &qname))?;
        require_date_format(&dates.posted).map_err(|e| locate(e, &qname))?;
        require_date_format(&dates.valid_til).map_err(|e| locate(e, &qname))?;
        require_date_format(&dates.info_cut_off).map_err(|e| locate(e, &qname))?;

        if dates.created.is_empty()
            && dates.posted.is_empty()
            && dates.valid_til.is_empty()
            && dates.info_cut_off.is_empty()
        {
            dates.warnings.push(ValidationMessage::warning(
                "A completely empty ddms:dates element was found.",
                qname,
            ));
        }
        Ok(dates)
    }

    /// Accessor for the created date
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Accessor for the posted date
    pub fn posted(&self) -> &str {
        &self.posted
    }

    /// Accessor for the validTil date
    pub fn valid_til(&self) -> &str {
        &self.valid_til
    }

    /// Accessor for the infoCutOff date
    pub fn info_cut_off(&self) -> &str {
        &self.info_cut_off
    }
}

/// Asserts a lexical value is xs:dateTime, xs:date, xs:gYearMonth, or xs:gYear
fn require_date_format(value: &str) -> Result<()> {
    if is_empty_string(value) || is_valid_date(value) {
        return Ok(());
    }
    Err(InvalidDdmsError::new(
        "The date datatype must be one of xs:dateTime, xs:date, xs:gYearMonth, or xs:gYear.",
    )
    .into())
}

fn is_valid_date(value: &str) -> bool {
    G_YEAR.is_match(value)
        || G_YEAR_MONTH.is_match(value)
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

impl DdmsComponent for Dates {
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
        let mut push = |name: &str, value: &str| {
            out.push_str(&build_output(format, &format!("{}{}", local, name), value));
        };
        push(CREATED_NAME, &self.created);
        push(POSTED_NAME, &self.posted);
        push(VALID_TIL_NAME, &self.valid_til);
        push(INFO_CUT_OFF_NAME, &self.info_cut_off);
        out
    }
}

impl PartialEq for Dates {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.created == other.created
            && self.posted == other.posted
            && self.valid_til == other.valid_til
            && self.info_cut_off == other.info_cut_off
    }
}

impl Eq for Dates {}

impl std::hash::Hash for Dates {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.created.hash(state);
        self.posted.hash(state);
        self.valid_til.hash(state);
        self.info_cut_off.hash(state);
    }
}

/// Mutable mirror of [`Dates`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct DatesBuilder {
    pub created: String,
    pub posted: String,
    pub valid_til: String,
    pub info_cut_off: String,
}

impl DatesBuilder {
    /// Seed a builder from an existing component
    pub fn from_dates(dates: &Dates) -> DatesBuilder {
        DatesBuilder {
            created: dates.created.clone(),
            posted: dates.posted.clone(),
            valid_til: dates.valid_til.clone(),
            info_cut_off: dates.info_cut_off.clone(),
        }
    }
}

impl ComponentBuilder for DatesBuilder {
    type Component = Dates;

    fn is_empty(&self) -> bool {
        is_empty_string(&self.created)
            && is_empty_string(&self.posted)
            && is_empty_string(&self.valid_til)
            && is_empty_string(&self.info_cut_off)
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Dates>> {
        if self.is_empty() {
            return Ok(None);
        }
        Dates::new(
            ctx,
            &self.created,
            &self.posted,
            &self.valid_til,
            &self.info_cut_off,
        )
        .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> Context {
        let mut ctx = Context::new().unwrap();
        ctx.set_current_version("3.1").unwrap();
        ctx
    }

    #[test]
    fn test_new_valid() {
        let dates = Dates::new(&ctx(), "2003", "2003-02", "2003-02-15", "2003-02-15T12:00:00").unwrap();
        assert_eq!(dates.created(), "2003");
        assert_eq!(dates.posted(), "2003-02");
        assert_eq!(dates.valid_til(), "2003-02-15");
        assert_eq!(dates.info_cut_off(), "2003-02-15T12:00:00");
        assert!(dates.validation_warnings().is_empty());
    }

    #[test]
    fn test_timezone_suffix_accepted() {
        assert!(Dates::new(&ctx(), "2003-02-15T12:00:00Z", "", "", "").is_ok());
        assert!(Dates::new(&ctx(), "2003-02-15T12:00:00-05:00", "", "", "").is_ok());
    }

    #[test]
    fn test_bad_date_format() {
        let err = Dates::new(&ctx(), "15 February 2003", "", "", "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid DDMS content: The date datatype must be one of xs:dateTime, xs:date, \
             xs:gYearMonth, or xs:gYear. (locator: ddms:dates)"
        );
    }

    #[test]
    fn test_empty_dates_element_warns() {
        let dates = Dates::new(&ctx(), "", "", "", "").unwrap();
        assert_eq!(dates.validation_warnings().len(), 1);
        assert_eq!(
            dates.validation_warnings()[0].text,
            "A completely empty ddms:dates element was found."
        );
        assert_eq!(dates.validation_warnings()[0].locator, "ddms:dates");
    }

    #[test]
    fn test_both_construction_paths_are_equal() {
        let ctx = ctx();
        let built = Dates::new(&ctx, "2003", "", "2004-01-01", "").unwrap();
        let parsed = Dates::from_element(&ctx, Element::parse(&built.to_xml()).unwrap()).unwrap();
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_output_skips_unset_values() {
        let dates = Dates::new(&ctx(), "2003", "", "", "").unwrap();
        assert_eq!(dates.to_text(), "dates.created: 2003\n");
    }

    #[test]
    fn test_builder() {
        let ctx = ctx();
        let dates = Dates::new(&ctx, "2003", "2003-02", "", "").unwrap();
        let rebuilt = DatesBuilder::from_dates(&dates).commit(&ctx).unwrap().unwrap();
        assert_eq!(rebuilt, dates);
        assert!(DatesBuilder::default().commit(&ctx).unwrap().is_none());
    }
}
