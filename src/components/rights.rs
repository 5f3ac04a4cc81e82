//! The ddms:rights element
//!
//! Three boolean flags about the handling of the resource. Absent flags
//! default to false, which makes an attribute-free rights element legal
//! and indistinguishable from one with three explicit "false" values.

use crate::components::{
    build_output, build_prefix, ddms_prefix, ComponentBuilder, DdmsComponent, OutputFormat,
};
use crate::elements::Element;
use crate::error::Result;
use crate::validation::{require_qname, ValidationMessage};
use crate::versions::{Context, DdmsVersion};

const NAME: &str = "rights";

const PRIVACY_ACT_NAME: &str = "privacyAct";
const INTELLECTUAL_PROPERTY_NAME: &str = "intellectualProperty";
const COPYRIGHT_NAME: &str = "copyright";

/// An immutable ddms:rights component
#[derive(Debug, Clone)]
pub struct Rights {
    element: Element,
    version: DdmsVersion,
    privacy_act: bool,
    intellectual_property: bool,
    copyright: bool,
}

impl Rights {
    /// Build and validate from an already-parsed element
    pub fn from_element(_ctx: &Context, element: Element) -> Result<Rights> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let namespace = element.namespace().to_string();
        let flag = |name: &str| parse_boolean(element.attribute_value(name, &namespace));
        let rights = Rights {
            privacy_act: flag(PRIVACY_ACT_NAME),
            intellectual_property: flag(INTELLECTUAL_PROPERTY_NAME),
            copyright: flag(COPYRIGHT_NAME),
            element,
            version,
        };
        rights
            .validate()
            .map_err(|e| e.locate_in(&rights.qualified_name()))?;
        Ok(rights)
    }

    /// Build and validate from raw data
    pub fn new(
        ctx: &Context,
        privacy_act: bool,
        intellectual_property: bool,
        copyright: bool,
    ) -> Result<Rights> {
        let version = ctx.current_version();
        let namespace = version.namespace();
        let mut element = Element::new(ddms_prefix(), NAME, namespace);
        // Only set flags that deviate from the schema default
        if privacy_act {
            element.set_attribute(ddms_prefix(), PRIVACY_ACT_NAME, namespace, "true");
        }
        if intellectual_property {
            element.set_attribute(ddms_prefix(), INTELLECTUAL_PROPERTY_NAME, namespace, "true");
        }
        if copyright {
            element.set_attribute(ddms_prefix(), COPYRIGHT_NAME, namespace, "true");
        }
        let rights = Rights {
            element,
            version,
            privacy_act,
            intellectual_property,
            copyright,
        };
        rights
            .validate()
            .map_err(|e| e.locate_in(&rights.qualified_name()))?;
        Ok(rights)
    }

    fn validate(&self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())
    }

    /// Accessor for the privacyAct flag
    pub fn privacy_act(&self) -> bool {
        self.privacy_act
    }

    /// Accessor for the intellectualProperty flag
    pub fn intellectual_property(&self) -> bool {
        self.intellectual_property
    }

    /// Accessor for the copyright flag
    pub fn copyright(&self) -> bool {
        self.copyright
    }
}

/// xs:boolean lexical space: "true"/"1" are true, everything else false
fn parse_boolean(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

impl DdmsComponent for Rights {
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
        let mut push = |name: &str, value: bool| {
            out.push_str(&build_output(
                format,
                &format!("{}{}", local, name),
                if value { "true" } else { "false" },
            ));
        };
        push(PRIVACY_ACT_NAME, self.privacy_act);
        push(INTELLECTUAL_PROPERTY_NAME, self.intellectual_property);
        push(COPYRIGHT_NAME, self.copyright);
        out
    }
}

impl PartialEq for Rights {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.privacy_act == other.privacy_act
            && self.intellectual_property == other.intellectual_property
            && self.copyright == other.copyright
    }
}

impl Eq for Rights {}

impl std::hash::Hash for Rights {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.privacy_act.hash(state);
        self.intellectual_property.hash(state);
        self.copyright.hash(state);
    }
}

/// Mutable mirror of [`Rights`]; `None` means "not set"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct RightsBuilder {
    pub privacy_act: Option<bool>,
    pub intellectual_property: Option<bool>,
    pub copyright: Option<bool>,
}

impl RightsBuilder {
    /// Seed a builder from an existing component
    pub fn from_rights(rights: &Rights) -> RightsBuilder {
        RightsBuilder {
            privacy_act: Some(rights.privacy_act),
            intellectual_property: Some(rights.intellectual_property),
            copyright: Some(rights.copyright),
        }
    }
}

impl ComponentBuilder for RightsBuilder {
    type Component = Rights;

    fn is_empty(&self) -> bool {
        self.privacy_act.is_none()
            && self.intellectual_property.is_none()
            && self.copyright.is_none()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Rights>> {
        if self.is_empty() {
            return Ok(None);
        }
        Rights::new(
            ctx,
            self.privacy_act.unwrap_or(false),
            self.intellectual_property.unwrap_or(false),
            self.copyright.unwrap_or(false),
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
    fn test_new_and_accessors() {
        let rights = Rights::new(&ctx(), true, false, true).unwrap();
        assert!(rights.privacy_act());
        assert!(!rights.intellectual_property());
        assert!(rights.copyright());
        assert!(rights.validation_warnings().is_empty());
    }

    #[test]
    fn test_absent_flags_default_to_false() {
        let ctx = ctx();
        let element = Element::new("ddms", "rights", ctx.current_version().namespace());
        let rights = Rights::from_element(&ctx, element).unwrap();
        assert!(!rights.privacy_act());
        assert!(!rights.intellectual_property());
        assert!(!rights.copyright());
        assert_eq!(rights, Rights::new(&ctx, false, false, false).unwrap());
    }

    #[test]
    fn test_both_construction_paths_are_equal() {
        let ctx = ctx();
        let built = Rights::new(&ctx, true, true, false).unwrap();
        let parsed = Rights::from_element(&ctx, Element::parse(&built.to_xml()).unwrap()).unwrap();
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_output_prints_all_flags() {
        let rights = Rights::new(&ctx(), true, false, false).unwrap();
        assert_eq!(
            rights.to_text(),
            "rights.privacyAct: true\nrights.intellectualProperty: false\nrights.copyright: false\n"
        );
    }

    #[test]
    fn test_builder() {
        let ctx = ctx();
        let rights = Rights::new(&ctx, false, true, false).unwrap();
        let rebuilt = RightsBuilder::from_rights(&rights).commit(&ctx).unwrap().unwrap();
        assert_eq!(rebuilt, rights);

        assert!(RightsBuilder::default().commit(&ctx).unwrap().is_none());
        // An explicit false is still "set"
        let explicit = RightsBuilder {
            copyright: Some(false),
            ..Default::default()
        };
        assert!(explicit.commit(&ctx).unwrap().is_some());
    }
}
