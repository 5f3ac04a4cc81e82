//! The ddms:security element
//!
//! The overall security marking of the resource. From DDMS 3.0 the element
//! also carries ism:excludeFromRollup, fixed by the schema to "true"; the
//! attribute did not exist in 2.0 and is rejected there.

use crate::components::security_attributes::SecurityAttributesBuilder;
use crate::components::{
    build_prefix, ddms_prefix, ism_prefix, ComponentBuilder, DdmsComponent, OutputFormat,
    SecurityAttributes,
};
use crate::elements::Element;
use crate::error::{InvalidDdmsError, Result};
use crate::validation::{is_empty_string, prefix_warnings, require_qname, ValidationMessage};
use crate::versions::{Context, DdmsVersion};
use std::hash::{Hash, Hasher};

const NAME: &str = "security";

const EXCLUDE_FROM_ROLLUP_NAME: &str = "excludeFromRollup";
const FIXED_ROLLUP: &str = "true";

/// An immutable ddms:security component
#[derive(Debug, Clone)]
pub struct Security {
    element: Element,
    version: DdmsVersion,
    exclude_from_rollup: Option<bool>,
    security_attributes: SecurityAttributes,
    warnings: Vec<ValidationMessage>,
}

impl Security {
    /// Build and validate from an already-parsed element
    pub fn from_element(ctx: &Context, element: Element) -> Result<Security> {
        let version = DdmsVersion::for_namespace(element.namespace())?;
        let security_attributes = SecurityAttributes::from_element(ctx, &element)
            .map_err(|e| e.locate_in(&element.qualified_name()))?;
        let raw_rollup = element
            .attribute_value(EXCLUDE_FROM_ROLLUP_NAME, version.ism_namespace())
            .to_string();
        let exclude_from_rollup = if is_empty_string(&raw_rollup) {
            None
        } else {
            Some(matches!(raw_rollup.trim(), "true" | "1"))
        };
        Security::build(version, element, exclude_from_rollup, security_attributes)
    }

    /// Build and validate from raw data
    pub fn new(ctx: &Context, security_attributes: SecurityAttributes) -> Result<Security> {
        let version = ctx.current_version();
        let mut element = Element::new(ddms_prefix(), NAME, version.namespace());
        let exclude_from_rollup = if version.is_at_least("3.0")? {
            element.set_attribute(
                ism_prefix(),
                EXCLUDE_FROM_ROLLUP_NAME,
                version.ism_namespace(),
                FIXED_ROLLUP,
            );
            Some(true)
        } else {
            None
        };
        security_attributes.add_to(&mut element);
        Security::build(version, element, exclude_from_rollup, security_attributes)
    }

    fn build(
        version: DdmsVersion,
        element: Element,
        exclude_from_rollup: Option<bool>,
        security_attributes: SecurityAttributes,
    ) -> Result<Security> {
        let mut security = Security {
            element,
            version,
            exclude_from_rollup,
            security_attributes,
            warnings: Vec::new(),
        };
        security
            .validate()
            .map_err(|e| e.locate_in(&security.qualified_name()))?;
        Ok(security)
    }

    fn validate(&mut self) -> Result<()> {
        require_qname(&self.element, NAME, self.version.namespace())?;
        if self.version.is_at_least("3.0")? {
            match self.exclude_from_rollup {
                None => {
                    return Err(InvalidDdmsError::new(
                        "The excludeFromRollup attribute is required.",
                    )
                    .into())
                }
                Some(false) => {
                    return Err(InvalidDdmsError::new(format!(
                        "The excludeFromRollup attribute must have a fixed value of \"{}\".",
                        FIXED_ROLLUP
                    ))
                    .into())
                }
                Some(true) => {}
            }
        } else if self.exclude_from_rollup.is_some() {
            return Err(InvalidDdmsError::new(
                "The excludeFromRollup attribute cannot be used until DDMS 3.0 or later.",
            )
            .into());
        }
        self.security_attributes.require_classification()?;

        self.warnings = prefix_warnings(
            &self.qualified_name(),
            "",
            self.security_attributes.warnings(),
        );
        Ok(())
    }

    /// Accessor for excludeFromRollup; `None` on DDMS 2.0 components
    pub fn exclude_from_rollup(&self) -> Option<bool> {
        self.exclude_from_rollup
    }
}

impl DdmsComponent for Security {
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
        if let Some(rollup) = self.exclude_from_rollup {
            out.push_str(&crate::components::build_output(
                format,
                &format!("{}{}", local, EXCLUDE_FROM_ROLLUP_NAME),
                if rollup { "true" } else { "false" },
            ));
        }
        out.push_str(&self.security_attributes.output(format, &local));
        out
    }
}

impl PartialEq for Security {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.exclude_from_rollup == other.exclude_from_rollup
            && self.security_attributes == other.security_attributes
    }
}

impl Eq for Security {}

impl Hash for Security {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.exclude_from_rollup.hash(state);
        self.security_attributes.hash(state);
    }
}

/// Mutable mirror of [`Security`]
///
/// excludeFromRollup is not a builder field; it is derived from the version
/// at commit time because the schema fixes its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct SecurityBuilder {
    pub security_attributes: SecurityAttributesBuilder,
}

impl SecurityBuilder {
    /// Seed a builder from an existing component
    pub fn from_security(security: &Security) -> SecurityBuilder {
        SecurityBuilder {
            security_attributes: SecurityAttributesBuilder::from_attributes(
                &security.security_attributes,
            ),
        }
    }
}

impl ComponentBuilder for SecurityBuilder {
    type Component = Security;

    fn is_empty(&self) -> bool {
        self.security_attributes.is_empty()
    }

    fn commit(&self, ctx: &Context) -> Result<Option<Security>> {
        if self.is_empty() {
            return Ok(None);
        }
        let attributes = match self.security_attributes.commit(ctx)? {
            Some(attributes) => attributes,
            None => SecurityAttributes::empty(ctx)?,
        };
        Security::new(ctx, attributes).map(Some)
    }
}
