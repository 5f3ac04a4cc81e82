//! DDMS version registry
//!
//! Resolves a version identifier to its XML namespace, schema location, and
//! controlled-vocabulary location, and defines the ordering between supported
//! versions. The ordering follows list position in the configuration file
//! (the list is maintained in release-date order), not any parsing of the
//! identifier text.
//!
//! The "current" version used when building components from raw data is not
//! process-wide state. It lives on a [`Context`] value that callers thread
//! through construction explicitly, so two units of work can use different
//! versions without contaminating each other.

use crate::error::{Error, Result};
use crate::properties;
use crate::vocabulary::Vocabulary;
use once_cell::sync::Lazy;
use std::fmt;

struct VersionData {
    version: &'static str,
    namespace: &'static str,
    schema_location: &'static str,
    ism_namespace: &'static str,
    cve_location: &'static str,
}

static REGISTRY: Lazy<Vec<VersionData>> = Lazy::new(|| {
    properties::list_property("ddms.supportedVersions")
        .into_iter()
        .map(|version| VersionData {
            version,
            namespace: properties::property(&format!("{}.ddms.xmlNamespace", version)),
            schema_location: properties::property(&format!("{}.ddms.xsdLocation", version)),
            ism_namespace: properties::property(&format!("{}.ism.xmlNamespace", version)),
            cve_location: properties::property(&format!("{}.ism.cveLocation", version)),
        })
        .collect()
});

/// One supported revision of the DDMS schema family
///
/// A cheap copyable handle into the static version registry. Ordering and
/// equality follow the configured supported-version list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DdmsVersion {
    index: usize,
}

impl DdmsVersion {
    /// Returns the version mapped to a particular identifier
    ///
    /// DDMS 3.0.1 was a documentation-only release and aliases to 3.0.
    pub fn for_version(version: &str) -> Result<DdmsVersion> {
        let version = alias_version(version);
        REGISTRY
            .iter()
            .position(|data| data.version == version)
            .map(|index| DdmsVersion { index })
            .ok_or_else(|| Error::UnsupportedVersion(version.to_string()))
    }

    /// Returns the version mapped to a DDMS XML namespace
    ///
    /// When a namespace is shared by multiple versions (the 4.x family), the
    /// most recent version is returned.
    pub fn for_namespace(namespace: &str) -> Result<DdmsVersion> {
        REGISTRY
            .iter()
            .rposition(|data| data.namespace == namespace)
            .map(|index| DdmsVersion { index })
            .ok_or_else(|| {
                Error::UnsupportedVersion(format!("for XML namespace {}", namespace))
            })
    }

    /// Checks if an XML namespace is one of the supported DDMS namespaces
    pub fn is_supported_namespace(namespace: &str) -> bool {
        REGISTRY.iter().any(|data| data.namespace == namespace)
    }

    /// The default version, from the `ddms.defaultVersion` property
    pub fn default_version() -> DdmsVersion {
        DdmsVersion::for_version(properties::property("ddms.defaultVersion"))
            .expect("ddms.defaultVersion must name a supported version")
    }

    /// The supported version identifiers, in release order
    pub fn supported_versions() -> Vec<&'static str> {
        REGISTRY.iter().map(|data| data.version).collect()
    }

    /// Checks whether this version is the same as or more recent than another
    pub fn is_at_least(self, version: &str) -> Result<bool> {
        Ok(self >= DdmsVersion::for_version(version)?)
    }

    /// Accessor for the version identifier
    pub fn version(self) -> &'static str {
        REGISTRY[self.index].version
    }

    /// Accessor for the DDMS XML namespace
    pub fn namespace(self) -> &'static str {
        REGISTRY[self.index].namespace
    }

    /// Accessor for the DDMS schema location
    pub fn schema_location(self) -> &'static str {
        REGISTRY[self.index].schema_location
    }

    /// Accessor for the ISM XML namespace
    pub fn ism_namespace(self) -> &'static str {
        REGISTRY[self.index].ism_namespace
    }

    /// Accessor for the controlled-vocabulary location of this version
    pub fn cve_location(self) -> &'static str {
        REGISTRY[self.index].cve_location
    }
}

impl fmt::Display for DdmsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version())
    }
}

/// Treats DDMS 3.0.1 as an alias for 3.0; the two share schemas and namespaces
fn alias_version(version: &str) -> &str {
    if version == "3.0.1" {
        "3.0"
    } else {
        version
    }
}

/// Scoped construction state: the current version plus the vocabulary source
///
/// Component constructors that build from raw data read the current version
/// from the context; constructors that build from a parsed element resolve
/// the version from the element's namespace but still use the context's
/// vocabulary for attribute checks. Intended for one logical unit of work at
/// a time.
pub struct Context {
    current: DdmsVersion,
    vocabulary: Vocabulary,
}

impl Context {
    /// Create a context at the default version with the embedded vocabulary
    pub fn new() -> Result<Context> {
        Ok(Context {
            current: DdmsVersion::default_version(),
            vocabulary: Vocabulary::new()?,
        })
    }

    /// Create a context with a custom vocabulary source
    pub fn with_vocabulary(vocabulary: Vocabulary) -> Context {
        Context {
            current: DdmsVersion::default_version(),
            vocabulary,
        }
    }

    /// Accessor for the current version
    pub fn current_version(&self) -> DdmsVersion {
        self.current
    }

    /// Set the current version used by raw-data constructors
    ///
    /// Fails with `UnsupportedVersion` without mutating state if the
    /// identifier is not supported.
    pub fn set_current_version(&mut self, version: &str) -> Result<()> {
        self.current = DdmsVersion::for_version(version)?;
        Ok(())
    }

    /// Reset the current version to the configured default
    pub fn clear_current_version(&mut self) {
        self.current = DdmsVersion::default_version();
    }

    /// Accessor for the controlled-vocabulary source
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}
