//! Controlled vocabulary enumerations for ISM attributes
//!
//! Token values are read from the CVEnumISM XML files accompanying the XML
//! Data Encoding Specification for Information Security Marking Metadata.
//! Each supported DDMS version maps to a vocabulary location; the default
//! data ships inside the binary, and a filesystem override can swap the
//! entire enumeration source without code changes.
//!
//! Vocabulary keys are the enumeration file names. An unknown key is a
//! programmer error and fails immediately; an unreadable override location
//! is a fatal configuration error, never silently defaulted.

use crate::elements::Element;
use crate::error::{Error, InvalidDdmsError, Result};
use crate::versions::DdmsVersion;
use indexmap::IndexSet;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Key for the enumerations allowed in a declassException attribute
pub const CVE_DECLASS_EXCEPTION: &str = "CVEnumISM25X.xml";

/// Key for the enumerations allowed in an atomicEnergyMarkings attribute
pub const CVE_ATOMIC_ENERGY_MARKINGS: &str = "CVEnumISMAtomicEnergyMarkings.xml";

/// Key for the enumerations allowed in a classification attribute
pub const CVE_ALL_CLASSIFICATIONS: &str = "CVEnumISMClassificationAll.xml";

/// Key for the enumerations allowed in a classification attribute (US only)
pub const CVE_US_CLASSIFICATIONS: &str = "CVEnumISMClassificationUS.xml";

/// Key for the enumerations allowed in a compliesWith attribute
pub const CVE_COMPLIES_WITH: &str = "CVEnumISMCompliesWith.xml";

/// Key for the enumerations allowed in a disseminationControls attribute
pub const CVE_DISSEMINATION_CONTROLS: &str = "CVEnumISMDissem.xml";

/// Key for the enumerations allowed in a displayOnlyTo attribute
pub const CVE_DISPLAY_ONLY_TO: &str = "CVEnumISMRelTo.xml";

/// Key for the enumerations allowed in a FGIsourceOpen attribute
pub const CVE_FGI_SOURCE_OPEN: &str = "CVEnumISMFGIOpen.xml";

/// Key for the enumerations allowed in a FGIsourceProtected attribute
pub const CVE_FGI_SOURCE_PROTECTED: &str = "CVEnumISMFGIProtected.xml";

/// Key for the enumerations allowed in a nonICmarkings attribute
pub const CVE_NON_IC_MARKINGS: &str = "CVEnumISMNonIC.xml";

/// Key for the enumerations allowed in a nonUSControls attribute
pub const CVE_NON_US_CONTROLS: &str = "CVEnumISMNonUSControls.xml";

/// Key for the enumerations allowed in an ownerProducer attribute
pub const CVE_OWNER_PRODUCERS: &str = "CVEnumISMOwnerProducer.xml";

/// Key for the enumerations allowed in a releasableTo attribute
pub const CVE_RELEASABLE_TO: &str = "CVEnumISMRelTo.xml";

/// Key for the enumerations allowed in a SARIdentifier attribute
pub const CVE_SAR_IDENTIFIER: &str = "CVEnumISMSAR.xml";

/// Key for the enumerations allowed in a SCIcontrols attribute
pub const CVE_SCI_CONTROLS: &str = "CVEnumISMSCIControls.xml";

/// Key for the enumerations allowed in a typeOfExemptedSource attribute
pub const CVE_TYPE_EXEMPTED_SOURCE: &str = "CVEnumISMSourceMarked.xml";

/// US classification markings, least to most restrictive
const ORDERED_US_CLASSIFICATIONS: [&str; 4] = ["U", "C", "S", "TS"];

/// NATO classification markings, least to most restrictive
///
/// CTS-B, CTS-BALK, and R have no agreed position in this ordering.
const ORDERED_NATO_CLASSIFICATIONS: [&str; 8] =
    ["NU", "NR", "NC", "NCA", "NS", "NSAT", "CTS", "CTSA"];

macro_rules! embedded_cve {
    ($location:literal, $key:literal) => {
        (
            $location,
            $key,
            include_str!(concat!("../data/cve/", $location, "/", $key)),
        )
    };
}

/// The enumeration files compiled into the binary, keyed by location
static EMBEDDED: &[(&str, &str, &str)] = &[
    embedded_cve!("2.0", "CVEnumISM25X.xml"),
    embedded_cve!("2.0", "CVEnumISMClassificationAll.xml"),
    embedded_cve!("2.0", "CVEnumISMClassificationUS.xml"),
    embedded_cve!("2.0", "CVEnumISMDissem.xml"),
    embedded_cve!("2.0", "CVEnumISMFGIOpen.xml"),
    embedded_cve!("2.0", "CVEnumISMFGIProtected.xml"),
    embedded_cve!("2.0", "CVEnumISMNonIC.xml"),
    embedded_cve!("2.0", "CVEnumISMOwnerProducer.xml"),
    embedded_cve!("2.0", "CVEnumISMRelTo.xml"),
    embedded_cve!("2.0", "CVEnumISMSAR.xml"),
    embedded_cve!("2.0", "CVEnumISMSCIControls.xml"),
    embedded_cve!("2.0", "CVEnumISMSourceMarked.xml"),
    embedded_cve!("3.0", "CVEnumISM25X.xml"),
    embedded_cve!("3.0", "CVEnumISMClassificationAll.xml"),
    embedded_cve!("3.0", "CVEnumISMClassificationUS.xml"),
    embedded_cve!("3.0", "CVEnumISMDissem.xml"),
    embedded_cve!("3.0", "CVEnumISMFGIOpen.xml"),
    embedded_cve!("3.0", "CVEnumISMFGIProtected.xml"),
    embedded_cve!("3.0", "CVEnumISMNonIC.xml"),
    embedded_cve!("3.0", "CVEnumISMOwnerProducer.xml"),
    embedded_cve!("3.0", "CVEnumISMRelTo.xml"),
    embedded_cve!("3.0", "CVEnumISMSAR.xml"),
    embedded_cve!("3.0", "CVEnumISMSCIControls.xml"),
    embedded_cve!("3.0", "CVEnumISMSourceMarked.xml"),
    embedded_cve!("3.1", "CVEnumISM25X.xml"),
    embedded_cve!("3.1", "CVEnumISMAtomicEnergyMarkings.xml"),
    embedded_cve!("3.1", "CVEnumISMClassificationAll.xml"),
    embedded_cve!("3.1", "CVEnumISMClassificationUS.xml"),
    embedded_cve!("3.1", "CVEnumISMCompliesWith.xml"),
    embedded_cve!("3.1", "CVEnumISMDissem.xml"),
    embedded_cve!("3.1", "CVEnumISMFGIOpen.xml"),
    embedded_cve!("3.1", "CVEnumISMFGIProtected.xml"),
    embedded_cve!("3.1", "CVEnumISMNonIC.xml"),
    embedded_cve!("3.1", "CVEnumISMNonUSControls.xml"),
    embedded_cve!("3.1", "CVEnumISMOwnerProducer.xml"),
    embedded_cve!("3.1", "CVEnumISMRelTo.xml"),
    embedded_cve!("3.1", "CVEnumISMSAR.xml"),
    embedded_cve!("3.1", "CVEnumISMSCIControls.xml"),
];

/// One loaded enumeration: exact tokens plus full-match patterns
#[derive(Debug)]
struct Enumeration {
    tokens: IndexSet<String>,
    patterns: Vec<Regex>,
}

type EnumerationMap = HashMap<String, Enumeration>;

/// The controlled-vocabulary matcher
///
/// Holds every enumeration for every vocabulary location, loaded eagerly at
/// construction so that a bad source fails at startup rather than in the
/// middle of validation.
#[derive(Debug)]
pub struct Vocabulary {
    by_location: HashMap<String, EnumerationMap>,
    override_set: Option<EnumerationMap>,
}

impl Vocabulary {
    /// Create a matcher over the embedded default enumeration files
    pub fn new() -> Result<Vocabulary> {
        let mut by_location: HashMap<String, EnumerationMap> = HashMap::new();
        for (location, key, raw) in EMBEDDED {
            let enumeration = parse_enumeration(raw).map_err(|e| {
                Error::Config(format!(
                    "could not load controlled vocabulary {}/{}: {}",
                    location, key, e
                ))
            })?;
            by_location
                .entry(location.to_string())
                .or_default()
                .insert(key.to_string(), enumeration);
        }
        Ok(Vocabulary {
            by_location,
            override_set: None,
        })
    }

    /// Create a matcher from a custom enumeration directory
    ///
    /// Every CVEnumISM file in the directory is loaded and used for all
    /// versions, replacing the embedded data. Fails loudly when the
    /// directory or any enumeration file cannot be read or parsed.
    pub fn with_location(directory: &Path) -> Result<Vocabulary> {
        let entries = std::fs::read_dir(directory).map_err(|e| {
            Error::Config(format!(
                "could not read vocabulary location {}: {}",
                directory.display(),
                e
            ))
        })?;
        let mut map = EnumerationMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Config(e.to_string()))?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !file_name.starts_with("CVEnumISM") || !file_name.ends_with(".xml") {
                continue;
            }
            let raw = std::fs::read_to_string(entry.path()).map_err(|e| {
                Error::Config(format!("could not read {}: {}", file_name, e))
            })?;
            let enumeration = parse_enumeration(&raw).map_err(|e| {
                Error::Config(format!("could not parse {}: {}", file_name, e))
            })?;
            map.insert(file_name, enumeration);
        }
        if map.is_empty() {
            return Err(Error::Config(format!(
                "no enumeration files found at vocabulary location {}",
                directory.display()
            )));
        }
        Ok(Vocabulary {
            by_location: HashMap::new(),
            override_set: Some(map),
        })
    }

    fn enumeration(&self, version: DdmsVersion, key: &str) -> Result<&Enumeration> {
        let map = match &self.override_set {
            Some(map) => map,
            None => self
                .by_location
                .get(version.cve_location())
                .expect("every supported version maps to an embedded vocabulary location"),
        };
        map.get(key).ok_or_else(|| {
            Error::Argument(format!(
                "No controlled vocabulary could be found for this key: {}",
                key
            ))
        })
    }

    /// The exact tokens of an enumeration under a version
    pub fn tokens(&self, version: DdmsVersion, key: &str) -> Result<&IndexSet<String>> {
        Ok(&self.enumeration(version, key)?.tokens)
    }

    /// The regular-expression patterns of an enumeration under a version
    pub fn patterns(&self, version: DdmsVersion, key: &str) -> Result<&[Regex]> {
        Ok(&self.enumeration(version, key)?.patterns)
    }

    /// Checks if a value is a member of the enumeration identified by the key
    ///
    /// A value is a member when it equals an exact token or fully matches one
    /// of the enumeration's patterns.
    pub fn is_member(&self, version: DdmsVersion, key: &str, value: &str) -> Result<bool> {
        let enumeration = self.enumeration(version, key)?;
        Ok(enumeration.tokens.contains(value)
            || enumeration.patterns.iter().any(|p| p.is_match(value)))
    }

    /// Validates a value from a controlled vocabulary
    pub fn require_member(&self, version: DdmsVersion, key: &str, value: &str) -> Result<()> {
        if self.is_member(version, key, value)? {
            Ok(())
        } else {
            Err(InvalidDdmsError::new(invalid_message(key, value)).into())
        }
    }
}

/// Generates the message for a value missing from an enumeration
pub fn invalid_message(key: &str, value: &str) -> String {
    format!(
        "{} is not a valid enumeration token for this attribute, as specified in {}.",
        value, key
    )
}

/// Returns an index describing how restrictive a classification marking is
///
/// Lower is less restrictive; US markings are ordered `[U, C, S, TS]` and
/// NATO markings `[NU, NR, NC, NCA, NS, NSAT, CTS, CTSA]`. Markings with no
/// agreed position (see [`needs_manual_review`]) and unknown markings return
/// -1.
pub fn classification_index(classification: &str) -> i32 {
    if classification.trim().is_empty() || needs_manual_review(classification) {
        return -1;
    }
    if let Some(index) = ORDERED_US_CLASSIFICATIONS
        .iter()
        .position(|c| *c == classification)
    {
        return index as i32;
    }
    ORDERED_NATO_CLASSIFICATIONS
        .iter()
        .position(|c| *c == classification)
        .map(|i| i as i32)
        .unwrap_or(-1)
}

/// Checks if a classification carries a sharing caveat with no agreed ordering
pub fn needs_manual_review(classification: &str) -> bool {
    matches!(classification, "CTS-B" | "CTS-BALK" | "R")
}

/// Checks for the classifications that existed in DDMS 2.0 but were removed in 3.0
pub fn using_old_classification(classification: &str) -> bool {
    matches!(classification, "NS-S" | "NS-A")
}

/// Extract tokens and patterns from one CVEnumISM file
fn parse_enumeration(raw: &str) -> Result<Enumeration> {
    let root = Element::parse(raw)?;
    let enumeration = root
        .children
        .iter()
        .find(|c| c.local_name() == "Enumeration")
        .ok_or_else(|| Error::Xml("no Enumeration element found".to_string()))?;

    let mut tokens = IndexSet::new();
    let mut patterns = Vec::new();
    for term in &enumeration.children {
        if term.local_name() != "Term" {
            continue;
        }
        let value = match term.children.iter().find(|c| c.local_name() == "Value") {
            Some(value) => value,
            None => continue,
        };
        let is_pattern = value.attribute_value("regularExpression", "") == "true";
        if is_pattern {
            // Membership uses full-string matching
            let anchored = format!("^(?:{})$", value.text);
            let regex = Regex::new(&anchored)
                .map_err(|e| Error::Config(format!("bad enumeration pattern: {}", e)))?;
            patterns.push(regex);
        } else {
            tokens.insert(value.text.clone());
        }
    }
    Ok(Enumeration { tokens, patterns })
}
