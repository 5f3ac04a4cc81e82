//! Embedded configuration properties
//!
//! The per-version namespace URIs, schema locations, and element-name
//! prefixes all come from `data/ddms.properties`, compiled into the binary.
//! A missing required key is a startup-fatal configuration error, surfaced
//! the first time the property table is touched, never a validation error.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static PROPERTIES: Lazy<HashMap<String, String>> =
    Lazy::new(|| parse(include_str!("../data/ddms.properties")));

/// Parse `key = value` lines, skipping blanks and `#` comments
fn parse(raw: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    map
}

/// Look up a required property value
///
/// # Panics
///
/// Panics if the key is absent. Every key requested by the crate ships in
/// the embedded properties file, so this only fires on a broken build.
pub fn property(key: &str) -> &'static str {
    PROPERTIES
        .get(key)
        .unwrap_or_else(|| panic!("required configuration property is missing: {}", key))
        .as_str()
}

/// Look up an optional property value
pub fn optional_property(key: &str) -> Option<&'static str> {
    PROPERTIES.get(key).map(|s| s.as_str())
}

/// Look up a required comma-separated list property
pub fn list_property(key: &str) -> Vec<&'static str> {
    property(key).split(',').map(|s| s.trim()).collect()
}
