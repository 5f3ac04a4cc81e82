//! XML name validation
//!
//! Lexical checks for NCNames, applied to element and attribute names as
//! documents are parsed. Simplified against the full XML grammar, matching
//! the subset DDMS content actually exercises.

use crate::error::{InvalidDdmsError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-\.]*$").unwrap());

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Validate that a string is an NCName, as a DDMS rule
pub fn require_valid_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(InvalidDdmsError::new(format!("\"{}\" is not a valid NCName.", name)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("language"));
        assert!(is_valid_ncname("_element"));
        assert!(is_valid_ncname("my-element.1"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("1element"));
        assert!(!is_valid_ncname("pre:fix"));
        assert!(!is_valid_ncname("spaced name"));
    }

    #[test]
    fn test_require_valid_ncname() {
        assert!(require_valid_ncname("title").is_ok());
        let err = require_valid_ncname("1.4").unwrap_err();
        assert!(err.to_string().contains("is not a valid NCName."));
    }
}
