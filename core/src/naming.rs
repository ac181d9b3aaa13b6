//! Name derivation and validation for declared options and arguments.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ArgvError, Result};

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("static regex must compile")
});

/// Derives the long option name from a camel-case identifier.
///
/// A dash is inserted before every uppercase letter that follows a
/// lowercase letter, then the whole name is lowercased.
///
/// # Examples
///
/// ```
/// use argv_core::derive_long_name;
///
/// assert_eq!(derive_long_name("dryRun"), "dry-run");
/// assert_eq!(derive_long_name("verbose"), "verbose");
/// assert_eq!(derive_long_name("forkLimitMB"), "fork-limit-mb");
/// ```
pub fn derive_long_name(identifier: &str) -> String {
    let mut long = String::with_capacity(identifier.len() + 2);
    let mut after_lowercase = false;
    for ch in identifier.chars() {
        if ch.is_uppercase() && after_lowercase {
            long.push('-');
        }
        after_lowercase = ch.is_lowercase();
        long.extend(ch.to_lowercase());
    }
    long
}

pub(crate) fn validate_identifier(identifier: &str) -> Result<()> {
    if IDENTIFIER_RE.is_match(identifier) {
        Ok(())
    } else {
        Err(ArgvError::InvalidName(identifier.to_string()))
    }
}

pub(crate) fn validate_short_name(short: char) -> Result<()> {
    if short.is_ascii_alphanumeric() {
        Ok(())
    } else {
        Err(ArgvError::InvalidShortName(short))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_long_name_splits_camel_case() {
        assert_eq!(derive_long_name("applicationName"), "application-name");
        assert_eq!(derive_long_name("HTTPServer"), "httpserver");
        assert_eq!(derive_long_name("retry2Times"), "retry2times");
        assert_eq!(derive_long_name("dry-run"), "dry-run");
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("dryRun").is_ok());
        assert!(validate_identifier("input_dir").is_ok());
        assert_eq!(
            validate_identifier("2fast"),
            Err(ArgvError::InvalidName("2fast".to_string()))
        );
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("has space").is_err());
    }

    #[test]
    fn test_validate_short_name() {
        assert!(validate_short_name('v').is_ok());
        assert!(validate_short_name('9').is_ok());
        assert_eq!(validate_short_name('-'), Err(ArgvError::InvalidShortName('-')));
    }
}
