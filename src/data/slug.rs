use once_cell::sync::Lazy;
use regex::Regex;

use super::DataError;

/// Lowercase alphanumeric words joined by single dashes or dots
static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+([-.][a-z0-9]+)*$").expect("slug pattern compiles"));

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}

/// Names must be non-empty, trimmed, and free of tabs, newlines and other
/// control characters. Plain spaces inside the name are fine.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name
            .chars()
            .any(|c| c.is_control() || (c.is_whitespace() && c != ' '))
}

pub fn validate_slug(slug: &str) -> Result<(), DataError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(DataError::InvalidInput(format!("Invalid ID '{}'", slug)))
    }
}

pub fn validate_name(name: &str) -> Result<(), DataError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(DataError::InvalidInput(format!("Invalid name '{}'", name)))
    }
}
