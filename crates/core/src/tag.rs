//! Tag field rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// User-facing message for a duplicate tag name.
pub const TAG_NAME_CONFLICT: &str = "Já existe uma tag com esse nome";

pub const MAX_TAG_NAME_LENGTH: usize = 100;

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

/// Trim a tag name and check it is non-empty and within length.
pub fn normalize_tag_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Tag name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tag name must be at most {MAX_TAG_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Accept `#RGB` or `#RRGGBB`.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    if COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Expected #RGB or #RRGGBB"
        )))
    }
}
