//! Content field rules: titles and URL slugs.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// User-facing message for a duplicate content slug.
pub const CONTENT_SLUG_CONFLICT: &str = "Já existe um conteúdo com esse slug";

pub const MAX_SLUG_LENGTH: usize = 200;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Check that a content title is not blank.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Content title must not be empty".into()));
    }
    Ok(())
}

/// Derive a slug from free text: lowercase ASCII, accents folded, every run
/// of other characters collapsed to a single `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_string()
}

/// Use the explicit slug when given (it must already be well-formed),
/// otherwise derive one from the title.
pub fn resolve_slug(explicit: Option<&str>, title: &str) -> Result<String, CoreError> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => {
            validate_slug(slug)?;
            slug.to_string()
        }
        None => slugify(title),
    };
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "Could not derive a slug from the title".into(),
        ));
    }
    Ok(slug)
}

/// Accept lowercase alphanumeric words joined by single dashes.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.len() > MAX_SLUG_LENGTH || !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!("Invalid slug '{slug}'")));
    }
    Ok(())
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
