//! Input validation for event create and update payloads.

use crate::error::CoreError;

/// Maximum length of an event title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a single tag, in characters.
pub const MAX_TAG_LEN: usize = 64;

/// Reject text PostgreSQL cannot store. `TEXT` and `JSONB` both refuse NUL.
pub fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.contains('\0') {
        return Err(CoreError::Validation(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(())
}

/// Validate a title: non-blank and at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    validate_text("title", title)?;
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validate announcement body content: must not be blank.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    validate_text("content", content)?;
    if content.trim().is_empty() {
        return Err(CoreError::Validation("content must not be empty".to_string()));
    }
    Ok(())
}

/// Trim every tag and reject blank or over-long ones.
///
/// Order and duplicates are preserved; the store does not deduplicate tags.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, CoreError> {
    tags.iter()
        .enumerate()
        .map(|(i, tag)| {
            validate_text(&format!("tags[{i}]"), tag)?;
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                return Err(CoreError::Validation(format!("tags[{i}] must not be empty")));
            }
            if trimmed.chars().count() > MAX_TAG_LEN {
                return Err(CoreError::Validation(format!(
                    "tags[{i}] must be at most {MAX_TAG_LEN} characters"
                )));
            }
            Ok(trimmed.to_string())
        })
        .collect()
}
