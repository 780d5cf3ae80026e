//! Field rules for persisted summaries.
//!
//! The database layer stores whatever it is given; handlers run these checks
//! before calling the repository.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of `title`, `subject` and `author`, in characters.
pub const MAX_FIELD_LENGTH: usize = 255;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Title must be non-blank and within [`MAX_FIELD_LENGTH`].
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title cannot be empty".to_string()));
    }
    check_length("title", title)
}

/// Content must be non-blank. There is no upper bound.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Content cannot be empty".to_string()));
    }
    Ok(())
}

/// Optional short fields (`subject`, `author`) only have a length limit.
pub fn validate_optional_field(field: &'static str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => check_length(field, v),
        None => Ok(()),
    }
}

/// Validate every field of a new summary.
pub fn validate_new_summary(
    title: &str,
    content: &str,
    subject: Option<&str>,
    author: Option<&str>,
) -> Result<(), CoreError> {
    validate_title(title)?;
    validate_content(content)?;
    validate_optional_field("subject", subject)?;
    validate_optional_field("author", author)
}

/// Validate the supplied fields of a partial update. Absent fields are
/// left unchanged and are not checked.
pub fn validate_summary_update(
    title: Option<&str>,
    content: Option<&str>,
    subject: Option<&str>,
    author: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(title) = title {
        validate_title(title)?;
    }
    if let Some(content) = content {
        validate_content(content)?;
    }
    validate_optional_field("subject", subject)?;
    validate_optional_field("author", author)
}

/// Subjects are stored lower-cased so lookups by subject are case-insensitive.
pub fn normalize_subject(subject: &str) -> String {
    subject.trim().to_lowercase()
}

fn check_length(field: &'static str, value: &str) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > MAX_FIELD_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_FIELD_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_rejected() {
        assert!(validate_title("   ").is_err());
        assert!(validate_title("Physics").is_ok());
    }

    #[test]
    fn title_length_counts_characters() {
        let cyrillic = "я".repeat(MAX_FIELD_LENGTH);
        assert!(validate_title(&cyrillic).is_ok());
        let too_long = "a".repeat(MAX_FIELD_LENGTH + 1);
        let err = validate_title(&too_long).unwrap_err();
        assert!(err.to_string().contains("title exceeds maximum length"));
    }

    #[test]
    fn blank_content_rejected() {
        assert!(validate_content("\n\t").is_err());
    }

    #[test]
    fn new_summary_checks_optional_fields() {
        let long = "x".repeat(MAX_FIELD_LENGTH + 1);
        assert!(validate_new_summary("t", "c", None, None).is_ok());
        assert!(validate_new_summary("t", "c", Some(&long), None).is_err());
        assert!(validate_new_summary("t", "c", None, Some(&long)).is_err());
    }

    #[test]
    fn update_ignores_absent_fields() {
        assert!(validate_summary_update(None, None, None, None).is_ok());
        assert!(validate_summary_update(Some(""), None, None, None).is_err());
        assert!(validate_summary_update(None, Some(" "), None, None).is_err());
    }

    #[test]
    fn subject_is_lower_cased() {
        assert_eq!(normalize_subject(" Quantum PHYSICS "), "quantum physics");
        assert_eq!(normalize_subject("ФИЗИКА"), "физика");
    }
}
