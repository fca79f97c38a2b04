//! Note constants and validation rules.
//!
//! Titles are compared exactly (case-sensitive, no trimming) when checking
//! per-user uniqueness; validation only rejects titles that carry no visible
//! characters at all.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a note title in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of note content in characters.
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Path of the note listing view, invalidated after every note write.
pub const NOTES_VIEW_PATH: &str = "/notes";

/// Message returned to the caller when a title is already taken.
pub const DUPLICATE_TITLE_MESSAGE: &str = "Title already exists";

/// Name of the backend constraint that enforces per-user title uniqueness.
pub const TITLE_UNIQUE_CONSTRAINT: &str = "uq_notes_author_title";

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a note title: required, not blank, and within the length limit.
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate optional note content. Absent or empty content is allowed.
pub fn validate_content(content: Option<&str>) -> Result<(), String> {
    match content {
        Some(c) if c.chars().count() > MAX_CONTENT_LENGTH => Err(format!(
            "Content exceeds maximum length of {MAX_CONTENT_LENGTH} characters"
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
