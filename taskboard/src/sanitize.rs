//! Title sanitizing and validation

use crate::error::ValidationError;

/// Maximum task title length, in characters
pub const MAX_TASK_TITLE_LENGTH: usize = 500;

/// Remove `<` and `>` so titles can never carry markup
pub fn strip_angle_brackets(input: &str) -> String {
    input.chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// Sanitize and validate a task title.
///
/// The input is trimmed and stripped of angle brackets. The cleaned title must
/// be non-empty and at most [`MAX_TASK_TITLE_LENGTH`] characters; longer
/// titles are rejected rather than silently truncated.
pub fn sanitize_title(raw: &str) -> Result<String, ValidationError> {
    let cleaned = strip_angle_brackets(raw.trim()).trim().to_string();
    if cleaned.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let len = cleaned.chars().count();
    if len > MAX_TASK_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TASK_TITLE_LENGTH,
        });
    }

    Ok(cleaned)
}
