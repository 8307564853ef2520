use crate::extractor::errors::{ExtractionError, InsufficientReason};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_BODY_CHARS: usize = 20;

/// Fails when nothing was recovered, or when both title and body are too short
/// to be a real article (typically a login wall or an expired link).
pub fn check_sufficient(title: &str, body: &str) -> Result<(), ExtractionError> {
    let title_chars = title.chars().count();
    let body_chars = body.chars().count();

    if title_chars == 0 && body_chars == 0 {
        return Err(ExtractionError::InsufficientContent(
            InsufficientReason::NothingFound,
        ));
    }

    if title_chars < MIN_TITLE_CHARS && body_chars < MIN_BODY_CHARS {
        return Err(ExtractionError::InsufficientContent(
            InsufficientReason::TooShort {
                title_chars,
                body_chars,
            },
        ));
    }

    Ok(())
}
