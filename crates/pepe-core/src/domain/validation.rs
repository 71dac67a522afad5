//! Field validation shared by the domain input types.

use thiserror::Error;

/// Errors raised while parsing user-supplied values into domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Blank { field: &'static str },

    #[error("{field} cannot contain more than {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} must be between {min} and {max} (got {actual})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("{field} cannot be in the future")]
    InFuture { field: &'static str },

    #[error("'{value}' is not a valid id")]
    NotAnId { value: String },

    #[error("'{value}' is not a valid {field}: {reason}")]
    Malformed {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Require a non-blank value of at most `max` characters.
pub(crate) fn required_text(
    field: &'static str,
    value: impl Into<String>,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_whitespace() {
        assert_eq!(
            required_text("name", "   ", 10),
            Err(ValidationError::Blank { field: "name" })
        );
    }

    #[test]
    fn test_required_text_counts_chars_not_bytes() {
        // 4 chars, 8 bytes
        assert!(required_text("name", "ÅÄÖÜ", 4).is_ok());
        assert_eq!(
            required_text("name", "abcde", 4),
            Err(ValidationError::TooLong {
                field: "name",
                max: 4,
                actual: 5
            })
        );
    }
}
