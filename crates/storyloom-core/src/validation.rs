//! Small input checks shared by every context.

use crate::error::DomainError;

/// Trims `value` and rejects it when nothing is left.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming `field` if the value is blank.
pub fn required_text(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Normalizes an optional free-text field: blank strings become `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Rejects negative ordering indices.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `index` is below zero.
pub fn non_negative_index(field: &str, index: i32) -> Result<i32, DomainError> {
    if index < 0 {
        return Err(DomainError::Validation(format!(
            "{field} must be non-negative, got {index}"
        )));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims_surrounding_whitespace() {
        assert_eq!(required_text("title", "  Dusk  ").unwrap(), "Dusk");
    }

    #[test]
    fn test_required_text_rejects_blank() {
        let err = required_text("title", "   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg == "title must not be empty"));
    }

    #[test]
    fn test_optional_text_drops_blank_values() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" a ".into())), Some("a".into()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_non_negative_index_rejects_negative() {
        assert!(non_negative_index("index", 0).is_ok());
        assert!(matches!(
            non_negative_index("index", -1),
            Err(DomainError::Validation(_))
        ));
    }
}
