//! Field-level validation reporting shared by every input-accepting module.
//!
//! Validation runs batch-style: a check collects every violation it can find
//! before failing, so callers see the full field/message list in one response
//! instead of fixing inputs one error at a time.

use std::fmt;

use serde::Serialize;

/// A single field violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulated violations for one input payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish a batch check: `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Merge another batch under a field prefix, used when validating rows of
    /// a bulk input (`row 3: name`, ...).
    pub fn absorb_prefixed(&mut self, prefix: &str, other: ValidationError) {
        for error in other.errors {
            self.errors.push(FieldError {
                field: format!("{prefix}: {}", error.field),
                message: error.message,
            });
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for error in &self.errors {
            write!(f, "; {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// True when the string holds no visible characters. Inputs are not trimmed
/// before storage, only checked.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_resolves_to_ok() {
        assert!(ValidationError::new().into_result().is_ok());
    }

    #[test]
    fn display_lists_every_violation() {
        let mut errors = ValidationError::new();
        errors.push("name", "must not be blank");
        errors.push("cleaner_count", "must be at least 1");
        assert_eq!(
            errors.to_string(),
            "validation failed; name: must not be blank; cleaner_count: must be at least 1"
        );
    }

    #[test]
    fn absorb_prefixed_rewrites_field_names() {
        let mut outer = ValidationError::new();
        outer.absorb_prefixed("row 2", ValidationError::single("name", "must not be blank"));
        assert_eq!(outer.errors[0].field, "row 2: name");
    }
}
