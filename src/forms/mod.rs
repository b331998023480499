//! Submission validation for the instructor profile and review forms, plus
//! the server-side draft cache for half-finished profile edits.

pub mod drafts;
pub mod profile;
pub mod review;

use std::collections::BTreeMap;
use thiserror::Error;

pub use drafts::{Draft, DraftCache};
pub use profile::{ProfileForm, ProfileLimits, SaveState, ValidProfile};
pub use review::ReviewForm;

/// Validation failure with per-field messages, keyed by paths like
/// `favorite_products[1].brand`
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FormError {
    pub message: String,
    pub field_errors: BTreeMap<String, String>,
}

impl FormError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// First message for a field wins
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, FormError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_message_per_field() {
        let mut err = FormError::new("Invalid review");
        err.push("rating", "Please select a rating");
        err.push("rating", "Rating must be between 1 and 5");
        assert_eq!(err.field_errors["rating"], "Please select a rating");
        assert!(err.into_result(()).is_err());
    }

    #[test]
    fn empty_error_passes_value_through() {
        assert_eq!(FormError::new("unused").into_result(7).unwrap(), 7);
    }
}
