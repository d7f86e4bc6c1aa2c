//! Error types shared across the core.
//!
//! Missing records are not errors: repositories return `Ok(None)` and the
//! caller decides how to report it. Declined collaborator prompts are plain
//! negative outcomes as well.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the persistence substrate.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Stored value for '{key}' is malformed: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected input, reported to the user before anything is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyName { field: &'static str },

    #[error("{field} is too long, keep it within {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Quantity must be a valid non-negative number")]
    InvalidQuantity,

    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("A recipe needs at least one ingredient")]
    NoIngredients,

    #[error("A recipe needs at least one step")]
    NoSteps,

    #[error("Servings must be between 1 and 100, got {0}")]
    ServingsOutOfRange(u32),

    #[error("A shop needs at least one kitchen")]
    NoKitchens,

    #[error("Cannot delete the only kitchen")]
    LastKitchen,

    #[error("Kitchen not found: {0}")]
    UnknownKitchen(String),

    #[error("'{0}' is already an admin of this kitchen")]
    DuplicateAdmin(String),

    #[error("No user identity available, sign in first")]
    NoIdentity,

    #[error("No meal plan dishes for {0}")]
    EmptyPlan(String),

    #[error("'{0}' is already planned for this meal")]
    DuplicateDish(String),
}

/// Malformed export documents.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid export document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Umbrella error for flows that both validate and persist.
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::TooLong {
            field: "Recipe name",
            max: 50,
        };
        assert_eq!(
            err.to_string(),
            "Recipe name is too long, keep it within 50 characters"
        );
        assert_eq!(
            ValidationError::InvalidDate("2025-13-01".into()).to_string(),
            "Invalid date '2025-13-01'. Use YYYY-MM-DD."
        );
    }

    #[test]
    fn test_kitchen_error_from_validation() {
        let err: KitchenError = ValidationError::LastKitchen.into();
        assert!(matches!(
            err,
            KitchenError::Validation(ValidationError::LastKitchen)
        ));
        assert_eq!(err.to_string(), "Cannot delete the only kitchen");
    }
}
