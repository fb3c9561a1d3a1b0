//! Unified error handling for mell core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for mell core operations.
#[derive(Debug, Error, Clone)]
pub enum MellError {
    /// Errors from the domain layer (addresses, paths, the view).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (loading, scripts, rendering).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl MellError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your mell.toml and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in mell".into(),
                "Please report this issue at: https://github.com/diegofps/mell/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation
                | crate::domain::ErrorCategory::Shape
                | crate::domain::ErrorCategory::Missing => ErrorCategory::Validation,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Script,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type MellResult<T> = Result<T, MellError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PathError;

    #[test]
    fn domain_errors_are_validation() {
        let err: MellError = DomainError::at_address(
            "a[2]",
            PathError::ExpectedField { step: "[2]".into() },
        )
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().starts_with("address 'a[2]'"));
    }

    #[test]
    fn application_errors_keep_their_category() {
        let err: MellError = ApplicationError::MetadataNotFound {
            name: "shop".into(),
            location: "meta".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions()[0].contains("shop.json"));
    }
}
