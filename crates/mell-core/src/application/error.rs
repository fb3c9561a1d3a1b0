//! Application layer errors.
//!
//! These errors represent failures in orchestration: loading documents,
//! running scripts, rendering files. Errors inside the metadata tree itself
//! are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A requested metadata document does not exist.
    #[error("Metadata '{name}' not found in {location}")]
    MetadataNotFound { name: String, location: String },

    /// A metadata document is not a JSON object.
    #[error("Metadata '{name}' could not be parsed: {reason}")]
    MetadataParse { name: String, reason: String },

    /// A document inherits from itself through `__parent__`.
    #[error("Metadata inheritance cycle: {chain}")]
    InheritanceCycle { chain: String },

    /// A script file has no implementation the host can run.
    #[error("Could not load script {script}: {reason}")]
    ScriptLoad { script: String, reason: String },

    /// A script returned an error.
    #[error("Script {script} failed: {reason}")]
    ScriptRuntime { script: String, reason: String },

    /// Template rendering failed.
    #[error("Rendering {template} failed: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// A style directory needed for rendering does not exist.
    #[error("The {kind} folder does not exist: {path}")]
    SourceDirectoryMissing { kind: &'static str, path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Store lock error")]
    StoreLockError,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MetadataNotFound { name, location } => vec![
                format!("Expected a file named {}.json in {}", name, location),
                "Use --meta to point at another metadata folder".into(),
            ],
            Self::MetadataParse { name, .. } => vec![
                format!("Check that {}.json is valid JSON", name),
                "The top-level value must be an object".into(),
            ],
            Self::InheritanceCycle { .. } => vec![
                "A document cannot inherit from itself, directly or through its parents".into(),
                "Check the __parent__ keys along the chain".into(),
            ],
            Self::ScriptLoad { script, .. } => vec![
                format!("No implementation is registered for {}", script),
                "Write the script as a .json declarative file or register it with the host"
                    .into(),
            ],
            Self::ScriptRuntime { .. } => vec![
                "Inspect the metadata with 'mell show' before the script runs".into(),
                "Run with -vv to see every script as it runs".into(),
            ],
            Self::RenderingFailed { template, .. } => vec![
                format!("Check the delimiters used in {}", template),
                "Control blocks need a full template engine; use generators instead".into(),
            ],
            Self::SourceDirectoryMissing { kind, .. } => vec![
                format!("Create the {} folder inside your style", kind),
                format!("Or point --{} at an existing folder", kind),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "The store is locked".into(),
                "Try again in a moment".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MetadataNotFound { .. } | Self::SourceDirectoryMissing { .. } => {
                ErrorCategory::NotFound
            }
            Self::MetadataParse { .. } | Self::InheritanceCycle { .. } => {
                ErrorCategory::Validation
            }
            Self::ScriptLoad { .. } | Self::ScriptRuntime { .. } => ErrorCategory::Script,
            Self::RenderingFailed { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
