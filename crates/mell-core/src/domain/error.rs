// ============================================================================
// domain/error.rs - METADATA ENGINE ERRORS
// ============================================================================

use thiserror::Error;

/// Shape mismatch met while walking an address through a value tree.
///
/// `step` is the rendered address step that failed (`name` or `[n]`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An index step reached a map.
    #[error("step '{step}' indexes a map; expected a field name")]
    ExpectedField { step: String },

    /// A field step reached a sequence.
    #[error("step '{step}' names a field of a sequence; expected an index")]
    ExpectedIndex { step: String },

    /// A step tried to descend into a scalar.
    #[error("step '{step}' descends into a {found}; expected nothing past it")]
    ExpectedNothing { step: String, found: &'static str },

    /// An index past the end of a sequence, where padding is not allowed.
    #[error("index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (set-operation reports keep them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("invalid address '{address}': {reason}")]
    AddressSyntax { address: String, reason: String },

    #[error("unknown type tag '{0}'")]
    UnknownTypeTag(String),

    #[error("cannot convert '{raw}' to {tag}: {reason}")]
    Conversion {
        raw: String,
        tag: &'static str,
        reason: String,
    },

    #[error("invalid delimiters: {0}")]
    InvalidDelimiters(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    // ========================================================================
    // Shape Errors
    // ========================================================================
    #[error("address '{address}': {source}")]
    Path {
        address: String,
        #[source]
        source: PathError,
    },

    #[error("{0}")]
    Shape(#[from] PathError),

    #[error("cannot {operation} a {found}")]
    NotAContainer {
        operation: &'static str,
        found: &'static str,
    },

    // ========================================================================
    // Missing Values
    // ========================================================================
    #[error("cannot {operation} a missing value")]
    MissingValue { operation: &'static str },

    #[error("key '{0}' is not present")]
    KeyNotFound(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AddressSyntax { .. } => vec![
                "Addresses look like: user.name, users[0].email, matrix[1][2]".into(),
                "Brackets must hold a non-negative integer".into(),
                "Dots cannot be doubled, leading or trailing".into(),
            ],
            Self::UnknownTypeTag(tag) => vec![
                format!("'{}' is not a known type", tag),
                "Known types: str, int, float, bool, bytes".into(),
            ],
            Self::Conversion { tag, .. } => vec![
                format!("Check that the value is a valid {}", tag),
                "Omit the type suffix to store the value as a string".into(),
            ],
            Self::Path { address, source } => match source {
                PathError::ExpectedField { .. } => vec![
                    format!("'{}' indexes into a map", address),
                    "Use a field name (a.b) instead of an index (a[0])".into(),
                ],
                PathError::ExpectedIndex { .. } => vec![
                    format!("'{}' names a field of a sequence", address),
                    "Use an index (a[0]) instead of a field name (a.b)".into(),
                ],
                _ => vec![format!(
                    "Inspect the metadata with 'mell show' to see the shape around '{}'",
                    address
                )],
            },
            Self::MissingValue { .. } | Self::KeyNotFound(_) => vec![
                "The value is absent from the metadata".into(),
                "Probe with a field read before iterating or indexing".into(),
            ],
            Self::UnknownAction(_) => vec!["Known actions: clean, template, generator".into()],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AddressSyntax { .. }
            | Self::UnknownTypeTag(_)
            | Self::Conversion { .. }
            | Self::InvalidDelimiters(_)
            | Self::UnknownAction(_) => ErrorCategory::Validation,
            Self::Path { .. } | Self::Shape(_) | Self::NotAContainer { .. } => {
                ErrorCategory::Shape
            }
            Self::MissingValue { .. } | Self::KeyNotFound(_) => ErrorCategory::Missing,
        }
    }

    /// Attach the full address to a bare path error.
    pub fn at_address(address: impl Into<String>, source: PathError) -> Self {
        Self::Path {
            address: address.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Shape,
    Missing,
}
