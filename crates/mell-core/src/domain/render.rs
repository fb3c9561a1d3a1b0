//! Rendering inputs that are independent of any template engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Delimiters (Value Object)                                  │
//! │  └── |? block ?|   |= variable =|   |# comment #|           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RenderContext (Value Object)                               │
//! │  └── Extra variables: |= release =| -> "2.1"                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The metadata tree itself is passed to the renderer separately; the
//! context only carries loose string variables supplied on the command line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Start/end markers recognised by the template renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    pub block_start: String,
    pub block_end: String,
    pub variable_start: String,
    pub variable_end: String,
    pub comment_start: String,
    pub comment_end: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            block_start: "|?".into(),
            block_end: "?|".into(),
            variable_start: "|=".into(),
            variable_end: "=|".into(),
            comment_start: "|#".into(),
            comment_end: "#|".into(),
        }
    }
}

impl Delimiters {
    /// Every marker must be non-empty and the three start markers distinct.
    pub fn validate(&self) -> Result<(), DomainError> {
        let markers = [
            ("block_start", &self.block_start),
            ("block_end", &self.block_end),
            ("variable_start", &self.variable_start),
            ("variable_end", &self.variable_end),
            ("comment_start", &self.comment_start),
            ("comment_end", &self.comment_end),
        ];

        if let Some((name, _)) = markers.iter().find(|(_, marker)| marker.is_empty()) {
            return Err(DomainError::InvalidDelimiters(format!("{name} is empty")));
        }

        let starts = [&self.block_start, &self.variable_start, &self.comment_start];
        for (i, a) in starts.iter().enumerate() {
            if starts[i + 1..].contains(a) {
                return Err(DomainError::InvalidDelimiters(format!(
                    "start marker '{a}' is used twice"
                )));
            }
        }

        Ok(())
    }
}

/// Loose key/value variables handed to the renderer next to the metadata.
/// Iteration is sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RenderContext::insert`].
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Later inserts of the same key win.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (k, v) in iter {
            context.insert(k, v);
        }
        context
    }
}
