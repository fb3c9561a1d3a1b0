//! In-memory metadata documents, for tests and embedding.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use mell_core::{
    application::{ApplicationError, ports::MetadataSource},
    domain::Value,
    error::MellResult,
};

/// Thread-safe map of document name to raw JSON text.
///
/// Documents are kept as text so malformed JSON can be exercised too.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataSource {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert(name, json);
        self
    }

    pub fn insert(&self, name: impl Into<String>, json: impl Into<String>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(name.into(), json.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataSource for InMemoryMetadataSource {
    fn is_available(&self) -> bool {
        true
    }

    fn location(&self) -> String {
        "memory".into()
    }

    fn fetch(&self, name: &str) -> MellResult<Value> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let text = inner
            .get(name)
            .ok_or_else(|| ApplicationError::MetadataNotFound {
                name: name.to_owned(),
                location: self.location(),
            })?;

        serde_json::from_str(text).map_err(|e| {
            ApplicationError::MetadataParse {
                name: name.to_owned(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
