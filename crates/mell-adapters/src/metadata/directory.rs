//! Metadata documents stored as `<dir>/<name>.json` files.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use mell_core::{
    application::{ApplicationError, ports::MetadataSource},
    domain::Value,
    error::MellResult,
};

/// Reads metadata documents from one folder.
#[derive(Debug, Clone)]
pub struct DirectoryMetadataSource {
    dir: PathBuf,
}

impl DirectoryMetadataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl MetadataSource for DirectoryMetadataSource {
    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn fetch(&self, name: &str) -> MellResult<Value> {
        let path = self.document_path(name);

        let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::MetadataNotFound {
                name: name.to_owned(),
                location: self.location(),
            },
            _ => ApplicationError::FilesystemError {
                path: path.clone(),
                reason: format!("Failed to read metadata: {e}"),
            },
        })?;

        debug!(path = %path.display(), bytes = text.len(), "Read metadata document");

        serde_json::from_str(&text).map_err(|e| {
            ApplicationError::MetadataParse {
                name: name.to_owned(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
