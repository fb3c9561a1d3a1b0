//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `mell-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{RenderContext, Value};
use crate::error::MellResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `mell_adapters::filesystem::LocalFilesystem` (production)
/// - `mell_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> MellResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> MellResult<()>;

    /// Read a whole UTF-8 file.
    fn read_to_string(&self, path: &Path) -> MellResult<String>;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a file, or a directory and all contents. Missing paths are fine.
    fn remove_all(&self, path: &Path) -> MellResult<()>;

    /// Every regular file below `dir`, as paths relative to `dir`, sorted.
    fn list_files(&self, dir: &Path) -> MellResult<Vec<PathBuf>>;
}

/// Port for reading named metadata documents.
///
/// Implemented by:
/// - `mell_adapters::metadata::DirectoryMetadataSource` (`<dir>/<name>.json`)
/// - `mell_adapters::metadata::InMemoryMetadataSource` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait MetadataSource: Send + Sync {
    /// Whether the backing store exists at all.
    fn is_available(&self) -> bool;

    /// Human-readable location, used in diagnostics.
    fn location(&self) -> String;

    /// Parse one document. Fails with `MetadataNotFound` or `MetadataParse`.
    fn fetch(&self, name: &str) -> MellResult<Value>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `mell_adapters::renderer::DelimiterRenderer` (variable substitution)
pub trait TemplateRenderer: Send + Sync {
    /// Render template source text.
    ///
    /// # Arguments
    ///
    /// * `name` - Template path, for diagnostics
    /// * `source` - Template text
    /// * `meta` - The metadata node exposed to the template as `meta`
    /// * `context` - Extra loose variables
    fn render(
        &self,
        name: &str,
        source: &str,
        meta: &Value,
        context: &RenderContext,
    ) -> MellResult<String>;
}
