//! Infrastructure adapters for mell.
//!
//! This crate implements the ports defined in `mell_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod metadata;
pub mod renderer;
pub mod script;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use metadata::{DirectoryMetadataSource, InMemoryMetadataSource};
pub use renderer::DelimiterRenderer;
pub use script::ScriptRegistry;
