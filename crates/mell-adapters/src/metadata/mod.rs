//! Metadata source adapters.

mod directory;
mod memory;

pub use directory::DirectoryMetadataSource;
pub use memory::InMemoryMetadataSource;
