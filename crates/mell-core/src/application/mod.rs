//! Application layer for mell.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, MetadataLoader, ...)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! metadata logic itself. The tree rules live in `crate::domain`.

pub mod error;
pub mod invocation;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    GenerateService, GenerationSummary, Inflater, MetadataLoader, Resolution, ScriptService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    Filesystem, Generator, MetadataSource, Migration, ScriptError, ScriptHost, ScriptResult,
    TemplateRenderer,
};

pub use error::ApplicationError;
pub use invocation::Invocation;
