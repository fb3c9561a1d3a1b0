//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "resolve the metadata" or "generate a project".

pub mod generate_service;
pub mod inflater;
pub mod metadata_service;
pub mod script_service;

pub use generate_service::{GenerateService, GenerationSummary, Resolution};
pub use inflater::{Inflater, SourceKind};
pub use metadata_service::{MetadataLoader, PARENT_KEY};
pub use script_service::ScriptService;
