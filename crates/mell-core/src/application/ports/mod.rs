//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `mell-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `MetadataSource`: Named JSON documents
//!   - `TemplateRenderer`: Template rendering
//!
//! - **Script Ports**: user code the application calls into
//!   - `ScriptHost`: turns discovered script files into runnable scripts
//!   - `Migration`, `Generator`: the scripts themselves

pub mod output;
pub mod script;

pub use output::{Filesystem, MetadataSource, TemplateRenderer};
pub use script::{Generator, Migration, ScriptError, ScriptHost, ScriptResult};
