//! Core domain layer for mell.
//!
//! Pure metadata logic: the JSON tree and its merge, the address grammar,
//! path assignment, typed set operations and the script-facing view.
//! All I/O, rendering and script execution are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Small dependency surface**: std, serde/serde_json, thiserror, tracing
//!
pub mod address;
pub mod error;
pub mod layout;
pub mod path;
pub mod render;
pub mod script;
pub mod set_operation;
pub mod value;
pub mod view;

pub use address::{Address, AddressStep};
pub use error::{DomainError, ErrorCategory, PathError};
pub use layout::{Action, ProjectLayout};
pub use render::{Delimiters, RenderContext};
pub use script::{ScriptFile, sort_migrations};
pub use set_operation::{SetFailure, SetOperation, SetReport, TypeTag, apply_all};
pub use value::{Map, Value, is_truthy, merge, merged, type_name};
pub use view::{Entry, Iter, MetaView, Member};
