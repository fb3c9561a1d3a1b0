//! Metadata resolution and generation engine for mell.
//!
//! This crate provides the domain and application layers for mell, a
//! metadata-driven generator: layered JSON documents are merged, edited by
//! set operations and migration scripts, then rendered through templates
//! and generator scripts.
//!
//! ## Layers
//!
//! - [`domain`]: the tree itself. Merge rules, the address grammar, path
//!   assignment, set operations and the [`domain::MetaView`] handed to
//!   scripts. No I/O.
//! - [`application`]: the use cases ([`application::GenerateService`],
//!   [`application::MetadataLoader`], [`application::Inflater`]) and the
//!   ports they drive. `mell-adapters` supplies the implementations.
//!
//! ## Usage
//!
//! ```rust
//! use mell_core::domain::{MetaView, SetOperation, apply_all};
//! use serde_json::json;
//!
//! let mut tree = json!({"user": {"name": "Ann"}});
//! apply_all(&mut tree, &[SetOperation::new("user.tags[1]", "admin")]);
//!
//! let mut view = MetaView::new(&mut tree);
//! assert_eq!(view.at("user.tags[1]").unwrap(), json!("admin"));
//! assert!(view.at("user.tags[0]").unwrap().is_null());
//! ```

pub mod domain;

pub mod application;

pub mod error;

/// Names most embedders need at once.
pub mod prelude {
    pub use crate::application::{
        GenerateService, Generator, Inflater, Invocation, Migration, ScriptHost, ScriptResult,
        ports::{Filesystem, MetadataSource, TemplateRenderer},
    };
    pub use crate::domain::{
        Action, Address, AddressStep, Delimiters, MetaView, Member, ProjectLayout, RenderContext,
        ScriptFile, SetOperation, TypeTag, Value,
    };
    pub use crate::error::{MellError, MellResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
