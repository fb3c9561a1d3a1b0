//! Script host adapters.

mod declarative;
mod registry;

pub use declarative::{DeclarativeError, DeclarativeGenerator, DeclarativeMigration};
pub use registry::ScriptRegistry;
