//! Script ports: user code that edits the metadata or renders output.
//!
//! A *migration* gets the invocation and a mutable view of the whole tree.
//! A *generator* additionally gets an [`Inflater`] to render assets and
//! templates, as many times as it likes.
//!
//! Closures with the right signature implement both traits:
//!
//! ```rust
//! use mell_core::application::{Invocation, ScriptResult};
//! use mell_core::domain::MetaView;
//!
//! let bump = |_: &Invocation, meta: &mut MetaView<'_>| -> ScriptResult {
//!     meta.set_field("version", 2)?;
//!     Ok(())
//! };
//! # let _ = bump;
//! ```

use std::sync::Arc;

use crate::application::Invocation;
use crate::application::services::Inflater;
use crate::domain::{MetaView, ScriptFile};
use crate::error::MellResult;

/// Error type scripts may return; anything implementing `std::error::Error`.
pub type ScriptError = Box<dyn std::error::Error + Send + Sync>;

pub type ScriptResult = Result<(), ScriptError>;

/// Edits the merged metadata before any action runs.
pub trait Migration {
    fn migrate(&self, args: &Invocation, meta: &mut MetaView<'_>) -> ScriptResult;
}

impl<F> Migration for F
where
    F: Fn(&Invocation, &mut MetaView<'_>) -> ScriptResult,
{
    fn migrate(&self, args: &Invocation, meta: &mut MetaView<'_>) -> ScriptResult {
        self(args, meta)
    }
}

/// Renders output from the resolved metadata.
pub trait Generator {
    fn generate(
        &self,
        args: &Invocation,
        meta: &mut MetaView<'_>,
        inflater: &Inflater<'_>,
    ) -> ScriptResult;
}

impl<F> Generator for F
where
    F: Fn(&Invocation, &mut MetaView<'_>, &Inflater<'_>) -> ScriptResult,
{
    fn generate(
        &self,
        args: &Invocation,
        meta: &mut MetaView<'_>,
        inflater: &Inflater<'_>,
    ) -> ScriptResult {
        self(args, meta, inflater)
    }
}

/// Port that turns script files into runnable scripts.
///
/// Implemented by:
/// - `mell_adapters::script::ScriptRegistry` (native and declarative scripts)
pub trait ScriptHost {
    /// Fails with `ScriptLoad` when the file has no runnable form.
    fn load_migration(&self, script: &ScriptFile) -> MellResult<Arc<dyn Migration>>;

    /// Fails with `ScriptLoad` when the file has no runnable form.
    fn load_generator(&self, script: &ScriptFile) -> MellResult<Arc<dyn Generator>>;
}
