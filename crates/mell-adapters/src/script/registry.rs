//! Script host backed by registered Rust code and declarative JSON scripts.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use mell_core::{
    application::{
        ApplicationError, Generator, Inflater, Invocation, Migration, ScriptHost, ScriptResult,
        ports::ScriptError,
    },
    domain::{MetaView, ScriptFile},
    error::{MellError, MellResult},
};

use super::declarative::{DeclarativeGenerator, DeclarativeMigration};

const DECLARATIVE_EXTENSION: &str = "json";

/// Resolves script files by name.
///
/// A discovered file `1700000000.add_email.rs` looks up the migration
/// registered as `add_email`. Files with no registered implementation are
/// parsed as declarative scripts when they end in `.json`.
///
/// ```rust
/// use mell_adapters::ScriptRegistry;
/// use mell_core::application::{Invocation, ScriptResult};
/// use mell_core::domain::MetaView;
///
/// let registry = ScriptRegistry::new().with_migration(
///     "bump_version",
///     |_: &Invocation, meta: &mut MetaView<'_>| -> ScriptResult {
///         meta.set_field("version", 2)?;
///         Ok(())
///     },
/// );
/// assert!(registry.has_migration("bump_version"));
/// ```
#[derive(Clone, Default)]
pub struct ScriptRegistry {
    migrations: BTreeMap<String, Arc<dyn Migration>>,
    generators: BTreeMap<String, Arc<dyn Generator>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_migration<F>(mut self, name: impl Into<String>, migration: F) -> Self
    where
        F: Fn(&Invocation, &mut MetaView<'_>) -> ScriptResult + 'static,
    {
        self.register_migration(name, Arc::new(migration));
        self
    }

    pub fn with_generator<F>(mut self, name: impl Into<String>, generator: F) -> Self
    where
        F: Fn(&Invocation, &mut MetaView<'_>, &Inflater<'_>) -> ScriptResult + 'static,
    {
        self.register_generator(name, Arc::new(generator));
        self
    }

    pub fn register_migration(&mut self, name: impl Into<String>, migration: Arc<dyn Migration>) {
        self.migrations.insert(name.into(), migration);
    }

    pub fn register_generator(&mut self, name: impl Into<String>, generator: Arc<dyn Generator>) {
        self.generators.insert(name.into(), generator);
    }

    pub fn has_migration(&self, name: &str) -> bool {
        self.migrations.contains_key(name)
    }

    pub fn has_generator(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("migrations", &self.migrations.keys().collect::<Vec<_>>())
            .field("generators", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ScriptHost for ScriptRegistry {
    fn load_migration(&self, script: &ScriptFile) -> MellResult<Arc<dyn Migration>> {
        if let Some(migration) = self.migrations.get(&script.name) {
            debug!(name = %script.name, "Using registered migration");
            return Ok(Arc::clone(migration));
        }

        if script.has_extension(DECLARATIVE_EXTENSION) {
            let migration = DeclarativeMigration::parse(&script.source)
                .map_err(|e| load_error(script, Box::new(e)))?;
            return Ok(Arc::new(migration));
        }

        Err(load_error(script, "no migration is registered under this name".into()))
    }

    fn load_generator(&self, script: &ScriptFile) -> MellResult<Arc<dyn Generator>> {
        if let Some(generator) = self.generators.get(&script.name) {
            debug!(name = %script.name, "Using registered generator");
            return Ok(Arc::clone(generator));
        }

        if script.has_extension(DECLARATIVE_EXTENSION) {
            let generator = DeclarativeGenerator::parse(&script.source)
                .map_err(|e| load_error(script, Box::new(e)))?;
            return Ok(Arc::new(generator));
        }

        Err(load_error(script, "no generator is registered under this name".into()))
    }
}

fn load_error(script: &ScriptFile, reason: ScriptError) -> MellError {
    ApplicationError::ScriptLoad {
        script: script.relative.display().to_string(),
        reason: reason.to_string(),
    }
    .into()
}
