//! Script Service - discovers and runs migrations and generators.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::application::{
    ApplicationError, Invocation,
    ports::{Filesystem, ScriptError, ScriptHost},
    services::Inflater,
};
use crate::domain::{MetaView, ScriptFile, Value, sort_migrations};
use crate::error::{MellError, MellResult};

/// Service running user scripts through a [`ScriptHost`].
pub struct ScriptService {
    host: Box<dyn ScriptHost>,
}

impl ScriptService {
    pub fn new(host: Box<dyn ScriptHost>) -> Self {
        Self { host }
    }

    /// Every script file below `dir`, sorted by relative path.
    ///
    /// A missing folder has no scripts. Hidden files are skipped.
    pub fn discover(&self, filesystem: &dyn Filesystem, dir: &Path) -> MellResult<Vec<ScriptFile>> {
        if !filesystem.is_dir(dir) {
            debug!(dir = %dir.display(), "No script folder");
            return Ok(Vec::new());
        }

        let mut scripts = Vec::new();
        for relative in filesystem.list_files(dir)? {
            let hidden = relative
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if hidden {
                continue;
            }
            let source = filesystem.read_to_string(&dir.join(&relative))?;
            scripts.push(ScriptFile::new(relative, source));
        }

        Ok(scripts)
    }

    /// Run every migration, numbered ones first, against the whole tree.
    #[instrument(skip_all, fields(dir = %invocation.layout.migration.display()))]
    pub fn run_migrations(
        &self,
        filesystem: &dyn Filesystem,
        invocation: &Invocation,
        tree: &mut Value,
    ) -> MellResult<usize> {
        let mut scripts = self.discover(filesystem, &invocation.layout.migration)?;
        sort_migrations(&mut scripts);

        for script in &scripts {
            let migration = self.host.load_migration(script)?;
            info!(script = %script.relative.display(), "Running migration");

            let mut view = MetaView::new(tree);
            migration
                .migrate(invocation, &mut view)
                .map_err(|e| runtime_error(script, e))?;
        }

        Ok(scripts.len())
    }

    /// Run every generator in path order with one shared inflater.
    #[instrument(skip_all, fields(dir = %invocation.layout.generator.display()))]
    pub fn run_generators(
        &self,
        filesystem: &dyn Filesystem,
        invocation: &Invocation,
        tree: &mut Value,
        inflater: &Inflater<'_>,
    ) -> MellResult<usize> {
        let scripts = self.discover(filesystem, &invocation.layout.generator)?;

        for script in &scripts {
            let generator = self.host.load_generator(script)?;
            info!(script = %script.relative.display(), "Running generator");

            let mut view = MetaView::new(tree);
            generator
                .generate(invocation, &mut view, inflater)
                .map_err(|e| runtime_error(script, e))?;
        }

        Ok(scripts.len())
    }
}

fn runtime_error(script: &ScriptFile, error: ScriptError) -> MellError {
    ApplicationError::ScriptRuntime {
        script: script.relative.display().to_string(),
        reason: error.to_string(),
    }
    .into()
}
