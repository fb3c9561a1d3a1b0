//! Generate Service - main application orchestrator.
//!
//! This service coordinates one run:
//! 1. Load and merge the requested metadata
//! 2. Apply set operations (failures are warnings)
//! 3. Run migrations against the merged tree
//! 4. Run the requested actions (clean, template, generator)

use tracing::{debug, info, instrument};

use crate::{
    application::{
        Invocation,
        ports::{Filesystem, MetadataSource, ScriptHost, TemplateRenderer},
        services::{Inflater, MetadataLoader, ScriptService},
    },
    domain::{Action, ProjectLayout, SetReport, Value, apply_all},
    error::MellResult,
};

/// The metadata after loading, set operations and migrations.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tree: Value,
    pub set_report: SetReport,
    pub migrations: usize,
}

/// What a `generate` run did.
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    pub set_report: SetReport,
    pub migrations: usize,
    pub actions: Vec<Action>,
    pub templates: usize,
    pub generators: usize,
    pub files_written: usize,
}

/// Main generation service.
pub struct GenerateService {
    loader: MetadataLoader,
    scripts: ScriptService,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use mell_core::application::GenerateService;
    ///
    /// let service = GenerateService::new(
    ///     source,     // impl MetadataSource
    ///     filesystem, // impl Filesystem
    ///     renderer,   // impl TemplateRenderer
    ///     host,       // impl ScriptHost
    /// );
    /// ```
    pub fn new(
        source: Box<dyn MetadataSource>,
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
        host: Box<dyn ScriptHost>,
    ) -> Self {
        Self {
            loader: MetadataLoader::new(source),
            scripts: ScriptService::new(host),
            filesystem,
            renderer,
        }
    }

    /// Load, set and migrate, without running any action.
    #[instrument(skip_all, fields(metadata = %invocation.metadata))]
    pub fn resolve(&self, invocation: &Invocation) -> MellResult<Resolution> {
        info!("Loading the metadata");
        let mut tree = self.loader.load(&invocation.metadata)?;

        let set_report = apply_all(&mut tree, &invocation.set_operations);
        debug!(
            applied = set_report.applied,
            failed = set_report.failures.len(),
            "Set operations done"
        );

        let migrations = self
            .scripts
            .run_migrations(self.filesystem.as_ref(), invocation, &mut tree)?;

        Ok(Resolution {
            tree,
            set_report,
            migrations,
        })
    }

    /// Resolve the metadata, then run the requested actions in order.
    #[instrument(skip_all, fields(metadata = %invocation.metadata))]
    pub fn generate(&self, invocation: &Invocation) -> MellResult<GenerationSummary> {
        let Resolution {
            mut tree,
            set_report,
            migrations,
        } = self.resolve(invocation)?;

        let inflater = Inflater::new(
            self.filesystem.as_ref(),
            self.renderer.as_ref(),
            &invocation.layout,
            &invocation.context,
        );

        let mut summary = GenerationSummary {
            set_report,
            migrations,
            actions: invocation.effective_actions(),
            ..GenerationSummary::default()
        };

        for action in &summary.actions {
            info!(action = %action, "Executing action");
            match action {
                Action::Clean => self.clean(&invocation.layout)?,
                Action::Template => {
                    summary.templates += self.render_templates(&inflater, &invocation.layout, &tree)?;
                }
                Action::Generator => {
                    summary.generators += self.scripts.run_generators(
                        self.filesystem.as_ref(),
                        invocation,
                        &mut tree,
                        &inflater,
                    )?;
                }
            }
        }

        summary.files_written = inflater.written();
        info!(files = summary.files_written, "Generation completed");
        Ok(summary)
    }

    /// Remove the output path, file or folder, and recreate it empty.
    fn clean(&self, layout: &ProjectLayout) -> MellResult<()> {
        info!(output = %layout.output.display(), "Cleaning output folder");
        self.filesystem.remove_all(&layout.output)?;
        self.filesystem.create_dir_all(&layout.output)
    }

    /// Render every template file to the same relative path under output.
    fn render_templates(
        &self,
        inflater: &Inflater<'_>,
        layout: &ProjectLayout,
        tree: &Value,
    ) -> MellResult<usize> {
        if !self.filesystem.is_dir(&layout.template) {
            debug!(dir = %layout.template.display(), "No template folder");
            return Ok(0);
        }

        let files = self.filesystem.list_files(&layout.template)?;
        for relative in &files {
            let relpath = relative.to_string_lossy();
            debug!(template = %relpath, "Rendering template");
            inflater.inflate_template(&relpath, tree, Some(relpath.as_ref()))?;
        }

        Ok(files.len())
    }
}
