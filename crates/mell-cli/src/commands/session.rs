//! Translation of CLI arguments and configuration into core types.
//!
//! Both `generate` and `show` go through here, so they resolve the same
//! layout and the same metadata for the same flags.

use std::path::{Path, PathBuf};

use tracing::debug;

use mell_adapters::{DelimiterRenderer, DirectoryMetadataSource, LocalFilesystem, ScriptRegistry};
use mell_core::{
    application::{GenerateService, Invocation},
    domain::{Delimiters, ProjectLayout, SetOperation},
};

use crate::{
    cli::{DelimiterArgs, LayoutArgs, ProjectArgs},
    config::{LayoutNames, MellConfig},
    error::CliResult,
};

/// Directories for this run: flags first, then configured names under the
/// root (or under the style folder).
pub fn layout(args: &LayoutArgs, names: &LayoutNames) -> ProjectLayout {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let pick = |flag: &Option<PathBuf>, base: &Path, name: &str| {
        flag.clone().unwrap_or_else(|| base.join(name))
    };

    let style = pick(&args.style, &root, &names.style);
    ProjectLayout {
        meta: pick(&args.meta, &root, &names.meta),
        output: pick(&args.output, &root, &names.output),
        template: pick(&args.template, &style, &names.template),
        asset: pick(&args.asset, &style, &names.asset),
        migration: pick(&args.migration, &style, &names.migration),
        generator: pick(&args.generator, &style, &names.generator),
        style,
        root,
    }
}

/// Configured delimiters with per-marker flag overrides.
pub fn delimiters(args: &DelimiterArgs, configured: &Delimiters) -> Delimiters {
    let pick = |flag: &Option<String>, fallback: &String| {
        flag.clone().unwrap_or_else(|| fallback.clone())
    };
    Delimiters {
        block_start: pick(&args.block_start, &configured.block_start),
        block_end: pick(&args.block_end, &configured.block_end),
        variable_start: pick(&args.variable_start, &configured.variable_start),
        variable_end: pick(&args.variable_end, &configured.variable_end),
        comment_start: pick(&args.comment_start, &configured.comment_start),
        comment_end: pick(&args.comment_end, &configured.comment_end),
    }
}

/// Everything the core needs to know about this run.
pub fn invocation(project: &ProjectArgs, config: &MellConfig) -> Invocation {
    let layout = layout(&project.layout, &config.layout);
    debug!(?layout, "Resolved project layout");

    let mut invocation = Invocation::new(project.metadata.clone(), layout);
    for (target, raw) in project.set_pairs() {
        invocation = invocation.with_set(SetOperation::parse(target, raw));
    }
    for (key, value) in &project.vars {
        invocation = invocation.with_variable(key.clone(), value.clone());
    }
    invocation
}

/// Generate service wired to the local filesystem.
pub fn service(layout: &ProjectLayout, delimiters: Delimiters) -> CliResult<GenerateService> {
    let renderer = DelimiterRenderer::new(delimiters)?;
    Ok(GenerateService::new(
        Box::new(DirectoryMetadataSource::new(layout.meta.clone())),
        Box::new(LocalFilesystem::new()),
        Box::new(renderer),
        Box::new(ScriptRegistry::new()),
    ))
}
