//! Inflater - renders style files against metadata, optionally to disk.

use std::cell::Cell;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::{
    ApplicationError,
    ports::{Filesystem, TemplateRenderer},
};
use crate::domain::{ProjectLayout, RenderContext, Value};
use crate::error::MellResult;

/// Which style folder a render reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Template,
    Asset,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Asset => "asset",
        }
    }
}

/// Render handle given to generators and used by the template action.
///
/// Every `inflate_*` call renders one file from the style against the given
/// metadata node. With `to_file` the text is also written below the output
/// folder, creating directories as needed.
pub struct Inflater<'a> {
    filesystem: &'a dyn Filesystem,
    renderer: &'a dyn TemplateRenderer,
    layout: &'a ProjectLayout,
    context: &'a RenderContext,
    written: Cell<usize>,
}

impl<'a> Inflater<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        renderer: &'a dyn TemplateRenderer,
        layout: &'a ProjectLayout,
        context: &'a RenderContext,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            layout,
            context,
            written: Cell::new(0),
        }
    }

    /// Render a file from the template folder.
    pub fn inflate_template(
        &self,
        relpath: &str,
        meta: &Value,
        to_file: Option<&str>,
    ) -> MellResult<String> {
        self.inflate_from(SourceKind::Template, relpath, meta, to_file)
    }

    /// Render a file from the asset folder.
    pub fn inflate_asset(
        &self,
        relpath: &str,
        meta: &Value,
        to_file: Option<&str>,
    ) -> MellResult<String> {
        self.inflate_from(SourceKind::Asset, relpath, meta, to_file)
    }

    /// Same as [`Inflater::inflate_asset`].
    pub fn inflate(&self, relpath: &str, meta: &Value, to_file: Option<&str>) -> MellResult<String> {
        self.inflate_asset(relpath, meta, to_file)
    }

    /// Number of files written so far.
    pub fn written(&self) -> usize {
        self.written.get()
    }

    #[instrument(skip(self, kind, meta), fields(kind = kind.as_str()))]
    pub fn inflate_from(
        &self,
        kind: SourceKind,
        relpath: &str,
        meta: &Value,
        to_file: Option<&str>,
    ) -> MellResult<String> {
        let folder = match kind {
            SourceKind::Template => &self.layout.template,
            SourceKind::Asset => &self.layout.asset,
        };

        if !self.filesystem.is_dir(folder) {
            return Err(ApplicationError::SourceDirectoryMissing {
                kind: kind.as_str(),
                path: folder.clone(),
            }
            .into());
        }

        let path = join_inside(folder, relpath, kind.as_str())?;
        let source = self.filesystem.read_to_string(&path)?;
        let text = self.renderer.render(relpath, &source, meta, self.context)?;

        if let Some(target) = to_file {
            self.save(target, &text)?;
        }

        Ok(text)
    }

    fn save(&self, target: &str, text: &str) -> MellResult<()> {
        let path = join_inside(&self.layout.output, target, "output")?;
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&path, text)?;
        self.written.set(self.written.get() + 1);
        debug!(path = %path.display(), "Generated file");
        Ok(())
    }
}

/// Join a relative path onto one of the project folders, refusing to leave it.
fn join_inside(folder: &Path, relative: &str, folder_name: &str) -> MellResult<PathBuf> {
    let path = Path::new(relative);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if relative.is_empty() || escapes {
        return Err(ApplicationError::ValidationFailed(format!(
            "path '{relative}' must stay inside the {folder_name} folder"
        ))
        .into());
    }

    Ok(folder.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_paths_stay_inside() {
        let out = Path::new("/p/output");
        assert_eq!(
            join_inside(out, "a/b.txt", "output").unwrap(),
            PathBuf::from("/p/output/a/b.txt")
        );
        assert!(join_inside(out, "../evil", "output").is_err());
        assert!(join_inside(out, "/etc/passwd", "output").is_err());
        assert!(join_inside(out, "", "output").is_err());
    }

    #[test]
    fn style_files_outside_their_folder_are_refused() {
        let err = join_inside(Path::new("/p/style/template"), "../../secret", "template")
            .unwrap_err();
        assert!(err.to_string().contains("template folder"));
        assert!(join_inside(Path::new("/p/style/asset"), "/etc/hostname", "asset").is_err());
    }
}
