//! Where a project keeps its metadata, style and output, and what to do with them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Directories of one mell project.
///
/// ```text
/// root/
/// ├── meta/            <name>.json documents
/// ├── output/          generated files
/// └── style/
///     ├── template/    rendered 1:1 into output/
///     ├── asset/       rendered on demand by generators
///     ├── migration/   scripts that edit the metadata
///     └── generator/   scripts that render assets
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub meta: PathBuf,
    pub output: PathBuf,
    pub style: PathBuf,
    pub template: PathBuf,
    pub asset: PathBuf,
    pub migration: PathBuf,
    pub generator: PathBuf,
}

impl ProjectLayout {
    /// The conventional layout under `root`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let style = root.join("style");
        Self {
            meta: root.join("meta"),
            output: root.join("output"),
            template: style.join("template"),
            asset: style.join("asset"),
            migration: style.join("migration"),
            generator: style.join("generator"),
            style,
            root,
        }
    }

    /// Re-derive the four style subdirectories from a new style directory.
    pub fn with_style(mut self, style: impl Into<PathBuf>) -> Self {
        let style = style.into();
        self.template = style.join("template");
        self.asset = style.join("asset");
        self.migration = style.join("migration");
        self.generator = style.join("generator");
        self.style = style;
        self
    }

    /// Resolve a layout-relative path against the output directory.
    pub fn output_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.output.join(relative)
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::under(".")
    }
}

/// A step of the `generate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Remove and recreate the output directory.
    Clean,
    /// Render every template file into the output directory.
    Template,
    /// Run every generator script.
    Generator,
}

impl Action {
    /// Actions run when none are requested, in this order.
    pub const DEFAULT_SEQUENCE: [Action; 3] = [Action::Clean, Action::Template, Action::Generator];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Template => "template",
            Self::Generator => "generator",
        }
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clean" => Ok(Self::Clean),
            "template" | "templates" => Ok(Self::Template),
            "generator" | "generators" | "plugin" => Ok(Self::Generator),
            other => Err(DomainError::UnknownAction(other.to_owned())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
