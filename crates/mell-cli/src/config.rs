//! Application configuration.
//!
//! [`MellConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only receives the values derived
//! from it (layout, delimiters, actions).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `--config FILE`, else `mell.toml` in the project root, else the global
//!    config file
//! 3. Built-in defaults (always present)
//!
//! ```toml
//! [layout]
//! style = "themes/default"
//!
//! [delimiters]
//! variable_start = "{{"
//! variable_end = "}}"
//!
//! [generate]
//! actions = ["clean", "template"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mell_core::domain::{Action, Delimiters};

/// Name of the per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "mell.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MellConfig {
    /// Folder names, relative to the root (or to the style folder for the
    /// four style subfolders).
    pub layout: LayoutNames,
    /// Template delimiters.
    pub delimiters: Delimiters,
    /// `generate` defaults.
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutNames {
    pub meta: String,
    pub output: String,
    pub style: String,
    pub template: String,
    pub asset: String,
    pub migration: String,
    pub generator: String,
}

impl Default for LayoutNames {
    fn default() -> Self {
        Self {
            meta: "meta".into(),
            output: "output".into(),
            style: "style".into(),
            template: "template".into(),
            asset: "asset".into(),
            migration: "migration".into(),
            generator: "generator".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Actions run when `--do` is not given. Empty means all of them.
    pub actions: Vec<Action>,
}

impl MellConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `explicit` is the path passed via `--config`; it must exist. Without
    /// it, `mell.toml` under `root` is used when present, then the global
    /// config file.
    pub fn load(explicit: Option<&Path>, root: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let project = root
            .unwrap_or_else(|| Path::new("."))
            .join(PROJECT_CONFIG_FILE);
        let candidates = [Some(project), Self::config_path()];

        match candidates.into_iter().flatten().find(|path| path.is_file()) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse one TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.delimiters.validate()?;
        Ok(config)
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mell", "mell")
            .map(|d| d.config_dir().join("config.toml"))
    }

    /// The configuration as a TOML table, for `config get` and `config list`.
    pub fn to_table(&self) -> anyhow::Result<toml::Table> {
        let text = toml::to_string(self)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn default_layout_names() {
        let cfg = MellConfig::default();
        assert_eq!(cfg.layout.style, "style");
        assert_eq!(cfg.layout.generator, "generator");
        assert!(cfg.generate.actions.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = MellConfig::from_toml(
            r#"
            [layout]
            style = "themes/web"

            [delimiters]
            variable_start = "{{"
            variable_end = "}}"

            [generate]
            actions = ["clean", "template"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.layout.style, "themes/web");
        assert_eq!(cfg.layout.meta, "meta");
        assert_eq!(cfg.delimiters.variable_start, "{{");
        assert_eq!(cfg.delimiters.comment_start, "|#");
        assert_eq!(cfg.generate.actions, vec![Action::Clean, Action::Template]);
    }

    #[test]
    fn unknown_keys_and_bad_delimiters_are_errors() {
        assert!(MellConfig::from_toml("[layout]\nstyles = \"x\"").is_err());
        assert!(MellConfig::from_toml("[delimiters]\nvariable_start = \"|?\"").is_err());
    }

    #[test]
    fn project_file_is_picked_up() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "[layout]\noutput = \"dist\"\n",
        )
        .unwrap();

        let cfg = MellConfig::load(None, Some(temp.path())).unwrap();
        assert_eq!(cfg.layout.output, "dist");
    }

    #[test]
    fn explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        assert!(MellConfig::load(Some(&temp.path().join("nope.toml")), None).is_err());
    }

    #[test]
    fn table_has_sections() {
        let table = MellConfig::default().to_table().unwrap();
        assert!(table.contains_key("layout"));
        assert!(table.contains_key("delimiters"));
    }
}
