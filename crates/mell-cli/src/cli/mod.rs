//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use mell_core::domain::Action;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "mell",
    bin_name = "mell",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate anything from JSON metadata and template files",
    long_about = "mell merges layered JSON metadata documents, lets migration \
                  scripts edit the result, then renders templates and runs \
                  generator scripts against it.",
    after_help = "EXAMPLES:\n\
        \x20 mell generate shop\n\
        \x20 mell generate base,shop --set user.age:int 18 --do template\n\
        \x20 mell show shop --set extra more\n\
        \x20 mell completions bash > /usr/share/bash-completion/completions/mell",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve the metadata and run the actions.
    #[command(
        visible_alias = "g",
        about = "Resolve the metadata and generate the output",
        after_help = "EXAMPLES:\n\
            \x20 mell generate shop\n\
            \x20 mell generate shop --root ./site --do clean,template\n\
            \x20 mell generate shop --var release=2.1 --set version:float 2.1"
    )]
    Generate(GenerateArgs),

    /// Print the resolved metadata.
    #[command(
        about = "Print the metadata after set operations and migrations",
        after_help = "EXAMPLES:\n\
            \x20 mell show shop\n\
            \x20 mell show base,shop --set \"user.backpack[1]\" keys"
    )]
    Show(ShowArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 mell completions bash > ~/.local/share/bash-completion/completions/mell\n\
            \x20 mell completions zsh  > ~/.zfunc/_mell\n\
            \x20 mell completions fish > ~/.config/fish/completions/mell.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the mell configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 mell config get layout.style\n\
            \x20 mell config list\n\
            \x20 mell config path"
    )]
    Config(ConfigCommands),
}

impl Commands {
    /// Project root named on the command line, if the command has one.
    pub fn root(&self) -> Option<&Path> {
        match self {
            Self::Generate(args) => args.project.layout.root.as_deref(),
            Self::Show(args) => args.project.layout.root.as_deref(),
            Self::Completions(_) | Self::Config(_) => None,
        }
    }
}

// ── shared project arguments ──────────────────────────────────────────────────

/// What to load and how to edit it; shared by `generate` and `show`.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Comma-joined metadata document names.
    #[arg(
        value_name = "METADATA",
        default_value = "",
        hide_default_value = true,
        help = "Metadata documents to merge, comma separated (e.g. base,shop)"
    )]
    pub metadata: String,

    /// Set operations, applied in order after loading.
    #[arg(
        long = "set",
        num_args = 2,
        value_names = ["ADDRESS[:TYPE]", "VALUE"],
        allow_hyphen_values = true,
        action = clap::ArgAction::Append,
        help = "Assign VALUE at ADDRESS; TYPE is str, int, float, bool or bytes"
    )]
    pub set: Vec<String>,

    /// Extra template variables.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Template variable, visible as |= KEY =|"
    )]
    pub vars: Vec<(String, String)>,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

impl ProjectArgs {
    /// `--set` values as `(target, raw)` pairs.
    pub fn set_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.set
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Directory overrides. Unset directories follow the configured layout.
#[derive(Debug, Default, Args)]
pub struct LayoutArgs {
    #[arg(long, value_name = "DIR", help = "Project root (default: current directory)")]
    pub root: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Metadata folder")]
    pub meta: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Output folder")]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Style folder")]
    pub style: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Template folder")]
    pub template: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Asset folder")]
    pub asset: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Migration folder")]
    pub migration: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Generator folder")]
    pub generator: Option<PathBuf>,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `mell generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Actions to run, in order.
    #[arg(
        long = "do",
        value_name = "ACTION",
        value_delimiter = ',',
        help = "Actions to run: clean, template, generator (default: all, in that order)"
    )]
    pub actions: Vec<Action>,

    #[command(flatten)]
    pub delimiters: DelimiterArgs,
}

/// Template delimiter overrides.
#[derive(Debug, Default, Args)]
pub struct DelimiterArgs {
    #[arg(long, value_name = "MARKER", help = "Start of a control block")]
    pub block_start: Option<String>,

    #[arg(long, value_name = "MARKER", help = "End of a control block")]
    pub block_end: Option<String>,

    #[arg(long, value_name = "MARKER", help = "Start of a variable")]
    pub variable_start: Option<String>,

    #[arg(long, value_name = "MARKER", help = "End of a variable")]
    pub variable_end: Option<String>,

    #[arg(long, value_name = "MARKER", help = "Start of a comment")]
    pub comment_start: Option<String>,

    #[arg(long, value_name = "MARKER", help = "End of a comment")]
    pub comment_end: Option<String>,
}

// ── show ──────────────────────────────────────────────────────────────────────

/// Arguments for `mell show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `mell completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `mell config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `layout.style`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path of the global configuration file.
    Path,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "mell", "g", "base,shop", "--root", "/p", "--do", "clean,template", "--var",
            "release=2.1",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.project.metadata, "base,shop");
        assert_eq!(args.actions, vec![Action::Clean, Action::Template]);
        assert_eq!(args.project.vars, vec![("release".to_owned(), "2.1".to_owned())]);
        assert_eq!(args.project.layout.root.as_deref(), Some(Path::new("/p")));
    }

    #[test]
    fn set_takes_address_and_value() {
        let cli = Cli::parse_from([
            "mell", "show", "data", "--set", "user.age:int", "-3", "--set", "extra", "more",
        ]);
        let Commands::Show(args) = cli.command else {
            panic!("expected Show command");
        };
        let pairs: Vec<_> = args.project.set_pairs().collect();
        assert_eq!(pairs, vec![("user.age:int", "-3"), ("extra", "more")]);
    }

    #[test]
    fn metadata_is_optional() {
        let cli = Cli::parse_from(["mell", "show"]);
        let Commands::Show(args) = cli.command else {
            panic!("expected Show command");
        };
        assert_eq!(args.project.metadata, "");
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(Cli::try_parse_from(["mell", "generate", "x", "--do", "deploy"]).is_err());
    }

    #[test]
    fn var_requires_equals() {
        assert!(parse_key_value("release").is_err());
        assert!(parse_key_value("=x").is_err());
        assert_eq!(
            parse_key_value("url=a=b").unwrap(),
            ("url".to_owned(), "a=b".to_owned())
        );
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["mell", "--quiet", "--verbose", "show", "x"]);
        assert!(result.is_err());
    }
}
