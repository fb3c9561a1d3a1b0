//! Errors the binary can end with, and how they reach the user.
//!
//! Every failure prints as a single `error:` line. With `-v` the cause
//! chain and the suggestions from `mell-core` follow it.

use std::error::Error;
use std::fmt::Write as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use mell_core::error::{ErrorCategory, MellError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// `mell.toml` (or `--config`) could not be read, parsed or queried.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error(transparent)]
    Core(#[from] MellError),

    /// Writing results to the terminal failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

// Only configuration loading goes through anyhow.
impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::ConfigError {
            message: format!("{err:#}"),
            source: Some(err.into()),
        }
    }
}

/// Process exit status, one per kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Internal = 1,
    /// Bad address, template, script or metadata content.
    Usage = 2,
    NotFound = 3,
    Configuration = 4,
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { .. } => vec![
                "Check mell.toml in the project root, or the file passed with --config".into(),
                "Run 'mell config list' to see the effective configuration".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::IoError { .. } => vec!["Check that stdout is still open".into()],
        }
    }

    pub fn status(&self) -> ExitStatus {
        match self {
            Self::ConfigError { .. } => ExitStatus::Configuration,
            Self::Core(core) => match core.category() {
                ErrorCategory::Validation | ErrorCategory::Script => ExitStatus::Usage,
                ErrorCategory::NotFound => ExitStatus::NotFound,
                ErrorCategory::Configuration => ExitStatus::Configuration,
                ErrorCategory::Internal => ExitStatus::Internal,
            },
            Self::IoError { .. } => ExitStatus::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.status() as u8
    }

    /// Text written to stderr when the command fails.
    pub fn report(&self, verbose: bool, colored: bool) -> String {
        let mut out = if colored {
            format!("{} {self}\n", "error:".red().bold())
        } else {
            format!("error: {self}\n")
        };
        if !verbose {
            return out;
        }

        let mut source = self.source();
        while let Some(cause) = source {
            if colored {
                let _ = writeln!(out, "  {}", format!("caused by: {cause}").dimmed());
            } else {
                let _ = writeln!(out, "  caused by: {cause}");
            }
            source = cause.source();
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            if colored {
                let _ = writeln!(out, "{}", "Suggestions:".yellow().bold());
            } else {
                out.push_str("Suggestions:\n");
            }
            for suggestion in suggestions {
                let _ = writeln!(out, "  {suggestion}");
            }
        }
        out
    }

    /// Internal failures are logged as errors; everything else is the user's to fix.
    pub fn log(&self) {
        if self.status() == ExitStatus::Internal {
            tracing::error!(error = %self, "Command failed");
        } else {
            tracing::debug!(error = %self, status = ?self.status(), "Command failed");
        }
    }
}
