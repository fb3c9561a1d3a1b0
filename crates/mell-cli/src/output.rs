//! Terminal output.
//!
//! Results (`show`, `config get`) are always printed. Status lines are
//! dropped under `--quiet` and in JSON mode, so stdout stays parseable.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::{OwoColorize, Style};

use crate::cli::global::{GlobalArgs, OutputFormat};

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    colored: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs) -> Self {
        let format = args.output_format.resolve(io::stdout().is_terminal());
        Self {
            format,
            quiet: args.quiet,
            colored: format == OutputFormat::Human && !args.no_color,
            term: Term::stdout(),
        }
    }

    /// Resolved format, never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn data(&self, text: &str) -> io::Result<()> {
        self.term.write_line(text)
    }

    /// Section title printed ahead of a result.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.colored {
            self.term.write_line(&text.cyan().bold().to_string())
        } else {
            self.term.write_line(text)
        }
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status('\u{2713}', Style::new().green(), msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status('\u{26a0}', Style::new().yellow(), msg)
    }

    fn shows_status(&self) -> bool {
        !self.quiet && self.format != OutputFormat::Json
    }

    fn status(&self, mark: char, style: Style, msg: &str) -> io::Result<()> {
        if !self.shows_status() {
            return Ok(());
        }
        let line = if self.colored {
            format!("{} {}", mark.style(style.bold()), msg.style(style))
        } else {
            format!("{mark} {msg}")
        };
        self.term.write_line(&line)
    }
}
