//! `mell config` - inspect configuration values.

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::MellConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: MellConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.data(&value)?;
        }

        ConfigCommands::List => {
            let rendered = if output.format() == OutputFormat::Json {
                serde_json::to_string_pretty(&config).map_err(|e| config_error(e.to_string()))?
            } else {
                toml::to_string_pretty(&config).map_err(|e| config_error(e.to_string()))?
            };
            output.data(rendered.trim_end())?;
        }

        ConfigCommands::Path => match MellConfig::config_path() {
            Some(path) => output.data(&path.display().to_string())?,
            None => return Err(config_error("no home directory to keep a global config in")),
        },
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key such as `layout.style` or `delimiters.variable_start`.
fn get_config_value(config: &MellConfig, key: &str) -> CliResult<String> {
    let table = config.to_table()?;
    let mut parts = key.split('.');
    let first = parts.next().unwrap_or_default();

    let mut current = table.get(first);
    for part in parts {
        current = current.and_then(|value| value.get(part));
    }

    match current {
        Some(toml::Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(config_error(format!("Unknown config key: '{key}'"))),
    }
}

fn config_error(message: impl Into<String>) -> CliError {
    CliError::ConfigError {
        message: message.into(),
        source: None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mell_core::domain::Action;

    #[test]
    fn get_known_key() {
        let cfg = MellConfig::default();
        assert_eq!(get_config_value(&cfg, "layout.style").unwrap(), "style");
        assert_eq!(
            get_config_value(&cfg, "delimiters.variable_start").unwrap(),
            "|="
        );
    }

    #[test]
    fn get_non_string_value() {
        let mut cfg = MellConfig::default();
        cfg.generate.actions = vec![Action::Clean, Action::Template];
        let value = get_config_value(&cfg, "generate.actions").unwrap();
        assert!(value.starts_with('['));
        assert!(value.contains("\"clean\""));
        assert!(value.contains("\"template\""));
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = MellConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
        assert!(get_config_value(&cfg, "layout.style.deeper").is_err());
    }
}
