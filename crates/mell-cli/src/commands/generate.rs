//! Implementation of the `mell generate` command.
//!
//! Responsibility: translate CLI arguments into an `Invocation`, call the
//! core generate service, and report what it did.

use serde_json::json;
use tracing::{info, instrument};

use mell_core::application::GenerationSummary;

use crate::{
    cli::{GenerateArgs, OutputFormat},
    commands::session,
    config::MellConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute the `mell generate` command.
///
/// Actions come from `--do`, else from the configuration, else the
/// default sequence (clean, template, generator).
#[instrument(skip_all, fields(metadata = %args.project.metadata))]
pub fn execute(args: GenerateArgs, config: MellConfig, output: OutputManager) -> CliResult<()> {
    let mut invocation = session::invocation(&args.project, &config);
    invocation.actions = if args.actions.is_empty() {
        config.generate.actions.clone()
    } else {
        args.actions
    };

    let delimiters = session::delimiters(&args.delimiters, &config.delimiters);
    let service = session::service(&invocation.layout, delimiters)?;

    let summary = service.generate(&invocation)?;
    info!(
        files = summary.files_written,
        templates = summary.templates,
        generators = summary.generators,
        "Generate finished"
    );

    report(&summary, &invocation.layout.output.display().to_string(), &output)
}

fn report(summary: &GenerationSummary, output_dir: &str, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let actions: Vec<_> = summary.actions.iter().map(|a| a.as_str()).collect();
        let failed: Vec<_> = summary
            .set_report
            .failures
            .iter()
            .map(|f| json!({"address": f.address, "error": f.error.to_string()}))
            .collect();
        let body = json!({
            "output": output_dir,
            "actions": actions,
            "migrations": summary.migrations,
            "templates": summary.templates,
            "generators": summary.generators,
            "files_written": summary.files_written,
            "set_operations": {
                "applied": summary.set_report.applied,
                "failed": failed,
            },
        });
        output.data(&body.to_string())?;
        return Ok(());
    }

    if !summary.set_report.is_clean() {
        output.warning(&format!(
            "{} set operation(s) were skipped",
            summary.set_report.failures.len()
        ))?;
    }

    output.success(&format!(
        "Generated {} file(s) in {}",
        summary.files_written, output_dir
    ))?;
    Ok(())
}
