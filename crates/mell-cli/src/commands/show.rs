//! `mell show` - print the metadata a `generate` run would see.

use tracing::instrument;

use mell_core::error::MellError;

use crate::{
    cli::{OutputFormat, ShowArgs},
    commands::session,
    config::MellConfig,
    error::CliResult,
    output::OutputManager,
};

/// Resolve without running any action and print the tree as pretty JSON.
#[instrument(skip_all, fields(metadata = %args.project.metadata))]
pub fn execute(args: ShowArgs, config: MellConfig, output: OutputManager) -> CliResult<()> {
    let invocation = session::invocation(&args.project, &config);
    let service = session::service(&invocation.layout, config.delimiters.clone())?;

    let resolution = service.resolve(&invocation)?;
    let pretty = serde_json::to_string_pretty(&resolution.tree).map_err(|e| MellError::Internal {
        message: format!("could not serialize metadata: {e}"),
    })?;

    if output.format() != OutputFormat::Json {
        output.header("Metadata:")?;
    }
    output.data(&pretty)?;
    Ok(())
}
