//! `duo build`: one pipeline run.

use duo_bundler::BuildOutcome;

use crate::cli::BuildArgs;
use crate::commands::prepare;
use crate::error::{CliError, Result};
use crate::ui;

/// Run both passes once.
///
/// A failed pass has already been logged by the pipeline; it is returned
/// as [`CliError::BuildFailed`] so the process exits non-zero.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let mut prepared = prepare(&args.project)?;

    match prepared.pipeline.run().await {
        BuildOutcome::Succeeded(report) => {
            ui::print_build_report(&report);
            ui::success(&format!(
                "Wrote {}",
                prepared.pipeline.config().output_root().display()
            ));
            Ok(())
        }
        BuildOutcome::Failed { stage, error } => Err(CliError::BuildFailed { stage, error }),
    }
}
