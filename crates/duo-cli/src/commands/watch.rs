//! `duo watch`: rebuild on every source change.
//!
//! Runs are strictly sequential: changes that arrive during a build are
//! collected by the watcher and trigger exactly one more run. A failed run
//! is reported and the loop keeps going; only Ctrl+C or a dead watcher end
//! the command. The configuration is read once, so a configuration error
//! asks for a restart instead of a source change.

use std::time::Duration;

use duo_bundler::{BuildOutcome, BuildStage, Engine, Error, Pipeline};

use crate::cli::WatchArgs;
use crate::commands::prepare;
use crate::error::Result;
use crate::ui;
use crate::watcher::{FileChange, FileWatcher, next_batch};

pub async fn execute(args: WatchArgs) -> Result<()> {
    let mut prepared = prepare(&args.project)?;
    let out_dir = prepared.pipeline.config().output_root();

    let (watcher, mut rx) = FileWatcher::new(prepared.root.clone(), vec![out_dir])?;
    let quiet_period = Duration::from_millis(args.debounce);

    run_once(&mut prepared.pipeline, "Initial build").await;
    ui::info(&format!(
        "Watching {} for changes (Ctrl+C to stop)",
        watcher.root().display()
    ));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                ui::info("Stopping watcher");
                break;
            }
            batch = next_batch(&mut rx, quiet_period) => {
                let Some(changes) = batch else {
                    tracing::warn!("File watcher stopped");
                    break;
                };
                run_once(&mut prepared.pipeline, &describe(&changes)).await;
            }
        }
    }

    Ok(())
}

/// One run whose failure never ends the watch loop.
async fn run_once<E: Engine>(pipeline: &mut Pipeline<E>, reason: &str) {
    tracing::info!("{}", reason);
    match pipeline.run().await {
        BuildOutcome::Succeeded(report) => {
            ui::print_build_report(&report);
        }
        BuildOutcome::Failed { stage, error } => {
            ui::error(&failure_message(stage, &error));
        }
    }
}

fn failure_message(stage: BuildStage, error: &Error) -> String {
    if error.is_pass_fatal() {
        format!("Build failed during the {stage} pass; waiting for changes")
    } else {
        format!("Build failed during the {stage} pass; fix the configuration and restart")
    }
}

fn describe(changes: &[FileChange]) -> String {
    match changes {
        [single] => format!("Rebuilding: {} changed", single.path().display()),
        _ => format!("Rebuilding: {} files changed", changes.len()),
    }
}
