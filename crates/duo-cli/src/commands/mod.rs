//! Command implementations for the duo CLI.
//!
//! - [`build`] - run the pipeline once
//! - [`watch`] - run the pipeline on every source change
//!
//! Both commands resolve configuration the same way and share one pipeline
//! type; they differ only in how often they call [`Pipeline::run`].

pub mod build;
pub mod watch;

use std::path::PathBuf;

use duo_bundler::{Pipeline, RolldownEngine};

use crate::cli::ProjectArgs;
use crate::config::DuoConfig;
use crate::error::Result;

pub use build::execute as build_execute;
pub use watch::execute as watch_execute;

/// Project root and a ready pipeline for a command.
pub(crate) struct Prepared {
    pub root: PathBuf,
    pub pipeline: Pipeline<RolldownEngine>,
}

/// Load and validate configuration relative to the current directory, then
/// build the pipeline.
pub(crate) fn prepare(args: &ProjectArgs) -> Result<Prepared> {
    let base = std::env::current_dir()?;
    prepare_in(args, &base)
}

pub(crate) fn prepare_in(args: &ProjectArgs, base: &std::path::Path) -> Result<Prepared> {
    let config = DuoConfig::load(args, base)?;
    config.validate()?;

    let root = config.project_root(base);
    config.check_entries_exist(&root)?;

    let pipeline_config = config.to_pipeline_config(&root);
    tracing::debug!(
        root = %root.display(),
        out_dir = %pipeline_config.output_root().display(),
        mode = %pipeline_config.mode,
        entries = pipeline_config.entries.len(),
        "Resolved configuration"
    );

    let pipeline = Pipeline::new(RolldownEngine::new(), pipeline_config)?;
    Ok(Prepared {
        root,
        pipeline,
    })
}
