//! Modern and legacy bundle compilers.
//!
//! A compiler turns pipeline configuration into engine requests, runs its
//! plugins over each pass and commits the staged results. Shared state in
//! the [`PipelineContext`](crate::pipeline::PipelineContext) is only touched
//! after every file of a pass has been written.

mod legacy;
mod modern;

pub use legacy::LegacyCompiler;
pub use modern::ModernCompiler;

use std::path::{Path, PathBuf};

use crate::Result;
use crate::audit::DuplicatePackage;
use crate::engine::{Engine, EngineOutput, EngineRequest};
use crate::output::write_pass_output;
use crate::plugins::{PassInfo, PassTarget, PluginRegistry, StagedOutput};
use crate::size::SizeReport;

/// Extension of modern chunks and their manifest keys.
pub const MODERN_EXTENSION: &str = ".mjs";
/// Extension of legacy bundles and their manifest keys.
pub const LEGACY_EXTENSION: &str = ".js";

pub(crate) const MODERN_FILE_NAMES: &str = "[name]-[hash].mjs";
pub(crate) const LEGACY_FILE_NAMES: &str = "[name]-[hash].js";

/// What one successful pass produced.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub target: PassTarget,
    pub entries: Vec<String>,
    pub chunks: usize,
    /// Absolute paths of every file written.
    pub files: Vec<PathBuf>,
    /// Every module came from the incremental cache.
    pub from_cache: bool,
    pub size: Option<SizeReport>,
    /// Duplicate-package findings (modern pass only).
    pub duplicates: Vec<DuplicatePackage>,
}

/// Output of [`run_pass`], not yet committed.
pub(crate) struct PassResult<C> {
    pub output: EngineOutput,
    pub staged: StagedOutput,
    pub files: Vec<PathBuf>,
    /// Cache to hand back to the context once the pass is committed.
    pub cache: C,
}

impl<C> PassResult<C> {
    pub fn summary(&self, pass: &PassInfo) -> PassSummary {
        PassSummary {
            target: pass.target,
            entries: pass.entry_names.clone(),
            chunks: self.output.chunks.len(),
            files: self.files.clone(),
            from_cache: !self.output.modules.is_empty()
                && self.output.modules.iter().all(|m| m.from_cache),
            size: self.staged.size_report.clone(),
            duplicates: Vec::new(),
        }
    }
}

/// Run one engine pass: build start, bundle, plugins, then write files.
///
/// `cache` is moved out for the duration of the pass. It is returned inside
/// the [`PassResult`] and left empty on failure, so a failed pass never
/// leaves half-updated incremental state behind.
pub(crate) async fn run_pass<E: Engine>(
    engine: &E,
    registry: &mut PluginRegistry,
    pass: &PassInfo,
    request: &EngineRequest,
    cache: &mut E::Cache,
    static_dir: &Path,
) -> Result<PassResult<E::Cache>> {
    let mut working = std::mem::take(cache);

    registry.build_start(pass)?;

    let output = engine.bundle(request, &mut working).await?;

    // Plugins run before anything touches the disk; a guard violation
    // leaves the output directory untouched.
    let staged = registry.bundle_generated(pass, &output.chunks)?;

    let files = write_pass_output(static_dir, &output.chunks, &output.assets)?;

    Ok(PassResult {
        output,
        staged,
        files,
        cache: working,
    })
}
