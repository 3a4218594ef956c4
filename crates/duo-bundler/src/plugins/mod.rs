//! Build observers that run over the chunk set of each pass.
//!
//! Plugins never touch shared state directly. They record what they derive
//! into a [`StagedOutput`], and the compiler commits it to the pipeline
//! context once every file of the pass is on disk.

pub mod duplicate_guard;
pub mod manifest_writer;
pub mod preload_graph;
pub mod registry;
pub mod size_reporter;

pub use duplicate_guard::DuplicateChunkGuard;
pub use manifest_writer::ManifestWriter;
pub use preload_graph::PreloadGraphBuilder;
pub use registry::{PluginPhase, PluginRegistry};
pub use size_reporter::SizeReporter;

use crate::Result;
use crate::chunk::Chunk;
use crate::engine::FileNameTemplate;
use crate::preload::PreloadMap;
use crate::size::SizeReport;

/// Which compiler a pass belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassTarget {
    Modern,
    Legacy,
}

impl std::fmt::Display for PassTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassTarget::Modern => write!(f, "modern"),
            PassTarget::Legacy => write!(f, "legacy"),
        }
    }
}

/// What a plugin knows about the pass it observes.
#[derive(Debug, Clone)]
pub struct PassInfo {
    pub target: PassTarget,
    /// Configured entry names of this pass.
    pub entry_names: Vec<String>,
    pub file_names: FileNameTemplate,
}

/// Results of one pass, held back until the pass has fully succeeded.
#[derive(Debug, Clone, Default)]
pub struct StagedOutput {
    /// Manifest upserts, in chunk order.
    pub manifest_entries: Vec<(String, String)>,
    pub preload_map: Option<PreloadMap>,
    pub size_report: Option<SizeReport>,
}

/// Observer over the build lifecycle.
///
/// Hooks run synchronously, once per pass, in phase order. An error from
/// any hook aborts the pass before its output is written.
pub trait BundlePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn phase(&self) -> PluginPhase;

    fn on_build_start(&self, _pass: &PassInfo) -> Result<()> {
        Ok(())
    }

    fn on_bundle_generated(
        &self,
        pass: &PassInfo,
        chunks: &[Chunk],
        staged: &mut StagedOutput,
    ) -> Result<()>;
}
