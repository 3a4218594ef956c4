use super::{BundlePlugin, PassInfo, PluginPhase, StagedOutput};
use crate::Result;
use crate::chunk::Chunk;
use crate::preload::build_preload_map;

/// Stages a fresh preload map for the pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreloadGraphBuilder;

impl PreloadGraphBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl BundlePlugin for PreloadGraphBuilder {
    fn name(&self) -> &'static str {
        "duo:preload-graph"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Graph
    }

    fn on_bundle_generated(
        &self,
        _pass: &PassInfo,
        chunks: &[Chunk],
        staged: &mut StagedOutput,
    ) -> Result<()> {
        let map = build_preload_map(chunks);
        tracing::debug!(entries = map.len(), "Built module preload map");
        staged.preload_map = Some(map);
        Ok(())
    }
}
