use super::{BundlePlugin, PassInfo, PluginPhase, StagedOutput};
use crate::Result;
use crate::chunk::Chunk;
use crate::manifest::manifest_key;

/// Stages `<logical name><extension> -> file name` for every chunk.
///
/// The extension comes from the pass's file-name template, so modern and
/// legacy builds of the same entry get distinct keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestWriter;

impl ManifestWriter {
    pub fn new() -> Self {
        Self
    }
}

impl BundlePlugin for ManifestWriter {
    fn name(&self) -> &'static str {
        "duo:manifest-writer"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Manifest
    }

    fn on_bundle_generated(
        &self,
        pass: &PassInfo,
        chunks: &[Chunk],
        staged: &mut StagedOutput,
    ) -> Result<()> {
        let extension = pass.file_names.extension();
        staged.manifest_entries.extend(
            chunks
                .iter()
                .map(|chunk| (manifest_key(&chunk.name, extension), chunk.file_name.clone())),
        );
        Ok(())
    }
}
