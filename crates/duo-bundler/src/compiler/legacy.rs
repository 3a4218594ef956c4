use std::path::PathBuf;

use super::{LEGACY_FILE_NAMES, PassSummary, run_pass};
use crate::Result;
use crate::chunk::EntryPoint;
use crate::engine::{Engine, EngineRequest, FileNameTemplate, LegacyTransform, OutputFormat};
use crate::pipeline::{PipelineConfig, PipelineContext};
use crate::plugins::{ManifestWriter, PassInfo, PassTarget, PluginRegistry, SizeReporter};

/// One self-contained IIFE bundle per legacy entry: dynamic imports
/// inlined, no code splitting, syntax down-leveled with polyfills.
///
/// Every entry is its own engine pass with its own cache, so each one
/// yields exactly one file.
pub struct LegacyCompiler {
    registry: PluginRegistry,
    entries: Vec<EntryPoint>,
    base: EngineRequest,
    file_names: FileNameTemplate,
    static_dir: PathBuf,
}

impl LegacyCompiler {
    pub fn new(config: &PipelineConfig) -> Self {
        let registry = PluginRegistry::new()
            .with(SizeReporter::new())
            .with(ManifestWriter::new());

        let file_names = FileNameTemplate::new(LEGACY_FILE_NAMES);
        let mode = config.mode;

        let base = EngineRequest {
            cwd: config.cwd.clone(),
            entries: Vec::new(),
            format: OutputFormat::Iife,
            file_names: file_names.clone(),
            mode,
            minify: mode.minify(),
            vendor_chunks: false,
            inline_dynamic_imports: true,
            dynamic_import_loader: None,
            legacy: Some(LegacyTransform {
                target: config.legacy_target.clone(),
                polyfills: true,
            }),
        };

        Self {
            registry,
            entries: config.legacy_entry_points(),
            base,
            file_names,
            static_dir: config.static_output_dir(),
        }
    }

    pub fn entries(&self) -> &[EntryPoint] {
        &self.entries
    }

    /// Request for a single legacy entry.
    pub fn request_for(&self, entry: &EntryPoint) -> EngineRequest {
        EngineRequest {
            entries: vec![entry.clone()],
            ..self.base.clone()
        }
    }

    pub async fn compile<E: Engine>(
        &mut self,
        engine: &E,
        context: &mut PipelineContext<E::Cache>,
    ) -> Result<Vec<PassSummary>> {
        let mut summaries = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let pass = PassInfo {
                target: PassTarget::Legacy,
                entry_names: vec![entry.name.clone()],
                file_names: self.file_names.clone(),
            };
            let request = self.request_for(entry);
            let cache = context.legacy_caches.entry(entry.name.clone()).or_default();

            let result = run_pass(
                engine,
                &mut self.registry,
                &pass,
                &request,
                cache,
                &self.static_dir,
            )
            .await?;

            if result.output.chunks.len() != 1 {
                tracing::warn!(
                    entry = %entry.name,
                    chunks = result.output.chunks.len(),
                    "Legacy pass emitted more than one chunk"
                );
            }

            let summary = result.summary(&pass);
            context.manifest.extend(result.staged.manifest_entries);
            *cache = result.cache;

            summaries.push(summary);
        }

        Ok(summaries)
    }
}
