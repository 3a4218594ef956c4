use std::path::PathBuf;

use super::{MODERN_FILE_NAMES, PassSummary, run_pass};
use crate::Result;
use crate::audit::audit_modules;
use crate::engine::{Engine, EngineRequest, FileNameTemplate, OutputFormat};
use crate::pipeline::{PipelineConfig, PipelineContext};
use crate::plugins::{
    DuplicateChunkGuard, ManifestWriter, PassInfo, PassTarget, PluginRegistry,
    PreloadGraphBuilder, SizeReporter,
};
use crate::preload::write_preload_map;

/// Code-split ES module build with vendor chunks, module preload map and
/// conditional minification.
pub struct ModernCompiler {
    registry: PluginRegistry,
    request: EngineRequest,
    pass: PassInfo,
    out_dir: PathBuf,
    static_dir: PathBuf,
}

impl ModernCompiler {
    pub fn new(config: &PipelineConfig) -> Self {
        let registry = PluginRegistry::new()
            .with(DuplicateChunkGuard::new())
            .with(PreloadGraphBuilder::new())
            .with(SizeReporter::new())
            .with(ManifestWriter::new());

        let file_names = FileNameTemplate::new(MODERN_FILE_NAMES);
        let mode = config.mode;

        let request = EngineRequest {
            cwd: config.cwd.clone(),
            entries: config.entries.clone(),
            format: OutputFormat::Esm,
            file_names: file_names.clone(),
            mode,
            minify: mode.minify(),
            vendor_chunks: true,
            inline_dynamic_imports: false,
            dynamic_import_loader: mode
                .rewrite_dynamic_imports()
                .then(|| config.dynamic_import_loader.clone()),
            legacy: None,
        };

        let pass = PassInfo {
            target: PassTarget::Modern,
            entry_names: config.entries.iter().map(|e| e.name.clone()).collect(),
            file_names,
        };

        Self {
            registry,
            request,
            pass,
            out_dir: config.output_root(),
            static_dir: config.static_output_dir(),
        }
    }

    /// The request every modern pass sends to the engine.
    pub fn request(&self) -> &EngineRequest {
        &self.request
    }

    pub async fn compile<E: Engine>(
        &mut self,
        engine: &E,
        context: &mut PipelineContext<E::Cache>,
    ) -> Result<PassSummary> {
        let result = run_pass(
            engine,
            &mut self.registry,
            &self.pass,
            &self.request,
            &mut context.modern_cache,
            &self.static_dir,
        )
        .await?;

        let mut summary = result.summary(&self.pass);

        if let Some(map) = &result.staged.preload_map {
            write_preload_map(map, &self.out_dir)?;
        }

        // Commit: nothing below can fail.
        if let Some(map) = result.staged.preload_map {
            context.preload_map = map;
        }
        context
            .manifest
            .extend(result.staged.manifest_entries);
        context.modern_cache = result.cache;

        summary.duplicates = audit_modules(&result.output.modules);

        tracing::debug!(
            chunks = summary.chunks,
            from_cache = summary.from_cache,
            "Modern pass committed"
        );

        Ok(summary)
    }
}
