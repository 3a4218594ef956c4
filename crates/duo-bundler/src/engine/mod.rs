//! The bundling engine seam.
//!
//! Module resolution, transformation, chunking and minification belong to
//! the engine. The compilers only describe a pass through an
//! [`EngineRequest`] and consume the resulting [`EngineOutput`]. Each
//! compiler owns one [`Engine::Cache`] and threads it through every pass.

pub mod rolldown_engine;

pub use rolldown_engine::RolldownEngine;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::Result;
use crate::chunk::{Chunk, EmittedAsset, EntryPoint, ModuleRecord};
use crate::mode::ExecutionMode;

/// Module format of the emitted chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Code-split ES modules.
    Esm,
    /// One self-executing script per entry.
    Iife,
}

/// Output file-name template such as `[name]-[hash].mjs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileNameTemplate(String);

impl FileNameTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension of the final path segment including the dot, or `""`.
    pub fn extension(&self) -> &str {
        let file = self.0.rsplit('/').next().unwrap_or(&self.0);
        match file.rfind('.') {
            Some(idx) if idx > 0 => &file[idx..],
            _ => "",
        }
    }
}

impl std::fmt::Display for FileNameTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Syntax down-leveling for the legacy pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LegacyTransform {
    /// Compatibility baseline, e.g. `es2015`.
    pub target: String,
    /// Inject `core-js` imports for detected built-in usage.
    pub polyfills: bool,
}

/// Everything the engine needs to run one pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineRequest {
    pub cwd: PathBuf,
    pub entries: Vec<EntryPoint>,
    pub format: OutputFormat,
    pub file_names: FileNameTemplate,
    pub mode: ExecutionMode,
    pub minify: bool,
    /// Assign each third-party package to a chunk named after it.
    pub vendor_chunks: bool,
    pub inline_dynamic_imports: bool,
    /// Rewrite `import()` call sites to this loader when set.
    pub dynamic_import_loader: Option<String>,
    pub legacy: Option<LegacyTransform>,
}

/// What one engine pass produced.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub chunks: Vec<Chunk>,
    pub assets: Vec<EmittedAsset>,
    /// Every resolved module visited, including ones served from cache.
    pub modules: Vec<ModuleRecord>,
}

#[async_trait]
pub trait Engine: Send + Sync {
    /// Opaque incremental state carried from one pass to the next.
    type Cache: Default + Send;

    async fn bundle(&self, request: &EngineRequest, cache: &mut Self::Cache)
    -> Result<EngineOutput>;
}
