//! Production engine backed by Rolldown.
//!
//! Each pass builds a fresh Rolldown bundler from the request:
//!
//! - `BuildModePlugin` substitutes `process.env.NODE_ENV`
//! - every `node_modules` module lands in a vendor chunk named after its
//!   package
//! - legacy passes add `PolyfillPlugin`, emit IIFE with dynamic imports
//!   inlined, and down-level every chunk through `oxc_transformer`
//! - modern passes outside development route `import()` through the loader
//!
//! Down-leveling and the loader rewrite happen in `render_chunk`, ahead of
//! content hashing. Legacy passes leave minification to the down-level
//! codegen because Rolldown's minifier runs after that hook and targets
//! modern syntax.

mod build_mode;
mod cache;
mod dynamic_import;
mod legacy;
mod post_process;
mod vendor;

pub use cache::{RequestKey, RolldownCache};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, OutputFormat as RolldownFormat, Platform,
    RawMinifyOptions, ResolveOptions,
};
use rolldown_common::{Output, StrOrBytes};
use rolldown_plugin::__inner::SharedPluginable;

use self::build_mode::BuildModePlugin;
use self::legacy::PolyfillPlugin;
use self::post_process::ChunkPostProcessPlugin;
use super::{Engine, EngineOutput, EngineRequest, OutputFormat};
use crate::chunk::{Chunk, EmittedAsset, ModuleRecord};
use crate::{Error, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct RolldownEngine;

impl RolldownEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for RolldownEngine {
    type Cache = RolldownCache;

    async fn bundle(
        &self,
        request: &EngineRequest,
        cache: &mut Self::Cache,
    ) -> Result<EngineOutput> {
        let key = RequestKey::compute(request);
        if let Some(hit) = cache.lookup(&key) {
            tracing::debug!(key = %key.to_hex(), "Reusing cached pass");
            return Ok(hit);
        }

        let started = Instant::now();
        let options = bundler_options(request)?;
        let plugins = engine_plugins(request)?;

        let mut bundler = BundlerBuilder::default()
            .with_options(options)
            .with_plugins(plugins)
            .build()
            .map_err(|e| Error::from_rolldown_batch(&e))?;

        let bundle = bundler
            .generate()
            .await
            .map_err(|e| Error::from_rolldown_batch(&e))?;

        let output = convert_outputs(&bundle.assets);

        tracing::debug!(
            chunks = output.chunks.len(),
            modules = output.modules.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rolldown pass finished"
        );

        cache.store(key, &output);
        Ok(output)
    }
}

fn bundler_options(request: &EngineRequest) -> Result<BundlerOptions> {
    let input = request
        .entries
        .iter()
        .map(|entry| InputItem {
            name: Some(entry.name.clone()),
            import: entry_import(&request.cwd, &entry.path),
        })
        .collect();

    let format = match request.format {
        OutputFormat::Esm => RolldownFormat::Esm,
        OutputFormat::Iife => RolldownFormat::Iife,
    };

    let template = request.file_names.as_str().to_string();

    let mut options = BundlerOptions {
        input: Some(input),
        cwd: Some(request.cwd.clone()),
        format: Some(format),
        platform: Some(Platform::Browser),
        resolve: Some(browser_resolution(&request.cwd)),
        entry_filenames: Some(template.clone().into()),
        chunk_filenames: Some(template.into()),
        ..Default::default()
    };

    if request.minify && request.legacy.is_none() {
        options.minify = Some(RawMinifyOptions::from(true));
    }

    if request.inline_dynamic_imports {
        options.inline_dynamic_imports = Some(true);
    }

    if request.vendor_chunks {
        options.advanced_chunks = Some(vendor::vendor_chunk_options()?);
    }

    Ok(options)
}

fn entry_import(cwd: &Path, path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    absolute.to_string_lossy().into_owned()
}

/// Resolution for browser bundles: walk `node_modules` up from the project
/// root and prefer browser/module fields over `main`.
fn browser_resolution(cwd: &Path) -> ResolveOptions {
    let mut modules = Vec::new();
    let mut current: Option<&Path> = Some(cwd);
    while let Some(dir) = current {
        modules.push(dir.join("node_modules").to_string_lossy().to_string());
        current = dir.parent();
    }
    modules.push("node_modules".to_string());

    ResolveOptions {
        main_fields: Some(vec![
            "browser".to_string(),
            "module".to_string(),
            "main".to_string(),
        ]),
        condition_names: Some(vec![
            "browser".to_string(),
            "import".to_string(),
            "module".to_string(),
            "default".to_string(),
        ]),
        extensions: Some(vec![
            ".js".to_string(),
            ".mjs".to_string(),
            ".cjs".to_string(),
            ".jsx".to_string(),
            ".ts".to_string(),
            ".tsx".to_string(),
            ".json".to_string(),
        ]),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

fn engine_plugins(request: &EngineRequest) -> Result<Vec<SharedPluginable>> {
    let mut plugins: Vec<SharedPluginable> = vec![Arc::new(BuildModePlugin::new(request.mode)?)];

    if let Some(legacy) = &request.legacy {
        if legacy.polyfills {
            let polyfills = PolyfillPlugin::new(&request.cwd)?;
            if !polyfills.is_empty() {
                plugins.push(Arc::new(polyfills));
            }
        }
    }

    if let Some(post_process) = ChunkPostProcessPlugin::for_request(request) {
        plugins.push(Arc::new(post_process));
    }

    Ok(plugins)
}

/// Convert Rolldown's output list. Module records are gathered from every
/// chunk's module ids, first occurrence wins.
fn convert_outputs(outputs: &[Output]) -> EngineOutput {
    let mut output = EngineOutput::default();
    let mut seen = rustc_hash::FxHashSet::default();

    for item in outputs {
        match item {
            Output::Chunk(chunk) => {
                for id in &chunk.module_ids {
                    let id = id.to_string();
                    if seen.insert(id.clone()) {
                        output.modules.push(ModuleRecord::new(id));
                    }
                }
                output.chunks.push(Chunk {
                    name: chunk.name.to_string(),
                    file_name: chunk.filename.to_string(),
                    is_entry: chunk.is_entry,
                    is_dynamic_entry: chunk.is_dynamic_entry,
                    imports: chunk.imports.iter().map(|s| s.to_string()).collect(),
                    code: chunk.code.clone(),
                });
            }
            Output::Asset(asset) => {
                let source = match &asset.source {
                    StrOrBytes::Str(s) => s.as_bytes().to_vec(),
                    StrOrBytes::Bytes(b) => b.clone(),
                };
                output.assets.push(EmittedAsset {
                    file_name: asset.filename.to_string(),
                    source,
                });
            }
        }
    }

    output
}
