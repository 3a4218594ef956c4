use std::borrow::Cow;

use rolldown_plugin::{
    HookRenderChunkArgs, HookRenderChunkOutput, HookRenderChunkReturn, HookUsage, Plugin,
    PluginContext,
};

use super::{dynamic_import, legacy};
use crate::Result;
use crate::engine::EngineRequest;

/// Rewrites rendered chunks in `render_chunk`, which Rolldown runs before
/// it computes content hashes. Hashed file names therefore describe the
/// final bytes.
///
/// Legacy passes are down-leveled to their target. Passes with a loader get
/// every `import()` routed through it.
#[derive(Debug)]
pub(crate) struct ChunkPostProcessPlugin {
    legacy_target: Option<String>,
    minify: bool,
    loader: Option<String>,
}

impl ChunkPostProcessPlugin {
    /// `None` when the request needs no chunk rewriting.
    pub fn for_request(request: &EngineRequest) -> Option<Self> {
        let plugin = Self {
            legacy_target: request.legacy.as_ref().map(|l| l.target.clone()),
            minify: request.minify,
            loader: request.dynamic_import_loader.clone(),
        };
        (plugin.legacy_target.is_some() || plugin.loader.is_some()).then_some(plugin)
    }

    pub(crate) fn process(&self, code: &str, file_name: &str) -> Result<String> {
        let mut code = Cow::Borrowed(code);

        if let Some(target) = &self.legacy_target {
            code = Cow::Owned(legacy::downlevel(&code, file_name, target, self.minify)?);
        }
        if let Some(loader) = &self.loader {
            code = Cow::Owned(dynamic_import::rewrite_dynamic_imports(
                &code, file_name, loader,
            )?);
        }

        Ok(code.into_owned())
    }
}

impl Plugin for ChunkPostProcessPlugin {
    fn name(&self) -> Cow<'static, str> {
        "duo:chunk-post-process".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::RenderChunk
    }

    fn render_chunk(
        &self,
        _ctx: &PluginContext,
        args: &HookRenderChunkArgs<'_>,
    ) -> impl std::future::Future<Output = HookRenderChunkReturn> + Send {
        let processed = self.process(&args.code, &args.chunk.filename);

        async move {
            processed
                .map(|code| Some(HookRenderChunkOutput { code, map: None }))
                .map_err(anyhow::Error::from)
        }
    }
}
