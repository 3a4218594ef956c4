//! Legacy-target support: syntax down-leveling of emitted bundles and
//! on-demand `core-js` polyfills.

use std::borrow::Cow;
use std::path::Path;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};
use regex::Regex;
use rolldown_plugin::{
    HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage, Plugin,
    SharedTransformPluginContext,
};

use crate::{Error, Result};

/// Down-level a whole rendered chunk to `target` (e.g. `es2015`).
///
/// Class fields use loose assignment semantics for smaller output.
pub(crate) fn downlevel(code: &str, file_name: &str, target: &str, minify: bool) -> Result<String> {
    let transform_error = |message: String| Error::Transform {
        file: file_name.to_string(),
        message,
    };

    let mut options = TransformOptions::from_target(target)
        .map_err(|e| transform_error(format!("invalid legacy target '{target}': {e}")))?;
    options.assumptions.set_public_class_fields = true;

    let allocator = Allocator::default();
    let ParserReturn {
        mut program,
        errors,
        ..
    } = Parser::new(&allocator, code, SourceType::cjs()).parse();

    if !errors.is_empty() {
        return Err(transform_error(join_errors(&errors)));
    }

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let ret = Transformer::new(&allocator, Path::new(file_name), &options)
        .build_with_scoping(scoping, &mut program);

    if !ret.errors.is_empty() {
        return Err(transform_error(join_errors(&ret.errors)));
    }

    let codegen_options = CodegenOptions {
        minify,
        ..CodegenOptions::default()
    };
    Ok(Codegen::new()
        .with_options(codegen_options)
        .build(&program)
        .code)
}

fn join_errors<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// `core-js` module and the usage that pulls it in.
const POLYFILLS: &[(&str, &str)] = &[
    ("es.symbol", r"\bSymbol\b"),
    ("es.promise", r"\bPromise\b"),
    ("es.map", r"\bnew\s+Map\b"),
    ("es.set", r"\bnew\s+Set\b"),
    ("es.object.assign", r"\bObject\.assign\b"),
    ("es.object.entries", r"\bObject\.entries\b"),
    ("es.array.from", r"\bArray\.from\b"),
    ("es.array.find", r"\.find\s*\("),
    ("es.array.includes", r"\.includes\s*\("),
    ("es.string.includes", r"\.includes\s*\("),
    ("es.string.starts-with", r"\.startsWith\s*\("),
];

/// Prepends `import "core-js/modules/<feature>.js"` to modules that use a
/// feature missing from legacy runtimes. A polyfill is only injected when
/// its module exists in the project's `node_modules`.
#[derive(Debug)]
pub(crate) struct PolyfillPlugin {
    available: Vec<(&'static str, Regex)>,
}

impl PolyfillPlugin {
    pub fn new(cwd: &Path) -> Result<Self> {
        let modules_dir = cwd.join("node_modules/core-js/modules");
        let mut available = Vec::new();
        for (feature, pattern) in POLYFILLS {
            if !modules_dir.join(format!("{feature}.js")).is_file() {
                continue;
            }
            let regex = Regex::new(pattern).map_err(|e| {
                Error::InvalidConfig(format!("Invalid polyfill pattern for {feature}: {e}"))
            })?;
            available.push((*feature, regex));
        }
        if available.is_empty() {
            tracing::debug!("core-js not installed, legacy build runs without polyfills");
        }
        Ok(Self { available })
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub(crate) fn inject(&self, id: &str, code: &str) -> Option<String> {
        let normalized = id.replace('\\', "/");
        if normalized.contains("/node_modules/core-js/") || normalized.starts_with('\0') {
            return None;
        }

        let imports: String = self
            .available
            .iter()
            .filter(|(_, regex)| regex.is_match(code))
            .map(|(feature, _)| format!("import \"core-js/modules/{feature}.js\";\n"))
            .collect();

        (!imports.is_empty()).then(|| format!("{imports}{code}"))
    }
}

impl Plugin for PolyfillPlugin {
    fn name(&self) -> Cow<'static, str> {
        "duo:legacy-polyfills".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let injected = self.inject(&args.id, &args.code);

        async move {
            Ok(injected.map(|code| HookTransformOutput {
                code: Some(code),
                map: None,
                side_effects: None,
                module_type: None,
            }))
        }
    }
}
