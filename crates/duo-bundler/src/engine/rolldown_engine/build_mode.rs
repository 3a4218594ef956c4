use std::borrow::Cow;

use regex::Regex;
use rolldown_plugin::{
    HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage, Plugin,
    SharedTransformPluginContext,
};

use crate::mode::ExecutionMode;
use crate::{Error, Result};

/// The whole member expression; `process.env.NODE_ENV_FLAG` is left alone.
const NODE_ENV_PATTERN: &str = r"\bprocess\.env\.NODE_ENV\b";

/// Replaces `process.env.NODE_ENV` with the mode's value as a string literal.
#[derive(Debug)]
pub(crate) struct BuildModePlugin {
    pattern: Regex,
    replacement: String,
}

impl BuildModePlugin {
    pub fn new(mode: ExecutionMode) -> Result<Self> {
        let pattern = Regex::new(NODE_ENV_PATTERN)
            .map_err(|e| Error::InvalidConfig(format!("Invalid NODE_ENV pattern: {e}")))?;
        Ok(Self {
            pattern,
            replacement: format!("\"{}\"", mode.node_env()),
        })
    }

    pub(crate) fn apply(&self, code: &str) -> Option<String> {
        match self.pattern.replace_all(code, regex::NoExpand(&self.replacement)) {
            Cow::Borrowed(_) => None,
            Cow::Owned(replaced) => Some(replaced),
        }
    }
}

impl Plugin for BuildModePlugin {
    fn name(&self) -> Cow<'static, str> {
        "duo:build-mode".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let replaced = self.apply(&args.code);

        async move {
            Ok(replaced.map(|code| HookTransformOutput {
                code: Some(code),
                map: None,
                side_effects: None,
                module_type: None,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let plugin = BuildModePlugin::new(ExecutionMode::Release).unwrap();
        let code = "if (process.env.NODE_ENV !== 'production') warn(process.env.NODE_ENV);";
        assert_eq!(
            plugin.apply(code).unwrap(),
            "if (\"production\" !== 'production') warn(\"production\");"
        );
    }

    #[test]
    fn test_development_value() {
        let plugin = BuildModePlugin::new(ExecutionMode::Development).unwrap();
        assert_eq!(
            plugin.apply("x = process.env.NODE_ENV").unwrap(),
            "x = \"development\""
        );
    }

    #[test]
    fn test_untouched_without_reference() {
        let plugin = BuildModePlugin::new(ExecutionMode::Standard).unwrap();
        assert!(plugin.apply("export const a = 1;").is_none());
    }

    #[test]
    fn test_longer_names_are_not_rewritten() {
        let plugin = BuildModePlugin::new(ExecutionMode::Release).unwrap();
        let code = "const f = process.env.NODE_ENV_FLAG; const g = myprocess.env.NODE_ENV;";
        assert!(plugin.apply(code).is_none());

        assert_eq!(
            plugin
                .apply("a(process.env.NODE_ENV, process.env.NODE_ENVIRONMENT)")
                .unwrap(),
            "a(\"production\", process.env.NODE_ENVIRONMENT)"
        );
    }
}
