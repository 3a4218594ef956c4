//! Vendor chunk assignment.
//!
//! A single advanced-chunk group catches every module resolved from a
//! `node_modules` directory and names its chunk after the package's
//! top-level segment, so a dependency always lands in the same named chunk
//! no matter which source module imports it first, or which `node_modules`
//! it was found in (project, hoisted workspace root, pnpm store).
//!
//! Scoped packages share one chunk per scope. Chunk names drop the
//! leading `@`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rolldown::AdvancedChunksOptions;
use rolldown_common::{ChunkingContext, MatchGroup, MatchGroupName, MatchGroupTest};
use rolldown_utils::js_regex::HybridRegex;

use crate::audit::package_identity;
use crate::{Error, Result};

const NODE_MODULES_PATTERN: &str = r"[\\/]node_modules[\\/]";

/// Chunk name for a module id, or `None` for first-party and virtual modules.
///
/// ```text
/// /app/node_modules/lib/index.js                          -> lib
/// /app/node_modules/@org/ui/button.js                     -> org
/// /app/node_modules/.pnpm/lib@1.0.0/node_modules/lib/a.js -> lib
/// ```
pub(crate) fn vendor_chunk_name(module_id: &str) -> Option<String> {
    let (package, _) = package_identity(module_id)?;
    let top_level = package.split('/').next().unwrap_or(&package);
    let name = top_level.trim_start_matches('@');
    (!name.is_empty()).then(|| name.to_string())
}

type GroupNameFuture = Pin<Box<dyn Future<Output = anyhow::Result<Option<String>>> + Send>>;

fn group_name(module_id: &str, _ctx: &ChunkingContext) -> GroupNameFuture {
    let name = vendor_chunk_name(module_id);
    Box::pin(async move { Ok(name) })
}

/// The vendor group: test on any `node_modules` path segment, name derived
/// per module.
pub(crate) fn vendor_chunk_options() -> Result<AdvancedChunksOptions> {
    let test = HybridRegex::new(NODE_MODULES_PATTERN)
        .map_err(|e| Error::InvalidConfig(format!("Invalid vendor pattern: {e}")))?;

    Ok(AdvancedChunksOptions {
        min_size: None,
        min_share_count: None,
        max_size: None,
        min_module_size: None,
        max_module_size: None,
        include_dependencies_recursively: None,
        groups: Some(vec![MatchGroup {
            name: MatchGroupName::Dynamic(Arc::new(group_name)),
            test: Some(MatchGroupTest::Regex(test)),
            ..Default::default()
        }]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_named_after_top_level_segment() {
        assert_eq!(
            vendor_chunk_name("/app/node_modules/lib/index.js").as_deref(),
            Some("lib")
        );
        assert_eq!(
            vendor_chunk_name("/app/node_modules/@org/ui/button.js").as_deref(),
            Some("org")
        );
        assert_eq!(
            vendor_chunk_name("C:\\app\\node_modules\\lib\\index.js").as_deref(),
            Some("lib")
        );
    }

    #[test]
    fn test_hoisted_and_pnpm_paths() {
        assert_eq!(
            vendor_chunk_name("/repo/node_modules/lib/index.js").as_deref(),
            Some("lib")
        );
        assert_eq!(
            vendor_chunk_name("/app/node_modules/.pnpm/lib@1.0.0/node_modules/lib/index.js")
                .as_deref(),
            Some("lib")
        );
    }

    #[test]
    fn test_first_party_and_virtual_modules_have_no_vendor_chunk() {
        assert_eq!(vendor_chunk_name("/app/src/main.js"), None);
        assert_eq!(vendor_chunk_name("\0rolldown/runtime.js"), None);
        assert_eq!(vendor_chunk_name("/app/node_modules/.cache/x.js"), None);
    }

    #[test]
    fn test_group_matches_any_node_modules_segment() {
        let re = regex::Regex::new(NODE_MODULES_PATTERN).unwrap();
        assert!(re.is_match("/app/node_modules/lib/index.js"));
        assert!(re.is_match("/repo/node_modules/lib/index.js"));
        assert!(re.is_match("C:\\app\\node_modules\\lib\\index.js"));
        assert!(!re.is_match("/app/src/node_modules_helper.js"));
    }

    #[test]
    fn test_options_hold_one_group() {
        let options = vendor_chunk_options().unwrap();
        assert_eq!(options.groups.map(|g| g.len()), Some(1));
    }
}
