//! In-memory incremental cache for the Rolldown engine.
//!
//! A pass is reused when its request key matches the previous pass and every
//! module file the previous pass visited still has the same BLAKE3 content
//! hash. Nothing is persisted; the cache lives as long as the pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use blake3::Hasher;

use crate::engine::{EngineOutput, EngineRequest};

/// Bump when the cached output layout changes.
const CACHE_FORMAT_VERSION: u32 = 1;

const DUO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key over everything that shapes a pass apart from module contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestKey(blake3::Hash);

impl RequestKey {
    pub(crate) fn compute(request: &EngineRequest) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(&CACHE_FORMAT_VERSION.to_le_bytes());
        hasher.update(DUO_VERSION.as_bytes());
        hasher.update(format!("{request:?}").as_bytes());
        Self(hasher.finalize())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

#[derive(Debug)]
struct CachedPass {
    key: RequestKey,
    inputs: Vec<(PathBuf, blake3::Hash)>,
    output: EngineOutput,
}

/// Engine-owned build cache, one per compiler.
#[derive(Debug, Default)]
pub struct RolldownCache {
    last: Option<CachedPass>,
}

impl RolldownCache {
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Previous output if nothing it depends on has changed. Module records
    /// of a hit are flagged `from_cache`.
    pub fn lookup(&self, key: &RequestKey) -> Option<EngineOutput> {
        let cached = self.last.as_ref()?;
        if cached.key != *key {
            return None;
        }

        for (path, hash) in &cached.inputs {
            match hash_file(path) {
                Some(current) if current == *hash => {}
                _ => {
                    tracing::debug!(path = %path.display(), "Cached module changed");
                    return None;
                }
            }
        }

        let mut output = cached.output.clone();
        for module in &mut output.modules {
            module.from_cache = true;
        }
        Some(output)
    }

    /// Remember `output` as the result for `key`. Modules that are not
    /// files on disk (virtual modules, the runtime) are not tracked.
    pub fn store(&mut self, key: RequestKey, output: &EngineOutput) {
        let inputs = output
            .modules
            .iter()
            .map(|module| PathBuf::from(&module.id))
            .filter_map(|path| hash_file(&path).map(|hash| (path, hash)))
            .collect();

        self.last = Some(CachedPass {
            key,
            inputs,
            output: output.clone(),
        });
    }
}

fn hash_file(path: &Path) -> Option<blake3::Hash> {
    if !path.is_absolute() {
        return None;
    }
    fs::read(path).ok().map(|bytes| blake3::hash(&bytes))
}
