//! Rejects passes in which two chunks share a logical name.
//!
//! Manifest keys and preload entries are indexed by logical name, so a
//! collision would silently route one entry to another entry's file.

use rustc_hash::FxHashMap;

use super::{BundlePlugin, PassInfo, PluginPhase, StagedOutput};
use crate::chunk::Chunk;
use crate::{Error, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicateChunkGuard;

impl DuplicateChunkGuard {
    pub fn new() -> Self {
        Self
    }

    /// Error on the first logical name seen twice.
    pub fn check(chunks: &[Chunk]) -> Result<()> {
        let mut seen: FxHashMap<&str, &str> = FxHashMap::default();
        for chunk in chunks {
            if let Some(first) = seen.insert(chunk.name.as_str(), chunk.file_name.as_str()) {
                return Err(Error::DuplicateChunk {
                    name: chunk.name.clone(),
                    first_file: first.to_string(),
                    second_file: chunk.file_name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl BundlePlugin for DuplicateChunkGuard {
    fn name(&self) -> &'static str {
        "duo:duplicate-chunk-guard"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Guard
    }

    fn on_bundle_generated(
        &self,
        _pass: &PassInfo,
        chunks: &[Chunk],
        _staged: &mut StagedOutput,
    ) -> Result<()> {
        Self::check(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(name: &str, file: &str) -> Chunk {
        Chunk {
            name: name.to_string(),
            file_name: file.to_string(),
            is_entry: false,
            is_dynamic_entry: false,
            imports: Vec::new(),
            code: String::new(),
        }
    }

    #[test]
    fn test_distinct_names_pass() {
        let chunks = [chunk("main", "main-1.mjs"), chunk("lib", "lib-2.mjs")];
        assert!(DuplicateChunkGuard::check(&chunks).is_ok());
    }

    #[test]
    fn test_duplicate_name_names_both_files() {
        let chunks = [
            chunk("main", "main-1.mjs"),
            chunk("utils", "utils-2.mjs"),
            chunk("utils", "utils-3.mjs"),
        ];
        match DuplicateChunkGuard::check(&chunks) {
            Err(Error::DuplicateChunk {
                name,
                first_file,
                second_file,
            }) => {
                assert_eq!(name, "utils");
                assert_eq!(first_file, "utils-2.mjs");
                assert_eq!(second_file, "utils-3.mjs");
            }
            other => panic!("expected DuplicateChunk, got {other:?}"),
        }
    }
}
