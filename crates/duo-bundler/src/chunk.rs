//! Data model shared by the engine, the plugins and the compilers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A root of the build graph: a logical name and the source file it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryPoint {
    pub name: String,
    pub path: PathBuf,
}

impl EntryPoint {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// One emitted output file of a single compilation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Logical name, unique within a pass.
    pub name: String,
    /// Emitted file name relative to the static output directory.
    pub file_name: String,
    pub is_entry: bool,
    pub is_dynamic_entry: bool,
    /// File names of statically imported chunks, in engine order.
    pub imports: Vec<String>,
    pub code: String,
}

impl Chunk {
    /// Entry and dynamic-entry chunks are the roots of the preload map.
    pub fn is_preload_root(&self) -> bool {
        self.is_entry || self.is_dynamic_entry
    }
}

/// A non-chunk file emitted by the engine (source maps, copied assets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    pub file_name: String,
    pub source: Vec<u8>,
}

/// A resolved source module visited during a pass. Only used for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRecord {
    pub id: String,
    /// Whether the module was served from the incremental cache.
    pub from_cache: bool,
}

impl ModuleRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_cache: false,
        }
    }
}
