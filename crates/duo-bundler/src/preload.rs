//! Module-preload graph.
//!
//! For every entry (static or dynamic) chunk, the preload map lists the
//! chunk's own file name followed by every chunk it transitively needs
//! through static imports: its direct imports in engine order, then their
//! imports, each file once. One successful modern pass fully determines the
//! map.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::output::writer::write_files_atomic;
use crate::Result;

/// File name of the persisted preload map, relative to the output root.
pub const PRELOAD_MAP_FILE: &str = "modulepreload.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreloadMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl PreloadMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entry: &str) -> Option<&[String]> {
        self.entries.get(entry).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Pretty JSON with 2-space indentation and sorted keys.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// Derive the preload map from the chunk set of a completed pass.
pub fn build_preload_map(chunks: &[Chunk]) -> PreloadMap {
    let by_file: HashMap<&str, &Chunk> = chunks
        .iter()
        .map(|chunk| (chunk.file_name.as_str(), chunk))
        .collect();

    let entries = chunks
        .iter()
        .filter(|chunk| chunk.is_preload_root())
        .map(|chunk| (chunk.name.clone(), static_closure(chunk, &by_file)))
        .collect();

    PreloadMap { entries }
}

/// `root` followed by its static imports, breadth first.
fn static_closure(root: &Chunk, by_file: &HashMap<&str, &Chunk>) -> Vec<String> {
    let mut files = vec![root.file_name.clone()];
    let mut seen: HashSet<&str> = HashSet::from([root.file_name.as_str()]);
    let mut queue = VecDeque::from([root]);

    while let Some(chunk) = queue.pop_front() {
        for import in &chunk.imports {
            if !seen.insert(import.as_str()) {
                continue;
            }
            files.push(import.clone());
            // Imports outside this pass (externals) are listed but not walked.
            if let Some(imported) = by_file.get(import.as_str()) {
                queue.push_back(*imported);
            }
        }
    }

    files
}

/// Replace `<out_dir>/modulepreload.json` with `map`.
pub fn write_preload_map(map: &PreloadMap, out_dir: &Path) -> Result<()> {
    let json = map.to_json()?;
    let target = out_dir.join(PRELOAD_MAP_FILE);
    write_files_atomic(&[(target, json.as_bytes())])
}
