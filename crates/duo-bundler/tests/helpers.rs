//! Shared test utilities for duo-bundler integration tests.
//!
//! [`ScriptedEngine`] stands in for Rolldown: by default it derives a
//! deterministic output from each request, and individual passes can be
//! scripted to fail, panic or return a hand-built chunk set.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use duo_bundler::diagnostics::{DiagnosticKind, ExtractedDiagnostic};
use duo_bundler::{
    BuildStage, Chunk, Engine, EngineOutput, EngineRequest, EntryPoint, Error, FailureNotifier,
    ModuleRecord, OutputFormat, PipelineConfig,
};

/// What the next engine pass should do.
pub enum Step {
    Output(EngineOutput),
    Fail(String),
    Panic(&'static str),
}

/// Incremental state of the scripted engine: how many passes it has seen.
#[derive(Debug, Default)]
pub struct ScriptedCache {
    pub passes: usize,
}

#[derive(Default)]
pub struct ScriptedEngine {
    steps: Mutex<VecDeque<Step>>,
    /// Chunks shared by every entry of an ES module pass.
    shared: Vec<String>,
    requests: Mutex<Vec<EngineRequest>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every ESM entry statically imports these non-entry chunks.
    pub fn with_shared(mut self, names: &[&str]) -> Self {
        self.shared = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn push(&self, step: Step) {
        self.steps.lock().push_back(step);
    }

    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    fn synthesize(&self, request: &EngineRequest, from_cache: bool) -> EngineOutput {
        let ext = request.file_names.extension().to_string();
        let mut output = EngineOutput::default();

        let shared: Vec<Chunk> = match request.format {
            OutputFormat::Esm => self
                .shared
                .iter()
                .map(|name| chunk(name, &ext, false, &[]))
                .collect(),
            OutputFormat::Iife => Vec::new(),
        };
        let shared_files: Vec<String> = shared.iter().map(|c| c.file_name.clone()).collect();

        for entry in &request.entries {
            let imports: Vec<&str> = shared_files.iter().map(String::as_str).collect();
            output.chunks.push(chunk(&entry.name, &ext, true, &imports));
            output.modules.push(ModuleRecord {
                id: entry.path.display().to_string(),
                from_cache,
            });
        }
        output.chunks.extend(shared);
        output
    }
}

#[async_trait]
impl Engine for ScriptedEngine {
    type Cache = ScriptedCache;

    async fn bundle(
        &self,
        request: &EngineRequest,
        cache: &mut ScriptedCache,
    ) -> duo_bundler::Result<EngineOutput> {
        self.requests.lock().push(request.clone());
        let from_cache = cache.passes > 0;
        cache.passes += 1;

        let step = self.steps.lock().pop_front();
        match step {
            None => Ok(self.synthesize(request, from_cache)),
            Some(Step::Output(output)) => Ok(output),
            Some(Step::Fail(message)) => Err(Error::Bundler(vec![ExtractedDiagnostic::error(
                DiagnosticKind::UnresolvedImport,
                message,
            )])),
            Some(Step::Panic(message)) => panic!("{message}"),
        }
    }
}

/// Build a chunk whose file name embeds a hash of its name and extension.
pub fn chunk(name: &str, ext: &str, is_entry: bool, imports: &[&str]) -> Chunk {
    Chunk {
        name: name.to_string(),
        file_name: format!("{name}-{}{ext}", fake_hash(name, ext)),
        is_entry,
        is_dynamic_entry: false,
        imports: imports.iter().map(|s| s.to_string()).collect(),
        code: format!("console.log({name:?});\n"),
    }
}

pub fn fake_hash(name: &str, ext: &str) -> String {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    ext.hash(&mut hasher);
    format!("{:08x}", hasher.finish() as u32)
}

/// Records every failure notification.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub failures: std::sync::Arc<Mutex<Vec<(BuildStage, String)>>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.failures.lock().len()
    }
}

impl FailureNotifier for RecordingNotifier {
    fn notify(&self, stage: BuildStage, error: &Error) {
        self.failures.lock().push((stage, error.to_string()));
    }
}

/// Two-entry configuration writing into `out`.
pub fn two_entry_config(out: &Path) -> PipelineConfig {
    PipelineConfig::new(out, out.join("dist"))
        .entry(EntryPoint::new("main", "src/main.js"))
        .entry(EntryPoint::new("admin", "src/admin.js"))
}

pub fn static_files(dir: &Path) -> Vec<PathBuf> {
    let static_dir = dir.join("dist").join("static");
    let Ok(read) = std::fs::read_dir(&static_dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = read.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    files.sort();
    files
}
