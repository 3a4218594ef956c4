//! Pipeline orchestration: modern pass, then legacy pass, failures contained.
//!
//! [`Pipeline::run`] never returns an error and never unwinds. Any `Err` or
//! panic from either pass becomes [`BuildOutcome::Failed`], is logged with its
//! full source chain and triggers the [`FailureNotifier`]. The pipeline is
//! back in [`PipelineState::Idle`] afterwards and can be run again.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use futures::FutureExt;

use crate::chunk::EntryPoint;
use crate::compiler::{LegacyCompiler, ModernCompiler, PassSummary};
use crate::engine::Engine;
use crate::manifest::AssetManifest;
use crate::mode::ExecutionMode;
use crate::preload::PreloadMap;
use crate::{Error, Result};

pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_LEGACY_TARGET: &str = "es2015";
pub const DEFAULT_DYNAMIC_IMPORT_LOADER: &str = "__import__";

/// Inputs of a pipeline.
///
/// Relative `out_dir` is resolved against `cwd`; `static_dir` is always
/// relative to `out_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
    pub static_dir: PathBuf,
    pub mode: ExecutionMode,
    pub entries: Vec<EntryPoint>,
    /// Entries that also get a legacy bundle. `None` means all of them.
    pub legacy_entries: Option<Vec<String>>,
    pub legacy_target: String,
    pub dynamic_import_loader: String,
}

impl PipelineConfig {
    pub fn new(cwd: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            out_dir: out_dir.into(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            mode: ExecutionMode::default(),
            entries: Vec::new(),
            legacy_entries: None,
            legacy_target: DEFAULT_LEGACY_TARGET.to_string(),
            dynamic_import_loader: DEFAULT_DYNAMIC_IMPORT_LOADER.to_string(),
        }
    }

    pub fn entry(mut self, entry: EntryPoint) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn legacy_entries<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legacy_entries = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn legacy_target(mut self, target: impl Into<String>) -> Self {
        self.legacy_target = target.into();
        self
    }

    pub fn dynamic_import_loader(mut self, loader: impl Into<String>) -> Self {
        self.dynamic_import_loader = loader.into();
        self
    }

    /// Absolute-or-cwd-relative output root (where `modulepreload.json` lives).
    pub fn output_root(&self) -> PathBuf {
        if self.out_dir.is_absolute() {
            self.out_dir.clone()
        } else {
            self.cwd.join(&self.out_dir)
        }
    }

    /// Directory the chunk files are written to.
    pub fn static_output_dir(&self) -> PathBuf {
        self.output_root().join(&self.static_dir)
    }

    /// Entries of the legacy pass, in configuration order.
    pub fn legacy_entry_points(&self) -> Vec<EntryPoint> {
        match &self.legacy_entries {
            None => self.entries.clone(),
            Some(names) => self
                .entries
                .iter()
                .filter(|e| names.iter().any(|n| n == &e.name))
                .cloned()
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one entry point is required".to_string(),
            ));
        }

        let mut seen = BTreeMap::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "entry '{}' has an empty name",
                    entry.path.display()
                )));
            }
            if let Some(previous) = seen.insert(entry.name.as_str(), &entry.path) {
                return Err(Error::InvalidConfig(format!(
                    "entry name '{}' is used for both {} and {}",
                    entry.name,
                    previous.display(),
                    entry.path.display()
                )));
            }
        }

        if let Some(names) = &self.legacy_entries {
            if let Some(unknown) = names.iter().find(|n| !seen.contains_key(n.as_str())) {
                return Err(Error::InvalidConfig(format!(
                    "legacy entry '{unknown}' is not a configured entry"
                )));
            }
        }

        validate_static_dir(&self.static_dir)?;

        if self.dynamic_import_loader.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "dynamic import loader name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_static_dir(dir: &Path) -> Result<()> {
    let mut components = dir.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::InvalidConfig(format!(
            "static directory '{}' must be a single relative path segment",
            dir.display()
        ))),
    }
}

/// Process-lifetime state shared by all runs of one pipeline.
#[derive(Debug, Default)]
pub struct PipelineContext<C> {
    pub manifest: AssetManifest,
    /// Preload map of the last successful modern pass.
    pub preload_map: PreloadMap,
    pub modern_cache: C,
    /// One cache per legacy entry.
    pub legacy_caches: BTreeMap<String, C>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    RunningModern,
    RunningLegacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Modern,
    Legacy,
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStage::Modern => write!(f, "modern"),
            BuildStage::Legacy => write!(f, "legacy"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub mode: ExecutionMode,
    pub modern: PassSummary,
    /// One summary per legacy entry; empty when the legacy pass was skipped.
    pub legacy: Vec<PassSummary>,
    pub legacy_skipped: bool,
    pub duration: Duration,
}

#[derive(Debug)]
pub enum BuildOutcome {
    Succeeded(BuildReport),
    Failed { stage: BuildStage, error: Error },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded(_))
    }

    pub fn report(&self) -> Option<&BuildReport> {
        match self {
            BuildOutcome::Succeeded(report) => Some(report),
            BuildOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            BuildOutcome::Succeeded(_) => None,
            BuildOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Audible or visible signal for a failed run.
pub trait FailureNotifier: Send + Sync {
    fn notify(&self, stage: BuildStage, error: &Error);
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl FailureNotifier for TerminalBell {
    fn notify(&self, _stage: BuildStage, _error: &Error) {
        let _ = console::Term::stderr().write_str("\x07");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl FailureNotifier for SilentNotifier {
    fn notify(&self, _stage: BuildStage, _error: &Error) {}
}

/// Dual-target build pipeline over an [`Engine`].
pub struct Pipeline<E: Engine> {
    engine: E,
    config: PipelineConfig,
    modern: ModernCompiler,
    legacy: LegacyCompiler,
    context: PipelineContext<E::Cache>,
    state: PipelineState,
    notifier: Box<dyn FailureNotifier>,
}

impl<E: Engine> Pipeline<E> {
    pub fn new(engine: E, config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            modern: ModernCompiler::new(&config),
            legacy: LegacyCompiler::new(&config),
            engine,
            config,
            context: PipelineContext::default(),
            state: PipelineState::Idle,
            notifier: Box::new(TerminalBell),
        })
    }

    pub fn with_notifier(mut self, notifier: impl FailureNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn context(&self) -> &PipelineContext<E::Cache> {
        &self.context
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run the modern pass and, outside development mode, the legacy pass.
    pub async fn run(&mut self) -> BuildOutcome {
        let started = Instant::now();
        let mode = self.config.mode;

        self.state = PipelineState::RunningModern;
        let modern = AssertUnwindSafe(self.modern.compile(&self.engine, &mut self.context))
            .catch_unwind()
            .await;
        let modern = match flatten(BuildStage::Modern, modern) {
            Ok(summary) => summary,
            Err(error) => return self.fail(BuildStage::Modern, error),
        };

        let legacy_skipped = !mode.runs_legacy();
        let legacy = if legacy_skipped {
            tracing::debug!(mode = %mode, "Skipping legacy pass");
            Vec::new()
        } else {
            self.state = PipelineState::RunningLegacy;
            let legacy = AssertUnwindSafe(self.legacy.compile(&self.engine, &mut self.context))
                .catch_unwind()
                .await;
            match flatten(BuildStage::Legacy, legacy) {
                Ok(summaries) => summaries,
                Err(error) => return self.fail(BuildStage::Legacy, error),
            }
        };

        self.state = PipelineState::Idle;
        let duration = started.elapsed();

        tracing::info!(
            mode = %mode,
            modern_chunks = modern.chunks,
            legacy_bundles = legacy.len(),
            duration_ms = duration.as_millis() as u64,
            "Build complete"
        );

        BuildOutcome::Succeeded(BuildReport {
            mode,
            modern,
            legacy,
            legacy_skipped,
            duration,
        })
    }

    fn fail(&mut self, stage: BuildStage, error: Error) -> BuildOutcome {
        self.state = PipelineState::Idle;

        tracing::error!(stage = %stage, "Build failed: {error}");
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            tracing::error!("  caused by: {cause}");
            source = cause.source();
        }
        if let Error::Bundler(diagnostics) = &error {
            for diagnostic in diagnostics {
                tracing::error!(
                    kind = %diagnostic.kind,
                    file = diagnostic.file.as_deref().unwrap_or("<unknown>"),
                    "{}",
                    diagnostic.message
                );
            }
        }

        if !error.is_pass_fatal() {
            tracing::warn!("The configuration is invalid; every run fails until it is fixed");
        }

        self.notifier.notify(stage, &error);
        BuildOutcome::Failed { stage, error }
    }
}

fn flatten<T>(
    stage: BuildStage,
    result: std::result::Result<Result<T>, Box<dyn std::any::Any + Send>>,
) -> Result<T> {
    match result {
        Ok(inner) => inner,
        Err(payload) => Err(Error::Panicked {
            stage: stage.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
