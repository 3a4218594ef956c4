#![cfg_attr(docsrs, feature(doc_cfg))]

//! # duo-bundler
//!
//! Dual-target build pipeline on top of Rolldown.
//!
//! Every run compiles the configured entry points twice: a code-split ES
//! module build (`<name>-<hash>.mjs`) with vendor chunks and a module-preload
//! map, then a single-file legacy build per entry (`<name>-<hash>.js`). Both
//! passes register their files in one shared [`AssetManifest`].
//!
//! Failures never escape [`Pipeline::run`]: they are logged, signalled with a
//! terminal bell and turned into [`BuildOutcome::Failed`], so a long-lived
//! watch process can simply run the pipeline again on the next change.
//!
//! ```no_run
//! use duo_bundler::{EntryPoint, ExecutionMode, Pipeline, PipelineConfig, RolldownEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::new(".", "dist")
//!     .entry(EntryPoint::new("main", "src/main.js"))
//!     .mode(ExecutionMode::Release);
//!
//! let mut pipeline = Pipeline::new(RolldownEngine::new(), config)?;
//! let outcome = pipeline.run().await;
//! if let Some(report) = outcome.report() {
//!     println!("{:?}", pipeline.context().manifest.lookup("main", ".mjs"));
//!     println!("{} modern chunks", report.modern.chunks);
//! }
//! # Ok(()) }
//! ```

pub mod audit;
pub mod chunk;
pub mod compiler;
pub mod diagnostics;
pub mod engine;
pub mod manifest;
pub mod mode;
pub mod output;
pub mod pipeline;
pub mod plugins;
pub mod preload;
pub mod size;
pub mod tags;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use audit::{DuplicatePackage, audit_modules, find_duplicate_packages, package_identity};
pub use chunk::{Chunk, EmittedAsset, EntryPoint, ModuleRecord};
pub use compiler::{LEGACY_EXTENSION, LegacyCompiler, MODERN_EXTENSION, ModernCompiler, PassSummary};
pub use engine::{
    Engine, EngineOutput, EngineRequest, FileNameTemplate, LegacyTransform, OutputFormat,
    RolldownEngine,
};
pub use manifest::AssetManifest;
pub use mode::ExecutionMode;
pub use pipeline::{
    BuildOutcome, BuildReport, BuildStage, FailureNotifier, Pipeline, PipelineConfig,
    PipelineContext, PipelineState, SilentNotifier, TerminalBell,
};
pub use plugins::{BundlePlugin, PassInfo, PassTarget, PluginPhase, PluginRegistry, StagedOutput};
pub use preload::{PRELOAD_MAP_FILE, PreloadMap, build_preload_map};
pub use tags::render_entry_tags;

/// Error types for duo-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from the Rolldown bundler.
    #[error("Rolldown bundler error: {}", format_bundler_error(.0))]
    Bundler(Vec<diagnostics::ExtractedDiagnostic>),

    /// Two chunks of one pass share a logical name.
    #[error("Duplicate chunk name '{name}' ({first_file} and {second_file})")]
    DuplicateChunk {
        name: String,
        first_file: String,
        second_file: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Post-processing of an emitted chunk failed.
    #[error("Failed to transform {file}: {message}")]
    Transform { file: String, message: String },

    /// A pass panicked.
    #[error("{stage} pass panicked: {message}")]
    Panicked { stage: String, message: String },
}

/// Result type alias for duo-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundler error from a Rolldown error.
    pub fn from_rolldown_batch(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler(diagnostics::extract_from_rolldown_error(error))
    }

    /// Whether the error aborts only the current pass (as opposed to a
    /// misconfiguration that will fail every run).
    pub fn is_pass_fatal(&self) -> bool {
        !matches!(self, Error::InvalidConfig(_))
    }
}

fn format_bundler_error(diagnostics: &[diagnostics::ExtractedDiagnostic]) -> String {
    match diagnostics {
        [] => "Unknown bundler error".to_string(),
        [diag] => format!("{}: {}", diag.kind, diag.message),
        _ => format!(
            "{} errors: {}",
            diagnostics.len(),
            diagnostics
                .iter()
                .map(|d| format!("{}: {}", d.kind, d.message))
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Bundler(_) => "BUNDLER_ERROR",
            Error::DuplicateChunk { .. } => "DUPLICATE_CHUNK",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Transform { .. } => "TRANSFORM_ERROR",
            Error::Panicked { .. } => "PANICKED",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::DuplicateChunk { name, .. } => Some(Box::new(format!(
                "Manifest and preload entries are keyed by chunk name. Rename the entry or the \
                 vendor package that produces '{}'.",
                name
            ))),
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check your configuration file for errors.\nError: {}",
                msg
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it stays inside the output directory.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::Bundler(diagnostics) => match diagnostics.as_slice() {
                [diag] => diag
                    .help
                    .as_ref()
                    .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>),
                [] => None,
                _ => Some(Box::new(
                    "Multiple bundler errors occurred. See details above.".to_string(),
                )),
            },
            _ => None,
        }
    }
}
