//! Execution mode of a pipeline run.

use serde::{Deserialize, Serialize};

/// How aggressively the pipeline optimizes its output.
///
/// `Development` is the fast-iteration mode: it trades output size for
/// turnaround time and leaves code easy to step through in a debugger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Development,
    #[default]
    Standard,
    Release,
}

impl ExecutionMode {
    pub fn is_fast_iteration(self) -> bool {
        matches!(self, ExecutionMode::Development)
    }

    pub fn minify(self) -> bool {
        !self.is_fast_iteration()
    }

    /// Dynamic `import()` sites are routed through the loader outside of development.
    pub fn rewrite_dynamic_imports(self) -> bool {
        !self.is_fast_iteration()
    }

    pub fn runs_legacy(self) -> bool {
        !self.is_fast_iteration()
    }

    /// Value substituted for `process.env.NODE_ENV`.
    pub fn node_env(self) -> &'static str {
        match self {
            ExecutionMode::Development => "development",
            ExecutionMode::Standard | ExecutionMode::Release => "production",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Development => "development",
            ExecutionMode::Standard => "standard",
            ExecutionMode::Release => "release",
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(ExecutionMode::Development),
            "standard" | "production" | "prod" => Ok(ExecutionMode::Standard),
            "release" => Ok(ExecutionMode::Release),
            other => Err(format!(
                "Invalid mode: {} (expected development, standard or release)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
