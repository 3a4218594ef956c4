//! Error handling for the duo CLI.
//!
//! Commands return [`CliError`]. Configuration problems carry a hint for the
//! user; pipeline failures keep the underlying [`duo_bundler::Error`] so it
//! can be rendered as a `miette` diagnostic at the process boundary.

mod report;

pub use report::cli_error_to_miette;

use std::path::PathBuf;

use duo_bundler::BuildStage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The pipeline could not be set up.
    #[error(transparent)]
    Bundler(#[from] duo_bundler::Error),

    /// A pipeline run failed. The pipeline has already logged the details.
    #[error("Build failed during the {stage} pass")]
    BuildFailed {
        stage: BuildStage,
        #[source]
        error: duo_bundler::Error,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: Create a duo.config.json file or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// The merged configuration could not be deserialized.
    #[error("{0}\n\nHint: Check duo.config.json syntax, DUO_* variables and field types")]
    Invalid(String),

    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("duo.config.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("duo.config.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "staticDir".to_string(),
            value: "../up".to_string(),
            hint: "Use a single directory name".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'staticDir'"));
        assert!(msg.contains("../up"));
    }

    #[test]
    fn test_build_failed_keeps_source() {
        let err = CliError::BuildFailed {
            stage: BuildStage::Legacy,
            error: duo_bundler::Error::InvalidConfig("x".into()),
        };
        assert_eq!(err.to_string(), "Build failed during the legacy pass");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let cli_err: CliError = ConfigError::NotFound(PathBuf::from("x.json")).into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }
}
