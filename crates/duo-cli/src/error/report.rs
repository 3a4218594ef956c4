//! Conversion of CLI errors into `miette` reports.

use miette::Report;

use crate::error::CliError;

/// Render a [`CliError`] for the terminal.
///
/// Bundler errors keep their diagnostic code and help text.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bundler(error) => Report::new(error),
        CliError::BuildFailed { stage, error } => {
            Report::new(error).wrap_err(format!("Build failed during the {stage} pass"))
        }
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundler_error_keeps_code() {
        let report = cli_error_to_miette(CliError::Bundler(duo_bundler::Error::InvalidConfig(
            "no entries".into(),
        )));
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("INVALID_CONFIG"));
    }

    #[test]
    fn test_build_failed_is_wrapped() {
        let report = cli_error_to_miette(CliError::BuildFailed {
            stage: duo_bundler::BuildStage::Modern,
            error: duo_bundler::Error::WriteFailure("disk full".into()),
        });
        assert_eq!(report.to_string(), "Build failed during the modern pass");
    }
}
