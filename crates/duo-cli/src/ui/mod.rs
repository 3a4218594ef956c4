//! Terminal output for duo commands.
//!
//! Pipeline events go through `tracing`; this module only prints what a
//! person at the terminal asked for: status lines and the build summary.

mod format;
mod messages;

pub use format::{format_duration, pass_line, print_build_report};
pub use messages::{error, info, success, warning};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Apply `--no-color` and the environment to `owo-colors` output.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors() && !is_ci();
    owo_colors::set_override(enabled);
}
