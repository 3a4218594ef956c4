//! Logging setup for the duo CLI.
//!
//! Pass summaries, chunk sizes and failures are all `tracing` events emitted
//! by `duo-bundler`; this module decides which of them reach the terminal.
//!
//! The level is determined in this order:
//! 1. `--verbose`: DEBUG for duo crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. INFO for duo crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "duo=debug,duo_bundler=debug,duo_cli=debug";
const QUIET_FILTER: &str = "duo=error,duo_bundler=error,duo_cli=error";
const DEFAULT_FILTER: &str = "duo=info,duo_bundler=info,duo_cli=info";

/// Filter for the given global flags.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Whether the terminal should get ANSI colors.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them even when stderr
/// is not a TTY.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags_ignore_rust_log() {
        assert!(build_filter(true, false).to_string().contains("duo_bundler=debug"));
        assert!(build_filter(false, true).to_string().contains("duo_bundler=error"));
    }

    #[test]
    fn test_init_logger_twice_is_harmless() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
