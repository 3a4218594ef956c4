//! Command-line interface definition for duo.
//!
//! - `duo build` - run the pipeline once and exit non-zero on failure
//! - `duo watch` - run the pipeline on every source change until Ctrl+C

mod commands;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, Command, ProjectArgs, WatchArgs};
pub use validation::{EntryArg, parse_entry};

/// Duo - modern and legacy JavaScript builds from one pipeline
#[derive(Parser, Debug)]
#[command(
    name = "duo",
    version,
    about = "Dual modern/legacy JavaScript builds",
    long_about = "Duo compiles browser entry points twice: a code-split ES module build with\n\
                  vendor chunks and a module-preload map, and one self-contained legacy\n\
                  bundle per entry for browsers without module support."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
