use std::path::PathBuf;

use clap::{Args, Subcommand};
use duo_bundler::ExecutionMode;

use crate::cli::validation::{EntryArg, parse_entry};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the modern and legacy bundles once
    ///
    /// Exits with a non-zero status when either pass fails.
    Build(BuildArgs),

    /// Build, then rebuild on every source change
    ///
    /// Failed builds are reported and the watcher keeps running. Stop with Ctrl+C.
    Watch(WatchArgs),
}

/// Project options shared by every command. Each one overrides the
/// corresponding `duo.config.json` field.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Entry point as NAME=PATH (a bare PATH is named after its file stem)
    ///
    /// Examples:
    ///   duo build -e main=src/main.js -e admin=src/admin.js
    #[arg(short, long = "entry", value_name = "NAME=PATH", value_parser = parse_entry)]
    pub entries: Vec<EntryArg>,

    /// Output root; modulepreload.json is written here
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Subdirectory of the output root that receives the bundles
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Execution mode: development, standard or release
    #[arg(short, long)]
    pub mode: Option<ExecutionMode>,

    /// Only build a legacy bundle for these entries (repeatable)
    #[arg(long = "legacy-entry", value_name = "NAME")]
    pub legacy_entries: Vec<String>,

    /// Syntax baseline of the legacy bundles (e.g. es2015)
    #[arg(long, value_name = "TARGET")]
    pub legacy_target: Option<String>,

    /// Path to the config file (default: duo.config.json in the project root)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Quiet period before a burst of changes triggers a rebuild
    #[arg(long, default_value_t = 200, value_name = "MS")]
    pub debounce: u64,
}
