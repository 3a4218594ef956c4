//! Duo CLI - dual modern/legacy JavaScript builds.
//!
//! - [`cli`] - argument definitions
//! - [`config`] - `duo.config.json`, `DUO_*` variables and flag merging
//! - [`commands`] - `build` and `watch`
//! - [`watcher`] - debounced source watching
//! - [`error`] - error types rendered through `miette`
//! - [`logger`] and [`ui`] - terminal output

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watcher;

pub use config::DuoConfig;
pub use error::{CliError, ConfigError, Result};
