//! One-line status messages on stderr.
//!
//! Each line is a colored symbol followed by the message. Warnings and
//! errors color the message too so they stand out between tracing events.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Info,
    Warning,
    Error,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Info => "ℹ",
            Status::Warning => "⚠",
            Status::Error => "✗",
        }
    }
}

fn status_line(status: Status, message: &str) -> String {
    let symbol = status.symbol();
    match status {
        Status::Success => format!("{} {}", symbol.green().bold(), message),
        Status::Info => format!("{} {}", symbol.blue().bold(), message),
        Status::Warning => format!("{} {}", symbol.yellow().bold(), message.yellow()),
        Status::Error => format!("{} {}", symbol.red().bold(), message.red()),
    }
}

/// Print a success line, e.g. after `duo build` finished.
pub fn success(message: &str) {
    eprintln!("{}", status_line(Status::Success, message));
}

pub fn info(message: &str) {
    eprintln!("{}", status_line(Status::Info, message));
}

/// Print a warning. Used for findings that never fail a build, such as
/// duplicate packages.
pub fn warning(message: &str) {
    eprintln!("{}", status_line(Status::Warning, message));
}

/// Print an error line. The detailed diagnostic is reported separately.
pub fn error(message: &str) {
    eprintln!("{}", status_line(Status::Error, message));
}
