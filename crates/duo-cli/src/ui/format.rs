//! Formatting for durations and the end-of-build summary.

use std::time::Duration;

use console::Term;
use duo_bundler::size::format_size;
use duo_bundler::{BuildReport, PassSummary};
use owo_colors::OwoColorize;

/// Format a duration for display.
///
/// ```
/// use std::time::Duration;
/// use duo_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One uncolored summary line for a pass, e.g.
/// `modern main, admin: 4 chunks, 12.3 KB (4.1 KB gzip)`.
pub fn pass_line(pass: &PassSummary) -> String {
    let mut line = format!(
        "{} {}: {} chunk{}",
        pass.target,
        pass.entries.join(", "),
        pass.chunks,
        if pass.chunks == 1 { "" } else { "s" }
    );
    if let Some(size) = &pass.size {
        line.push_str(&format!(
            ", {} ({} gzip)",
            format_size(size.total_raw()),
            format_size(size.total_gzip())
        ));
    }
    if pass.from_cache {
        line.push_str(" [cached]");
    }
    line
}

/// Print the summary of a successful run to stderr.
pub fn print_build_report(report: &BuildReport) {
    let width = (Term::stderr().size().1 as usize).min(80);

    eprintln!("\n{} ({})", "Build Summary".bold().underline(), report.mode);
    eprintln!("{}", "─".repeat(width));

    for pass in std::iter::once(&report.modern).chain(&report.legacy) {
        eprintln!("  {} {}", "▸".blue(), pass_line(pass));
    }
    if report.legacy_skipped {
        eprintln!("  {} {}", "▸".blue(), "legacy: skipped".dimmed());
    }

    for duplicate in &report.modern.duplicates {
        super::warning(&format!(
            "{} is bundled from {} locations: {}",
            duplicate.name,
            duplicate.roots.len(),
            duplicate.roots.join(", ")
        ));
    }

    eprintln!("{}", "─".repeat(width));
    eprintln!(
        "  {} {}",
        "Done in".bold(),
        format_duration(report.duration).green()
    );
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use duo_bundler::PassTarget;
    use duo_bundler::size::{ChunkSize, SizeReport};

    use super::*;

    fn summary(target: PassTarget, entries: &[&str], chunks: usize) -> PassSummary {
        PassSummary {
            target,
            entries: entries.iter().map(|e| e.to_string()).collect(),
            chunks,
            files: vec![PathBuf::from("dist/static/main-abc.mjs")],
            from_cache: false,
            size: None,
            duplicates: Vec::new(),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(2250)), "2.25s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_pass_line_plain() {
        let line = pass_line(&summary(PassTarget::Modern, &["main", "admin"], 4));
        assert_eq!(line, "modern main, admin: 4 chunks");
    }

    #[test]
    fn test_pass_line_with_size_and_cache() {
        let mut pass = summary(PassTarget::Legacy, &["main"], 1);
        pass.from_cache = true;
        pass.size = Some(SizeReport {
            label: "main".into(),
            chunks: vec![ChunkSize {
                file_name: "main-abc.js".into(),
                raw: 100,
                gzip: 50,
            }],
        });

        let line = pass_line(&pass);
        assert!(line.starts_with("legacy main: 1 chunk,"));
        assert!(line.contains(&format_size(100)));
        assert!(line.ends_with("[cached]"));
    }
}
