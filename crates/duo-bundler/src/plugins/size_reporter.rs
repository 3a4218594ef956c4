//! Prints the gzip size of every chunk and the total for the pass.

use super::{BundlePlugin, PassInfo, PluginPhase, StagedOutput};
use crate::Result;
use crate::chunk::Chunk;
use crate::size::{SizeReport, format_size};

#[derive(Debug, Default, Clone, Copy)]
pub struct SizeReporter;

impl SizeReporter {
    pub fn new() -> Self {
        Self
    }
}

impl BundlePlugin for SizeReporter {
    fn name(&self) -> &'static str {
        "duo:size-reporter"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Report
    }

    fn on_bundle_generated(
        &self,
        pass: &PassInfo,
        chunks: &[Chunk],
        staged: &mut StagedOutput,
    ) -> Result<()> {
        let report = SizeReport::measure(pass.entry_names.join(", "), chunks);

        for chunk in &report.chunks {
            tracing::info!(
                target: "duo::size",
                pass = %pass.target,
                "{:<40} {:>10} (gzip {})",
                chunk.file_name,
                format_size(chunk.raw),
                format_size(chunk.gzip)
            );
        }
        tracing::info!(
            target: "duo::size",
            pass = %pass.target,
            "[{}] total {} (gzip {})",
            report.label,
            format_size(report.total_raw()),
            format_size(report.total_gzip())
        );

        staged.size_report = Some(report);
        Ok(())
    }
}
