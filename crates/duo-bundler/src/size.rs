//! Compressed bundle-size measurement.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::chunk::Chunk;

/// Gzip size of `bytes` at maximum compression.
///
/// The gzip header carries no timestamp, so equal input always yields an
/// equal size.
pub fn gzip_size(bytes: &[u8]) -> u64 {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 3), Compression::best());
    // Writing into a Vec cannot fail.
    if encoder.write_all(bytes).is_err() {
        return bytes.len() as u64;
    }
    match encoder.finish() {
        Ok(compressed) => compressed.len() as u64,
        Err(_) => bytes.len() as u64,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSize {
    pub file_name: String,
    pub raw: u64,
    pub gzip: u64,
}

/// Per-chunk sizes of one pass plus the aggregate, labeled by entry names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    pub label: String,
    pub chunks: Vec<ChunkSize>,
}

impl SizeReport {
    pub fn measure(label: impl Into<String>, chunks: &[Chunk]) -> Self {
        let chunks = chunks
            .iter()
            .map(|chunk| ChunkSize {
                file_name: chunk.file_name.clone(),
                raw: chunk.code.len() as u64,
                gzip: gzip_size(chunk.code.as_bytes()),
            })
            .collect();
        Self {
            label: label.into(),
            chunks,
        }
    }

    pub fn total_raw(&self) -> u64 {
        self.chunks.iter().map(|c| c.raw).sum()
    }

    pub fn total_gzip(&self) -> u64 {
        self.chunks.iter().map(|c| c.gzip).sum()
    }
}

/// Format a byte count using the largest fitting unit (B, KB, MB, GB).
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(file: &str, code: &str) -> Chunk {
        Chunk {
            name: file.to_string(),
            file_name: file.to_string(),
            is_entry: false,
            is_dynamic_entry: false,
            imports: Vec::new(),
            code: code.to_string(),
        }
    }

    #[test]
    fn test_gzip_size_is_deterministic() {
        let code = "export const answer = 42;\n".repeat(50);
        assert_eq!(gzip_size(code.as_bytes()), gzip_size(code.as_bytes()));
    }

    #[test]
    fn test_gzip_compresses_repetitive_input() {
        let code = "console.log('hello');\n".repeat(200);
        assert!(gzip_size(code.as_bytes()) < code.len() as u64 / 4);
    }

    #[test]
    fn test_report_totals() {
        let report = SizeReport::measure("main, admin", &[chunk("a.mjs", "aaaa"), chunk("b.mjs", "bb")]);
        assert_eq!(report.label, "main, admin");
        assert_eq!(report.chunks.len(), 2);
        assert_eq!(report.total_raw(), 6);
        assert_eq!(
            report.total_gzip(),
            report.chunks[0].gzip + report.chunks[1].gzip
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1_048_576), "1.00 MB");
    }
}
