//! File writing for pass output.
//!
//! Every emitted file of a pass is validated against the static output
//! directory and written through a temp file + rename. Either all files of
//! the pass land on disk or none of the temp files survive.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::chunk::{Chunk, EmittedAsset};
use crate::{Error, Result};

/// Write the chunks and assets of one pass below `dir`.
///
/// Returns the paths written, in chunk-then-asset order.
pub fn write_pass_output(
    dir: &Path,
    chunks: &[Chunk],
    assets: &[EmittedAsset],
) -> Result<Vec<PathBuf>> {
    let dir = normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut operations: Vec<(PathBuf, &[u8])> = Vec::with_capacity(chunks.len() + assets.len());
    for chunk in chunks {
        let target = validate_output_path(&dir, &chunk.file_name)?;
        operations.push((target, chunk.code.as_bytes()));
    }
    for asset in assets {
        let target = validate_output_path(&dir, &asset.file_name)?;
        operations.push((target, asset.source.as_slice()));
    }

    write_files_atomic(&operations)?;

    Ok(operations.into_iter().map(|(path, _)| path).collect())
}

/// Resolve `dir` against the current directory and clean it.
fn normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    let cwd = std::env::current_dir().map_err(|e| {
        Error::InvalidOutputPath(format!("Failed to get current directory: {}", e))
    })?;
    Ok(cwd.join(cleaned).clean())
}

/// Join `filename` onto `base_dir`, rejecting anything that escapes it.
pub(crate) fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.is_empty() {
        return Err(Error::InvalidOutputPath("Empty file name".to_string()));
    }

    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// `<name>.tmp` next to `target`, keeping the original extension so that
/// `a.js` and `a.mjs` never share a temp file.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    target.with_file_name(name)
}

/// Two-phase write: everything goes to temp files first, then each temp file
/// is renamed over its target. Temp files are removed on any failure.
pub(crate) fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(operations.len());

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &temp_files {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    "Failed to clean up temporary file '{}': {}",
                    temp_path.display(),
                    e
                );
            }
        }
    }
}
