//! Source watching for `duo watch`.
//!
//! Watches the project root recursively and forwards relevant changes over a
//! channel. Dependencies, build output and hidden directories are ignored so
//! that writing the bundles never triggers another build.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root`. Paths under any of `ignored` are dropped.
    pub fn new(root: PathBuf, ignored: Vec<PathBuf>) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.is_dir() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let filter_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("File watcher error: {}", err);
                    return;
                }
            };

            for path in event.paths {
                if Self::should_ignore(&path, &filter_root, &ignored) {
                    continue;
                }
                let change = match event.kind {
                    EventKind::Create(_) => FileChange::Created(path),
                    EventKind::Modify(_) => FileChange::Modified(path),
                    EventKind::Remove(_) => FileChange::Removed(path),
                    _ => continue,
                };
                // A full channel already holds a pending rebuild.
                let _ = tx.try_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn should_ignore(path: &Path, root: &Path, ignored: &[PathBuf]) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return true;
        };

        if ignored.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }

        relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                name == "node_modules" || name.starts_with('.')
            }
            _ => false,
        })
    }
}

/// Wait for the next change, then keep collecting until the channel has
/// been quiet for `quiet_period`. `None` once the watcher is gone.
pub async fn next_batch(
    rx: &mut mpsc::Receiver<FileChange>,
    quiet_period: Duration,
) -> Option<Vec<FileChange>> {
    let first = rx.recv().await?;
    let mut batch = vec![first];

    while let Ok(Some(change)) = tokio::time::timeout(quiet_period, rx.recv()).await {
        if !batch.contains(&change) {
            batch.push(change);
        }
    }

    Some(batch)
}
