use super::browse::{self, DisplayItem};
use super::protected::ProtectedPathSet;
use crate::{FileTask, WipeResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Expands user selections into the flat list of wipeable files and backs
/// the directory browser.
///
/// All protection filtering happens here, at expansion time; the engine
/// never re-checks it.
#[derive(Debug, Default)]
pub struct PathEnumerator {
    protected: ProtectedPathSet,
}

impl PathEnumerator {
    pub fn new(protected: ProtectedPathSet) -> Self {
        Self { protected }
    }

    pub fn protected(&self) -> &ProtectedPathSet {
        &self.protected
    }

    /// Mutable access to the protected set. Expansion borrows the
    /// enumerator immutably, so the set cannot change underneath a
    /// selection being expanded.
    pub fn protected_mut(&mut self) -> &mut ProtectedPathSet {
        &mut self.protected
    }

    /// Expand selected paths into a deduplicated list of wipeable files.
    ///
    /// Directories are walked depth-first with an explicit work stack, so
    /// arbitrarily deep trees cannot exhaust the call stack. Entries that
    /// cannot be read are logged and skipped; a file reachable through two
    /// selections appears once; protected files (and protected subtrees)
    /// never appear at all. Symlinks are not followed.
    pub fn expand(&self, selected: &[PathBuf]) -> Vec<FileTask> {
        let mut stack: Vec<PathBuf> = selected.iter().rev().cloned().collect();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut tasks = Vec::new();

        while let Some(path) = stack.pop() {
            let meta = match fs::symlink_metadata(&path) {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if meta.is_dir() {
                if self.protected.is_protected(&path) {
                    tracing::debug!(path = %path.display(), "not descending into protected directory");
                    continue;
                }

                let entries = match fs::read_dir(&path) {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable directory");
                        continue;
                    }
                };

                for entry in entries {
                    match entry {
                        Ok(entry) => stack.push(entry.path()),
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable directory entry");
                        }
                    }
                }
            } else if meta.is_file() {
                if self.protected.is_protected(&path) {
                    tracing::debug!(path = %path.display(), "excluding protected file");
                    continue;
                }

                // Canonicalize so the same file selected twice dedups even
                // through differing lexical paths.
                let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                if !seen.insert(canonical) {
                    continue;
                }

                tasks.push(FileTask {
                    path,
                    size_bytes: meta.len(),
                    is_protected: false,
                });
            } else {
                tracing::debug!(path = %path.display(), "skipping non-regular file");
            }
        }

        tasks
    }

    /// Browse one directory level for UI navigation. Read-only: protected
    /// items are returned and flagged, not filtered; the caller renders
    /// them unselectable.
    pub fn list(&self, path: &Path) -> WipeResult<Vec<DisplayItem>> {
        browse::list_directory(&self.protected, path)
    }
}
