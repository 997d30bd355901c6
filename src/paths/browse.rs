use super::protected::ProtectedPathSet;
use crate::{WipeError, WipeResult};
use chrono::{DateTime, Utc};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// One row of a directory listing, for UI navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayItem {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
    pub is_protected: bool,
}

/// List one directory level, non-recursive. Directories sort before files,
/// both case-insensitive alphabetical. Protected entries are flagged but
/// not removed.
pub(crate) fn list_directory(
    protected: &ProtectedPathSet,
    path: &Path,
) -> WipeResult<Vec<DisplayItem>> {
    let meta = fs::metadata(path).map_err(|e| WipeError::Access {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !meta.is_dir() {
        return Err(WipeError::Access {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let entries = fs::read_dir(path).map_err(|e| WipeError::Access {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut items = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let item_path = entry.path();
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(path = %item_path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let modified = meta.modified().ok().map(DateTime::<Utc>::from);

        items.push(DisplayItem {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory: meta.is_dir(),
            size_bytes: if meta.is_file() { meta.len() } else { 0 },
            modified,
            is_protected: protected.is_protected(&item_path),
            path: item_path,
        });
    }

    items.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });

    Ok(items)
}

/// User-data roots suitable as wipe starting points: documents, downloads
/// and media directories for the current user.
pub fn safe_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(dirs) = UserDirs::new() {
        let candidates = [
            dirs.document_dir(),
            dirs.download_dir(),
            dirs.picture_dir(),
            dirs.audio_dir(),
            dirs.video_dir(),
        ];

        for dir in candidates.into_iter().flatten() {
            roots.push(dir.to_path_buf());
        }
    }

    roots
}

/// Total size in bytes of the files under a selection. Tolerant of
/// unreadable entries; used for pre-wipe size display and estimates.
pub fn selection_size(selected: &[PathBuf]) -> u64 {
    let mut stack: Vec<PathBuf> = selected.to_vec();
    let mut total = 0u64;

    while let Some(path) = stack.pop() {
        let meta = match fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(_) => continue,
        };

        if meta.is_file() {
            total += meta.len();
        } else if meta.is_dir() {
            if let Ok(entries) = fs::read_dir(&path) {
                for entry in entries.flatten() {
                    stack.push(entry.path());
                }
            }
        }
    }

    total
}
