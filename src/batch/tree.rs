use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::{
    assets::resolve::IMAGE_EXTENSION,
    foundation::error::{MergeError, MergeResult},
};

/// A directory whose files are all PNG images.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PngOnlyDir {
    /// Directory path.
    pub path: PathBuf,
    /// Number of PNG files directly inside it.
    pub png_count: usize,
}

/// Result of an empty-folder pruning pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    /// Subdirectories examined.
    pub checked: usize,
    /// Directories removed (or that would be removed in dry-run mode), deepest first.
    pub removed: Vec<PathBuf>,
    /// Directories that could not be removed, with the error.
    pub failed: Vec<(PathBuf, String)>,
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION))
}

fn ensure_dir(root: &Path) -> MergeResult<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(MergeError::validation(format!(
            "'{}' is not an existing directory",
            root.display()
        )))
    }
}

/// Find every directory under `root` (inclusive) that holds at least one file and only
/// `.png` files (case-insensitive). Subdirectories do not count as files.
pub fn find_png_only_dirs(root: &Path) -> MergeResult<Vec<PngOnlyDir>> {
    ensure_dir(root)?;

    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("cannot walk: {e}");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let Ok(children) = std::fs::read_dir(entry.path()) else {
            tracing::warn!("cannot read '{}'", entry.path().display());
            continue;
        };
        let (mut files, mut pngs) = (0usize, 0usize);
        for child in children.flatten() {
            if child.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }
            files += 1;
            if is_png(&child.path()) {
                pngs += 1;
            }
        }
        if files > 0 && files == pngs {
            out.push(PngOnlyDir {
                path: entry.into_path(),
                png_count: pngs,
            });
        }
    }
    Ok(out)
}

/// `true` when `dir` contains no files at any depth (only empty subdirectories, if any).
///
/// Unreadable trees are treated as non-empty.
pub fn is_effectively_empty(dir: &Path) -> bool {
    for entry in WalkDir::new(dir).min_depth(1) {
        match entry {
            Ok(e) if e.file_type().is_dir() => {}
            Ok(_) => return false,
            Err(e) => {
                tracing::warn!("cannot access '{}': {e}", dir.display());
                return false;
            }
        }
    }
    true
}

/// Remove every effectively empty subdirectory of `root`, deepest first. `root` is kept.
///
/// With `dry_run`, nothing is deleted and [`PruneReport::removed`] lists what would be.
pub fn prune_empty_dirs(root: &Path, dry_run: bool) -> MergeResult<PruneReport> {
    ensure_dir(root)?;

    let mut report = PruneReport::default();
    let walk = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name();
    for entry in walk {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("cannot walk: {e}");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        report.checked += 1;

        let path = entry.into_path();
        if !is_effectively_empty(&path) {
            tracing::debug!("keeping non-empty '{}'", path.display());
            continue;
        }
        if dry_run {
            tracing::info!("would remove empty '{}'", path.display());
            report.removed.push(path);
            continue;
        }
        match std::fs::remove_dir(&path) {
            Ok(()) => {
                tracing::info!("removed empty '{}'", path.display());
                report.removed.push(path);
            }
            Err(e) => {
                tracing::warn!("failed to remove '{}': {e}", path.display());
                report.failed.push((path, e.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/tree.rs"]
mod tests;
