use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    assets::loader::{CachedImageLoader, FsImageLoader, ImageLoader},
    assets::resolve::IMAGE_EXTENSION,
    descriptor::model::{DESCRIPTOR_EXTENSION, parse_descriptor},
    foundation::error::{MergeError, MergeResult},
    render::compositor::{SkippedLayer, composite},
    render::output::save_canvas,
};

/// Options controlling batch merging.
#[derive(Clone, Debug)]
pub struct BatchOpts {
    /// Root directory outputs are written under (one subdirectory per input directory).
    pub output_root: PathBuf,
    /// Merge the descriptors of a directory in parallel on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Share decoded assets between descriptors of the same directory.
    pub cache_images: bool,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("merged"),
            parallel: false,
            threads: None,
            cache_images: true,
        }
    }
}

/// A descriptor that was merged and written.
#[derive(Clone, Debug, Serialize)]
pub struct FileOutcome {
    /// Source descriptor.
    pub descriptor: PathBuf,
    /// Written PNG.
    pub output: PathBuf,
    /// Overlays left out of the image.
    pub skipped: Vec<SkippedLayer>,
}

/// A descriptor that could not be merged. Nothing was written for it.
#[derive(Clone, Debug, Serialize)]
pub struct FileFailure {
    /// Source descriptor.
    pub descriptor: PathBuf,
    /// Rendered error.
    pub error: String,
}

/// Outcome of merging one directory.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DirReport {
    /// Directory the descriptors were read from.
    pub dir: PathBuf,
    /// Directory outputs were written to.
    pub out_dir: PathBuf,
    /// Successfully merged descriptors, in enumeration order.
    pub merged: Vec<FileOutcome>,
    /// Failed descriptors, in enumeration order.
    pub failed: Vec<FileFailure>,
}

/// Outcome of a multi-directory batch run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchReport {
    /// Per-directory reports, sorted by directory.
    pub dirs: Vec<DirReport>,
    /// Inputs that were skipped entirely, with the reason.
    pub skipped_dirs: Vec<FileFailure>,
}

impl BatchReport {
    /// Total number of written images.
    pub fn merged_count(&self) -> usize {
        self.dirs.iter().map(|d| d.merged.len()).sum()
    }

    /// Total number of descriptors that failed.
    pub fn failed_count(&self) -> usize {
        self.dirs.iter().map(|d| d.failed.len()).sum()
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> MergeResult<String> {
        serde_json::to_string_pretty(self)
            .context("serialize batch report")
            .map_err(MergeError::from)
    }
}

/// List descriptor files (`*.ipt`) directly inside `dir`, sorted by path.
pub fn enumerate_descriptor_files(dir: &Path) -> MergeResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| format!("read directory '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == DESCRIPTOR_EXTENSION) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Output path for `descriptor` inside `out_dir`: same stem, `.png` extension.
pub fn output_path_for(descriptor: &Path, out_dir: &Path) -> PathBuf {
    let stem = descriptor
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{stem}.{IMAGE_EXTENSION}"))
}

/// Read, parse, composite and save one descriptor.
///
/// Nothing is written when parsing or the base layer fails.
#[tracing::instrument(skip_all, fields(descriptor = %descriptor.display()))]
pub fn merge_descriptor(
    descriptor: &Path,
    asset_dir: &Path,
    out_dir: &Path,
    loader: &impl ImageLoader,
) -> MergeResult<FileOutcome> {
    let source = std::fs::read_to_string(descriptor)
        .with_context(|| format!("read descriptor '{}'", descriptor.display()))?;
    let stack = parse_descriptor(&source)?;
    tracing::debug!(
        base = %stack.base.file_stem,
        overlays = stack.overlays.len(),
        "descriptor parsed"
    );

    let out = composite(&stack, asset_dir, loader)?;
    let output = output_path_for(descriptor, out_dir);
    save_canvas(out.canvas, &output)?;

    Ok(FileOutcome {
        descriptor: descriptor.to_path_buf(),
        output,
        skipped: out.skipped,
    })
}

/// Merge every descriptor in `descriptor_dir` using assets from `asset_dir`.
///
/// A failing descriptor is recorded and does not stop the others. Reports keep enumeration
/// order even when merging in parallel.
#[tracing::instrument(skip(opts))]
pub fn process_dir(
    descriptor_dir: &Path,
    asset_dir: &Path,
    out_dir: &Path,
    opts: &BatchOpts,
) -> MergeResult<DirReport> {
    if !descriptor_dir.is_dir() {
        return Err(MergeError::validation(format!(
            "descriptor directory '{}' does not exist",
            descriptor_dir.display()
        )));
    }
    if !asset_dir.is_dir() {
        return Err(MergeError::validation(format!(
            "asset directory '{}' does not exist",
            asset_dir.display()
        )));
    }

    let mut report = DirReport {
        dir: descriptor_dir.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        ..DirReport::default()
    };

    let files = enumerate_descriptor_files(descriptor_dir)?;
    if files.is_empty() {
        tracing::warn!(
            "no .{DESCRIPTOR_EXTENSION} files in '{}'",
            descriptor_dir.display()
        );
        return Ok(report);
    }
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;
    tracing::info!(
        "merging {} descriptor(s) from '{}'",
        files.len(),
        descriptor_dir.display()
    );

    let cached;
    let loader: &dyn ImageLoader = if opts.cache_images {
        cached = CachedImageLoader::new(FsImageLoader);
        &cached
    } else {
        &FsImageLoader
    };

    let run = |path: &PathBuf| merge_descriptor(path, asset_dir, out_dir, &loader);
    let results: Vec<MergeResult<FileOutcome>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| files.par_iter().map(run).collect())
    } else {
        files.iter().map(run).collect()
    };

    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(outcome) => {
                tracing::info!(
                    skipped = outcome.skipped.len(),
                    "merged {}",
                    outcome.output.display()
                );
                report.merged.push(outcome);
            }
            Err(e) => {
                tracing::error!("failed to merge '{}': {e}", path.display());
                report.failed.push(FileFailure {
                    descriptor: path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Merge each directory in `dirs`, reading descriptors and assets from the directory itself
/// and writing to `<output_root>/<dir name>`.
///
/// Inputs are deduplicated and sorted. Missing directories are recorded and skipped.
pub fn process_dirs(dirs: &[PathBuf], opts: &BatchOpts) -> BatchReport {
    let mut dirs = dirs.to_vec();
    dirs.sort();
    dirs.dedup();

    let mut report = BatchReport::default();
    for dir in &dirs {
        let out_dir = opts.output_root.join(dir_label(dir));
        match process_dir(dir, dir, &out_dir, opts) {
            Ok(r) => {
                tracing::info!(
                    "'{}' done: {} merged, {} failed",
                    dir.display(),
                    r.merged.len(),
                    r.failed.len()
                );
                report.dirs.push(r);
            }
            Err(e) => {
                tracing::warn!("skipping '{}': {e}", dir.display());
                report.skipped_dirs.push(FileFailure {
                    descriptor: dir.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    report
}

/// Last path component of `dir`, resolving `.`/`..` through the filesystem when needed.
fn dir_label(dir: &Path) -> String {
    let name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
    name(dir)
        .or_else(|| dir.canonicalize().ok().and_then(|p| name(&p)))
        .unwrap_or_else(|| "root".to_owned())
}

fn build_thread_pool(threads: Option<usize>) -> MergeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MergeError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MergeError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/driver.rs"]
mod tests;
