use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{foundation::error::MergeResult, render::canvas::Canvas};

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> MergeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encode `canvas` as PNG at `path`.
///
/// The image is written to a hidden sibling file first and renamed into place, so a failed
/// or interrupted write never leaves a partial PNG at `path`.
pub fn save_canvas(canvas: Canvas, path: &Path) -> MergeResult<()> {
    ensure_parent_dir(path)?;
    let tmp = partial_path(path);
    let img = canvas.into_rgba_image();

    let written = img
        .save_with_format(&tmp, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", tmp.display()))
        .and_then(|()| {
            std::fs::rename(&tmp, path)
                .with_context(|| format!("move '{}' into place", path.display()))
        });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.png".to_owned());
    path.with_file_name(format!(".{name}.partial"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
