use std::path::{Path, PathBuf};

/// File extension of layer assets (without the dot).
pub const IMAGE_EXTENSION: &str = "png";

/// Map a logical layer name to `<asset_dir>/<stem>.png` if that file exists.
///
/// A miss is expected for sparse asset sets and is not an error; callers decide whether it
/// is fatal (base layer) or skippable (overlay). Matching is exact and case-sensitive.
pub fn resolve_asset(stem: &str, asset_dir: &Path) -> Option<PathBuf> {
    let path = asset_path(stem, asset_dir);
    path.is_file().then_some(path)
}

/// The path [`resolve_asset`] probes for `stem`, whether or not it exists.
pub fn asset_path(stem: &str, asset_dir: &Path) -> PathBuf {
    asset_dir.join(format!("{stem}.{IMAGE_EXTENSION}"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
