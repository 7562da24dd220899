use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Context;

use crate::{
    assets::decode::{Raster, decode_image},
    foundation::error::MergeResult,
};

/// Source of decoded rasters for resolved asset paths.
///
/// Implementations must be shareable across batch workers.
pub trait ImageLoader: Send + Sync {
    /// Read and decode the image at `path`.
    fn load(&self, path: &Path) -> MergeResult<Arc<Raster>>;
}

impl<L: ImageLoader + ?Sized> ImageLoader for &L {
    fn load(&self, path: &Path) -> MergeResult<Arc<Raster>> {
        (**self).load(path)
    }
}

/// Loads images straight from the filesystem on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path) -> MergeResult<Arc<Raster>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let raster = decode_image(&bytes)
            .map_err(|e| anyhow::anyhow!("decode image '{}': {e}", path.display()))?;
        Ok(Arc::new(raster))
    }
}

/// Memoizing wrapper around another loader, keyed by path.
///
/// Overlay assets are typically shared by many descriptors of one directory. Failed loads
/// are not cached.
#[derive(Debug, Default)]
pub struct CachedImageLoader<L = FsImageLoader> {
    inner: L,
    cache: Mutex<HashMap<PathBuf, Arc<Raster>>>,
}

impl<L: ImageLoader> CachedImageLoader<L> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached rasters.
    pub fn len(&self) -> usize {
        self.cache.lock().map_or(0, |c| c.len())
    }

    /// `true` when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: ImageLoader> ImageLoader for CachedImageLoader<L> {
    fn load(&self, path: &Path) -> MergeResult<Arc<Raster>> {
        if let Some(hit) = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("image cache lock poisoned"))?
            .get(path)
        {
            return Ok(Arc::clone(hit));
        }

        // Decode outside the lock; concurrent misses on one path may decode twice.
        let raster = self.inner.load(path)?;
        self.cache
            .lock()
            .map_err(|_| anyhow::anyhow!("image cache lock poisoned"))?
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::clone(&raster));
        Ok(raster)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
