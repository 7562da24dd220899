use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

struct CountingLoader {
    calls: AtomicUsize,
}

impl ImageLoader for CountingLoader {
    fn load(&self, path: &Path) -> MergeResult<Arc<Raster>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if path.ends_with("bad.png") {
            return Err(crate::MergeError::validation("bad"));
        }
        Ok(Arc::new(Raster::solid(1, 1, [1, 2, 3, 4])))
    }
}

#[test]
fn fs_loader_decodes_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.png");
    image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 40]))
        .save(&path)
        .unwrap();

    let raster = FsImageLoader.load(&path).unwrap();
    assert_eq!((raster.width, raster.height), (3, 2));
    assert_eq!(raster.pixel(2, 1), Some([10, 20, 30, 40]));
}

#[test]
fn fs_loader_reports_path_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not png").unwrap();

    let err = FsImageLoader.load(&path).unwrap_err();
    assert!(err.to_string().contains("broken.png"));
}

#[test]
fn cache_hits_share_the_raster() {
    let loader = CachedImageLoader::new(CountingLoader {
        calls: AtomicUsize::new(0),
    });
    let a = loader.load(Path::new("x/a.png")).unwrap();
    let b = loader.load(Path::new("x/a.png")).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(loader.inner.calls.load(Ordering::SeqCst), 1);
    assert_eq!(loader.len(), 1);
}

#[test]
fn cache_does_not_remember_failures() {
    let loader = CachedImageLoader::new(CountingLoader {
        calls: AtomicUsize::new(0),
    });
    assert!(loader.load(Path::new("bad.png")).is_err());
    assert!(loader.load(Path::new("bad.png")).is_err());

    assert_eq!(loader.inner.calls.load(Ordering::SeqCst), 2);
    assert!(loader.is_empty());
}
