use super::*;
use crate::assets::decode::Raster;

#[test]
fn save_creates_parent_dirs_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merged").join("ev01").join("a.png");
    let raster = Raster::solid(3, 2, [1, 2, 3, 100]);

    save_canvas(Canvas::from_base(&raster), &out).unwrap();

    let back = image::open(&out).unwrap().to_rgba8();
    assert_eq!(Raster::from(back), raster);
    assert!(!partial_path(&out).exists());
}

#[test]
fn save_overwrites_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a.png");
    std::fs::write(&out, b"stale").unwrap();

    save_canvas(Canvas::from_base(&Raster::solid(1, 1, [0, 0, 0, 255])), &out).unwrap();
    assert_eq!(image::open(&out).unwrap().width(), 1);
}

#[test]
fn failed_save_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    // The destination is a non-empty directory, so the final rename fails.
    let out = dir.path().join("taken.png");
    std::fs::create_dir(&out).unwrap();
    std::fs::write(out.join("keep"), b"x").unwrap();

    let err = save_canvas(Canvas::from_base(&Raster::solid(1, 1, [0; 4])), &out);
    assert!(err.is_err());
    assert!(!partial_path(&out).exists());
    assert!(out.join("keep").exists());
}

#[test]
fn partial_path_is_hidden_sibling() {
    assert_eq!(
        partial_path(Path::new("out/x.png")),
        Path::new("out").join(".x.png.partial")
    );
}
