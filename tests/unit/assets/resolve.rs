use super::*;

#[test]
fn resolves_existing_png() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("face_a.png"), b"x").unwrap();

    assert_eq!(
        resolve_asset("face_a", dir.path()),
        Some(dir.path().join("face_a.png"))
    );
}

#[test]
fn missing_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(resolve_asset("nope", dir.path()), None);
}

#[test]
fn directories_and_other_extensions_do_not_resolve() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("folder.png")).unwrap();
    std::fs::write(dir.path().join("face.jpg"), b"x").unwrap();

    assert_eq!(resolve_asset("folder", dir.path()), None);
    assert_eq!(resolve_asset("face", dir.path()), None);
}

#[test]
fn asset_path_appends_extension() {
    assert_eq!(
        asset_path("ev01", Path::new("cg")),
        Path::new("cg").join("ev01.png")
    );
}
