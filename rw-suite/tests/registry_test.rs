use glam::Vec3;
use pretty_assertions::assert_eq;
use rw_col::{CollisionFile, CollisionModel, Shape, Sphere, Surface};
use rw_img::{ImgArchive, write_archive_v1};
use rw_suite::{Asset, FormatKind, RegistryError, Summary, load_path, save_path};
use tempfile::TempDir;

fn collision() -> Asset {
    let mut model = CollisionModel {
        name: Some("barrel".into()),
        model_id: 1225,
        shapes: vec![Shape::Sphere(Sphere {
            center: Vec3::new(0.0, 0.0, 0.5),
            radius: 0.5,
            surface: Surface::default(),
        })],
        ..CollisionModel::default()
    };
    model.bounds = model.compute_bounds();
    Asset::Collision(CollisionFile {
        models: vec![model],
    })
}

#[test]
fn test_save_and_load_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("barrels.col");
    let asset = collision();

    save_path(&path, &asset).unwrap();
    let loaded = load_path(&path).unwrap();
    assert_eq!(loaded.value, asset);
    assert_eq!(loaded.value.kind(), FormatKind::Col);

    let summary = Summary::new(&loaded);
    assert_eq!(summary.description, "COL - Collision Data Format");
    assert_eq!(summary.stats[0].value, "1");
    assert!(summary.stats[1].value.starts_with("barrel (id 1225): 1 spheres"));
}

#[test]
fn test_save_path_checks_extension() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        save_path(dir.path().join("barrels.txd"), &collision()),
        Err(RegistryError::KindMismatch {
            expected: FormatKind::Txd,
            found: FormatKind::Col,
            ..
        })
    ));
    assert!(matches!(
        save_path(dir.path().join("barrels"), &collision()),
        Err(RegistryError::UnknownExtension(_))
    ));
}

#[test]
fn test_load_path_reports_format_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.dff");
    std::fs::write(&path, b"").unwrap();
    let error = load_path(&path).unwrap_err();
    assert!(matches!(error, RegistryError::Format { .. }));
    assert!(error.to_string().contains("empty.dff"));
}

fn archive() -> ImgArchive {
    let mut archive = ImgArchive::default();
    archive.add("barrels.col", vec![7; 100]);
    archive.add("barrels.txd", vec![8; 5000]);
    archive
}

#[test]
fn test_version2_archive_through_the_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gta3.img");
    let asset = Asset::Archive(archive());

    save_path(&path, &asset).unwrap();
    assert_eq!(FormatKind::detect(&std::fs::read(&path).unwrap()), Some(FormatKind::Img));
    let loaded = load_path(&path).unwrap();
    assert_eq!(loaded.value, asset);

    let summary = Summary::new(&loaded);
    assert_eq!(summary.stats[0].value, "2");
    assert_eq!(summary.stats[1].value, "4");
}

#[test]
fn test_version1_archive_reads_its_directory() {
    let dir = TempDir::new().unwrap();
    let (directory, data) = write_archive_v1(&archive()).unwrap();
    std::fs::write(dir.path().join("gta3.img"), data).unwrap();

    // the directory is required
    assert!(matches!(
        load_path(dir.path().join("gta3.img")),
        Err(RegistryError::Io { .. })
    ));

    std::fs::write(dir.path().join("gta3.dir"), directory).unwrap();
    let loaded = load_path(dir.path().join("gta3.img")).unwrap();
    assert_eq!(loaded.value, Asset::Archive(archive()));
}
