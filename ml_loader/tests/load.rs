use ml_format::mesh::{Model, SourceFormat, TextureKind};
use ml_loader::{load, load_batch, LoadError};
use std::path::{Path, PathBuf};

fn model_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/models")
        .join(name)
}

#[test]
fn loads_an_obj_with_its_material_file() {
    let model = load(model_path("creeper.obj")).expect("creeper.obj should load");

    assert_eq!(model.meshes.len(), 2);

    let body = &model.meshes[0];
    assert_eq!(body.format, SourceFormat::Obj);
    assert_eq!(body.material_name, "Body");
    assert_eq!(body.material.specular_exponent, Some(250.0));
    assert_eq!(body.material.illumination, Some(2));
    assert_eq!(body.geometry.positions.len(), 3);
    assert!(body.geometry.is_consistent());

    let face = &model.meshes[1];
    assert_eq!(face.material.diffuse_map.as_deref(), Some("face.png"));
    // the map file is absent, so no texture reference gets attached
    assert!(face.textures.is_empty());
}

#[test]
fn loads_a_dae_with_texture_and_effect() {
    let model = load(model_path("plane.dae")).expect("plane.dae should load");

    assert_eq!(model.meshes.len(), 1);

    let mesh = &model.meshes[0];
    assert_eq!(mesh.format, SourceFormat::Dae);
    assert_eq!(mesh.material_name, "Checker");
    assert_eq!(mesh.geometry.triangle_count(), 2);
    assert_eq!(mesh.geometry.uvs.len(), 6);
    assert!(mesh.geometry.is_consistent());
    assert_eq!(mesh.material.reflectivity, Some(0.5));

    assert_eq!(mesh.textures.len(), 1);
    assert_eq!(mesh.textures[0].kind, TextureKind::Map);
    assert!(mesh.textures[0].path.ends_with("checker.png"));
}

#[test]
fn unsupported_extensions_are_rejected() {
    let err = load(model_path("creeper.fbx")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedExtension(_)));
}

#[test]
fn missing_files_report_io_errors() {
    let err = load(model_path("nonexistent.obj")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn a_corrupt_obj_aborts_its_load_only() {
    let results = load_batch(&[model_path("broken.obj"), model_path("creeper.obj")]);

    assert_eq!(results.len(), 2);
    assert!(matches!(
        results[0].1,
        Err(LoadError::CorruptIndices { .. })
    ));

    let model = results[1].1.as_ref().expect("later files are unaffected");
    assert_eq!(model.meshes.len(), 2);
}

#[test]
fn loaded_models_round_trip_through_bytes() {
    let model = load(model_path("creeper.obj")).unwrap();
    let bytes = model.to_bytes().unwrap();
    assert_eq!(Model::from_bytes(&bytes).unwrap(), model);
}
