//! File-system loading against a scratch directory.

use std::fs;
use std::io;
use std::path::Path;

use tessera_asset::{AccessorData, Asset, AssetError};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn test_missing_sibling_then_present() {
    let dir = tempfile::tempdir().unwrap();
    let gltf = dir.path().join("Box.gltf");
    fs::copy(fixture("Box.gltf"), &gltf).unwrap();

    let asset = Asset::load(&gltf).unwrap();
    let buffer = &asset.document().buffers[0];

    let err = asset.buffer_data(buffer).unwrap_err();
    match err {
        AssetError::Io { location, source } => {
            assert_eq!(location, dir.path().join("Box0.bin"));
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(asset.cache().is_empty());

    fs::copy(fixture("Box0.bin"), dir.path().join("Box0.bin")).unwrap();
    assert_eq!(asset.buffer_data(buffer).unwrap().len(), 648);
}

#[test]
fn test_escaped_sibling_name() {
    let dir = tempfile::tempdir().unwrap();
    let values: Vec<u8> = [1.5f32, -2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
    fs::write(dir.path().join("scalar data.bin"), &values).unwrap();
    fs::write(
        dir.path().join("scalars.gltf"),
        r#"{
            "asset": {"version": "2.0"},
            "buffers": [{"byteLength": 8, "uri": "scalar%20data.bin"}],
            "bufferViews": [{"buffer": 0, "byteLength": 8}],
            "accessors": [{"bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR",
                           "min": [-2.0], "max": [1.5]}]
        }"#,
    )
    .unwrap();

    let asset = Asset::load(dir.path().join("scalars.gltf")).unwrap();
    let decoded = asset.read_accessor(&asset.document().accessors[0]).unwrap();
    assert_eq!(decoded.data, AccessorData::F32(vec![1.5, -2.0]));
    assert!(decoded.diagnostics.is_empty());
}

#[test]
fn test_missing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let err = Asset::load(dir.path().join("absent.glb")).unwrap_err();
    assert!(matches!(err, AssetError::Io { .. }));
}

#[test]
fn test_glb_with_wrong_extension_fails_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("box.gltf");
    fs::copy(fixture("Box.glb"), &path).unwrap();
    let err = Asset::load(&path).unwrap_err();
    assert!(matches!(err, AssetError::Document(_)));
    assert!(err.is_format_error());
}
