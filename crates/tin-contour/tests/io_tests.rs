//! Tests for TIN loading and GeoJSON output.

use test_utils::{assert_approx_eq, create_hills_tin, temp_test_dir, tin_to_json};
use tin_contour::io::{read_tin_file, write_geojson, write_geojson_file, ContourFeatureCollection};
use tin_contour::{contours_from_tin, ContourConfig, ContourError, Triangle};

fn hills_result() -> (Vec<Triangle>, tin_contour::ContourResult) {
    let tin: Vec<Triangle> = create_hills_tin(30, 10.0).into_iter().map(Triangle::from).collect();
    let result = contours_from_tin(&tin, &ContourConfig::default()).unwrap();
    (tin, result)
}

// ============================================================================
// TIN reading tests
// ============================================================================

#[test]
fn test_read_tin_file_roundtrip() {
    let raw = create_hills_tin(6, 1.0);
    let dir = temp_test_dir();
    let path = dir.path().join("hills.json");
    std::fs::write(&path, tin_to_json(&raw)).unwrap();

    let tin = read_tin_file(&path).unwrap();
    assert_eq!(tin.len(), raw.len());
    for (tri, expected) in tin.iter().zip(&raw) {
        for (v, e) in tri.vertices.iter().zip(expected) {
            assert_approx_eq!(v.x, e[0], 1e-12);
            assert_approx_eq!(v.y, e[1], 1e-12);
            assert_approx_eq!(v.z, e[2], 1e-12);
        }
    }
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = temp_test_dir();
    let err = read_tin_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ContourError::Io(_)), "{:?}", err);
}

#[test]
fn test_read_malformed_file_is_json_error() {
    let dir = temp_test_dir();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "[[[0, 0, 0], [1, 0]]]").unwrap();
    let err = read_tin_file(&path).unwrap_err();
    assert!(matches!(err, ContourError::Json(_)), "{:?}", err);
}

// ============================================================================
// GeoJSON output tests
// ============================================================================

#[test]
fn test_feature_collection_shape() {
    let (_, result) = hills_result();
    let collection = ContourFeatureCollection::from_result(&result, -1.0, 1.0);

    assert_eq!(collection.type_, "FeatureCollection");
    assert_eq!(collection.features.len(), result.total_polylines());

    let thresholds: Vec<f64> = result.thresholds().collect();
    for feature in &collection.features {
        assert_eq!(feature.type_, "Feature");
        assert_eq!(feature.geometry.type_, "LineString");
        assert!(feature.geometry.coordinates.len() > 5);
        assert!(thresholds.contains(&feature.properties.threshold));
        let expected_band = (feature.properties.threshold + 1.0) / 2.0;
        assert!((feature.properties.band - expected_band).abs() < 1e-12);
    }
}

#[test]
fn test_write_geojson_file() {
    let (_, result) = hills_result();
    let dir = temp_test_dir();
    let path = dir.path().join("contours.geojson");

    write_geojson_file(&path, &result, -1.0, 1.0).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), result.total_polylines());
    assert_eq!(features[0]["geometry"]["type"], "LineString");
    assert!(features[0]["properties"]["threshold"].is_f64());
}

#[test]
fn test_write_geojson_pretty_parses_back() {
    let (_, result) = hills_result();
    let mut buf = Vec::new();
    write_geojson(&mut buf, &result, -1.0, 1.0, true).unwrap();

    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains('\n'));

    let parsed: ContourFeatureCollection = serde_json::from_str(&text).unwrap();
    let expected = ContourFeatureCollection::from_result(&result, -1.0, 1.0);
    assert_eq!(parsed.features.len(), expected.features.len());
    for (got, want) in parsed.features.iter().zip(&expected.features) {
        assert_eq!(got.geometry.coordinates.len(), want.geometry.coordinates.len());
        assert_approx_eq!(got.properties.threshold, want.properties.threshold, 1e-12);
    }
}
