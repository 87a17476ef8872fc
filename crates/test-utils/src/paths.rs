//! Temporary output locations and TIN files for I/O tests.

/// Creates a temporary directory for test output.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("tin_contour_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Serialises raw triangles as the JSON TIN format read by `tin-contour`.
pub fn tin_to_json(tin: &[[[f64; 3]; 3]]) -> String {
    serde_json::to_string(tin).expect("Failed to serialise TIN")
}
