//! File-backed conformance tests for the PLY-subset loader.
//!
//! Each test writes a fixture to a temp directory and loads it through the
//! public path-based API, so the `File::open` error mapping and buffered
//! reading are exercised along with the parser.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use meshview_io::{load_ply, load_ply_into, IoError, LoadOptions};
use meshview_types::{Mesh, Point3, Vector3};
use tempfile::tempdir;

/// 4 vertices with normals, 2 triangles: the tetrahedron corner fixture.
const TETRA_NORMALS: &str = "\
ply
format ascii 1.0
comment corner of the unit cube
element vertex 4
property float x
property float y
property float z
property float nx
property float ny
property float nz
element face 2
property list uchar int vertex_indices
end_header
0 0 0 0 0 1
1 0 0 0 0 1
0 1 0 0 0 1
0 0 1 1 0 0
3 0 1 2
3 0 2 3
";

/// 4 colored vertices, 2 triangles sharing vertices 0 and 1. Face 0 has
/// normal +Z, face 1 has normal +Y; face 1 appears later in the file.
const QUAD_COLORS: &str = "\
ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
element face 2
property list uchar int vertex_indices
end_header
0 0 0 255 0 0
1 0 0 0 255 0
0 1 0 0 0 255
0 0 1 128 64 32
3 0 1 2
3 0 3 1
";

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn scenario_tetrahedron_counts_and_bounds() {
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "tetra.ply", TETRA_NORMALS);

    let mesh = load_ply(&path, LoadOptions::normals()).unwrap();

    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.min_bounds(), Point3::new(0.0, 0.0, 0.0));
    assert_eq!(mesh.max_bounds(), Point3::new(1.0, 1.0, 1.0));
    assert_eq!(mesh.positions().len(), 3 * mesh.vertex_count());
    assert_eq!(mesh.indices().len(), 3 * mesh.face_count());
}

#[test]
fn bounds_match_linear_scan() {
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "tetra.ply", TETRA_NORMALS);

    let mesh = load_ply(&path, LoadOptions::normals()).unwrap();

    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for vertex in mesh.positions().chunks_exact(3) {
        for axis in 0..3 {
            min[axis] = min[axis].min(vertex[axis]);
            max[axis] = max[axis].max(vertex[axis]);
        }
    }

    assert_eq!(mesh.min_bounds(), Point3::new(min[0], min[1], min[2]));
    assert_eq!(mesh.max_bounds(), Point3::new(max[0], max[1], max[2]));
}

#[test]
fn scenario_shared_vertex_takes_later_face_normal() {
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "quad.ply", QUAD_COLORS);

    let mesh = load_ply(&path, LoadOptions::colors()).unwrap();

    // overwrite semantics: the +Y face is last in file order
    assert_eq!(mesh.normal(0), Some(Vector3::new(0.0, 1.0, 0.0)));
    // vertex 2 belongs only to the +Z face
    assert_eq!(mesh.normal(2), Some(Vector3::new(0.0, 0.0, 1.0)));
}

#[test]
fn colors_are_normalized_bytes() {
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "quad.ply", QUAD_COLORS);

    let mesh = load_ply(&path, LoadOptions::colors()).unwrap();
    let colors = mesh.colors().unwrap();

    assert_eq!(colors.len(), 3 * mesh.vertex_count());
    assert!((colors[0] - 1.0).abs() < f32::EPSILON);
    assert!((colors[9] - 128.0 / 255.0).abs() < f32::EPSILON);
    assert!((colors[10] - 64.0 / 255.0).abs() < f32::EPSILON);
    assert!((colors[11] - 32.0 / 255.0).abs() < f32::EPSILON);
}

#[test]
fn normals_mode_has_no_colors() {
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "tetra.ply", TETRA_NORMALS);

    let mesh = load_ply(&path, LoadOptions::normals()).unwrap();
    assert!(mesh.colors().is_none());
}

#[test]
fn scenario_bad_magic_leaves_mesh_empty() {
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "notply.ply", "solid something\nendsolid\n");

    let mut mesh = Mesh::new();
    let err = load_ply_into(&mut mesh, &path, LoadOptions::normals()).unwrap_err();

    assert!(matches!(err, IoError::BadMagic { .. }));
    assert_eq!(mesh.vertex_count(), 0);
    assert!(mesh.is_empty());
}

#[test]
fn scenario_index_equal_to_vertex_count_fails() {
    let fixture = "\
ply
element vertex 4
element face 2
end_header
0 0 0 0 0 1
1 0 0 0 0 1
0 1 0 0 0 1
0 0 1 1 0 0
3 0 1 2
3 0 2 4
";
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "oob.ply", fixture);

    let err = load_ply(&path, LoadOptions::normals()).unwrap_err();
    assert!(matches!(
        err,
        IoError::IndexOutOfRange {
            index: 4,
            vertex_count: 4,
            ..
        }
    ));
}

#[test]
fn reload_replaces_previous_geometry() {
    let dir = tempdir().unwrap();
    let tetra = write_fixture(&dir, "tetra.ply", TETRA_NORMALS);

    let triangle = "\
ply
element vertex 3
element face 1
end_header
2 2 2 0 0 1
3 2 2 0 0 1
2 3 2 0 0 1
3 0 1 2
";
    let tri_path = write_fixture(&dir, "tri.ply", triangle);

    let mut mesh = load_ply(&tetra, LoadOptions::normals()).unwrap();
    assert_eq!(mesh.vertex_count(), 4);

    load_ply_into(&mut mesh, &tri_path, LoadOptions::normals()).unwrap();

    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.positions().len(), 9);
    assert_eq!(mesh.indices().len(), 3);
    // bounds belong to the new file, not the old one
    assert_eq!(mesh.min_bounds(), Point3::new(2.0, 2.0, 2.0));
    assert_eq!(mesh.max_bounds(), Point3::new(3.0, 3.0, 2.0));
}

#[test]
fn failed_reload_clears_previous_geometry() {
    let dir = tempdir().unwrap();
    let tetra = write_fixture(&dir, "tetra.ply", TETRA_NORMALS);
    let truncated = write_fixture(
        &dir,
        "truncated.ply",
        "ply\nelement vertex 2\nelement face 0\nend_header\n0 0 0 0 0 1\n",
    );

    let mut mesh = load_ply(&tetra, LoadOptions::normals()).unwrap();
    assert_eq!(mesh.vertex_count(), 4);

    let err = load_ply_into(&mut mesh, &truncated, LoadOptions::normals()).unwrap_err();

    assert!(matches!(err, IoError::UnexpectedEof { .. }));
    assert!(mesh.is_empty());
    assert!(mesh.bounds().is_empty());
}

#[test]
fn nonexistent_file_reports_file_not_found() {
    let result = load_ply("does_not_exist_12345.ply", LoadOptions::normals());
    assert!(
        matches!(result, Err(IoError::FileNotFound { ref path }) if path.to_string_lossy().contains("does_not_exist"))
    );
}
