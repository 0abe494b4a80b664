//! End-to-end integration tests for terrain-mesh.
//!
//! These exercise raster → grid → height field → triangles → STL → reload.

use std::io::Cursor;

use approx::assert_relative_eq;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use nalgebra::Point3;
use terrain_mesh::{
    BoundingBox, Coordinate, HeightField, ImageGrid, StlFormat, TerrainConfig, TerrainError,
    TerrainMesh, WmsRequest, WmsSettings, convert_grid, convert_raster, grid_from_bytes, load_stl,
    save_stl_with_format, triangulate,
};

/// A small ridge: bright column in the middle of a dark raster.
fn ridge_png(width: u32, height: u32) -> Vec<u8> {
    let image = GrayImage::from_fn(width, height, |x, _| {
        if x == width / 2 { Luma([255]) } else { Luma([64]) }
    });
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

#[test]
fn test_documented_two_by_two_scenario() {
    let grid = ImageGrid::from_rows(&[[0.0, 100.0], [50.0, 100.0]]).unwrap();
    let field = HeightField::build(&grid, 10.0).unwrap();
    let mesh = triangulate(&field);

    let a = [(0.0, 0.0, 0.0), (0.0, 1.0, 5.0), (1.0, 1.0, 10.0)];
    let b = [(0.0, 0.0, 0.0), (1.0, 0.0, 10.0), (1.0, 1.0, 10.0)];
    assert_eq!(mesh.triangle_count(), 2);
    for (tri, expected) in mesh.triangles.iter().zip([a, b]) {
        for (p, (x, y, z)) in tri.vertices.iter().zip(expected) {
            assert_eq!(*p, Point3::new(x, y, z));
        }
    }
}

#[test]
fn test_one_by_five_grid_has_no_triangles() {
    let grid = ImageGrid::new(5, 1, vec![10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
    let field = HeightField::build(&grid, 10.0).unwrap();
    assert!(triangulate(&field).is_empty());
}

#[test]
fn test_raster_to_stl_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ridge.png");
    let output = dir.path().join("ridge.stl");
    std::fs::write(&input, ridge_png(9, 6)).unwrap();

    let report = convert_raster(&input, &TerrainConfig::default(), &output).unwrap();
    assert_eq!((report.cols, report.rows), (9, 6));
    assert_eq!(report.triangle_count, 2 * 8 * 5);
    assert_relative_eq!(report.z_max, 10.0);
    assert_relative_eq!(report.z_min, 64.0 * 10.0 / 255.0);

    let reloaded = TerrainMesh::load(&output).unwrap();
    assert_eq!(reloaded.triangle_count(), report.triangle_count);
    let (min, max) = reloaded.bounds().unwrap();
    assert_relative_eq!(min.x, 0.0);
    assert_relative_eq!(max.x, 8.0);
    assert_relative_eq!(max.y, 5.0);
    assert_relative_eq!(max.z, 10.0, epsilon = 1e-5);
}

#[test]
fn test_round_trip_preserves_positions_in_both_encodings() {
    let dir = tempfile::tempdir().unwrap();
    let grid = grid_from_bytes(&ridge_png(5, 4), None).unwrap();
    let mesh = triangulate(&HeightField::build(&grid, 3.7).unwrap());

    for (name, format) in [("bin.stl", StlFormat::Binary), ("ascii.stl", StlFormat::Ascii)] {
        let path = dir.path().join(name);
        save_stl_with_format(&mesh, &path, format).unwrap();
        let reloaded = load_stl(&path).unwrap();

        assert_eq!(reloaded.triangle_count(), mesh.triangle_count());
        for (original, loaded) in mesh.triangles.iter().zip(&reloaded.triangles) {
            for (p, q) in original.vertices.iter().zip(&loaded.vertices) {
                assert_relative_eq!(p.x, q.x, epsilon = 1e-5);
                assert_relative_eq!(p.y, q.y, epsilon = 1e-5);
                assert_relative_eq!(p.z, q.z, epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn test_repeat_conversion_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let grid = grid_from_bytes(&ridge_png(12, 7), None).unwrap();
    let first = dir.path().join("first.stl");
    let second = dir.path().join("second.stl");

    convert_grid(&grid, &TerrainConfig::default(), &first).unwrap();
    convert_grid(&grid, &TerrainConfig::default(), &second).unwrap();
    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn test_oversized_raster_is_shrunk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wide.png");
    let output = dir.path().join("wide.stl");
    std::fs::write(&input, ridge_png(80, 40)).unwrap();

    let config = TerrainConfig {
        max_size: [20, 20],
        ..TerrainConfig::default()
    };
    let report = convert_raster(&input, &config, &output).unwrap();
    assert_eq!((report.cols, report.rows), (20, 10));
}

#[test]
fn test_black_raster_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("black.stl");
    let grid = ImageGrid::new(4, 4, vec![0.0; 16]).unwrap();

    let err = convert_grid(&grid, &TerrainConfig::default(), &output).unwrap_err();
    assert!(matches!(err, TerrainError::InvalidInput { .. }));
    assert!(!output.exists());
}

#[test]
fn test_region_request_for_gaustatoppen() {
    let center = Coordinate::new(59.853952, 8.648471).unwrap();
    let bbox = BoundingBox::around(center, 2.0).unwrap();
    let url = WmsRequest::new(WmsSettings::default(), bbox).url();

    assert!(bbox.min_lat < center.lat() && center.lat() < bbox.max_lat);
    assert!(bbox.min_lon < center.lon() && center.lon() < bbox.max_lon);
    assert!(url.contains(&format!("BBOX={}", bbox)));
}

#[test]
fn test_out_of_region_coordinate_reports_once() {
    let err = Coordinate::new(68.55, 40.18).unwrap_err();
    assert_eq!(err.code().as_str(), "TERRAIN-2002");
    assert!(err.to_string().contains("longitude"));
}
