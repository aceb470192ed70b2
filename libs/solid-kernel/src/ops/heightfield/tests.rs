//! # Heightfield Tests

use super::*;
use approx::assert_relative_eq;
use image::Luma;

fn config() -> KernelConfig {
    KernelConfig::default()
}

fn flat(rows: usize, cols: usize, h: f64) -> HeightGrid {
    HeightGrid::new(rows, cols, vec![h; rows * cols]).unwrap()
}

// =============================================================================
// GRID
// =============================================================================

#[test]
fn test_grid_rejects_too_small() {
    assert!(HeightGrid::new(1, 4, vec![0.0; 4]).unwrap_err().is_configuration());
    assert!(HeightGrid::new(4, 1, vec![0.0; 4]).unwrap_err().is_configuration());
    assert!(HeightGrid::from_rows(vec![]).unwrap_err().is_configuration());
}

#[test]
fn test_grid_rejects_ragged_rows() {
    let err = HeightGrid::from_rows(vec![vec![0.0, 1.0], vec![0.0]]).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_grid_from_gray_image_flips_rows() {
    let mut image = GrayImage::new(2, 2);
    image.put_pixel(0, 0, Luma([255]));
    let grid = HeightGrid::from_gray_image(&image).unwrap();
    // Image top-left lands on the last grid row.
    assert_relative_eq!(grid.get(1, 0), 1.0);
    assert_relative_eq!(grid.get(0, 0), 0.0);
}

#[test]
fn test_grid_serde_as_nested_rows() {
    let grid: HeightGrid = serde_json::from_str("[[0, 1], [2, 3]]").unwrap();
    assert_eq!(grid.get(1, 0), 2.0);
    assert_eq!(serde_json::to_string(&grid).unwrap(), "[[0.0,1.0],[2.0,3.0]]");
}

// =============================================================================
// MESH
// =============================================================================

#[test]
fn test_flat_grid_is_box() {
    let mesh = mesh_heightfield(&flat(2, 2, 1.0), &HeightfieldParams::default(), &config()).unwrap();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.is_closed_manifold());
    assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_counts_for_larger_grid() {
    let grid = HeightGrid::new(3, 4, (0..12).map(|i| 1.0 + f64::from(i)).collect()).unwrap();
    let mesh = mesh_heightfield(&grid, &HeightfieldParams::default(), &config()).unwrap();
    assert_eq!(mesh.vertex_count(), 24);
    // 6 cells × 2 × 2 caps + 10 perimeter edges × 2.
    assert_eq!(mesh.triangle_count(), 24 + 20);
    assert!(mesh.is_closed_manifold());
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn test_scale_and_base() {
    let params = HeightfieldParams {
        scale: [2.0, 3.0, 4.0],
        base: 1.0,
        invert: Invert::None,
    };
    let mesh = mesh_heightfield(&flat(2, 2, 0.5), &params, &config()).unwrap();
    let (min, max) = mesh.bounding_box();
    assert_eq!(min, DVec3::ZERO);
    assert_eq!(max, DVec3::new(2.0, 3.0, 3.0));
    assert_relative_eq!(mesh.signed_volume(), 18.0, epsilon = 1e-12);
}

#[test]
fn test_small_scale_grid_stays_closed() {
    let grid = HeightGrid::new(3, 3, vec![1.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 1.0]).unwrap();
    let params = HeightfieldParams {
        scale: [1e-4, 1e-4, 1e-4],
        ..Default::default()
    };
    let mesh = mesh_heightfield(&grid, &params, &config()).unwrap();
    assert_eq!(mesh.triangle_count(), 16 + 16);
    assert!(mesh.is_closed_manifold());
}

#[test]
fn test_invert_range_flips_within_samples() {
    let grid = HeightGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let params = HeightfieldParams {
        invert: Invert::Range,
        ..Default::default()
    };
    let mesh = mesh_heightfield(&grid, &params, &config()).unwrap();
    // Top vertex over (0, 0) takes 4 − 1 + 1.
    let top = mesh
        .vertices()
        .iter()
        .find(|v| v.x == 0.0 && v.y == 0.0 && v.z > 0.0)
        .copied()
        .unwrap();
    assert_relative_eq!(top.z, 4.0);
}

#[test]
fn test_invert_unit_flips_unit_range() {
    let params = HeightfieldParams {
        invert: Invert::Unit,
        ..Default::default()
    };
    let mesh = mesh_heightfield(&flat(2, 2, 0.25), &params, &config()).unwrap();
    let (_, max) = mesh.bounding_box();
    assert_relative_eq!(max.z, 0.75);
}

#[test]
fn test_invert_variants_differ() {
    let h = 0.25;
    let range = (0.0, 2.0);
    assert_relative_eq!(Invert::Range.apply(h, range), 1.75);
    assert_relative_eq!(Invert::Unit.apply(h, range), 0.75);
    assert_relative_eq!(Invert::None.apply(h, range), 0.25);
}

#[test]
fn test_non_positive_scale_is_configuration_error() {
    for scale in [[0.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, f64::NAN]] {
        let params = HeightfieldParams {
            scale,
            ..Default::default()
        };
        let err = mesh_heightfield(&flat(2, 2, 1.0), &params, &config()).unwrap_err();
        assert!(err.is_configuration());
    }
}

#[test]
fn test_perimeter_ring_order() {
    assert_eq!(perimeter_ring(2, 2), vec![0, 1, 3, 2]);
    assert_eq!(perimeter_ring(3, 3), vec![0, 1, 2, 5, 8, 7, 6, 3]);
}

#[test]
fn test_grid_faces_wind_clockwise() {
    let faces = grid_faces(2, 3);
    assert_eq!(faces.len(), 4);
    let xy = |i: usize| glam::DVec2::new((i % 3) as f64, (i / 3) as f64);
    for [a, b, c] in faces {
        assert!((xy(b) - xy(a)).perp_dot(xy(c) - xy(a)) < 0.0);
    }
}

#[test]
fn test_params_deserialize() {
    let params: HeightfieldParams =
        serde_json::from_str(r#"{"scale": [1, 2, 3], "invert": "unit"}"#).unwrap();
    assert_eq!(params.scale, [1.0, 2.0, 3.0]);
    assert_eq!(params.invert, Invert::Unit);
    assert_eq!(params.base, 0.0);
}
