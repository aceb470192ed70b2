//! # Heightfield Solid Builder
//!
//! Builds a closed solid from a rectangular grid of height samples: a top
//! surface following the samples, a flat bottom at `z = 0`, and one ring of
//! wall quads around the grid perimeter.
//!
//! ## Vertex layout
//!
//! ```text
//! 0 .. n      bottom block  (x·sx, y·sy, 0)
//! n .. 2n     top block     (x·sx, y·sy, h·sz + base)
//! ```
//!
//! With the grid triangulated clockwise and the perimeter traced
//! counter-clockwise, the two blocks are exactly a two-layer loft, so the
//! loft's cap and wall stitchers are reused unchanged.

#[cfg(test)]
mod tests;

use config::KernelConfig;
use glam::DVec3;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::cleanup::cleanup;
use super::loft::caps::{bottom_cap, top_cap};
use super::loft::walls::stitch_walls;
use crate::error::{KernelError, Result};
use crate::mesh::Mesh;

/// Rectangular grid of height samples, row-major, row 0 at `y = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct HeightGrid {
    rows: usize,
    cols: usize,
    samples: Vec<f64>,
}

impl HeightGrid {
    /// Creates a grid from row-major samples.
    ///
    /// # Errors
    ///
    /// `Configuration` if `rows` or `cols` is below 2, the sample count does
    /// not match, or a sample is not finite.
    pub fn new(rows: usize, cols: usize, samples: Vec<f64>) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(KernelError::configuration(format!(
                "height grid needs at least 2x2 samples, got {rows}x{cols}"
            )));
        }
        if samples.len() != rows * cols {
            return Err(KernelError::configuration(format!(
                "height grid of {rows}x{cols} needs {} samples, got {}",
                rows * cols,
                samples.len()
            )));
        }
        if samples.iter().any(|h| !h.is_finite()) {
            return Err(KernelError::configuration(
                "height grid contains a non-finite sample",
            ));
        }
        Ok(Self {
            rows,
            cols,
            samples,
        })
    }

    /// Creates a grid from nested rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(KernelError::configuration("height grid rows differ in length"));
        }
        Self::new(row_count, cols, rows.into_iter().flatten().collect())
    }

    /// Samples a grayscale raster, mapping pixel values to `[0, 1]`.
    ///
    /// Image rows run top-down, so they are flipped to keep the picture
    /// upright when viewed from above.
    pub fn from_gray_image(image: &GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in (0..height).rev() {
            for x in 0..width {
                samples.push(f64::from(image.get_pixel(x, y)[0]) / 255.0);
            }
        }
        Self::new(height as usize, width as usize, samples)
    }

    /// Number of rows (y direction).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (x direction).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Sample at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.samples[row * self.cols + col]
    }

    /// Row-major samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Smallest and largest sample.
    pub fn range(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }
}

impl TryFrom<Vec<Vec<f64>>> for HeightGrid {
    type Error = KernelError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<HeightGrid> for Vec<Vec<f64>> {
    fn from(grid: HeightGrid) -> Self {
        grid.samples
            .chunks(grid.cols)
            .map(<[f64]>::to_vec)
            .collect()
    }
}

/// Height inversion applied before scaling.
///
/// Two conventions are in use and kept apart on purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invert {
    /// Heights used as given.
    #[default]
    None,
    /// `max − h + min` over the grid: flips within the sample range.
    Range,
    /// `1 − h`: flips unit-range samples such as normalized rasters.
    Unit,
}

impl Invert {
    fn apply(self, h: f64, (min, max): (f64, f64)) -> f64 {
        match self {
            Invert::None => h,
            Invert::Range => max - h + min,
            Invert::Unit => 1.0 - h,
        }
    }
}

/// Parameters for a heightfield solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightfieldParams {
    /// Per-axis scale `[x, y, z]`; every component must be positive.
    pub scale: [f64; 3],
    /// Offset added to every top vertex height.
    pub base: f64,
    /// Inversion convention.
    pub invert: Invert,
}

impl Default for HeightfieldParams {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.0, 1.0],
            base: 0.0,
            invert: Invert::None,
        }
    }
}

/// Builds a closed solid from a height grid.
///
/// # Example
///
/// ```rust
/// use config::KernelConfig;
/// use solid_kernel::ops::{mesh_heightfield, HeightGrid, HeightfieldParams};
///
/// let grid = HeightGrid::from_rows(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
/// let mesh = mesh_heightfield(&grid, &HeightfieldParams::default(), &KernelConfig::default()).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert!(mesh.is_closed_manifold());
/// ```
#[instrument(skip_all, fields(rows = grid.rows(), cols = grid.cols()))]
pub fn mesh_heightfield(
    grid: &HeightGrid,
    params: &HeightfieldParams,
    config: &KernelConfig,
) -> Result<Mesh> {
    let [sx, sy, sz] = params.scale;
    if params.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(KernelError::configuration(format!(
            "heightfield scale must be positive, got [{sx}, {sy}, {sz}]"
        )));
    }
    if !params.base.is_finite() {
        return Err(KernelError::configuration("heightfield base must be finite"));
    }

    let (rows, cols) = (grid.rows(), grid.cols());
    let block = rows * cols;
    let range = grid.range();

    let mut vertices = Vec::with_capacity(block * 2);
    for r in 0..rows {
        for c in 0..cols {
            vertices.push(DVec3::new(c as f64 * sx, r as f64 * sy, 0.0));
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            let h = params.invert.apply(grid.get(r, c), range);
            vertices.push(DVec3::new(c as f64 * sx, r as f64 * sy, h * sz + params.base));
        }
    }

    let faces = grid_faces(rows, cols);
    let perimeter = perimeter_ring(rows, cols);

    let mut triangles = bottom_cap(&faces, 0);
    triangles.extend(top_cap(&faces, block));
    triangles.extend(stitch_walls(&[perimeter], block, 2));

    debug!(
        vertices = vertices.len(),
        triangles = triangles.len(),
        "meshed heightfield"
    );

    let (mesh, report) = cleanup(Mesh::from_parts(vertices, triangles), config.merge_epsilon);
    debug!(?report, "cleaned heightfield mesh");
    Ok(mesh)
}

/// Two clockwise triangles per grid cell.
fn grid_faces(rows: usize, cols: usize) -> Vec<[usize; 3]> {
    let mut faces = Vec::with_capacity((rows - 1) * (cols - 1) * 2);
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let i00 = r * cols + c;
            let i10 = i00 + 1;
            let i01 = i00 + cols;
            let i11 = i01 + 1;
            faces.push([i00, i11, i10]);
            faces.push([i00, i01, i11]);
        }
    }
    faces
}

/// Grid perimeter traced counter-clockwise without repeating corners:
/// bottom row, right column, top row reversed, left column reversed.
fn perimeter_ring(rows: usize, cols: usize) -> Vec<usize> {
    let mut ring = Vec::with_capacity(2 * (rows + cols) - 4);
    ring.extend(0..cols);
    ring.extend((1..rows).map(|r| r * cols + cols - 1));
    ring.extend((0..cols - 1).rev().map(|c| (rows - 1) * cols + c));
    ring.extend((1..rows - 1).rev().map(|r| r * cols));
    ring
}
