//! # Layer Stack Builder
//!
//! Computes `S + 1` layers from bottom (`t = 0`) to top (`t = 1`). Layer `i`
//! has `t = i / S`, height `z0 + t·H`, scale `(1 + t(sx−1), 1 + t(sy−1))`
//! and rotation `t · twist`.
//!
//! Every 2D vertex is scaled about the pivot first and rotated about the same
//! pivot second. This order defines the twist/taper semantics and must not
//! be swapped.

use glam::{DMat2, DVec2, DVec3};

/// One height sample of a lofted solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Height of this layer.
    pub z: f64,
    /// Interpolation parameter in `[0, 1]`.
    pub t: f64,
    /// Rotation composed with anisotropic scale (scale applied first).
    pub transform: DMat2,
}

impl Layer {
    /// Transforms a 2D point about `pivot` and lifts it to this layer's height.
    #[inline]
    pub fn apply(&self, p: DVec2, pivot: DVec2) -> DVec3 {
        let q = pivot + self.transform * (p - pivot);
        q.extend(self.z)
    }
}

/// Builds the layer stack.
///
/// `scale` is the final `(sx, sy)` reached at the top layer and `twist` the
/// total rotation in degrees reached at the top.
///
/// # Example
///
/// ```rust
/// use solid_kernel::ops::loft::layers::build_layers;
///
/// let layers = build_layers(10.0, true, 4, 90.0, (1.0, 1.0));
/// assert_eq!(layers.len(), 5);
/// assert_eq!(layers[0].z, -5.0);
/// assert_eq!(layers[4].z, 5.0);
/// ```
pub fn build_layers(
    height: f64,
    center: bool,
    slices: u32,
    twist: f64,
    scale: (f64, f64),
) -> Vec<Layer> {
    let z0 = if center { -height / 2.0 } else { 0.0 };
    let (sx, sy) = scale;

    (0..=slices)
        .map(|i| {
            let t = f64::from(i) / f64::from(slices);
            let scaling = DMat2::from_diagonal(DVec2::new(1.0 + t * (sx - 1.0), 1.0 + t * (sy - 1.0)));
            let rotation = DMat2::from_angle((t * twist).to_radians());
            Layer {
                z: z0 + t * height,
                t,
                transform: rotation * scaling,
            }
        })
        .collect()
}

/// Transforms every 2D vertex into every layer.
///
/// The result is layer-major: layer `i` occupies
/// `i * vertices.len() .. (i + 1) * vertices.len()`.
pub fn layer_vertices(layers: &[Layer], vertices: &[DVec2], pivot: DVec2) -> Vec<DVec3> {
    layers
        .iter()
        .flat_map(|layer| vertices.iter().map(move |&v| layer.apply(v, pivot)))
        .collect()
}
