//! # Wall Stitcher
//!
//! Side walls between consecutive layers along every boundary ring.
//!
//! For each ring edge `(a, b)` (wrapping) and each layer pair `(i, i+1)` two
//! triangles are emitted: `(lowerA, lowerB, upperB)` and
//! `(lowerA, upperB, upperA)`. A counter-clockwise exterior gets outward
//! walls and a clockwise hole gets walls facing into the hole, with no
//! special case. The first and last layers are the cap vertex blocks, so
//! walls meet the caps without seams.

/// Emits wall faces for every ring across `layer_count` layers.
///
/// `rings` holds per-ring vertex indices within one layer block and
/// `block` is the number of vertices per layer.
pub fn stitch_walls(rings: &[Vec<usize>], block: usize, layer_count: usize) -> Vec<[u32; 3]> {
    let quads: usize = rings.iter().map(Vec::len).sum::<usize>() * layer_count.saturating_sub(1);
    let mut faces = Vec::with_capacity(quads * 2);

    for layer in 0..layer_count.saturating_sub(1) {
        let lower = layer * block;
        let upper = (layer + 1) * block;

        for ring in rings {
            let n = ring.len();
            for k in 0..n {
                let a = ring[k];
                let b = ring[(k + 1) % n];

                let lower_a = (lower + a) as u32;
                let lower_b = (lower + b) as u32;
                let upper_a = (upper + a) as u32;
                let upper_b = (upper + b) as u32;

                faces.push([lower_a, lower_b, upper_b]);
                faces.push([lower_a, upper_b, upper_a]);
            }
        }
    }

    faces
}
