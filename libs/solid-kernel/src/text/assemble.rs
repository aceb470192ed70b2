//! # Glyph Outline Assembler
//!
//! Resolves an unordered set of outline loops into exterior + hole clusters.
//!
//! ## Containment toggle rule
//!
//! Each loop is represented by its first point. For every ordered pair
//! `(i, j)`, if loop `j` contains loop `i`'s first point, loop `i`'s
//! exterior flag toggles and `i` is recorded under `j`. An even number of
//! containments leaves a loop exterior.
//!
//! An exterior's holes are the loops recorded under it, minus any loop that
//! is itself recorded under another member of that set. Such a "hole of a
//! hole" is an exterior of its own.
//!
//! Touching or tangent contours can be misclassified because only one point
//! per loop is tested.

use tracing::warn;

use crate::geometry::{Profile, Ring};

/// One exterior loop and the loops that cut holes into it.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphCluster {
    /// Index of the exterior loop.
    pub exterior: usize,
    /// Indices of its hole loops.
    pub holes: Vec<usize>,
}

/// Classifies loops into clusters, in loop order of their exteriors.
pub fn assemble_loops(loops: &[Ring]) -> Vec<GlyphCluster> {
    let n = loops.len();
    let mut exterior = vec![true; n];
    let mut contains: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        let sample = loops[i].first();
        for j in 0..n {
            if i != j && loops[j].contains_point(sample) {
                exterior[i] = !exterior[i];
                contains[j].push(i);
            }
        }
    }

    (0..n)
        .filter(|&e| exterior[e])
        .map(|e| {
            let candidates = &contains[e];
            let holes = candidates
                .iter()
                .copied()
                .filter(|&c| {
                    !candidates
                        .iter()
                        .any(|&other| other != c && contains[other].contains(&c))
                })
                .collect();
            GlyphCluster { exterior: e, holes }
        })
        .collect()
}

/// Assembles loops into profiles.
///
/// Clusters that fail profile validation (degenerate flattened contours)
/// are skipped with a warning.
pub fn assemble_profiles(loops: &[Ring]) -> Vec<Profile> {
    assemble_loops(loops)
        .into_iter()
        .filter_map(|cluster| {
            let exterior = loops[cluster.exterior].clone();
            let holes = cluster.holes.iter().map(|&h| loops[h].clone()).collect();
            match Profile::from_rings(exterior, holes) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(loop_index = cluster.exterior, %err, "skipping invalid glyph cluster");
                    None
                }
            }
        })
        .collect()
}
