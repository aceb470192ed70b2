//! # Cap Assembler
//!
//! The bottom cap reuses the triangulation faces unchanged against the bottom
//! layer block; their clockwise winding already faces down. The top cap
//! reverses each face and offsets it into the top layer block so it faces up.

/// Bottom cap faces referencing the block starting at `base`.
pub fn bottom_cap(faces: &[[usize; 3]], base: usize) -> Vec<[u32; 3]> {
    faces
        .iter()
        .map(|&[a, b, c]| [(base + a) as u32, (base + b) as u32, (base + c) as u32])
        .collect()
}

/// Top cap faces: vertex order reversed, offset to the block at `base`.
pub fn top_cap(faces: &[[usize; 3]], base: usize) -> Vec<[u32; 3]> {
    faces
        .iter()
        .map(|&[a, b, c]| [(base + c) as u32, (base + b) as u32, (base + a) as u32])
        .collect()
}
