//! The quad: fixed positions, indices and per-vertex colors.

/// Homogeneous 2D position `(x, y, w)`.
pub type Position = [f32; 3];

/// Linear RGB, one per vertex.
pub type Rgb = [f32; 3];

/// Immutable description of an indexed triangle mesh with four vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    pub positions: [Position; 4],
    /// Two triangles.
    pub indices: [u32; 6],
    pub colors: [Rgb; 4],
}

/// The unit square centred on the origin, one color per corner.
pub const SQUARE: QuadGeometry = QuadGeometry {
    // w is 1: positions are homogeneous so the 3x3 model matrix applies.
    positions: [
        [-0.5, 0.5, 1.0],
        [0.5, 0.5, 1.0],
        [0.5, -0.5, 1.0],
        [-0.5, -0.5, 1.0],
    ],
    indices: [0, 1, 2, 0, 2, 3],
    colors: [
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.5, 0.5, 0.5],
    ],
};

impl QuadGeometry {
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// True when every index refers to an existing vertex.
    pub fn is_valid(&self) -> bool {
        self.indices
            .iter()
            .all(|&i| (i as usize) < self.positions.len())
    }

    /// Triangles as the GPU assembles them from the index buffer
    /// (triangle-list topology).
    pub fn triangles(&self) -> impl Iterator<Item = [Position; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }
}

impl Default for QuadGeometry {
    fn default() -> Self {
        SQUARE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_emits_two_triangles_sharing_the_diagonal() {
        let p = SQUARE.positions;
        let tris: Vec<_> = SQUARE.triangles().collect();
        assert_eq!(tris, vec![[p[0], p[1], p[2]], [p[0], p[2], p[3]]]);
    }

    #[test]
    fn square_indices_are_in_range() {
        assert!(SQUARE.is_valid());
        assert_eq!(SQUARE.index_count(), 6);
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let mut g = SQUARE;
        g.indices[5] = 4;
        assert!(!g.is_valid());
    }

    #[test]
    fn positions_are_homogeneous() {
        assert!(SQUARE.positions.iter().all(|p| p[2] == 1.0));
    }
}
