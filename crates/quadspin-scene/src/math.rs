//! Homogeneous 2D transforms.

use core::ops::Mul;

/// 3x3 matrix, column-major (`cols[c][r]`), matching WGSL `mat3x3<f32>`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub cols: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        cols: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn from_cols(c0: [f32; 3], c1: [f32; 3], c2: [f32; 3]) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    pub fn approx_eq(&self, other: &Mat3, eps: f32) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }

    /// Uniform-buffer layout: each column padded to 16 bytes.
    pub fn to_padded_cols(&self) -> [[f32; 4]; 3] {
        let [c0, c1, c2] = self.cols;
        [
            [c0[0], c0[1], c0[2], 0.0],
            [c1[0], c1[1], c1[2], 0.0],
            [c2[0], c2[1], c2[2], 0.0],
        ]
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<[f32; 3]> for Mat3 {
    type Output = [f32; 3];

    fn mul(self, v: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (r, o) in out.iter_mut().enumerate() {
            *o = self.at(r, 0) * v[0] + self.at(r, 1) * v[1] + self.at(r, 2) * v[2];
        }
        out
    }
}

/// Counter-clockwise rotation about the origin by `angle_degrees`.
pub fn rotate_2d(angle_degrees: f32) -> Mat3 {
    let (s, c) = angle_degrees.to_radians().sin_cos();
    Mat3::from_cols([c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0])
}
