/// 4x4 homogeneous transformation matrix
use std::fmt;
use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};
use log::debug;
use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use crate::angle::to_radians;
use crate::error::{Result, TransformError};
use crate::{Point3, Vector3};

/// Tolerance used by `PartialEq` when comparing matrix entries.
pub const TOLERANCE: f64 = 1e-9;

/// [`Matrix3D::inverse`] treats a matrix as singular when `|det|` falls below
/// this fraction of the smaller of its row-length and column-length products.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Homogeneous `w` values with a smaller magnitude cannot be divided out.
pub const W_TOLERANCE: f64 = 1e-12;

/// A 4x4 homogeneous transform.
///
/// Conventions:
/// - Points are column vectors, so `m * p` applies `m` to `p` and `a * b`
///   applies `b` first, then `a`.
/// - Rotations are right-handed: a positive angle turns counter-clockwise when
///   looking down the axis toward the origin, so `rotation_y(90)` sends `+X`
///   to `-Z`.
/// - Angles are in degrees.
///
/// Values are immutable; every operation returns a new matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "[[f64; 4]; 4]")]
pub struct Matrix3D(Matrix4<f64>);

impl Matrix3D {
    /// Build a matrix from row-major entries.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Create a translation matrix
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    /// Create a scale matrix
    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self(Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)))
    }

    /// Rotation about the X axis by `degrees`.
    pub fn rotation_x(degrees: f64) -> Self {
        Self(Matrix4::new_rotation(Vector3::x() * to_radians(degrees)))
    }

    /// Rotation about the Y axis by `degrees`.
    pub fn rotation_y(degrees: f64) -> Self {
        Self(Matrix4::new_rotation(Vector3::y() * to_radians(degrees)))
    }

    /// Rotation about the Z axis by `degrees`.
    pub fn rotation_z(degrees: f64) -> Self {
        Self(Matrix4::new_rotation(Vector3::z() * to_radians(degrees)))
    }

    /// Returns `self * other`: `other` is applied first.
    pub fn compose(&self, other: &Matrix3D) -> Matrix3D {
        Self(self.0 * other.0)
    }

    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Invert the matrix.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::SingularMatrix`] when the determinant is small
    /// relative to the matrix's own scale (see [`SINGULAR_TOLERANCE`]), or when
    /// any entry is not finite.
    pub fn inverse(&self) -> Result<Matrix3D> {
        let determinant = self.determinant();
        // Hadamard: |det| is bounded by the product of row lengths and by the
        // product of column lengths, so the ratio to the tighter one is scale-free.
        let rows: f64 = self.0.row_iter().map(|row| row.norm()).product();
        let cols: f64 = self.0.column_iter().map(|col| col.norm()).product();
        let bound = rows.min(cols);
        let singular = !self.0.iter().all(|v| v.is_finite())
            || bound == 0.0
            || determinant.abs() < SINGULAR_TOLERANCE * bound;
        if singular {
            debug!("rejecting inverse of singular matrix (det = {determinant:e})");
            return Err(TransformError::SingularMatrix { determinant });
        }
        self.0
            .try_inverse()
            .map(Self)
            .ok_or(TransformError::SingularMatrix { determinant })
    }

    /// Apply the transform to a point, dividing out the homogeneous `w`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DegenerateProjection`] when the transformed
    /// `w` is within [`W_TOLERANCE`] of zero or is not finite.
    pub fn transform_point(&self, point: &Point3) -> Result<Point3> {
        let h = self.0 * Vector4::new(point.x, point.y, point.z, 1.0);
        if !h.w.is_finite() || h.w.abs() < W_TOLERANCE {
            debug!("point {point:?} maps to w = {:e}", h.w);
            return Err(TransformError::DegenerateProjection { w: h.w });
        }
        Ok(Point3::new(h.x / h.w, h.y / h.w, h.z / h.w))
    }

    /// Apply [`Matrix3D::transform_point`] to each point, preserving order.
    ///
    /// # Errors
    ///
    /// Fails on the first point whose transformed `w` is degenerate.
    pub fn transform_points(&self, points: &[Point3]) -> Result<Vec<Point3>> {
        points.iter().map(|p| self.transform_point(p)).collect()
    }

    /// Transform a direction (`w = 0`), ignoring translation.
    pub fn transform_vector(&self, vector: &Vector3) -> Vector3 {
        let h = self.0 * Vector4::new(vector.x, vector.y, vector.z, 0.0);
        Vector3::new(h.x, h.y, h.z)
    }

    /// True when the bottom row is `[0, 0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        let row = self.0.row(3);
        row[0].abs() < TOLERANCE
            && row[1].abs() < TOLERANCE
            && row[2].abs() < TOLERANCE
            && (row[3] - 1.0).abs() < TOLERANCE
    }

    /// Entry at `(row, col)`. Panics if either index is out of `0..4`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    pub fn rows(&self) -> [[f64; 4]; 4] {
        std::array::from_fn(|r| std::array::from_fn(|c| self.0[(r, c)]))
    }

    pub fn as_matrix4(&self) -> &Matrix4<f64> {
        &self.0
    }
}

impl Default for Matrix3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix3D {
    type Output = Matrix3D;

    fn mul(self, rhs: Matrix3D) -> Matrix3D {
        self.compose(&rhs)
    }
}

impl PartialEq for Matrix3D {
    fn eq(&self, other: &Self) -> bool {
        self.0.abs_diff_eq(&other.0, TOLERANCE)
    }
}

impl AbsDiffEq for Matrix3D {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        TOLERANCE
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for Matrix3D {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}

impl From<Matrix4<f64>> for Matrix3D {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }
}

impl From<[[f64; 4]; 4]> for Matrix3D {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Matrix3D> for [[f64; 4]; 4] {
    fn from(matrix: Matrix3D) -> Self {
        matrix.rows()
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix3D {
    type Error = TransformError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.len() != 4 || rows.iter().any(|row| row.len() != 4) {
            let cols = rows
                .iter()
                .map(Vec::len)
                .find(|&len| len != 4)
                .unwrap_or(cols);
            return Err(TransformError::InvalidShape {
                rows: rows.len(),
                cols,
            });
        }
        Ok(Self(Matrix4::from_fn(|r, c| rows[r][c])))
    }
}

impl fmt::Display for Matrix3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        for (i, row) in self.rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                // Avoid printing "-0.0000" for tiny negatives.
                let value = if value.abs() < 0.5 * 10f64.powi(-(precision as i32)) {
                    0.0
                } else {
                    *value
                };
                write!(f, "{value:>width$.precision$}", width = precision + 4)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
