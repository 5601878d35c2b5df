/// Euler angle conversion for the six Tait-Bryan axis orders
use std::fmt;
use std::str::FromStr;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::angle::{to_degrees, to_radians};
use crate::error::{Result, TransformError};
use crate::matrix::Matrix3D;

/// Below this, the cosine of the middle angle is treated as zero (gimbal lock).
const GIMBAL_TOLERANCE: f64 = 1e-6;

/// Order in which the three elementary rotations are applied.
///
/// `Xyz` applies the X rotation first, then Y, then Z, i.e. the matrix is
/// `Rz(c) * Ry(b) * Rx(a)` for angles `[a, b, c]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EulerOrder {
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl EulerOrder {
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::Xyz,
        EulerOrder::Xzy,
        EulerOrder::Yxz,
        EulerOrder::Yzx,
        EulerOrder::Zxy,
        EulerOrder::Zyx,
    ];

    /// Axis indices (0 = x, 1 = y, 2 = z) in application order.
    pub fn axes(self) -> [usize; 3] {
        match self {
            EulerOrder::Xyz => [0, 1, 2],
            EulerOrder::Xzy => [0, 2, 1],
            EulerOrder::Yxz => [1, 0, 2],
            EulerOrder::Yzx => [1, 2, 0],
            EulerOrder::Zxy => [2, 0, 1],
            EulerOrder::Zyx => [2, 1, 0],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EulerOrder::Xyz => "xyz",
            EulerOrder::Xzy => "xzy",
            EulerOrder::Yxz => "yxz",
            EulerOrder::Yzx => "yzx",
            EulerOrder::Zxy => "zxy",
            EulerOrder::Zyx => "zyx",
        }
    }

    /// `1.0` for cyclic orders (xyz, yzx, zxy), `-1.0` otherwise.
    fn parity(self) -> f64 {
        match self {
            EulerOrder::Xyz | EulerOrder::Yzx | EulerOrder::Zxy => 1.0,
            EulerOrder::Xzy | EulerOrder::Yxz | EulerOrder::Zyx => -1.0,
        }
    }
}

impl FromStr for EulerOrder {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xyz" => Ok(EulerOrder::Xyz),
            "xzy" => Ok(EulerOrder::Xzy),
            "yxz" => Ok(EulerOrder::Yxz),
            "yzx" => Ok(EulerOrder::Yzx),
            "zxy" => Ok(EulerOrder::Zxy),
            "zyx" => Ok(EulerOrder::Zyx),
            _ => Err(TransformError::InvalidEulerOrder(s.to_string())),
        }
    }
}

impl TryFrom<String> for EulerOrder {
    type Error = TransformError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<EulerOrder> for String {
    fn from(order: EulerOrder) -> Self {
        order.as_str().to_string()
    }
}

impl fmt::Display for EulerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn axis_rotation(axis: usize, degrees: f64) -> Matrix3D {
    match axis {
        0 => Matrix3D::rotation_x(degrees),
        1 => Matrix3D::rotation_y(degrees),
        _ => Matrix3D::rotation_z(degrees),
    }
}

/// Compose three elementary rotations (degrees) in the given order.
///
/// `angles[n]` is the rotation about the `n`-th axis named by `order`, and the
/// first named axis is applied first.
pub fn euler_angles_to_matrix(angles: [f64; 3], order: EulerOrder) -> Matrix3D {
    order
        .axes()
        .iter()
        .zip(angles)
        .fold(Matrix3D::identity(), |acc, (&axis, angle)| {
            axis_rotation(axis, angle) * acc
        })
}

/// Recover Euler angles (degrees) from a rotation matrix built with `order`.
///
/// The middle angle is returned in `[-90, 90]`, the others in `(-180, 180]`.
/// At gimbal lock (middle angle at +-90) the decomposition is not unique: the
/// third angle is fixed to `0` and the first carries the remaining rotation.
pub fn matrix_to_euler_angles(matrix: &Matrix3D, order: EulerOrder) -> [f64; 3] {
    let [i, j, k] = order.axes();
    let s = order.parity();
    let m = |r: usize, c: usize| matrix.get(r, c);

    // For M = R_k(c) R_j(b) R_i(a):
    //   M[k][i] = -s sin b
    //   M[k][j] =  s cos b sin a,  M[k][k] = cos b cos a
    //   M[j][i] =  s cos b sin c,  M[i][i] = cos b cos c
    let cos_b = m(i, i).hypot(m(j, i));
    let b = (-s * m(k, i)).atan2(cos_b);

    let (a, c) = if cos_b > GIMBAL_TOLERANCE {
        ((s * m(k, j)).atan2(m(k, k)), (s * m(j, i)).atan2(m(i, i)))
    } else {
        trace!("gimbal lock in {order} decomposition, fixing third angle to 0");
        // With c = 0, row j is R_j(b) R_i(a) restricted to the j axis.
        ((-s * m(j, k)).atan2(m(j, j)), 0.0)
    };

    [to_degrees(a), to_degrees(b), to_degrees(c)].map(|angle| {
        // Normalise -180 to 180 and drop negative zero.
        if (angle + 180.0).abs() < 1e-9 {
            180.0
        } else if angle == 0.0 {
            0.0
        } else {
            angle
        }
    })
}

/// Rotation about an arbitrary axis through the origin, `degrees` counter-clockwise.
///
/// # Errors
///
/// Returns [`TransformError::DegenerateBasis`] for a zero-length axis.
pub fn axis_angle_to_matrix(axis: [f64; 3], degrees: f64) -> Result<Matrix3D> {
    let axis = crate::Vector3::from(axis);
    let norm = axis.norm();
    if norm < crate::matrix::TOLERANCE {
        return Err(TransformError::DegenerateBasis(
            "rotation axis has zero length".into(),
        ));
    }
    let scaled = axis * (to_radians(degrees) / norm);
    Ok(Matrix3D::from(nalgebra::Matrix4::new_rotation(scaled)))
}
