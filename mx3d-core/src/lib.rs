//! MX3D Core Library - 4x4 homogeneous transforms
//!
//! This library provides the stateless core of MX3D: the `Matrix3D` type and
//! its elementary factories, view/projection builders, Euler angle
//! conversion, primitive meshes, a transform expression parser and the
//! request/response handlers that front-ends call into.
//!
//! Angles are always in degrees at the public boundary.

pub mod angle;
pub mod api;
pub mod error;
pub mod euler;
pub mod expr;
pub mod geometry;
pub mod matrix;
pub mod projection;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

// Re-export commonly used types
pub use error::{Result, TransformError};
pub use euler::{axis_angle_to_matrix, euler_angles_to_matrix, matrix_to_euler_angles, EulerOrder};
pub use expr::{parse_expression, parse_point};
pub use geometry::{Bounds, CoordinateFrame, Mesh};
pub use matrix::Matrix3D;
pub use projection::{look_at, orthographic, perspective, Camera, ProjectionMode};
