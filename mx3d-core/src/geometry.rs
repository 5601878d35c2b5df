/// Primitive meshes and coordinate frames for viewers
use crate::error::Result;
use crate::matrix::Matrix3D;
use crate::{Point3, Vector3};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = points.first()?;
        Some(points.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |b, p| Self {
                min: b.min.inf(p),
                max: b.max.sup(p),
            },
        ))
    }

    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Largest side length; viewers use it to frame the box with equal aspect.
    pub fn max_extent(&self) -> f64 {
        (self.max - self.min).max()
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Axis-aligned cube of edge length `size` centred on the origin.
    ///
    /// Each of the six quads is split into two triangles.
    pub fn cube(size: f64) -> Self {
        let s = size / 2.0;
        let vertices = vec![
            Point3::new(-s, -s, -s),
            Point3::new(s, -s, -s),
            Point3::new(s, s, -s),
            Point3::new(-s, s, -s),
            Point3::new(-s, -s, s),
            Point3::new(s, -s, s),
            Point3::new(s, s, s),
            Point3::new(-s, s, s),
        ];

        let quads: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // back   (-z)
            [4, 5, 6, 7], // front  (+z)
            [0, 1, 5, 4], // bottom (-y)
            [3, 7, 6, 2], // top    (+y)
            [1, 2, 6, 5], // right  (+x)
            [0, 4, 7, 3], // left   (-x)
        ];
        let faces = quads
            .iter()
            .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
            .collect();

        Self { vertices, faces }
    }

    /// Icosahedron inscribed in a sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        let phi = (1.0 + 5f64.sqrt()) / 2.0;
        let raw = [
            [-1.0, phi, 0.0],
            [1.0, phi, 0.0],
            [-1.0, -phi, 0.0],
            [1.0, -phi, 0.0],
            [0.0, -1.0, phi],
            [0.0, 1.0, phi],
            [0.0, -1.0, -phi],
            [0.0, 1.0, -phi],
            [phi, 0.0, -1.0],
            [phi, 0.0, 1.0],
            [-phi, 0.0, -1.0],
            [-phi, 0.0, 1.0],
        ];
        let vertices = raw
            .iter()
            .map(|&v| Point3::from(Vector3::from(v).normalize() * radius))
            .collect();

        let faces = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        Self { vertices, faces }
    }

    /// Copy of the mesh with every vertex passed through `matrix`.
    pub fn transformed(&self, matrix: &Matrix3D) -> Result<Mesh> {
        Ok(Self {
            vertices: matrix.transform_points(&self.vertices)?,
            faces: self.faces.clone(),
        })
    }

    /// Unit normal of a face from its winding, or `None` for a degenerate or
    /// out-of-range face.
    pub fn face_normal(&self, face: usize) -> Option<Vector3> {
        let [a, b, c] = *self.faces.get(face)?;
        let v0 = self.vertices.get(a)?;
        let v1 = self.vertices.get(b)?;
        let v2 = self.vertices.get(c)?;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        edge1.cross(&edge2).try_normalize(f64::EPSILON)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.vertices)
    }

    /// Vertices as `[x0, y0, z0, x1, ...]`.
    pub fn flat_vertices(&self) -> Vec<f64> {
        self.vertices.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Faces as `[a0, b0, c0, a1, ...]`.
    pub fn flat_faces(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flatten()
            .map(|&i| u32::try_from(i).unwrap_or(u32::MAX))
            .collect()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// A coordinate frame: an origin and the tips of its three axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    pub origin: Point3,
    pub x_axis: Point3,
    pub y_axis: Point3,
    pub z_axis: Point3,
}

impl CoordinateFrame {
    /// World frame with axes of the given length.
    pub fn new(length: f64) -> Self {
        Self {
            origin: Point3::origin(),
            x_axis: Point3::new(length, 0.0, 0.0),
            y_axis: Point3::new(0.0, length, 0.0),
            z_axis: Point3::new(0.0, 0.0, length),
        }
    }

    /// The frame after applying `matrix` to its origin and axis tips.
    pub fn transformed(&self, matrix: &Matrix3D) -> Result<Self> {
        Ok(Self {
            origin: matrix.transform_point(&self.origin)?,
            x_axis: matrix.transform_point(&self.x_axis)?,
            y_axis: matrix.transform_point(&self.y_axis)?,
            z_axis: matrix.transform_point(&self.z_axis)?,
        })
    }

    /// Axis directions relative to the origin.
    pub fn directions(&self) -> [Vector3; 3] {
        [
            self.x_axis - self.origin,
            self.y_axis - self.origin,
            self.z_axis - self.origin,
        ]
    }
}
