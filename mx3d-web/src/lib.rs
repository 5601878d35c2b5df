/// MX3D Web - WASM bindings for browser viewports
///
/// Matrices cross the boundary as flat row-major arrays of 16 numbers and
/// point lists as interleaved `x, y, z` triples.
use log::debug;
use mx3d_core::{api, look_at, orthographic, perspective, Matrix3D, Mesh, Point3, Vector3};
use wasm_bindgen::prelude::*;

fn matrix_from_flat(values: &[f64]) -> Result<Matrix3D, String> {
    if values.len() != 16 {
        return Err(format!("expected 16 matrix entries, got {}", values.len()));
    }
    let mut rows = [[0.0; 4]; 4];
    for (i, value) in values.iter().enumerate() {
        rows[i / 4][i % 4] = *value;
    }
    Ok(Matrix3D::from_rows(rows))
}

fn matrix_to_flat(matrix: &Matrix3D) -> Vec<f64> {
    matrix.rows().iter().flatten().copied().collect()
}

fn points_from_flat(values: &[f64]) -> Result<Vec<Point3>, String> {
    if values.len() % 3 != 0 {
        return Err(format!(
            "point data must hold x, y, z triples, got {} values",
            values.len()
        ));
    }
    Ok(values
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

fn apply_flat(matrix: &[f64], points: &[f64]) -> Result<Vec<f64>, String> {
    let matrix = matrix_from_flat(matrix)?;
    let points = points_from_flat(points)?;
    let out = matrix.transform_points(&points).map_err(|e| e.to_string())?;
    Ok(out.iter().flat_map(|p| [p.x, p.y, p.z]).collect())
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// 4x4 affine transform handle for JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct Matrix3DJs {
    inner: Matrix3D,
}

#[wasm_bindgen]
impl Matrix3DJs {
    /// Build from 16 row-major values.
    #[wasm_bindgen(constructor)]
    pub fn new(values: &[f64]) -> Result<Matrix3DJs, JsValue> {
        let inner = matrix_from_flat(values).map_err(js_error)?;
        Ok(Matrix3DJs { inner })
    }

    pub fn identity() -> Matrix3DJs {
        Matrix3D::identity().into()
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Matrix3DJs {
        Matrix3D::translation(x, y, z).into()
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Matrix3DJs {
        Matrix3D::scale(x, y, z).into()
    }

    #[wasm_bindgen(js_name = rotationX)]
    pub fn rotation_x(degrees: f64) -> Matrix3DJs {
        Matrix3D::rotation_x(degrees).into()
    }

    #[wasm_bindgen(js_name = rotationY)]
    pub fn rotation_y(degrees: f64) -> Matrix3DJs {
        Matrix3D::rotation_y(degrees).into()
    }

    #[wasm_bindgen(js_name = rotationZ)]
    pub fn rotation_z(degrees: f64) -> Matrix3DJs {
        Matrix3D::rotation_z(degrees).into()
    }

    #[wasm_bindgen(js_name = lookAt)]
    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        eye_x: f64,
        eye_y: f64,
        eye_z: f64,
        target_x: f64,
        target_y: f64,
        target_z: f64,
        up_x: f64,
        up_y: f64,
        up_z: f64,
    ) -> Result<Matrix3DJs, JsValue> {
        look_at(
            &Point3::new(eye_x, eye_y, eye_z),
            &Point3::new(target_x, target_y, target_z),
            &Vector3::new(up_x, up_y, up_z),
        )
        .map(Matrix3DJs::from)
        .map_err(js_error)
    }

    /// `fov` is the vertical field of view in degrees.
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Result<Matrix3DJs, JsValue> {
        perspective(fov, aspect, near, far)
            .map(Matrix3DJs::from)
            .map_err(js_error)
    }

    pub fn orthographic(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> Result<Matrix3DJs, JsValue> {
        orthographic(left, right, bottom, top, near, far)
            .map(Matrix3DJs::from)
            .map_err(js_error)
    }

    /// `self * other`: `other` is applied first.
    pub fn multiply(&self, other: &Matrix3DJs) -> Matrix3DJs {
        (self.inner * other.inner).into()
    }

    pub fn inverse(&self) -> Result<Matrix3DJs, JsValue> {
        self.inner
            .inverse()
            .map(Matrix3DJs::from)
            .map_err(js_error)
    }

    pub fn determinant(&self) -> f64 {
        self.inner.determinant()
    }

    /// Row-major entries.
    #[wasm_bindgen(js_name = toArray)]
    pub fn to_array(&self) -> Vec<f64> {
        matrix_to_flat(&self.inner)
    }

    /// Transform interleaved points.
    #[wasm_bindgen(js_name = transformPoints)]
    pub fn transform_points(&self, points: &[f64]) -> Result<Vec<f64>, JsValue> {
        apply_flat(&matrix_to_flat(&self.inner), points).map_err(js_error)
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_string_js(&self) -> String {
        self.inner.to_string()
    }
}

impl From<Matrix3D> for Matrix3DJs {
    fn from(inner: Matrix3D) -> Self {
        Self { inner }
    }
}

/// Run an API request. Returns the JSON response body, or throws
/// `"<status>: <detail>"`.
#[wasm_bindgen(js_name = handleRequest)]
pub fn handle_request(endpoint: &str, body: &str) -> Result<String, JsValue> {
    api::handle(endpoint, body).map_err(|e| {
        debug!("request to {endpoint} failed: {e}");
        js_error(e)
    })
}

/// Transform interleaved points by a row-major matrix.
#[wasm_bindgen(js_name = transformPoints)]
pub fn transform_points(matrix: &[f64], points: &[f64]) -> Result<Vec<f64>, JsValue> {
    apply_flat(matrix, points).map_err(js_error)
}

/// Interleaved vertex positions of a cube centered at the origin.
#[wasm_bindgen(js_name = cubeVertices)]
pub fn cube_vertices(size: f64) -> Vec<f64> {
    Mesh::cube(size).flat_vertices()
}

#[wasm_bindgen(js_name = cubeIndices)]
pub fn cube_indices() -> Vec<u32> {
    Mesh::cube(1.0).flat_faces()
}

/// Interleaved vertex positions of an icosphere.
#[wasm_bindgen(js_name = sphereVertices)]
pub fn sphere_vertices(radius: f64) -> Vec<f64> {
    Mesh::sphere(radius).flat_vertices()
}

#[wasm_bindgen(js_name = sphereIndices)]
pub fn sphere_indices() -> Vec<u32> {
    Mesh::sphere(1.0).flat_faces()
}
