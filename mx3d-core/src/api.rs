/// Request/response handlers for the matrix endpoints
///
/// Transport-agnostic: callers hand in an endpoint name and a JSON body and
/// get back a JSON body or an [`ApiError`] carrying an HTTP-style status.
use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::matrix::Matrix3D;

/// Endpoints exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreateIdentity,
    Translate,
    RotateX,
    RotateY,
    RotateZ,
    Scale,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::CreateIdentity,
        Endpoint::Translate,
        Endpoint::RotateX,
        Endpoint::RotateY,
        Endpoint::RotateZ,
        Endpoint::Scale,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CreateIdentity => "/create_identity",
            Endpoint::Translate => "/translate",
            Endpoint::RotateX => "/rotate_x",
            Endpoint::RotateY => "/rotate_y",
            Endpoint::RotateZ => "/rotate_z",
            Endpoint::Scale => "/scale",
        }
    }
}

impl FromStr for Endpoint {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, ApiError> {
        let name = s.trim().trim_start_matches('/');
        Endpoint::ALL
            .into_iter()
            .find(|e| &e.path()[1..] == name)
            .ok_or_else(|| ApiError::not_found(format!("no endpoint named `{s}`")))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Body accepted by every transforming endpoint. Unused fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub matrix: Matrix3D,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Rotation angle in degrees.
    #[serde(default)]
    pub angle: f64,
}

impl TransformRequest {
    pub fn new(matrix: Matrix3D) -> Self {
        Self {
            matrix,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            angle: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixResponse {
    pub matrix: Matrix3D,
}

/// A client-facing failure with an HTTP-style status code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{status}: {detail}")]
pub struct ApiError {
    pub status: u16,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: 400,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: 404,
            detail: detail.into(),
        }
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("malformed request body: {err}"))
    }
}

/// Health-check payload.
pub fn root() -> serde_json::Value {
    serde_json::json!({ "message": "3D Matrix Manipulation API is running" })
}

/// Apply an endpoint to a parsed request.
///
/// The endpoint's transform is applied after the source matrix, so the
/// result is `op * request.matrix`. `CreateIdentity` ignores the request.
pub fn dispatch(endpoint: Endpoint, request: &TransformRequest) -> MatrixResponse {
    let op = match endpoint {
        Endpoint::CreateIdentity => {
            return MatrixResponse {
                matrix: Matrix3D::identity(),
            }
        }
        Endpoint::Translate => Matrix3D::translation(request.x, request.y, request.z),
        Endpoint::RotateX => Matrix3D::rotation_x(request.angle),
        Endpoint::RotateY => Matrix3D::rotation_y(request.angle),
        Endpoint::RotateZ => Matrix3D::rotation_z(request.angle),
        Endpoint::Scale => Matrix3D::scale(request.x, request.y, request.z),
    };
    MatrixResponse {
        matrix: op * request.matrix,
    }
}

/// Handle a request given as an endpoint name and a JSON body.
///
/// # Errors
///
/// 404 for an unknown endpoint, 400 for a malformed body or a matrix that is
/// not 4x4.
pub fn handle(endpoint: &str, body: &str) -> Result<String, ApiError> {
    let endpoint: Endpoint = endpoint.parse().map_err(|e: ApiError| {
        debug!("{e}");
        e
    })?;
    info!("handling {endpoint}");

    let response = match endpoint {
        Endpoint::CreateIdentity => {
            dispatch(endpoint, &TransformRequest::new(Matrix3D::identity()))
        }
        _ => {
            let request: TransformRequest = serde_json::from_str(body).map_err(|e| {
                debug!("rejecting {endpoint} body: {e}");
                ApiError::from(e)
            })?;
            dispatch(endpoint, &request)
        }
    };
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn identity_body(extra: &str) -> String {
        format!(
            r#"{{"matrix": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]]{extra}}}"#
        )
    }

    fn response_matrix(json: &str) -> Matrix3D {
        serde_json::from_str::<MatrixResponse>(json).unwrap().matrix
    }

    #[test]
    fn test_endpoint_names() {
        assert_eq!("translate".parse::<Endpoint>().unwrap(), Endpoint::Translate);
        assert_eq!("/rotate_z".parse::<Endpoint>().unwrap(), Endpoint::RotateZ);
        assert_eq!("create_identity".parse::<Endpoint>().unwrap(), Endpoint::CreateIdentity);
        let err = "/shear".parse::<Endpoint>().unwrap_err();
        assert_eq!(err.status, 404);
    }

    #[test]
    fn test_create_identity_ignores_body() {
        let out = handle("/create_identity", "").unwrap();
        assert_eq!(response_matrix(&out), Matrix3D::identity());
    }

    #[test]
    fn test_translate() {
        let out = handle("translate", &identity_body(r#", "x": 2, "y": 1"#)).unwrap();
        assert_eq!(response_matrix(&out), Matrix3D::translation(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_op_is_applied_after_source() {
        let mut request = TransformRequest::new(Matrix3D::translation(1.0, 0.0, 0.0));
        request.angle = 90.0;
        let response = dispatch(Endpoint::RotateZ, &request);
        assert_eq!(
            response.matrix,
            Matrix3D::rotation_z(90.0) * Matrix3D::translation(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_scale_and_rotate() {
        let out = handle("scale", &identity_body(r#", "x": 2, "y": 3, "z": 4"#)).unwrap();
        assert_eq!(response_matrix(&out), Matrix3D::scale(2.0, 3.0, 4.0));

        let out = handle("rotate_x", &identity_body(r#", "angle": 30"#)).unwrap();
        assert_eq!(response_matrix(&out), Matrix3D::rotation_x(30.0));
    }

    #[test]
    fn test_response_shape() {
        let out = handle("create_identity", "{}").unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let rows = value["matrix"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.as_array().unwrap().len() == 4));
    }

    #[test]
    fn test_bad_requests() {
        let err = handle("translate", "not json").unwrap_err();
        assert_eq!(err.status, 400);

        let err = handle("translate", r#"{"matrix": [[1, 0], [0, 1]], "x": 1}"#).unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.detail.contains("4x4"), "{}", err.detail);

        let err = handle("translate", r#"{"x": 1}"#).unwrap_err();
        assert_eq!(err.status, 400);

        let err = handle("explode", "{}").unwrap_err();
        assert_eq!(err.status, 404);
    }

    #[test]
    fn test_transform_error_maps_to_bad_request() {
        let err = ApiError::from(TransformError::SingularMatrix { determinant: 0.0 });
        assert_eq!(err.status, 400);
        assert!(err.detail.contains("singular"));
    }

    #[test]
    fn test_root_message() {
        assert_eq!(root()["message"], "3D Matrix Manipulation API is running");
    }
}
