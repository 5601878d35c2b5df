/// View and projection matrices, and a camera that bundles them
use log::debug;

use crate::angle::to_radians;
use crate::error::{Result, TransformError};
use crate::matrix::{Matrix3D, TOLERANCE};
use crate::{Point3, Vector3};

/// Build a right-handed view matrix looking from `eye` toward `target`.
///
/// The camera basis is `right = forward x up`, `true_up = right x forward`,
/// laid out as rows `[right, true_up, -forward]` after a translation by
/// `-eye`. `eye` maps to the origin and `target` onto the negative Z axis.
///
/// The rows layout produces a world-to-camera matrix, the same one nalgebra's
/// `look_at_rh` builds. Placing the basis in columns instead gives the
/// camera-to-world transform; callers that want that can take
/// [`Matrix3D::inverse`] of the result.
///
/// # Errors
///
/// Returns [`TransformError::DegenerateBasis`] when an input is not finite,
/// when `eye == target`, when `up` has zero length, or when the view
/// direction is parallel to `up`.
pub fn look_at(eye: &Point3, target: &Point3, up: &Vector3) -> Result<Matrix3D> {
    let finite = eye
        .coords
        .iter()
        .chain(target.coords.iter())
        .chain(up.iter())
        .all(|v| v.is_finite());
    if !finite {
        debug!("look_at rejected: non-finite input eye {eye:?} target {target:?} up {up:?}");
        return Err(TransformError::DegenerateBasis(
            "eye, target and up must be finite".into(),
        ));
    }

    let forward = target - eye;
    let distance = forward.norm();
    if !distance.is_finite() || distance < TOLERANCE {
        debug!("look_at rejected: eye and target coincide at {eye:?}");
        return Err(TransformError::DegenerateBasis(
            "eye and target coincide".into(),
        ));
    }
    let forward = forward / distance;

    let up_len = up.norm();
    if !up_len.is_finite() || up_len == 0.0 {
        return Err(TransformError::DegenerateBasis(
            "up vector has zero length".into(),
        ));
    }

    // Both factors are unit length, so `right_len` is the sine of their angle.
    let right = forward.cross(&(up / up_len));
    let right_len = right.norm();
    if !right_len.is_finite() || right_len < TOLERANCE {
        debug!("look_at rejected: forward {forward:?} is parallel to up {up:?}");
        return Err(TransformError::DegenerateBasis(
            "view direction is parallel to the up vector".into(),
        ));
    }
    let right = right / right_len;
    let true_up = right.cross(&forward);

    let rotation = Matrix3D::from_rows([
        [right.x, right.y, right.z, 0.0],
        [true_up.x, true_up.y, true_up.z, 0.0],
        [-forward.x, -forward.y, -forward.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    Ok(rotation * Matrix3D::translation(-eye.x, -eye.y, -eye.z))
}

/// OpenGL-style perspective projection (clip-space z in `[-1, 1]`).
///
/// `fov` is the vertical field of view in degrees and `aspect` is width over
/// height.
///
/// # Errors
///
/// Returns [`TransformError::InvalidFrustum`] when any argument is not finite,
/// `near <= 0`, `far <= near`, `aspect <= 0`, or `fov` is outside `(0, 180)`.
pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Result<Matrix3D> {
    require_finite(&[("fov", fov), ("aspect", aspect), ("near", near), ("far", far)])?;
    if near <= 0.0 {
        return Err(frustum(format!("near plane must be positive, got {near}")));
    }
    if far <= near {
        return Err(frustum(format!(
            "far plane ({far}) must lie beyond near plane ({near})"
        )));
    }
    if aspect <= 0.0 {
        return Err(frustum(format!("aspect ratio must be positive, got {aspect}")));
    }
    if fov <= 0.0 || fov >= 180.0 {
        return Err(frustum(format!(
            "field of view must be within (0, 180) degrees, got {fov}"
        )));
    }

    let f = 1.0 / (to_radians(fov) / 2.0).tan();
    let depth = near - far;
    Ok(Matrix3D::from_rows([
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, (far + near) / depth, 2.0 * far * near / depth],
        [0.0, 0.0, -1.0, 0.0],
    ]))
}

/// Orthographic projection mapping the given box onto the canonical cube.
///
/// # Errors
///
/// Returns [`TransformError::InvalidFrustum`] when any plane is not finite or
/// any pair of opposite planes coincides.
pub fn orthographic(
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    near: f64,
    far: f64,
) -> Result<Matrix3D> {
    require_finite(&[
        ("left", left),
        ("right", right),
        ("bottom", bottom),
        ("top", top),
        ("near", near),
        ("far", far),
    ])?;
    let dx = right - left;
    let dy = top - bottom;
    let dz = far - near;
    for (name, extent) in [("left/right", dx), ("bottom/top", dy), ("near/far", dz)] {
        if extent.abs() < TOLERANCE {
            return Err(frustum(format!("{name} planes coincide")));
        }
    }

    Ok(Matrix3D::from_rows([
        [2.0 / dx, 0.0, 0.0, -(right + left) / dx],
        [0.0, 2.0 / dy, 0.0, -(top + bottom) / dy],
        [0.0, 0.0, -2.0 / dz, -(far + near) / dz],
        [0.0, 0.0, 0.0, 1.0],
    ]))
}

fn require_finite(values: &[(&str, f64)]) -> Result<()> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, v)) => Err(frustum(format!("{name} must be finite, got {v}"))),
        None => Ok(()),
    }
}

fn frustum(reason: String) -> TransformError {
    debug!("invalid frustum: {reason}");
    TransformError::InvalidFrustum(reason)
}

/// Projection mode for a [`Camera`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for viewing a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3,
    pub target: Point3,
    pub up: Vector3,
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 45.0,
            aspect: f64::from(width) / f64::from(height.max(1)),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn with_mode(mut self, mode: ProjectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Result<Matrix3D> {
        look_at(&self.eye, &self.target, &self.up)
    }

    /// Create the projection matrix
    ///
    /// Orthographic mode frames a box whose height is the eye-target distance.
    pub fn projection_matrix(&self) -> Result<Matrix3D> {
        match self.mode {
            ProjectionMode::Perspective => perspective(self.fov, self.aspect, self.near, self.far),
            ProjectionMode::Orthographic => {
                let height = (self.eye - self.target).norm();
                let width = height * self.aspect;
                orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// `projection * view`
    pub fn view_projection(&self) -> Result<Matrix3D> {
        Ok(self.projection_matrix()? * self.view_matrix()?)
    }

    /// Project a world-space point to normalized device coordinates.
    ///
    /// Returns `Ok(None)` when the point falls outside the clip cube.
    pub fn project_to_ndc(&self, point: &Point3) -> Result<Option<Point3>> {
        let ndc = self.view_projection()?.transform_point(point)?;
        let inside = [ndc.x, ndc.y, ndc.z]
            .iter()
            .all(|v| (-1.0..=1.0).contains(v));
        Ok(inside.then_some(ndc))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix4;

    #[test]
    fn test_look_at_maps_eye_to_origin_and_target_to_negative_z() {
        let eye = Point3::new(3.0, 2.0, 5.0);
        let target = Point3::new(-1.0, 0.5, 0.0);
        let view = look_at(&eye, &target, &Vector3::y()).unwrap();

        let e = view.transform_point(&eye).unwrap();
        assert_abs_diff_eq!(e, Point3::origin(), epsilon = 1e-12);

        let t = view.transform_point(&target).unwrap();
        let distance = (target - eye).norm();
        assert_abs_diff_eq!(t, Point3::new(0.0, 0.0, -distance), epsilon = 1e-12);
    }

    #[test]
    fn test_look_at_matches_nalgebra() {
        let eye = Point3::new(1.0, 4.0, -2.0);
        let target = Point3::new(0.0, 1.0, 3.0);
        let up = Vector3::new(0.0, 1.0, 0.2);
        let view = look_at(&eye, &target, &up).unwrap();
        let reference = Matrix3D::from(Matrix4::look_at_rh(&eye, &target, &up));
        assert_eq!(view, reference);
    }

    #[test]
    fn test_look_at_rejects_parallel_up() {
        let err = look_at(
            &Point3::origin(),
            &Point3::new(0.0, 5.0, 0.0),
            &Vector3::y(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::DegenerateBasis(_)));

        let err = look_at(&Point3::origin(), &Point3::origin(), &Vector3::y()).unwrap_err();
        assert!(matches!(err, TransformError::DegenerateBasis(_)));
    }

    #[test]
    fn test_look_at_inverse_holds_basis_in_columns() {
        let eye = Point3::new(4.0, 0.0, 0.0);
        let view = look_at(&eye, &Point3::origin(), &Vector3::y()).unwrap();
        let camera_to_world = view.inverse().unwrap();

        // forward is -X, so right = forward x up = -Z.
        let right = Vector3::new(0.0, 0.0, -1.0);
        let forward = Vector3::new(-1.0, 0.0, 0.0);
        for i in 0..3 {
            assert!((view.get(0, i) - right[i]).abs() < 1e-12);
            assert!((camera_to_world.get(i, 0) - right[i]).abs() < 1e-12);
            assert!((camera_to_world.get(i, 2) + forward[i]).abs() < 1e-12);
        }
        assert_abs_diff_eq!(
            camera_to_world.transform_point(&Point3::origin()).unwrap(),
            eye,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_look_at_accepts_short_up_vector() {
        let eye = Point3::new(0.0, 0.0, 5.0);
        let short = look_at(&eye, &Point3::origin(), &Vector3::new(0.0, 1e-10, 0.0)).unwrap();
        let unit = look_at(&eye, &Point3::origin(), &Vector3::y()).unwrap();
        assert_eq!(short, unit);

        let err = look_at(&eye, &Point3::origin(), &Vector3::zeros()).unwrap_err();
        assert!(matches!(err, TransformError::DegenerateBasis(_)));
    }

    #[test]
    fn test_look_at_rejects_non_finite_inputs() {
        let target = Point3::origin();
        for (eye, up) in [
            (Point3::new(f64::NAN, 0.0, 5.0), Vector3::y()),
            (Point3::new(0.0, f64::INFINITY, 5.0), Vector3::y()),
            (Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, f64::NAN, 0.0)),
        ] {
            let err = look_at(&eye, &target, &up).unwrap_err();
            assert!(matches!(err, TransformError::DegenerateBasis(_)), "{eye:?} {up:?}");
        }
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let m = perspective(60.0, 1.5, 0.1, 100.0).unwrap();
        let reference = Matrix3D::from(Matrix4::new_perspective(
            1.5,
            std::f64::consts::FRAC_PI_3,
            0.1,
            100.0,
        ));
        assert_eq!(m, reference);
    }

    #[test]
    fn test_perspective_maps_near_and_far_to_clip_bounds() {
        let m = perspective(90.0, 1.0, 1.0, 10.0).unwrap();
        let near = m.transform_point(&Point3::new(0.0, 0.0, -1.0)).unwrap();
        let far = m.transform_point(&Point3::new(0.0, 0.0, -10.0)).unwrap();
        assert_abs_diff_eq!(near.z, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-12);

        // A point on the camera plane has w = 0.
        let err = m.transform_point(&Point3::new(1.0, 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, TransformError::DegenerateProjection { .. }));
    }

    #[test]
    fn test_perspective_rejects_bad_frustum() {
        for (fov, aspect, near, far) in [
            (60.0, 1.0, 0.0, 100.0),
            (60.0, 1.0, -1.0, 100.0),
            (60.0, 1.0, 10.0, 10.0),
            (60.0, 1.0, 10.0, 5.0),
            (60.0, 0.0, 0.1, 100.0),
            (0.0, 1.0, 0.1, 100.0),
            (180.0, 1.0, 0.1, 100.0),
            (60.0, f64::NAN, 0.1, 100.0),
            (f64::NAN, 1.0, 0.1, 100.0),
            (60.0, 1.0, f64::NAN, 100.0),
            (60.0, 1.0, 0.1, f64::NAN),
            (60.0, 1.0, 0.1, f64::INFINITY),
            (60.0, f64::INFINITY, 0.1, 100.0),
        ] {
            let err = perspective(fov, aspect, near, far).unwrap_err();
            assert!(matches!(err, TransformError::InvalidFrustum(_)));
        }
    }

    #[test]
    fn test_orthographic_matches_nalgebra() {
        let m = orthographic(-2.0, 4.0, -1.0, 3.0, 0.5, 20.0).unwrap();
        let reference =
            Matrix3D::from(Matrix4::new_orthographic(-2.0, 4.0, -1.0, 3.0, 0.5, 20.0));
        assert_eq!(m, reference);

        let corner = m.transform_point(&Point3::new(4.0, 3.0, -20.0)).unwrap();
        assert_abs_diff_eq!(corner, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_orthographic_rejects_degenerate_box() {
        assert!(orthographic(1.0, 1.0, -1.0, 1.0, 0.1, 10.0).is_err());
        assert!(orthographic(-1.0, 1.0, 2.0, 2.0, 0.1, 10.0).is_err());
        assert!(matches!(
            orthographic(-1.0, 1.0, -1.0, 1.0, 5.0, 5.0),
            Err(TransformError::InvalidFrustum(_))
        ));
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                orthographic(bad, 1.0, -1.0, 1.0, 0.1, 10.0),
                Err(TransformError::InvalidFrustum(_))
            ));
            assert!(matches!(
                orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, bad),
                Err(TransformError::InvalidFrustum(_))
            ));
        }
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-12);
        assert!(camera.view_matrix().unwrap().is_affine());
    }

    #[test]
    fn test_camera_projects_target_to_center() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let camera = Camera::default().with_mode(mode);
            let ndc = camera.project_to_ndc(&Point3::origin()).unwrap().unwrap();
            assert_abs_diff_eq!(ndc.x, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(ndc.y, 0.0, epsilon = 1e-12);
        }

        let camera = Camera::default();
        let outside = camera.project_to_ndc(&Point3::new(50.0, 0.0, 0.0)).unwrap();
        assert!(outside.is_none());
    }
}
