#![allow(clippy::unwrap_used)]

use approx::assert_abs_diff_eq;
use mx3d_core::{
    euler_angles_to_matrix, matrix_to_euler_angles, parse_expression, perspective, EulerOrder,
    Matrix3D, Mesh, Point3, TransformError,
};

const EPSILON: f64 = 1e-9;

fn sample_points() -> Vec<Point3> {
    vec![
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(-2.5, 3.0, 0.25),
        Point3::new(100.0, -40.0, 7.0),
        Point3::new(0.001, 0.002, -0.003),
    ]
}

fn sample_matrices() -> Vec<Matrix3D> {
    vec![
        Matrix3D::identity(),
        Matrix3D::translation(2.0, -1.0, 0.5),
        Matrix3D::scale(2.0, 0.5, -3.0),
        Matrix3D::rotation_x(33.0) * Matrix3D::rotation_y(-71.0),
        Matrix3D::translation(-3.0, 0.0, 0.0)
            * Matrix3D::rotation_x(20.0)
            * Matrix3D::rotation_y(30.0)
            * Matrix3D::scale(1.0, 1.5, 0.8),
        euler_angles_to_matrix([12.0, -40.0, 100.0], EulerOrder::Yzx),
        Matrix3D::scale(1e-5, 1e-5, 1e-5),
    ]
}

#[test]
fn identity_law() {
    let identity = Matrix3D::identity();
    for p in sample_points() {
        assert_eq!(identity.transform_point(&p).unwrap(), p);
    }
}

#[test]
fn inverse_law() {
    for m in sample_matrices() {
        let inv = m.inverse().unwrap();
        for p in sample_points() {
            let back = inv.transform_point(&m.transform_point(&p).unwrap()).unwrap();
            assert_abs_diff_eq!(back, p, epsilon = 1e-9 * (1.0 + p.coords.norm()));
        }
    }
}

#[test]
fn composition_is_associative() {
    let ms = sample_matrices();
    for a in &ms {
        for b in &ms {
            for c in &ms {
                assert_abs_diff_eq!((*a * *b) * *c, *a * (*b * *c), epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn translation_is_additive() {
    let cases = [
        ([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]),
        ([-1.5, 0.0, 2.25], [1.5, -7.0, 0.0]),
    ];
    for ([x1, y1, z1], [x2, y2, z2]) in cases {
        assert_eq!(
            Matrix3D::translation(x1, y1, z1) * Matrix3D::translation(x2, y2, z2),
            Matrix3D::translation(x1 + x2, y1 + y2, z1 + z2)
        );
    }
}

#[test]
fn rotation_is_periodic() {
    for angle in [-270.0, -45.0, 0.0, 17.5, 90.0, 181.0] {
        assert_abs_diff_eq!(
            Matrix3D::rotation_x(angle),
            Matrix3D::rotation_x(angle + 360.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Matrix3D::rotation_y(angle),
            Matrix3D::rotation_y(angle + 360.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Matrix3D::rotation_z(angle),
            Matrix3D::rotation_z(angle + 360.0),
            epsilon = EPSILON
        );
    }
}

#[test]
fn euler_round_trip() {
    let angles = [25.0, -35.0, 140.0];
    for order in EulerOrder::ALL {
        let back = matrix_to_euler_angles(&euler_angles_to_matrix(angles, order), order);
        for i in 0..3 {
            assert_abs_diff_eq!(back[i], angles[i], epsilon = EPSILON);
        }
    }
}

#[test]
fn translation_scenario() {
    let out = Matrix3D::translation(2.0, 1.0, 0.0)
        .transform_point(&Point3::new(1.0, 0.0, 0.0))
        .unwrap();
    assert_eq!(out, Point3::new(3.0, 1.0, 0.0));
}

#[test]
fn rotation_y_scenario() {
    let out = Matrix3D::rotation_y(90.0)
        .transform_point(&Point3::new(1.0, 0.0, 0.0))
        .unwrap();
    assert_abs_diff_eq!(out, Point3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
}

#[test]
fn scale_scenario() {
    let out = Matrix3D::scale(2.0, 2.0, 2.0)
        .transform_point(&Point3::new(1.0, 1.0, 1.0))
        .unwrap();
    assert_eq!(out, Point3::new(2.0, 2.0, 2.0));
}

#[test]
fn perspective_rejects_zero_near() {
    assert!(perspective(60.0, 1.0, 0.1, 100.0).is_ok());
    let err = perspective(60.0, 1.0, 0.0, 100.0).unwrap_err();
    assert!(matches!(err, TransformError::InvalidFrustum(_)));
}

#[test]
fn inverse_rejects_zero_scale() {
    let err = Matrix3D::scale(0.0, 1.0, 1.0).inverse().unwrap_err();
    assert!(matches!(err, TransformError::SingularMatrix { .. }));
}

#[test]
fn batch_matches_pointwise() {
    let m = sample_matrices()[4];
    let points = sample_points();
    let batch = m.transform_points(&points).unwrap();
    assert_eq!(batch.len(), points.len());
    for (p, q) in points.iter().zip(&batch) {
        assert_eq!(m.transform_point(p).unwrap(), *q);
    }
}

#[test]
fn expression_builds_scene_transform() {
    let m = parse_expression("translate(-3, 0, 0) @ rotate_x(20) @ rotate_y(30) @ scale(1, 1.5, 0.8)")
        .unwrap();
    assert_eq!(m, sample_matrices()[4]);

    let cube = Mesh::cube(2.0).transformed(&m).unwrap();
    let center = cube.bounds().unwrap().center();
    assert_abs_diff_eq!(center, Point3::new(-3.0, 0.0, 0.0), epsilon = EPSILON);
}
