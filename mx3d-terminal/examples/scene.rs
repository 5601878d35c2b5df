/// Example: build a small scene of transformed cubes and project it
///
/// Usage: cargo run --example scene [-- --plain]
use std::error::Error;
use std::io;

use mx3d_core::{Camera, CoordinateFrame, Matrix3D, Mesh, Point3};
use mx3d_terminal::Printer;

fn main() -> Result<(), Box<dyn Error>> {
    let plain = std::env::args().any(|a| a == "--plain");
    let printer = Printer::new(3, !plain);
    let mut out = io::stdout().lock();

    // Transformed points
    let transform = Matrix3D::translation(2.0, 1.0, 0.0)
        * Matrix3D::rotation_x(30.0)
        * Matrix3D::rotation_y(45.0);
    let points = [
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(-2.0, 3.0, 4.0),
    ];
    println!("translate(2,1,0) @ rotate_x(30) @ rotate_y(45)");
    printer.matrix(&mut out, &transform)?;
    let moved = transform.transform_points(&points)?;
    let pairs: Vec<_> = points.iter().copied().zip(moved).collect();
    printer.mapping(&mut out, &pairs)?;

    // Objects placed around the origin
    let objects = [
        (
            Point3::new(-3.0, 0.0, 0.0),
            Matrix3D::rotation_y(45.0) * Matrix3D::scale(1.5, 1.0, 1.0),
        ),
        (
            Point3::new(3.0, 1.0, 2.0),
            Matrix3D::rotation_x(30.0) * Matrix3D::scale(1.0, 1.5, 1.0),
        ),
        (
            Point3::new(0.0, 0.5, -3.0),
            Matrix3D::rotation_y(30.0) * Matrix3D::scale(1.0, 1.0, 1.5),
        ),
    ];

    let mut camera = Camera::new(80, 40);
    camera.eye = Point3::new(6.0, 5.0, 10.0);

    for (position, local) in objects {
        let model = Matrix3D::translation(position.x, position.y, position.z) * local;
        let cube = Mesh::cube(1.5).transformed(&model)?;
        let frame = CoordinateFrame::new(1.0).transformed(&model)?;

        println!();
        printer.frame(&mut out, &frame)?;

        let visible = cube
            .vertices
            .iter()
            .map(|v| camera.project_to_ndc(v))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .count();
        println!("{visible}/{} vertices inside the view volume", cube.vertices.len());
    }

    Ok(())
}
