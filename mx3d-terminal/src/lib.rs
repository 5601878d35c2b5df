/// Command-line front-end for the MX3D transform toolkit
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use mx3d_core::{
    api, matrix_to_euler_angles, parse_expression, parse_point, CoordinateFrame, EulerOrder,
    Matrix3D, Mesh, Point3,
};
use serde::Serialize;
use std::error::Error;
use std::io::Write;

pub mod printer;

pub use printer::Printer;

#[derive(Debug, Parser)]
#[command(name = "mx3d", author, version, about = "Build, compose and apply 4x4 transforms")]
pub struct Cli {
    /// Digits printed after the decimal point.
    #[arg(long, global = true, default_value_t = 4)]
    pub precision: usize,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the matrix of a transform expression, e.g. "translate(2,1,0) @ rotate_y(45)".
    Matrix { expr: String },

    /// Apply a transform expression to one or more points.
    Apply {
        expr: String,

        /// Point as x,y,z. Repeat for several points.
        #[arg(short, long = "point", required = true, allow_hyphen_values = true, value_parser = parse_point)]
        points: Vec<Point3>,
    },

    /// Print the inverse of a transform expression.
    Invert { expr: String },

    /// Decompose a rotation expression into Euler angles (degrees).
    Euler {
        expr: String,

        /// Axis order the rotation was composed in, e.g. xyz or zyx.
        #[arg(long)]
        order: EulerOrder,
    },

    /// Emit vertex and face data for a primitive mesh.
    Mesh {
        #[arg(value_enum)]
        shape: Shape,

        /// Edge length of the cube or radius of the sphere.
        #[arg(long, default_value_t = 2.0)]
        size: f64,

        /// Transform expression applied to the vertices.
        #[arg(long)]
        transform: Option<String>,

        /// Print JSON instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Run a request against an API endpoint and print the JSON response.
    Api {
        /// One of create_identity, translate, rotate_x, rotate_y, rotate_z, scale.
        endpoint: String,

        /// JSON request body.
        #[arg(long, default_value = "{}")]
        body: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    Cube,
    Sphere,
}

/// JSON form of a transformed mesh for external viewers.
#[derive(Debug, Serialize)]
struct MeshData {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[usize; 3]>,
    frame: FrameData,
}

#[derive(Debug, Serialize)]
struct FrameData {
    origin: [f64; 3],
    x_axis: [f64; 3],
    y_axis: [f64; 3],
    z_axis: [f64; 3],
}

fn coords(p: &Point3) -> [f64; 3] {
    [p.x, p.y, p.z]
}

impl MeshData {
    fn new(mesh: &Mesh, frame: &CoordinateFrame) -> Self {
        Self {
            vertices: mesh.vertices.iter().map(coords).collect(),
            faces: mesh.faces.clone(),
            frame: FrameData {
                origin: coords(&frame.origin),
                x_axis: coords(&frame.x_axis),
                y_axis: coords(&frame.y_axis),
                z_axis: coords(&frame.z_axis),
            },
        }
    }
}

/// Execute a parsed command line, writing results to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), Box<dyn Error>> {
    let printer = Printer::new(cli.precision, !cli.plain);

    match &cli.command {
        Command::Matrix { expr } => {
            let matrix = parse_expression(expr)?;
            debug!("parsed `{expr}`");
            printer.matrix(out, &matrix)?;
        }
        Command::Apply { expr, points } => {
            let matrix = parse_expression(expr)?;
            let transformed = matrix.transform_points(points)?;
            let pairs: Vec<(Point3, Point3)> =
                points.iter().copied().zip(transformed).collect();
            printer.mapping(out, &pairs)?;
        }
        Command::Invert { expr } => {
            let inverse = parse_expression(expr)?.inverse()?;
            printer.matrix(out, &inverse)?;
        }
        Command::Euler { expr, order } => {
            let matrix = parse_expression(expr)?;
            let angles = matrix_to_euler_angles(&matrix, *order);
            printer.angles(out, order.as_str(), angles)?;
        }
        Command::Mesh {
            shape,
            size,
            transform,
            json,
        } => {
            let mesh = match shape {
                Shape::Cube => Mesh::cube(*size),
                Shape::Sphere => Mesh::sphere(*size),
            };
            let matrix = match transform {
                Some(expr) => parse_expression(expr)?,
                None => Matrix3D::identity(),
            };
            let mesh = mesh.transformed(&matrix)?;
            let frame = CoordinateFrame::new(*size).transformed(&matrix)?;
            info!(
                "{shape:?}: {} vertices, {} faces",
                mesh.vertices.len(),
                mesh.faces.len()
            );

            if *json {
                serde_json::to_writer_pretty(&mut *out, &MeshData::new(&mesh, &frame))?;
                writeln!(out)?;
            } else {
                printer.mesh(out, &mesh)?;
                printer.frame(out, &frame)?;
            }
        }
        Command::Api { endpoint, body } => {
            let response = api::handle(endpoint, body)?;
            writeln!(out, "{response}")?;
        }
    }

    Ok(())
}
