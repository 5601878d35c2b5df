/// Styled terminal output for matrices, points and meshes
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use mx3d_core::{CoordinateFrame, Matrix3D, Mesh, Point3};
use std::io::{self, Write};

/// Writes values with a fixed precision, optionally colored
pub struct Printer {
    precision: usize,
    color: bool,
}

impl Printer {
    pub fn new(precision: usize, color: bool) -> Self {
        Self { precision, color }
    }

    fn number(&self, value: f64) -> String {
        // Keep "-0.0000" out of the output.
        let threshold = 0.5 * 10f64.powi(-(self.precision.min(300) as i32));
        let value = if value.abs() < threshold { 0.0 } else { value };
        format!("{value:>width$.prec$}", width = self.precision + 5, prec = self.precision)
    }

    fn styled<W: Write>(&self, writer: &mut W, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(writer, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            queue!(writer, Print(text))
        }
    }

    /// Print a matrix, one row per line.
    ///
    /// Colors: diagonal yellow, translation column cyan, projective row dark
    /// grey, everything else white.
    pub fn matrix<W: Write>(&self, writer: &mut W, matrix: &Matrix3D) -> io::Result<()> {
        for (r, row) in matrix.rows().iter().enumerate() {
            self.styled(writer, Color::DarkGrey, "[")?;
            for (c, value) in row.iter().enumerate() {
                let color = match (r, c) {
                    (3, _) => Color::DarkGrey,
                    (r, c) if r == c => Color::Yellow,
                    (_, 3) => Color::Cyan,
                    _ => Color::White,
                };
                self.styled(writer, color, &self.number(*value))?;
            }
            self.styled(writer, Color::DarkGrey, " ]")?;
            queue!(writer, Print('\n'))?;
        }
        writer.flush()
    }

    pub fn point<W: Write>(&self, writer: &mut W, point: &Point3) -> io::Result<()> {
        let text = format!(
            "({}, {}, {})",
            self.number(point.x).trim_start(),
            self.number(point.y).trim_start(),
            self.number(point.z).trim_start()
        );
        self.styled(writer, Color::Green, &text)
    }

    /// Print `source -> transformed` pairs.
    pub fn mapping<W: Write>(&self, writer: &mut W, pairs: &[(Point3, Point3)]) -> io::Result<()> {
        for (source, target) in pairs {
            self.point(writer, source)?;
            self.styled(writer, Color::DarkGrey, " -> ")?;
            self.point(writer, target)?;
            queue!(writer, Print('\n'))?;
        }
        writer.flush()
    }

    pub fn angles<W: Write>(&self, writer: &mut W, order: &str, angles: [f64; 3]) -> io::Result<()> {
        for (axis, angle) in order.chars().zip(angles) {
            self.styled(writer, Color::Cyan, &format!("{axis}:"))?;
            queue!(writer, Print(format!("{} deg\n", self.number(angle))))?;
        }
        writer.flush()
    }

    pub fn mesh<W: Write>(&self, writer: &mut W, mesh: &Mesh) -> io::Result<()> {
        self.styled(writer, Color::Yellow, &format!("vertices ({})\n", mesh.vertices.len()))?;
        for (i, v) in mesh.vertices.iter().enumerate() {
            queue!(writer, Print(format!("{i:>4}  ")))?;
            self.point(writer, v)?;
            queue!(writer, Print('\n'))?;
        }
        self.styled(writer, Color::Yellow, &format!("faces ({})\n", mesh.faces.len()))?;
        for [a, b, c] in &mesh.faces {
            queue!(writer, Print(format!("  {a} {b} {c}\n")))?;
        }
        writer.flush()
    }

    pub fn frame<W: Write>(&self, writer: &mut W, frame: &CoordinateFrame) -> io::Result<()> {
        self.styled(writer, Color::Yellow, "frame\n")?;
        let labelled = [
            ("origin", Color::White, frame.origin),
            ("x", Color::Red, frame.x_axis),
            ("y", Color::Green, frame.y_axis),
            ("z", Color::Blue, frame.z_axis),
        ];
        for (label, color, point) in labelled {
            self.styled(writer, color, &format!("{label:>8}  "))?;
            self.point(writer, &point)?;
            queue!(writer, Print('\n'))?;
        }
        writer.flush()
    }
}
