/// Parser for textual transform expressions such as
/// `translate(2, 1, 0) @ rotate_x(30) @ scale(1, 1.5, 0.8)`
///
/// Terms are composed like matrix products: the rightmost term is applied
/// first. `@` and `*` are interchangeable.
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, many0_count, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Result, TransformError};
use crate::euler::{axis_angle_to_matrix, euler_angles_to_matrix, EulerOrder};
use crate::matrix::Matrix3D;
use crate::projection::{look_at, orthographic, perspective};
use crate::{Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
enum Arg<'a> {
    Number(f64),
    Ident(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
struct Call<'a> {
    name: &'a str,
    args: Vec<Arg<'a>>,
}

/// Parse and evaluate a transform expression.
///
/// # Errors
///
/// Returns [`TransformError::InvalidExpression`] for syntax errors, unknown
/// functions and wrong argument counts, and propagates errors from the
/// builders themselves (e.g. an invalid frustum).
pub fn parse_expression(input: &str) -> Result<Matrix3D> {
    let calls = match all_consuming(expression)(input) {
        Ok((_, calls)) => calls,
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            return Err(syntax_error(input, e.input));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(TransformError::InvalidExpression(
                "unexpected end of input".into(),
            ));
        }
    };

    calls
        .iter()
        .try_fold(Matrix3D::identity(), |acc, call| Ok(acc * evaluate(call)?))
}

/// Parse a point written as `x,y,z`, optionally wrapped in `()` or `[]`.
///
/// # Errors
///
/// Returns [`TransformError::InvalidExpression`] when the text is not three
/// comma-separated numbers.
pub fn parse_point(input: &str) -> Result<Point3> {
    match all_consuming(point)(input) {
        Ok((_, p)) => Ok(p),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(syntax_error(input, e.input)),
        Err(nom::Err::Incomplete(_)) => Err(TransformError::InvalidExpression(
            "unexpected end of input".into(),
        )),
    }
}

fn syntax_error(input: &str, rest: &str) -> TransformError {
    let offset = input.len() - rest.len();
    let rest = rest.trim();
    if rest.is_empty() {
        TransformError::InvalidExpression(format!("unexpected end of input in `{input}`"))
    } else {
        TransformError::InvalidExpression(format!("unexpected `{rest}` at offset {offset}"))
    }
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn arg(input: &str) -> IResult<&str, Arg<'_>> {
    ws(alt((map(double, Arg::Number), map(identifier, Arg::Ident))))(input)
}

fn call(input: &str) -> IResult<&str, Call<'_>> {
    let (input, name) = ws(identifier)(input)?;
    let (input, args) = opt(delimited(
        char('('),
        separated_list0(char(','), arg),
        ws(char(')')),
    ))(input)?;
    Ok((
        input,
        Call {
            name,
            args: args.unwrap_or_default(),
        },
    ))
}

fn expression(input: &str) -> IResult<&str, Vec<Call<'_>>> {
    let (input, first) = call(input)?;
    let (input, rest) = many0(preceded(ws(alt((char('@'), char('*')))), call))(input)?;
    let mut calls = Vec::with_capacity(rest.len() + 1);
    calls.push(first);
    calls.extend(rest);
    Ok((input, calls))
}

fn point(input: &str) -> IResult<&str, Point3> {
    let open = opt(ws(alt((char('('), char('[')))));
    let close = opt(ws(alt((char(')'), char(']')))));
    let coords = tuple((
        ws(double),
        preceded(char(','), ws(double)),
        preceded(char(','), ws(double)),
    ));
    map(delimited(open, coords, close), |(x, y, z)| Point3::new(x, y, z))(input)
}

fn evaluate(call: &Call<'_>) -> Result<Matrix3D> {
    match call.name.to_ascii_lowercase().as_str() {
        "identity" => {
            numbers::<0>(call)?;
            Ok(Matrix3D::identity())
        }
        "translate" | "translation" => {
            let [x, y, z] = numbers(call)?;
            Ok(Matrix3D::translation(x, y, z))
        }
        "scale" if call.args.len() == 1 => {
            let [s] = numbers(call)?;
            Ok(Matrix3D::scale(s, s, s))
        }
        "scale" => {
            let [x, y, z] = numbers(call)?;
            Ok(Matrix3D::scale(x, y, z))
        }
        "rotate_x" | "rx" => {
            let [angle] = numbers(call)?;
            Ok(Matrix3D::rotation_x(angle))
        }
        "rotate_y" | "ry" => {
            let [angle] = numbers(call)?;
            Ok(Matrix3D::rotation_y(angle))
        }
        "rotate_z" | "rz" => {
            let [angle] = numbers(call)?;
            Ok(Matrix3D::rotation_z(angle))
        }
        "rotate" => {
            let [ax, ay, az, angle] = numbers(call)?;
            axis_angle_to_matrix([ax, ay, az], angle)
        }
        "euler" => {
            let [a, b, c] = numbers_prefix(call, 4)?;
            let order: EulerOrder = match call.args.get(3) {
                Some(Arg::Ident(name)) => name.parse()?,
                _ => return Err(bad_argument(call, 3, "an axis order such as xyz")),
            };
            Ok(euler_angles_to_matrix([a, b, c], order))
        }
        "look_at" => {
            let [ex, ey, ez, tx, ty, tz, ux, uy, uz] = numbers(call)?;
            look_at(
                &Point3::new(ex, ey, ez),
                &Point3::new(tx, ty, tz),
                &Vector3::new(ux, uy, uz),
            )
        }
        "perspective" => {
            let [fov, aspect, near, far] = numbers(call)?;
            perspective(fov, aspect, near, far)
        }
        "orthographic" | "ortho" => {
            let [l, r, b, t, n, f] = numbers(call)?;
            orthographic(l, r, b, t, n, f)
        }
        _ => Err(TransformError::InvalidExpression(format!(
            "unknown function `{}`",
            call.name
        ))),
    }
}

/// All arguments as numbers, requiring exactly `N` of them.
fn numbers<const N: usize>(call: &Call<'_>) -> Result<[f64; N]> {
    numbers_prefix(call, N)
}

/// The first `N` arguments as numbers, requiring `total` arguments overall.
fn numbers_prefix<const N: usize>(call: &Call<'_>, total: usize) -> Result<[f64; N]> {
    if call.args.len() != total {
        return Err(TransformError::InvalidExpression(format!(
            "`{}` takes {total} argument(s), got {}",
            call.name,
            call.args.len()
        )));
    }
    let mut out = [0.0; N];
    for (index, (slot, arg)) in out.iter_mut().zip(&call.args).enumerate() {
        match arg {
            Arg::Number(value) => *slot = *value,
            Arg::Ident(_) => return Err(bad_argument(call, index, "a number")),
        }
    }
    Ok(out)
}

fn bad_argument(call: &Call<'_>, index: usize, expected: &str) -> TransformError {
    TransformError::InvalidExpression(format!(
        "argument {} of `{}` must be {expected}",
        index + 1,
        call.name
    ))
}
