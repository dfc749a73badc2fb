//! 2-D affine placement for floating elements.
//!
//! CSS transform functions can't be combined piecemeal from script, so these
//! helpers read back whatever matrix is already applied (under any vendor
//! prefix), change only the components they own, and write the full matrix
//! back under every prefix.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Transform properties, in the order they are read back.
pub const TRANSFORM_PROPERTIES: [&str; 5] = [
    "-webkit-transform",
    "transform",
    "-moz-transform",
    "-o-transform",
    "-ms-transform",
];

/// `name(args)` of a single transform function.
static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([a-zA-Z0-9-]+)\s*\(([^)]*)\)\s*$").unwrap());

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").unwrap());

/// Something carrying inline style properties.
pub trait TransformTarget {
    /// Current value of a style property; `None` or empty when unset.
    fn style_property(&self, name: &str) -> Option<String>;

    fn set_style_property(&mut self, name: &str, value: &str);
}

/// `matrix(a, b, c, d, e, f)` components: scale-x, skew-y, skew-x, scale-y,
/// translate-x, translate-y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f64; 6]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Parse a computed transform. Missing, `none`, or malformed values read
    /// as the identity.
    pub fn parse(value: Option<&str>) -> Matrix {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty() && *v != "none") else {
            return Matrix::IDENTITY;
        };

        let Some(caps) = FUNCTION.captures(value) else {
            tracing::debug!(
                target: "notebook::toolbar",
                value,
                "unrecognized transform, treating as identity"
            );
            return Matrix::IDENTITY;
        };
        let numbers: Vec<f64> = NUMBER
            .find_iter(&caps[2])
            .filter_map(|m| m.as_str().parse().ok())
            .collect();

        match (&caps[1], numbers.as_slice()) {
            ("matrix", &[a, b, c, d, e, f]) => Matrix([a, b, c, d, e, f]),
            // Column-major 4x4; the 2-D part sits in columns 0, 1 and 3.
            ("matrix3d", m) if m.len() == 16 => Matrix([m[0], m[1], m[4], m[5], m[12], m[13]]),
            _ => {
                tracing::debug!(
                    target: "notebook::toolbar",
                    value,
                    "unrecognized transform, treating as identity"
                );
                Matrix::IDENTITY
            }
        }
    }

    pub fn to_css(&self) -> String {
        let [a, b, c, d, e, f] = self.0;
        format!("matrix({a}, {b}, {c}, {d}, {e}, {f})")
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

/// Integer translation read back from a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translation {
    pub x: i32,
    pub y: i32,
}

/// The matrix currently applied to `target`.
pub fn current_matrix<T: TransformTarget + ?Sized>(target: &T) -> Matrix {
    let value = TRANSFORM_PROPERTIES
        .iter()
        .filter_map(|name| target.style_property(name))
        .find(|v| !v.trim().is_empty());
    Matrix::parse(value.as_deref())
}

fn apply<T: TransformTarget + ?Sized>(target: &mut T, matrix: Matrix) {
    let css = matrix.to_css();
    for name in TRANSFORM_PROPERTIES {
        target.set_style_property(name, &css);
    }
}

/// Move to (`x`, `y`), keeping scale and rotation.
pub fn translate<T: TransformTarget + ?Sized>(target: &mut T, x: f64, y: f64) {
    let mut matrix = current_matrix(target);
    matrix.0[4] = x;
    matrix.0[5] = y;
    apply(target, matrix);
}

/// Uniform scale, keeping translation.
pub fn scale<T: TransformTarget + ?Sized>(target: &mut T, factor: f64) {
    let mut matrix = current_matrix(target);
    matrix.0[0] = factor;
    matrix.0[3] = factor;
    apply(target, matrix);
}

/// Set the skew components from `degrees`, keeping translation and scale.
pub fn rotate<T: TransformTarget + ?Sized>(target: &mut T, degrees: f64) {
    let mut matrix = current_matrix(target);
    let rad = degrees.to_radians();
    matrix.0[1] = rad;
    matrix.0[2] = -rad;
    apply(target, matrix);
}

/// Current translation, truncated to whole pixels.
pub fn translation<T: TransformTarget + ?Sized>(target: &T) -> Translation {
    let matrix = current_matrix(target);
    Translation {
        x: matrix.0[4].trunc() as i32,
        y: matrix.0[5].trunc() as i32,
    }
}
