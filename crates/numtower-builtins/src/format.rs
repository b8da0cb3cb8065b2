//! Canonical text rendering.
//!
//! Complex and quaternion values print the real part first, then every non-zero
//! imaginary axis with an explicit sign and its suffix (`3-2i`, `2j-1k`). A value whose
//! components are all zero prints as `0`.

use std::fmt;

use num_complex::Complex64;

use crate::list::NumberList;
use crate::matrix::Matrix;
use crate::quaternion::Quaternion;
use crate::scalar::Scalar;
use crate::vector::Vector;
use crate::Value;

/// Shortest round-trip decimal form of `x`, without a trailing `.0` and with `-0`
/// printed as `0`.
pub fn format_real(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    let s = format!("{x:?}");
    match s.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => s,
    }
}

fn write_components(f: &mut fmt::Formatter<'_>, re: f64, axes: &[(f64, char)]) -> fmt::Result {
    let mut wrote = false;
    if re != 0.0 {
        f.write_str(&format_real(re))?;
        wrote = true;
    }
    for &(coef, suffix) in axes {
        if coef == 0.0 {
            continue;
        }
        let negative = coef.is_sign_negative();
        if negative {
            f.write_str("-")?;
        } else if wrote {
            f.write_str("+")?;
        }
        write!(f, "{}{suffix}", format_real(coef.abs()))?;
        wrote = true;
    }
    if !wrote {
        f.write_str("0")?;
    }
    Ok(())
}

fn write_complex(f: &mut fmt::Formatter<'_>, z: &Complex64) -> fmt::Result {
    write_components(f, z.re, &[(z.im, 'i')])
}

fn write_separated<T>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            f.write_str(",")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_components(f, self.re, &[(self.i, 'i'), (self.j, 'j'), (self.k, 'k')])
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Real(x) => f.write_str(&format_real(*x)),
            Scalar::Complex(z) => write_complex(f, z),
            Scalar::Quaternion(q) => fmt::Display::fmt(q, f),
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        write_separated(f, &self.data, |f, x| f.write_str(&format_real(*x)))?;
        f.write_str(">")
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_separated(f, 0..self.rows(), |f, r| {
            f.write_str("[")?;
            write_separated(f, self.row(r), |f, s| fmt::Display::fmt(&s, f))?;
            f.write_str("]")
        })?;
        f.write_str("]")
    }
}

impl fmt::Display for NumberList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_separated(f, self.iter(), |f, v| fmt::Display::fmt(v, f))?;
        f.write_str("}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(x) => f.write_str(&format_real(*x)),
            Value::Complex(z) => write_complex(f, z),
            Value::Quaternion(q) => fmt::Display::fmt(q, f),
            Value::Vector(v) => fmt::Display::fmt(v, f),
            Value::Matrix(m) => fmt::Display::fmt(m, f),
            Value::List(list) => fmt::Display::fmt(list, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(re: f64, i: f64, j: f64, k: f64) -> String {
        Quaternion::new(re, i, j, k).to_string()
    }

    #[test]
    fn reals_are_shortest() {
        assert_eq!(format_real(3.0), "3");
        assert_eq!(format_real(-2.5), "-2.5");
        assert_eq!(format_real(0.1), "0.1");
        assert_eq!(format_real(-0.0), "0");
        assert_eq!(format_real(1e-7), "1e-7");
        assert_eq!(format_real(f64::INFINITY), "inf");
        assert_eq!(format_real(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_real(f64::NAN), "NaN");
    }

    #[test]
    fn sign_per_axis() {
        assert_eq!(Value::Complex(Complex64::new(3.0, -2.0)).to_string(), "3-2i");
        assert_eq!(Value::Complex(Complex64::new(0.0, 2.0)).to_string(), "2i");
        assert_eq!(Value::Complex(Complex64::new(0.0, -1.0)).to_string(), "-1i");
        assert_eq!(Value::Complex(Complex64::new(0.0, 0.0)).to_string(), "0");
        assert_eq!(q(1.0, 2.0, 3.0, 4.0), "1+2i+3j+4k");
        assert_eq!(q(0.0, 0.0, 2.0, -1.0), "2j-1k");
        assert_eq!(q(0.0, 0.0, 0.0, 0.0), "0");
        assert_eq!(q(-1.5, 0.0, 0.0, 0.0), "-1.5");
    }

    #[test]
    fn containers() {
        assert_eq!(Vector::new(vec![1.0, 2.0, 3.0]).to_string(), "<1,2,3>");
        let m = Matrix::from_real(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.to_string(), "[[1,2],[3,4]]");
        let list = NumberList::new(vec![Value::Int(1), Value::Real(2.5), Value::Complex(Complex64::new(0.0, 1.0))]).unwrap();
        assert_eq!(list.to_string(), "{1,2.5,1i}");
    }
}
