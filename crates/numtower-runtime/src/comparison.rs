//! Tower equality. Always defined: incompatible kinds are simply unequal.

use numtower_builtins::{Matrix, Scalar, Value};

fn matrices_equal(a: &Matrix, b: &Matrix, tolerance: f64) -> bool {
    a.shape() == b.shape()
        && a.entries()
            .iter()
            .zip(b.entries())
            .all(|(x, y)| x.approx_eq(&y, tolerance))
}

fn scalar_equals_matrix(s: Scalar, m: &Matrix, tolerance: f64) -> bool {
    m.is_square() && matrices_equal(&Matrix::scalar_identity(m.rows(), s), m, tolerance)
}

pub(crate) fn equals(tolerance: f64, a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Vector(x), Value::Vector(y)) => {
            x.len() == y.len()
                && x.data
                    .iter()
                    .zip(&y.data)
                    .all(|(p, q)| Scalar::Real(*p).approx_eq(&Scalar::Real(*q), tolerance))
        }
        (Value::Matrix(x), Value::Matrix(y)) => matrices_equal(x, y, tolerance),
        (Value::Matrix(m), s) | (s, Value::Matrix(m)) => match s.to_scalar() {
            Some(s) => scalar_equals_matrix(s, m, tolerance),
            None => false,
        },
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| equals(tolerance, p, q))
        }
        (x, y) => match (x.to_scalar(), y.to_scalar()) {
            (Some(p), Some(q)) => p.approx_eq(&q, tolerance),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numtower_builtins::{Complex64, Quaternion, Vector};

    const TOL: f64 = 1e-10;

    #[test]
    fn containment_across_scalar_kinds() {
        let q = Value::Quaternion(Quaternion::new(3.0, -2.0, 0.0, 0.0));
        let z = Value::Complex(Complex64::new(3.0, -2.0));
        assert!(equals(TOL, &q, &z));
        assert!(equals(TOL, &Value::Int(3), &Value::Quaternion(Quaternion::from_real(3.0))));
        assert!(!equals(TOL, &z, &Value::Real(3.0)));
    }

    #[test]
    fn tolerance_applies_to_reals() {
        assert!(equals(TOL, &Value::Real(0.1 + 0.2), &Value::Real(0.3)));
        assert!(!equals(TOL, &Value::Real(1.0), &Value::Real(1.001)));
    }

    #[test]
    fn incompatible_kinds_are_unequal() {
        let v = Value::Vector(Vector::new(vec![1.0, 2.0]));
        let w = Value::Vector(Vector::new(vec![1.0, 2.0, 0.0]));
        let m = Value::Matrix(Matrix::from_real(1, 2, vec![1.0, 2.0]).unwrap());
        assert!(!equals(TOL, &v, &w));
        assert!(!equals(TOL, &v, &m));
        assert!(!equals(TOL, &Value::Int(1), &m));
    }

    #[test]
    fn scalar_equals_its_identity_embedding() {
        let m = Value::Matrix(Matrix::from_real(2, 2, vec![2.0, 0.0, 0.0, 2.0]).unwrap());
        assert!(equals(TOL, &Value::Int(2), &m));
        assert!(equals(TOL, &m, &Value::Real(2.0)));
    }
}
