//! `signum`, `real`, `imag` and `arg`.

use num_complex::Complex64;
use numtower_builtins::{Outcome, Scalar, Value};

fn real_signum(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() {
        x.abs()
    } else {
        x.signum()
    }
}

fn scalar_signum(s: Scalar) -> Scalar {
    match s {
        Scalar::Real(x) => Scalar::Real(real_signum(x)),
        Scalar::Complex(z) if z.norm() == 0.0 => Scalar::Complex(z),
        Scalar::Complex(z) => Scalar::Complex(z / z.norm()),
        Scalar::Quaternion(q) if q.is_zero() => Scalar::Quaternion(q),
        Scalar::Quaternion(q) => Scalar::Quaternion(q.scale(1.0 / q.norm())),
    }
}

/// `x / |x|` for complex and quaternion values; zero stays zero.
pub(crate) fn signum(v: &Value) -> Value {
    match v {
        Value::Int(i) => Value::Int(i.signum()),
        Value::Real(x) => Value::Real(real_signum(*x)),
        Value::Complex(z) => Value::from_scalar(scalar_signum(Scalar::Complex(*z))),
        Value::Quaternion(q) => Value::from_scalar(scalar_signum(Scalar::Quaternion(*q))),
        Value::Vector(vec) => Value::Vector(vec.map(real_signum)),
        Value::Matrix(m) => Value::Matrix(m.map_entries(scalar_signum)),
        Value::List(list) => Value::List(list.map_values(signum)),
    }
}

pub(crate) fn real_part(v: &Value) -> Outcome<Value> {
    Outcome::Defined(match v {
        Value::Int(i) => Value::Int(*i),
        Value::Real(x) => Value::Real(*x),
        Value::Complex(z) => Value::Real(z.re),
        Value::Quaternion(q) => Value::Real(q.re),
        _ => return Outcome::Undefined,
    })
}

/// The `i` component. Quaternions carry three imaginary axes and have no single one.
pub(crate) fn imag_part(v: &Value) -> Outcome<Value> {
    Outcome::Defined(match v {
        Value::Int(_) => Value::Int(0),
        Value::Real(_) => Value::Real(0.0),
        Value::Complex(z) => Value::Real(z.im),
        _ => return Outcome::Undefined,
    })
}

pub(crate) fn arg(v: &Value) -> Outcome<Value> {
    Outcome::Defined(match v {
        Value::Int(_) | Value::Real(_) => {
            let x = v.as_real().unwrap_or_default();
            Value::Real(Complex64::new(x, 0.0).arg())
        }
        Value::Complex(z) => Value::Real(z.arg()),
        Value::Quaternion(q) => Value::Real(q.vector_norm().atan2(q.re)),
        _ => return Outcome::Undefined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use numtower_builtins::{NumberList, Quaternion, Vector};
    use std::f64::consts::PI;

    #[test]
    fn signum_of_reals() {
        assert_eq!(signum(&Value::Int(-7)), Value::Int(-1));
        assert_eq!(signum(&Value::Real(0.0)), Value::Real(0.0));
        assert_eq!(
            signum(&Value::Vector(Vector::new(vec![-2.0, 0.0, 5.0]))),
            Value::Vector(Vector::new(vec![-1.0, 0.0, 1.0]))
        );
    }

    #[test]
    fn signum_is_unit_direction() {
        let s = signum(&Value::Complex(Complex64::new(3.0, 4.0)));
        assert_eq!(s, Value::Complex(Complex64::new(0.6, 0.8)));
        let zero = Value::Quaternion(Quaternion::ZERO);
        assert_eq!(signum(&zero), zero);
    }

    #[test]
    fn signum_maps_list_elements() {
        let list = NumberList::new(vec![Value::Int(-4), Value::Complex(Complex64::new(0.0, -2.0))]).unwrap();
        let expected =
            NumberList::new(vec![Value::Int(-1), Value::Complex(Complex64::new(0.0, -1.0))]).unwrap();
        assert_eq!(signum(&Value::List(list)), Value::List(expected));
    }

    #[test]
    fn parts_and_argument() {
        let z = Value::Complex(Complex64::new(-1.0, 0.0));
        assert_eq!(arg(&z), Outcome::Defined(Value::Real(PI)));
        assert_eq!(arg(&Value::Int(-2)), Outcome::Defined(Value::Real(PI)));
        let q = Value::Quaternion(Quaternion::new(1.0, 0.0, 1.0, 0.0));
        assert_eq!(arg(&q), Outcome::Defined(Value::Real(PI / 4.0)));
        assert_eq!(real_part(&q), Outcome::Defined(Value::Real(1.0)));
        assert_eq!(imag_part(&q), Outcome::Undefined);
    }
}
