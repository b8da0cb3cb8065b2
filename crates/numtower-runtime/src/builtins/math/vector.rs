//! Products and angles between vectors.

use numtower_builtins::{EvalResult, Outcome, TowerError, Value, Vector};

use super::Function;

fn mismatch(f: Function, a: &Vector, b: &Vector) -> TowerError {
    TowerError::dimension_mismatch(f.name(), format!("<{}>", a.len()), format!("<{}>", b.len()))
}

fn angle(a: &Vector, b: &Vector) -> Result<f64, TowerError> {
    let dot = a.dot(b).ok_or_else(|| mismatch(Function::Angle, a, b))?;
    let norms = a.magnitude() * b.magnitude();
    if norms == 0.0 {
        return Err(TowerError::domain("angle with a zero vector"));
    }
    Ok((dot / norms).clamp(-1.0, 1.0).acos())
}

pub(crate) fn apply(f: Function, a: &Value, b: &Value) -> EvalResult<Value> {
    let (Value::Vector(a), Value::Vector(b)) = (a, b) else {
        return Ok(Outcome::Undefined);
    };
    let out = match f {
        Function::Dot => Value::Real(a.dot(b).ok_or_else(|| mismatch(f, a, b))?),
        Function::Cross => {
            if a.len() != 3 || b.len() != 3 {
                return Err(mismatch(f, a, b));
            }
            Value::Vector(a.cross(b).ok_or_else(|| mismatch(f, a, b))?)
        }
        Function::Angle => Value::Real(angle(a, b)?),
        _ => return Ok(Outcome::Undefined),
    };
    Ok(Outcome::Defined(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn v(data: &[f64]) -> Value {
        Value::Vector(Vector::new(data.to_vec()))
    }

    #[test]
    fn dot_and_cross() {
        let x = v(&[1.0, 0.0, 0.0]);
        let y = v(&[0.0, 1.0, 0.0]);
        assert_eq!(apply(Function::Dot, &x, &y), Ok(Outcome::Defined(Value::Real(0.0))));
        assert_eq!(apply(Function::Cross, &x, &y), Ok(Outcome::Defined(v(&[0.0, 0.0, 1.0]))));
        let flat = v(&[1.0, 2.0]);
        assert!(matches!(
            apply(Function::Cross, &flat, &flat),
            Err(TowerError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn angle_rules() {
        let r = apply(Function::Angle, &v(&[1.0, 0.0]), &v(&[0.0, 3.0])).unwrap().unwrap_defined();
        assert_eq!(r, Value::Real(FRAC_PI_2));
        assert!(matches!(
            apply(Function::Angle, &v(&[0.0, 0.0]), &v(&[1.0, 0.0])),
            Err(TowerError::Domain(_))
        ));
        assert!(matches!(
            apply(Function::Angle, &v(&[1.0]), &v(&[1.0, 0.0])),
            Err(TowerError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn non_vectors_are_undefined() {
        assert_eq!(apply(Function::Dot, &Value::Int(1), &Value::Int(2)), Ok(Outcome::Undefined));
    }
}
