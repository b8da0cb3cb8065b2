//! Unary operators `neg`, `conj`, `abs` and `normalize`.

use numtower_builtins::{EvalResult, Outcome, TowerError, Value};

use crate::ops::UnaryOp;
use crate::{arithmetic, Engine};

fn abs(v: &Value) -> Outcome<Value> {
    match v {
        Value::Int(i) => match i.checked_abs() {
            Some(a) => Outcome::Defined(Value::Int(a)),
            None => Outcome::Defined(Value::Real((*i as f64).abs())),
        },
        other => other.magnitude().map(Value::Real),
    }
}

/// `v / |v|`.
fn normalize(engine: &Engine, v: &Value) -> EvalResult<Value> {
    let Outcome::Defined(magnitude) = v.magnitude() else {
        return Ok(Outcome::Undefined);
    };
    if magnitude == 0.0 {
        return Err(TowerError::DivideByZero);
    }
    arithmetic::div(engine, v, &Value::Real(magnitude))
}

pub(crate) fn apply(engine: &Engine, op: UnaryOp, v: &Value) -> EvalResult<Value> {
    match op {
        UnaryOp::Neg => Ok(Outcome::Defined(arithmetic::neg(v)?)),
        UnaryOp::Conj => Ok(Outcome::Defined(v.conjugate())),
        UnaryOp::Abs => Ok(abs(v)),
        UnaryOp::Normalize => normalize(engine, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numtower_builtins::{Complex64, NumberList, Quaternion, Vector};

    #[test]
    fn abs_keeps_ints() {
        let engine = Engine::default();
        assert_eq!(apply(&engine, UnaryOp::Abs, &Value::Int(-4)), Ok(Outcome::Defined(Value::Int(4))));
        assert_eq!(
            apply(&engine, UnaryOp::Abs, &Value::Complex(Complex64::new(3.0, -4.0))),
            Ok(Outcome::Defined(Value::Real(5.0)))
        );
    }

    #[test]
    fn normalize_zero_vector_divides_by_zero() {
        let engine = Engine::default();
        let zero = Value::Vector(Vector::new(vec![0.0, 0.0]));
        assert_eq!(apply(&engine, UnaryOp::Normalize, &zero), Err(TowerError::DivideByZero));
        let v = Value::Vector(Vector::new(vec![3.0, 4.0]));
        assert_eq!(
            apply(&engine, UnaryOp::Normalize, &v),
            Ok(Outcome::Defined(Value::Vector(Vector::new(vec![0.6, 0.8]))))
        );
    }

    #[test]
    fn normalize_quaternion_is_unit() {
        let engine = Engine::default();
        let q = Value::Quaternion(Quaternion::new(1.0, 1.0, 1.0, 1.0));
        let n = apply(&engine, UnaryOp::Normalize, &q).unwrap().unwrap_defined();
        assert_eq!(n, Value::Quaternion(Quaternion::new(0.5, 0.5, 0.5, 0.5)));
    }

    #[test]
    fn lists_have_no_magnitude() {
        let engine = Engine::default();
        let list = Value::List(NumberList::new(vec![Value::Int(1)]).unwrap());
        assert_eq!(apply(&engine, UnaryOp::Abs, &list), Ok(Outcome::Undefined));
        assert_eq!(apply(&engine, UnaryOp::Normalize, &list), Ok(Outcome::Undefined));
        assert!(apply(&engine, UnaryOp::Neg, &list).unwrap().is_defined());
    }
}
