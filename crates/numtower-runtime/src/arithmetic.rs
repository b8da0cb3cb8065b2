//! Binary arithmetic over the tower: `+ - * / //`.
//!
//! Each operator is a `match` over the operand pair. Pairs without a rule fall through to
//! `Outcome::Undefined`; shape and zero-divisor checks run before the formula and raise
//! `TowerError`.

use numtower_builtins::{defined, EvalResult, NumberList, Outcome, Scalar, TowerError, Value, Vector};
use tracing::trace;

use crate::builtins::math::rounding::floor_value;
use crate::matrix;
use crate::Engine;

fn real_of(v: &Value) -> Option<f64> {
    v.as_real()
}

fn vector_mismatch(op: &str, a: &Vector, b: &Vector) -> TowerError {
    TowerError::dimension_mismatch(op, format!("<{}>", a.len()), format!("<{}>", b.len()))
}

pub(crate) fn add(a: &Value, b: &Value) -> EvalResult<Value> {
    additive("+", a, b, false)
}

pub(crate) fn sub(a: &Value, b: &Value) -> EvalResult<Value> {
    additive("-", a, b, true)
}

fn additive(op: &str, a: &Value, b: &Value, subtract: bool) -> EvalResult<Value> {
    let combine = |x: Scalar, y: Scalar| if subtract { x.sub(y) } else { x.add(y) };
    let result = match (a, b) {
        (Value::Int(x), Value::Int(y)) => {
            let exact = if subtract { x.checked_sub(*y) } else { x.checked_add(*y) };
            match exact {
                Some(v) => Value::Int(v),
                None => {
                    let (x, y) = (*x as f64, *y as f64);
                    Value::Real(if subtract { x - y } else { x + y })
                }
            }
        }
        (Value::Vector(x), Value::Vector(y)) => {
            let out = x
                .zip_with(y, |p, q| if subtract { p - q } else { p + q })
                .ok_or_else(|| vector_mismatch(op, x, y))?;
            Value::Vector(out)
        }
        (Value::Matrix(x), Value::Matrix(y)) => {
            Value::Matrix(matrix::zip_entries(op, x, y, combine)?)
        }
        (Value::Matrix(m), s) if s.is_scalar() => {
            let s = scalar(s)?;
            let embedded = matrix::embed_scalar(s, m)?;
            Value::Matrix(matrix::zip_entries(op, m, &embedded, combine)?)
        }
        (s, Value::Matrix(m)) if s.is_scalar() => {
            let s = scalar(s)?;
            let embedded = matrix::embed_scalar(s, m)?;
            Value::Matrix(matrix::zip_entries(op, &embedded, m, combine)?)
        }
        (x, y) if x.is_scalar() && y.is_scalar() => {
            Value::from_scalar(combine(scalar(x)?, scalar(y)?))
        }
        _ => return Ok(Outcome::Undefined),
    };
    Ok(Outcome::Defined(result))
}

pub(crate) fn scalar(v: &Value) -> Result<Scalar, TowerError> {
    Scalar::try_from(v)
}

pub(crate) fn mul(a: &Value, b: &Value) -> EvalResult<Value> {
    let result = match (a, b) {
        (Value::Int(x), Value::Int(y)) => match x.checked_mul(*y) {
            Some(v) => Value::Int(v),
            None => Value::Real(*x as f64 * *y as f64),
        },
        (Value::Vector(v), s @ (Value::Int(_) | Value::Real(_)))
        | (s @ (Value::Int(_) | Value::Real(_)), Value::Vector(v)) => {
            let k = real_of(s).unwrap_or_default();
            Value::Vector(v.map(|x| x * k))
        }
        (Value::Matrix(x), Value::Matrix(y)) => Value::Matrix(matrix::matmul(x, y)?),
        (Value::Matrix(m), s) if s.is_scalar() => {
            let s = scalar(s)?;
            Value::Matrix(m.map_entries(|e| e.mul(s)))
        }
        (s, Value::Matrix(m)) if s.is_scalar() => {
            let s = scalar(s)?;
            Value::Matrix(m.map_entries(|e| s.mul(e)))
        }
        (x, y) if x.is_scalar() && y.is_scalar() => Value::from_scalar(scalar(x)?.mul(scalar(y)?)),
        _ => return Ok(Outcome::Undefined),
    };
    Ok(Outcome::Defined(result))
}

pub(crate) fn div(engine: &Engine, a: &Value, b: &Value) -> EvalResult<Value> {
    let result = match (a, b) {
        (Value::Int(_), Value::Int(0)) => return Err(TowerError::DivideByZero),
        (Value::Int(x), Value::Int(y)) => Value::Real(*x as f64 / *y as f64),
        (Value::Vector(v), s @ (Value::Int(_) | Value::Real(_))) => {
            let k = real_of(s).unwrap_or_default();
            if k == 0.0 {
                return Err(TowerError::DivideByZero);
            }
            Value::Vector(v.map(|x| x / k))
        }
        (Value::Matrix(m), s) if s.is_scalar() => {
            let inv = scalar(s)?.inverse().ok_or(TowerError::DivideByZero)?;
            Value::Matrix(m.map_entries(|e| e.mul(inv)))
        }
        (s, Value::Matrix(m)) if s.is_scalar() => {
            let s = scalar(s)?;
            let inv = defined!(matrix::inverse(engine, m));
            Value::Matrix(inv.map_entries(|e| s.mul(e)))
        }
        (Value::Matrix(x), Value::Matrix(y)) => {
            if x.cols() != y.rows() {
                return Err(TowerError::dimension_mismatch(
                    "/",
                    x.shape_string(),
                    y.shape_string(),
                ));
            }
            let inv = defined!(matrix::inverse(engine, y));
            Value::Matrix(matrix::matmul(x, &inv)?)
        }
        (x, y) if x.is_scalar() && y.is_scalar() => {
            let q = scalar(x)?.div(scalar(y)?).ok_or(TowerError::DivideByZero)?;
            Value::from_scalar(q)
        }
        _ => {
            trace!(left = %a.kind(), right = %b.kind(), "no division rule");
            return Ok(Outcome::Undefined);
        }
    };
    Ok(Outcome::Defined(result))
}

/// `floor(a / b)`, with floor (not truncating) integer division for `Int // Int`.
pub(crate) fn floor_div(engine: &Engine, a: &Value, b: &Value) -> EvalResult<Value> {
    if let (Value::Int(x), Value::Int(y)) = (a, b) {
        if *y == 0 {
            return Err(TowerError::DivideByZero);
        }
        return Ok(Outcome::Defined(match x.checked_div(*y) {
            Some(q) if x % y != 0 && ((*x < 0) != (*y < 0)) => Value::Int(q - 1),
            Some(q) => Value::Int(q),
            None => Value::Real((*x as f64 / *y as f64).floor()),
        }));
    }
    let quotient = defined!(div(engine, a, b));
    Ok(Outcome::Defined(floor_value(&quotient)?))
}

pub(crate) fn neg(v: &Value) -> Result<Value, TowerError> {
    Ok(match v {
        Value::Int(i) => match i.checked_neg() {
            Some(n) => Value::Int(n),
            None => Value::Real(-(*i as f64)),
        },
        Value::Real(x) => Value::Real(-x),
        Value::Complex(z) => Value::Complex(-z),
        Value::Quaternion(q) => Value::Quaternion(-*q),
        Value::Vector(vec) => Value::Vector(vec.map(|x| -x)),
        Value::Matrix(m) => Value::Matrix(m.map_entries(Scalar::neg)),
        Value::List(list) => {
            let values = list.iter().map(neg).collect::<Result<Vec<_>, _>>()?;
            Value::List(NumberList::new(values)?)
        }
    })
}
