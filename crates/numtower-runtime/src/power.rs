//! Exponentiation `a ** b`.
//!
//! Integer exponents use repeated squaring where the base kind has an exact product.
//! Every other pairing goes through the generic identity `exp(log(x)·y)`, with the
//! logarithm on the left so quaternion and matrix products keep their order.

use numtower_builtins::{defined, widest, EvalResult, Matrix, Outcome, Scalar, TowerError, Value};
use tracing::trace;

use crate::builtins::math::{elementwise, Function};
use crate::{arithmetic, matrix, Engine};

/// `exp(log(base) · exponent)`.
fn generic(engine: &Engine, base: &Value, exponent: &Value) -> EvalResult<Value> {
    trace!(base = %base.kind(), exponent = %exponent.kind(), "generic power identity");
    let log = defined!(elementwise::analytic(engine, Function::Log, base));
    let product = defined!(arithmetic::mul(&log, exponent));
    elementwise::analytic(engine, Function::Exp, &product)
}

/// Integral exponent within the repeated-multiplication cap.
fn integral_exponent(engine: &Engine, exponent: &Value) -> Option<i64> {
    let n = match exponent {
        Value::Int(n) => *n,
        Value::Real(x) if x.fract() == 0.0 && x.abs() <= i64::MAX as f64 => *x as i64,
        _ => return None,
    };
    (n.unsigned_abs() <= engine.options().max_power_exponent).then_some(n)
}

fn scalar_power(s: Scalar, n: i64) -> Result<Scalar, TowerError> {
    let mut base = if n < 0 {
        s.inverse().ok_or(TowerError::DivideByZero)?
    } else {
        s
    };
    let mut exp = n.unsigned_abs();
    let mut result = Scalar::one(s.kind());
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.mul(base);
        }
        exp >>= 1;
        if exp > 0 {
            base = base.mul(base);
        }
    }
    Ok(result)
}

/// `0 ** y`: one at `y = 0`, zero when `Re(y) > 0`, otherwise a division by zero.
fn zero_base(base: &Value, exponent: &Value) -> Result<Value, TowerError> {
    let ints = matches!((base, exponent), (Value::Int(_), Value::Int(_)));
    let kind = widest(base.kind(), exponent.kind());
    if exponent.is_zero() {
        return Ok(if ints { Value::Int(1) } else { Value::from_scalar(Scalar::one(kind)) });
    }
    let re = arithmetic::scalar(exponent)?.to_quaternion().re;
    if re > 0.0 {
        Ok(if ints { Value::Int(0) } else { Value::from_scalar(Scalar::zero(kind)) })
    } else {
        Err(TowerError::DivideByZero)
    }
}

fn scalar_pow(engine: &Engine, base: &Value, exponent: &Value) -> EvalResult<Value> {
    if base.is_zero() {
        return Ok(Outcome::Defined(zero_base(base, exponent)?));
    }
    let out = match (base, exponent) {
        (Value::Int(x), Value::Int(n)) if *n >= 0 => {
            let exact = u32::try_from(*n).ok().and_then(|e| x.checked_pow(e));
            match exact {
                Some(v) => Value::Int(v),
                None => Value::Real((*x as f64).powf(*n as f64)),
            }
        }
        (Value::Int(_) | Value::Real(_), Value::Int(_) | Value::Real(_)) => {
            let x = base.as_real().unwrap_or_default();
            let y = exponent.as_real().unwrap_or_default();
            if x < 0.0 && y.fract() != 0.0 {
                return generic(engine, base, exponent);
            }
            Value::Real(x.powf(y))
        }
        (Value::Complex(_) | Value::Quaternion(_), Value::Int(_)) => {
            match integral_exponent(engine, exponent) {
                Some(n) => Value::from_scalar(scalar_power(arithmetic::scalar(base)?, n)?),
                None => return generic(engine, base, exponent),
            }
        }
        _ => return generic(engine, base, exponent),
    };
    Ok(Outcome::Defined(out))
}

fn matrix_pow(engine: &Engine, m: &Matrix, exponent: &Value) -> EvalResult<Value> {
    match integral_exponent(engine, exponent) {
        Some(n) => Ok(matrix::matrix_power(engine, m, n)?.map(Value::Matrix)),
        None => generic(engine, &Value::Matrix(m.clone()), exponent),
    }
}

/// `s ** M = exp(M · log(s))`.
fn scalar_pow_matrix(engine: &Engine, s: &Value, m: &Matrix) -> EvalResult<Value> {
    let log = defined!(elementwise::analytic(engine, Function::Log, s));
    let product = defined!(arithmetic::mul(&Value::Matrix(m.clone()), &log));
    elementwise::analytic(engine, Function::Exp, &product)
}

pub(crate) fn pow(engine: &Engine, base: &Value, exponent: &Value) -> EvalResult<Value> {
    match (base, exponent) {
        (Value::Vector(_) | Value::List(_), _) | (_, Value::Vector(_) | Value::List(_)) => {
            Ok(Outcome::Undefined)
        }
        (Value::Matrix(m), e) if e.is_scalar() => matrix_pow(engine, m, e),
        (s, Value::Matrix(m)) if s.is_scalar() => scalar_pow_matrix(engine, s, m),
        (Value::Matrix(_), Value::Matrix(_)) => generic(engine, base, exponent),
        (x, y) if x.is_scalar() && y.is_scalar() => scalar_pow(engine, x, y),
        _ => Ok(Outcome::Undefined),
    }
}
