//! Exponentials, logarithms and roots.
//!
//! Reals leave their domain by promotion rather than NaN: `log(-1)` and `sqrt(-4)` are
//! complex. Quaternions reuse the complex closed forms through their axis decomposition
//! `q = a + r·u`, and roots fall back to `exp(log(x)·k)`.

use num_complex::Complex64;
use numtower_builtins::{defined, EvalResult, Outcome, Quaternion, Scalar, TowerError, Value};
use numtower_linalg_api::AnalyticFunction;

use super::Function;
use crate::{arithmetic, matrix, power, Engine};

fn log_of_zero() -> TowerError {
    TowerError::domain("logarithm of zero")
}

/// Evaluate a holomorphic `f` with real Taylor coefficients at `q` by mapping
/// `a + r·u` to `a + r·i`, applying `f`, and mapping the result back onto `u`.
fn lift_quaternion(q: Quaternion, f: impl Fn(Complex64) -> Complex64) -> Quaternion {
    let axis = q.unit_axis();
    let w = f(Complex64::new(q.re, q.vector_norm()));
    Quaternion::from_parts(w.re, [w.im * axis[0], w.im * axis[1], w.im * axis[2]])
}

fn complex_log(z: Complex64) -> Result<Complex64, TowerError> {
    if z.re == 0.0 && z.im == 0.0 {
        return Err(log_of_zero());
    }
    Ok(z.ln())
}

fn quaternion_log(q: Quaternion) -> Result<Quaternion, TowerError> {
    if q.is_zero() {
        return Err(log_of_zero());
    }
    Ok(lift_quaternion(q, |z| z.ln()))
}

/// Principal logarithm; a negative real gives a complex result.
fn scalar_log(s: Scalar) -> Result<Scalar, TowerError> {
    match s {
        Scalar::Real(x) if x > 0.0 || x.is_nan() => Ok(Scalar::Real(x.ln())),
        Scalar::Real(x) if x == 0.0 => Err(log_of_zero()),
        Scalar::Real(x) => Ok(Scalar::Complex(Complex64::new((-x).ln(), std::f64::consts::PI))),
        Scalar::Complex(z) => complex_log(z).map(Scalar::Complex),
        Scalar::Quaternion(q) => quaternion_log(q).map(Scalar::Quaternion),
    }
}

/// Drop components below `threshold · |v|` from complex and quaternion results.
pub(crate) fn snap(threshold: f64, v: Value) -> Value {
    let limit = match v.magnitude() {
        Outcome::Defined(m) => threshold * m,
        Outcome::Undefined => return v,
    };
    if limit == 0.0 || !limit.is_finite() {
        return v;
    }
    let snap = |x: f64| if x.abs() < limit { 0.0 } else { x };
    match v {
        Value::Complex(z) => Value::Complex(Complex64::new(snap(z.re), snap(z.im))),
        Value::Quaternion(q) => Value::Quaternion(q.map(snap)),
        Value::Matrix(m) => Value::Matrix(matrix::snap_matrix(threshold, &m)),
        other => other,
    }
}

fn real_analytic(f: AnalyticFunction, x: f64) -> Result<Value, TowerError> {
    Ok(match f {
        AnalyticFunction::Exp => Value::Real(x.exp()),
        AnalyticFunction::Log => Value::from_scalar(scalar_log(Scalar::Real(x))?),
        AnalyticFunction::Sqrt if x < 0.0 => Value::Complex(Complex64::new(0.0, (-x).sqrt())),
        AnalyticFunction::Sqrt => Value::Real(x.sqrt()),
        AnalyticFunction::Sin => Value::Real(x.sin()),
        AnalyticFunction::Cos => Value::Real(x.cos()),
        AnalyticFunction::Tan => Value::Real(x.tan()),
        AnalyticFunction::Sinh => Value::Real(x.sinh()),
        AnalyticFunction::Cosh => Value::Real(x.cosh()),
        AnalyticFunction::Tanh => Value::Real(x.tanh()),
    })
}

fn complex_analytic(f: AnalyticFunction, z: Complex64) -> Complex64 {
    match f {
        AnalyticFunction::Exp => z.exp(),
        AnalyticFunction::Log => z.ln(),
        AnalyticFunction::Sqrt => z.sqrt(),
        AnalyticFunction::Sin => z.sin(),
        AnalyticFunction::Cos => z.cos(),
        AnalyticFunction::Tan => z.tan(),
        AnalyticFunction::Sinh => z.sinh(),
        AnalyticFunction::Cosh => z.cosh(),
        AnalyticFunction::Tanh => z.tanh(),
    }
}

fn quaternion_analytic(engine: &Engine, f: AnalyticFunction, q: Quaternion) -> EvalResult<Value> {
    let out = match f {
        AnalyticFunction::Log => quaternion_log(q)?,
        AnalyticFunction::Sqrt => {
            return power::pow(engine, &Value::Quaternion(q), &Value::Real(0.5));
        }
        _ => lift_quaternion(q, |z| complex_analytic(f, z)),
    };
    Ok(Outcome::Defined(Value::Quaternion(out)))
}

/// `exp, log, sqrt` and the direct trigonometric/hyperbolic family.
pub(crate) fn analytic(engine: &Engine, f: Function, v: &Value) -> EvalResult<Value> {
    let Some(af) = f.analytic() else {
        return Ok(Outcome::Undefined);
    };
    let out = match v {
        Value::Int(i) => real_analytic(af, *i as f64)?,
        Value::Real(x) => real_analytic(af, *x)?,
        Value::Complex(z) if af == AnalyticFunction::Log => Value::Complex(complex_log(*z)?),
        Value::Complex(z) => Value::Complex(complex_analytic(af, *z)),
        Value::Quaternion(q) => defined!(quaternion_analytic(engine, af, *q)),
        Value::Matrix(m) => Value::Matrix(defined!(matrix::analytic(engine, af, m))),
        Value::Vector(_) | Value::List(_) => return Ok(Outcome::Undefined),
    };
    Ok(Outcome::Defined(snap(engine.options().zero_snap, out)))
}

/// `log(x) / ln(base)` for a fixed real base.
pub(crate) fn log_fixed_base(engine: &Engine, v: &Value, base: f64) -> EvalResult<Value> {
    if let Some(x) = v.as_real() {
        if x > 0.0 {
            let r = if base == 10.0 { x.log10() } else { x.log2() };
            return Ok(Outcome::Defined(Value::Real(r)));
        }
    }
    let log = defined!(analytic(engine, Function::Log, v));
    let scaled = defined!(arithmetic::mul(&log, &Value::Real(1.0 / base.ln())));
    Ok(Outcome::Defined(snap(engine.options().zero_snap, scaled)))
}

/// `log(x, base) = log(x) / log(base)` as a right division.
pub(crate) fn log_base(engine: &Engine, v: &Value, base: &Value) -> EvalResult<Value> {
    let num = defined!(analytic(engine, Function::Log, v));
    let den = defined!(analytic(engine, Function::Log, base));
    arithmetic::div(engine, &num, &den)
}

pub(crate) fn cbrt(engine: &Engine, v: &Value) -> EvalResult<Value> {
    match v.as_real() {
        Some(x) => Ok(Outcome::Defined(Value::Real(x.cbrt()))),
        None => root(engine, v, &Value::Int(3)),
    }
}

/// `x ** (1/n)`. A negative real with an odd integral degree keeps the real root.
pub(crate) fn root(engine: &Engine, v: &Value, degree: &Value) -> EvalResult<Value> {
    if !degree.is_scalar() {
        return Ok(Outcome::Undefined);
    }
    if degree.is_zero() {
        return Err(TowerError::DivideByZero);
    }
    if let (Some(x), Some(n)) = (v.as_real(), degree.as_real()) {
        if x >= 0.0 {
            return Ok(Outcome::Defined(Value::Real(x.powf(1.0 / n))));
        }
        if n.fract() == 0.0 && (n as i64) % 2 != 0 {
            return Ok(Outcome::Defined(Value::Real(-(-x).powf(1.0 / n))));
        }
    }
    let exponent = defined!(arithmetic::div(engine, &Value::Int(1), degree));
    power::pow(engine, v, &exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(f: Function, v: Value) -> Value {
        analytic(&Engine::default(), f, &v).unwrap().unwrap_defined()
    }

    #[test]
    fn sqrt_of_negative_real_is_complex() {
        assert_eq!(eval(Function::Sqrt, Value::Real(-4.0)), Value::Complex(Complex64::new(0.0, 2.0)));
        assert_eq!(eval(Function::Sqrt, Value::Int(9)), Value::Real(3.0));
    }

    #[test]
    fn log_of_zero_is_domain_error() {
        let engine = Engine::default();
        for v in [Value::Int(0), Value::Complex(Complex64::new(0.0, 0.0)), Value::Quaternion(Quaternion::ZERO)] {
            let err = analytic(&engine, Function::Log, &v).unwrap_err();
            assert!(matches!(err, TowerError::Domain(_)), "{v}");
        }
    }

    #[test]
    fn euler_identity_snaps() {
        let z = eval(Function::Exp, Value::Complex(Complex64::new(0.0, std::f64::consts::PI)));
        assert_eq!(z, Value::Complex(Complex64::new(-1.0, 0.0)));
    }

    #[test]
    fn quaternion_exp_matches_closed_form() {
        let q = Quaternion::new(1.0, 0.0, 3.0, 4.0);
        let out = eval(Function::Exp, Value::Quaternion(q));
        let e = 1f64.exp();
        let expected = Quaternion::new(e * 5f64.cos(), 0.0, e * 5f64.sin() * 0.6, e * 5f64.sin() * 0.8);
        match out {
            Value::Quaternion(got) => assert!((got - expected).norm() < 1e-12),
            other => panic!("expected quaternion, got {other}"),
        }
    }

    #[test]
    fn quaternion_on_complex_plane_agrees_with_complex() {
        let z = Complex64::new(0.3, -1.2);
        for f in [Function::Sin, Function::Cosh, Function::Log, Function::Tan] {
            let c = eval(f, Value::Complex(z));
            let q = eval(f, Value::Quaternion(Quaternion::from_complex(z)));
            match (c, q) {
                (Value::Complex(c), Value::Quaternion(q)) => {
                    assert!((Quaternion::from_complex(c) - q).norm() < 1e-12, "{f}");
                }
                other => panic!("unexpected kinds {other:?}"),
            }
        }
    }

    #[test]
    fn odd_roots_of_negative_reals_stay_real() {
        let engine = Engine::default();
        let r = root(&engine, &Value::Real(-8.0), &Value::Int(3)).unwrap().unwrap_defined();
        assert!(matches!(r, Value::Real(x) if (x + 2.0).abs() < 1e-12), "{r}");
        assert_eq!(cbrt(&engine, &Value::Int(-27)).unwrap().unwrap_defined(), Value::Real(-3.0));
        assert_eq!(root(&engine, &Value::Int(4), &Value::Int(0)), Err(TowerError::DivideByZero));
    }

    #[test]
    fn log_with_base_one_divides_by_zero() {
        let engine = Engine::default();
        assert_eq!(
            log_base(&engine, &Value::Int(8), &Value::Int(1)),
            Err(TowerError::DivideByZero)
        );
        let r = log_base(&engine, &Value::Int(8), &Value::Int(2)).unwrap().unwrap_defined();
        assert!((r.as_real().unwrap() - 3.0).abs() < 1e-12);
    }
}
