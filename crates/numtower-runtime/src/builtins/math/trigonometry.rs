//! Inverse trigonometric and hyperbolic functions.
//!
//! Defined for Int, Real and Complex only. A real argument outside the real domain is
//! promoted and evaluated on the complex principal branch.

use num_complex::Complex64;
use numtower_builtins::{EvalResult, Outcome, TowerError, Value};

use super::Function;

fn singular_point(f: Function) -> TowerError {
    TowerError::domain(format!("{f} has a logarithmic singularity at this argument"))
}

/// `Some` when the real formula applies without leaving the real line.
fn real_branch(f: Function, x: f64) -> Option<f64> {
    match f {
        Function::Asin if (-1.0..=1.0).contains(&x) => Some(x.asin()),
        Function::Acos if (-1.0..=1.0).contains(&x) => Some(x.acos()),
        Function::Atan => Some(x.atan()),
        Function::Asinh => Some(x.asinh()),
        Function::Acosh if x >= 1.0 => Some(x.acosh()),
        Function::Atanh if x > -1.0 && x < 1.0 => Some(x.atanh()),
        _ if x.is_nan() => Some(f64::NAN),
        _ => None,
    }
}

fn complex_branch(f: Function, z: Complex64) -> Result<Complex64, TowerError> {
    let on = |re: f64, im: f64| z.re == re && z.im == im;
    Ok(match f {
        Function::Asin => z.asin(),
        Function::Acos => z.acos(),
        Function::Atan if on(0.0, 1.0) || on(0.0, -1.0) => return Err(singular_point(f)),
        Function::Atan => z.atan(),
        Function::Asinh => z.asinh(),
        Function::Acosh => z.acosh(),
        Function::Atanh if on(1.0, 0.0) || on(-1.0, 0.0) => return Err(singular_point(f)),
        Function::Atanh => z.atanh(),
        _ => return Err(TowerError::UnknownFunction(f.name().to_string())),
    })
}

pub(crate) fn inverse(f: Function, v: &Value) -> EvalResult<Value> {
    let out = match v {
        Value::Int(_) | Value::Real(_) => {
            let x = v.as_real().unwrap_or_default();
            match real_branch(f, x) {
                Some(r) => Value::Real(r),
                None => Value::Complex(complex_branch(f, Complex64::new(x, 0.0))?),
            }
        }
        Value::Complex(z) => Value::Complex(complex_branch(f, *z)?),
        Value::Quaternion(_) | Value::Vector(_) | Value::Matrix(_) | Value::List(_) => {
            return Ok(Outcome::Undefined)
        }
    };
    Ok(Outcome::Defined(out))
}
