//! Generic function table.
//!
//! Every function is keyed by name and operand kind. Lists are mapped element-wise here so
//! the per-family modules only see single values.

use std::fmt;
use std::str::FromStr;

use numtower_builtins::{defined, EvalResult, NumberList, Outcome, TowerError, Value};
use numtower_linalg_api::AnalyticFunction;
use tracing::{debug, trace};

use crate::Engine;

pub mod complex;
pub mod elementwise;
pub mod linalg;
pub mod rounding;
pub mod trigonometry;
pub mod vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Exp,
    Log,
    Log10,
    Log2,
    Sqrt,
    Cbrt,
    Root,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Asin,
    Acos,
    Atan,
    Asinh,
    Acosh,
    Atanh,
    Signum,
    Ceil,
    Floor,
    Round,
    Real,
    Imag,
    Arg,
    Dot,
    Cross,
    Angle,
    Det,
    Inv,
    Transpose,
}

/// Whether a function takes a second operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    /// Second operand optional (`log(x, base)`).
    OptionalExtra,
    Binary,
}

impl Function {
    pub const ALL: [Function; 32] = [
        Function::Exp,
        Function::Log,
        Function::Log10,
        Function::Log2,
        Function::Sqrt,
        Function::Cbrt,
        Function::Root,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Asinh,
        Function::Acosh,
        Function::Atanh,
        Function::Signum,
        Function::Ceil,
        Function::Floor,
        Function::Round,
        Function::Real,
        Function::Imag,
        Function::Arg,
        Function::Dot,
        Function::Cross,
        Function::Angle,
        Function::Det,
        Function::Inv,
        Function::Transpose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Log2 => "log2",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Root => "root",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Asinh => "asinh",
            Function::Acosh => "acosh",
            Function::Atanh => "atanh",
            Function::Signum => "signum",
            Function::Ceil => "ceil",
            Function::Floor => "floor",
            Function::Round => "round",
            Function::Real => "real",
            Function::Imag => "imag",
            Function::Arg => "arg",
            Function::Dot => "dot",
            Function::Cross => "cross",
            Function::Angle => "angle",
            Function::Det => "det",
            Function::Inv => "inv",
            Function::Transpose => "transpose",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Function::Log => Arity::OptionalExtra,
            Function::Root | Function::Dot | Function::Cross | Function::Angle => Arity::Binary,
            _ => Arity::Unary,
        }
    }

    /// The matrix-function counterpart evaluated by the linear algebra provider.
    pub fn analytic(&self) -> Option<AnalyticFunction> {
        Some(match self {
            Function::Exp => AnalyticFunction::Exp,
            Function::Log => AnalyticFunction::Log,
            Function::Sqrt => AnalyticFunction::Sqrt,
            Function::Sin => AnalyticFunction::Sin,
            Function::Cos => AnalyticFunction::Cos,
            Function::Tan => AnalyticFunction::Tan,
            Function::Sinh => AnalyticFunction::Sinh,
            Function::Cosh => AnalyticFunction::Cosh,
            Function::Tanh => AnalyticFunction::Tanh,
            _ => return None,
        })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| TowerError::UnknownFunction(s.to_string()))
    }
}

fn check_arity(f: Function, extra: Option<&Value>) -> Result<(), TowerError> {
    match (f.arity(), extra) {
        (Arity::Unary, Some(_)) => Err(TowerError::domain(format!("{f} takes one operand"))),
        (Arity::Binary, None) => Err(TowerError::domain(format!("{f} requires a second operand"))),
        _ => Ok(()),
    }
}

pub(crate) fn evaluate(engine: &Engine, f: Function, value: &Value, extra: Option<&Value>) -> EvalResult<Value> {
    check_arity(f, extra)?;
    trace!(function = %f, kind = %value.kind(), "apply function");
    if let Value::List(list) = value {
        return map_list(engine, f, list, extra);
    }
    let result = match f {
        Function::Exp
        | Function::Sqrt
        | Function::Sin
        | Function::Cos
        | Function::Tan
        | Function::Sinh
        | Function::Cosh
        | Function::Tanh => elementwise::analytic(engine, f, value)?,
        Function::Log => match extra {
            Some(base) => elementwise::log_base(engine, value, base)?,
            None => elementwise::analytic(engine, f, value)?,
        },
        Function::Log10 => elementwise::log_fixed_base(engine, value, 10.0)?,
        Function::Log2 => elementwise::log_fixed_base(engine, value, 2.0)?,
        Function::Cbrt => elementwise::cbrt(engine, value)?,
        Function::Root => {
            let degree = extra.ok_or_else(|| TowerError::domain("root requires a degree"))?;
            elementwise::root(engine, value, degree)?
        }
        Function::Asin
        | Function::Acos
        | Function::Atan
        | Function::Asinh
        | Function::Acosh
        | Function::Atanh => trigonometry::inverse(f, value)?,
        Function::Signum => Outcome::Defined(complex::signum(value)),
        Function::Ceil => Outcome::Defined(rounding::ceil_value(value)?),
        Function::Floor => Outcome::Defined(rounding::floor_value(value)?),
        Function::Round => Outcome::Defined(rounding::round_value(value)?),
        Function::Real => complex::real_part(value),
        Function::Imag => complex::imag_part(value),
        Function::Arg => complex::arg(value),
        Function::Dot | Function::Cross | Function::Angle => {
            let other = extra.ok_or_else(|| TowerError::domain(format!("{f} requires a second operand")))?;
            vector::apply(f, value, other)?
        }
        Function::Det => linalg::det(engine, value)?,
        Function::Inv => linalg::inv(engine, value)?,
        Function::Transpose => linalg::transpose(value),
    };
    if result.is_undefined() {
        debug!(function = %f, kind = %value.kind(), "function undefined for operand kind");
    }
    Ok(result)
}

fn map_list(engine: &Engine, f: Function, list: &NumberList, extra: Option<&Value>) -> EvalResult<Value> {
    let mut mapped = Vec::with_capacity(list.len());
    for item in list {
        mapped.push(defined!(evaluate(engine, f, item, extra)));
    }
    Ok(Outcome::Defined(Value::List(NumberList::new(mapped)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for f in Function::ALL {
            assert_eq!(f.name().parse::<Function>().unwrap(), f);
        }
        assert_eq!(
            "gamma".parse::<Function>(),
            Err(TowerError::UnknownFunction("gamma".into()))
        );
    }

    #[test]
    fn arity_is_checked() {
        let engine = Engine::default();
        let err = evaluate(&engine, Function::Dot, &Value::Int(1), None).unwrap_err();
        assert!(matches!(err, TowerError::Domain(_)));
        let err = evaluate(&engine, Function::Exp, &Value::Int(1), Some(&Value::Int(2))).unwrap_err();
        assert!(matches!(err, TowerError::Domain(_)));
    }

    #[test]
    fn lists_map_element_wise() {
        let engine = Engine::default();
        let list = Value::List(NumberList::new(vec![Value::Real(1.4), Value::Real(-2.5)]).unwrap());
        let r = evaluate(&engine, Function::Round, &list, None).unwrap().unwrap_defined();
        assert_eq!(r.to_string(), "{1,-3}");
    }
}
