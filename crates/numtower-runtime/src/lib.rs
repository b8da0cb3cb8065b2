//! Dispatch engine over the numeric tower.
//!
//! The four entry points take operator and function names as text, resolve them, and
//! evaluate with a default [`Engine`]. Hosts that need different tolerances or a specific
//! linear algebra provider build their own `Engine` and call its methods directly.
//!
//! Every routine returns `Result<Outcome<Value>, TowerError>`: `Outcome::Undefined` when
//! no rule exists for the operand kinds, `Err` when a rule exists but its precondition
//! fails.

use std::fmt;

use numtower_builtins::{EvalResult, NumberList, Outcome, TowerError, Value};
use numtower_linalg_api::LinalgProvider;
use tracing::debug;

pub mod builtins;
pub mod ops;
pub mod options;

mod arithmetic;
mod comparison;
mod matrix;
mod power;
mod unary;

pub use builtins::{Function, Statistic};
pub use ops::{BinaryOp, UnaryOp};
pub use options::EngineOptions;

#[derive(Clone, Copy, Default)]
pub struct Engine {
    options: EngineOptions,
    provider: Option<&'static dyn LinalgProvider>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("provider", &self.provider.map(|p| p.name()))
            .finish()
    }
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Engine {
            options,
            provider: None,
        }
    }

    /// Pin a provider instead of resolving the registered one on every call.
    pub fn with_provider(mut self, provider: &'static dyn LinalgProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Explicit provider, else the registered one, else the built-in nalgebra provider.
    pub(crate) fn linalg(&self) -> &'static dyn LinalgProvider {
        match self.provider.or_else(numtower_linalg_api::provider) {
            Some(p) => p,
            None => numtower_linalg::nalgebra_provider(),
        }
    }

    pub fn binary(&self, op: BinaryOp, a: &Value, b: &Value) -> EvalResult<Value> {
        let result = match op {
            BinaryOp::Add => self.add(a, b),
            BinaryOp::Sub => self.sub(a, b),
            BinaryOp::Mul => self.mul(a, b),
            BinaryOp::Div => self.div(a, b),
            BinaryOp::FloorDiv => self.floor_div(a, b),
            BinaryOp::Pow => self.pow(a, b),
            BinaryOp::Eq => Ok(Outcome::Defined(Value::Int(i64::from(self.equals(a, b))))),
        };
        if let Ok(Outcome::Undefined) = result {
            debug!(op = %op, left = %a.kind(), right = %b.kind(), "no rule for operand kinds");
        }
        result
    }

    pub fn unary(&self, op: UnaryOp, v: &Value) -> EvalResult<Value> {
        let result = unary::apply(self, op, v);
        if let Ok(Outcome::Undefined) = result {
            debug!(op = %op, kind = %v.kind(), "no rule for operand kind");
        }
        result
    }

    pub fn function(&self, f: Function, v: &Value, extra: Option<&Value>) -> EvalResult<Value> {
        builtins::math::evaluate(self, f, v, extra)
    }

    pub fn statistic(
        &self,
        stat: Statistic,
        list: &NumberList,
        extra: Option<&Value>,
    ) -> Result<Value, TowerError> {
        builtins::stats::statistic(self, stat, list, extra)
    }

    /// Tower equality within `equality_tolerance`; incompatible kinds are unequal.
    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        comparison::equals(self.options.equality_tolerance, a, b)
    }

    pub fn add(&self, a: &Value, b: &Value) -> EvalResult<Value> {
        arithmetic::add(a, b)
    }

    pub fn sub(&self, a: &Value, b: &Value) -> EvalResult<Value> {
        arithmetic::sub(a, b)
    }

    pub fn mul(&self, a: &Value, b: &Value) -> EvalResult<Value> {
        arithmetic::mul(a, b)
    }

    pub fn div(&self, a: &Value, b: &Value) -> EvalResult<Value> {
        arithmetic::div(self, a, b)
    }

    pub fn floor_div(&self, a: &Value, b: &Value) -> EvalResult<Value> {
        arithmetic::floor_div(self, a, b)
    }

    pub fn pow(&self, a: &Value, b: &Value) -> EvalResult<Value> {
        power::pow(self, a, b)
    }

    pub fn neg(&self, v: &Value) -> Result<Value, TowerError> {
        arithmetic::neg(v)
    }
}

/// `left op right` for `op` in `+ - * / // ** ==`. Equality yields `Int(1)` or `Int(0)`.
pub fn apply_binary_operator(op: &str, left: &Value, right: &Value) -> EvalResult<Value> {
    Engine::default().binary(op.parse()?, left, right)
}

/// `neg`, `conj`, `abs` or `normalize`.
pub fn apply_unary_operator(op: &str, value: &Value) -> EvalResult<Value> {
    Engine::default().unary(op.parse()?, value)
}

/// Named function with an optional second operand (a logarithm base, a root degree, the
/// other vector of a product).
pub fn apply_function(name: &str, value: &Value, extra: Option<&Value>) -> EvalResult<Value> {
    Engine::default().function(name.parse()?, value, extra)
}

pub fn collection_statistic(name: &str, values: &[Value]) -> Result<Value, TowerError> {
    collection_statistic_with(name, values, None)
}

/// Statistic with its extra operand (`percentileOf` value, `percentileIn` percent).
pub fn collection_statistic_with(
    name: &str,
    values: &[Value],
    extra: Option<&Value>,
) -> Result<Value, TowerError> {
    let stat: Statistic = name.parse()?;
    let list = NumberList::new(values.to_vec())?;
    Engine::default().statistic(stat, &list, extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(
            apply_binary_operator("%", &Value::Int(1), &Value::Int(2)),
            Err(TowerError::UnknownOperator("%".into()))
        );
        assert_eq!(
            apply_function("gamma", &Value::Int(1), None),
            Err(TowerError::UnknownFunction("gamma".into()))
        );
    }

    #[test]
    fn equality_is_int() {
        let r = apply_binary_operator("==", &Value::Int(3), &Value::Real(3.0)).unwrap();
        assert_eq!(r, Outcome::Defined(Value::Int(1)));
    }

    #[test]
    fn engine_debug_names_provider() {
        let engine = Engine::default().with_provider(numtower_linalg::nalgebra_provider());
        assert!(format!("{engine:?}").contains("nalgebra"));
    }
}
