//! `det`, `inv` and `transpose`. Scalars behave as 1x1 matrices.

use numtower_builtins::{defined, EvalResult, Outcome, Value};

use crate::{arithmetic, matrix, Engine};

pub(crate) fn det(engine: &Engine, v: &Value) -> EvalResult<Value> {
    match v {
        Value::Matrix(m) => {
            let d = defined!(matrix::determinant(engine, m));
            Ok(Outcome::Defined(Value::from_scalar(d)))
        }
        s if s.is_scalar() => Ok(Outcome::Defined(s.clone())),
        _ => Ok(Outcome::Undefined),
    }
}

pub(crate) fn inv(engine: &Engine, v: &Value) -> EvalResult<Value> {
    match v {
        Value::Matrix(m) => Ok(matrix::inverse(engine, m)?.map(Value::Matrix)),
        s if s.is_scalar() => arithmetic::div(engine, &Value::Int(1), s),
        _ => Ok(Outcome::Undefined),
    }
}

pub(crate) fn transpose(v: &Value) -> Outcome<Value> {
    match v {
        Value::Matrix(m) => Outcome::Defined(Value::Matrix(m.transpose())),
        s if s.is_scalar() => Outcome::Defined(s.clone()),
        _ => Outcome::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numtower_builtins::{Matrix, TowerError};

    #[test]
    fn scalars_are_one_by_one() {
        let engine = Engine::default();
        assert_eq!(det(&engine, &Value::Int(5)), Ok(Outcome::Defined(Value::Int(5))));
        assert_eq!(inv(&engine, &Value::Int(4)), Ok(Outcome::Defined(Value::Real(0.25))));
        assert_eq!(inv(&engine, &Value::Int(0)), Err(TowerError::DivideByZero));
    }

    #[test]
    fn matrix_determinant_and_inverse() {
        let engine = Engine::default();
        let m = Value::Matrix(Matrix::from_real(2, 2, vec![4.0, 7.0, 2.0, 6.0]).unwrap());
        let d = det(&engine, &m).unwrap().unwrap_defined();
        assert!((d.as_real().unwrap() - 10.0).abs() < 1e-9);
        let singular = Value::Matrix(Matrix::from_real(2, 2, vec![1.0, 2.0, 2.0, 4.0]).unwrap());
        assert_eq!(inv(&engine, &singular), Err(TowerError::Singular));
        let wide = Value::Matrix(Matrix::from_real(1, 2, vec![1.0, 2.0]).unwrap());
        assert_eq!(det(&engine, &wide), Err(TowerError::NotSquare { rows: 1, cols: 2 }));
    }

    #[test]
    fn transpose_swaps_shape() {
        let m = Value::Matrix(Matrix::from_real(1, 2, vec![1.0, 2.0]).unwrap());
        assert_eq!(
            transpose(&m),
            Outcome::Defined(Value::Matrix(Matrix::from_real(2, 1, vec![1.0, 2.0]).unwrap()))
        );
    }
}
