//! Matrix operations for the dispatch engine.
//!
//! Shape rules live here; numerical work (determinant, inverse, analytic functions) goes
//! through the active linear algebra provider.

use numtower_builtins::{defined, EvalResult, Kind, Matrix, Outcome, Scalar, TowerError};
use numtower_linalg_api::{AnalyticFunction, LinalgError};
use tracing::{debug, trace};

use crate::Engine;

/// Map a provider result onto the tower's two failure channels.
pub(crate) fn linalg_outcome<T>(result: Result<T, LinalgError>) -> EvalResult<T> {
    match result {
        Ok(value) => Ok(Outcome::Defined(value)),
        Err(LinalgError::NotSquare { rows, cols }) => Err(TowerError::NotSquare { rows, cols }),
        Err(LinalgError::Singular) => Err(TowerError::Singular),
        Err(LinalgError::Unsupported(what)) => {
            debug!(%what, "provider has no rule");
            Ok(Outcome::Undefined)
        }
        Err(LinalgError::Numerical(msg)) => Err(TowerError::Provider(msg)),
    }
}

fn ensure_square(m: &Matrix) -> Result<(), TowerError> {
    if m.is_square() {
        Ok(())
    } else {
        Err(TowerError::NotSquare {
            rows: m.rows(),
            cols: m.cols(),
        })
    }
}

/// Entry-wise combination of two equally shaped matrices.
pub(crate) fn zip_entries(
    op: &str,
    a: &Matrix,
    b: &Matrix,
    f: impl Fn(Scalar, Scalar) -> Scalar,
) -> Result<Matrix, TowerError> {
    if a.shape() != b.shape() {
        return Err(TowerError::dimension_mismatch(op, a.shape_string(), b.shape_string()));
    }
    let entries = a
        .entries()
        .into_iter()
        .zip(b.entries())
        .map(|(x, y)| f(x, y))
        .collect();
    Matrix::new(a.rows(), a.cols(), entries)
}

/// Matrix product; entry products keep operand order so quaternion entries work.
pub(crate) fn matmul(a: &Matrix, b: &Matrix) -> Result<Matrix, TowerError> {
    if a.cols() != b.rows() {
        return Err(TowerError::dimension_mismatch("*", a.shape_string(), b.shape_string()));
    }
    let kind = numtower_builtins::widest(a.entry_kind(), b.entry_kind());
    let lhs = a.entries();
    let rhs = b.entries();
    let mut out = Vec::with_capacity(a.rows() * b.cols());
    for r in 0..a.rows() {
        for c in 0..b.cols() {
            let mut acc = Scalar::zero(kind);
            for k in 0..a.cols() {
                acc = acc.add(lhs[r * a.cols() + k].mul(rhs[k * b.cols() + c]));
            }
            out.push(acc);
        }
    }
    Matrix::new(a.rows(), b.cols(), out)
}

/// `s·I` sized to `m`, which must be square.
pub(crate) fn embed_scalar(s: Scalar, m: &Matrix) -> Result<Matrix, TowerError> {
    ensure_square(m)?;
    Ok(Matrix::scalar_identity(m.rows(), s))
}

pub(crate) fn inverse(engine: &Engine, m: &Matrix) -> EvalResult<Matrix> {
    let provider = engine.linalg();
    trace!(provider = provider.name(), shape = %m.shape_string(), "matrix inverse");
    linalg_outcome(provider.inverse(m))
}

pub(crate) fn determinant(engine: &Engine, m: &Matrix) -> EvalResult<Scalar> {
    let provider = engine.linalg();
    trace!(provider = provider.name(), shape = %m.shape_string(), "matrix determinant");
    linalg_outcome(provider.determinant(m))
}

/// Analytic matrix function with tiny components snapped to zero. A real input whose
/// result has no imaginary residue left comes back with real entries.
pub(crate) fn analytic(engine: &Engine, f: AnalyticFunction, m: &Matrix) -> EvalResult<Matrix> {
    let provider = engine.linalg();
    trace!(provider = provider.name(), function = %f, shape = %m.shape_string(), "analytic matrix function");
    let out = defined!(linalg_outcome(provider.analytic(f, m)));
    let snapped = snap_matrix(engine.options().zero_snap, &out);
    Ok(Outcome::Defined(demote_if_real(m.entry_kind(), snapped)))
}

pub(crate) fn snap_matrix(threshold: f64, m: &Matrix) -> Matrix {
    let limit = threshold * m.frobenius_norm();
    if limit == 0.0 {
        return m.clone();
    }
    m.map_components(|x| if x.abs() < limit { 0.0 } else { x })
}

fn demote_if_real(input: Kind, m: Matrix) -> Matrix {
    match input {
        Kind::Real => m.demote_to_real(0.0).unwrap_or(m),
        _ => m,
    }
}

/// `m ** n` by repeated squaring; negative exponents invert first.
pub(crate) fn matrix_power(engine: &Engine, m: &Matrix, n: i64) -> EvalResult<Matrix> {
    ensure_square(m)?;
    let mut base = if n < 0 {
        defined!(inverse(engine, m))
    } else {
        m.clone()
    };
    let mut exp = n.unsigned_abs();
    let mut result = Matrix::scalar_identity(m.rows(), Scalar::one(m.entry_kind()));
    while exp > 0 {
        if exp & 1 == 1 {
            result = matmul(&result, &base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = matmul(&base, &base)?;
        }
    }
    Ok(Outcome::Defined(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use numtower_builtins::MatrixData;

    fn real(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        Matrix::from_real(rows, cols, data.to_vec()).unwrap()
    }

    #[test]
    fn matmul_shape_law() {
        let a = real(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = real(3, 1, &[1.0, 0.0, -1.0]);
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.data(), &MatrixData::Real(vec![-2.0, -2.0]));
        assert!(matches!(matmul(&b, &b), Err(TowerError::DimensionMismatch { .. })));
    }

    #[test]
    fn power_by_squaring() {
        let engine = Engine::default();
        let m = real(2, 2, &[1.0, 1.0, 0.0, 1.0]);
        let p = matrix_power(&engine, &m, 5).unwrap().unwrap_defined();
        assert_eq!(p.data(), &MatrixData::Real(vec![1.0, 5.0, 0.0, 1.0]));
        let p = matrix_power(&engine, &m, 0).unwrap().unwrap_defined();
        assert_eq!(p, Matrix::identity(2));
        let p = matrix_power(&engine, &m, -2).unwrap().unwrap_defined();
        let expected = [1.0, -2.0, 0.0, 1.0];
        for (got, want) in p.entries().iter().zip(expected) {
            assert!(got.approx_eq(&Scalar::Real(want), 1e-12));
        }
    }

    #[test]
    fn unsupported_maps_to_undefined() {
        let r: EvalResult<()> = linalg_outcome(Err(LinalgError::Unsupported("x".into())));
        assert_eq!(r, Ok(Outcome::Undefined));
        let r: EvalResult<()> = linalg_outcome(Err(LinalgError::Numerical("boom".into())));
        assert_eq!(r, Err(TowerError::Provider("boom".into())));
    }
}
