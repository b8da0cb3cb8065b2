//! Analytic matrix functions on complex square matrices.

use nalgebra::linalg::Schur;
use nalgebra::DMatrix;
use num_complex::Complex64;
use numtower_linalg_api::{AnalyticFunction, LinalgError};

use crate::convert::one_norm;

type CMatrix = DMatrix<Complex64>;

const SCHUR_MAX_ITER: usize = 10_000;
const LOG_SQRT_LIMIT: usize = 64;
const LOG_SERIES_TERMS: usize = 60;

fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

pub(crate) fn evaluate(f: AnalyticFunction, a: &CMatrix) -> Result<CMatrix, LinalgError> {
    if a.nrows() == 0 {
        return Ok(a.clone());
    }
    match f {
        AnalyticFunction::Exp => Ok(expm(a)),
        AnalyticFunction::Log => logm(a),
        AnalyticFunction::Sqrt => sqrtm(a),
        AnalyticFunction::Sin => Ok(sinm(a)),
        AnalyticFunction::Cos => Ok(cosm(a)),
        AnalyticFunction::Tan => right_divide(&sinm(a), &cosm(a)),
        AnalyticFunction::Sinh => Ok(sinhm(a)),
        AnalyticFunction::Cosh => Ok(coshm(a)),
        AnalyticFunction::Tanh => right_divide(&sinhm(a), &coshm(a)),
    }
}

/// `num · den⁻¹`, for commuting `num` and `den`.
fn right_divide(num: &CMatrix, den: &CMatrix) -> Result<CMatrix, LinalgError> {
    den.clone()
        .lu()
        .solve(num)
        .filter(|x| x.iter().all(|z| z.re.is_finite() && z.im.is_finite()))
        .ok_or(LinalgError::Singular)
}

/// Padé scaling and squaring, as shipped by nalgebra.
pub(crate) fn expm(a: &CMatrix) -> CMatrix {
    a.exp()
}

/// Principal square root via the complex Schur form and the triangular recurrence.
pub(crate) fn sqrtm(a: &CMatrix) -> Result<CMatrix, LinalgError> {
    let n = a.nrows();
    let schur = Schur::try_new(a.clone(), f64::EPSILON, SCHUR_MAX_ITER)
        .ok_or_else(|| LinalgError::Numerical("Schur decomposition did not converge".into()))?;
    let (q, t) = schur.unpack();

    let mut r = CMatrix::zeros(n, n);
    for i in 0..n {
        r[(i, i)] = t[(i, i)].sqrt();
    }
    for j in 0..n {
        for i in (0..j).rev() {
            let mut sum = t[(i, j)];
            for k in (i + 1)..j {
                sum -= r[(i, k)] * r[(k, j)];
            }
            let denom = r[(i, i)] + r[(j, j)];
            if denom.norm() == 0.0 {
                if sum.norm() == 0.0 {
                    continue;
                }
                return Err(LinalgError::Numerical(
                    "matrix has no principal square root".into(),
                ));
            }
            r[(i, j)] = sum / denom;
        }
    }
    Ok(&q * r * q.adjoint())
}

/// Principal logarithm by inverse scaling and squaring: take square roots until the
/// matrix is close to the identity, sum `2·atanh((X-I)(X+I)⁻¹)`, then rescale.
pub(crate) fn logm(a: &CMatrix) -> Result<CMatrix, LinalgError> {
    let n = a.nrows();
    if crate::is_singular(a) {
        return Err(LinalgError::Singular);
    }
    let identity = CMatrix::identity(n, n);
    let mut x = a.clone();
    let mut roots = 0;
    while one_norm(&(&x - &identity)) > 0.25 {
        if roots == LOG_SQRT_LIMIT {
            return Err(LinalgError::Numerical(
                "logarithm: square roots did not approach the identity".into(),
            ));
        }
        x = sqrtm(&x)?;
        roots += 1;
    }

    let z = (&x + &identity)
        .lu()
        .solve(&(&x - &identity))
        .ok_or(LinalgError::Singular)?;
    let z2 = &z * &z;
    let mut power = z.clone();
    let mut sum = z;
    for m in 1..LOG_SERIES_TERMS {
        power = &power * &z2;
        let term = &power * c(1.0 / (2 * m + 1) as f64);
        let small = one_norm(&term) < 1e-18;
        sum += term;
        if small {
            break;
        }
    }
    Ok(sum * c(2.0 * 2f64.powi(roots as i32)))
}

fn exp_pair(a: &CMatrix) -> (CMatrix, CMatrix) {
    (expm(a), expm(&-a))
}

fn sinm(a: &CMatrix) -> CMatrix {
    let (p, m) = exp_pair(&(a * Complex64::i()));
    (p - m) * Complex64::new(0.0, -0.5)
}

fn cosm(a: &CMatrix) -> CMatrix {
    let (p, m) = exp_pair(&(a * Complex64::i()));
    (p + m) * c(0.5)
}

fn sinhm(a: &CMatrix) -> CMatrix {
    let (p, m) = exp_pair(a);
    (p - m) * c(0.5)
}

fn coshm(a: &CMatrix) -> CMatrix {
    let (p, m) = exp_pair(a);
    (p + m) * c(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &CMatrix, b: &CMatrix, tol: f64) -> bool {
        (a - b).iter().all(|z| z.norm() < tol)
    }

    fn diag(values: &[f64]) -> CMatrix {
        let n = values.len();
        CMatrix::from_fn(n, n, |r, col| if r == col { c(values[r]) } else { c(0.0) })
    }

    #[test]
    fn exp_of_diagonal() {
        let e = expm(&diag(&[1.0, -2.0, 0.0]));
        assert!(close(&e, &diag(&[1f64.exp(), (-2f64).exp(), 1.0]), 1e-12));
    }

    #[test]
    fn exp_of_nilpotent() {
        let a = CMatrix::from_row_slice(2, 2, &[c(0.0), c(3.0), c(0.0), c(0.0)]);
        let e = expm(&a);
        let expected = CMatrix::from_row_slice(2, 2, &[c(1.0), c(3.0), c(0.0), c(1.0)]);
        assert!(close(&e, &expected, 1e-12));
    }

    #[test]
    fn sqrt_squares_back() {
        let a = CMatrix::from_row_slice(2, 2, &[c(4.0), c(1.0), c(0.0), c(9.0)]);
        let s = sqrtm(&a).unwrap();
        assert!(close(&(&s * &s), &a, 1e-10));
    }

    #[test]
    fn log_inverts_exp() {
        let a = CMatrix::from_row_slice(2, 2, &[c(0.5), c(0.2), c(-0.1), c(0.3)]);
        let l = logm(&expm(&a)).unwrap();
        assert!(close(&l, &a, 1e-9));
    }

    #[test]
    fn log_of_singular_fails() {
        let a = CMatrix::from_row_slice(2, 2, &[c(1.0), c(2.0), c(2.0), c(4.0)]);
        assert_eq!(logm(&a).unwrap_err(), LinalgError::Singular);
    }

    #[test]
    fn exp_of_large_jordan_block() {
        let a = CMatrix::from_row_slice(2, 2, &[c(50.0), c(1.0), c(0.0), c(50.0)]);
        let e = expm(&a);
        let scale = 50f64.exp();
        let expected = CMatrix::from_row_slice(2, 2, &[c(scale), c(scale), c(0.0), c(scale)]);
        assert!(close(&(e / c(scale)), &(expected / c(scale)), 1e-10));
    }

    #[test]
    fn hyperbolic_identity() {
        let a = CMatrix::from_row_slice(2, 2, &[c(0.2), c(-0.6), c(0.5), c(0.1)]);
        let ch = coshm(&a);
        let sh = sinhm(&a);
        let diff = &ch * &ch - &sh * &sh;
        assert!(close(&diff, &CMatrix::identity(2, 2), 1e-10));
    }

    #[test]
    fn pythagorean_identity() {
        let a = CMatrix::from_row_slice(2, 2, &[c(0.3), c(1.0), c(-0.4), c(0.7)]);
        let s = sinm(&a);
        let co = cosm(&a);
        let sum = &s * &s + &co * &co;
        assert!(close(&sum, &CMatrix::identity(2, 2), 1e-10));
    }
}
