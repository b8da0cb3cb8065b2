//! Conversions between tower matrices and nalgebra storage.
//!
//! Quaternion matrices are handled through their complex adjoint: writing
//! `Q = Z1 + Z2·j` with complex `Z1`, `Z2`, the `2n×2n` complex matrix
//! `[[Z1, Z2], [-conj(Z2), conj(Z1)]]` is multiplicative, so inverses and analytic
//! functions computed on it carry back to quaternion entries.

use nalgebra::DMatrix;
use num_complex::Complex64;
use numtower_builtins::{Kind, Matrix, MatrixData, Quaternion, Scalar};

/// Imaginary parts at or below this are dropped when a real input produced a complex result.
pub const IMAG_EPS: f64 = 1.0e-12;

pub(crate) fn real_dmatrix(m: &Matrix) -> Option<DMatrix<f64>> {
    match m.data() {
        MatrixData::Real(data) => Some(DMatrix::from_row_slice(m.rows(), m.cols(), data)),
        _ => None,
    }
}

/// Complex view of a real or complex matrix, or the complex adjoint of a quaternion one.
pub(crate) fn complex_dmatrix(m: &Matrix) -> DMatrix<Complex64> {
    let (rows, cols) = m.shape();
    match m.data() {
        MatrixData::Real(data) => {
            DMatrix::from_fn(rows, cols, |r, c| Complex64::new(data[r * cols + c], 0.0))
        }
        MatrixData::Complex(data) => DMatrix::from_row_slice(rows, cols, data),
        MatrixData::Quaternion(data) => complex_adjoint(rows, cols, data),
    }
}

fn complex_adjoint(rows: usize, cols: usize, data: &[Quaternion]) -> DMatrix<Complex64> {
    let mut out = DMatrix::<Complex64>::zeros(2 * rows, 2 * cols);
    for r in 0..rows {
        for c in 0..cols {
            let q = data[r * cols + c];
            let z1 = Complex64::new(q.re, q.i);
            let z2 = Complex64::new(q.j, q.k);
            out[(r, c)] = z1;
            out[(r, c + cols)] = z2;
            out[(r + rows, c)] = -z2.conj();
            out[(r + rows, c + cols)] = z1.conj();
        }
    }
    out
}

fn quaternion_from_adjoint(m: &DMatrix<Complex64>) -> Matrix {
    let rows = m.nrows() / 2;
    let cols = m.ncols() / 2;
    Matrix::from_fn(rows, cols, |r, c| {
        let z1 = m[(r, c)];
        let z2 = m[(r, c + cols)];
        Scalar::Quaternion(Quaternion::new(z1.re, z1.im, z2.re, z2.im))
    })
}

pub(crate) fn from_real_dmatrix(m: &DMatrix<f64>) -> Matrix {
    Matrix::from_fn(m.nrows(), m.ncols(), |r, c| Scalar::Real(m[(r, c)]))
}

/// Convert a complex result back to the entry kind of the input it was computed from.
pub(crate) fn from_complex_dmatrix(m: &DMatrix<Complex64>, input_kind: Kind) -> Matrix {
    if input_kind == Kind::Quaternion {
        return quaternion_from_adjoint(m);
    }
    let out = Matrix::from_fn(m.nrows(), m.ncols(), |r, c| Scalar::Complex(m[(r, c)]));
    if input_kind == Kind::Real {
        if let Some(real) = out.demote_to_real(IMAG_EPS) {
            return real;
        }
    }
    out
}

/// Maximum absolute column sum.
pub(crate) fn one_norm(m: &DMatrix<Complex64>) -> f64 {
    m.column_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}
