//! Default [`LinalgProvider`] backed by `nalgebra`.

use log::{debug, trace};
use nalgebra::DMatrix;
use num_complex::Complex64;
use numtower_builtins::{Matrix, MatrixData, Scalar};
use numtower_linalg_api::{AnalyticFunction, LinalgError, LinalgProvider};

mod convert;
mod functions;

pub use convert::IMAG_EPS;

/// Relative threshold of the singularity test `|det A| < EPS · max(1, ‖A‖_F)ⁿ`.
pub const SINGULAR_EPS: f64 = 1.0e-12;

#[derive(Debug, Default, Clone, Copy)]
pub struct NalgebraProvider;

impl NalgebraProvider {
    pub const fn new() -> Self {
        NalgebraProvider
    }
}

static INSTANCE: NalgebraProvider = NalgebraProvider::new();

/// The shared provider instance.
pub fn nalgebra_provider() -> &'static NalgebraProvider {
    &INSTANCE
}

/// Install the nalgebra provider as the process-wide default.
pub fn register_nalgebra_provider() {
    numtower_linalg_api::register_provider(nalgebra_provider());
}

fn ensure_square(m: &Matrix) -> Result<(), LinalgError> {
    if m.is_square() {
        Ok(())
    } else {
        Err(LinalgError::not_square(m))
    }
}

fn singular_threshold(frobenius: f64, n: usize) -> f64 {
    SINGULAR_EPS * frobenius.max(1.0).powi(n as i32)
}

pub(crate) fn is_singular(a: &DMatrix<Complex64>) -> bool {
    let det = a.clone().lu().determinant();
    !det.norm().is_finite() || det.norm() < singular_threshold(a.norm(), a.nrows())
}

fn is_singular_real(a: &DMatrix<f64>) -> bool {
    let det = a.clone().lu().determinant();
    !det.is_finite() || det.abs() < singular_threshold(a.norm(), a.nrows())
}

impl LinalgProvider for NalgebraProvider {
    fn name(&self) -> &str {
        "nalgebra"
    }

    fn determinant(&self, m: &Matrix) -> Result<Scalar, LinalgError> {
        ensure_square(m)?;
        trace!("determinant of {} {} matrix", m.shape_string(), m.entry_kind());
        if m.rows() == 0 {
            return Ok(Scalar::one(m.entry_kind()));
        }
        match m.data() {
            MatrixData::Real(_) => {
                let a = convert::real_dmatrix(m)
                    .ok_or_else(|| LinalgError::Numerical("real storage expected".into()))?;
                Ok(Scalar::Real(a.lu().determinant()))
            }
            MatrixData::Complex(_) => {
                let a = convert::complex_dmatrix(m);
                Ok(Scalar::Complex(a.lu().determinant()))
            }
            MatrixData::Quaternion(_) => Err(LinalgError::Unsupported(
                "determinant of a quaternion matrix".into(),
            )),
        }
    }

    fn inverse(&self, m: &Matrix) -> Result<Matrix, LinalgError> {
        ensure_square(m)?;
        trace!("inverse of {} {} matrix", m.shape_string(), m.entry_kind());
        if m.rows() == 0 {
            return Ok(m.clone());
        }
        if let Some(a) = convert::real_dmatrix(m) {
            if is_singular_real(&a) {
                debug!("inverse: real matrix is singular");
                return Err(LinalgError::Singular);
            }
            let inv = a.try_inverse().ok_or(LinalgError::Singular)?;
            return Ok(convert::from_real_dmatrix(&inv));
        }
        let a = convert::complex_dmatrix(m);
        if is_singular(&a) {
            debug!("inverse: {} matrix is singular", m.entry_kind());
            return Err(LinalgError::Singular);
        }
        let inv = a.try_inverse().ok_or(LinalgError::Singular)?;
        Ok(convert::from_complex_dmatrix(&inv, m.entry_kind()))
    }

    fn analytic(&self, f: AnalyticFunction, m: &Matrix) -> Result<Matrix, LinalgError> {
        ensure_square(m)?;
        trace!("{f} of {} {} matrix", m.shape_string(), m.entry_kind());
        let kind = m.entry_kind();
        let a = convert::complex_dmatrix(m);
        let out = functions::evaluate(f, &a)?;
        if out.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
            return Err(LinalgError::Numerical(format!("{f} produced non-finite entries")));
        }
        Ok(convert::from_complex_dmatrix(&out, kind))
    }
}
