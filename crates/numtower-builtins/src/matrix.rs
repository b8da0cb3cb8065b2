//! Row-major rectangular tables of a single scalar kind.

use num_complex::Complex64;

use crate::error::{Result, TowerError};
use crate::quaternion::Quaternion;
use crate::scalar::{widest, Scalar};
use crate::Kind;

/// Entry storage. One variant per entry kind keeps every matrix homogeneous.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
    Quaternion(Vec<Quaternion>),
}

impl MatrixData {
    pub fn len(&self) -> usize {
        match self {
            MatrixData::Real(d) => d.len(),
            MatrixData::Complex(d) => d.len(),
            MatrixData::Quaternion(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> Kind {
        match self {
            MatrixData::Real(_) => Kind::Real,
            MatrixData::Complex(_) => Kind::Complex,
            MatrixData::Quaternion(_) => Kind::Quaternion,
        }
    }

    fn get(&self, index: usize) -> Option<Scalar> {
        match self {
            MatrixData::Real(d) => d.get(index).map(|&x| Scalar::Real(x)),
            MatrixData::Complex(d) => d.get(index).map(|&z| Scalar::Complex(z)),
            MatrixData::Quaternion(d) => d.get(index).map(|&q| Scalar::Quaternion(q)),
        }
    }

    /// Build storage of exactly `kind`, promoting each entry.
    fn collect(kind: Kind, entries: impl IntoIterator<Item = Scalar>) -> MatrixData {
        let entries = entries.into_iter().map(|s| s.promote(kind));
        match kind {
            Kind::Quaternion => MatrixData::Quaternion(entries.map(Scalar::to_quaternion).collect()),
            Kind::Complex => MatrixData::Complex(
                entries
                    .map(|s| s.to_complex().unwrap_or_default())
                    .collect(),
            ),
            _ => MatrixData::Real(entries.map(|s| s.as_real().unwrap_or_default()).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: MatrixData,
}

impl Matrix {
    /// Construct from row-major entries, promoting all entries to the widest kind present.
    pub fn new(rows: usize, cols: usize, entries: Vec<Scalar>) -> Result<Self> {
        if entries.len() != rows * cols {
            return Err(TowerError::dimension_mismatch(
                "matrix",
                format!("{} entries", entries.len()),
                format!("{rows}x{cols}"),
            ));
        }
        let kind = entries
            .iter()
            .fold(Kind::Real, |acc, s| widest(acc, s.kind()));
        Ok(Matrix {
            rows,
            cols,
            data: MatrixData::collect(kind, entries),
        })
    }

    pub fn from_data(rows: usize, cols: usize, data: MatrixData) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(TowerError::dimension_mismatch(
                "matrix",
                format!("{} entries", data.len()),
                format!("{rows}x{cols}"),
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn from_real(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        Matrix::from_data(rows, cols, MatrixData::Real(data))
    }

    /// Construct from a list of rows; ragged input is a dimension mismatch.
    pub fn from_rows(rows: Vec<Vec<Scalar>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(TowerError::dimension_mismatch(
                "matrix row",
                format!("{} columns", bad.len()),
                format!("{ncols} columns"),
            ));
        }
        Matrix::new(nrows, ncols, rows.into_iter().flatten().collect())
    }

    /// Build a `rows × cols` matrix from `f(row, col)`, promoting to the widest kind produced.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Scalar) -> Self {
        let entries: Vec<Scalar> = (0..rows * cols).map(|idx| f(idx / cols, idx % cols)).collect();
        let kind = entries
            .iter()
            .fold(Kind::Real, |acc, s| widest(acc, s.kind()));
        Matrix {
            rows,
            cols,
            data: MatrixData::collect(kind, entries),
        }
    }

    pub fn identity(n: usize) -> Self {
        Matrix::scalar_identity(n, Scalar::Real(1.0))
    }

    /// `s·I` of size `n`, with entries of `s`'s kind.
    pub fn scalar_identity(n: usize, s: Scalar) -> Self {
        let zero = Scalar::zero(s.kind());
        let entries = (0..n * n)
            .map(|idx| if idx / n == idx % n { s } else { zero })
            .collect::<Vec<_>>();
        Matrix {
            rows: n,
            cols: n,
            data: MatrixData::collect(s.kind(), entries),
        }
    }

    pub fn zeros(rows: usize, cols: usize, kind: Kind) -> Self {
        Matrix {
            rows,
            cols,
            data: MatrixData::collect(kind, vec![Scalar::Real(0.0); rows * cols]),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major entry storage.
    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    pub fn entry_kind(&self) -> Kind {
        self.data.kind()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn shape_string(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Scalar> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// Row-major copy of the entries.
    pub fn entries(&self) -> Vec<Scalar> {
        (0..self.len()).filter_map(|idx| self.data.get(idx)).collect()
    }

    pub fn row(&self, row: usize) -> Vec<Scalar> {
        (0..self.cols).filter_map(|c| self.get(row, c)).collect()
    }

    /// Same matrix with entries lifted to `kind` (never demoted).
    pub fn promote(&self, kind: Kind) -> Matrix {
        let target = widest(self.entry_kind(), kind);
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: MatrixData::collect(target, self.entries()),
        }
    }

    /// Apply `f` entry-wise. The result kind is the widest kind `f` produced, and
    /// never narrower than the input's.
    pub fn map_entries(&self, f: impl Fn(Scalar) -> Scalar) -> Matrix {
        let mapped: Vec<Scalar> = self.entries().into_iter().map(f).collect();
        let kind = mapped
            .iter()
            .fold(self.entry_kind(), |acc, s| widest(acc, s.kind()));
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: MatrixData::collect(kind, mapped),
        }
    }

    /// Apply `f` to every real component, keeping the entry kind.
    pub fn map_components(&self, f: impl Fn(f64) -> f64) -> Matrix {
        let data = match &self.data {
            MatrixData::Real(d) => MatrixData::Real(d.iter().map(|&x| f(x)).collect()),
            MatrixData::Complex(d) => MatrixData::Complex(
                d.iter().map(|z| Complex64::new(f(z.re), f(z.im))).collect(),
            ),
            MatrixData::Quaternion(d) => MatrixData::Quaternion(d.iter().map(|q| q.map(&f)).collect()),
        };
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Real copy of a complex matrix whose imaginary parts are all within `eps`.
    pub fn demote_to_real(&self, eps: f64) -> Option<Matrix> {
        match &self.data {
            MatrixData::Complex(d) if d.iter().all(|z| z.im.abs() <= eps) => Some(Matrix {
                rows: self.rows,
                cols: self.cols,
                data: MatrixData::Real(d.iter().map(|z| z.re).collect()),
            }),
            _ => None,
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut entries = Vec::with_capacity(self.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                if let Some(s) = self.get(r, c) {
                    entries.push(s);
                }
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data: MatrixData::collect(self.entry_kind(), entries),
        }
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.entries()
            .iter()
            .map(|s| {
                let a = s.abs();
                a * a
            })
            .sum::<f64>()
            .sqrt()
    }

    pub fn trace(&self) -> Option<Scalar> {
        if !self.is_square() {
            return None;
        }
        let kind = self.entry_kind();
        Some(
            (0..self.rows)
                .filter_map(|i| self.get(i, i))
                .fold(Scalar::zero(kind), Scalar::add),
        )
    }
}
