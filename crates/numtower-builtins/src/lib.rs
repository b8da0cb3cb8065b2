use std::convert::TryFrom;
use std::fmt;

pub use num_complex::Complex64;

mod error;
mod format;
mod list;
mod literal;
mod matrix;
mod outcome;
mod quaternion;
mod scalar;
mod vector;

pub use error::{Result, TowerError};
pub use format::format_real;
pub use list::NumberList;
pub use matrix::{Matrix, MatrixData};
pub use outcome::{EvalResult, Outcome};
pub use quaternion::Quaternion;
pub use scalar::{widest, Scalar};
pub use vector::Vector;

/// A value of the numeric tower.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Complex(Complex64),
    Quaternion(Quaternion),
    Vector(Vector),
    Matrix(Matrix),
    // Ordered collection of scalar values, used by statistics
    List(NumberList),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Real,
    Complex,
    Quaternion,
    Vector,
    Matrix,
    List,
}

impl Kind {
    /// Position on the scalar promotion lattice; `None` for non-scalar kinds.
    pub fn scalar_rank(&self) -> Option<u8> {
        match self {
            Kind::Int => Some(0),
            Kind::Real => Some(1),
            Kind::Complex => Some(2),
            Kind::Quaternion => Some(3),
            Kind::Vector | Kind::Matrix | Kind::List => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.scalar_rank().is_some()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Real => "real",
            Kind::Complex => "complex",
            Kind::Quaternion => "quaternion",
            Kind::Vector => "vector",
            Kind::Matrix => "matrix",
            Kind::List => "list",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Real(_) => Kind::Real,
            Value::Complex(_) => Kind::Complex,
            Value::Quaternion(_) => Kind::Quaternion,
            Value::Vector(_) => Kind::Vector,
            Value::Matrix(_) => Kind::Matrix,
            Value::List(_) => Kind::List,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    /// Scalar view of a tower scalar. `Int` is carried as `Real`.
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Int(i) => Some(Scalar::Real(*i as f64)),
            Value::Real(x) => Some(Scalar::Real(*x)),
            Value::Complex(z) => Some(Scalar::Complex(*z)),
            Value::Quaternion(q) => Some(Scalar::Quaternion(*q)),
            _ => None,
        }
    }

    pub fn from_scalar(s: Scalar) -> Value {
        match s {
            Scalar::Real(x) => Value::Real(x),
            Scalar::Complex(z) => Value::Complex(z),
            Scalar::Quaternion(q) => Value::Quaternion(q),
        }
    }

    /// Real value of an `Int` or `Real`.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Real(x) => Some(*x),
            _ => None,
        }
    }

    /// Euclidean norm for scalars and vectors, Frobenius norm for matrices.
    pub fn magnitude(&self) -> Outcome<f64> {
        match self {
            Value::Int(i) => Outcome::Defined((*i as f64).abs()),
            Value::Real(x) => Outcome::Defined(x.abs()),
            Value::Complex(z) => Outcome::Defined(z.norm()),
            Value::Quaternion(q) => Outcome::Defined(q.norm()),
            Value::Vector(v) => Outcome::Defined(v.magnitude()),
            Value::Matrix(m) => Outcome::Defined(m.frobenius_norm()),
            Value::List(_) => Outcome::Undefined,
        }
    }

    /// Negates every non-real component; element-wise on containers.
    pub fn conjugate(&self) -> Value {
        match self {
            Value::Int(_) | Value::Real(_) | Value::Vector(_) => self.clone(),
            Value::Complex(z) => Value::Complex(z.conj()),
            Value::Quaternion(q) => Value::Quaternion(q.conj()),
            Value::Matrix(m) => Value::Matrix(m.map_entries(Scalar::conj)),
            Value::List(list) => Value::List(list.map_values(|v| v.conjugate())),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Real(x) => *x == 0.0,
            Value::Complex(z) => z.re == 0.0 && z.im == 0.0,
            Value::Quaternion(q) => q.is_zero(),
            Value::Vector(v) => v.data.iter().all(|x| *x == 0.0),
            Value::Matrix(m) => m.entries().iter().all(Scalar::is_zero),
            Value::List(list) => list.iter().all(Value::is_zero),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<Complex64> for Value {
    fn from(z: Complex64) -> Self {
        Value::Complex(z)
    }
}

impl From<Quaternion> for Value {
    fn from(q: Quaternion) -> Self {
        Value::Quaternion(q)
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::from_scalar(s)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Value::Vector(v)
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Value::Matrix(m)
    }
}

impl From<NumberList> for Value {
    fn from(list: NumberList) -> Self {
        Value::List(list)
    }
}

impl TryFrom<&Value> for f64 {
    type Error = TowerError;

    fn try_from(v: &Value) -> Result<Self> {
        v.as_real()
            .ok_or_else(|| TowerError::domain(format!("expected a real value, got {}", v.kind())))
    }
}

impl TryFrom<&Value> for Scalar {
    type Error = TowerError;

    fn try_from(v: &Value) -> Result<Self> {
        v.to_scalar()
            .ok_or_else(|| TowerError::domain(format!("expected a scalar value, got {}", v.kind())))
    }
}
