use thiserror::Error;

/// A precondition failed for operands that are otherwise well-typed for the operation.
///
/// The absence of a rule for a kind pair is *not* an error; see [`crate::Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TowerError {
    #[error("dimension mismatch: {left} {op} {right}")]
    DimensionMismatch {
        op: String,
        left: String,
        right: String,
    },

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix is singular")]
    Singular,

    #[error("division by zero")]
    DivideByZero,

    #[error("domain error: {0}")]
    Domain(String),

    #[error("collection is empty")]
    EmptyCollection,

    #[error("need at least {needed} elements, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("elements have no total order")]
    Unorderable,

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("linear algebra provider: {0}")]
    Provider(String),

    #[error("invalid literal: {0}")]
    Parse(String),
}

impl TowerError {
    pub fn dimension_mismatch(
        op: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        TowerError::DimensionMismatch {
            op: op.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        TowerError::Domain(message.into())
    }

    /// Stable identifier in the `Namespace:Reason` form used by diagnostics.
    pub fn identifier(&self) -> &'static str {
        match self {
            TowerError::DimensionMismatch { .. } => "Numtower:DimensionMismatch",
            TowerError::NotSquare { .. } => "Numtower:NotSquare",
            TowerError::Singular => "Numtower:Singular",
            TowerError::DivideByZero => "Numtower:DivideByZero",
            TowerError::Domain(_) => "Numtower:DomainError",
            TowerError::EmptyCollection => "Numtower:EmptyCollection",
            TowerError::InsufficientData { .. } => "Numtower:InsufficientData",
            TowerError::Unorderable => "Numtower:Unorderable",
            TowerError::UnknownOperator(_) => "Numtower:UnknownOperator",
            TowerError::UnknownFunction(_) => "Numtower:UnknownFunction",
            TowerError::Provider(_) => "Numtower:Provider",
            TowerError::Parse(_) => "Numtower:Parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, TowerError>;
