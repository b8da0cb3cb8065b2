//! First-class "no rule exists" channel.
//!
//! Every dispatch routine returns `Result<Outcome<T>, TowerError>`: the `Err` side carries
//! failed preconditions, while `Outcome::Undefined` reports that the operator or function
//! has no meaning for the operand kinds. The two are never folded into each other.

use crate::error::TowerError;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Defined(T),
    Undefined,
}

pub type EvalResult<T> = Result<Outcome<T>, TowerError>;

impl<T> Outcome<T> {
    pub fn is_defined(&self) -> bool {
        matches!(self, Outcome::Defined(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Outcome::Undefined)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Defined(v) => Outcome::Defined(f(v)),
            Outcome::Undefined => Outcome::Undefined,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Defined(v) => Some(v),
            Outcome::Undefined => None,
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Defined(v) => Outcome::Defined(v),
            Outcome::Undefined => Outcome::Undefined,
        }
    }

    /// Returns the defined value, panicking on `Undefined`. Intended for tests.
    #[track_caller]
    pub fn unwrap_defined(self) -> T {
        match self {
            Outcome::Defined(v) => v,
            Outcome::Undefined => panic!("called `Outcome::unwrap_defined` on `Undefined`"),
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Outcome::Defined(v),
            None => Outcome::Undefined,
        }
    }
}

/// Unwraps an `EvalResult`, propagating both errors and `Undefined` to the caller.
///
/// ```ignore
/// let product = defined!(mul(&a, &b));
/// ```
#[macro_export]
macro_rules! defined {
    ($expr:expr) => {
        match $expr? {
            $crate::Outcome::Defined(value) => value,
            $crate::Outcome::Undefined => return Ok($crate::Outcome::Undefined),
        }
    };
}
