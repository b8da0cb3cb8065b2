//! Seam between the numeric tower and the numerical linear algebra backend.
//!
//! The runtime only talks to [`LinalgProvider`]; a concrete backend registers itself once
//! with [`register_provider`], and tests can scope an override to the current thread with
//! [`ThreadProviderGuard`].

use std::cell::Cell;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use numtower_builtins::{Matrix, Scalar};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinalgError {
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("matrix is singular")]
    Singular,
    /// The backend has no routine for this input (e.g. an entry kind it cannot handle).
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("numerical failure: {0}")]
    Numerical(String),
}

impl LinalgError {
    pub fn not_square(m: &Matrix) -> Self {
        LinalgError::NotSquare {
            rows: m.rows(),
            cols: m.cols(),
        }
    }
}

/// Matrix-valued generalisations of scalar analytic functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticFunction {
    Exp,
    Log,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
}

impl AnalyticFunction {
    pub const ALL: [AnalyticFunction; 9] = [
        AnalyticFunction::Exp,
        AnalyticFunction::Log,
        AnalyticFunction::Sqrt,
        AnalyticFunction::Sin,
        AnalyticFunction::Cos,
        AnalyticFunction::Tan,
        AnalyticFunction::Sinh,
        AnalyticFunction::Cosh,
        AnalyticFunction::Tanh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnalyticFunction::Exp => "exp",
            AnalyticFunction::Log => "log",
            AnalyticFunction::Sqrt => "sqrt",
            AnalyticFunction::Sin => "sin",
            AnalyticFunction::Cos => "cos",
            AnalyticFunction::Tan => "tan",
            AnalyticFunction::Sinh => "sinh",
            AnalyticFunction::Cosh => "cosh",
            AnalyticFunction::Tanh => "tanh",
        }
    }
}

impl fmt::Display for AnalyticFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalyticFunction {
    type Err = LinalgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalyticFunction::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| LinalgError::Unsupported(format!("analytic function `{s}`")))
    }
}

pub trait LinalgProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Determinant of a square matrix. The empty matrix has determinant 1.
    fn determinant(&self, m: &Matrix) -> Result<Scalar, LinalgError>;

    /// Inverse of a square, non-singular matrix, with the input's entry kind.
    fn inverse(&self, m: &Matrix) -> Result<Matrix, LinalgError>;

    fn analytic(&self, f: AnalyticFunction, m: &Matrix) -> Result<Matrix, LinalgError>;
}

static GLOBAL_PROVIDER: Lazy<RwLock<Option<&'static dyn LinalgProvider>>> =
    Lazy::new(|| RwLock::new(None));

thread_local! {
    static THREAD_PROVIDER: Cell<Option<&'static dyn LinalgProvider>> = Cell::new(None);
}

fn replace_thread_provider(
    provider: Option<&'static dyn LinalgProvider>,
) -> Option<&'static dyn LinalgProvider> {
    THREAD_PROVIDER.with(|cell| {
        let prev = cell.get();
        cell.set(provider);
        prev
    })
}

/// Register the process-wide provider, replacing any previous one.
pub fn register_provider(p: &'static dyn LinalgProvider) {
    if let Ok(mut guard) = GLOBAL_PROVIDER.write() {
        *guard = Some(p);
    }
}

/// The provider for the current thread: a scoped override if one is set, else the global one.
pub fn provider() -> Option<&'static dyn LinalgProvider> {
    if let Some(p) = THREAD_PROVIDER.with(|cell| cell.get()) {
        return Some(p);
    }
    GLOBAL_PROVIDER
        .read()
        .ok()
        .and_then(|guard| guard.as_ref().copied())
}

/// Clear the globally registered provider. Intended for tests.
pub fn clear_provider() {
    if let Ok(mut guard) = GLOBAL_PROVIDER.write() {
        *guard = None;
    }
}

/// Restores the previous thread-scoped provider on drop.
pub struct ThreadProviderGuard {
    prev: Option<&'static dyn LinalgProvider>,
}

impl ThreadProviderGuard {
    pub fn set(provider: Option<&'static dyn LinalgProvider>) -> Self {
        let prev = replace_thread_provider(provider);
        ThreadProviderGuard { prev }
    }
}

impl Drop for ThreadProviderGuard {
    fn drop(&mut self) {
        let prev = self.prev.take();
        replace_thread_provider(prev);
    }
}
