//! Hamilton quaternions `re + i·i + j·j + k·k`.
//!
//! Multiplication is non-commutative; callers that need right division use
//! `a * b.inverse()` explicitly.

use std::ops::{Add, Mul, Neg, Sub};

use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quaternion {
    pub re: f64,
    pub i: f64,
    pub j: f64,
    pub k: f64,
}

impl Quaternion {
    pub const ZERO: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(re: f64, i: f64, j: f64, k: f64) -> Self {
        Quaternion { re, i, j, k }
    }

    pub const fn from_real(re: f64) -> Self {
        Quaternion::new(re, 0.0, 0.0, 0.0)
    }

    pub fn from_complex(z: Complex64) -> Self {
        Quaternion::new(z.re, z.im, 0.0, 0.0)
    }

    /// Rebuild a quaternion from a scalar part and an imaginary triple.
    pub fn from_parts(re: f64, v: [f64; 3]) -> Self {
        Quaternion::new(re, v[0], v[1], v[2])
    }

    pub fn vector_part(&self) -> [f64; 3] {
        [self.i, self.j, self.k]
    }

    /// Returns the complex value this quaternion embeds, if `j` and `k` vanish.
    pub fn as_complex(&self) -> Option<Complex64> {
        if self.j == 0.0 && self.k == 0.0 {
            Some(Complex64::new(self.re, self.i))
        } else {
            None
        }
    }

    pub fn norm_sqr(&self) -> f64 {
        self.re * self.re + self.i * self.i + self.j * self.j + self.k * self.k
    }

    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Euclidean length of the imaginary triple.
    pub fn vector_norm(&self) -> f64 {
        (self.i * self.i + self.j * self.j + self.k * self.k).sqrt()
    }

    pub fn conj(&self) -> Self {
        Quaternion::new(self.re, -self.i, -self.j, -self.k)
    }

    pub fn scale(&self, s: f64) -> Self {
        Quaternion::new(self.re * s, self.i * s, self.j * s, self.k * s)
    }

    /// Multiplicative inverse `conj(q) / |q|²`; `None` for the zero quaternion.
    pub fn inverse(&self) -> Option<Self> {
        let n2 = self.norm_sqr();
        if n2 == 0.0 {
            None
        } else {
            Some(self.conj().scale(1.0 / n2))
        }
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.i == 0.0 && self.j == 0.0 && self.k == 0.0
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Quaternion::new(f(self.re), f(self.i), f(self.j), f(self.k))
    }

    /// Unit axis of the imaginary part. The zero triple maps to the `i` axis so the
    /// result stays consistent with the complex embedding.
    pub fn unit_axis(&self) -> [f64; 3] {
        let r = self.vector_norm();
        if r == 0.0 {
            [1.0, 0.0, 0.0]
        } else {
            [self.i / r, self.j / r, self.k / r]
        }
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, rhs: Quaternion) -> Quaternion {
        Quaternion::new(
            self.re + rhs.re,
            self.i + rhs.i,
            self.j + rhs.j,
            self.k + rhs.k,
        )
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;

    fn sub(self, rhs: Quaternion) -> Quaternion {
        Quaternion::new(
            self.re - rhs.re,
            self.i - rhs.i,
            self.j - rhs.j,
            self.k - rhs.k,
        )
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion::new(-self.re, -self.i, -self.j, -self.k)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        let (a1, b1, c1, d1) = (self.re, self.i, self.j, self.k);
        let (a2, b2, c2, d2) = (rhs.re, rhs.i, rhs.j, rhs.k);
        Quaternion::new(
            a1 * a2 - b1 * b2 - c1 * c2 - d1 * d2,
            a1 * b2 + b1 * a2 + c1 * d2 - d1 * c2,
            a1 * c2 - b1 * d2 + c1 * a2 + d1 * b2,
            a1 * d2 + b1 * c2 - c1 * b2 + d1 * a2,
        )
    }
}

impl From<f64> for Quaternion {
    fn from(re: f64) -> Self {
        Quaternion::from_real(re)
    }
}

impl From<Complex64> for Quaternion {
    fn from(z: Complex64) -> Self {
        Quaternion::from_complex(z)
    }
}
