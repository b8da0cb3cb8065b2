//! Scalar carrier shared by scalar dispatch and matrix entries.
//!
//! The promotion lattice is `Real ⊂ Complex ⊂ Quaternion`. Binary helpers promote both
//! operands to the wider kind and keep that kind in the result.

use num_complex::Complex64;

use crate::quaternion::Quaternion;
use crate::Kind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Real(f64),
    Complex(Complex64),
    Quaternion(Quaternion),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Real(_) => Kind::Real,
            Scalar::Complex(_) => Kind::Complex,
            Scalar::Quaternion(_) => Kind::Quaternion,
        }
    }

    pub fn zero(kind: Kind) -> Scalar {
        Scalar::Real(0.0).promote(kind)
    }

    pub fn one(kind: Kind) -> Scalar {
        Scalar::Real(1.0).promote(kind)
    }

    /// Lift into `target` when it is wider; never demotes.
    pub fn promote(self, target: Kind) -> Scalar {
        let target_rank = target.scalar_rank().unwrap_or(0);
        if self.kind().scalar_rank().unwrap_or(0) >= target_rank {
            return self;
        }
        match (self, target) {
            (Scalar::Real(x), Kind::Complex) => Scalar::Complex(Complex64::new(x, 0.0)),
            (Scalar::Real(x), Kind::Quaternion) => Scalar::Quaternion(Quaternion::from_real(x)),
            (Scalar::Complex(z), Kind::Quaternion) => {
                Scalar::Quaternion(Quaternion::from_complex(z))
            }
            (other, _) => other,
        }
    }

    /// Promote both operands to their common kind.
    pub fn unify(a: Scalar, b: Scalar) -> (Scalar, Scalar) {
        let target = widest(a.kind(), b.kind());
        (a.promote(target), b.promote(target))
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Scalar::Real(x) => Some(*x),
            _ => None,
        }
    }

    pub fn to_quaternion(self) -> Quaternion {
        match self {
            Scalar::Real(x) => Quaternion::from_real(x),
            Scalar::Complex(z) => Quaternion::from_complex(z),
            Scalar::Quaternion(q) => q,
        }
    }

    pub fn to_complex(self) -> Option<Complex64> {
        match self {
            Scalar::Real(x) => Some(Complex64::new(x, 0.0)),
            Scalar::Complex(z) => Some(z),
            Scalar::Quaternion(q) => q.as_complex(),
        }
    }

    pub fn add(self, rhs: Scalar) -> Scalar {
        match Scalar::unify(self, rhs) {
            (Scalar::Real(a), Scalar::Real(b)) => Scalar::Real(a + b),
            (Scalar::Complex(a), Scalar::Complex(b)) => Scalar::Complex(a + b),
            (a, b) => Scalar::Quaternion(a.to_quaternion() + b.to_quaternion()),
        }
    }

    pub fn sub(self, rhs: Scalar) -> Scalar {
        self.add(rhs.neg())
    }

    /// Product in operand order; matters once either side is a quaternion.
    pub fn mul(self, rhs: Scalar) -> Scalar {
        match Scalar::unify(self, rhs) {
            (Scalar::Real(a), Scalar::Real(b)) => Scalar::Real(a * b),
            (Scalar::Complex(a), Scalar::Complex(b)) => Scalar::Complex(a * b),
            (a, b) => Scalar::Quaternion(a.to_quaternion() * b.to_quaternion()),
        }
    }

    pub fn neg(self) -> Scalar {
        match self {
            Scalar::Real(x) => Scalar::Real(-x),
            Scalar::Complex(z) => Scalar::Complex(-z),
            Scalar::Quaternion(q) => Scalar::Quaternion(-q),
        }
    }

    pub fn conj(self) -> Scalar {
        match self {
            Scalar::Real(x) => Scalar::Real(x),
            Scalar::Complex(z) => Scalar::Complex(z.conj()),
            Scalar::Quaternion(q) => Scalar::Quaternion(q.conj()),
        }
    }

    pub fn abs(&self) -> f64 {
        match self {
            Scalar::Real(x) => x.abs(),
            Scalar::Complex(z) => z.norm(),
            Scalar::Quaternion(q) => q.norm(),
        }
    }

    /// `|x|²` without the square root.
    pub fn abs_sqr(&self) -> f64 {
        match self {
            Scalar::Real(x) => x * x,
            Scalar::Complex(z) => z.norm_sqr(),
            Scalar::Quaternion(q) => q.norm_sqr(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Real(x) => *x == 0.0,
            Scalar::Complex(z) => z.re == 0.0 && z.im == 0.0,
            Scalar::Quaternion(q) => q.is_zero(),
        }
    }

    /// Multiplicative inverse, `None` at zero.
    pub fn inverse(self) -> Option<Scalar> {
        if self.is_zero() {
            return None;
        }
        match self {
            Scalar::Real(x) => Some(Scalar::Real(1.0 / x)),
            Scalar::Complex(z) => Some(Scalar::Complex(z.inv())),
            Scalar::Quaternion(q) => q.inverse().map(Scalar::Quaternion),
        }
    }

    /// Right division `self * rhs⁻¹`, `None` when `rhs` is zero.
    pub fn div(self, rhs: Scalar) -> Option<Scalar> {
        let target = widest(self.kind(), rhs.kind());
        let inv = rhs.inverse()?;
        Some(self.mul(inv).promote(target))
    }

    /// Apply `f` to every real component.
    pub fn map_components(self, f: impl Fn(f64) -> f64) -> Scalar {
        match self {
            Scalar::Real(x) => Scalar::Real(f(x)),
            Scalar::Complex(z) => Scalar::Complex(Complex64::new(f(z.re), f(z.im))),
            Scalar::Quaternion(q) => Scalar::Quaternion(q.map(f)),
        }
    }

    /// Component-wise comparison after promotion, scaled by the larger magnitude.
    pub fn approx_eq(&self, other: &Scalar, tolerance: f64) -> bool {
        let (a, b) = Scalar::unify(*self, *other);
        let diff = a.sub(b).abs();
        if diff == 0.0 {
            return true;
        }
        let scale = 1.0_f64.max(a.abs()).max(b.abs());
        diff <= tolerance * scale
    }
}

/// Wider of two scalar kinds. Non-scalar kinds rank below `Real`.
pub fn widest(a: Kind, b: Kind) -> Kind {
    let ra = a.scalar_rank().unwrap_or(0);
    let rb = b.scalar_rank().unwrap_or(0);
    let rank = ra.max(rb);
    match rank {
        3 => Kind::Quaternion,
        2 => Kind::Complex,
        _ => Kind::Real,
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Real(x)
    }
}

impl From<Complex64> for Scalar {
    fn from(z: Complex64) -> Self {
        Scalar::Complex(z)
    }
}

impl From<Quaternion> for Scalar {
    fn from(q: Quaternion) -> Self {
        Scalar::Quaternion(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_keeps_wider_kind() {
        let sum = Scalar::Complex(Complex64::new(3.0, -2.0)).add(Scalar::Quaternion(Quaternion::ONE));
        assert_eq!(sum, Scalar::Quaternion(Quaternion::new(4.0, -2.0, 0.0, 0.0)));
        assert_eq!(Scalar::Real(2.0).promote(Kind::Complex).kind(), Kind::Complex);
        assert_eq!(Scalar::Quaternion(Quaternion::ONE).promote(Kind::Real).kind(), Kind::Quaternion);
    }

    #[test]
    fn division_by_zero_is_none() {
        assert!(Scalar::Real(1.0).div(Scalar::Real(0.0)).is_none());
        assert!(Scalar::Real(1.0).div(Scalar::Quaternion(Quaternion::ZERO)).is_none());
    }

    #[test]
    fn approx_eq_scales_with_magnitude() {
        let a = Scalar::Real(1e12);
        let b = Scalar::Real(1e12 + 1.0);
        assert!(a.approx_eq(&b, 1e-10));
        assert!(!Scalar::Real(1.0).approx_eq(&Scalar::Real(1.001), 1e-10));
        assert!(Scalar::Real(2.0).approx_eq(&Scalar::Complex(Complex64::new(2.0, 0.0)), 0.0));
    }
}
