//! Exact phases for parametric phase gates.
//!
//! A [`Phase`] is stored as a rational fraction of a full turn, so the angles
//! appearing in circuits like the quantum Fourier transform (π/2<sup>k</sup>)
//! are represented without rounding and get readable gate symbols.

use std::{ f64::consts::TAU, fmt };
use num_complex::Complex64 as C64;
use num_rational::Rational64 as R64;
use num_traits::{ ToPrimitive, Zero };

// reduce to the interval [0, 1)
fn turns(a: R64) -> R64 { a - a.floor() }

/// A real phase angle, reduced modulo 2π.
///
/// Internally this holds the rational *φ* such that the angle is 2π × *φ*.
///
/// ```
/// # use matcirc::phase::Phase;
/// assert_eq!( Phase::new(3, 4),     -Phase::new(1, 4) );
/// assert_eq!( Phase::pi4() * 2,      Phase::pi2()     );
/// assert_eq!( Phase::pi() / 4,       Phase::pi4()     );
/// assert_eq!( Phase::pi().to_string(), "π"            );
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Phase(R64);

impl Phase {
    /// Construct `(numer / denom) × 2π`.
    ///
    /// *Panics if `denom` is zero.*
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(turns(R64::new(numer, denom)))
    }

    /// Return 0 ≡ 2π.
    pub fn zero() -> Self { Self(R64::zero()) }

    /// Return π.
    pub fn pi() -> Self { Self::new(1, 2) }

    /// Return π/2.
    pub fn pi2() -> Self { Self::new(1, 4) }

    /// Return π/4.
    pub fn pi4() -> Self { Self::new(1, 8) }

    /// Return 2π/`n`.
    pub fn frac(n: i64) -> Self { Self::new(1, n) }

    /// Approximate an angle in radians, returning `None` for non-finite input
    /// or angles with no 64-bit rational approximation.
    pub fn from_radians(rad: f64) -> Option<Self> {
        R64::approximate_float(rad / TAU).map(|r| Self(turns(r)))
    }

    /// Return the angle in radians, in the interval [0, 2π).
    pub fn radians(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0) * TAU
    }

    /// Return the fraction of a full turn, in the interval [0, 1).
    pub fn turns(self) -> R64 { self.0 }

    /// Return *e*<sup>*iφ*</sup>.
    pub fn cis(self) -> C64 { C64::cis(self.radians()) }

    /// Return `true` if `self` is 0 modulo 2π.
    pub fn is_zero(self) -> bool { self.0.is_zero() }
}

impl From<Phase> for f64 {
    fn from(ph: Phase) -> Self { ph.radians() }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // work in units of π
        let half_turns = self.0 * 2;
        let (n, d) = (*half_turns.numer(), *half_turns.denom());
        match (n, d) {
            (0, _) => write!(f, "0"),
            (1, 1) => write!(f, "π"),
            (1, d) => write!(f, "π/{d}"),
            (n, 1) => write!(f, "{n}π"),
            (n, d) if d <= 1000 => write!(f, "({n}/{d})π"),
            _ => write!(f, "{:.4}", self.radians()),
        }
    }
}

impl std::ops::Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Self::Output { Self(turns(-self.0)) }
}

impl std::ops::Add for Phase {
    type Output = Phase;

    fn add(self, rhs: Phase) -> Self::Output { Self(turns(self.0 + rhs.0)) }
}

impl std::ops::Sub for Phase {
    type Output = Phase;

    fn sub(self, rhs: Phase) -> Self::Output { Self(turns(self.0 - rhs.0)) }
}

impl std::ops::Mul<i64> for Phase {
    type Output = Phase;

    fn mul(self, rhs: i64) -> Self::Output { Self(turns(self.0 * rhs)) }
}

impl std::ops::Div<i64> for Phase {
    type Output = Phase;

    /// *Panics if `rhs` is zero.*
    fn div(self, rhs: i64) -> Self::Output { Self(turns(self.0 / rhs)) }
}
