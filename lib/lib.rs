//! This package simulates small quantum circuits of qubits as dense complex
//! matrices over the full 2<sup><i>N</i></sup>-dimensional state space.
//!
//! - [`matrix`] provides the complex matrix algebra, including the tensor
//! product used to compose subsystems.
//! - [`gate`] describes single-register, multi-register, and controlled
//! gates, and their embedding into an *N*-register space; [`gates`] provides
//! the usual [gate set][gates-wiki].
//! - [`circuit`] schedules gates onto a register × step grid and folds the
//! grid into whole-circuit matrices and output states.
//! - [`render`] draws circuits and outcome distributions as plain text.
//!
//! Register *j* always corresponds to bit *j* of a computational basis index,
//! so register 0 is the least significant bit.
//!
//! No attempt is made at sparse or state-vector simulation: every gate is
//! expanded into a full 2<sup><i>N</i></sup> × 2<sup><i>N</i></sup> matrix,
//! which limits practical use to a handful of qubits.
//!
//! [gates-wiki]: https://en.wikipedia.org/wiki/Quantum_logic_gate
//!
//! # Further reading
//! - M. A. Nielsen and I. L. Chuang, *Quantum Computation and Quantum
//! Information*, ch. 4 (Cambridge University Press, 2010).
//!

pub mod matrix;
pub mod phase;
pub mod gate;
pub mod gates;
pub mod circuit;
pub mod state;
pub mod render;

pub use matrix::{ Matrix, MatrixError, MatrixResult };
pub use gate::{ Gate, GateError, GateId, GateKind, GateResult, Shape };
pub use circuit::{ Circuit, CircuitError, CircuitResult };
pub use phase::Phase;
pub use render::RenderConfig;

pub extern crate num_complex;
/// Handy macro to create `num_complex::Complex64`s from more natural and
/// succinct syntax.
///
/// ```
/// use std::f64::consts::PI;
/// use num_complex::Complex64;
/// use matcirc::c;
///
/// assert_eq!( c!(i (-1.0)),    Complex64::new(0.0, -1.0)      );
/// assert_eq!( c!(e PI),        Complex64::cis(PI)             );
/// assert_eq!( c!(1.0),         Complex64::new(1.0, 0.0)       );
/// assert_eq!( c!(1.0 + i 1.0), Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0 - i 1.0), Complex64::new(1.0, -1.0)      );
/// assert_eq!( c!(1.0 + 1.0 i), Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0 - 1.0 i), Complex64::new(1.0, -1.0)      );
/// assert_eq!( c!(1.0, 1.0),    Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0, e PI),   Complex64::from_polar(1.0, PI) );
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr )
        => { $crate::num_complex::Complex64::new(0.0, $im) };
    ( e $ph:expr )
        => { $crate::num_complex::Complex64::cis($ph) };
    ( $re:expr )
        => { $crate::num_complex::Complex64::new($re, 0.0) };
    ( $re:literal + i $im:literal )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - i $im:literal )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $re:literal + $im:literal i )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - $im:literal i )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $r:expr, e $ph:expr )
        => { $crate::num_complex::Complex64::from_polar($r, $ph) };
    ( $re:expr, $im:expr )
        => { $crate::num_complex::Complex64::new($re, $im) };
}
