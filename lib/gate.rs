//! Gates and their embedding into the full state space of a register.
//!
//! Every gate owns a local unitary acting on a contiguous run of registers
//! (its *footprint*) starting at its *anchor*. [`Gate::embed`] expands this
//! unitary into the 2<sup><i>N</i></sup>-dimensional space of an
//! *N*-register circuit by tensoring it with 2 × 2 identities, using the
//! left-fold convention of [`perform_tensor_product`].
//!
//! Gate identity is tracked with a [`GateId`] assigned at construction. A
//! clone shares its original's identity, so a circuit will refuse to accept
//! both; use [`Gate::duplicate`] to get an independent copy.

use std::{
    fmt,
    ops::Range,
    sync::atomic::{ AtomicUsize, Ordering },
};
use ndarray as nd;
use num_complex::Complex64 as C64;
use thiserror::Error;
use crate::{
    c,
    matrix::{ Matrix, MatrixError, identity_matrix, perform_tensor_product },
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("invalid gate configuration: {0}")]
    InvalidGateConfiguration(String),

    #[error("gate at register {anchor} spanning {footprint} register(s) does not fit in a register of size {register_size}")]
    GateDoesNotFit { anchor: usize, footprint: usize, register_size: usize },

    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
}
pub type GateResult<T> = Result<T, GateError>;
use GateError::*;

static NEXT_GATE_ID: AtomicUsize = AtomicUsize::new(0);

/// Identity of a gate object, shared between a gate and its clones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(usize);

impl GateId {
    fn fresh() -> Self { Self(NEXT_GATE_ID.fetch_add(1, Ordering::Relaxed)) }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Placement discriminator used by the circuit scheduler.
///
/// Controlled gates report [`GateKind::Multi`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Occupies only its anchor register.
    Single,
    /// Spans one or more contiguous registers and claims a whole step.
    Multi,
}

/// The structural shape of a gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Acts on a single register.
    Single,
    /// Acts on `footprint` contiguous registers through an explicit unitary.
    Multi { footprint: usize },
    /// Applies a single-register unitary to `target` if and only if `control`
    /// is in ∣1⟩. The footprint runs from the lower to the higher of the two.
    Controlled { control: usize, target: usize },
}

impl Shape {
    /// Return the number of contiguous registers spanned.
    pub fn footprint(&self) -> usize {
        match *self {
            Self::Single => 1,
            Self::Multi { footprint } => footprint,
            Self::Controlled { control, target } => control.abs_diff(target) + 1,
        }
    }

    /// Return the placement discriminator.
    pub fn kind(&self) -> GateKind {
        match self {
            Self::Single => GateKind::Single,
            Self::Multi { .. } | Self::Controlled { .. } => GateKind::Multi,
        }
    }
}

/// A gate with a local unitary, anchored at a register.
#[derive(Clone, Debug)]
pub struct Gate {
    id: GateId,
    symbol: String,
    anchor: usize,
    matrix: Matrix,
    shape: Shape,
}

/// Symbol shown by identity gates and empty grid cells.
pub const IDENTITY_SYMBOL: &str = "I";

// ∣0⟩⟨0∣ and ∣1⟩⟨1∣
fn projector(bit: usize) -> Matrix {
    let mut p: nd::Array2<C64> = nd::Array2::zeros((2, 2));
    p[[bit, bit]] = c!(1.0);
    p.into()
}

impl Gate {
    /// Create a new single-register gate.
    ///
    /// Fails if `matrix` is not 2 × 2.
    pub fn single<S>(anchor: usize, symbol: S, matrix: Matrix)
        -> GateResult<Self>
    where S: Into<String>
    {
        if matrix.shape() != (2, 2) {
            return Err(InvalidGateConfiguration(format!(
                "single gate requires a 2x2 matrix, got {:?}", matrix.shape())));
        }
        Ok(Self::single_unchecked(anchor, symbol, matrix))
    }

    pub(crate) fn single_unchecked<S>(anchor: usize, symbol: S, matrix: Matrix)
        -> Self
    where S: Into<String>
    {
        Self {
            id: GateId::fresh(),
            symbol: symbol.into(),
            anchor,
            matrix,
            shape: Shape::Single,
        }
    }

    /// Create a new identity gate.
    pub fn identity(anchor: usize) -> Self {
        Self::single_unchecked(anchor, IDENTITY_SYMBOL, identity_matrix(2))
    }

    /// Create a new gate spanning `footprint` contiguous registers from
    /// `anchor`.
    ///
    /// Fails if `footprint` is zero or too large to address, `matrix` is not
    /// 2<sup>`footprint`</sup> × 2<sup>`footprint`</sup>, or `symbol` is
    /// [`IDENTITY_SYMBOL`].
    pub fn multi<S>(anchor: usize, symbol: S, matrix: Matrix, footprint: usize)
        -> GateResult<Self>
    where S: Into<String>
    {
        let symbol: String = symbol.into();
        if symbol == IDENTITY_SYMBOL {
            return Err(InvalidGateConfiguration(format!(
                "symbol {IDENTITY_SYMBOL:?} is reserved for identity placeholders")));
        }
        if footprint == 0 {
            return Err(InvalidGateConfiguration(
                "multi gate must span at least one register".to_string()));
        }
        let dim =
            u32::try_from(footprint).ok()
            .and_then(|s| 1_usize.checked_shl(s))
            .ok_or_else(|| InvalidGateConfiguration(format!(
                "gate size {footprint} is too large")))?;
        if matrix.shape() != (dim, dim) {
            return Err(InvalidGateConfiguration(format!(
                "matrix shape {:?} does not match gate size {}",
                matrix.shape(),
                footprint,
            )));
        }
        Ok(Self {
            id: GateId::fresh(),
            symbol,
            anchor,
            matrix,
            shape: Shape::Multi { footprint },
        })
    }

    /// Create a new controlled gate applying `target` only when register
    /// `control` is ∣1⟩.
    ///
    /// The local unitary spans every register between the control and the
    /// target, and is the sum of two block terms, each a left-folded tensor
    /// product over the footprint:
    ///
    /// <blockquote>
    ///   <p style="font-size:20px">
    ///     ... ⊗ ∣0⟩⟨0∣<sub><i>c</i></sub> ⊗ ... ⊗ <i>I</i><sub><i>t</i></sub> ⊗ ...
    ///     + ... ⊗ ∣1⟩⟨1∣<sub><i>c</i></sub> ⊗ ... ⊗ <i>U</i><sub><i>t</i></sub> ⊗ ...
    ///   </p>
    /// </blockquote>
    ///
    /// Fails if `target` is not a single-register gate, is an identity, or
    /// sits on `control`.
    pub fn controlled(target: &Gate, control: usize) -> GateResult<Self> {
        if target.shape != Shape::Single {
            return Err(InvalidGateConfiguration(
                "controlled gates require a single-register target".to_string()));
        }
        if target.is_identity() {
            return Err(InvalidGateConfiguration(
                "controlled gates require a non-identity target".to_string()));
        }
        let target_index = target.anchor;
        if control == target_index {
            return Err(InvalidGateConfiguration(format!(
                "control and target cannot both be register {control}")));
        }
        let shape = Shape::Controlled { control, target: target_index };
        let anchor = control.min(target_index);
        let footprint = shape.footprint();
        let rel_control = control - anchor;
        let rel_target = target_index - anchor;

        let mut off: Vec<Matrix> = vec![identity_matrix(2); footprint];
        off[rel_control] = projector(0);
        let mut on: Vec<Matrix> = vec![identity_matrix(2); footprint];
        on[rel_control] = projector(1);
        on[rel_target] = target.matrix.clone();
        let matrix =
            perform_tensor_product(off)?
            .add(&perform_tensor_product(on)?)?;
        Ok(Self {
            id: GateId::fresh(),
            symbol: target.symbol.clone(),
            anchor,
            matrix,
            shape,
        })
    }

    /// Return a copy of `self` with a new identity.
    pub fn duplicate(&self) -> Self {
        Self { id: GateId::fresh(), ..self.clone() }
    }

    /// Return the conjugate transpose of `self` as a new gate with the same
    /// shape and a `*`-suffixed symbol.
    pub fn adjoint(&self) -> Self {
        Self {
            id: GateId::fresh(),
            symbol: format!("{}*", self.symbol),
            anchor: self.anchor,
            matrix: self.matrix.adjoint(),
            shape: self.shape,
        }
    }

    /// Return the identity of `self`.
    pub fn id(&self) -> GateId { self.id }

    /// Return the display symbol.
    pub fn symbol(&self) -> &str { &self.symbol }

    /// Return `true` if `self` displays as an identity.
    pub fn is_identity(&self) -> bool { self.symbol == IDENTITY_SYMBOL }

    /// Return the register where the footprint begins.
    pub fn anchor(&self) -> usize { self.anchor }

    /// Return the local unitary, of size
    /// 2<sup>`footprint`</sup> × 2<sup>`footprint`</sup>.
    pub fn local_matrix(&self) -> &Matrix { &self.matrix }

    /// Return the structural shape.
    pub fn shape(&self) -> Shape { self.shape }

    /// Return the placement discriminator.
    pub fn kind(&self) -> GateKind { self.shape.kind() }

    /// Return the number of contiguous registers spanned.
    pub fn footprint(&self) -> usize { self.shape.footprint() }

    /// Return the range of registers spanned.
    pub fn registers(&self) -> Range<usize> {
        self.anchor..self.anchor + self.footprint()
    }

    /// Return `true` if `register` lies within the footprint.
    pub fn covers(&self, register: usize) -> bool {
        self.registers().contains(&register)
    }

    /// Return the control register, if `self` is controlled.
    pub fn control_index(&self) -> Option<usize> {
        match self.shape {
            Shape::Controlled { control, .. } => Some(control),
            _ => None,
        }
    }

    /// Return the target register, if `self` is controlled.
    pub fn target_index(&self) -> Option<usize> {
        match self.shape {
            Shape::Controlled { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Return `true` if the footprint lies within a register of the given
    /// size.
    pub fn can_fit(&self, register_size: usize) -> bool {
        self.anchor + self.footprint() <= register_size
    }

    /// Return the local unitary expanded into the full space of a register of
    /// the given size.
    ///
    /// Single gates are tensored with one identity per other register;
    /// multi-register gates fill `register_size - footprint + 1` slots, since
    /// the internal structure of the footprint is already part of the local
    /// unitary.
    pub fn embed(&self, register_size: usize) -> GateResult<Matrix> {
        if !self.can_fit(register_size) {
            return Err(GateDoesNotFit {
                anchor: self.anchor,
                footprint: self.footprint(),
                register_size,
            });
        }
        let nslots = register_size - self.footprint() + 1;
        let mut slots: Vec<Matrix> = vec![identity_matrix(2); nslots];
        slots[self.anchor] = self.matrix.clone();
        Ok(perform_tensor_product(slots)?)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::Single => write!(f, "{}[{}]", self.symbol, self.anchor),
            Shape::Multi { footprint } =>
                write!(f, "{}[{}..{}]",
                    self.symbol, self.anchor, self.anchor + footprint),
            Shape::Controlled { control, target } =>
                write!(f, "C{}[{} -> {}]", self.symbol, control, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use super::*;

    fn x(k: usize) -> Gate {
        let m = Matrix::from(array![[c!(0.0), c!(1.0)], [c!(1.0), c!(0.0)]]);
        Gate::single(k, "X", m).unwrap()
    }

    fn h(k: usize) -> Gate {
        let r = std::f64::consts::FRAC_1_SQRT_2;
        let m = Matrix::from(array![[c!(r), c!(r)], [c!(r), c!(-r)]]);
        Gate::single(k, "H", m).unwrap()
    }

    fn basis(n: usize, k: usize) -> Matrix {
        let mut v = Matrix::zeros(1 << n, 1);
        v.set(k, 0, 1.0).unwrap();
        v
    }

    #[test]
    fn single_validation() {
        assert!(matches!(
            Gate::single(0, "bad", Matrix::zeros(4, 4)),
            Err(InvalidGateConfiguration(_)),
        ));
        let g = x(2);
        assert_eq!(g.kind(), GateKind::Single);
        assert_eq!(g.footprint(), 1);
        assert!(g.can_fit(3));
        assert!(!g.can_fit(2));
        assert_eq!(
            g.embed(2),
            Err(GateDoesNotFit { anchor: 2, footprint: 1, register_size: 2 }),
        );
    }

    #[test]
    fn multi_validation() {
        assert!(matches!(
            Gate::multi(0, "M", identity_matrix(4), 3),
            Err(InvalidGateConfiguration(_)),
        ));
        assert!(matches!(
            Gate::multi(0, "M", identity_matrix(1), 0),
            Err(InvalidGateConfiguration(_)),
        ));
        let m = Gate::multi(1, "M", identity_matrix(8), 3).unwrap();
        assert_eq!(m.kind(), GateKind::Multi);
        assert_eq!(m.registers(), 1..4);
        assert!(m.can_fit(4));
        assert!(!m.can_fit(3));
        assert_eq!(m.embed(5).unwrap(), identity_matrix(32));
    }

    #[test]
    fn single_embedding_places_anchor() {
        // X on register 1 of 3 flips bit 1 of the basis index
        let xm = x(1).embed(3).unwrap();
        for k in 0..8 {
            let out = xm.multiply(&basis(3, k)).unwrap();
            assert_eq!(out, basis(3, k ^ 0b010));
        }
    }

    #[test]
    fn embedding_is_unitary() {
        for n in 1..=4 {
            for k in 0..n {
                assert!(h(k).embed(n).unwrap().is_unitary());
                assert!(x(k).embed(n).unwrap().is_unitary());
                let y = Gate::single(k, "Y", Matrix::from(array![
                    [c!(0.0), c!(i (-1.0))],
                    [c!(i 1.0), c!(0.0)],
                ]))
                .unwrap();
                assert!(y.embed(n).unwrap().is_unitary());
            }
        }
    }

    #[test]
    fn controlled_x_matrix() {
        let cx = Gate::controlled(&x(1), 0).unwrap();
        assert_eq!(cx.kind(), GateKind::Multi);
        assert_eq!(cx.anchor(), 0);
        assert_eq!(cx.footprint(), 2);
        assert_eq!(cx.control_index(), Some(0));
        assert_eq!(cx.target_index(), Some(1));
        let expected = Matrix::from(array![
            [c!(1.0), c!(0.0), c!(0.0), c!(0.0)],
            [c!(0.0), c!(0.0), c!(0.0), c!(1.0)],
            [c!(0.0), c!(0.0), c!(1.0), c!(0.0)],
            [c!(0.0), c!(1.0), c!(0.0), c!(0.0)],
        ]);
        assert_eq!(cx.local_matrix(), &expected);

        let xc = Gate::controlled(&x(0), 1).unwrap();
        let expected = Matrix::from(array![
            [c!(1.0), c!(0.0), c!(0.0), c!(0.0)],
            [c!(0.0), c!(1.0), c!(0.0), c!(0.0)],
            [c!(0.0), c!(0.0), c!(0.0), c!(1.0)],
            [c!(0.0), c!(0.0), c!(1.0), c!(0.0)],
        ]);
        assert_eq!(xc.local_matrix(), &expected);
    }

    #[test]
    fn controlled_across_gap() {
        // control 0, target 2, register 1 untouched
        let cx = Gate::controlled(&x(2), 0).unwrap();
        assert_eq!(cx.footprint(), 3);
        assert!(cx.local_matrix().is_unitary());
        let full = cx.embed(4).unwrap();
        for k in 0..16 {
            let expected = if k & 1 == 1 { k ^ 0b100 } else { k };
            assert_eq!(full.multiply(&basis(4, k)).unwrap(), basis(4, expected));
        }
    }

    #[test]
    fn controlled_validation() {
        assert!(matches!(
            Gate::controlled(&x(1), 1),
            Err(InvalidGateConfiguration(_)),
        ));
        let cx = Gate::controlled(&x(1), 0).unwrap();
        assert!(matches!(
            Gate::controlled(&cx, 3),
            Err(InvalidGateConfiguration(_)),
        ));
        assert!(matches!(
            Gate::controlled(&Gate::identity(1), 0),
            Err(InvalidGateConfiguration(_)),
        ));
    }

    #[test]
    fn multi_size_limits() {
        // footprints past the width of usize cannot describe any matrix
        for footprint in [usize::BITS as usize, usize::BITS as usize + 1, usize::MAX] {
            assert!(matches!(
                Gate::multi(0, "M", Matrix::zeros(0, 0), footprint),
                Err(InvalidGateConfiguration(_)),
            ));
            assert!(matches!(
                Gate::multi(0, "M", Matrix::zeros(1, 1), footprint),
                Err(InvalidGateConfiguration(_)),
            ));
        }
        // the identity symbol marks empty cells
        assert!(matches!(
            Gate::multi(0, IDENTITY_SYMBOL, identity_matrix(4), 2),
            Err(InvalidGateConfiguration(_)),
        ));
    }

    #[test]
    fn identity_and_copies() {
        let g = h(0);
        assert_eq!(g.clone().id(), g.id());
        assert_ne!(g.duplicate().id(), g.id());
        let gd = g.adjoint();
        assert_eq!(gd.symbol(), "H*");
        assert_ne!(gd.id(), g.id());
        assert!(Gate::identity(3).is_identity());
        assert_eq!(Gate::identity(0).embed(2).unwrap(), identity_matrix(4));
        assert!(!g.is_identity());
    }
}
