//! Standard gate library.
//!
//! Single-register gates are returned directly. Gates that span several
//! registers are returned as `Result`s, since their placement can be
//! inconsistent. [`swap`] and [`toffoli`] are assembled from smaller gates on
//! a scratch [`Circuit`] and collapsed into a single multi-register gate with
//! [`from_circuit`].

use std::f64::consts::FRAC_1_SQRT_2;
use ndarray::array;
use crate::{
    c,
    circuit::{ Circuit, CircuitResult },
    gate::{ Gate, GateError, GateResult },
    matrix::Matrix,
    phase::Phase,
};

fn fixed(k: usize, symbol: &str, matrix: Matrix) -> Gate {
    Gate::single_unchecked(k, symbol, matrix)
}

/// Identity.
pub fn i(k: usize) -> Gate { Gate::identity(k) }

/// Hadamard.
pub fn h(k: usize) -> Gate {
    let r = FRAC_1_SQRT_2;
    fixed(k, "H", array![[c!(r), c!(r)], [c!(r), c!(-r)]].into())
}

/// Pauli X.
pub fn x(k: usize) -> Gate {
    fixed(k, "X", array![[c!(0.0), c!(1.0)], [c!(1.0), c!(0.0)]].into())
}

/// Pauli Y.
pub fn y(k: usize) -> Gate {
    fixed(k, "Y", array![[c!(0.0), c!(i (-1.0))], [c!(i 1.0), c!(0.0)]].into())
}

/// Pauli Z.
pub fn z(k: usize) -> Gate {
    fixed(k, "Z", array![[c!(1.0), c!(0.0)], [c!(0.0), c!(-1.0)]].into())
}

/// Phase gate, diag(1, *i*).
pub fn s(k: usize) -> Gate {
    fixed(k, "S", array![[c!(1.0), c!(0.0)], [c!(0.0), c!(i 1.0)]].into())
}

/// π/8 gate, diag(1, *e*<sup>*i*π/4</sup>).
pub fn t(k: usize) -> Gate {
    let ph = Phase::pi4().cis();
    fixed(k, "T", array![[c!(1.0), c!(0.0)], [c!(0.0), ph]].into())
}

/// General phase shift, diag(1, *e*<sup>*iφ*</sup>).
pub fn p(k: usize, ph: Phase) -> Gate {
    fixed(
        k,
        &format!("P({ph})"),
        array![[c!(1.0), c!(0.0)], [c!(0.0), ph.cis()]].into(),
    )
}

/// Conjugate transpose of `gate`, as a new gate.
pub fn adjoint(gate: &Gate) -> Gate { gate.adjoint() }

/// Apply `target` conditioned on register `control`.
pub fn controlled(target: &Gate, control: usize) -> GateResult<Gate> {
    Gate::controlled(target, control)
}

/// Controlled X (CNOT).
pub fn cx(control: usize, target: usize) -> GateResult<Gate> {
    Gate::controlled(&x(target), control)
}

/// Controlled Z.
pub fn cz(control: usize, target: usize) -> GateResult<Gate> {
    Gate::controlled(&z(target), control)
}

/// Controlled phase shift.
pub fn cp(control: usize, target: usize, ph: Phase) -> GateResult<Gate> {
    Gate::controlled(&p(target, ph), control)
}

/// Collapse a whole circuit into a single gate spanning
/// `circuit.register_size()` registers from `anchor`.
pub fn from_circuit<S>(circuit: &Circuit, anchor: usize, symbol: S)
    -> CircuitResult<Gate>
where S: Into<String>
{
    let matrix = circuit.get_matrix()?;
    Ok(Gate::multi(anchor, symbol, matrix, circuit.register_size())?)
}

// scratch circuit over the span of `registers`, returning it with the anchor
fn scratch(registers: &[usize]) -> CircuitResult<(Circuit, usize)> {
    let lo = registers.iter().copied().min().unwrap_or(0);
    let hi = registers.iter().copied().max().unwrap_or(0);
    Ok((Circuit::new(hi - lo + 1)?, lo))
}

/// Exchange registers `a` and `b`, built from three CNOTs.
pub fn swap(a: usize, b: usize) -> CircuitResult<Gate> {
    if a == b {
        return Err(GateError::InvalidGateConfiguration(format!(
            "cannot swap register {a} with itself")).into());
    }
    let (lo, hi) = (a.min(b), a.max(b));
    let (mut sub, anchor) = scratch(&[lo, hi])?;
    let (ra, rb) = (lo - anchor, hi - anchor);
    sub.add_component(cx(ra, rb)?)?;
    sub.add_component(cx(rb, ra)?)?;
    sub.add_component(cx(ra, rb)?)?;
    from_circuit(&sub, anchor, format!("{lo} <-> {hi}"))
}

/// Toffoli (controlled-controlled X) on `target`, built from CNOTs and
/// single-register gates.
pub fn toffoli(target: usize, c1: usize, c2: usize) -> CircuitResult<Gate> {
    if target == c1 || target == c2 || c1 == c2 {
        return Err(GateError::InvalidGateConfiguration(format!(
            "toffoli registers must be distinct, got target {target} \
            and controls {c1}, {c2}")).into());
    }
    let (mut sub, anchor) = scratch(&[target, c1, c2])?;
    let (tg, a, b) = (target - anchor, c1 - anchor, c2 - anchor);
    let seq: Vec<Gate> = vec![
        h(tg),
        cx(b, tg)?,
        t(tg).adjoint(),
        cx(a, tg)?,
        t(tg),
        cx(b, tg)?,
        t(tg).adjoint(),
        cx(a, tg)?,
        t(b),
        t(tg),
        h(tg),
        cx(a, b)?,
        t(a),
        t(b).adjoint(),
        cx(a, b)?,
    ];
    for gate in seq.into_iter() {
        sub.add_component(gate)?;
    }
    from_circuit(&sub, anchor, format!("q{c1}q{c2}(+)q{target}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ matrix::identity_matrix, state };

    #[test]
    fn single_gates_are_unitary() {
        for gate in [i(0), h(0), x(0), y(0), z(0), s(0), t(0), p(0, Phase::pi() / 3)] {
            assert!(gate.local_matrix().is_unitary(), "{gate}");
        }
    }

    #[test]
    fn algebra() {
        let m = |g: Gate| g.local_matrix().clone();
        assert_eq!(m(h(0)).multiply(&m(h(0))).unwrap(), identity_matrix(2));
        assert_eq!(m(t(0)).multiply(&m(t(0))).unwrap(), m(s(0)));
        assert_eq!(m(s(0)).multiply(&m(s(0))).unwrap(), m(z(0)));
        assert_eq!(m(p(0, Phase::pi4())), m(t(0)));
        assert_eq!(m(t(0).adjoint()).multiply(&m(t(0))).unwrap(), identity_matrix(2));
        // XY = iZ
        assert_eq!(
            m(x(0)).multiply(&m(y(0))).unwrap(),
            m(z(0)).scale(c!(i 1.0)),
        );
        assert_eq!(p(0, Phase::pi2()).symbol(), "P(π/2)");
        assert_eq!(adjoint(&s(0)).symbol(), "S*");
    }

    #[test]
    fn swap_exchanges() {
        let g = swap(1, 0).unwrap();
        assert_eq!(g.anchor(), 0);
        assert_eq!(g.footprint(), 2);
        assert_eq!(g.symbol(), "0 <-> 1");
        let m = g.embed(2).unwrap();
        let out = m.multiply(&state::register_ket(&[1, 0]).unwrap()).unwrap();
        assert_eq!(out, state::register_ket(&[0, 1]).unwrap());

        let far = swap(0, 2).unwrap().embed(3).unwrap();
        let out = far.multiply(&state::register_ket(&[1, 1, 0]).unwrap()).unwrap();
        assert_eq!(out, state::register_ket(&[0, 1, 1]).unwrap());
        assert!(swap(1, 1).is_err());
    }

    #[test]
    fn toffoli_truth_table() {
        let g = toffoli(2, 0, 1).unwrap();
        assert_eq!(g.footprint(), 3);
        assert_eq!(g.symbol(), "q0q1(+)q2");
        assert!(g.local_matrix().is_unitary());
        let m = g.embed(3).unwrap();
        for index in 0..8 {
            let bits = state::bits_of(index, 3);
            let mut expected = bits.clone();
            expected[2] ^= bits[0] & bits[1];
            let out = m.multiply(&state::register_ket(&bits).unwrap()).unwrap();
            assert_eq!(out, state::register_ket(&expected).unwrap(), "{bits:?}");
        }
        assert!(toffoli(0, 0, 1).is_err());
    }

    #[test]
    fn toffoli_with_middle_target() {
        let m = toffoli(1, 0, 2).unwrap().embed(3).unwrap();
        for index in 0..8 {
            let bits = state::bits_of(index, 3);
            let mut expected = bits.clone();
            expected[1] ^= bits[0] & bits[2];
            let out = m.multiply(&state::register_ket(&bits).unwrap()).unwrap();
            assert_eq!(out, state::register_ket(&expected).unwrap());
        }
    }

    #[test]
    fn circuit_as_gate() {
        let mut bell = Circuit::new(2).unwrap();
        bell.add_component(h(0)).unwrap();
        bell.add_component(cx(0, 1).unwrap()).unwrap();
        let g = from_circuit(&bell, 1, "BELL").unwrap();
        assert_eq!(g.registers(), 1..3);
        assert_eq!(g.local_matrix(), &bell.get_matrix().unwrap());

        let mut outer = Circuit::new(3).unwrap();
        outer.add_component(g).unwrap();
        let probs = outer.probabilities().unwrap();
        assert!((probs[0b000] - 0.5).abs() < 1e-10);
        assert!((probs[0b110] - 0.5).abs() < 1e-10);
    }
}
