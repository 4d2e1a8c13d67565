//! Computational-basis kets and probability readout.
//!
//! Registers are little-endian with respect to basis indices: register *j*
//! holds bit *j* of the index, which follows from folding per-register kets
//! left to right with [`perform_tensor_product`].

use itertools::Itertools;
use crate::{
    c,
    matrix::{ Matrix, MatrixResult, perform_tensor_product },
};

/// Return ∣0⟩ or ∣1⟩ as a 2 × 1 column.
pub fn qubit_ket(one: bool) -> Matrix {
    let (a0, a1) = if one { (c!(0.0), c!(1.0)) } else { (c!(1.0), c!(0.0)) };
    Matrix::from(ndarray::array![[a0], [a1]])
}

/// Return the product state of a register of bits, with `bits[0]` as the
/// least significant bit of the basis index.
///
/// Nonzero entries are treated as ∣1⟩. Fails if `bits` is empty.
pub fn register_ket(bits: &[u8]) -> MatrixResult<Matrix> {
    perform_tensor_product(bits.iter().map(|b| qubit_ket(*b != 0)))
}

/// Return the `index`-th basis vector of an `n`-register space.
pub fn basis_ket(n: usize, index: usize) -> MatrixResult<Matrix> {
    let mut ket = Matrix::zeros(1 << n, 1);
    ket.set(index, 0, 1.0)?;
    Ok(ket)
}

/// Return the register bits of basis index `index` in an `n`-register space.
pub fn bits_of(index: usize, n: usize) -> Vec<u8> {
    (0..n).map(|j| ((index >> j) & 1) as u8).collect()
}

/// Return the binary representation of `index`, most significant bit first,
/// padded to `n` digits.
pub fn basis_label(index: usize, n: usize) -> String {
    format!("{index:0n$b}")
}

/// Return a register of bits as a string, first register first.
pub fn bits_label(bits: &[u8]) -> String {
    bits.iter().map(|b| b.to_string()).join("")
}

/// Return the squared magnitude of every amplitude in `state`.
pub fn probabilities(state: &Matrix) -> Vec<f64> {
    state.iter().map(|a| a.norm_sqr()).collect()
}

/// Return `true` if `n` is a positive power of two.
pub fn is_power_of_two(n: usize) -> bool { n.is_power_of_two() }

/// Return the number of registers described by a state with `dim`
/// amplitudes, if `dim` is a power of two.
pub fn register_count(dim: usize) -> Option<usize> {
    is_power_of_two(dim).then(|| dim.trailing_zeros() as usize)
}
