//! Dense complex matrices and the tensor-product convention shared by gate
//! embedding and state preparation.
//!
//! The tensor product implemented here places the index of the *second*
//! operand as the major component of the combined index:
//!
//! <blockquote>
//!   <p style="font-size:20px">
//!     (<i>A</i> ⊗ <i>B</i>)[<i>u</i> <i>r</i><sub><i>A</i></sub> + <i>i</i>, <i>v</i> <i>c</i><sub><i>A</i></sub> + <i>j</i>]
//!       = <i>A</i>[<i>i</i>, <i>j</i>] <i>B</i>[<i>u</i>, <i>v</i>]
//!   </p>
//! </blockquote>
//!
//! Folding a list of single-qubit operators left to right with this product
//! therefore makes the first qubit the least significant bit of a basis index.
//! Every part of the crate composes subsystems this way, so it must not be
//! swapped for the textbook Kronecker layout.

use std::fmt;
use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use thiserror::Error;

/// Entry-wise tolerance used by [`Matrix::equals`].
pub const EPSILON: f64 = 1e-10;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix dimensions do not match for {op}: {lhs:?} {rhs:?}")]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfRange { index: (usize, usize), shape: (usize, usize) },

    #[error("cannot build a matrix from empty data")]
    EmptyData,

    #[error("row {row} has {found} entries, but expected {expected}")]
    RaggedData { row: usize, expected: usize, found: usize },
}
pub type MatrixResult<T> = Result<T, MatrixError>;
use MatrixError::*;

/// A dense, fixed-shape matrix of complex numbers.
///
/// Equality (via [`PartialEq`] or [`Self::equals`]) holds when shapes match
/// and the real and imaginary parts of all corresponding entries differ by no
/// more than [`EPSILON`].
#[derive(Clone, Debug)]
pub struct Matrix {
    data: nd::Array2<C64>,
}

impl From<nd::Array2<C64>> for Matrix {
    fn from(data: nd::Array2<C64>) -> Self { Self { data } }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool { self.equals(other) }
}

impl Matrix {
    /// Create a new `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { data: nd::Array2::zeros((rows, cols)) }
    }

    /// Create a new matrix from a literal grid of rows.
    ///
    /// Dimensions are inferred from the data. Fails if there are no rows, the
    /// first row is empty, or any row differs in length from the first.
    pub fn from_rows<I, R>(rows: I) -> MatrixResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C64>,
    {
        let rows: Vec<Vec<C64>> =
            rows.into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        let ncols = rows.first().map(|row| row.len()).unwrap_or(0);
        if ncols == 0 { return Err(EmptyData); }
        if let Some((row, found)) =
            rows.iter().map(|row| row.len()).enumerate()
            .find(|(_, len)| *len != ncols)
        {
            return Err(RaggedData { row, expected: ncols, found });
        }
        let nrows = rows.len();
        let flat: Vec<C64> = rows.into_iter().flatten().collect();
        nd::Array2::from_shape_vec((nrows, ncols), flat)
            .map(Self::from)
            .map_err(|_| EmptyData)
    }

    /// Create a column vector from a non-empty sequence of entries.
    pub fn column<I>(entries: I) -> MatrixResult<Self>
    where I: IntoIterator<Item = C64>
    {
        Self::from_rows(entries.into_iter().map(|a| [a]))
    }

    /// Return the number of rows.
    pub fn rows(&self) -> usize { self.data.nrows() }

    /// Return the number of columns.
    pub fn cols(&self) -> usize { self.data.ncols() }

    /// Return `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) { self.data.dim() }

    /// Return `true` if `self` has as many rows as columns.
    pub fn is_square(&self) -> bool { self.rows() == self.cols() }

    /// Return an iterator over all entries in row-major order.
    pub fn iter(&self) -> nd::iter::Iter<'_, C64, nd::Ix2> { self.data.iter() }

    fn check_index(&self, r: usize, c: usize) -> MatrixResult<()> {
        if r >= self.rows() || c >= self.cols() {
            Err(IndexOutOfRange { index: (r, c), shape: self.shape() })
        } else {
            Ok(())
        }
    }

    /// Return the entry at `(r, c)`.
    pub fn get(&self, r: usize, c: usize) -> MatrixResult<C64> {
        self.check_index(r, c)?;
        Ok(self.data[[r, c]])
    }

    /// Return a mutable reference to the entry at `(r, c)`.
    pub fn get_mut(&mut self, r: usize, c: usize) -> MatrixResult<&mut C64> {
        self.check_index(r, c)?;
        Ok(&mut self.data[[r, c]])
    }

    /// Overwrite the entry at `(r, c)`.
    pub fn set<T>(&mut self, r: usize, c: usize, val: T) -> MatrixResult<()>
    where T: Into<C64>
    {
        *self.get_mut(r, c)? = val.into();
        Ok(())
    }

    fn check_same_shape(&self, rhs: &Self, op: &'static str)
        -> MatrixResult<()>
    {
        if self.shape() != rhs.shape() {
            Err(DimensionMismatch { op, lhs: self.shape(), rhs: rhs.shape() })
        } else {
            Ok(())
        }
    }

    /// Return the entry-wise sum `self + rhs`.
    pub fn add(&self, rhs: &Self) -> MatrixResult<Self> {
        self.check_same_shape(rhs, "addition")?;
        Ok((&self.data + &rhs.data).into())
    }

    /// Return the entry-wise difference `self - rhs`.
    pub fn subtract(&self, rhs: &Self) -> MatrixResult<Self> {
        self.check_same_shape(rhs, "subtraction")?;
        Ok((&self.data - &rhs.data).into())
    }

    /// Return the matrix product `self · rhs`.
    pub fn multiply(&self, rhs: &Self) -> MatrixResult<Self> {
        if self.cols() != rhs.rows() {
            return Err(DimensionMismatch {
                op: "multiplication",
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        Ok(self.data.dot(&rhs.data).into())
    }

    /// Multiply every entry by a scalar.
    pub fn scale<T>(&self, a: T) -> Self
    where T: Into<C64>
    {
        let a = a.into();
        self.data.mapv(|x| a * x).into()
    }

    /// Return the tensor product of `self` with `rhs`, using the
    /// second-operand-major convention described in the [module
    /// docs][crate::matrix].
    pub fn tensor_product(&self, rhs: &Self) -> Self {
        let (ra, ca) = self.shape();
        let (rb, cb) = rhs.shape();
        nd::Array2::from_shape_fn(
            (ra * rb, ca * cb),
            |(r, c)| {
                let (u, i) = (r / ra, r % ra);
                let (v, j) = (c / ca, c % ca);
                self.data[[i, j]] * rhs.data[[u, v]]
            },
        )
        .into()
    }

    /// Return the transpose of `self`.
    pub fn transpose(&self) -> Self {
        self.data.t().to_owned().into()
    }

    /// Return the entry-wise complex conjugate of `self`.
    pub fn conjugate(&self) -> Self {
        self.data.mapv(|x| x.conj()).into()
    }

    /// Return the conjugate transpose of `self`.
    pub fn adjoint(&self) -> Self { self.transpose().conjugate() }

    /// Return `true` if `self` and `other` have the same shape and all
    /// corresponding entries agree to within [`EPSILON`] in both their real
    /// and imaginary parts.
    pub fn equals(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self.data.iter().zip(other.data.iter())
                .all(|(l, r)| {
                    (l.re - r.re).abs() <= EPSILON
                        && (l.im - r.im).abs() <= EPSILON
                })
    }

    /// Return `true` if `self` is square and `self · self†` is the identity.
    pub fn is_unitary(&self) -> bool {
        self.is_square()
            && self.multiply(&self.adjoint())
                .is_ok_and(|prod| prod.equals(&identity_matrix(self.rows())))
    }
}

/// Return the `n × n` identity matrix.
pub fn identity_matrix(n: usize) -> Matrix {
    nd::Array2::eye(n).into()
}

/// Fold [`Matrix::tensor_product`] left to right over a sequence of matrices,
/// seeded by the first.
///
/// Fails if the sequence is empty.
pub fn perform_tensor_product<I>(matrices: I) -> MatrixResult<Matrix>
where I: IntoIterator<Item = Matrix>
{
    matrices.into_iter()
        .reduce(|acc, m| acc.tensor_product(&m))
        .ok_or(EmptyData)
}

fn fmt_entry(a: C64, prec: Option<usize>) -> String {
    // avoid printing -0
    let re = if a.re == 0.0 { 0.0 } else { a.re };
    let im = a.im;
    let sign = if im >= 0.0 { '+' } else { '-' };
    match (prec, im == 0.0) {
        (Some(p), true) => format!("{re:.p$}"),
        (Some(p), false) => format!("{re:.p$}{sign}{:.p$}i", im.abs()),
        (None, true) => format!("{re}"),
        (None, false) => format!("{re}{sign}{}i", im.abs()),
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows() == 0 || self.cols() == 0 {
            return write!(f, "[]");
        }
        let prec = f.precision();
        let entries: Vec<Vec<String>> =
            self.data.outer_iter()
            .map(|row| row.iter().map(|a| fmt_entry(*a, prec)).collect())
            .collect();
        let width =
            entries.iter().flatten().map(|s| s.chars().count())
            .max()
            .unwrap_or(0);
        writeln!(f, "[")?;
        for row in entries.iter() {
            let line =
                row.iter()
                .map(|s| format!("{s:<width$}"))
                .join(", ");
            writeln!(f, "  {line}")?;
        }
        write!(f, "]")
    }
}
