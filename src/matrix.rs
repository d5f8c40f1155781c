//! Dense column-major matrix container
//!
//! [`Mat`] owns its elements in a contiguous column-major `Vec`. A
//! [`StructureHint`] travels with each matrix: constructors that guarantee a
//! shape property (e.g. [`Mat::from_diag`], [`Mat::identity`]) record it, and
//! any mutable element access downgrades the hint back to
//! [`StructureHint::General`]. The inversion engine consults the hint before
//! paying for a runtime zero-pattern scan.

use crate::element::Scalar;
use std::ops::{Index, IndexMut};

/// Structure known about a matrix from how it was constructed
///
/// A hint is a guarantee, not a guess: code holding a matrix with hint
/// `Diagonal` may rely on every off-diagonal entry being exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructureHint {
    /// No structure is known
    #[default]
    General,
    /// All off-diagonal entries are exactly zero
    Diagonal,
    /// All entries below the main diagonal are exactly zero
    UpperTriangular,
    /// All entries above the main diagonal are exactly zero
    LowerTriangular,
}

/// Dense 2-D matrix with column-major contiguous storage
///
/// Invariant: `data.len() == nrows * ncols`. Element `(r, c)` lives at
/// index `r + c * nrows`.
#[derive(Debug, Clone)]
pub struct Mat<T> {
    nrows: usize,
    ncols: usize,
    data: Vec<T>,
    hint: StructureHint,
}

impl<T: Scalar> Mat<T> {
    /// Create a matrix of zeros
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![T::zero(); nrows * ncols],
            hint: StructureHint::General,
        }
    }

    /// Create an identity matrix (hinted [`StructureHint::Diagonal`])
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i + i * n] = T::one();
        }
        m.hint = StructureHint::Diagonal;
        m
    }

    /// Create a diagonal matrix from its diagonal entries
    /// (hinted [`StructureHint::Diagonal`])
    pub fn from_diag(diag: &[T]) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n, n);
        for (i, &d) in diag.iter().enumerate() {
            m.data[i + i * n] = d;
        }
        m.hint = StructureHint::Diagonal;
        m
    }

    /// Create a matrix from column-major element data
    ///
    /// # Panics
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_cols(nrows: usize, ncols: usize, data: &[T]) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "element count must equal nrows * ncols"
        );
        Self {
            nrows,
            ncols,
            data: data.to_vec(),
            hint: StructureHint::General,
        }
    }

    /// Create a matrix from row-major element data
    ///
    /// Convenience constructor: the data reads like the matrix is written.
    ///
    /// # Panics
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_rows(nrows: usize, ncols: usize, data: &[T]) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "element count must equal nrows * ncols"
        );
        let mut m = Self::zeros(nrows, ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                m.data[r + c * nrows] = data[r * ncols + c];
            }
        }
        m
    }

    /// Create a matrix by evaluating `f(row, col)` for every element
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut m = Self::zeros(nrows, ncols);
        for c in 0..ncols {
            for r in 0..nrows {
                m.data[r + c * nrows] = f(r, c);
            }
        }
        m
    }

    /// Number of rows
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Whether the matrix is square
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Whether the matrix has no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The structure hint attached to this matrix
    #[inline]
    pub fn hint(&self) -> StructureHint {
        self.hint
    }

    /// Element at `(row, col)`
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.data[row + col * self.nrows]
    }

    /// Mutable element access; downgrades the structure hint
    #[inline]
    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        self.hint = StructureHint::General;
        &mut self.data[row + col * self.nrows]
    }

    /// Column-major element slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable column-major element slice; downgrades the structure hint
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.hint = StructureHint::General;
        &mut self.data
    }

    /// Column `col` as a contiguous slice
    #[inline]
    pub fn col(&self, col: usize) -> &[T] {
        &self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    /// Column `col` as a mutable contiguous slice; downgrades the
    /// structure hint
    #[inline]
    pub fn col_mut(&mut self, col: usize) -> &mut [T] {
        self.hint = StructureHint::General;
        &mut self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    /// Restamp the structure hint
    ///
    /// Internal: callers must guarantee the hinted zero pattern actually
    /// holds.
    pub(crate) fn set_hint(&mut self, hint: StructureHint) {
        self.hint = hint;
    }

    /// Copy with everything below the main diagonal zeroed
    /// (hinted [`StructureHint::UpperTriangular`])
    pub fn triu(&self) -> Self {
        let mut m = self.clone();
        for c in 0..m.ncols {
            for r in (c + 1)..m.nrows {
                m.data[r + c * m.nrows] = T::zero();
            }
        }
        m.hint = StructureHint::UpperTriangular;
        m
    }

    /// Copy with everything above the main diagonal zeroed
    /// (hinted [`StructureHint::LowerTriangular`])
    pub fn tril(&self) -> Self {
        let mut m = self.clone();
        for c in 0..m.ncols {
            for r in 0..c.min(m.nrows) {
                m.data[r + c * m.nrows] = T::zero();
            }
        }
        m.hint = StructureHint::LowerTriangular;
        m
    }

    /// Conjugate transpose (plain transpose for real element types)
    pub fn transpose(&self) -> Self {
        let mut m = Self::zeros(self.ncols, self.nrows);
        for c in 0..self.ncols {
            for r in 0..self.nrows {
                m.data[c + r * self.ncols] = self.data[r + c * self.nrows].conj();
            }
        }
        m
    }

    /// Matrix product `self * rhs`
    ///
    /// # Panics
    /// Panics if the inner dimensions disagree.
    pub fn matmul(&self, rhs: &Self) -> Self {
        assert_eq!(self.ncols, rhs.nrows, "inner dimensions must agree");
        let m = self.nrows;
        let k = self.ncols;
        let n = rhs.ncols;
        let mut out = Self::zeros(m, n);
        for c in 0..n {
            for kk in 0..k {
                let rv = rhs.data[kk + c * k];
                for r in 0..m {
                    let prod = self.data[r + kk * m] * rv;
                    out.data[r + c * m] = out.data[r + c * m] + prod;
                }
            }
        }
        out
    }

    /// 1-norm: maximum absolute column sum
    pub fn norm1(&self) -> T::Real {
        let mut max = <T::Real as Scalar>::zero();
        for c in 0..self.ncols {
            let mut sum = <T::Real as Scalar>::zero();
            for &v in self.col(c) {
                sum = sum + v.abs();
            }
            if sum > max {
                max = sum;
            }
        }
        max
    }
}

/// Shape and element equality; the structure hint does not participate,
/// so matrices built through different constructors compare equal when
/// their elements agree
impl<T: PartialEq> PartialEq for Mat<T> {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows && self.ncols == other.ncols && self.data == other.data
    }
}

impl<T: Scalar> Index<(usize, usize)> for Mat<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row + col * self.nrows]
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Mat<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        self.hint = StructureHint::General;
        &mut self.data[row + col * self.nrows]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_ignores_structure_hint() {
        let a = Mat::<f64>::from_diag(&[1.0, 2.0]);
        let b = Mat::<f64>::from_cols(2, 2, &[1.0, 0.0, 0.0, 2.0]);

        assert_ne!(a.hint(), b.hint());
        assert_eq!(a, b);
    }

    #[test]
    fn test_col_slices() {
        let mut m = Mat::<f64>::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.col(1), &[2.0, 4.0]);

        m.col_mut(0).copy_from_slice(&[5.0, 6.0]);
        assert_eq!(m.at(0, 0), 5.0);
        assert_eq!(m.at(1, 0), 6.0);
        assert_eq!(m.hint(), StructureHint::General);
    }

    #[test]
    fn test_norm1() {
        let m = Mat::<f64>::from_rows(2, 2, &[1.0, -3.0, 2.0, 1.0]);
        assert_eq!(m.norm1(), 4.0);
    }
}
