//! Decomposition backend for the inversion engine
//!
//! The engine consumes decomposition capability through [`DecompBackend`]:
//! in-place inversion routines that report success or failure by value and
//! never panic on singular input. [`NativeBackend`] is the pure-Rust
//! implementation; alternative backends (e.g. bindings to an external
//! library) can be swapped in without touching the dispatch logic.

use super::tiny;
use crate::element::{RealScalar, Scalar};
use crate::matrix::Mat;

/// Decomposition capability consumed by the inversion engine
///
/// All routines operate in place on a square matrix buffer. On failure the
/// buffer contents are unspecified and the caller must discard them; the
/// engine only ever hands scratch copies or about-to-be-replaced outputs to
/// a backend.
pub trait DecompBackend {
    /// Invert a general matrix via LU decomposition with partial pivoting.
    /// Returns `false` for singular input.
    fn lu_invert<T: Scalar>(&self, a: &mut Mat<T>) -> bool;

    /// Invert a symmetric/hermitian positive-definite matrix via Cholesky
    /// decomposition. Returns `false` when the matrix is not positive
    /// definite.
    fn cholesky_invert<T: Scalar>(&self, a: &mut Mat<T>) -> bool;

    /// Invert a triangular matrix (`lower` selects which half carries the
    /// data). Returns `false` when a diagonal entry is exactly zero.
    fn triangular_invert<T: Scalar>(&self, a: &mut Mat<T>, lower: bool) -> bool;

    /// [`lu_invert`](Self::lu_invert) plus a reciprocal condition number of
    /// the input; `None` on failure.
    fn lu_invert_rcond<T: Scalar>(&self, a: &mut Mat<T>) -> Option<T::Real>;

    /// [`cholesky_invert`](Self::cholesky_invert) plus a reciprocal
    /// condition number of the input; `None` on failure.
    fn cholesky_invert_rcond<T: Scalar>(&self, a: &mut Mat<T>) -> Option<T::Real>;

    /// [`triangular_invert`](Self::triangular_invert) plus a reciprocal
    /// condition number of the input; `None` on failure.
    fn triangular_invert_rcond<T: Scalar>(&self, a: &mut Mat<T>, lower: bool) -> Option<T::Real>;

    /// Closed-form determinant for matrices of size <= 4
    fn det_tiny<T: Scalar>(&self, a: &Mat<T>) -> T {
        tiny::det_tiny(a)
    }
}

/// Pure-Rust decomposition backend
///
/// LU with partial pivoting (Doolittle), Cholesky-Banachiewicz generalized
/// to hermitian input, and direct triangular substitution. Reciprocal
/// condition numbers are computed exactly as `1 / (||A||_1 * ||A^-1||_1)`
/// from the inverse the routine just produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    /// Create a native backend
    pub fn new() -> Self {
        Self
    }
}

impl DecompBackend for NativeBackend {
    fn lu_invert<T: Scalar>(&self, a: &mut Mat<T>) -> bool {
        debug_assert!(a.is_square());

        let n = a.nrows();
        if n == 0 {
            return true;
        }

        let mut lu: Vec<T> = a.as_slice().to_vec();
        let mut pivots: Vec<usize> = vec![0; n];

        // LU decomposition with partial pivoting
        for col in 0..n {
            // Find pivot: max absolute value in column col, rows col..n
            let mut pivot_row = col;
            let mut max_val = lu[col + col * n].abs();

            for row in (col + 1)..n {
                let val = lu[row + col * n].abs();
                if val > max_val {
                    max_val = val;
                    pivot_row = row;
                }
            }

            pivots[col] = pivot_row;

            if pivot_row != col {
                for j in 0..n {
                    lu.swap(col + j * n, pivot_row + j * n);
                }
            }

            // Zero pivot means a singular matrix
            let pivot = lu[col + col * n];
            if pivot.abs() < T::Real::epsilon() {
                return false;
            }

            // Compute multipliers (L column)
            for row in (col + 1)..n {
                lu[row + col * n] = lu[row + col * n] / pivot;
            }

            // Update trailing submatrix
            for j in (col + 1)..n {
                let u_cj = lu[col + j * n];
                for row in (col + 1)..n {
                    let update = lu[row + col * n] * u_cj;
                    lu[row + j * n] = lu[row + j * n] - update;
                }
            }
        }

        // Solve A @ X = I one identity column at a time
        let mut e: Vec<T> = vec![T::zero(); n];

        for j in 0..n {
            for v in e.iter_mut() {
                *v = T::zero();
            }
            e[j] = T::one();

            // Apply the row permutation
            for (i, &pivot_row) in pivots.iter().enumerate() {
                if pivot_row != i {
                    e.swap(i, pivot_row);
                }
            }

            // Forward substitution: Ly = Pb (L has unit diagonal)
            for i in 0..n {
                let mut sum = T::zero();
                for k in 0..i {
                    sum = sum + lu[i + k * n] * e[k];
                }
                e[i] = e[i] - sum;
            }

            // Backward substitution: Ux = y
            for i in (0..n).rev() {
                let mut sum = T::zero();
                for k in (i + 1)..n {
                    sum = sum + lu[i + k * n] * e[k];
                }
                e[i] = (e[i] - sum) / lu[i + i * n];
            }

            a.col_mut(j).copy_from_slice(&e);
        }

        true
    }

    fn cholesky_invert<T: Scalar>(&self, a: &mut Mat<T>) -> bool {
        debug_assert!(a.is_square());

        let n = a.nrows();
        if n == 0 {
            return true;
        }

        // Cholesky-Banachiewicz: A = L @ L^H, only the lower half of the
        // input is referenced
        let src = a.as_slice();
        let mut l: Vec<T> = vec![T::zero(); n * n];

        for i in 0..n {
            let mut sum_sq = <T::Real as Scalar>::zero();
            for k in 0..i {
                let v = l[i + k * n].abs();
                sum_sq = sum_sq + v * v;
            }

            let diag = src[i + i * n].re() - sum_sq;
            if diag <= <T::Real as Scalar>::zero() {
                return false;
            }
            let l_ii = diag.sqrt();
            l[i + i * n] = T::from_real(l_ii);

            for j in (i + 1)..n {
                let mut sum = T::zero();
                for k in 0..i {
                    sum = sum + l[j + k * n] * l[i + k * n].conj();
                }
                l[j + i * n] = (src[j + i * n] - sum) / T::from_real(l_ii);
            }
        }

        // Solve L @ L^H @ X = I one identity column at a time
        let mut e: Vec<T> = vec![T::zero(); n];

        for j in 0..n {
            for v in e.iter_mut() {
                *v = T::zero();
            }
            e[j] = T::one();

            // Forward substitution: Ly = b
            for i in 0..n {
                let mut sum = T::zero();
                for k in 0..i {
                    sum = sum + l[i + k * n] * e[k];
                }
                e[i] = (e[i] - sum) / l[i + i * n];
            }

            // Backward substitution: L^H x = y
            for i in (0..n).rev() {
                let mut sum = T::zero();
                for k in (i + 1)..n {
                    sum = sum + l[k + i * n].conj() * e[k];
                }
                e[i] = (e[i] - sum) / l[i + i * n];
            }

            a.col_mut(j).copy_from_slice(&e);
        }

        true
    }

    fn triangular_invert<T: Scalar>(&self, a: &mut Mat<T>, lower: bool) -> bool {
        debug_assert!(a.is_square());

        let n = a.nrows();
        if n == 0 {
            return true;
        }

        let src = a.as_slice();
        let mut inv: Vec<T> = vec![T::zero(); n * n];

        if lower {
            for j in 0..n {
                let d = src[j + j * n];
                if d == T::zero() {
                    return false;
                }
                inv[j + j * n] = T::one() / d;

                for i in (j + 1)..n {
                    let mut sum = T::zero();
                    for k in j..i {
                        sum = sum + src[i + k * n] * inv[k + j * n];
                    }
                    inv[i + j * n] = -sum / src[i + i * n];
                }
            }
        } else {
            for j in 0..n {
                let d = src[j + j * n];
                if d == T::zero() {
                    return false;
                }
                inv[j + j * n] = T::one() / d;

                for i in (0..j).rev() {
                    let mut sum = T::zero();
                    for k in (i + 1)..=j {
                        sum = sum + src[i + k * n] * inv[k + j * n];
                    }
                    inv[i + j * n] = -sum / src[i + i * n];
                }
            }
        }

        a.as_mut_slice().copy_from_slice(&inv);
        true
    }

    fn lu_invert_rcond<T: Scalar>(&self, a: &mut Mat<T>) -> Option<T::Real> {
        let norm_src = a.norm1();
        if !self.lu_invert(a) {
            return None;
        }
        Some(recip_cond::<T>(norm_src, a.norm1()))
    }

    fn cholesky_invert_rcond<T: Scalar>(&self, a: &mut Mat<T>) -> Option<T::Real> {
        let norm_src = a.norm1();
        if !self.cholesky_invert(a) {
            return None;
        }
        Some(recip_cond::<T>(norm_src, a.norm1()))
    }

    fn triangular_invert_rcond<T: Scalar>(&self, a: &mut Mat<T>, lower: bool) -> Option<T::Real> {
        let norm_src = a.norm1();
        if !self.triangular_invert(a, lower) {
            return None;
        }
        Some(recip_cond::<T>(norm_src, a.norm1()))
    }
}

/// `1 / (||A||_1 * ||A^-1||_1)`, with the empty matrix pinned to zero
fn recip_cond<T: Scalar>(norm_src: T::Real, norm_inv: T::Real) -> T::Real {
    let zero = <T::Real as Scalar>::zero();
    if norm_src == zero || norm_inv == zero {
        return zero;
    }
    <T::Real as Scalar>::one() / (norm_src * norm_inv)
}
