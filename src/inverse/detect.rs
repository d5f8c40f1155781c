//! Runtime structure detection
//!
//! Zero-pattern scans ([`is_diagmat`], [`is_triu`], [`is_tril`]) are exact:
//! they compare against literal zero, so they only fire for matrices that
//! were built with the structure, not ones that merely come close.
//! [`guess_sympd`] is a heuristic, not a proof; a positive guess licenses an
//! opportunistic Cholesky attempt whose failure is handled by the caller.

use crate::element::{RealScalar, Scalar};
use crate::matrix::Mat;

/// Whether every off-diagonal entry is exactly zero
pub fn is_diagmat<T: Scalar>(a: &Mat<T>) -> bool {
    let nrows = a.nrows();
    let data = a.as_slice();

    for c in 0..a.ncols() {
        for r in 0..nrows {
            if r != c && data[r + c * nrows] != T::zero() {
                return false;
            }
        }
    }
    true
}

/// Whether every entry below the main diagonal is exactly zero
pub fn is_triu<T: Scalar>(a: &Mat<T>) -> bool {
    let nrows = a.nrows();
    let data = a.as_slice();

    for c in 0..a.ncols() {
        for r in (c + 1)..nrows {
            if data[r + c * nrows] != T::zero() {
                return false;
            }
        }
    }
    true
}

/// Whether every entry above the main diagonal is exactly zero
pub fn is_tril<T: Scalar>(a: &Mat<T>) -> bool {
    let nrows = a.nrows();
    let data = a.as_slice();

    for c in 1..a.ncols() {
        for r in 0..c.min(nrows) {
            if data[r + c * nrows] != T::zero() {
                return false;
            }
        }
    }
    true
}

/// Heuristic guess whether a matrix is symmetric/hermitian positive definite
///
/// Checks necessary conditions that are cheap to evaluate: a strictly
/// positive real diagonal, the maximum modulus appearing on the diagonal,
/// and symmetry (hermitian for complex types) within a relative tolerance.
/// A `true` result is a guess worth a Cholesky attempt, never a proof.
pub fn guess_sympd<T: Scalar>(a: &Mat<T>) -> bool {
    if !a.is_square() || a.is_empty() {
        return false;
    }

    let n = a.nrows();

    let mut max_diag = <T::Real as Scalar>::zero();

    for i in 0..n {
        let d = a.at(i, i);

        if d.re() <= <T::Real as Scalar>::zero() {
            return false;
        }
        if T::IS_COMPLEX && d.im() != <T::Real as Scalar>::zero() {
            return false;
        }
        if d.re() > max_diag {
            max_diag = d.re();
        }
    }

    let tol = T::Real::from_f64(100.0) * T::Real::epsilon() * max_diag;

    for c in 0..n {
        for r in (c + 1)..n {
            let lower = a.at(r, c);
            let upper = a.at(c, r);

            // max modulus must sit on the diagonal
            if lower.abs() > max_diag {
                return false;
            }

            if (lower - upper.conj()).abs() > tol {
                return false;
            }
        }
    }

    true
}

/// Cheap sampled symmetry/hermitian check
///
/// Compares a handful of mirrored element pairs rather than the full
/// matrix; used only for advisory diagnostics, so false positives are
/// acceptable.
pub fn rudimentary_sym_check<T: Scalar>(a: &Mat<T>) -> bool {
    if !a.is_square() {
        return false;
    }

    let n = a.nrows();
    if n < 2 {
        return true;
    }

    let tol = T::Real::from_f64(100.0) * T::Real::epsilon();

    let pairs = [(n - 1, 0), (n / 2, n / 4)];

    for (r, c) in pairs {
        if r == c {
            continue;
        }

        let x = a.at(r, c);
        let y = a.at(c, r).conj();

        let scale = if x.abs() > <T::Real as Scalar>::one() {
            x.abs()
        } else {
            <T::Real as Scalar>::one()
        };

        if (x - y).abs() > tol * scale {
            return false;
        }
    }

    true
}
