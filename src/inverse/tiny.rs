//! Closed-form determinant and inverse for matrices up to 4x4
//!
//! Cofactor/adjugate expansions avoid a full decomposition for tiny
//! matrices. The expansions are numerically fragile, so the inverse is
//! gated twice: the determinant magnitude must sit in `[eps, 1/eps]`, and
//! for sizes >= 3 the candidate must reproduce the `(0, 0)` entry of the
//! identity when multiplied against the source row. Callers fall through to
//! a decomposition-based strategy when either gate rejects.

use crate::element::{RealScalar, Scalar};
use crate::matrix::Mat;

// Column-major offsets, matching Mat's storage.
#[inline]
const fn p2(r: usize, c: usize) -> usize {
    r + c * 2
}

#[inline]
const fn p3(r: usize, c: usize) -> usize {
    r + c * 3
}

#[inline]
const fn p4(r: usize, c: usize) -> usize {
    r + c * 4
}

/// Closed-form determinant for matrices of size <= 4
///
/// The 0x0 determinant is 1 (empty product).
///
/// # Panics
/// Panics in debug builds if the matrix is larger than 4x4 or not square.
pub fn det_tiny<T: Scalar>(x: &Mat<T>) -> T {
    debug_assert!(x.is_square());
    debug_assert!(x.nrows() <= 4);

    let xm = x.as_slice();

    match x.nrows() {
        0 => T::one(),
        1 => xm[0],
        2 => xm[p2(0, 0)] * xm[p2(1, 1)] - xm[p2(0, 1)] * xm[p2(1, 0)],
        3 => {
            let a = xm[p3(0, 0)] * (xm[p3(1, 1)] * xm[p3(2, 2)] - xm[p3(2, 1)] * xm[p3(1, 2)]);
            let b = xm[p3(0, 1)] * (xm[p3(1, 0)] * xm[p3(2, 2)] - xm[p3(2, 0)] * xm[p3(1, 2)]);
            let c = xm[p3(0, 2)] * (xm[p3(1, 0)] * xm[p3(2, 1)] - xm[p3(2, 0)] * xm[p3(1, 1)]);
            a - b + c
        }
        _ => {
            let m00 = xm[p4(1, 1)]
                * (xm[p4(2, 2)] * xm[p4(3, 3)] - xm[p4(2, 3)] * xm[p4(3, 2)])
                - xm[p4(1, 2)] * (xm[p4(2, 1)] * xm[p4(3, 3)] - xm[p4(2, 3)] * xm[p4(3, 1)])
                + xm[p4(1, 3)] * (xm[p4(2, 1)] * xm[p4(3, 2)] - xm[p4(2, 2)] * xm[p4(3, 1)]);
            let m01 = xm[p4(1, 0)]
                * (xm[p4(2, 2)] * xm[p4(3, 3)] - xm[p4(2, 3)] * xm[p4(3, 2)])
                - xm[p4(1, 2)] * (xm[p4(2, 0)] * xm[p4(3, 3)] - xm[p4(2, 3)] * xm[p4(3, 0)])
                + xm[p4(1, 3)] * (xm[p4(2, 0)] * xm[p4(3, 2)] - xm[p4(2, 2)] * xm[p4(3, 0)]);
            let m02 = xm[p4(1, 0)]
                * (xm[p4(2, 1)] * xm[p4(3, 3)] - xm[p4(2, 3)] * xm[p4(3, 1)])
                - xm[p4(1, 1)] * (xm[p4(2, 0)] * xm[p4(3, 3)] - xm[p4(2, 3)] * xm[p4(3, 0)])
                + xm[p4(1, 3)] * (xm[p4(2, 0)] * xm[p4(3, 1)] - xm[p4(2, 1)] * xm[p4(3, 0)]);
            let m03 = xm[p4(1, 0)]
                * (xm[p4(2, 1)] * xm[p4(3, 2)] - xm[p4(2, 2)] * xm[p4(3, 1)])
                - xm[p4(1, 1)] * (xm[p4(2, 0)] * xm[p4(3, 2)] - xm[p4(2, 2)] * xm[p4(3, 0)])
                + xm[p4(1, 2)] * (xm[p4(2, 0)] * xm[p4(3, 1)] - xm[p4(2, 1)] * xm[p4(3, 0)]);

            xm[p4(0, 0)] * m00 - xm[p4(0, 1)] * m01 + xm[p4(0, 2)] * m02 - xm[p4(0, 3)] * m03
        }
    }
}

/// Closed-form inverse of `x` written into `out`
///
/// `out` must not alias `x` and is resized to match. Returns `false` when
/// the determinant magnitude falls outside `[eps, 1/eps]` or the
/// self-consistency check fails; `out` holds garbage in that case and the
/// caller must discard it.
///
/// `check_tol` bounds `|1 - (row 0 of x) . (col 0 of out)|` for sizes >= 3.
pub fn inv_tiny_noalias<T: Scalar>(out: &mut Mat<T>, x: &Mat<T>, check_tol: T::Real) -> bool {
    debug_assert!(x.is_square());

    let n = x.nrows();

    debug_assert!(n <= 4);
    debug_assert!(out.nrows() == n && out.ncols() == n);

    let det_min = T::Real::epsilon();
    let det_max = <T::Real as Scalar>::one() / T::Real::epsilon();

    if n == 0 {
        return true;
    }

    let det_val = det_tiny(x);
    let abs_det_val = det_val.abs();

    if abs_det_val < det_min || abs_det_val > det_max {
        return false;
    }

    let xm = x.as_slice();
    let om = out.as_mut_slice();

    if n == 1 {
        om[0] = T::one() / xm[0];
        return true;
    }

    if n == 2 {
        om[p2(0, 0)] = xm[p2(1, 1)] / det_val;
        om[p2(0, 1)] = -xm[p2(0, 1)] / det_val;
        om[p2(1, 0)] = -xm[p2(1, 0)] / det_val;
        om[p2(1, 1)] = xm[p2(0, 0)] / det_val;

        return true;
    }

    if n == 3 {
        om[p3(0, 0)] = (xm[p3(2, 2)] * xm[p3(1, 1)] - xm[p3(2, 1)] * xm[p3(1, 2)]) / det_val;
        om[p3(1, 0)] = -(xm[p3(2, 2)] * xm[p3(1, 0)] - xm[p3(2, 0)] * xm[p3(1, 2)]) / det_val;
        om[p3(2, 0)] = (xm[p3(2, 1)] * xm[p3(1, 0)] - xm[p3(2, 0)] * xm[p3(1, 1)]) / det_val;

        om[p3(0, 1)] = -(xm[p3(2, 2)] * xm[p3(0, 1)] - xm[p3(2, 1)] * xm[p3(0, 2)]) / det_val;
        om[p3(1, 1)] = (xm[p3(2, 2)] * xm[p3(0, 0)] - xm[p3(2, 0)] * xm[p3(0, 2)]) / det_val;
        om[p3(2, 1)] = -(xm[p3(2, 1)] * xm[p3(0, 0)] - xm[p3(2, 0)] * xm[p3(0, 1)]) / det_val;

        om[p3(0, 2)] = (xm[p3(1, 2)] * xm[p3(0, 1)] - xm[p3(1, 1)] * xm[p3(0, 2)]) / det_val;
        om[p3(1, 2)] = -(xm[p3(1, 2)] * xm[p3(0, 0)] - xm[p3(1, 0)] * xm[p3(0, 2)]) / det_val;
        om[p3(2, 2)] = (xm[p3(1, 1)] * xm[p3(0, 0)] - xm[p3(1, 0)] * xm[p3(0, 1)]) / det_val;

        let check_val = xm[p3(0, 0)] * om[p3(0, 0)]
            + xm[p3(0, 1)] * om[p3(1, 0)]
            + xm[p3(0, 2)] * om[p3(2, 0)];

        return (T::one() - check_val).abs() < check_tol;
    }

    // n == 4
    om[p4(0, 0)] = (xm[p4(1, 2)] * xm[p4(2, 3)] * xm[p4(3, 1)]
        - xm[p4(1, 3)] * xm[p4(2, 2)] * xm[p4(3, 1)]
        + xm[p4(1, 3)] * xm[p4(2, 1)] * xm[p4(3, 2)]
        - xm[p4(1, 1)] * xm[p4(2, 3)] * xm[p4(3, 2)]
        - xm[p4(1, 2)] * xm[p4(2, 1)] * xm[p4(3, 3)]
        + xm[p4(1, 1)] * xm[p4(2, 2)] * xm[p4(3, 3)])
        / det_val;
    om[p4(1, 0)] = (xm[p4(1, 3)] * xm[p4(2, 2)] * xm[p4(3, 0)]
        - xm[p4(1, 2)] * xm[p4(2, 3)] * xm[p4(3, 0)]
        - xm[p4(1, 3)] * xm[p4(2, 0)] * xm[p4(3, 2)]
        + xm[p4(1, 0)] * xm[p4(2, 3)] * xm[p4(3, 2)]
        + xm[p4(1, 2)] * xm[p4(2, 0)] * xm[p4(3, 3)]
        - xm[p4(1, 0)] * xm[p4(2, 2)] * xm[p4(3, 3)])
        / det_val;
    om[p4(2, 0)] = (xm[p4(1, 1)] * xm[p4(2, 3)] * xm[p4(3, 0)]
        - xm[p4(1, 3)] * xm[p4(2, 1)] * xm[p4(3, 0)]
        + xm[p4(1, 3)] * xm[p4(2, 0)] * xm[p4(3, 1)]
        - xm[p4(1, 0)] * xm[p4(2, 3)] * xm[p4(3, 1)]
        - xm[p4(1, 1)] * xm[p4(2, 0)] * xm[p4(3, 3)]
        + xm[p4(1, 0)] * xm[p4(2, 1)] * xm[p4(3, 3)])
        / det_val;
    om[p4(3, 0)] = (xm[p4(1, 2)] * xm[p4(2, 1)] * xm[p4(3, 0)]
        - xm[p4(1, 1)] * xm[p4(2, 2)] * xm[p4(3, 0)]
        - xm[p4(1, 2)] * xm[p4(2, 0)] * xm[p4(3, 1)]
        + xm[p4(1, 0)] * xm[p4(2, 2)] * xm[p4(3, 1)]
        + xm[p4(1, 1)] * xm[p4(2, 0)] * xm[p4(3, 2)]
        - xm[p4(1, 0)] * xm[p4(2, 1)] * xm[p4(3, 2)])
        / det_val;

    om[p4(0, 1)] = (xm[p4(0, 3)] * xm[p4(2, 2)] * xm[p4(3, 1)]
        - xm[p4(0, 2)] * xm[p4(2, 3)] * xm[p4(3, 1)]
        - xm[p4(0, 3)] * xm[p4(2, 1)] * xm[p4(3, 2)]
        + xm[p4(0, 1)] * xm[p4(2, 3)] * xm[p4(3, 2)]
        + xm[p4(0, 2)] * xm[p4(2, 1)] * xm[p4(3, 3)]
        - xm[p4(0, 1)] * xm[p4(2, 2)] * xm[p4(3, 3)])
        / det_val;
    om[p4(1, 1)] = (xm[p4(0, 2)] * xm[p4(2, 3)] * xm[p4(3, 0)]
        - xm[p4(0, 3)] * xm[p4(2, 2)] * xm[p4(3, 0)]
        + xm[p4(0, 3)] * xm[p4(2, 0)] * xm[p4(3, 2)]
        - xm[p4(0, 0)] * xm[p4(2, 3)] * xm[p4(3, 2)]
        - xm[p4(0, 2)] * xm[p4(2, 0)] * xm[p4(3, 3)]
        + xm[p4(0, 0)] * xm[p4(2, 2)] * xm[p4(3, 3)])
        / det_val;
    om[p4(2, 1)] = (xm[p4(0, 3)] * xm[p4(2, 1)] * xm[p4(3, 0)]
        - xm[p4(0, 1)] * xm[p4(2, 3)] * xm[p4(3, 0)]
        - xm[p4(0, 3)] * xm[p4(2, 0)] * xm[p4(3, 1)]
        + xm[p4(0, 0)] * xm[p4(2, 3)] * xm[p4(3, 1)]
        + xm[p4(0, 1)] * xm[p4(2, 0)] * xm[p4(3, 3)]
        - xm[p4(0, 0)] * xm[p4(2, 1)] * xm[p4(3, 3)])
        / det_val;
    om[p4(3, 1)] = (xm[p4(0, 1)] * xm[p4(2, 2)] * xm[p4(3, 0)]
        - xm[p4(0, 2)] * xm[p4(2, 1)] * xm[p4(3, 0)]
        + xm[p4(0, 2)] * xm[p4(2, 0)] * xm[p4(3, 1)]
        - xm[p4(0, 0)] * xm[p4(2, 2)] * xm[p4(3, 1)]
        - xm[p4(0, 1)] * xm[p4(2, 0)] * xm[p4(3, 2)]
        + xm[p4(0, 0)] * xm[p4(2, 1)] * xm[p4(3, 2)])
        / det_val;

    om[p4(0, 2)] = (xm[p4(0, 2)] * xm[p4(1, 3)] * xm[p4(3, 1)]
        - xm[p4(0, 3)] * xm[p4(1, 2)] * xm[p4(3, 1)]
        + xm[p4(0, 3)] * xm[p4(1, 1)] * xm[p4(3, 2)]
        - xm[p4(0, 1)] * xm[p4(1, 3)] * xm[p4(3, 2)]
        - xm[p4(0, 2)] * xm[p4(1, 1)] * xm[p4(3, 3)]
        + xm[p4(0, 1)] * xm[p4(1, 2)] * xm[p4(3, 3)])
        / det_val;
    om[p4(1, 2)] = (xm[p4(0, 3)] * xm[p4(1, 2)] * xm[p4(3, 0)]
        - xm[p4(0, 2)] * xm[p4(1, 3)] * xm[p4(3, 0)]
        - xm[p4(0, 3)] * xm[p4(1, 0)] * xm[p4(3, 2)]
        + xm[p4(0, 0)] * xm[p4(1, 3)] * xm[p4(3, 2)]
        + xm[p4(0, 2)] * xm[p4(1, 0)] * xm[p4(3, 3)]
        - xm[p4(0, 0)] * xm[p4(1, 2)] * xm[p4(3, 3)])
        / det_val;
    om[p4(2, 2)] = (xm[p4(0, 1)] * xm[p4(1, 3)] * xm[p4(3, 0)]
        - xm[p4(0, 3)] * xm[p4(1, 1)] * xm[p4(3, 0)]
        + xm[p4(0, 3)] * xm[p4(1, 0)] * xm[p4(3, 1)]
        - xm[p4(0, 0)] * xm[p4(1, 3)] * xm[p4(3, 1)]
        - xm[p4(0, 1)] * xm[p4(1, 0)] * xm[p4(3, 3)]
        + xm[p4(0, 0)] * xm[p4(1, 1)] * xm[p4(3, 3)])
        / det_val;
    om[p4(3, 2)] = (xm[p4(0, 2)] * xm[p4(1, 1)] * xm[p4(3, 0)]
        - xm[p4(0, 1)] * xm[p4(1, 2)] * xm[p4(3, 0)]
        - xm[p4(0, 2)] * xm[p4(1, 0)] * xm[p4(3, 1)]
        + xm[p4(0, 0)] * xm[p4(1, 2)] * xm[p4(3, 1)]
        + xm[p4(0, 1)] * xm[p4(1, 0)] * xm[p4(3, 2)]
        - xm[p4(0, 0)] * xm[p4(1, 1)] * xm[p4(3, 2)])
        / det_val;

    om[p4(0, 3)] = (xm[p4(0, 3)] * xm[p4(1, 2)] * xm[p4(2, 1)]
        - xm[p4(0, 2)] * xm[p4(1, 3)] * xm[p4(2, 1)]
        - xm[p4(0, 3)] * xm[p4(1, 1)] * xm[p4(2, 2)]
        + xm[p4(0, 1)] * xm[p4(1, 3)] * xm[p4(2, 2)]
        + xm[p4(0, 2)] * xm[p4(1, 1)] * xm[p4(2, 3)]
        - xm[p4(0, 1)] * xm[p4(1, 2)] * xm[p4(2, 3)])
        / det_val;
    om[p4(1, 3)] = (xm[p4(0, 2)] * xm[p4(1, 3)] * xm[p4(2, 0)]
        - xm[p4(0, 3)] * xm[p4(1, 2)] * xm[p4(2, 0)]
        + xm[p4(0, 3)] * xm[p4(1, 0)] * xm[p4(2, 2)]
        - xm[p4(0, 0)] * xm[p4(1, 3)] * xm[p4(2, 2)]
        - xm[p4(0, 2)] * xm[p4(1, 0)] * xm[p4(2, 3)]
        + xm[p4(0, 0)] * xm[p4(1, 2)] * xm[p4(2, 3)])
        / det_val;
    om[p4(2, 3)] = (xm[p4(0, 3)] * xm[p4(1, 1)] * xm[p4(2, 0)]
        - xm[p4(0, 1)] * xm[p4(1, 3)] * xm[p4(2, 0)]
        - xm[p4(0, 3)] * xm[p4(1, 0)] * xm[p4(2, 1)]
        + xm[p4(0, 0)] * xm[p4(1, 3)] * xm[p4(2, 1)]
        + xm[p4(0, 1)] * xm[p4(1, 0)] * xm[p4(2, 3)]
        - xm[p4(0, 0)] * xm[p4(1, 1)] * xm[p4(2, 3)])
        / det_val;
    om[p4(3, 3)] = (xm[p4(0, 1)] * xm[p4(1, 2)] * xm[p4(2, 0)]
        - xm[p4(0, 2)] * xm[p4(1, 1)] * xm[p4(2, 0)]
        + xm[p4(0, 2)] * xm[p4(1, 0)] * xm[p4(2, 1)]
        - xm[p4(0, 0)] * xm[p4(1, 2)] * xm[p4(2, 1)]
        - xm[p4(0, 1)] * xm[p4(1, 0)] * xm[p4(2, 2)]
        + xm[p4(0, 0)] * xm[p4(1, 1)] * xm[p4(2, 2)])
        / det_val;

    let check_val = xm[p4(0, 0)] * om[p4(0, 0)]
        + xm[p4(0, 1)] * om[p4(1, 0)]
        + xm[p4(0, 2)] * om[p4(2, 0)]
        + xm[p4(0, 3)] * om[p4(3, 0)];

    (T::one() - check_val).abs() < check_tol
}
