//! Tests for the structure detector, the tiny closed forms, and the
//! native decomposition backend

use super::backend::{DecompBackend, NativeBackend};
use super::{detect, tiny};
use crate::matrix::Mat;

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "{} vs {} (tol={})", a, b, tol);
}

// ------------------------------------------------------------------------
// detect
// ------------------------------------------------------------------------

#[test]
fn test_is_diagmat() {
    let d = Mat::<f64>::from_rows(2, 2, &[2.0, 0.0, 0.0, 4.0]);
    assert!(detect::is_diagmat(&d));

    let m = Mat::<f64>::from_rows(2, 2, &[2.0, 1.0, 0.0, 4.0]);
    assert!(!detect::is_diagmat(&m));
}

#[test]
fn test_is_triu_tril() {
    let u = Mat::<f64>::from_rows(3, 3, &[1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 0.0, 0.0, 6.0]);
    assert!(detect::is_triu(&u));
    assert!(!detect::is_tril(&u));

    let l = u.transpose();
    assert!(detect::is_tril(&l));
    assert!(!detect::is_triu(&l));

    // diagonal matrices satisfy both zero patterns
    let d = Mat::<f64>::from_diag(&[1.0, 2.0]);
    assert!(detect::is_triu(&d));
    assert!(detect::is_tril(&d));
}

#[test]
fn test_guess_sympd_accepts_spd() {
    let a = Mat::<f64>::from_rows(2, 2, &[4.0, 1.0, 1.0, 3.0]);
    assert!(detect::guess_sympd(&a));
}

#[test]
fn test_guess_sympd_rejects() {
    // not symmetric
    let a = Mat::<f64>::from_rows(2, 2, &[4.0, 1.0, 2.0, 3.0]);
    assert!(!detect::guess_sympd(&a));

    // negative diagonal entry
    let b = Mat::<f64>::from_rows(2, 2, &[-4.0, 1.0, 1.0, 3.0]);
    assert!(!detect::guess_sympd(&b));

    // max modulus off the diagonal
    let c = Mat::<f64>::from_rows(2, 2, &[1.0, 5.0, 5.0, 1.0]);
    assert!(!detect::guess_sympd(&c));
}

#[test]
fn test_rudimentary_sym_check() {
    let a = Mat::<f64>::from_rows(3, 3, &[2.0, 1.0, 0.5, 1.0, 3.0, 1.0, 0.5, 1.0, 2.0]);
    assert!(detect::rudimentary_sym_check(&a));

    let b = Mat::<f64>::from_rows(3, 3, &[2.0, 1.0, 9.0, 1.0, 3.0, 1.0, 0.5, 1.0, 2.0]);
    assert!(!detect::rudimentary_sym_check(&b));
}

// ------------------------------------------------------------------------
// tiny
// ------------------------------------------------------------------------

#[test]
fn test_det_tiny() {
    let a1 = Mat::<f64>::from_rows(1, 1, &[7.0]);
    assert_close(tiny::det_tiny(&a1), 7.0, 1e-14);

    let a2 = Mat::<f64>::from_rows(2, 2, &[4.0, 7.0, 2.0, 6.0]);
    assert_close(tiny::det_tiny(&a2), 10.0, 1e-14);

    let a3 = Mat::<f64>::from_rows(3, 3, &[2.0, 0.0, 1.0, 1.0, 3.0, 2.0, 1.0, 1.0, 4.0]);
    // 2*(12-2) - 0 + 1*(1-3) = 18
    assert_close(tiny::det_tiny(&a3), 18.0, 1e-12);

    let a4 = Mat::<f64>::from_rows(
        4,
        4,
        &[
            1.0, 0.0, 2.0, 0.0, //
            0.0, 3.0, 0.0, 1.0, //
            2.0, 0.0, 5.0, 0.0, //
            0.0, 1.0, 0.0, 2.0, //
        ],
    );
    // block determinant: (1*5 - 2*2) * (3*2 - 1*1) = 5
    assert_close(tiny::det_tiny(&a4), 5.0, 1e-12);
}

#[test]
fn test_inv_tiny_2x2() {
    let a = Mat::<f64>::from_rows(2, 2, &[4.0, 7.0, 2.0, 6.0]);
    let mut out = Mat::<f64>::zeros(2, 2);

    assert!(tiny::inv_tiny_noalias(&mut out, &a, 1e-10));
    assert_close(out[(0, 0)], 0.6, 1e-12);
    assert_close(out[(0, 1)], -0.7, 1e-12);
    assert_close(out[(1, 0)], -0.2, 1e-12);
    assert_close(out[(1, 1)], 0.4, 1e-12);
}

#[test]
fn test_inv_tiny_rejects_singular() {
    let a = Mat::<f64>::from_rows(2, 2, &[1.0, 2.0, 2.0, 4.0]);
    let mut out = Mat::<f64>::zeros(2, 2);

    assert!(!tiny::inv_tiny_noalias(&mut out, &a, 1e-10));
}

#[test]
fn test_inv_tiny_identity_3x3() {
    let a = Mat::<f64>::from_rows(3, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    let mut out = Mat::<f64>::zeros(3, 3);

    assert!(tiny::inv_tiny_noalias(&mut out, &a, 1e-10));
    for r in 0..3 {
        for c in 0..3 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert_close(out[(r, c)], expected, 1e-14);
        }
    }
}

#[test]
fn test_inv_tiny_4x4_roundtrip() {
    let a = Mat::<f64>::from_rows(
        4,
        4,
        &[
            4.0, 1.0, 0.0, 2.0, //
            1.0, 5.0, 1.0, 0.0, //
            0.0, 1.0, 6.0, 1.0, //
            2.0, 0.0, 1.0, 7.0, //
        ],
    );
    let mut out = Mat::<f64>::zeros(4, 4);

    assert!(tiny::inv_tiny_noalias(&mut out, &a, 1e-10));

    let prod = a.matmul(&out);
    for r in 0..4 {
        for c in 0..4 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert_close(prod[(r, c)], expected, 1e-10);
        }
    }
}

// ------------------------------------------------------------------------
// backend
// ------------------------------------------------------------------------

#[test]
fn test_lu_invert_3x3() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(3, 3, &[2.0, 0.0, 1.0, 1.0, 3.0, 2.0, 1.0, 1.0, 4.0]);
    let src = a.clone();

    assert!(backend.lu_invert(&mut a));

    let prod = src.matmul(&a);
    for r in 0..3 {
        for c in 0..3 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert_close(prod[(r, c)], expected, 1e-12);
        }
    }
}

#[test]
fn test_lu_invert_singular() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]);
    assert!(!backend.lu_invert(&mut a));
}

#[test]
fn test_cholesky_invert_spd() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);
    let src = a.clone();

    assert!(backend.cholesky_invert(&mut a));

    let prod = src.matmul(&a);
    for r in 0..3 {
        for c in 0..3 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert_close(prod[(r, c)], expected, 1e-12);
        }
    }
}

#[test]
fn test_cholesky_invert_rejects_indefinite() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(2, 2, &[1.0, 2.0, 2.0, 1.0]);
    assert!(!backend.cholesky_invert(&mut a));
}

#[test]
fn test_triangular_invert_upper() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(3, 3, &[2.0, 1.0, 3.0, 0.0, 4.0, 5.0, 0.0, 0.0, 8.0]);
    let src = a.clone();

    assert!(backend.triangular_invert(&mut a, false));

    let prod = src.matmul(&a);
    for r in 0..3 {
        for c in 0..3 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert_close(prod[(r, c)], expected, 1e-12);
        }
    }

    // the inverse of an upper triangular matrix is upper triangular
    assert_close(a[(1, 0)], 0.0, 0.0);
    assert_close(a[(2, 0)], 0.0, 0.0);
    assert_close(a[(2, 1)], 0.0, 0.0);
}

#[test]
fn test_triangular_invert_lower() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(3, 3, &[2.0, 0.0, 0.0, 1.0, 4.0, 0.0, 3.0, 5.0, 8.0]);
    let src = a.clone();

    assert!(backend.triangular_invert(&mut a, true));

    let prod = src.matmul(&a);
    for r in 0..3 {
        for c in 0..3 {
            let expected = if r == c { 1.0 } else { 0.0 };
            assert_close(prod[(r, c)], expected, 1e-12);
        }
    }
}

#[test]
fn test_triangular_invert_zero_diag() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(2, 2, &[2.0, 1.0, 0.0, 0.0]);
    assert!(!backend.triangular_invert(&mut a, false));
}

#[test]
fn test_lu_invert_rcond_identity() {
    let backend = NativeBackend::new();

    let mut a = Mat::<f64>::from_rows(2, 2, &[1.0, 0.0, 0.0, 1.0]);
    let rcond = backend.lu_invert_rcond(&mut a).unwrap();
    assert_close(rcond, 1.0, 1e-12);
}

#[test]
fn test_det_tiny_via_backend() {
    let backend = NativeBackend::new();

    let a = Mat::<f64>::from_rows(2, 2, &[4.0, 7.0, 2.0, 6.0]);
    assert_close(backend.det_tiny(&a), 10.0, 1e-14);
}
