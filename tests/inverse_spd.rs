//! Integration tests for symmetric/hermitian positive-definite inversion

use minv::prelude::*;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_allclose(actual: &Mat<f64>, expected: &Mat<f64>, tol: f64) {
    assert_eq!(actual.nrows(), expected.nrows());
    assert_eq!(actual.ncols(), expected.ncols());

    for c in 0..actual.ncols() {
        for r in 0..actual.nrows() {
            let a = actual.at(r, c);
            let e = expected.at(r, c);
            assert!(
                (a - e).abs() <= tol,
                "mismatch at ({}, {}): {} vs {} (tol={})",
                r,
                c,
                a,
                e,
                tol
            );
        }
    }
}

fn assert_identity(m: &Mat<f64>, tol: f64) {
    let n = m.nrows();
    assert_allclose(m, &Mat::identity(n), tol);
}

/// Random SPD matrix: `B * B^T + n * I` for a random square `B`
fn random_spd(n: usize, rng: &mut StdRng) -> Mat<f64> {
    let b = Mat::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0));
    let mut a = b.matmul(&b.transpose());
    for i in 0..n {
        *a.at_mut(i, i) += n as f64;
    }
    a
}

#[test]
fn test_inv_sympd_roundtrip_3x3() {
    let a = Mat::from_rows(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);

    let inv_a = inv_sympd(&a).unwrap();

    assert_identity(&a.matmul(&inv_a), 1e-12);
    assert_identity(&inv_a.matmul(&a), 1e-12);
}

#[test]
fn test_inv_sympd_indefinite_fails() {
    // symmetric but indefinite: eigenvalues 3 and -1
    let a = Mat::from_rows(2, 2, &[1.0, 2.0, 2.0, 1.0]);

    let err = inv_sympd(&a).unwrap_err();
    assert!(matches!(err, Error::NotPositiveDefinite { .. }));
}

#[test]
fn test_inv_sympd_not_square_fails() {
    let a = Mat::<f64>::zeros(3, 2);

    let err = inv_sympd(&a).unwrap_err();
    assert!(matches!(err, Error::NotSquare { .. }));
}

#[test]
fn test_inv_sympd_diagonal_exact() {
    let a = Mat::from_diag(&[2.0, 4.0, 8.0]);

    let inv_a = inv_sympd(&a).unwrap();

    assert_eq!(inv_a.at(0, 0), 0.5);
    assert_eq!(inv_a.at(1, 1), 0.25);
    assert_eq!(inv_a.at(2, 2), 0.125);
    assert_eq!(inv_a.hint(), StructureHint::Diagonal);
}

#[test]
fn test_inv_sympd_diagonal_negative_entry_fails() {
    // invertible, but not positive definite; inv_sympd must reject where
    // plain inv would succeed
    let a = Mat::from_diag(&[2.0, -4.0]);

    let err = inv_sympd(&a).unwrap_err();
    assert!(matches!(err, Error::NotPositiveDefinite { .. }));

    assert!(inv(&a).is_ok());
}

#[test]
fn test_inv_sympd_fast_1x1() {
    let engine = InvEngine::new();
    let a = Mat::from_rows(1, 1, &[4.0]);

    let inv_a = engine.invert_spd(&a, InvOpts::FAST).unwrap();
    assert_eq!(inv_a.at(0, 0), 0.25);
}

#[test]
fn test_inv_sympd_fast_2x2_exact() {
    let engine = InvEngine::new();
    let a = Mat::from_rows(2, 2, &[4.0, 1.0, 1.0, 3.0]);

    let inv_a = engine.invert_spd(&a, InvOpts::FAST).unwrap();

    // det = 11
    assert!((inv_a.at(0, 0) - 3.0 / 11.0).abs() < 1e-14);
    assert!((inv_a.at(0, 1) + 1.0 / 11.0).abs() < 1e-14);
    assert!((inv_a.at(1, 0) + 1.0 / 11.0).abs() < 1e-14);
    assert!((inv_a.at(1, 1) - 4.0 / 11.0).abs() < 1e-14);
}

#[test]
fn test_inv_sympd_fast_matches_cholesky() {
    let engine = InvEngine::new();
    let mut rng = StdRng::seed_from_u64(7);

    for n in 1..=4 {
        let a = random_spd(n, &mut rng);

        let fast = engine.invert_spd(&a, InvOpts::FAST).unwrap();
        let cholesky = engine.invert_spd(&a, InvOpts::NONE).unwrap();

        assert_allclose(&fast, &cholesky, 1e-10);
    }
}

#[test]
fn test_inv_sympd_fast_indefinite_fails() {
    let engine = InvEngine::new();

    // positive diagonal with the max modulus on it, but det < 0; the tiny
    // pre-checks reject and Cholesky fails as well
    let a = Mat::from_rows(2, 2, &[2.0, 2.0, 2.0, 1.0]);

    let err = engine.invert_spd(&a, InvOpts::FAST).unwrap_err();
    assert!(matches!(err, Error::NotPositiveDefinite { .. }));
}

#[test]
fn test_inv_sympd_ignored_flags_accepted() {
    let engine = InvEngine::new();
    let a = Mat::from_rows(2, 2, &[4.0, 1.0, 1.0, 3.0]);

    // likely_sympd/no_sympd carry no meaning here but are not an error
    let inv_a = engine
        .invert_spd(&a, InvOpts::LIKELY_SYMPD | InvOpts::NO_SYMPD)
        .unwrap();
    assert_identity(&a.matmul(&inv_a), 1e-12);
}

#[test]
fn test_inv_sympd_empty() {
    let a = Mat::<f64>::zeros(0, 0);

    let inv_a = inv_sympd(&a).unwrap();
    assert_eq!(inv_a.nrows(), 0);
    assert_eq!(inv_a.ncols(), 0);
}

#[test]
fn test_inv_sympd_complex_hermitian() {
    let i = Complex64::new(0.0, 1.0);
    let one = Complex64::new(1.0, 0.0);

    // hermitian positive definite, det = 4
    let a = Mat::from_rows(
        2,
        2,
        &[
            2.0 * one,
            one - i, //
            one + i,
            3.0 * one,
        ],
    );

    let inv_a = inv_sympd(&a).unwrap();

    let expected = [
        (0, 0, Complex64::new(0.75, 0.0)),
        (0, 1, Complex64::new(-0.25, 0.25)),
        (1, 0, Complex64::new(-0.25, -0.25)),
        (1, 1, Complex64::new(0.5, 0.0)),
    ];
    for (r, c, e) in expected {
        assert!(
            (inv_a.at(r, c) - e).norm() < 1e-12,
            "mismatch at ({}, {}): {} vs {}",
            r,
            c,
            inv_a.at(r, c),
            e
        );
    }
}

#[test]
fn test_inv_sympd_complex_indefinite_fails() {
    let i = Complex64::new(0.0, 1.0);
    let one = Complex64::new(1.0, 0.0);

    // hermitian but indefinite: det = 1 - |5+i|^2 < 0
    let a = Mat::from_rows(2, 2, &[one, 5.0 * one + i, 5.0 * one - i, one]);

    let err = inv_sympd(&a).unwrap_err();
    assert!(matches!(err, Error::NotPositiveDefinite { .. }));
}

#[test]
fn test_inv_sympd_imag_diagonal_is_advisory() {
    let i = Complex64::new(0.0, 1.0);
    let one = Complex64::new(1.0, 0.0);

    // non-real diagonal entries draw a debug warning but never block
    // inv_sympd; the Cholesky delegate reads only the real diagonal parts
    // and the lower half
    let a = Mat::from_rows(
        2,
        2,
        &[Complex64::new(2.0, 0.5), one - i, one + i, 3.0 * one],
    );
    let b = Mat::from_rows(2, 2, &[2.0 * one, one - i, one + i, 3.0 * one]);

    let inv_a = inv_sympd(&a).unwrap();
    let inv_b = inv_sympd(&b).unwrap();

    for r in 0..2 {
        for c in 0..2 {
            assert!((inv_a.at(r, c) - inv_b.at(r, c)).norm() < 1e-14);
        }
    }
}

#[test]
fn test_inv_sympd_rcond_diagonal() {
    let a = Mat::<f64>::from_diag(&[2.0, 4.0]);

    let (inv_a, rcond) = inv_sympd_rcond(&a).unwrap();
    assert_eq!(inv_a.at(0, 0), 0.5);
    assert_eq!(inv_a.at(1, 1), 0.25);
    assert!((rcond - 0.5).abs() < 1e-15);
}

#[test]
fn test_inv_sympd_rcond_general() {
    let a = Mat::from_rows(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);

    let (inv_a, rcond) = inv_sympd_rcond(&a).unwrap();

    assert_identity(&a.matmul(&inv_a), 1e-12);
    assert!(rcond > 0.0);
    assert!(rcond <= 1.0);
}

#[test]
fn test_inv_sympd_rcond_indefinite_fails() {
    let a = Mat::from_rows(2, 2, &[1.0, 2.0, 2.0, 1.0]);

    let err = inv_sympd_rcond(&a).unwrap_err();
    assert!(matches!(err, Error::NotPositiveDefinite { .. }));
}

#[test]
fn test_inv_sympd_rcond_complex_imag_diagonal_fails() {
    let one = Complex64::new(1.0, 0.0);

    // a diagonal entry with a non-negligible imaginary part cannot belong
    // to a hermitian positive-definite matrix
    let a = Mat::from_rows(
        2,
        2,
        &[Complex64::new(2.0, 0.5), one, one, 3.0 * one],
    );

    let err = inv_sympd_rcond(&a).unwrap_err();
    assert!(matches!(err, Error::NotPositiveDefinite { .. }));
}

#[test]
fn test_inv_sympd_rcond_complex_hermitian() {
    let i = Complex64::new(0.0, 1.0);
    let one = Complex64::new(1.0, 0.0);

    let a = Mat::from_rows(
        2,
        2,
        &[
            2.0 * one,
            one - i, //
            one + i,
            3.0 * one,
        ],
    );

    let (inv_a, rcond) = inv_sympd_rcond(&a).unwrap();

    let prod = a.matmul(&inv_a);
    for r in 0..2 {
        for c in 0..2 {
            let e = if r == c { one } else { Complex64::new(0.0, 0.0) };
            assert!((prod.at(r, c) - e).norm() < 1e-12);
        }
    }
    assert!(rcond > 0.0);
    assert!(rcond <= 1.0);
}

#[test]
fn test_inv_sympd_random() {
    let mut rng = StdRng::seed_from_u64(99);

    for n in [1, 2, 3, 5, 8, 12] {
        let a = random_spd(n, &mut rng);

        let inv_a = inv_sympd(&a).unwrap();
        assert_identity(&a.matmul(&inv_a), 1e-9);
        assert_identity(&inv_a.matmul(&a), 1e-9);
    }
}

#[test]
fn test_inv_sympd_matches_inv() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = random_spd(6, &mut rng);

    let via_sympd = inv_sympd(&a).unwrap();
    let via_gen = InvEngine::new().invert(&a, InvOpts::NO_SYMPD).unwrap();

    assert_allclose(&via_sympd, &via_gen, 1e-9);
}
