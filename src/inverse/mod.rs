//! Matrix inversion engine
//!
//! [`InvEngine`] decides among five strategies for a square matrix, in
//! priority order: closed-form tiny inverse (opt-in, size <= 4, real
//! element types), diagonal reciprocal, triangular substitution,
//! opportunistic Cholesky for matrices that look symmetric positive
//! definite, and a general LU fallback. The first matching strategy wins;
//! the tiny and Cholesky attempts fall through silently when their
//! numerical gates reject.
//!
//! Each call is synchronous and self-contained: scratch buffers live on the
//! call stack frame, nothing is retained across calls, and a failed attempt
//! never leaks a partial result.

pub mod backend;
pub mod detect;
pub mod tiny;

#[cfg(test)]
mod tests;

pub use backend::{DecompBackend, NativeBackend};

use crate::element::{RealScalar, Scalar};
use crate::error::{Error, Result};
use crate::matrix::{Mat, StructureHint};
use std::ops::{BitOr, BitOrAssign};

/// Option flags steering the inversion dispatch
///
/// Flags combine with `|`. `LIKELY_SYMPD` and `NO_SYMPD` are mutually
/// exclusive; combining them is a structural error.
///
/// ```rust
/// use minv::inverse::InvOpts;
///
/// let opts = InvOpts::FAST | InvOpts::NO_SYMPD;
/// assert!(opts.contains(InvOpts::FAST));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvOpts(u32);

impl InvOpts {
    /// No options
    pub const NONE: InvOpts = InvOpts(0);
    /// Allow the closed-form fast path for matrices up to 4x4
    pub const FAST: InvOpts = InvOpts(1 << 0);
    /// Treat the matrix as upper triangular without scanning it
    pub const TRIU: InvOpts = InvOpts(1 << 1);
    /// Treat the matrix as lower triangular without scanning it
    pub const TRIL: InvOpts = InvOpts(1 << 2);
    /// Hint that the matrix is probably symmetric positive definite
    pub const LIKELY_SYMPD: InvOpts = InvOpts(1 << 3);
    /// Never take the triangular fast path
    pub const NO_TRIMAT: InvOpts = InvOpts(1 << 4);
    /// Never attempt the symmetric-positive-definite path
    pub const NO_SYMPD: InvOpts = InvOpts(1 << 5);

    /// Whether every flag in `other` is set in `self`
    #[inline]
    pub const fn contains(self, other: InvOpts) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for InvOpts {
    type Output = InvOpts;

    #[inline]
    fn bitor(self, rhs: InvOpts) -> InvOpts {
        InvOpts(self.0 | rhs.0)
    }
}

impl BitOrAssign for InvOpts {
    #[inline]
    fn bitor_assign(&mut self, rhs: InvOpts) {
        self.0 |= rhs.0;
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Attempt the opportunistic Cholesky path for matrices that look
    /// symmetric positive definite (heuristic or `LIKELY_SYMPD` hint)
    pub optimise_sympd: bool,

    /// Tolerance for the tiny fast path's self-consistency check.
    /// `None` selects the precision default: `1e-4` in single precision,
    /// `1e-10` in double precision. Empirically chosen; see the tiny
    /// module docs.
    pub tiny_check_tol: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            optimise_sympd: true,
            tiny_check_tol: None,
        }
    }
}

/// Structure-aware matrix inversion engine
///
/// Stateless across calls: the engine owns only its backend and
/// configuration, never a reference to caller data.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvEngine<B = NativeBackend> {
    backend: B,
    config: EngineConfig,
}

impl InvEngine<NativeBackend> {
    /// Engine with the native backend and default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the native backend and the given configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            backend: NativeBackend::new(),
            config,
        }
    }
}

impl<B: DecompBackend> InvEngine<B> {
    /// Engine with a custom decomposition backend
    pub fn with_backend(backend: B, config: EngineConfig) -> Self {
        Self { backend, config }
    }

    /// The decomposition backend in use
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Invert a general square matrix
    ///
    /// Dispatches in priority order: tiny closed form (with
    /// [`InvOpts::FAST`], size <= 4, real elements), diagonal, triangular,
    /// opportunistic symmetric-positive-definite, general LU. Structural
    /// errors are rejected before any numeric work.
    pub fn invert<T: Scalar>(&self, a: &Mat<T>, opts: InvOpts) -> Result<Mat<T>> {
        const OP: &str = "inv()";

        let fast = opts.contains(InvOpts::FAST);
        let likely_sympd = opts.contains(InvOpts::LIKELY_SYMPD);
        let no_trimat = opts.contains(InvOpts::NO_TRIMAT);
        let no_sympd = opts.contains(InvOpts::NO_SYMPD);

        if no_sympd && likely_sympd {
            return Err(Error::conflicting_options(OP, "no_sympd", "likely_sympd"));
        }

        let n = validate_square(OP, a)?;

        if fast && n <= 4 && !T::IS_COMPLEX {
            let mut tmp = Mat::zeros(n, n);
            if tiny::inv_tiny_noalias(&mut tmp, a, self.tiny_tol::<T>()) {
                return Ok(tmp);
            }
            // fall through if the closed form was rejected
        }

        if a.hint() == StructureHint::Diagonal || detect::is_diagmat(a) {
            return invert_diag(a).ok_or(Error::Singular { op: OP });
        }

        let hint_triu = !no_trimat && (opts.contains(InvOpts::TRIU) || a.hint() == StructureHint::UpperTriangular);
        let hint_tril = !no_trimat
            && !hint_triu
            && (opts.contains(InvOpts::TRIL) || a.hint() == StructureHint::LowerTriangular);

        let (det_triu, det_tril) = if no_trimat || hint_triu || hint_tril {
            (false, false)
        } else {
            let u = detect::is_triu(a);
            let l = if u { false } else { detect::is_tril(a) };
            (u, l)
        };

        if hint_triu || hint_tril || det_triu || det_tril {
            let upper = hint_triu || det_triu;
            let mut out = a.clone();
            if !self.backend.triangular_invert(&mut out, !upper) {
                return Err(Error::Singular { op: OP });
            }
            // re-apply the triangular view so round-off cannot introduce
            // spurious entries on the zero side
            return Ok(if upper { out.triu() } else { out.tril() });
        }

        let try_sympd =
            self.config.optimise_sympd && !no_sympd && (likely_sympd || detect::guess_sympd(a));

        if try_sympd {
            let mut tmp = a.clone();
            if self.backend.cholesky_invert(&mut tmp) {
                return Ok(tmp);
            }
            // not actually positive definite; the scratch copy is dropped
            // and the general path takes over
        }

        let mut out = a.clone();
        if self.backend.lu_invert(&mut out) {
            Ok(out)
        } else {
            Err(Error::Singular { op: OP })
        }
    }

    /// Invert a symmetric/hermitian positive-definite matrix
    ///
    /// Narrower dispatch than [`invert`](Self::invert): diagonal fast path
    /// (strictly positive real diagonal), tiny closed form guarded by
    /// positive-diagonal and max-on-diagonal pre-checks, Cholesky
    /// otherwise. `LIKELY_SYMPD` and `NO_SYMPD` are accepted but ignored
    /// here. Debug builds emit advisory warnings for a failed rudimentary
    /// symmetry check and, for complex types, non-negligible imaginary
    /// parts on the diagonal; warnings never block the computation.
    pub fn invert_spd<T: Scalar>(&self, a: &Mat<T>, opts: InvOpts) -> Result<Mat<T>> {
        const OP: &str = "inv_sympd()";

        let fast = opts.contains(InvOpts::FAST);

        if opts.contains(InvOpts::LIKELY_SYMPD) {
            debug_warn("inv_sympd(): option 'likely_sympd' ignored");
        }
        if opts.contains(InvOpts::NO_SYMPD) {
            debug_warn("inv_sympd(): option 'no_sympd' ignored");
        }

        let n = validate_square(OP, a)?;

        if cfg!(debug_assertions) && !detect::rudimentary_sym_check(a) {
            if T::IS_COMPLEX {
                debug_warn("inv_sympd(): given matrix is not hermitian");
            } else {
                debug_warn("inv_sympd(): given matrix is not symmetric");
            }
        }

        if cfg!(debug_assertions) && T::IS_COMPLEX {
            let tol = T::Real::from_f64(100.0) * T::Real::epsilon();
            for i in 0..n {
                if a.at(i, i).im().abs() > tol {
                    debug_warn("inv_sympd(): imaginary components on diagonal are non-zero");
                    break;
                }
            }
        }

        if !T::IS_COMPLEX && (a.hint() == StructureHint::Diagonal || detect::is_diagmat(a)) {
            return invert_diag_spd(a).ok_or(Error::NotPositiveDefinite { op: OP });
        }

        if !T::IS_COMPLEX && n <= 4 && fast {
            if let Some(out) = self.try_tiny_spd(a) {
                return Ok(out);
            }
            // fall through if the pre-checks or the closed form rejected
        }

        let mut out = a.clone();
        if self.backend.cholesky_invert(&mut out) {
            Ok(out)
        } else {
            Err(Error::NotPositiveDefinite { op: OP })
        }
    }

    /// Invert a general square matrix and estimate its reciprocal
    /// condition number
    ///
    /// Same dispatch structure as [`invert`](Self::invert) minus the
    /// opt-in fast paths; the diagonal path computes the estimate directly
    /// as `1 / (max|d| * max|1/d|)`.
    pub fn invert_rcond<T: Scalar>(&self, a: &Mat<T>) -> Result<(Mat<T>, T::Real)> {
        const OP: &str = "inv()";

        let _ = validate_square(OP, a)?;

        if a.hint() == StructureHint::Diagonal || detect::is_diagmat(a) {
            return invert_diag_rcond(a).ok_or(Error::Singular { op: OP });
        }

        let hint_triu = a.hint() == StructureHint::UpperTriangular;
        let hint_tril = a.hint() == StructureHint::LowerTriangular;

        let (det_triu, det_tril) = if hint_triu || hint_tril {
            (false, false)
        } else {
            let u = detect::is_triu(a);
            let l = if u { false } else { detect::is_tril(a) };
            (u, l)
        };

        if hint_triu || hint_tril || det_triu || det_tril {
            let upper = hint_triu || det_triu;
            let mut out = a.clone();
            return match self.backend.triangular_invert_rcond(&mut out, !upper) {
                Some(rcond) => Ok((if upper { out.triu() } else { out.tril() }, rcond)),
                None => Err(Error::Singular { op: OP }),
            };
        }

        let mut out = a.clone();
        match self.backend.lu_invert_rcond(&mut out) {
            Some(rcond) => Ok((out, rcond)),
            None => Err(Error::Singular { op: OP }),
        }
    }

    /// Invert a symmetric/hermitian positive-definite matrix and estimate
    /// its reciprocal condition number
    ///
    /// For complex types, diagonal entries with a non-negligible imaginary
    /// part (beyond `100 * eps`) are a numerical failure: such a matrix
    /// cannot be hermitian positive definite.
    pub fn invert_spd_rcond<T: Scalar>(&self, a: &Mat<T>) -> Result<(Mat<T>, T::Real)> {
        const OP: &str = "inv_sympd()";

        let n = validate_square(OP, a)?;

        if cfg!(debug_assertions) && !detect::rudimentary_sym_check(a) {
            if T::IS_COMPLEX {
                debug_warn("inv_sympd(): given matrix is not hermitian");
            } else {
                debug_warn("inv_sympd(): given matrix is not symmetric");
            }
        }

        if T::IS_COMPLEX {
            let tol = T::Real::from_f64(100.0) * T::Real::epsilon();

            for i in 0..n {
                if a.at(i, i).im().abs() > tol {
                    return Err(Error::NotPositiveDefinite { op: OP });
                }
            }
        }

        if a.hint() == StructureHint::Diagonal || detect::is_diagmat(a) {
            return invert_diag_spd_rcond(a).ok_or(Error::NotPositiveDefinite { op: OP });
        }

        let mut out = a.clone();
        match self.backend.cholesky_invert_rcond(&mut out) {
            Some(rcond) => Ok((out, rcond)),
            None => Err(Error::NotPositiveDefinite { op: OP }),
        }
    }

    /// Tiny SPD fast path: pre-checks plus the shared closed form
    ///
    /// The closed form itself does not care about positive definiteness,
    /// so it is gated on necessary SPD conditions first: strictly positive
    /// diagonal and no modulus exceeding the diagonal maximum.
    fn try_tiny_spd<T: Scalar>(&self, a: &Mat<T>) -> Option<Mat<T>> {
        let n = a.nrows();
        let zero = <T::Real as Scalar>::zero();

        let mut max_diag = zero;
        for i in 0..n {
            let d = a.at(i, i).re();
            if d <= zero {
                return None;
            }
            if d > max_diag {
                max_diag = d;
            }
        }

        for c in 0..n {
            for r in c..n {
                if a.at(r, c).abs() > max_diag {
                    return None;
                }
            }
        }

        // both leading principal minors must be positive for 2x2 input
        if n == 2 && tiny::det_tiny(a).re() <= zero {
            return None;
        }

        let mut tmp = Mat::zeros(n, n);
        if tiny::inv_tiny_noalias(&mut tmp, a, self.tiny_tol::<T>()) {
            Some(tmp)
        } else {
            None
        }
    }

    fn tiny_tol<T: Scalar>(&self) -> T::Real {
        let default = if T::Real::epsilon().to_f64() > 1e-10 {
            1e-4
        } else {
            1e-10
        };
        T::Real::from_f64(self.config.tiny_check_tol.unwrap_or(default))
    }
}

/// Invert a general square matrix with default options
///
/// Convenience entry point over a default [`InvEngine`]. See
/// [`InvEngine::invert`].
pub fn inv<T: Scalar>(a: &Mat<T>) -> Result<Mat<T>> {
    InvEngine::new().invert(a, InvOpts::NONE)
}

/// Invert a symmetric/hermitian positive-definite matrix with default
/// options
///
/// Convenience entry point over a default [`InvEngine`]. See
/// [`InvEngine::invert_spd`].
pub fn inv_sympd<T: Scalar>(a: &Mat<T>) -> Result<Mat<T>> {
    InvEngine::new().invert_spd(a, InvOpts::NONE)
}

/// Invert a general square matrix and estimate its reciprocal condition
/// number
pub fn inv_rcond<T: Scalar>(a: &Mat<T>) -> Result<(Mat<T>, T::Real)> {
    InvEngine::new().invert_rcond(a)
}

/// Invert a symmetric/hermitian positive-definite matrix and estimate its
/// reciprocal condition number
pub fn inv_sympd_rcond<T: Scalar>(a: &Mat<T>) -> Result<(Mat<T>, T::Real)> {
    InvEngine::new().invert_spd_rcond(a)
}

fn validate_square<T: Scalar>(op: &'static str, a: &Mat<T>) -> Result<usize> {
    if !a.is_square() {
        return Err(Error::not_square(op, a.nrows(), a.ncols()));
    }
    Ok(a.nrows())
}

/// Advisory diagnostic; debug builds only, never affects results
fn debug_warn(msg: &str) {
    if cfg!(debug_assertions) {
        eprintln!("warning: {msg}");
    }
}

fn invert_diag<T: Scalar>(a: &Mat<T>) -> Option<Mat<T>> {
    let n = a.nrows();
    let mut out = a.clone();

    {
        let data = out.as_mut_slice();
        for i in 0..n {
            let src = data[i + i * n];
            if src == T::zero() {
                return None;
            }
            data[i + i * n] = T::one() / src;
        }
    }

    out.set_hint(StructureHint::Diagonal);
    Some(out)
}

fn invert_diag_spd<T: Scalar>(a: &Mat<T>) -> Option<Mat<T>> {
    let n = a.nrows();
    let zero = <T::Real as Scalar>::zero();
    let mut out = a.clone();

    {
        let data = out.as_mut_slice();
        for i in 0..n {
            let re = data[i + i * n].re();
            if re <= zero {
                return None;
            }
            data[i + i * n] = T::from_real(<T::Real as Scalar>::one() / re);
        }
    }

    out.set_hint(StructureHint::Diagonal);
    Some(out)
}

fn invert_diag_rcond<T: Scalar>(a: &Mat<T>) -> Option<(Mat<T>, T::Real)> {
    let n = a.nrows();
    let zero = <T::Real as Scalar>::zero();
    let mut out = a.clone();

    let mut max_abs_src = zero;
    let mut max_abs_inv = zero;

    {
        let data = out.as_mut_slice();
        for i in 0..n {
            let src = data[i + i * n];
            if src == T::zero() {
                return None;
            }
            let inv = T::one() / src;
            data[i + i * n] = inv;

            if src.abs() > max_abs_src {
                max_abs_src = src.abs();
            }
            if inv.abs() > max_abs_inv {
                max_abs_inv = inv.abs();
            }
        }
    }

    out.set_hint(StructureHint::Diagonal);

    let rcond = if n == 0 {
        zero
    } else {
        <T::Real as Scalar>::one() / (max_abs_src * max_abs_inv)
    };

    Some((out, rcond))
}

fn invert_diag_spd_rcond<T: Scalar>(a: &Mat<T>) -> Option<(Mat<T>, T::Real)> {
    let n = a.nrows();
    let zero = <T::Real as Scalar>::zero();
    let mut out = a.clone();

    let mut max_abs_src = zero;
    let mut max_abs_inv = zero;

    {
        let data = out.as_mut_slice();
        for i in 0..n {
            let src = data[i + i * n];
            if src == T::zero() || src.re() <= zero {
                return None;
            }
            let inv = T::one() / src;
            data[i + i * n] = inv;

            if src.abs() > max_abs_src {
                max_abs_src = src.abs();
            }
            if inv.abs() > max_abs_inv {
                max_abs_inv = inv.abs();
            }
        }
    }

    out.set_hint(StructureHint::Diagonal);

    let rcond = if n == 0 {
        zero
    } else {
        <T::Real as Scalar>::one() / (max_abs_src * max_abs_inv)
    };

    Some((out, rcond))
}
