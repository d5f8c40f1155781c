//! # minv
//!
//! **Structure-aware dense matrix inversion for Rust.**
//!
//! minv inverts square dense matrices by dispatching among specialised
//! strategies before falling back to a general LU-based inversion:
//!
//! - **Tiny fast path**: closed-form cofactor inversion for matrices up to
//!   4×4 (opt-in via [`InvOpts::FAST`](inverse::InvOpts::FAST)), with a
//!   determinant-magnitude gate and a self-consistency check against
//!   numerically unstable expansions
//! - **Diagonal fast path**: O(n) reciprocal of the diagonal
//! - **Triangular fast path**: dedicated triangular inversion, with the
//!   triangular zero pattern re-applied to the result
//! - **Symmetric-positive-definite path**: opportunistic Cholesky-based
//!   inversion on a scratch copy, falling through silently when the matrix
//!   turns out not to be positive definite
//! - **General fallback**: LU decomposition with partial pivoting
//!
//! Structure is discovered two ways: a [`StructureHint`](matrix::StructureHint)
//! tag attached to a [`Mat`](matrix::Mat) at construction (e.g. by
//! [`Mat::from_diag`](matrix::Mat::from_diag)), or a runtime scan of the zero
//! pattern. The decomposition routines sit behind the
//! [`DecompBackend`](inverse::DecompBackend) trait, so the engine can be
//! driven by an alternative backend without touching the dispatch logic.
//!
//! ## Quick Start
//!
//! ```rust
//! use minv::prelude::*;
//!
//! let a = Mat::<f64>::from_rows(2, 2, &[4.0, 7.0, 2.0, 6.0]);
//! let a_inv = inv(&a)?;
//! assert!((a_inv[(0, 0)] - 0.6).abs() < 1e-12);
//!
//! let d = Mat::<f64>::from_diag(&[2.0, 4.0]);
//! let d_inv = inv(&d)?; // diagonal fast path
//! assert_eq!(d_inv[(0, 0)], 0.5);
//! # Ok::<(), minv::error::Error>(())
//! ```
//!
//! ## Failure semantics
//!
//! Structural problems (non-square input, conflicting option flags) and
//! numerical problems (singular or non-positive-definite input) are both
//! reported through [`error::Error`]; on any `Err` no matrix is returned,
//! so callers never observe a partially-filled result.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod element;
pub mod error;
pub mod inverse;
pub mod matrix;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::element::{RealScalar, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::inverse::{
        inv, inv_rcond, inv_sympd, inv_sympd_rcond, DecompBackend, EngineConfig, InvEngine,
        InvOpts, NativeBackend,
    };
    pub use crate::matrix::{Mat, StructureHint};
}
