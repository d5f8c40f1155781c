//! Scalar element traits for real and complex matrix entries
//!
//! [`Scalar`] connects the generic inversion routines to concrete element
//! types. It is implemented for `f32`, `f64` and their `num_complex`
//! counterparts. [`RealScalar`] marks the real subset and carries the
//! precision-dependent quantities (machine epsilon, f64 conversions) that
//! the engine's tolerances are built from.

use num_complex::Complex;
use num_traits::Float;
use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for types that can be elements of a matrix
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - Arithmetic operators with `Output = Self`
/// - `PartialEq` - exact-zero tests in the structure detector
pub trait Scalar:
    Copy
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + PartialEq
    + Debug
    + Display
{
    /// The real type underlying this scalar (`Self` for real types)
    type Real: RealScalar;

    /// Whether this scalar type is complex-valued
    const IS_COMPLEX: bool;

    /// Additive identity
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    /// Lift a real value into this scalar type (imaginary part zero)
    fn from_real(re: Self::Real) -> Self;

    /// Real part
    fn re(self) -> Self::Real;

    /// Imaginary part (zero for real types)
    fn im(self) -> Self::Real;

    /// Absolute value / complex modulus
    fn abs(self) -> Self::Real;

    /// Complex conjugate (identity for real types)
    fn conj(self) -> Self;
}

/// Real floating-point scalars
///
/// Extends [`Scalar`] with ordering and the conversions used to express
/// tolerances independently of precision.
pub trait RealScalar: Scalar<Real = Self> + PartialOrd {
    /// Machine epsilon for this type
    fn epsilon() -> Self;

    /// Square root
    fn sqrt(self) -> Self;

    /// Convert from f64
    fn from_f64(v: f64) -> Self;

    /// Convert to f64
    fn to_f64(self) -> f64;
}

macro_rules! impl_real_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            type Real = $t;

            const IS_COMPLEX: bool = false;

            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn one() -> Self {
                1.0
            }
            #[inline]
            fn from_real(re: Self::Real) -> Self {
                re
            }
            #[inline]
            fn re(self) -> Self::Real {
                self
            }
            #[inline]
            fn im(self) -> Self::Real {
                0.0
            }
            #[inline]
            fn abs(self) -> Self::Real {
                <$t>::abs(self)
            }
            #[inline]
            fn conj(self) -> Self {
                self
            }
        }

        impl RealScalar for $t {
            #[inline]
            fn epsilon() -> Self {
                <$t>::EPSILON
            }
            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }
            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);

impl<T> Scalar for Complex<T>
where
    T: RealScalar + Float,
{
    type Real = T;

    const IS_COMPLEX: bool = true;

    #[inline]
    fn zero() -> Self {
        Complex::new(<T as Scalar>::zero(), <T as Scalar>::zero())
    }
    #[inline]
    fn one() -> Self {
        Complex::new(<T as Scalar>::one(), <T as Scalar>::zero())
    }
    #[inline]
    fn from_real(re: Self::Real) -> Self {
        Complex::new(re, <T as Scalar>::zero())
    }
    #[inline]
    fn re(self) -> Self::Real {
        self.re
    }
    #[inline]
    fn im(self) -> Self::Real {
        self.im
    }
    #[inline]
    fn abs(self) -> Self::Real {
        self.norm()
    }
    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }
}
