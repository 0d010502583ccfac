//! Multivariate polynomials and their factorization.
//!
//! Polynomials are stored sparsely in [MultivariatePolynomial](polynomial::MultivariatePolynomial):
//! one flat vector of exponents and one vector of coefficients, kept sorted
//! ascending in a [MonomialOrder](order::MonomialOrder), so that the leading term is the last one.

pub mod division;
pub mod factor;
pub mod gcd;
pub mod monomial;
pub mod order;
pub mod polynomial;
pub mod univariate;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::iter::Sum;
use std::ops::{Add as OpAdd, AddAssign, Div, Mul as OpMul, Sub};

use smartstring::{LazyCompact, SmartString};

pub const INLINED_EXPONENTS: usize = 6;

pub trait Exponent:
    Hash
    + Debug
    + Display
    + Ord
    + OpMul<Output = Self>
    + Div<Output = Self>
    + Sub<Output = Self>
    + OpAdd<Output = Self>
    + Sum<Self>
    + AddAssign
    + Clone
    + Copy
    + PartialEq
    + Eq
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Convert the exponent to `u32`. This is always possible, as `u32` is the largest supported exponent type.
    fn to_u32(&self) -> u32;
    /// Convert from `u32`. This function panics if the exponent is too large.
    fn from_u32(n: u32) -> Self;
    fn is_zero(&self) -> bool;
    fn checked_add(&self, other: &Self) -> Option<Self>;
    fn checked_sub(&self, other: &Self) -> Option<Self>;
}

macro_rules! impl_exponent {
    ($t: ty) => {
        impl Exponent for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn to_u32(&self) -> u32 {
                *self as u32
            }

            #[inline]
            fn from_u32(n: u32) -> Self {
                match <$t>::try_from(n) {
                    Ok(e) => e,
                    Err(_) => panic!("Exponent {} too large for {}", n, stringify!($t)),
                }
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == 0
            }

            #[inline]
            fn checked_add(&self, other: &Self) -> Option<Self> {
                <$t>::checked_add(*self, *other)
            }

            #[inline]
            fn checked_sub(&self, other: &Self) -> Option<Self> {
                <$t>::checked_sub(*self, *other)
            }
        }
    };
}

impl_exponent!(u8);
impl_exponent!(u16);
impl_exponent!(u32);

/// A polynomial variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variable {
    Symbol(SmartString<LazyCompact>),
    /// A temporary variable, for example the generator of a field extension.
    Temporary(usize),
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::Symbol(value.into())
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::Symbol(s) => f.write_str(s),
            Variable::Temporary(t) => write!(f, "_TMP_{}", t),
        }
    }
}
