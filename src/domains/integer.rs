//! Arbitrary-precision integers and the ring of integers [Z](type@Z).

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign};

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::Rng as _;

use super::{EuclideanDomain, Ring};

pub const SMALL_PRIMES: [i64; 100] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419, 421,
    431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523, 541,
];

/// Witnesses for which Miller-Rabin is deterministic below `3.3 * 10^24`.
const MILLER_RABIN_BASES: [i64; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct IntegerRing;

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

impl Display for IntegerRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Z")
    }
}

/// An arbitrary-precision integer. Numbers that fit in an `i64` are
/// always stored as [Integer::Natural].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Integer {
    Natural(i64),
    Large(BigInt),
}

impl From<i64> for Integer {
    #[inline]
    fn from(value: i64) -> Self {
        Integer::Natural(value)
    }
}

impl From<i32> for Integer {
    #[inline]
    fn from(value: i32) -> Self {
        Integer::Natural(value as i64)
    }
}

impl From<u32> for Integer {
    #[inline]
    fn from(value: u32) -> Self {
        Integer::Natural(value as i64)
    }
}

impl From<u64> for Integer {
    #[inline]
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Integer::Natural(value as i64)
        } else {
            Integer::Large(BigInt::from(value))
        }
    }
}

impl From<usize> for Integer {
    #[inline]
    fn from(value: usize) -> Self {
        Integer::from(value as u64)
    }
}

impl From<i128> for Integer {
    #[inline]
    fn from(value: i128) -> Self {
        if value >= i64::MIN as i128 && value <= i64::MAX as i128 {
            Integer::Natural(value as i64)
        } else {
            Integer::Large(BigInt::from(value))
        }
    }
}

impl From<BigInt> for Integer {
    #[inline]
    fn from(value: BigInt) -> Self {
        Integer::from_big(value)
    }
}

impl Integer {
    #[inline]
    pub fn new(num: i64) -> Integer {
        Integer::Natural(num)
    }

    #[inline]
    pub fn zero() -> Integer {
        Integer::Natural(0)
    }

    #[inline]
    pub fn one() -> Integer {
        Integer::Natural(1)
    }

    fn from_big(b: BigInt) -> Integer {
        match b.to_i64() {
            Some(n) => Integer::Natural(n),
            None => Integer::Large(b),
        }
    }

    /// Convert to an arbitrary-precision integer.
    pub fn to_big(&self) -> BigInt {
        match self {
            Integer::Natural(n) => BigInt::from(*n),
            Integer::Large(b) => b.clone(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Integer::Natural(0))
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        matches!(self, Integer::Natural(1))
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        match self {
            Integer::Natural(n) => *n < 0,
            Integer::Large(b) => b.is_negative(),
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Integer::Natural(n) => Some(*n),
            Integer::Large(_) => None,
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Integer::Natural(n) => (*n >= 0).then_some(*n as u64),
            Integer::Large(b) => b.to_u64(),
        }
    }

    pub fn abs(&self) -> Integer {
        match self {
            Integer::Natural(n) => match n.checked_abs() {
                Some(a) => Integer::Natural(a),
                None => Integer::Large(BigInt::from(*n).abs()),
            },
            Integer::Large(b) => Integer::Large(b.abs()),
        }
    }

    /// The number of bits of the absolute value.
    pub fn bits(&self) -> u64 {
        match self {
            Integer::Natural(n) => 64 - n.unsigned_abs().leading_zeros() as u64,
            Integer::Large(b) => b.bits(),
        }
    }

    pub fn pow(&self, mut e: u64) -> Integer {
        if e == 0 {
            return Integer::one();
        }

        let mut base = self.clone();
        let mut result = Integer::one();
        while e != 1 {
            if e % 2 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            e /= 2;
        }

        &result * &base
    }

    /// Euclidean division: `self = q * b + r` with `0 <= r < |b|`.
    pub fn quot_rem(&self, b: &Integer) -> (Integer, Integer) {
        if b.is_zero() {
            panic!("Cannot divide by zero");
        }

        match (self, b) {
            (Integer::Natural(x), Integer::Natural(y)) => {
                if let (Some(q), Some(r)) = (x.checked_div_euclid(*y), x.checked_rem_euclid(*y)) {
                    return (Integer::Natural(q), Integer::Natural(r));
                }
            }
            _ => {}
        }

        let (a, b) = (self.to_big(), b.to_big());
        let (mut q, mut r) = a.div_rem(&b);
        if r.is_negative() {
            if b.is_positive() {
                q -= 1;
                r += &b;
            } else {
                q += 1;
                r -= &b;
            }
        }
        (Integer::from_big(q), Integer::from_big(r))
    }

    /// The non-negative greatest common divisor.
    pub fn gcd(&self, b: &Integer) -> Integer {
        match (self, b) {
            (Integer::Natural(x), Integer::Natural(y)) => {
                let (mut a, mut b) = (x.unsigned_abs(), y.unsigned_abs());
                while b != 0 {
                    (a, b) = (b, a % b);
                }
                Integer::from(a)
            }
            _ => Integer::from_big(self.to_big().gcd(&b.to_big())),
        }
    }

    pub fn lcm(&self, b: &Integer) -> Integer {
        if self.is_zero() || b.is_zero() {
            return Integer::zero();
        }

        let g = self.gcd(b);
        (&(self / &g) * b).abs()
    }

    /// Map `self` into `(-m/2, m/2]`.
    pub fn symmetric_mod(&self, m: &Integer) -> Integer {
        let r = self.quot_rem(m).1;
        if &(&r * &Integer::Natural(2)) > m {
            &r - m
        } else {
            r
        }
    }

    /// Compute `self^-1 mod m`, if it exists.
    pub fn mod_inverse(&self, m: &Integer) -> Option<Integer> {
        let (mut r0, mut r1) = (self.quot_rem(m).1, m.abs());
        let (mut s0, mut s1) = (Integer::one(), Integer::zero());

        while !r1.is_zero() {
            let (q, r) = r0.quot_rem(&r1);
            (r0, r1) = (r1, r);
            let s = &s0 - &(&q * &s1);
            (s0, s1) = (s1, s);
        }

        if !r0.is_one() {
            return None;
        }

        Some(s0.quot_rem(m).1)
    }

    /// Compute `self^e mod m` for non-negative `e`.
    pub fn pow_mod(&self, e: &Integer, m: &Integer) -> Integer {
        let base = self.quot_rem(m).1;
        Integer::from_big(base.to_big().modpow(&e.to_big(), &m.to_big()))
    }

    /// Miller-Rabin primality test. It is deterministic below `3.3 * 10^24`.
    pub fn is_probable_prime(&self) -> bool {
        if self <= &Integer::one() {
            return false;
        }

        for p in SMALL_PRIMES {
            let p = Integer::Natural(p);
            if self == &p {
                return true;
            }
            if self.quot_rem(&p).1.is_zero() {
                return false;
            }
        }

        let n = self.to_big();
        let n1: BigInt = &n - 1;
        let s = n1.trailing_zeros().unwrap_or(0);
        let d = &n1 >> s;

        'witness: for a in MILLER_RABIN_BASES {
            let mut x = BigInt::from(a).modpow(&d, &n);
            if x.is_one() || x == n1 {
                continue;
            }

            for _ in 1..s {
                x = (&x * &x) % &n;
                if x == n1 {
                    continue 'witness;
                }
            }

            return false;
        }

        true
    }

    /// Return the smallest prime strictly larger than `self`.
    pub fn next_prime(&self) -> Integer {
        if self < &Integer::Natural(2) {
            return Integer::Natural(2);
        }

        let mut n = self + &Integer::one();
        if !n.quot_rem(&Integer::Natural(2)).1.is_zero() && n.is_probable_prime() {
            return n;
        }

        if n.quot_rem(&Integer::Natural(2)).1.is_zero() {
            n += &Integer::one();
        }

        while !n.is_probable_prime() {
            n += &Integer::Natural(2);
        }
        n
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Integer::Natural(n) => write!(f, "{}", n),
            Integer::Large(b) => write!(f, "{}", b),
        }
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Integer::Natural(a), Integer::Natural(b)) => a.cmp(b),
            _ => self.to_big().cmp(&other.to_big()),
        }
    }
}

impl PartialEq<i64> for Integer {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Integer::Natural(n) if n == other)
    }
}

fn add_ref(a: &Integer, b: &Integer) -> Integer {
    if let (Integer::Natural(x), Integer::Natural(y)) = (a, b) {
        if let Some(r) = x.checked_add(*y) {
            return Integer::Natural(r);
        }
    }
    Integer::from_big(a.to_big() + b.to_big())
}

fn sub_ref(a: &Integer, b: &Integer) -> Integer {
    if let (Integer::Natural(x), Integer::Natural(y)) = (a, b) {
        if let Some(r) = x.checked_sub(*y) {
            return Integer::Natural(r);
        }
    }
    Integer::from_big(a.to_big() - b.to_big())
}

fn mul_ref(a: &Integer, b: &Integer) -> Integer {
    if let (Integer::Natural(x), Integer::Natural(y)) = (a, b) {
        return Integer::from(*x as i128 * *y as i128);
    }
    Integer::from_big(a.to_big() * b.to_big())
}

/// Truncated division.
fn div_ref(a: &Integer, b: &Integer) -> Integer {
    if b.is_zero() {
        panic!("Cannot divide by zero");
    }

    if let (Integer::Natural(x), Integer::Natural(y)) = (a, b) {
        if let Some(r) = x.checked_div(*y) {
            return Integer::Natural(r);
        }
    }
    Integer::from_big(a.to_big() / b.to_big())
}

/// Truncated remainder, with the sign of the dividend.
fn rem_ref(a: &Integer, b: &Integer) -> Integer {
    if b.is_zero() {
        panic!("Cannot divide by zero");
    }

    if let (Integer::Natural(x), Integer::Natural(y)) = (a, b) {
        if let Some(r) = x.checked_rem(*y) {
            return Integer::Natural(r);
        }
    }
    Integer::from_big(a.to_big() % b.to_big())
}

macro_rules! impl_binary_op {
    ($tr: ident, $f: ident, $core: ident) => {
        impl<'a, 'b> $tr<&'b Integer> for &'a Integer {
            type Output = Integer;

            #[inline]
            fn $f(self, rhs: &'b Integer) -> Integer {
                $core(self, rhs)
            }
        }

        impl<'b> $tr<&'b Integer> for Integer {
            type Output = Integer;

            #[inline]
            fn $f(self, rhs: &'b Integer) -> Integer {
                $core(&self, rhs)
            }
        }

        impl<'a> $tr<Integer> for &'a Integer {
            type Output = Integer;

            #[inline]
            fn $f(self, rhs: Integer) -> Integer {
                $core(self, &rhs)
            }
        }

        impl $tr<Integer> for Integer {
            type Output = Integer;

            #[inline]
            fn $f(self, rhs: Integer) -> Integer {
                $core(&self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add_ref);
impl_binary_op!(Sub, sub, sub_ref);
impl_binary_op!(Mul, mul, mul_ref);
impl_binary_op!(Div, div, div_ref);
impl_binary_op!(Rem, rem, rem_ref);

impl<'a> AddAssign<&'a Integer> for Integer {
    #[inline]
    fn add_assign(&mut self, rhs: &'a Integer) {
        *self = add_ref(self, rhs);
    }
}

impl<'a> SubAssign<&'a Integer> for Integer {
    #[inline]
    fn sub_assign(&mut self, rhs: &'a Integer) {
        *self = sub_ref(self, rhs);
    }
}

impl<'a> MulAssign<&'a Integer> for Integer {
    #[inline]
    fn mul_assign(&mut self, rhs: &'a Integer) {
        *self = mul_ref(self, rhs);
    }
}

impl Neg for Integer {
    type Output = Integer;

    #[inline]
    fn neg(self) -> Integer {
        -&self
    }
}

impl<'a> Neg for &'a Integer {
    type Output = Integer;

    #[inline]
    fn neg(self) -> Integer {
        match self {
            Integer::Natural(n) => match n.checked_neg() {
                Some(n) => Integer::Natural(n),
                None => Integer::Large(-BigInt::from(*n)),
            },
            Integer::Large(b) => Integer::from_big(-b),
        }
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a += &(b * c);
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a -= &(b * c);
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -a
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Integer::zero()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Integer::one()
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        n.clone()
    }

    #[inline]
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn is_field(&self) -> bool {
        false
    }

    fn characteristic(&self) -> Integer {
        Integer::zero()
    }

    fn size(&self) -> Integer {
        Integer::zero()
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            return None;
        }

        let (q, r) = a.quot_rem(b);
        r.is_zero().then_some(q)
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        Integer::Natural(rng.gen_range(range.0..range.1))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        if in_product && element.is_negative() {
            write!(f, "({})", element)
        } else {
            write!(f, "{}", element)
        }
    }
}

impl EuclideanDomain for IntegerRing {
    #[inline]
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.quot_rem(b).1
    }

    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        a.quot_rem(b)
    }

    #[inline]
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.gcd(b)
    }

    fn normalization_unit(&self, a: &Self::Element) -> Self::Element {
        if a.is_negative() {
            Integer::Natural(-1)
        } else {
            Integer::one()
        }
    }
}
