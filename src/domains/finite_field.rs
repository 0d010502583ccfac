//! Finite fields.
//!
//! [Zp] uses Montgomery arithmetic on 32-bit words and supports any odd prime
//! below `2^32`. The prime `2` has its own representation [Z2](type@Z2), and primes of
//! arbitrary size are supported by [`FiniteField<Integer>`].

use std::fmt::{Display, Formatter};
use std::hash::Hash;

use rand::Rng;

use super::integer::Integer;
use super::{EuclideanDomain, Field, Ring};

const HENSEL_LIFTING_MASK: [u8; 128] = [
    255, 85, 51, 73, 199, 93, 59, 17, 15, 229, 195, 89, 215, 237, 203, 33, 31, 117, 83, 105, 231,
    125, 91, 49, 47, 5, 227, 121, 247, 13, 235, 65, 63, 149, 115, 137, 7, 157, 123, 81, 79, 37, 3,
    153, 23, 45, 11, 97, 95, 181, 147, 169, 39, 189, 155, 113, 111, 69, 35, 185, 55, 77, 43, 129,
    127, 213, 179, 201, 71, 221, 187, 145, 143, 101, 67, 217, 87, 109, 75, 161, 159, 245, 211, 233,
    103, 253, 219, 177, 175, 133, 99, 249, 119, 141, 107, 193, 191, 21, 243, 9, 135, 29, 251, 209,
    207, 165, 131, 25, 151, 173, 139, 225, 223, 53, 19, 41, 167, 61, 27, 241, 239, 197, 163, 57,
    183, 205, 171, 1,
];

/// A 32-bit integer finite field.
pub type Zp = FiniteField<u32>;
/// A finite field with a prime of arbitrary size.
pub type ZpLarge = FiniteField<Integer>;
/// The finite field with two elements.
pub type Z2 = FiniteField<Two>;
/// The finite field with two elements.
pub const Z2: Z2 = FiniteField {
    p: Two(2),
    m: Two(2),
    one: FiniteFieldElement(Two(1)),
};

/// The prime `2`, used as the word type of [Z2](type@Z2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Two(pub(crate) u8);

impl Display for Two {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A number in a finite field.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct FiniteFieldElement<UField>(pub(crate) UField);

pub trait FiniteFieldWorkspace: Clone + Display + Eq + Hash + std::fmt::Debug {
    fn to_integer(&self) -> Integer;
}

pub trait FiniteFieldCore<UField: FiniteFieldWorkspace>: Field {
    /// Create a new finite field with modulus prime `p`.
    fn new(p: UField) -> Self;
    fn get_prime(&self) -> UField;
    /// Convert a number to a representative in a prime field.
    fn to_element(&self, a: UField) -> Self::Element;
    /// Convert a number from the finite field to standard form `[0,p)`.
    fn from_element(&self, a: &Self::Element) -> UField;
}

pub trait ToFiniteField<UField: FiniteFieldWorkspace>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    fn to_finite_field(&self, field: &FiniteField<UField>)
        -> <FiniteField<UField> as Ring>::Element;
}

/// A Galois field `GF(p,n)` is a finite field with `p^n` elements.
pub trait GaloisField: Field {
    fn get_extension_degree(&self) -> u64;
    /// Convert a number from the finite field to standard form `[0,p^n)`.
    fn to_integer(&self, a: &Self::Element) -> Integer;
    /// Convert a number from the finite field to symmetric form `[-p^n/2,p^n/2]`.
    fn to_symmetric_integer(&self, a: &Self::Element) -> Integer {
        let i = self.to_integer(a);
        let s = self.size();

        if &i * &Integer::new(2) > s {
            &i - &s
        } else {
            i
        }
    }

    /// Apply the Frobenius automorphism `a -> a^p`.
    fn frobenius(&self, a: &Self::Element) -> Self::Element;

    /// Compute the unique `b` with `b^p = a`.
    fn pth_root(&self, a: &Self::Element) -> Self::Element {
        let mut r = a.clone();
        for _ in 1..self.get_extension_degree() {
            r = self.frobenius(&r);
        }
        r
    }
}

impl<UField: FiniteFieldWorkspace> GaloisField for FiniteField<UField>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    fn get_extension_degree(&self) -> u64 {
        1
    }

    fn to_integer(&self, a: &Self::Element) -> Integer {
        self.from_element(a).to_integer()
    }

    fn frobenius(&self, a: &Self::Element) -> Self::Element {
        a.clone()
    }
}

/// The finite field `Z / pZ` for a prime `p`.
///
/// [Zp] ([`FiniteField<u32>`]) uses Montgomery modular arithmetic
/// to increase the performance of the multiplication operator. For the prime `2`, use [type@Z2] instead.
/// For `p` larger than `2^32`, use [`FiniteField<Integer>`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FiniteField<UField> {
    p: UField,
    m: UField,
    one: FiniteFieldElement<UField>,
}

impl<UField: Display> Display for FiniteField<UField> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z_{}", self.p)
    }
}

impl Zp {
    /// Create a new finite field from an odd prime `p`.
    pub fn new(p: u32) -> Zp {
        if p % 2 == 0 {
            panic!("Prime 2 is not supported: use Z2 instead.");
        }

        FiniteField {
            p,
            m: Self::inv_2_32(p),
            one: FiniteFieldElement(Self::get_one(p)),
        }
    }

    /// Returns the unit element in Montgomory form, ie.e 1 + 2^32 mod a.
    fn get_one(a: u32) -> u32 {
        if a as u64 <= 1u64 << 31 {
            let res = (((1u64 << 31) % a as u64) << 1) as u32;

            if res < a {
                res
            } else {
                res - a
            }
        } else {
            a.wrapping_neg()
        }
    }

    /// Returns -a^-1 mod 2^32.
    fn inv_2_32(a: u32) -> u32 {
        let mut ret: u32 = HENSEL_LIFTING_MASK[((a >> 1) & 127) as usize] as u32;
        ret = ret.wrapping_mul(a.wrapping_mul(ret).wrapping_add(2));
        ret = ret.wrapping_mul(a.wrapping_mul(ret).wrapping_add(2));
        ret
    }
}

impl FiniteFieldWorkspace for u32 {
    fn to_integer(&self) -> Integer {
        Integer::from(*self)
    }
}

impl FiniteFieldCore<u32> for Zp {
    fn new(p: u32) -> Zp {
        Zp::new(p)
    }

    fn get_prime(&self) -> u32 {
        self.p
    }

    /// Convert a number in a prime field a % n to Montgomory form.
    #[inline(always)]
    fn to_element(&self, a: u32) -> FiniteFieldElement<u32> {
        FiniteFieldElement((((a as u64) << 32) % self.p as u64) as u32)
    }

    /// Convert a number from Montgomory form to standard form.
    #[inline(always)]
    fn from_element(&self, a: &FiniteFieldElement<u32>) -> u32 {
        self.mul(a, &FiniteFieldElement(1)).0
    }
}

impl ToFiniteField<u32> for u32 {
    fn to_finite_field(&self, field: &Zp) -> FiniteFieldElement<u32> {
        field.to_element(*self)
    }
}

impl ToFiniteField<u32> for Integer {
    fn to_finite_field(&self, field: &Zp) -> FiniteFieldElement<u32> {
        let r = match self {
            Integer::Natural(n) => n.rem_euclid(field.p as i64) as u32,
            Integer::Large(_) => {
                let r = self.quot_rem(&Integer::from(field.p)).1;
                r.to_u64().unwrap_or(0) as u32
            }
        };
        field.to_element(r)
    }
}

impl Ring for Zp {
    type Element = FiniteFieldElement<u32>;

    /// Add two numbers in Montgomory form.
    #[inline(always)]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mut t = a.0 as u64 + b.0 as u64;

        if t >= self.p as u64 {
            t -= self.p as u64;
        }

        FiniteFieldElement(t as u32)
    }

    /// Subtract `b` from `a`, where `a` and `b` are in Montgomory form.
    #[inline(always)]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a.0 >= b.0 {
            FiniteFieldElement(a.0 - b.0)
        } else {
            FiniteFieldElement(a.0 + (self.p - b.0))
        }
    }

    /// Multiply two numbers in Montgomory form.
    #[inline(always)]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let t = a.0 as u64 * b.0 as u64;
        let m = (t as u32).wrapping_mul(self.m);
        let (t, overflow) = t.overflowing_add(m as u64 * self.p as u64);
        let u = (t >> 32) as u32;

        if overflow {
            FiniteFieldElement(u.wrapping_sub(self.p))
        } else if u >= self.p {
            FiniteFieldElement(u - self.p)
        } else {
            FiniteFieldElement(u)
        }
    }

    #[inline(always)]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    #[inline(always)]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    #[inline(always)]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.add_assign(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.sub_assign(a, &self.mul(b, c));
    }

    /// Computes -x mod n.
    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        if a.0 == 0 {
            *a
        } else {
            FiniteFieldElement(self.p - a.0)
        }
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        FiniteFieldElement(0)
    }

    /// Return the unit element in Montgomory form.
    #[inline]
    fn one(&self) -> Self::Element {
        self.one
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        n.to_finite_field(self)
    }

    /// Compute b^e % n.
    #[inline]
    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        if b.0 == 0 {
            return if e == 0 { self.one() } else { self.zero() };
        }

        if e >= self.p as u64 - 1 {
            e %= self.p as u64 - 1;
        }

        if e == 0 {
            return self.one();
        }

        let mut x = *b;
        let mut y = self.one();
        while e != 1 {
            if e % 2 == 1 {
                y = self.mul(&y, &x);
            }

            x = self.mul(&x, &x);
            e /= 2;
        }

        self.mul(&x, &y)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.0 == 0
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a == &self.one
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn is_field(&self) -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        Integer::from(self.p)
    }

    fn size(&self) -> Integer {
        Integer::from(self.p)
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.0 == 0 {
            None
        } else {
            Some(self.div(a, b))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, _range: (i64, i64)) -> Self::Element {
        self.to_element(rng.gen_range(0..self.p))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.from_element(element))
    }
}

impl EuclideanDomain for Zp {
    #[inline]
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.zero()
    }

    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), self.zero())
    }

    #[inline]
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a.0 == 0 && b.0 == 0 {
            self.zero()
        } else {
            self.one()
        }
    }

    fn normalization_unit(&self, a: &Self::Element) -> Self::Element {
        if a.0 == 0 {
            self.one()
        } else {
            self.inv(a)
        }
    }
}

impl Field for Zp {
    #[inline]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    #[inline]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, &self.inv(b));
    }

    /// Computes x^-1 mod n.
    fn inv(&self, a: &Self::Element) -> Self::Element {
        assert!(a.0 != 0, "0 is not invertible");

        // apply multiplication with 1 twice to get the correct scaling of R=2^32
        // see the paper [Montgomery Arithmetic from a Software Perspective](https://eprint.iacr.org/2017/1057.pdf).
        let x_mont = self
            .mul(&self.mul(a, &FiniteFieldElement(1)), &FiniteFieldElement(1))
            .0;

        // extended Euclidean algorithm: a x + b p = gcd(x, p) = 1 or a x = 1 (mod p)
        let mut u1: u64 = 1;
        let mut u3 = x_mont as u64;
        let mut v1: u64 = 0;
        let mut v3 = self.p as u64;
        let mut even_iter: bool = true;

        while v3 != 0 {
            let q = u3 / v3;
            let t3 = u3 % v3;
            let t1 = u1 + q * v1;
            u1 = v1;
            v1 = t1;
            u3 = v3;
            v3 = t3;
            even_iter = !even_iter;
        }

        debug_assert!(u3 == 1);
        if even_iter {
            FiniteFieldElement(u1 as u32)
        } else {
            FiniteFieldElement(self.p - u1 as u32)
        }
    }
}

impl FiniteFieldWorkspace for Two {
    fn to_integer(&self) -> Integer {
        Integer::new(self.0 as i64)
    }
}

impl FiniteFieldCore<Two> for Z2 {
    fn new(p: Two) -> Self {
        if p.0 != 2 {
            panic!("Z2 has prime 2, not {}", p);
        }
        Z2
    }

    fn get_prime(&self) -> Two {
        Two(2)
    }

    #[inline]
    fn to_element(&self, a: Two) -> u8 {
        a.0 % 2
    }

    #[inline]
    fn from_element(&self, a: &u8) -> Two {
        Two(*a)
    }
}

impl ToFiniteField<Two> for Integer {
    fn to_finite_field(&self, _field: &Z2) -> u8 {
        match self {
            Integer::Natural(n) => n.rem_euclid(2) as u8,
            Integer::Large(_) => {
                if self.quot_rem(&Integer::new(2)).1.is_zero() {
                    0
                } else {
                    1
                }
            }
        }
    }
}

impl Ring for Z2 {
    type Element = u8;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a ^ b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a ^ b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a & b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a ^= b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a ^= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a &= b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a ^= b & c;
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a ^= b & c;
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        *a
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        0
    }

    #[inline]
    fn one(&self) -> Self::Element {
        1
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        n.to_finite_field(self)
    }

    #[inline]
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        if e == 0 {
            1
        } else {
            *b
        }
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        *a == 0
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn is_field(&self) -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        Integer::new(2)
    }

    fn size(&self) -> Integer {
        Integer::new(2)
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if *b == 0 {
            None
        } else {
            Some(*a)
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, _range: (i64, i64)) -> Self::Element {
        rng.gen_range(0..2)
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", element)
    }
}

impl EuclideanDomain for Z2 {
    #[inline]
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        0
    }

    #[inline]
    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), 0)
    }

    #[inline]
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a | b
    }

    fn normalization_unit(&self, _a: &Self::Element) -> Self::Element {
        1
    }
}

impl Field for Z2 {
    #[inline]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        assert!(*b != 0, "0 is not invertible");
        *a
    }

    #[inline]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        assert!(*b != 0, "0 is not invertible");
    }

    #[inline]
    fn inv(&self, a: &Self::Element) -> Self::Element {
        assert!(*a != 0, "0 is not invertible");
        1
    }
}

impl FiniteFieldWorkspace for Integer {
    fn to_integer(&self) -> Integer {
        self.clone()
    }
}

impl ZpLarge {
    /// Create a new finite field from a prime `p` of any size.
    pub fn new(p: Integer) -> ZpLarge {
        FiniteField {
            p,
            m: Integer::zero(),
            one: FiniteFieldElement(Integer::one()),
        }
    }
}

impl FiniteFieldCore<Integer> for ZpLarge {
    fn new(p: Integer) -> Self {
        ZpLarge::new(p)
    }

    fn get_prime(&self) -> Integer {
        self.p.clone()
    }

    fn to_element(&self, a: Integer) -> FiniteFieldElement<Integer> {
        FiniteFieldElement(a.quot_rem(&self.p).1)
    }

    fn from_element(&self, a: &FiniteFieldElement<Integer>) -> Integer {
        a.0.clone()
    }
}

impl ToFiniteField<Integer> for Integer {
    fn to_finite_field(&self, field: &ZpLarge) -> FiniteFieldElement<Integer> {
        field.to_element(self.clone())
    }
}

impl Ring for ZpLarge {
    type Element = FiniteFieldElement<Integer>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let r = &a.0 + &b.0;
        if r >= self.p {
            FiniteFieldElement(&r - &self.p)
        } else {
            FiniteFieldElement(r)
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a.0 >= b.0 {
            FiniteFieldElement(&a.0 - &b.0)
        } else {
            FiniteFieldElement(&(&a.0 - &b.0) + &self.p)
        }
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        FiniteFieldElement((&a.0 * &b.0).quot_rem(&self.p).1)
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.add(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.sub(a, &self.mul(b, c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        if a.0.is_zero() {
            a.clone()
        } else {
            FiniteFieldElement(&self.p - &a.0)
        }
    }

    fn zero(&self) -> Self::Element {
        FiniteFieldElement(Integer::zero())
    }

    fn one(&self) -> Self::Element {
        self.one.clone()
    }

    fn nth(&self, n: &Integer) -> Self::Element {
        n.to_finite_field(self)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        FiniteFieldElement(b.0.pow_mod(&Integer::from(e), &self.p))
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.0.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.0.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn is_field(&self) -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        self.p.clone()
    }

    fn size(&self) -> Integer {
        self.p.clone()
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.0.is_zero() {
            None
        } else {
            Some(self.div(a, b))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let r = Integer::new(rng.gen_range(range.0..range.1));
        self.to_element(r)
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", element.0)
    }
}

impl EuclideanDomain for ZpLarge {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        self.zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), self.zero())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a.0.is_zero() && b.0.is_zero() {
            self.zero()
        } else {
            self.one()
        }
    }

    fn normalization_unit(&self, a: &Self::Element) -> Self::Element {
        if a.0.is_zero() {
            self.one()
        } else {
            self.inv(a)
        }
    }
}

impl Field for ZpLarge {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        match a.0.mod_inverse(&self.p) {
            Some(i) => FiniteFieldElement(i),
            None => panic!("{} is not invertible mod {}", a.0, self.p),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{FiniteFieldCore, GaloisField, Zp, ZpLarge, Z2};
    use crate::domains::{integer::Integer, Field, Ring};

    #[test]
    fn montgomery() {
        let field = Zp::new(4293491017);
        let a = field.to_element(1234567);
        let b = field.to_element(4293491000);
        let c = field.mul(&a, &b);
        assert_eq!(
            field.from_element(&c) as u64,
            (1234567u64 * 4293491000u64) % 4293491017
        );

        let inv = field.inv(&a);
        assert!(field.is_one(&field.mul(&a, &inv)));
        assert_eq!(field.pow(&a, 4293491016), field.one());
    }

    #[test]
    fn symmetric() {
        let field = Zp::new(7);
        let a = field.nth(&Integer::new(-1));
        assert_eq!(field.to_symmetric_integer(&a), Integer::new(-1));
        assert_eq!(field.to_integer(&a), Integer::new(6));
    }

    #[test]
    fn two() {
        assert_eq!(Z2.add(&1, &1), 0);
        assert_eq!(Z2.nth(&Integer::new(-3)), 1);
        assert_eq!(Z2.inv(&1), 1);
    }

    #[test]
    fn large_prime() {
        let p = Integer::new(2).pow(70).next_prime();
        let field = ZpLarge::new(p.clone());
        let a = field.nth(&Integer::new(-5));
        assert_eq!(field.to_symmetric_integer(&a), Integer::new(-5));
        assert!(field.is_one(&field.mul(&a, &field.inv(&a))));
        assert_eq!(field.get_prime(), p);
    }
}
