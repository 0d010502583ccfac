//! Rational numbers and the field of rational numbers [Q](type@Q).

use std::fmt::{Display, Formatter};

use super::integer::Integer;
use super::{EuclideanDomain, Field, Ring};

/// The field of rational numbers.
pub type Q = RationalField;
/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct RationalField;

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }
}

impl Display for RationalField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Q")
    }
}

/// A rational number in canonical form: the denominator is positive and
/// coprime to the numerator.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Rational {
    numerator: Integer,
    denominator: Integer,
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Rational {
            numerator: value,
            denominator: Integer::one(),
        }
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::from(Integer::new(value))
    }
}

impl From<(i64, i64)> for Rational {
    fn from(value: (i64, i64)) -> Self {
        Rational::new(Integer::new(value.0), Integer::new(value.1))
    }
}

impl Rational {
    pub fn new(num: Integer, den: Integer) -> Rational {
        if den.is_zero() {
            panic!("Division by zero");
        }

        let g = num.gcd(&den);
        let (mut num, mut den) = (&num / &g, &den / &g);
        if den.is_negative() {
            num = -num;
            den = -den;
        }

        Rational {
            numerator: num,
            denominator: den,
        }
    }

    pub fn zero() -> Rational {
        Rational::from(Integer::zero())
    }

    pub fn one() -> Rational {
        Rational::from(Integer::one())
    }

    pub fn numerator(&self) -> Integer {
        self.numerator.clone()
    }

    pub fn denominator(&self) -> Integer {
        self.denominator.clone()
    }

    pub fn numerator_ref(&self) -> &Integer {
        &self.numerator
    }

    pub fn denominator_ref(&self) -> &Integer {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.numerator.is_one() && self.denominator.is_one()
    }

    pub fn is_integer(&self) -> bool {
        self.denominator.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    pub fn neg(&self) -> Rational {
        Rational {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }

    pub fn inv(&self) -> Rational {
        Rational::new(self.denominator.clone(), self.numerator.clone())
    }

    pub fn add(&self, other: &Rational) -> Rational {
        if self.denominator == other.denominator {
            return Rational::new(
                &self.numerator + &other.numerator,
                self.denominator.clone(),
            );
        }

        Rational::new(
            &(&self.numerator * &other.denominator) + &(&other.numerator * &self.denominator),
            &self.denominator * &other.denominator,
        )
    }

    pub fn sub(&self, other: &Rational) -> Rational {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Rational) -> Rational {
        if self.is_zero() || other.is_zero() {
            return Rational::zero();
        }

        let g1 = self.numerator.gcd(&other.denominator);
        let g2 = other.numerator.gcd(&self.denominator);

        Rational {
            numerator: &(&self.numerator / &g1) * &(&other.numerator / &g2),
            denominator: &(&self.denominator / &g2) * &(&other.denominator / &g1),
        }
    }

    pub fn div(&self, other: &Rational) -> Rational {
        self.mul(&other.inv())
    }

    pub fn pow(&self, e: u64) -> Rational {
        Rational {
            numerator: self.numerator.pow(e),
            denominator: self.denominator.pow(e),
        }
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.denominator.is_one() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl Ring for RationalField {
    type Element = Rational;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.add(b)
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.sub(b)
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.mul(b)
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.add(b);
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.sub(b);
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.mul(b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = a.add(&b.mul(c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = a.sub(&b.mul(c));
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.neg()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Rational::zero()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Rational::one()
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        Rational::from(n.clone())
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
        false
    }

    fn is_field(&self) -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        Integer::zero()
    }

    fn size(&self) -> Integer {
        Integer::zero()
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            None
        } else {
            Some(a.div(b))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        use rand::Rng;
        let den = rng.gen_range(1..range.1.max(2));
        Rational::new(
            Integer::new(rng.gen_range(range.0..range.1)),
            Integer::new(den),
        )
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        if in_product && (!element.is_integer() || element.is_negative()) {
            write!(f, "({})", element)
        } else {
            write!(f, "{}", element)
        }
    }
}

impl EuclideanDomain for RationalField {
    fn rem(&self, _a: &Self::Element, _b: &Self::Element) -> Self::Element {
        Rational::zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (a.div(b), Rational::zero())
    }

    /// The gcd of two rationals is the gcd of the numerators divided by the lcm of the denominators.
    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let num = a.numerator.gcd(&b.numerator);
        let den = a.denominator.lcm(&b.denominator);
        Rational::new(num, den)
    }

    /// The sign of `a`, so that primitive parts have a positive leading coefficient.
    fn normalization_unit(&self, a: &Self::Element) -> Self::Element {
        if a.is_negative() {
            Rational::from(-1i64)
        } else {
            Rational::one()
        }
    }
}

impl Field for RationalField {
    #[inline]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.div(b)
    }

    #[inline]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.div(b);
    }

    #[inline]
    fn inv(&self, a: &Self::Element) -> Self::Element {
        a.inv()
    }
}

#[cfg(test)]
mod test {
    use super::Rational;
    use crate::domains::{integer::Integer, EuclideanDomain, Ring};

    #[test]
    fn arithmetic() {
        let a = Rational::from((3, -6));
        assert_eq!(a.numerator(), Integer::new(-1));
        assert_eq!(a.denominator(), Integer::new(2));

        let b = Rational::from((1, 3));
        assert_eq!(a.add(&b), Rational::from((-1, 6)));
        assert_eq!(a.mul(&b), Rational::from((-1, 6)));
        assert_eq!(a.div(&b), Rational::from((-3, 2)));
        assert_eq!(super::Q.pow(&a, 2), Rational::from((1, 4)));
    }

    #[test]
    fn gcd() {
        let g = super::Q.gcd(&Rational::from((4, 3)), &Rational::from((6, 5)));
        assert_eq!(g, Rational::from((2, 15)));
    }
}
