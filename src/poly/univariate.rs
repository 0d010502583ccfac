//! Dense univariate polynomials over any ring.
//!
//! During Hensel lifting the coefficients are themselves multivariate polynomials, so
//! that a [UnivariatePolynomial] represents a series expansion in the lifting variable.

use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use crate::domains::{Ring, RingPrinter};

use super::Variable;

/// A dense univariate polynomial. The coefficient of `x^i` is stored at index `i`
/// and the last coefficient is never zero.
#[derive(Clone)]
pub struct UnivariatePolynomial<F: Ring> {
    pub coefficients: Vec<F::Element>,
    pub variable: Arc<Variable>,
    pub ring: F,
}

impl<F: Ring> std::fmt::Debug for UnivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for c in self.coefficients.iter() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?} }}", c)?;
        }
        write!(f, " ]")
    }
}

impl<F: Ring> std::fmt::Display for UnivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        let mut first = true;
        for (e, c) in self.coefficients.iter().enumerate() {
            if F::is_zero(c) {
                continue;
            }

            if !first {
                f.write_str("+")?;
            }
            first = false;

            let p = RingPrinter {
                ring: &self.ring,
                element: c,
                in_product: e > 0,
            };

            match e {
                0 => write!(f, "{}", p)?,
                1 => write!(f, "{}*{}", p, self.variable)?,
                _ => write!(f, "{}*{}^{}", p, self.variable, e)?,
            }
        }

        Ok(())
    }
}

impl<F: Ring> UnivariatePolynomial<F> {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable and ring are inherited.
    #[inline]
    pub fn new(ring: &F, cap: Option<usize>, variable: Arc<Variable>) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap.unwrap_or(0)),
            ring: ring.clone(),
            variable,
        }
    }

    /// Constructs a zero polynomial, inheriting the ring and variable from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self {
            coefficients: vec![],
            ring: self.ring.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Constructs a constant polynomial,
    /// inheriting the ring and variable from `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            ring: self.ring.clone(),
            variable: self.variable.clone(),
        }
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.ring.one())
    }

    /// Constructs a polynomial with a single term.
    pub fn monomial(&self, coeff: F::Element, exponent: usize) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        let mut coefficients = vec![self.ring.zero(); exponent + 1];
        coefficients[exponent] = coeff;

        Self {
            coefficients,
            ring: self.ring.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Build a polynomial from dense coefficients, removing trailing zeros.
    pub fn from_coefficients(&self, coefficients: Vec<F::Element>) -> Self {
        let mut p = Self {
            coefficients,
            ring: self.ring.clone(),
            variable: self.variable.clone(),
        };
        p.truncate_zeros();
        p
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.coefficients.len() == 1 && self.ring.is_one(&self.coefficients[0])
    }

    /// Returns the degree of the polynomial. The zero polynomial has degree 0.
    #[inline]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn lcoeff(&self) -> F::Element {
        match self.coefficients.last() {
            Some(c) => c.clone(),
            None => self.ring.zero(),
        }
    }

    /// Get the coefficient of `x^i`.
    pub fn coefficient(&self, i: usize) -> F::Element {
        match self.coefficients.get(i) {
            Some(c) => c.clone(),
            None => self.ring.zero(),
        }
    }

    /// Set the coefficient of `x^i`, growing or shrinking the polynomial as needed.
    pub fn set_coefficient(&mut self, i: usize, c: F::Element) {
        if i >= self.coefficients.len() {
            if F::is_zero(&c) {
                return;
            }
            self.coefficients.resize(i + 1, self.ring.zero());
        }
        self.coefficients[i] = c;
        self.truncate_zeros();
    }

    /// Compute `self mod x^(d + 1)`.
    pub fn truncate(mut self, d: usize) -> Self {
        self.coefficients.truncate(d + 1);
        self.truncate_zeros();
        self
    }

    fn truncate_zeros(&mut self) {
        while let Some(c) = self.coefficients.last() {
            if F::is_zero(c) {
                self.coefficients.pop();
            } else {
                break;
            }
        }
    }

    pub fn mul_coeff(mut self, coeff: &F::Element) -> Self {
        for c in &mut self.coefficients {
            self.ring.mul_assign(c, coeff);
        }
        self.truncate_zeros();
        self
    }

    /// Multiply by `x^exp`.
    pub fn mul_exp(&self, exp: usize) -> Self {
        if self.is_zero() || exp == 0 {
            return self.clone();
        }

        let mut coefficients = vec![self.ring.zero(); exp];
        coefficients.extend(self.coefficients.iter().cloned());
        Self {
            coefficients,
            ring: self.ring.clone(),
            variable: self.variable.clone(),
        }
    }

    /// Multiply two polynomials and discard all terms above degree `d`.
    pub fn mul_truncated(&self, rhs: &Self, d: usize) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        let n = (self.coefficients.len() + rhs.coefficients.len() - 1).min(d + 1);
        let mut res = vec![self.ring.zero(); n];
        for (i, a) in self.coefficients.iter().enumerate().take(n) {
            if F::is_zero(a) {
                continue;
            }
            for (j, b) in rhs.coefficients.iter().enumerate().take(n - i) {
                self.ring.add_mul_assign(&mut res[i + j], a, b);
            }
        }

        self.from_coefficients(res)
    }

    pub fn evaluate(&self, x: &F::Element) -> F::Element {
        let mut res = self.ring.zero();
        for c in self.coefficients.iter().rev() {
            res = self.ring.mul(&res, x);
            self.ring.add_assign(&mut res, c);
        }
        res
    }
}

impl<F: Ring> PartialEq for UnivariatePolynomial<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
    }
}

impl<F: Ring> Eq for UnivariatePolynomial<F> {}

impl<F: Ring> std::hash::Hash for UnivariatePolynomial<F> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.coefficients.hash(state);
    }
}

impl<'a, 'b, F: Ring> Add<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn add(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        let (long, short) = if self.coefficients.len() >= other.coefficients.len() {
            (self, other)
        } else {
            (other, self)
        };

        let mut coefficients = long.coefficients.clone();
        for (c, s) in coefficients.iter_mut().zip(&short.coefficients) {
            self.ring.add_assign(c, s);
        }

        self.from_coefficients(coefficients)
    }
}

impl<'a, 'b, F: Ring> Sub<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn sub(self, other: &'a UnivariatePolynomial<F>) -> Self::Output {
        let mut coefficients = self.coefficients.clone();
        if coefficients.len() < other.coefficients.len() {
            coefficients.resize(other.coefficients.len(), self.ring.zero());
        }

        for (c, s) in coefficients.iter_mut().zip(&other.coefficients) {
            self.ring.sub_assign(c, s);
        }

        self.from_coefficients(coefficients)
    }
}

impl<F: Ring> Neg for UnivariatePolynomial<F> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = self.ring.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring> Mul<&'a UnivariatePolynomial<F>> for &'b UnivariatePolynomial<F> {
    type Output = UnivariatePolynomial<F>;

    fn mul(self, rhs: &'a UnivariatePolynomial<F>) -> Self::Output {
        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        self.mul_truncated(rhs, self.degree() + rhs.degree())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::integer::{Integer, Z};
    use crate::poly::Variable;

    use super::UnivariatePolynomial;

    #[test]
    fn truncated_product() {
        let zero = UnivariatePolynomial::new(&Z, None, Arc::new(Variable::from("t")));
        let a = zero.from_coefficients(vec![Integer::one(), Integer::new(2), Integer::new(3)]);
        let b = zero.from_coefficients(vec![Integer::new(-1), Integer::one()]);

        let full = &a * &b;
        assert_eq!(full.degree(), 3);
        assert_eq!(full.coefficient(3), Integer::new(3));
        assert_eq!(a.mul_truncated(&b, 1), full.clone().truncate(1));
        assert_eq!(full.evaluate(&Integer::one()), Integer::zero());
        assert_eq!(&(&full - &full), &zero);
    }
}
