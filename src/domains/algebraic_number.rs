//! Simple algebraic extensions `F[a]/(m(a))` of a field, used for Galois fields `GF(p^k)`.
//!
//! When a prime field is too small to provide enough good evaluation points for
//! multivariate factorization, the polynomial is factored over an extension
//! instead.

use std::sync::Arc;

use rand::Rng;

use crate::combinatorics::CombinationIterator;
use crate::poly::polynomial::MultivariatePolynomial;
use crate::poly::Variable;

use super::finite_field::GaloisField;
use super::integer::Integer;
use super::linear_system::Matrix;
use super::{EuclideanDomain, Field, Ring};

/// An algebraic extension of the field `R`, with a monic, irreducible,
/// univariate defining polynomial.
///
/// # Examples
///
/// ```
/// use polyfactor::domains::{algebraic_number::AlgebraicExtension, finite_field::Zp, Ring};
/// use polyfactor::domains::finite_field::GaloisField;
/// use polyfactor::domains::integer::Integer;
/// use polyfactor::poly::Variable;
///
/// let field = AlgebraicExtension::galois_field(Zp::new(17), 4, Variable::Temporary(0));
/// assert_eq!(field.get_extension_degree(), 4);
/// assert_eq!(field.size(), Integer::from(17u64.pow(4)));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AlgebraicExtension<R: Field> {
    poly: Arc<MultivariatePolynomial<R, u16>>,
}

impl<R: Field> AlgebraicExtension<R> {
    /// Create a new algebraic extension from a univariate polynomial.
    /// The polynomial should be irreducible; it is made monic.
    pub fn new(poly: MultivariatePolynomial<R, u16>) -> AlgebraicExtension<R> {
        assert_eq!(poly.nvars(), 1, "Defining polynomial must be univariate");
        assert!(
            !poly.is_constant(),
            "Defining polynomial must have positive degree"
        );

        AlgebraicExtension {
            poly: Arc::new(poly.make_monic()),
        }
    }

    /// Get the minimal polynomial.
    pub fn poly(&self) -> &MultivariatePolynomial<R, u16> {
        &self.poly
    }

    /// The degree of the extension over `R`.
    pub fn degree(&self) -> usize {
        self.poly.degree(0) as usize
    }

    /// The base field.
    pub fn base(&self) -> &R {
        &self.poly.ring
    }

    /// Embed an element of the base field.
    pub fn constant(&self, c: R::Element) -> AlgebraicNumber<R> {
        AlgebraicNumber {
            poly: self.poly.constant(c),
        }
    }

    /// The generator `a` of the extension.
    pub fn generator(&self) -> AlgebraicNumber<R> {
        self.to_element(self.poly.variable(0))
    }

    /// Convert a polynomial in the generator to an element, reducing it
    /// modulo the defining polynomial.
    pub fn to_element(&self, poly: MultivariatePolynomial<R, u16>) -> AlgebraicNumber<R> {
        assert!(
            poly.variables == self.poly.variables || poly.is_constant(),
            "Element is not a polynomial in the generator"
        );

        let mut poly = if poly.is_constant() {
            self.poly.constant(poly.get_constant())
        } else {
            poly
        };

        if poly.degree(0) >= self.poly.degree(0) {
            poly = poly.quot_rem_univariate(&self.poly).1;
        }

        AlgebraicNumber { poly }
    }

    /// Return the element as a member of the base field, if it is one.
    pub fn to_base(&self, a: &AlgebraicNumber<R>) -> Option<R::Element> {
        if a.poly.is_constant() {
            Some(a.poly.get_constant())
        } else {
            None
        }
    }

    fn pow_integer(&self, b: &AlgebraicNumber<R>, e: &Integer) -> AlgebraicNumber<R> {
        if e.is_zero() {
            return self.one();
        }

        let two = Integer::new(2);
        let mut e = e.clone();
        let mut x = b.clone();
        let mut y = self.one();
        while !e.is_one() {
            let (q, r) = e.quot_rem(&two);
            if !r.is_zero() {
                y = self.mul(&y, &x);
            }

            x = self.mul(&x, &x);
            e = q;
        }

        self.mul(&x, &y)
    }
}

impl<R: GaloisField> AlgebraicExtension<R> {
    /// Construct the Galois field `GF(p^exp)` over the prime field `prime`.
    /// The irreducible polynomial is determined automatically: sparse candidates
    /// are tried first, followed by random ones.
    pub fn galois_field(prime: R, exp: usize, var: Variable) -> Self {
        assert!(exp > 0);
        assert_eq!(
            prime.get_extension_degree(),
            1,
            "Galois fields are constructed over prime fields"
        );

        let vars = Arc::new(vec![var]);
        if exp == 1 {
            let poly = MultivariatePolynomial::new(&prime, None, vars);
            return AlgebraicExtension::new(poly.variable(0));
        }

        let is_irreducible = |coeffs: &[u64]| -> Option<MultivariatePolynomial<R, u16>> {
            let mut poly = MultivariatePolynomial::new(&prime, Some(coeffs.len()), vars.clone());
            for (i, c) in coeffs.iter().enumerate() {
                poly.append_monomial(prime.nth(&Integer::from(*c)), &[i as u16]);
            }

            if poly.is_irreducible_univariate() {
                Some(poly)
            } else {
                None
            }
        };

        let mut coeffs = vec![0; exp + 1];
        coeffs[exp] = 1;

        let p = prime.characteristic();
        if p == Integer::new(2) {
            coeffs[0] = 1;

            // an even number of terms vanishes at 1, so try an odd number of middle terms
            for g in 0..exp / 2 {
                let g = 2 * g + 1;

                let mut c = CombinationIterator::new(exp - 1, g);
                while let Some(comb) = c.next() {
                    for i in comb {
                        coeffs[i + 1] = 1;
                    }

                    if let Some(poly) = is_irreducible(&coeffs) {
                        return AlgebraicExtension::new(poly);
                    }

                    for i in comb {
                        coeffs[i + 1] = 0;
                    }
                }
            }

            unreachable!("No irreducible polynomial found for GF({}^{})", p, exp);
        }

        let sample_max = p.to_u64().unwrap_or(u64::MAX);
        if exp == 2 {
            for k in 1..sample_max {
                coeffs[0] = k;

                if let Some(poly) = is_irreducible(&coeffs) {
                    return AlgebraicExtension::new(poly);
                }
            }

            unreachable!("No irreducible polynomial found for GF({}^{})", p, exp);
        }

        // try shape x^n+a*x+b for fast reduction
        for k in 1..sample_max.min(32) {
            for k2 in 1..sample_max.min(32) {
                coeffs[0] = k;
                coeffs[1] = k2;

                if let Some(poly) = is_irreducible(&coeffs) {
                    return AlgebraicExtension::new(poly);
                }
            }
        }

        let mut r = rand::thread_rng();
        loop {
            for c in coeffs.iter_mut() {
                *c = r.gen_range(0..sample_max);
            }
            coeffs[exp] = 1;

            if let Some(poly) = is_irreducible(&coeffs) {
                return AlgebraicExtension::new(poly);
            }
        }
    }
}

impl<R: GaloisField> AlgebraicExtension<R> {
    /// Embed `self` into the larger field `big` over the same base field, by mapping the
    /// generator to a root of its minimal polynomial in `big`. Returns `None` if the degree
    /// of `big` is not a multiple of the degree of `self`.
    pub fn embed_into(&self, big: &AlgebraicExtension<R>) -> Option<GaloisEmbedding<R>> {
        if self.base() != big.base() || big.degree() % self.degree() != 0 {
            return None;
        }

        let min_poly = self.poly.map_coeff(|c| big.constant(c.clone()), big.clone());
        let root = min_poly
            .factor_distinct_equal_degree()
            .into_iter()
            .find(|g| g.degree(0) == 1)?;
        let b = big.neg(&big.div(&root.get_constant(), &root.lcoeff()));

        let mut powers = vec![big.one()];
        for i in 1..self.degree() {
            powers.push(big.mul(&powers[i - 1], &b));
        }

        let mut basis = Matrix::new(big.degree() as u32, powers.len() as u32, self.base().clone());
        for (col, p) in powers.iter().enumerate() {
            for t in &p.poly {
                basis[(t.exponents[0] as u32, col as u32)] = t.coefficient.clone();
            }
        }

        Some(GaloisEmbedding {
            small: self.clone(),
            big: big.clone(),
            powers,
            basis,
        })
    }
}

/// A field homomorphism from a Galois field into a larger one.
pub struct GaloisEmbedding<R: Field> {
    small: AlgebraicExtension<R>,
    big: AlgebraicExtension<R>,
    /// The powers `b^0, ..., b^(k-1)` of the image `b` of the generator.
    powers: Vec<AlgebraicNumber<R>>,
    /// The coordinates of the powers in the basis of `big`, one column per power.
    basis: Matrix<R>,
}

impl<R: Field> GaloisEmbedding<R> {
    pub fn small(&self) -> &AlgebraicExtension<R> {
        &self.small
    }

    pub fn big(&self) -> &AlgebraicExtension<R> {
        &self.big
    }

    /// Map an element of the small field into the large field.
    pub fn embed(&self, a: &AlgebraicNumber<R>) -> AlgebraicNumber<R> {
        let mut r = self.big.zero();
        for t in &a.poly {
            let c = self.big.constant(t.coefficient.clone());
            let m = self.big.mul(&c, &self.powers[t.exponents[0] as usize]);
            r = self.big.add(&r, &m);
        }
        r
    }

    /// Map an element of the large field back to the small field, if it is in the image.
    pub fn restrict(&self, a: &AlgebraicNumber<R>) -> Option<AlgebraicNumber<R>> {
        let field = self.small.base();
        let mut b = vec![field.zero(); self.big.degree()];
        for t in &a.poly {
            b[t.exponents[0] as usize] = t.coefficient.clone();
        }

        let sol = self.basis.solve(&Matrix::new_vec(b, field.clone())).ok()?;

        let mut poly = self.small.poly.zero();
        for (i, c) in sol.into_vec().into_iter().enumerate() {
            if !R::is_zero(&c) {
                poly.append_monomial(c, &[i as u16]);
            }
        }
        Some(self.small.to_element(poly))
    }
}

impl<R: Field> std::fmt::Debug for AlgebraicExtension<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} % {:?}", self.poly.ring, self.poly)
    }
}

impl<R: Field> std::fmt::Display for AlgebraicExtension<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]/({})", self.poly.ring, self.poly.variables[0], self.poly)
    }
}

/// A number in an algebraic extension, stored as a polynomial in the generator
/// of degree less than the degree of the extension.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AlgebraicNumber<R: Ring> {
    pub(crate) poly: MultivariatePolynomial<R, u16>,
}

impl<R: Ring> std::fmt::Debug for AlgebraicNumber<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.poly)
    }
}

impl<R: Ring> std::fmt::Display for AlgebraicNumber<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.poly)
    }
}

impl<R: Field> Ring for AlgebraicExtension<R> {
    type Element = AlgebraicNumber<R>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: &a.poly + &b.poly,
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: &a.poly - &b.poly,
        }
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a.poly.is_zero() || b.poly.is_zero() {
            return self.zero();
        }

        let p = &a.poly * &b.poly;
        if p.degree(0) < self.poly.degree(0) {
            AlgebraicNumber { poly: p }
        } else {
            AlgebraicNumber {
                poly: p.quot_rem_univariate(&self.poly).1,
            }
        }
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
        AlgebraicNumber {
            poly: -a.poly.clone(),
        }
    }

    fn zero(&self) -> Self::Element {
        AlgebraicNumber {
            poly: self.poly.zero(),
        }
    }

    fn one(&self) -> Self::Element {
        AlgebraicNumber {
            poly: self.poly.one(),
        }
    }

    fn nth(&self, n: &Integer) -> Self::Element {
        self.constant(self.poly.ring.nth(n))
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        self.pow_integer(b, &Integer::from(e))
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.poly.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.poly.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        true
    }

    fn is_field(&self) -> bool {
        true
    }

    fn characteristic(&self) -> Integer {
        self.poly.ring.characteristic()
    }

    fn size(&self) -> Integer {
        self.poly.ring.size().pow(self.poly.degree(0) as u64)
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.poly.is_zero() {
            None
        } else {
            Some(self.div(a, b))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let mut poly = self.poly.zero_with_capacity(self.degree());
        for i in 0..self.degree() {
            poly.append_monomial(self.poly.ring.sample(rng, range), &[i as u16]);
        }

        AlgebraicNumber { poly }
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        if in_product && element.poly.nterms() > 1 {
            write!(f, "({})", element.poly)
        } else {
            write!(f, "{}", element.poly)
        }
    }
}

impl<R: Field> EuclideanDomain for AlgebraicExtension<R> {
    fn rem(&self, _a: &Self::Element, _b: &Self::Element) -> Self::Element {
        self.zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), self.zero())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a.poly.is_zero() && b.poly.is_zero() {
            self.zero()
        } else {
            self.one()
        }
    }

    fn normalization_unit(&self, a: &Self::Element) -> Self::Element {
        if a.poly.is_zero() {
            self.one()
        } else {
            self.inv(a)
        }
    }
}

impl<R: Field> Field for AlgebraicExtension<R> {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        if a.poly.is_zero() {
            panic!("Division by zero");
        }

        // s * a + t * m = 1 as the defining polynomial is irreducible
        AlgebraicNumber {
            poly: a.poly.eea_univariate(&self.poly).1,
        }
    }
}

impl<R: GaloisField> GaloisField for AlgebraicExtension<R> {
    fn get_extension_degree(&self) -> u64 {
        self.poly.degree(0) as u64 * self.poly.ring.get_extension_degree()
    }

    /// Interpret the coefficients of the element as digits in base `|R|`.
    fn to_integer(&self, a: &Self::Element) -> Integer {
        let base = self.poly.ring.size();
        let mut p = Integer::zero();
        for x in &a.poly {
            p += &(self.poly.ring.to_integer(x.coefficient) * &base.pow(x.exponents[0] as u64));
        }
        p
    }

    fn frobenius(&self, a: &Self::Element) -> Self::Element {
        self.pow_integer(a, &self.characteristic())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{FiniteFieldCore, GaloisField, Zp, Z2};
    use crate::domains::integer::Integer;
    use crate::domains::{Field, Ring};
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    use super::AlgebraicExtension;

    #[test]
    fn gf4() {
        let field = AlgebraicExtension::galois_field(Z2, 2, Variable::Temporary(0));
        assert_eq!(field.size(), Integer::new(4));

        // every non-zero element has order 3
        let a = field.generator();
        assert!(field.is_one(&field.pow(&a, 3)));
        assert!(!field.is_one(&a));

        let b = field.add(&a, &field.one());
        assert!(field.is_one(&field.mul(&b, &field.inv(&b))));
        assert_eq!(field.frobenius(&field.frobenius(&b)), b);
        assert_eq!(field.frobenius(&field.pth_root(&b)), b);
    }

    #[test]
    fn explicit_extension() {
        let zp = Zp::new(7);
        let x = MultivariatePolynomial::<_, u16>::new(
            &zp,
            None,
            Arc::new(vec![Variable::from("a")]),
        )
        .variable(0);

        // x^2 + 1 is irreducible mod 7
        let field = AlgebraicExtension::new(&x.pow(2) + &x.one());
        let a = field.generator();
        assert_eq!(field.mul(&a, &a), field.constant(zp.to_element(6)));

        let c = field.add(&a, &field.nth(&Integer::new(3)));
        let d = field.inv(&c);
        assert!(field.is_one(&field.mul(&c, &d)));
        assert_eq!(field.to_base(&field.mul(&c, &d)), Some(zp.one()));
        assert_eq!(field.to_base(&c), None);
        assert_eq!(field.to_integer(&c), Integer::new(3 + 7));
    }

    #[test]
    fn subfield_embedding() {
        let gf4 = AlgebraicExtension::galois_field(Z2, 2, Variable::Temporary(0));
        let gf16 = AlgebraicExtension::galois_field(Z2, 4, Variable::Temporary(1));
        let gf8 = AlgebraicExtension::galois_field(Z2, 3, Variable::Temporary(2));
        assert!(gf4.embed_into(&gf8).is_none());

        let embedding = gf4.embed_into(&gf16).unwrap();
        let a = gf4.generator();
        let b = embedding.embed(&a);

        // the image of the generator satisfies its minimal polynomial
        let m = gf16.add(&gf16.add(&gf16.mul(&b, &b), &b), &gf16.one());
        assert_eq!(m, gf16.zero());

        let elements = [gf4.zero(), gf4.one(), a.clone(), gf4.add(&a, &gf4.one())];
        for x in &elements {
            for y in &elements {
                assert_eq!(
                    embedding.embed(&gf4.mul(x, y)),
                    gf16.mul(&embedding.embed(x), &embedding.embed(y))
                );
            }
            assert_eq!(embedding.restrict(&embedding.embed(x)).as_ref(), Some(x));
        }

        // the generator of GF(16) is not in GF(4)
        assert!(embedding.restrict(&gf16.generator()).is_none());
    }

    #[test]
    fn odd_galois_field() {
        let field = AlgebraicExtension::galois_field(Zp::new(5), 3, Variable::Temporary(0));
        assert_eq!(field.degree(), 3);
        assert!(field.poly().is_irreducible_univariate());

        let a = field.generator();
        let r = field.pth_root(&a);
        assert_eq!(field.pow(&r, 5), a);
        assert!(field.is_one(&field.pow(&a, 124)));
    }
}
