//! Factorization of multivariate polynomials over finite fields, Galois fields, the
//! integers, the rationals and polynomial rings over these.
//!
//! A polynomial is first split into square-free parts. Every part is then factored
//! with the drivers in [multivariate], which evaluate all but one or two variables,
//! factor the image and reconstruct the factors with Hensel lifting.

use std::fmt::Display;
use std::sync::Arc;

use ahash::HashMap;
use tracing::debug;

use crate::domains::algebraic_number::{AlgebraicExtension, AlgebraicNumber};
use crate::domains::finite_field::{FiniteField, FiniteFieldCore, FiniteFieldWorkspace, GaloisField};
use crate::domains::integer::{Integer, IntegerRing, Z};
use crate::domains::rational::{Rational, RationalField, Q};
use crate::domains::{EuclideanDomain, Field, Ring};

use super::order::MonomialOrder;
use super::polynomial::{MultivariatePolynomial, PolynomialRing};
use super::{Exponent, Variable};

pub mod bernardin;
pub mod diophantine;
pub mod evaluation;
pub mod hensel;
pub mod multivariate;
pub mod univariate;

pub use multivariate::{FactorError, MIN_EXTENSION_SIZE};

/// A polynomial written as `unit * f_1^e_1 * ... * f_n^e_n`, where `unit` is a constant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactorDecomposition<P> {
    pub unit: P,
    pub factors: Vec<(P, usize)>,
}

impl<F: Ring, E: Exponent> FactorDecomposition<MultivariatePolynomial<F, E>> {
    /// Multiply out the factors.
    pub fn expand(&self) -> MultivariatePolynomial<F, E> {
        self.factors
            .iter()
            .fold(self.unit.clone(), |acc, (f, e)| &acc * &f.pow(*e))
    }
}

impl<F: Ring, E: Exponent> Display for FactorDecomposition<MultivariatePolynomial<F, E>> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unit)?;
        for (p, e) in &self.factors {
            if *e == 1 {
                write!(f, "*({})", p)?;
            } else {
                write!(f, "*({})^{}", p, e)?;
            }
        }
        Ok(())
    }
}

pub trait Factorize: Sized {
    /// Perform a square-free factorization.
    /// The output is `u*a_1^e1*...*a_n^e_n`
    /// where each `a_i` is relative prime and square-free.
    fn square_free_factorization(&self) -> FactorDecomposition<Self>;
    /// Factor the polynomial into irreducible factors over its coefficient ring.
    ///
    /// Panics when the polynomial is zero.
    fn factor(&self) -> FactorDecomposition<Self>;
    /// Returns `true` if the polynomial is irreducible over its coefficient ring.
    fn is_irreducible(&self) -> bool {
        let f = self.factor();
        f.factors.len() == 1 && f.factors[0].1 == 1
    }
}

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E> {
    /// Run `factorize` on the polynomial in lexicographic order and construct the
    /// decomposition. The unit is the leading coefficient that is not accounted for by the factors.
    fn factor_with(
        &self,
        factorize: impl FnOnce(&Self) -> Vec<(Self, usize)>,
    ) -> FactorDecomposition<Self> {
        if self.is_zero() {
            panic!("Cannot factor the zero polynomial");
        }

        if self.is_constant() {
            return FactorDecomposition {
                unit: self.clone(),
                factors: vec![],
            };
        }

        let f = self.with_order(MonomialOrder::Lex);
        let factors = factorize(&f);

        let lc = factors.iter().fold(f.ring.one(), |acc, (g, e)| {
            f.ring.mul(&acc, &f.ring.pow(&g.lcoeff(), *e as u64))
        });
        let Some(unit) = f.ring.try_div(&f.lcoeff(), &lc) else {
            unreachable!("The factors of {} do not divide it", self);
        };

        FactorDecomposition {
            unit: self.constant(unit),
            factors: factors
                .into_iter()
                .map(|(g, e)| (g.with_order(self.order.clone()), e))
                .collect(),
        }
    }
}

impl<F: EuclideanDomain, E: Exponent> MultivariatePolynomial<F, E> {
    /// Find factors that do not contain all variables.
    pub fn factor_separable(&self) -> Vec<Self> {
        let mut stripped = self.clone();

        let mut factors = vec![];
        for x in 0..self.nvars() {
            if self.degree(x) == E::zero() {
                continue;
            }

            let gcd = stripped.content_in_var(x);
            if !gcd.is_constant() {
                stripped = stripped / &gcd;
                factors.extend(gcd.factor_separable());
            }
        }

        factors.push(stripped);
        factors
    }

    /// Perform a square free factorization using Yun's algorithm.
    ///
    /// The characteristic of the ring must be 0 and all variables
    /// must occur in every factor.
    fn square_free_factorization_0_char(&self) -> Vec<(Self, usize)> {
        // any variable can be selected, so take the one with the lowest degree
        let Some(var) = (0..self.nvars())
            .map(|x| (x, self.degree(x)))
            .filter(|(_, d)| *d > E::zero())
            .min_by_key(|(_, d)| *d)
            .map(|(x, _)| x)
        else {
            return vec![];
        };

        let b = self.derivative(var);
        let c = self.gcd(&b);

        if c.is_one() {
            return vec![(self.clone(), 1)];
        }

        let mut factors = vec![];

        let mut w = self / &c;
        let mut y = &b / &c;

        let mut i = 1;
        while !w.is_constant() {
            let z = y - w.derivative(var);
            let g = w.gcd(&z);
            w = w / &g;
            y = z / &g;

            if !g.is_one() {
                factors.push((g, i));
            }
            i += 1
        }

        factors
    }
}

impl<F: GaloisField, E: Exponent> MultivariatePolynomial<F, E> {
    /// Compute the monic square-free parts.
    fn square_free_galois(&self) -> Vec<(Self, usize)> {
        let f = self.clone().make_monic();

        let mut factors = vec![];
        for g in f.factor_separable() {
            factors.extend(g.square_free_factorization_bernardin());
        }
        factors
    }

    /// Factor into monic irreducible factors.
    fn factor_galois(&self) -> Result<Vec<(Self, usize)>, FactorError> {
        let mut factors = vec![];
        for (f, e) in self.square_free_galois() {
            debug!("SFF {} {}", f, e);
            factors.extend(f.factor_square_free_galois()?.into_iter().map(|g| (g, e)));
        }
        Ok(factors)
    }

    /// Bernardin's algorithm for square free factorization.
    fn square_free_factorization_bernardin(&self) -> Vec<(Self, usize)> {
        if self.is_constant() {
            return vec![];
        }

        let mut f = self.clone();

        let mut h: HashMap<usize, Self> = HashMap::default();
        let mut hr;
        for var in 0..self.nvars() {
            if f.degree(var) > E::zero() {
                (f, hr) = f.square_free_factorization_ff_yun(var);

                for (part, pow) in hr {
                    h.entry(pow)
                        .and_modify(|f| {
                            *f = &*f * &part;
                        })
                        .or_insert(part);
                }
            }
        }

        let mut factors = vec![];

        if !f.is_constant() {
            // the derivative in every variable is 0, so all exponents are divisible by p
            // and the p-th root of the coefficients exists
            let p = self.ring.characteristic().to_u64().unwrap_or(u64::MAX) as usize;
            let mut b = f.map_coeff(|c| f.ring.pth_root(c), f.ring.clone());
            for e in &mut b.exponents {
                debug_assert_eq!(e.to_u32() as usize % p, 0);
                *e = *e / E::from_u32(p as u32);
            }

            for (mut k, n) in b.square_free_factorization_bernardin() {
                for (powh, hi) in &mut h {
                    let g = k.gcd(hi);
                    if !g.is_constant() {
                        k = k / &g;
                        *hi = &*hi / &g;
                        factors.push((g, n * p + *powh));
                    }
                }

                if !k.is_constant() {
                    factors.push((k, n * p));
                }
            }
        }

        for (powh, hi) in h {
            if !hi.is_constant() {
                factors.push((hi, powh));
            }
        }

        factors
    }

    /// A modified version of Yun's square free factorization algorithm. Returns the
    /// part of which the multiplicity of every factor is divisible by `p`, and the
    /// parts with lower multiplicities.
    fn square_free_factorization_ff_yun(&self, var: usize) -> (Self, Vec<(Self, usize)>) {
        let p = self.ring.characteristic().to_u64().unwrap_or(u64::MAX);

        let b = self.derivative(var);
        let mut c = self.gcd(&b);
        let mut w = self / &c;
        let mut v = &b / &c;

        let mut factors = vec![];

        let mut i = 1;
        while !w.is_constant() && i < p {
            let z = v - w.derivative(var);
            let g = w.gcd(&z);
            w = w / &g;
            v = z / &g;
            c = c / &w;

            if !g.is_one() {
                factors.push((g, i as usize));
            }
            i += 1
        }

        (c, factors)
    }
}

/// Multiply the monic factors that are conjugate under the field automorphism `sigma`.
fn conjugate_orbits<F: Field, E: Exponent>(
    mut factors: Vec<MultivariatePolynomial<F, E>>,
    sigma: impl Fn(&F::Element) -> F::Element,
) -> Vec<MultivariatePolynomial<F, E>> {
    let mut orbits = vec![];
    while let Some(g) = factors.pop() {
        let mut orbit = g.clone();
        let mut conj = g.map_coeff(&sigma, g.ring.clone());
        while conj != g {
            if let Some(i) = factors.iter().position(|h| *h == conj) {
                factors.swap_remove(i);
            }
            orbit = &orbit * &conj;
            conj = conj.map_coeff(&sigma, g.ring.clone());
        }
        orbits.push(orbit);
    }
    orbits
}

/// The smallest `k > 1` such that a field with `size^k` elements has at least
/// [MIN_EXTENSION_SIZE] elements.
fn extension_degree(size: &Integer) -> usize {
    let min_size = Integer::from(MIN_EXTENSION_SIZE);
    let mut k = 2;
    while size.pow(k as u64) < min_size {
        k += 1;
    }
    k
}

impl<UField: FiniteFieldWorkspace, E: Exponent> MultivariatePolynomial<FiniteField<UField>, E>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    /// Factor a square-free polynomial over a Galois field `GF(p^k)` with at least
    /// [MIN_EXTENSION_SIZE] elements, growing `k` until the factorization succeeds. The
    /// factors that are conjugate under the Frobenius map are multiplied, which yields
    /// the factors over the prime field.
    fn factor_in_extension(&self) -> Vec<Self> {
        let mut k = extension_degree(&self.ring.size());
        loop {
            let ext = AlgebraicExtension::galois_field(self.ring.clone(), k, Variable::Temporary(0));
            debug!("Factoring {} over {}", self, ext);

            let f = self.map_coeff(|c| ext.constant(c.clone()), ext.clone());
            let ext_factors = match f.factor_square_free_galois() {
                Ok(factors) => factors,
                Err(e) => {
                    debug!("{} over {}", e, ext);
                    k += 1;
                    continue;
                }
            };

            return conjugate_orbits(ext_factors, |c| ext.frobenius(c))
                .into_iter()
                .map(|orbit| {
                    let coefficients = orbit
                        .coefficients
                        .iter()
                        .map(|c| match ext.to_base(c) {
                            Some(c) => c,
                            None => unreachable!("Frobenius orbit product {} is not over the base field", orbit),
                        })
                        .collect();
                    self.from_unsorted_terms(coefficients, orbit.exponents.clone())
                })
                .collect();
        }
    }
}

impl<UField: FiniteFieldWorkspace, E: Exponent> Factorize
    for MultivariatePolynomial<FiniteField<UField>, E>
where
    FiniteField<UField>: FiniteFieldCore<UField>,
{
    fn square_free_factorization(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| f.square_free_galois())
    }

    fn factor(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| {
            let mut factors = vec![];
            for (g, e) in f.square_free_galois() {
                debug!("SFF {} {}", g, e);
                let parts = match g.factor_square_free_galois() {
                    Ok(parts) => parts,
                    Err(err) => {
                        debug!("{}: factoring {} in an extension", err, g);
                        g.factor_in_extension()
                    }
                };
                factors.extend(parts.into_iter().map(|h| (h, e)));
            }
            factors
        })
    }
}

impl<R: GaloisField, E: Exponent> MultivariatePolynomial<AlgebraicExtension<R>, E> {
    /// Factor a square-free polynomial over `GF(p^k)` in a larger field `GF(p^(k m))`
    /// with at least [MIN_EXTENSION_SIZE] elements, growing `m` until the factorization
    /// succeeds. The field must be an extension of a prime field.
    ///
    /// The factors that are conjugate under `a -> a^(p^k)` are multiplied and mapped back to `GF(p^k)`.
    fn factor_in_larger_extension(&self) -> Vec<Self> {
        let field = &self.ring;
        let k = field.degree();
        let sigma_power = field.get_extension_degree();

        let mut m = extension_degree(&field.size());
        loop {
            let big = AlgebraicExtension::galois_field(field.base().clone(), k * m, Variable::Temporary(0));
            let Some(embedding) = field.embed_into(&big) else {
                unreachable!("{} is not a subfield of {}", field, big);
            };
            debug!("Factoring {} over {}", self, big);

            let f = self.map_coeff(|c| embedding.embed(c), big.clone());
            let big_factors = match f.factor_square_free_galois() {
                Ok(factors) => factors,
                Err(e) => {
                    debug!("{} over {}", e, big);
                    m += 1;
                    continue;
                }
            };

            let sigma = |c: &AlgebraicNumber<R>| (0..sigma_power).fold(c.clone(), |a, _| big.frobenius(&a));
            return conjugate_orbits(big_factors, sigma)
                .into_iter()
                .map(|orbit| {
                    let coefficients = orbit
                        .coefficients
                        .iter()
                        .map(|c| match embedding.restrict(c) {
                            Some(c) => c,
                            None => unreachable!("Orbit product {} is not over {}", orbit, field),
                        })
                        .collect();
                    self.from_unsorted_terms(coefficients, orbit.exponents.clone())
                })
                .collect();
        }
    }
}

impl<R: GaloisField, E: Exponent> Factorize for MultivariatePolynomial<AlgebraicExtension<R>, E> {
    fn square_free_factorization(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| f.square_free_galois())
    }

    /// Factor over the Galois field. When the field is too small to find good evaluation
    /// points, the square-free parts are factored in a larger extension.
    fn factor(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| {
            let mut factors = vec![];
            for (g, e) in f.square_free_galois() {
                debug!("SFF {} {}", g, e);
                let parts = match g.factor_square_free_galois() {
                    Ok(parts) => parts,
                    Err(err) => {
                        debug!("{}: factoring {} in a larger extension", err, g);
                        g.factor_in_larger_extension()
                    }
                };
                factors.extend(parts.into_iter().map(|h| (h, e)));
            }
            factors
        })
    }
}

impl<E: Exponent> MultivariatePolynomial<IntegerRing, E> {
    fn square_free_integer(&self) -> Vec<(Self, usize)> {
        let f = self.clone().make_primitive();

        let mut factors = vec![];
        for g in f.factor_separable() {
            factors.extend(g.square_free_factorization_0_char());
        }
        factors
    }

    fn factor_integer(&self) -> Vec<(Self, usize)> {
        let mut factors = vec![];
        for (f, e) in self.square_free_integer() {
            debug!("SFF {} {}", f, e);
            factors.extend(f.factor_square_free_integer().into_iter().map(|g| (g, e)));
        }
        factors
    }
}

impl<E: Exponent> Factorize for MultivariatePolynomial<IntegerRing, E> {
    /// Perform a square-free factorization. The content is part of the unit.
    fn square_free_factorization(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| f.square_free_integer())
    }

    fn factor(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| f.factor_integer())
    }
}

impl<E: Exponent> MultivariatePolynomial<RationalField, E> {
    /// Apply `factorize` to the integer polynomial with the same factors as `self`.
    /// The factors have integer coefficients.
    fn via_integers(
        &self,
        factorize: impl FnOnce(
            &MultivariatePolynomial<IntegerRing, E>,
        ) -> Vec<(MultivariatePolynomial<IntegerRing, E>, usize)>,
    ) -> Vec<(Self, usize)> {
        let c = self.content();

        let stripped = self.map_coeff(
            |coeff| {
                let coeff = self.ring.div(coeff, &c);
                debug_assert!(coeff.is_integer());
                coeff.numerator()
            },
            Z,
        );

        factorize(&stripped)
            .into_iter()
            .map(|(f, e)| (f.map_coeff(|c| Rational::from(c.clone()), Q), e))
            .collect()
    }
}

impl<E: Exponent> Factorize for MultivariatePolynomial<RationalField, E> {
    fn square_free_factorization(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| f.via_integers(|g| g.square_free_integer()))
    }

    fn factor(&self) -> FactorDecomposition<Self> {
        self.factor_with(|f| f.via_integers(|g| g.factor_integer()))
    }
}

impl<R: Ring, E: Exponent> MultivariatePolynomial<PolynomialRing<R, E>, E> {
    /// Write the polynomial as a polynomial over `R` in the outer variables followed
    /// by the variables of the coefficient ring.
    fn flatten(&self) -> MultivariatePolynomial<R, E> {
        let variables: Vec<_> = self
            .variables
            .iter()
            .chain(self.ring.get_vars_ref())
            .cloned()
            .collect();
        let flat = MultivariatePolynomial::new(self.ring.coefficient_ring(), None, Arc::new(variables));

        let mut coefficients = vec![];
        let mut exponents = vec![];
        for t in self {
            for c in t.coefficient {
                coefficients.push(c.coefficient.clone());
                exponents.extend_from_slice(t.exponents);
                exponents.extend_from_slice(c.exponents);
            }
        }

        flat.from_unsorted_terms(coefficients, exponents)
    }

    /// Undo [Self::flatten].
    fn unflatten(&self, g: &MultivariatePolynomial<R, E>) -> Self {
        let n = self.nvars();
        let inner = self.ring.zero();

        let mut coefficients = Vec::with_capacity(g.nterms());
        let mut exponents = Vec::with_capacity(g.nterms() * n);
        for t in g {
            coefficients.push(inner.monomial(t.coefficient.clone(), t.exponents[n..].to_vec()));
            exponents.extend_from_slice(&t.exponents[..n]);
        }

        self.from_unsorted_terms(coefficients, exponents)
    }

    /// Convert a decomposition of the flattened polynomial. Factors that only depend on
    /// the variables of the coefficient ring are moved into the unit.
    fn unflatten_decomposition(
        &self,
        flat: FactorDecomposition<MultivariatePolynomial<R, E>>,
    ) -> FactorDecomposition<Self> {
        let mut unit = self.unflatten(&flat.unit);
        let mut factors = vec![];
        for (g, e) in &flat.factors {
            let h = self.unflatten(g);
            if h.is_constant() {
                unit = &unit * &h.pow(*e);
            } else {
                factors.push((h, *e));
            }
        }

        FactorDecomposition { unit, factors }
    }
}

impl<R: Ring, E: Exponent> Factorize for MultivariatePolynomial<PolynomialRing<R, E>, E>
where
    MultivariatePolynomial<R, E>: Factorize,
{
    fn square_free_factorization(&self) -> FactorDecomposition<Self> {
        if self.is_zero() {
            panic!("Cannot factor the zero polynomial");
        }
        self.unflatten_decomposition(self.flatten().square_free_factorization())
    }

    fn factor(&self) -> FactorDecomposition<Self> {
        if self.is_zero() {
            panic!("Cannot factor the zero polynomial");
        }
        self.unflatten_decomposition(self.flatten().factor())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::algebraic_number::AlgebraicExtension;
    use crate::domains::finite_field::{FiniteFieldCore, Zp, Z2};
    use crate::domains::integer::{Integer, Z};
    use crate::domains::Ring;
    use crate::domains::rational::{Rational, Q};
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    use super::Factorize;

    fn vars() -> Arc<Vec<Variable>> {
        Arc::new(vec![Variable::from("x"), Variable::from("y")])
    }

    fn contains_all<P: PartialEq + std::fmt::Debug>(factors: &[(P, usize)], expected: &[(P, usize)]) {
        assert_eq!(factors.len(), expected.len(), "{:?}", factors);
        for e in expected {
            assert!(factors.contains(e), "{:?} not in {:?}", e, factors);
        }
    }

    #[test]
    fn square_free_char_p() {
        let field = Zp::new(3);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));
        let c = |n: u32| field.to_element(n);

        let a = x.clone().add_constant(c(1));
        let b = &x + &y;
        let d = y.clone().add_constant(c(2));
        let f = &(&a.pow(3) * &b.pow(2)) * &d;

        let sqf = f.square_free_factorization();
        contains_all(&sqf.factors, &[(a, 3), (b, 2), (d, 1)]);
        assert_eq!(sqf.expand(), f);
    }

    #[test]
    fn square_free_char_0() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));

        let a = x.clone().add_constant(Integer::one());
        let b = (&x * &y).add_constant(Integer::new(-2));
        let f = (&a.pow(2) * &b.pow(3)).mul_coeff(Integer::new(3));

        let sqf = f.square_free_factorization();
        contains_all(&sqf.factors, &[(a, 2), (b, 3)]);
        assert_eq!(sqf.unit, zero.constant(Integer::new(3)));
        assert_eq!(sqf.expand(), f);
    }

    #[test]
    fn characteristic_two_square() {
        let zero = MultivariatePolynomial::<_, u8>::new(&Z2, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));

        let f = &x.pow(2) + &y.pow(2);
        let factors = f.factor();
        assert_eq!(factors.factors, vec![(&x + &y, 2)]);
        assert!(factors.unit.is_one());
    }

    #[test]
    fn rational_unit() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Q, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));

        // -3/2 (x + y) (2 x - y)
        let a = &x + &y;
        let b = &x.clone().mul_coeff(Rational::from(2i64)) - &y;
        let f = (&a * &b).mul_coeff(Rational::from((-3i64, 2i64)));

        let factors = f.factor();
        contains_all(&factors.factors, &[(a, 1), (b, 1)]);
        assert_eq!(factors.unit, zero.constant(Rational::from((-3i64, 2i64))));
        assert_eq!(factors.expand(), f);
    }

    #[test]
    fn small_field() {
        let field = Zp::new(3);
        let vars = Arc::new(vec![
            Variable::from("x"),
            Variable::from("y"),
            Variable::from("z"),
        ]);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars);
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
        let c = |n: u32| zero.constant(field.to_element(n));

        let a = &(&(&x.pow(2) * &y) + &(&z.pow(2) * &x)) + &c(1);
        let b = &(&(&y.pow(2) * &z) + &x.pow(2)) + &(&y * &c(2));
        let f = &a * &b;

        let factors = f.factor();
        contains_all(&factors.factors, &[(a, 1), (b, 1)]);
        assert_eq!(factors.expand(), f);
    }

    #[test]
    fn larger_galois_extension() {
        let field = AlgebraicExtension::galois_field(Z2, 2, Variable::Temporary(0));
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));
        let g = zero.constant(field.generator());

        // t^2 + t + g has no root in GF(4), so the first factor only splits over GF(16)
        let a = &(&x.pow(2) + &(&x * &y)) + &(&g * &y.pow(2));
        let b = (&(&x.pow(2) * &y) + &(&g * &x)).add_constant(field.one());
        let f = &a * &b;

        let factors = f.factor_in_larger_extension();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a));
        assert!(factors.contains(&b));
    }
}
