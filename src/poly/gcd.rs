//! Greatest common divisors of multivariate polynomials.
//!
//! Every coefficient ring implements [PolynomialGCD], which may provide a dedicated
//! algorithm. Over finite fields the last variable is evaluated at random points,
//! the gcds of the images are computed recursively and the result is found with
//! Newton interpolation. Over the integers, gcds of images modulo the primes in
//! [LARGE_U32_PRIMES] are combined with the Chinese remainder theorem. The rationals
//! use the integer algorithm. All other cases, and finite fields that are too small
//! to provide enough evaluation points, use a recursive primitive polynomial
//! remainder sequence.

use std::cmp::Ordering;

use ahash::{HashMap, HashSet};
use rand::thread_rng;
use tracing::debug;

use crate::domains::algebraic_number::AlgebraicExtension;
use crate::domains::finite_field::{FiniteFieldCore, ToFiniteField, Zp, ZpLarge, Z2};
use crate::domains::integer::{Integer, IntegerRing, Z};
use crate::domains::rational::{Rational, RationalField, Q};
use crate::domains::{EuclideanDomain, Field, Ring};

use super::order::MonomialOrder;
use super::polynomial::{MultivariatePolynomial, PolynomialRing};
use super::Exponent;

/// Primes just below `2^32`, used for modular images of integer polynomials.
pub const LARGE_U32_PRIMES: [u32; 100] = [
    4293490987, 4293491603, 4293492277, 4293492857, 4293491017, 4293491621, 4293492283, 4293492881,
    4293491023, 4293491639, 4293492293, 4293492893, 4293491051, 4293491659, 4293492331, 4293492941,
    4293491149, 4293491701, 4293492349, 4293492977, 4293491171, 4293491711, 4293492383, 4293493037,
    4293491221, 4293491747, 4293492403, 4293493049, 4293491261, 4293491779, 4293492421, 4293493069,
    4293491269, 4293491791, 4293492431, 4293493081, 4293491273, 4293491819, 4293492487, 4293493091,
    4293491281, 4293491849, 4293492499, 4293493117, 4293491299, 4293491863, 4293492523, 4293493121,
    4293491303, 4293491887, 4293492583, 4293493159, 4293491311, 4293491897, 4293492587, 4293493163,
    4293491327, 4293491911, 4293492649, 4293493207, 4293491329, 4293491953, 4293492661, 4293493229,
    4293491399, 4293491957, 4293492673, 4293493241, 4293491431, 4293492017, 4293492701, 4293493261,
    4293491467, 4293492023, 4293492739, 4293493319, 4293491509, 4293492097, 4293492751, 4293493363,
    4293491539, 4293492101, 4293492769, 4293493367, 4293491551, 4293492107, 4293492779, 4293493409,
    4293491561, 4293492113, 4293492781, 4293493423, 4293491567, 4293492139, 4293492811, 4293493433,
    4293491591, 4293492169, 4293492821, 4293493487,
];

/// The number of times a sampled evaluation point may repeat before the
/// field is considered too small for the modular gcd.
pub const MAX_REPEATED_SAMPLES: usize = 100;

/// A ring with a dedicated algorithm for the gcd of polynomials over it.
pub trait PolynomialGCD: Ring {
    /// Compute the gcd of two non-constant polynomials in lexicographic order.
    /// `None` means that the recursive polynomial remainder sequence should be used.
    fn polynomial_gcd<E: Exponent>(
        _a: &MultivariatePolynomial<Self, E>,
        _b: &MultivariatePolynomial<Self, E>,
    ) -> Option<MultivariatePolynomial<Self, E>> {
        None
    }
}

impl PolynomialGCD for IntegerRing {
    fn polynomial_gcd<E: Exponent>(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
    ) -> Option<MultivariatePolynomial<Self, E>> {
        MultivariatePolynomial::gcd_crt(a, b)
    }
}

impl PolynomialGCD for RationalField {
    fn polynomial_gcd<E: Exponent>(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
    ) -> Option<MultivariatePolynomial<Self, E>> {
        let to_integer = |p: &MultivariatePolynomial<Self, E>| {
            let c = p.content();
            p.map_coeff(|x| Q.div(x, &c).numerator(), Z)
        };

        let g = to_integer(a).gcd(&to_integer(b));
        Some(g.map_coeff(|x| Rational::from(x.clone()), Q))
    }
}

impl PolynomialGCD for Zp {
    fn polynomial_gcd<E: Exponent>(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
    ) -> Option<MultivariatePolynomial<Self, E>> {
        MultivariatePolynomial::gcd_dense_modular(a, b)
    }
}

impl PolynomialGCD for Z2 {
    fn polynomial_gcd<E: Exponent>(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
    ) -> Option<MultivariatePolynomial<Self, E>> {
        MultivariatePolynomial::gcd_dense_modular(a, b)
    }
}

impl PolynomialGCD for ZpLarge {
    fn polynomial_gcd<E: Exponent>(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
    ) -> Option<MultivariatePolynomial<Self, E>> {
        MultivariatePolynomial::gcd_dense_modular(a, b)
    }
}

impl<R: Field> PolynomialGCD for AlgebraicExtension<R> {
    fn polynomial_gcd<E: Exponent>(
        a: &MultivariatePolynomial<Self, E>,
        b: &MultivariatePolynomial<Self, E>,
    ) -> Option<MultivariatePolynomial<Self, E>> {
        MultivariatePolynomial::gcd_dense_modular(a, b)
    }
}

impl<R: EuclideanDomain, E: Exponent> PolynomialGCD for PolynomialRing<R, E> {}

impl<R: EuclideanDomain, E: Exponent> MultivariatePolynomial<R, E> {
    /// Compute the greatest common divisor of `self` and `b`. The result is normalized
    /// with [EuclideanDomain::normalization_unit], so that it is monic over a finite field and
    /// has a positive leading coefficient over the integers.
    pub fn gcd(&self, b: &Self) -> Self {
        if let Some(g) = Self::simple_gcd(self, b) {
            return g;
        }

        if self.order != MonomialOrder::Lex || b.order != MonomialOrder::Lex {
            let g = self
                .with_order(MonomialOrder::Lex)
                .gcd(&b.with_order(MonomialOrder::Lex));
            return g.with_order(self.order.clone()).canonical_associate();
        }

        match R::polynomial_gcd(self, b) {
            Some(g) => g.canonical_associate(),
            None => self.gcd_prs(b),
        }
    }

    /// Compute the GCD for simple cases.
    #[inline]
    fn simple_gcd(a: &Self, b: &Self) -> Option<Self> {
        if a.is_zero() {
            return Some(b.clone().canonical_associate());
        }
        if b.is_zero() || a == b {
            return Some(a.clone().canonical_associate());
        }

        if a.is_constant() || b.is_constant() {
            if a.ring.is_field() {
                return Some(a.one());
            }

            let g = a.ring.gcd(&a.content(), &b.content());
            return Some(a.constant(g).normalize());
        }

        None
    }

    /// Multiply by the normalization unit of the leading coefficient.
    pub fn normalize(self) -> Self {
        if self.is_zero() {
            return self;
        }

        let u = self.ring.normalization_unit(&self.lcoeff());
        if self.ring.is_one(&u) {
            self
        } else {
            self.mul_coeff(u)
        }
    }

    /// Over a field the primitive part is canonical, otherwise only the unit is removed.
    fn canonical_associate(self) -> Self {
        if self.ring.is_field() {
            self.make_primitive()
        } else {
            self.normalize()
        }
    }

    /// Returns `true` if no variable other than `var` occurs.
    fn is_univariate_in(&self, var: usize) -> bool {
        self.exponents_iter()
            .all(|e| e.iter().enumerate().all(|(i, x)| i == var || x.is_zero()))
    }

    /// Euclid's algorithm for univariate polynomials over a field.
    fn euclid(mut a: Self, mut b: Self) -> Self {
        if a.last_exponents() < b.last_exponents() {
            std::mem::swap(&mut a, &mut b);
        }

        while !b.is_zero() {
            let r = a.remainder(std::slice::from_ref(&b));
            a = b;
            b = r;
        }

        a
    }

    /// Compute the gcd by splitting off the content in the first occurring variable
    /// and running a primitive polynomial remainder sequence on the primitive parts.
    fn gcd_prs(&self, b: &Self) -> Self {
        let var = match (self.first_occurring_var(), b.first_occurring_var()) {
            (Some(v1), Some(v2)) => v1.min(v2),
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => unreachable!("Constant case is handled by simple_gcd"),
        };

        // a polynomial that does not depend on `var` can only share the content in `var`
        if !self.contains(var) {
            return self.gcd(&b.content_in_var(var));
        }
        if !b.contains(var) {
            return b.gcd(&self.content_in_var(var));
        }

        let ca = self.content_in_var(var);
        let cb = b.content_in_var(var);
        let c = ca.gcd(&cb);

        let pa = self / &ca;
        let pb = b / &cb;

        let g = if self.ring.is_field() && pa.is_univariate_in(var) && pb.is_univariate_in(var) {
            Self::euclid(pa, pb)
        } else {
            Self::primitive_prs(pa, pb, var)
        };

        (g * &c).canonical_associate()
    }

    /// Compute the gcd of two polynomials that are primitive in `var`, using a
    /// primitive polynomial remainder sequence.
    fn primitive_prs(mut a: Self, mut b: Self, var: usize) -> Self {
        if a.degree(var) < b.degree(var) {
            std::mem::swap(&mut a, &mut b);
        }

        loop {
            let r = a.pseudo_remainder_in_var(&b, var);
            if r.is_zero() {
                return b.primitive_part_in_var(var);
            }

            if !r.contains(var) {
                // the primitive parts are coprime
                return a.one();
            }

            a = b;
            b = r.primitive_part_in_var(var);
        }
    }

    /// Compute the pseudo-remainder of `self` divided by `b`, where both are
    /// viewed as univariate polynomials in `var`.
    pub fn pseudo_remainder_in_var(&self, b: &Self, var: usize) -> Self {
        let db = b.degree(var);
        let lb = b.univariate_lcoeff(var);

        let mut e = vec![E::zero(); self.nvars()];
        let mut r = self.clone();
        while !r.is_zero() && r.degree(var) >= db {
            let lr = r.univariate_lcoeff(var);
            e[var] = r.degree(var) - db;
            r = &r * &lb - (b * &lr).mul_exp(&e);
        }

        r
    }

    /// Compute the gcd of the coefficients of `self` viewed as a univariate polynomial
    /// in `var`. The result does not depend on `var`.
    pub fn content_in_var(&self, var: usize) -> Self {
        if self.is_zero() {
            return self.clone();
        }

        let coeffs: Vec<_> = self
            .to_univariate_polynomial_list(var)
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        Self::gcd_multiple(coeffs)
    }

    /// Divide `self` by its content in `var`.
    pub fn primitive_part_in_var(&self, var: usize) -> Self {
        if self.is_zero() {
            return self.clone();
        }

        let c = self.content_in_var(var);
        if c.is_one() {
            self.clone()
        } else {
            self / &c
        }
    }

    /// Compute the gcd of a list of polynomials, starting with the smallest.
    pub fn gcd_multiple(mut f: Vec<Self>) -> Self {
        assert!(!f.is_empty());

        if f.len() == 1 {
            return f.swap_remove(0).canonical_associate();
        }

        f.sort_unstable_by_key(|p| p.nterms());

        let mut gcd = f[0].clone();
        for p in f.iter().skip(1) {
            gcd = gcd.gcd(p);
            if gcd.is_one() {
                break;
            }
        }
        gcd
    }

    /// Compute a gcd-free basis of `polys`: a list of pairwise coprime polynomials
    /// such that every input is a product of elements of the basis, up to a constant.
    pub fn gcd_free_basis(mut polys: Vec<Self>) -> Vec<Self> {
        polys.retain(|p| !p.is_constant());

        let mut i = 0;
        while i + 1 < polys.len() {
            if polys[i].is_constant() {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < polys.len() {
                if polys[j].is_constant() {
                    j += 1;
                    continue;
                }

                let g = polys[i].gcd(&polys[j]);
                if !g.is_constant() {
                    debug!("Split off {} in gcd-free basis", g);
                    polys[i] = &polys[i] / &g;
                    polys[j] = &polys[j] / &g;
                    polys.push(g);
                }

                j += 1;
            }

            i += 1;
        }

        polys.retain(|p| !p.is_constant());
        polys
            .into_iter()
            .map(|p| p.make_primitive())
            .collect()
    }

    /// Group the terms by their exponents in all variables except `var`. Every group
    /// is returned as a univariate polynomial in `var`, sorted ascending in the
    /// lexicographic order of the remaining exponents.
    fn coefficients_in(&self, var: usize) -> Vec<(Vec<E>, Self)> {
        let mut index: HashMap<Vec<E>, usize> = HashMap::default();
        let mut groups: Vec<(Vec<E>, Self)> = vec![];

        let mut e = vec![E::zero(); self.nvars()];
        for t in self {
            let mut key = t.exponents.to_vec();
            e[var] = key[var];
            key[var] = E::zero();

            let i = match index.get(&key) {
                Some(i) => *i,
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, self.zero()));
                    groups.len() - 1
                }
            };
            groups[i].1.append_monomial(t.coefficient.clone(), &e);
        }

        groups.sort_by(|a, b| MonomialOrder::Lex.cmp(&a.0, &b.0));
        groups
    }
}

impl<F: Field, E: Exponent> MultivariatePolynomial<F, E> {
    /// Compute the monic gcd of the coefficients of `self` viewed as a polynomial
    /// over `F[var]`.
    fn content_over_univariate(&self, var: usize) -> Self {
        let mut content: Option<Self> = None;
        for (_, c) in self.coefficients_in(var) {
            let g = match content {
                Some(g) => Self::euclid(g, c),
                None => c,
            };
            if g.is_constant() {
                return self.one();
            }
            content = Some(g);
        }

        match content {
            Some(c) => c.make_monic(),
            None => self.zero(),
        }
    }

    /// Compute the gcd of two polynomials in lexicographic order over a field.
    ///
    /// The last occurring variable `x` is evaluated at random points `α`, the
    /// gcds of the images are computed recursively and the images are combined with
    /// Newton interpolation. The images are scaled by `γ(α)`, where `γ` is the gcd of the
    /// leading coefficients of the inputs over `F[x]`. Images whose leading monomial is
    /// larger than that of the other images come from unlucky points and are discarded.
    ///
    /// Returns `None` when the field does not have enough elements.
    fn gcd_dense_modular(a: &Self, b: &Self) -> Option<Self> {
        if a.is_zero() {
            return Some(b.clone().make_monic());
        }
        if b.is_zero() {
            return Some(a.clone().make_monic());
        }
        if a.is_constant() || b.is_constant() {
            return Some(a.one());
        }

        let vars: Vec<_> = (0..a.nvars())
            .filter(|v| a.contains(*v) || b.contains(*v))
            .collect();
        let (&x, main) = vars.split_last()?;

        if main.is_empty() {
            return Some(Self::euclid(a.clone(), b.clone()).make_monic());
        }

        let ca = a.content_over_univariate(x);
        let cb = b.content_over_univariate(x);
        let content = Self::euclid(ca.clone(), cb.clone()).make_monic();
        let a = a / &ca;
        let b = b / &cb;

        let lca = a.coefficients_in(x).pop()?.1;
        let lcb = b.coefficients_in(x).pop()?.1;
        let gamma = Self::euclid(lca.clone(), lcb.clone()).make_monic();

        // the interpolant has at most this degree in `x`
        let bound = a.degree(x).min(b.degree(x)).to_u32() + gamma.degree(x).to_u32();

        let ring = a.ring.clone();
        let size = ring.size();
        let var_x = a.variable(x);

        let mut rng = thread_rng();
        let mut used = HashSet::default();
        let mut repeats = 0;

        // the interpolant, the product of `x - α` over the points used, and the leading exponents
        let mut interpolant: Option<(Self, Self, Vec<E>)> = None;
        loop {
            if !size.is_zero() && Integer::from(used.len()) >= size {
                debug!("Ran out of evaluation points in {} for gcd", ring);
                return None;
            }

            let alpha = ring.sample(&mut rng, (0, i64::MAX));
            if !used.insert(alpha.clone()) {
                repeats += 1;
                if repeats > MAX_REPEATED_SAMPLES {
                    debug!("Field {} is too small for a modular gcd", ring);
                    return None;
                }
                continue;
            }

            if F::is_zero(&lca.replace(x, &alpha).get_constant())
                || F::is_zero(&lcb.replace(x, &alpha).get_constant())
            {
                continue;
            }

            let g = Self::gcd_dense_modular(&a.replace(x, &alpha), &b.replace(x, &alpha))?;
            if g.is_constant() {
                return Some(content);
            }

            let g = g.mul_coeff(gamma.replace(x, &alpha).get_constant());
            let lm = g.last_exponents().to_vec();
            let shift = &var_x - &a.constant(alpha.clone());

            let next = match interpolant.take() {
                Some((h, m, h_lm)) => match MonomialOrder::Lex.cmp(&lm, &h_lm) {
                    Ordering::Greater => {
                        debug!("Unlucky evaluation point {}", ring.printer(&alpha));
                        Some((h, m, h_lm))
                    }
                    Ordering::Less => None,
                    Ordering::Equal => {
                        let m_alpha = m.replace(x, &alpha).get_constant();
                        let correction =
                            (&g - &h.replace(x, &alpha)).mul_coeff(ring.inv(&m_alpha));

                        if correction.is_zero() {
                            let candidate = &h / &h.content_over_univariate(x);
                            if a.divides(&candidate).is_some() && b.divides(&candidate).is_some()
                            {
                                return Some((&candidate * &content).make_monic());
                            }
                        }

                        let h = &h + &(&correction * &m);
                        let m = &m * &shift;
                        if m.degree(x).to_u32() > bound + 1 {
                            None
                        } else {
                            Some((h, m, h_lm))
                        }
                    }
                },
                None => None,
            };

            interpolant = Some(next.unwrap_or((g, shift, lm)));
        }
    }
}

impl<E: Exponent> MultivariatePolynomial<IntegerRing, E> {
    /// Compute the gcd of two non-constant integer polynomials in lexicographic order.
    ///
    /// The gcds of the images modulo the primes in [LARGE_U32_PRIMES] are scaled by
    /// the gcd of the leading coefficients and combined with the Chinese remainder
    /// theorem, until the symmetric representation no longer changes and divides
    /// both inputs. Primes whose image has a larger leading monomial are unlucky.
    fn gcd_crt(a: &Self, b: &Self) -> Option<Self> {
        let ca = a.content();
        let cb = b.content();
        let content = Z.gcd(&ca, &cb);
        let a = a.clone().div_coeff(&ca);
        let b = b.clone().div_coeff(&cb);

        let lca = a.lcoeff();
        let lcb = b.lcoeff();
        let gamma = Z.gcd(&lca, &lcb);

        // residues in [0, modulus), the modulus and the leading exponents
        let mut image: Option<(HashMap<Vec<E>, Integer>, Integer, Vec<E>)> = None;

        for &p in LARGE_U32_PRIMES.iter() {
            let prime = Integer::from(p);
            if lca.quot_rem(&prime).1.is_zero() || lcb.quot_rem(&prime).1.is_zero() {
                continue;
            }

            let field = Zp::new(p);
            let ap = a.map_coeff(|c| c.to_finite_field(&field), field.clone());
            let bp = b.map_coeff(|c| c.to_finite_field(&field), field.clone());

            let gp = ap.gcd(&bp);
            if gp.is_constant() {
                return Some(a.constant(content));
            }

            let gp = gp.mul_coeff(gamma.to_finite_field(&field));
            let lm = gp.last_exponents().to_vec();

            let Some((residues, modulus, image_lm)) = &mut image else {
                image = Some((Self::residues(&gp, &field), prime, lm));
                continue;
            };

            match MonomialOrder::Lex.cmp(&lm, image_lm) {
                Ordering::Greater => {
                    debug!("Unlucky prime {} for gcd", p);
                    continue;
                }
                Ordering::Less => {
                    *residues = Self::residues(&gp, &field);
                    *modulus = prime;
                    *image_lm = lm;
                    continue;
                }
                Ordering::Equal => {}
            }

            if !Self::chinese_remainder(residues, modulus, &gp, &field) {
                let candidate = a.lift_residues(residues, modulus).make_primitive();
                if a.divides(&candidate).is_some() && b.divides(&candidate).is_some() {
                    return Some(candidate.mul_coeff(content));
                }
            }
        }

        debug!("Ran out of primes for the gcd of {} and {}", a, b);
        None
    }

    fn residues(image: &MultivariatePolynomial<Zp, E>, field: &Zp) -> HashMap<Vec<E>, Integer> {
        image
            .into_iter()
            .map(|t| {
                (
                    t.exponents.to_vec(),
                    Integer::from(field.from_element(t.coefficient)),
                )
            })
            .collect()
    }

    /// Combine the residues modulo `modulus` with the image modulo the prime of `field`.
    /// Returns `true` if the symmetric representation of any coefficient changed.
    fn chinese_remainder(
        residues: &mut HashMap<Vec<E>, Integer>,
        modulus: &mut Integer,
        image: &MultivariatePolynomial<Zp, E>,
        field: &Zp,
    ) -> bool {
        let mut new_residues: HashMap<Vec<E>, _> = image
            .into_iter()
            .map(|t| (t.exponents.to_vec(), t.coefficient.clone()))
            .collect();
        for k in new_residues.keys() {
            if !residues.contains_key(k) {
                residues.insert(k.clone(), Integer::zero());
            }
        }

        let m_inv = field.inv(&modulus.to_finite_field(field));
        let new_modulus = &*modulus * &Integer::from(field.get_prime());

        let mut changed = false;
        for (k, v) in residues.iter_mut() {
            let r = new_residues.remove(k).unwrap_or_else(|| field.zero());
            let t = field.mul(&field.sub(&r, &v.to_finite_field(field)), &m_inv);
            let new = &*v + &(&*modulus * &Integer::from(field.from_element(&t)));

            changed |= v.symmetric_mod(modulus) != new.symmetric_mod(&new_modulus);
            *v = new;
        }

        *modulus = new_modulus;
        changed
    }

    fn lift_residues(&self, residues: &HashMap<Vec<E>, Integer>, modulus: &Integer) -> Self {
        let mut coefficients = vec![];
        let mut exponents = vec![];
        for (k, v) in residues {
            let c = v.symmetric_mod(modulus);
            if !c.is_zero() {
                coefficients.push(c);
                exponents.extend_from_slice(k);
            }
        }
        self.from_unsorted_terms(coefficients, exponents)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{FiniteFieldCore, Zp, ZpLarge, Z2};
    use crate::domains::integer::{Integer, Z};
    use crate::domains::rational::{Rational, Q};
    use crate::domains::Ring;
    use crate::poly::order::MonomialOrder;
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    fn vars() -> Arc<Vec<Variable>> {
        Arc::new(vec![
            Variable::from("x"),
            Variable::from("y"),
            Variable::from("z"),
        ])
    }

    #[test]
    fn integer_gcd() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let x = zero.variable(0);
        let y = zero.variable(1);
        let z = zero.variable(2);
        let two = zero.constant(Integer::new(2));

        let g = &(&x * &y) + &z;
        let a = &(&g * &(&x + &y)) * &two;
        let b = &(&g * &(&x - &z)) * &zero.constant(Integer::new(-6));

        assert_eq!(a.gcd(&b), g.clone().mul_coeff(Integer::new(2)));
        assert_eq!(a.gcd(&zero), a);
        assert!((&x + &y).gcd(&(&x - &y)).is_one());

        let c = &(&x.pow(2) * &y) + &(&x * &y);
        assert_eq!(c.content_in_var(0), y);
        assert_eq!(c.primitive_part_in_var(0), &x.pow(2) + &x);
    }

    #[test]
    fn finite_field_gcd() {
        let field = Zp::new(7);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars());
        let x = zero.variable(0);
        let y = zero.variable(1);

        let g = &(&x * &x) + &y;
        let a = &g * &(&x + &zero.one());
        let b = &g.clone().mul_coeff(field.nth(&Integer::new(3))) * &(&x - &y);
        assert_eq!(a.gcd(&b), g);

        let basis = MultivariatePolynomial::gcd_free_basis(vec![a.clone(), b.clone()]);
        assert_eq!(basis.len(), 3);
        for p in &basis {
            assert!(a.divides(p).is_some() || b.divides(p).is_some());
        }
    }

    #[test]
    fn modular_integer_gcd() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let x = zero.variable(0);
        let y = zero.variable(1);
        let z = zero.variable(2);
        let c = |n: i64| zero.constant(Integer::new(n));

        // coefficients larger than a single prime
        let big = zero.constant(Integer::from(1u64 << 62));
        let g = &(&(&x.pow(3) * &y) - &(&(&big * &z.pow(2)) * &x)) + &c(7);
        let a = &g * &(&(&x * &z) + &y.pow(4)).add_constant(Integer::new(-5));
        let b = &g.pow(2) * &(&(&y * &z) - &x.pow(2)).add_constant(Integer::new(11));

        assert_eq!(a.gcd(&b), g);
        assert_eq!(b.gcd(&a), g);

        let h = &(&x.pow(2) * &y.pow(3)) + &(&z.pow(4) * &c(3));
        let f = &(&h.pow(2) * &(&x + &z)) * &c(6);
        assert_eq!(f.gcd(&f.derivative(0)), h.clone().mul_coeff(Integer::new(6)));
    }

    #[test]
    fn modular_finite_field_gcd() {
        let field = Zp::new(1000003);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars());
        let x = zero.variable(0);
        let y = zero.variable(1);
        let z = zero.variable(2);
        let c = |n: u32| zero.constant(field.to_element(n));

        // the leading coefficient of the gcd in x and y depends on z
        let g = &(&(&(&z + &c(1)) * &x.pow(2)) * &y) + &(&y.pow(3) * &z.pow(2));
        let a = &g * &(&(&x * &y) + &z.pow(3));
        let b = &g * &(&x.pow(3) + &(&y * &z)).add_constant(field.to_element(4));

        let expected = g.clone().make_monic();
        assert_eq!(a.gcd(&b), expected);

        let large = ZpLarge::new(Integer::from(2305843009213693951u64));
        let a_l = a.map_coeff(|n| large.to_element(Integer::from(field.from_element(n))), large.clone());
        let b_l = b.map_coeff(|n| large.to_element(Integer::from(field.from_element(n))), large.clone());
        let g_l = expected.map_coeff(|n| large.to_element(Integer::from(field.from_element(n))), large.clone());
        assert_eq!(a_l.gcd(&b_l), g_l);
    }

    #[test]
    fn small_field_gcd() {
        // GF(2) has too few evaluation points and falls back to the remainder sequence
        let zero = MultivariatePolynomial::<_, u16>::new(&Z2, None, vars());
        let x = zero.variable(0);
        let y = zero.variable(1);
        let z = zero.variable(2);

        let g = (&(&x.pow(2) * &y) + &(&y * &z)).add_constant(Z2.one());
        let a = &g * &(&(&x * &z) + &y).add_constant(Z2.one());
        let b = &g * &(&x.pow(3) + &(&y.pow(2) * &z));
        assert_eq!(a.gcd(&b), g);
        assert!(a.gcd(&(&x + &z)).is_one());
    }

    #[test]
    fn rational_gcd() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Q, None, vars());
        let x = zero.variable(0);
        let y = zero.variable(1);

        let g = &x.pow(2) - &y.clone().mul_coeff(Rational::from((2i64, 3i64)));
        let a = (&g * &(&x + &y)).mul_coeff(Rational::from((5i64, 7i64)));
        let b = &g * &(&x - &y);

        // the gcd over Q has coprime integer coefficients and a positive leading coefficient
        let expected = &x.pow(2).mul_coeff(Rational::from(3i64)) - &y.mul_coeff(Rational::from(2i64));
        assert_eq!(a.gcd(&b), expected);
    }

    #[test]
    fn graded_order_gcd() {
        let zero =
            MultivariatePolynomial::<_, u16>::new_with_order(&Z, None, vars(), MonomialOrder::Grevlex);
        let x = zero.variable(0);
        let y = zero.variable(1);
        let z = zero.variable(2);

        let g = (&(&y * &z) - &x.pow(3)).add_constant(Integer::new(2));
        let a = &g * &(&x + &z);
        let b = &g * &(&y.pow(2) - &x);

        let r = a.gcd(&b);
        assert_eq!(r.order, MonomialOrder::Grevlex);
        // the leading monomial in grevlex is x^3, so the sign is flipped
        assert_eq!(r, -g);
    }
}
