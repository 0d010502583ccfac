//! Factorization of univariate polynomials.
//!
//! Over a Galois field, a square-free polynomial is split into products of irreducible
//! factors of equal degree by distinct-degree factorization, followed by the probabilistic
//! equal-degree factorization of Cantor and Zassenhaus. Over the integers, the factors
//! modulo a prime are Hensel lifted to a power of that prime and recombined.

use rand::thread_rng;
use tracing::debug;

use crate::combinatorics::CombinationIterator;
use crate::domains::finite_field::{FiniteFieldCore, GaloisField, ToFiniteField, Zp};
use crate::domains::integer::{Integer, IntegerRing, Z};
use crate::domains::Ring;
use crate::poly::gcd::LARGE_U32_PRIMES;
use crate::poly::polynomial::MultivariatePolynomial;
use crate::poly::Exponent;

impl<F: GaloisField, E: Exponent> MultivariatePolynomial<F, E> {
    /// Returns `true` if the univariate polynomial is irreducible. Constants are not irreducible.
    ///
    /// A polynomial of degree `n` is irreducible iff it is square-free and has no factor
    /// of degree `i <= n/2`, which is tested with `gcd(x^(q^i) - x, f)`.
    pub fn is_irreducible_univariate(&self) -> bool {
        let Some(var) = self.first_occurring_var() else {
            return false;
        };

        let n = self.degree(var).to_u32() as usize;
        if n == 1 {
            return true;
        }

        let f = self.clone().make_monic();
        let df = f.derivative(var);
        if df.is_zero() || !f.gcd(&df).is_one() {
            return false;
        }

        let q = self.ring.size();
        let x = f.variable(var);
        let mut h = x.clone();
        for _ in 0..n / 2 {
            h = h.exp_mod_univariate(&q, &f);
            if !(&h - &x).gcd(&f).is_one() {
                return false;
            }
        }

        true
    }

    /// Perform distinct degree factorization on a square-free univariate polynomial.
    /// Every returned factor is monic and is a product of irreducible polynomials of
    /// the associated degree.
    pub fn distinct_degree_factorization(&self) -> Vec<(usize, Self)> {
        let Some(var) = self.first_occurring_var() else {
            return vec![];
        };

        let q = self.ring.size();
        let x = self.variable(var);

        let mut factors = vec![];
        let mut f = self.clone().make_monic();
        let mut h = x.clone();
        let mut i: usize = 0;
        while !f.is_one() {
            i += 1;

            h = h.exp_mod_univariate(&q, &f);

            let g = (&h - &x).gcd(&f);
            if !g.is_one() {
                f = f.quot_rem_univariate(&g).0;
                factors.push((i, g));
            }

            if (f.degree(var).to_u32() as usize) < 2 * (i + 1) {
                // f cannot be split more
                if !f.is_constant() {
                    factors.push((f.degree(var).to_u32() as usize, f));
                }
                break;
            }
        }

        factors
    }

    /// Perform Cantor-Zassenhaus's probabilistic algorithm for
    /// finding irreducible factors of degree `d`.
    ///
    /// In odd characteristic, a random `r` splits the polynomial with `r^((q^d-1)/2) - 1`.
    /// In characteristic 2, the trace map `r + r^2 + ... + r^(2^(kd-1))` is used instead,
    /// where `q = 2^k`.
    pub fn equal_degree_factorization(&self, d: usize) -> Vec<Self> {
        let s = self.clone().make_monic();

        let Some(var) = s.first_occurring_var() else {
            return vec![];
        };

        let n = s.degree(var).to_u32() as usize;
        if n <= d {
            return vec![s];
        }

        let q = self.ring.size();
        let even = self.ring.characteristic() == Integer::new(2);
        let mut rng = thread_rng();

        let factor = loop {
            let coeffs: Vec<_> = (0..n)
                .map(|_| self.ring.sample(&mut rng, (0, i64::MAX)))
                .collect();
            let r = s.from_dense_univariate(var, &coeffs);
            if !r.contains(var) {
                continue;
            }

            let g = r.gcd(&s);
            if !g.is_one() {
                break g;
            }

            let b = if even {
                let k = self.ring.get_extension_degree() as usize;
                let mut t = r.clone();
                let mut trace = r;
                for _ in 1..k * d {
                    t = (&t * &t).quot_rem_univariate(&s).1;
                    trace = &trace + &t;
                }
                trace
            } else {
                let e = &(&q.pow(d as u64) - &Integer::one()) / &Integer::new(2);
                r.exp_mod_univariate(&e, &s) - &s.one()
            };

            let g = b.gcd(&s);
            if !g.is_one() && g != s {
                break g;
            }
        };

        let mut factors = factor.equal_degree_factorization(d);
        factors.extend((&s / &factor).equal_degree_factorization(d));
        factors
    }

    /// Perform distinct and equal degree factorization on a square-free univariate polynomial.
    pub fn factor_distinct_equal_degree(&self) -> Vec<Self> {
        let mut factors = vec![];
        for (d, f) in self.distinct_degree_factorization() {
            debug!("DDF {} {}", f, d);
            factors.extend(f.equal_degree_factorization(d));
        }
        factors
    }
}

impl<E: Exponent> MultivariatePolynomial<IntegerRing, E> {
    /// Hensel lift a solution of `self = u * w mod p` to `self = u * w mod max_p`
    /// where `max_p` is a power of `p`.
    ///
    /// If the lifting is successful, i.e. the error is 0 at some stage,
    /// it will return `Ok((u,w))` where `u` and `w` are the true factors over
    /// the integers. If a true factorization is not possible, it returns
    /// `Err((u,w))` where `u` and `w` are monic.
    pub fn hensel_lift(
        &self,
        u: MultivariatePolynomial<Zp, E>,
        w: MultivariatePolynomial<Zp, E>,
        gamma: Option<Integer>,
        max_p: &Integer,
    ) -> Result<(Self, Self), (Self, Self)> {
        let field = u.ring.clone();
        let p = Integer::from(field.get_prime());

        let lcoeff = self.lcoeff(); // lcoeff % p != 0
        let mut gamma = gamma.unwrap_or_else(|| lcoeff.clone());
        let lcoeff_p = lcoeff.to_finite_field(&field);
        let gamma_p = gamma.to_finite_field(&field);

        let a = self.clone().mul_coeff(gamma.clone());

        let u = u.make_monic().mul_coeff(gamma_p);
        let w = w.make_monic().mul_coeff(lcoeff_p);

        let (_, s, t) = u.eea_univariate(&w);

        let sym_map = |e: &<Zp as Ring>::Element| field.to_symmetric_integer(e);

        let mut u_i = u.map_coeff(sym_map, Z);
        let mut w_i = w.map_coeff(sym_map, Z);

        // only replace the leading coefficient
        if let Some(c) = u_i.coefficients.last_mut() {
            *c = gamma.clone();
        }
        if let Some(c) = w_i.coefficients.last_mut() {
            *c = lcoeff;
        }

        let mut e = &a - &(&u_i * &w_i);

        let mut m = p.clone();
        while !e.is_zero() && &m <= max_p {
            let e_p = e.map_coeff(|c| (c / &m).to_finite_field(&field), field.clone());
            let (q, r) = (&e_p * &s).quot_rem_univariate(&w);
            let tau = &(&e_p * &t) + &(&q * &u);

            u_i = u_i + tau.map_coeff(sym_map, Z).mul_coeff(m.clone());
            w_i = w_i + r.map_coeff(sym_map, Z).mul_coeff(m.clone());
            e = &a - &(&u_i * &w_i);

            m = &m * &p;
        }

        if e.is_zero() {
            let content = u_i.content();
            if !content.is_one() {
                u_i = u_i.div_coeff(&content);
                gamma = &gamma / &content;
            }

            if !gamma.is_one() {
                w_i = w_i.div_coeff(&gamma); // true division is possible in this case
            }

            Ok((u_i, w_i))
        } else {
            Err((u_i.monic_mod(&m), w_i.monic_mod(&m)))
        }
    }

    /// Make the polynomial monic modulo `m`, with coefficients in the symmetric range.
    fn monic_mod(self, m: &Integer) -> Self {
        if self.lcoeff().is_one() {
            return self;
        }

        match self.lcoeff().mod_inverse(m) {
            Some(inv) => self.map_coeff(|c| (c * &inv).symmetric_mod(m), Z),
            None => self,
        }
    }

    /// Lift multiple factors by creating a binary tree and lifting each product.
    fn multi_factor_hensel_lift(
        &self,
        hs: &[MultivariatePolynomial<Zp, E>],
        max_p: &Integer,
    ) -> Vec<Self> {
        if hs.len() == 1 {
            return vec![self.clone().monic_mod(max_p)];
        }

        let (gs, hs) = hs.split_at(hs.len() / 2);

        let g = gs.iter().skip(1).fold(gs[0].clone(), |acc, x| &acc * x);
        let h = hs.iter().skip(1).fold(hs[0].clone(), |acc, x| &acc * x);

        let (g_i, h_i) = self.hensel_lift(g, h, None, max_p).unwrap_or_else(|e| e);
        debug!("g_i={}", g_i);
        debug!("h_i={}", h_i);

        let mut factors = g_i.multi_factor_hensel_lift(gs, max_p);
        factors.extend(h_i.multi_factor_hensel_lift(hs, max_p));
        factors
    }

    /// Factor a primitive square-free univariate polynomial over the integers by Hensel
    /// lifting its factors over a finite field and recombining them.
    pub fn factor_reconstruct(&self) -> Vec<Self> {
        let Some(var) = self.first_occurring_var() else {
            return vec![self.clone()]; // constant polynomial
        };
        let d = self.degree(var).to_u32();

        if d == 1 {
            return vec![self.clone()];
        }

        // a bound on the coefficients of a factor, including the leading coefficient
        let max_norm = self
            .coefficients
            .iter()
            .map(|x| x.abs())
            .max()
            .unwrap_or_else(Integer::one);
        let sqrt = Integer::from(((d + 1) as f64).sqrt().ceil() as u64);
        let bound = &(&(&Integer::new(2).pow(d as u64 + 1) * &sqrt) * &max_norm)
            * &self.lcoeff().abs();

        // select a suitable prime
        let mut candidate = None;
        for p in LARGE_U32_PRIMES {
            if (&self.lcoeff() % &Integer::from(p)).is_zero() {
                continue;
            }

            let field = Zp::new(p);
            let f_p = self.map_coeff(|f| f.to_finite_field(&field), field.clone());
            let df_p = f_p.derivative(var);

            // check if f_p remains square-free
            if f_p.gcd(&df_p).is_one() {
                candidate = Some((field, f_p));
                break;
            }
        }

        let Some((field, f_p)) = candidate else {
            panic!("Ran out of primes during factorization of {}", self);
        };

        let hs = f_p.factor_distinct_equal_degree();
        if hs.len() == 1 {
            // the polynomial is irreducible
            return vec![self.clone()];
        }

        let p = Integer::from(field.get_prime());
        let mut max_p = p.clone();
        while max_p < bound {
            max_p = &max_p * &p;
        }

        let mut factors = self.multi_factor_hensel_lift(&hs, &max_p);

        let mut rec_factors = vec![];
        let mut rest = self.clone();
        let mut s = 1;
        'len: while 2 * s <= factors.len() {
            let mut fs = CombinationIterator::new(factors.len(), s);
            while let Some(cs) = fs.next() {
                let mut g = rest.constant(rest.lcoeff());
                for i in cs {
                    g = (&g * &factors[*i]).map_coeff(|c| c.symmetric_mod(&max_p), Z);
                }
                let g = g.make_primitive();

                if let Some(h) = rest.divides(&g) {
                    debug!("Recombined factor {}", g);
                    rec_factors.push(g);

                    let cs = cs.to_vec();
                    for i in cs.iter().rev() {
                        factors.remove(*i);
                    }

                    rest = h.make_primitive();
                    continue 'len;
                }
            }

            s += 1;
        }

        rec_factors.push(rest);
        rec_factors
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::algebraic_number::AlgebraicExtension;
    use crate::domains::finite_field::{FiniteFieldCore, Z2, Zp};
    use crate::domains::integer::{Integer, Z};
    use crate::domains::Ring;
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    fn vars() -> Arc<Vec<Variable>> {
        Arc::new(vec![Variable::from("x")])
    }

    #[test]
    fn distinct_equal_degree() {
        let field = Zp::new(7);
        let zero = MultivariatePolynomial::<_, u8>::new(&field, None, vars());
        let x = zero.variable(0);
        let c = |n: u32| zero.constant(field.to_element(n));

        let quadratic = &x.pow(2) + &c(1);
        let f = &(&(&x + &c(1)) * &(&x + &c(2))) * &quadratic;

        let ddf = f.distinct_degree_factorization();
        assert_eq!(ddf.len(), 2);
        assert_eq!(ddf[1], (2, quadratic.clone()));

        let factors = f.factor_distinct_equal_degree();
        assert_eq!(factors.len(), 3);
        for g in &factors {
            assert!(f.divides(g).is_some());
            assert!(g.is_irreducible_univariate());
        }
        assert!(factors.contains(&quadratic));
    }

    #[test]
    fn irreducibility() {
        for (p, expected) in [(7, true), (5, false), (11, true), (13, false)] {
            let field = Zp::new(p);
            let zero = MultivariatePolynomial::<_, u8>::new(&field, None, vars());
            let f = &zero.variable(0).pow(2) + &zero.one();
            assert_eq!(f.is_irreducible_univariate(), expected);
        }

        let field = Zp::new(3);
        let zero = MultivariatePolynomial::<_, u8>::new(&field, None, vars());
        assert!(!zero.one().is_irreducible_univariate());
        // x^3 + 2 = (x + 2)^3 mod 3
        let f = &zero.variable(0).pow(3) + &zero.constant(field.to_element(2));
        assert!(!f.is_irreducible_univariate());
    }

    #[test]
    fn characteristic_two() {
        let zero = MultivariatePolynomial::<_, u8>::new(&Z2, None, vars());
        let x = zero.variable(0);
        let one = zero.one();

        let a = &(&x.pow(3) + &x) + &one;
        let b = &(&x.pow(3) + &x.pow(2)) + &one;
        let f = &a * &b;

        let factors = f.factor_distinct_equal_degree();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a) && factors.contains(&b));
    }

    #[test]
    fn extension_field() {
        let field = AlgebraicExtension::galois_field(Z2, 2, Variable::Temporary(0));
        let zero = MultivariatePolynomial::<_, u8>::new(&field, None, vars());
        let x = zero.variable(0);

        // x^2 + x + 1 has its roots in GF(4)
        let f = &(&x.pow(2) + &x) + &zero.one();
        assert!(!f.is_irreducible_univariate());

        let factors = f.factor_distinct_equal_degree();
        assert_eq!(factors.len(), 2);
        assert_eq!(&factors[0] * &factors[1], f);
        assert!(factors.iter().all(|g| g.degree(0) == 1));
        assert!(field.is_one(&factors[0].lcoeff()));
    }

    #[test]
    fn integer_reconstruction() {
        let zero = MultivariatePolynomial::<_, u8>::new(&Z, None, vars());
        let x = zero.variable(0);
        let c = |n: i64| zero.constant(Integer::new(n));

        let factors = vec![
            &x.pow(2) + &c(1),
            &x.pow(2) - &c(2),
            &(&x * &c(3)) + &c(1),
        ];
        let f = factors.iter().skip(1).fold(factors[0].clone(), |acc, g| &acc * g);

        let mut r = f.factor_reconstruct();
        assert_eq!(r.len(), 3);
        for g in &mut r {
            *g = g.clone().normalize();
            assert!(factors.contains(g));
        }

        // irreducible over the integers but reducible modulo every prime
        let f = &x.pow(4) + &c(1);
        assert_eq!(f.factor_reconstruct(), vec![f.clone()]);
    }
}
