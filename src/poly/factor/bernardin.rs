//! Incremental maintenance of the product of series during Hensel lifting.
//!
//! The partial products `p_0 = u_0`, `p_j = p_{j-1} u_j` are kept as series. When
//! the factors gain their coefficient of degree `d`, only the coefficient `d` of every
//! partial product has to be recomputed, which costs `O(r d)` multiplications for `r`
//! factors instead of a full product.
//!
//! Once the coefficients of degree `d` are final, the part of the coefficient `d + 1`
//! of `p_j` that does not involve any coefficient of degree `d + 1` is computed
//! speculatively. The next degree then only needs two products per factor.

use crate::domains::Ring;
use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
use crate::poly::univariate::UnivariatePolynomial;
use crate::poly::Exponent;

type Series<F, E> = UnivariatePolynomial<PolynomialRing<F, E>>;

pub struct BernardinsTrick<F: Ring, E: Exponent> {
    factors: Vec<Series<F, E>>,
    products: Vec<Series<F, E>>,
    /// The series of the leading coefficient in `x_0` of every factor, together
    /// with the degree of the factor in `x_0`.
    lcoeffs: Option<Vec<(Series<F, E>, E)>>,
    computed: usize,
    /// `Σ_{0 < k < d} p_{j-1}[k] u_j[d-k]` for every `j > 0`, with `d` the speculative degree.
    speculative: Vec<MultivariatePolynomial<F, E>>,
    speculative_degree: usize,
}

impl<F: Ring, E: Exponent> BernardinsTrick<F, E> {
    /// Track the product of factors whose leading coefficient in `x_0` is already correct.
    pub fn new_monic(factors: Vec<Series<F, E>>) -> BernardinsTrick<F, E> {
        assert!(!factors.is_empty());
        let products = vec![factors[0].zero(); factors.len()];
        let speculative = vec![factors[0].ring.zero(); factors.len()];
        BernardinsTrick {
            factors,
            products,
            lcoeffs: None,
            computed: 0,
            speculative,
            speculative_degree: 1,
        }
    }

    /// Track the product of factors whose leading coefficients in `x_0` are imposed.
    /// Every time a new degree is computed, the coefficient of the corresponding
    /// leading coefficient series is added to the factor.
    pub fn with_lc_correction(
        factors: Vec<Series<F, E>>,
        lcoeffs: Vec<(Series<F, E>, E)>,
    ) -> BernardinsTrick<F, E> {
        assert_eq!(factors.len(), lcoeffs.len());
        let mut t = Self::new_monic(factors);
        t.lcoeffs = Some(lcoeffs);
        t
    }

    /// The number of coefficients of the product that are final.
    pub fn degree(&self) -> usize {
        self.computed
    }

    pub fn factors(&self) -> &[Series<F, E>] {
        &self.factors
    }

    pub fn into_factors(self) -> Vec<Series<F, E>> {
        self.factors
    }

    /// Compute the coefficient of degree `d` of the product, using the current
    /// coefficients of degree `d` of the factors. All lower degrees must have been
    /// computed before.
    pub fn product_coefficient(&mut self, d: usize) -> MultivariatePolynomial<F, E> {
        assert_eq!(d, self.computed, "Coefficients must be computed in order");

        if d > 0 {
            if let Some(lcoeffs) = &self.lcoeffs {
                for (f, (lc, n)) in self.factors.iter_mut().zip(lcoeffs) {
                    let Some(c) = lc.coefficients.get(d) else {
                        continue;
                    };
                    if c.is_zero() {
                        continue;
                    }

                    let mut e = vec![E::zero(); c.nvars()];
                    e[0] = *n;
                    let new = &f.coefficient(d) + &c.clone().mul_exp(&e);
                    f.set_coefficient(d, new);
                }
            }
        }

        if d > 0 && self.speculative_degree != d {
            self.speculate(d);
        }

        self.compute(d);
        self.computed = d + 1;
        self.products[self.products.len() - 1].coefficient(d)
    }

    /// Add `corrections` to the coefficients of degree `d` of the factors and update the products.
    /// Only the last computed degree can be updated.
    pub fn update(&mut self, d: usize, corrections: &[MultivariatePolynomial<F, E>]) {
        assert_eq!(d + 1, self.computed, "Only the last computed degree can be updated");

        for (f, c) in self.factors.iter_mut().zip(corrections) {
            if !c.is_zero() {
                let new = &f.coefficient(d) + c;
                f.set_coefficient(d, new);
            }
        }

        self.compute(d);
        self.speculate(d + 1);
    }

    /// Compute the coefficient `d` of every partial product from the speculative part.
    fn compute(&mut self, d: usize) {
        let c = self.factors[0].coefficient(d);
        self.products[0].set_coefficient(d, c);

        for j in 1..self.factors.len() {
            let (prev, f) = (&self.products[j - 1], &self.factors[j]);
            let c = if d == 0 {
                &prev.coefficient(0) * &f.coefficient(0)
            } else {
                let mut c = self.speculative[j].clone();
                for (a, b) in [
                    (prev.coefficient(0), f.coefficient(d)),
                    (prev.coefficient(d), f.coefficient(0)),
                ] {
                    if !a.is_zero() && !b.is_zero() {
                        c = &c + &(&a * &b);
                    }
                }
                c
            };
            self.products[j].set_coefficient(d, c);
        }
    }

    /// Compute the terms of the coefficient `d` of every partial product that only
    /// involve coefficients of degree `1, ..., d - 1`.
    fn speculate(&mut self, d: usize) {
        for j in 1..self.factors.len() {
            let (prev, f) = (&self.products[j - 1], &self.factors[j]);
            let mut c = f.ring.zero();
            for k in 1..d {
                let (Some(a), Some(b)) = (prev.coefficients.get(k), f.coefficients.get(d - k)) else {
                    continue;
                };
                if !a.is_zero() && !b.is_zero() {
                    c = &c + &(a * b);
                }
            }
            self.speculative[j] = c;
        }
        self.speculative_degree = d;
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
    use crate::poly::univariate::UnivariatePolynomial;
    use crate::poly::Variable;

    use super::BernardinsTrick;

    #[test]
    fn matches_truncated_product() {
        let field = Zp::new(97);
        let zero = MultivariatePolynomial::<_, u16>::new(
            &field,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
        );
        let x = zero.variable(0);
        let c = |n: u32| zero.constant(field.to_element(n));

        let ring = PolynomialRing::new_from_poly(&zero);
        let t = UnivariatePolynomial::new(&ring, None, Arc::new(Variable::from("t")));
        let factors = vec![
            t.from_coefficients(vec![&x + &c(1), c(3), &x * &c(2)]),
            t.from_coefficients(vec![x.pow(2), &x + &c(5)]),
            t.from_coefficients(vec![&x + &c(7), c(0), c(4), x.clone()]),
        ];

        let full = &(&factors[0] * &factors[1]) * &factors[2];

        // build the factors one degree at a time
        let partial: Vec<_> = factors.iter().map(|f| t.constant(f.coefficient(0))).collect();
        let mut trick = BernardinsTrick::new_monic(partial);
        for d in 0..=full.degree() {
            // the factors are known up to degree d - 1
            let current = trick.factors();
            let expected = (&(&current[0] * &current[1]) * &current[2]).coefficient(d);

            let p = trick.product_coefficient(d);
            assert_eq!(p, expected);
            if d == 0 {
                assert_eq!(p, full.coefficient(0));
                continue;
            }

            let corrections: Vec<_> = factors.iter().map(|f| f.coefficient(d)).collect();
            trick.update(d, &corrections);
            assert_eq!(trick.speculative_degree, d + 1);
            assert_eq!(trick.products[2].clone().truncate(d), full.clone().truncate(d));
        }

        for (a, b) in trick.factors().iter().zip(&factors) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn leading_coefficient_correction() {
        let field = Zp::new(97);
        let zero = MultivariatePolynomial::<_, u16>::new(
            &field,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
        );
        let x = zero.variable(0);
        let c = |n: u32| zero.constant(field.to_element(n));

        let ring = PolynomialRing::new_from_poly(&zero);
        let t = UnivariatePolynomial::new(&ring, None, Arc::new(Variable::from("t")));

        // (2 + t) x + 1 and (3 + 5t) x^2 + x
        let lc0 = t.from_coefficients(vec![c(2), c(1)]);
        let lc1 = t.from_coefficients(vec![c(3), c(5)]);
        let f0 = t.constant(&(&x * &c(2)) + &c(1));
        let f1 = t.constant(&(&x.pow(2) * &c(3)) + &x);

        let mut trick =
            BernardinsTrick::with_lc_correction(vec![f0, f1], vec![(lc0, 1), (lc1, 2)]);
        trick.product_coefficient(0);
        let p1 = trick.product_coefficient(1);

        // the coefficient of t in the product
        let expected = &(&x.pow(3) * &c(13)) + &(&x.pow(2) * &c(6));
        assert_eq!(p1, expected);
        assert_eq!(trick.factors()[1].coefficient(1), &x.pow(2) * &c(5));
    }
}
