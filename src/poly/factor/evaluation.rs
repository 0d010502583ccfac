//! Evaluation points for Hensel lifting and the series expansions around them.

use std::sync::Arc;

use crate::domains::Ring;
use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
use crate::poly::univariate::UnivariatePolynomial;
use crate::poly::Exponent;

/// Values for the variables `x_1, ..., x_n` of a polynomial in `x_0, ..., x_n`.
/// The main variable `x_0` is never evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HenselEvaluation<F: Ring> {
    values: Vec<F::Element>,
    ring: F,
}

impl<F: Ring> HenselEvaluation<F> {
    /// Create an evaluation where `values[i]` is the value of `x_{i + 1}`.
    pub fn new(ring: &F, values: Vec<F::Element>) -> HenselEvaluation<F> {
        HenselEvaluation {
            values,
            ring: ring.clone(),
        }
    }

    pub fn ring(&self) -> &F {
        &self.ring
    }

    /// The value of the variable `var`, which must be larger than `0`.
    #[inline]
    pub fn value(&self, var: usize) -> &F::Element {
        &self.values[var - 1]
    }

    pub fn values(&self) -> &[F::Element] {
        &self.values
    }

    /// Keep the values of `x_1, ..., x_{nvars - 1}` only.
    pub fn truncate(&self, nvars: usize) -> HenselEvaluation<F> {
        HenselEvaluation {
            values: self.values[..nvars.saturating_sub(1)].to_vec(),
            ring: self.ring.clone(),
        }
    }

    /// Map the values to another ring.
    pub fn map<U: Ring>(&self, f: impl Fn(&F::Element) -> U::Element, ring: &U) -> HenselEvaluation<U> {
        HenselEvaluation {
            values: self.values.iter().map(f).collect(),
            ring: ring.clone(),
        }
    }

    /// Replace `var` by its value. The variable stays in the polynomial with exponent zero.
    pub fn evaluate<E: Exponent>(
        &self,
        p: &MultivariatePolynomial<F, E>,
        var: usize,
    ) -> MultivariatePolynomial<F, E> {
        p.replace(var, self.value(var))
    }

    /// Replace the variables `x_from, ..., x_n` by their values.
    pub fn evaluate_from<E: Exponent>(
        &self,
        p: &MultivariatePolynomial<F, E>,
        from: usize,
    ) -> MultivariatePolynomial<F, E> {
        let mut r = p.clone();
        for var in from.max(1)..=self.values.len().min(p.nvars().saturating_sub(1)) {
            r = self.evaluate(&r, var);
        }
        r
    }

    /// Replace every variable except `x_0` and `x_keep` by its value.
    pub fn evaluate_except<E: Exponent>(
        &self,
        p: &MultivariatePolynomial<F, E>,
        keep: usize,
    ) -> MultivariatePolynomial<F, E> {
        let mut r = p.clone();
        for var in 1..=self.values.len().min(p.nvars().saturating_sub(1)) {
            if var != keep && r.contains(var) {
                r = self.evaluate(&r, var);
            }
        }
        r
    }

    /// Compute the Taylor expansion of `p` in `t = x_var - b_var`. The coefficients
    /// do not contain `var`.
    pub fn series_expansion<E: Exponent>(
        &self,
        p: &MultivariatePolynomial<F, E>,
        var: usize,
    ) -> UnivariatePolynomial<PolynomialRing<F, E>> {
        let ring = PolynomialRing::new_from_poly(p);
        let res = UnivariatePolynomial::new(&ring, None, Arc::new(p.variables[var].clone()));

        let shifted = p.shift_var(var, self.value(var));
        let mut coefficients = vec![];
        for (c, e) in shifted.to_univariate_polynomial_list(var) {
            coefficients.resize(e.to_u32() as usize, p.zero());
            coefficients.push(c);
        }

        res.from_coefficients(coefficients)
    }

    /// Compute the coefficient of `(x_var - b_var)^k` of `p`.
    pub fn series_coefficient<E: Exponent>(
        &self,
        p: &MultivariatePolynomial<F, E>,
        var: usize,
        k: usize,
    ) -> MultivariatePolynomial<F, E> {
        if p.degree(var).to_u32() < k as u32 {
            return p.zero();
        }

        p.shift_var(var, self.value(var))
            .coefficient_of_power(var, E::from_u32(k as u32))
    }

    /// Compute `(x_var - b_var)^k` for `k = 0, ..., d`, inheriting the ring and variables from `template`.
    pub fn linear_powers<E: Exponent>(
        &self,
        template: &MultivariatePolynomial<F, E>,
        var: usize,
        d: usize,
    ) -> Vec<MultivariatePolynomial<F, E>> {
        let lin = template
            .variable(var)
            .add_constant(self.ring.neg(self.value(var)));

        let mut powers = Vec::with_capacity(d + 1);
        powers.push(template.one());
        for i in 0..d {
            powers.push(&powers[i] * &lin);
        }
        powers
    }

    /// Convert a series in `x_var - b_var` back to a polynomial.
    pub fn series_to_poly<E: Exponent>(
        &self,
        series: &UnivariatePolynomial<PolynomialRing<F, E>>,
        var: usize,
    ) -> MultivariatePolynomial<F, E> {
        let mut res = series.ring.zero();
        let mut e = vec![E::zero(); res.nvars()];
        for (i, c) in series.coefficients.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            e[var] = E::from_u32(i as u32);
            res = res + c.clone().mul_exp(&e);
        }

        res.shift_var(var, &self.ring.neg(self.value(var)))
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::integer::{Integer, Z};
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    use super::HenselEvaluation;

    #[test]
    fn series_round_trip() {
        let zero = MultivariatePolynomial::<_, u16>::new(
            &Z,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y"), Variable::from("z")]),
        );
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

        let p = &(&(&x.pow(3) * &y.pow(2)) + &(&y * &z)) - &z.pow(3).mul_coeff(Integer::new(5));
        let eval = HenselEvaluation::new(&Z, vec![Integer::new(2), Integer::new(-3)]);

        for var in 1..3 {
            let series = eval.series_expansion(&p, var);
            assert!(series.coefficients.iter().all(|c| !c.contains(var)));
            assert_eq!(eval.series_to_poly(&series, var), p);
        }

        // the constant term is the value at the evaluation point
        let series = eval.series_expansion(&p, 2);
        assert_eq!(series.coefficient(0), eval.evaluate(&p, 2));
        assert_eq!(eval.series_coefficient(&p, 2, 1), series.coefficient(1));
        assert!(eval.series_coefficient(&p, 2, 4).is_zero());

        assert_eq!(eval.evaluate_except(&p, 1), eval.evaluate(&p, 2));
        assert_eq!(eval.evaluate_except(&p, 2), eval.evaluate(&p, 1));
    }

    #[test]
    fn linear_powers() {
        let field = Zp::new(13);
        let zero = MultivariatePolynomial::<_, u8>::new(
            &field,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
        );
        let eval = HenselEvaluation::new(&field, vec![field.to_element(4)]);

        let powers = eval.linear_powers(&zero, 1, 3);
        let y = zero.variable(1).add_constant(field.to_element(9));
        assert_eq!(powers[3], y.pow(3));

        let f = &zero.variable(0).pow(2) + &powers[2];
        assert_eq!(eval.evaluate_from(&f, 1), zero.variable(0).pow(2));
    }
}
