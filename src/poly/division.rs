//! Multivariate division with remainder by a list of divisors.
//!
//! The leading term of the dividend is reduced by the first divisor whose leading
//! term divides it. Coefficients are divided with [Ring::try_div], so that over rings
//! that are not fields a term whose coefficient does not divide exactly moves to the
//! remainder.

use crate::domains::{EuclideanDomain, Ring};

use super::polynomial::MultivariatePolynomial;
use super::Exponent;

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E> {
    /// Take the leading term `c * x^e` off `self`.
    fn pop_leading_term(&mut self) -> Option<(F::Element, Vec<E>)> {
        let c = self.coefficients.pop()?;
        let nvars = self.nvars();
        let e = self.exponents.split_off(self.exponents.len() - nvars);
        Some((c, e))
    }

    /// Compute `(q_1, ..., q_n, r)` such that `self = q_1 d_1 + ... + q_n d_n + r`, where no
    /// term of `r` is reducible by a divisor.
    pub fn divide_and_remainder(&self, divisors: &[Self]) -> (Vec<Self>, Self) {
        assert!(
            self.order.is_admissible(),
            "Division requires an admissible monomial order"
        );
        if divisors.iter().any(|d| d.is_zero()) {
            panic!("Cannot divide by 0 polynomial");
        }

        let mut quotients: Vec<(Vec<F::Element>, Vec<E>)> = vec![(vec![], vec![]); divisors.len()];
        let mut rem_coeffs = vec![];
        let mut rem_exps = vec![];

        let mut p = self.clone();
        let mut m = vec![E::zero(); self.nvars()];
        'term: while let Some((c, e)) = p.pop_leading_term() {
            for (d, (qc, qe)) in divisors.iter().zip(&mut quotients) {
                if !d
                    .last_exponents()
                    .iter()
                    .zip(&e)
                    .all(|(de, pe)| de <= pe)
                {
                    continue;
                }

                if let Some(q) = self.ring.try_div(&c, &d.lcoeff()) {
                    for ((me, pe), de) in m.iter_mut().zip(&e).zip(d.last_exponents()) {
                        *me = *pe - *de;
                    }

                    // the leading term cancels against the popped term
                    let mut sub = d.clone().mul_monomial(&q, &m);
                    sub.pop_leading_term();
                    p = p - sub;

                    qc.push(q);
                    qe.extend_from_slice(&m);
                    continue 'term;
                }
            }

            rem_coeffs.push(c);
            rem_exps.extend(e);
        }

        let quotients = quotients
            .into_iter()
            .map(|(c, e)| self.from_unsorted_terms(c, e))
            .collect();
        (quotients, self.from_unsorted_terms(rem_coeffs, rem_exps))
    }

    /// Compute the remainder of the division by `divisors`.
    pub fn remainder(&self, divisors: &[Self]) -> Self {
        self.divide_and_remainder(divisors).1
    }

    /// Divide by `divisors`, returning `None` if the remainder is not zero.
    pub fn divide_or_none(&self, divisors: &[Self]) -> Option<Vec<Self>> {
        let (q, r) = self.divide_and_remainder(divisors);
        if r.is_zero() {
            Some(q)
        } else {
            None
        }
    }

    /// Divide by `divisors`. Panics if the division leaves a remainder.
    pub fn divide_exact(&self, divisors: &[Self]) -> Vec<Self> {
        self.divide_or_none(divisors)
            .unwrap_or_else(|| panic!("No clean division of {}", self))
    }

    /// Returns `true` if the division by `d` leaves no remainder.
    pub fn divides_q(&self, d: &Self) -> bool {
        self.remainder(std::slice::from_ref(d)).is_zero()
    }
}

impl<F: EuclideanDomain, E: Exponent> MultivariatePolynomial<F, E> {
    /// Compute a remainder of `u * self` by `divisors` for some non-zero constant `u`,
    /// without any inexact coefficient division. The result is primitive.
    ///
    /// If no divisor divides the leading coefficient exactly, the dividend is scaled
    /// with the smallest required multiplier among the divisors whose leading monomial divides.
    pub fn pseudo_remainder(&self, divisors: &[Self]) -> Self {
        assert!(
            self.order.is_admissible(),
            "Division requires an admissible monomial order"
        );
        if divisors.iter().any(|d| d.is_zero()) {
            panic!("Cannot divide by 0 polynomial");
        }

        let mut rem = self.zero();
        let mut p = self.clone();
        let mut m = vec![E::zero(); self.nvars()];
        while let Some((c, e)) = p.pop_leading_term() {
            // (divisor, multiplier for the dividend, quotient coefficient)
            let mut best: Option<(&Self, F::Element, F::Element)> = None;
            for d in divisors {
                if !d
                    .last_exponents()
                    .iter()
                    .zip(&e)
                    .all(|(de, pe)| de <= pe)
                {
                    continue;
                }

                let lc = d.lcoeff();
                if let Some(q) = self.ring.try_div(&c, &lc) {
                    best = Some((d, self.ring.one(), q));
                    break;
                }

                let g = self.ring.gcd(&c, &lc);
                let u = self.ring.quot_rem(&lc, &g).0;
                let q = self.ring.quot_rem(&c, &g).0;
                let better = match &best {
                    Some((_, bu, _)) => self.ring.try_div(bu, &u).is_some() && *bu != u,
                    None => true,
                };
                if better {
                    best = Some((d, u, q));
                }
            }

            match best {
                Some((d, u, q)) => {
                    for ((me, pe), de) in m.iter_mut().zip(&e).zip(d.last_exponents()) {
                        *me = *pe - *de;
                    }

                    if !self.ring.is_one(&u) {
                        p = p.mul_coeff(u.clone());
                        rem = rem.mul_coeff(u);
                    }

                    let mut sub = d.clone().mul_monomial(&q, &m);
                    sub.pop_leading_term();
                    p = p - sub;
                }
                None => {
                    rem.append_monomial(c, &e);
                }
            }
        }

        rem.make_primitive()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::Zp;
    use crate::domains::integer::{Integer, Z};
    use crate::poly::order::MonomialOrder;
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    #[test]
    fn divide_and_remainder() {
        let field = Zp::new(101);
        let zero = MultivariatePolynomial::<_, u16>::new(
            &field,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
        );
        let x = zero.variable(0);
        let y = zero.variable(1);
        let one = zero.one();

        let p = &(&x.pow(2) * &y) + &(&(&x * &y.pow(2)) + &y.pow(2));
        let d1 = &(&x * &y) - &one;
        let d2 = &y.pow(2) - &one;

        let (q, r) = p.divide_and_remainder(&[d1.clone(), d2.clone()]);
        assert_eq!(&(&(&q[0] * &d1) + &(&q[1] * &d2)) + &r, p);
        assert_eq!(r, &(&x + &y) + &one);

        assert!(p.divides_q(&p));
        assert!(!p.divides_q(&d1));
        let prod = &d1 * &d2;
        assert_eq!(prod.divide_exact(&[d2.clone()])[0], d1);
        assert!(prod.divide_or_none(&[&d1 + &one]).is_none());
    }

    #[test]
    fn integer_remainder() {
        let zero = MultivariatePolynomial::<_, u16>::new(
            &Z,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
        );
        let x = zero.variable(0);
        let y = zero.variable(1);

        let p = &x.pow(2) + &y;
        let d = &x.clone().mul_coeff(Integer::new(2)) + &y;

        // 2x does not divide x^2 over Z
        let (q, r) = p.divide_and_remainder(&[d.clone()]);
        assert!(q[0].is_zero());
        assert_eq!(r, p);

        // 4 (x^2 + y) = (2x - y)(2x + y) + y^2 + 4y
        let pr = p.pseudo_remainder(&[d]);
        assert_eq!(pr, &y.pow(2) + &y.mul_coeff(Integer::new(4)));
    }

    #[test]
    fn integer_division_by_several() {
        let zero = MultivariatePolynomial::<_, u16>::new(
            &Z,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
        );
        let x = zero.variable(0);
        let y = zero.variable(1);

        let p = &(&(&x.pow(2) * &y) + &(&x * &y.pow(2)).mul_coeff(Integer::new(2)))
            + &y.pow(2).mul_coeff(Integer::new(4));
        let d1 = (&x * &y).add_constant(Integer::new(-1));
        let d2 = y.pow(2).mul_coeff(Integer::new(2)).add_constant(Integer::new(-2));

        let (q, r) = p.divide_and_remainder(&[d1.clone(), d2.clone()]);
        assert_eq!(&(&(&q[0] * &d1) + &(&q[1] * &d2)) + &r, p);
        assert_eq!(q[0], &x + &y.clone().mul_coeff(Integer::new(2)));
        assert_eq!(q[1], zero.constant(Integer::new(2)));
        assert_eq!(r, (&x + &y.clone().mul_coeff(Integer::new(2))).add_constant(Integer::new(4)));

        // 2 does not divide 3, so 3y^2 is irreducible by 2y^2 - 2
        let odd = y.pow(2).mul_coeff(Integer::new(3));
        assert_eq!(odd.remainder(&[d1, d2]), odd);
    }

    #[test]
    #[should_panic(expected = "admissible")]
    fn non_admissible_order() {
        let zero = MultivariatePolynomial::<_, u16>::new_with_order(
            &Z,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
            MonomialOrder::Alex,
        );
        let p = &zero.variable(0) + &zero.variable(1);
        p.divide_and_remainder(&[zero.variable(1)]);
    }

    #[test]
    #[should_panic(expected = "No clean division")]
    fn inexact_division() {
        let zero = MultivariatePolynomial::<_, u16>::new(
            &Z,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y")]),
        );
        let x = zero.variable(0);
        let y = zero.variable(1);
        (&x.pow(2) + &y).divide_exact(&[&x + &y]);
    }

    #[test]
    #[should_panic]
    fn zero_divisor() {
        let zero = MultivariatePolynomial::<_, u16>::new(
            &Z,
            None,
            Arc::new(vec![Variable::from("x")]),
        );
        zero.variable(0).remainder(&[zero.clone()]);
    }
}
