//! Borrowed views on the terms of a polynomial.

use crate::domains::Ring;

use super::polynomial::MultivariatePolynomial;
use super::Exponent;

/// View object for a term in a multivariate polynomial.
#[derive(Copy, Clone, Debug)]
pub struct MonomialView<'a, F: 'a + Ring, E: 'a + Exponent> {
    pub coefficient: &'a F::Element,
    pub exponents: &'a [E],
}

/// Iterator over terms in a multivariate polynomial.
pub struct MonomialViewIterator<'a, F: Ring, E: Exponent> {
    poly: &'a MultivariatePolynomial<F, E>,
    index: usize,
}

impl<'a, F: Ring, E: Exponent> Iterator for MonomialViewIterator<'a, F, E> {
    type Item = MonomialView<'a, F, E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.poly.nterms() {
            None
        } else {
            let view = MonomialView {
                coefficient: &self.poly.coefficients[self.index],
                exponents: self.poly.exponents(self.index),
            };
            self.index += 1;
            Some(view)
        }
    }
}

impl<'a, F: Ring, E: Exponent> IntoIterator for &'a MultivariatePolynomial<F, E> {
    type Item = MonomialView<'a, F, E>;
    type IntoIter = MonomialViewIterator<'a, F, E>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            poly: self,
            index: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::integer::{Integer, Z};
    use crate::poly::{polynomial::MultivariatePolynomial, Variable};

    #[test]
    fn term_iteration() {
        let vars = Arc::new(vec![Variable::from("x"), Variable::from("y")]);
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars);
        let f = (&zero.variable(0).pow(2) + &zero.variable(1).mul_coeff(Integer::new(3)))
            .add_constant(Integer::new(-1));

        let terms: Vec<_> = f
            .into_iter()
            .map(|t| (t.coefficient.clone(), t.exponents.to_vec()))
            .collect();
        assert_eq!(
            terms,
            vec![
                (Integer::new(-1), vec![0, 0]),
                (Integer::new(3), vec![0, 1]),
                (Integer::one(), vec![2, 0]),
            ]
        );
        assert_eq!((&zero).into_iter().count(), 0);
    }
}
