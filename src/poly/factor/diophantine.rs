//! Solvers for the Diophantine equations `Σ σ_i Π_{j≠i} f_j = r` that correct the
//! factors in every step of Hensel lifting.
//!
//! The univariate solvers use the extended Euclidean algorithm. The multivariate solver
//! reduces to the univariate case by evaluating one variable at a time and corrects
//! the solution order by order in the series expansion of that variable. For sparse
//! problems, [SparseDiophantineSolver] instead solves a linear system for the unknown
//! coefficients of the corrections.

use std::fmt::Display;

use ahash::HashMap;

use crate::domains::linear_system::{LinearSolverError, Matrix};
use crate::domains::Field;
use crate::poly::polynomial::MultivariatePolynomial;
use crate::poly::Exponent;

use super::evaluation::HenselEvaluation;

/// The reason a lifting step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftError {
    /// The linear system of the sparse solver has no solution.
    Inconsistent,
    /// The linear system of the sparse solver has more than one solution.
    Underdetermined,
    /// The images of the factors do not lift to a factorization.
    NoSolution,
}

impl Display for LiftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiftError::Inconsistent => f.write_str("inconsistent linear system"),
            LiftError::Underdetermined => f.write_str("underdetermined linear system"),
            LiftError::NoSolution => f.write_str("no solution"),
        }
    }
}

impl std::error::Error for LiftError {}

impl From<LinearSolverError> for LiftError {
    fn from(e: LinearSolverError) -> Self {
        match e {
            LinearSolverError::Underdetermined { .. } => LiftError::Underdetermined,
            LinearSolverError::Inconsistent | LinearSolverError::NotSquare => {
                LiftError::Inconsistent
            }
        }
    }
}

/// A solver for `Σ σ_i Π_{j≠i} f_j = rhs` for a fixed list of factors `f_i`.
pub trait DiophantineSolver<F: Field, E: Exponent> {
    /// Find the `σ_i`, with the degree of `σ_i` in `x_0` smaller than that of `f_i`.
    fn solve(
        &self,
        rhs: &MultivariatePolynomial<F, E>,
    ) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError>;
}

/// Compute `Π_{j≠i} f_j` for every `i` using prefix and suffix products.
pub fn all_but_one_products<F: Field, E: Exponent>(
    factors: &[MultivariatePolynomial<F, E>],
) -> Vec<MultivariatePolynomial<F, E>> {
    if factors.is_empty() {
        return vec![];
    }

    let mut suffix = vec![factors[0].one(); factors.len()];
    for i in (0..factors.len() - 1).rev() {
        suffix[i] = &suffix[i + 1] * &factors[i + 1];
    }

    let mut prefix = factors[0].one();
    let mut res = Vec::with_capacity(factors.len());
    for (f, s) in factors.iter().zip(suffix) {
        res.push(&prefix * &s);
        prefix = &prefix * f;
    }
    res
}

/// Solves `x a + y b = rhs` for univariate `a` and `b` that are coprime.
pub struct UnivariateDiophantineSolver<F: Field, E: Exponent> {
    a: MultivariatePolynomial<F, E>,
    b: MultivariatePolynomial<F, E>,
    s: MultivariatePolynomial<F, E>,
    t: MultivariatePolynomial<F, E>,
}

impl<F: Field, E: Exponent> UnivariateDiophantineSolver<F, E> {
    pub fn new(
        a: MultivariatePolynomial<F, E>,
        b: MultivariatePolynomial<F, E>,
    ) -> Result<Self, LiftError> {
        let (g, s, t) = a.eea_univariate(&b);
        if !g.is_one() {
            return Err(LiftError::NoSolution);
        }

        Ok(UnivariateDiophantineSolver { a, b, s, t })
    }

    /// Compute `(x, y)` with `x a + y b = rhs` and `deg(x) < deg(b)`.
    pub fn solve(
        &self,
        rhs: &MultivariatePolynomial<F, E>,
    ) -> (MultivariatePolynomial<F, E>, MultivariatePolynomial<F, E>) {
        let (q, x) = (&self.s * rhs).quot_rem_univariate(&self.b);
        let y = &(&self.t * rhs) + &(&q * &self.a);
        (x, y)
    }
}

/// Solves `Σ σ_i Π_{j≠i} f_j = rhs` for pairwise coprime univariate `f_i`.
pub struct UnivariateMultiDiophantineSolver<F: Field, E: Exponent> {
    factors: Vec<MultivariatePolynomial<F, E>>,
    /// `Σ s_i Π_{j≠i} f_j = 1`
    cofactors: Vec<MultivariatePolynomial<F, E>>,
}

impl<F: Field, E: Exponent> UnivariateMultiDiophantineSolver<F, E> {
    pub fn new(factors: &[MultivariatePolynomial<F, E>]) -> Result<Self, LiftError> {
        let cofactors = Self::compute_cofactors(factors)?;
        Ok(UnivariateMultiDiophantineSolver {
            factors: factors.to_vec(),
            cofactors,
        })
    }

    /// Split the factors in two balanced halves with products `P_l` and `P_r`, solve
    /// `u P_r + v P_l = 1` and combine with the cofactors of both halves.
    fn compute_cofactors(
        factors: &[MultivariatePolynomial<F, E>],
    ) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
        if factors.len() < 2 {
            return Ok(factors.iter().map(|f| f.one()).collect());
        }

        let (left, right) = factors.split_at(factors.len() / 2);
        let product = |s: &[MultivariatePolynomial<F, E>]| {
            s.iter().skip(1).fold(s[0].clone(), |acc, f| &acc * f)
        };
        let (pl, pr) = (product(left), product(right));

        let solver = UnivariateDiophantineSolver::new(pr, pl)?;
        let (u, v) = solver.solve(&factors[0].one());

        let mut cofactors = Vec::with_capacity(factors.len());
        for (s, f) in Self::compute_cofactors(left)?.iter().zip(left) {
            cofactors.push((&u * s).quot_rem_univariate(f).1);
        }
        for (s, f) in Self::compute_cofactors(right)?.iter().zip(right) {
            cofactors.push((&v * s).quot_rem_univariate(f).1);
        }

        Ok(cofactors)
    }

    pub fn factors(&self) -> &[MultivariatePolynomial<F, E>] {
        &self.factors
    }
}

impl<F: Field, E: Exponent> DiophantineSolver<F, E> for UnivariateMultiDiophantineSolver<F, E> {
    fn solve(
        &self,
        rhs: &MultivariatePolynomial<F, E>,
    ) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
        if self.factors.len() == 1 {
            return Ok(vec![rhs.clone()]);
        }

        Ok(self
            .cofactors
            .iter()
            .zip(&self.factors)
            .map(|(s, f)| (s * rhs).quot_rem_univariate(f).1)
            .collect())
    }
}

/// Solves `Σ σ_i Π_{j≠i} f_j = rhs` for factors in `x_0, ..., x_top`, whose images
/// at the evaluation point are pairwise coprime.
pub struct MultivariateDiophantineSolver<F: Field, E: Exponent> {
    /// `cofactors[w][i]` is `Π_{j≠i} f_j` with `x_{w+1}, ..., x_top` evaluated.
    cofactors: Vec<Vec<MultivariatePolynomial<F, E>>>,
    univariate: UnivariateMultiDiophantineSolver<F, E>,
    evaluation: HenselEvaluation<F>,
    /// The maximal degree of the solution in every variable.
    bounds: Vec<usize>,
    top: usize,
}

impl<F: Field, E: Exponent> MultivariateDiophantineSolver<F, E> {
    /// Create a solver for `factors` that depend on `x_0, ..., x_top` at most. The
    /// degree of the solution in `x_w` is at most `bounds[w]`.
    pub fn new(
        factors: &[MultivariatePolynomial<F, E>],
        evaluation: &HenselEvaluation<F>,
        bounds: Vec<usize>,
        top: usize,
    ) -> Result<Self, LiftError> {
        let mut images = vec![factors.to_vec()];
        for w in (1..=top).rev() {
            let last = &images[images.len() - 1];
            let next: Vec<_> = last.iter().map(|f| evaluation.evaluate(f, w)).collect();
            images.push(next);
        }
        images.reverse();

        let univariate = UnivariateMultiDiophantineSolver::new(&images[0])?;
        let cofactors = images.iter().map(|f| all_but_one_products(f)).collect();

        Ok(MultivariateDiophantineSolver {
            cofactors,
            univariate,
            evaluation: evaluation.clone(),
            bounds,
            top,
        })
    }

    fn solve_level(
        &self,
        rhs: &MultivariatePolynomial<F, E>,
        w: usize,
    ) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
        if w == 0 {
            return self.univariate.solve(rhs);
        }

        let mut sigma = self.solve_level(&self.evaluation.evaluate(rhs, w), w - 1)?;

        let mut error = rhs.clone();
        for (s, b) in sigma.iter().zip(&self.cofactors[w]) {
            error = error - &(s * b);
        }

        let bound = self.bounds.get(w).copied().unwrap_or(0);
        let powers = self.evaluation.linear_powers(rhs, w, bound);
        for (m, power) in powers.iter().enumerate().skip(1) {
            if error.is_zero() {
                break;
            }

            let c = self.evaluation.series_coefficient(&error, w, m);
            if c.is_zero() {
                continue;
            }

            let ds = self.solve_level(&c, w - 1)?;
            for ((s, d), b) in sigma.iter_mut().zip(ds).zip(&self.cofactors[w]) {
                let d = &d * power;
                error = error - &(&d * b);
                *s = &*s + &d;
            }
        }

        if !error.is_zero() {
            return Err(LiftError::NoSolution);
        }

        Ok(sigma)
    }
}

impl<F: Field, E: Exponent> DiophantineSolver<F, E> for MultivariateDiophantineSolver<F, E> {
    fn solve(
        &self,
        rhs: &MultivariatePolynomial<F, E>,
    ) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
        self.solve_level(rhs, self.top)
    }
}

/// Solves the Diophantine equation by assuming that the solution `σ_i` only has monomials
/// that occur in `f_i` with a degree in `x_0` below that of `f_i`. The unknown coefficients
/// follow from a linear system.
pub struct SparseDiophantineSolver<F: Field, E: Exponent> {
    skeletons: Vec<Vec<Vec<E>>>,
    rows: HashMap<Vec<E>, usize>,
    matrix: Matrix<F>,
    template: MultivariatePolynomial<F, E>,
}

impl<F: Field, E: Exponent> SparseDiophantineSolver<F, E> {
    /// The number of unknowns a solver for `factors` would have.
    pub fn unknowns(factors: &[MultivariatePolynomial<F, E>]) -> usize {
        factors
            .iter()
            .map(|f| {
                let d = f.degree(0);
                f.exponents_iter().filter(|e| e[0] < d).count()
            })
            .sum()
    }

    pub fn new(factors: &[MultivariatePolynomial<F, E>]) -> Result<Self, LiftError> {
        let template = factors[0].zero();
        let cofactors = all_but_one_products(factors);

        let mut skeletons = Vec::with_capacity(factors.len());
        let mut columns = vec![];
        for (f, b) in factors.iter().zip(&cofactors) {
            let d = f.degree(0);
            let skeleton: Vec<Vec<E>> = f
                .exponents_iter()
                .filter(|e| e[0] < d)
                .map(|e| e.to_vec())
                .collect();
            for m in &skeleton {
                columns.push(b.clone().mul_exp(m));
            }
            skeletons.push(skeleton);
        }

        let mut rows: HashMap<Vec<E>, usize> = HashMap::default();
        for c in &columns {
            for e in c.exponents_iter() {
                let n = rows.len();
                rows.entry(e.to_vec()).or_insert(n);
            }
        }

        if columns.len() > rows.len() {
            return Err(LiftError::Underdetermined);
        }

        let mut matrix = Matrix::new(rows.len() as u32, columns.len() as u32, template.ring.clone());
        for (col, c) in columns.iter().enumerate() {
            for t in c {
                matrix[(rows[t.exponents] as u32, col as u32)] = t.coefficient.clone();
            }
        }

        Ok(SparseDiophantineSolver {
            skeletons,
            rows,
            matrix,
            template,
        })
    }
}

impl<F: Field, E: Exponent> DiophantineSolver<F, E> for SparseDiophantineSolver<F, E> {
    fn solve(
        &self,
        rhs: &MultivariatePolynomial<F, E>,
    ) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
        let field = &self.template.ring;
        let mut b = vec![field.zero(); self.rows.len()];
        for t in rhs {
            match self.rows.get(t.exponents) {
                Some(r) => b[*r] = t.coefficient.clone(),
                None => return Err(LiftError::Inconsistent),
            }
        }

        let sol = self.matrix.solve(&Matrix::new_vec(b, field.clone()))?;

        let mut sigma = Vec::with_capacity(self.skeletons.len());
        let mut coeffs = sol.into_vec().into_iter();
        for skeleton in &self.skeletons {
            let c: Vec<_> = coeffs.by_ref().take(skeleton.len()).collect();
            let e: Vec<E> = skeleton.iter().flatten().copied().collect();
            sigma.push(self.template.from_unsorted_terms(c, e));
        }

        Ok(sigma)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::poly::factor::evaluation::HenselEvaluation;
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    use super::{
        all_but_one_products, DiophantineSolver, MultivariateDiophantineSolver,
        SparseDiophantineSolver, UnivariateDiophantineSolver, UnivariateMultiDiophantineSolver,
    };

    fn zero(field: &Zp) -> MultivariatePolynomial<Zp, u16> {
        MultivariatePolynomial::new(
            field,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y"), Variable::from("z")]),
        )
    }

    #[test]
    fn univariate() {
        let field = Zp::new(17);
        let zero = zero(&field);
        let x = zero.variable(0);
        let c = |n: u32| zero.constant(field.to_element(n));

        let a = &x.pow(3) + &c(2);
        let b = &(&x.pow(2) + &x) + &c(5);
        let rhs = &(&x.pow(4) * &c(3)) + &c(1);

        let solver = UnivariateDiophantineSolver::new(a.clone(), b.clone()).unwrap();
        let (s, t) = solver.solve(&rhs);
        assert_eq!(&(&s * &a) + &(&t * &b), rhs);
        assert!(s.degree(0) < b.degree(0));

        assert!(UnivariateDiophantineSolver::new(&a * &b, b.clone()).is_err());
    }

    #[test]
    fn univariate_multi() {
        let field = Zp::new(31);
        let zero = zero(&field);
        let x = zero.variable(0);
        let c = |n: u32| zero.constant(field.to_element(n));

        let factors = vec![&x + &c(1), &x.pow(2) + &c(3), &x + &c(7), &x.pow(3) + &x];
        let rhs = &(&x.pow(5) * &c(4)) + &(&x * &c(9));

        let solver = UnivariateMultiDiophantineSolver::new(&factors).unwrap();
        let sigma = solver.solve(&rhs).unwrap();

        let mut sum = zero.clone();
        for ((s, b), f) in sigma.iter().zip(all_but_one_products(&factors)).zip(&factors) {
            assert!(s.is_zero() || s.degree(0) < f.degree(0));
            sum = &sum + &(s * &b);
        }
        assert_eq!(sum, rhs);
    }

    #[test]
    fn multivariate() {
        let field = Zp::new(101);
        let zero = zero(&field);
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
        let c = |n: u32| zero.constant(field.to_element(n));

        let factors = vec![&(&x.pow(2) + &y) + &c(1), &(&x * &z) + &(&y * &c(3)) + &c(2)];
        let factors = vec![factors[0].clone(), &factors[1] + &x.pow(2)];
        let evaluation = HenselEvaluation::new(&field, vec![field.to_element(2), field.to_element(5)]);

        // a right-hand side built from a known solution
        let sigma0 = &(&x * &y) + &z;
        let sigma1 = &(&x * &z.pow(2)) + &y;
        let b = all_but_one_products(&factors);
        let rhs = &(&sigma0 * &b[0]) + &(&sigma1 * &b[1]);

        let solver =
            MultivariateDiophantineSolver::new(&factors, &evaluation, vec![0, 4, 4], 2).unwrap();
        let sigma = solver.solve(&rhs).unwrap();

        let mut sum = zero.clone();
        for (s, b) in sigma.iter().zip(&b) {
            sum = &sum + &(s * b);
        }
        assert_eq!(sum, rhs);
        assert!(sigma[0].degree(0) < factors[0].degree(0));
    }

    #[test]
    fn sparse() {
        let field = Zp::new(101);
        let zero = zero(&field);
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
        let c = |n: u32| zero.constant(field.to_element(n));

        let factors = vec![&(&x.pow(2) + &(&x * &y)) + &z, &(&x.pow(3) + &(&y * &z)) + &c(4)];
        let b = all_but_one_products(&factors);

        let sigma0 = (&x * &y).mul_coeff(field.to_element(3));
        let sigma1 = &(&y * &z).mul_coeff(field.to_element(2)) + &c(6);
        let rhs = &(&sigma0 * &b[0]) + &(&sigma1 * &b[1]);

        let solver = SparseDiophantineSolver::new(&factors).unwrap();
        assert_eq!(SparseDiophantineSolver::unknowns(&factors), 4);
        let sigma = solver.solve(&rhs).unwrap();
        assert_eq!(sigma, vec![sigma0, sigma1]);

        // a monomial outside of the skeleton
        let rhs = &rhs + &x.pow(9);
        assert!(solver.solve(&rhs).is_err());
    }
}
