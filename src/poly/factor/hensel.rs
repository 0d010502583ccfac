//! Hensel lifting of factorizations from an evaluation point to the full polynomial.
//!
//! A factorization of `f(x_0, b_1, ..., b_n)` is lifted one variable at a time. For
//! the variable `x_v`, the factors are expanded as series in `x_v - b_v` and every
//! coefficient is obtained by solving a Diophantine equation for the difference
//! between the target and the product of the current approximations.
//!
//! If the leading coefficient of `f` in `x_0` is not constant, the leading coefficients
//! of the factors can be imposed. [multivariate_lift_automatic_lc] imposes the leading
//! coefficient of `f` on every factor and removes it again afterwards.

use tracing::debug;

use crate::domains::Field;
use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
use crate::poly::univariate::UnivariatePolynomial;
use crate::poly::Exponent;

use super::bernardin::BernardinsTrick;
use super::diophantine::{
    DiophantineSolver, LiftError, MultivariateDiophantineSolver, SparseDiophantineSolver,
};
use super::evaluation::HenselEvaluation;

/// Use the sparse solver when the fraction of occurring monomials is below this value.
pub const SPARSE_DENSITY_THRESHOLD: f64 = 0.1;
/// The largest number of unknowns for which the sparse solver is tried.
pub const SPARSE_MAX_UNKNOWNS: usize = 256;

type Series<F, E> = UnivariatePolynomial<PolynomialRing<F, E>>;

fn product<F: Field, E: Exponent>(
    factors: &[MultivariatePolynomial<F, E>],
) -> MultivariatePolynomial<F, E> {
    factors
        .iter()
        .skip(1)
        .fold(factors[0].clone(), |acc, f| &acc * f)
}

/// Lift the series of the factors up to degree `max_degree`, such that their product
/// agrees with `target` up to that degree.
///
/// The images of the factors are the coefficients of degree zero. If `lcoeffs` is
/// provided, it contains the series of the leading coefficient of every factor in `x_0`
/// together with the degree of that factor in `x_0`.
pub fn lift_series<F: Field, E: Exponent>(
    target: &Series<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    lcoeffs: Option<Vec<(Series<F, E>, E)>>,
    solver: &dyn DiophantineSolver<F, E>,
    max_degree: usize,
) -> Result<Vec<Series<F, E>>, LiftError> {
    let series: Vec<_> = images.iter().map(|u| target.constant(u.clone())).collect();

    let mut trick = match lcoeffs {
        Some(lcoeffs) => BernardinsTrick::with_lc_correction(series, lcoeffs),
        None => BernardinsTrick::new_monic(series),
    };

    if trick.product_coefficient(0) != target.coefficient(0) {
        return Err(LiftError::NoSolution);
    }

    for d in 1..=max_degree {
        let delta = &target.coefficient(d) - &trick.product_coefficient(d);
        if delta.is_zero() {
            continue;
        }

        let corrections = solver.solve(&delta)?;
        trick.update(d, &corrections);
    }

    Ok(trick.into_factors())
}

/// Returns `true` if the lifting of `x_var` should first try the sparse solver: the
/// target must be sparse in `x_0, ..., x_var` and the linear system small.
fn prefers_sparse_solver<F: Field, E: Exponent>(
    target: &MultivariatePolynomial<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    var: usize,
) -> bool {
    if var < 2 {
        return false;
    }

    let size: f64 = (0..=var)
        .map(|v| target.degree(v).to_u32() as f64 + 1.)
        .product();
    let density = target.nterms() as f64 / size;

    density < SPARSE_DENSITY_THRESHOLD
        && SparseDiophantineSolver::unknowns(images) <= SPARSE_MAX_UNKNOWNS
}

/// Lift the factors from `x_var = b_var` to `target`, which depends on `x_0, ..., x_var` only.
/// The images must be pairwise coprime at the evaluation point and their product must be
/// `target` at `x_var = b_var`.
pub fn lift_variable<F: Field, E: Exponent>(
    target: &MultivariatePolynomial<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    lcoeffs: Option<&[MultivariatePolynomial<F, E>]>,
    evaluation: &HenselEvaluation<F>,
    var: usize,
) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
    if images.len() == 1 {
        return Ok(vec![target.clone()]);
    }

    if product(images) == *target {
        return Ok(images.to_vec());
    }

    let max_degree = target.degree(var).to_u32() as usize;
    let series = evaluation.series_expansion(target, var);
    let lc_series: Option<Vec<_>> = lcoeffs.map(|lcs| {
        lcs.iter()
            .zip(images)
            .map(|(lc, u)| (evaluation.series_expansion(lc, var), u.degree(0)))
            .collect()
    });

    let finish = |lifted: Vec<Series<F, E>>| -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
        let factors: Vec<_> = lifted
            .iter()
            .map(|s| evaluation.series_to_poly(s, var))
            .collect();

        if product(&factors) != *target {
            return Err(LiftError::NoSolution);
        }
        Ok(factors)
    };

    if prefers_sparse_solver(target, images, var) {
        let r = SparseDiophantineSolver::new(images)
            .and_then(|solver| lift_series(&series, images, lc_series.clone(), &solver, max_degree))
            .and_then(finish);

        match r {
            Ok(factors) => return Ok(factors),
            Err(e) => debug!("Sparse lifting of variable {} failed: {}", var, e),
        }
    }

    let bounds = (0..var)
        .map(|v| target.degree(v).to_u32() as usize)
        .collect();
    let solver = MultivariateDiophantineSolver::new(images, evaluation, bounds, var - 1)?;
    let lifted = lift_series(&series, images, lc_series, &solver, max_degree)?;
    finish(lifted)
}

/// Lift the factors of `f(x_0, ..., x_{start-1}, b_start, ..., b_n)` to factors of `f`.
///
/// If `lcoeffs` is provided, it contains the leading coefficients in `x_0` of the
/// factors of `f` and the leading coefficients of the images must agree with them
/// at the evaluation point. Otherwise the factors must be monic in `x_0`.
pub fn multivariate_lift<F: Field, E: Exponent>(
    f: &MultivariatePolynomial<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    lcoeffs: Option<&[MultivariatePolynomial<F, E>]>,
    evaluation: &HenselEvaluation<F>,
    start: usize,
) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
    let mut factors = images.to_vec();
    for var in start.max(1)..f.nvars() {
        let target = evaluation.evaluate_from(f, var + 1);
        let lcs: Option<Vec<_>> =
            lcoeffs.map(|l| l.iter().map(|c| evaluation.evaluate_from(c, var + 1)).collect());

        factors = lift_variable(&target, &factors, lcs.as_deref(), evaluation, var)?;
        debug!("Lifted variable {}", var);
    }

    Ok(factors)
}

/// Lift the factors of a bivariate polynomial `f(x_0, x_1)` from `x_1 = b_1`.
pub fn bivariate_lift<F: Field, E: Exponent>(
    f: &MultivariatePolynomial<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    lcoeffs: Option<&[MultivariatePolynomial<F, E>]>,
    evaluation: &HenselEvaluation<F>,
) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
    lift_variable(f, images, lcoeffs, evaluation, 1)
}

/// Lift with the leading coefficient `L` of `f` in `x_0` imposed on every factor: the
/// polynomial `L^(r-1) f` is lifted, and every resulting factor has leading coefficient `L`.
///
/// The images are factors of `f(x_0, ..., x_{start-1}, b_start, ..., b_n)` and only
/// have to be correct up to a constant.
pub fn multivariate_lift_with_lc<F: Field, E: Exponent>(
    f: &MultivariatePolynomial<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    evaluation: &HenselEvaluation<F>,
    start: usize,
) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
    if images.len() == 1 {
        return Ok(vec![f.clone()]);
    }

    let lc = f.univariate_lcoeff(0);
    let lc_image = evaluation.evaluate_from(&lc, start.max(1));

    let mut scaled = Vec::with_capacity(images.len());
    for u in images {
        let ulc = u.univariate_lcoeff(0);
        let Some(s) = lc_image.divides(&ulc) else {
            return Err(LiftError::NoSolution);
        };
        scaled.push(u * &s);
    }

    let target = f * &lc.pow(images.len() - 1);
    let lcoeffs = vec![lc; images.len()];
    multivariate_lift(&target, &scaled, Some(lcoeffs.as_slice()), evaluation, start)
}

/// Lift the factors of `f(x_0, ..., x_{start-1}, b_start, ..., b_n)` to the factors of `f`,
/// which are returned primitive in `x_0`.
pub fn multivariate_lift_automatic_lc<F: Field, E: Exponent>(
    f: &MultivariatePolynomial<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    evaluation: &HenselEvaluation<F>,
    start: usize,
) -> Result<Vec<MultivariatePolynomial<F, E>>, LiftError> {
    Ok(multivariate_lift_with_lc(f, images, evaluation, start)?
        .into_iter()
        .map(|g| g.primitive_part_in_var(0).make_monic())
        .collect())
}

/// Compute the inverse of a series with an invertible constant coefficient up to degree `d`.
fn series_inverse<F: Field, E: Exponent>(s: &Series<F, E>, d: usize) -> Series<F, E> {
    let s0 = s.coefficient(0);
    let field = s0.ring.clone();
    let inv0 = field.inv(&s0.lcoeff());

    let mut inv = vec![s0.constant(inv0.clone())];
    for k in 1..=d {
        let mut c = s0.zero();
        for j in 1..=k.min(s.degree()) {
            c = &c + &(&s.coefficient(j) * &inv[k - j]);
        }
        inv.push(-c.mul_coeff(inv0.clone()));
    }

    s.from_coefficients(inv)
}

/// Lift monic factors of `f(x_0, b_1)` to power series in `x_1 - b_1` up to degree `d`,
/// such that their product is `f / L` with `L` the leading coefficient of `f` in `x_0`.
pub fn lift_monic_series<F: Field, E: Exponent>(
    f: &MultivariatePolynomial<F, E>,
    images: &[MultivariatePolynomial<F, E>],
    evaluation: &HenselEvaluation<F>,
    d: usize,
) -> Result<Vec<Series<F, E>>, LiftError> {
    let lc = f.univariate_lcoeff(0);
    let lc_inv = series_inverse(&evaluation.series_expansion(&lc, 1), d);
    let target = evaluation.series_expansion(f, 1).mul_truncated(&lc_inv, d);

    let solver = MultivariateDiophantineSolver::new(images, evaluation, vec![], 0)?;
    lift_series(&target, images, None, &solver, d)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::Field;
    use crate::poly::factor::evaluation::HenselEvaluation;
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    use crate::poly::factor::diophantine::{LiftError, SparseDiophantineSolver};

    use super::{
        bivariate_lift, lift_monic_series, lift_series, lift_variable, multivariate_lift,
        multivariate_lift_automatic_lc, prefers_sparse_solver,
    };

    fn zero(field: &Zp) -> MultivariatePolynomial<Zp, u16> {
        MultivariatePolynomial::new(
            field,
            None,
            Arc::new(vec![Variable::from("x"), Variable::from("y"), Variable::from("z")]),
        )
    }

    #[test]
    fn bivariate() {
        let field = Zp::new(101);
        let zero = zero(&field);
        let (x, y) = (zero.variable(0), zero.variable(1));
        let c = |n: u32| zero.constant(field.to_element(n));

        let a = &(&x.pow(2) + &(&x * &y)) + &c(3);
        let b = &(&x + &y.pow(2)) + &c(1);
        let f = &a * &b;

        let eval = HenselEvaluation::new(&field, vec![field.to_element(2), field.to_element(0)]);
        let images = vec![eval.evaluate_from(&a, 1), eval.evaluate_from(&b, 1)];

        let lifted = bivariate_lift(&f, &images, None, &eval).unwrap();
        assert_eq!(lifted, vec![a, b]);
    }

    #[test]
    fn exact_input() {
        let field = Zp::new(101);
        let zero = zero(&field);
        let x = zero.variable(0);
        let c = |n: u32| zero.constant(field.to_element(n));

        // the factors do not depend on the evaluated variables
        let a = &x + &c(4);
        let b = &x.pow(2) + &c(1);
        let f = &a * &b;

        let eval = HenselEvaluation::new(&field, vec![field.to_element(7), field.to_element(3)]);
        let lifted = multivariate_lift(&f, &[a.clone(), b.clone()], None, &eval, 1).unwrap();
        assert_eq!(lifted, vec![a, b]);
    }

    #[test]
    fn trivariate_with_leading_coefficients() {
        let field = Zp::new(1009);
        let zero = zero(&field);
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
        let c = |n: u32| zero.constant(field.to_element(n));

        let a = &(&(&x.pow(2) * &y) + &(&x * &z)) + &c(5);
        let b = &(&(&x * &(&z + &c(2))) + &y.pow(2)) + &(&y * &z);
        let f = &a * &b;

        let eval = HenselEvaluation::new(&field, vec![field.to_element(3), field.to_element(11)]);
        let images = vec![eval.evaluate_from(&a, 1), eval.evaluate_from(&b, 1)];

        let lifted = multivariate_lift_automatic_lc(&f, &images, &eval, 1).unwrap();
        let expected = vec![a.clone().make_monic(), b.clone().make_monic()];
        for g in &lifted {
            assert!(expected.contains(&g.clone().make_monic()));
        }
        assert_eq!(
            (&lifted[0] * &lifted[1]).make_monic(),
            f.clone().make_monic()
        );
    }

    /// `(x^3 + y^4 z^3 + 1)(x^2 + y z^5 + 2)`, which is sparse in `x, y, z`.
    fn sparse_factors(
        zero: &MultivariatePolynomial<Zp, u16>,
        field: &Zp,
    ) -> (MultivariatePolynomial<Zp, u16>, MultivariatePolynomial<Zp, u16>) {
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
        let c = |n: u32| zero.constant(field.to_element(n));

        let a = &(&x.pow(3) + &(&y.pow(4) * &z.pow(3))) + &c(1);
        let b = &(&x.pow(2) + &(&y * &z.pow(5))) + &c(2);
        (a, b)
    }

    #[test]
    fn sparse_lift() {
        let field = Zp::new(101);
        let zero = zero(&field);
        let (a, b) = sparse_factors(&zero, &field);
        let f = &a * &b;

        let eval = HenselEvaluation::new(&field, vec![field.to_element(5), field.to_element(3)]);
        let images = vec![eval.evaluate_from(&a, 2), eval.evaluate_from(&b, 2)];
        assert!(prefers_sparse_solver(&f, &images, 2));
        assert!(!prefers_sparse_solver(&f, &images, 1));

        // the sparse solver alone recovers the factors
        let solver = SparseDiophantineSolver::new(&images).unwrap();
        let series = lift_series(&eval.series_expansion(&f, 2), &images, None, &solver, 8).unwrap();
        let sparse: Vec<_> = series.iter().map(|s| eval.series_to_poly(s, 2)).collect();
        assert_eq!(sparse, vec![a.clone(), b.clone()]);

        assert_eq!(lift_variable(&f, &images, None, &eval, 2).unwrap(), vec![a, b]);
    }

    #[test]
    fn sparse_lift_falls_back_to_dense() {
        let field = Zp::new(101);
        let zero = zero(&field);
        let (a, b) = sparse_factors(&zero, &field);
        let f = &a * &b;

        // at z = 0 the images lose the monomials y^4 and y that the corrections need
        let eval = HenselEvaluation::new(&field, vec![field.to_element(5), field.to_element(0)]);
        let images = vec![eval.evaluate_from(&a, 2), eval.evaluate_from(&b, 2)];
        assert!(prefers_sparse_solver(&f, &images, 2));

        let solver = SparseDiophantineSolver::new(&images).unwrap();
        let r = lift_series(&eval.series_expansion(&f, 2), &images, None, &solver, 8);
        assert_eq!(r.err(), Some(LiftError::Inconsistent));

        assert_eq!(lift_variable(&f, &images, None, &eval, 2).unwrap(), vec![a, b]);
    }

    #[test]
    fn monic_series() {
        let field = Zp::new(101);
        let zero = zero(&field);
        let (x, y) = (zero.variable(0), zero.variable(1));
        let c = |n: u32| zero.constant(field.to_element(n));

        // (y x + 1) (x + y)
        let f = &(&(&x * &y) + &c(1)) * &(&x + &y);
        let eval = HenselEvaluation::new(&field, vec![field.to_element(1), field.to_element(0)]);

        let image = eval.evaluate_from(&f, 1);
        let images = vec![&x + &c(1), &x + &c(1)];
        assert_eq!(&images[0] * &images[1], image);

        // the images are not coprime
        assert!(lift_monic_series(&f, &images, &eval, 3).is_err());

        let eval = HenselEvaluation::new(&field, vec![field.to_element(2), field.to_element(0)]);
        let inv2 = field.inv(&field.to_element(2));
        let images = vec![&x + &zero.constant(inv2), &x + &c(2)];
        let series = lift_monic_series(&f, &images, &eval, 3).unwrap();

        // x + y is a factor of f and monic in x
        assert_eq!(eval.series_to_poly(&series[1].clone().truncate(3), 1), &x + &y);
    }
}
