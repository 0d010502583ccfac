//! Factorization of square-free multivariate polynomials.
//!
//! Over a Galois field, the polynomial is evaluated at random values for `x_2, ..., x_n`.
//! The bivariate image is factored by lifting the factors of a univariate image to power
//! series in `x_1` and recombining them. The bivariate factors are then lifted in the
//! remaining variables, with leading coefficients predicted from the factors of the
//! leading coefficient in `x_0`. When the field is too small to find good evaluation
//! points, [FactorError::FieldTooSmall] is returned and the caller factors in an
//! extension field instead.
//!
//! Over the integers, the factors of a univariate image over `Z` are lifted modulo a
//! prime that exceeds twice a bound on the coefficients of the factors, after which
//! they are verified by exact division. The leading coefficients of the factors are
//! reconstructed from the factorizations of the images in `x_0` and one other variable,
//! and the leading coefficient of the input is imposed on every factor when that fails.

use std::fmt::Display;
use std::sync::Arc;

use rand::{thread_rng, RngCore};
use tracing::debug;

use crate::combinatorics::CombinationIterator;
use crate::domains::finite_field::{FiniteFieldCore, GaloisField, ZpLarge};
use crate::domains::integer::{Integer, IntegerRing, Z};
use crate::domains::{EuclideanDomain, Field, Ring};
use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
use crate::poly::univariate::UnivariatePolynomial;
use crate::poly::Exponent;

use super::evaluation::HenselEvaluation;
use super::hensel::{
    lift_monic_series, multivariate_lift, multivariate_lift_automatic_lc,
    multivariate_lift_with_lc,
};

/// The number of good evaluation points that are compared to find an image with
/// the fewest factors.
pub const N_DIFF_EVALUATIONS: usize = 3;
/// The number of bad evaluation points in a finite field after which the field
/// is considered too small.
pub const N_FAILS_BEFORE_SWITCH_TO_EXTENSION: usize = 10;
/// The number of failed lifts after which the factors are found by trying every
/// split of the images into two groups.
pub const N_DIFF_EVALUATIONS_FAIL: usize = 4;
/// The minimal number of elements of an extension field that is used when a
/// finite field is too small.
pub const MIN_EXTENSION_SIZE: u64 = 256;

/// The outcome of a randomized step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Found(T),
    /// The random choice was unlucky and a new one should be made.
    Retry,
    /// Too many random choices were unlucky.
    GiveUp,
}

/// An error of the factorization driver, from which the caller can recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorError {
    /// The field does not have enough elements to find a good evaluation point.
    FieldTooSmall,
    /// None of the evaluation points gave factors that could be lifted.
    BadEvaluation,
}

impl Display for FactorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactorError::FieldTooSmall => f.write_str("field too small"),
            FactorError::BadEvaluation => f.write_str("no good evaluation point found"),
        }
    }
}

impl std::error::Error for FactorError {}

type Series<F, E> = UnivariatePolynomial<PolynomialRing<F, E>>;

/// Remove the variables that do not occur in `f` and sort the others by descending degree.
/// Returns the new polynomial and the original index of every remaining variable.
fn compress_variables<F: Ring, E: Exponent>(
    f: &MultivariatePolynomial<F, E>,
) -> (MultivariatePolynomial<F, E>, Vec<usize>) {
    let degrees = f.degrees();
    let mut vars: Vec<usize> = (0..f.nvars()).filter(|&v| degrees[v] > E::zero()).collect();
    vars.sort_by(|&a, &b| degrees[b].cmp(&degrees[a]));

    let mut exponents = Vec::with_capacity(vars.len() * f.nterms());
    for e in f.exponents_iter() {
        exponents.extend(vars.iter().map(|&v| e[v]));
    }

    let mut res = f.zero();
    res.variables = Arc::new(vars.iter().map(|&v| f.variables[v].clone()).collect());
    (res.from_unsorted_terms(f.coefficients.clone(), exponents), vars)
}

/// Undo [compress_variables], using the variables of `template`.
fn expand_variables<F: Ring, E: Exponent>(
    g: &MultivariatePolynomial<F, E>,
    vars: &[usize],
    template: &MultivariatePolynomial<F, E>,
) -> MultivariatePolynomial<F, E> {
    let nvars = template.nvars();
    let mut exponents = Vec::with_capacity(g.nterms() * nvars);
    for e in g.exponents_iter() {
        let start = exponents.len();
        exponents.resize(start + nvars, E::zero());
        for (i, &v) in vars.iter().enumerate() {
            exponents[start + v] = e[i];
        }
    }

    template.from_unsorted_terms(g.coefficients.clone(), exponents)
}

/// An evaluation point is good if it keeps the degree in `x_0`, the univariate image
/// is square-free, and the bivariate image keeps the degree in `x_1` and is primitive in `x_0`.
fn is_good_evaluation<F: EuclideanDomain, E: Exponent>(
    f: &MultivariatePolynomial<F, E>,
    lc: &MultivariatePolynomial<F, E>,
    eval: &HenselEvaluation<F>,
) -> bool {
    if eval.evaluate_from(lc, 1).is_zero() {
        return false;
    }

    let u = eval.evaluate_from(f, 1);
    if !u.gcd(&u.derivative(0)).is_constant() {
        return false;
    }

    if f.nvars() > 2 {
        let b = eval.evaluate_from(f, 2);
        if b.degree(1) != f.degree(1) || !b.content_in_var(0).is_constant() {
            return false;
        }
    }

    true
}

/// Sample a random evaluation point for `x_1, ..., x_n`. Over an infinite ring, the values
/// are taken from a range that grows with the number of failures.
fn sample_evaluation<R: EuclideanDomain, E: Exponent>(
    f: &MultivariatePolynomial<R, E>,
    lc: &MultivariatePolynomial<R, E>,
    rng: &mut impl RngCore,
    fails: &mut usize,
) -> Attempt<HenselEvaluation<R>> {
    let finite = !f.ring.size().is_zero();
    if finite && *fails > N_FAILS_BEFORE_SWITCH_TO_EXTENSION {
        return Attempt::GiveUp;
    }

    let range = if finite {
        (0, i64::MAX)
    } else {
        let r = 3 + 2 * *fails as i64;
        (-r, r)
    };

    let values = (1..f.nvars())
        .map(|_| f.ring.sample(&mut *rng, range))
        .collect();
    let eval = HenselEvaluation::new(&f.ring, values);

    if is_good_evaluation(f, lc, &eval) {
        Attempt::Found(eval)
    } else {
        *fails += 1;
        Attempt::Retry
    }
}

/// Find a factorization into two parts by trying every split of `images` into two groups.
/// `lift` is called with the products of both groups.
fn recombine_by_splitting<F: Ring, E: Exponent, T>(
    images: &[MultivariatePolynomial<F, E>],
    mut lift: impl FnMut(MultivariatePolynomial<F, E>, MultivariatePolynomial<F, E>) -> Option<T>,
) -> Option<T> {
    for k in 1..=images.len() / 2 {
        let mut it = CombinationIterator::new(images.len(), k);
        while let Some(c) = it.next() {
            let mut g = images[0].one();
            let mut h = images[0].one();
            for (i, u) in images.iter().enumerate() {
                if c.contains(&i) {
                    g = &g * u;
                } else {
                    h = &h * u;
                }
            }

            if let Some(r) = lift(g, h) {
                return Some(r);
            }
        }
    }

    None
}

/// The number of times `w` divides `a`.
fn multiplicity<R: EuclideanDomain, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    w: &MultivariatePolynomial<R, E>,
) -> usize {
    let mut a = a.clone();
    let mut n = 0;
    while let Some(q) = a.divides(w) {
        a = q;
        n += 1;
    }
    n
}

/// Distribute the irreducible factors `lc_factors` of the leading coefficient in `x_0`,
/// given with their multiplicities, over `r` factors. For some variables `x_v`, `var_lcoeffs`
/// holds the leading coefficients in `x_0` of the `r` factors of the image in `x_0` and `x_v`.
///
/// The images in `x_v` of the leading coefficient factors are split into a gcd-free basis.
/// A factor is assigned with a basis element that divides its image and no other, so that
/// its exponent in every factor follows from the multiplicity of that element. Returns
/// the exponents `e[k][j]` of factor `k` in the leading coefficient of factor `j`.
fn assign_lcoeff_factors<R: EuclideanDomain, E: Exponent>(
    lc_factors: &[(MultivariatePolynomial<R, E>, usize)],
    eval: &HenselEvaluation<R>,
    var_lcoeffs: &[(usize, Vec<MultivariatePolynomial<R, E>>)],
) -> Option<Vec<Vec<usize>>> {
    let mut exponents = Vec::with_capacity(lc_factors.len());
    'factor: for (k, (p, m)) in lc_factors.iter().enumerate() {
        'var: for (v, lcs) in var_lcoeffs {
            if !p.contains(*v) {
                continue;
            }

            let images: Vec<_> = lc_factors
                .iter()
                .map(|(q, _)| eval.evaluate_except(q, *v))
                .collect();
            if images[k].is_constant() {
                continue;
            }

            let others: Vec<_> = images
                .iter()
                .enumerate()
                .filter(|(l, q)| *l != k && !q.is_constant())
                .map(|(_, q)| q)
                .collect();

            let basis = MultivariatePolynomial::gcd_free_basis(images.clone());
            let Some(w) = basis.iter().find(|w| {
                images[k].divides(w).is_some() && others.iter().all(|q| q.divides(w).is_none())
            }) else {
                debug!("No private basis element for {} in variable {}", p, v);
                continue;
            };

            let mu = multiplicity(&images[k], w);
            let mut e = Vec::with_capacity(lcs.len());
            for l in lcs {
                let nu = multiplicity(l, w);
                if nu % mu != 0 {
                    continue 'var;
                }
                e.push(nu / mu);
            }

            if e.iter().sum::<usize>() == *m {
                exponents.push(e);
                continue 'factor;
            }
        }

        debug!("Could not assign leading coefficient factor {}", p);
        return None;
    }

    Some(exponents)
}

/// Compute `Π_k p_k^e[k][j]` for every factor `j`.
fn lcoeffs_from_exponents<R: Ring, E: Exponent>(
    one: &MultivariatePolynomial<R, E>,
    lc_factors: &[(MultivariatePolynomial<R, E>, usize)],
    exponents: &[Vec<usize>],
    nfactors: usize,
) -> Vec<MultivariatePolynomial<R, E>> {
    (0..nfactors)
        .map(|j| {
            lc_factors
                .iter()
                .zip(exponents)
                .fold(one.clone(), |acc, ((p, _), e)| &acc * &p.pow(e[j]))
        })
        .collect()
}

/// Predict the leading coefficients in `x_0` of the factors from the irreducible monic
/// factors `lc_factors` of the leading coefficient `lc` of `f`, distributed with the
/// leading coefficients of the bivariate images.
///
/// Returns the constant `k` such that `k f` has the predicted factors, the images scaled
/// to the predicted leading coefficients, and the predicted leading coefficients.
#[allow(clippy::type_complexity)]
fn distribute_lcoeffs<F: Field, E: Exponent>(
    lc: &MultivariatePolynomial<F, E>,
    lc_factors: &[(MultivariatePolynomial<F, E>, usize)],
    eval: &HenselEvaluation<F>,
    images: &[MultivariatePolynomial<F, E>],
) -> Option<(
    F::Element,
    Vec<MultivariatePolynomial<F, E>>,
    Vec<MultivariatePolynomial<F, E>>,
)> {
    let image_lcs: Vec<_> = images.iter().map(|u| u.univariate_lcoeff(0)).collect();
    let exponents = assign_lcoeff_factors(lc_factors, eval, &[(1, image_lcs.clone())])?;
    let lcs = lcoeffs_from_exponents(&lc.one(), lc_factors, &exponents, images.len());

    let ring = &lc.ring;
    let mut scaled = Vec::with_capacity(images.len());
    for ((u, ulc), lambda) in images.iter().zip(&image_lcs).zip(&lcs) {
        let rest = ulc.divides(&eval.evaluate_from(lambda, 2))?;
        if !rest.is_constant() {
            return None;
        }
        scaled.push(u.clone().mul_coeff(ring.inv(&rest.get_constant())));
    }

    let product = lcs.iter().fold(lc.one(), |acc, l| &acc * l);
    let kappa = ring.div(&product.lcoeff(), &lc.lcoeff());
    if product != lc.clone().mul_coeff(kappa.clone()) {
        return None;
    }

    Some((kappa, scaled, lcs))
}

impl<F: GaloisField, E: Exponent> MultivariatePolynomial<F, E> {
    /// Factor a square-free polynomial over a Galois field. The factors are monic.
    ///
    /// Returns [FactorError::FieldTooSmall] when the field does not have enough elements
    /// to find a good evaluation point.
    pub fn factor_square_free_galois(&self) -> Result<Vec<Self>, FactorError> {
        if self.is_constant() {
            return Ok(vec![]);
        }

        let (compressed, vars) = compress_variables(self);
        let factors = compressed.factor_compressed_galois()?;
        Ok(factors
            .iter()
            .map(|g| expand_variables(g, &vars, self).make_monic())
            .collect())
    }

    fn factor_compressed_galois(&self) -> Result<Vec<Self>, FactorError> {
        if self.nvars() == 1 {
            return Ok(self.factor_distinct_equal_degree());
        }

        for v in 0..self.nvars() {
            let c = self.content_in_var(v);
            if !c.is_constant() {
                let mut factors = c.factor_square_free_galois()?;
                factors.extend((self / &c).factor_square_free_galois()?);
                return Ok(factors);
            }
        }

        // a primitive polynomial that is linear in a variable is irreducible
        if (0..self.nvars()).any(|v| self.degree(v) == E::one()) {
            return Ok(vec![self.clone().make_monic()]);
        }

        // the main variable must be separable
        let mut main = None;
        for v in 0..self.nvars() {
            let d = self.derivative(v);
            if d.is_zero() {
                continue;
            }

            let g = self.gcd(&d);
            if !g.is_constant() {
                let mut factors = g.factor_square_free_galois()?;
                factors.extend((self / &g).factor_square_free_galois()?);
                return Ok(factors);
            }

            main = Some(v);
            break;
        }

        let Some(main) = main else {
            panic!("Polynomial {} is not square-free", self);
        };

        let mut perm: Vec<usize> = (0..self.nvars()).collect();
        perm.remove(main);
        perm.insert(0, main);
        let f = self.rearrange(&perm);

        let factors = if f.nvars() == 2 {
            f.factor_bivariate_galois()?
        } else {
            f.factor_multivariate_galois()?
        };

        let mut inv = vec![0; perm.len()];
        for (i, &p) in perm.iter().enumerate() {
            inv[p] = i;
        }

        Ok(factors
            .into_iter()
            .map(|g| g.rearrange(&inv).make_monic())
            .collect())
    }

    /// Find a good evaluation point and the factors of the image of `self`. The images are
    /// univariate in `x_0` if `self` only depends on `x_0` and `x_1`, and bivariate otherwise.
    /// Of [N_DIFF_EVALUATIONS] evaluation points, the one with the fewest factors is kept.
    fn choose_images_galois(
        &self,
        lc: &Self,
        rng: &mut impl RngCore,
        fails: &mut usize,
    ) -> Result<(HenselEvaluation<F>, Vec<Self>), FactorError> {
        let bivariate = (2..self.nvars()).all(|v| !self.contains(v));

        let mut best: Option<(HenselEvaluation<F>, Vec<Self>)> = None;
        let mut found = 0;
        while found < N_DIFF_EVALUATIONS {
            let eval = match sample_evaluation(self, lc, rng, fails) {
                Attempt::Found(eval) => eval,
                Attempt::Retry => continue,
                Attempt::GiveUp => break,
            };

            let images = if bivariate {
                eval.evaluate_from(self, 1).factor_distinct_equal_degree()
            } else {
                match eval.evaluate_from(self, 2).factor_bivariate_galois() {
                    Ok(images) => images,
                    Err(FactorError::BadEvaluation) => {
                        *fails += 1;
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            };

            debug!("Image has {} factors", images.len());
            found += 1;

            if images.len() == 1 {
                return Ok((eval, images));
            }

            if best.as_ref().map_or(true, |(_, b)| images.len() < b.len()) {
                best = Some((eval, images));
            }
        }

        best.ok_or(FactorError::FieldTooSmall)
    }

    /// Factor a square-free polynomial in `x_0` and `x_1` that is primitive in `x_0`.
    fn factor_bivariate_galois(&self) -> Result<Vec<Self>, FactorError> {
        let lc = self.univariate_lcoeff(0);

        let mut rng = thread_rng();
        let mut fails = 0;
        let mut lift_fails = 0;
        loop {
            let (eval, images) = self.choose_images_galois(&lc, &mut rng, &mut fails)?;
            if images.len() == 1 {
                return Ok(vec![self.clone().make_monic()]);
            }

            // the factors times their leading coefficient cofactor have bounded degree in x_1
            let k = self.degree(1).to_u32() as usize + lc.degree(1).to_u32() as usize + 1;
            match lift_monic_series(self, &images, &eval, k) {
                Ok(series) => return Ok(self.recombine_series(series, &eval, k)),
                Err(e) => {
                    debug!("Bivariate lifting failed: {}", e);
                    lift_fails += 1;
                    if lift_fails >= N_DIFF_EVALUATIONS_FAIL {
                        return Err(FactorError::BadEvaluation);
                    }
                }
            }
        }
    }

    /// Combine the monic series factors of `f / L`, with `L` the leading coefficient
    /// of `f` in `x_0`, into the factors of `f`. A subset of series is a factor if
    /// its product with the series of `L`, truncated at degree `k - 1`, has a primitive
    /// part that divides `f`.
    fn recombine_series(
        &self,
        mut series: Vec<Series<F, E>>,
        eval: &HenselEvaluation<F>,
        k: usize,
    ) -> Vec<Self> {
        let mut rest = self.clone();
        let mut factors = vec![];

        let mut size = 1;
        'next: while 2 * size <= series.len() {
            let lc = eval.series_expansion(&rest.univariate_lcoeff(0), 1);

            let mut it = CombinationIterator::new(series.len(), size);
            while let Some(c) = it.next() {
                let mut p = lc.clone();
                for &i in c {
                    p = p.mul_truncated(&series[i], k - 1);
                }

                let g = eval.series_to_poly(&p, 1).primitive_part_in_var(0);
                if !g.contains(0) {
                    continue;
                }

                if let Some(q) = rest.divides(&g) {
                    debug!("Found factor {}", g);
                    factors.push(g.make_monic());
                    rest = q;

                    let mut used = c.to_vec();
                    used.sort_unstable_by(|a, b| b.cmp(a));
                    for i in used {
                        series.remove(i);
                    }
                    continue 'next;
                }
            }

            size += 1;
        }

        factors.push(rest.make_monic());
        factors
    }

    /// Factor a square-free polynomial in three or more variables that is primitive in `x_0`.
    fn factor_multivariate_galois(&self) -> Result<Vec<Self>, FactorError> {
        let lc = self.univariate_lcoeff(0);
        let lc_factors: Option<Vec<(Self, usize)>> = if lc.is_constant() {
            Some(vec![])
        } else {
            lc.factor_galois().ok()
        };

        let mut rng = thread_rng();
        let mut fails = 0;
        let mut lift_fails = 0;
        loop {
            let (eval, images) = self.choose_images_galois(&lc, &mut rng, &mut fails)?;
            if images.len() == 1 {
                return Ok(vec![self.clone().make_monic()]);
            }

            if let Some(factors) =
                self.lift_multivariate_galois(&lc, lc_factors.as_deref(), &eval, &images)
            {
                return Ok(factors);
            }

            lift_fails += 1;
            if lift_fails >= N_DIFF_EVALUATIONS_FAIL {
                debug!("Recombining {} images by splitting", images.len());
                let split = recombine_by_splitting(&images, |g, h| {
                    multivariate_lift_automatic_lc(self, &[g, h], &eval, 2).ok()
                });

                let Some(parts) = split else {
                    return Ok(vec![self.clone().make_monic()]);
                };

                let mut factors = vec![];
                for p in parts {
                    factors.extend(p.factor_square_free_galois()?);
                }
                return Ok(factors);
            }
        }
    }

    /// Lift the bivariate factors `images` to the factors of `self`. The leading coefficients
    /// are predicted from `lc_factors` when possible, and imposed otherwise.
    fn lift_multivariate_galois(
        &self,
        lc: &Self,
        lc_factors: Option<&[(Self, usize)]>,
        eval: &HenselEvaluation<F>,
        images: &[Self],
    ) -> Option<Vec<Self>> {
        if let Some((kappa, scaled, lcs)) =
            lc_factors.and_then(|l| distribute_lcoeffs(lc, l, eval, images))
        {
            let target = self.clone().mul_coeff(kappa);
            match multivariate_lift(&target, &scaled, Some(lcs.as_slice()), eval, 2) {
                Ok(factors) => return Some(factors.into_iter().map(|g| g.make_monic()).collect()),
                Err(e) => debug!("Lifting with predicted leading coefficients failed: {}", e),
            }
        }

        match multivariate_lift_automatic_lc(self, images, eval, 2) {
            Ok(factors) => Some(factors),
            Err(e) => {
                debug!("Lifting failed: {}", e);
                None
            }
        }
    }
}

impl<E: Exponent> MultivariatePolynomial<IntegerRing, E> {
    /// Factor a square-free polynomial over the integers. The factors are primitive
    /// and have a positive leading coefficient.
    pub fn factor_square_free_integer(&self) -> Vec<Self> {
        if self.is_constant() {
            return vec![];
        }

        let f = self.clone().make_primitive();
        let (compressed, vars) = compress_variables(&f);
        compressed
            .factor_compressed_integer()
            .iter()
            .map(|g| expand_variables(g, &vars, &f).normalize())
            .collect()
    }

    fn factor_compressed_integer(&self) -> Vec<Self> {
        if self.nvars() == 1 {
            return self.clone().make_primitive().factor_reconstruct();
        }

        for v in 0..self.nvars() {
            let c = self.content_in_var(v);
            if !c.is_constant() {
                let mut factors = c.factor_square_free_integer();
                factors.extend((self / &c).factor_square_free_integer());
                return factors;
            }
        }

        if (0..self.nvars()).any(|v| self.degree(v) == E::one()) {
            return vec![self.clone()];
        }

        self.factor_multivariate_integer()
    }

    /// Factor a square-free, primitive polynomial in two or more variables.
    fn factor_multivariate_integer(&self) -> Vec<Self> {
        let lc = self.univariate_lcoeff(0);
        let lc_factors = if !lc.is_constant() && self.nvars() > 2 {
            Some(lc.factor_integer())
        } else {
            None
        };

        let mut rng = thread_rng();
        let mut fails = 0;
        let mut lift_fails = 0;
        loop {
            let (eval, images) = self.choose_images_integer(&lc, &mut rng, &mut fails);
            if images.len() == 1 {
                return vec![self.clone()];
            }

            let lcs = lc_factors
                .as_ref()
                .and_then(|l| self.reconstruct_lcoeffs(&lc, l, &eval, &images));
            if let Some(lcs) = lcs {
                if let Some(factors) = self.lift_integer(&eval, &images, Some(&lcs)) {
                    return factors;
                }
                debug!("Lifting with reconstructed leading coefficients failed");
            }

            if let Some(factors) = self.lift_integer(&eval, &images, None) {
                return factors;
            }

            lift_fails += 1;
            if lift_fails >= N_DIFF_EVALUATIONS_FAIL {
                debug!("Recombining {} images by splitting", images.len());
                let split =
                    recombine_by_splitting(&images, |g, h| self.lift_integer(&eval, &[g, h], None));

                return match split {
                    Some(parts) => parts
                        .iter()
                        .flat_map(|p| p.factor_square_free_integer())
                        .collect(),
                    None => vec![self.clone()],
                };
            }
        }
    }

    /// Find a good evaluation point and the factors over `Z` of the univariate image.
    /// Of [N_DIFF_EVALUATIONS] evaluation points, the one with the fewest factors is kept.
    fn choose_images_integer(
        &self,
        lc: &Self,
        rng: &mut impl RngCore,
        fails: &mut usize,
    ) -> (HenselEvaluation<IntegerRing>, Vec<Self>) {
        let mut best: Option<(HenselEvaluation<IntegerRing>, Vec<Self>)> = None;
        let mut found = 0;
        loop {
            // the integers are infinite, so there is no reason to give up
            let Attempt::Found(eval) = sample_evaluation(self, lc, rng, fails) else {
                continue;
            };

            let images = eval
                .evaluate_from(self, 1)
                .make_primitive()
                .factor_reconstruct();
            debug!("Univariate image has {} factors", images.len());

            if images.len() == 1 {
                return (eval, images);
            }

            if best.as_ref().map_or(true, |(_, b)| images.len() < b.len()) {
                best = Some((eval, images));
            }

            found += 1;
            if found >= N_DIFF_EVALUATIONS {
                if let Some(best) = best.take() {
                    return best;
                }
            }
        }
    }

    /// Factor the image of `self` in `x_0` and `x_v` and return the leading coefficients
    /// in `x_0` of its factors, ordered like the univariate `images` they evaluate to.
    fn bivariate_lcoeffs(
        &self,
        eval: &HenselEvaluation<IntegerRing>,
        v: usize,
        images: &[Self],
    ) -> Option<Vec<Self>> {
        let f_v = eval.evaluate_except(self, v);
        let factors = f_v.factor_integer();
        if factors.len() != images.len()
            || factors.iter().any(|(g, e)| *e != 1 || !g.contains(0))
        {
            debug!("Image in variable {} does not factor like the univariate image", v);
            return None;
        }

        let mut lcs = vec![None; images.len()];
        for (g, _) in &factors {
            let u = eval.evaluate(g, v).make_primitive();
            let i = images.iter().position(|w| w.clone().make_primitive() == u)?;
            if lcs[i].is_some() {
                return None;
            }
            lcs[i] = Some(g.univariate_lcoeff(0));
        }

        lcs.into_iter().collect()
    }

    /// Reconstruct the leading coefficients in `x_0` of the factors that evaluate to `images`,
    /// up to a constant, by assigning the irreducible factors `lc_factors` of `lc` with the
    /// factorizations of the images in `x_0` and one other variable.
    fn reconstruct_lcoeffs(
        &self,
        lc: &Self,
        lc_factors: &[(Self, usize)],
        eval: &HenselEvaluation<IntegerRing>,
        images: &[Self],
    ) -> Option<Vec<Self>> {
        let var_lcoeffs: Vec<_> = (1..self.nvars())
            .filter(|&v| lc.contains(v))
            .filter_map(|v| Some((v, self.bivariate_lcoeffs(eval, v, images)?)))
            .collect();

        let exponents = assign_lcoeff_factors(lc_factors, eval, &var_lcoeffs)?;
        Some(lcoeffs_from_exponents(
            &lc.one(),
            lc_factors,
            &exponents,
            images.len(),
        ))
    }

    /// Lift the univariate factors `images` of `f(x_0, b_1, ..., b_n)` to factors of `f`
    /// modulo a prime larger than twice a bound on the coefficients of the factors, and
    /// verify them over the integers.
    ///
    /// With `lcoeffs`, the leading coefficients of the factors are known up to a constant.
    /// With `lc = c Π_j L_j`, `c^(r-1) f` is lifted with leading coefficients `c L_j`.
    /// Otherwise, `L^(r-1) f` is lifted with the leading coefficient `L` of `f` imposed
    /// on every factor.
    fn lift_integer(
        &self,
        eval: &HenselEvaluation<IntegerRing>,
        images: &[Self],
        lcoeffs: Option<&[Self]>,
    ) -> Option<Vec<Self>> {
        let lc = self.univariate_lcoeff(0);

        let predicted = match lcoeffs {
            Some(l) => {
                let product = l.iter().fold(lc.one(), |acc, g| &acc * g);
                let c = lc.divides(&product).filter(|c| c.is_constant())?;
                let c = c.get_constant();
                let lcs: Vec<_> = l.iter().map(|g| g.clone().mul_coeff(c.clone())).collect();
                Some((c, lcs))
            }
            None => None,
        };

        let target = match &predicted {
            Some((c, _)) => self.clone().mul_coeff(c.pow(images.len() as u64 - 1)),
            None => self * &lc.pow(images.len() - 1),
        };

        let degree_sum: u64 = target.degrees().iter().map(|d| d.to_u32() as u64).sum();
        let norm = target
            .coefficients
            .iter()
            .fold(Integer::zero(), |acc, c| &acc + &c.abs());
        let bound = &Integer::new(2).pow(degree_sum) * &norm;

        let lc_image = eval.evaluate_from(&lc, 1).get_constant();
        let u = eval.evaluate_from(self, 1);

        // the prime must keep the leading coefficient and the univariate image square-free
        let mut p = (&(&bound * &Integer::new(2)) + &Integer::one()).next_prime();
        let field = loop {
            let field = ZpLarge::new(p.clone());
            if !(&lc_image % &p).is_zero() {
                let u_p = u.map_coeff(|c| field.to_element(c.clone()), field.clone());
                if u_p.gcd(&u_p.derivative(0)).is_constant() {
                    break field;
                }
            }
            p = p.next_prime();
        };

        let f_p = self.map_coeff(|c| field.to_element(c.clone()), field.clone());
        let images_p: Vec<_> = images
            .iter()
            .map(|g| g.map_coeff(|c| field.to_element(c.clone()), field.clone()))
            .collect();
        let eval_p = eval.map(|c| field.to_element(c.clone()), &field);

        let lifted = match &predicted {
            Some((_, lcs)) => {
                let target_p = target.map_coeff(|c| field.to_element(c.clone()), field.clone());
                let lcs_p: Vec<_> = lcs
                    .iter()
                    .map(|g| g.map_coeff(|c| field.to_element(c.clone()), field.clone()))
                    .collect();

                // scale the images to the leading coefficients of the factors of the target
                let scaled: Vec<_> = images_p
                    .iter()
                    .zip(&lcs_p)
                    .map(|(u, l)| {
                        let l = eval_p.evaluate_from(l, 1).get_constant();
                        let s = field.div(&l, &u.lcoeff());
                        u.clone().mul_coeff(s)
                    })
                    .collect();

                multivariate_lift(&target_p, &scaled, Some(&lcs_p), &eval_p, 1)
            }
            None => multivariate_lift_with_lc(&f_p, &images_p, &eval_p, 1),
        };

        let lifted = match lifted {
            Ok(lifted) => lifted,
            Err(e) => {
                debug!("Lifting modulo {} failed: {}", p, e);
                return None;
            }
        };

        let mut rest = self.clone();
        let mut factors = Vec::with_capacity(lifted.len());
        for g in &lifted {
            let g = g
                .map_coeff(|c| field.to_symmetric_integer(c), Z)
                .primitive_part_in_var(0)
                .normalize();

            let Some(q) = rest.divides(&g) else {
                debug!("Lifted factor {} does not divide over the integers", g);
                return None;
            };
            rest = q;
            factors.push(g);
        }

        if !rest.is_constant() {
            return None;
        }

        Some(factors)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::integer::{Integer, Z};
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::Variable;

    use super::super::evaluation::HenselEvaluation;
    use super::{compress_variables, expand_variables};

    fn vars() -> Arc<Vec<Variable>> {
        Arc::new(vec![
            Variable::from("x"),
            Variable::from("y"),
            Variable::from("z"),
        ])
    }

    #[test]
    fn compress() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let (x, z) = (zero.variable(0), zero.variable(2));
        let f = &(&z.pow(3) * &x) + &x.mul_coeff(Integer::new(2));

        let (c, order) = compress_variables(&f);
        assert_eq!(order, vec![2, 0]);
        assert_eq!(c.nvars(), 2);
        assert_eq!(c.degree(0), 3);
        assert_eq!(expand_variables(&c, &order, &f), f);
    }

    #[test]
    fn bivariate_galois() {
        let field = Zp::new(101);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));

        let a = &x.pow(2) + &y;
        let b = (&x * &y).add_constant(field.to_element(1));
        let f = &a * &b;

        let factors = f.factor_square_free_galois().unwrap();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a));
        assert!(factors.contains(&b));
    }

    #[test]
    fn trivariate_galois() {
        let field = Zp::new(1009);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars());
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
        let c = |n: u32| zero.constant(field.to_element(n));

        let a = &(&(&x.pow(2) * &y) + &(&x * &z)) + &c(5);
        let b = &(&(&x * &(&z + &c(2))) + &y.pow(2)) + &(&y * &z);
        let f = &a * &b;

        let factors = f.factor_square_free_galois().unwrap();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a.make_monic()));
        assert!(factors.contains(&b.make_monic()));
    }

    #[test]
    fn irreducible_galois() {
        let field = Zp::new(13);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars());
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

        // x^2 y + y^2 z + z^2 x is irreducible over any field
        let f = &(&(&x.pow(2) * &y) + &(&y.pow(2) * &z)) + &(&z.pow(2) * &x);
        let factors = f.factor_square_free_galois().unwrap();
        assert_eq!(factors, vec![f]);
    }

    #[test]
    fn bivariate_integer() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));

        let a = (&x.pow(2) + &y.clone().mul_coeff(Integer::new(3))).add_constant(Integer::one());
        let b = (&x * &y).mul_coeff(Integer::new(2)).add_constant(Integer::new(-1));
        let f = &a * &b;

        let factors = f.factor_square_free_integer();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a));
        assert!(factors.contains(&b));
    }

    #[test]
    fn trivariate_integer() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

        let a = (&(&x * &y).mul_coeff(Integer::new(2)) + &z).add_constant(Integer::one());
        let b = (&x.pow(2) + &(&y * &z)).add_constant(Integer::new(-3));
        let f = &a * &b;

        let factors = f.factor_square_free_integer();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a));
        assert!(factors.contains(&b));
    }

    #[test]
    fn reconstructed_leading_coefficients() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

        let a = &(&y * &x.pow(2)) + &z;
        let b = (&(&z * &x) + &y).add_constant(Integer::one());
        let f = &a * &b;

        let eval = HenselEvaluation::new(&Z, vec![Integer::new(2), Integer::new(3)]);
        let images = eval
            .evaluate_from(&f, 1)
            .make_primitive()
            .factor_reconstruct();
        assert_eq!(images.len(), 2);

        let lc = f.univariate_lcoeff(0);
        let lc_factors = lc.factor_integer();
        let lcs = f
            .reconstruct_lcoeffs(&lc, &lc_factors, &eval, &images)
            .unwrap();
        for (u, l) in images.iter().zip(&lcs) {
            if u.degree(0) == 2 {
                assert_eq!(l, &y);
            } else {
                assert_eq!(l, &z);
            }
        }

        let factors = f.lift_integer(&eval, &images, Some(&lcs)).unwrap();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a));
        assert!(factors.contains(&b));

        let factors = f.factor_square_free_integer();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a));
        assert!(factors.contains(&b));
    }

    #[test]
    fn shared_leading_coefficient_factor() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

        // y occurs in the leading coefficient of both factors
        let a = (&(&(&y * &z) * &x.pow(2)) + &z).add_constant(Integer::new(2));
        let b = (&(&y * &x) + &z.pow(2)).add_constant(Integer::one());
        let f = &a * &b;

        let factors = f.factor_square_free_integer();
        assert_eq!(factors.len(), 2);
        assert!(factors.contains(&a));
        assert!(factors.contains(&b));
    }

    #[test]
    fn irreducible_integer() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars());
        let (x, y) = (zero.variable(0), zero.variable(1));

        let f = (&x.pow(2) + &y.pow(2)).add_constant(Integer::one());
        assert_eq!(f.factor_square_free_integer(), vec![f]);
    }
}
