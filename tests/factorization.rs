use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use polyfactor::{
    domains::{
        algebraic_number::AlgebraicExtension,
        finite_field::{FiniteFieldCore, Zp, ZpLarge, Z2},
        integer::{Integer, IntegerRing, Z},
        rational::{Rational, Q},
        Ring,
    },
    poly::{
        factor::{FactorDecomposition, Factorize},
        order::MonomialOrder,
        polynomial::{MultivariatePolynomial, PolynomialRing},
        Variable,
    },
};

fn vars(names: &[&str]) -> Arc<Vec<Variable>> {
    Arc::new(names.iter().map(|n| Variable::from(*n)).collect())
}

/// Check that `expected` and the factors of `d` agree up to order, that the decomposition
/// multiplies out to `f`, and that every factor is irreducible.
fn check<F: Ring, E: polyfactor::poly::Exponent>(
    f: &MultivariatePolynomial<F, E>,
    d: &FactorDecomposition<MultivariatePolynomial<F, E>>,
    expected: &[(MultivariatePolynomial<F, E>, usize)],
) where
    MultivariatePolynomial<F, E>: Factorize,
{
    assert_eq!(d.factors.len(), expected.len(), "{}", d);
    for e in expected {
        assert!(d.factors.contains(e), "{} is not a factor in {}", e.0, d);
    }
    assert_eq!(&d.expand(), f);

    for (g, _) in &d.factors {
        let r = g.factor();
        assert_eq!(r.factors, vec![(g.clone(), 1)]);
    }
}

#[test]
fn difference_of_squares_rational() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Q, None, vars(&["x", "y"]));
    let (x, y) = (zero.variable(0), zero.variable(1));

    let f = &x.pow(2) - &y.pow(2);
    let d = f.factor();
    check::<Q, u16>(&f, &d, &[(&x - &y, 1), (&x + &y, 1)]);
    assert!(d.unit.is_one());
}

#[test]
fn square_in_characteristic_two() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z2, None, vars(&["x", "y"]));
    let (x, y) = (zero.variable(0), zero.variable(1));

    let f = &x.pow(2) + &y.pow(2);
    let d = f.factor();
    check::<Z2, u16>(&f, &d, &[(&x + &y, 2)]);
    assert!(d.unit.is_one());
}

#[test]
fn constant() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["x", "y"]));
    let f = zero.constant(Integer::new(-12));

    let d = f.factor();
    assert!(d.factors.is_empty());
    assert_eq!(d.unit, f);
    assert!(!f.is_irreducible());
}

#[test]
#[should_panic]
fn zero_polynomial() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["x"]));
    zero.factor();
}

#[test]
fn univariate_integer() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["x"]));
    let x = zero.variable(0);

    let a = x.pow(2).add_constant(Integer::one());
    let b = x.clone().add_constant(Integer::new(-3));
    let c = &x.pow(4) - &zero.constant(Integer::new(2));
    let f = (&(&a * &b.pow(2)) * &c).mul_coeff(Integer::new(-6));

    let d = f.factor();
    check::<Z, u16>(&f, &d, &[(a, 1), (b, 2), (c, 1)]);
    assert_eq!(d.unit, zero.constant(Integer::new(-6)));
}

#[test]
fn multivariate_integer() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["x", "y", "z"]));
    let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

    let a = (&(&x * &y.pow(2)) + &z.clone().mul_coeff(Integer::new(3))).add_constant(Integer::new(-1));
    let b = (&x.pow(2) - &(&y * &z)).add_constant(Integer::new(2));
    let c = &(&x + &y) + &z;
    let f = &(&a * &b.pow(2)) * &c;

    let d = f.factor();
    check::<Z, u16>(&f, &d, &[(a, 1), (b, 2), (c, 1)]);
}

#[test]
fn factoring_leaves_input_unchanged() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["x", "y", "z"]));
    let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

    let a = (&(&x * &y) + &z).add_constant(Integer::new(4));
    let b = &(&x.pow(2) - &y) + &z.pow(3);
    let f = (&a.pow(2) * &b).mul_coeff(Integer::new(-2));

    let copy = f.clone();
    let variables = f.variables.clone();

    let d = f.factor();
    check::<Z, u16>(&f, &d, &[(a, 2), (b, 1)]);
    f.square_free_factorization();
    assert!(!f.is_irreducible());

    assert_eq!(f, copy);
    assert!(Arc::ptr_eq(&f.variables, &variables));
    assert_eq!(*f.variables, *vars(&["x", "y", "z"]));
    for (g, _) in &d.factors {
        assert_eq!(*g.variables, *variables);
    }
}

/// A random polynomial with a term `c x^k`, `k > 0`, and `nterms` further terms of
/// degree at most `max_degree` in every variable.
fn random_factor(
    rng: &mut StdRng,
    zero: &MultivariatePolynomial<IntegerRing, u16>,
    nterms: usize,
    max_degree: u16,
) -> MultivariatePolynomial<IntegerRing, u16> {
    let mut e = vec![0; zero.nvars()];
    e[0] = rng.gen_range(1..=2);
    let mut f = zero.monomial(Integer::new(rng.gen_range(1..=3)), e);

    for _ in 0..nterms {
        let e = (0..zero.nvars())
            .map(|_| rng.gen_range(0..=max_degree))
            .collect();
        f = &f + &zero.monomial(Integer::new(rng.gen_range(-5..=5)), e);
    }
    f
}

#[test]
fn random_products() {
    let mut rng = StdRng::seed_from_u64(31);
    let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["x", "y", "z"]));

    for _ in 0..8 {
        let nfactors = rng.gen_range(2..=3);
        let mut f = zero.one();
        for _ in 0..nfactors {
            let g = random_factor(&mut rng, &zero, 3, 2);
            if !g.is_constant() {
                f = &f * &g;
            }
        }

        let d = f.factor();
        assert_eq!(d.expand(), f, "{}", d);
        for (g, _) in &d.factors {
            assert!(!g.is_constant());
            let r = g.factor();
            assert_eq!(r.factors, vec![(g.clone(), 1)], "{} is reducible", g);
        }
    }
}

#[test]
fn irreducible_integer() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["x", "y", "z"]));
    let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

    let f = &(&(&x.pow(2) * &y) + &(&y.pow(2) * &z)) + &(&z.pow(2) * &x);
    assert!(f.is_irreducible());
}

#[test]
fn multivariate_prime_field() {
    let field = Zp::new(17);
    let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars(&["x", "y", "z"]));
    let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
    let c = |n: u32| zero.constant(field.to_element(n));

    let a = &(&x.pow(2) + &(&y * &z)) + &c(1);
    let b = &(&(&x * &y) + &z.pow(2)) + &c(3);
    let f = (&a * &b).mul_coeff(field.to_element(5));

    let d = f.factor();
    check::<Zp, u16>(&f, &d, &[(a, 1), (b, 1)]);
    assert_eq!(d.unit, c(5));
}

#[test]
fn large_prime_field() {
    let field = ZpLarge::new(Integer::from(2305843009213693951u64));
    let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars(&["x", "y"]));
    let (x, y) = (zero.variable(0), zero.variable(1));

    let a = (&x.pow(3) + &y).add_constant(field.to_element(Integer::one()));
    let b = &(&x * &y) - &y.pow(2);
    let f = &a * &b.pow(2);

    let d = f.factor();
    check::<ZpLarge, u16>(&f, &d, &[(a, 1), (x.clone() - y.clone(), 2), (y.clone(), 2)]);
}

#[test]
fn small_field_uses_extension() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Z2, None, vars(&["x", "y", "z"]));
    let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));

    let a = (&(&x.pow(2) * &y) + &(&z.pow(2) * &x)).add_constant(Z2.one());
    let b = &(&x.pow(2) + &(&y.pow(2) * &z)) + &y;
    let f = &a * &b;

    let d = f.factor();
    check::<Z2, u16>(&f, &d, &[(a, 1), (b, 1)]);
}

#[test]
fn small_galois_field_uses_larger_extension() {
    let field = AlgebraicExtension::galois_field(Z2, 2, Variable::Temporary(0));
    let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars(&["x", "y", "z"]));
    let (x, y, z) = (zero.variable(0), zero.variable(1), zero.variable(2));
    let g = zero.constant(field.generator());

    let a = (&(&x.pow(2) * &y) + &(&(&g * &z.pow(2)) * &x)).add_constant(field.one());
    let b = &(&x.pow(2) + &(&(&g * &g) * &(&y.pow(2) * &z))) + &y;
    let f = &a * &b;

    let d = f.factor();
    check::<AlgebraicExtension<Z2>, u16>(&f, &d, &[(a, 1), (b, 1)]);
}

#[test]
fn galois_field() {
    let field = AlgebraicExtension::galois_field(Z2, 2, Variable::Temporary(0));
    let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars(&["x"]));
    let x = zero.variable(0);

    // x^2 + x + 1 is the minimal polynomial of the generators of GF(4)
    let f = (&x.pow(2) + &x).add_constant(field.one());
    let d = f.factor();
    assert_eq!(d.factors.len(), 2);
    assert_eq!(d.expand(), f);
}

#[test]
fn graded_order() {
    let zero = MultivariatePolynomial::<_, u16>::new_with_order(
        &Q,
        None,
        vars(&["x", "y"]),
        MonomialOrder::Grevlex,
    );
    let (x, y) = (zero.variable(0), zero.variable(1));

    let a = &x.pow(2) - &y.clone().mul_coeff(Rational::from(3i64));
    let b = (&x * &y).add_constant(Rational::from((1i64, 2i64)));
    let f = &a * &b;

    let d = f.factor();
    assert_eq!(d.factors.len(), 2);
    assert_eq!(d.expand(), f);
    for (g, _) in &d.factors {
        assert_eq!(g.order, MonomialOrder::Grevlex);
    }
}

#[test]
fn nested_polynomial_ring() {
    let inner = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(&["y"]));
    let ring = PolynomialRing::new_from_poly(&inner);
    let zero = MultivariatePolynomial::<_, u16>::new(&ring, None, vars(&["x"]));
    let x = zero.variable(0);
    let y = zero.constant(inner.variable(0));

    let f = &x.pow(2) - &y.pow(2);
    let d = f.factor();
    check::<PolynomialRing<Z, u16>, u16>(&f, &d, &[(&x - &y, 1), (&x + &y, 1)]);

    // factors without x are part of the unit
    let g = &(&y * &zero.constant(inner.constant(Integer::new(2)))) * &(&x + &zero.one());
    let d = g.factor();
    assert_eq!(d.factors, vec![(&x + &zero.one(), 1)]);
    assert_eq!(d.unit, zero.constant(inner.variable(0).mul_coeff(Integer::new(2))));
}

#[test]
fn square_free_decomposition() {
    let zero = MultivariatePolynomial::<_, u16>::new(&Q, None, vars(&["x", "y"]));
    let (x, y) = (zero.variable(0), zero.variable(1));

    // (x^2 - y^2)^2 is square-free decomposed without splitting x^2 - y^2
    let a = &x.pow(2) - &y.pow(2);
    let f = a.pow(2).mul_coeff(Rational::from((2i64, 3i64)));

    let d = f.square_free_factorization();
    assert_eq!(d.factors, vec![(a, 2)]);
    assert_eq!(d.unit, zero.constant(Rational::from((2i64, 3i64))));
}
