//! Exact multivariate polynomial factorization.
//!
//! Polynomials are stored sparsely with a configurable monomial order and can be
//! factored over finite fields (including Galois extensions), the integers and
//! the rationals.
//!
//! For example:
//!
//! ```
//! use std::sync::Arc;
//! use polyfactor::{
//!     domains::rational::Q,
//!     poly::{factor::Factorize, polynomial::MultivariatePolynomial, Variable},
//! };
//!
//! let vars = Arc::new(vec![Variable::from("x"), Variable::from("y")]);
//! let zero = MultivariatePolynomial::<_, u16>::new(&Q, None, vars);
//! let (x, y) = (zero.variable(0), zero.variable(1));
//!
//! let f = &(&x * &x) - &(&y * &y);
//! let factors = f.factor();
//! assert_eq!(factors.factors.len(), 2);
//! assert_eq!(factors.expand(), f);
//! ```

pub mod combinatorics;
pub mod domains;
pub mod poly;
