use std::cmp::Ordering;
use std::fmt::Display;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::domains::integer::Integer;
use crate::domains::{EuclideanDomain, Field, Ring};

use super::order::MonomialOrder;
use super::{Exponent, Variable, INLINED_EXPONENTS};

/// The ring of multivariate polynomials over `R` in a fixed list of variables.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct PolynomialRing<R: Ring, E: Exponent> {
    ring: R,
    variables: Arc<Vec<Variable>>,
    order: MonomialOrder,
    _phantom_exp: PhantomData<E>,
}

impl<R: Ring, E: Exponent> PolynomialRing<R, E> {
    pub fn new(coeff_ring: R, var_map: Arc<Vec<Variable>>) -> PolynomialRing<R, E> {
        PolynomialRing {
            ring: coeff_ring,
            variables: var_map,
            order: MonomialOrder::Lex,
            _phantom_exp: PhantomData,
        }
    }

    pub fn new_from_poly(poly: &MultivariatePolynomial<R, E>) -> PolynomialRing<R, E> {
        PolynomialRing {
            ring: poly.ring.clone(),
            variables: poly.variables.clone(),
            order: poly.order.clone(),
            _phantom_exp: PhantomData,
        }
    }

    /// The coefficient ring.
    pub fn coefficient_ring(&self) -> &R {
        &self.ring
    }

    pub fn get_vars_ref(&self) -> &[Variable] {
        &self.variables
    }
}

impl<R: Ring, E: Exponent> std::fmt::Display for PolynomialRing<R, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.ring)?;
        for (i, v) in self.variables.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str("]")
    }
}

impl<R: Ring, E: Exponent> Ring for PolynomialRing<R, E> {
    type Element = MultivariatePolynomial<R, E>;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a + b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a - b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a * b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = &*a + &(b * c);
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = &*a - &(b * c);
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.clone().neg()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        MultivariatePolynomial::new_with_order(
            &self.ring,
            None,
            self.variables.clone(),
            self.order.clone(),
        )
    }

    #[inline]
    fn one(&self) -> Self::Element {
        self.zero().one()
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        self.zero().constant(self.ring.nth(n))
    }

    #[inline]
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e as usize)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn one_is_gcd_unit() -> bool {
        false
    }

    fn is_field(&self) -> bool {
        false
    }

    fn characteristic(&self) -> Integer {
        self.ring.characteristic()
    }

    fn size(&self) -> Integer {
        Integer::zero()
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            None
        } else {
            a.divides(b)
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        self.zero().constant(self.ring.sample(rng, range))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        if in_product && element.nterms() > 1 {
            write!(f, "({})", element)
        } else {
            write!(f, "{}", element)
        }
    }
}

impl<R: EuclideanDomain, E: Exponent> EuclideanDomain for PolynomialRing<R, E> {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.remainder(&[b.clone()])
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        let (mut q, r) = a.divide_and_remainder(&[b.clone()]);
        (q.swap_remove(0), r)
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.gcd(b)
    }

    fn normalization_unit(&self, a: &Self::Element) -> Self::Element {
        if a.is_zero() {
            return a.one();
        }
        a.constant(self.ring.normalization_unit(&a.lcoeff()))
    }
}

/// Multivariate polynomial with a sparse degree and variable dense representation.
#[derive(Clone)]
pub struct MultivariatePolynomial<F: Ring, E: Exponent = u16> {
    // Data format: the i-th monomial is stored as coefficients[i] and
    // exponents[i * nvars .. (i + 1) * nvars]. Terms are always expanded and sorted
    // ascending in `order`.
    pub coefficients: Vec<F::Element>,
    pub exponents: Vec<E>,
    pub ring: F,
    pub variables: Arc<Vec<Variable>>,
    pub order: MonomialOrder,
}

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E> {
    /// Constructs a zero polynomial in lexicographic order. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, so that the
    /// variable map and ring are inherited.
    #[inline]
    pub fn new(ring: &F, cap: Option<usize>, variables: Arc<Vec<Variable>>) -> Self {
        Self::new_with_order(ring, cap, variables, MonomialOrder::Lex)
    }

    /// Constructs a zero polynomial with terms sorted in `order`.
    #[inline]
    pub fn new_with_order(
        ring: &F,
        cap: Option<usize>,
        variables: Arc<Vec<Variable>>,
        order: MonomialOrder,
    ) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap.unwrap_or(0)),
            exponents: Vec::with_capacity(cap.unwrap_or(0) * variables.len()),
            ring: ring.clone(),
            variables,
            order,
        }
    }

    /// Constructs a zero polynomial, inheriting the ring and variable map from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        self.zero_with_capacity(0)
    }

    /// Constructs a zero polynomial with the given capacity,
    /// inheriting the ring and variable map from `self`.
    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * self.nvars()),
            ring: self.ring.clone(),
            variables: self.variables.clone(),
            order: self.order.clone(),
        }
    }

    /// Constructs a constant polynomial,
    /// inheriting the ring and variable map from `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        let mut res = self.zero_with_capacity(1);
        res.coefficients.push(coeff);
        res.exponents.resize(self.nvars(), E::zero());
        res
    }

    /// Constructs a polynomial that is one, inheriting the ring and variable map from `self`.
    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.ring.one())
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: F::Element, exponents: Vec<E>) -> Self {
        debug_assert!(self.nvars() == exponents.len());

        if F::is_zero(&coeff) {
            return self.zero();
        }

        let mut res = self.zero();
        res.coefficients.push(coeff);
        res.exponents = exponents;
        res
    }

    /// Constructs the polynomial `x_var`.
    pub fn variable(&self, var: usize) -> Self {
        assert!(var < self.nvars(), "Variable {} out of bounds", var);
        let mut e = vec![E::zero(); self.nvars()];
        e[var] = E::one();
        self.monomial(self.ring.one(), e)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.nterms() == 1
            && self.ring.is_one(&self.coefficients[0])
            && self.exponents.iter().all(|x| x.is_zero())
    }

    /// Returns the number of terms in the polynomial.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the number of variables in the polynomial.
    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if the polynomial is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        match self.nterms() {
            0 => true,
            1 => self.exponents.iter().all(|e| e.is_zero()),
            _ => false,
        }
    }

    /// Get the constant term of the polynomial.
    pub fn get_constant(&self) -> F::Element {
        for (c, e) in self.coefficients.iter().zip(self.exponents_iter()) {
            if e.iter().all(|x| x.is_zero()) {
                return c.clone();
            }
        }
        self.ring.zero()
    }

    /// Returns the slice for the exponents of the specified monomial.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[E] {
        &self.exponents[index * self.nvars()..(index + 1) * self.nvars()]
    }

    #[inline]
    pub fn last_exponents(&self) -> &[E] {
        assert!(self.nterms() > 0, "Zero polynomial has no leading monomial");
        &self.exponents[(self.nterms() - 1) * self.nvars()..self.nterms() * self.nvars()]
    }

    /// Returns an iterator over the exponents of every monomial.
    #[inline]
    pub fn exponents_iter(&self) -> ExponentIter<E> {
        ExponentIter {
            exponents: &self.exponents,
            nvars: self.nvars(),
            remaining: self.nterms(),
        }
    }

    /// Get a reference to the variables list.
    pub fn get_vars_ref(&self) -> &[Variable] {
        self.variables.as_ref()
    }

    /// Check if the polynomial is sorted and has only non-zero coefficients
    pub fn check_consistency(&self) {
        assert_eq!(self.exponents.len(), self.nterms() * self.nvars());

        for c in &self.coefficients {
            if F::is_zero(c) {
                panic!("Inconsistent polynomial (0 coefficient): {}", self);
            }
        }

        for t in 1..self.nterms() {
            match self.order.cmp(self.exponents(t), self.exponents(t - 1)) {
                Ordering::Equal => panic!("Inconsistent polynomial (equal monomials): {}", self),
                Ordering::Less => panic!(
                    "Inconsistent polynomial (wrong monomial ordering): {}",
                    self
                ),
                Ordering::Greater => {}
            }
        }
    }

    /// Append a monomial to the back. It merges with the last monomial if the
    /// exponents are equal.
    #[inline]
    pub fn append_monomial_back(&mut self, coefficient: F::Element, exponents: &[E]) {
        if F::is_zero(&coefficient) {
            return;
        }

        let nterms = self.nterms();
        if nterms > 0 && exponents == self.last_exponents() {
            self.ring
                .add_assign(&mut self.coefficients[nterms - 1], &coefficient);

            if F::is_zero(&self.coefficients[nterms - 1]) {
                self.coefficients.pop();
                self.exponents.truncate((nterms - 1) * self.nvars());
            }
        } else {
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
        }
    }

    /// Appends a monomial to the polynomial.
    pub fn append_monomial(&mut self, coefficient: F::Element, exponents: &[E]) {
        if F::is_zero(&coefficient) {
            return;
        }
        if self.nvars() != exponents.len() {
            panic!(
                "nvars mismatched: got {}, expected {}",
                exponents.len(),
                self.nvars()
            );
        }

        if self.nterms() == 0 || self.order.cmp(self.last_exponents(), exponents).is_lt() {
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
            return;
        }

        // binary search for the insertion point
        let (mut l, mut r) = (0, self.nterms());
        while l < r {
            let m = (l + r) / 2;
            match self.order.cmp(exponents, self.exponents(m)) {
                Ordering::Equal => {
                    self.ring.add_assign(&mut self.coefficients[m], &coefficient);
                    if F::is_zero(&self.coefficients[m]) {
                        self.coefficients.remove(m);
                        let i = m * self.nvars();
                        self.exponents.drain(i..i + self.nvars());
                    }
                    return;
                }
                Ordering::Greater => l = m + 1,
                Ordering::Less => r = m,
            }
        }

        self.coefficients.insert(l, coefficient);
        let i = l * self.nvars();
        self.exponents.splice(i..i, exponents.iter().cloned());
    }

    /// Build a polynomial from terms in arbitrary order. Equal monomials are merged.
    pub fn from_unsorted_terms(&self, mut coefficients: Vec<F::Element>, exponents: Vec<E>) -> Self {
        let nvars = self.nvars();
        debug_assert_eq!(coefficients.len() * nvars, exponents.len());

        let mut indices: Vec<usize> = (0..coefficients.len()).collect();
        indices.sort_unstable_by(|&a, &b| {
            self.order.cmp(
                &exponents[a * nvars..(a + 1) * nvars],
                &exponents[b * nvars..(b + 1) * nvars],
            )
        });

        let mut res = self.zero_with_capacity(coefficients.len());
        for i in indices {
            let c = mem::replace(&mut coefficients[i], self.ring.zero());
            res.append_monomial_back(c, &exponents[i * nvars..(i + 1) * nvars]);
        }
        res
    }

    /// Sort the terms in a new monomial order.
    pub fn with_order(&self, order: MonomialOrder) -> Self {
        if self.order == order {
            return self.clone();
        }

        let mut res = self.zero();
        res.order = order;
        res.from_unsorted_terms(self.coefficients.clone(), self.exponents.clone())
    }

    /// Take the derivative of the polynomial w.r.t the variable `var`.
    pub fn derivative(&self, var: usize) -> Self {
        debug_assert!(var < self.nvars());

        let mut coefficients = Vec::with_capacity(self.nterms());
        let mut exponents = Vec::with_capacity(self.exponents.len());
        for x in self {
            if x.exponents[var] > E::zero() {
                let pow = x.exponents[var].to_u32();
                let c = self.ring.mul(x.coefficient, &self.ring.nth(&pow.into()));
                if !F::is_zero(&c) {
                    coefficients.push(c);
                    let start = exponents.len();
                    exponents.extend_from_slice(x.exponents);
                    exponents[start + var] = x.exponents[var] - E::one();
                }
            }
        }

        self.from_unsorted_terms(coefficients, exponents)
    }

    /// Multiply every coefficient with `other`.
    pub fn mul_coeff(mut self, other: F::Element) -> Self {
        for c in &mut self.coefficients {
            self.ring.mul_assign(c, &other);
        }

        if self.coefficients.iter().any(F::is_zero) {
            let nvars = self.nvars();
            let mut i = 0;
            while i < self.coefficients.len() {
                if F::is_zero(&self.coefficients[i]) {
                    self.coefficients.remove(i);
                    self.exponents.drain(i * nvars..(i + 1) * nvars);
                } else {
                    i += 1;
                }
            }
        }

        self
    }

    /// Map a coefficient using the function `f`.
    pub fn map_coeff<U: Ring, T: Fn(&F::Element) -> U::Element>(
        &self,
        f: T,
        ring: U,
    ) -> MultivariatePolynomial<U, E> {
        let mut coefficients = Vec::with_capacity(self.coefficients.len());
        let mut exponents = Vec::with_capacity(self.exponents.len());

        for m in self.into_iter() {
            let nc = f(m.coefficient);
            if !U::is_zero(&nc) {
                coefficients.push(nc);
                exponents.extend_from_slice(m.exponents);
            }
        }

        MultivariatePolynomial {
            coefficients,
            exponents,
            ring,
            variables: self.variables.clone(),
            order: self.order.clone(),
        }
    }

    /// Add `exponents` to every exponent.
    pub fn mul_exp(mut self, exponents: &[E]) -> Self {
        debug_assert_eq!(self.nvars(), exponents.len());

        if self.nvars() == 0 {
            return self;
        }

        let nvars = self.nvars();
        for e in self.exponents.chunks_mut(nvars) {
            for (e1, e2) in e.iter_mut().zip(exponents) {
                *e1 = e1
                    .checked_add(e2)
                    .unwrap_or_else(|| panic!("Exponent overflow in {} + {}", e1, e2));
            }
        }

        self
    }

    #[inline]
    pub fn mul_monomial(self, coefficient: &F::Element, exponents: &[E]) -> Self {
        self.mul_coeff(coefficient.clone()).mul_exp(exponents)
    }

    /// Add a constant term.
    pub fn add_constant(mut self, other: F::Element) -> Self {
        let nvars = self.nvars();
        self.append_monomial(other, &vec![E::zero(); nvars]);
        self
    }

    /// Get the degree of the variable `x`.
    /// This operation is O(n).
    pub fn degree(&self, x: usize) -> E {
        if self.nvars() == 0 {
            return E::zero();
        }

        let mut max = E::zero();
        for e in self.exponents.iter().skip(x).step_by(self.nvars()) {
            if max < *e {
                max = *e;
            }
        }
        max
    }

    /// Get the degree of every variable.
    pub fn degrees(&self) -> Vec<E> {
        let mut max = vec![E::zero(); self.nvars()];
        for e in self.exponents_iter() {
            for (m, x) in max.iter_mut().zip(e) {
                if *m < *x {
                    *m = *x;
                }
            }
        }
        max
    }

    /// Get the maximal total degree of the terms.
    pub fn total_degree(&self) -> u32 {
        self.exponents_iter()
            .map(|e| e.iter().map(|x| x.to_u32()).sum())
            .max()
            .unwrap_or(0)
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> F::Element {
        match self.coefficients.last() {
            Some(c) => c.clone(),
            None => self.ring.zero(),
        }
    }

    /// Returns the first variable that occurs in the polynomial.
    pub fn first_occurring_var(&self) -> Option<usize> {
        let nvars = self.nvars();
        self.exponents
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_zero())
            .map(|(i, _)| i % nvars)
            .min()
    }

    /// Returns `true` if the variable `var` occurs in the polynomial.
    pub fn contains(&self, var: usize) -> bool {
        self.exponents_iter().any(|e| !e[var].is_zero())
    }

    /// Get the coefficient of `x_var^k` as a polynomial in the other variables.
    pub fn coefficient_of_power(&self, var: usize, k: E) -> Self {
        let mut res = self.zero();
        let mut e: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];
        for t in self {
            if t.exponents[var] == k {
                e.copy_from_slice(t.exponents);
                e[var] = E::zero();
                res.append_monomial_back(t.coefficient.clone(), &e);
            }
        }
        res
    }

    /// Get the leading coefficient of the polynomial viewed as a
    /// univariate polynomial in `var`.
    pub fn univariate_lcoeff(&self, var: usize) -> Self {
        self.coefficient_of_power(var, self.degree(var))
    }

    /// Change the order of the variables: variable `i` of the result is variable `perm[i]` of `self`.
    pub fn rearrange(&self, perm: &[usize]) -> Self {
        assert_eq!(perm.len(), self.nvars());

        let mut exponents = Vec::with_capacity(self.exponents.len());
        for e in self.exponents_iter() {
            exponents.extend(perm.iter().map(|&i| e[i]));
        }

        let variables: Vec<_> = perm.iter().map(|&i| self.variables[i].clone()).collect();
        let mut res = self.zero();
        res.variables = Arc::new(variables);
        res.from_unsorted_terms(self.coefficients.clone(), exponents)
    }

    /// Compute `self^pow`.
    pub fn pow(&self, mut pow: usize) -> Self {
        if pow == 0 {
            return self.one();
        }

        if self.is_constant() {
            return self.constant(self.ring.pow(&self.lcoeff(), pow as u64));
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Replace the variable `var` by the element `v`. The variable is kept with exponent zero.
    pub fn replace(&self, var: usize, v: &F::Element) -> Self {
        let d = self.degree(var).to_u32() as usize;
        if d == 0 {
            return self.clone();
        }

        let mut powers = Vec::with_capacity(d + 1);
        powers.push(self.ring.one());
        for i in 0..d {
            powers.push(self.ring.mul(&powers[i], v));
        }

        let mut coefficients = Vec::with_capacity(self.nterms());
        let mut exponents = Vec::with_capacity(self.exponents.len());
        for t in self {
            let c = self
                .ring
                .mul(t.coefficient, &powers[t.exponents[var].to_u32() as usize]);
            if !F::is_zero(&c) {
                coefficients.push(c);
                let start = exponents.len();
                exponents.extend_from_slice(t.exponents);
                exponents[start + var] = E::zero();
            }
        }

        self.from_unsorted_terms(coefficients, exponents)
    }

    /// Evaluate the polynomial at the point `r`.
    pub fn replace_all(&self, r: &[F::Element]) -> F::Element {
        debug_assert_eq!(r.len(), self.nvars());

        let mut res = self.ring.zero();
        for t in self {
            let mut c = t.coefficient.clone();
            for (v, e) in r.iter().zip(t.exponents) {
                if !e.is_zero() {
                    self.ring
                        .mul_assign(&mut c, &self.ring.pow(v, e.to_u32() as u64));
                }
            }
            self.ring.add_assign(&mut res, &c);
        }

        res
    }

    /// Create a univariate polynomial coefficient list out of a multivariate polynomial.
    /// The output is sorted in the degree and only contains non-zero coefficients.
    pub fn to_univariate_polynomial_list(&self, x: usize) -> Vec<(Self, E)> {
        if self.is_zero() {
            return vec![];
        }

        let d = self.degree(x).to_u32() as usize;
        let mut buckets = vec![self.zero(); d + 1];
        let mut e: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); self.nvars()];
        for t in self {
            e.copy_from_slice(t.exponents);
            e[x] = E::zero();
            buckets[t.exponents[x].to_u32() as usize]
                .append_monomial_back(t.coefficient.clone(), &e);
        }

        buckets
            .into_iter()
            .enumerate()
            .filter(|(_, p)| !p.is_zero())
            .map(|(i, p)| (p, E::from_u32(i as u32)))
            .collect()
    }

    /// Shift a variable `var` to `var+shift`.
    pub fn shift_var(&self, var: usize, shift: &F::Element) -> Self {
        let d = self.degree(var).to_u32() as usize;
        if d == 0 || F::is_zero(shift) {
            return self.clone();
        }

        let mut v = vec![self.zero(); d + 1];
        for (x_poly, p) in self.to_univariate_polynomial_list(var) {
            v[p.to_u32() as usize] = x_poly;
        }

        for k in 0..d {
            for j in (k..d).rev() {
                v[j] = &v[j] + &v[j + 1].clone().mul_coeff(shift.clone());
            }
        }

        let mut e = vec![E::zero(); self.nvars()];
        let mut poly = self.zero();
        for (i, p) in v.into_iter().enumerate() {
            e[var] = E::from_u32(i as u32);
            poly = poly + p.mul_exp(&e);
        }

        poly
    }

    /// Get the dense coefficient list of a polynomial that is univariate in `var`.
    pub fn to_dense_univariate(&self, var: usize) -> Vec<F::Element> {
        if self.is_zero() {
            return vec![];
        }

        let mut c = vec![self.ring.zero(); self.degree(var).to_u32() as usize + 1];
        for t in self {
            debug_assert!(t
                .exponents
                .iter()
                .enumerate()
                .all(|(i, e)| i == var || e.is_zero()));
            c[t.exponents[var].to_u32() as usize] = t.coefficient.clone();
        }
        c
    }

    /// Create a polynomial in `var` from dense coefficients, inheriting the ring and variables from `self`.
    pub fn from_dense_univariate(&self, var: usize, coeffs: &[F::Element]) -> Self {
        let mut coefficients = Vec::with_capacity(coeffs.len());
        let mut exponents = Vec::with_capacity(coeffs.len() * self.nvars());
        for (i, c) in coeffs.iter().enumerate() {
            if !F::is_zero(c) {
                coefficients.push(c.clone());
                let start = exponents.len();
                exponents.resize(start + self.nvars(), E::zero());
                exponents[start + var] = E::from_u32(i as u32);
            }
        }
        self.from_unsorted_terms(coefficients, exponents)
    }

    /// Exact division by `div`, where the coefficients are divided with [Ring::try_div].
    /// Returns `None` if `div` does not divide `self`.
    pub fn divides(&self, div: &Self) -> Option<Self> {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return Some(self.clone());
        }

        if div.is_constant() {
            let c = div.lcoeff();
            let mut q = self.zero_with_capacity(self.nterms());
            for t in self {
                q.coefficients.push(self.ring.try_div(t.coefficient, &c)?);
                q.exponents.extend_from_slice(t.exponents);
            }
            return Some(q);
        }

        if (0..self.nvars()).any(|v| self.degree(v) < div.degree(v)) {
            return None;
        }

        debug_assert!(self.order.is_admissible());

        let div_lc = div.lcoeff();
        let div_le = div.last_exponents().to_vec();
        let mut r = self.clone();
        let mut q_coeffs = vec![];
        let mut q_exps = vec![];
        let mut e = vec![E::zero(); self.nvars()];
        while !r.is_zero() {
            for ((ee, a), b) in e.iter_mut().zip(r.last_exponents()).zip(&div_le) {
                *ee = a.checked_sub(b)?;
            }
            let c = self.ring.try_div(&r.lcoeff(), &div_lc)?;

            r = r - div.clone().mul_monomial(&c, &e);
            q_coeffs.push(c);
            q_exps.extend_from_slice(&e);
        }

        Some(self.from_unsorted_terms(q_coeffs, q_exps))
    }
}

impl<F: EuclideanDomain, E: Exponent> MultivariatePolynomial<F, E> {
    /// Get the content from the coefficients.
    pub fn content(&self) -> F::Element {
        if self.coefficients.is_empty() {
            return self.ring.zero();
        }
        let mut c = self.coefficients[0].clone();
        for cc in self.coefficients.iter().skip(1) {
            // early return if possible (not possible for rationals)
            if F::one_is_gcd_unit() && self.ring.is_one(&c) {
                break;
            }

            c = self.ring.gcd(&c, cc);
        }
        c
    }

    /// Divide every coefficient by `other`. The division must be exact.
    pub fn div_coeff(mut self, other: &F::Element) -> Self {
        for c in &mut self.coefficients {
            let (quot, rem) = self.ring.quot_rem(c, other);
            debug_assert!(F::is_zero(&rem));
            *c = quot;
        }
        self
    }

    /// Make the polynomial primitive by removing the content. The leading
    /// coefficient is normalized with [EuclideanDomain::normalization_unit].
    pub fn make_primitive(self) -> Self {
        if self.is_zero() {
            return self;
        }

        let c = self.content();
        let p = self.div_coeff(&c);
        let u = p.ring.normalization_unit(&p.lcoeff());
        if p.ring.is_one(&u) {
            p
        } else {
            p.mul_coeff(u)
        }
    }
}

impl<F: Field, E: Exponent> MultivariatePolynomial<F, E> {
    /// Make the polynomial monic, i.e., make the leading coefficient `1` by
    /// multiplying all monomials with `1/lcoeff`.
    pub fn make_monic(self) -> Self {
        if self.is_zero() || self.ring.is_one(&self.lcoeff()) {
            self
        } else {
            let ci = self.ring.inv(&self.lcoeff());
            self.mul_coeff(ci)
        }
    }

    /// Division with remainder of polynomials that are univariate in the same variable.
    pub fn quot_rem_univariate(&self, div: &Self) -> (Self, Self) {
        if div.is_zero() {
            panic!("Cannot divide by 0 polynomial");
        }

        if self.is_zero() {
            return (self.clone(), self.clone());
        }

        let var = div
            .first_occurring_var()
            .or_else(|| self.first_occurring_var())
            .unwrap_or(0);

        let mut r = self.to_dense_univariate(var);
        let b = div.to_dense_univariate(var);
        if r.len() < b.len() {
            return (self.zero(), self.clone());
        }

        let inv = self.ring.inv(&b[b.len() - 1]);
        let mut q = vec![self.ring.zero(); r.len() - b.len() + 1];
        for i in (0..q.len()).rev() {
            let c = self.ring.mul(&r[i + b.len() - 1], &inv);
            if F::is_zero(&c) {
                continue;
            }

            for (j, bj) in b.iter().enumerate() {
                self.ring.sub_mul_assign(&mut r[i + j], &c, bj);
            }
            q[i] = c;
        }
        r.truncate(b.len() - 1);

        (
            self.from_dense_univariate(var, &q),
            self.from_dense_univariate(var, &r),
        )
    }

    /// Compute `self^n % m` where `m` is a univariate polynomial.
    pub fn exp_mod_univariate(&self, n: &Integer, m: &Self) -> Self {
        if n.is_zero() {
            return self.one();
        }

        let two = Integer::new(2);
        let mut n = n.clone();
        let mut x = self.quot_rem_univariate(m).1;
        let mut y = self.one();
        while !n.is_one() {
            if (&n % &two).is_one() {
                y = (&y * &x).quot_rem_univariate(m).1;
                n -= &Integer::one();
            }

            x = (&x * &x).quot_rem_univariate(m).1;
            n = &n / &two;
        }

        (x * &y).quot_rem_univariate(m).1
    }

    /// Compute `(g, s, t)` where `self * s + other * t = g` and `g` is monic
    /// by means of the extended Euclidean algorithm.
    pub fn eea_univariate(&self, other: &Self) -> (Self, Self, Self) {
        if other.is_zero() {
            if self.is_zero() {
                return (self.clone(), self.zero(), self.zero());
            }
            let inv = self.ring.inv(&self.lcoeff());
            return (self.clone().make_monic(), self.constant(inv), self.zero());
        }
        if self.is_zero() {
            let inv = self.ring.inv(&other.lcoeff());
            return (other.clone().make_monic(), self.zero(), self.constant(inv));
        }

        let mut r0 = self.clone().make_monic();
        let mut r1 = other.clone().make_monic();
        let mut s0 = self.constant(self.ring.inv(&self.lcoeff()));
        let mut s1 = self.zero();
        let mut t0 = self.zero();
        let mut t1 = self.constant(self.ring.inv(&other.lcoeff()));

        while !r1.is_zero() {
            let (q, r) = r0.quot_rem_univariate(&r1);
            if r.is_zero() {
                return (r1, s1, t1);
            }

            let a = self.ring.inv(&r.lcoeff());
            (r1, r0) = (r.mul_coeff(a.clone()), r1);
            (s1, s0) = ((s0 - &(&q * &s1)).mul_coeff(a.clone()), s1);
            (t1, t0) = ((t0 - &(&q * &t1)).mul_coeff(a), t1);
        }

        (r0, s0, t0)
    }
}

/// Iterator over the exponent slices of a polynomial.
pub struct ExponentIter<'a, E: Exponent> {
    exponents: &'a [E],
    nvars: usize,
    remaining: usize,
}

impl<'a, E: Exponent> Iterator for ExponentIter<'a, E> {
    type Item = &'a [E];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        let (head, tail) = self.exponents.split_at(self.nvars);
        self.exponents = tail;
        Some(head)
    }
}

impl<F: Ring, E: Exponent> std::fmt::Debug for MultivariatePolynomial<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for monomial in self {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{{ {:?}, {:?} }}",
                monomial.coefficient, monomial.exponents
            )?;
        }
        write!(f, " ]")
    }
}

impl<F: Ring, E: Exponent> Display for MultivariatePolynomial<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        let mut first = true;
        for t in self.into_iter().collect::<Vec<_>>().into_iter().rev() {
            let is_constant = t.exponents.iter().all(|e| e.is_zero());
            let minus_one = !self.ring.is_one(t.coefficient)
                && self.ring.is_one(&self.ring.neg(t.coefficient));

            let mut s = String::new();
            if is_constant {
                s = format!("{}", self.ring.printer(t.coefficient));
            } else if minus_one {
                s.push('-');
            } else if !self.ring.is_one(t.coefficient) {
                s = format!(
                    "{}*",
                    crate::domains::RingPrinter {
                        ring: &self.ring,
                        element: t.coefficient,
                        in_product: true,
                    }
                );
            }

            let mut first_var = true;
            for (v, e) in self.variables.iter().zip(t.exponents) {
                if e.is_zero() {
                    continue;
                }
                if !first_var {
                    s.push('*');
                }
                first_var = false;
                if *e == E::one() {
                    s.push_str(&format!("{}", v));
                } else {
                    s.push_str(&format!("{}^{}", v, e));
                }
            }

            if !first && !s.starts_with('-') {
                f.write_str("+")?;
            }
            first = false;
            f.write_str(&s)?;
        }

        Ok(())
    }
}

impl<F: Ring, E: Exponent> PartialEq for MultivariatePolynomial<F, E> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.nvars() != other.nvars() || self.nterms() != other.nterms() {
            return false;
        }

        if self.order != other.order {
            return *self == other.with_order(self.order.clone());
        }

        self.exponents.eq(&other.exponents) && self.coefficients.eq(&other.coefficients)
    }
}

impl<F: Ring, E: Exponent> std::hash::Hash for MultivariatePolynomial<F, E> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // equal polynomials in different orders must hash the same
        if self.order != MonomialOrder::Lex {
            return self.with_order(MonomialOrder::Lex).hash(state);
        }

        self.coefficients.hash(state);
        self.exponents.hash(state);
    }
}

impl<F: Ring, E: Exponent> Eq for MultivariatePolynomial<F, E> {}

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E> {
    /// Merge two sorted polynomials, optionally negating `other`.
    fn merge(&self, other: &Self, negate: bool) -> Self {
        debug_assert_eq!(self.nvars(), other.nvars());
        debug_assert_eq!(self.order, other.order);

        let nvars = self.nvars();
        let mut res = self.zero_with_capacity(self.nterms() + other.nterms());
        let (mut i, mut j) = (0, 0);

        macro_rules! push_other {
            ($j:expr) => {
                let c = if negate {
                    self.ring.neg(&other.coefficients[$j])
                } else {
                    other.coefficients[$j].clone()
                };
                res.coefficients.push(c);
                res.exponents.extend_from_slice(other.exponents($j));
            };
        }

        while i < self.nterms() && j < other.nterms() {
            match self.order.cmp(self.exponents(i), other.exponents(j)) {
                Ordering::Less => {
                    res.coefficients.push(self.coefficients[i].clone());
                    res.exponents.extend_from_slice(self.exponents(i));
                    i += 1;
                }
                Ordering::Greater => {
                    push_other!(j);
                    j += 1;
                }
                Ordering::Equal => {
                    let coeff = if negate {
                        self.ring.sub(&self.coefficients[i], &other.coefficients[j])
                    } else {
                        self.ring.add(&self.coefficients[i], &other.coefficients[j])
                    };
                    if !F::is_zero(&coeff) {
                        res.coefficients.push(coeff);
                        res.exponents.extend_from_slice(self.exponents(i));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        res.coefficients.extend_from_slice(&self.coefficients[i..]);
        res.exponents
            .extend_from_slice(&self.exponents[i * nvars..self.nterms() * nvars]);

        while j < other.nterms() {
            push_other!(j);
            j += 1;
        }

        res
    }

    /// Multiply two polynomials by collecting all products and sorting them.
    fn mul_collect(&self, rhs: &Self) -> Self {
        let nvars = self.nvars();
        let mut coefficients = Vec::with_capacity(self.nterms() * rhs.nterms());
        let mut exponents = Vec::with_capacity(self.nterms() * rhs.nterms() * nvars);

        for a in self {
            for b in rhs {
                coefficients.push(self.ring.mul(a.coefficient, b.coefficient));
                for (ea, eb) in a.exponents.iter().zip(b.exponents) {
                    exponents.push(
                        ea.checked_add(eb)
                            .unwrap_or_else(|| panic!("Exponent overflow in {} + {}", ea, eb)),
                    );
                }
            }
        }

        self.from_unsorted_terms(coefficients, exponents)
    }
}

impl<F: Ring, E: Exponent> Add for MultivariatePolynomial<F, E> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        self.merge(&other, false)
    }
}

impl<'a, F: Ring, E: Exponent> Add<&'a MultivariatePolynomial<F, E>>
    for MultivariatePolynomial<F, E>
{
    type Output = Self;

    fn add(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        if other.is_zero() {
            return self;
        }
        self.merge(other, false)
    }
}

impl<'a, 'b, F: Ring, E: Exponent> Add<&'a MultivariatePolynomial<F, E>>
    for &'b MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    fn add(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        self.merge(other, false)
    }
}

impl<F: Ring, E: Exponent> Sub for MultivariatePolynomial<F, E> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        if other.is_zero() {
            return self;
        }
        self.merge(&other, true)
    }
}

impl<'a, F: Ring, E: Exponent> Sub<&'a MultivariatePolynomial<F, E>>
    for MultivariatePolynomial<F, E>
{
    type Output = Self;

    fn sub(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        if other.is_zero() {
            return self;
        }
        self.merge(other, true)
    }
}

impl<'a, 'b, F: Ring, E: Exponent> Sub<&'a MultivariatePolynomial<F, E>>
    for &'b MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    fn sub(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        if other.is_zero() {
            return self.clone();
        }
        self.merge(other, true)
    }
}

impl<F: Ring, E: Exponent> Neg for MultivariatePolynomial<F, E> {
    type Output = Self;
    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = self.ring.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring, E: Exponent> Mul<&'a MultivariatePolynomial<F, E>>
    for &'b MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    #[inline]
    fn mul(self, rhs: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        if self.nterms() == 0 || rhs.nterms() == 0 {
            return self.zero();
        }

        if self.nterms() == 1 {
            return rhs
                .clone()
                .mul_monomial(&self.coefficients[0], &self.exponents);
        }

        if rhs.nterms() == 1 {
            return self
                .clone()
                .mul_monomial(&rhs.coefficients[0], &rhs.exponents);
        }

        self.mul_collect(rhs)
    }
}

impl<'a, F: Ring, E: Exponent> Mul<&'a MultivariatePolynomial<F, E>>
    for MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    #[inline]
    fn mul(self, rhs: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        (&self) * rhs
    }
}

impl<'a, 'b, F: Ring, E: Exponent> Div<&'a MultivariatePolynomial<F, E>>
    for &'b MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    fn div(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        self.divides(other)
            .unwrap_or_else(|| panic!("No clean division of {} by {}", self, other))
    }
}

impl<'a, F: Ring, E: Exponent> Div<&'a MultivariatePolynomial<F, E>>
    for MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    fn div(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        (&self).div(other)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::finite_field::{Zp, Z2};
    use crate::domains::integer::{Integer, Z};
    use crate::domains::rational::{Rational, Q};
    use crate::poly::order::MonomialOrder;
    use crate::poly::Variable;

    use super::MultivariatePolynomial;

    fn vars(n: usize) -> Arc<Vec<Variable>> {
        Arc::new(
            ["x", "y", "z", "w"][..n]
                .iter()
                .map(|v| Variable::from(*v))
                .collect(),
        )
    }

    #[test]
    fn arithmetic() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(2));
        let x = zero.variable(0);
        let y = zero.variable(1);

        let a = &x + &y;
        let b = &x - &y;
        let p = &a * &b;
        assert_eq!(p, &(&x * &x) - &(&y * &y));
        assert_eq!(p.nterms(), 2);
        p.check_consistency();

        assert_eq!(&p / &a, b);
        assert!(p.divides(&(&x + &zero.one())).is_none());
        assert_eq!(a.pow(3).nterms(), 4);
        assert_eq!(format!("{}", b), "x-y");
    }

    #[test]
    fn display_in_characteristic_two() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z2, None, vars(2));
        let x = zero.variable(0);
        let y = zero.variable(1);

        let a = (&x.pow(2) - &y).add_constant(1);
        assert_eq!(format!("{}", a), "x^2+y+1");
        assert_eq!(format!("{}", -x), "x");

        let zero = MultivariatePolynomial::<_, u16>::new(&Zp::new(3), None, vars(2));
        let b = &zero.variable(0) - &zero.variable(1);
        assert_eq!(format!("{}", b), "x-y");
    }

    #[test]
    fn evaluation_and_shift() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Z, None, vars(2));
        let x = zero.variable(0);
        let y = zero.variable(1);

        // (x + y)^2 at y = 2
        let p = (&x + &y).pow(2);
        let r = p.replace(1, &Integer::new(2));
        assert_eq!(r, (&x + &zero.constant(Integer::new(2))).pow(2));

        // shifting y -> y + 1 and back is the identity
        let s = p.shift_var(1, &Integer::one());
        assert_eq!(s.shift_var(1, &Integer::new(-1)), p);

        assert_eq!(
            p.replace_all(&[Integer::new(3), Integer::new(4)]),
            Integer::new(49)
        );

        let d = p.derivative(0);
        assert_eq!(d, &x.clone().mul_coeff(Integer::new(2)) + &y.mul_coeff(Integer::new(2)));
    }

    #[test]
    fn orders() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Q, None, vars(3));
        let x = zero.variable(0);
        let y = zero.variable(1);
        let z = zero.variable(2);

        let p = &(&x + &y.pow(3)) + &(&x * &z);
        let g = p.with_order(MonomialOrder::Grevlex);
        g.check_consistency();
        assert_eq!(g.last_exponents(), &[0, 3, 0]);
        assert_eq!(p.last_exponents(), &[1, 0, 1]);
        assert_eq!(g, p);

        let q = p.rearrange(&[2, 1, 0]);
        assert_eq!(q.rearrange(&[2, 1, 0]), p);
        assert_eq!(q.get_vars_ref()[0], Variable::from("z"));
    }

    #[test]
    fn univariate_division() {
        let field = Zp::new(17);
        let zero = MultivariatePolynomial::<_, u16>::new(&field, None, vars(1));
        let x = zero.variable(0);
        let one = zero.one();

        let a = &(&x.pow(3) + &x) + &one;
        let b = &x.pow(2) - &one;
        let (q, r) = a.quot_rem_univariate(&b);
        assert_eq!(&(&q * &b) + &r, a);
        assert!(r.degree(0) < 2);

        let (g, s, t) = a.eea_univariate(&b);
        assert_eq!(&(&a * &s) + &(&b * &t), g);
        assert!(g.is_one());

        let e = x.exp_mod_univariate(&Integer::new(17), &b);
        assert_eq!(e, x.pow(17).quot_rem_univariate(&b).1);
    }

    #[test]
    fn content() {
        let zero = MultivariatePolynomial::<_, u16>::new(&Q, None, vars(1));
        let x = zero.variable(0);
        let p = &x.clone().mul_coeff(Rational::from((2, 3))) + &zero.constant(Rational::from((4, 9)));
        let pp = p.make_primitive();
        assert_eq!(pp, &x.mul_coeff(Rational::from(3i64)) + &zero.constant(Rational::from(2i64)));
    }
}
